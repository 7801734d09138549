//! Counter log pipeline benchmark
//!
//! A typical perfmon capture on a busy workstation has a few hundred
//! process instances sampled every 15 seconds for a working day, so the
//! interesting inputs are wide tables with thousands of rows.
//!
//! # Run Instructions
//!
//! ```bash
//! cargo bench --bench pipeline
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pcpuvis::config::PipelineConfig;
use pcpuvis::csv_input;
use pcpuvis::pipeline;

const CORES: u32 = 8;

/// Synthetic PDH-CSV 4.0 log text with `groups` groups of 3 instances each
fn synthetic_log(groups: usize, rows: usize) -> String {
    let mut header = vec!["\"(PDH-CSV 4.0) (UTC)(0)\"".to_string()];
    for name in ["_Total", "Idle"] {
        header.push(format!("\"\\\\BENCH\\Process({})\\% Processor Time\"", name));
    }
    for g in 0..groups {
        for k in 0..3 {
            let instance = if k == 0 {
                format!("proc{}", g)
            } else {
                format!("proc{}#{}", g, k)
            };
            header.push(format!(
                "\"\\\\BENCH\\Process({})\\% Processor Time\"",
                instance
            ));
        }
    }

    let mut lines = vec![header.join(",")];
    for r in 0..rows {
        let seconds = r * 15;
        let mut cells = vec![format!(
            "\"01/02/2024 {:02}:{:02}:{:02}.000\"",
            (seconds / 3600) % 24,
            (seconds / 60) % 60,
            seconds % 60
        )];
        cells.push(format!("\"{}\"", 100 * CORES));
        cells.push("\"300.5\"".to_string());
        for i in 0..groups * 3 {
            cells.push(format!("\"{}.{}\"", (i * 7 + r) % 90, (i + r) % 10));
        }
        lines.push(cells.join(","));
    }
    lines.join("\r\n")
}

fn config() -> PipelineConfig {
    PipelineConfig {
        cores: CORES,
        ..Default::default()
    }
}

/// Benchmark: CSV splitting only
fn bench_csv_parse(c: &mut Criterion) {
    let content = synthetic_log(100, 500);

    c.bench_function("csv_parse_100x500", |b| {
        b.iter(|| black_box(csv_input::parse(black_box(&content)).unwrap()));
    });
}

/// Benchmark: full pipeline over already-split tables of growing height
fn bench_pipeline_rows(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline_rows");

    for rows in [100, 1000, 4000] {
        let table = csv_input::parse(&synthetic_log(50, rows)).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(rows), &table, |b, table| {
            b.iter(|| black_box(pipeline::run(black_box(table), &config()).unwrap()));
        });
    }

    group.finish();
}

/// Benchmark: detailed (per-instance) ranking over a wide table
fn bench_pipeline_detailed(c: &mut Criterion) {
    let table = csv_input::parse(&synthetic_log(200, 200)).unwrap();
    let config = PipelineConfig {
        detailed: true,
        ..config()
    };

    c.bench_function("pipeline_detailed_600_instances", |b| {
        b.iter(|| black_box(pipeline::run(black_box(&table), &config).unwrap()));
    });
}

criterion_group!(
    benches,
    bench_csv_parse,
    bench_pipeline_rows,
    bench_pipeline_detailed,
);
criterion_main!(benches);
