use anyhow::{Context, Result};
use clap::Parser;
use pcpuvis::cli::{Cli, OutputFormat};
use pcpuvis::config::{self, ConfigFile, PipelineConfig};
use pcpuvis::csv_output;
use pcpuvis::chart::{self, ChartFormat};
use pcpuvis::json_output::JsonOutput;
use pcpuvis::pipeline::{self, PipelineReport};
use pcpuvis::summary;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

const PROGRESS_BAR_LEN: usize = 60;

/// `RUST_LOG` when set and valid, INFO otherwise; `--verbose` adds DEBUG on top
fn log_filter(verbose: bool, rust_log: Option<&str>) -> EnvFilter {
    let filter = rust_log
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("info"));
    if verbose {
        filter.add_directive(tracing::Level::DEBUG.into())
    } else {
        filter
    }
}

/// Initialize tracing subscriber
fn init_tracing(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let builder = tracing_subscriber::fmt()
        .with_env_filter(log_filter(verbose, rust_log.as_deref()))
        .with_target(false);

    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None => builder.with_writer(std::io::stderr).init(),
    }
    Ok(())
}

/// Draw `[=====-----] 42.0% ...processing n/m row` on stderr
fn draw_progress(count: usize, total: usize) {
    if total == 0 {
        return;
    }
    let ratio = count as f64 / total as f64;
    let filled = ((PROGRESS_BAR_LEN as f64 * ratio).round() as usize).min(PROGRESS_BAR_LEN);
    let bar = format!("{}{}", "=".repeat(filled), "-".repeat(PROGRESS_BAR_LEN - filled));
    let mut stderr = std::io::stderr().lock();
    let _ = write!(
        stderr,
        "[{}] {:.1}% ...processing {}/{} row\r",
        bar,
        ratio * 100.0,
        count,
        total
    );
    let _ = stderr.flush();
}

/// Print program banner and the effective parameters
fn print_program_params(args: &Cli, config: &PipelineConfig) {
    println!();
    println!(
        "pcpuvis v{} - parse and visualize processes CPU usage",
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!("Program parameters:");
    println!("- Input file:   {}", args.input.display());
    println!("- Cores count:  {}", config.cores);
    println!("- Process ID:   {}", config.numeric_pid);
    if let Some(output) = &args.output {
        println!("- Output file:  {}", output.display());
    }
    if let Some(picture) = &args.picture {
        println!("- Picture file: {}", picture.display());
    }
    if !args.title.is_empty() {
        println!("- Title:        {}", args.title);
    }
    println!("- Details:      {}", config.detailed);
    println!("- Verbose:      {}", args.verbose);
    println!();

    tracing::debug!(?args, ?config, "program parameters");
}

/// Render the report to stdout in the requested format
fn print_report(report: &PipelineReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            println!("{}", summary::render_table(&report.percent_table));
            println!("{}", summary::count_line(report));
            println!();
            println!("Top processes:");
            println!("{}", summary::render_legend(report));
        }
        OutputFormat::Json => {
            let json = JsonOutput::new(report)
                .to_json()
                .context("Failed to serialize report")?;
            println!("{}", json);
        }
        OutputFormat::Csv => print!("{}", csv_output::to_csv(report)),
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Cli::parse();

    init_tracing(args.verbose, args.log_file.as_deref())?;

    let config_file = args
        .config
        .as_ref()
        .map(|path| {
            ConfigFile::from_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))
        })
        .transpose()?;
    let config = config::resolve(args.flag_settings(), config_file.as_ref())?;
    if let Some(path) = &args.picture {
        ChartFormat::from_path(path)?;
    }

    anyhow::ensure!(
        args.input.is_file(),
        "Input file not found: {}",
        args.input.display()
    );

    if args.format == OutputFormat::Text {
        print_program_params(&args, &config);
    }

    let show_progress = args.show_progress();
    let report = pipeline::run_file(&args.input, &config, |done, total| {
        if show_progress {
            draw_progress(done, total);
        }
    })
    .with_context(|| format!("Failed to process {}", args.input.display()))?;
    if show_progress {
        eprintln!();
    }

    tracing::info!(
        groups = report.group_count(),
        instances = report.instance_count(),
        anomalies = report.anomalies.len(),
        "{}",
        summary::count_line(&report)
    );

    print_report(&report, args.format)?;

    if let Some(path) = &args.output {
        fs::write(path, summary::render_table(&report.percent_table))
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }

    if let Some(path) = &args.picture {
        chart::write_chart(&report, &args.title, path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }

    Ok(())
}
