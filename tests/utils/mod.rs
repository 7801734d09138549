// Counter log fixtures shared by the integration tests

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

pub const HEADER_TAG: &str = "(PDH-CSV 4.0) (W. Europe Standard Time)(-60)";

/// Builder for PDH-CSV 4.0 counter logs
#[derive(Debug, Clone)]
pub struct CounterLog {
    tag: String,
    instances: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl CounterLog {
    pub fn new(instances: &[&str]) -> Self {
        Self {
            tag: HEADER_TAG.to_string(),
            instances: instances.iter().map(|s| s.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn with_tag(mut self, tag: &str) -> Self {
        self.tag = tag.to_string();
        self
    }

    /// Append a sample; the timestamp advances 15 seconds per row
    pub fn sample(mut self, values: &[&str]) -> Self {
        let seconds = self.rows.len() * 15;
        let mut row = vec![format!(
            "03/14/2017 10:{:02}:{:02}.123000",
            seconds / 60,
            seconds % 60
        )];
        row.extend(values.iter().map(|v| v.to_string()));
        self.rows.push(row);
        self
    }

    pub fn header(&self) -> Vec<String> {
        let mut header = vec![self.tag.clone()];
        header.extend(
            self.instances
                .iter()
                .map(|i| format!(r"\\WKS-01\Process({})\% Processor Time", i)),
        );
        header
    }

    /// In-memory table, header first
    pub fn table(&self) -> Vec<Vec<String>> {
        let mut table = vec![self.header()];
        table.extend(self.rows.iter().cloned());
        table
    }

    /// Quoted CSV text as written by perfmon
    pub fn to_csv(&self) -> String {
        self.table()
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| format!("\"{}\"", cell.replace('"', "\"\"")))
                    .collect::<Vec<_>>()
                    .join(",")
            })
            .collect::<Vec<_>>()
            .join("\r\n")
            + "\r\n"
    }

    /// Write the log into `dir` and return its path
    pub fn write_to(&self, dir: &TempDir, name: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, self.to_csv()).unwrap();
        path
    }
}

/// A realistic log: reserved counters, grouped chrome instances and five
/// other processes, sampled four times on a 4-core machine
pub fn workstation_log() -> CounterLog {
    CounterLog::new(&[
        "_Total",
        "Idle",
        "chrome",
        "chrome#1",
        "chrome#2",
        "System",
        "svchost",
        "svchost#1",
        "explorer",
        "MsMpEng",
        "Teams",
        "OUTLOOK",
    ])
    .sample(&["400", "180", "40", "30", "10", "20", "15", "15", "25", "30", "25", "10"])
    .sample(&["400", "160", "50", "40", "20", "20", "10", "10", "30", "25", "25", "10"])
    .sample(&["400", "200", "30", "20", "10", "20", "20", "10", "20", "35", "25", "10"])
    .sample(&["400", "140", "60", "50", "30", "20", "10", "10", "20", "20", "30", "10"])
}
