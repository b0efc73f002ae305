#![warn(missing_docs)]
//! Deterministic testing surfaces: JSON metrics reports for worldtests.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use voxelstream_core::SimTick;

/// Overall test result status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestResult {
    /// Test passed all validations.
    Pass,
    /// Test failed.
    Fail,
}

/// Streaming metrics captured by a worldtest run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamReport {
    /// Test identifier.
    pub test_name: String,
    /// Overall result.
    pub result: TestResult,
    /// Simulation ticks driven.
    pub ticks: SimTick,
    /// Chunks inserted into the live set.
    pub chunks_built: u64,
    /// Chunks destroyed after leaving the needed set.
    pub chunks_destroyed: u64,
    /// Builds that failed.
    pub build_failures: u64,
    /// Reconciliation passes run.
    pub reconciliations: u64,
    /// Live chunk count at the end of the run.
    pub final_live_chunks: usize,
    /// Whether the live set matched the needed set at the end.
    pub converged: bool,
}

/// Writes worldtest reports as pretty JSON for CI artifacts.
pub struct MetricsSink {
    file: File,
}

impl MetricsSink {
    /// Create a sink pointed at the supplied path, creating parent dirs if needed.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(Self {
            file: File::create(path)?,
        })
    }

    /// Persist the provided report as pretty JSON.
    pub fn write(&mut self, report: &StreamReport) -> Result<()> {
        let json = serde_json::to_string_pretty(report)?;
        self.file.write_all(json.as_bytes())?;
        self.file.write_all(b"\n")?;
        Ok(())
    }
}
