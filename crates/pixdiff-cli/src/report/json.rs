use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Serialize;

use super::terminal::Counts;
use crate::check::SnapshotStatus;

/// `pixdiff diff --json` output.
#[derive(Debug, Serialize)]
pub struct DiffReport<'a> {
    pub reference: &'a Path,
    pub current: &'a Path,
    pub width: u32,
    pub height: u32,
    pub diff_pixels: u64,
    pub total_pixels: u64,
    pub percent: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff_image: Option<&'a Path>,
}

/// One row of `pixdiff check --json`.
#[derive(Debug, Serialize)]
pub struct CheckEntry {
    pub id: String,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff_pixels: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_size: Option<(u32, u32)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_size: Option<(u32, u32)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub elapsed_ms: u64,
}

impl CheckEntry {
    pub fn new(id: String, status: &SnapshotStatus, elapsed: Duration) -> Self {
        let mut entry = Self {
            id,
            status: status.label(),
            diff_pixels: None,
            percent: None,
            reference_size: None,
            current_size: None,
            error: None,
            elapsed_ms: elapsed.as_millis() as u64,
        };
        match status {
            SnapshotStatus::Pass => entry.percent = Some(0.0),
            SnapshotStatus::Fail {
                diff_pixels,
                percent,
            } => {
                entry.diff_pixels = Some(*diff_pixels);
                entry.percent = Some(*percent);
            }
            SnapshotStatus::Resized { reference, current } => {
                entry.reference_size = Some(*reference);
                entry.current_size = Some(*current);
            }
            SnapshotStatus::New => {}
            SnapshotStatus::Error(msg) => entry.error = Some(msg.clone()),
        }
        entry
    }
}

#[derive(Debug, Serialize)]
pub struct CheckReport {
    pub snapshots: Vec<CheckEntry>,
    pub missing: Vec<String>,
    pub summary: Counts,
}

pub fn print<T: Serialize>(report: &T) -> Result<()> {
    let out = serde_json::to_string_pretty(report).context("Failed to serialize report")?;
    println!("{out}");
    Ok(())
}
