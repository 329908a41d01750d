use std::io::Write;
use std::time::Duration;

use serde::Serialize;

use crate::check::SnapshotStatus;

/// Clear the current terminal line (wipes progress indicator).
pub fn clear_line() {
    print!("\r\x1b[2K");
}

pub fn format_duration(d: Duration) -> String {
    let ms = d.as_millis();
    if ms < 1000 {
        format!("{ms}ms")
    } else {
        format!("{:.1}s", d.as_secs_f64())
    }
}

/// Two decimals, matching the rounding of the comparator.
pub fn format_percent(percent: f64) -> String {
    format!("{percent:.2}%")
}

/// Print a single snapshot result line.
pub fn print_line(name: &str, status: &SnapshotStatus, elapsed: Duration) {
    clear_line();
    let time_suffix = format!("  \x1b[2m{}\x1b[0m", format_duration(elapsed));

    match status {
        SnapshotStatus::Pass => {
            println!("  \x1b[32mPASS\x1b[0m  {name}{time_suffix}");
        }
        SnapshotStatus::Fail {
            diff_pixels,
            percent,
        } => {
            println!(
                "  \x1b[31mFAIL\x1b[0m  {name}  ({diff_pixels} pixels, {}){time_suffix}",
                format_percent(*percent)
            );
        }
        SnapshotStatus::Resized {
            reference: (rw, rh),
            current: (cw, ch),
        } => {
            println!(
                "  \x1b[31mFAIL\x1b[0m  {name}  (dimensions changed: {rw}x{rh} -> {cw}x{ch}){time_suffix}"
            );
        }
        SnapshotStatus::New => {
            println!("  \x1b[33m NEW\x1b[0m  {name}  (no reference){time_suffix}");
        }
        SnapshotStatus::Error(msg) => {
            println!("  \x1b[31m ERR\x1b[0m  {name}  ({msg}){time_suffix}");
        }
    }
}

/// Print a reference that has no current candidate.
pub fn print_missing_line(name: &str) {
    clear_line();
    println!("  \x1b[2mMISS\x1b[0m  \x1b[2m{name}  (no current snapshot)\x1b[0m");
}

/// Show check progress indicator.
pub fn show_progress(done: usize, total: usize) {
    if done < total {
        print!("  Comparing  [{done}/{total}]");
        let _ = std::io::stdout().flush();
    }
}

/// Print an actionable summary listing snapshot names grouped by status.
/// Only prints sections with at least one entry.
pub fn print_actionable_summary(
    failed: &[String],
    new: &[String],
    errored: &[String],
    missing: &[String],
) {
    if failed.is_empty() && new.is_empty() && errored.is_empty() && missing.is_empty() {
        return;
    }

    clear_line();
    println!();
    println!("Actionable snapshots:");

    for (label, names) in [
        ("Failed", failed),
        ("New", new),
        ("Errored", errored),
        ("Missing", missing),
    ] {
        if !names.is_empty() {
            println!();
            println!("  {label} ({}):", names.len());
            for name in names {
                println!("    {name}");
            }
        }
    }
}

/// Totals for the final summary.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Counts {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub new: usize,
    pub errored: usize,
    pub missing: usize,
}

impl Counts {
    pub fn record(&mut self, status: &SnapshotStatus) {
        match status {
            SnapshotStatus::Pass => self.passed += 1,
            SnapshotStatus::Fail { .. } | SnapshotStatus::Resized { .. } => self.failed += 1,
            SnapshotStatus::New => self.new += 1,
            SnapshotStatus::Error(_) => self.errored += 1,
        }
    }

    /// Missing references do NOT affect the exit code.
    pub fn exit_code(&self) -> i32 {
        if self.failed > 0 || self.new > 0 || self.errored > 0 {
            1
        } else {
            0
        }
    }
}

/// Print the final summary.
pub fn print_summary(counts: &Counts, elapsed: Duration) {
    let Counts {
        total,
        passed,
        failed,
        new,
        errored,
        missing,
    } = *counts;

    clear_line();
    println!();
    print!(
        "Snapshots:  {total} total, \x1b[32m{passed} passed\x1b[0m, \x1b[31m{failed} failed\x1b[0m, \x1b[33m{new} new\x1b[0m"
    );
    if errored > 0 {
        print!(", \x1b[31m{errored} errored\x1b[0m");
    }
    if missing > 0 {
        print!(", \x1b[2m{missing} missing\x1b[0m");
    }
    println!();
    println!("Time:       {}", format_duration(elapsed));

    if failed > 0 || new > 0 || errored > 0 || missing > 0 {
        println!();
        if failed > 0 {
            println!("{failed} snapshot(s) have pixel differences.");
        }
        if new > 0 {
            println!("{new} snapshot(s) have no reference.");
        }
        if errored > 0 {
            println!("{errored} snapshot(s) could not be compared.");
        }
        if missing > 0 {
            println!("{missing} reference(s) have no current snapshot.");
        }
        if failed > 0 || new > 0 {
            println!("Run `pixdiff approve` to accept the current snapshots.");
        }
    }
}
