use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::check::diff::PairResult;
use crate::check::{CheckOutcome, SnapshotStatus, check_all};
use crate::config::ResolvedRunConfig;
use crate::report::json::{self, CheckEntry, CheckReport};
use crate::report::terminal::{self, Counts};
use crate::store::{self, Store};

/// `pixdiff check` — compare every current snapshot with its reference.
/// Returns exit code: 0 = all pass, 1 = any fail, new or error.
pub async fn check(config: ResolvedRunConfig, filter: Option<&str>, as_json: bool) -> Result<i32> {
    let store = Arc::new(Store::new(&config.root));

    let mut ids: Vec<String> = store.list_current_ids().into_iter().collect();
    if let Some(pattern) = filter {
        ids.retain(|id| store::matches_filter(id, pattern));
    }
    let checked: BTreeSet<String> = ids.iter().cloned().collect();

    // Clear stale difference files before comparing.
    // Full run: wipe the dir (catches removed snapshots).
    // Filtered run: only clear files for the snapshots being checked.
    if filter.is_some() {
        for id in &ids {
            store.remove_difference(id);
        }
    } else {
        store.clear_differences();
    }

    let run_start = Instant::now();
    let mut counts = Counts {
        total: ids.len(),
        ..Counts::default()
    };
    let total = counts.total;

    let mut failed_names: Vec<String> = Vec::new();
    let mut new_names: Vec<String> = Vec::new();
    let mut errored_names: Vec<String> = Vec::new();
    let mut entries: Vec<CheckEntry> = Vec::new();

    // Workers pop from the back; reverse so results arrive roughly sorted.
    ids.reverse();
    let mut rx = check_all(store.clone(), ids, config.palette, config.parallel);

    let mut done = 0usize;
    debug!(total, "waiting for check results");
    while let Some((name, outcome)) = rx.recv().await {
        done += 1;
        debug!(done, total, name = %name, "received result");

        let (status, elapsed) = match outcome {
            CheckOutcome::New => (SnapshotStatus::New, Duration::ZERO),
            CheckOutcome::Err(msg) => (SnapshotStatus::Error(msg), Duration::ZERO),
            CheckOutcome::Done(PairResult::Identical, elapsed) => (SnapshotStatus::Pass, elapsed),
            CheckOutcome::Done(PairResult::Resized { reference, current }, elapsed) => {
                (SnapshotStatus::Resized { reference, current }, elapsed)
            }
            CheckOutcome::Done(
                PairResult::Changed {
                    diff_pixels,
                    percent,
                    diff_image,
                },
                elapsed,
            ) => {
                let written = pixdiff::encode_png(&diff_image)
                    .context("Failed to encode diff image")
                    .and_then(|png| store.write_difference(&name, &png));
                match written {
                    Ok(()) => (
                        SnapshotStatus::Fail {
                            diff_pixels,
                            percent,
                        },
                        elapsed,
                    ),
                    Err(e) => {
                        warn!(job = %name, error = %format!("{e:#}"), "could not store difference");
                        (SnapshotStatus::Error(format!("{e:#}")), elapsed)
                    }
                }
            }
        };

        counts.record(&status);
        match &status {
            SnapshotStatus::Pass => {}
            SnapshotStatus::Fail { .. } | SnapshotStatus::Resized { .. } => {
                failed_names.push(name.clone())
            }
            SnapshotStatus::New => new_names.push(name.clone()),
            SnapshotStatus::Error(_) => errored_names.push(name.clone()),
        }

        if as_json {
            entries.push(CheckEntry::new(name, &status, elapsed));
        } else {
            terminal::print_line(&name, &status, elapsed);
            terminal::show_progress(done, total);
        }
    }

    // Missing detection: only on full (unfiltered) runs.
    let mut missing_names: Vec<String> = Vec::new();
    if filter.is_none() {
        let reference_ids = store.list_reference_ids();
        for id in reference_ids.difference(&checked) {
            if !as_json {
                terminal::print_missing_line(id);
            }
            missing_names.push(id.clone());
        }
    }
    counts.missing = missing_names.len();

    if as_json {
        entries.sort_by(|a, b| a.id.cmp(&b.id));
        json::print(&CheckReport {
            snapshots: entries,
            missing: missing_names,
            summary: counts,
        })?;
    } else {
        if total == 0 {
            println!(
                "No snapshots found in {}",
                config.root.join(store::CURRENT_DIR).display()
            );
        }
        terminal::print_actionable_summary(
            &failed_names,
            &new_names,
            &errored_names,
            &missing_names,
        );
        terminal::print_summary(&counts, run_start.elapsed());
    }

    Ok(counts.exit_code())
}
