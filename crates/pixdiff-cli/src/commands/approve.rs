use anyhow::{Result, bail};

use crate::store::{self, Store};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    New,
    Failed,
    Unchanged,
}

/// Any byte difference from the reference counts as failed, whether or not
/// `check` has produced a difference file for it yet.
fn classify(store: &Store, id: &str, current: &[u8]) -> Result<Kind> {
    Ok(match store.read_reference(id)? {
        None => Kind::New,
        Some(reference) if reference == current => Kind::Unchanged,
        Some(_) => Kind::Failed,
    })
}

/// `pixdiff approve` — promote current snapshots to reference.
/// Returns the number of snapshots approved.
pub fn approve(
    store: &Store,
    filter: Option<&str>,
    new_only: bool,
    failed_only: bool,
    all: bool,
) -> Result<usize> {
    // No kind flag (or both) selects every kind.
    let select_all = all || new_only == failed_only;
    let ids = store.list_current_ids();
    if ids.is_empty() {
        println!("Nothing to approve — current/ is empty.");
        return Ok(0);
    }

    let mut count_new = 0usize;
    let mut count_failed = 0usize;
    let mut matched = false;

    for id in &ids {
        if let Some(pat) = filter
            && !store::matches_filter(id, pat)
        {
            continue;
        }

        let Some(png) = store.read_current(id)? else {
            bail!("Could not read current/{id}.png");
        };
        let kind = classify(store, id, &png)?;

        let wanted = match kind {
            Kind::Unchanged => false,
            Kind::New => select_all || new_only,
            Kind::Failed => select_all || failed_only,
        };
        if !wanted {
            continue;
        }
        matched = true;

        store.write_reference(id, &png)?;
        let label = match kind {
            Kind::Failed => {
                count_failed += 1;
                "\x1b[31mFAIL\x1b[0m"
            }
            _ => {
                count_new += 1;
                "\x1b[33m NEW\x1b[0m"
            }
        };
        println!("  Approved  {label}  {id}");
    }

    if !matched {
        println!("No snapshots matched the given filters.");
        return Ok(0);
    }

    let total = count_new + count_failed;
    println!();
    println!("{total} snapshot(s) approved ({count_new} new, {count_failed} failed).");

    Ok(total)
}
