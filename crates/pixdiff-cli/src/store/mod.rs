use std::collections::BTreeSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub const REFERENCE_DIR: &str = "reference";
pub const CURRENT_DIR: &str = "current";
pub const DIFFERENCE_DIR: &str = "difference";

/// Snapshot directory: `reference/`, `current/` and `difference/` PNGs keyed by ID.
///
/// An ID is the path relative to the subdirectory, without the `.png`
/// extension, e.g. `checkout/button_hover`.
pub struct Store {
    root: PathBuf,
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    Ok(())
}

/// Missing files are `None`; any other I/O error is reported.
fn read_optional(path: &Path) -> Result<Option<Vec<u8>>> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
    }
}

/// Recursively walk a directory, collecting all `.png` files as IDs.
fn collect_png_ids(base: &Path, dir: &Path, ids: &mut BTreeSet<String>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        // Symlinked directories are not followed.
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        if file_type.is_dir() {
            collect_png_ids(base, &path, ids);
        } else if path.extension().is_some_and(|e| e == "png")
            && let Ok(rel) = path.strip_prefix(base)
        {
            // IDs always use `/`, whatever the platform separator.
            let id = rel
                .with_extension("")
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join("/");
            ids.insert(id);
        }
    }
}

impl Store {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn file_path(&self, subdir: &str, id: &str) -> PathBuf {
        self.root.join(subdir).join(format!("{id}.png"))
    }

    fn list_ids(&self, subdir: &str) -> BTreeSet<String> {
        let dir = self.root.join(subdir);
        let mut ids = BTreeSet::new();
        collect_png_ids(&dir, &dir, &mut ids);
        ids
    }

    pub fn list_current_ids(&self) -> BTreeSet<String> {
        self.list_ids(CURRENT_DIR)
    }

    pub fn list_reference_ids(&self) -> BTreeSet<String> {
        self.list_ids(REFERENCE_DIR)
    }

    pub fn read_reference(&self, id: &str) -> Result<Option<Vec<u8>>> {
        read_optional(&self.file_path(REFERENCE_DIR, id))
    }

    pub fn read_current(&self, id: &str) -> Result<Option<Vec<u8>>> {
        read_optional(&self.file_path(CURRENT_DIR, id))
    }

    #[cfg(test)]
    pub fn has_difference(&self, id: &str) -> bool {
        self.file_path(DIFFERENCE_DIR, id).exists()
    }

    /// Promote a snapshot to reference. Any stale difference is dropped.
    pub fn write_reference(&self, id: &str, png: &[u8]) -> Result<()> {
        let path = self.file_path(REFERENCE_DIR, id);
        ensure_parent(&path)?;
        std::fs::write(&path, png)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        self.remove_difference(id);
        Ok(())
    }

    pub fn write_difference(&self, id: &str, png: &[u8]) -> Result<()> {
        let path = self.file_path(DIFFERENCE_DIR, id);
        ensure_parent(&path)?;
        std::fs::write(&path, png)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    pub fn remove_difference(&self, id: &str) {
        let _ = std::fs::remove_file(self.file_path(DIFFERENCE_DIR, id));
    }

    /// Wipe `difference/` entirely (full, unfiltered runs).
    pub fn clear_differences(&self) {
        let dir = self.root.join(DIFFERENCE_DIR);
        if dir.exists() {
            let _ = std::fs::remove_dir_all(&dir);
        }
    }
}

/// Normalize a string for filter comparison: lowercase + treat `_` and ` ` as equivalent.
fn normalize_for_filter(s: &str) -> String {
    s.to_lowercase().replace('_', " ")
}

/// Case-insensitive substring match of a snapshot ID.
/// A trailing `.png` on the pattern is ignored (users paste file names).
pub fn matches_filter(id: &str, pattern: &str) -> bool {
    let pattern = pattern.strip_suffix(".png").unwrap_or(pattern);
    normalize_for_filter(id).contains(&normalize_for_filter(pattern))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(store: &Store, subdir: &str, id: &str, bytes: &[u8]) {
        let path = store.file_path(subdir, id);
        ensure_parent(&path).unwrap();
        std::fs::write(path, bytes).unwrap();
    }

    #[test]
    fn lists_nested_ids_without_extension() {
        let tmp = tempfile::tempdir().unwrap();
        let store = Store::new(tmp.path());
        touch(&store, CURRENT_DIR, "home", b"a");
        touch(&store, CURRENT_DIR, "checkout/button_hover", b"b");
        std::fs::write(tmp.path().join(CURRENT_DIR).join("notes.txt"), "x").unwrap();

        let ids: Vec<String> = store.list_current_ids().into_iter().collect();
        assert_eq!(ids, vec!["checkout/button_hover", "home"]);
        assert!(store.list_reference_ids().is_empty());
    }

    #[test]
    fn only_lowercase_png_extension_is_listed() {
        let tmp = tempfile::tempdir().unwrap();
        let store = Store::new(tmp.path());
        let dir = tmp.path().join(CURRENT_DIR);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("Shot.PNG"), b"a").unwrap();
        touch(&store, CURRENT_DIR, "home", b"b");

        let ids: Vec<String> = store.list_current_ids().into_iter().collect();
        assert_eq!(ids, vec!["home"]);
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_directory_loop_is_not_followed() {
        let tmp = tempfile::tempdir().unwrap();
        let store = Store::new(tmp.path());
        touch(&store, CURRENT_DIR, "nested/page", b"a");
        let nested = tmp.path().join(CURRENT_DIR).join("nested");
        std::os::unix::fs::symlink(&nested, nested.join("again")).unwrap();

        let ids: Vec<String> = store.list_current_ids().into_iter().collect();
        assert_eq!(ids, vec!["nested/page"]);
    }

    #[test]
    fn missing_reference_is_none() {
        let tmp = tempfile::tempdir().unwrap();
        let store = Store::new(tmp.path());
        assert!(store.read_reference("nope").unwrap().is_none());
    }

    #[test]
    fn write_reference_clears_difference() {
        let tmp = tempfile::tempdir().unwrap();
        let store = Store::new(tmp.path());
        store.write_difference("a/b", b"diff").unwrap();
        assert!(store.has_difference("a/b"));

        store.write_reference("a/b", b"png").unwrap();
        assert!(!store.has_difference("a/b"));
        assert_eq!(store.read_reference("a/b").unwrap().unwrap(), b"png");
    }

    #[test]
    fn clear_differences_removes_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let store = Store::new(tmp.path());
        store.write_difference("x", b"1").unwrap();
        store.write_difference("y/z", b"2").unwrap();
        store.clear_differences();
        assert!(!store.has_difference("x"));
        assert!(!store.has_difference("y/z"));
        // Idempotent on a missing directory.
        store.clear_differences();
    }

    #[test]
    fn filter_normalizes_case_underscores_and_suffix() {
        assert!(matches_filter("checkout/Button_Hover", "button hover"));
        assert!(matches_filter("checkout/button hover", "BUTTON_HOVER"));
        assert!(matches_filter("checkout/button_hover", "button_hover.png"));
        assert!(!matches_filter("checkout/button_hover", "footer"));
    }
}
