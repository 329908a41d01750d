use std::path::Path;

use anyhow::{Context, Result};

use super::CONFIG_FILE;

/// Hand-crafted config template with commented-out keys.
/// Used by `pixdiff init` instead of `toml::to_string_pretty()` so that
/// users can see the available knobs and their defaults.
const CONFIG_TEMPLATE: &str = r#"# ─────────────────────────────────────────────────────────
# Diff image — all fields optional.
# Matching is always exact; these only change how the diff looks.
# ─────────────────────────────────────────────────────────
[diff]
# highlight = [255, 0, 0, 255]      # RGBA for mismatched pixels
# neutral = "dim"                   # "dim" | "fixed"
# dim_factor = 4                    # matching pixels: RGB / dim_factor
# neutral_color = [255, 255, 255, 255]  # matching pixels when neutral = "fixed"

# ─────────────────────────────────────────────────────────
# Batch check — all fields optional.
# ─────────────────────────────────────────────────────────
[check]
# parallel = 4                      # pairs compared concurrently
"#;

pub fn config_file_exists(dir: &Path) -> bool {
    dir.join(CONFIG_FILE).exists()
}

pub fn write_gitignore(dir: &Path, force: bool) -> Result<()> {
    let path = dir.join(".gitignore");
    if !force && path.exists() {
        return Ok(());
    }
    std::fs::write(&path, "current/\ndifference/\n")
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Write the hand-crafted config template (with commented-out keys).
pub fn write_template(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;
    let path = dir.join(CONFIG_FILE);
    std::fs::write(&path, CONFIG_TEMPLATE)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, load};

    #[test]
    fn template_parses_to_defaults() {
        let config: Config = toml::from_str(CONFIG_TEMPLATE).unwrap();
        assert_eq!(config.diff.palette().unwrap(), pixdiff::Palette::default());
        assert!(config.check.parallel.is_none());
    }

    #[test]
    fn written_template_round_trips_through_load() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join(".pixdiff");
        assert!(!config_file_exists(&dir));
        write_template(&dir).unwrap();
        assert!(config_file_exists(&dir));
        load(&dir).unwrap();
    }

    #[test]
    fn gitignore_kept_unless_forced() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join(".gitignore");
        std::fs::write(&path, "custom\n").unwrap();

        write_gitignore(tmp.path(), false).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "custom\n");

        write_gitignore(tmp.path(), true).unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "current/\ndifference/\n"
        );
    }
}
