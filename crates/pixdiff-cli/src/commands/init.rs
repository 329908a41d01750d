use std::path::Path;

use anyhow::{Result, bail};

use crate::config;

/// `pixdiff init` — create `<dir>/config.toml` and `<dir>/.gitignore`.
pub fn init(dir: &Path, force: bool) -> Result<()> {
    if !force && config::config_file_exists(dir) {
        bail!(
            "{} already exists (use --force to overwrite)",
            dir.join(config::CONFIG_FILE).display()
        );
    }

    config::write_template(dir)?;
    config::write_gitignore(dir, force)?;

    let verb = if force { "Regenerated" } else { "Created" };
    println!("{verb} {}", dir.join(config::CONFIG_FILE).display());
    Ok(())
}
