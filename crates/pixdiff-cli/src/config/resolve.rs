use std::path::PathBuf;

use anyhow::{Context, Result};
use pixdiff::Palette;

use super::{DEFAULT_DIR, load, validate_parallel};

/// Values extracted from the CLI that participate in the merge.
#[derive(Default)]
pub struct CliOverrides {
    pub dir: Option<PathBuf>,
    pub parallel: Option<usize>,
}

/// Fully resolved config after CLI > env > file > defaults merge.
pub struct ResolvedRunConfig {
    /// Snapshot store root; also holds `config.toml`.
    pub root: PathBuf,
    pub palette: Palette,
    pub parallel: usize,
}

/// Store root: CLI > `PIXDIFF_DIR` > `.pixdiff`.
pub fn store_root(dir: Option<PathBuf>) -> PathBuf {
    root_from(dir, |key| std::env::var(key).ok())
}

fn root_from(dir: Option<PathBuf>, env: impl Fn(&str) -> Option<String>) -> PathBuf {
    dir.or_else(|| env("PIXDIFF_DIR").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DIR))
}

impl ResolvedRunConfig {
    pub fn new(cli: CliOverrides) -> Result<Self> {
        Self::resolve(cli, |key| std::env::var(key).ok())
    }

    fn resolve(cli: CliOverrides, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        // 1. Store root decides where the config file lives
        let root = root_from(cli.dir, &env);

        // 2. File layer
        let file_config = load(&root)?;

        // 3. Env layer
        let env_parallel: Option<usize> = env("PIXDIFF_PARALLEL")
            .map(|v| v.parse::<usize>())
            .transpose()
            .context("PIXDIFF_PARALLEL must be a positive integer")?;

        // 4. CLI > env > file
        let parallel = cli
            .parallel
            .or(env_parallel)
            .unwrap_or_else(|| file_config.check.parallel());
        validate_parallel(parallel).map_err(|e| anyhow::anyhow!("{e}"))?;

        Ok(Self {
            root,
            palette: file_config.diff.palette()?,
            parallel,
        })
    }
}
