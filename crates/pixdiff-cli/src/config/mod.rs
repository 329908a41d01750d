pub mod resolve;
pub mod template;

use std::num::NonZeroU8;
use std::path::Path;

use anyhow::{Context, Result, bail};
use image::Rgba;
use pixdiff::{Neutral, Palette};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use self::resolve::{CliOverrides, ResolvedRunConfig, store_root};
pub use self::template::{config_file_exists, write_gitignore, write_template};

pub(crate) const DEFAULT_DIR: &str = ".pixdiff";
pub(crate) const CONFIG_FILE: &str = "config.toml";

const DEFAULT_PARALLEL: usize = 4;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NeutralKind {
    #[default]
    Dim,
    Fixed,
}

/// `[diff]`: how the diff image marks matching and mismatched pixels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiffConfig {
    #[serde(default = "default_highlight")]
    pub highlight: [u8; 4],
    #[serde(default)]
    pub neutral: NeutralKind,
    /// RGB divisor for `neutral = "dim"`.
    #[serde(default = "default_dim_factor")]
    pub dim_factor: u8,
    /// Placeholder for `neutral = "fixed"`.
    #[serde(default = "default_neutral_color")]
    pub neutral_color: [u8; 4],
}

fn default_highlight() -> [u8; 4] {
    [255, 0, 0, 255]
}

fn default_dim_factor() -> u8 {
    4
}

fn default_neutral_color() -> [u8; 4] {
    [255, 255, 255, 255]
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            highlight: default_highlight(),
            neutral: NeutralKind::default(),
            dim_factor: default_dim_factor(),
            neutral_color: default_neutral_color(),
        }
    }
}

impl DiffConfig {
    /// Build the palette, rejecting ones where matches could look like mismatches.
    pub fn palette(&self) -> Result<Palette> {
        let neutral = match self.neutral {
            NeutralKind::Dim => {
                let factor = NonZeroU8::new(self.dim_factor)
                    .context("diff.dim_factor must be at least 1")?;
                Neutral::Dim(factor)
            }
            NeutralKind::Fixed => Neutral::Fixed(Rgba(self.neutral_color)),
        };
        let palette = Palette {
            highlight: Rgba(self.highlight),
            neutral,
        };
        if !palette.is_distinguishable() {
            bail!(
                "diff.highlight {:?} can be confused with matching pixels. \
                 Pick a brighter highlight, a dim_factor of 2 or more, \
                 or a neutral_color different from the highlight",
                self.highlight,
            );
        }
        Ok(palette)
    }
}

/// `[check]`: batch run settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckConfig {
    /// Number of pairs compared concurrently.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parallel: Option<usize>,
}

impl CheckConfig {
    pub fn parallel(&self) -> usize {
        self.parallel.unwrap_or(DEFAULT_PARALLEL)
    }
}

pub fn validate_parallel(v: usize) -> Result<usize, String> {
    if v == 0 {
        return Err("parallel must be at least 1".to_string());
    }
    Ok(v)
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub diff: DiffConfig,
    #[serde(default)]
    pub check: CheckConfig,
}

impl Config {
    fn validate(&self) -> Result<()> {
        self.diff.palette()?;
        if let Some(p) = self.check.parallel {
            validate_parallel(p).map_err(|e| anyhow::anyhow!("check.{e}"))?;
        }
        Ok(())
    }
}

/// Load `<dir>/config.toml`. A missing file yields the defaults.
pub fn load(dir: &Path) -> Result<Config> {
    let path = dir.join(CONFIG_FILE);
    if !path.exists() {
        debug!(path = %path.display(), "no config file, using defaults");
        return Ok(Config::default());
    }
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let config: Config =
        toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("Invalid {}", path.display()))?;
    Ok(config)
}
