pub mod diff;
pub mod runner;

pub use self::runner::{CheckOutcome, check_all};

/// Status of a single snapshot check.
pub enum SnapshotStatus {
    Pass,
    Fail {
        diff_pixels: u64,
        percent: f64,
    },
    /// Sizes differ, so no pixel comparison was made.
    Resized {
        reference: (u32, u32),
        current: (u32, u32),
    },
    New,
    Error(String),
}

impl SnapshotStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Fail { .. } | Self::Resized { .. } => "fail",
            Self::New => "new",
            Self::Error(_) => "error",
        }
    }
}
