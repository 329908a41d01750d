mod approve;
mod check;
mod diff;
mod init;

pub use self::approve::approve;
pub use self::check::check;
pub use self::diff::diff;
pub use self::init::init;
