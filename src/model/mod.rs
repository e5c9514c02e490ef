//! Data models for an import run.
//!
//! - [`ImportSession`] - one run of the driver over one root directory
//! - [`ImportUnit`] - one file-to-key write

pub mod session;
pub mod unit;

pub use session::ImportSession;
pub use unit::ImportUnit;
