//! # sevm-evm-tests
//!
//! JSON conformance fixtures for the sevm interpreter.
//!
//! This crate provides:
//! - JSON parsing for the fixture format
//! - A fixture runner comparing outcomes against expectations
//! - Result aggregation across files and directories
//!
//! ## Fixture Format
//!
//! A fixture file maps case names to cases:
//!
//! ```json
//! {
//!   "add": {
//!     "code": "6003600401",
//!     "calldata": "",
//!     "stack": "7",
//!     "memory": "",
//!     "return_value": "",
//!     "halt": "stopped"
//!   }
//! }
//! ```
//!
//! `stack` lists decimal words bottom-to-top, separated by commas. `env`
//! overrides environment fields and `skip` names a reason to skip the case.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod fixture;
mod runner;
mod types;

pub use error::{TestError, TestResult};
pub use fixture::{FixtureResults, FixtureRunner};
pub use runner::{TestRunner, TestStats};
pub use types::*;

/// Directory holding the bundled fixture files
pub fn bundled_fixtures_dir() -> std::path::PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures")
}
