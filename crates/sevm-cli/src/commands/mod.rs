//! Command implementations

pub mod fixtures;
pub mod run;
