//! Command implementations for OxiForm CLI.

pub mod run;
pub mod stats;

pub use run::{Direction, cmd_run};
pub use stats::cmd_stats;
