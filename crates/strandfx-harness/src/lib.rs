#![forbid(unsafe_code)]

//! Headless driver for the strandfx backdrops.
//!
//! Runs an effect against a deterministic host and a recording surface,
//! then reports per-frame draw statistics (optionally as JSONL) and a
//! teardown check: no listener left attached, no draw after unmount.

pub mod cli;
pub mod error;
pub mod logging;
pub mod run;

pub use cli::run_from_env;
pub use error::{HarnessError, Result};
