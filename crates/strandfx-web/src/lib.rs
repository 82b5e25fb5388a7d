#![forbid(unsafe_code)]

//! Browser bindings for the strandfx canvas backdrops.
//!
//! On `wasm32` this crate exports `FloatingLinesBackground`,
//! `HyperSpeedBackground` and `SubmissionDesk` to JavaScript. Each backdrop
//! handle owns one canvas, its listeners and a single animation-frame
//! callback; `unmount()` (or dropping the handle) removes all of them.
//!
//! Option parsing is platform-independent and lives in [`options`].

pub mod options;

#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::{FloatingLinesBackground, HyperSpeedBackground, WebSubmissionDesk};
