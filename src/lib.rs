//! Version Pager Library
//!
//! Headless front end for the upgrade dialog's paginated version picker.
//! State and orchestration live in `verpager-app`; this crate wires them to
//! stdin commands and NDJSON output.

pub mod headless;

// Re-export main entry points
pub use headless::{run_headless, HeadlessArgs};
