//! verpager-app - Application state and orchestration for the version pager
//!
//! This crate implements the TEA (The Elm Architecture) pattern for the
//! upgrade dialog: the paginated version list, values loading and upgrade
//! submission. Side effects are returned from `update()` as actions and run
//! by the `Engine` against an injected version store.

pub mod actions;
pub mod config;
pub mod engine;
pub mod handler;
pub mod message;
pub mod pager;
pub mod process;
pub mod services;
pub mod state;

// Re-export primary types
pub use engine::Engine;
pub use handler::{UpdateAction, UpdateResult};
pub use message::Message;
pub use pager::{PagerPhase, PagerState, VersionOption};
pub use state::{AppState, CloseReason};
