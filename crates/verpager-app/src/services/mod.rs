//! Capabilities the pager depends on
//!
//! - `store`: the remote version store (paged queries, values, upgrades)
//! - `notifier`: toast/prompt collaborator
//! - `fixture`: JSON-catalog backed store for the headless driver and tests

pub mod fixture;
pub mod notifier;
pub mod store;

pub use fixture::{Catalog, FixtureStore};
pub use notifier::{Notice, NoticeLevel, Notifier, RecordingNotifier};
pub use store::{LocalVersionStore, VersionStore};
