//! # verpager-core - Core Domain Types
//!
//! Foundation crate for the version pager. Provides domain types, error
//! handling and logging setup.
//!
//! This crate has **zero internal dependencies** -- it only depends on external
//! crates (serde, thiserror, toml, tracing).
//!
//! ## Public API
//!
//! ### Domain Types (`types`)
//! - [`VersionRecord`] - A deployable version, identified by [`VersionId`]
//! - [`VersionQuery`] - One paged, searchable request to the version store
//! - [`PageResult`] - A page of records plus the `has_next_page` flag
//! - [`InstanceContext`] - The application instance being upgraded
//! - [`VersionValue`], [`UpgradeRequest`], [`UpgradeOutcome`] - Upgrade payloads
//!
//! ### Error Handling (`error`)
//! - [`Error`] - Custom error enum with `fatal` vs `recoverable` classification
//! - [`Result`] - Type alias for `std::result::Result<T, Error>`
//! - [`ResultExt`] - Extension trait for adding error context
//!
//! ## Prelude
//!
//! Import commonly used types with:
//! ```rust
//! use verpager_core::prelude::*;
//! ```

pub mod error;
pub mod logging;
pub mod prelude;
pub mod types;

pub use error::{Error, Result, ResultExt};
pub use types::{
    AppId, AppInstanceId, EnvironmentId, InstanceContext, PageResult, ProjectId, UpgradeKind,
    UpgradeOutcome, UpgradeRequest, VersionId, VersionQuery, VersionRecord, VersionValue,
    FIRST_PAGE,
};
