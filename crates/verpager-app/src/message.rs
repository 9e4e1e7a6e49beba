//! Message types for the application (TEA pattern)

use crate::pager::RequestTag;
use verpager_core::{AppId, PageResult, VersionId, VersionValue};

/// All possible messages/actions in the application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // ─────────────────────────────────────────────────────────
    // Pager Messages
    // ─────────────────────────────────────────────────────────
    /// Dialog mounted: load the first page for `app_id`
    Initialize {
        app_id: AppId,
        preselected_version_id: Option<VersionId>,
    },

    /// Search box changed (debounced before anything is sent)
    SearchInput { term: String },

    /// Debounce timer for `generation` ran out
    SearchDebounceElapsed { generation: u64 },

    /// "Load more" affordance activated
    LoadMore,

    /// A page request completed
    PageLoaded { tag: RequestTag, page: PageResult },

    /// A page request failed
    PageLoadFailed { tag: RequestTag, error: String },

    /// User picked a version
    SelectVersion { version_id: VersionId },

    // ─────────────────────────────────────────────────────────
    // Values Messages
    // ─────────────────────────────────────────────────────────
    /// Values for a version arrived
    ValueLoaded {
        version_id: VersionId,
        value: VersionValue,
    },

    /// Values for a version could not be loaded
    ValueLoadFailed { version_id: VersionId, error: String },

    /// Values editor content changed
    EditValues { text: String },

    /// Values editor validity changed
    EditorValidity { has_error: bool },

    // ─────────────────────────────────────────────────────────
    // Upgrade Messages
    // ─────────────────────────────────────────────────────────
    /// OK pressed
    Submit,

    /// Store accepted the upgrade
    UpgradeApplied,

    /// Store answered with a failure payload
    UpgradeRejected { message: String },

    /// Upgrade request did not reach the store
    UpgradeFailed { error: String },

    /// Dialog dismissed
    Close,
}
