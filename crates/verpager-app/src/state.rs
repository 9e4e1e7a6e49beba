//! Application state (Model in TEA pattern)
//!
//! One `AppState` lives for as long as the upgrade dialog is open. The
//! version list itself is [`PagerState`]; everything else here hangs off the
//! selected version.

use std::time::Duration;

use serde::Serialize;

use crate::config::PagerSettings;
use crate::pager::PagerState;
use verpager_core::{InstanceContext, UpgradeKind, UpgradeRequest, VersionId, VersionValue};

/// Why the dialog closed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CloseReason {
    /// Upgrade accepted by the store
    Upgraded,
    /// Upgrade transport failure; the caller should refresh the instance view
    UpgradeFailed,
    /// Closed without submitting
    Cancelled,
}

/// Values bound to the selected version plus the local draft
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValuesState {
    /// Version whose values were requested last
    pub requested_for: Option<VersionId>,
    pub loaded: Option<VersionValue>,
    pub loading: bool,
    /// Locally edited document, cleared on every selection change
    pub draft: Option<String>,
    /// Editor reported a syntax error; submission is refused while set
    pub editor_has_error: bool,
}

impl ValuesState {
    /// Document that would be submitted: draft, else loaded yaml, else empty
    pub fn effective_document(&self) -> String {
        self.draft
            .clone()
            .filter(|d| !d.is_empty())
            .or_else(|| self.loaded.as_ref().map(|v| v.yaml.clone()))
            .unwrap_or_default()
    }
}

/// Complete dialog state
#[derive(Debug, Clone)]
pub struct AppState {
    pub context: InstanceContext,
    pub pager: PagerState,
    pub values: ValuesState,
    pub submitting: bool,
    pub closed: Option<CloseReason>,
    pub page_size: u32,
    pub debounce: Duration,
}

impl AppState {
    pub fn new(context: InstanceContext, settings: &PagerSettings) -> Self {
        Self {
            context,
            pager: PagerState::new(context.app_id),
            values: ValuesState::default(),
            submitting: false,
            closed: None,
            page_size: settings.effective_page_size(),
            debounce: settings.debounce(),
        }
    }

    pub fn should_close(&self) -> bool {
        self.closed.is_some()
    }

    /// True while a search is queued or any store call is outstanding
    pub fn is_busy(&self) -> bool {
        self.pager.debounce.is_pending()
            || self.pager.is_loading()
            || self.values.loading
            || self.submitting
    }

    /// Build the upgrade payload, or `None` when no version is available
    pub fn upgrade_request(&self) -> Option<UpgradeRequest> {
        let version_id = self.pager.effective_version_id()?.clone();
        Some(UpgradeRequest {
            app_instance_id: self.context.app_instance_id,
            environment_id: self.context.environment_id,
            app_id: self.context.app_id,
            app_version_id: version_id,
            values: self.values.effective_document(),
            value_id: self.values.loaded.as_ref().and_then(|v| v.id.clone()),
            kind: UpgradeKind::Update,
        })
    }
}
