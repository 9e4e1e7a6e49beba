//! Values and upgrade submission handlers

use crate::services::Notice;
use crate::state::{AppState, CloseReason};
use tracing::{debug, info, warn};
use verpager_core::{VersionId, VersionValue};

use super::{UpdateAction, UpdateResult};

pub fn handle_value_loaded(
    state: &mut AppState,
    version_id: VersionId,
    value: VersionValue,
) -> UpdateResult {
    if state.values.requested_for.as_ref() != Some(&version_id) {
        debug!("Discarding values of {} (selection moved on)", version_id);
        return UpdateResult::none();
    }
    state.values.loaded = Some(value);
    state.values.loading = false;
    UpdateResult::none()
}

pub fn handle_value_load_failed(
    state: &mut AppState,
    version_id: VersionId,
    error: String,
) -> UpdateResult {
    if state.values.requested_for.as_ref() != Some(&version_id) {
        return UpdateResult::none();
    }
    warn!("Failed to load values of {}: {}", version_id, error);
    state.values.loading = false;
    UpdateResult::action(UpdateAction::Notify(Notice::prompt(error)))
}

pub fn handle_submit(state: &mut AppState) -> UpdateResult {
    if state.submitting {
        debug!("Submit ignored, upgrade already in flight");
        return UpdateResult::none();
    }
    if state.values.editor_has_error {
        debug!("Submit refused, values editor reports an error");
        return UpdateResult::none();
    }

    let Some(request) = state.upgrade_request() else {
        warn!("Submit with no version available");
        return UpdateResult::action(UpdateAction::Notify(Notice::prompt(
            "No version available to upgrade to",
        )));
    };

    info!(
        "Submitting upgrade of instance {} to {}",
        request.app_instance_id, request.app_version_id
    );
    state.submitting = true;
    UpdateResult::action(UpdateAction::SubmitUpgrade { request })
}

pub fn handle_upgrade_applied(state: &mut AppState) -> UpdateResult {
    info!("Upgrade applied");
    state.submitting = false;
    state.closed = Some(CloseReason::Upgraded);
    UpdateResult::none()
}

pub fn handle_upgrade_rejected(state: &mut AppState, message: String) -> UpdateResult {
    warn!("Upgrade rejected: {}", message);
    state.submitting = false;
    UpdateResult::action(UpdateAction::Notify(Notice::prompt(message)))
}

pub fn handle_upgrade_failed(state: &mut AppState, error: String) -> UpdateResult {
    warn!("Upgrade failed: {}", error);
    state.submitting = false;
    state.closed = Some(CloseReason::UpgradeFailed);
    UpdateResult::action(UpdateAction::Notify(Notice::prompt(error)))
}

pub fn handle_close(state: &mut AppState) -> UpdateResult {
    state.closed = Some(CloseReason::Cancelled);
    UpdateResult::none()
}
