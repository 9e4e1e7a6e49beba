//! Main update function - handles state transitions (TEA pattern)

use crate::message::Message;
use crate::state::AppState;
use tracing::trace;

use super::{pager, upgrade, UpdateResult};

/// Process a message and update state
/// Returns optional follow-up message and/or action
pub fn update(state: &mut AppState, message: Message) -> UpdateResult {
    if state.should_close() {
        trace!("Dialog closed, dropping {:?}", message);
        return UpdateResult::none();
    }

    match message {
        // ─────────────────────────────────────────────────────────
        // Pager Messages
        // ─────────────────────────────────────────────────────────
        Message::Initialize {
            app_id,
            preselected_version_id,
        } => pager::handle_initialize(state, app_id, preselected_version_id),
        Message::SearchInput { term } => pager::handle_search_input(state, term),
        Message::SearchDebounceElapsed { generation } => {
            pager::handle_search_debounce_elapsed(state, generation)
        }
        Message::LoadMore => pager::handle_load_more(state),
        Message::PageLoaded { tag, page } => pager::handle_page_loaded(state, tag, page),
        Message::PageLoadFailed { tag, error } => pager::handle_page_load_failed(state, tag, error),
        Message::SelectVersion { version_id } => pager::handle_select_version(state, version_id),

        // ─────────────────────────────────────────────────────────
        // Values Messages
        // ─────────────────────────────────────────────────────────
        Message::ValueLoaded { version_id, value } => {
            upgrade::handle_value_loaded(state, version_id, value)
        }
        Message::ValueLoadFailed { version_id, error } => {
            upgrade::handle_value_load_failed(state, version_id, error)
        }
        Message::EditValues { text } => {
            state.values.draft = Some(text);
            UpdateResult::none()
        }
        Message::EditorValidity { has_error } => {
            state.values.editor_has_error = has_error;
            UpdateResult::none()
        }

        // ─────────────────────────────────────────────────────────
        // Upgrade Messages
        // ─────────────────────────────────────────────────────────
        Message::Submit => upgrade::handle_submit(state),
        Message::UpgradeApplied => upgrade::handle_upgrade_applied(state),
        Message::UpgradeRejected { message } => upgrade::handle_upgrade_rejected(state, message),
        Message::UpgradeFailed { error } => upgrade::handle_upgrade_failed(state, error),
        Message::Close => upgrade::handle_close(state),
    }
}
