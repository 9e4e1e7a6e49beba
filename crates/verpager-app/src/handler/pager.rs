//! Pager message handlers: initialize, search, load more, select

use crate::pager::RequestTag;
use crate::services::Notice;
use crate::state::AppState;
use tracing::{debug, info, trace, warn};
use verpager_core::{AppId, PageResult, VersionId};

use super::{UpdateAction, UpdateResult};

fn fetch(state: &AppState, tag: RequestTag) -> UpdateResult {
    let query = state
        .pager
        .query_for(&tag, state.context.project_id, state.page_size);
    debug!(
        "Requesting page {} ({:?}, {}) term={:?}",
        tag.page, tag.kind, tag.session, query.search_term
    );
    UpdateResult::action(UpdateAction::FetchPage { tag, query })
}

/// Select `version_id` and request its values; clears any local draft
pub(crate) fn start_value_load(state: &mut AppState, version_id: VersionId) -> UpdateResult {
    state.values.requested_for = Some(version_id.clone());
    state.values.loaded = None;
    state.values.draft = None;
    state.values.loading = true;

    UpdateResult::action(UpdateAction::LoadValue {
        context: state.context,
        version_id,
    })
}

pub fn handle_initialize(
    state: &mut AppState,
    app_id: AppId,
    preselected_version_id: Option<VersionId>,
) -> UpdateResult {
    info!(
        "Initializing version pager for app {} (preselected: {:?})",
        app_id, preselected_version_id
    );
    state.context.app_id = app_id;
    state.values = Default::default();

    let tag = state.pager.begin_initialize(app_id, preselected_version_id);
    fetch(state, tag)
}

pub fn handle_search_input(state: &mut AppState, term: String) -> UpdateResult {
    let generation = state.pager.debounce.schedule(term);
    trace!("Search input queued (generation {})", generation);
    UpdateResult::action(UpdateAction::ScheduleSearch {
        generation,
        delay: state.debounce,
    })
}

pub fn handle_search_debounce_elapsed(state: &mut AppState, generation: u64) -> UpdateResult {
    let Some(term) = state.pager.debounce.take_if_current(generation) else {
        trace!("Ignoring superseded search timer (generation {})", generation);
        return UpdateResult::none();
    };

    let tag = state.pager.begin_search(term);
    fetch(state, tag)
}

pub fn handle_load_more(state: &mut AppState) -> UpdateResult {
    match state.pager.begin_load_more() {
        Some(tag) => fetch(state, tag),
        None => {
            debug!(
                "Load more ignored (phase {:?}, has_next_page {})",
                state.pager.phase, state.pager.has_next_page
            );
            UpdateResult::none()
        }
    }
}

pub fn handle_page_loaded(state: &mut AppState, tag: RequestTag, page: PageResult) -> UpdateResult {
    if !state.pager.accepts(&tag) {
        debug!(
            "Discarding stale page {} from {} (current {})",
            tag.page, tag.session, state.pager.session
        );
        return UpdateResult::none();
    }

    if tag.kind.is_first_page() {
        let count = page.items.len();
        let applied = state.pager.apply_first_page(&tag, page);
        debug!(
            "First page applied: {} item(s), has_next_page={}",
            count, state.pager.has_next_page
        );
        match applied.selected {
            Some(version_id) => start_value_load(state, version_id),
            None => UpdateResult::none(),
        }
    } else {
        let added = state.pager.apply_next_page(page);
        debug!(
            "Page {} appended {} version(s), has_next_page={}",
            tag.page, added, state.pager.has_next_page
        );
        UpdateResult::none()
    }
}

pub fn handle_page_load_failed(state: &mut AppState, tag: RequestTag, error: String) -> UpdateResult {
    if !state.pager.accepts(&tag) {
        debug!("Discarding stale failure for page {} from {}", tag.page, tag.session);
        return UpdateResult::none();
    }

    if tag.kind.is_first_page() {
        warn!("Failed to load versions: {}", error);
        state.pager.fail_first_page(error);
        UpdateResult::none()
    } else {
        warn!("Failed to load page {}: {}", tag.page, error);
        state.pager.fail_next_page();
        UpdateResult::action(UpdateAction::Notify(Notice::transient(format!(
            "Failed to load more versions: {}",
            error
        ))))
    }
}

pub fn handle_select_version(state: &mut AppState, version_id: VersionId) -> UpdateResult {
    if !state.pager.select(&version_id) {
        warn!("Ignoring selection of unknown version {}", version_id);
        return UpdateResult::none();
    }
    start_value_load(state, version_id)
}
