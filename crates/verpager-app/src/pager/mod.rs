//! Version pager state
//!
//! Accumulates pages of versions for one search session at a time. All
//! mutation goes through the methods here, called from the TEA handlers in
//! [`crate::handler`]; responses are matched against the single in-flight
//! [`RequestTag`] so a page from a superseded session is never applied.

pub mod options;

use std::collections::HashSet;

use serde::Serialize;
use verpager_core::{
    AppId, PageResult, ProjectId, VersionId, VersionQuery, VersionRecord, FIRST_PAGE,
};

pub use options::{OptionList, VersionOption};

/// Lifecycle phase of the pager
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PagerPhase {
    #[default]
    Idle,
    /// First page of a session in flight
    Loading,
    Loaded,
    /// A follow-up page in flight
    LoadingMore,
    /// The first page of the session failed; left by the next search or load more
    Error,
}

/// One contiguous search context. Bumped whenever the term changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SearchSession(u64);

impl SearchSession {
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl std::fmt::Display for SearchSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "session-{}", self.0)
    }
}

/// Why a page was requested
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    /// First page after the dialog opened; resolves the preselected version
    Initial,
    /// First page of a new search term
    Search,
    /// A follow-up page appended to the current session
    NextPage,
}

impl RequestKind {
    pub fn is_first_page(self) -> bool {
        !matches!(self, RequestKind::NextPage)
    }
}

/// Attached to every page request and echoed back with its response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTag {
    pub session: SearchSession,
    pub kind: RequestKind,
    pub page: u32,
}

/// Single-slot debounce bookkeeping for search input
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchDebounce {
    generation: u64,
    pending_term: Option<String>,
}

impl SearchDebounce {
    /// Replace any pending term. Returns the generation the timer must echo.
    pub fn schedule(&mut self, term: String) -> u64 {
        self.generation += 1;
        self.pending_term = Some(term);
        self.generation
    }

    /// Take the pending term if `generation` is still the latest one
    pub fn take_if_current(&mut self, generation: u64) -> Option<String> {
        if generation == self.generation {
            self.pending_term.take()
        } else {
            None
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending_term.is_some()
    }
}

/// Outcome of applying a first page
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FirstPageApplied {
    /// Version selected as a consequence of this page, if any
    pub selected: Option<VersionId>,
}

/// Paginated, searchable version list for one application
#[derive(Debug, Clone)]
pub struct PagerState {
    pub app_id: AppId,

    /// Accumulated versions, in arrival order
    pub versions: Vec<VersionRecord>,

    /// What the rendering layer shows
    pub options: OptionList,

    /// Next page a load-more request will ask for
    pub current_page: u32,

    pub search_term: String,

    pub phase: PagerPhase,

    pub has_next_page: bool,

    pub selected_version_id: Option<VersionId>,

    /// Preselection waiting for the initial page
    pub preselected_version_id: Option<VersionId>,

    pub session: SearchSession,

    /// Request whose response will be applied; everything else is stale
    pub in_flight: Option<RequestTag>,

    pub debounce: SearchDebounce,

    /// Set once an initial page has been applied
    pub initialized: bool,

    pub last_error: Option<String>,
}

impl PagerState {
    pub fn new(app_id: AppId) -> Self {
        Self {
            app_id,
            versions: Vec::new(),
            options: OptionList::new(),
            current_page: FIRST_PAGE,
            search_term: String::new(),
            phase: PagerPhase::Idle,
            has_next_page: false,
            selected_version_id: None,
            preselected_version_id: None,
            session: SearchSession::default(),
            in_flight: None,
            debounce: SearchDebounce::default(),
            initialized: false,
            last_error: None,
        }
    }

    /// True while any page request is outstanding
    pub fn is_loading(&self) -> bool {
        matches!(self.phase, PagerPhase::Loading | PagerPhase::LoadingMore)
    }

    pub fn contains(&self, id: &VersionId) -> bool {
        self.versions.iter().any(|r| &r.id == id)
    }

    pub fn selected_record(&self) -> Option<&VersionRecord> {
        let id = self.selected_version_id.as_ref()?;
        self.versions.iter().find(|r| &r.id == id)
    }

    /// Selected version, else the first accumulated one
    pub fn effective_version_id(&self) -> Option<&VersionId> {
        self.selected_version_id
            .as_ref()
            .or_else(|| self.versions.first().map(|r| &r.id))
    }

    /// Whether a response carrying `tag` may still be applied
    pub fn accepts(&self, tag: &RequestTag) -> bool {
        self.in_flight.as_ref() == Some(tag)
    }

    /// Whether load more would issue a request right now
    pub fn can_load_more(&self) -> bool {
        match self.phase {
            PagerPhase::Loaded => self.has_next_page,
            PagerPhase::Error => true,
            PagerPhase::Idle | PagerPhase::Loading | PagerPhase::LoadingMore => false,
        }
    }

    /// Build the query for `tag` against this pager's current term
    pub fn query_for(&self, tag: &RequestTag, project_id: ProjectId, page_size: u32) -> VersionQuery {
        let include_version = match tag.kind {
            RequestKind::Initial => self.preselected_version_id.clone(),
            RequestKind::Search | RequestKind::NextPage => None,
        };
        VersionQuery {
            project_id,
            app_id: self.app_id,
            page: tag.page,
            search_term: self.search_term.clone(),
            include_version,
            page_size,
        }
    }

    // ─────────────────────────────────────────────────────────
    // Transitions
    // ─────────────────────────────────────────────────────────

    /// Start over for `app_id` and request the first unfiltered page
    pub fn begin_initialize(
        &mut self,
        app_id: AppId,
        preselected: Option<VersionId>,
    ) -> RequestTag {
        let session = self.session.next();
        *self = Self::new(app_id);
        self.session = session;
        self.preselected_version_id = preselected;
        self.start_first_page(RequestKind::Initial)
    }

    /// Commit a new search term and request its first page.
    ///
    /// The list is reset; the selected record (if any) stays pinned so the
    /// current selection keeps rendering while the new page loads.
    pub fn begin_search(&mut self, term: String) -> RequestTag {
        self.search_term = term;
        self.session = self.session.next();

        let pinned: Vec<VersionRecord> = self.selected_record().cloned().into_iter().collect();
        self.versions = pinned;
        self.options.replace(&self.versions, false);
        self.has_next_page = false;

        let kind = if self.initialized {
            RequestKind::Search
        } else {
            RequestKind::Initial
        };
        let tag = self.start_first_page(kind);
        self.current_page = FIRST_PAGE + 1;
        tag
    }

    /// Request the next page; `None` when the guard rejects the call.
    ///
    /// From the error phase this re-issues the first page of the session.
    pub fn begin_load_more(&mut self) -> Option<RequestTag> {
        if !self.can_load_more() {
            return None;
        }

        if self.phase == PagerPhase::Error {
            let kind = if self.initialized {
                RequestKind::Search
            } else {
                RequestKind::Initial
            };
            return Some(self.start_first_page(kind));
        }

        let tag = RequestTag {
            session: self.session,
            kind: RequestKind::NextPage,
            page: self.current_page,
        };
        self.phase = PagerPhase::LoadingMore;
        self.in_flight = Some(tag);
        Some(tag)
    }

    fn start_first_page(&mut self, kind: RequestKind) -> RequestTag {
        let tag = RequestTag {
            session: self.session,
            kind,
            page: FIRST_PAGE,
        };
        self.phase = PagerPhase::Loading;
        self.in_flight = Some(tag);
        self.last_error = None;
        tag
    }

    /// Apply a successful first page, replacing the list
    pub fn apply_first_page(&mut self, tag: &RequestTag, page: PageResult) -> FirstPageApplied {
        let mut seen = HashSet::new();
        let mut versions = Vec::with_capacity(page.items.len() + 1);

        if let Some(pinned) = self.selected_record() {
            if !page.contains(&pinned.id) {
                seen.insert(pinned.id.clone());
                versions.push(pinned.clone());
            }
        }
        for record in page.items {
            if seen.insert(record.id.clone()) {
                versions.push(record);
            }
        }

        self.versions = versions;
        self.has_next_page = page.has_next_page;
        self.options.replace(&self.versions, self.has_next_page);
        self.current_page = FIRST_PAGE + 1;
        self.phase = PagerPhase::Loaded;
        self.in_flight = None;

        let mut applied = FirstPageApplied::default();
        if tag.kind == RequestKind::Initial {
            self.initialized = true;
            let preselected = self.preselected_version_id.take();
            let choice = preselected
                .filter(|id| self.contains(id))
                .or_else(|| self.versions.first().map(|r| r.id.clone()));
            if let Some(id) = choice {
                self.selected_version_id = Some(id.clone());
                applied.selected = Some(id);
            }
        }
        applied
    }

    /// Apply a successful follow-up page. Returns how many records were added.
    pub fn apply_next_page(&mut self, page: PageResult) -> usize {
        let mut seen: HashSet<VersionId> = self.versions.iter().map(|r| r.id.clone()).collect();
        let selected = self.selected_version_id.clone();

        let fresh: Vec<VersionRecord> = page
            .items
            .into_iter()
            .filter(|r| Some(&r.id) != selected.as_ref())
            .filter(|r| seen.insert(r.id.clone()))
            .collect();

        self.options.extend_page(&fresh, page.has_next_page);
        let added = fresh.len();
        self.versions.extend(fresh);
        self.has_next_page = page.has_next_page;
        self.current_page += 1;
        self.phase = PagerPhase::Loaded;
        self.in_flight = None;
        added
    }

    /// First page failed: surface the error, keep only the pinned selection
    pub fn fail_first_page(&mut self, error: String) {
        let pinned: Vec<VersionRecord> = self.selected_record().cloned().into_iter().collect();
        self.versions = pinned;
        self.has_next_page = false;
        self.options.replace(&self.versions, false);
        self.phase = PagerPhase::Error;
        self.in_flight = None;
        self.last_error = Some(error);
    }

    /// Follow-up page failed: back to loaded, nothing appended
    pub fn fail_next_page(&mut self) {
        self.phase = PagerPhase::Loaded;
        self.in_flight = None;
    }

    /// Select a version already in the list. Returns false for unknown ids.
    pub fn select(&mut self, id: &VersionId) -> bool {
        if !self.contains(id) {
            return false;
        }
        self.selected_version_id = Some(id.clone());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(id: &str) -> VersionRecord {
        VersionRecord::new(id, format!("{id}.0.0"))
    }

    fn page(ids: &[&str], has_next_page: bool) -> PageResult {
        PageResult::new(ids.iter().map(|id| rec(id)).collect(), has_next_page)
    }

    fn ids(pager: &PagerState) -> Vec<&str> {
        pager.versions.iter().map(|r| r.id.as_str()).collect()
    }

    fn loaded(ids: &[&str], has_next_page: bool) -> PagerState {
        let mut pager = PagerState::new(42);
        let tag = pager.begin_initialize(42, None);
        pager.apply_first_page(&tag, page(ids, has_next_page));
        pager
    }

    #[test]
    fn test_new_pager_is_idle() {
        let pager = PagerState::new(42);
        assert_eq!(pager.phase, PagerPhase::Idle);
        assert!(!pager.is_loading());
        assert!(!pager.can_load_more());
        assert_eq!(pager.current_page, FIRST_PAGE);
    }

    #[test]
    fn test_debounce_only_latest_generation_fires() {
        let mut debounce = SearchDebounce::default();
        let first = debounce.schedule("beta".to_string());
        let second = debounce.schedule("beta2".to_string());

        assert_eq!(debounce.take_if_current(first), None);
        assert!(debounce.is_pending());
        assert_eq!(debounce.take_if_current(second), Some("beta2".to_string()));
        assert!(!debounce.is_pending());
        assert_eq!(debounce.take_if_current(second), None);
    }

    #[test]
    fn test_initialize_requests_first_page_with_preselection() {
        let mut pager = PagerState::new(1);
        let tag = pager.begin_initialize(42, Some(VersionId::from("v3")));

        assert_eq!(tag.kind, RequestKind::Initial);
        assert_eq!(tag.page, FIRST_PAGE);
        assert_eq!(pager.phase, PagerPhase::Loading);

        let query = pager.query_for(&tag, 7, 20);
        assert_eq!(query.app_id, 42);
        assert_eq!(query.project_id, 7);
        assert_eq!(query.include_version, Some(VersionId::from("v3")));
        assert!(query.search_term.is_empty());
    }

    #[test]
    fn test_initial_page_selects_preselected() {
        let mut pager = PagerState::new(42);
        let tag = pager.begin_initialize(42, Some(VersionId::from("v3")));
        let applied = pager.apply_first_page(&tag, page(&["v1", "v2", "v3"], true));

        assert_eq!(applied.selected, Some(VersionId::from("v3")));
        assert_eq!(pager.current_page, 2);
        assert!(pager.options.has_load_more());
    }

    #[test]
    fn test_initial_page_falls_back_to_first_record() {
        let mut pager = PagerState::new(42);
        let tag = pager.begin_initialize(42, Some(VersionId::from("gone")));
        let applied = pager.apply_first_page(&tag, page(&["v1", "v2"], false));

        assert_eq!(applied.selected, Some(VersionId::from("v1")));
    }

    #[test]
    fn test_empty_initial_page_is_not_an_error() {
        let mut pager = PagerState::new(42);
        let tag = pager.begin_initialize(42, None);
        let applied = pager.apply_first_page(&tag, PageResult::default());

        assert_eq!(pager.phase, PagerPhase::Loaded);
        assert!(pager.versions.is_empty());
        assert!(pager.options.as_slice().is_empty());
        assert_eq!(applied.selected, None);
    }

    #[test]
    fn test_first_page_dedups_ids() {
        let pager = loaded(&["v1", "v2", "v1"], false);
        assert_eq!(ids(&pager), vec!["v1", "v2"]);
    }

    #[test]
    fn test_load_more_guard() {
        let mut pager = loaded(&["v1"], true);
        assert!(pager.begin_load_more().is_some());
        assert_eq!(pager.phase, PagerPhase::LoadingMore);
        assert!(pager.begin_load_more().is_none());
    }

    #[test]
    fn test_load_more_ignored_without_next_page() {
        let mut pager = loaded(&["v1"], false);
        assert!(pager.begin_load_more().is_none());
        assert_eq!(pager.phase, PagerPhase::Loaded);
    }

    #[test]
    fn test_next_page_skips_selected_and_duplicates() {
        let mut pager = loaded(&["v1", "v2", "v3"], true);
        assert!(pager.select(&VersionId::from("v3")));
        pager.begin_load_more().unwrap();

        let added = pager.apply_next_page(page(&["v3", "v2", "v4"], false));

        assert_eq!(added, 1);
        assert_eq!(ids(&pager), vec!["v1", "v2", "v3", "v4"]);
        assert_eq!(pager.current_page, 3);
        assert!(!pager.options.has_load_more());
    }

    #[test]
    fn test_failed_next_page_changes_nothing() {
        let mut pager = loaded(&["v1", "v2"], true);
        pager.begin_load_more().unwrap();
        pager.fail_next_page();

        assert_eq!(pager.phase, PagerPhase::Loaded);
        assert_eq!(ids(&pager), vec!["v1", "v2"]);
        assert_eq!(pager.current_page, 2);
        assert!(pager.options.has_load_more());
    }

    #[test]
    fn test_failed_initialize_leaves_empty_error() {
        let mut pager = PagerState::new(42);
        pager.begin_initialize(42, Some(VersionId::from("v3")));
        pager.fail_first_page("connection refused".to_string());

        assert_eq!(pager.phase, PagerPhase::Error);
        assert!(pager.versions.is_empty());
        assert_eq!(pager.last_error.as_deref(), Some("connection refused"));
    }

    #[test]
    fn test_load_more_from_error_retries_first_page() {
        let mut pager = PagerState::new(42);
        pager.begin_initialize(42, Some(VersionId::from("v3")));
        pager.fail_first_page("timeout".to_string());

        let tag = pager.begin_load_more().unwrap();
        assert_eq!(tag.kind, RequestKind::Initial);
        assert_eq!(tag.page, FIRST_PAGE);
        assert_eq!(pager.phase, PagerPhase::Loading);
        assert_eq!(pager.preselected_version_id, Some(VersionId::from("v3")));
    }

    #[test]
    fn test_search_starts_new_session_and_pins_selection() {
        let mut pager = loaded(&["v1", "v2"], true);
        pager.select(&VersionId::from("v2"));
        let before = pager.session;

        let tag = pager.begin_search("beta".to_string());

        assert_eq!(tag.kind, RequestKind::Search);
        assert!(tag.session > before);
        assert_eq!(pager.search_term, "beta");
        assert_eq!(pager.current_page, 2);
        assert_eq!(ids(&pager), vec!["v2"]);
        assert!(!pager.options.has_load_more());
    }

    #[test]
    fn test_search_page_replaces_list() {
        let mut pager = loaded(&["v1", "v2"], true);
        let tag = pager.begin_search("beta".to_string());
        pager.apply_first_page(&tag, page(&["b1", "b2"], false));

        // v1 was auto-selected by the initial page and stays pinned ahead of the results
        assert_eq!(ids(&pager), vec!["v1", "b1", "b2"]);
        assert_eq!(pager.selected_version_id, Some(VersionId::from("v1")));
    }

    #[test]
    fn test_search_page_containing_selection_keeps_server_order() {
        let mut pager = loaded(&["v1", "v2"], true);
        let tag = pager.begin_search("v".to_string());
        pager.apply_first_page(&tag, page(&["v2", "v1"], false));

        assert_eq!(ids(&pager), vec!["v2", "v1"]);
    }

    #[test]
    fn test_stale_tag_is_rejected() {
        let mut pager = loaded(&["v1"], true);
        let more = pager.begin_load_more().unwrap();
        let search = pager.begin_search("rc".to_string());

        assert!(!pager.accepts(&more));
        assert!(pager.accepts(&search));
    }
}
