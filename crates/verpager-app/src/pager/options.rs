//! Option list handed to the rendering layer
//!
//! The list mirrors the accumulated versions and, while more pages remain,
//! ends with a single [`VersionOption::LoadMore`] affordance.

use serde::Serialize;
use verpager_core::{VersionId, VersionRecord};

/// One entry in the version select
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VersionOption {
    Version { id: VersionId, label: String },
    /// The synthetic "load more" entry
    LoadMore,
}

impl VersionOption {
    fn from_record(record: &VersionRecord) -> Self {
        VersionOption::Version {
            id: record.id.clone(),
            label: record.label().to_string(),
        }
    }

    pub fn is_load_more(&self) -> bool {
        matches!(self, VersionOption::LoadMore)
    }
}

/// Ordered options; the affordance, when present, is always last
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionList {
    items: Vec<VersionOption>,
}

impl OptionList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the list from scratch
    pub fn replace(&mut self, records: &[VersionRecord], has_next_page: bool) {
        self.items.clear();
        self.items
            .extend(records.iter().map(VersionOption::from_record));
        if has_next_page {
            self.items.push(VersionOption::LoadMore);
        }
    }

    /// Append a later page.
    ///
    /// The stale affordance is popped first, the new options appended, and the
    /// affordance pushed back only if another page remains.
    pub fn extend_page(&mut self, records: &[VersionRecord], has_next_page: bool) {
        if self.has_load_more() {
            self.items.pop();
        }
        self.items
            .extend(records.iter().map(VersionOption::from_record));
        if has_next_page {
            self.items.push(VersionOption::LoadMore);
        }
    }

    pub fn has_load_more(&self) -> bool {
        self.items.last().is_some_and(VersionOption::is_load_more)
    }

    pub fn as_slice(&self) -> &[VersionOption] {
        &self.items
    }
}
