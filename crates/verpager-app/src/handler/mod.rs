//! Handler module - TEA update function and event handlers
//!
//! Organized into submodules:
//! - `update`: Main update() function and message dispatch
//! - `pager`: Search, paging and selection handlers
//! - `upgrade`: Values editing and upgrade submission handlers

pub(crate) mod pager;
pub(crate) mod update;
pub(crate) mod upgrade;


use std::time::Duration;

use crate::message::Message;
use crate::pager::RequestTag;
use crate::services::Notice;
use verpager_core::{InstanceContext, UpgradeRequest, VersionId, VersionQuery};

// Re-export main entry point
pub use update::update;

/// Actions that the event loop should perform after update
#[derive(Debug, Clone)]
pub enum UpdateAction {
    /// Arm the single-slot search debounce timer.
    ///
    /// Replaces any timer still pending; when it fires the loop sends
    /// `Message::SearchDebounceElapsed { generation }`.
    ScheduleSearch { generation: u64, delay: Duration },

    /// Request a page of versions; the response echoes `tag`
    FetchPage { tag: RequestTag, query: VersionQuery },

    /// Load the values document of a version
    LoadValue {
        context: InstanceContext,
        version_id: VersionId,
    },

    /// Send an upgrade to the store
    SubmitUpgrade { request: UpgradeRequest },

    /// Hand a notice to the notifier
    Notify(Notice),
}

/// Result of processing a message
#[derive(Debug, Default)]
pub struct UpdateResult {
    /// Optional follow-up message to process
    pub message: Option<Message>,
    /// Optional action for the event loop to perform
    pub action: Option<UpdateAction>,
}

impl UpdateResult {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn message(msg: Message) -> Self {
        Self {
            message: Some(msg),
            action: None,
        }
    }

    pub fn action(action: UpdateAction) -> Self {
        Self {
            message: None,
            action: Some(action),
        }
    }
}
