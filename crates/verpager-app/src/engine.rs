//! Engine - owns the dialog state and drives the TEA loop
//!
//! Front ends (the headless runner, tests) create an `Engine`, feed it
//! messages, and read `engine.state` after each step.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::actions::ActionContext;
use crate::config::Settings;
use crate::message::Message;
use crate::process::process_message;
use crate::services::{Notifier, VersionStore};
use crate::state::AppState;
use verpager_core::{InstanceContext, VersionId};

const MESSAGE_CHANNEL_CAPACITY: usize = 256;

pub struct Engine<S> {
    pub state: AppState,
    pub msg_rx: mpsc::Receiver<Message>,
    actions: ActionContext<S>,
}

impl<S> Engine<S>
where
    S: VersionStore + Sync + 'static,
{
    pub fn new(
        context: InstanceContext,
        settings: &Settings,
        store: Arc<S>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let (msg_tx, msg_rx) = mpsc::channel(MESSAGE_CHANNEL_CAPACITY);
        Self {
            state: AppState::new(context, &settings.pager),
            msg_rx,
            actions: ActionContext::new(msg_tx, store, notifier),
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.actions.store
    }

    /// Mount the dialog: load the first page for the context's application
    pub fn open(&mut self, preselected_version_id: Option<VersionId>) {
        info!(
            "Opening upgrade dialog for instance {}",
            self.state.context.app_instance_id
        );
        let app_id = self.state.context.app_id;
        self.process_message(Message::Initialize {
            app_id,
            preselected_version_id,
        });
    }

    pub fn process_message(&mut self, message: Message) {
        process_message(&mut self.state, message, &mut self.actions);
    }

    /// Wait for the next message and process it. Returns false once the
    /// channel is closed.
    pub async fn step(&mut self) -> bool {
        match self.msg_rx.recv().await {
            Some(msg) => {
                self.process_message(msg);
                true
            }
            None => false,
        }
    }

    pub fn has_pending_search(&self) -> bool {
        self.actions.has_pending_search()
    }

    pub fn should_close(&self) -> bool {
        self.state.should_close()
    }

    /// Stop the search timer. In-flight store calls finish on their own and
    /// their results are dropped by the closed dialog.
    pub fn shutdown(&mut self) {
        debug!("Engine shutting down");
        self.actions.cancel_search_timer();
        if !self.state.should_close() {
            self.process_message(Message::Close);
        }
    }
}
