//! Action handlers: UpdateAction dispatch and background task spawning

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, trace, warn};

use crate::message::Message;
use crate::pager::RequestTag;
use crate::services::{Notifier, VersionStore};
use crate::UpdateAction;
use verpager_core::{
    Error, InstanceContext, UpgradeOutcome, UpgradeRequest, VersionId, VersionQuery,
};

/// Everything background tasks need to report back into the TEA loop
pub struct ActionContext<S> {
    pub msg_tx: mpsc::Sender<Message>,
    pub store: Arc<S>,
    pub notifier: Arc<dyn Notifier>,
    /// The single pending search timer, if any
    debounce_timer: Option<JoinHandle<()>>,
}

impl<S> ActionContext<S> {
    pub fn new(msg_tx: mpsc::Sender<Message>, store: Arc<S>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            msg_tx,
            store,
            notifier,
            debounce_timer: None,
        }
    }

    /// Whether a search timer is armed and has not fired yet
    pub fn has_pending_search(&self) -> bool {
        self.debounce_timer
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Abort the pending search timer
    pub fn cancel_search_timer(&mut self) {
        if let Some(handle) = self.debounce_timer.take() {
            handle.abort();
        }
    }
}

/// Execute an action, spawning a background task where it needs I/O
pub fn handle_action<S>(action: UpdateAction, ctx: &mut ActionContext<S>)
where
    S: VersionStore + Sync + 'static,
{
    match action {
        UpdateAction::ScheduleSearch { generation, delay } => {
            ctx.cancel_search_timer();
            ctx.debounce_timer = Some(spawn_search_timer(ctx.msg_tx.clone(), generation, delay));
        }

        UpdateAction::FetchPage { tag, query } => {
            spawn_fetch_page(ctx.msg_tx.clone(), ctx.store.clone(), tag, query);
        }

        UpdateAction::LoadValue {
            context,
            version_id,
        } => {
            spawn_load_value(ctx.msg_tx.clone(), ctx.store.clone(), context, version_id);
        }

        UpdateAction::SubmitUpgrade { request } => {
            spawn_upgrade(ctx.msg_tx.clone(), ctx.store.clone(), request);
        }

        UpdateAction::Notify(notice) => {
            ctx.notifier.notify(notice);
        }
    }
}

/// Log a failed store call; recoverable failures only warn
fn log_store_error(what: &str, e: &Error) {
    if e.is_recoverable() {
        warn!("{} failed: {}", what, e);
    } else {
        error!("{} failed: {}", what, e);
    }
}

async fn send(msg_tx: &mpsc::Sender<Message>, msg: Message) {
    if msg_tx.send(msg).await.is_err() {
        debug!("Message channel closed, dropping task result");
    }
}

fn spawn_search_timer(
    msg_tx: mpsc::Sender<Message>,
    generation: u64,
    delay: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        trace!("Search debounce elapsed (generation {})", generation);
        send(&msg_tx, Message::SearchDebounceElapsed { generation }).await;
    })
}

fn spawn_fetch_page<S>(
    msg_tx: mpsc::Sender<Message>,
    store: Arc<S>,
    tag: RequestTag,
    query: VersionQuery,
) where
    S: VersionStore + Sync + 'static,
{
    tokio::spawn(async move {
        let msg = match store.fetch_version_page(query).await {
            Ok(page) => Message::PageLoaded { tag, page },
            Err(e) => {
                log_store_error(&format!("Version page {}", tag.page), &e);
                Message::PageLoadFailed {
                    tag,
                    error: e.to_string(),
                }
            }
        };
        send(&msg_tx, msg).await;
    });
}

fn spawn_load_value<S>(
    msg_tx: mpsc::Sender<Message>,
    store: Arc<S>,
    context: InstanceContext,
    version_id: VersionId,
) where
    S: VersionStore + Sync + 'static,
{
    tokio::spawn(async move {
        let msg = match store.fetch_value_for_version(&context, &version_id).await {
            Ok(value) => Message::ValueLoaded { version_id, value },
            Err(e) => {
                log_store_error(&format!("Values of {}", version_id), &e);
                Message::ValueLoadFailed {
                    version_id,
                    error: e.to_string(),
                }
            }
        };
        send(&msg_tx, msg).await;
    });
}

fn spawn_upgrade<S>(msg_tx: mpsc::Sender<Message>, store: Arc<S>, request: UpgradeRequest)
where
    S: VersionStore + Sync + 'static,
{
    tokio::spawn(async move {
        let msg = match store.upgrade(request).await {
            Ok(UpgradeOutcome::Applied) => Message::UpgradeApplied,
            Ok(UpgradeOutcome::Rejected { message }) => Message::UpgradeRejected { message },
            Err(e) => {
                log_store_error("Upgrade", &e);
                Message::UpgradeFailed {
                    error: e.to_string(),
                }
            }
        };
        send(&msg_tx, msg).await;
    });
}
