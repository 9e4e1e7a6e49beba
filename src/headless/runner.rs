//! Headless mode runner - main event loop without UI
//!
//! Commands arrive from a blocking stdin reader thread; engine messages and
//! notices are interleaved into one NDJSON stream. Once stdin reaches EOF the
//! loop keeps draining until the dialog is idle, then closes it.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{error, info, warn};

use verpager_app::config::{self, Settings};
use verpager_app::services::{Catalog, FixtureStore, Notice, VersionStore};
use verpager_app::{CloseReason, Engine, Message};
use verpager_core::prelude::*;
use verpager_core::{InstanceContext, VersionId};

use super::{parse_command, ChannelNotifier, HeadlessCommand, HeadlessEvent, OptionsTracker};

/// How long the dialog must stay quiet after stdin EOF before it is closed
const DRAIN_IDLE: Duration = Duration::from_millis(200);

const COMMAND_CHANNEL_CAPACITY: usize = 64;

/// Everything needed to open the dialog headlessly
#[derive(Debug, Clone)]
pub struct HeadlessArgs {
    pub context: InstanceContext,
    pub catalog_path: PathBuf,
    pub preselected_version_id: Option<VersionId>,
    /// Directory holding `.verpager/config.toml`
    pub config_dir: PathBuf,
}

/// Run in headless mode over stdin/stdout
pub async fn run_headless(args: HeadlessArgs) -> Result<()> {
    info!("═══════════════════════════════════════════════════════");
    info!("Version pager starting in HEADLESS mode");
    info!(
        "Instance {} (app {}, env {})",
        args.context.app_instance_id, args.context.app_id, args.context.environment_id
    );
    info!("═══════════════════════════════════════════════════════");

    let settings = config::load_settings(&args.config_dir);
    let catalog = match Catalog::load(&args.catalog_path) {
        Ok(catalog) => catalog,
        Err(e) => {
            HeadlessEvent::from_error(&e, settings.headless.emit_timestamps).emit();
            return Err(e);
        }
    };

    let (cmd_tx, cmd_rx) = mpsc::channel(COMMAND_CHANNEL_CAPACITY);
    std::thread::spawn(move || {
        spawn_stdin_reader_blocking(cmd_tx);
    });

    let mut stdout = std::io::stdout();
    let reason = run_session(
        args.context,
        &settings,
        Arc::new(FixtureStore::new(catalog)),
        args.preselected_version_id,
        cmd_rx,
        &mut stdout,
    )
    .await?;

    info!("Version pager headless mode exiting ({:?})", reason);
    Ok(())
}

/// Drive one dialog from `commands` until it closes, writing events to `out`
pub async fn run_session<S, W>(
    context: InstanceContext,
    settings: &Settings,
    store: Arc<S>,
    preselected_version_id: Option<VersionId>,
    mut commands: mpsc::Receiver<HeadlessCommand>,
    out: &mut W,
) -> Result<CloseReason>
where
    S: VersionStore + Sync + 'static,
    W: Write,
{
    let timestamps = settings.headless.emit_timestamps;
    let (notifier, mut notices) = ChannelNotifier::new();
    let mut engine = Engine::new(context, settings, store, Arc::new(notifier));
    let mut tracker = OptionsTracker::new();
    let mut stdin_open = true;

    engine.open(preselected_version_id);
    flush_events(&engine, &mut tracker, &mut notices, timestamps, out)?;

    while !engine.should_close() {
        let drained = !stdin_open && !engine.has_pending_search() && !engine.state.is_busy();

        tokio::select! {
            cmd = commands.recv(), if stdin_open => match cmd {
                Some(HeadlessCommand::Send(msg)) => engine.process_message(msg),
                Some(HeadlessCommand::Quit) => engine.process_message(Message::Close),
                None => {
                    info!("Command stream closed, draining");
                    stdin_open = false;
                }
            },
            msg = engine.msg_rx.recv() => match msg {
                Some(msg) => engine.process_message(msg),
                None => {
                    warn!("Message channel closed");
                    let err = Error::ChannelClosed;
                    HeadlessEvent::from_error(&err, timestamps).write_to(out)?;
                    return Err(err);
                }
            },
            _ = tokio::time::sleep(DRAIN_IDLE), if drained => {
                engine.process_message(Message::Close);
            }
        }

        flush_events(&engine, &mut tracker, &mut notices, timestamps, out)?;
    }

    engine.shutdown();
    let reason = engine.state.closed.unwrap_or(CloseReason::Cancelled);
    HeadlessEvent::closed(reason, timestamps).write_to(out)?;
    Ok(reason)
}

/// Write pending notices followed by any option list change
fn flush_events<S, W>(
    engine: &Engine<S>,
    tracker: &mut OptionsTracker,
    notices: &mut mpsc::UnboundedReceiver<Notice>,
    timestamps: bool,
    out: &mut W,
) -> Result<()>
where
    S: VersionStore + Sync + 'static,
    W: Write,
{
    while let Ok(notice) = notices.try_recv() {
        HeadlessEvent::notice(notice, timestamps)
            .write_to(out)
            .context("Failed to write notice event")?;
    }
    for event in tracker.changes(&engine.state.pager, timestamps) {
        event
            .write_to(out)
            .context("Failed to write options event")?;
    }
    Ok(())
}

/// Read stdin lines and forward parsed commands (blocking version)
fn spawn_stdin_reader_blocking(cmd_tx: mpsc::Sender<HeadlessCommand>) {
    use std::io::BufRead;

    let stdin = std::io::stdin();
    let reader = stdin.lock();

    for line in reader.lines() {
        match line {
            Ok(line) => match parse_command(&line) {
                Some(cmd) => {
                    let quit = cmd == HeadlessCommand::Quit;
                    if cmd_tx.blocking_send(cmd).is_err() || quit {
                        break;
                    }
                }
                None if line.trim().is_empty() => {}
                None => warn!("Unknown stdin command: {}", line.trim()),
            },
            Err(e) => {
                error!("Failed to read stdin: {}", e);
                break;
            }
        }
    }

    info!("Stdin reader exiting");
}
