//! Headless mode - NDJSON driver for the version pager
//!
//! Reads line commands from stdin, feeds them to the engine as messages, and
//! writes structured JSON events to stdout so scripts can drive the dialog
//! without a UI.
//!
//! # Commands
//!
//! | line            | message                    |
//! |-----------------|----------------------------|
//! | `search <term>` | search input (debounced)   |
//! | `more`          | load more                  |
//! | `select <id>`   | select a version           |
//! | `edit <text>`   | replace the values draft   |
//! | `invalid`/`valid` | editor syntax state      |
//! | `submit`        | submit the upgrade         |
//! | `quit`          | close the dialog           |
//!
//! # Example Output
//!
//! ```json
//! {"event":"options","phase":"loaded","search_term":"","selected":"v1","has_next_page":true,"options":[{"kind":"version","id":"v1","label":"1.0.0"},{"kind":"load_more"}],"timestamp":1704700001000}
//! {"event":"notice","level":"transient","message":"Failed to load more versions: transport error: timeout","timestamp":1704700002000}
//! {"event":"closed","reason":"upgraded","timestamp":1704700003000}
//! ```

pub mod runner;

use std::io::{self, Write};

use chrono::Utc;
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::error;

use verpager_app::pager::{PagerPhase, PagerState, VersionOption};
use verpager_app::services::{Notice, NoticeLevel, Notifier};
use verpager_app::{CloseReason, Message};
use verpager_core::VersionId;

pub use runner::{run_headless, run_session, HeadlessArgs};

/// Events emitted in headless mode
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HeadlessEvent {
    /// The rendered option list changed
    Options {
        phase: PagerPhase,
        search_term: String,
        selected: Option<VersionId>,
        has_next_page: bool,
        options: Vec<VersionOption>,
        #[serde(skip_serializing_if = "Option::is_none")]
        timestamp: Option<i64>,
    },

    /// Toast or prompt raised by the dialog
    Notice {
        level: NoticeLevel,
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        timestamp: Option<i64>,
    },

    /// Dialog closed; always the last event
    Closed {
        reason: CloseReason,
        #[serde(skip_serializing_if = "Option::is_none")]
        timestamp: Option<i64>,
    },

    /// Error occurred
    Error {
        message: String,
        fatal: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        timestamp: Option<i64>,
    },
}

impl HeadlessEvent {
    /// Write this event as one NDJSON line
    pub fn write_to(&self, out: &mut impl Write) -> io::Result<()> {
        let json = serde_json::to_string(self).map_err(io::Error::other)?;
        writeln!(out, "{}", json)?;
        out.flush()
    }

    /// Emit this event to stdout
    pub fn emit(&self) {
        let mut stdout = io::stdout().lock();
        if let Err(e) = self.write_to(&mut stdout) {
            error!("Failed to write headless event to stdout: {}", e);
        }
    }

    fn stamp(timestamps: bool) -> Option<i64> {
        timestamps.then(|| Utc::now().timestamp_millis())
    }

    // ─────────────────────────────────────────────────────────
    // Convenience constructors
    // ─────────────────────────────────────────────────────────

    pub fn options(pager: &PagerState, timestamps: bool) -> Self {
        Self::Options {
            phase: pager.phase,
            search_term: pager.search_term.clone(),
            selected: pager.selected_version_id.clone(),
            has_next_page: pager.has_next_page,
            options: pager.options.as_slice().to_vec(),
            timestamp: Self::stamp(timestamps),
        }
    }

    pub fn notice(notice: Notice, timestamps: bool) -> Self {
        Self::Notice {
            level: notice.level,
            message: notice.message,
            timestamp: Self::stamp(timestamps),
        }
    }

    pub fn closed(reason: CloseReason, timestamps: bool) -> Self {
        Self::Closed {
            reason,
            timestamp: Self::stamp(timestamps),
        }
    }

    pub fn error(message: impl Into<String>, fatal: bool, timestamps: bool) -> Self {
        Self::Error {
            message: message.into(),
            fatal,
            timestamp: Self::stamp(timestamps),
        }
    }

    /// Error event whose `fatal` flag follows the error's classification
    pub fn from_error(err: &verpager_core::Error, timestamps: bool) -> Self {
        Self::error(err.to_string(), err.is_fatal(), timestamps)
    }

    /// Same event with the timestamp removed, for change detection
    fn unstamped(&self) -> Self {
        let mut event = self.clone();
        match &mut event {
            Self::Options { timestamp, .. }
            | Self::Notice { timestamp, .. }
            | Self::Closed { timestamp, .. }
            | Self::Error { timestamp, .. } => *timestamp = None,
        }
        event
    }
}

/// A parsed stdin line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeadlessCommand {
    /// Forward to the engine
    Send(Message),
    Quit,
}

/// Parse one stdin line. Blank lines and unknown commands yield `None`.
pub fn parse_command(line: &str) -> Option<HeadlessCommand> {
    let line = line.trim();
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let message = match verb {
        "" => return None,
        "q" | "quit" => return Some(HeadlessCommand::Quit),
        "search" => Message::SearchInput {
            term: rest.to_string(),
        },
        "more" => Message::LoadMore,
        "select" if !rest.is_empty() => Message::SelectVersion {
            version_id: VersionId::from(rest),
        },
        "edit" => Message::EditValues {
            text: rest.to_string(),
        },
        "invalid" => Message::EditorValidity { has_error: true },
        "valid" => Message::EditorValidity { has_error: false },
        "submit" => Message::Submit,
        _ => return None,
    };
    Some(HeadlessCommand::Send(message))
}

/// Forwards notices to the runner so they share the event sink
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<Notice>,
}

impl ChannelNotifier {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Notice>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, notice: Notice) {
        if self.tx.send(notice).is_err() {
            error!("Headless notice channel closed");
        }
    }
}

/// Emits an `options` event only when the visible list actually changed
#[derive(Debug, Default)]
pub struct OptionsTracker {
    last: Option<HeadlessEvent>,
    last_phase: PagerPhase,
}

impl OptionsTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events describing what changed since the previous call
    pub fn changes(&mut self, pager: &PagerState, timestamps: bool) -> Vec<HeadlessEvent> {
        let mut events = Vec::new();

        if pager.phase == PagerPhase::Error && self.last_phase != PagerPhase::Error {
            let message = pager
                .last_error
                .clone()
                .unwrap_or_else(|| "failed to load versions".to_string());
            events.push(HeadlessEvent::error(message, false, timestamps));
        }
        self.last_phase = pager.phase;

        let current = HeadlessEvent::options(pager, timestamps);
        let unstamped = current.unstamped();
        if self.last.as_ref() != Some(&unstamped) {
            self.last = Some(unstamped);
            events.push(current);
        }
        events
    }
}
