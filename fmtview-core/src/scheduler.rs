//! Debounced format scheduling.
//!
//! The scheduler never blocks. Timers and engine calls run as tokio tasks
//! that report back through an unbounded channel of [`SchedulerEvent`]s; the
//! owner of the [`Session`] feeds those events into [`FormatScheduler::handle`]
//! on its own loop, so all session mutation happens on one logical thread.
//!
//! # Ordering
//!
//! Every engine call is issued a [`RequestToken`] from a monotonic counter.
//! A completion is applied only if its token is still the latest issued, so a
//! slow earlier call can never overwrite a newer one. Debounce and
//! status-reversion alarms carry a generation number for the same reason: an
//! alarm that fired just before being replaced is ignored when it arrives.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

use crate::dialect::LanguageSelection;
use crate::engine::{EngineError, FormatEngine, FormatRequest};
use crate::error::PipelineError;
use crate::interpret::{interpret, ErrorReport};
use crate::options::FormatOptions;
use crate::picker::LanguageChange;
use crate::session::Session;
use crate::MAX_INPUT_CHARS;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);
/// How long `Formatted` stays in the status bar.
pub const FORMATTED_DISPLAY: Duration = Duration::from_millis(2000);
/// How long `Error` stays in the status bar.
pub const ERROR_DISPLAY: Duration = Duration::from_millis(5000);

/// Identity of one engine invocation. Later requests compare greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

#[derive(Debug)]
pub enum SchedulerEvent {
    /// The debounce alarm armed with `generation` went off.
    DebounceElapsed { generation: u64 },
    /// An engine call finished (successfully or not).
    Completed { token: RequestToken, result: Result<String, EngineError> },
    /// The status-reversion alarm armed for `generation` went off.
    StatusExpired { generation: u64 },
}

/// What a scheduler call or event did to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing changed (superseded alarm, unknown event).
    Idle,
    /// An engine call was issued.
    Started(RequestToken),
    /// Input was blank; output cleared without calling the engine.
    Cleared,
    Formatted,
    Failed(ErrorReport),
    /// A completion arrived for a superseded request and was dropped.
    Stale(RequestToken),
    StatusReverted,
    /// A language change is waiting for the user to confirm.
    AwaitingConfirmation,
}

pub struct FormatScheduler {
    engine: Arc<dyn FormatEngine>,
    events: UnboundedSender<SchedulerEvent>,
    debounce_delay: Duration,
    debounce: Option<JoinHandle<()>>,
    debounce_generation: u64,
    status_timer: Option<JoinHandle<()>>,
    next_token: u64,
    latest: Option<RequestToken>,
}

impl FormatScheduler {
    pub fn new(engine: Arc<dyn FormatEngine>, events: UnboundedSender<SchedulerEvent>) -> Self {
        Self {
            engine,
            events,
            debounce_delay: DEFAULT_DEBOUNCE,
            debounce: None,
            debounce_generation: 0,
            status_timer: None,
            next_token: 0,
            latest: None,
        }
    }

    pub fn with_debounce(mut self, delay: Duration) -> Self {
        self.debounce_delay = delay;
        self
    }

    /// True while a debounce alarm is armed and has not yet been handled.
    pub fn is_debouncing(&self) -> bool {
        self.debounce.is_some()
    }

    /// Token of the most recently issued engine call, if any.
    pub fn latest_token(&self) -> Option<RequestToken> {
        self.latest
    }

    /// Records an edit and (re)arms the debounce alarm.
    pub fn on_edit(&mut self, session: &mut Session, text: String) {
        session.set_input(text);
        self.arm_debounce();
    }

    /// Applies new options and (re)arms the debounce alarm. No-op when unchanged.
    pub fn on_options_change(&mut self, session: &mut Session, options: FormatOptions) {
        if session.options() == options {
            return;
        }
        session.set_options(options);
        self.arm_debounce();
    }

    /// Formats immediately, bypassing (and cancelling) any pending debounce.
    pub fn format_now(&mut self, session: &mut Session) -> Result<Outcome, PipelineError> {
        self.cancel_debounce();
        self.start(session)
    }

    /// Replaces the input wholesale (file load, paste, sample) and formats now.
    ///
    /// Oversize text is rejected before the session is touched.
    pub fn load_text(
        &mut self,
        session: &mut Session,
        text: String,
        selection: Option<LanguageSelection>,
    ) -> Result<Outcome, PipelineError> {
        let len = text.chars().count();
        if len > MAX_INPUT_CHARS {
            return Err(PipelineError::InputTooLarge { len, max: MAX_INPUT_CHARS });
        }
        if let Some(selection) = selection {
            session.set_selection(selection);
        }
        session.set_input(text);
        self.format_now(session)
    }

    /// Applies a resolved language change from the picker.
    pub fn apply_language(
        &mut self,
        session: &mut Session,
        change: LanguageChange,
    ) -> Result<Outcome, PipelineError> {
        match change {
            LanguageChange::Apply { selection, sample: Some(sample) } => {
                self.load_text(session, sample.to_owned(), Some(selection))
            }
            LanguageChange::Apply { selection, sample: None } => {
                session.set_selection(selection);
                self.format_now(session)
            }
            LanguageChange::AwaitConfirmation(_) => Ok(Outcome::AwaitingConfirmation),
            LanguageChange::Cancelled | LanguageChange::Unchanged => Ok(Outcome::Idle),
        }
    }

    /// Empties the session and drops any pending or in-flight work.
    pub fn clear(&mut self, session: &mut Session) {
        self.cancel_debounce();
        self.cancel_status_timer();
        self.issue_token();
        session.clear();
    }

    /// Feeds one event from the scheduler channel back into the session.
    pub fn handle(
        &mut self,
        session: &mut Session,
        event: SchedulerEvent,
    ) -> Result<Outcome, PipelineError> {
        match event {
            SchedulerEvent::DebounceElapsed { generation } => {
                if generation != self.debounce_generation || self.debounce.is_none() {
                    return Ok(Outcome::Idle);
                }
                self.debounce = None;
                self.start(session)
            }
            SchedulerEvent::Completed { token, result } => Ok(self.complete(session, token, result)),
            SchedulerEvent::StatusExpired { generation } => {
                if session.expire_status(generation) {
                    self.status_timer = None;
                    Ok(Outcome::StatusReverted)
                } else {
                    Ok(Outcome::Idle)
                }
            }
        }
    }

    /// Cancels every pending alarm. In-flight engine calls keep running but
    /// their results will find no receiver once the channel owner is gone.
    pub fn shutdown(&mut self) {
        self.cancel_debounce();
        self.cancel_status_timer();
    }

    fn issue_token(&mut self) -> RequestToken {
        self.next_token += 1;
        let token = RequestToken(self.next_token);
        self.latest = Some(token);
        token
    }

    fn start(&mut self, session: &mut Session) -> Result<Outcome, PipelineError> {
        let len = session.input().chars().count();
        if len > MAX_INPUT_CHARS {
            self.issue_token();
            let err = PipelineError::InputTooLarge { len, max: MAX_INPUT_CHARS };
            log::warn!("format refused: {err}");
            let generation =
                session.apply_failure(ErrorReport { short_message: err.to_string(), line: None });
            self.arm_status(generation, ERROR_DISPLAY);
            return Err(err);
        }
        if session.input().trim().is_empty() {
            self.issue_token();
            self.cancel_status_timer();
            session.apply_empty();
            return Ok(Outcome::Cleared);
        }

        let dialect = session.selection().resolve(session.input());
        let token = self.issue_token();
        self.cancel_status_timer();
        session.begin_format(dialect);

        let request = FormatRequest::new(session.input().to_owned(), dialect, session.options());
        log::debug!("format {token:?}: {} chars as {dialect}", len);
        let call = self.engine.format(request);
        let events = self.events.clone();
        tokio::spawn(async move {
            let result = call.await;
            let _ = events.send(SchedulerEvent::Completed { token, result });
        });
        Ok(Outcome::Started(token))
    }

    fn complete(
        &mut self,
        session: &mut Session,
        token: RequestToken,
        result: Result<String, EngineError>,
    ) -> Outcome {
        if self.latest != Some(token) {
            log::debug!("discarding stale completion {token:?} (latest {:?})", self.latest);
            return Outcome::Stale(token);
        }
        match result {
            Ok(text) => {
                let generation = session.apply_success(text.trim_end());
                self.arm_status(generation, FORMATTED_DISPLAY);
                Outcome::Formatted
            }
            Err(e) => {
                let report = interpret(&e.message);
                log::info!("format {token:?} failed: {}", report.short_message);
                let generation = session.apply_failure(report.clone());
                self.arm_status(generation, ERROR_DISPLAY);
                Outcome::Failed(report)
            }
        }
    }

    fn arm_debounce(&mut self) {
        self.cancel_debounce();
        self.debounce_generation += 1;
        let generation = self.debounce_generation;
        let delay = self.debounce_delay;
        let events = self.events.clone();
        self.debounce = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = events.send(SchedulerEvent::DebounceElapsed { generation });
        }));
    }

    fn cancel_debounce(&mut self) {
        if let Some(handle) = self.debounce.take() {
            handle.abort();
        }
    }

    fn arm_status(&mut self, generation: u64, after: Duration) {
        self.cancel_status_timer();
        let events = self.events.clone();
        self.status_timer = Some(tokio::spawn(async move {
            tokio::time::sleep(after).await;
            let _ = events.send(SchedulerEvent::StatusExpired { generation });
        }));
    }

    fn cancel_status_timer(&mut self) {
        if let Some(handle) = self.status_timer.take() {
            handle.abort();
        }
    }
}

impl Drop for FormatScheduler {
    fn drop(&mut self) {
        self.shutdown();
    }
}
