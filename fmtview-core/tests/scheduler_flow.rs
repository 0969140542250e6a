//! Scheduler lifecycle against a scripted engine, on paused tokio time.
//!
//! Exercises: debounce coalescing, stale completion discard, status
//! reversion, the size guard, blank input, failure interpretation, clear,
//! teardown, and language changes through the picker.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::future::BoxFuture;
use futures::FutureExt;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};
use tokio::time::Instant;

use fmtview_core::diff::LineClass;
use fmtview_core::engine::{EngineError, FormatEngine, FormatRequest};
use fmtview_core::picker::{LanguageChange, LanguagePicker, Resolution};
use fmtview_core::samples::sample_for;
use fmtview_core::scheduler::{FormatScheduler, Outcome, SchedulerEvent};
use fmtview_core::session::{Output, Status};
use fmtview_core::{Dialect, FormatOptions, LanguageSelection, PipelineError, Session, MAX_INPUT_CHARS};

type Script = dyn Fn(&str) -> (Duration, Result<String, EngineError>) + Send + Sync;

struct ScriptedEngine {
    calls: AtomicUsize,
    seen: Mutex<Vec<FormatRequest>>,
    script: Box<Script>,
}

impl FormatEngine for ScriptedEngine {
    fn format(&self, request: FormatRequest) -> BoxFuture<'static, Result<String, EngineError>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let (delay, result) = (self.script)(&request.source);
        self.seen.lock().unwrap().push(request);
        async move {
            tokio::time::sleep(delay).await;
            result
        }
        .boxed()
    }
}

/// Spaces out `=` and appends a semicolon, after 20ms.
fn tidy(src: &str) -> (Duration, Result<String, EngineError>) {
    let out = format!("{};\n", src.trim().replace(" = ", "=").replace('=', " = "));
    (Duration::from_millis(20), Ok(out))
}

struct Harness {
    scheduler: FormatScheduler,
    events: UnboundedReceiver<SchedulerEvent>,
    engine: Arc<ScriptedEngine>,
    session: Session,
}

impl Harness {
    fn new(script: impl Fn(&str) -> (Duration, Result<String, EngineError>) + Send + Sync + 'static) -> Self {
        let engine = Arc::new(ScriptedEngine {
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
            script: Box::new(script),
        });
        let (tx, events) = unbounded_channel();
        let scheduler = FormatScheduler::new(engine.clone(), tx);
        Self { scheduler, events, engine, session: Session::default() }
    }

    fn calls(&self) -> usize {
        self.engine.calls.load(Ordering::SeqCst)
    }

    async fn next(&mut self) -> SchedulerEvent {
        self.events.recv().await.expect("scheduler channel open")
    }

    async fn pump(&mut self) -> Outcome {
        let event = self.next().await;
        self.scheduler.handle(&mut self.session, event).unwrap()
    }
}

#[tokio::test(start_paused = true)]
async fn burst_of_edits_formats_once_with_last_text() {
    let mut h = Harness::new(tidy);
    for text in ["c", "co", "const", "const x=1"] {
        h.scheduler.on_edit(&mut h.session, text.to_owned());
        tokio::time::advance(Duration::from_millis(100)).await;
    }
    assert!(h.scheduler.is_debouncing());
    assert_eq!(h.calls(), 0);

    assert!(matches!(h.pump().await, Outcome::Started(_)));
    assert_eq!(h.session.status(), Status::Formatting);
    assert_eq!(h.pump().await, Outcome::Formatted);

    assert_eq!(h.calls(), 1);
    assert_eq!(h.engine.seen.lock().unwrap()[0].source, "const x=1");
    assert_eq!(h.session.output(), &Output::Formatted("const x = 1;".into()));
}

#[tokio::test(start_paused = true)]
async fn slow_earlier_result_is_discarded() {
    let mut h = Harness::new(|src| {
        let delay = if src.starts_with("slow") { 300 } else { 10 };
        (Duration::from_millis(delay), Ok(format!("{src};")))
    });
    h.scheduler.on_edit(&mut h.session, "slow".into());
    let Ok(Outcome::Started(first)) = h.scheduler.format_now(&mut h.session) else {
        panic!("first format should start");
    };
    let Ok(Outcome::Started(second)) = h.scheduler.load_text(&mut h.session, "fast".into(), None) else {
        panic!("second format should start");
    };
    assert!(second > first);

    assert_eq!(h.pump().await, Outcome::Formatted);
    assert_eq!(h.pump().await, Outcome::Stale(first));
    assert_eq!(h.session.output().text(), "fast;");
    assert_eq!(h.scheduler.latest_token(), Some(second));
}

#[tokio::test(start_paused = true)]
async fn formatted_status_reverts_after_two_seconds() {
    let mut h = Harness::new(tidy);
    h.scheduler.on_edit(&mut h.session, "let a=2".into());
    h.scheduler.format_now(&mut h.session).unwrap();
    assert_eq!(h.pump().await, Outcome::Formatted);
    let formatted_at = Instant::now();

    assert_eq!(h.pump().await, Outcome::StatusReverted);
    let waited = formatted_at.elapsed();
    assert!(waited >= Duration::from_millis(2000) && waited < Duration::from_millis(2100), "{waited:?}");
    assert_eq!(h.session.status(), Status::Ready);
    // the output outlives the status
    assert_eq!(h.session.formatted_output().unwrap(), "let a = 2;");
}

#[tokio::test(start_paused = true)]
async fn failure_shows_placeholder_and_error_line() {
    let mut h = Harness::new(|_| {
        let raw = "SyntaxError: Unexpected token (2:5)\n  1 | a\n> 2 | let =\n    |     ^";
        (Duration::from_millis(5), Err(EngineError::new(raw)))
    });
    h.scheduler.on_edit(&mut h.session, "a\nlet =".into());
    h.scheduler.format_now(&mut h.session).unwrap();

    let Outcome::Failed(report) = h.pump().await else { panic!("expected failure") };
    assert_eq!(report.short_message, "SyntaxError: Unexpected token (2:5)");
    assert_eq!(report.line, Some(2));
    assert!(h.session.output().is_placeholder());
    assert_eq!(h.session.error_line(), Some(2));
    assert!(matches!(h.session.formatted_output(), Err(PipelineError::NoOutput)));
    let failed_at = Instant::now();

    assert_eq!(h.pump().await, Outcome::StatusReverted);
    assert!(failed_at.elapsed() >= Duration::from_millis(5000));
    // placeholder stays after the status reverts
    assert!(h.session.output().is_placeholder());
}

#[tokio::test(start_paused = true)]
async fn oversize_input_never_reaches_the_engine() {
    let mut h = Harness::new(tidy);
    h.scheduler.on_edit(&mut h.session, "a".repeat(MAX_INPUT_CHARS + 1));
    let err = h.scheduler.format_now(&mut h.session).unwrap_err();
    assert!(matches!(err, PipelineError::InputTooLarge { len, .. } if len == MAX_INPUT_CHARS + 1));
    assert_eq!(h.calls(), 0);
    assert_eq!(h.session.status(), Status::Error);
    assert!(h.session.output().is_placeholder());

    h.scheduler.on_edit(&mut h.session, "a".repeat(MAX_INPUT_CHARS));
    assert!(matches!(h.scheduler.format_now(&mut h.session), Ok(Outcome::Started(_))));
    assert_eq!(h.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn load_text_rejects_oversize_without_touching_session() {
    let mut h = Harness::new(tidy);
    h.scheduler.on_edit(&mut h.session, "keep me".into());
    let err = h
        .scheduler
        .load_text(&mut h.session, "b".repeat(MAX_INPUT_CHARS + 1), Some(LanguageSelection::Fixed(Dialect::Tsx)))
        .unwrap_err();
    assert!(matches!(err, PipelineError::InputTooLarge { .. }));
    assert_eq!(h.session.input(), "keep me");
    assert_eq!(h.session.selection(), LanguageSelection::Auto);
}

#[tokio::test(start_paused = true)]
async fn blank_input_clears_without_engine_call() {
    let mut h = Harness::new(tidy);
    h.scheduler.on_edit(&mut h.session, "   \n\t ".into());
    assert_eq!(h.scheduler.format_now(&mut h.session).unwrap(), Outcome::Cleared);
    assert_eq!(h.calls(), 0);
    assert_eq!(h.session.output(), &Output::Empty);
    assert_eq!(h.session.status(), Status::Ready);
}

#[tokio::test(start_paused = true)]
async fn end_to_end_diff_of_single_statement() {
    let mut h = Harness::new(tidy);
    h.scheduler.on_edit(&mut h.session, "const x=1".into());
    h.scheduler.format_now(&mut h.session).unwrap();
    assert_eq!(h.pump().await, Outcome::Formatted);
    assert_eq!(h.session.effective_dialect(), Dialect::JavaScript);

    h.session.toggle_view();
    let diff = h.session.diff().expect("diff view has a mapping");
    let classes: Vec<_> = diff.iter().map(|r| (r.class, r.line_number)).collect();
    assert_eq!(classes, vec![(LineClass::Removed, None), (LineClass::Added, Some(1))]);
    assert_eq!(diff[1].text, "const x = 1;");
}

#[tokio::test(start_paused = true)]
async fn clear_invalidates_in_flight_format() {
    let mut h = Harness::new(tidy);
    h.scheduler.on_edit(&mut h.session, "let y=3".into());
    let Ok(Outcome::Started(token)) = h.scheduler.format_now(&mut h.session) else {
        panic!("format should start");
    };
    h.scheduler.clear(&mut h.session);
    assert_eq!(h.pump().await, Outcome::Stale(token));
    assert_eq!(h.session.input(), "");
    assert_eq!(h.session.output(), &Output::Empty);
}

#[tokio::test(start_paused = true)]
async fn manual_format_supersedes_fired_debounce() {
    let mut h = Harness::new(tidy);
    h.scheduler.on_edit(&mut h.session, "let z=4".into());
    let debounce = h.next().await;
    assert!(matches!(debounce, SchedulerEvent::DebounceElapsed { .. }));

    h.scheduler.format_now(&mut h.session).unwrap();
    assert_eq!(h.scheduler.handle(&mut h.session, debounce).unwrap(), Outcome::Idle);
    assert_eq!(h.pump().await, Outcome::Formatted);
    assert_eq!(h.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn unchanged_options_do_not_rearm_debounce() {
    let mut h = Harness::new(tidy);
    h.scheduler.on_options_change(&mut h.session, FormatOptions::default());
    assert!(!h.scheduler.is_debouncing());

    let wider = FormatOptions::default().with_print_width_step(true);
    h.scheduler.on_options_change(&mut h.session, wider);
    assert!(h.scheduler.is_debouncing());
    assert_eq!(h.session.options().print_width, 90);
}

#[tokio::test(start_paused = true)]
async fn language_change_waits_for_confirmation() {
    let mut h = Harness::new(tidy);
    let mut picker = LanguagePicker::default();
    h.scheduler.on_edit(&mut h.session, "let a = 1".into());

    let change = picker.select(LanguageSelection::Fixed(Dialect::Tsx), h.session.input().is_empty());
    assert_eq!(change, LanguageChange::AwaitConfirmation(Dialect::Tsx));
    assert_eq!(h.scheduler.apply_language(&mut h.session, change).unwrap(), Outcome::AwaitingConfirmation);
    assert_eq!(h.session.input(), "let a = 1");

    let change = picker.resolve(Resolution::LoadSample);
    assert!(matches!(h.scheduler.apply_language(&mut h.session, change), Ok(Outcome::Started(_))));
    assert_eq!(h.session.input(), sample_for(Dialect::Tsx));
    assert_eq!(h.session.selection(), LanguageSelection::Fixed(Dialect::Tsx));
    assert_eq!(h.engine.seen.lock().unwrap()[0].dialect, Dialect::Tsx);
}

#[tokio::test(start_paused = true)]
async fn shutdown_cancels_pending_alarms() {
    let mut h = Harness::new(tidy);
    h.scheduler.on_edit(&mut h.session, "let s=1".into());
    h.scheduler.format_now(&mut h.session).unwrap();
    assert_eq!(h.pump().await, Outcome::Formatted);
    // status alarm pending; arm a fresh debounce on top
    h.scheduler.on_edit(&mut h.session, "let s=2".into());
    assert!(h.scheduler.is_debouncing());

    h.scheduler.shutdown();
    assert!(!h.scheduler.is_debouncing());
    tokio::time::advance(Duration::from_secs(10)).await;
    assert!(matches!(h.events.try_recv(), Err(TryRecvError::Empty)));
    assert_eq!(h.session.status(), Status::Formatted);
    assert_eq!(h.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn dropping_the_scheduler_cancels_alarms() {
    let Harness { mut scheduler, mut events, mut session, .. } = Harness::new(tidy);
    scheduler.on_edit(&mut session, "let d=1".into());
    drop(scheduler);
    tokio::time::advance(Duration::from_secs(10)).await;
    assert!(events.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn output_resembling_placeholder_can_be_copied() {
    let mut h = Harness::new(|src| (Duration::from_millis(5), Ok(src.to_owned())));
    let source = "// Formatting failed before, fixed in v2\nconst a = 1;";
    h.scheduler.on_edit(&mut h.session, source.into());
    h.scheduler.format_now(&mut h.session).unwrap();
    assert_eq!(h.pump().await, Outcome::Formatted);
    assert!(!h.session.output().is_placeholder());
    assert_eq!(h.session.formatted_output().unwrap(), source);
}
