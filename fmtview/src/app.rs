//! Central application state for fmtview.
//!
//! `AppState` owns the document [`Session`], the [`FormatScheduler`] that
//! drives it, the input editor and every piece of UI state (mode, focus,
//! scroll offsets, prompts, the transient notice). Rendering reads it; the
//! keybinding dispatcher and the main loop mutate it. All session mutation
//! happens here, on the main loop's task.

use std::path::{Path, PathBuf};
use std::time::Duration;

use fmtview_core::files::{check_paste, load_source_file, write_download};
use fmtview_core::options::FormatOptions;
use fmtview_core::picker::{LanguageChange, LanguagePicker, Resolution};
use fmtview_core::scheduler::{FormatScheduler, Outcome, SchedulerEvent};
use fmtview_core::{LanguageSelection, PipelineError, Session};
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

use crate::clipboard::{ClipboardBridge, CopyTarget};
use crate::editor::Editor;
use crate::event::AppEvent;
use crate::highlight::HighlightCache;

const INFO_NOTICE: Duration = Duration::from_millis(3000);
const ERROR_NOTICE: Duration = Duration::from_millis(5000);

/// Which keybinding set is active.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Normal,
    /// Typing into the input editor.
    Insert,
    HelpOverlay,
    /// A fixed language was picked over non-empty input; waiting for the
    /// user to choose between loading the sample and keeping the input.
    ConfirmLanguage,
    /// Typing a path into the open-file prompt.
    OpenFile,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum PanelFocus {
    #[default]
    Input,
    Output,
}

impl PanelFocus {
    pub fn toggle(self) -> Self {
        match self {
            PanelFocus::Input => PanelFocus::Output,
            PanelFocus::Output => PanelFocus::Input,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

/// Short message shown on the right of the status bar until its alarm fires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    pub kind: NoticeKind,
}

pub struct AppState {
    pub mode: Mode,
    pub focus: PanelFocus,

    pub session: Session,
    pub scheduler: FormatScheduler,
    pub editor: Editor,
    pub picker: LanguagePicker,
    pub clipboard: ClipboardBridge,
    pub highlight: HighlightCache,

    /// First visible input line.
    pub input_scroll: usize,
    /// First visible output record.
    pub output_scroll: usize,
    pub help_scroll: u16,

    /// Inner panel heights, cached after each render for page scrolling.
    pub input_viewport_height: u16,
    pub output_viewport_height: u16,

    /// Path typed into the open-file prompt.
    pub open_path: String,

    pub notice: Option<Notice>,
    notice_generation: u64,
    notice_timer: Option<JoinHandle<()>>,
    events: UnboundedSender<AppEvent>,
    download_dir: PathBuf,
}

impl AppState {
    pub fn new(
        session: Session,
        scheduler: FormatScheduler,
        events: UnboundedSender<AppEvent>,
        download_dir: PathBuf,
    ) -> Self {
        Self {
            mode: Mode::default(),
            focus: PanelFocus::default(),
            session,
            scheduler,
            editor: Editor::default(),
            picker: LanguagePicker::default(),
            clipboard: ClipboardBridge::new(),
            highlight: HighlightCache::default(),
            input_scroll: 0,
            output_scroll: 0,
            help_scroll: 0,
            input_viewport_height: 0,
            output_viewport_height: 0,
            open_path: String::new(),
            notice: None,
            notice_generation: 0,
            notice_timer: None,
            events,
            download_dir,
        }
    }

    // -----------------------------------------------------------------------
    // Notices
    // -----------------------------------------------------------------------

    fn notify(&mut self, text: String, kind: NoticeKind) {
        self.cancel_notice_timer();
        self.notice_generation += 1;
        let generation = self.notice_generation;
        let after = match kind {
            NoticeKind::Info => INFO_NOTICE,
            NoticeKind::Error => ERROR_NOTICE,
        };
        self.notice = Some(Notice { text, kind });
        let events = self.events.clone();
        self.notice_timer = Some(tokio::spawn(async move {
            tokio::time::sleep(after).await;
            let _ = events.send(AppEvent::NoticeExpired { generation });
        }));
    }

    pub fn notify_info(&mut self, text: impl Into<String>) {
        self.notify(text.into(), NoticeKind::Info);
    }

    pub fn notify_error(&mut self, err: &PipelineError) {
        log::info!("notice: {err}");
        self.notify(err.to_string(), NoticeKind::Error);
    }

    /// Hides the notice if `generation` is still the one being shown.
    pub fn expire_notice(&mut self, generation: u64) {
        if generation == self.notice_generation {
            self.notice = None;
            self.notice_timer = None;
        }
    }

    fn cancel_notice_timer(&mut self) {
        if let Some(handle) = self.notice_timer.take() {
            handle.abort();
        }
    }

    fn report(&mut self, result: Result<Outcome, PipelineError>) {
        match result {
            Ok(Outcome::Failed(report)) => {
                self.notify_error(&PipelineError::FormatterFailure(report.short_message))
            }
            Ok(outcome) => log::debug!("scheduler: {outcome:?}"),
            Err(e) => self.notify_error(&e),
        }
    }

    // -----------------------------------------------------------------------
    // Format pipeline
    // -----------------------------------------------------------------------

    /// Re-seeds the editor after the input was replaced wholesale.
    fn sync_editor(&mut self) {
        self.editor.set_text(self.session.input());
        self.input_scroll = 0;
        self.output_scroll = 0;
    }

    /// Applies an editor mutation and, when the text changed, restarts the
    /// debounce with the new text.
    pub fn edit(&mut self, f: impl FnOnce(&mut Editor) -> bool) {
        if f(&mut self.editor) {
            self.scheduler.on_edit(&mut self.session, self.editor.text());
        }
    }

    pub fn format_now(&mut self) {
        let result = self.scheduler.format_now(&mut self.session);
        self.report(result);
    }

    pub fn handle_format_event(&mut self, event: SchedulerEvent) {
        let result = self.scheduler.handle(&mut self.session, event);
        self.report(result);
    }

    pub fn update_options(&mut self, f: impl FnOnce(FormatOptions) -> FormatOptions) {
        let options = f(self.session.options());
        self.scheduler.on_options_change(&mut self.session, options);
    }

    pub fn toggle_view(&mut self) {
        self.session.toggle_view();
        self.output_scroll = 0;
    }

    pub fn clear(&mut self) {
        self.scheduler.clear(&mut self.session);
        self.sync_editor();
    }

    // -----------------------------------------------------------------------
    // Language selection
    // -----------------------------------------------------------------------

    pub fn select_language(&mut self, selection: LanguageSelection) {
        let change = self.picker.select(selection, self.session.input().is_empty());
        self.apply_language(change);
    }

    pub fn resolve_language(&mut self, resolution: Resolution) {
        let change = self.picker.resolve(resolution);
        self.apply_language(change);
    }

    fn apply_language(&mut self, change: LanguageChange) {
        let replaces_input = matches!(change, LanguageChange::Apply { sample: Some(_), .. });
        let result = self.scheduler.apply_language(&mut self.session, change);
        self.mode = if self.picker.is_awaiting() { Mode::ConfirmLanguage } else { Mode::Normal };
        if replaces_input && result.is_ok() {
            self.sync_editor();
        }
        self.report(result);
    }

    // -----------------------------------------------------------------------
    // Files and clipboard
    // -----------------------------------------------------------------------

    /// Loads a source file; on any failure the session is left untouched.
    pub fn open_file(&mut self, path: &Path) {
        let loaded = match load_source_file(path) {
            Ok(loaded) => loaded,
            Err(e) => return self.notify_error(&e),
        };
        let selection = LanguageSelection::Fixed(loaded.dialect);
        match self.scheduler.load_text(&mut self.session, loaded.text, Some(selection)) {
            Ok(outcome) => {
                log::debug!("scheduler: {outcome:?}");
                self.sync_editor();
                self.notify_info(format!("Opened {}", loaded.path.display()));
            }
            Err(e) => self.notify_error(&e),
        }
    }

    pub fn submit_open_prompt(&mut self) {
        let path = std::mem::take(&mut self.open_path);
        self.mode = Mode::Normal;
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            self.open_file(Path::new(trimmed));
        }
    }

    /// Replaces the input with pasted text, after the size check.
    pub fn paste_text(&mut self, text: String) {
        if let Err(e) = check_paste(&text) {
            return self.notify_error(&e);
        }
        let result = self.scheduler.load_text(&mut self.session, text, None);
        if result.is_ok() {
            self.sync_editor();
        }
        self.report(result);
    }

    pub fn paste_from_clipboard(&mut self) {
        match self.clipboard.paste() {
            Ok(text) => self.paste_text(text),
            Err(e) => self.notify_error(&e),
        }
    }

    pub fn copy_output(&mut self) {
        let result = self
            .session
            .formatted_output()
            .map(str::to_owned)
            .and_then(|text| self.clipboard.copy(&text));
        match result {
            Ok(CopyTarget::System) => self.notify_info("Copied to clipboard"),
            Ok(CopyTarget::Terminal) => self.notify_info("Copied via terminal (OSC 52)"),
            Err(e) => self.notify_error(&e),
        }
    }

    pub fn download_output(&mut self) {
        match write_download(&self.session, &self.download_dir) {
            Ok(path) => self.notify_info(format!("Saved {}", path.display())),
            Err(e) => self.notify_error(&e),
        }
    }

    // -----------------------------------------------------------------------
    // Scrolling
    // -----------------------------------------------------------------------

    fn focused_len(&self) -> usize {
        match self.focus {
            PanelFocus::Input => self.editor.lines().len(),
            PanelFocus::Output => self.session.display_lines().len(),
        }
    }

    fn focused_scroll(&mut self) -> &mut usize {
        match self.focus {
            PanelFocus::Input => &mut self.input_scroll,
            PanelFocus::Output => &mut self.output_scroll,
        }
    }

    pub fn scroll_down(&mut self, lines: usize) {
        let max = self.focused_len().saturating_sub(1);
        let scroll = self.focused_scroll();
        *scroll = scroll.saturating_add(lines).min(max);
    }

    pub fn scroll_up(&mut self, lines: usize) {
        let scroll = self.focused_scroll();
        *scroll = scroll.saturating_sub(lines);
    }

    pub fn scroll_top(&mut self) {
        *self.focused_scroll() = 0;
    }

    pub fn scroll_bottom(&mut self) {
        let last = self.focused_len().saturating_sub(1);
        *self.focused_scroll() = last;
    }

    pub fn half_page(&self) -> usize {
        let height = match self.focus {
            PanelFocus::Input => self.input_viewport_height,
            PanelFocus::Output => self.output_viewport_height,
        };
        usize::from(height / 2).max(1)
    }

    /// Cancels every timer this state owns. Called once on quit.
    pub fn shutdown(&mut self) {
        self.scheduler.shutdown();
        self.cancel_notice_timer();
    }
}
