//! Per-document session state.
//!
//! Exactly one `Session` exists per open document. It is created empty and
//! mutated in place, either by the [`crate::scheduler::FormatScheduler`]
//! (format lifecycle) or by explicit user actions routed through it. Read
//! access is through getters so the output/status invariants cannot be
//! broken from outside the crate.

use crate::dialect::{Dialect, LanguageSelection};
use crate::diff::{build_diff, plain_lines, DiffLineRecord, DiffMapping, DiffStats};
use crate::error::PipelineError;
use crate::interpret::ErrorReport;
use crate::options::FormatOptions;

/// First line of every error placeholder.
pub const ERROR_PLACEHOLDER_PREFIX: &str = "// Formatting failed";

/// What the output panel currently holds.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Output {
    #[default]
    Empty,
    /// Real formatter output, trailing whitespace trimmed.
    Formatted(String),
    /// Synthesized two-line comment shown after a failure.
    ErrorPlaceholder(String),
}

impl Output {
    pub fn text(&self) -> &str {
        match self {
            Output::Empty => "",
            Output::Formatted(t) | Output::ErrorPlaceholder(t) => t,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Output::ErrorPlaceholder(_))
    }
}

/// Builds the placeholder shown in place of formatter output.
pub fn error_placeholder(short_message: &str) -> String {
    format!("{ERROR_PLACEHOLDER_PREFIX}\n// {short_message}")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Plain,
    Diff,
}

/// Transient format status shown in the status bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Ready,
    Formatting,
    Formatted,
    Error,
}

#[derive(Debug, Default)]
pub struct Session {
    input: String,
    output: Output,
    /// Last successful formatter output, kept apart from `output` so the diff
    /// can be recomputed on view toggle without reformatting.
    last_formatted: Option<String>,
    selection: LanguageSelection,
    effective_dialect: Dialect,
    options: FormatOptions,
    view_mode: ViewMode,
    /// Present only while `view_mode` is `Diff` and a successful format exists.
    diff: Option<DiffMapping>,
    status: Status,
    /// Bumped on every status change; reversion alarms carry the value they
    /// were armed for.
    status_generation: u64,
    error: Option<ErrorReport>,
}

impl Session {
    pub fn new(options: FormatOptions, selection: LanguageSelection) -> Self {
        Self { options, selection, ..Self::default() }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn output(&self) -> &Output {
        &self.output
    }

    pub fn last_formatted(&self) -> Option<&str> {
        self.last_formatted.as_deref()
    }

    pub fn selection(&self) -> LanguageSelection {
        self.selection
    }

    /// Dialect used by the most recent format, or the fixed selection when one
    /// was made since. `Auto` is only resolved when a format starts.
    pub fn effective_dialect(&self) -> Dialect {
        self.effective_dialect
    }

    pub fn options(&self) -> FormatOptions {
        self.options
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn diff(&self) -> Option<&[DiffLineRecord]> {
        self.diff.as_ref().map(|m| m.records.as_slice())
    }

    pub fn diff_mapping(&self) -> Option<&DiffMapping> {
        self.diff.as_ref()
    }

    pub fn diff_stats(&self) -> Option<DiffStats> {
        self.diff.as_ref().map(DiffMapping::stats)
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn error(&self) -> Option<&ErrorReport> {
        self.error.as_ref()
    }

    /// 1-based input line to highlight, while an error placeholder is shown.
    pub fn error_line(&self) -> Option<usize> {
        if self.output.is_placeholder() {
            self.error.as_ref().and_then(|e| e.line)
        } else {
            None
        }
    }

    /// Display records for the output panel in the current view mode.
    ///
    /// Plain view numbers every output line; diff view returns the mapping.
    pub fn display_lines(&self) -> Vec<DiffLineRecord> {
        match (&self.view_mode, &self.diff) {
            (ViewMode::Diff, Some(mapping)) => mapping.records.clone(),
            _ => plain_lines(self.output.text()),
        }
    }

    /// Real formatter output, or `NoOutput` when empty or a placeholder.
    /// Decided by the output tag alone, whatever the text says.
    pub fn formatted_output(&self) -> Result<&str, PipelineError> {
        match &self.output {
            Output::Formatted(t) if !t.is_empty() => Ok(t),
            _ => Err(PipelineError::NoOutput),
        }
    }

    /// Switches between plain and diff view.
    pub fn toggle_view(&mut self) {
        self.view_mode = match self.view_mode {
            ViewMode::Plain => ViewMode::Diff,
            ViewMode::Diff => ViewMode::Plain,
        };
        self.refresh_diff();
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.view_mode = mode;
        self.refresh_diff();
    }

    pub(crate) fn set_selection(&mut self, selection: LanguageSelection) {
        self.selection = selection;
        if let LanguageSelection::Fixed(dialect) = selection {
            self.effective_dialect = dialect;
        }
    }

    /// Stores the text only; detection waits for the next format.
    pub(crate) fn set_input(&mut self, text: String) {
        self.input = text;
    }

    pub(crate) fn set_options(&mut self, options: FormatOptions) {
        self.options = options;
    }

    /// Recomputes the diff mapping in diff view, discards it in plain view.
    fn refresh_diff(&mut self) {
        self.diff = match (self.view_mode, &self.last_formatted) {
            (ViewMode::Diff, Some(formatted)) => Some(build_diff(&self.input, formatted)),
            _ => None,
        };
    }

    fn set_status(&mut self, status: Status) -> u64 {
        self.status = status;
        self.status_generation += 1;
        self.status_generation
    }

    pub(crate) fn begin_format(&mut self, dialect: Dialect) -> u64 {
        self.effective_dialect = dialect;
        self.set_status(Status::Formatting)
    }

    pub(crate) fn apply_success(&mut self, formatted: &str) -> u64 {
        if formatted.is_empty() {
            return self.apply_empty();
        }
        self.output = Output::Formatted(formatted.to_owned());
        self.last_formatted = Some(formatted.to_owned());
        self.error = None;
        self.refresh_diff();
        self.set_status(Status::Formatted)
    }

    /// Replaces the output with a placeholder. The previous good output is
    /// not retained.
    pub(crate) fn apply_failure(&mut self, report: ErrorReport) -> u64 {
        self.output = Output::ErrorPlaceholder(error_placeholder(&report.short_message));
        self.last_formatted = None;
        self.diff = None;
        self.error = Some(report);
        self.set_status(Status::Error)
    }

    pub(crate) fn apply_empty(&mut self) -> u64 {
        self.output = Output::Empty;
        self.last_formatted = None;
        self.diff = None;
        self.error = None;
        self.set_status(Status::Ready)
    }

    /// Reverts to `Ready` if `generation` is still the current status.
    pub(crate) fn expire_status(&mut self, generation: u64) -> bool {
        if generation == self.status_generation && self.status != Status::Ready {
            self.status = Status::Ready;
            true
        } else {
            false
        }
    }

    pub(crate) fn clear(&mut self) {
        self.input.clear();
        self.apply_empty();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::{formatted_side, LineClass};

    #[test]
    fn placeholder_is_flagged_and_refused() {
        let mut s = Session::default();
        s.set_input("let =".into());
        s.apply_failure(ErrorReport { short_message: "Unexpected token (1:5)".into(), line: Some(1) });
        assert!(s.output().is_placeholder());
        assert!(s.output().text().starts_with(ERROR_PLACEHOLDER_PREFIX));
        assert_eq!(s.output().text().lines().count(), 2);
        assert!(matches!(s.formatted_output(), Err(PipelineError::NoOutput)));
        assert_eq!(s.error_line(), Some(1));
        assert_eq!(s.status(), Status::Error);
    }

    #[test]
    fn failure_discards_last_good_output() {
        let mut s = Session::default();
        s.set_input("a".into());
        s.apply_success("a;");
        assert_eq!(s.formatted_output().unwrap(), "a;");
        s.apply_failure(ErrorReport { short_message: "bad".into(), line: None });
        assert_eq!(s.last_formatted(), None);
        assert!(s.formatted_output().is_err());
    }

    #[test]
    fn diff_follows_view_mode() {
        let mut s = Session::default();
        s.set_input("const x=1".into());
        s.apply_success("const x = 1;");
        assert!(s.diff().is_none());
        s.toggle_view();
        let diff = s.diff().expect("diff computed on entering diff view");
        assert_eq!(diff.len(), 2);
        assert_eq!(diff[0].class, LineClass::Removed);
        assert_eq!(diff[1].class, LineClass::Added);
        assert_eq!(s.diff_stats(), Some(DiffStats { added: 1, removed: 1 }));
        let mapping = s.diff_mapping().expect("mapping kept with records");
        assert_eq!(formatted_side(mapping), s.formatted_output().unwrap());
        s.toggle_view();
        assert!(s.diff().is_none());
        assert_eq!(s.display_lines().len(), 1);
    }

    #[test]
    fn status_expiry_respects_generation() {
        let mut s = Session::default();
        let first = s.apply_success("x");
        let second = s.begin_format(Dialect::JavaScript);
        assert!(!s.expire_status(first));
        assert_eq!(s.status(), Status::Formatting);
        assert!(s.expire_status(second));
        assert_eq!(s.status(), Status::Ready);
    }

    #[test]
    fn clear_empties_everything() {
        let mut s = Session::default();
        s.set_input("x".into());
        s.apply_success("x;");
        s.clear();
        assert_eq!(s.input(), "");
        assert_eq!(s.output(), &Output::Empty);
        assert_eq!(s.status(), Status::Ready);
    }

    #[test]
    fn real_output_resembling_placeholder_is_usable() {
        let mut s = Session::default();
        let text = "// Formatting failed before, fixed in v2\nconst a = 1;";
        s.set_input(text.into());
        s.apply_success(text);
        assert!(!s.output().is_placeholder());
        assert_eq!(s.formatted_output().unwrap(), text);
    }

    #[test]
    fn edits_defer_detection_until_format() {
        let mut s = Session::default();
        s.set_input("let a: string = ''".into());
        assert_eq!(s.effective_dialect(), Dialect::JavaScript);
        s.begin_format(s.selection().resolve(s.input()));
        assert_eq!(s.effective_dialect(), Dialect::TypeScript);

        s.set_selection(LanguageSelection::Fixed(Dialect::Jsx));
        assert_eq!(s.effective_dialect(), Dialect::Jsx);
        s.set_input("let b: number = 1".into());
        assert_eq!(s.effective_dialect(), Dialect::Jsx);

        // switching back to auto keeps the last dialect until the next format
        s.set_selection(LanguageSelection::Auto);
        assert_eq!(s.effective_dialect(), Dialect::Jsx);
    }
}
