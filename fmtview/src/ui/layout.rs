//! Responsive two-panel layout for fmtview.
//!
//! Pure layout arithmetic plus the shared panel chrome. Called inside
//! `terminal.draw()` on every render so every frame reflects the current
//! terminal size.
//!
//! At `>= 100` columns the input and output panels sit side by side; below
//! that they stack vertically. `Spacing::Overlap(1)` with
//! `MergeStrategy::Fuzzy` lets adjacent borders share one cell.

use fmtview_core::session::Status;
use fmtview_core::LanguageSelection;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Margin, Rect, Spacing},
    style::{Modifier, Style},
    symbols::merge::MergeStrategy,
    text::{Line, Span},
    widgets::{Block, BorderType, Paragraph},
};

use crate::app::{AppState, Mode, NoticeKind};
use crate::theme::Theme;

pub const SIDE_BY_SIDE_MIN_WIDTH: u16 = 100;

/// Returns `[input, output, status_bar]` for the current frame.
pub fn compute_layout(frame: &Frame) -> [Rect; 3] {
    let area = frame.area();
    let [main_area, status_bar] =
        area.layout(&Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]));

    let split = if area.width >= SIDE_BY_SIDE_MIN_WIDTH {
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
    } else {
        Layout::vertical([Constraint::Percentage(50), Constraint::Percentage(50)])
    };
    let [input, output] = main_area.layout(&split.spacing(Spacing::Overlap(1)));

    [input, output, status_bar]
}

/// Inner `Rect` of a panel after removing the 1-cell border.
pub fn inner_rect(area: Rect) -> Rect {
    area.inner(Margin { vertical: 1, horizontal: 1 })
}

/// Bordered `Block` for a panel: thick and highlighted when focused.
pub fn panel_block<'a>(title: Line<'a>, is_focused: bool, theme: &Theme) -> Block<'a> {
    let border_style = if is_focused {
        Style::default().fg(theme.border_active)
    } else {
        Style::default().fg(theme.border_inactive)
    };
    let border_type = if is_focused { BorderType::Thick } else { BorderType::Plain };

    Block::bordered()
        .title(title)
        .border_type(border_type)
        .border_style(border_style)
        .merge_borders(MergeStrategy::Fuzzy)
}

/// Width of a line-number gutter for `count` lines, including one space of padding.
pub fn gutter_width(count: usize) -> usize {
    count.max(1).to_string().len() + 1
}

/// Renders the 1-row status bar.
///
/// Left to right: mode, effective dialect (marked `auto` when detected),
/// options summary, format status. The transient notice, if any, is
/// appended at the end.
pub fn render_status_bar(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let (mode_text, mode_fg) = match state.mode {
        Mode::Insert => (" INSERT ", theme.status_mode_insert),
        Mode::OpenFile => (" OPEN ", theme.status_mode_insert),
        Mode::Normal | Mode::HelpOverlay | Mode::ConfirmLanguage => {
            (" NORMAL ", theme.status_mode_normal)
        }
    };

    let session = &state.session;
    let dialect = match session.selection() {
        LanguageSelection::Auto => format!("{} (auto)", session.effective_dialect()),
        LanguageSelection::Fixed(d) => d.to_string(),
    };

    let (status_text, status_fg) = match session.status() {
        Status::Ready => ("Ready".to_owned(), theme.status_bar_fg),
        Status::Formatting => ("Formatting…".to_owned(), theme.status_formatting),
        Status::Formatted => ("Formatted".to_owned(), theme.status_formatted),
        Status::Error => match session.error().and_then(|e| e.line) {
            Some(line) => (format!("Error at line {line}"), theme.status_error),
            None => ("Error".to_owned(), theme.status_error),
        },
    };

    let sep = || Span::raw(" │ ");
    let mut spans = vec![
        Span::styled(mode_text, Style::default().fg(mode_fg).add_modifier(Modifier::BOLD)),
        Span::raw(" "),
        Span::raw(dialect),
        sep(),
        Span::raw(session.options().to_string()),
        sep(),
        Span::styled(status_text, Style::default().fg(status_fg)),
    ];
    if let Some(notice) = &state.notice {
        let fg = match notice.kind {
            NoticeKind::Info => theme.notice_info,
            NoticeKind::Error => theme.status_error,
        };
        spans.push(sep());
        spans.push(Span::styled(notice.text.clone(), Style::default().fg(fg)));
    }

    frame.render_widget(
        Paragraph::new(Line::from(spans))
            .style(Style::default().bg(theme.status_bar_bg).fg(theme.status_bar_fg)),
        area,
    );
}
