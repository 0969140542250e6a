//! Small modal prompts: language-change confirmation and open-file path.

use fmtview_core::picker::PickerState;
use ratatui::{
    Frame,
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Clear, Paragraph, Wrap},
};

use crate::app::AppState;
use crate::theme::Theme;

fn modal(frame: &mut Frame, height: u16) -> Rect {
    let area = frame.area().centered(Constraint::Percentage(60), Constraint::Length(height));
    frame.render_widget(Clear, area);
    area
}

fn block<'a>(title: &'a str, theme: &Theme) -> Block<'a> {
    Block::bordered()
        .title(title)
        .border_style(Style::default().fg(theme.border_active))
}

pub fn render_language_confirm(frame: &mut Frame, state: &AppState, theme: &Theme) {
    let PickerState::AwaitingConfirmation { target } = state.picker.state() else {
        return;
    };
    let key = |k: &'static str| Span::styled(k, Style::default().add_modifier(Modifier::BOLD));
    let text = Text::from(vec![
        Line::from(format!("Switch to {target}. The input is not empty.")),
        Line::from(""),
        Line::from(vec![key("s"), Span::raw("  replace input with the sample")]),
        Line::from(vec![key("k"), Span::raw("  keep input, switch language")]),
        Line::from(vec![key("Esc"), Span::raw("  cancel")]),
    ]);
    let area = modal(frame, 7);
    frame.render_widget(
        Paragraph::new(text).block(block(" Change language ", theme)).wrap(Wrap { trim: false }),
        area,
    );
}

pub fn render_open_file(frame: &mut Frame, state: &AppState, theme: &Theme) {
    let area = modal(frame, 3);
    let line = Line::from(vec![Span::raw(state.open_path.as_str()), Span::raw("▏")]);
    frame.render_widget(
        Paragraph::new(line).block(block(" Open file · Enter to load, Esc to cancel ", theme)),
        area,
    );
}
