//! Input panel: the editable source with a line-number gutter.
//!
//! The gutter cell of the line a formatter error points at is highlighted
//! while the error placeholder is showing.

use ratatui::{
    Frame,
    layout::{Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::app::{AppState, Mode, PanelFocus};
use crate::theme::Theme;
use crate::ui::layout::{gutter_width, inner_rect, panel_block};

/// Keeps `row` inside the `height`-row window starting at `scroll`.
fn follow(scroll: usize, row: usize, height: usize) -> usize {
    if height == 0 || row < scroll {
        row
    } else if row >= scroll + height {
        row + 1 - height
    } else {
        scroll
    }
}

pub fn render_input(frame: &mut Frame, area: Rect, state: &mut AppState, theme: &Theme) {
    let is_focused = state.focus == PanelFocus::Input;
    let title = if state.mode == Mode::Insert { " Input · insert " } else { " Input " };
    let block = panel_block(Line::from(title), is_focused, theme);
    let inner = inner_rect(area);
    frame.render_widget(block, area);

    let lines = state.editor.lines();
    let height = inner.height as usize;
    let (row, col) = state.editor.cursor();
    if state.mode == Mode::Insert {
        state.input_scroll = follow(state.input_scroll, row, height);
    }
    let start = state.input_scroll.min(lines.len().saturating_sub(1));
    let end = (start + height).min(lines.len());

    let width = gutter_width(lines.len());
    let error_line = state.session.error_line();
    let gutter_style = Style::default().fg(theme.gutter);
    let error_style = Style::default()
        .bg(theme.gutter_error)
        .fg(theme.status_bar_bg)
        .add_modifier(Modifier::BOLD);

    let rendered: Vec<Line> = lines[start..end]
        .iter()
        .enumerate()
        .map(|(offset, text)| {
            let number = start + offset + 1;
            let style = if error_line == Some(number) { error_style } else { gutter_style };
            Line::from(vec![
                Span::styled(format!("{number:>w$} ", w = width - 1), style),
                Span::raw(text.as_str()),
            ])
        })
        .collect();
    frame.render_widget(Paragraph::new(rendered), inner);

    if state.mode == Mode::Insert && row >= start && row < end {
        let x = inner.x as usize + width + col;
        let max_x = inner.right().saturating_sub(1) as usize;
        frame.set_cursor_position(Position {
            x: x.min(max_x) as u16,
            y: inner.y + (row - start) as u16,
        });
    }
}
