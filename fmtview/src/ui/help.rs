//! Help overlay renderer for fmtview.
//!
//! Draws a centred modal over the panels, erasing the background with
//! `Clear` first, inside the same `terminal.draw()` closure as everything
//! else.

use ratatui::{
    Frame,
    layout::Constraint,
    text::{Line, Text},
    widgets::{Block, Clear, Paragraph, Wrap},
};

use crate::theme::Theme;

/// Renders the help overlay scrolled by `help_scroll` rows.
///
/// Skipped on terminals narrower than 60 columns.
pub fn render_help_overlay(frame: &mut Frame, theme: &Theme, help_scroll: u16) {
    if frame.area().width < 60 {
        return;
    }

    let overlay_area = frame
        .area()
        .centered(Constraint::Percentage(80), Constraint::Percentage(80));
    frame.render_widget(Clear, overlay_area);

    let block = Block::bordered()
        .title(" Help · j/k scroll, ? or Esc to dismiss ")
        .border_style(ratatui::style::Style::default().fg(theme.border_active));

    frame.render_widget(
        Paragraph::new(build_help_text())
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((help_scroll, 0)),
        overlay_area,
    );
}

fn build_help_text() -> Text<'static> {
    Text::from(vec![
        Line::from("Anywhere"),
        Line::from("  Ctrl-r        Format now"),
        Line::from("  Ctrl-y        Copy formatted output"),
        Line::from("  Ctrl-s        Save output to formatted.<ext>"),
        Line::from("  Ctrl-c        Quit"),
        Line::from(""),
        Line::from("Editing"),
        Line::from("  i / Enter     Edit input (insert mode)"),
        Line::from("  Esc           Back to normal mode"),
        Line::from("  Paste         Terminal paste replaces the input"),
        Line::from(""),
        Line::from("Output"),
        Line::from("  v             Toggle plain / diff view"),
        Line::from(""),
        Line::from("Language"),
        Line::from("  0             Auto-detect"),
        Line::from("  1 2 3 4       JavaScript, JSX, TypeScript, TSX"),
        Line::from("                (asks before replacing non-empty input with a sample)"),
        Line::from(""),
        Line::from("Options"),
        Line::from("  t             Cycle tab width (2, 4, 8)"),
        Line::from("  + / -         Print width up / down by 10"),
        Line::from("  c             Cycle trailing commas"),
        Line::from("  ;             Toggle semicolons"),
        Line::from("  '             Toggle single quotes"),
        Line::from(""),
        Line::from("Input"),
        Line::from("  o             Open a file (js, mjs, cjs, jsx, ts, tsx)"),
        Line::from("  p             Paste clipboard as input"),
        Line::from("  x             Clear input and output"),
        Line::from(""),
        Line::from("Navigation"),
        Line::from("  Tab           Switch panel focus"),
        Line::from("  j / k         Scroll down / up one line"),
        Line::from("  g / G         Jump to top / bottom"),
        Line::from("  Ctrl-d / u    Scroll half page down / up"),
        Line::from(""),
        Line::from("General"),
        Line::from("  ?             Open / close this help overlay"),
        Line::from("  q / Esc       Quit"),
    ])
}
