//! Output panel renderer.
//!
//! Uses a List with manual virtual scrolling: only records in
//! `output_scroll..output_scroll + viewport_height` are materialised per
//! frame. Plain view shows syntax-highlighted formatter output; diff view
//! shows the line mapping with `+`/`-` markers and formatted-side numbers.

use fmtview_core::diff::{DiffLineRecord, LineClass};
use fmtview_core::session::{Output, ViewMode};
use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{List, ListItem},
};

use crate::app::{AppState, PanelFocus};
use crate::highlight::word_diff_spans;
use crate::theme::Theme;
use crate::ui::layout::{gutter_width, inner_rect, panel_block};

fn title(state: &AppState) -> Line<'static> {
    match (state.session.view_mode(), state.session.diff_stats()) {
        (ViewMode::Diff, Some(stats)) => {
            Line::from(format!(" Output · diff +{} -{} ", stats.added, stats.removed))
        }
        (ViewMode::Diff, None) => Line::from(" Output · diff "),
        (ViewMode::Plain, _) => Line::from(" Output "),
    }
}

/// Clamps `scroll` and returns the visible `start..end` window.
fn window(scroll: usize, total: usize, height: usize) -> (usize, usize) {
    let start = scroll.min(total.saturating_sub(1));
    (start, (start + height).min(total))
}

pub fn render_output(frame: &mut Frame, area: Rect, state: &mut AppState, theme: &Theme) {
    let is_focused = state.focus == PanelFocus::Output;
    frame.render_widget(panel_block(title(state), is_focused, theme), area);
    let inner = inner_rect(area);
    let height = inner.height as usize;

    let items: Vec<ListItem> = match (state.session.output(), state.session.diff()) {
        (Output::Empty, _) => {
            let hint = Span::styled("Formatted output appears here", Style::default().fg(theme.gutter));
            vec![ListItem::new(Line::from(hint))]
        }
        (Output::ErrorPlaceholder(text), _) => text
            .lines()
            .map(|l| ListItem::new(Line::styled(l.to_owned(), Style::default().fg(theme.placeholder))))
            .collect(),
        (Output::Formatted(_), Some(records)) => {
            let (start, end) = window(state.output_scroll, records.len(), height);
            state.output_scroll = start;
            diff_items(records, start, end, theme)
        }
        (Output::Formatted(text), None) => {
            let dialect = state.session.effective_dialect();
            let highlighted = state.highlight.lines(text, dialect, theme);
            let (start, end) = window(state.output_scroll, highlighted.len(), height);
            state.output_scroll = start;
            let width = gutter_width(highlighted.len());
            highlighted[start..end]
                .iter()
                .enumerate()
                .map(|(offset, spans)| {
                    let gutter = format!("{:>w$} ", start + offset + 1, w = width - 1);
                    let mut line = vec![Span::styled(gutter, Style::default().fg(theme.gutter))];
                    line.extend(spans.iter().cloned());
                    ListItem::new(Line::from(line))
                })
                .collect()
        }
    };

    frame.render_widget(List::new(items), inner);
}

/// True when `records[i]` and `records[i + 1]` form an isolated
/// removed/added pair, i.e. a single line rewritten in place.
fn is_single_pair(records: &[DiffLineRecord], i: usize) -> bool {
    let class = |j: usize| records.get(j).map(|r| r.class);
    class(i) == Some(LineClass::Removed)
        && class(i + 1) == Some(LineClass::Added)
        && (i == 0 || class(i - 1) != Some(LineClass::Removed))
        && class(i + 2) != Some(LineClass::Added)
}

fn diff_items<'a>(records: &[DiffLineRecord], start: usize, end: usize, theme: &Theme) -> Vec<ListItem<'a>> {
    let width = gutter_width(records.iter().filter_map(|r| r.line_number).max().unwrap_or(1));
    let gutter_style = Style::default().fg(theme.gutter);

    (start..end)
        .map(|i| {
            let record = &records[i];
            let (marker, color) = match record.class {
                LineClass::Added => ("+ ", theme.diff_added),
                LineClass::Removed => ("- ", theme.diff_removed),
                LineClass::Unchanged => ("  ", theme.diff_context),
            };
            let number = record.line_number.map(|n| n.to_string()).unwrap_or_default();
            let mut spans = vec![
                Span::styled(format!("{number:>w$} ", w = width - 1), gutter_style),
                Span::styled(marker, Style::default().fg(color)),
            ];

            let paired = if is_single_pair(records, i) {
                Some(word_diff_spans(&record.text, &records[i + 1].text, theme).0)
            } else if i > 0 && is_single_pair(records, i - 1) {
                Some(word_diff_spans(&records[i - 1].text, &record.text, theme).1)
            } else {
                None
            };
            match paired {
                Some(words) => spans.extend(words),
                None => spans.push(Span::styled(record.text.clone(), Style::default().fg(color))),
            }
            ListItem::new(Line::from(spans))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use fmtview_core::build_diff;

    #[test]
    fn window_clamps_to_content() {
        assert_eq!(window(0, 5, 10), (0, 5));
        assert_eq!(window(8, 5, 10), (4, 5));
        assert_eq!(window(0, 0, 10), (0, 0));
    }

    #[test]
    fn single_rewritten_line_is_paired() {
        let records = build_diff("const x=1", "const x = 1;").records;
        assert!(is_single_pair(&records, 0));
        assert!(!is_single_pair(&records, 1));
    }

    #[test]
    fn multi_line_replacement_is_not_paired() {
        let records = build_diff("a\nb\n", "c\nd\n").records;
        assert!(!is_single_pair(&records, 0));
        assert!(!is_single_pair(&records, 1));
    }
}
