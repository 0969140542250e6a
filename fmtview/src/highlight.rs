//! Syntax highlighting and word-level diff emphasis for the output panel.

use std::sync::LazyLock;

use fmtview_core::Dialect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;
use similar::{ChangeTag, TextDiff};
use syntect::easy::HighlightLines;
use syntect::highlighting::ThemeSet;
use syntect::parsing::{SyntaxReference, SyntaxSet};

use crate::theme::Theme;

static PS: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_nonewlines);
static TS: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

/// The default syntax set has no TypeScript grammar; JavaScript is close
/// enough for every dialect.
fn syntax_for(dialect: Dialect) -> &'static SyntaxReference {
    PS.find_syntax_by_extension(dialect.extension())
        .or_else(|| PS.find_syntax_by_extension("js"))
        .unwrap_or_else(|| PS.find_syntax_plain_text())
}

/// Converts a syntect (Style, &str) pair to an owned ratatui Span.
fn syntect_to_span(style: syntect::highlighting::Style, content: &str) -> Span<'static> {
    use syntect::highlighting::{Color as SC, FontStyle};
    let to_color = |c: SC| -> Option<Color> {
        if c.a > 0 { Some(Color::Rgb(c.r, c.g, c.b)) } else { None }
    };
    let mut ratatui_style = Style::default();
    if let Some(fg) = to_color(style.foreground) {
        ratatui_style = ratatui_style.fg(fg);
    }
    if style.font_style.contains(FontStyle::BOLD) {
        ratatui_style = ratatui_style.add_modifier(Modifier::BOLD);
    }
    if style.font_style.contains(FontStyle::ITALIC) {
        ratatui_style = ratatui_style.add_modifier(Modifier::ITALIC);
    }
    if style.font_style.contains(FontStyle::UNDERLINE) {
        ratatui_style = ratatui_style.add_modifier(Modifier::UNDERLINED);
    }
    Span::styled(content.to_owned(), ratatui_style)
}

/// Highlights `text` line by line with one highlighter, so multi-line
/// constructs (block comments, template literals) keep their state.
///
/// Falls back to unstyled spans when the theme is missing or a line fails.
pub fn highlight_text(text: &str, dialect: Dialect, theme_name: &str) -> Vec<Vec<Span<'static>>> {
    let lines = text.split('\n');
    let Some(theme) = TS.themes.get(theme_name).or_else(|| TS.themes.values().next()) else {
        return lines.map(|l| vec![Span::raw(l.to_owned())]).collect();
    };
    let mut h = HighlightLines::new(syntax_for(dialect), theme);
    lines
        .map(|line| match h.highlight_line(line, &PS) {
            Ok(ranges) if !ranges.is_empty() => {
                ranges.into_iter().map(|(style, s)| syntect_to_span(style, s)).collect()
            }
            _ => vec![Span::raw(line.to_owned())],
        })
        .collect()
}

/// Highlighted plain-view lines, recomputed only when the output changes.
#[derive(Default)]
pub struct HighlightCache {
    key: Option<(String, Dialect)>,
    lines: Vec<Vec<Span<'static>>>,
}

impl HighlightCache {
    pub fn lines(&mut self, text: &str, dialect: Dialect, theme: &Theme) -> &[Vec<Span<'static>>] {
        let fresh = matches!(&self.key, Some((t, d)) if t == text && *d == dialect);
        if !fresh {
            self.lines = highlight_text(text, dialect, theme.syntax_theme);
            self.key = Some((text.to_owned(), dialect));
        }
        &self.lines
    }
}

/// Word-level spans for a removed/added line pair.
///
/// Returns (old spans, new spans). Changed words are bold in the diff colour;
/// shared words are dimmed.
pub fn word_diff_spans(
    old_line: &str,
    new_line: &str,
    theme: &Theme,
) -> (Vec<Span<'static>>, Vec<Span<'static>>) {
    let diff = TextDiff::from_words(old_line, new_line);
    let mut old_spans: Vec<Span<'static>> = Vec::new();
    let mut new_spans: Vec<Span<'static>> = Vec::new();

    for op in diff.ops() {
        for change in diff.iter_inline_changes(op) {
            for (emphasized, value) in change.iter_strings_lossy() {
                let text = value.into_owned();
                match change.tag() {
                    ChangeTag::Delete => {
                        let mut style = Style::default().fg(theme.diff_removed);
                        if emphasized {
                            style = style.add_modifier(Modifier::BOLD);
                        }
                        old_spans.push(Span::styled(text, style));
                    }
                    ChangeTag::Insert => {
                        let mut style = Style::default().fg(theme.diff_added);
                        if emphasized {
                            style = style.add_modifier(Modifier::BOLD);
                        }
                        new_spans.push(Span::styled(text, style));
                    }
                    ChangeTag::Equal => {
                        let span = Span::styled(text, Style::default().fg(theme.gutter));
                        old_spans.push(span.clone());
                        new_spans.push(span);
                    }
                }
            }
        }
    }
    (old_spans, new_spans)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn joined(spans: &[Span<'_>]) -> String {
        spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn highlighting_keeps_line_text() {
        let lines = highlight_text("const x = 1;\n// done", Dialect::TypeScript, "base16-ocean.dark");
        assert_eq!(lines.len(), 2);
        assert_eq!(joined(&lines[0]), "const x = 1;");
        assert_eq!(joined(&lines[1]), "// done");
    }

    #[test]
    fn word_diff_reassembles_both_sides() {
        let (old, new) = word_diff_spans("const x=1", "const x = 1;", &Theme::dark());
        assert_eq!(joined(&old), "const x=1");
        assert_eq!(joined(&new), "const x = 1;");
    }

    #[test]
    fn cache_recomputes_on_change() {
        let theme = Theme::dark();
        let mut cache = HighlightCache::default();
        assert_eq!(cache.lines("a", Dialect::JavaScript, &theme).len(), 1);
        assert_eq!(cache.lines("a\nb", Dialect::JavaScript, &theme).len(), 2);
    }
}
