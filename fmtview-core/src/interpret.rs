//! Turns raw formatter error text into a short message and a source line.

use std::sync::LazyLock;

use regex::Regex;

const UNKNOWN_ERROR: &str = "Unknown error";

/// Interpreted formatter failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorReport {
    /// First line of the raw error text.
    pub short_message: String,
    /// 1-based line in the *input* text, when one could be extracted.
    pub line: Option<usize>,
}

// Tried in order; the first one that matches wins.
static LINE_PATTERNS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        // `Unexpected token (3:10)`
        Regex::new(r"\((\d+):\d+\)").expect("row:col pattern compiles"),
        // `... on line 3`
        Regex::new(r"(?i)\bline\s+(\d+)").expect("line pattern compiles"),
        // code-frame gutter `> 3 | const x =`
        Regex::new(r"(?m)>\s*(\d+)\s*\|").expect("gutter pattern compiles"),
    ]
});

fn extract_line(raw: &str) -> Option<usize> {
    LINE_PATTERNS.iter().find_map(|re| {
        re.captures(raw)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<usize>().ok())
    })
}

/// Interprets raw formatter error text. Never fails.
pub fn interpret(raw: &str) -> ErrorReport {
    let first = raw.lines().map(str::trim).find(|l| !l.is_empty()).unwrap_or("");
    let short_message = if first.is_empty() { UNKNOWN_ERROR.to_owned() } else { first.to_owned() };
    ErrorReport { short_message, line: extract_line(raw) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_col_pattern() {
        let r = interpret("Unexpected token (3:10)");
        assert_eq!(r.line, Some(3));
        assert_eq!(r.short_message, "Unexpected token (3:10)");
    }

    #[test]
    fn textual_line_pattern() {
        assert_eq!(interpret("SyntaxError on Line 12, column 4").line, Some(12));
    }

    #[test]
    fn gutter_pattern() {
        let raw = "SyntaxError: Missing semicolon.\n  1 | let a\n> 2 | let b c\n    |       ^";
        let r = interpret(raw);
        assert_eq!(r.line, Some(2));
        assert_eq!(r.short_message, "SyntaxError: Missing semicolon.");
    }

    #[test]
    fn row_col_beats_later_patterns() {
        assert_eq!(interpret("Unexpected (7:1)\nline 9\n> 11 |").line, Some(7));
    }

    #[test]
    fn empty_and_garbage_input() {
        let r = interpret("");
        assert_eq!(r.short_message, "Unknown error");
        assert_eq!(r.line, None);
        assert_eq!(interpret("boom").line, None);
        // overflowing numbers are ignored rather than panicking
        assert_eq!(interpret("(99999999999999999999999:1)").line, None);
    }
}
