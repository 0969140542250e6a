//! Line-diff to display mapping.
//!
//! Produces one [`DiffLineRecord`] per displayed line so that the gutter can
//! show line numbers of the *formatted* text in either view. Removed lines do
//! not exist in the formatted output and therefore carry no number.

use similar::{Algorithm, ChangeTag, TextDiff};

/// How a displayed line relates to the original and formatted texts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineClass {
    Added,
    Removed,
    Unchanged,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffLineRecord {
    pub class: LineClass,
    /// Line content without its newline.
    pub text: String,
    /// 1-based line number in the formatted text; `None` for removed lines.
    pub line_number: Option<usize>,
}

/// Added/removed totals for a mapping, shown in the output panel title.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiffStats {
    pub added: usize,
    pub removed: usize,
}

impl DiffStats {
    pub fn from_records(records: &[DiffLineRecord]) -> Self {
        records.iter().fold(Self::default(), |mut s, r| {
            match r.class {
                LineClass::Added => s.added += 1,
                LineClass::Removed => s.removed += 1,
                LineClass::Unchanged => {}
            }
            s
        })
    }
}

/// Display records plus what the line split drops.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffMapping {
    pub records: Vec<DiffLineRecord>,
    /// The formatted text ended with `\n`.
    pub trailing_newline: bool,
}

impl DiffMapping {
    pub fn stats(&self) -> DiffStats {
        DiffStats::from_records(&self.records)
    }
}

/// Splits on `\n`, dropping the empty segment a final newline would leave behind.
fn split_lines(text: &str) -> Vec<&str> {
    let mut lines: Vec<&str> = text.split('\n').collect();
    if lines.last() == Some(&"") {
        lines.pop();
    }
    lines
}

/// Builds display records for `original` → `formatted` in hunk order.
///
/// Within a replaced region every removed line precedes the added lines that
/// replace it, so the sequence reads original-then-formatted top to bottom.
pub fn build_diff(original: &str, formatted: &str) -> DiffMapping {
    let old = split_lines(original);
    let new = split_lines(formatted);
    let diff = TextDiff::configure().algorithm(Algorithm::Myers).diff_slices(&old, &new);

    let mut records = Vec::with_capacity(old.len().max(new.len()));
    let mut next_number = 1usize;
    for change in diff.iter_all_changes() {
        let class = match change.tag() {
            ChangeTag::Delete => LineClass::Removed,
            ChangeTag::Insert => LineClass::Added,
            ChangeTag::Equal => LineClass::Unchanged,
        };
        let line_number = match class {
            LineClass::Removed => None,
            LineClass::Added | LineClass::Unchanged => {
                let n = next_number;
                next_number += 1;
                Some(n)
            }
        };
        records.push(DiffLineRecord { class, text: change.value().to_owned(), line_number });
    }
    DiffMapping { records, trailing_newline: formatted.ends_with('\n') }
}

/// Records for the plain view: every formatted line, numbered from 1.
pub fn plain_lines(text: &str) -> Vec<DiffLineRecord> {
    split_lines(text)
        .into_iter()
        .enumerate()
        .map(|(i, line)| DiffLineRecord {
            class: LineClass::Unchanged,
            text: line.to_owned(),
            line_number: Some(i + 1),
        })
        .collect()
}

/// Reassembles the formatted text from a mapping (added + unchanged lines).
pub fn formatted_side(mapping: &DiffMapping) -> String {
    let mut text = mapping
        .records
        .iter()
        .filter(|r| r.class != LineClass::Removed)
        .map(|r| r.text.as_str())
        .collect::<Vec<_>>()
        .join("\n");
    if mapping.trailing_newline {
        text.push('\n');
    }
    text
}
