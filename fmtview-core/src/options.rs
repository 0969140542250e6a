//! Formatting options handed to the engine on every invocation.
//!
//! `FormatOptions` is `Copy` and treated as immutable per format call; the
//! mutators below return a new value, which the caller routes through
//! [`crate::scheduler::FormatScheduler::on_options_change`].

use std::fmt;

use serde::Deserialize;

pub const MIN_PRINT_WIDTH: u16 = 40;
pub const MAX_PRINT_WIDTH: u16 = 200;
const PRINT_WIDTH_STEP: u16 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "u8")]
pub enum TabWidth {
    #[default]
    Two,
    Four,
    Eight,
}

impl TabWidth {
    pub fn spaces(self) -> u8 {
        match self {
            TabWidth::Two => 2,
            TabWidth::Four => 4,
            TabWidth::Eight => 8,
        }
    }

    fn next(self) -> Self {
        match self {
            TabWidth::Two => TabWidth::Four,
            TabWidth::Four => TabWidth::Eight,
            TabWidth::Eight => TabWidth::Two,
        }
    }
}

impl TryFrom<u8> for TabWidth {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            2 => Ok(TabWidth::Two),
            4 => Ok(TabWidth::Four),
            8 => Ok(TabWidth::Eight),
            other => Err(format!("tab width must be 2, 4 or 8 (got {other})")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrailingComma {
    None,
    #[default]
    Es5,
    All,
}

impl TrailingComma {
    pub fn as_str(self) -> &'static str {
        match self {
            TrailingComma::None => "none",
            TrailingComma::Es5 => "es5",
            TrailingComma::All => "all",
        }
    }

    fn next(self) -> Self {
        match self {
            TrailingComma::None => TrailingComma::Es5,
            TrailingComma::Es5 => TrailingComma::All,
            TrailingComma::All => TrailingComma::None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FormatOptions {
    pub tab_width: TabWidth,
    pub print_width: u16,
    pub trailing_comma: TrailingComma,
    pub semicolons: bool,
    pub single_quote: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            tab_width: TabWidth::Two,
            print_width: 80,
            trailing_comma: TrailingComma::Es5,
            semicolons: true,
            single_quote: false,
        }
    }
}

impl FormatOptions {
    pub fn with_next_tab_width(self) -> Self {
        Self { tab_width: self.tab_width.next(), ..self }
    }

    /// Moves print width by one step (`grow` up, otherwise down), clamped to
    /// `MIN_PRINT_WIDTH..=MAX_PRINT_WIDTH`.
    pub fn with_print_width_step(self, grow: bool) -> Self {
        let width = if grow {
            self.print_width.saturating_add(PRINT_WIDTH_STEP)
        } else {
            self.print_width.saturating_sub(PRINT_WIDTH_STEP)
        };
        Self { print_width: width.clamp(MIN_PRINT_WIDTH, MAX_PRINT_WIDTH), ..self }
    }

    pub fn with_next_trailing_comma(self) -> Self {
        Self { trailing_comma: self.trailing_comma.next(), ..self }
    }

    pub fn with_semicolons_toggled(self) -> Self {
        Self { semicolons: !self.semicolons, ..self }
    }

    pub fn with_single_quote_toggled(self) -> Self {
        Self { single_quote: !self.single_quote, ..self }
    }

    /// Print width clamped into the supported range (config files may hold anything).
    pub fn normalized(self) -> Self {
        Self { print_width: self.print_width.clamp(MIN_PRINT_WIDTH, MAX_PRINT_WIDTH), ..self }
    }
}

impl fmt::Display for FormatOptions {
    /// Compact summary for the status bar, e.g. `tab 2 · width 80 · es5 · semi · "`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "tab {} · width {} · {} · {} · {}",
            self.tab_width.spaces(),
            self.print_width,
            self.trailing_comma.as_str(),
            if self.semicolons { "semi" } else { "no-semi" },
            if self.single_quote { "'" } else { "\"" },
        )
    }
}
