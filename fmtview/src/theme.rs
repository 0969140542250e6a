//! Color themes for fmtview.
//!
//! Two built-in themes:
//!
//! - `dark` uses ANSI 16 colors so it works on any terminal, including
//!   256-color SSH sessions without truecolor.
//! - `catppuccin_mocha` uses the Catppuccin Mocha palette in RGB.
//!
//! The syntect theme used for output highlighting is named here too, so the
//! code colours sit well on the panel background.

use ratatui::style::Color;

#[derive(Debug, Clone)]
pub struct Theme {
    // Panel borders
    pub border_active: Color,
    pub border_inactive: Color,

    // Diff view
    pub diff_added: Color,
    pub diff_removed: Color,
    pub diff_context: Color,

    // Gutters
    pub gutter: Color,
    /// Background of the gutter cell on the line a formatter error points at.
    pub gutter_error: Color,
    /// Text of the error placeholder in the output panel.
    pub placeholder: Color,

    // Status bar
    pub status_bar_bg: Color,
    pub status_bar_fg: Color,
    pub status_mode_normal: Color,
    pub status_mode_insert: Color,
    pub status_formatting: Color,
    pub status_formatted: Color,
    pub status_error: Color,
    pub notice_info: Color,

    /// syntect theme name for highlighted output.
    pub syntax_theme: &'static str,
}

impl Theme {
    /// The built-in dark theme using ANSI 16 colors.
    pub fn dark() -> Self {
        Self {
            border_active: Color::Cyan,
            border_inactive: Color::DarkGray,

            diff_added: Color::Green,
            diff_removed: Color::Red,
            diff_context: Color::Reset,

            gutter: Color::DarkGray,
            gutter_error: Color::Red,
            placeholder: Color::Red,

            status_bar_bg: Color::DarkGray,
            status_bar_fg: Color::White,
            status_mode_normal: Color::Cyan,
            status_mode_insert: Color::Green,
            status_formatting: Color::Yellow,
            status_formatted: Color::Green,
            status_error: Color::Red,
            notice_info: Color::White,

            syntax_theme: "base16-ocean.dark",
        }
    }

    /// Catppuccin Mocha in RGB truecolor.
    ///
    /// Palette source: <https://github.com/catppuccin/catppuccin> Mocha variant.
    pub fn catppuccin_mocha() -> Self {
        let green = Color::Rgb(166, 227, 161);    // #a6e3a1
        let red = Color::Rgb(243, 139, 168);      // #f38ba8
        let yellow = Color::Rgb(249, 226, 175);   // #f9e2af
        let lavender = Color::Rgb(180, 190, 254); // #b4befe
        let maroon = Color::Rgb(235, 160, 172);   // #eba0ac
        let overlay1 = Color::Rgb(127, 132, 156); // #7f849c
        let surface1 = Color::Rgb(69, 71, 90);    // #45475a
        let text = Color::Rgb(205, 214, 244);     // #cdd6f4

        Self {
            border_active: lavender,
            border_inactive: overlay1,

            diff_added: green,
            diff_removed: red,
            diff_context: text,

            gutter: overlay1,
            gutter_error: maroon,
            placeholder: red,

            status_bar_bg: surface1,
            status_bar_fg: text,
            status_mode_normal: lavender,
            status_mode_insert: green,
            status_formatting: yellow,
            status_formatted: green,
            status_error: red,
            notice_info: text,

            syntax_theme: "base16-mocha.dark",
        }
    }

    /// Resolves a theme name from config. Unknown names fall back to `dark()`
    /// so a typo never prevents startup.
    pub fn from_name(name: &str) -> Self {
        match name {
            "catppuccin-mocha" | "catppuccin_mocha" => Self::catppuccin_mocha(),
            "dark" => Self::dark(),
            other => {
                log::warn!("unknown theme '{other}', falling back to 'dark'");
                Self::dark()
            }
        }
    }
}
