//! UI rendering for fmtview.
//!
//! `render()` is the single entry point called from the event loop's
//! `terminal.draw()` closure. Layout arithmetic lives in `layout.rs`; each
//! panel and overlay has its own module.

mod layout;
pub mod help;
pub mod input_view;
pub mod keybindings;
pub mod output_view;
pub mod prompt;

use ratatui::Frame;

use crate::app::{AppState, Mode};
use crate::theme::Theme;
use layout::{compute_layout, inner_rect, render_status_bar};

/// Renders one complete frame: input and output panels, status bar and
/// whichever overlay the current mode calls for.
///
/// Viewport heights are written back into `state` so page scrolling on the
/// next keypress uses the current geometry.
pub fn render(frame: &mut Frame, state: &mut AppState, theme: &Theme) {
    let [input, output, status_bar] = compute_layout(frame);

    state.input_viewport_height = inner_rect(input).height;
    state.output_viewport_height = inner_rect(output).height;

    input_view::render_input(frame, input, state, theme);
    output_view::render_output(frame, output, state, theme);
    render_status_bar(frame, status_bar, state, theme);

    match state.mode {
        Mode::HelpOverlay => help::render_help_overlay(frame, theme, state.help_scroll),
        Mode::ConfirmLanguage => prompt::render_language_confirm(frame, state, theme),
        Mode::OpenFile => prompt::render_open_file(frame, state, theme),
        Mode::Normal | Mode::Insert => {}
    }
}
