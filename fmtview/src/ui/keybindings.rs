//! Keybinding dispatcher for fmtview.
//!
//! Translates crossterm `KeyEvent`s into `AppState` calls and returns a
//! `KeyAction` telling the event loop whether to continue or quit. Control
//! shortcuts are checked first and work in every mode; everything else
//! branches on `state.mode`.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use fmtview_core::options::FormatOptions;
use fmtview_core::picker::Resolution;
use fmtview_core::{Dialect, LanguageSelection};

use crate::app::{AppState, Mode, PanelFocus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Continue,
    Quit,
}

/// Dispatches a key event and returns whether the loop should keep going.
pub fn handle_key(key: KeyEvent, state: &mut AppState) -> KeyAction {
    if let Some(action) = handle_global(key, state) {
        return action;
    }
    match state.mode {
        Mode::HelpOverlay => handle_help(key, state),
        Mode::ConfirmLanguage => handle_confirm_language(key, state),
        Mode::OpenFile => handle_open_file(key, state),
        Mode::Insert => handle_insert(key, state),
        Mode::Normal => handle_normal(key, state),
    }
}

/// Terminal paste: replaces the whole input, from any mode but the prompt.
pub fn handle_paste(text: String, state: &mut AppState) {
    if state.mode == Mode::OpenFile {
        state.open_path.push_str(text.trim_end_matches(['\r', '\n']));
    } else {
        state.paste_text(text);
    }
}

// ---------------------------------------------------------------------------
// Modifier-gated shortcuts
// ---------------------------------------------------------------------------

fn handle_global(key: KeyEvent, state: &mut AppState) -> Option<KeyAction> {
    if !key.modifiers.contains(KeyModifiers::CONTROL) {
        return None;
    }
    match key.code {
        KeyCode::Char('r') => state.format_now(),
        KeyCode::Char('y') => state.copy_output(),
        KeyCode::Char('s') => state.download_output(),
        KeyCode::Char('c') => return Some(KeyAction::Quit),
        _ => return None,
    }
    Some(KeyAction::Continue)
}

// ---------------------------------------------------------------------------
// Normal mode
// ---------------------------------------------------------------------------

fn language_for_digit(c: char) -> Option<LanguageSelection> {
    match c {
        '0' => Some(LanguageSelection::Auto),
        '1'..='4' => {
            let index = c as usize - '1' as usize;
            Some(LanguageSelection::Fixed(Dialect::ALL[index]))
        }
        _ => None,
    }
}

fn handle_normal(key: KeyEvent, state: &mut AppState) -> KeyAction {
    if let Some(action) = handle_scroll_key(key, state) {
        return action;
    }

    match key.code {
        KeyCode::Char('i') | KeyCode::Enter => {
            state.focus = PanelFocus::Input;
            state.mode = Mode::Insert;
        }
        KeyCode::Tab => state.focus = state.focus.toggle(),
        KeyCode::Char('v') => state.toggle_view(),

        KeyCode::Char(c @ '0'..='4') => {
            if let Some(selection) = language_for_digit(c) {
                state.select_language(selection);
            }
        }

        // Options
        KeyCode::Char('t') => state.update_options(FormatOptions::with_next_tab_width),
        KeyCode::Char('+') | KeyCode::Char('=') => {
            state.update_options(|o| o.with_print_width_step(true))
        }
        KeyCode::Char('-') => state.update_options(|o| o.with_print_width_step(false)),
        KeyCode::Char('c') => state.update_options(FormatOptions::with_next_trailing_comma),
        KeyCode::Char(';') => state.update_options(FormatOptions::with_semicolons_toggled),
        KeyCode::Char('\'') => state.update_options(FormatOptions::with_single_quote_toggled),

        // Input sources
        KeyCode::Char('o') => {
            state.open_path.clear();
            state.mode = Mode::OpenFile;
        }
        KeyCode::Char('p') => state.paste_from_clipboard(),
        KeyCode::Char('x') => state.clear(),

        KeyCode::Char('?') => {
            state.help_scroll = 0;
            state.mode = Mode::HelpOverlay;
        }
        KeyCode::Char('q') | KeyCode::Esc => return KeyAction::Quit,
        _ => {}
    }
    KeyAction::Continue
}

/// j / k / g / G and Ctrl-d / Ctrl-u on the focused panel.
fn handle_scroll_key(key: KeyEvent, state: &mut AppState) -> Option<KeyAction> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Char('j') | KeyCode::Down => state.scroll_down(1),
        KeyCode::Char('k') | KeyCode::Up => state.scroll_up(1),
        KeyCode::Char('g') => state.scroll_top(),
        KeyCode::Char('G') => state.scroll_bottom(),
        KeyCode::Char('d') if ctrl => state.scroll_down(state.half_page()),
        KeyCode::Char('u') if ctrl => state.scroll_up(state.half_page()),
        KeyCode::PageDown => state.scroll_down(state.half_page() * 2),
        KeyCode::PageUp => state.scroll_up(state.half_page() * 2),
        _ => return None,
    }
    Some(KeyAction::Continue)
}

// ---------------------------------------------------------------------------
// Insert mode
// ---------------------------------------------------------------------------

fn handle_insert(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match key.code {
        KeyCode::Esc => state.mode = Mode::Normal,
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            state.edit(|e| e.insert_char(c))
        }
        KeyCode::Tab => {
            let spaces = state.session.options().tab_width.spaces();
            state.edit(|e| {
                for _ in 0..spaces {
                    e.insert_char(' ');
                }
                true
            })
        }
        KeyCode::Enter => state.edit(|e| e.insert_newline()),
        KeyCode::Backspace => state.edit(|e| e.backspace()),
        KeyCode::Delete => state.edit(|e| e.delete()),
        KeyCode::Left => state.editor.move_left(),
        KeyCode::Right => state.editor.move_right(),
        KeyCode::Up => state.editor.move_up(),
        KeyCode::Down => state.editor.move_down(),
        KeyCode::Home => state.editor.home(),
        KeyCode::End => state.editor.end(),
        _ => {}
    }
    KeyAction::Continue
}

// ---------------------------------------------------------------------------
// Overlays
// ---------------------------------------------------------------------------

fn handle_help(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => state.help_scroll = state.help_scroll.saturating_add(1),
        KeyCode::Char('k') | KeyCode::Up => state.help_scroll = state.help_scroll.saturating_sub(1),
        KeyCode::Char('g') => state.help_scroll = 0,
        KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q') => state.mode = Mode::Normal,
        _ => {}
    }
    KeyAction::Continue
}

fn handle_confirm_language(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match key.code {
        KeyCode::Char('s') | KeyCode::Char('y') => state.resolve_language(Resolution::LoadSample),
        KeyCode::Char('k') | KeyCode::Char('n') => state.resolve_language(Resolution::KeepInput),
        KeyCode::Esc | KeyCode::Char('q') => state.resolve_language(Resolution::Cancel),
        // picking again while the prompt is open retargets it
        KeyCode::Char(c @ '0'..='4') => {
            if let Some(selection) = language_for_digit(c) {
                state.select_language(selection);
            }
        }
        _ => {}
    }
    KeyAction::Continue
}

fn handle_open_file(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match key.code {
        KeyCode::Enter => state.submit_open_prompt(),
        KeyCode::Esc => {
            state.open_path.clear();
            state.mode = Mode::Normal;
        }
        KeyCode::Backspace => {
            state.open_path.pop();
        }
        KeyCode::Char(c) => state.open_path.push(c),
        _ => {}
    }
    KeyAction::Continue
}
