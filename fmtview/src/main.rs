//! fmtview: live JavaScript/TypeScript formatting in the terminal.
//!
//! Entry point for the `fmtview` binary. Wires together configuration
//! (`config`), the file logger (`logging`), terminal lifecycle (`tui`), the
//! unified event bus (`event`), rendering (`ui`) and the format pipeline
//! from `fmtview-core`.
//!
//! # Startup sequence
//!
//! 1. Parse CLI, install the logger, load config (all before terminal init).
//! 2. `install_panic_hook()` so a panic restores the terminal first.
//! 3. `register_sigterm()` returns a flag polled by the event loop.
//! 4. `init_tui()` enters the alternate screen and raw mode.
//! 5. Spawn the event task; load the FILE argument, if any.
//!
//! `restore_tui()` runs once after the loop exits, whatever the reason
//! (quit key, SIGTERM, channel close or a draw error).

mod app;
mod clipboard;
mod config;
mod editor;
mod event;
mod highlight;
mod logging;
mod theme;
mod tui;
mod ui;

use std::path::PathBuf;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use fmtview_core::engine::PrettierCli;
use fmtview_core::scheduler::FormatScheduler;
use fmtview_core::{LanguageSelection, Session};

use crate::event::AppEvent;
use crate::ui::keybindings::{handle_key, handle_paste, KeyAction};

fn parse_language(name: &str) -> Result<LanguageSelection, String> {
    LanguageSelection::from_name(name)
        .ok_or_else(|| format!("unknown language '{name}' (auto, javascript, jsx, typescript, tsx)"))
}

#[derive(Parser, Debug)]
#[command(name = "fmtview", version, about = "Format JavaScript, JSX, TypeScript and TSX as you type")]
struct Cli {
    /// Source file to open (js, mjs, cjs, jsx, ts or tsx, up to 1 MiB).
    file: Option<PathBuf>,

    /// Config file (default: $XDG_CONFIG_HOME/fmtview/config.toml).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Formatter command, overriding `[formatter] command` from config.
    #[arg(long, value_name = "CMD")]
    formatter: Option<String>,

    /// Initial language: auto, javascript, jsx, typescript or tsx.
    #[arg(long, value_name = "LANG", value_parser = parse_language)]
    language: Option<LanguageSelection>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init();

    let config_path = cli.config.clone().unwrap_or_else(config::default_path);
    let config = config::load(&config_path);
    let theme = theme::Theme::from_name(&config.theme);

    let command = cli.formatter.unwrap_or(config.formatter.command);
    let engine = Arc::new(PrettierCli::new(command, config.formatter.args));
    let (format_tx, mut format_rx) = tokio::sync::mpsc::unbounded_channel();
    let scheduler = FormatScheduler::new(engine, format_tx)
        .with_debounce(Duration::from_millis(config.debounce_ms));
    let session = Session::new(config.format, cli.language.unwrap_or_default());

    let handler = event::EventHandler::new();
    let download_dir = std::env::current_dir().context("resolving working directory")?;
    let mut state = app::AppState::new(session, scheduler, handler.tx.clone(), download_dir);

    tui::install_panic_hook();
    let term_flag = tui::register_sigterm().context("registering SIGTERM handler")?;
    let mut terminal = tui::init_tui().context("initialising terminal")?;

    event::spawn_event_task(handler.tx.clone());
    let mut rx = handler.rx;

    if let Some(path) = &cli.file {
        state.open_file(path);
    }

    // Exits only via `break` so restore_tui() below is always reached.
    let mut outcome: anyhow::Result<()> = Ok(());
    'event_loop: loop {
        tokio::select! {
            // Heartbeat so SIGTERM is noticed even when the terminal is idle.
            _ = tokio::time::sleep(Duration::from_millis(50)) => {}
            Some(format_event) = format_rx.recv() => {
                state.handle_format_event(format_event);
            }
            maybe_event = rx.recv() => {
                match maybe_event {
                    Some(AppEvent::Render) => {
                        if let Err(e) = terminal.draw(|frame| ui::render(frame, &mut state, &theme)) {
                            outcome = Err(e).context("drawing frame");
                            break 'event_loop;
                        }
                    }
                    Some(AppEvent::Key(key)) => {
                        if handle_key(key, &mut state) == KeyAction::Quit {
                            break 'event_loop;
                        }
                    }
                    Some(AppEvent::Paste(text)) => handle_paste(text, &mut state),
                    Some(AppEvent::NoticeExpired { generation }) => state.expire_notice(generation),
                    Some(AppEvent::Quit) | None => break 'event_loop,
                    // ratatui picks up the new size on the next Render
                    Some(AppEvent::Resize(_, _)) | Some(AppEvent::Tick) => {}
                }
            }
        }
        if term_flag.load(Ordering::Relaxed) {
            log::info!("SIGTERM received");
            break 'event_loop;
        }
    }

    state.shutdown();
    tui::restore_tui().context("restoring terminal")?;
    outcome
}
