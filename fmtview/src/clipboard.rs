//! Copy and paste.
//!
//! Copy goes to the system clipboard through `arboard`. When that is not
//! available (SSH, headless, Wayland without a portal) the text is sent to
//! the terminal as an OSC 52 escape, which most modern terminals forward to
//! their own clipboard.

use std::io::Write;

use arboard::Clipboard;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use fmtview_core::PipelineError;

/// Where a successful copy ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyTarget {
    System,
    Terminal,
}

pub struct ClipboardBridge {
    clipboard: Option<Clipboard>,
}

impl ClipboardBridge {
    pub fn new() -> Self {
        let clipboard = match Clipboard::new() {
            Ok(c) => Some(c),
            Err(e) => {
                log::warn!("system clipboard not available: {e}");
                None
            }
        };
        Self { clipboard }
    }

    pub fn copy(&mut self, text: &str) -> Result<CopyTarget, PipelineError> {
        let system_error = match self.clipboard.as_mut() {
            Some(clipboard) => match clipboard.set_text(text.to_owned()) {
                Ok(()) => return Ok(CopyTarget::System),
                Err(e) => PipelineError::ClipboardFailure(e.to_string()),
            },
            None => PipelineError::ClipboardUnavailable,
        };
        log::info!("clipboard copy failed ({system_error}), trying OSC 52");
        write_osc52(&mut std::io::stderr(), text)
            .map(|()| CopyTarget::Terminal)
            .map_err(|e| PipelineError::CopyFallbackFailure(format!("{system_error}; {e}")))
    }

    pub fn paste(&mut self) -> Result<String, PipelineError> {
        let clipboard = self.clipboard.as_mut().ok_or(PipelineError::ClipboardUnavailable)?;
        clipboard.get_text().map_err(|e| PipelineError::ClipboardFailure(e.to_string()))
    }
}

pub fn osc52_sequence(text: &str) -> String {
    format!("\x1b]52;c;{}\x07", STANDARD.encode(text))
}

fn write_osc52(out: &mut impl Write, text: &str) -> std::io::Result<()> {
    out.write_all(osc52_sequence(text).as_bytes())?;
    out.flush()
}
