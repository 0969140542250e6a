//! Format-orchestration pipeline for fmtview.
//!
//! Everything here is terminal-agnostic: language detection, the line-diff
//! display mapper, formatter error interpretation, the per-document
//! [`session::Session`], and the debounced [`scheduler::FormatScheduler`]
//! that drives an external [`engine::FormatEngine`]. The `fmtview` binary
//! owns the terminal and calls into this crate from its event loop.

pub mod diff;
pub mod dialect;
pub mod engine;
pub mod error;
pub mod files;
pub mod interpret;
pub mod options;
pub mod picker;
pub mod samples;
pub mod scheduler;
pub mod session;

pub use dialect::{detect, Dialect, LanguageSelection, ParserFamily};
pub use diff::{build_diff, DiffLineRecord, DiffMapping, DiffStats, LineClass};
pub use error::PipelineError;
pub use interpret::{interpret, ErrorReport};
pub use options::FormatOptions;
pub use session::Session;

/// Largest input, in characters, that is ever handed to the formatting engine.
pub const MAX_INPUT_CHARS: usize = 500_000;
