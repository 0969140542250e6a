//! Error taxonomy for the format pipeline.
//!
//! Every variant is recoverable: the caller surfaces the `Display` text as a
//! short timed notice and the session carries on.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// Input text is longer than [`crate::MAX_INPUT_CHARS`].
    #[error("Input too large: {len} characters (limit {max})")]
    InputTooLarge { len: usize, max: usize },

    /// Uploaded file exceeds the upload size limit.
    #[error("File too large: {size} bytes (limit {max})")]
    FileTooLarge { size: u64, max: u64 },

    /// Uploaded file extension does not map to a supported dialect.
    #[error("Unsupported file type: {ext} (expected js, mjs, cjs, jsx, ts or tsx)")]
    UnsupportedFileType { ext: String },

    /// The formatting engine rejected the source.
    #[error("Formatting failed: {0}")]
    FormatterFailure(String),

    #[error("Clipboard not available")]
    ClipboardUnavailable,

    #[error("Clipboard error: {0}")]
    ClipboardFailure(String),

    /// Both the system clipboard and the terminal escape fallback failed.
    #[error("Copy failed: {0}")]
    CopyFallbackFailure(String),

    /// Copy or download attempted with no real formatter output.
    #[error("No formatted output to use")]
    NoOutput,

    #[error("Could not read {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
