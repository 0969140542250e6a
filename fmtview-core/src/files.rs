//! Upload, paste and download helpers.
//!
//! Checks run cheapest first: extension, then size on disk, then the read.

use std::fs;
use std::path::{Path, PathBuf};

use crate::dialect::Dialect;
use crate::error::PipelineError;
use crate::session::Session;
use crate::MAX_INPUT_CHARS;

/// Largest file accepted for upload, in bytes.
pub const MAX_UPLOAD_BYTES: u64 = 1024 * 1024;

/// A source file accepted for loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedFile {
    pub path: PathBuf,
    pub text: String,
    /// Dialect implied by the file extension.
    pub dialect: Dialect,
}

fn extension_of(path: &Path) -> String {
    path.extension().and_then(|e| e.to_str()).unwrap_or_default().to_owned()
}

/// Validates and reads a source file.
///
/// # Errors
///
/// `UnsupportedFileType` for an unknown extension, `FileTooLarge` above
/// [`MAX_UPLOAD_BYTES`], `FileRead` when the file cannot be read as UTF-8.
pub fn load_source_file(path: &Path) -> Result<LoadedFile, PipelineError> {
    let ext = extension_of(path);
    let dialect = Dialect::from_extension(&ext)
        .ok_or_else(|| PipelineError::UnsupportedFileType { ext: ext.clone() })?;

    let meta = fs::metadata(path)
        .map_err(|source| PipelineError::FileRead { path: path.to_owned(), source })?;
    if meta.len() > MAX_UPLOAD_BYTES {
        return Err(PipelineError::FileTooLarge { size: meta.len(), max: MAX_UPLOAD_BYTES });
    }

    let text = fs::read_to_string(path)
        .map_err(|source| PipelineError::FileRead { path: path.to_owned(), source })?;
    log::info!("loaded {} ({} bytes) as {dialect}", path.display(), meta.len());
    Ok(LoadedFile { path: path.to_owned(), text, dialect })
}

/// Rejects pasted text above [`MAX_INPUT_CHARS`].
pub fn check_paste(text: &str) -> Result<(), PipelineError> {
    let len = text.chars().count();
    if len > MAX_INPUT_CHARS {
        return Err(PipelineError::InputTooLarge { len, max: MAX_INPUT_CHARS });
    }
    Ok(())
}

pub fn download_file_name(dialect: Dialect) -> String {
    format!("formatted.{}", dialect.extension())
}

/// Writes the session's formatted output to `dir/formatted.<ext>`.
///
/// The file holds exactly the output text. Refuses when there is no real
/// formatter output.
pub fn write_download(session: &Session, dir: &Path) -> Result<PathBuf, PipelineError> {
    let text = session.formatted_output()?;
    let path = dir.join(download_file_name(session.effective_dialect()));
    fs::write(&path, text).map_err(|source| PipelineError::Write { path: path.clone(), source })?;
    log::info!("wrote {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpret::ErrorReport;

    #[test]
    fn unsupported_extension_is_checked_before_reading() {
        // the file does not exist; the extension alone decides
        let err = load_source_file(Path::new("/nonexistent/script.py")).unwrap_err();
        assert!(matches!(err, PipelineError::UnsupportedFileType { ref ext } if ext == "py"));
        let err = load_source_file(Path::new("/nonexistent/Makefile")).unwrap_err();
        assert!(matches!(err, PipelineError::UnsupportedFileType { .. }));
    }

    #[test]
    fn oversize_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.js");
        fs::write(&path, vec![b'a'; MAX_UPLOAD_BYTES as usize + 1]).unwrap();
        let err = load_source_file(&path).unwrap_err();
        assert!(matches!(err, PipelineError::FileTooLarge { size, .. } if size == MAX_UPLOAD_BYTES + 1));
    }

    #[test]
    fn accepted_file_carries_extension_dialect() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("App.TSX");
        fs::write(&path, "const a = 1").unwrap();
        let loaded = load_source_file(&path).unwrap();
        assert_eq!(loaded.dialect, Dialect::Tsx);
        assert_eq!(loaded.text, "const a = 1");
    }

    #[test]
    fn invalid_utf8_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bin.js");
        fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();
        assert!(matches!(load_source_file(&path), Err(PipelineError::FileRead { .. })));
    }

    #[test]
    fn paste_limit_is_inclusive() {
        assert!(check_paste(&"a".repeat(MAX_INPUT_CHARS)).is_ok());
        assert!(matches!(
            check_paste(&"a".repeat(MAX_INPUT_CHARS + 1)),
            Err(PipelineError::InputTooLarge { len, .. }) if len == MAX_INPUT_CHARS + 1
        ));
    }

    #[test]
    fn download_refuses_placeholder_and_writes_exact_text() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = Session::default();
        assert!(matches!(write_download(&session, dir.path()), Err(PipelineError::NoOutput)));

        session.set_input("let x: number=1".into());
        session.begin_format(Dialect::TypeScript);
        session.apply_success("let x: number = 1;");
        let path = write_download(&session, dir.path()).unwrap();
        assert_eq!(path.file_name().unwrap(), "formatted.ts");
        assert_eq!(fs::read_to_string(&path).unwrap(), "let x: number = 1;");

        session.apply_failure(ErrorReport { short_message: "bad".into(), line: None });
        assert!(matches!(write_download(&session, dir.path()), Err(PipelineError::NoOutput)));
    }
}
