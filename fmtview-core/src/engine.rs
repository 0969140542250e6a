//! Seam to the external formatting engine.
//!
//! The engine is a collaborator, not part of this crate: it takes source
//! text, a parser family and [`FormatOptions`] and either returns formatted
//! text or fails with an opaque message. [`PrettierCli`] drives a `prettier`
//! executable as an async child process.

use std::process::{Output, Stdio};

use futures::future::BoxFuture;
use futures::FutureExt;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::dialect::{Dialect, ParserFamily};
use crate::options::FormatOptions;

/// One invocation of the engine. Owned so it can move into a spawned task.
#[derive(Debug, Clone)]
pub struct FormatRequest {
    pub source: String,
    pub dialect: Dialect,
    pub parser: ParserFamily,
    pub options: FormatOptions,
}

impl FormatRequest {
    pub fn new(source: String, dialect: Dialect, options: FormatOptions) -> Self {
        Self { source, dialect, parser: dialect.parser(), options }
    }
}

/// Engine failure. Only the message text is relied upon downstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineError {
    pub message: String,
}

impl EngineError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

/// An asynchronous formatter. Calls always run to completion; the scheduler
/// decides afterwards whether the result is still wanted.
pub trait FormatEngine: Send + Sync + 'static {
    fn format(&self, request: FormatRequest) -> BoxFuture<'static, Result<String, EngineError>>;
}

/// Runs a prettier-compatible CLI, feeding the source on stdin.
#[derive(Debug, Clone)]
pub struct PrettierCli {
    command: String,
    extra_args: Vec<String>,
}

impl Default for PrettierCli {
    fn default() -> Self {
        Self::new("prettier", Vec::new())
    }
}

impl PrettierCli {
    pub fn new(command: impl Into<String>, extra_args: Vec<String>) -> Self {
        Self { command: command.into(), extra_args }
    }

    /// Command-line arguments for `request`, excluding the program name.
    pub fn args_for(&self, request: &FormatRequest) -> Vec<String> {
        let o = &request.options;
        let mut args = vec![
            "--stdin-filepath".to_owned(),
            format!("input.{}", request.dialect.extension()),
            "--parser".to_owned(),
            request.parser.as_str().to_owned(),
            "--tab-width".to_owned(),
            o.tab_width.spaces().to_string(),
            "--print-width".to_owned(),
            o.print_width.to_string(),
            "--trailing-comma".to_owned(),
            o.trailing_comma.as_str().to_owned(),
        ];
        if !o.semicolons {
            args.push("--no-semi".to_owned());
        }
        if o.single_quote {
            args.push("--single-quote".to_owned());
        }
        args.extend(self.extra_args.iter().cloned());
        args
    }
}

/// Strips prettier's `[error] ` line prefixes so the first line is the message.
fn clean_stderr(stderr: &[u8]) -> String {
    String::from_utf8_lossy(stderr)
        .lines()
        .map(|l| l.strip_prefix("[error] ").unwrap_or(l))
        .collect::<Vec<_>>()
        .join("\n")
}

async fn run_cli(program: String, args: Vec<String>, source: String) -> Result<String, EngineError> {
    let mut child = Command::new(&program)
        .args(&args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| EngineError::new(format!("could not start `{program}`: {e}")))?;

    // Feed stdin while collecting output so a chatty formatter cannot stall on a full pipe.
    let stdin = child.stdin.take();
    let feed = async move {
        if let Some(mut stdin) = stdin {
            stdin.write_all(source.as_bytes()).await?;
            // dropping stdin closes the pipe so the formatter sees EOF
        }
        Ok::<_, std::io::Error>(())
    };
    let (fed, output) = tokio::join!(feed, child.wait_with_output());
    let output =
        output.map_err(|e| EngineError::new(format!("`{program}` did not finish: {e}")))?;
    exit_result(&program, output, fed)
}

/// A formatter that rejects the source may exit before draining stdin; its
/// stderr is the useful message then, not the broken pipe.
fn exit_result(
    program: &str,
    output: Output,
    fed: std::io::Result<()>,
) -> Result<String, EngineError> {
    if !output.status.success() {
        let message = clean_stderr(&output.stderr);
        return if message.trim().is_empty() {
            Err(EngineError::new(format!("`{program}` exited with {}", output.status)))
        } else {
            Err(EngineError::new(message))
        };
    }
    fed.map_err(|e| EngineError::new(format!("could not write to `{program}`: {e}")))?;
    String::from_utf8(output.stdout)
        .map_err(|_| EngineError::new(format!("`{program}` produced non UTF-8 output")))
}

impl FormatEngine for PrettierCli {
    fn format(&self, request: FormatRequest) -> BoxFuture<'static, Result<String, EngineError>> {
        let args = self.args_for(&request);
        log::debug!("engine: {} {}", self.command, args.join(" "));
        run_cli(self.command.clone(), args, request.source).boxed()
    }
}
