//! Post-processing of generated source.
//!
//! The generator does not resolve imports or align struct fields; that is left
//! to a [`Formatter`] such as `gofmt` or `goimports`.

use crate::error::CodegenError;
use std::io::Write;
use std::process::{Command, Stdio};

/// Final pass applied to the generated source text.
pub trait Formatter {
    /// Formats the complete generated source.
    ///
    /// # Errors
    /// Returns `CodegenError::Format` if the source cannot be formatted.
    fn format(&self, source: String) -> Result<String, CodegenError>;
}

impl<F> Formatter for F
where
    F: Fn(String) -> Result<String, CodegenError>,
{
    fn format(&self, source: String) -> Result<String, CodegenError> {
        self(source)
    }
}

/// Formatter that returns the source unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct Passthrough;

impl Formatter for Passthrough {
    fn format(&self, source: String) -> Result<String, CodegenError> {
        Ok(source)
    }
}

/// Formatter that pipes the source through an external program.
#[derive(Debug, Clone)]
pub struct CommandFormatter {
    program: String,
    args: Vec<String>,
}

impl CommandFormatter {
    /// Creates a formatter running `program` without arguments.
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Adds a command-line argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Builds a formatter from a shell-like command line, split on whitespace.
    ///
    /// Returns `None` for an empty command line.
    #[must_use]
    pub fn from_command_line(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace();
        let program = parts.next()?;
        Some(parts.fold(Self::new(program), |formatter, arg| formatter.arg(arg)))
    }

    /// Returns the program name.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Formatter for CommandFormatter {
    fn format(&self, source: String) -> Result<String, CodegenError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => {
                    CodegenError::format(format!("'{}' not found on PATH", self.program))
                }
                _ => CodegenError::format(format!("cannot run '{}': {e}", self.program)),
            })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| CodegenError::format("formatter stdin unavailable"))?;
        let writer = std::thread::spawn(move || stdin.write_all(source.as_bytes()));

        let output = child.wait_with_output()?;
        let written = writer
            .join()
            .map_err(|_| CodegenError::format("formatter input thread panicked"))?;

        if !output.status.success() {
            return Err(CodegenError::format(format!(
                "'{}' exited with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        written?;

        String::from_utf8(output.stdout)
            .map_err(|e| CodegenError::format(format!("formatter output is not UTF-8: {e}")))
    }
}
