//! Output formatting for shell responses

use std::io::{self, Write};

use serde::{Deserialize, Serialize};

/// Output format
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Output helper for consistent formatting
///
/// Text mode writes human-readable lines and prompts. JSON mode writes one
/// object per response and no prompts.
pub struct Output<W: Write> {
    writer: W,
    format: OutputFormat,
}

impl<W: Write> Output<W> {
    pub fn new(writer: W, format: OutputFormat) -> Self {
        Self { writer, format }
    }

    /// Prints a success message
    pub fn success(&mut self, message: &str) -> io::Result<()> {
        match self.format {
            OutputFormat::Text => writeln!(self.writer, "{}", message),
            OutputFormat::Json => writeln!(
                self.writer,
                "{}",
                serde_json::json!({
                    "success": true,
                    "message": message
                })
            ),
        }
    }

    /// Prints an expected failure (not found, empty, invalid input)
    pub fn failure(&mut self, message: &str) -> io::Result<()> {
        match self.format {
            OutputFormat::Text => writeln!(self.writer, "{}", message),
            OutputFormat::Json => writeln!(
                self.writer,
                "{}",
                serde_json::json!({
                    "success": false,
                    "error": message
                })
            ),
        }
    }

    /// Prints structured data (JSON only, ignored in text mode)
    pub fn data<T: Serialize>(&mut self, data: &T) -> io::Result<()> {
        if self.format == OutputFormat::Json {
            let json = serde_json::to_string(data).map_err(io::Error::other)?;
            writeln!(self.writer, "{}", json)?;
        }
        Ok(())
    }

    /// Prints a line (text only, ignored in JSON mode)
    pub fn line(&mut self, text: &str) -> io::Result<()> {
        if self.format == OutputFormat::Text {
            writeln!(self.writer, "{}", text)?;
        }
        Ok(())
    }

    /// Prints a prompt without a newline (text only)
    pub fn prompt(&mut self, text: &str) -> io::Result<()> {
        if self.format == OutputFormat::Text {
            write!(self.writer, "{}", text)?;
            self.writer.flush()?;
        }
        Ok(())
    }

    /// Returns true if using JSON format
    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    /// Returns the underlying writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}
