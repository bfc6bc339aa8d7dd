//! Output formatting and writing utilities
//!
//! This module provides utilities for formatting and writing output
//! in various formats (JSON, YAML, human-readable) with specialized
//! support for EtlResult and ValidationErrors.

use crate::cli::OutputFormat;
use crate::error::Result;
use colored::Colorize;
use graphbridge_core::{EtlMetadata, EtlResult};
use graphbridge_schemas::{ValidationError, ValidationErrors};
use serde::Serialize;
use std::io::{self, Write};
use tracing::{debug, trace};

/// Trait for formatting output with specialized support for common types
pub trait OutputFormatter {
    /// Format a serializable value
    fn format<T: Serialize>(&self, value: &T) -> Result<String>;

    /// Format an EtlResult with record statistics
    fn format_etl_result(&self, result: &EtlResult) -> Result<String>;

    /// Format validation errors with detailed violation reporting
    fn format_validation_errors(&self, errors: &ValidationErrors) -> Result<String>;

    /// Format a single validation error
    fn format_validation_error(&self, error: &ValidationError) -> Result<String>;
}

impl OutputFormatter for OutputFormat {
    fn format<T: Serialize>(&self, value: &T) -> Result<String> {
        match self {
            OutputFormat::Json => Ok(serde_json::to_string(value)?),
            OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(value)?),
            OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
            OutputFormat::Human => {
                // For human format, use pretty JSON as fallback
                Ok(serde_json::to_string_pretty(value)?)
            }
        }
    }

    fn format_etl_result(&self, result: &EtlResult) -> Result<String> {
        match self {
            OutputFormat::Json => Ok(serde_json::to_string(result)?),
            OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(result)?),
            OutputFormat::Yaml => Ok(serde_yaml::to_string(result)?),
            OutputFormat::Human => format_etl_result_human(result),
        }
    }

    fn format_validation_errors(&self, errors: &ValidationErrors) -> Result<String> {
        match self {
            OutputFormat::Json => Ok(serde_json::to_string(errors)?),
            OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(errors)?),
            OutputFormat::Yaml => Ok(serde_yaml::to_string(errors)?),
            OutputFormat::Human => format_validation_errors_human(errors),
        }
    }

    fn format_validation_error(&self, error: &ValidationError) -> Result<String> {
        match self {
            OutputFormat::Json => Ok(serde_json::to_string(error)?),
            OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(error)?),
            OutputFormat::Yaml => Ok(serde_yaml::to_string(error)?),
            OutputFormat::Human => format_validation_error_human(error),
        }
    }
}

/// Output writer that handles different output formats and colors
pub struct OutputWriter {
    format: OutputFormat,
    use_color: bool,
    quiet: bool,
    verbose: u8,
    writer: Box<dyn Write>,
}

impl OutputWriter {
    /// Create a new output writer
    pub fn new(format: OutputFormat, use_color: bool, quiet: bool, verbose: u8) -> Self {
        Self {
            format,
            use_color,
            quiet,
            verbose,
            writer: Box::new(io::stdout()),
        }
    }

    /// Create an output writer with a custom writer
    #[allow(dead_code)]
    pub fn with_writer(
        format: OutputFormat,
        use_color: bool,
        quiet: bool,
        verbose: u8,
        writer: Box<dyn Write>,
    ) -> Self {
        Self {
            format,
            use_color,
            quiet,
            verbose,
            writer,
        }
    }

    /// Get the output format
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Write raw output
    pub fn write(&mut self, content: &str) -> Result<()> {
        write!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write a line of output
    pub fn writeln(&mut self, content: &str) -> Result<()> {
        writeln!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write an info message
    pub fn info(&mut self, message: &str) -> Result<()> {
        debug!("Output info: {}", message);

        if self.quiet {
            return Ok(());
        }

        if self.format == OutputFormat::Human {
            if self.use_color {
                self.writeln(&format!("{} {}", "ℹ".blue(), message))
            } else {
                self.writeln(&format!("INFO: {}", message))
            }
        } else {
            Ok(())
        }
    }

    /// Write a success message
    pub fn success(&mut self, message: &str) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        if self.format == OutputFormat::Human {
            if self.use_color {
                self.writeln(&message.green().to_string())
            } else {
                self.writeln(message)
            }
        } else {
            Ok(())
        }
    }

    /// Write a warning message
    pub fn warning(&mut self, message: &str) -> Result<()> {
        if self.format == OutputFormat::Human {
            if self.use_color {
                self.writeln(&message.yellow().to_string())
            } else {
                self.writeln(&format!("WARNING: {}", message))
            }
        } else {
            Ok(())
        }
    }

    /// Write an error message
    pub fn error(&mut self, message: &str) -> Result<()> {
        if self.format == OutputFormat::Human {
            if self.use_color {
                self.writeln(&message.red().to_string())
            } else {
                self.writeln(&format!("ERROR: {}", message))
            }
        } else {
            Ok(())
        }
    }

    /// Write a section header
    pub fn section(&mut self, title: &str) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        if self.format == OutputFormat::Human {
            self.writeln("")?;
            if self.use_color {
                self.writeln(&format!("═══ {} ═══", title).bright_blue().to_string())
            } else {
                self.writeln(&format!("=== {} ===", title))
            }
        } else {
            Ok(())
        }
    }

    /// Write data in the configured format
    pub fn data<T: Serialize>(&mut self, value: &T) -> Result<()> {
        trace!(
            "Outputting data: {}",
            serde_json::to_string(value).unwrap_or_else(|_| "[failed to serialize]".to_string())
        );

        let formatted = self.format.format(value)?;

        if self.format == OutputFormat::Human {
            self.writeln(&formatted)
        } else {
            // For machine formats, write as-is
            self.write(&formatted)
        }
    }

    /// Write an ETL result with specialized formatting
    pub fn etl_result(&mut self, result: &EtlResult) -> Result<()> {
        let formatted = self.format.format_etl_result(result)?;
        self.writeln(&formatted)
    }

    /// Write validation errors with specialized formatting
    pub fn validation_errors(&mut self, errors: &ValidationErrors) -> Result<()> {
        let formatted = self.format.format_validation_errors(errors)?;
        self.writeln(&formatted)
    }

    /// Write a single validation error
    #[allow(dead_code)]
    pub fn validation_error(&mut self, error: &ValidationError) -> Result<()> {
        let formatted = self.format.format_validation_error(error)?;
        self.writeln(&formatted)
    }

    /// Check if verbose output should be shown
    pub fn is_verbose(&self) -> bool {
        self.verbose > 0
    }

    /// Write debug information if verbose mode is enabled
    pub fn debug(&mut self, message: &str) -> Result<()> {
        if self.verbose > 0 && self.format == OutputFormat::Human {
            if self.use_color {
                self.writeln(&format!("{} {}", "DEBUG:".dimmed(), message.dimmed()))
            } else {
                self.writeln(&format!("DEBUG: {}", message))
            }
        } else {
            Ok(())
        }
    }

    /// Write a table (for human format)
    pub fn table(&mut self, headers: &[&str], rows: Vec<Vec<String>>) -> Result<()> {
        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        // Calculate column widths
        let mut widths = headers.iter().map(|h| h.len()).collect::<Vec<_>>();
        for row in &rows {
            for (i, cell) in row.iter().enumerate() {
                if i < widths.len() {
                    widths[i] = widths[i].max(cell.len());
                }
            }
        }

        // Print header
        let header_row = headers
            .iter()
            .enumerate()
            .map(|(i, h)| format!("{:width$}", h, width = widths[i]))
            .collect::<Vec<_>>()
            .join(" │ ");

        if self.use_color {
            self.writeln(&header_row.bold().to_string())?;
        } else {
            self.writeln(&header_row)?;
        }

        // Print separator
        let separator = widths
            .iter()
            .map(|w| "─".repeat(*w))
            .collect::<Vec<_>>()
            .join("─┼─");
        self.writeln(&separator)?;

        // Print rows
        for row in rows {
            let row_str = row
                .iter()
                .enumerate()
                .map(|(i, cell)| {
                    if i < widths.len() {
                        format!("{:width$}", cell, width = widths[i])
                    } else {
                        cell.clone()
                    }
                })
                .collect::<Vec<_>>()
                .join(" │ ");
            self.writeln(&row_str)?;
        }

        Ok(())
    }
}

/// Format an EtlResult for human reading
fn format_etl_result_human(result: &EtlResult) -> Result<String> {
    let mut output = String::new();

    output.push_str("═══ Translation Result ═══\n\n");

    output.push_str(&format_etl_metadata_human(&result.metadata));
    output.push('\n');

    let stats = &result.metadata.stats;
    if stats.failed == 0 {
        output.push_str("✅ All records translated\n\n");
    } else {
        output.push_str(&format!(
            "⚠️  {} record(s) dropped during translation\n\n",
            stats.failed
        ));
    }

    output.push_str("📝 Output Data:\n");
    output.push_str(&serde_json::to_string_pretty(&result.data)?);
    output.push('\n');

    Ok(output)
}

/// Format ETL run metadata for human reading
fn format_etl_metadata_human(metadata: &EtlMetadata) -> String {
    let mut output = String::new();

    output.push_str("🔧 Run Details:\n");
    output.push_str(&format!(
        "  Route: {} -> {}\n",
        metadata.source, metadata.target
    ));
    output.push_str(&format!("  Timestamp: {}\n", metadata.timestamp));

    if let Some(duration) = metadata.duration_ms {
        output.push_str(&format!("  Duration: {}ms\n", duration));
    }

    output.push_str("📊 Records:\n");
    output.push_str(&format!("  Processed: {}\n", metadata.stats.processed));
    output.push_str(&format!("  Succeeded: {}\n", metadata.stats.succeeded));
    output.push_str(&format!("  Failed: {}\n", metadata.stats.failed));

    output
}

/// Format validation errors for human reading
fn format_validation_errors_human(errors: &ValidationErrors) -> Result<String> {
    let mut output = String::new();

    output.push_str(&format!(
        "❌ Validation Failed - {} Error(s)\n\n",
        errors.len()
    ));

    for (i, error) in errors.errors.iter().enumerate() {
        output.push_str(&format!(
            "{}. {}\n",
            i + 1,
            format_validation_error_human(error)?
        ));
    }

    Ok(output)
}

/// Format a single validation error for human reading
fn format_validation_error_human(error: &ValidationError) -> Result<String> {
    let mut output = String::new();

    output.push_str(&format!("📍 Path: {}\n", error.path));
    output.push_str(&format!("💬 Message: {}\n", error.message));

    if !error.violations.is_empty() {
        output.push_str("🔍 Violations:\n");

        for violation in &error.violations {
            output.push_str(&format!("  • Rule: {}\n", violation.rule));
            output.push_str(&format!("    Expected: {}\n", violation.expected));
            output.push_str(&format!("    Actual: {}\n", violation.actual));
            output.push('\n');
        }
    }

    Ok(output)
}
