//! Rendering findings for the terminal.

use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;
use std::fmt::Write;

use crate::validation::{Finding, ValidationResult};

/// Line printed for a document with no findings
pub const CLEAN_MESSAGE: &str = "No errors found.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    file: &'a str,
    clean: bool,
    findings: &'a [Finding],
}

/// Render a validation result for `file` in the requested format
pub fn render(file: &str, result: &ValidationResult, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(file, result)),
        OutputFormat::Json => {
            let report = JsonReport {
                file,
                clean: result.is_clean(),
                findings: &result.findings,
            };
            Ok(serde_json::to_string_pretty(&report)?)
        }
    }
}

fn render_text(file: &str, result: &ValidationResult) -> String {
    if result.is_clean() {
        return format!("{}: {}\n", file, CLEAN_MESSAGE);
    }

    let mut out = String::new();
    for finding in &result.findings {
        let location = match finding.line {
            Some(line) => format!("{}:{}", file, line),
            None => file.to_string(),
        };
        // Writing to a String cannot fail
        let _ = writeln!(out, "{}: [{}] {}", location, finding.tag, finding.message);
        if let Some(snippet) = &finding.snippet {
            for line in snippet.lines() {
                let _ = writeln!(out, "    {}", line);
            }
        }
    }
    let _ = writeln!(out, "{} error(s) found.", result.len());
    out
}
