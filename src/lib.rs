//! SVG Data-Attribute Validator
//!
//! Checks the graphic elements of an SVG document for the required
//! `data-categoryid`, `data-targetviewbox` and `data-zoneid` attributes.
//!
//! This library provides:
//! - SVG parsing and the validation routine
//! - An LSP server publishing findings as diagnostics
//! - A one-shot checker with file watching and saving
//! - Configuration management

pub mod config;
pub mod export;
pub mod lsp;
pub mod parser;
pub mod report;
pub mod validation;
pub mod watch;

// Re-exports for clean public API
pub use config::Config;
pub use parser::{parse_document, ElementKind, ParseError};
pub use validation::{validate_document, Finding, ValidationResult};
