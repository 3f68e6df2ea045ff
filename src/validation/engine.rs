//! Validation Engine
//!
//! Core validation logic separated from parsing and presentation.
//! Each run is a pure function from document text to findings.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::parser::{self, Element, ElementKind, ParseError, TextPosition};
use crate::validation::locate::locate_line;
use crate::validation::rules::{self, RequiredAttribute, Violation, ViolationKind};

/// Tag reported with a finding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FindingTag {
    Element(ElementKind),
    /// Document-level failure, rendered as `N/A`
    NotApplicable,
}

impl fmt::Display for FindingTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FindingTag::Element(kind) => write!(f, "{}", kind),
            FindingTag::NotApplicable => f.write_str("N/A"),
        }
    }
}

impl Serialize for FindingTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Category of a finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    ParseError,
    MissingAttribute,
    SurroundingWhitespace,
    InvalidEntity,
}

impl FindingKind {
    /// Stable identifier, also used as the diagnostic code
    pub fn code(self) -> &'static str {
        match self {
            FindingKind::ParseError => "parse_error",
            FindingKind::MissingAttribute => "missing_attribute",
            FindingKind::SurroundingWhitespace => "surrounding_whitespace",
            FindingKind::InvalidEntity => "invalid_entity",
        }
    }
}

impl From<ViolationKind> for FindingKind {
    fn from(kind: ViolationKind) -> Self {
        match kind {
            ViolationKind::Missing => FindingKind::MissingAttribute,
            ViolationKind::SurroundingWhitespace => FindingKind::SurroundingWhitespace,
            ViolationKind::InvalidEntity => FindingKind::InvalidEntity,
        }
    }
}

/// A single reported validation issue
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Finding {
    pub tag: FindingTag,
    pub snippet: Option<String>,
    pub message: String,
    /// `None` when line tracking is off, `Some(0)` when the line is unknown
    pub line: Option<usize>,
    pub kind: FindingKind,
    pub attribute: Option<RequiredAttribute>,
    /// Parser position of the element or syntax error
    #[serde(skip)]
    pub position: Option<TextPosition>,
}

/// Knobs for a validation run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationOptions {
    pub track_lines: bool,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self { track_lines: true }
    }
}

/// Result of validating a document
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ValidationResult {
    pub findings: Vec<Finding>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_parse_error(&mut self, err: &ParseError) {
        self.findings.push(Finding {
            tag: FindingTag::NotApplicable,
            snippet: None,
            message: err.message.clone(),
            line: Some(0),
            kind: FindingKind::ParseError,
            attribute: None,
            position: Some(err.position),
        });
    }

    pub fn add_violation(&mut self, element: &Element, violation: &Violation, line: Option<usize>) {
        self.findings.push(Finding {
            tag: FindingTag::Element(element.kind),
            snippet: Some(element.snippet.clone()),
            message: violation.message(element.kind),
            line,
            kind: violation.kind.into(),
            attribute: Some(violation.attribute),
            position: Some(element.position),
        });
    }

    /// True when nothing was reported
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }

    pub fn has_parse_error(&self) -> bool {
        self.findings
            .iter()
            .any(|f| f.kind == FindingKind::ParseError)
    }

    pub fn len(&self) -> usize {
        self.findings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }
}

/// Validate a document with line tracking enabled
pub fn validate_document(content: &str) -> ValidationResult {
    validate_document_with(content, &ValidationOptions::default())
}

/// Validate a document.
///
/// A syntax error yields exactly one `N/A` finding and stops the run.
/// Otherwise findings follow kind scan order, then document order, then
/// required-attribute order.
pub fn validate_document_with(content: &str, options: &ValidationOptions) -> ValidationResult {
    let mut result = ValidationResult::new();
    let text = parser::normalize_entities(content);

    let tree = match parser::parse_document(&text) {
        Ok(tree) => tree,
        Err(err) => {
            log::debug!("parse failed: {}", err);
            result.add_parse_error(&err);
            return result;
        }
    };

    let lines: Vec<&str> = if options.track_lines {
        text.lines().collect()
    } else {
        Vec::new()
    };

    let mut violations = Vec::new();
    for element in tree.iter() {
        violations.clear();
        rules::check_element(element, &mut violations);
        if violations.is_empty() {
            continue;
        }

        let line = options
            .track_lines
            .then(|| locate_line(&lines, &element.opening_tag));
        for violation in &violations {
            result.add_violation(element, violation, line);
        }
    }

    log::debug!(
        "validated {} graphic elements, {} findings",
        tree.len(),
        result.len()
    );
    result
}
