//! Required Attribute Rules
//!
//! The attribute set is fixed: every graphic element must carry a
//! category, a target viewbox and a zone.

use serde::Serialize;

use crate::parser::{Element, ElementKind, MALFORMED_QUOTE_ENTITY};

/// A custom attribute every graphic element must carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RequiredAttribute {
    #[serde(rename = "data-categoryid")]
    CategoryId,
    #[serde(rename = "data-targetviewbox")]
    TargetViewBox,
    #[serde(rename = "data-zoneid")]
    ZoneId,
}

impl RequiredAttribute {
    /// Check order
    pub const ALL: [RequiredAttribute; 3] = [
        RequiredAttribute::CategoryId,
        RequiredAttribute::TargetViewBox,
        RequiredAttribute::ZoneId,
    ];

    pub fn name(self) -> &'static str {
        match self {
            RequiredAttribute::CategoryId => "data-categoryid",
            RequiredAttribute::TargetViewBox => "data-targetviewbox",
            RequiredAttribute::ZoneId => "data-zoneid",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            RequiredAttribute::CategoryId => "Category the shape belongs to.",
            RequiredAttribute::TargetViewBox => "Viewbox to zoom to when the shape is selected.",
            RequiredAttribute::ZoneId => "Zone identifier the shape maps to.",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|attr| attr.name() == name)
    }
}

/// What is wrong with a required attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
    /// Absent, or present with an empty value
    Missing,
    SurroundingWhitespace,
    InvalidEntity,
}

/// A single failed check on one attribute of one element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Violation {
    pub attribute: RequiredAttribute,
    pub kind: ViolationKind,
}

impl Violation {
    /// User-facing message for an element of the given kind
    pub fn message(&self, tag: ElementKind) -> String {
        let attr = self.attribute.name();
        match self.kind {
            ViolationKind::Missing => format!("{} missing attribute: {}", tag, attr),
            ViolationKind::SurroundingWhitespace => {
                format!("{} has leading or trailing spaces.", attr)
            }
            ViolationKind::InvalidEntity => format!(
                "{} contains invalid characters like \"{}\".",
                attr, MALFORMED_QUOTE_ENTITY
            ),
        }
    }
}

/// Whitespace as trimmed by ECMAScript `String.prototype.trim`.
///
/// Unicode White_Space minus NEL, plus the byte order mark.
fn is_trimmable(c: char) -> bool {
    match c {
        '\u{85}' => false,
        '\u{FEFF}' => true,
        c => c.is_whitespace(),
    }
}

/// Check one attribute value. Whitespace and entity checks are independent.
pub fn check_value(attribute: RequiredAttribute, value: Option<&str>) -> Vec<Violation> {
    let mut violations = Vec::new();

    let value = match value {
        Some(v) if !v.is_empty() => v,
        _ => {
            violations.push(Violation {
                attribute,
                kind: ViolationKind::Missing,
            });
            return violations;
        }
    };

    if value.trim_matches(is_trimmable) != value {
        violations.push(Violation {
            attribute,
            kind: ViolationKind::SurroundingWhitespace,
        });
    }

    if value.contains(MALFORMED_QUOTE_ENTITY) {
        violations.push(Violation {
            attribute,
            kind: ViolationKind::InvalidEntity,
        });
    }

    violations
}

/// Check every required attribute of an element, in fixed order
pub fn check_element(element: &Element, out: &mut Vec<Violation>) {
    for attribute in RequiredAttribute::ALL {
        out.extend(check_value(attribute, element.attribute(attribute.name())));
    }
}
