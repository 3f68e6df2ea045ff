//! Validation Engine
//!
//! Clean separation of validation logic from parsing and presentation concerns.

pub mod engine;
pub mod locate;
pub mod rules;

pub use engine::{
    validate_document, validate_document_with, Finding, FindingKind, FindingTag,
    ValidationOptions, ValidationResult,
};
pub use rules::RequiredAttribute;
