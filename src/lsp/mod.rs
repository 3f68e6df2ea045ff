//! LSP Protocol Implementation
//!
//! Backend publishing attribute findings as diagnostics, plus editor helpers.

pub mod backend;
pub mod document;
pub mod handlers;
pub mod server;

pub use backend::Backend;
