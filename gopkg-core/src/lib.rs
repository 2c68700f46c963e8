//! Core utilities for the gopkg toolkit.
//!
//! This crate provides the building blocks shared by the parser and the
//! renderer: a tab-indenting code builder, file writing, and the string case
//! helpers exposed to body templates.

mod code_builder;
mod file;
mod utils;

// Code building
pub use code_builder::CodeBuilder;
// File operations
pub use file::{WriteResult, write_file};
// String utilities
pub use utils::{split_words, to_camel_case, to_pascal_case, to_snake_case};
