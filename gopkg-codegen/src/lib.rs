//! Go source generation for the gopkg toolkit.
//!
//! This crate renders the declaration model back into Go source and
//! normalizes imports before rendering.
//!
//! # Module Organization
//!
//! - [`write`] - Renderers for imports, declarations and whole files
//! - [`lint`] - Import normalization rules and the [`Linter`](lint::Linter) runner
//! - [`generate`](generate()) - Lint, render and write files to disk

mod generate;
pub mod lint;
mod template;
pub mod write;

pub use generate::{generate, lint_and_generate, render_file_contents};
pub use lint::{LintRule, Linter, lint, lint_custom};
pub use write::{
    write_decl_func, write_decl_type, write_decl_vars, write_file_contents, write_imports,
};
