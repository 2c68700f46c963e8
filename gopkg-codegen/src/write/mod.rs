//! Renderers from the declaration model to Go source.
//!
//! Every writer emits text ending in exactly one newline and no blank lines
//! around it. [`write_file_contents`] joins the sections of a file with a
//! single blank line.

mod decl_func;
mod decl_type;
mod decl_var;
mod file_contents;
mod imports;

pub use decl_func::write_decl_func;
pub use decl_type::write_decl_type;
pub use decl_var::write_decl_vars;
pub use file_contents::write_file_contents;
pub use imports::write_imports;
