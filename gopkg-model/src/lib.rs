//! Go type and declaration model.
//!
//! The model is shared by the parser and the renderer:
//!
//! ```text
//! .go source → gopkg-parse → FileContents → (lint) → gopkg-codegen → .go source
//! ```
//!
//! Every type can render itself as Go source ([`Type::full_type`]), produce
//! its zero value ([`Type::default_init`]) and report the packages it
//! references ([`Type::required_imports`]).

mod decl;
mod error;
mod file;
mod imports;
mod signature;
mod sort;
pub mod tmpl;
mod types;

pub use decl::{DeclFunc, DeclType, DeclVar, Receiver};
pub use error::{Result, TypeError};
pub use file::FileContents;
pub use imports::{ImportAliases, ImportAndAlias, default_alias, import_aliases};
pub use sort::sort_funcs;
pub use types::{FuncType, InterfaceType, NamedType, StructType, Type};
