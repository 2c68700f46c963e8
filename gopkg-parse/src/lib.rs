//! Go package parser.
//!
//! Reads a Go package (a directory or a single file) with tree-sitter-go and
//! converts its top-level declarations into [`FileContents`].
//!
//! ```no_run
//! use gopkg_parse::{ParseOptions, parse};
//!
//! let files = parse("./pkg/orders", ParseOptions::default())?;
//! for file in &files {
//!     println!("{}: {} functions", file.filepath.display(), file.functions.len());
//! }
//! # Ok::<(), Box<gopkg_parse::Error>>(())
//! ```

// Miette's derive macro generates code that triggers these warnings
#![allow(unused_assignments)]

mod comments;
mod decls;
mod dependent;
mod error;
mod imports;
mod module;
mod options;
mod syntax;
mod types;

use std::path::{Path, PathBuf};

use gopkg_model::FileContents;
use tracing::{debug, info};

use crate::{decls::FileWalker, dependent::DependentTypes, syntax::GoParser};

pub use dependent::PackageLocator;
pub use error::{Error, Result, SourceContext};
pub use module::{
    GoMod, Module, ReplaceTarget, Replacement, Requirement, find_module, package_import_path,
};
pub use options::ParseOptions;

/// Parse the package at `path` into one [`FileContents`] per `.go` file,
/// sorted by file path.
pub fn parse(path: impl AsRef<Path>, options: ParseOptions) -> Result<Vec<FileContents>> {
    let path = path.as_ref();
    if path.as_os_str().is_empty() {
        return Err(Box::new(Error::EmptyPath));
    }
    if !path.exists() {
        return Err(Box::new(Error::NoSuchPath {
            path: path.to_path_buf(),
        }));
    }

    let import_path = match &options.pkg_import_path {
        Some(import_path) => import_path.clone(),
        None => package_import_path(path)?,
    };

    let sources = if path.is_dir() {
        source_files(path)?
    } else {
        vec![path.to_path_buf()]
    };
    if sources.is_empty() {
        return Err(Box::new(Error::NoGoFiles {
            path: path.to_path_buf(),
        }));
    }

    info!(path = %path.display(), import_path = %import_path, files = sources.len(), "parsing package");

    let mut parser = GoParser::new()?;
    let mut files = Vec::with_capacity(sources.len());
    for source in &sources {
        let ctx = read_source(source)?;
        let tree = parser.parse(&ctx)?;
        let file = FileWalker::new(&ctx, tree.root_node(), &import_path).file_contents(source)?;
        files.push(file);
    }

    if options.dependent_types {
        let locator = PackageLocator::from_env(find_module(path).ok());
        let mut deps = DependentTypes::new(locator)?;
        for file in &mut files {
            deps.resolve_file(file)?;
        }
    }

    files.sort_by(|a, b| a.filepath.cmp(&b.filepath));
    Ok(files)
}

/// Every `.go` file directly inside `dir`, sorted by name.
pub(crate) fn source_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let io_err = |source| {
        Box::new(Error::Io {
            path: dir.to_path_buf(),
            source,
        })
    };

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "go") {
            files.push(path);
        }
    }
    files.sort();
    debug!(dir = %dir.display(), count = files.len(), "found go files");
    Ok(files)
}

pub(crate) fn read_source(path: &Path) -> Result<SourceContext> {
    let content = std::fs::read_to_string(path).map_err(|source| {
        Box::new(Error::Io {
            path: path.to_path_buf(),
            source,
        })
    })?;
    Ok(SourceContext::new(content, path.display().to_string()))
}
