use std::path::PathBuf;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Result type for parse operations (boxed to reduce size on stack)
pub type Result<T> = std::result::Result<T, Box<Error>>;

/// Source context for error reporting.
///
/// Holds the content of one Go file together with its path so that errors
/// raised deep inside the syntax walk can point at the offending span.
///
/// # Example
///
/// ```ignore
/// let ctx = SourceContext::new(content, "pkg/file.go");
/// ctx.unsupported_at("channel types are not supported", node.span());
/// ```
#[derive(Debug, Clone)]
pub struct SourceContext {
    src: String,
    filename: String,
}

impl SourceContext {
    /// Create a new source context.
    pub fn new(src: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            filename: filename.into(),
        }
    }

    /// Get the source content.
    pub fn src(&self) -> &str {
        &self.src
    }

    /// Get the filename.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Create a NamedSource for miette error reporting.
    pub fn named_source(&self) -> NamedSource<String> {
        NamedSource::new(&self.filename, self.src.clone())
    }

    /// Create a syntax error pointing at a span.
    pub fn syntax_error_at(
        &self,
        message: impl Into<String>,
        span: impl Into<SourceSpan>,
    ) -> Box<Error> {
        Box::new(Error::Syntax {
            src: self.named_source(),
            span: span.into(),
            message: message.into(),
        })
    }

    /// Create an unsupported construct error.
    pub fn unsupported_at(
        &self,
        message: impl Into<String>,
        span: impl Into<SourceSpan>,
    ) -> Box<Error> {
        Box::new(Error::Unsupported {
            src: self.named_source(),
            span: span.into(),
            message: message.into(),
        })
    }

    /// Create an unknown import alias error.
    pub fn unknown_import_at(
        &self,
        alias: impl Into<String>,
        span: impl Into<SourceSpan>,
    ) -> Box<Error> {
        Box::new(Error::UnknownImport {
            src: self.named_source(),
            span: span.into(),
            alias: alias.into(),
        })
    }

    /// Create a dot import error.
    pub fn dot_import_at(&self, span: impl Into<SourceSpan>) -> Box<Error> {
        Box::new(Error::DotImport {
            src: self.named_source(),
            span: span.into(),
        })
    }

    /// Create a multiple receivers error.
    pub fn multiple_receivers_at(
        &self,
        name: impl Into<String>,
        span: impl Into<SourceSpan>,
    ) -> Box<Error> {
        Box::new(Error::MultipleReceivers {
            src: self.named_source(),
            span: span.into(),
            name: name.into(),
        })
    }

    /// Create a mixed named and unnamed parameters error.
    pub fn mixed_params_at(&self, span: impl Into<SourceSpan>) -> Box<Error> {
        Box::new(Error::MixedParams {
            src: self.named_source(),
            span: span.into(),
        })
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("cannot get import path for empty path")]
    EmptyPath,

    #[error("no such path `{}`", path.display())]
    NoSuchPath { path: PathBuf },

    #[error("path `{}` not within a go module", path.display())]
    #[diagnostic(help("run `go mod init <module>` in the package root, or pass an explicit import path"))]
    NotInModule { path: PathBuf },

    #[error("invalid go.mod `{}`: {reason}", path.display())]
    #[diagnostic(code(gopkg::go_mod))]
    InvalidGoMod { path: PathBuf, reason: String },

    #[error("failed to read '{}'", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no Go files in `{}`", path.display())]
    NoGoFiles { path: PathBuf },

    #[error("failed to load the Go grammar: {0}")]
    Language(String),

    #[error("tree-sitter produced no syntax tree for '{}'", path.display())]
    NoTree { path: PathBuf },

    #[error("{message}")]
    #[diagnostic(code(gopkg::syntax_error))]
    Syntax {
        #[source_code]
        src: NamedSource<String>,
        #[label("{message}")]
        span: SourceSpan,
        message: String,
    },

    #[error("{message}")]
    #[diagnostic(code(gopkg::unsupported))]
    Unsupported {
        #[source_code]
        src: NamedSource<String>,
        #[label("not supported")]
        span: SourceSpan,
        message: String,
    },

    #[error("unknown import alias `{alias}`")]
    #[diagnostic(
        code(gopkg::unknown_import),
        help("every qualified identifier must refer to an import of the same file")
    )]
    UnknownImport {
        #[source_code]
        src: NamedSource<String>,
        #[label("not imported in this file")]
        span: SourceSpan,
        alias: String,
    },

    #[error("dot imports are not supported")]
    #[diagnostic(code(gopkg::dot_import), help("import the package with a name instead"))]
    DotImport {
        #[source_code]
        src: NamedSource<String>,
        #[label("dot import")]
        span: SourceSpan,
    },

    #[error("method `{name}` has more than one receiver")]
    #[diagnostic(code(gopkg::multiple_receivers))]
    MultipleReceivers {
        #[source_code]
        src: NamedSource<String>,
        #[label("receiver list")]
        span: SourceSpan,
        name: String,
    },

    #[error("mix of named and unnamed parameters")]
    #[diagnostic(code(gopkg::mixed_params))]
    MixedParams {
        #[source_code]
        src: NamedSource<String>,
        #[label("parameter list")]
        span: SourceSpan,
    },

    #[error("cannot locate package `{import}`")]
    #[diagnostic(help(
        "dependent types are looked up in the current module, vendor/, the module cache and GOROOT"
    ))]
    PackageNotFound { import: String },

    #[error("type `{name}` not found in package `{import}`")]
    TypeNotFound { import: String, name: String },
}
