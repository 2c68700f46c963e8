/// Options for [`parse`](crate::parse).
///
/// # Example
///
/// ```
/// use gopkg_parse::ParseOptions;
///
/// let options = ParseOptions::default()
///     .with_pkg_import_path("github.com/example/project/pkg")
///     .with_dependent_types();
/// assert!(options.dependent_types);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Import path of the parsed package. Inferred from `go.mod` when unset.
    pub pkg_import_path: Option<String>,
    /// Resolve named types from other packages one level deep.
    pub dependent_types: bool,
}

impl ParseOptions {
    pub fn with_pkg_import_path(mut self, import_path: impl Into<String>) -> Self {
        self.pkg_import_path = Some(import_path.into());
        self
    }

    pub fn with_dependent_types(mut self) -> Self {
        self.dependent_types = true;
        self
    }
}
