//! Import paths and the aliases a file binds them to.

use std::collections::HashMap;

use serde::Serialize;

/// Map from import path to the local alias used in a file.
pub type ImportAliases = HashMap<String, String>;

/// A single import of a file.
///
/// `alias` is empty when the import is written without one. Imports are
/// rendered grouped by `group`, in ascending order, with a blank line between
/// groups.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportAndAlias {
    pub import: String,
    pub alias: String,
    pub group: i32,
}

impl ImportAndAlias {
    pub fn new(import: impl Into<String>) -> Self {
        Self {
            import: import.into(),
            ..Default::default()
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = alias.into();
        self
    }

    pub fn with_group(mut self, group: i32) -> Self {
        self.group = group;
        self
    }

    /// The identifier this import is referred to by inside the file.
    pub fn local_name(&self) -> String {
        if self.alias.is_empty() {
            default_alias(&self.import)
        } else {
            self.alias.clone()
        }
    }
}

/// The package name Go binds an unaliased import to.
///
/// This is the last path segment, skipping a trailing `/vN` major version
/// segment and dropping a `.vN` suffix (`gopkg.in/yaml.v3` binds `yaml`).
pub fn default_alias(import: &str) -> String {
    let mut segments = import.rsplit('/').filter(|s| !s.is_empty());
    let last = segments.next().unwrap_or_default();

    let name = if is_major_version(last) {
        segments.next().unwrap_or(last)
    } else {
        last
    };

    match name.rsplit_once('.') {
        Some((base, suffix)) if is_major_version(suffix) && !base.is_empty() => base.to_string(),
        _ => name.to_string(),
    }
}

fn is_major_version(segment: &str) -> bool {
    segment
        .strip_prefix('v')
        .is_some_and(|n| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()))
}

/// Build the import path to alias map used when rendering a file.
///
/// Blank (`_`) and dot imports bind no usable name and are skipped.
pub fn import_aliases(imports: &[ImportAndAlias]) -> ImportAliases {
    imports
        .iter()
        .filter(|i| i.alias != "_" && i.alias != ".")
        .map(|i| (i.import.clone(), i.local_name()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_alias_last_segment() {
        assert_eq!(default_alias("context"), "context");
        assert_eq!(default_alias("net/http"), "http");
        assert_eq!(default_alias("github.com/shopspring/decimal"), "decimal");
    }

    #[test]
    fn test_default_alias_major_versions() {
        assert_eq!(default_alias("github.com/jackc/pgx/v5"), "pgx");
        assert_eq!(default_alias("gopkg.in/yaml.v3"), "yaml");
        assert_eq!(default_alias("example.com/v2"), "example.com");
    }

    #[test]
    fn test_import_aliases_uses_default_for_unaliased() {
        let imports = vec![
            ImportAndAlias::new("context"),
            ImportAndAlias::new("github.com/a/b").with_alias("b2"),
            ImportAndAlias::new("embed").with_alias("_"),
        ];

        let aliases = import_aliases(&imports);

        assert_eq!(aliases.len(), 2);
        assert_eq!(aliases["context"], "context");
        assert_eq!(aliases["github.com/a/b"], "b2");
    }
}
