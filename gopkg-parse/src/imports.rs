//! Per-file import table.

use gopkg_model::ImportAndAlias;
use indexmap::IndexMap;
use tree_sitter::Node;

use crate::{
    error::{Result, SourceContext},
    syntax::{NodeExt, unquote},
};

/// Key under which the file's own package is registered.
///
/// It is not a valid Go identifier, so no import alias can shadow it.
pub(crate) const CURRENT_PACKAGE: &str = "<current package>";

/// Maps the names a file can qualify identifiers with to import paths.
#[derive(Debug, Clone)]
pub(crate) struct ImportTable {
    by_alias: IndexMap<String, String>,
}

impl ImportTable {
    pub fn new(current_package: impl Into<String>) -> Self {
        let mut by_alias = IndexMap::new();
        by_alias.insert(CURRENT_PACKAGE.to_string(), current_package.into());
        Self { by_alias }
    }

    pub fn current_package(&self) -> &str {
        self.by_alias
            .get(CURRENT_PACKAGE)
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// Import path bound to `alias`.
    pub fn resolve(&self, alias: &str) -> Option<&str> {
        if alias == CURRENT_PACKAGE {
            return None;
        }
        self.by_alias.get(alias).map(String::as_str)
    }

    fn bind(&mut self, import: &ImportAndAlias) {
        if import.alias == "_" {
            return;
        }
        self.by_alias
            .insert(import.local_name(), import.import.clone());
    }
}

/// Read every import declaration of a file.
///
/// Imports keep their alias only when one is written. A blank line inside a
/// parenthesized block, or a new import declaration, starts a new group.
pub(crate) fn collect_imports(
    ctx: &SourceContext,
    root: Node<'_>,
    table: &mut ImportTable,
) -> Result<Vec<ImportAndAlias>> {
    let mut imports = Vec::new();
    let mut group = 0;

    for decl in root
        .code_children()
        .into_iter()
        .filter(|n| n.kind() == "import_declaration")
    {
        if !imports.is_empty() {
            group += 1;
        }

        let mut prev_end_row = None;
        for spec in import_specs(decl) {
            if prev_end_row.is_some_and(|end| spec.start_position().row > end + 1) {
                group += 1;
            }
            prev_end_row = Some(spec.end_position().row);

            let import = import_spec(ctx, spec)?.with_group(group);
            table.bind(&import);
            imports.push(import);
        }
    }

    Ok(imports)
}

fn import_specs(decl: Node<'_>) -> Vec<Node<'_>> {
    let mut specs = Vec::new();
    for child in decl.code_children() {
        match child.kind() {
            "import_spec" => specs.push(child),
            "import_spec_list" => specs.extend(
                child
                    .code_children()
                    .into_iter()
                    .filter(|c| c.kind() == "import_spec"),
            ),
            _ => {}
        }
    }
    specs
}

fn import_spec(ctx: &SourceContext, spec: Node<'_>) -> Result<ImportAndAlias> {
    let path = spec
        .field("path")
        .map(|p| unquote(p.text(ctx.src())).to_string())
        .ok_or_else(|| ctx.syntax_error_at("import without a path", spec.span()))?;

    let mut import = ImportAndAlias::new(path);
    if let Some(name) = spec.field("name") {
        let alias = name.text(ctx.src());
        if name.kind() == "dot" || alias == "." {
            return Err(ctx.dot_import_at(spec.span()));
        }
        import = import.with_alias(alias);
    }

    Ok(import)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::Error, syntax::GoParser};

    fn imports_of(src: &str) -> Result<(Vec<ImportAndAlias>, ImportTable)> {
        let ctx = SourceContext::new(src, "imports.go");
        let tree = GoParser::new()?.parse(&ctx)?;
        let mut table = ImportTable::new("example.com/me");
        let imports = collect_imports(&ctx, tree.root_node(), &mut table)?;
        Ok((imports, table))
    }

    #[test]
    fn test_single_import() {
        let (imports, table) = imports_of("package p\n\nimport \"context\"\n").unwrap();

        assert_eq!(imports, vec![ImportAndAlias::new("context")]);
        assert_eq!(table.resolve("context"), Some("context"));
        assert_eq!(table.current_package(), "example.com/me");
    }

    #[test]
    fn test_grouped_imports_with_aliases() {
        let src = r#"package p

import (
	"fmt"
	c "context"

	"github.com/shopspring/decimal"
	_ "embed"
)
"#;
        let (imports, table) = imports_of(src).unwrap();

        assert_eq!(
            imports,
            vec![
                ImportAndAlias::new("fmt"),
                ImportAndAlias::new("context").with_alias("c"),
                ImportAndAlias::new("github.com/shopspring/decimal").with_group(1),
                ImportAndAlias::new("embed").with_alias("_").with_group(1),
            ]
        );
        assert_eq!(table.resolve("c"), Some("context"));
        assert_eq!(table.resolve("context"), None);
        assert_eq!(table.resolve("decimal"), Some("github.com/shopspring/decimal"));
        assert_eq!(table.resolve("_"), None);
    }

    #[test]
    fn test_versioned_import_binds_package_name() {
        let (_, table) = imports_of("package p\n\nimport \"github.com/jackc/pgx/v5\"\n").unwrap();
        assert_eq!(table.resolve("pgx"), Some("github.com/jackc/pgx/v5"));
    }

    #[test]
    fn test_dot_import_rejected() {
        let err = imports_of("package p\n\nimport . \"fmt\"\n").unwrap_err();
        assert!(matches!(*err, Error::DotImport { .. }));
    }

    #[test]
    fn test_current_package_sentinel_is_not_an_alias() {
        let table = ImportTable::new("example.com/me");
        assert_eq!(table.resolve(CURRENT_PACKAGE), None);
    }
}
