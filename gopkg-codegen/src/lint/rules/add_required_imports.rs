//! Rule adding imports referenced by declarations but missing from a file.

use std::collections::HashSet;

use eyre::Result;
use gopkg_model::{FileContents, ImportAndAlias};
use tracing::trace;

use super::super::LintRule;

/// Adds every import a file's declarations reference.
///
/// Missing imports are appended without an alias and the import list is then
/// sorted by group and path. The file's own package is never imported.
pub struct AddRequiredImports;

impl LintRule for AddRequiredImports {
    fn name(&self) -> &str {
        "add-required-imports"
    }

    fn apply(&self, files: &mut [FileContents]) -> Result<()> {
        for file in files {
            let existing: HashSet<&str> = file.imports.iter().map(|i| i.import.as_str()).collect();
            let missing: Vec<String> = file
                .required_imports()
                .into_iter()
                .filter(|i| !existing.contains(i.as_str()) && *i != file.package_import_path)
                .collect();

            for import in missing {
                trace!(file = %file.filepath.display(), import = %import, "adding required import");
                file.imports.push(ImportAndAlias::new(import));
            }

            file.imports
                .sort_by(|a, b| a.group.cmp(&b.group).then_with(|| a.import.cmp(&b.import)));
        }
        Ok(())
    }
}
