//! Rule giving every import an explicit, unique alias.

use std::collections::HashSet;

use eyre::Result;
use gopkg_model::{FileContents, default_alias};

use super::super::LintRule;

/// Gives every unaliased import its default alias.
///
/// Collisions within a file are resolved by appending `2`, `3`, ... to the
/// alias. Existing aliases, including `_`, are kept.
pub struct AddAliasToAllImports;

impl LintRule for AddAliasToAllImports {
    fn name(&self) -> &str {
        "add-alias-to-all-imports"
    }

    fn apply(&self, files: &mut [FileContents]) -> Result<()> {
        for file in files {
            let mut taken: HashSet<String> = file
                .imports
                .iter()
                .filter(|i| !i.alias.is_empty() && i.alias != "_")
                .map(|i| i.alias.clone())
                .collect();

            for import in file.imports.iter_mut().filter(|i| i.alias.is_empty()) {
                let base = default_alias(&import.import);
                let mut alias = base.clone();
                let mut suffix = 2;
                while taken.contains(&alias) {
                    alias = format!("{base}{suffix}");
                    suffix += 1;
                }
                taken.insert(alias.clone());
                import.alias = alias;
            }
        }
        Ok(())
    }
}
