//! Rule placing imports of the current module in the last group.

use eyre::Result;
use gopkg_model::FileContents;

use super::super::LintRule;

/// Moves imports of `module` (the module path itself or any package below
/// it) into a trailing group of their own.
pub struct GroupModuleImportsLast {
    module: String,
}

impl GroupModuleImportsLast {
    pub fn new(module: impl Into<String>) -> Self {
        Self {
            module: module.into(),
        }
    }

    fn is_module_import(&self, import: &str) -> bool {
        import
            .strip_prefix(self.module.as_str())
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
    }
}

impl LintRule for GroupModuleImportsLast {
    fn name(&self) -> &str {
        "group-module-imports-last"
    }

    fn apply(&self, files: &mut [FileContents]) -> Result<()> {
        if self.module.is_empty() {
            return Ok(());
        }

        for file in files {
            let highest_other = file
                .imports
                .iter()
                .filter(|i| !self.is_module_import(&i.import))
                .map(|i| i.group)
                .max();
            let module_group = highest_other.map_or(0, |g| g + 1);

            for import in &mut file.imports {
                if self.is_module_import(&import.import) {
                    import.group = module_group;
                }
            }
            file.imports.sort_by_key(|i| i.group);
        }
        Ok(())
    }
}
