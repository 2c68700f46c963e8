//! Built-in lint rules.

mod add_alias_to_all_imports;
mod add_required_imports;
mod group_module_imports_last;
mod group_std_imports_first;

pub use add_alias_to_all_imports::AddAliasToAllImports;
pub use add_required_imports::AddRequiredImports;
pub use group_module_imports_last::GroupModuleImportsLast;
pub use group_std_imports_first::{GroupStdImportsFirst, is_std_import};
