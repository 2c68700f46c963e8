use std::{collections::BTreeSet, path::PathBuf};

use serde::Serialize;

use crate::{DeclFunc, DeclType, DeclVar, ImportAliases, ImportAndAlias, import_aliases};

/// The declarations of one Go source file.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FileContents {
    pub filepath: PathBuf,
    pub package_name: String,
    pub package_import_path: String,
    pub doc_string: Option<String>,
    pub imports: Vec<ImportAndAlias>,
    pub consts: Vec<DeclVar>,
    pub vars: Vec<DeclVar>,
    pub types: Vec<DeclType>,
    pub functions: Vec<DeclFunc>,
}

impl FileContents {
    pub fn new(filepath: impl Into<PathBuf>, package_name: impl Into<String>) -> Self {
        Self {
            filepath: filepath.into(),
            package_name: package_name.into(),
            ..Default::default()
        }
    }

    pub fn with_package_import_path(mut self, import_path: impl Into<String>) -> Self {
        self.package_import_path = import_path.into();
        self
    }

    /// Every import path referenced by a declaration of this file.
    ///
    /// The file's own package path is included when referenced; callers
    /// decide whether to drop it.
    pub fn required_imports(&self) -> BTreeSet<String> {
        let mut imports = BTreeSet::new();
        for var in self.consts.iter().chain(&self.vars) {
            var.collect_imports(&mut imports);
        }
        for decl in &self.types {
            if let Some(ty) = &decl.ty {
                ty.collect_imports(&mut imports);
            }
        }
        for func in &self.functions {
            func.collect_imports(&mut imports);
        }
        imports
    }

    /// The alias map used to render this file's declarations.
    pub fn import_aliases(&self) -> ImportAliases {
        import_aliases(&self.imports)
    }
}
