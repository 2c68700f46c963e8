//! Shorthands for building declarations in generator programs.

use crate::{DeclVar, FileContents, ImportAndAlias, Type};

/// Unnamed return args, one per type.
pub fn unnamed_return_args(types: impl IntoIterator<Item = Type>) -> Vec<DeclVar> {
    types.into_iter().map(DeclVar::unnamed).collect()
}

/// Unaliased imports in group 0.
pub fn unnamed_imports<I, S>(paths: I) -> Vec<ImportAndAlias>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    paths.into_iter().map(ImportAndAlias::new).collect()
}

/// Run each builder in order and append the files it returns.
///
/// Stops at the first builder that fails.
pub fn append_file_contents<E, F>(
    mut files: Vec<FileContents>,
    builders: impl IntoIterator<Item = F>,
) -> Result<Vec<FileContents>, E>
where
    F: FnOnce() -> Result<Vec<FileContents>, E>,
{
    for build in builders {
        files.extend(build()?);
    }
    Ok(files)
}
