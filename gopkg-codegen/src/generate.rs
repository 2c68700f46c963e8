//! Rendering files to disk.

use eyre::{Result, WrapErr, bail};
use gopkg_core::{WriteResult, write_file};
use gopkg_model::FileContents;
use tracing::info;

use crate::{
    lint::{LintRule, lint},
    write::write_file_contents,
};

/// Render a file to a string.
pub fn render_file_contents(file: &FileContents) -> Result<String> {
    let mut buf = Vec::new();
    write_file_contents(&mut buf, file)?;
    String::from_utf8(buf).wrap_err("rendered Go source is not valid UTF-8")
}

/// Render every file and write it to its `filepath`.
///
/// Each file is rendered completely before anything is written, so a render
/// error never leaves a truncated file behind.
pub fn generate(files: &[FileContents]) -> Result<()> {
    for file in files {
        if file.filepath.as_os_str().is_empty() {
            bail!(
                "cannot generate package `{}`: file path is empty",
                file.package_name
            );
        }

        let content = render_file_contents(file)
            .wrap_err_with(|| format!("failed to render `{}`", file.filepath.display()))?;
        let result = write_file(&file.filepath, &content)?;

        match result {
            WriteResult::Created => info!(path = %file.filepath.display(), "created"),
            WriteResult::Overwritten => info!(path = %file.filepath.display(), "overwritten"),
            WriteResult::Unchanged => info!(path = %file.filepath.display(), "unchanged"),
        }
    }
    Ok(())
}

/// Run [`lint`] with `extra_rules`, then [`generate`].
pub fn lint_and_generate(
    files: &mut [FileContents],
    extra_rules: impl IntoIterator<Item = Box<dyn LintRule>>,
) -> Result<()> {
    lint(files, extra_rules)?;
    generate(files)
}
