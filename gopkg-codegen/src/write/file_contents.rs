use std::io::Write;

use eyre::{Result, WrapErr, bail};
use gopkg_model::FileContents;

use super::{write_decl_func, write_decl_type, write_decl_vars, write_imports};

/// Write a complete Go source file.
///
/// Sections are written in the order package clause, imports, consts, vars,
/// types, functions. Consecutive sections are separated by one blank line and
/// the output ends with a single newline.
pub fn write_file_contents(w: &mut impl Write, file: &FileContents) -> Result<()> {
    if file.package_name.is_empty() {
        bail!(
            "cannot write `{}`: package name is empty",
            file.filepath.display()
        );
    }

    let aliases = file.import_aliases();
    let mut sections: Vec<Vec<u8>> = Vec::new();

    let mut header = Vec::new();
    if let Some(doc) = &file.doc_string {
        writeln!(header, "{doc}")?;
    }
    writeln!(header, "package {}", file.package_name)?;
    sections.push(header);

    let mut imports = Vec::new();
    write_imports(&mut imports, &file.imports)?;
    sections.push(imports);

    let mut consts = Vec::new();
    write_decl_vars(&mut consts, "const", &file.consts, &aliases)?;
    sections.push(consts);

    let mut vars = Vec::new();
    write_decl_vars(&mut vars, "var", &file.vars, &aliases)?;
    sections.push(vars);

    for decl in &file.types {
        let mut buf = Vec::new();
        write_decl_type(&mut buf, decl, &aliases)
            .wrap_err_with(|| format!("failed to write type `{}`", decl.name))?;
        sections.push(buf);
    }

    for decl in &file.functions {
        let mut buf = Vec::new();
        write_decl_func(&mut buf, decl, &aliases)
            .wrap_err_with(|| format!("failed to write func `{}`", decl.name))?;
        sections.push(buf);
    }

    let out = sections
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(&b'\n');
    w.write_all(&out)?;
    Ok(())
}
