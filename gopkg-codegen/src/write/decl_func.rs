use std::io::Write;

use eyre::{Result, WrapErr, bail};
use gopkg_model::{DeclFunc, ImportAliases};

use crate::template::render_body;

/// Write a function or method declaration.
///
/// The header is `func [(recv)] Name(args) [returns] {`. The body template,
/// if any, is rendered between the braces.
pub fn write_decl_func(w: &mut impl Write, decl: &DeclFunc, aliases: &ImportAliases) -> Result<()> {
    if decl.name.is_empty() {
        bail!("cannot write func declaration with an empty name");
    }

    let mut out = String::new();
    if let Some(doc) = &decl.doc_string {
        out.push_str(doc);
        out.push('\n');
    }

    out.push_str("func ");
    if let Some(receiver) = &decl.receiver {
        out.push_str(&receiver.render());
        out.push(' ');
    }
    out.push_str(&decl.name);
    out.push_str(
        &decl
            .signature(aliases)
            .wrap_err_with(|| format!("invalid signature for func `{}`", decl.name))?,
    );
    out.push_str(" {\n");

    if !decl.body_tmpl.is_empty() {
        let body = render_body(decl, aliases)?;
        out.push_str(&body);
        if !body.is_empty() && !body.ends_with('\n') {
            out.push('\n');
        }
    }
    out.push_str("}\n");

    w.write_all(out.as_bytes())?;
    Ok(())
}
