use std::io::Write;

use eyre::{Result, bail};
use gopkg_model::{DeclType, ImportAliases};

/// Write `type Name T`, preceded by its doc comment.
pub fn write_decl_type(w: &mut impl Write, decl: &DeclType, aliases: &ImportAliases) -> Result<()> {
    if decl.name.is_empty() {
        bail!("cannot write type declaration with an empty name");
    }
    let Some(ty) = &decl.ty else {
        bail!("cannot write type `{}` without a type", decl.name);
    };

    let full = ty.full_type(aliases)?;
    if let Some(doc) = &decl.doc_string {
        writeln!(w, "{doc}")?;
    }
    writeln!(w, "type {} {}", decl.name, full)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use gopkg_model::{DeclFunc, DeclVar, Type};

    use super::*;

    fn render(decl: &DeclType) -> Result<String> {
        let aliases: ImportAliases = [("context".to_string(), "c".to_string())].into();
        let mut buf = Vec::new();
        write_decl_type(&mut buf, decl, &aliases)?;
        Ok(String::from_utf8(buf)?)
    }

    #[test]
    fn test_simple_type() {
        let decl = DeclType::new("Amount", Type::Int64).with_doc_string("// Amount in cents.");
        assert_eq!(
            render(&decl).unwrap(),
            "// Amount in cents.\ntype Amount int64\n"
        );
    }

    #[test]
    fn test_interface_type() {
        let mut iface = Type::interface(vec![
            DeclFunc::new("Get")
                .with_args(vec![
                    DeclVar::new("ctx", Type::named("Context", "context")),
                    DeclVar::new("id", Type::Int64),
                ])
                .with_return_args(vec![
                    DeclVar::unnamed(Type::String),
                    DeclVar::unnamed(Type::Error),
                ]),
        ]);
        if let Type::Interface(i) = &mut iface {
            i.embeds.push(Type::named("Closer", ""));
        }

        insta::assert_snapshot!(render(&DeclType::new("Store", iface)).unwrap(), @r"
type Store interface {
	Closer
	Get(ctx c.Context, id int64) (string, error)
}
");
    }

    #[test]
    fn test_missing_name_or_type() {
        assert!(render(&DeclType::new("", Type::Int)).is_err());

        let mut decl = DeclType::new("T", Type::Int);
        decl.ty = None;
        let err = render(&decl).unwrap_err();
        assert_eq!(err.to_string(), "cannot write type `T` without a type");
    }
}
