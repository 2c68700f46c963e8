use std::io::Write;

use eyre::{Result, bail};
use gopkg_model::{DeclVar, ImportAliases, Type};

/// Write `const` or `var` declarations, chosen by `keyword`.
///
/// A single declaration is written on its own line, several as a
/// parenthesized block. Inside a block, a documented entry other than the
/// first is preceded by a blank line.
pub fn write_decl_vars(
    w: &mut impl Write,
    keyword: &str,
    vars: &[DeclVar],
    aliases: &ImportAliases,
) -> Result<()> {
    for var in vars {
        if var.name.is_empty() {
            bail!("cannot write {keyword} declaration with an empty name");
        }
        if var.ty.is_none() && var.literal_value.is_none() {
            bail!(
                "cannot write {keyword} `{}`: one of type or literal value must be set",
                var.name
            );
        }
    }

    let mut out = String::new();
    match vars {
        [] => return Ok(()),
        [var] => {
            if let Some(doc) = &var.doc_string {
                out.push_str(doc);
                out.push('\n');
            }
            out.push_str(keyword);
            out.push(' ');
            out.push_str(&spec_line(var, aliases, false)?);
            out.push('\n');
        }
        _ => {
            out.push_str(keyword);
            out.push_str(" (\n");
            for (i, var) in vars.iter().enumerate() {
                if let Some(doc) = &var.doc_string {
                    if i != 0 {
                        out.push('\n');
                    }
                    out.push('\t');
                    out.push_str(doc);
                    out.push('\n');
                }
                out.push('\t');
                out.push_str(&spec_line(var, aliases, true)?);
                out.push('\n');
            }
            out.push_str(")\n");
        }
    }

    w.write_all(out.as_bytes())?;
    Ok(())
}

/// `name [type] [= value]`. Multi-line types are indented one more level
/// when the spec sits inside a block.
fn spec_line(var: &DeclVar, aliases: &ImportAliases, in_block: bool) -> Result<String> {
    let mut line = var.name.clone();

    if let Some(ty) = var.ty.as_ref().filter(|t| **t != Type::UnnamedLiteral) {
        let full = ty.full_type(aliases)?;
        line.push(' ');
        if in_block {
            line.push_str(&full.replace('\n', "\n\t"));
        } else {
            line.push_str(&full);
        }
    }

    if let Some(value) = &var.literal_value {
        line.push_str(" = ");
        line.push_str(value);
    }

    Ok(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(keyword: &str, vars: &[DeclVar]) -> Result<String> {
        let aliases: ImportAliases =
            [("github.com/shopspring/decimal".to_string(), "decimal".to_string())].into();
        let mut buf = Vec::new();
        write_decl_vars(&mut buf, keyword, vars, &aliases)?;
        Ok(String::from_utf8(buf)?)
    }

    #[test]
    fn test_empty_writes_nothing() {
        assert_eq!(render("var", &[]).unwrap(), "");
    }

    #[test]
    fn test_single_var() {
        let vars = [DeclVar::new("count", Type::Int)
            .with_literal_value("3")
            .with_doc_string("// count of things")];
        assert_eq!(
            render("var", &vars).unwrap(),
            "// count of things\nvar count int = 3\n"
        );
    }

    #[test]
    fn test_unnamed_literal_omits_type() {
        let vars = [DeclVar::new("greeting", Type::UnnamedLiteral).with_literal_value("\"hi\"")];
        assert_eq!(render("const", &vars).unwrap(), "const greeting = \"hi\"\n");
    }

    #[test]
    fn test_literal_without_type() {
        let mut var = DeclVar::unnamed(Type::Int);
        var.name = "n".to_string();
        var.ty = None;
        var.literal_value = Some("5".to_string());
        assert_eq!(render("const", &[var]).unwrap(), "const n = 5\n");
    }

    #[test]
    fn test_block_with_docs() {
        let vars = [
            DeclVar::new("first", Type::Int32)
                .with_literal_value("1")
                .with_doc_string("// first doc"),
            DeclVar::new("price", Type::named("Decimal", "github.com/shopspring/decimal")),
            DeclVar::new("second", Type::String)
                .with_literal_value("\"two\"")
                .with_doc_string("// second with\n\t// several lines"),
        ];

        insta::assert_snapshot!(render("const", &vars).unwrap(), @r#"
const (
	// first doc
	first int32 = 1
	price decimal.Decimal

	// second with
	// several lines
	second string = "two"
)
"#);
    }

    #[test]
    fn test_struct_type_in_block_is_indented() {
        let vars = [
            DeclVar::new("a", Type::structure(vec![DeclVar::new("X", Type::Int)])),
            DeclVar::new("b", Type::Bool),
        ];

        insta::assert_snapshot!(render("var", &vars).unwrap(), @r"
var (
	a struct {
		X int
	}
	b bool
)
");
    }

    #[test]
    fn test_validation_errors() {
        let unnamed = [DeclVar::unnamed(Type::Int)];
        assert!(
            render("var", &unnamed)
                .unwrap_err()
                .to_string()
                .contains("empty name")
        );

        let mut untyped = DeclVar::new("x", Type::Int);
        untyped.ty = None;
        assert!(
            render("var", &[untyped])
                .unwrap_err()
                .to_string()
                .contains("one of type or literal value must be set")
        );
    }
}
