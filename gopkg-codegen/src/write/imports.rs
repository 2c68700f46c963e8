use std::io::Write;

use eyre::{Result, bail};
use gopkg_model::ImportAndAlias;

/// Write an import declaration.
///
/// Nothing is written for an empty list. A single unaliased import is written
/// on one line, anything else as a parenthesized block with a blank line
/// wherever `group` increases. Groups must not decrease.
pub fn write_imports(w: &mut impl Write, imports: &[ImportAndAlias]) -> Result<()> {
    let Some(first) = imports.first() else {
        return Ok(());
    };

    if let [only] = imports {
        if only.alias.is_empty() {
            writeln!(w, "import \"{}\"", only.import)?;
            return Ok(());
        }
    }

    let mut out = String::from("import (\n");
    let mut last_group = first.group;
    for import in imports {
        if import.group < last_group {
            bail!(
                "import groups are not in order: `{}` has group {} after group {}",
                import.import,
                import.group,
                last_group
            );
        }
        if import.group > last_group {
            out.push('\n');
        }
        out.push('\t');
        if !import.alias.is_empty() {
            out.push_str(&import.alias);
            out.push(' ');
        }
        out.push('"');
        out.push_str(&import.import);
        out.push_str("\"\n");
        last_group = import.group;
    }
    out.push_str(")\n");

    w.write_all(out.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(imports: &[ImportAndAlias]) -> Result<String> {
        let mut buf = Vec::new();
        write_imports(&mut buf, imports)?;
        Ok(String::from_utf8(buf)?)
    }

    #[test]
    fn test_empty_writes_nothing() {
        assert_eq!(render(&[]).unwrap(), "");
    }

    #[test]
    fn test_single_import() {
        assert_eq!(
            render(&[ImportAndAlias::new("context")]).unwrap(),
            "import \"context\"\n"
        );
    }

    #[test]
    fn test_single_aliased_import_uses_block() {
        assert_eq!(
            render(&[ImportAndAlias::new("context").with_alias("c")]).unwrap(),
            "import (\n\tc \"context\"\n)\n"
        );
    }

    #[test]
    fn test_groups_get_one_blank_line() {
        let imports = [
            ImportAndAlias::new("context"),
            ImportAndAlias::new("fmt"),
            ImportAndAlias::new("github.com/shopspring/decimal").with_group(1),
            ImportAndAlias::new("example.com/me/pkg")
                .with_alias("pkg")
                .with_group(3),
        ];

        insta::assert_snapshot!(render(&imports).unwrap(), @r#"
import (
	"context"
	"fmt"

	"github.com/shopspring/decimal"

	pkg "example.com/me/pkg"
)
"#);
    }

    #[test]
    fn test_decreasing_group_is_an_error() {
        let imports = [
            ImportAndAlias::new("b").with_group(1),
            ImportAndAlias::new("a"),
        ];
        let err = render(&imports).unwrap_err();
        assert!(err.to_string().starts_with("import groups are not in order"));
    }
}
