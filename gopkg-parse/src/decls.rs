//! Top-level declarations of one Go file.

use std::path::Path;

use gopkg_model::{DeclFunc, DeclType, DeclVar, FileContents, Receiver, Type};
use tracing::trace;
use tree_sitter::Node;

use crate::{
    comments::doc_comment,
    error::{Result, SourceContext},
    imports::{ImportTable, collect_imports},
    syntax::NodeExt,
    types::TypeConverter,
};

/// Value kinds whose source text is kept as a literal value.
const LITERAL_KINDS: &[&str] = &[
    "int_literal",
    "float_literal",
    "imaginary_literal",
    "rune_literal",
    "interpreted_string_literal",
    "raw_string_literal",
    "identifier",
    "true",
    "false",
    "nil",
    "iota",
];

/// Walks the top-level declarations of a parsed file.
pub(crate) struct FileWalker<'a> {
    ctx: &'a SourceContext,
    root: Node<'a>,
    table: ImportTable,
    package_import_path: &'a str,
}

impl<'a> FileWalker<'a> {
    pub fn new(ctx: &'a SourceContext, root: Node<'a>, package_import_path: &'a str) -> Self {
        Self {
            ctx,
            root,
            table: ImportTable::new(package_import_path),
            package_import_path,
        }
    }

    fn src(&self) -> &'a str {
        self.ctx.src()
    }

    /// Convert the whole file.
    pub fn file_contents(mut self, filepath: &Path) -> Result<FileContents> {
        let clause = self
            .root
            .code_children()
            .into_iter()
            .find(|c| c.kind() == "package_clause")
            .ok_or_else(|| {
                self.ctx
                    .syntax_error_at("missing package clause", self.root.span())
            })?;
        let package_name = clause
            .code_children()
            .into_iter()
            .next()
            .map(|n| n.text(self.src()).to_string())
            .unwrap_or_default();

        let mut file = FileContents::new(filepath, package_name)
            .with_package_import_path(self.package_import_path);
        file.doc_string = doc_comment(clause, self.src());
        file.imports = collect_imports(self.ctx, self.root, &mut self.table)?;

        for node in self.root.code_children() {
            match node.kind() {
                "function_declaration" | "method_declaration" => {
                    file.functions.push(self.func(node)?);
                }
                "type_declaration" => file.types.extend(self.types(node)?),
                "const_declaration" => file.consts.extend(self.values(node)?),
                "var_declaration" => file.vars.extend(self.values(node)?),
                _ => {}
            }
        }

        trace!(
            file = %filepath.display(),
            consts = file.consts.len(),
            vars = file.vars.len(),
            types = file.types.len(),
            functions = file.functions.len(),
            "walked file"
        );
        Ok(file)
    }

    /// Convert only the type declaration called `name`, if this file has one.
    pub fn find_type(mut self, name: &str) -> Result<Option<DeclType>> {
        collect_imports(self.ctx, self.root, &mut self.table)?;

        for decl in self
            .root
            .code_children()
            .into_iter()
            .filter(|c| c.kind() == "type_declaration")
        {
            let grouped = decl.has_token("(");
            for spec in decl.code_children() {
                let matches = spec
                    .field("name")
                    .is_some_and(|n| n.text(self.src()) == name);
                if matches {
                    return self.type_spec(decl, spec, grouped).map(Some);
                }
            }
        }

        Ok(None)
    }

    fn converter(&self) -> TypeConverter<'_> {
        TypeConverter::new(self.ctx, &self.table)
    }

    /// Doc of a spec inside a declaration. Grouped specs carry their own doc
    /// and the group's doc is dropped.
    fn spec_doc(&self, decl: Node<'_>, spec: Node<'_>, grouped: bool) -> Option<String> {
        if grouped {
            doc_comment(spec, self.src())
        } else {
            doc_comment(decl, self.src())
        }
    }

    fn types(&self, decl: Node<'_>) -> Result<Vec<DeclType>> {
        let grouped = decl.has_token("(");
        decl.code_children()
            .into_iter()
            .map(|spec| self.type_spec(decl, spec, grouped))
            .collect()
    }

    fn type_spec(&self, decl: Node<'_>, spec: Node<'_>, grouped: bool) -> Result<DeclType> {
        match spec.kind() {
            "type_spec" => {}
            "type_alias" => {
                return Err(self
                    .ctx
                    .unsupported_at("type aliases are not supported", spec.span()));
            }
            other => {
                return Err(self
                    .ctx
                    .syntax_error_at(format!("unexpected `{other}` in type declaration"), spec.span()));
            }
        }
        if let Some(params) = spec.field("type_parameters") {
            return Err(self
                .ctx
                .unsupported_at("generic types are not supported", params.span()));
        }

        let name = self.required(spec, "name")?.text(self.src());
        let ty = self.converter().convert(self.required(spec, "type")?)?;

        let mut decl_type = DeclType::new(name, ty).with_import(self.package_import_path);
        decl_type.doc_string = self.spec_doc(decl, spec, grouped);
        Ok(decl_type)
    }

    /// Convert a `const` or `var` declaration.
    ///
    /// Inside a const group a spec with neither a type nor values repeats the
    /// type of the spec before it, as with `iota` enumerations.
    fn values(&self, decl: Node<'_>) -> Result<Vec<DeclVar>> {
        let mut specs = Vec::new();
        let mut grouped = decl.has_token("(");
        for child in decl.code_children() {
            match child.kind() {
                "const_spec" | "var_spec" => specs.push(child),
                "const_spec_list" | "var_spec_list" => {
                    grouped = true;
                    specs.extend(child.code_children());
                }
                _ => {}
            }
        }

        let mut vars = Vec::new();
        let mut previous_type = Type::UnnamedLiteral;

        for spec in specs {
            let names = spec.fields("name");
            let values = spec
                .field("value")
                .map(|list| list.code_children())
                .unwrap_or_default();

            let ty = match spec.field("type") {
                Some(node) => self.converter().convert(node)?,
                None if values.is_empty() && decl.kind() == "const_declaration" => {
                    previous_type.clone()
                }
                None => Type::UnnamedLiteral,
            };
            previous_type = ty.clone();

            let doc = self.spec_doc(decl, spec, grouped);
            let literals = names.len() == values.len();

            for (i, name) in names.iter().enumerate() {
                let mut var = DeclVar::new(name.text(self.src()), ty.clone())
                    .with_import(self.package_import_path);
                var.doc_string = doc.clone();
                if literals && LITERAL_KINDS.contains(&values[i].kind()) {
                    var.literal_value = Some(values[i].text(self.src()).to_string());
                }
                vars.push(var);
            }
        }

        Ok(vars)
    }

    fn func(&self, node: Node<'_>) -> Result<DeclFunc> {
        if let Some(params) = node.field("type_parameters") {
            return Err(self
                .ctx
                .unsupported_at("generic functions are not supported", params.span()));
        }

        let name = self.required(node, "name")?.text(self.src());
        let converter = self.converter();
        let params = converter.params(self.required(node, "parameters")?)?;

        let mut func = DeclFunc::new(name)
            .with_import(self.package_import_path)
            .with_args(params.args)
            .with_return_args(converter.results(node.field("result"))?)
            .with_body(node.field("body").map(|b| self.body(b)).unwrap_or_default());
        func.variadic_last_arg = params.variadic;
        func.doc_string = doc_comment(node, self.src());

        if let Some(list) = node.field("receiver") {
            func.receiver = Some(self.receiver(name, list)?);
        }

        Ok(func)
    }

    fn receiver(&self, func_name: &str, list: Node<'_>) -> Result<Receiver> {
        let decls = list.code_children();
        let [decl] = decls.as_slice() else {
            return Err(self.ctx.multiple_receivers_at(func_name, list.span()));
        };

        let names = decl.fields("name");
        if names.len() > 1 {
            return Err(self.ctx.multiple_receivers_at(func_name, list.span()));
        }
        let var_name = names
            .first()
            .map(|n| n.text(self.src()))
            .unwrap_or_default();

        let mut ty = self.required(*decl, "type")?;
        let mut is_pointer = false;
        if ty.kind() == "pointer_type" {
            is_pointer = true;
            ty = ty.code_children().into_iter().next().ok_or_else(|| {
                self.ctx.syntax_error_at("empty pointer receiver", ty.span())
            })?;
        }
        if ty.kind() != "type_identifier" {
            return Err(self
                .ctx
                .unsupported_at("receiver must be a plain type name", ty.span()));
        }

        let type_name = ty.text(self.src());
        Ok(if is_pointer {
            Receiver::pointer(var_name, type_name)
        } else {
            Receiver::new(var_name, type_name)
        })
    }

    /// The text between the braces of a block, without its first newline.
    fn body(&self, block: Node<'_>) -> String {
        let text = block.text(self.src());
        let inner = text
            .strip_prefix('{')
            .and_then(|t| t.strip_suffix('}'))
            .unwrap_or_default();
        if inner.trim().is_empty() {
            return String::new();
        }
        inner.strip_prefix('\n').unwrap_or(inner).to_string()
    }

    fn required<'t>(&self, node: Node<'t>, field: &str) -> Result<Node<'t>> {
        node.field(field).ok_or_else(|| {
            self.ctx.syntax_error_at(
                format!("`{}` without `{field}`", node.kind()),
                node.span(),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::Error, syntax::GoParser};

    const PKG: &str = "example.com/decls";

    fn walk(src: &str) -> Result<FileContents> {
        let ctx = SourceContext::new(src, "decls.go");
        let tree = GoParser::new()?.parse(&ctx)?;
        FileWalker::new(&ctx, tree.root_node(), PKG).file_contents(Path::new("decls.go"))
    }

    #[test]
    fn test_package_name_and_doc() {
        let file = walk("// Package p.\n//\n// More.\npackage p\n").unwrap();
        assert_eq!(file.package_name, "p");
        assert_eq!(file.package_import_path, PKG);
        assert_eq!(file.doc_string.as_deref(), Some("// Package p.\n//\n// More."));
    }

    #[test]
    fn test_multi_name_var_with_values() {
        let file = walk("package p\n\nvar OneInt, TwoInt int = 1, 2\n").unwrap();
        assert_eq!(
            file.vars,
            vec![
                DeclVar::new("OneInt", Type::Int)
                    .with_import(PKG)
                    .with_literal_value("1"),
                DeclVar::new("TwoInt", Type::Int)
                    .with_import(PKG)
                    .with_literal_value("2"),
            ]
        );
    }

    #[test]
    fn test_untyped_and_non_literal_values() {
        let src = "package p\n\nconst s = \"hi\"\n\nvar a, b = f()\n";
        let file = walk(src).unwrap();

        assert_eq!(
            file.consts,
            vec![DeclVar::new("s", Type::UnnamedLiteral)
                .with_import(PKG)
                .with_literal_value("\"hi\"")]
        );
        assert_eq!(file.vars.len(), 2);
        assert!(file.vars.iter().all(|v| v.literal_value.is_none()));
    }

    #[test]
    fn test_grouped_docs() {
        let src = r#"package p

// dropped group doc
const (
	// a doc
	A int32 = 1
	// another with
	// several lines
	B, C = 10, 12
)
"#;
        let file = walk(src).unwrap();
        let docs: Vec<_> = file.consts.iter().map(|c| c.doc_string.as_deref()).collect();
        assert_eq!(
            docs,
            vec![
                Some("// a doc"),
                Some("// another with\n\t// several lines"),
                Some("// another with\n\t// several lines"),
            ]
        );
    }

    #[test]
    fn test_iota_enumeration_repeats_type() {
        let src = "package p\n\ntype Color int\n\nconst (\n\tRed Color = iota\n\tGreen\n\tBlue\n)\n";
        let file = walk(src).unwrap();

        let color = Type::named("Color", PKG);
        assert_eq!(file.consts.len(), 3);
        assert!(file.consts.iter().all(|c| c.ty.as_ref() == Some(&color)));
        assert_eq!(file.consts[0].literal_value.as_deref(), Some("iota"));
        assert_eq!(file.consts[1].literal_value, None);
    }

    #[test]
    fn test_function_with_body() {
        let src = "package p\n\n// F does it.\nfunc F(a, b int) (int, error) {\n\treturn a + b, nil\n}\n";
        let file = walk(src).unwrap();

        let func = &file.functions[0];
        assert_eq!(func.name, "F");
        assert_eq!(func.import, PKG);
        assert_eq!(func.doc_string.as_deref(), Some("// F does it."));
        assert_eq!(
            func.args,
            vec![DeclVar::new("a", Type::Int), DeclVar::new("b", Type::Int)]
        );
        assert_eq!(
            func.return_args,
            vec![DeclVar::unnamed(Type::Int), DeclVar::unnamed(Type::Error)]
        );
        assert_eq!(func.body_tmpl, "\treturn a + b, nil\n");
    }

    #[test]
    fn test_empty_body() {
        let file = walk("package p\n\nfunc F() {\n}\n\nfunc G() {}\n").unwrap();
        assert_eq!(file.functions[0].body_tmpl, "");
        assert_eq!(file.functions[1].body_tmpl, "");
    }

    #[test]
    fn test_variadic_function() {
        let file = walk("package p\n\nfunc F(a int, b ...string) {}\n").unwrap();
        let func = &file.functions[0];
        assert!(func.variadic_last_arg);
        assert_eq!(
            func.args,
            vec![DeclVar::new("a", Type::Int), DeclVar::new("b", Type::String)]
        );
    }

    #[test]
    fn test_methods() {
        let src = "package p\n\ntype T struct{}\n\nfunc (t *T) A() {}\n\nfunc (T) B() bool { return true }\n";
        let file = walk(src).unwrap();

        assert_eq!(file.functions[0].receiver, Some(Receiver::pointer("t", "T")));
        assert_eq!(file.functions[1].receiver, Some(Receiver::new("", "T")));
        assert_eq!(file.functions[1].body_tmpl, " return true ");
    }

    #[test]
    fn test_type_alias_rejected() {
        let err = walk("package p\n\ntype A = int\n").unwrap_err();
        assert!(matches!(*err, Error::Unsupported { .. }));
    }

    #[test]
    fn test_generic_function_rejected() {
        let err = walk("package p\n\nfunc F[T any](t T) {}\n").unwrap_err();
        assert_eq!(err.to_string(), "generic functions are not supported");
    }

    #[test]
    fn test_find_type() {
        let src = "package p\n\nimport \"time\"\n\ntype (\n\tA int\n\t// B doc\n\tB struct{ At time.Time }\n)\n";
        let ctx = SourceContext::new(src, "find.go");
        let tree = GoParser::new().unwrap().parse(&ctx).unwrap();

        let found = FileWalker::new(&ctx, tree.root_node(), PKG)
            .find_type("B")
            .unwrap()
            .unwrap();
        assert_eq!(found.doc_string.as_deref(), Some("// B doc"));
        assert_eq!(
            found.ty,
            Some(Type::structure(vec![DeclVar::new(
                "At",
                Type::named("Time", "time")
            )]))
        );

        let missing = FileWalker::new(&ctx, tree.root_node(), PKG)
            .find_type("C")
            .unwrap();
        assert_eq!(missing, None);
    }
}
