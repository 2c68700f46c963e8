//! Conversion of Go type expressions into [`Type`].

use gopkg_model::{DeclFunc, DeclVar, FuncType, InterfaceType, StructType, Type};
use tree_sitter::Node;

use crate::{
    error::{Result, SourceContext},
    imports::ImportTable,
    syntax::{NodeExt, unquote},
};

/// Predeclared types with a dedicated [`Type`] variant.
fn primitive(name: &str) -> Option<Type> {
    let ty = match name {
        "bool" => Type::Bool,
        "byte" => Type::Byte,
        "error" => Type::Error,
        "float32" => Type::Float32,
        "float64" => Type::Float64,
        "int" => Type::Int,
        "int32" => Type::Int32,
        "int64" => Type::Int64,
        "string" => Type::String,
        "any" => Type::Any,
        _ => return None,
    };
    Some(ty)
}

/// Predeclared types without a dedicated variant. They become named types
/// with no import path.
const OTHER_PREDECLARED: &[&str] = &[
    "complex64",
    "complex128",
    "int8",
    "int16",
    "rune",
    "uint",
    "uint8",
    "uint16",
    "uint32",
    "uint64",
    "uintptr",
];

/// One entry of a parameter list before Go's grouping rules are applied.
enum ParamItem<'t> {
    /// A lone identifier: a name waiting for a type, or a type name.
    Ident(Node<'t>),
    Typed { name: Node<'t>, ty: Node<'t> },
    TypeOnly(Node<'t>),
    Variadic { name: Option<Node<'t>>, ty: Node<'t> },
}

/// A converted parameter list.
pub(crate) struct Params {
    pub args: Vec<DeclVar>,
    pub variadic: bool,
}

/// Converts type expression nodes of one file.
pub(crate) struct TypeConverter<'a> {
    ctx: &'a SourceContext,
    imports: &'a ImportTable,
}

impl<'a> TypeConverter<'a> {
    pub fn new(ctx: &'a SourceContext, imports: &'a ImportTable) -> Self {
        Self { ctx, imports }
    }

    fn src(&self) -> &'a str {
        self.ctx.src()
    }

    pub fn convert(&self, node: Node<'_>) -> Result<Type> {
        match node.kind() {
            "type_identifier" | "identifier" => Ok(self.identifier(node.text(self.src()))),
            "qualified_type" => self.qualified(node),
            "pointer_type" => {
                let inner = self.only_child(node)?;
                Ok(Type::pointer(self.convert(inner)?))
            }
            "slice_type" => Ok(Type::array(self.convert(self.required(node, "element")?)?)),
            "map_type" => Ok(Type::map(
                self.convert(self.required(node, "key")?)?,
                self.convert(self.required(node, "value")?)?,
            )),
            "function_type" => {
                let params = self.params(self.required(node, "parameters")?)?;
                let return_args = self.results(node.field("result"))?;
                Ok(Type::Func(FuncType {
                    args: params.args,
                    return_args,
                    variadic_last_arg: params.variadic,
                }))
            }
            "struct_type" => self.structure(node),
            "interface_type" => self.interface(node),
            "parenthesized_type" => self.convert(self.only_child(node)?),
            "array_type" | "implicit_length_array_type" => Err(self
                .ctx
                .unsupported_at("[...]T array types not supported", node.span())),
            "channel_type" => Err(self
                .ctx
                .unsupported_at("channel types are not supported", node.span())),
            "generic_type" => Err(self
                .ctx
                .unsupported_at("generic types are not supported", node.span())),
            other => Err(self
                .ctx
                .unsupported_at(format!("unknown field type `{other}`"), node.span())),
        }
    }

    /// The type an unqualified identifier refers to.
    pub fn identifier(&self, name: &str) -> Type {
        if let Some(ty) = primitive(name) {
            return ty;
        }
        if OTHER_PREDECLARED.contains(&name) {
            return Type::named(name, "");
        }
        Type::named(name, self.imports.current_package())
    }

    fn qualified(&self, node: Node<'_>) -> Result<Type> {
        let package = self.required(node, "package")?;
        let name = self.required(node, "name")?;
        let alias = package.text(self.src());
        let import = self
            .imports
            .resolve(alias)
            .ok_or_else(|| self.ctx.unknown_import_at(alias, package.span()))?;
        Ok(Type::named(name.text(self.src()), import))
    }

    fn structure(&self, node: Node<'_>) -> Result<Type> {
        let mut st = StructType::default();
        let Some(list) = node
            .code_children()
            .into_iter()
            .find(|c| c.kind() == "field_declaration_list")
        else {
            return Ok(Type::Struct(st));
        };

        for field in list
            .code_children()
            .into_iter()
            .filter(|c| c.kind() == "field_declaration")
        {
            let ty_node = self.required(field, "type")?;
            let ty = self.convert(ty_node)?;
            let names = field.fields("name");

            if names.is_empty() {
                // `*T` embeds keep the star as a separate token.
                if field.has_token("*") {
                    st.embeds.push(Type::pointer(ty));
                } else {
                    st.embeds.push(ty);
                }
                continue;
            }

            let tag = field
                .field("tag")
                .map(|t| unquote(t.text(self.src())).to_string());
            for name in names {
                let mut var = DeclVar::new(name.text(self.src()), ty.clone());
                var.struct_tag = tag.clone();
                st.fields.push(var);
            }
        }

        Ok(Type::Struct(st))
    }

    fn interface(&self, node: Node<'_>) -> Result<Type> {
        let mut it = InterfaceType::default();

        let mut elems = Vec::new();
        for child in node.code_children() {
            if child.kind() == "method_spec_list" {
                elems.extend(child.code_children());
            } else {
                elems.push(child);
            }
        }

        for elem in elems {
            match elem.kind() {
                "method_elem" | "method_spec" => it.funcs.push(self.method(elem)?),
                "type_elem" | "constraint_elem" => {
                    let types = elem.code_children();
                    if types.len() != 1 {
                        return Err(self
                            .ctx
                            .unsupported_at("type unions are not supported", elem.span()));
                    }
                    it.embeds.push(self.convert(types[0])?);
                }
                _ => it.embeds.push(self.convert(elem)?),
            }
        }

        Ok(Type::Interface(it))
    }

    fn method(&self, node: Node<'_>) -> Result<DeclFunc> {
        let name = self.required(node, "name")?;
        let params = self.params(self.required(node, "parameters")?)?;
        let mut func = DeclFunc::new(name.text(self.src()))
            .with_args(params.args)
            .with_return_args(self.results(node.field("result"))?);
        func.variadic_last_arg = params.variadic;
        Ok(func)
    }

    /// Convert a `parameter_list`, applying Go's grouping rules.
    ///
    /// If any parameter has both a name and a type, every identifier is a
    /// name and takes the type that follows it (`a, b int`). Otherwise every
    /// entry is a type (`int, string`).
    pub fn params(&self, list: Node<'_>) -> Result<Params> {
        let items = self.param_items(list)?;
        let named = items.iter().any(|item| {
            matches!(
                item,
                ParamItem::Typed { .. } | ParamItem::Variadic { name: Some(_), .. }
            )
        });

        let mut args = Vec::with_capacity(items.len());
        let mut variadic_at = None;

        if named {
            let mut pending = Vec::new();
            for item in items {
                let (name, ty_node) = match item {
                    ParamItem::Ident(n) => {
                        pending.push(n);
                        continue;
                    }
                    ParamItem::Typed { name, ty } => (name, ty),
                    ParamItem::Variadic { name: Some(name), ty } => {
                        variadic_at = Some(args.len() + pending.len());
                        (name, ty)
                    }
                    ParamItem::TypeOnly(_) | ParamItem::Variadic { name: None, .. } => {
                        return Err(self.ctx.mixed_params_at(list.span()));
                    }
                };
                let ty = self.convert(ty_node)?;
                for p in pending.drain(..) {
                    args.push(DeclVar::new(p.text(self.src()), ty.clone()));
                }
                args.push(DeclVar::new(name.text(self.src()), ty));
            }
            if !pending.is_empty() {
                return Err(self.ctx.mixed_params_at(list.span()));
            }
        } else {
            for item in items {
                let ty = match item {
                    ParamItem::Ident(n) => self.identifier(n.text(self.src())),
                    ParamItem::TypeOnly(ty) | ParamItem::Typed { ty, .. } => self.convert(ty)?,
                    ParamItem::Variadic { ty, .. } => {
                        variadic_at = Some(args.len());
                        self.convert(ty)?
                    }
                };
                args.push(DeclVar::unnamed(ty));
            }
        }

        if let Some(at) = variadic_at {
            if at + 1 != args.len() {
                return Err(self
                    .ctx
                    .unsupported_at("only the last parameter can be variadic", list.span()));
            }
        }

        Ok(Params {
            args,
            variadic: variadic_at.is_some(),
        })
    }

    fn param_items<'t>(&self, list: Node<'t>) -> Result<Vec<ParamItem<'t>>> {
        let mut items = Vec::new();

        for decl in list.code_children() {
            match decl.kind() {
                "parameter_declaration" => {
                    let ty = self.required(decl, "type")?;
                    let names = decl.fields("name");
                    let Some((last, rest)) = names.split_last() else {
                        items.push(type_item(ty));
                        continue;
                    };

                    items.extend(rest.iter().map(|n| ParamItem::Ident(*n)));

                    // `int, string` may come back as a name followed by a
                    // type. The comma between them tells the two apart.
                    let gap = self.src().get(last.end_byte()..ty.start_byte()).unwrap_or_default();
                    if gap.contains(',') {
                        items.push(ParamItem::Ident(*last));
                        items.push(type_item(ty));
                    } else {
                        items.push(ParamItem::Typed { name: *last, ty });
                    }
                }
                "variadic_parameter_declaration" => items.push(ParamItem::Variadic {
                    name: decl.field("name"),
                    ty: self.required(decl, "type")?,
                }),
                other => {
                    return Err(self
                        .ctx
                        .syntax_error_at(format!("unexpected `{other}` in parameter list"), decl.span()));
                }
            }
        }

        Ok(items)
    }

    /// Convert the `result` of a function: a parameter list or a bare type.
    pub fn results(&self, result: Option<Node<'_>>) -> Result<Vec<DeclVar>> {
        let Some(result) = result else {
            return Ok(Vec::new());
        };

        if result.kind() == "parameter_list" {
            let params = self.params(result)?;
            if params.variadic {
                return Err(self
                    .ctx
                    .syntax_error_at("return values cannot be variadic", result.span()));
            }
            return Ok(params.args);
        }

        Ok(vec![DeclVar::unnamed(self.convert(result)?)])
    }

    fn required<'t>(&self, node: Node<'t>, field: &str) -> Result<Node<'t>> {
        node.field(field).ok_or_else(|| {
            self.ctx.syntax_error_at(
                format!("`{}` without `{field}`", node.kind()),
                node.span(),
            )
        })
    }

    fn only_child<'t>(&self, node: Node<'t>) -> Result<Node<'t>> {
        node.code_children().into_iter().next().ok_or_else(|| {
            self.ctx
                .syntax_error_at(format!("empty `{}`", node.kind()), node.span())
        })
    }
}

fn type_item(ty: Node<'_>) -> ParamItem<'_> {
    if ty.kind() == "type_identifier" {
        ParamItem::Ident(ty)
    } else {
        ParamItem::TypeOnly(ty)
    }
}

#[cfg(test)]
mod tests {
    use gopkg_model::ImportAliases;

    use super::*;
    use crate::{error::Error, syntax::GoParser};

    const PKG: &str = "example.com/types";

    /// Convert the type of `type T <expr>` in a small file.
    fn convert(decl: &str) -> Result<Type> {
        let src = format!("package p\n\nimport c \"context\"\n\n{decl}\n");
        let ctx = SourceContext::new(src, "types.go");
        let tree = GoParser::new()?.parse(&ctx)?;
        let mut table = ImportTable::new(PKG);
        crate::imports::collect_imports(&ctx, tree.root_node(), &mut table)?;

        let decl = tree
            .root_node()
            .code_children()
            .into_iter()
            .find(|c| c.kind() == "type_declaration")
            .unwrap();
        let spec = decl.code_children().into_iter().next().unwrap();
        let ty = spec.field("type").unwrap();

        TypeConverter::new(&ctx, &table).convert(ty)
    }

    fn render(ty: &Type) -> String {
        let aliases: ImportAliases = [("context".to_string(), "c".to_string())].into();
        ty.full_type(&aliases).unwrap()
    }

    #[test]
    fn test_identifiers() {
        assert_eq!(convert("type T int64").unwrap(), Type::Int64);
        assert_eq!(convert("type T any").unwrap(), Type::Any);
        assert_eq!(convert("type T uint8").unwrap(), Type::named("uint8", ""));
        assert_eq!(convert("type T Other").unwrap(), Type::named("Other", PKG));
    }

    #[test]
    fn test_qualified() {
        assert_eq!(
            convert("type T c.Context").unwrap(),
            Type::named("Context", "context")
        );
    }

    #[test]
    fn test_unknown_qualifier() {
        let err = convert("type T missing.Thing").unwrap_err();
        assert!(matches!(*err, Error::UnknownImport { ref alias, .. } if alias == "missing"));
    }

    #[test]
    fn test_composites() {
        assert_eq!(
            convert("type T map[string][]*Other").unwrap(),
            Type::map(Type::String, Type::array(Type::pointer(Type::named("Other", PKG))))
        );
    }

    #[test]
    fn test_fixed_array_rejected() {
        let err = convert("type T [4]int").unwrap_err();
        assert_eq!(err.to_string(), "[...]T array types not supported");
    }

    #[test]
    fn test_channel_rejected() {
        let err = convert("type T chan int").unwrap_err();
        assert!(matches!(*err, Error::Unsupported { .. }));
    }

    #[test]
    fn test_unnamed_func_params() {
        let ty = convert("type T func(int, float32) (string, error)").unwrap();
        assert_eq!(
            ty,
            Type::func(
                vec![DeclVar::unnamed(Type::Int), DeclVar::unnamed(Type::Float32)],
                vec![DeclVar::unnamed(Type::String), DeclVar::unnamed(Type::Error)],
            )
        );
    }

    #[test]
    fn test_grouped_named_params() {
        let ty = convert("type T func(a, b int, s string) (n int, err error)").unwrap();
        assert_eq!(render(&ty), "func(a int, b int, s string) (n int, err error)");
    }

    #[test]
    fn test_mixed_params_rejected() {
        let err = convert("type T func(a int, string)").unwrap_err();
        assert!(matches!(*err, Error::MixedParams { .. }));
    }

    #[test]
    fn test_variadic_params() {
        let ty = convert("type T func(float32, ...*string) int").unwrap();
        assert_eq!(
            ty,
            Type::variadic_func(
                vec![
                    DeclVar::unnamed(Type::Float32),
                    DeclVar::unnamed(Type::pointer(Type::String)),
                ],
                vec![DeclVar::unnamed(Type::Int)],
            )
        );
        assert_eq!(render(&ty), "func(float32, ...*string) int");
    }

    #[test]
    fn test_struct_fields_embeds_and_tags() {
        let ty = convert(
            "type T struct {\n\tc.Context\n\t*Base\n\n\tA, B int `json:\"a\"`\n\tname string\n}",
        )
        .unwrap();

        let Type::Struct(st) = ty else {
            panic!("expected struct");
        };
        assert_eq!(
            st.embeds,
            vec![
                Type::named("Context", "context"),
                Type::pointer(Type::named("Base", PKG)),
            ]
        );
        assert_eq!(
            st.fields,
            vec![
                DeclVar::new("A", Type::Int).with_struct_tag("json:\"a\""),
                DeclVar::new("B", Type::Int).with_struct_tag("json:\"a\""),
                DeclVar::new("name", Type::String),
            ]
        );
    }

    #[test]
    fn test_empty_struct_and_interface() {
        assert_eq!(convert("type T struct{}").unwrap(), Type::empty_struct());
        assert_eq!(convert("type T interface{}").unwrap(), Type::empty_interface());
    }

    #[test]
    fn test_interface_embeds_and_methods() {
        let ty = convert(
            "type T interface {\n\tc.Context\n\terror\n\tAMethod(one int, two ...[]string)\n}",
        )
        .unwrap();

        let Type::Interface(it) = ty else {
            panic!("expected interface");
        };
        assert_eq!(
            it.embeds,
            vec![Type::named("Context", "context"), Type::Error]
        );
        assert_eq!(it.funcs.len(), 1);
        assert_eq!(it.funcs[0].name, "AMethod");
        assert!(it.funcs[0].variadic_last_arg);
        assert_eq!(
            it.funcs[0].args,
            vec![
                DeclVar::new("one", Type::Int),
                DeclVar::new("two", Type::array(Type::String)),
            ]
        );
    }
}
