//! The Go type model.
//!
//! [`Type`] is a closed sum type covering every type expression the toolkit
//! understands. The parser produces it and the renderer consumes it, so both
//! sides match on the same set of variants.

use std::collections::BTreeSet;

use gopkg_core::CodeBuilder;
use serde::Serialize;

use crate::{
    DeclFunc, DeclVar, ImportAliases,
    error::{Result, TypeError},
    signature,
};

/// A Go type expression.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Type {
    Bool,
    Byte,
    Error,
    Float32,
    Float64,
    Int,
    Int32,
    Int64,
    String,
    Any,
    /// A slice, `[]T`.
    Array { value_type: Box<Type> },
    Pointer { value_type: Box<Type> },
    Map {
        key_type: Box<Type>,
        value_type: Box<Type>,
    },
    Func(FuncType),
    Named(NamedType),
    Struct(StructType),
    Interface(InterfaceType),
    /// The type of an untyped constant or an inferred var.
    UnnamedLiteral,
}

/// A function type, `func(args) returns`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FuncType {
    pub args: Vec<DeclVar>,
    pub return_args: Vec<DeclVar>,
    pub variadic_last_arg: bool,
}

/// A reference to a declared type.
///
/// `import` is the package path the type is declared in. It is empty for
/// predeclared types such as `uint8` or `rune`. `value_type` is only set when
/// the declaration was resolved.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NamedType {
    pub name: String,
    pub import: String,
    pub value_type: Option<Box<Type>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StructType {
    pub embeds: Vec<Type>,
    pub fields: Vec<DeclVar>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InterfaceType {
    pub embeds: Vec<Type>,
    pub funcs: Vec<DeclFunc>,
}

impl Type {
    pub fn array(value_type: Type) -> Self {
        Self::Array {
            value_type: Box::new(value_type),
        }
    }

    pub fn pointer(value_type: Type) -> Self {
        Self::Pointer {
            value_type: Box::new(value_type),
        }
    }

    pub fn map(key_type: Type, value_type: Type) -> Self {
        Self::Map {
            key_type: Box::new(key_type),
            value_type: Box::new(value_type),
        }
    }

    pub fn named(name: impl Into<String>, import: impl Into<String>) -> Self {
        Self::Named(NamedType {
            name: name.into(),
            import: import.into(),
            value_type: None,
        })
    }

    /// A named type whose underlying definition is known.
    pub fn named_with_value(
        name: impl Into<String>,
        import: impl Into<String>,
        value_type: Type,
    ) -> Self {
        Self::Named(NamedType {
            name: name.into(),
            import: import.into(),
            value_type: Some(Box::new(value_type)),
        })
    }

    pub fn func(args: Vec<DeclVar>, return_args: Vec<DeclVar>) -> Self {
        Self::Func(FuncType {
            args,
            return_args,
            variadic_last_arg: false,
        })
    }

    pub fn variadic_func(args: Vec<DeclVar>, return_args: Vec<DeclVar>) -> Self {
        Self::Func(FuncType {
            args,
            return_args,
            variadic_last_arg: true,
        })
    }

    pub fn structure(fields: Vec<DeclVar>) -> Self {
        Self::Struct(StructType {
            embeds: Vec::new(),
            fields,
        })
    }

    pub fn empty_struct() -> Self {
        Self::Struct(StructType::default())
    }

    pub fn interface(funcs: Vec<DeclFunc>) -> Self {
        Self::Interface(InterfaceType {
            embeds: Vec::new(),
            funcs,
        })
    }

    pub fn empty_interface() -> Self {
        Self::Interface(InterfaceType::default())
    }

    /// Render the type as Go source.
    ///
    /// Named types from an import present in `aliases` are qualified with
    /// that alias. Struct and interface bodies span several lines, indented
    /// with tabs.
    pub fn full_type(&self, aliases: &ImportAliases) -> Result<String> {
        let rendered = match self {
            Self::Bool => "bool".to_string(),
            Self::Byte => "byte".to_string(),
            Self::Error => "error".to_string(),
            Self::Float32 => "float32".to_string(),
            Self::Float64 => "float64".to_string(),
            Self::Int => "int".to_string(),
            Self::Int32 => "int32".to_string(),
            Self::Int64 => "int64".to_string(),
            Self::String => "string".to_string(),
            Self::Any => "any".to_string(),
            Self::Array { value_type } => format!("[]{}", value_type.full_type(aliases)?),
            Self::Pointer { value_type } => format!("*{}", value_type.full_type(aliases)?),
            Self::Map {
                key_type,
                value_type,
            } => format!(
                "map[{}]{}",
                key_type.full_type(aliases)?,
                value_type.full_type(aliases)?
            ),
            Self::Func(func) => format!(
                "func{}",
                signature::args_and_returns(
                    &func.args,
                    &func.return_args,
                    func.variadic_last_arg,
                    aliases,
                    false,
                )?
            ),
            Self::Named(named) => named.full_type(aliases),
            Self::Struct(s) => s.full_type(aliases)?,
            Self::Interface(i) => i.full_type(aliases)?,
            Self::UnnamedLiteral => String::new(),
        };
        Ok(rendered)
    }

    /// The zero value expression for this type.
    pub fn default_init(&self, aliases: &ImportAliases) -> Result<String> {
        match self {
            Self::Bool => Ok("false".to_string()),
            Self::Byte
            | Self::Float32
            | Self::Float64
            | Self::Int
            | Self::Int32
            | Self::Int64 => Ok("0".to_string()),
            Self::String => Ok("\"\"".to_string()),
            Self::Error
            | Self::Any
            | Self::Array { .. }
            | Self::Pointer { .. }
            | Self::Map { .. }
            | Self::Func(_)
            | Self::Interface(_) => Ok("nil".to_string()),
            Self::Struct(_) => Ok("{}".to_string()),
            Self::Named(named) => match named.value_type.as_deref() {
                Some(Self::Struct(_)) => Ok(format!("{}{{}}", named.full_type(aliases))),
                Some(value_type) => value_type.default_init(aliases),
                None => Err(TypeError::NamedWithoutValueType {
                    name: named.name.clone(),
                }),
            },
            Self::UnnamedLiteral => Err(TypeError::UnnamedLiteral),
        }
    }

    /// Every import path this type references when rendered.
    ///
    /// The underlying definition of a named type is not rendered, so it
    /// contributes nothing.
    pub fn required_imports(&self) -> BTreeSet<String> {
        let mut imports = BTreeSet::new();
        self.collect_imports(&mut imports);
        imports
    }

    pub(crate) fn collect_imports(&self, imports: &mut BTreeSet<String>) {
        match self {
            Self::Array { value_type } | Self::Pointer { value_type } => {
                value_type.collect_imports(imports)
            }
            Self::Map {
                key_type,
                value_type,
            } => {
                key_type.collect_imports(imports);
                value_type.collect_imports(imports);
            }
            Self::Func(func) => {
                for arg in func.args.iter().chain(&func.return_args) {
                    arg.collect_imports(imports);
                }
            }
            Self::Named(named) => {
                if !named.import.is_empty() {
                    imports.insert(named.import.clone());
                }
            }
            Self::Struct(s) => {
                for embed in &s.embeds {
                    embed.collect_imports(imports);
                }
                for field in &s.fields {
                    field.collect_imports(imports);
                }
            }
            Self::Interface(i) => {
                for embed in &i.embeds {
                    embed.collect_imports(imports);
                }
                for func in &i.funcs {
                    func.collect_imports(imports);
                }
            }
            _ => {}
        }
    }

    /// Visit every named type reachable from this type, outermost first.
    ///
    /// Resolved underlying types are not descended into.
    pub fn for_each_named_mut<E>(
        &mut self,
        f: &mut impl FnMut(&mut NamedType) -> std::result::Result<(), E>,
    ) -> std::result::Result<(), E> {
        match self {
            Self::Array { value_type } | Self::Pointer { value_type } => {
                value_type.for_each_named_mut(f)
            }
            Self::Map {
                key_type,
                value_type,
            } => {
                key_type.for_each_named_mut(f)?;
                value_type.for_each_named_mut(f)
            }
            Self::Func(func) => {
                for arg in func.args.iter_mut().chain(func.return_args.iter_mut()) {
                    if let Some(ty) = arg.ty.as_mut() {
                        ty.for_each_named_mut(f)?;
                    }
                }
                Ok(())
            }
            Self::Named(named) => f(named),
            Self::Struct(s) => {
                for embed in &mut s.embeds {
                    embed.for_each_named_mut(f)?;
                }
                for field in &mut s.fields {
                    if let Some(ty) = field.ty.as_mut() {
                        ty.for_each_named_mut(f)?;
                    }
                }
                Ok(())
            }
            Self::Interface(i) => {
                for embed in &mut i.embeds {
                    embed.for_each_named_mut(f)?;
                }
                for func in &mut i.funcs {
                    func.for_each_named_mut(f)?;
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error)
    }
}

impl NamedType {
    fn full_type(&self, aliases: &ImportAliases) -> String {
        match aliases.get(&self.import) {
            Some(alias) if !alias.is_empty() => format!("{alias}.{}", self.name),
            _ => self.name.clone(),
        }
    }
}

impl StructType {
    fn full_type(&self, aliases: &ImportAliases) -> Result<String> {
        if self.embeds.is_empty() && self.fields.is_empty() {
            return Ok("struct {}".to_string());
        }

        let mut builder = CodeBuilder::new();
        builder.push_line("struct {").push_indent();
        for embed in &self.embeds {
            builder.push_lines(&embed.full_type(aliases)?);
        }
        for field in &self.fields {
            let mut line = format!("{} {}", field.name, field.full_type(aliases)?);
            if let Some(tag) = field.struct_tag.as_deref().filter(|t| !t.is_empty()) {
                line.push_str(" `");
                line.push_str(tag);
                line.push('`');
            }
            builder.push_lines(&line);
        }
        builder.push_dedent().push_raw("}");
        Ok(builder.build())
    }
}

impl InterfaceType {
    fn full_type(&self, aliases: &ImportAliases) -> Result<String> {
        if self.embeds.is_empty() && self.funcs.is_empty() {
            return Ok("interface{}".to_string());
        }

        let mut builder = CodeBuilder::new();
        builder.push_line("interface {").push_indent();
        for embed in &self.embeds {
            builder.push_lines(&embed.full_type(aliases)?);
        }
        for func in &self.funcs {
            let sig = signature::args_and_returns(
                &func.args,
                &func.return_args,
                func.variadic_last_arg,
                aliases,
                false,
            )?;
            builder.push_lines(&format!("{}{sig}", func.name));
        }
        builder.push_dedent().push_raw("}");
        Ok(builder.build())
    }
}
