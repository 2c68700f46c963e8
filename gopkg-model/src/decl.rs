//! Declarations: vars, consts, params, functions and type declarations.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::{
    ImportAliases, NamedType, Type,
    error::{Result, TypeError},
    signature,
};

/// A variable, constant, struct field or function parameter.
///
/// `ty` is `None` only for hand-built declarations that carry just a literal
/// value. Parsed vars without an explicit type use [`Type::UnnamedLiteral`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DeclVar {
    pub name: String,
    pub import: String,
    #[serde(rename = "type")]
    pub ty: Option<Type>,
    pub literal_value: Option<String>,
    pub struct_tag: Option<String>,
    pub doc_string: Option<String>,
}

impl DeclVar {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty: Some(ty),
            ..Default::default()
        }
    }

    /// An anonymous parameter or return value.
    pub fn unnamed(ty: Type) -> Self {
        Self::new("", ty)
    }

    pub fn with_import(mut self, import: impl Into<String>) -> Self {
        self.import = import.into();
        self
    }

    pub fn with_literal_value(mut self, value: impl Into<String>) -> Self {
        self.literal_value = Some(value.into());
        self
    }

    pub fn with_struct_tag(mut self, tag: impl Into<String>) -> Self {
        self.struct_tag = Some(tag.into());
        self
    }

    pub fn with_doc_string(mut self, doc: impl Into<String>) -> Self {
        self.doc_string = Some(doc.into());
        self
    }

    pub fn full_type(&self, aliases: &ImportAliases) -> Result<String> {
        self.ty()?.full_type(aliases)
    }

    pub fn default_init(&self, aliases: &ImportAliases) -> Result<String> {
        self.ty()?.default_init(aliases)
    }

    pub fn required_imports(&self) -> BTreeSet<String> {
        let mut imports = BTreeSet::new();
        self.collect_imports(&mut imports);
        imports
    }

    pub(crate) fn collect_imports(&self, imports: &mut BTreeSet<String>) {
        if let Some(ty) = &self.ty {
            ty.collect_imports(imports);
        }
    }

    fn ty(&self) -> Result<&Type> {
        self.ty.as_ref().ok_or_else(|| TypeError::MissingType {
            name: self.name.clone(),
        })
    }
}

/// The receiver of a method.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Receiver {
    pub var_name: String,
    pub type_name: String,
    pub is_pointer: bool,
}

impl Receiver {
    pub fn new(var_name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            var_name: var_name.into(),
            type_name: type_name.into(),
            is_pointer: false,
        }
    }

    pub fn pointer(var_name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            is_pointer: true,
            ..Self::new(var_name, type_name)
        }
    }

    /// Render as `(v *T)`, or `(*T)` when the receiver is unnamed.
    pub fn render(&self) -> String {
        let mut out = String::from("(");
        if !self.var_name.is_empty() {
            out.push_str(&self.var_name);
            out.push(' ');
        }
        if self.is_pointer {
            out.push('*');
        }
        out.push_str(&self.type_name);
        out.push(')');
        out
    }
}

/// A function or method declaration.
///
/// `body_tmpl` is a template rendered between the braces. `body_data` is
/// arbitrary data made available to that template.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DeclFunc {
    pub name: String,
    pub import: String,
    pub receiver: Option<Receiver>,
    pub args: Vec<DeclVar>,
    pub return_args: Vec<DeclVar>,
    pub variadic_last_arg: bool,
    pub body_tmpl: String,
    pub body_data: Option<serde_json::Value>,
    pub doc_string: Option<String>,
}

impl DeclFunc {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_import(mut self, import: impl Into<String>) -> Self {
        self.import = import.into();
        self
    }

    pub fn with_receiver(mut self, receiver: Receiver) -> Self {
        self.receiver = Some(receiver);
        self
    }

    pub fn with_args(mut self, args: Vec<DeclVar>) -> Self {
        self.args = args;
        self
    }

    pub fn with_return_args(mut self, return_args: Vec<DeclVar>) -> Self {
        self.return_args = return_args;
        self
    }

    /// Mark the last arg as variadic.
    pub fn variadic(mut self) -> Self {
        self.variadic_last_arg = true;
        self
    }

    pub fn with_body(mut self, body_tmpl: impl Into<String>) -> Self {
        self.body_tmpl = body_tmpl.into();
        self
    }

    pub fn with_body_data(mut self, data: serde_json::Value) -> Self {
        self.body_data = Some(data);
        self
    }

    pub fn with_doc_string(mut self, doc: impl Into<String>) -> Self {
        self.doc_string = Some(doc.into());
        self
    }

    /// The function's signature as a func type.
    pub fn func_type(&self) -> Type {
        Type::Func(crate::FuncType {
            args: self.args.clone(),
            return_args: self.return_args.clone(),
            variadic_last_arg: self.variadic_last_arg,
        })
    }

    /// Render `(args) returns` in declaration style.
    ///
    /// Two or more args are placed one per line.
    pub fn signature(&self, aliases: &ImportAliases) -> Result<String> {
        if self.variadic_last_arg && self.args.is_empty() {
            return Err(TypeError::VariadicWithoutArgs {
                name: self.name.clone(),
            });
        }
        signature::args_and_returns(
            &self.args,
            &self.return_args,
            self.variadic_last_arg,
            aliases,
            true,
        )
    }

    pub fn required_imports(&self) -> BTreeSet<String> {
        let mut imports = BTreeSet::new();
        self.collect_imports(&mut imports);
        imports
    }

    pub(crate) fn collect_imports(&self, imports: &mut BTreeSet<String>) {
        for arg in self.args.iter().chain(&self.return_args) {
            arg.collect_imports(imports);
        }
    }

    /// Visit every named type in the args and return args.
    pub fn for_each_named_mut<E>(
        &mut self,
        f: &mut impl FnMut(&mut NamedType) -> std::result::Result<(), E>,
    ) -> std::result::Result<(), E> {
        for arg in self.args.iter_mut().chain(self.return_args.iter_mut()) {
            if let Some(ty) = arg.ty.as_mut() {
                ty.for_each_named_mut(f)?;
            }
        }
        Ok(())
    }

    pub fn is_method(&self) -> bool {
        self.receiver.is_some()
    }
}

/// A type declaration, `type Name T`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DeclType {
    pub name: String,
    pub import: String,
    #[serde(rename = "type")]
    pub ty: Option<Type>,
    pub doc_string: Option<String>,
}

impl DeclType {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty: Some(ty),
            ..Default::default()
        }
    }

    pub fn with_import(mut self, import: impl Into<String>) -> Self {
        self.import = import.into();
        self
    }

    pub fn with_doc_string(mut self, doc: impl Into<String>) -> Self {
        self.doc_string = Some(doc.into());
        self
    }

    pub fn required_imports(&self) -> BTreeSet<String> {
        self.ty
            .as_ref()
            .map(Type::required_imports)
            .unwrap_or_default()
    }
}
