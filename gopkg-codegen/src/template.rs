//! Rendering of function body templates.
//!
//! Bodies are minijinja templates. Only `{{ }}` keeps its usual meaning:
//! blocks are written `{{% ... %}}` and comments `{{# ... #}}`, so Go code
//! such as `fmt.Sprintf("{%d}", x)` or `// {# x` passes through untouched.
//!
//! The serialized [`DeclFunc`] is the template context, so a body can refer
//! to `name`, `args`, `return_args`, `receiver` or any caller data under
//! `body_data`. The following helpers are available as functions:
//!
//! - `FuncReturnDefaults()` - `return` followed by the zero value of every
//!   return arg
//! - `FuncReturnDefaultsWithErr()` - as above, with `err` in place of every
//!   `error` return
//! - `ToCamel(s)`, `ToLowerCamel(s)`, `ToSnake(s)` - case conversion, also
//!   usable as filters (`{{ name | ToSnake }}`)

use eyre::{Result, WrapErr};
use gopkg_core::{to_camel_case, to_pascal_case, to_snake_case};
use gopkg_model::{DeclFunc, DeclVar, ImportAliases};
use minijinja::{Environment, ErrorKind, Value, syntax::SyntaxConfig};

/// Render the body template of `func`.
pub(crate) fn render_body(func: &DeclFunc, aliases: &ImportAliases) -> Result<String> {
    let env = body_environment(func, aliases)?;
    let ctx = Value::from_serialize(func);
    env.render_str(&func.body_tmpl, ctx)
        .wrap_err_with(|| format!("failed to render body of func `{}`", func.name))
}

fn body_environment(func: &DeclFunc, aliases: &ImportAliases) -> Result<Environment<'static>> {
    let mut env = Environment::new();
    env.set_keep_trailing_newline(true);
    env.set_syntax(body_syntax()?);

    let (returns, imports) = (func.return_args.clone(), aliases.clone());
    env.add_function("FuncReturnDefaults", move || {
        return_defaults(&returns, &imports, false)
    });
    let (returns, imports) = (func.return_args.clone(), aliases.clone());
    env.add_function("FuncReturnDefaultsWithErr", move || {
        return_defaults(&returns, &imports, true)
    });

    env.add_function("ToCamel", |s: String| to_pascal_case(&s));
    env.add_function("ToLowerCamel", |s: String| to_camel_case(&s));
    env.add_function("ToSnake", |s: String| to_snake_case(&s));
    env.add_filter("ToCamel", |s: String| to_pascal_case(&s));
    env.add_filter("ToLowerCamel", |s: String| to_camel_case(&s));
    env.add_filter("ToSnake", |s: String| to_snake_case(&s));

    Ok(env)
}

/// `{%` and `{#` occur in ordinary Go strings and comments, `{{%` and `{{#`
/// do not.
fn body_syntax() -> Result<SyntaxConfig> {
    SyntaxConfig::builder()
        .block_delimiters("{{%", "%}}")
        .variable_delimiters("{{", "}}")
        .comment_delimiters("{{#", "#}}")
        .build()
        .wrap_err("invalid body template syntax")
}

/// A `return` statement giving every return arg its zero value.
fn return_defaults(
    returns: &[DeclVar],
    aliases: &ImportAliases,
    err_for_errors: bool,
) -> std::result::Result<String, minijinja::Error> {
    let mut values = Vec::with_capacity(returns.len());
    for ret in returns {
        if err_for_errors && ret.ty.as_ref().is_some_and(|t| t.is_error()) {
            values.push("err".to_string());
            continue;
        }
        let value = ret
            .default_init(aliases)
            .map_err(|e| minijinja::Error::new(ErrorKind::InvalidOperation, e.to_string()))?;
        values.push(value);
    }

    if values.is_empty() {
        return Ok("return".to_string());
    }
    Ok(format!("return {}", values.join(", ")))
}
