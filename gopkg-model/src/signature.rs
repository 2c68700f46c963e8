//! Rendering of argument and return lists.

use crate::{
    DeclVar, ImportAliases,
    error::{Result, TypeError},
};

/// Render `(args) returns` without the `func` keyword or a name.
///
/// With `multiline_args`, two or more args are laid out one per line with a
/// trailing comma. Zero or one args always render inline.
pub(crate) fn args_and_returns(
    args: &[DeclVar],
    return_args: &[DeclVar],
    variadic_last_arg: bool,
    aliases: &ImportAliases,
    multiline_args: bool,
) -> Result<String> {
    let multiline = multiline_args && args.len() > 1;

    let mut out = String::from("(");
    out.push_str(&arg_list(args, variadic_last_arg, aliases, multiline)?);
    out.push(')');

    if return_args.is_empty() {
        return Ok(out);
    }

    let returns = arg_list(return_args, false, aliases, false)?;
    if return_args.len() == 1 && return_args[0].name.is_empty() {
        out.push(' ');
        out.push_str(&returns);
    } else {
        out.push_str(" (");
        out.push_str(&returns);
        out.push(')');
    }

    Ok(out)
}

fn arg_list(
    args: &[DeclVar],
    variadic_last_arg: bool,
    aliases: &ImportAliases,
    multiline: bool,
) -> Result<String> {
    let Some(first) = args.first() else {
        return Ok(String::new());
    };
    let named = !first.name.is_empty();

    let mut rendered = Vec::with_capacity(args.len());
    for (i, arg) in args.iter().enumerate() {
        if named == arg.name.is_empty() {
            return Err(TypeError::MixedNamedArgs);
        }

        let mut entry = String::new();
        if named {
            entry.push_str(&arg.name);
            entry.push(' ');
        }
        if variadic_last_arg && i == args.len() - 1 {
            entry.push_str("...");
        }
        entry.push_str(&arg.full_type(aliases)?);
        rendered.push(entry);
    }

    if multiline {
        Ok(format!("\n\t{},\n", rendered.join(",\n\t")))
    } else {
        Ok(rendered.join(", "))
    }
}
