//! `String()` generation for integer enums declared as consts.

use std::path::{Path, PathBuf};

use clap::Args;
use eyre::{Result, bail};
use gopkg_codegen::{lint_and_generate, render_file_contents};
use gopkg_core::to_snake_case;
use gopkg_model::{DeclFunc, DeclVar, FileContents, ImportAndAlias, Receiver, Type};
use gopkg_parse::{ParseOptions, parse};
use serde_json::json;
use tracing::info;

use super::UnwrapOrExit;

const BODY: &str = "\tswitch v {
{{%- for name in body_data.consts %}}
\tcase {{ name }}:
\t\treturn \"{{ name }}\"
{{%- endfor %}}
\t}
\treturn fmt.Sprintf(\"{{ body_data.type }}(%d)\", int64(v))
";

#[derive(Args)]
pub struct StringerCommand {
    /// Name of the const type
    #[arg(short, long = "type")]
    pub type_name: String,

    /// Package directory
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Output file (defaults to `<type>_string.go` in the package)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print the generated file instead of writing it
    #[arg(long)]
    pub dry_run: bool,
}

impl StringerCommand {
    pub fn run(&self) -> Result<()> {
        let files = parse(&self.path, ParseOptions::default()).unwrap_or_exit();
        let output = match &self.output {
            Some(output) => output.clone(),
            None => default_output(&self.path, &self.type_name),
        };

        let mut file = stringer_file(&files, &self.type_name, output)?;
        if self.dry_run {
            gopkg_codegen::lint(std::slice::from_mut(&mut file), [])?;
            print!("{}", render_file_contents(&file)?);
            return Ok(());
        }

        lint_and_generate(std::slice::from_mut(&mut file), [])?;
        info!(path = %file.filepath.display(), type_name = %self.type_name, "generated stringer");
        Ok(())
    }
}

fn default_output(path: &Path, type_name: &str) -> PathBuf {
    let dir = if path.is_dir() {
        path
    } else {
        path.parent().unwrap_or(Path::new("."))
    };
    dir.join(format!("{}_string.go", to_snake_case(type_name)))
}

/// Build a file holding `func (v T) String() string` for the consts of
/// `type_name` found in `files`.
fn stringer_file(files: &[FileContents], type_name: &str, output: PathBuf) -> Result<FileContents> {
    let Some(first) = files.first() else {
        bail!("no files to read consts from");
    };
    let pkg = first.package_import_path.as_str();

    let Some(decl) = files
        .iter()
        .flat_map(|f| &f.types)
        .find(|t| t.name == type_name)
    else {
        bail!("type `{type_name}` is not declared in package `{pkg}`");
    };
    if !decl.ty.as_ref().is_some_and(is_integer) {
        bail!("type `{type_name}` is not an integer type");
    }

    let mut consts = Vec::new();
    for var in files.iter().flat_map(|f| &f.consts) {
        let Some(Type::Named(named)) = &var.ty else {
            continue;
        };
        if named.name == type_name && named.import == pkg && var.name != "_" {
            consts.push(var.name.clone());
        }
    }
    if consts.is_empty() {
        bail!("no consts of type `{type_name}` found");
    }

    let mut file = FileContents::new(output, first.package_name.clone())
        .with_package_import_path(pkg);
    file.doc_string = Some("// Code generated by gopkg stringer. DO NOT EDIT.\n".to_string());
    file.imports = vec![ImportAndAlias::new("fmt")];
    file.functions = vec![
        DeclFunc::new("String")
            .with_receiver(Receiver::new("v", type_name))
            .with_return_args(vec![DeclVar::unnamed(Type::String)])
            .with_body_data(json!({ "type": type_name, "consts": consts }))
            .with_body(BODY),
    ];
    Ok(file)
}

fn is_integer(ty: &Type) -> bool {
    match ty {
        Type::Byte | Type::Int | Type::Int32 | Type::Int64 => true,
        Type::Named(named) if named.import.is_empty() => matches!(
            named.name.as_str(),
            "int8" | "int16" | "rune" | "uint" | "uint8" | "uint16" | "uint32" | "uint64" | "uintptr"
        ),
        _ => false,
    }
}
