use std::path::PathBuf;

use clap::Args;
use eyre::Result;
use gopkg_parse::{ParseOptions, parse};

use super::UnwrapOrExit;

#[derive(Args)]
pub struct InspectCommand {
    /// Package directory or Go file
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Import path of the package (inferred from go.mod by default)
    #[arg(long)]
    pub import_path: Option<String>,

    /// Resolve named types declared in other packages
    #[arg(long)]
    pub dependent_types: bool,
}

impl InspectCommand {
    pub fn run(&self) -> Result<()> {
        let mut options = ParseOptions::default();
        if let Some(import_path) = &self.import_path {
            options = options.with_pkg_import_path(import_path);
        }
        if self.dependent_types {
            options = options.with_dependent_types();
        }

        let files = parse(&self.path, options).unwrap_or_exit();
        println!("{}", serde_json::to_string_pretty(&files)?);
        Ok(())
    }
}
