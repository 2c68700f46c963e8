use std::path::PathBuf;

use clap::Args;
use eyre::Result;
use gopkg_codegen::{
    generate,
    lint::{GroupModuleImportsLast, GroupStdImportsFirst, LintRule, lint},
    render_file_contents,
};
use gopkg_parse::{ParseOptions, find_module, parse};

use super::UnwrapOrExit;

#[derive(Args)]
pub struct LintCommand {
    /// Package directory or Go file
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Write the result back to the source files instead of stdout
    #[arg(short, long)]
    pub write: bool,
}

impl LintCommand {
    pub fn run(&self) -> Result<()> {
        let mut files = parse(&self.path, ParseOptions::default()).unwrap_or_exit();
        let module = find_module(&self.path).unwrap_or_exit();

        let rules: Vec<Box<dyn LintRule>> = vec![
            Box::new(GroupStdImportsFirst),
            Box::new(GroupModuleImportsLast::new(module.path())),
        ];
        lint(&mut files, rules)?;

        if self.write {
            return generate(&files);
        }

        let many = files.len() > 1;
        for file in &files {
            if many {
                println!("// {}", file.filepath.display());
            }
            print!("{}", render_file_contents(file)?);
        }
        Ok(())
    }
}
