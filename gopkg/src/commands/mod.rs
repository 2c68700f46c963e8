mod completions;
mod inspect;
mod lint;
mod stringer;

use clap::{Parser, Subcommand};
use completions::CompletionsCommand;
use eyre::Result;
use inspect::InspectCommand;
use lint::LintCommand;
use stringer::StringerCommand;

/// Extension trait for exiting on parse errors with pretty formatting
pub(crate) trait UnwrapOrExit<T> {
    fn unwrap_or_exit(self) -> T;
}

impl<T> UnwrapOrExit<T> for gopkg_parse::Result<T> {
    fn unwrap_or_exit(self) -> T {
        match self {
            Ok(v) => v,
            Err(e) => {
                eprintln!("{:?}", miette::Report::new(*e));
                std::process::exit(1);
            }
        }
    }
}

#[derive(Parser)]
#[command(name = "gopkg")]
#[command(version)]
#[command(about = "Parse, lint and generate Go packages")]
pub(crate) struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub fn run(&self) -> Result<()> {
        match &self.command {
            Commands::Lint(cmd) => cmd.run(),
            Commands::Stringer(cmd) => cmd.run(),
            Commands::Inspect(cmd) => cmd.run(),
            Commands::Completions(cmd) => cmd.run(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize the imports of a package
    Lint(LintCommand),

    /// Generate a String() method for an integer const type
    Stringer(StringerCommand),

    /// Print the parsed declarations of a package as JSON
    Inspect(InspectCommand),

    /// Generate shell completions
    Completions(CompletionsCommand),
}
