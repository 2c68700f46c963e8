//! Import normalization passes.
//!
//! A lint rule rewrites the imports of a batch of files in place. Every rule
//! is idempotent: running it on its own output changes nothing.

mod rule;
mod rules;

use eyre::{Result, WrapErr};
use gopkg_model::FileContents;
use tracing::debug;

pub use rule::{FnRule, LintRule, from_fn};
pub use rules::{
    AddAliasToAllImports, AddRequiredImports, GroupModuleImportsLast, GroupStdImportsFirst,
    is_std_import,
};

/// Runs lint rules in insertion order.
///
/// # Example
///
/// ```
/// use gopkg_codegen::lint::{GroupModuleImportsLast, GroupStdImportsFirst, Linter};
///
/// let linter = Linter::with_defaults()
///     .rule(GroupStdImportsFirst)
///     .rule(GroupModuleImportsLast::new("github.com/example/project"));
///
/// assert_eq!(
///     linter.names(),
///     [
///         "add-required-imports",
///         "add-alias-to-all-imports",
///         "group-std-imports-first",
///         "group-module-imports-last",
///     ]
/// );
/// ```
#[derive(Default)]
pub struct Linter {
    rules: Vec<Box<dyn LintRule>>,
}

impl Linter {
    /// A linter with no rules.
    pub fn new() -> Self {
        Self::default()
    }

    /// A linter starting with [`AddRequiredImports`] then
    /// [`AddAliasToAllImports`].
    pub fn with_defaults() -> Self {
        Self::new()
            .rule(AddRequiredImports)
            .rule(AddAliasToAllImports)
    }

    /// Append a rule.
    pub fn rule(mut self, rule: impl LintRule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Append boxed rules.
    pub fn rules(mut self, rules: impl IntoIterator<Item = Box<dyn LintRule>>) -> Self {
        self.rules.extend(rules);
        self
    }

    pub fn names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Apply every rule to `files`, stopping at the first failure.
    pub fn run(&self, files: &mut [FileContents]) -> Result<()> {
        for rule in &self.rules {
            debug!(rule = rule.name(), files = files.len(), "applying lint rule");
            rule.apply(files)
                .wrap_err_with(|| format!("lint rule `{}` failed", rule.name()))?;
        }
        Ok(())
    }
}

/// Run the default rules followed by `extra_rules`.
pub fn lint(
    files: &mut [FileContents],
    extra_rules: impl IntoIterator<Item = Box<dyn LintRule>>,
) -> Result<()> {
    Linter::with_defaults().rules(extra_rules).run(files)
}

/// Run only `rules`.
pub fn lint_custom(
    files: &mut [FileContents],
    rules: impl IntoIterator<Item = Box<dyn LintRule>>,
) -> Result<()> {
    Linter::new().rules(rules).run(files)
}
