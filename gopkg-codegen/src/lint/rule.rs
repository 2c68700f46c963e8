//! Lint rule trait.

use eyre::Result;
use gopkg_model::FileContents;

/// A pass that rewrites the imports of a batch of files.
pub trait LintRule: Send + Sync {
    /// The name of this rule.
    fn name(&self) -> &str;

    /// Apply the rule to every file.
    fn apply(&self, files: &mut [FileContents]) -> Result<()>;
}

/// A lint rule backed by a closure.
pub struct FnRule<F> {
    name: String,
    f: F,
}

impl<F> LintRule for FnRule<F>
where
    F: Fn(&mut [FileContents]) -> Result<()> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, files: &mut [FileContents]) -> Result<()> {
        (self.f)(files)
    }
}

/// Wrap a closure as a [`LintRule`].
pub fn from_fn<F>(name: impl Into<String>, f: F) -> FnRule<F>
where
    F: Fn(&mut [FileContents]) -> Result<()> + Send + Sync,
{
    FnRule {
        name: name.into(),
        f,
    }
}
