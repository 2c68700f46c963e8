//! Rule placing standard library imports in the first group.

use eyre::Result;
use gopkg_model::FileContents;

use super::super::LintRule;

/// Top-level packages of the Go standard library.
const STD_ROOTS: &[&str] = &[
    "archive", "bufio", "builtin", "bytes", "cmp", "compress", "container", "context", "crypto",
    "database", "debug", "embed", "encoding", "errors", "expvar", "flag", "fmt", "go", "hash",
    "html", "image", "index", "io", "iter", "log", "maps", "math", "mime", "net", "os", "path",
    "plugin", "reflect", "regexp", "runtime", "slices", "sort", "strconv", "strings", "structs",
    "sync", "syscall", "testing", "text", "time", "unicode", "unique", "unsafe", "weak",
];

/// Whether `import` belongs to the standard library.
pub fn is_std_import(import: &str) -> bool {
    let root = import.split('/').next().unwrap_or_default();
    STD_ROOTS.contains(&root)
}

/// Moves standard library imports into a group before every other import.
///
/// The standard library group is `min(0, lowest other group - 1)`. Relative
/// order within each partition is kept.
pub struct GroupStdImportsFirst;

impl LintRule for GroupStdImportsFirst {
    fn name(&self) -> &str {
        "group-std-imports-first"
    }

    fn apply(&self, files: &mut [FileContents]) -> Result<()> {
        for file in files {
            let lowest_other = file
                .imports
                .iter()
                .filter(|i| !is_std_import(&i.import))
                .map(|i| i.group)
                .min();
            let std_group = lowest_other.map_or(0, |g| g.saturating_sub(1).min(0));

            for import in &mut file.imports {
                if is_std_import(&import.import) {
                    import.group = std_group;
                }
            }
            file.imports.sort_by_key(|i| i.group);
        }
        Ok(())
    }
}
