//! Go module discovery and `go.mod` parsing.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Error, Result};

/// A `require` directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    pub path: String,
    pub version: String,
}

/// The right-hand side of a `replace` directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplaceTarget {
    /// A local directory, relative to the module root unless absolute.
    Dir(PathBuf),
    Module { path: String, version: String },
}

/// A `replace` directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    pub old_path: String,
    pub old_version: Option<String>,
    pub target: ReplaceTarget,
}

/// The parts of a `go.mod` file used to locate packages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoMod {
    pub module: String,
    pub requires: Vec<Requirement>,
    pub replaces: Vec<Replacement>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Block {
    None,
    Require,
    Replace,
    Other,
}

impl GoMod {
    /// Parse the content of a `go.mod` file found at `path`.
    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        let invalid = |reason: String| {
            Box::new(Error::InvalidGoMod {
                path: path.to_path_buf(),
                reason,
            })
        };

        let mut go_mod = GoMod::default();
        let mut block = Block::None;

        for raw in content.lines() {
            let line = raw.split("//").next().unwrap_or_default().trim();
            if line.is_empty() {
                continue;
            }

            if block != Block::None {
                if line == ")" {
                    block = Block::None;
                    continue;
                }
                let tokens: Vec<&str> = line.split_whitespace().collect();
                match block {
                    Block::Require => go_mod.requires.push(requirement(&tokens).ok_or_else(|| {
                        invalid(format!("malformed require `{line}`"))
                    })?),
                    Block::Replace => go_mod.replaces.push(replacement(&tokens).ok_or_else(|| {
                        invalid(format!("malformed replace `{line}`"))
                    })?),
                    _ => {}
                }
                continue;
            }

            let tokens: Vec<&str> = line.split_whitespace().collect();
            let opens_block = tokens.get(1) == Some(&"(");
            match tokens[0] {
                "module" => {
                    let module = tokens
                        .get(1)
                        .map(|m| unquote(m))
                        .filter(|m| !m.is_empty())
                        .ok_or_else(|| {
                            invalid(format!(
                                "expected `module <path>` got `{line}`"
                            ))
                        })?;
                    go_mod.module = module;
                }
                "require" if opens_block => block = Block::Require,
                "replace" if opens_block => block = Block::Replace,
                "require" => go_mod.requires.push(
                    requirement(&tokens[1..])
                        .ok_or_else(|| invalid(format!("malformed require `{line}`")))?,
                ),
                "replace" => go_mod.replaces.push(
                    replacement(&tokens[1..])
                        .ok_or_else(|| invalid(format!("malformed replace `{line}`")))?,
                ),
                _ if opens_block => block = Block::Other,
                _ => {}
            }
        }

        if go_mod.module.is_empty() {
            return Err(invalid("missing `module <path>` directive".to_string()));
        }

        Ok(go_mod)
    }
}

fn unquote(s: &str) -> String {
    s.trim_matches(|c| c == '"' || c == '`').to_string()
}

fn requirement(tokens: &[&str]) -> Option<Requirement> {
    match tokens {
        [path, version, ..] => Some(Requirement {
            path: unquote(path),
            version: unquote(version),
        }),
        _ => None,
    }
}

fn replacement(tokens: &[&str]) -> Option<Replacement> {
    let arrow = tokens.iter().position(|t| *t == "=>")?;
    let (old, new) = (&tokens[..arrow], &tokens[arrow + 1..]);

    let old_path = unquote(old.first()?);
    let old_version = old.get(1).map(|v| unquote(v));

    let new_path = unquote(new.first()?);
    let target = if new_path.starts_with("./")
        || new_path.starts_with("../")
        || Path::new(&new_path).is_absolute()
    {
        ReplaceTarget::Dir(PathBuf::from(new_path))
    } else {
        ReplaceTarget::Module {
            path: new_path,
            version: unquote(new.get(1)?),
        }
    };

    Some(Replacement {
        old_path,
        old_version,
        target,
    })
}

/// A Go module on disk.
#[derive(Debug, Clone)]
pub struct Module {
    /// Directory containing `go.mod`.
    pub root: PathBuf,
    pub go_mod: GoMod,
}

impl Module {
    pub fn path(&self) -> &str {
        &self.go_mod.module
    }

    /// Import path of a directory inside this module.
    pub fn import_path_of(&self, dir: &Path) -> Option<String> {
        let rel = dir.strip_prefix(&self.root).ok()?;
        let mut import = self.go_mod.module.clone();
        for component in rel.components() {
            import.push('/');
            import.push_str(&component.as_os_str().to_string_lossy());
        }
        Some(import)
    }
}

/// Find the module containing `path` by walking up to the nearest `go.mod`.
pub fn find_module(path: &Path) -> Result<Module> {
    let dir = package_dir(path)?;

    for candidate in dir.ancestors() {
        let go_mod_path = candidate.join("go.mod");
        if go_mod_path.is_file() {
            let content = std::fs::read_to_string(&go_mod_path).map_err(|source| {
                Box::new(Error::Io {
                    path: go_mod_path.clone(),
                    source,
                })
            })?;
            let go_mod = GoMod::parse(&content, &go_mod_path)?;
            debug!(root = %candidate.display(), module = %go_mod.module, "found go module");
            return Ok(Module {
                root: candidate.to_path_buf(),
                go_mod,
            });
        }
    }

    Err(Box::new(Error::NotInModule {
        path: path.to_path_buf(),
    }))
}

/// Infer the import path of the package at `path` (a directory or a file in
/// it) from the enclosing module.
pub fn package_import_path(path: &Path) -> Result<String> {
    let module = find_module(path)?;
    let dir = package_dir(path)?;
    module.import_path_of(&dir).ok_or_else(|| {
        Box::new(Error::NotInModule {
            path: path.to_path_buf(),
        })
    })
}

/// The absolute directory of a package path.
fn package_dir(path: &Path) -> Result<PathBuf> {
    if path.as_os_str().is_empty() {
        return Err(Box::new(Error::EmptyPath));
    }

    let abs = path.canonicalize().map_err(|_| {
        Box::new(Error::NoSuchPath {
            path: path.to_path_buf(),
        })
    })?;

    if abs.is_dir() {
        Ok(abs)
    } else {
        Ok(abs.parent().map(Path::to_path_buf).unwrap_or(abs))
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_parse_go_mod() {
        let content = r#"
// a comment
module github.com/example/project

go 1.22

require github.com/shopspring/decimal v1.3.1

require (
	github.com/Azure/sdk v0.4.0 // indirect
	golang.org/x/text v0.14.0
)

replace github.com/local/dep => ../dep

replace (
	golang.org/x/text v0.14.0 => golang.org/x/text v0.15.0
)
"#;
        let go_mod = GoMod::parse(content, Path::new("go.mod")).unwrap();

        assert_eq!(go_mod.module, "github.com/example/project");
        assert_eq!(
            go_mod.requires,
            vec![
                Requirement {
                    path: "github.com/shopspring/decimal".to_string(),
                    version: "v1.3.1".to_string()
                },
                Requirement {
                    path: "github.com/Azure/sdk".to_string(),
                    version: "v0.4.0".to_string()
                },
                Requirement {
                    path: "golang.org/x/text".to_string(),
                    version: "v0.14.0".to_string()
                },
            ]
        );
        assert_eq!(go_mod.replaces.len(), 2);
        assert_eq!(
            go_mod.replaces[0].target,
            ReplaceTarget::Dir(PathBuf::from("../dep"))
        );
        assert_eq!(go_mod.replaces[1].old_version.as_deref(), Some("v0.14.0"));
        assert_eq!(
            go_mod.replaces[1].target,
            ReplaceTarget::Module {
                path: "golang.org/x/text".to_string(),
                version: "v0.15.0".to_string()
            }
        );
    }

    #[test]
    fn test_parse_go_mod_quoted_module() {
        let go_mod = GoMod::parse("module \"example.com/q\"\n", Path::new("go.mod")).unwrap();
        assert_eq!(go_mod.module, "example.com/q");
    }

    #[test]
    fn test_parse_go_mod_missing_module() {
        let err = GoMod::parse("go 1.21\n", Path::new("go.mod")).unwrap_err();
        assert!(err.to_string().contains("missing `module <path>`"));
    }

    #[test]
    fn test_package_import_path_nested() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("go.mod"), "module example.com/root\n").unwrap();
        let nested = temp.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("b.go"), "package b\n").unwrap();

        assert_eq!(
            package_import_path(&nested).unwrap(),
            "example.com/root/a/b"
        );
        assert_eq!(
            package_import_path(&nested.join("b.go")).unwrap(),
            "example.com/root/a/b"
        );
        assert_eq!(
            package_import_path(temp.path()).unwrap(),
            "example.com/root"
        );
    }

    #[test]
    fn test_package_import_path_errors() {
        assert!(matches!(
            *package_import_path(Path::new("")).unwrap_err(),
            Error::EmptyPath
        ));

        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("missing");
        let err = package_import_path(&missing).unwrap_err();
        assert!(matches!(*err, Error::NoSuchPath { .. }));
        assert!(err.to_string().starts_with("no such path"));
    }

    #[test]
    fn test_package_import_path_not_in_module() {
        let temp = TempDir::new().unwrap();
        let err = find_module(temp.path());
        // A go.mod in an ancestor of the temp dir would make this test moot.
        if let Err(err) = err {
            assert!(matches!(*err, Error::NotInModule { .. }));
            assert!(err.to_string().contains("not within a go module"));
        }
    }
}
