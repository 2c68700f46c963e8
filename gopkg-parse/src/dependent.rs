//! One-hop resolution of named types declared in other packages.

use std::{
    collections::HashMap,
    env,
    path::{Path, PathBuf},
    process::Command,
};

use gopkg_model::{FileContents, NamedType, Type};
use tracing::debug;
use tree_sitter::Tree;

use crate::{
    decls::FileWalker,
    error::{Error, Result, SourceContext},
    module::{Module, ReplaceTarget},
    read_source, source_files,
    syntax::GoParser,
};

/// Finds the directory of a package from its import path.
///
/// Lookup order: the current module, its `vendor/` directory, `replace` and
/// `require` directives of its `go.mod` resolved against the module cache,
/// and finally the standard library under `GOROOT`.
#[derive(Debug, Clone, Default)]
pub struct PackageLocator {
    module: Option<Module>,
    goroot: Option<PathBuf>,
    mod_cache: Option<PathBuf>,
}

impl PackageLocator {
    pub fn new(module: Option<Module>, goroot: Option<PathBuf>, mod_cache: Option<PathBuf>) -> Self {
        Self {
            module,
            goroot,
            mod_cache,
        }
    }

    /// Build a locator from `GOROOT`, `GOMODCACHE` and `GOPATH`.
    ///
    /// Variables missing from the environment are asked from `go env`. Without
    /// a Go toolchain on `PATH`, `GOROOT` falls back to the usual install
    /// directories and the module cache to `~/go/pkg/mod`.
    pub fn from_env(module: Option<Module>) -> Self {
        Self::from_lookups(module, env_var, go_env)
    }

    fn from_lookups(
        module: Option<Module>,
        env_lookup: impl Fn(&str) -> Option<String>,
        go_lookup: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let var = |key: &str| env_lookup(key).or_else(|| go_lookup(key));

        let goroot = var("GOROOT").map(PathBuf::from).or_else(default_goroot);

        let mod_cache = var("GOMODCACHE")
            .map(PathBuf::from)
            .or_else(|| {
                var("GOPATH")
                    .and_then(|v| env::split_paths(&v).next())
                    .map(|gopath| gopath.join("pkg").join("mod"))
            })
            .or_else(|| dirs::home_dir().map(|home| home.join("go").join("pkg").join("mod")));

        debug!(?goroot, ?mod_cache, "package locator");
        Self::new(module, goroot, mod_cache)
    }

    /// Directory holding the package `import`, if it can be found on disk.
    pub fn locate(&self, import: &str) -> Option<PathBuf> {
        let found = self
            .in_module(import)
            .or_else(|| self.in_vendor(import))
            .or_else(|| self.in_replace(import))
            .or_else(|| self.in_require(import))
            .or_else(|| self.in_goroot(import));
        debug!(import, dir = ?found, "locate package");
        found
    }

    fn in_module(&self, import: &str) -> Option<PathBuf> {
        let module = self.module.as_ref()?;
        let rest = strip_path_prefix(import, module.path())?;
        existing_dir(join_import(&module.root, rest))
    }

    fn in_vendor(&self, import: &str) -> Option<PathBuf> {
        let module = self.module.as_ref()?;
        existing_dir(join_import(&module.root.join("vendor"), import))
    }

    fn in_replace(&self, import: &str) -> Option<PathBuf> {
        let module = self.module.as_ref()?;
        module.go_mod.replaces.iter().find_map(|replace| {
            let rest = strip_path_prefix(import, &replace.old_path)?;
            let base = match &replace.target {
                ReplaceTarget::Dir(dir) => module.root.join(dir),
                ReplaceTarget::Module { path, version } => self.cached_module(path, version)?,
            };
            existing_dir(join_import(&base, rest))
        })
    }

    fn in_require(&self, import: &str) -> Option<PathBuf> {
        let module = self.module.as_ref()?;
        module
            .go_mod
            .requires
            .iter()
            .filter_map(|req| strip_path_prefix(import, &req.path).map(|rest| (req, rest)))
            .max_by_key(|(req, _)| req.path.len())
            .and_then(|(req, rest)| {
                let base = self.cached_module(&req.path, &req.version)?;
                existing_dir(join_import(&base, rest))
            })
    }

    fn in_goroot(&self, import: &str) -> Option<PathBuf> {
        let goroot = self.goroot.as_ref()?;
        existing_dir(join_import(&goroot.join("src"), import))
    }

    fn cached_module(&self, path: &str, version: &str) -> Option<PathBuf> {
        let cache = self.mod_cache.as_ref()?;
        Some(cache.join(format!("{}@{}", escape_module_path(path), version)))
    }
}

/// Install directories tried when `GOROOT` is unknown.
const DEFAULT_GOROOTS: &[&str] = &[
    "/usr/local/go",
    "/usr/lib/go",
    "/opt/homebrew/opt/go/libexec",
    "C:\\Program Files\\Go",
];

fn env_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.is_empty())
}

/// `go env <key>`, if a Go toolchain is on `PATH`.
fn go_env(key: &str) -> Option<String> {
    let output = Command::new("go").args(["env", key]).output().ok()?;
    if !output.status.success() {
        debug!(key, status = %output.status, "go env failed");
        return None;
    }
    let value = String::from_utf8(output.stdout).ok()?;
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn default_goroot() -> Option<PathBuf> {
    DEFAULT_GOROOTS
        .iter()
        .map(PathBuf::from)
        .find(|root| root.join("src").is_dir())
}

/// The part of `import` below `prefix`, or `None` when `prefix` is not a
/// path prefix of it.
fn strip_path_prefix<'a>(import: &'a str, prefix: &str) -> Option<&'a str> {
    let rest = import.strip_prefix(prefix)?;
    if rest.is_empty() {
        Some(rest)
    } else {
        rest.strip_prefix('/')
    }
}

fn join_import(base: &Path, import: &str) -> PathBuf {
    import
        .split('/')
        .filter(|s| !s.is_empty())
        .fold(base.to_path_buf(), |dir, segment| dir.join(segment))
}

fn existing_dir(dir: PathBuf) -> Option<PathBuf> {
    dir.is_dir().then_some(dir)
}

/// Case-encode a module path the way the module cache stores it.
fn escape_module_path(path: &str) -> String {
    let mut escaped = String::with_capacity(path.len());
    for c in path.chars() {
        if c.is_ascii_uppercase() {
            escaped.push('!');
            escaped.push(c.to_ascii_lowercase());
        } else {
            escaped.push(c);
        }
    }
    escaped
}

/// A package parsed for type lookups.
struct LoadedPackage {
    files: Vec<(SourceContext, Tree)>,
}

/// Resolves the underlying types of external named types.
///
/// Loaded packages and resolved types are cached for the lifetime of the
/// value.
pub(crate) struct DependentTypes {
    locator: PackageLocator,
    parser: GoParser,
    packages: HashMap<String, LoadedPackage>,
    resolved: HashMap<(String, String), Type>,
}

impl DependentTypes {
    pub fn new(locator: PackageLocator) -> Result<Self> {
        Ok(Self {
            locator,
            parser: GoParser::new()?,
            packages: HashMap::new(),
            resolved: HashMap::new(),
        })
    }

    /// Set `value_type` on every external named type of `file`.
    pub fn resolve_file(&mut self, file: &mut FileContents) -> Result<()> {
        let current = file.package_import_path.clone();
        let mut resolve = |named: &mut NamedType| self.resolve_named(&current, named);

        for var in file.consts.iter_mut().chain(file.vars.iter_mut()) {
            if let Some(ty) = var.ty.as_mut() {
                ty.for_each_named_mut(&mut resolve)?;
            }
        }
        for decl in &mut file.types {
            if let Some(ty) = decl.ty.as_mut() {
                ty.for_each_named_mut(&mut resolve)?;
            }
        }
        for func in &mut file.functions {
            func.for_each_named_mut(&mut resolve)?;
        }
        Ok(())
    }

    fn resolve_named(&mut self, current: &str, named: &mut NamedType) -> Result<()> {
        if named.import.is_empty() || named.import == current || named.value_type.is_some() {
            return Ok(());
        }

        let key = (named.import.clone(), named.name.clone());
        if let Some(ty) = self.resolved.get(&key) {
            named.value_type = Some(Box::new(ty.clone()));
            return Ok(());
        }

        let ty = self.lookup(&named.import, &named.name)?;
        debug!(import = %named.import, name = %named.name, "resolved dependent type");
        named.value_type = Some(Box::new(ty.clone()));
        self.resolved.insert(key, ty);
        Ok(())
    }

    fn lookup(&mut self, import: &str, name: &str) -> Result<Type> {
        if !self.packages.contains_key(import) {
            let package = self.load(import)?;
            self.packages.insert(import.to_string(), package);
        }
        let Some(package) = self.packages.get(import) else {
            return Err(Box::new(Error::PackageNotFound {
                import: import.to_string(),
            }));
        };

        for (ctx, tree) in &package.files {
            let found = FileWalker::new(ctx, tree.root_node(), import).find_type(name)?;
            if let Some(ty) = found.and_then(|decl| decl.ty) {
                return Ok(ty);
            }
        }

        Err(Box::new(Error::TypeNotFound {
            import: import.to_string(),
            name: name.to_string(),
        }))
    }

    fn load(&mut self, import: &str) -> Result<LoadedPackage> {
        let dir = self.locator.locate(import).ok_or_else(|| {
            Box::new(Error::PackageNotFound {
                import: import.to_string(),
            })
        })?;

        let mut files = Vec::new();
        for path in source_files(&dir)? {
            let is_test = path
                .file_name()
                .is_some_and(|n| n.to_string_lossy().ends_with("_test.go"));
            if is_test {
                continue;
            }
            let ctx = read_source(&path)?;
            let tree = self.parser.parse_lenient(&ctx)?;
            files.push((ctx, tree));
        }

        debug!(import, dir = %dir.display(), files = files.len(), "loaded dependent package");
        Ok(LoadedPackage { files })
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;
    use crate::module::find_module;

    #[test]
    fn test_escape_module_path() {
        assert_eq!(
            escape_module_path("github.com/Azure/azure-sdk"),
            "github.com/!azure/azure-sdk"
        );
    }

    #[test]
    fn test_strip_path_prefix() {
        assert_eq!(strip_path_prefix("a.com/x/y", "a.com/x"), Some("y"));
        assert_eq!(strip_path_prefix("a.com/x", "a.com/x"), Some(""));
        assert_eq!(strip_path_prefix("a.com/xy", "a.com/x"), None);
    }

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_goroot_from_go_env_when_unset() {
        let temp = TempDir::new().unwrap();
        let goroot = temp.path().join("go");
        write(&goroot.join("src/time/time.go"), "package time\n");
        let goroot_str = goroot.to_string_lossy().into_owned();

        let locator = PackageLocator::from_lookups(
            None,
            |_| None,
            |key| (key == "GOROOT").then(|| goroot_str.clone()),
        );

        assert_eq!(locator.locate("time"), Some(goroot.join("src").join("time")));
    }

    #[test]
    fn test_environment_wins_over_go_env() {
        let temp = TempDir::new().unwrap();
        let cache = temp.path().join("cache");

        let locator = PackageLocator::from_lookups(
            None,
            |key| (key == "GOMODCACHE").then(|| cache.to_string_lossy().into_owned()),
            |key| Some(format!("/from/go/env/{key}")),
        );

        assert_eq!(locator.mod_cache, Some(cache.clone()));
        assert_eq!(locator.goroot, Some(PathBuf::from("/from/go/env/GOROOT")));
    }

    #[test]
    fn test_goroot_falls_back_to_install_dirs() {
        let locator = PackageLocator::from_lookups(None, |_| None, |_| None);

        assert!(
            locator
                .goroot
                .as_ref()
                .is_none_or(|root| DEFAULT_GOROOTS.iter().any(|d| root == Path::new(d)))
        );
    }

    #[test]
    fn test_locate_lookup_order() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("proj");
        write(
            &root.join("go.mod"),
            "module example.com/proj\n\nrequire example.com/Dep v1.2.0\n\nreplace example.com/local => ../local\n",
        );
        write(&root.join("inner").join("a.go"), "package inner\n");
        write(&root.join("vendor/example.com/vend/v.go"), "package vend\n");
        write(&temp.path().join("local").join("l.go"), "package local\n");

        let cache = temp.path().join("modcache");
        write(&cache.join("example.com/!dep@v1.2.0/sub/s.go"), "package sub\n");

        let goroot = temp.path().join("goroot");
        write(&goroot.join("src/time/time.go"), "package time\n");

        let module = find_module(&root).unwrap();
        let locator = PackageLocator::new(Some(module.clone()), Some(goroot), Some(cache));

        assert_eq!(
            locator.locate("example.com/proj/inner"),
            Some(module.root.join("inner"))
        );
        assert!(locator.locate("example.com/vend").unwrap().ends_with("vend"));
        assert!(locator.locate("example.com/local").is_some());
        assert!(
            locator
                .locate("example.com/Dep/sub")
                .unwrap()
                .ends_with("sub")
        );
        assert!(locator.locate("time").unwrap().ends_with("time"));
        assert_eq!(locator.locate("example.com/nowhere"), None);
    }

    #[test]
    fn test_resolve_file_sets_value_types() {
        let temp = TempDir::new().unwrap();
        let goroot = temp.path().join("goroot");
        write(
            &goroot.join("src/money/money.go"),
            "package money\n\ntype Amount struct {\n\tCents int64\n}\n",
        );
        write(
            &goroot.join("src/money/money_test.go"),
            "package money\n\ntype Amount string\n",
        );

        let locator = PackageLocator::new(None, Some(goroot), None);
        let mut deps = DependentTypes::new(locator).unwrap();

        let mut file = FileContents::new("x.go", "x").with_package_import_path("example.com/x");
        file.vars.push(gopkg_model::DeclVar::new(
            "a",
            Type::pointer(Type::named("Amount", "money")),
        ));
        file.vars.push(gopkg_model::DeclVar::new(
            "b",
            Type::named("Local", "example.com/x"),
        ));
        deps.resolve_file(&mut file).unwrap();

        assert_eq!(
            file.vars[0].ty,
            Some(Type::pointer(Type::named_with_value(
                "Amount",
                "money",
                Type::structure(vec![gopkg_model::DeclVar::new("Cents", Type::Int64)]),
            )))
        );
        assert_eq!(file.vars[1].ty, Some(Type::named("Local", "example.com/x")));
    }

    #[test]
    fn test_missing_package_and_type() {
        let temp = TempDir::new().unwrap();
        let goroot = temp.path().join("goroot");
        write(&goroot.join("src/money/money.go"), "package money\n");

        let locator = PackageLocator::new(None, Some(goroot), None);
        let mut deps = DependentTypes::new(locator).unwrap();

        let mut file = FileContents::new("x.go", "x");
        file.vars
            .push(gopkg_model::DeclVar::new("a", Type::named("Amount", "money")));
        let err = deps.resolve_file(&mut file).unwrap_err();
        assert!(matches!(*err, Error::TypeNotFound { .. }));

        let mut file = FileContents::new("x.go", "x");
        file.vars
            .push(gopkg_model::DeclVar::new("a", Type::named("T", "nowhere.com/pkg")));
        let err = deps.resolve_file(&mut file).unwrap_err();
        assert!(matches!(*err, Error::PackageNotFound { .. }));
    }
}
