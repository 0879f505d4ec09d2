use std::{
    fs, io,
    path::{Component, Path, PathBuf},
};

use super::{Loader, resolve_name};
use crate::{Config, Environment, Error, NodeTree, Parser, Result};

/// Load templates from a directory.
///
/// ```no_run
/// use tessera::{Config, Environment, FileSystemLoader};
///
/// let loader = FileSystemLoader::new(Config::new("templates").with_suffix(".html"));
/// let env = Environment::new().with_loader(loader);
/// let page = env.get_template("index")?;
/// # Ok::<_, tessera::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct FileSystemLoader {
    config: Config,
}

impl FileSystemLoader {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Full path of a template name.
    pub fn path_for(&self, name: &str) -> PathBuf {
        normalize(&self.config.templ_dir().join(name))
    }
}

impl Loader for FileSystemLoader {
    /// Template name relative to the root, with suffix.
    fn resolve(&self, name: &str, parent: Option<&str>) -> String {
        let mut name = resolve_name(name, parent);
        let suffix = self.config.suffix();
        if !name.ends_with(suffix) {
            name.push_str(suffix);
        }
        name
    }

    fn load_local(
        &self,
        name: &str,
        parent: Option<&Parser<'_>>,
        env: &Environment,
    ) -> Result<NodeTree> {
        let resolved = self.resolve(name, parent.and_then(Parser::name));
        let path = self.path_for(&resolved);

        let source = match fs::read_to_string(&path) {
            Ok(ok) => ok,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(Error::TemplateNotFound(resolved));
            }
            Err(err) => return Err(err.into()),
        };

        tracing::debug!(path = %path.display(), "load template from file");
        Parser::nested(&source, env, &resolved, parent)?.parse()
    }
}

/// Copied from [cargo][1]
///
/// [1]: https://github.com/rust-lang/cargo/blob/fede83ccf973457de319ba6fa0e36ead454d2e20/src/cargo/util/paths.rs#L61
fn normalize(path: &Path) -> PathBuf {
    let mut components = path.components().peekable();
    let mut ret = if let Some(c @ Component::Prefix(..)) = components.peek().cloned() {
        components.next();
        PathBuf::from(c.as_os_str())
    } else {
        PathBuf::new()
    };

    for component in components {
        match component {
            Component::Prefix(..) | Component::CurDir => {}
            Component::RootDir => {
                ret.push(component.as_os_str());
            }
            Component::ParentDir => {
                ret.pop();
            }
            Component::Normal(c) => {
                ret.push(c);
            }
        }
    }
    ret
}
