//! Template loaders.
//!
//! A [`Loader`] resolves a template name, optionally relative to the template that requested
//! it, into a compiled [`NodeTree`]. `include` and `extends` always go through
//! [`Loader::load_local`], while [`Environment::get_template`] uses [`Loader::load_cached`].
//!
//! [`Environment::get_template`]: crate::Environment::get_template
use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
};

use crate::{Environment, NodeTree, Parser, Result, error::error};

mod filesystem;

pub use filesystem::FileSystemLoader;

/// Resolve template names into node trees.
pub trait Loader: Send + Sync {
    /// Canonical name of `name` requested from template `parent`.
    ///
    /// Relative names are resolved against the directory of `parent`. Trees are named, cached
    /// and reported as not found by this name.
    fn resolve(&self, name: &str, parent: Option<&str>) -> String {
        resolve_name(name, parent)
    }

    /// Load and parse `name`, never cached.
    ///
    /// `parent` is the parser of the requesting template. Implementations parse with
    /// [`Parser::nested`] so that recursive loading is rejected. Must fail with
    /// [`Error::TemplateNotFound`] if `name` does not exist.
    ///
    /// [`Error::TemplateNotFound`]: crate::Error::TemplateNotFound
    fn load_local(
        &self,
        name: &str,
        parent: Option<&Parser<'_>>,
        env: &Environment,
    ) -> Result<NodeTree>;

    /// Load `name`, possibly reusing a previous parse.
    fn load_cached(
        &self,
        name: &str,
        parent: Option<&Parser<'_>>,
        env: &Environment,
    ) -> Result<Arc<NodeTree>> {
        self.load_local(name, parent, env).map(Arc::new)
    }
}

impl<L> Loader for Arc<L> where L: Loader + ?Sized {
    fn resolve(&self, name: &str, parent: Option<&str>) -> String {
        L::resolve(self, name, parent)
    }

    fn load_local(
        &self,
        name: &str,
        parent: Option<&Parser<'_>>,
        env: &Environment,
    ) -> Result<NodeTree> {
        L::load_local(self, name, parent, env)
    }

    fn load_cached(
        &self,
        name: &str,
        parent: Option<&Parser<'_>>,
        env: &Environment,
    ) -> Result<Arc<NodeTree>> {
        L::load_cached(self, name, parent, env)
    }
}

/// Resolve `name` relative to the directory of `parent`.
///
/// Empty and dot leading segments are dropped, so a name can never escape the template root.
///
/// ```
/// use tessera::loader::resolve_name;
///
/// assert_eq!(resolve_name("base.html", None), "base.html");
/// assert_eq!(resolve_name("../secret", Some("pages/index.html")), "pages/secret");
/// assert_eq!(resolve_name("/nav.html", Some("pages/index.html")), "pages/nav.html");
/// ```
pub fn resolve_name(name: &str, parent: Option<&str>) -> String {
    let directory = parent.and_then(|parent| parent.rsplit_once('/')).map(|(dir, _)| dir);

    directory
        .into_iter()
        .flat_map(|dir| dir.split('/'))
        .chain(name.split('/'))
        .filter(|part| !part.is_empty() && !part.starts_with('.'))
        .collect::<Vec<_>>()
        .join("/")
}

/// In memory name to source map.
#[derive(Debug, Clone, Default)]
pub struct MemoryLoader {
    templates: HashMap<String, String>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add template source, replacing any previous one.
    pub fn insert(&mut self, name: impl Into<String>, source: impl Into<String>) {
        self.templates.insert(name.into(), source.into());
    }

    /// Builder variant of [`insert`][MemoryLoader::insert].
    pub fn with(mut self, name: impl Into<String>, source: impl Into<String>) -> Self {
        self.insert(name, source);
        self
    }
}

impl Loader for MemoryLoader {
    fn load_local(
        &self,
        name: &str,
        parent: Option<&Parser<'_>>,
        env: &Environment,
    ) -> Result<NodeTree> {
        let resolved = self.resolve(name, parent.and_then(Parser::name));

        let Some(source) = self.templates.get(&resolved) else {
            return Err(crate::Error::TemplateNotFound(resolved));
        };

        tracing::debug!(name = %resolved, "load template from memory");
        Parser::nested(source, env, &resolved, parent)?.parse()
    }
}

/// Wrap a loader to parse each template at most once in [`load_cached`].
///
/// [`load_local`] is passed through, `extends` relies on a fresh parse.
///
/// [`load_cached`]: Loader::load_cached
/// [`load_local`]: Loader::load_local
#[derive(Debug, Default)]
pub struct CachedLoader<L> {
    inner: L,
    cache: Mutex<HashMap<String, Arc<NodeTree>>>,
}

impl<L> CachedLoader<L> {
    pub fn new(inner: L) -> Self {
        Self { inner, cache: Mutex::new(HashMap::new()) }
    }

    pub fn inner(&self) -> &L {
        &self.inner
    }

    /// Forget every cached tree.
    pub fn clear(&self) {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

impl<L> Loader for CachedLoader<L> where L: Loader {
    fn resolve(&self, name: &str, parent: Option<&str>) -> String {
        self.inner.resolve(name, parent)
    }

    fn load_local(
        &self,
        name: &str,
        parent: Option<&Parser<'_>>,
        env: &Environment,
    ) -> Result<NodeTree> {
        self.inner.load_local(name, parent, env)
    }

    fn load_cached(
        &self,
        name: &str,
        parent: Option<&Parser<'_>>,
        env: &Environment,
    ) -> Result<Arc<NodeTree>> {
        let key = self.inner.resolve(name, parent.and_then(Parser::name));
        if key.is_empty() {
            error!(TemplateNotFound, "{name}");
        }

        // held across the parse, each name is parsed at most once
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(tree) = cache.get(&key) {
            tracing::debug!(name = %key, "template cache hit");
            return Ok(Arc::clone(tree));
        }

        let tree = Arc::new(self.inner.load_local(name, parent, env)?);
        cache.insert(key, Arc::clone(&tree));
        Ok(tree)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::context;

    #[test]
    fn resolve() {
        assert_eq!(resolve_name("a/./b//c", None), "a/b/c");
        assert_eq!(resolve_name("c", Some("a/b")), "a/c");
        assert_eq!(resolve_name(".hidden/x", None), "x");
    }

    #[test]
    fn memory_not_found() {
        let env = Environment::new();
        let err = MemoryLoader::new().load_local("./nope", None, &env).unwrap_err();
        assert!(matches!(&err, crate::Error::TemplateNotFound(name) if name == "nope"));
    }

    #[test]
    fn recursive_loading() {
        let loader = MemoryLoader::new()
            .with("self", "x{% include 'self' %}")
            .with("a", "{% include 'b' %}")
            .with("b", "{% extends 'a' %}")
            .with("twice", "{% include 'leaf' %}{% include 'leaf' %}")
            .with("leaf", "y");
        let env = Environment::new().with_loader(loader);

        for name in ["self", "a", "b"] {
            let err = env.get_template(name).unwrap_err();
            assert!(matches!(&err, crate::Error::Syntax(msg) if msg.contains("recursive")), "{err}");
        }

        let out = env.get_template("twice").unwrap().render(context! {}).unwrap();
        assert_eq!(out, "yy");
    }

    #[test]
    fn cached() {
        let loader = CachedLoader::new(MemoryLoader::new().with("a", "{{ x }}"));
        let env = Environment::new();

        let first = loader.load_cached("a", None, &env).unwrap();
        let second = loader.load_cached("a", None, &env).unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        let local = Arc::new(loader.load_local("a", None, &env).unwrap());
        assert!(!Arc::ptr_eq(&first, &local));

        loader.clear();
        let third = loader.load_cached("a", None, &env).unwrap();
        assert!(!Arc::ptr_eq(&first, &third));

        let env = env.with_loader(loader);
        let out = env.get_template("a").unwrap().render(context! { x => 1 }).unwrap();
        assert_eq!(out, "1");
    }
}
