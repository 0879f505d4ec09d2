use std::{fmt, sync::Arc};

use crate::{FilterRegistry, Loader, Parser, Result, TagRegistry, Template, error::error};

/// Tag and filter registries plus an optional [`Loader`].
///
/// Cloning is cheap, registries are shared until modified.
#[derive(Clone)]
pub struct Environment {
    tags: Arc<TagRegistry>,
    filters: Arc<FilterRegistry>,
    loader: Option<Arc<dyn Loader>>,
}

impl Environment {
    /// Environment with every builtin tag and filter, and no loader.
    pub fn new() -> Self {
        Self {
            tags: Arc::new(TagRegistry::with_builtins()),
            filters: Arc::new(FilterRegistry::with_builtins()),
            loader: None,
        }
    }

    /// Environment without any tag or filter.
    pub fn empty() -> Self {
        Self {
            tags: Arc::default(),
            filters: Arc::default(),
            loader: None,
        }
    }

    /// Set the loader used by `include`, `extends` and [`get_template`].
    ///
    /// [`get_template`]: Environment::get_template
    pub fn with_loader(mut self, loader: impl Loader + 'static) -> Self {
        self.loader = Some(Arc::new(loader));
        self
    }

    pub fn tags(&self) -> &TagRegistry {
        &self.tags
    }

    /// Mutable tag registry, copied first if already shared.
    pub fn tags_mut(&mut self) -> &mut TagRegistry {
        Arc::make_mut(&mut self.tags)
    }

    pub fn filters(&self) -> &FilterRegistry {
        &self.filters
    }

    /// Mutable filter registry, copied first if already shared.
    pub fn filters_mut(&mut self) -> &mut FilterRegistry {
        Arc::make_mut(&mut self.filters)
    }

    pub fn loader(&self) -> Option<&dyn Loader> {
        self.loader.as_deref()
    }

    /// Compile template source.
    pub fn compile(&self, source: &str) -> Result<Template> {
        let tree = Parser::new(source, self, None).parse()?;
        Ok(Template::new(tree, self.clone()))
    }

    /// Compile template source with a name, relative `include` and `extends` resolve against it.
    pub fn compile_named(&self, source: &str, name: &str) -> Result<Template> {
        let tree = Parser::new(source, self, Some(name)).parse()?;
        Ok(Template::new(tree, self.clone()))
    }

    /// Load template through [`Loader::load_cached`].
    pub fn get_template(&self, name: &str) -> Result<Template> {
        let Some(loader) = &self.loader else {
            error!(Runtime, "no loader defined, cannot load '{name}'");
        };
        let tree = loader.load_cached(name, None, self)?;
        Ok(Template::from_shared(tree, self.clone()))
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Environment")
            .field("tags", &self.tags)
            .field("filters", &self.filters)
            .field("loader", &self.loader.is_some())
            .finish()
    }
}
