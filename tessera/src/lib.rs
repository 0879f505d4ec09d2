//! Django/Jinja style runtime template engine.
//!
//! ```
//! use tessera::context;
//!
//! let template = tessera::compile("Hello {{ name|upper }}!{% if not admin %} (guest){% endif %}")?;
//! let output = tessera::render(&template, context! { name => "World", admin => false })?;
//! assert_eq!(output, "Hello WORLD! (guest)");
//! # Ok::<_, tessera::Error>(())
//! ```
//!
//! Templates are compiled once into an immutable [`NodeTree`] and rendered against a
//! namespace [`Map`]. Tags and filters live in the registries of an [`Environment`], templates
//! are loaded by name through a [`Loader`].
mod value;
mod object;
mod display;
mod write;
mod error;
mod context;
mod node;
mod parser;
mod filters;
mod config;
mod environment;
mod template;
#[cfg(feature = "time")]
mod date;

pub mod tags;
pub mod loader;

pub use value::{Accessor, Deferred, DeferredFn, Map, Value};
pub use object::Object;
pub use display::Display;
pub use write::{Escape, Writer};
pub use error::{Error, Result};
pub use context::{Context, RESERVED};
pub use node::{BlockRegistry, Node, NodeId, NodeList, NodeTree, Tag, VariableNode};
pub use parser::{Parser, TagFactory, TagRegistry};
pub use filters::{Filter, FilterRegistry};
pub use config::Config;
pub use environment::Environment;
pub use template::Template;
pub use loader::{CachedLoader, FileSystemLoader, Loader, MemoryLoader};

pub use tessera_core::{Argument, FilterCall, Number};
pub use tessera_macros::Object;

/// Compile template source with the builtin tags and filters.
pub fn compile(source: &str) -> Result<Template> {
    Environment::new().compile(source)
}

/// Render a compiled template.
pub fn render(template: &Template, namespace: Map) -> Result<String> {
    template.render(namespace)
}
