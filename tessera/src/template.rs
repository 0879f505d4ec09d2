use std::sync::Arc;

use crate::{Context, Environment, Map, NodeTree, Result, Writer};

/// A compiled template.
///
/// The tree is immutable, one template can be rendered concurrently from many threads, each
/// render gets its own [`Context`].
#[derive(Debug, Clone)]
pub struct Template {
    tree: Arc<NodeTree>,
    env: Environment,
}

impl Template {
    pub fn new(tree: NodeTree, env: Environment) -> Self {
        Self::from_shared(Arc::new(tree), env)
    }

    pub fn from_shared(tree: Arc<NodeTree>, env: Environment) -> Self {
        Self { tree, env }
    }

    pub fn tree(&self) -> &NodeTree {
        &self.tree
    }

    /// Template name, if loaded or compiled by name.
    pub fn name(&self) -> Option<&str> {
        self.tree.name.as_deref()
    }

    pub fn render_into(&self, namespace: Map, writer: &mut impl Writer) -> Result<()> {
        let mut cx = Context::new(namespace, self.env.filters());
        cx.push_globals();
        self.tree.render(&mut cx, writer)
    }

    pub fn render(&self, namespace: Map) -> Result<String> {
        let mut buffer = String::with_capacity(128);
        self.render_into(namespace, &mut buffer)?;
        Ok(buffer)
    }
}
