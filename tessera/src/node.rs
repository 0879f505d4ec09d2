//! Compiled node tree.
use std::{
    collections::HashMap,
    fmt,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};
use tessera_core::FilterCall;

use crate::{Context, Display, Result, Writer, tags::Block};

/// Stable identity of a tag node, used to key per render state in [`Context`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u64);

impl NodeId {
    /// Allocate a process unique id.
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// A tag node.
///
/// Tags are built by their factory in the [`TagRegistry`][crate::TagRegistry] and are
/// immutable afterwards, any per render state must live in the [`Context`].
pub trait Tag: fmt::Debug + Send + Sync {
    fn render(&self, cx: &mut Context<'_>, out: &mut dyn Writer) -> Result<()>;
}

/// Template node.
#[derive(Debug, Clone)]
pub enum Node {
    /// Literal text.
    Text(Arc<str>),
    /// `{{ path|filter }}`
    Variable(VariableNode),
    Tag(Arc<dyn Tag>),
}

impl Node {
    /// Wrap a tag.
    pub fn tag(tag: impl Tag + 'static) -> Self {
        Self::Tag(Arc::new(tag))
    }

    pub fn render(&self, cx: &mut Context<'_>, out: &mut dyn Writer) -> Result<()> {
        match self {
            Node::Text(text) => out.write_str(text),
            Node::Variable(variable) => variable.render(cx, out),
            Node::Tag(tag) => tag.render(cx, out),
        }
    }
}

/// A variable interpolation.
#[derive(Debug, Clone)]
pub struct VariableNode {
    pub path: String,
    pub filters: Vec<FilterCall>,
}

impl VariableNode {
    fn render(&self, cx: &mut Context<'_>, out: &mut dyn Writer) -> Result<()> {
        let value = cx.resolve(&self.path)?;
        let value = cx.apply_filters(value, &self.filters)?;
        value.display(&mut &mut *out)
    }
}

/// Ordered immutable sequence of [`Node`]s.
#[derive(Debug, Clone, Default)]
pub struct NodeList(Arc<[Node]>);

impl NodeList {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self(nodes.into())
    }

    pub fn nodes(&self) -> &[Node] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn render(&self, cx: &mut Context<'_>, out: &mut dyn Writer) -> Result<()> {
        for node in self.0.iter() {
            node.render(cx, out)?;
        }
        Ok(())
    }

    /// Render into a fresh buffer.
    pub fn render_to_string(&self, cx: &mut Context<'_>) -> Result<String> {
        let mut buffer = String::new();
        self.render(cx, &mut buffer)?;
        Ok(buffer)
    }
}

/// Block name to block node, per parse.
pub type BlockRegistry = HashMap<String, Arc<Block>>;

/// Result of a single parse.
#[derive(Debug, Clone, Default)]
pub struct NodeTree {
    pub nodes: NodeList,
    /// Blocks reachable from this tree, by name, after inheritance is merged.
    pub blocks: BlockRegistry,
    /// Template name, if the tree was compiled by name.
    pub name: Option<Arc<str>>,
}

impl NodeTree {
    pub fn render(&self, cx: &mut Context<'_>, out: &mut dyn Writer) -> Result<()> {
        self.nodes.render(cx, out)
    }
}
