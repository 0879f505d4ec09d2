//! Template inheritance.
//!
//! A [`Block`] owns a stack of layers, index 0 is the root ancestor definition and the last
//! index is the most derived override. [`Extends`] parses the child template, loads the parent
//! and pushes every overriding child body on top of the matching parent block.
//!
//! Because the parent is itself fully resolved when loaded, a chain of `extends` builds the
//! complete stack one layer at a time, and `block.super` is simply the layer below.
use std::{
    mem,
    sync::{Arc, OnceLock, PoisonError, RwLock},
};

use crate::{
    Context, Node, NodeList, NodeTree, Parser, Result, Tag, Value, Writer, error::error,
};

/// `{% block name %} .. {% endblock %}`
#[derive(Debug)]
pub struct Block {
    name: Arc<str>,
    layers: RwLock<Vec<NodeList>>,
    /// set when an extending template overrides this block, rendering then goes to the
    /// ancestor block that owns the merged layers
    target: OnceLock<Arc<Block>>,
}

pub(super) fn parse_block(parser: &mut Parser<'_>, arguments: &str) -> Result<Node> {
    if !super::is_ident(arguments) {
        error!(Syntax, "invalid syntax for block tag '{arguments}'");
    }

    let (body, _) = parser.parse_body("block", &["endblock"])?;

    if parser.blocks().contains_key(arguments) {
        error!(Syntax, "block '{arguments}' defined twice");
    }

    let block = Arc::new(Block {
        name: arguments.into(),
        layers: RwLock::new(vec![body]),
        target: OnceLock::new(),
    });
    parser.blocks_mut().insert(arguments.to_owned(), Arc::clone(&block));

    Ok(Node::Tag(block))
}

impl Block {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of layers, 1 when the block is not overridden.
    pub fn depth(&self) -> usize {
        self.resolved().layers.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Push a more derived body.
    pub fn add_layer(&self, layer: NodeList) {
        self.layers.write().unwrap_or_else(PoisonError::into_inner).push(layer);
    }

    /// The block own definition.
    fn base_layer(&self) -> NodeList {
        self.layers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .first()
            .cloned()
            .unwrap_or_default()
    }

    fn redirect(&self, target: Arc<Block>) {
        if self.target.set(target).is_err() {
            tracing::warn!(block = &*self.name, "block already redirected");
        }
    }

    /// Follow redirects to the block owning the layers.
    fn resolved(&self) -> &Block {
        let mut block = self;
        while let Some(target) = block.target.get() {
            block = target;
        }
        block
    }
}

impl Tag for Block {
    fn render(&self, cx: &mut Context<'_>, out: &mut dyn Writer) -> Result<()> {
        let block = self.resolved();
        let layers: Arc<[NodeList]> =
            block.layers.read().unwrap_or_else(PoisonError::into_inner).as_slice().into();

        match layers.len().checked_sub(1) {
            Some(index) => render_layer(&block.name, &layers, index, cx, out),
            None => Ok(()),
        }
    }
}

/// Render layer `index` with the `block` record in scope.
fn render_layer(
    name: &Arc<str>,
    layers: &Arc<[NodeList]>,
    index: usize,
    cx: &mut Context<'_>,
    out: &mut dyn Writer,
) -> Result<()> {
    let parent = {
        let name = Arc::clone(name);
        let layers = Arc::clone(layers);
        move |cx: &mut Context<'_>| -> Result<Value> {
            let Some(below) = index.checked_sub(1) else {
                return Ok(Value::Nil);
            };
            let mut buffer = String::new();
            render_layer(&name, &layers, below, cx, &mut buffer)?;
            Ok(Value::from(buffer))
        }
    };

    cx.push_bindings(None);
    cx.set("block", Context::block_record(name, layers.len() - index, parent));
    let result = match layers.get(index) {
        Some(layer) => layer.render(cx, out),
        None => Ok(()),
    };
    cx.pop();
    result
}

/// `{% extends "parent" %}`
///
/// Must be the first tag of a template, renders the parent tree.
#[derive(Debug)]
pub struct Extends {
    parent: NodeTree,
}

pub(super) fn parse_extends(parser: &mut Parser<'_>, arguments: &str) -> Result<Node> {
    if !parser.tag_is_first() {
        error!(Syntax, "extends tag must be at the beginning of a template");
    }

    let name = super::literal_name("extends", parser.parse_arguments(arguments)?)?;

    parser.parse_all()?;
    let parent = parser.load_local(&name)?;

    let mut merged = parent.blocks.clone();
    let mut overridden = 0;

    for (block_name, block) in mem::take(parser.blocks_mut()) {
        match parent.blocks.get(&block_name) {
            Some(target) => {
                target.add_layer(block.base_layer());
                block.redirect(Arc::clone(target));
                overridden += 1;
            }
            // never rendered unless nested in an overriding body
            None => {
                merged.insert(block_name, block);
            }
        }
    }

    tracing::debug!(child = parser.name(), parent = %name, overridden, "merged blocks");
    *parser.blocks_mut() = merged;

    Ok(Node::tag(Extends { parent }))
}

impl Tag for Extends {
    fn render(&self, cx: &mut Context<'_>, out: &mut dyn Writer) -> Result<()> {
        self.parent.render(cx, out)
    }
}
