//! Recursive descent parser and the tag registry.
use std::{collections::HashMap, fmt, mem, sync::Arc};
use tessera_core::{Argument, Token, TokenStream, lex};

use crate::{
    BlockRegistry, Environment, Node, NodeList, NodeTree, Result,
    error::error,
    node::VariableNode,
};

/// Build a tag node from the parser and the text following the tag keyword.
pub type TagFactory = dyn Fn(&mut Parser<'_>, &str) -> Result<Node> + Send + Sync;

/// Tag keyword to tag factory.
#[derive(Clone, Default)]
pub struct TagRegistry {
    tags: HashMap<String, Arc<TagFactory>>,
}

impl TagRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every builtin tag.
    pub fn with_builtins() -> Self {
        let mut me = Self::new();
        crate::tags::register_builtins(&mut me);
        me
    }

    /// Register tag `name`, replacing any previous factory.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn(&mut Parser<'_>, &str) -> Result<Node> + Send + Sync + 'static,
    {
        self.tags.insert(name.into(), Arc::new(factory));
    }

    /// Remove tag `name`, returns `true` if it was registered.
    pub fn unregister(&mut self, name: &str) -> bool {
        self.tags.remove(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&Arc<TagFactory>> {
        self.tags.get(name)
    }

    /// Registered tag names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names = self.tags.keys().map(String::as_str).collect::<Vec<_>>();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for TagRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}

/// Template parser.
///
/// Tags consume the parser through [`parse_until`][Parser::parse_until] to collect their own
/// body, so nesting is only limited by the tags themselves.
pub struct Parser<'a> {
    tokens: TokenStream<'a>,
    env: &'a Environment,
    name: Option<&'a str>,
    /// names of the templates being loaded, outermost first, including this one
    loading: Vec<Arc<str>>,
    first: bool,
    /// whether the tag being dispatched was the first meaningful token
    tag_first: bool,
    blocks: BlockRegistry,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str, env: &'a Environment, name: Option<&'a str>) -> Self {
        Self {
            tokens: TokenStream::new(source),
            env,
            name,
            loading: name.map(Arc::from).into_iter().collect(),
            first: true,
            tag_first: false,
            blocks: BlockRegistry::new(),
        }
    }

    /// Parser for template `name` requested by `parent`, used by [`Loader`] implementations.
    ///
    /// Fails if `name` is already being loaded up the `include` or `extends` chain.
    ///
    /// [`Loader`]: crate::Loader
    pub fn nested(
        source: &'a str,
        env: &'a Environment,
        name: &'a str,
        parent: Option<&Parser<'_>>,
    ) -> Result<Self> {
        let mut me = Self::new(source, env, Some(name));

        if let Some(parent) = parent {
            if parent.loading.iter().any(|loading| **loading == *name) {
                error!(Syntax, "recursive include/extends of '{name}'");
            }
            me.loading = parent.loading.iter().cloned().chain(me.loading).collect();
        }

        Ok(me)
    }

    /// Parse the whole source.
    pub fn parse(mut self) -> Result<NodeTree> {
        let nodes = self.parse_all()?;
        tracing::debug!(name = self.name, blocks = self.blocks.len(), "compiled template");
        Ok(NodeTree {
            nodes,
            blocks: self.blocks,
            name: self.name.map(Into::into),
        })
    }

    /// Name of the template being parsed, if any.
    pub fn name(&self) -> Option<&'a str> {
        self.name
    }

    pub fn env(&self) -> &'a Environment {
        self.env
    }

    /// Returns `true` if no meaningful token has been consumed yet.
    ///
    /// Whitespace only text does not count.
    pub fn is_first(&self) -> bool {
        self.first
    }

    /// Returns `true` if the tag currently being built was the first meaningful token.
    pub fn tag_is_first(&self) -> bool {
        self.tag_first
    }

    /// Block registry of this parse.
    pub fn blocks(&self) -> &BlockRegistry {
        &self.blocks
    }

    pub fn blocks_mut(&mut self) -> &mut BlockRegistry {
        &mut self.blocks
    }

    /// Lex tag arguments.
    pub fn parse_arguments(&self, arguments: &str) -> Result<Vec<Argument>> {
        Ok(lex(arguments)?)
    }

    /// Load a template relative to the current one, always parsing it anew.
    pub fn load_local(&self, name: &str) -> Result<NodeTree> {
        let Some(loader) = self.env.loader() else {
            error!(Runtime, "no loader defined, cannot load '{name}'");
        };
        loader.load_local(name, Some(self), self.env)
    }

    /// Parse until end of input.
    pub fn parse_all(&mut self) -> Result<NodeList> {
        self.parse_until(|_, _| false)
    }

    /// Parse nodes until `until` returns `true` for a block tag.
    ///
    /// `until` receives the tag keyword and the rest of the tag, it is consulted before tag
    /// dispatch. The terminating tag is consumed.
    pub fn parse_until(&mut self, mut until: impl FnMut(&str, &str) -> bool) -> Result<NodeList> {
        let mut nodes = vec![];

        while let Some(token) = self.tokens.next() {
            match token {
                Token::Text(text) => {
                    if self.first && !text.trim().is_empty() {
                        self.first = false;
                    }
                    if !text.is_empty() {
                        nodes.push(Node::Text(text.into()));
                    }
                }
                Token::Comment(_) => {}
                Token::Variable(source) => {
                    self.first = false;
                    nodes.push(self.parse_variable(source)?);
                }
                Token::Block(source) => {
                    let (keyword, rest) = match source.split_once(char::is_whitespace) {
                        Some((keyword, rest)) => (keyword, rest.trim_start()),
                        None => (source, ""),
                    };

                    if until(keyword, rest) {
                        self.first = false;
                        return Ok(NodeList::new(nodes));
                    }

                    let env = self.env;
                    let Some(factory) = env.tags().get(keyword) else {
                        error!(Syntax, "unknown tag '{keyword}'");
                    };

                    tracing::trace!(tag = keyword, "dispatch tag");
                    self.tag_first = mem::replace(&mut self.first, false);
                    nodes.push(factory(self, rest)?);
                }
            }
        }

        Ok(NodeList::new(nodes))
    }

    /// Parse until one of `keywords`, returns the body and the keyword that closed it.
    ///
    /// Reaching end of input first is an error.
    pub fn parse_body(
        &mut self,
        tag: &str,
        keywords: &[&'static str],
    ) -> Result<(NodeList, &'static str)> {
        let mut end = None;
        let body = self.parse_until(|keyword, _| {
            end = keywords.iter().copied().find(|k| *k == keyword);
            end.is_some()
        })?;

        match end {
            Some(keyword) => Ok((body, keyword)),
            None => error!(Syntax, "unclosed '{tag}' tag, expected '{}'", keywords.join("' or '")),
        }
    }

    fn parse_variable(&self, source: &str) -> Result<Node> {
        let mut path = None;
        let mut filters = vec![];

        for argument in self.parse_arguments(source)? {
            match argument {
                Argument::Filter(filter) => filters.push(filter),
                Argument::Name(name) if path.is_none() => path = Some(name),
                _ => error!(Syntax, "invalid syntax for variable '{source}'"),
            }
        }

        let Some(path) = path else {
            error!(Syntax, "invalid syntax for variable '{source}'");
        };

        Ok(Node::Variable(VariableNode { path, filters }))
    }
}
