//! The [`Context`] type.
use std::{collections::HashMap, fmt, sync::Arc};
use tessera_core::{Argument, Delimiter, FilterCall, Number};

use crate::{
    FilterRegistry, Map, NodeId, Result, Value,
    error::error,
    value::{Accessor, Deferred},
};

/// Names injected into the globals frame, templates cannot rebind them there.
pub const RESERVED: [&str; 4] = ["nil", "true", "false", "tessera"];

/// One layer of the variable binding stack.
struct Frame {
    names: Map,
    /// per render state of tags, keyed by node identity
    nodes: HashMap<NodeId, Value>,
    /// `false` for frames that only carry bindings, node state goes to the frame below
    scope: bool,
}

impl Frame {
    fn new(names: Map, scope: bool) -> Self {
        Self { names, nodes: HashMap::new(), scope }
    }
}

/// Layered runtime namespace of a single render.
///
/// The bottom frame is the caller namespace and is never popped. Lookup walks frames from the
/// innermost to the root, the first frame binding the name wins, even when bound to nil.
pub struct Context<'env> {
    frames: Vec<Frame>,
    /// lowest frame index that can be popped
    floor: usize,
    globals: Option<usize>,
    filters: &'env FilterRegistry,
}

impl<'env> Context<'env> {
    /// Create context with `namespace` as root frame.
    pub fn new(namespace: Map, filters: &'env FilterRegistry) -> Self {
        Self {
            frames: vec![Frame::new(namespace, true)],
            floor: 1,
            globals: None,
            filters,
        }
    }

    /// Push the frame holding `nil`, `true`, `false` and the `tessera` metadata record.
    ///
    /// The frame is never popped afterwards.
    pub fn push_globals(&mut self) {
        let mut meta = Map::new();
        for delimiter in Delimiter::ALL {
            let name = match delimiter {
                Delimiter::Block => "block",
                Delimiter::Variable => "var",
                Delimiter::Comment => "comment",
            };
            meta.insert(format!("{name}_start"), delimiter.open().into());
            meta.insert(format!("{name}_end"), delimiter.close().into());
        }
        meta.insert("version".into(), format!("tessera {}", env!("CARGO_PKG_VERSION")).into());

        let mut names = Map::new();
        names.insert("nil".into(), Value::Nil);
        names.insert("true".into(), Value::Bool(true));
        names.insert("false".into(), Value::Bool(false));
        names.insert("tessera".into(), Value::Map(Arc::new(meta)));

        self.frames.push(Frame::new(names, true));
        self.globals = Some(self.frames.len() - 1);
        self.floor = self.frames.len();
    }

    /// Push a new frame, empty if [`None`].
    pub fn push(&mut self, names: Option<Map>) {
        self.frames.push(Frame::new(names.unwrap_or_default(), true));
    }

    /// Push a frame that only carries bindings.
    ///
    /// Node state set while it is innermost is stored in the nearest regular frame, so it
    /// outlives this frame. Used by `block`, which pushes a frame on every render.
    pub fn push_bindings(&mut self, names: Option<Map>) {
        self.frames.push(Frame::new(names.unwrap_or_default(), false));
    }

    /// Pop the innermost frame, returns [`None`] if only the protected frames remain.
    pub fn pop(&mut self) -> Option<Map> {
        if self.frames.len() > self.floor {
            self.frames.pop().map(|frame| frame.names)
        } else {
            None
        }
    }

    /// Number of frames, including root.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Lookup a single name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.frames.iter().rev().find_map(|frame| frame.names.get(name))
    }

    /// Bind `name` in the innermost frame.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let top = self.frames.len() - 1;

        if self.globals == Some(top) && RESERVED.contains(&name.as_str()) {
            tracing::warn!(name = %name, "ignored write to reserved name");
            return;
        }

        if let Some(frame) = self.frames.last_mut() {
            frame.names.insert(name, value.into());
        }
    }

    /// Lookup per render state of a node.
    pub fn get_node(&self, id: NodeId) -> Option<&Value> {
        self.frames.iter().rev().find_map(|frame| frame.nodes.get(&id))
    }

    /// Store per render state of a node in the innermost regular frame.
    pub fn set_node(&mut self, id: NodeId, value: Value) {
        let frame = match self.frames.iter().rposition(|frame| frame.scope) {
            Some(index) => self.frames.get_mut(index),
            None => self.frames.first_mut(),
        };
        if let Some(frame) = frame {
            frame.nodes.insert(id, value);
        }
    }

    /// Resolve a dotted path.
    ///
    /// Each segment is tried as a map key, then as an integer index, then as a capability
    /// gated [`Object`][crate::Object] accessor or a deferred record field. Failure at any
    /// segment yields [`Value::Nil`], errors are only returned by deferred fields.
    pub fn resolve(&mut self, path: &str) -> Result<Value> {
        let mut segments = path.split('.');

        let Some(mut current) = segments.next().and_then(|name| self.get(name)).cloned() else {
            return Ok(Value::Nil);
        };

        for segment in segments {
            current = match self.step(&current, segment)? {
                Some(value) => value,
                None => return Ok(Value::Nil),
            };
        }

        Ok(current)
    }

    fn step(&mut self, current: &Value, segment: &str) -> Result<Option<Value>> {
        if let Value::Map(map) = current {
            if let Some(value) = map.get(segment) {
                return Ok(Some(value.clone()));
            }
        }

        if let Ok(index) = segment.parse::<i64>() {
            let value = match current {
                Value::List(list) => offset(index, list.len()).and_then(|i| list.get(i)).cloned(),
                Value::Str(s) => {
                    let len = s.chars().count();
                    offset(index, len).and_then(|i| s.chars().nth(i)).map(Value::from)
                }
                _ => None,
            };
            return Ok(value);
        }

        match current {
            Value::Object(object) if object.is_template_accessible(segment) => {
                Ok(object.get(segment))
            }
            Value::Deferred(deferred) => {
                let deferred = Arc::clone(deferred);
                match deferred.field(segment) {
                    Some(Accessor::Call(call)) => call(self).map(Some),
                    Some(Accessor::Int(n)) => Ok(Some(Value::Int(*n))),
                    Some(Accessor::Str(s)) => Ok(Some(Value::Str(s.clone()))),
                    None => Ok(None),
                }
            }
            _ => Ok(None),
        }
    }

    /// Evaluate a lexed argument, names are resolved.
    pub fn eval(&mut self, argument: &Argument) -> Result<Value> {
        match argument {
            Argument::Name(path) => self.resolve(path),
            Argument::Number(Number::Int(n)) => Ok(Value::Int(*n)),
            Argument::Number(Number::Float(n)) => Ok(Value::Float(*n)),
            Argument::String(s) => Ok(Value::from(s.as_str())),
            Argument::Filter(filter) => error!(Runtime, "unexpected filter '{}'", filter.name),
        }
    }

    /// Pass `value` through each filter in order.
    pub fn apply_filters(&mut self, mut value: Value, filters: &[FilterCall]) -> Result<Value> {
        let registry = self.filters;

        for call in filters {
            let Some(filter) = registry.get(&call.name) else {
                error!(Runtime, "filter '{}' missing", call.name);
            };

            let args = call.args.iter().map(|arg| self.eval(arg)).collect::<Result<Vec<_>>>()?;

            tracing::trace!(filter = %call.name, args = args.len(), "apply filter");
            value = filter(self, value, &args)?;
        }
        Ok(value)
    }

    /// Create the `block` record exposed inside a block tag.
    pub(crate) fn block_record(
        name: &str,
        depth: usize,
        parent: impl Fn(&mut Context<'_>) -> Result<Value> + Send + Sync + 'static,
    ) -> Value {
        Deferred::new()
            .with("super", Accessor::Call(Box::new(parent)))
            .with("depth", Accessor::Int(i64::try_from(depth).unwrap_or(i64::MAX)))
            .with("name", Accessor::Str(name.into()))
            .into()
    }
}

/// Resolve possibly negative index against `len`.
fn offset(index: i64, len: usize) -> Option<usize> {
    if index < 0 {
        len.checked_sub(usize::try_from(index.unsigned_abs()).ok()?)
    } else {
        usize::try_from(index).ok()
    }
}

impl fmt::Debug for Context<'_> {
    /// Merged view of every frame, inner bindings shadow outer ones.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut merged = Map::new();
        for frame in &self.frames {
            for (key, value) in &frame.names {
                merged.insert(key.clone(), value.clone());
            }
        }
        f.debug_map().entries(merged.iter()).finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{Object, context};

    #[derive(Debug)]
    struct Account;

    impl Object for Account {
        fn is_template_accessible(&self, name: &str) -> bool {
            name == "owner"
        }

        fn get(&self, name: &str) -> Option<Value> {
            match name {
                "owner" => Some("alice".into()),
                "password" => panic!("accessor invoked without permission"),
                _ => None,
            }
        }
    }

    fn filters() -> FilterRegistry {
        FilterRegistry::with_builtins()
    }

    #[test]
    fn push_pop() {
        let filters = filters();
        let mut cx = Context::new(context! { a => 1 }, &filters);
        assert!(cx.pop().is_none());

        cx.push(None);
        cx.set("a", 2);
        assert_eq!(cx.get("a"), Some(&Value::Int(2)));
        assert!(cx.pop().is_some());
        assert_eq!(cx.get("a"), Some(&Value::Int(1)));
        assert!(cx.pop().is_none());
        assert_eq!(cx.depth(), 1);
    }

    #[test]
    fn resolve_paths() {
        let filters = filters();
        let namespace = context! {
            user => context! { name => "bob", tags => vec!["x", "y", "z"] },
            account => Value::from_object(Account),
        };
        let mut cx = Context::new(namespace, &filters);

        assert_eq!(cx.resolve("user.name").unwrap(), Value::from("bob"));
        assert_eq!(cx.resolve("user.tags.1").unwrap(), Value::from("y"));
        assert_eq!(cx.resolve("user.tags.-1").unwrap(), Value::from("z"));
        assert_eq!(cx.resolve("user.tags.9").unwrap(), Value::Nil);
        assert_eq!(cx.resolve("user.name.0").unwrap(), Value::from("b"));
        assert_eq!(cx.resolve("user.missing.deep").unwrap(), Value::Nil);
        assert_eq!(cx.resolve("account.owner").unwrap(), Value::from("alice"));
        assert_eq!(cx.resolve("account.password").unwrap(), Value::Nil);
        assert_eq!(cx.resolve("nothing").unwrap(), Value::Nil);
    }

    #[test]
    fn reserved_names() {
        let filters = filters();
        let mut cx = Context::new(Map::new(), &filters);
        cx.push_globals();
        assert_eq!(cx.resolve("true").unwrap(), Value::Bool(true));
        assert_eq!(cx.resolve("tessera.block_start").unwrap(), Value::from("{%"));

        cx.set("true", false);
        assert_eq!(cx.resolve("true").unwrap(), Value::Bool(true));
        assert!(cx.pop().is_none());

        cx.push(None);
        cx.set("true", false);
        assert_eq!(cx.resolve("true").unwrap(), Value::Bool(false));
    }

    #[test]
    fn node_state() {
        let filters = filters();
        let mut cx = Context::new(Map::new(), &filters);
        let id = NodeId::next();

        cx.set_node(id, Value::Int(1));
        cx.push(None);
        assert_eq!(cx.get_node(id), Some(&Value::Int(1)));
        cx.set_node(id, Value::Int(2));
        cx.pop();
        assert_eq!(cx.get_node(id), Some(&Value::Int(1)));

        cx.push_bindings(None);
        cx.set_node(id, Value::Int(3));
        cx.pop();
        assert_eq!(cx.get_node(id), Some(&Value::Int(3)));
    }

    #[test]
    fn nil_shadows() {
        let filters = filters();
        let mut cx = Context::new(context! { x => "outer" }, &filters);

        cx.push(None);
        cx.set("x", Value::Nil);
        assert_eq!(cx.get("x"), Some(&Value::Nil));
        assert_eq!(cx.resolve("x").unwrap(), Value::Nil);
        cx.pop();

        assert_eq!(cx.resolve("x").unwrap(), Value::from("outer"));
    }

    #[test]
    fn unknown_filter() {
        let filters = filters();
        let mut cx = Context::new(Map::new(), &filters);
        let call = FilterCall { name: "nope".into(), args: vec![] };
        assert!(matches!(cx.apply_filters(Value::Nil, &[call]), Err(crate::Error::Runtime(_))));
    }
}
