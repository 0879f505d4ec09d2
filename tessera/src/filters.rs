//! Filter registry and builtin filters.
use std::{collections::HashMap, fmt, sync::Arc};

use crate::{Context, Display, Escape, Result, Value, error::error};

/// A filter, `(context, value, args) -> value`.
pub type Filter = dyn Fn(&Context<'_>, Value, &[Value]) -> Result<Value> + Send + Sync;

/// Filter name to filter.
#[derive(Clone, Default)]
pub struct FilterRegistry {
    filters: HashMap<String, Arc<Filter>>,
}

impl FilterRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every builtin filter.
    pub fn with_builtins() -> Self {
        let mut me = Self::new();
        me.register("lower", |_, value, _| Ok(value.to_text().to_lowercase().into()));
        me.register("upper", |_, value, _| Ok(value.to_text().to_uppercase().into()));
        me.register("capitalize", |_, value, _| Ok(capitalize(&value.to_text()).into()));
        me.register("truncate", truncate);
        me.register("join", join);
        me.register("replace", replace);
        me.register("sort", sort);
        me.register("reverse", reverse);
        me.register("first", |_, value, _| Ok(nth(value, 0)));
        me.register("last", |_, value, _| Ok(nth(value, -1)));
        me.register("escape", escape);
        me.register("urlencode", |_, value, _| Ok(urlencode(&value.to_text()).into()));
        me.register("length", |_, value, _| Ok(value.size().unwrap_or(0).into()));
        me
    }

    /// Register filter `name`, replacing any previous one.
    pub fn register<F>(&mut self, name: impl Into<String>, filter: F)
    where
        F: Fn(&Context<'_>, Value, &[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        self.filters.insert(name.into(), Arc::new(filter));
    }

    /// Remove filter `name`, returns `true` if it was registered.
    pub fn unregister(&mut self, name: &str) -> bool {
        self.filters.remove(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&Arc<Filter>> {
        self.filters.get(name)
    }

    /// Registered filter names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names = self.filters.keys().map(String::as_str).collect::<Vec<_>>();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for FilterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.as_str().to_lowercase().chars()).collect(),
        None => String::new(),
    }
}

/// `truncate(n = 80, ellipsis = "...")`
fn truncate(_: &Context<'_>, value: Value, args: &[Value]) -> Result<Value> {
    let n = match args.first() {
        Some(n) => match n.as_int().and_then(|n| usize::try_from(n).ok()) {
            Some(n) => n,
            None => error!(Runtime, "truncate length must be a non negative integer, found {n:?}"),
        },
        None => 80,
    };

    let text = value.to_text();
    if text.chars().count() <= n {
        return Ok(text.into());
    }

    let mut truncated = text.chars().take(n).collect::<String>();
    match args.get(1) {
        Some(ellipsis) => ellipsis.display(&mut truncated)?,
        None => truncated.push_str("..."),
    }
    Ok(truncated.into())
}

/// `join(separator = "")`
fn join(_: &Context<'_>, value: Value, args: &[Value]) -> Result<Value> {
    let Some(items) = value.as_list() else {
        return Ok(value);
    };

    let separator = args.first().map(Value::to_text).unwrap_or_default();
    let mut buffer = String::new();

    for (i, item) in items.iter().enumerate() {
        if i != 0 {
            buffer.push_str(&separator);
        }
        item.display(&mut buffer)?;
    }

    Ok(buffer.into())
}

/// `replace(search, replacement = "")`
fn replace(_: &Context<'_>, value: Value, args: &[Value]) -> Result<Value> {
    let Some(search) = args.first() else {
        error!(Runtime, "replace requires a search argument");
    };

    let search = search.to_text();
    let text = value.to_text();
    if search.is_empty() {
        return Ok(text.into());
    }

    let replacement = args.get(1).map(Value::to_text).unwrap_or_default();
    Ok(text.replace(&search, &replacement).into())
}

fn sort(_: &Context<'_>, value: Value, _: &[Value]) -> Result<Value> {
    match value {
        Value::List(_) | Value::Map(_) => {
            let mut items = value.sized_items().unwrap_or_default();
            items.sort_by(Value::sort_cmp);
            Ok(items.into())
        }
        value => Ok(value),
    }
}

fn reverse(_: &Context<'_>, value: Value, _: &[Value]) -> Result<Value> {
    match value {
        Value::List(list) => Ok(list.iter().rev().cloned().collect()),
        Value::Str(s) => Ok(s.chars().rev().collect::<String>().into()),
        value => Ok(value),
    }
}

/// Item at `index` for lists and strings, negative counts from the end.
///
/// Other values, and out of range indices, return the value itself.
fn nth(value: Value, index: isize) -> Value {
    let item = match &value {
        Value::List(list) => {
            let index = match index < 0 {
                true => list.len().checked_sub(index.unsigned_abs()),
                false => Some(index.unsigned_abs()),
            };
            index.and_then(|i| list.get(i)).cloned()
        }
        Value::Map(_) => {
            let items = value.sized_items().unwrap_or_default();
            if index < 0 { items.last().cloned() } else { items.first().cloned() }
        }
        Value::Str(s) => {
            let ch = if index < 0 { s.chars().next_back() } else { s.chars().next() };
            ch.map(Value::from)
        }
        _ => None,
    };
    item.unwrap_or(value)
}

/// `escape(attribute = false)`
fn escape(_: &Context<'_>, value: Value, args: &[Value]) -> Result<Value> {
    let attribute = args.first().is_some_and(Value::is_true);
    let mut buffer = String::new();
    value.display(&mut Escape { writer: &mut buffer, attribute })?;
    Ok(buffer.into())
}

/// Percent encode everything outside the unreserved and reserved uri characters.
fn urlencode(value: &str) -> String {
    const KEEP: &[u8] = b"-_.!~*'();/?:@&=+$,[]";
    const HEX: &[u8; 16] = b"0123456789ABCDEF";

    let mut buffer = String::with_capacity(value.len());
    for byte in value.bytes() {
        if byte.is_ascii_alphanumeric() || KEEP.contains(&byte) {
            buffer.push(byte as char);
        } else {
            buffer.push('%');
            buffer.push(HEX[(byte >> 4) as usize] as char);
            buffer.push(HEX[(byte & 0xF) as usize] as char);
        }
    }
    buffer
}
