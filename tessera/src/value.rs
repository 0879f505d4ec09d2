//! The [`Value`] type.
use std::{
    cmp::Ordering,
    collections::{BTreeMap, HashMap},
    fmt,
    sync::Arc,
};

use crate::{Context, Object, Result};

/// String keyed mapping, the shape of a namespace and of loop records.
pub type Map = BTreeMap<String, Value>;

/// Any value a template can see.
#[derive(Clone, Default)]
pub enum Value {
    /// Absence of value, also the `nil` literal.
    #[default]
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(Arc<str>),
    List(Arc<Vec<Value>>),
    Map(Arc<Map>),
    /// Host object behind the capability gate.
    Object(Arc<dyn Object>),
    /// Lazily evaluated record, see [`Deferred`].
    Deferred(Arc<Deferred>),
}

impl Value {
    /// Wrap host object.
    pub fn from_object(object: impl Object + 'static) -> Self {
        Self::Object(Arc::new(object))
    }

    /// Template truthiness.
    ///
    /// `false` and `nil` are false, numbers are true when non zero, strings and collections
    /// are true when non empty, sized objects are true when their size is non zero. Anything
    /// else is true.
    pub fn is_true(&self) -> bool {
        match self {
            Value::Nil => false,
            Value::Bool(b) => *b,
            Value::Int(n) => *n != 0,
            Value::Float(n) => *n != 0.0,
            Value::Str(s) => !s.is_empty(),
            Value::List(list) => !list.is_empty(),
            Value::Map(map) => !map.is_empty(),
            Value::Object(object) => object.size().is_none_or(|size| size > 0),
            Value::Deferred(_) => true,
        }
    }

    /// Returns `true` if value is [`Value::Nil`].
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// Size of strings, collections and sized objects.
    pub fn size(&self) -> Option<usize> {
        match self {
            Value::Str(s) => Some(s.chars().count()),
            Value::List(list) => Some(list.len()),
            Value::Map(map) => Some(map.len()),
            Value::Object(object) => object.size(),
            _ => None,
        }
    }

    /// Collect items of a value that is both iterable and sized.
    ///
    /// Lists yield their items, maps yield `[key, value]` pairs, objects yield through
    /// [`Object::iter`] truncated to [`Object::size`]. Anything else returns [`None`].
    pub fn sized_items(&self) -> Option<Vec<Value>> {
        match self {
            Value::List(list) => Some(list.as_ref().clone()),
            Value::Map(map) => Some(
                map.iter()
                    .map(|(key, value)| Value::from(vec![Value::from(key.as_str()), value.clone()]))
                    .collect(),
            ),
            Value::Object(object) => {
                let size = object.size()?;
                Some(object.iter()?.take(size).collect())
            }
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Integer view of a number, floats are truncated.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            Value::Float(n) if n.is_finite() => Some(*n as i64),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(list) => Some(list),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Render value into a new string.
    pub fn to_text(&self) -> String {
        let mut buffer = String::new();
        // writing into a String never fails
        let _ = crate::Display::display(self, &mut buffer);
        buffer
    }

    /// Total order used by the `sort` filter.
    ///
    /// Values of different kinds are ordered by kind, numbers compare numerically.
    pub fn sort_cmp(&self, other: &Value) -> Ordering {
        fn rank(value: &Value) -> u8 {
            match value {
                Value::Nil => 0,
                Value::Bool(_) => 1,
                Value::Int(_) | Value::Float(_) => 2,
                Value::Str(_) => 3,
                Value::List(_) => 4,
                Value::Map(_) => 5,
                Value::Object(_) | Value::Deferred(_) => 6,
            }
        }

        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Int(_) | Value::Float(_), Value::Int(_) | Value::Float(_)) => {
                let (a, b) = (self.as_f64(), other.as_f64());
                a.partial_cmp(&b).unwrap_or(Ordering::Equal)
            }
            (Value::Str(a), Value::Str(b)) => a.cmp(b),
            (Value::List(a), Value::List(b)) => {
                for (a, b) in a.iter().zip(b.iter()) {
                    match a.sort_cmp(b) {
                        Ordering::Equal => {}
                        ord => return ord,
                    }
                }
                a.len().cmp(&b.len())
            }
            _ => rank(self).cmp(&rank(other)),
        }
    }

    fn as_f64(&self) -> f64 {
        match self {
            Value::Int(n) => *n as f64,
            Value::Float(n) => *n,
            _ => f64::NAN,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Int(a), Value::Float(b)) | (Value::Float(b), Value::Int(a)) => *a as f64 == *b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => {
                std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
            }
            (Value::Deferred(a), Value::Deferred(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => f.write_str("nil"),
            Value::Bool(b) => b.fmt(f),
            Value::Int(n) => n.fmt(f),
            Value::Float(n) => n.fmt(f),
            Value::Str(s) => s.fmt(f),
            Value::List(list) => f.debug_list().entries(list.iter()).finish(),
            Value::Map(map) => f.debug_map().entries(map.iter()).finish(),
            Value::Object(object) => object.fmt(f),
            Value::Deferred(deferred) => deferred.fmt(f),
        }
    }
}

// ===== Deferred =====

/// Field evaluated on access, with mutable access to the rendering [`Context`].
pub type DeferredFn = dyn Fn(&mut Context<'_>) -> Result<Value> + Send + Sync;

/// A field of a [`Deferred`] record.
pub enum Accessor {
    /// Evaluated each time the field is resolved.
    Call(Box<DeferredFn>),
    Int(i64),
    Str(Arc<str>),
}

/// Record whose fields are only evaluated when a template resolves them.
///
/// Used by `block` to expose `block.super`, `block.depth` and `block.name`.
#[derive(Default)]
pub struct Deferred {
    fields: Vec<(&'static str, Accessor)>,
}

impl Deferred {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field.
    pub fn with(mut self, name: &'static str, accessor: Accessor) -> Self {
        self.fields.push((name, accessor));
        self
    }

    pub fn field(&self, name: &str) -> Option<&Accessor> {
        self.fields.iter().find(|(key, _)| *key == name).map(|(_, accessor)| accessor)
    }
}

impl fmt::Debug for Deferred {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        struct Unknown;

        impl fmt::Debug for Unknown {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("?")
            }
        }

        let mut map = f.debug_map();
        for (name, accessor) in &self.fields {
            match accessor {
                Accessor::Call(_) => map.entry(name, &Unknown),
                Accessor::Int(n) => map.entry(name, n),
                Accessor::Str(s) => map.entry(name, s),
            };
        }
        map.finish()
    }
}

// ===== Conversions =====

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Str(value.into())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Str(value.into())
    }
}

impl From<&String> for Value {
    fn from(value: &String) -> Self {
        Self::Str(value.as_str().into())
    }
}

impl From<Arc<str>> for Value {
    fn from(value: Arc<str>) -> Self {
        Self::Str(value)
    }
}

impl From<char> for Value {
    fn from(value: char) -> Self {
        Self::Str(value.to_string().into())
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

macro_rules! from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(value: $t) -> Self {
                    Self::Int(value.into())
                }
            }
        )*
    };
}

macro_rules! from_wide_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(value: $t) -> Self {
                    Self::Int(i64::try_from(value).unwrap_or(i64::MAX))
                }
            }
        )*
    };
}

from_int!(i8, i16, i32, i64, u8, u16, u32);
from_wide_int!(u64, usize, isize);

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Self::Float(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl<T> From<Option<T>> for Value where T: Into<Value> {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or_default()
    }
}

impl<T> From<Vec<T>> for Value where T: Into<Value> {
    fn from(value: Vec<T>) -> Self {
        Self::List(Arc::new(value.into_iter().map(Into::into).collect()))
    }
}

impl<T> From<&[T]> for Value where T: Into<Value> + Clone {
    fn from(value: &[T]) -> Self {
        Self::List(Arc::new(value.iter().cloned().map(Into::into).collect()))
    }
}

impl<V> From<BTreeMap<String, V>> for Value where V: Into<Value> {
    fn from(value: BTreeMap<String, V>) -> Self {
        Self::Map(Arc::new(value.into_iter().map(|(k, v)| (k, v.into())).collect()))
    }
}

impl<V> From<HashMap<String, V>> for Value where V: Into<Value> {
    fn from(value: HashMap<String, V>) -> Self {
        Self::Map(Arc::new(value.into_iter().map(|(k, v)| (k, v.into())).collect()))
    }
}

impl From<Arc<dyn Object>> for Value {
    fn from(value: Arc<dyn Object>) -> Self {
        Self::Object(value)
    }
}

impl From<Deferred> for Value {
    fn from(value: Deferred) -> Self {
        Self::Deferred(Arc::new(value))
    }
}

impl FromIterator<Value> for Value {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self::List(Arc::new(iter.into_iter().collect()))
    }
}

/// Build a namespace [`Map`].
///
/// ```
/// let namespace = tessera::context! {
///     name => "World",
///     items => vec![1, 2, 3],
/// };
/// assert_eq!(namespace.len(), 2);
/// ```
#[macro_export]
macro_rules! context {
    () => { $crate::Map::new() };
    ($($key:ident => $value:expr),* $(,)?) => {{
        let mut map = $crate::Map::new();
        $(
            map.insert(stringify!($key).to_owned(), $crate::Value::from($value));
        )*
        map
    }};
}

#[cfg(test)]
mod test {
    use super::*;

    #[derive(Debug)]
    struct Bag(Vec<i64>, bool);

    impl Object for Bag {
        fn is_template_accessible(&self, _: &str) -> bool {
            false
        }

        fn get(&self, _: &str) -> Option<Value> {
            None
        }

        fn size(&self) -> Option<usize> {
            self.1.then_some(self.0.len())
        }

        fn iter(&self) -> Option<Box<dyn Iterator<Item = Value> + '_>> {
            Some(Box::new(self.0.iter().copied().map(Value::from)))
        }
    }

    #[test]
    fn truthiness() {
        assert!(!Value::Nil.is_true());
        assert!(!Value::from(false).is_true());
        assert!(!Value::from(0).is_true());
        assert!(!Value::from(0.0).is_true());
        assert!(!Value::from("").is_true());
        assert!(!Value::from(Vec::<i64>::new()).is_true());
        assert!(Value::from(-1).is_true());
        assert!(Value::from("a").is_true());
        assert!(Value::from(vec![0]).is_true());
        assert!(!Value::from_object(Bag(vec![], true)).is_true());
        assert!(Value::from_object(Bag(vec![], false)).is_true());
    }

    #[test]
    fn sized_items() {
        let map = Value::from(context! { a => 1, b => 2 });
        let items = map.sized_items().unwrap();
        assert_eq!(items[0], Value::from(vec![Value::from("a"), Value::from(1)]));

        assert_eq!(Value::from_object(Bag(vec![1, 2], true)).sized_items().unwrap().len(), 2);
        assert!(Value::from_object(Bag(vec![1, 2], false)).sized_items().is_none());
        assert!(Value::from("abc").sized_items().is_none());
        assert!(Value::from(3).sized_items().is_none());
    }

    #[test]
    fn equality() {
        assert_eq!(Value::from(1), Value::from(1.0));
        assert_ne!(Value::from("1"), Value::from(1));

        let object: Arc<dyn Object> = Arc::new(Bag(vec![], true));
        assert_eq!(Value::from(object.clone()), Value::from(object));
        assert_ne!(Value::from_object(Bag(vec![], true)), Value::from_object(Bag(vec![], true)));
    }

    #[test]
    fn sort_order() {
        let mut list = vec![Value::from("b"), Value::from(2), Value::from(1.5), Value::from("a")];
        list.sort_by(Value::sort_cmp);
        assert_eq!(list, [Value::from(1.5), Value::from(2), Value::from("a"), Value::from("b")]);
    }
}
