//! The [`Object`] trait.
use crate::{Result, Value, Writer};

/// Host data exposed to templates through an explicit allow-list.
///
/// Dotted path resolution only calls [`get`] for a name after [`is_template_accessible`]
/// returned `true` for that exact name, so an implementation never exposes more than it lists.
///
/// Usually implemented with the [`Object`][tessera_macros::Object] derive macro:
///
/// ```
/// use tessera::Object;
///
/// #[derive(Debug, Object)]
/// #[template(methods(full_name))]
/// struct User {
///     #[template(expose)]
///     first_name: String,
///     last_name: String,
/// }
///
/// impl User {
///     fn full_name(&self) -> String {
///         format!("{} {}", self.first_name, self.last_name)
///     }
/// }
/// ```
///
/// [`get`]: Object::get
/// [`is_template_accessible`]: Object::is_template_accessible
pub trait Object: std::fmt::Debug + Send + Sync {
    /// Returns `true` if the zero argument accessor `name` may be invoked by a template.
    fn is_template_accessible(&self, name: &str) -> bool;

    /// Invoke the accessor `name`.
    ///
    /// Only called when [`is_template_accessible`][Object::is_template_accessible] admits
    /// `name`.
    fn get(&self, name: &str) -> Option<Value>;

    /// Number of items, if the object is a sized collection.
    ///
    /// Used for truthiness, the `length` filter, and to allow iteration in `for`.
    fn size(&self) -> Option<usize> {
        None
    }

    /// Iterate items, only consulted when [`size`][Object::size] is [`Some`].
    fn iter(&self) -> Option<Box<dyn Iterator<Item = Value> + '_>> {
        None
    }

    /// Render the object as text, renders nothing by default.
    fn render(&self, f: &mut dyn Writer) -> Result<()> {
        let _ = f;
        Ok(())
    }
}
