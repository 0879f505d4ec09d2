//! macros for `tessera` template
mod common;
mod attribute;
mod object;

/// derive macro for `Object` trait
///
/// - `#[template(expose)]` on a named field allow templates to read a clone of it
/// - `#[template(methods(a, b))]` on the type allow templates to call zero argument methods
///
/// Anything not listed is refused.
#[proc_macro_derive(Object, attributes(template))]
pub fn object(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    match object::object(syn::parse_macro_input!(input as syn::DeriveInput)) {
        Ok(ok) => ok.into(),
        Err(err) => err.into_compile_error().into(),
    }
}
