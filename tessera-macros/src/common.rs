
// ===== Namespace =====

/// `ToTokens` for public name
pub(crate) struct TesseraObject;

impl quote::ToTokens for TesseraObject {
    fn to_tokens(&self, tokens: &mut proc_macro2::TokenStream) {
        quote::quote! {::tessera::Object}.to_tokens(tokens);
    }
}

/// `ToTokens` for public name
pub(crate) struct TesseraValue;

impl quote::ToTokens for TesseraValue {
    fn to_tokens(&self, tokens: &mut proc_macro2::TokenStream) {
        quote::quote! {::tessera::Value}.to_tokens(tokens);
    }
}

// ===== Constants =====

pub const DERIVE_ATTRIBUTE: &str = "template";

// ===== macros =====

/// Everything will return `Result<T, syn::Error>`
///
/// `error!(attr, "`{path}`: {}")`, standard `format!` with `attr`s span.
///
/// `error!("{}",error)`, standard `format!`
macro_rules! error {
    (@ $s:expr, $($tt:tt)*) => {
        return Err(syn::Error::new($s, format!($($tt)*)))
    };
    ($s:ident, $($tt:tt)*) => {
        crate::common::error!(@ syn::spanned::Spanned::span(&$s), $($tt)*)
    };
    ($($tt:tt)*) => {
        crate::common::error!(@ proc_macro2::Span::call_site(), $($tt)*)
    };
}

pub(crate) use error;
