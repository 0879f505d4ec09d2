use proc_macro2::TokenStream;
use quote::quote;
use syn::*;

use crate::{
    attribute::{AttrVisitor, is_exposed},
    common::{TesseraObject, TesseraValue, error},
};

pub fn object(input: DeriveInput) -> Result<TokenStream> {
    let DeriveInput { attrs, ident, generics, data, .. } = input;
    let meta = AttrVisitor::parse(&attrs)?;

    let mut fields = vec![];

    match &data {
        Data::Struct(DataStruct { fields: Fields::Named(named), .. }) => {
            for field in &named.named {
                if is_exposed(&field.attrs)? {
                    fields.extend(field.ident.clone());
                }
            }
        }
        Data::Struct(DataStruct { fields: Fields::Unnamed(unnamed), .. }) => {
            for field in &unnamed.unnamed {
                if is_exposed(&field.attrs)? {
                    error!(field, "`expose` requires a named field");
                }
            }
        }
        _ => {}
    }

    for method in &meta.methods {
        if fields.contains(method) {
            error!(method, "`{method}` is both an exposed field and a method");
        }
    }

    let methods = &meta.methods;
    let field_names = fields.iter().map(ToString::to_string);
    let method_names = methods.iter().map(ToString::to_string);

    let accessible = if fields.is_empty() && methods.is_empty() {
        quote! {
            let _ = name;
            false
        }
    } else {
        let names = fields.iter().chain(methods).map(ToString::to_string);
        quote! {
            matches!(name, #(#names)|*)
        }
    };

    let (g1, g2, g3) = generics.split_for_impl();
    // unit structs cannot be interpolated inside a repetition
    let value = TesseraValue;

    Ok(quote! {
        #[automatically_derived]
        impl #g1 #TesseraObject for #ident #g2 #g3 {
            fn is_template_accessible(&self, name: &str) -> bool {
                #accessible
            }

            fn get(&self, name: &str) -> ::core::option::Option<#TesseraValue> {
                match name {
                    #(
                        #field_names => ::core::option::Option::Some(
                            #value::from(::core::clone::Clone::clone(&self.#fields))
                        ),
                    )*
                    #(
                        #method_names => ::core::option::Option::Some(
                            #value::from(self.#methods())
                        ),
                    )*
                    _ => ::core::option::Option::None,
                }
            }
        }
    })
}
