use syn::{punctuated::Punctuated, *};

use crate::common::{DERIVE_ATTRIBUTE, error};

/// Type level metadata.
pub struct Metadata {
    /// Zero argument methods accessible from templates.
    pub methods: Vec<Ident>,
}

// ===== Visitor =====

pub struct AttrVisitor {
    methods: Vec<Ident>,
}

impl AttrVisitor {
    /// Derive macro type level attribute
    ///
    /// Accept input:
    ///
    /// - methods: `#[template(methods(<Ident>, ..))]`
    pub fn parse(attrs: &[Attribute]) -> Result<Metadata> {
        let mut visitor = Self { methods: vec![] };

        for meta in template_metas(attrs)? {
            visitor.visit_meta(meta)?;
        }

        Ok(Metadata { methods: visitor.methods })
    }

    fn visit_meta(&mut self, meta: Meta) -> Result<()> {
        match meta {
            Meta::List(list) if list.path.is_ident("methods") => {
                let names = list.parse_args_with(Punctuated::<Ident, Token![,]>::parse_terminated)?;
                for name in names {
                    self.visit_method(name)?;
                }
                Ok(())
            }
            meta => error!(meta, "expected `methods(..)`"),
        }
    }

    fn visit_method(&mut self, name: Ident) -> Result<()> {
        if self.methods.contains(&name) {
            error!(name, "duplicate method `{name}`");
        }
        self.methods.push(name);
        Ok(())
    }
}

/// Field level attribute, returns `true` for `#[template(expose)]`.
pub fn is_exposed(attrs: &[Attribute]) -> Result<bool> {
    let mut exposed = false;

    for meta in template_metas(attrs)? {
        match meta {
            Meta::Path(path) if path.is_ident("expose") => exposed = true,
            meta => error!(meta, "expected `expose`"),
        }
    }

    Ok(exposed)
}

// ===== Util =====

fn template_metas(attrs: &[Attribute]) -> Result<Vec<Meta>> {
    let mut metas = vec![];

    for attr in attrs.iter().filter(|e| e.meta.path().is_ident(DERIVE_ATTRIBUTE)) {
        metas.extend(attr.parse_args_with(Punctuated::<Meta, Token![,]>::parse_terminated)?);
    }

    Ok(metas)
}
