//! Builtin tags.
//!
//! Every tag is a factory registered in the [`TagRegistry`] by keyword, which consumes the
//! [`Parser`][crate::Parser] to collect its own body and builds an immutable [`Tag`] node.
//!
//! [`Tag`]: crate::Tag
use tessera_core::Argument;

use crate::{Result, TagRegistry, error::error};

mod capture;
mod conditional;
mod debug;
mod filter;
mod forloop;
mod inclusion;
mod inheritance;
mod looptools;

pub use capture::Capture;
pub use conditional::If;
pub use debug::DebugTag;
pub use filter::FilterBlock;
pub use forloop::ForLoop;
pub use inclusion::Include;
pub use inheritance::{Block, Extends};
pub use looptools::{Cycle, IfChanged};

pub(crate) fn register_builtins(tags: &mut TagRegistry) {
    tags.register("if", conditional::parse);
    tags.register("for", forloop::parse);
    tags.register("cycle", looptools::parse_cycle);
    tags.register("ifchanged", looptools::parse_ifchanged);
    tags.register("capture", capture::parse);
    tags.register("filter", filter::parse);
    tags.register("debug", debug::parse);
    tags.register("block", inheritance::parse_block);
    tags.register("extends", inheritance::parse_extends);
    tags.register("include", inclusion::parse);
}

/// Returns `true` if `name` is a plain identifier, without dotted segments.
fn is_ident(name: &str) -> bool {
    let mut bytes = name.bytes();
    matches!(bytes.next(), Some(b) if b.is_ascii_alphabetic() || b == b'_')
        && bytes.all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

/// Extract the single string literal argument of `include` and `extends`.
fn literal_name(tag: &str, arguments: Vec<Argument>) -> Result<String> {
    match <[Argument; 1]>::try_from(arguments) {
        Ok([Argument::String(name)]) => Ok(name),
        _ => error!(Syntax, "{tag} takes exactly one argument which must be a hardcoded string"),
    }
}
