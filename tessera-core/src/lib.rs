//! The [`tessera`][1] template tokenizer.
//!
//! The [`Tokenizer`] will only split delimiters into literal text and raw tag contents, it
//! knows nothing about what a tag means.
//!
//! ```html
//! Hello {{ user.name|upper }}{% if admin %}!{% endif %}
//! ```
//!
//! [`Tokenizer`] will emit `Text("Hello ")`, `Variable("user.name|upper")`, `Block("if admin")`,
//! `Text("!")` and `Block("endif")`.
//!
//! The raw contents of a tag are turned into [`Argument`]s by the [`lex`] function, which is
//! used by the runtime parser in [`tessera`][1] to build the node tree.
//!
//! [1]: <https://docs.rs/tessera>
mod error;
mod syntax;
mod tokenizer;
mod lexer;

pub use error::{ParseError, Result};
pub use syntax::Delimiter;
pub use tokenizer::{Token, TokenStream, Tokenizer};
pub use lexer::{Argument, FilterCall, Number, lex};
