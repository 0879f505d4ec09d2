
/// [`Result`][std::result::Result] alias for [`ParseError`].
pub type Result<T,E = ParseError> = core::result::Result<T,E>;

/// An error that may occur while lexing tag arguments.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// A character that no rule of the argument grammar accepts.
    #[error("unexpected character '{ch}' in {context}")]
    UnexpectedChar {
        ch: char,
        /// Either `block tag` or `filter def`.
        context: &'static str,
    },
    /// String literal without its closing quote.
    #[error("unterminated string literal `{0}`")]
    UnterminatedString(String),
    #[error("{0}")]
    Generic(String),
}
