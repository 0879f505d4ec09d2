use std::{fmt, io};
use tessera_core::ParseError;

/// [`Result`][std::result::Result] alias for [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// An error that can occur during compiling, loading or rendering.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed tag, expression or argument, fatal to compilation.
    #[error("syntax error: {0}")]
    Syntax(String),
    /// Structural failure while rendering, e.g. unknown filter.
    #[error("runtime error: {0}")]
    Runtime(String),
    /// A loader could not resolve the template name.
    #[error("template not found: {0}")]
    TemplateNotFound(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Error {
    /// Convert error to [`io::Error`].
    ///
    /// [`Error::Syntax`] will become [`io::ErrorKind::InvalidData`].
    pub fn into_io(self) -> io::Error {
        match self {
            Error::Syntax(_) => io::Error::new(io::ErrorKind::InvalidData, self),
            Error::TemplateNotFound(_) => io::Error::new(io::ErrorKind::NotFound, self),
            Error::Runtime(_) => io::Error::other(self),
            Error::Io(error) => error,
        }
    }

    /// Returns `true` if the error is [`Error::TemplateNotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::TemplateNotFound(_))
    }
}

impl From<ParseError> for Error {
    fn from(value: ParseError) -> Self {
        Self::Syntax(value.to_string())
    }
}

impl From<fmt::Error> for Error {
    fn from(_: fmt::Error) -> Self {
        Self::Io(io::ErrorKind::Other.into())
    }
}

/// `error!(Syntax, "{}", fragment)`, return early with formatted [`Error`] variant.
macro_rules! error {
    ($kind:ident, $($tt:tt)*) => {
        return Err($crate::Error::$kind(format!($($tt)*)))
    };
}

pub(crate) use error;
