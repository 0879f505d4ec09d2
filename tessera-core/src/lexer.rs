//! Tag argument lexer.
//!
//! Turns the free-form text inside a tag or variable into a flat list of [`Argument`]s.
//!
//! ```text
//! user.name|replace "'", "\""|upper
//! ```
//!
//! results in:
//!
//! ```text
//! [Name("user.name"), Filter(replace, [String("'"), String("\"")]), Filter(upper, [])]
//! ```
//!
//! A `|` opens a filter group, everything until the next `|` or the end of input belongs to
//! that filter. Commas separate items but are otherwise not required.
use crate::{ParseError, Result};

/// A single lexed tag argument.
#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
    /// Identifier or dotted path, `user.name`, `items.0`.
    Name(String),
    /// Integer or float literal.
    Number(Number),
    /// Quoted string literal with escapes already processed.
    String(String),
    /// Filter group introduced by `|`.
    Filter(FilterCall),
}

/// Numeric literal, a value containing `.` is a float.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

/// `|name arg1, arg2`
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCall {
    pub name: String,
    pub args: Vec<Argument>,
}

impl Argument {
    /// Returns `true` if argument is a [`Argument::Filter`].
    pub fn is_filter(&self) -> bool {
        matches!(self, Self::Filter(_))
    }

    /// Returns the path if argument is a [`Argument::Name`].
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Self::Name(name) => Some(name),
            _ => None,
        }
    }
}

/// Lex the interior of a tag.
pub fn lex(source: &str) -> Result<Vec<Argument>> {
    Lexer { source, index: 0 }.lex()
}

enum LexState {
    Initial,
    Filter {
        name: Option<String>,
        args: Vec<Argument>,
    },
}

impl LexState {
    fn context(&self) -> &'static str {
        match self {
            LexState::Initial => "block tag",
            LexState::Filter { .. } => "filter def",
        }
    }

    /// Close current filter group, if any, into `output`.
    fn close(self, output: &mut Vec<Argument>) {
        if let LexState::Filter { name: Some(name), args } = self {
            output.push(Argument::Filter(FilterCall { name, args }));
        }
    }

    fn push_value(&mut self, value: Argument, output: &mut Vec<Argument>) -> Result<()> {
        match self {
            LexState::Initial => output.push(value),
            LexState::Filter { name: Some(_), args } => args.push(value),
            LexState::Filter { name: name @ None, .. } => match value {
                Argument::Name(ident) => *name = Some(ident),
                other => {
                    return Err(ParseError::Generic(format!(
                        "expected filter name, found {other:?}"
                    )))
                }
            },
        }
        Ok(())
    }
}

struct Lexer<'a> {
    source: &'a str,
    index: usize,
}

impl Lexer<'_> {
    fn lex(mut self) -> Result<Vec<Argument>> {
        let mut output = vec![];
        let mut state = LexState::Initial;

        while let Some(ch) = self.peek() {
            match ch {
                // suppress whitespace, no matter which state
                ch if ch.is_whitespace() => self.bump(ch),
                '|' => {
                    self.bump(ch);
                    std::mem::replace(&mut state, LexState::Filter { name: None, args: vec![] })
                        .close(&mut output);
                }
                ',' => self.bump(ch),
                '"' | '\'' => {
                    let value = self.string(ch)?;
                    state.push_value(Argument::String(value), &mut output)?;
                }
                ch if ch.is_ascii_alphabetic() || ch == '_' => {
                    let name = self.name();
                    state.push_value(Argument::Name(name.to_owned()), &mut output)?;
                }
                ch if ch.is_ascii_digit() => {
                    let number = self.number()?;
                    state.push_value(Argument::Number(number), &mut output)?;
                }
                ch => {
                    return Err(ParseError::UnexpectedChar { ch, context: state.context() });
                }
            }
        }

        state.close(&mut output);
        Ok(output)
    }

    fn peek(&self) -> Option<char> {
        self.source[self.index..].chars().next()
    }

    fn peek_byte(&self, offset: usize) -> Option<u8> {
        self.source.as_bytes().get(self.index + offset).copied()
    }

    fn bump(&mut self, ch: char) {
        self.index += ch.len_utf8();
    }

    /// collect identifier with optional `.segment`s
    ///
    /// the caller must ensure that current char is an ascii alphabetic or `_`
    fn name(&mut self) -> &str {
        let start = self.index;
        debug_assert!(matches!(self.peek_byte(0), Some(b) if b.is_ascii_alphabetic() || b == b'_'));

        loop {
            match self.peek_byte(0) {
                Some(b) if b.is_ascii_alphanumeric() || b == b'_' => self.index += 1,
                // a dot only belongs to the path when a segment follows
                Some(b'.') if matches!(
                    self.peek_byte(1),
                    Some(b) if b.is_ascii_alphanumeric() || b == b'_'
                ) => self.index += 1,
                _ => break,
            }
        }

        &self.source[start..self.index]
    }

    /// collect digits with an optional single `.`
    ///
    /// the caller must ensure that current char is an ascii digit
    fn number(&mut self) -> Result<Number> {
        let start = self.index;
        let mut float = false;

        loop {
            match self.peek_byte(0) {
                Some(b) if b.is_ascii_digit() => self.index += 1,
                Some(b'.') if !float => {
                    float = true;
                    self.index += 1;
                }
                _ => break,
            }
        }

        let lit = &self.source[start..self.index];
        let number = if float {
            // `1.` is a valid literal
            lit.trim_end_matches('.').parse().map(Number::Float).ok()
        } else {
            lit.parse().map(Number::Int).ok()
        };

        number.ok_or_else(|| ParseError::Generic(format!("invalid number literal `{lit}`")))
    }

    /// collect quoted string, the caller must ensure that current char is `quote`
    fn string(&mut self, quote: char) -> Result<String> {
        let start = self.index;
        self.bump(quote);

        let source = self.source;
        let mut value = String::new();
        let mut chars = source[self.index..].chars();

        loop {
            let Some(ch) = chars.next() else {
                return Err(ParseError::UnterminatedString(self.source[start..].to_owned()));
            };
            self.bump(ch);

            match ch {
                ch if ch == quote => break,
                '\\' => {
                    let Some(escaped) = chars.next() else {
                        return Err(ParseError::UnterminatedString(self.source[start..].to_owned()));
                    };
                    self.bump(escaped);
                    match escaped {
                        '\\' => value.push('\\'),
                        'n' => value.push('\n'),
                        't' => value.push('\t'),
                        '"' => value.push('"'),
                        '\'' => value.push('\''),
                        other => {
                            value.push('\\');
                            value.push(other);
                        }
                    }
                }
                ch => value.push(ch),
            }
        }

        Ok(value)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn name(s: &str) -> Argument {
        Argument::Name(s.into())
    }

    fn string(s: &str) -> Argument {
        Argument::String(s.into())
    }

    fn filter(name: &str, args: Vec<Argument>) -> Argument {
        Argument::Filter(FilterCall { name: name.into(), args })
    }

    #[test]
    fn for_loop() {
        assert_eq!(lex("item in seq").unwrap(), [name("item"), name("in"), name("seq")]);
    }

    #[test]
    fn filter_chain() {
        let args = lex(r#"user.username|lower|replace '\'', "\"""#).unwrap();
        assert_eq!(
            args,
            [
                name("user.username"),
                filter("lower", vec![]),
                filter("replace", vec![string("'"), string("\"")]),
            ]
        );
    }

    #[test]
    fn numbers() {
        let args = lex("1, 2.5, 3. items.0").unwrap();
        assert_eq!(
            args,
            [
                Argument::Number(Number::Int(1)),
                Argument::Number(Number::Float(2.5)),
                Argument::Number(Number::Float(3.0)),
                name("items.0"),
            ]
        );
    }

    #[test]
    fn escapes() {
        let args = lex(r#"'a\nb\tc\\d\qe'"#).unwrap();
        assert_eq!(args, [string("a\nb\tc\\d\\qe")]);
    }

    #[test]
    fn filter_args_resolve_names() {
        let args = lex("value|truncate limit, '..'|join").unwrap();
        assert_eq!(
            args,
            [
                name("value"),
                filter("truncate", vec![name("limit"), string("..")]),
                filter("join", vec![]),
            ]
        );
    }

    #[test]
    fn empty_filter_group() {
        assert_eq!(lex("a||upper").unwrap(), [name("a"), filter("upper", vec![])]);
        assert!(lex("").unwrap().is_empty());
    }

    #[test]
    fn unexpected() {
        let err = lex("a + b").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedChar { ch: '+', context: "block tag" }));
        assert_eq!(err.to_string(), "unexpected character '+' in block tag");

        let err = lex("a|upper; b").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedChar { ch: ';', context: "filter def" }));
    }

    #[test]
    fn unterminated() {
        assert!(matches!(lex("'abc").unwrap_err(), ParseError::UnterminatedString(_)));
        assert!(matches!(lex("a|'x'").unwrap_err(), ParseError::Generic(_)));
    }

    #[test]
    fn trailing_dot() {
        let err = lex("a.").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedChar { ch: '.', .. }));
    }
}
