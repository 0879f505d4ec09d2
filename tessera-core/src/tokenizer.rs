//! collection of tokenizer
//!
//! `Hello {{ name }}{% if x %}` = `[Text("Hello "), Variable("name"), Block("if x")]`
use crate::Delimiter;

/// a tokenizer where the source ownership is hold by the caller
pub struct Tokenizer<'a> {
    source: &'a str,
    index: usize,
    state: TokenizeState,
    /// tag found right after a static content, emitted on the next call
    pending: Option<Token<'a>>,
}

impl<'a> Tokenizer<'a> {
    /// create new [`Tokenizer`]
    pub fn new(source: &'a str) -> Tokenizer<'a> {
        Tokenizer {
            source,
            index: 0,
            state: TokenizeState::Static { start: 0 },
            pending: None,
        }
    }

    /// try to collect a whole tag starting at `brace`, returns the tag token and the index
    /// right after its closing delimiter
    ///
    /// an opening delimiter without its closing counterpart is not a tag
    fn tag(&self, brace: usize) -> Option<(Token<'a>, usize)> {
        let bytes = self.source.as_bytes();
        let delim = Delimiter::match_open(*bytes.get(brace + 1)?)?;
        let inner_start = brace + 2;
        let inner_len = self.source[inner_start..].find(delim.close())?;
        let inner = self.source[inner_start..inner_start + inner_len].trim();
        let end = inner_start + inner_len + delim.close().len();

        let token = match delim {
            Delimiter::Block => Token::Block(inner),
            Delimiter::Variable => Token::Variable(inner),
            Delimiter::Comment => Token::Comment(inner),
        };

        Some((token, end))
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(pending) = self.pending.take() {
            return Some(pending);
        }

        loop {
            match self.state {
                TokenizeState::Static { start } => {
                    let current = self.index;
                    let Some(byte) = self.source.as_bytes().get(current) else {
                        self.state = TokenizeState::Eof;
                        if start == current {
                            return None;
                        }
                        return Some(Token::Text(&self.source[start..]));
                    };

                    if *byte != b'{' {
                        self.index += 1;
                        continue;
                    }

                    let Some((tag, end)) = self.tag(current) else {
                        self.index += 1;
                        continue;
                    };

                    self.index = end;
                    self.state = TokenizeState::Static { start: end };

                    // empty static is not emitted
                    if start == current {
                        return Some(tag);
                    }

                    self.pending = Some(tag);
                    return Some(Token::Text(&self.source[start..current]));
                }
                TokenizeState::Eof => return None,
            }
        }
    }
}

#[derive(Debug)]
enum TokenizeState {
    Static { start: usize },
    Eof,
}

/// A single unit of template source.
///
/// Tag variants hold the inner text, trimmed of surrounding whitespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    Text(&'a str),
    Block(&'a str),
    Variable(&'a str),
    Comment(&'a str),
}

/// Closed, ordered token stream with push back support.
///
/// Tokens that are pushed back are consumed before any buffered one, last pushed first.
#[derive(Debug)]
pub struct TokenStream<'a> {
    /// buffered tokens in reverse order
    stream: Vec<Token<'a>>,
    pushed: Vec<Token<'a>>,
}

impl<'a> TokenStream<'a> {
    /// Tokenize the whole source into a closed stream.
    pub fn new(source: &'a str) -> Self {
        let mut stream = Tokenizer::new(source).collect::<Vec<_>>();
        tracing::trace!(tokens = stream.len(), "tokenized template source");
        stream.reverse();
        Self { stream, pushed: vec![] }
    }

    /// Returns `true` if there is no token left to consume.
    pub fn is_eos(&self) -> bool {
        self.stream.is_empty() && self.pushed.is_empty()
    }

    /// Re-inject a token so that it is consumed again by the next call to [`next`].
    ///
    /// [`next`]: Iterator::next
    pub fn push_back(&mut self, token: Token<'a>) {
        self.pushed.push(token);
    }
}

impl<'a> Iterator for TokenStream<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.pushed.pop() {
            Some(token) => Some(token),
            None => self.stream.pop(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::{Token, TokenStream, Tokenizer};

    #[test]
    fn basic() {
        let src = "Hello {{ name }}, {% if x %}yes{% endif %} { ignored }";
        let mut tokenizer = Tokenizer::new(src);
        assert_eq!(tokenizer.next(),Some(Token::Text("Hello ")));
        assert_eq!(tokenizer.next(),Some(Token::Variable("name")));
        assert_eq!(tokenizer.next(),Some(Token::Text(", ")));
        assert_eq!(tokenizer.next(),Some(Token::Block("if x")));
        assert_eq!(tokenizer.next(),Some(Token::Text("yes")));
        assert_eq!(tokenizer.next(),Some(Token::Block("endif")));
        assert_eq!(tokenizer.next(),Some(Token::Text(" { ignored }")));
        assert_eq!(tokenizer.next(),None);
    }

    #[test]
    fn empty_static() {
        let src = "{{ a }}{# note #}{{ b }}";
        let mut tokenizer = Tokenizer::new(src);
        assert_eq!(tokenizer.next(),Some(Token::Variable("a")));
        assert_eq!(tokenizer.next(),Some(Token::Comment("note")));
        assert_eq!(tokenizer.next(),Some(Token::Variable("b")));
        assert_eq!(tokenizer.next(),None);
    }

    #[test]
    fn non_greedy() {
        let src = "{{ a }} and {{ b }}";
        let tokens = Tokenizer::new(src).collect::<Vec<_>>();
        assert_eq!(tokens, [Token::Variable("a"), Token::Text(" and "), Token::Variable("b")]);
    }

    #[test]
    fn unclosed_is_text() {
        let src = "a {{ b %} c";
        let tokens = Tokenizer::new(src).collect::<Vec<_>>();
        assert_eq!(tokens, [Token::Text("a {{ b %} c")]);

        let src = "a {{ b {% x %}";
        let tokens = Tokenizer::new(src).collect::<Vec<_>>();
        assert_eq!(tokens, [Token::Text("a {{ b "), Token::Block("x")]);
    }

    #[test]
    fn multibyte() {
        let src = "héllo {{ wörld }} ✓";
        let tokens = Tokenizer::new(src).collect::<Vec<_>>();
        assert_eq!(tokens, [Token::Text("héllo "), Token::Variable("wörld"), Token::Text(" ✓")]);
    }

    #[test]
    fn push_back() {
        let mut stream = TokenStream::new("a{% b %}c");
        assert_eq!(stream.next(),Some(Token::Text("a")));
        let b = stream.next().unwrap();
        assert_eq!(b,Token::Block("b"));
        stream.push_back(Token::Text("z"));
        stream.push_back(b);
        assert_eq!(stream.next(),Some(Token::Block("b")));
        assert_eq!(stream.next(),Some(Token::Text("z")));
        assert_eq!(stream.next(),Some(Token::Text("c")));
        assert!(stream.is_eos());
        assert_eq!(stream.next(),None);
    }
}
