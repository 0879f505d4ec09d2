
/// A tag delimiter.
//
// Delimiters are fixed, the second byte of the opening delimiter decides the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    /// `{% %}` block tag.
    Block,
    /// `{{ }}` variable.
    Variable,
    /// `{# #}` comment.
    Comment,
}

impl Delimiter {
    /// Every delimiter, in matching precedence order.
    pub const ALL: [Delimiter; 3] = [Self::Block, Self::Variable, Self::Comment];

    /// Returns [`Some`] if given byte, following a `{`, opens a tag.
    pub fn match_open(ch: u8) -> Option<Self> {
        match ch {
            b'%' => Some(Self::Block),
            b'{' => Some(Self::Variable),
            b'#' => Some(Self::Comment),
            _ => None,
        }
    }

    /// Opening delimiter string.
    pub fn open(&self) -> &'static str {
        match self {
            Self::Block => "{%",
            Self::Variable => "{{",
            Self::Comment => "{#",
        }
    }

    /// Closing delimiter string.
    pub fn close(&self) -> &'static str {
        match self {
            Self::Block => "%}",
            Self::Variable => "}}",
            Self::Comment => "#}",
        }
    }
}

impl std::fmt::Display for Delimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Block => f.write_str("block"),
            Self::Variable => f.write_str("variable"),
            Self::Comment => f.write_str("comment"),
        }
    }
}
