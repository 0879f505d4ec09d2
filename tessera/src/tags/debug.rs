use crate::{Context, Node, Parser, Result, Tag, Writer, error::error};

/// `{% debug %}`, dump the whole context.
#[derive(Debug)]
pub struct DebugTag;

pub(super) fn parse(_: &mut Parser<'_>, arguments: &str) -> Result<Node> {
    if !arguments.is_empty() {
        error!(Syntax, "debug tag takes no arguments");
    }
    Ok(Node::tag(DebugTag))
}

impl Tag for DebugTag {
    fn render(&self, cx: &mut Context<'_>, out: &mut dyn Writer) -> Result<()> {
        out.write_str(format!("{cx:#?}").trim())
    }
}
