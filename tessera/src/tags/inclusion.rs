use crate::{Context, Node, NodeTree, Parser, Result, Tag, Writer};

/// `{% include "name" %}`
///
/// The template is loaded while parsing and rendered within the current context.
#[derive(Debug)]
pub struct Include {
    tree: NodeTree,
}

pub(super) fn parse(parser: &mut Parser<'_>, arguments: &str) -> Result<Node> {
    let name = super::literal_name("include", parser.parse_arguments(arguments)?)?;
    let tree = parser.load_local(&name)?;
    Ok(Node::tag(Include { tree }))
}

impl Tag for Include {
    fn render(&self, cx: &mut Context<'_>, out: &mut dyn Writer) -> Result<()> {
        self.tree.render(cx, out)
    }
}
