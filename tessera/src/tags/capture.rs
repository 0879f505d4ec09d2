use crate::{Context, Node, NodeList, Parser, Result, Tag, Writer, error::error};

/// `{% capture as name %} .. {% endcapture %}`
///
/// Binds the rendered body in the innermost frame, nothing is written.
#[derive(Debug)]
pub struct Capture {
    name: String,
    body: NodeList,
}

pub(super) fn parse(parser: &mut Parser<'_>, arguments: &str) -> Result<Node> {
    let mut words = arguments.split_whitespace();

    let name = match (words.next(), words.next(), words.next()) {
        (Some("as"), Some(name), None) if super::is_ident(name) => name.to_owned(),
        _ => error!(Syntax, "syntax for capture tag: {{% capture as <variable> %}}"),
    };

    let (body, _) = parser.parse_body("capture", &["endcapture"])?;

    Ok(Node::tag(Capture { name, body }))
}

impl Tag for Capture {
    fn render(&self, cx: &mut Context<'_>, _: &mut dyn Writer) -> Result<()> {
        let captured = self.body.render_to_string(cx)?;
        cx.set(self.name.as_str(), captured);
        Ok(())
    }
}
