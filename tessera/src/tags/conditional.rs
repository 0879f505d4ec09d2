use tessera_core::Argument;

use crate::{Context, Node, NodeList, Parser, Result, Tag, Writer, error::error};

/// `{% if [not] value %} .. [{% else %} ..] {% endif %}`
#[derive(Debug)]
pub struct If {
    negated: bool,
    condition: Argument,
    body: NodeList,
    else_body: Option<NodeList>,
}

pub(super) fn parse(parser: &mut Parser<'_>, arguments: &str) -> Result<Node> {
    let mut args = parser.parse_arguments(arguments)?;

    let negated = match args.as_slice() {
        [condition] if !condition.is_filter() => false,
        [not, condition] if not.as_name() == Some("not") && !condition.is_filter() => true,
        _ => error!(Syntax, "invalid syntax for if tag '{arguments}'"),
    };

    let (body, end) = parser.parse_body("if", &["else", "endif"])?;
    let else_body = match end {
        "else" => Some(parser.parse_body("if", &["endif"])?.0),
        _ => None,
    };

    Ok(Node::tag(If {
        negated,
        condition: args.remove(args.len() - 1),
        body,
        else_body,
    }))
}

impl Tag for If {
    fn render(&self, cx: &mut Context<'_>, out: &mut dyn Writer) -> Result<()> {
        let value = cx.eval(&self.condition)?;

        if value.is_true() != self.negated {
            self.body.render(cx, out)
        } else if let Some(else_body) = &self.else_body {
            else_body.render(cx, out)
        } else {
            Ok(())
        }
    }
}
