//! Tags mostly useful inside loops.
use tessera_core::Argument;

use crate::{
    Context, Display, Node, NodeId, NodeList, Parser, Result, Tag, Value, Writer, error::error,
};

/// `{% cycle 'odd', 'even' %}`
///
/// Each render emits the next item. The position is kept in the innermost regular frame of the
/// context, usually the enclosing `for`, so every loop starts over while a `block` inside a
/// loop keeps cycling.
#[derive(Debug)]
pub struct Cycle {
    id: NodeId,
    items: Vec<Argument>,
}

pub(super) fn parse_cycle(parser: &mut Parser<'_>, arguments: &str) -> Result<Node> {
    let items = parser.parse_arguments(arguments)?;

    if items.is_empty() {
        error!(Syntax, "at least one item is required for cycle");
    }
    if items.iter().any(Argument::is_filter) {
        error!(Syntax, "cycle does not accept filters '{arguments}'");
    }

    Ok(Node::tag(Cycle { id: NodeId::next(), items }))
}

impl Tag for Cycle {
    fn render(&self, cx: &mut Context<'_>, out: &mut dyn Writer) -> Result<()> {
        let previous = cx.get_node(self.id).and_then(Value::as_int).unwrap_or(-1);
        let len = i64::try_from(self.items.len()).unwrap_or(i64::MAX);
        let position = (previous + 1).rem_euclid(len);
        cx.set_node(self.id, Value::Int(position));

        let Some(item) = usize::try_from(position).ok().and_then(|i| self.items.get(i)) else {
            return Ok(());
        };
        cx.eval(item)?.display(&mut &mut *out)
    }
}

/// `{% ifchanged [value] %} .. {% endifchanged %}`
///
/// Without argument the rendered body is compared against the previous render, with an
/// argument the resolved value is compared instead.
#[derive(Debug)]
pub struct IfChanged {
    id: NodeId,
    argument: Option<Argument>,
    body: NodeList,
}

pub(super) fn parse_ifchanged(parser: &mut Parser<'_>, arguments: &str) -> Result<Node> {
    let mut args = parser.parse_arguments(arguments)?;

    if args.len() > 1 || args.iter().any(Argument::is_filter) {
        error!(Syntax, "ifchanged tag takes at most one argument");
    }

    let (body, _) = parser.parse_body("ifchanged", &["endifchanged"])?;

    Ok(Node::tag(IfChanged { id: NodeId::next(), argument: args.pop(), body }))
}

impl Tag for IfChanged {
    fn render(&self, cx: &mut Context<'_>, out: &mut dyn Writer) -> Result<()> {
        match &self.argument {
            None => {
                let rendered = Value::from(self.body.render_to_string(cx)?);
                if cx.get_node(self.id) != Some(&rendered) {
                    rendered.display(&mut &mut *out)?;
                    cx.set_node(self.id, rendered);
                }
            }
            Some(argument) => {
                let value = cx.eval(argument)?;
                // a first value of nil still renders
                if cx.get_node(self.id) != Some(&value) {
                    self.body.render(cx, out)?;
                    cx.set_node(self.id, value);
                }
            }
        }
        Ok(())
    }
}
