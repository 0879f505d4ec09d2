use tessera_core::{Argument, FilterCall};

use crate::{Context, Display, Node, NodeList, Parser, Result, Tag, Value, Writer, error::error};

/// `{% filter upper|truncate 10 %} .. {% endfilter %}`
#[derive(Debug)]
pub struct FilterBlock {
    filters: Vec<FilterCall>,
    body: NodeList,
}

pub(super) fn parse(parser: &mut Parser<'_>, arguments: &str) -> Result<Node> {
    let mut filters = vec![];

    for argument in parser.parse_arguments(&format!("|{arguments}"))? {
        match argument {
            Argument::Filter(filter) => filters.push(filter),
            _ => error!(Syntax, "invalid syntax for filter tag '{arguments}'"),
        }
    }

    if filters.is_empty() {
        error!(Syntax, "filter tag requires at least one filter");
    }

    let (body, _) = parser.parse_body("filter", &["endfilter"])?;

    Ok(Node::tag(FilterBlock { filters, body }))
}

impl Tag for FilterBlock {
    fn render(&self, cx: &mut Context<'_>, out: &mut dyn Writer) -> Result<()> {
        let rendered = Value::from(self.body.render_to_string(cx)?);
        cx.apply_filters(rendered, &self.filters)?.display(&mut &mut *out)
    }
}
