use tessera_core::Argument;

use crate::{Context, Map, Node, NodeList, Parser, Result, Tag, Value, Writer, error::error};

/// `{% for item in path %} .. [{% else %} ..] {% endfor %}`
///
/// Only values that are both iterable and sized are looped over, anything else, including
/// a typo in the path, silently renders the `else` body.
#[derive(Debug)]
pub struct ForLoop {
    item: String,
    iterable: String,
    body: NodeList,
    else_body: Option<NodeList>,
}

pub(super) fn parse(parser: &mut Parser<'_>, arguments: &str) -> Result<Node> {
    let args = parser.parse_arguments(arguments)?;

    let (item, iterable) = match args.as_slice() {
        [Argument::Name(item), Argument::Name(keyword), Argument::Name(iterable)]
            if keyword == "in" && super::is_ident(item) =>
        {
            (item.clone(), iterable.clone())
        }
        _ => error!(Syntax, "invalid syntax for for-loop tag '{arguments}'"),
    };

    let (body, end) = parser.parse_body("for", &["else", "endfor"])?;
    let else_body = match end {
        "else" => Some(parser.parse_body("for", &["endfor"])?.0),
        _ => None,
    };

    Ok(Node::tag(ForLoop { item, iterable, body, else_body }))
}

impl ForLoop {
    fn render_items(
        &self,
        cx: &mut Context<'_>,
        out: &mut dyn Writer,
        items: Vec<Value>,
        parent: Value,
    ) -> Result<()> {
        let length = items.len();

        for (index, item) in items.into_iter().enumerate() {
            let mut record = Map::new();
            record.insert("parent".into(), parent.clone());
            record.insert("index".into(), (index + 1).into());
            record.insert("index0".into(), index.into());
            record.insert("revindex".into(), (length - index).into());
            record.insert("revindex0".into(), (length - index - 1).into());
            record.insert("first".into(), (index == 0).into());
            record.insert("last".into(), (index + 1 == length).into());
            record.insert("length".into(), length.into());
            record.insert("even".into(), (index % 2 != 0).into());
            record.insert("odd".into(), (index % 2 == 0).into());

            cx.set(self.item.as_str(), item);
            cx.set("loop", record);
            self.body.render(cx, out)?;
        }

        Ok(())
    }
}

impl Tag for ForLoop {
    fn render(&self, cx: &mut Context<'_>, out: &mut dyn Writer) -> Result<()> {
        let iterable = cx.resolve(&self.iterable)?;

        let items = match iterable.sized_items() {
            Some(items) if !items.is_empty() => items,
            _ => {
                return match &self.else_body {
                    Some(else_body) => else_body.render(cx, out),
                    None => Ok(()),
                };
            }
        };

        let parent = cx.get("loop").cloned().unwrap_or_default();

        cx.push(None);
        let result = self.render_items(cx, out, items, parent);
        cx.pop();
        result
    }
}
