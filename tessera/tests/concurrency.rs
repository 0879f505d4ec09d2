use std::thread;
use tessera::{Environment, MemoryLoader, Template, Value, context};

const SOURCE: &str = "\
{% for row in rows %}\
{% ifchanged row.group %}<h{{ loop.index }}>{{ row.group }}</h>{% endifchanged %}\
{% capture as line %}{{ row.name|capitalize }}{% endcapture %}\
<li class=\"{% cycle 'odd', 'even' %}\">{{ line }}</li>\
{% endfor %}";

fn rows(seed: usize) -> Value {
    (0..20)
        .map(|i| {
            Value::from(context! {
                group => (i + seed) / 4,
                name => format!("item {i}"),
            })
        })
        .collect()
}

#[test]
fn shared_template() {
    let template = tessera::compile(SOURCE).unwrap();
    let expected = (0..8)
        .map(|seed| template.render(context! { rows => rows(seed) }).unwrap())
        .collect::<Vec<_>>();

    thread::scope(|scope| {
        let handles = (0..8)
            .map(|seed| {
                let template: &Template = &template;
                scope.spawn(move || {
                    (0..25)
                        .map(|_| template.render(context! { rows => rows(seed) }).unwrap())
                        .collect::<Vec<_>>()
                })
            })
            .collect::<Vec<_>>();

        for (seed, handle) in handles.into_iter().enumerate() {
            for output in handle.join().unwrap() {
                assert_eq!(output, expected[seed]);
            }
        }
    });
}

#[test]
fn shared_inheritance() {
    let loader = MemoryLoader::new()
        .with("base", "{% block a %}A{% endblock %}{% for x in xs %}{% block b %}{{ x }}{% endblock %}{% cycle 1, 2 %}{% endfor %}")
        .with("child", "{% extends 'base' %}{% block b %}({{ block.super }}){% endblock %}");
    let env = Environment::new().with_loader(loader);
    let template = env.get_template("child").unwrap();

    let expected = "A(a)1(b)2(c)1";
    thread::scope(|scope| {
        for _ in 0..8 {
            scope.spawn(|| {
                for _ in 0..25 {
                    let output = template.render(context! { xs => vec!["a", "b", "c"] }).unwrap();
                    assert_eq!(output, expected);
                }
            });
        }
    });
}
