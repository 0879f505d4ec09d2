use std::path::Path;
use tessera::{
    CachedLoader, Config, Environment, Error, FileSystemLoader, Map, MemoryLoader, context,
};

fn env(templates: &[(&str, &str)]) -> Environment {
    let loader = templates
        .iter()
        .fold(MemoryLoader::new(), |loader, (name, source)| loader.with(*name, *source));
    Environment::new().with_loader(loader)
}

fn render(env: &Environment, name: &str, namespace: Map) -> String {
    env.get_template(name).unwrap().render(namespace).unwrap()
}

#[test]
fn block_super() {
    let env = env(&[
        ("base", "<title>{% block title %}Base{% endblock %}</title>"),
        ("child", r#"{% extends "base" %}{% block title %}Child, {{ block.super }}{% endblock %}"#),
        ("grand", r#"{% extends "child" %}{% block title %}Grand > {{ block.super }}{% endblock %}"#),
    ]);

    assert_eq!(render(&env, "base", Map::new()), "<title>Base</title>");
    assert_eq!(render(&env, "child", Map::new()), "<title>Child, Base</title>");
    assert_eq!(render(&env, "grand", Map::new()), "<title>Grand > Child, Base</title>");

    // loading the grandchild never mutates the cached parents
    assert_eq!(render(&env, "child", Map::new()), "<title>Child, Base</title>");
}

#[test]
fn block_record() {
    let env = env(&[
        ("base", "{% block title %}{{ block.name }}{{ block.depth }}[{{ block.super }}]{% endblock %}"),
        ("child", "{% extends 'base' %}{% block title %}{{ block.depth }}:{{ block.super }}{% endblock %}"),
    ]);

    // depth counts from the most derived layer
    assert_eq!(render(&env, "base", Map::new()), "title1[]");
    assert_eq!(render(&env, "child", Map::new()), "1:title2[]");
}

#[test]
fn untouched_and_unknown_blocks() {
    let env = env(&[
        ("base", "{% block a %}A{% endblock %}-{% block b %}B{% endblock %}"),
        ("child", "\n  {% extends 'base' %}ignored{% block b %}b{% endblock %}{% block c %}C{% endblock %}"),
    ]);

    assert_eq!(render(&env, "child", Map::new()), "\n  A-b");
}

#[test]
fn nested_blocks() {
    let env = env(&[
        ("base", "{% block content %}[{% block inner %}i{% endblock %}]{% endblock %}"),
        ("child", "{% extends 'base' %}{% block inner %}I{{ block.super }}{% endblock %}"),
        ("redefine", "{% extends 'base' %}{% block content %}<{% block inner %}c{% endblock %}>{% endblock %}"),
        ("grand", "{% extends 'redefine' %}{% block inner %}g{{ block.super }}{% endblock %}"),
    ]);

    assert_eq!(render(&env, "child", Map::new()), "[Ii]");
    assert_eq!(render(&env, "redefine", Map::new()), "<c>");
    assert_eq!(render(&env, "grand", Map::new()), "<gc>");
}

#[test]
fn blocks_see_context() {
    let env = env(&[
        ("base", "{% for x in items %}{% block item %}{{ x }}{% endblock %}{% endfor %}"),
        ("child", "{% extends 'base' %}{% block item %}({{ block.super }}){% endblock %}"),
    ]);

    assert_eq!(render(&env, "child", context! { items => vec![1, 2] }), "(1)(2)");
}

#[test]
fn extends_errors() {
    let env = env(&[
        ("base", "{% block a %}{% endblock %}"),
        ("late", "text {% extends 'base' %}"),
        ("twice", "{% extends 'base' %}{% extends 'base' %}"),
        ("variable", "{% extends base %}"),
        ("missing", "{% extends 'nope' %}"),
        ("itself", "{% extends 'itself' %}"),
        ("spaced", "  {% block a %}{% endblock %}{% extends 'base' %}"),
    ]);

    for name in ["late", "twice", "variable", "itself", "spaced"] {
        let result = env.get_template(name);
        assert!(matches!(result, Err(Error::Syntax(_))), "{name}: {result:?}");
    }

    assert!(env.get_template("missing").unwrap_err().is_not_found());

    let result = tessera::compile("{% extends 'base' %}");
    assert!(matches!(result, Err(Error::Runtime(_))));
}

#[test]
fn include() {
    let env = env(&[
        ("pages/index", "{% for x in items %}{% include 'item' %}{% endfor %}"),
        ("pages/item", "<{{ x }}{{ loop.index }}>"),
        ("broken", "{% include 'missing' %}"),
        ("literal", "{% include name %}"),
    ]);

    assert_eq!(render(&env, "pages/index", context! { items => vec!["a", "b"] }), "<a1><b2>");
    assert!(env.get_template("broken").unwrap_err().is_not_found());
    assert!(matches!(env.get_template("literal"), Err(Error::Syntax(_))));

    let template = env.compile_named("{% include 'item' %}", "pages/other").unwrap();
    assert_eq!(template.render(context! { x => "z" }).unwrap(), "<z>");
}

#[test]
fn filesystem() {
    let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/templates");
    let loader = FileSystemLoader::new(Config::new(root).with_suffix(".html"));
    let env = Environment::new().with_loader(loader);

    let title = "Your title has been overwritten";
    let page = env.get_template("index").unwrap();
    assert_eq!(page.name(), Some("index.html"));

    let output = page.render(context! { real_title => title, links => vec!["a", "b"] }).unwrap();
    assert_eq!(
        output,
        "<html><head><title>Your title has been overwritten</title></head>\n\
        <body><nav><a>a</a><a>b</a></nav><p>body of depth 1</p></body></html>\n"
    );

    assert!(env.get_template("invalidfile.nox").unwrap_err().is_not_found());
}

#[test]
fn filesystem_cache() {
    let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/templates");
    let loader = CachedLoader::new(FileSystemLoader::new(Config::new(root).with_suffix(".html")));
    let env = Environment::new().with_loader(loader);

    let short = env.get_template("index").unwrap();
    let full = env.get_template("./index.html").unwrap();
    assert!(std::ptr::eq(short.tree(), full.tree()));

    let err = env.get_template("missing").unwrap_err();
    assert!(matches!(&err, Error::TemplateNotFound(name) if name == "missing.html"), "{err}");
}
