use tessera::{Map, Object, Value, Writer, context};

#[derive(Debug, Object)]
#[template(methods(full_name))]
struct UserFixture {
    #[template(expose)]
    first_name: String,
    last_name: String,
}

impl UserFixture {
    fn new() -> Self {
        Self { first_name: "Ada".into(), last_name: "Lovelace".into() }
    }

    fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Not listed, must stay out of reach of templates.
    fn full_unsafe_name(&self) -> String {
        format!("{} {}!", self.first_name, self.last_name)
    }
}

#[derive(Debug, Object)]
struct Opaque {
    #[allow(dead_code)]
    secret: u32,
}

fn render(source: &str, namespace: Map) -> String {
    tessera::compile(source).unwrap().render(namespace).unwrap()
}

#[test]
fn derive_allow_list() {
    let user = || Value::from_object(UserFixture::new());

    assert_eq!(render("{{ user.first_name }}", context! { user => user() }), "Ada");
    assert_eq!(render("{{ user.full_name|upper }}", context! { user => user() }), "ADA LOVELACE");
    assert_eq!(render("[{{ user.last_name }}]", context! { user => user() }), "[]");
    assert_eq!(render("[{{ user.full_unsafe_name }}]", context! { user => user() }), "[]");
    assert_eq!(UserFixture::new().full_unsafe_name(), "Ada Lovelace!");

    let fixture = UserFixture::new();
    assert!(fixture.is_template_accessible("first_name"));
    assert!(fixture.is_template_accessible("full_name"));
    assert!(!fixture.is_template_accessible("last_name"));
    assert_eq!(fixture.get("first_name"), Some(Value::from("Ada")));
    assert_eq!(fixture.get("nope"), None);
}

#[test]
fn derive_nothing_exposed() {
    let opaque = Opaque { secret: 7 };
    assert!(!opaque.is_template_accessible("secret"));

    let namespace = context! { o => Value::from_object(opaque) };
    assert_eq!(render("[{{ o.secret }}]{% if o %}t{% endif %}", namespace), "[]t");
}

#[derive(Debug)]
struct Shelf {
    books: Vec<&'static str>,
    sized: bool,
}

impl Object for Shelf {
    fn is_template_accessible(&self, name: &str) -> bool {
        name == "label"
    }

    fn get(&self, name: &str) -> Option<Value> {
        match name {
            "label" => Some(Value::from("shelf")),
            _ => None,
        }
    }

    fn size(&self) -> Option<usize> {
        self.sized.then_some(self.books.len())
    }

    fn iter(&self) -> Option<Box<dyn Iterator<Item = Value> + '_>> {
        Some(Box::new(self.books.iter().map(|book| Value::from(*book))))
    }

    fn render(&self, f: &mut dyn Writer) -> tessera::Result<()> {
        f.write_str("<shelf>")
    }
}

#[test]
fn manual_object() {
    let shelf = |books: Vec<&'static str>, sized| Value::from_object(Shelf { books, sized });
    let source = "{{ s }} {{ s.label }}:{% for b in s %}{{ b }},{% else %}none{% endfor %} {{ s|length }}";

    assert_eq!(render(source, context! { s => shelf(vec!["a", "b"], true) }), "<shelf> shelf:a,b, 2");
    assert_eq!(render(source, context! { s => shelf(vec!["a", "b"], false) }), "<shelf> shelf:none 0");
    assert_eq!(render(source, context! { s => shelf(vec![], true) }), "<shelf> shelf:none 0");

    assert_eq!(render("{% if s %}t{% else %}f{% endif %}", context! { s => shelf(vec![], true) }), "f");
    assert_eq!(render("{% if s %}t{% else %}f{% endif %}", context! { s => shelf(vec![], false) }), "t");
}
