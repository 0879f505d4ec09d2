use std::io::{stdin, BufRead};
use tessera::{CachedLoader, Config, Environment, FileSystemLoader, Object, Value, context};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Object)]
#[template(methods(full_name))]
struct User {
    #[template(expose)]
    first_name: String,
    last_name: String,
    #[template(expose)]
    notes: Vec<String>,
}

impl User {
    fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let loader = std::sync::Arc::new(CachedLoader::new(FileSystemLoader::new(
        Config::new("example/templates"),
    )));
    let env = Environment::new().with_loader(loader.clone());

    loop {
        let user = User {
            first_name: "<script>alert('foo')</script>".into(),
            last_name: "Doe".into(),
            notes: vec!["write the readme".into(), "a very long note that will be truncated".into()],
        };
        let links = vec![
            Value::from(context! { title => "Home", href => "/" }),
            Value::from(context! { title => "About us", href => "/about us" }),
        ];

        let result = env
            .get_template("index.html")
            .and_then(|page| page.render(context! { user => Value::from_object(user), links => links }));

        match result {
            Ok(page) => println!("{page}"),
            Err(err) => eprintln!("{err}"),
        }
        println!("[Press ENTER to re render]");

        let mut buf = String::new();
        { stdin().lock().read_line(&mut buf).unwrap(); }

        if buf == "q\n" {
            break
        }

        loader.clear();
    }
}
