use dom::{Document, Node, outline};
use log::info;
use mimalloc::MiMalloc;
use std::error::Error;
use wrapper::{Handle, Props, Wrapper};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

const OUTLINE_CAP: usize = 200;

fn form_group(factory: &Wrapper, input: Props) -> Result<Handle, Box<dyn Error>> {
    let group = factory.wrap_with("div", &Props::new().with("className", "form-group"))?;
    let field = factory.wrap_with("input", &input)?;
    Ok(group.append_wrapped([field])?)
}

fn form_example(factory: &Wrapper) -> Result<Node, Box<dyn Error>> {
    let form = factory.wrap_with(
        "form",
        &Props::new()
            .with("id", "my-form")
            .with("action", "https://example.local")
            .with("method", "POST")
            .with("className", "form"),
    )?;
    let input = |kind: &str, id: &str, class: &str| {
        Props::new()
            .with("type", kind)
            .with("id", id)
            .with("name", id)
            .with("className", class)
    };
    let groups = [
        form_group(factory, input("text", "username", "form-control"))?,
        form_group(factory, input("password", "password", "form-control"))?,
        form_group(
            factory,
            input("submit", "submit", "btn btn-secondary").with("value", "Click me"),
        )?,
    ];
    Ok(form.append_wrapped(groups)?.unwrap()?)
}

fn list_example(factory: &Wrapper) -> Result<Node, Box<dyn Error>> {
    let items = ["Cat", "Dog", "Wolf"]
        .into_iter()
        .map(|name| factory.wrap("li")?.append_text(name))
        .collect::<Result<Vec<_>, _>>()?;
    let heading = factory
        .wrap("div")?
        .append_wrapped([factory.wrap("h2")?.append_text("Animals")?])?;
    let list = factory.wrap("ul")?.append_wrapped(items)?;
    let element = factory
        .wrap("div")?
        .set_attribute("id", "element-id")?
        .append_wrapped([heading, list])?
        .unwrap()?;
    Ok(element)
}

fn print_example(title: &str, node: &Node) {
    println!("== {title} ==");
    for line in outline(node, OUTLINE_CAP) {
        println!("{line}");
    }
    println!("{}", node.outer_html());
    println!();
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let doc = Document::new();
    let factory = Wrapper::new(&doc);

    let form = form_example(&factory)?;
    print_example("form", &form);

    let list = list_example(&factory)?;
    print_example("list", &list);

    info!("built {} nodes", doc.node_count());
    Ok(())
}
