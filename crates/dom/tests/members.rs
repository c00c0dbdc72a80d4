use dom::{Document, DomError, Function, Value};
use std::cell::Cell;
use std::rc::Rc;

#[test]
fn reflected_properties_write_through_to_attributes() {
    let doc = Document::new();
    let div = doc.create_element("div").unwrap();
    div.set_member("className", Value::from("card wide")).unwrap();
    div.set_member("id", Value::from("main")).unwrap();
    div.set_member("hidden", Value::from(true)).unwrap();
    assert_eq!(div.get_attribute("class").as_deref(), Some("card wide"));
    assert_eq!(div.get_member("id"), Some(Value::from("main")));
    assert_eq!(
        div.get_member("classList"),
        Some(Value::List(vec![Value::from("card"), Value::from("wide")]))
    );
    assert!(div.has_attribute("hidden"));
    div.set_member("hidden", Value::from(false)).unwrap();
    assert!(!div.has_attribute("hidden"));
    assert!(div.own_keys().is_empty());
}

#[test]
fn unknown_names_become_own_keys() {
    let doc = Document::new();
    let div = doc.create_element("div").unwrap();
    div.set_member("answer", Value::from(42)).unwrap();
    assert_eq!(div.own_keys(), vec!["answer"]);
    assert!(div.has_member("answer"));
    assert_eq!(div.get_member("answer"), Some(Value::from(42)));
    assert!(!div.has_member("nope"));
    assert_eq!(div.get_member("nope"), None);
}

#[test]
fn native_methods_read_back_as_functions() {
    let doc = Document::new();
    let div = doc.create_element("div").unwrap();
    let member = div.get_member("appendChild").unwrap();
    let f = member.as_function().unwrap();
    assert_eq!(f.native_name(), Some("appendChild"));
    let child = doc.create_element("p").unwrap();
    assert_eq!(f.call(&div, &[Value::from(&child)]), Ok(Value::from(&child)));
    assert_eq!(div.first_child(), Some(child));
}

#[test]
fn host_functions_receive_the_node() {
    let doc = Document::new();
    let div = doc.create_element("div").unwrap();
    let calls = Rc::new(Cell::new(0));
    let seen = Rc::clone(&calls);
    div.set_own(
        "appendGreeting",
        Value::from(Function::new(move |node, args| {
            seen.set(seen.get() + 1);
            let text = args.first().map(Value::coerce_to_string).unwrap_or_default();
            let leaf = node.document().create_text_node(&text);
            node.append_child(&leaf).map(Value::Node)
        })),
    );
    div.invoke("appendGreeting", &[Value::from("hi")]).unwrap();
    assert_eq!(calls.get(), 1);
    assert_eq!(div.text_content(), "hi");
}

#[test]
fn native_append_and_prepend_accept_mixed_values() {
    let doc = Document::new();
    let ul = doc.create_element("ul").unwrap();
    let li = doc.create_element("li").unwrap();
    ul.invoke("append", &[Value::from(&li), Value::from("tail")]).unwrap();
    ul.invoke("prepend", &[Value::from("a"), Value::from(7)]).unwrap();
    assert_eq!(ul.inner_html(), "a7<li></li>tail");
}

#[test]
fn attribute_methods_round_trip_through_invoke() {
    let doc = Document::new();
    let input = doc.create_element("input").unwrap();
    input.invoke("setAttribute", &[Value::from("aria-label"), Value::from("Name")]).unwrap();
    assert_eq!(
        input.invoke("getAttribute", &[Value::from("ARIA-LABEL")]),
        Ok(Value::from("Name"))
    );
    assert_eq!(input.invoke("getAttribute", &[Value::from("title")]), Ok(Value::Null));
    assert_eq!(
        input.invoke("toggleAttribute", &[Value::from("required")]),
        Ok(Value::Bool(true))
    );
    assert_eq!(
        input.invoke("getAttributeNames", &[]),
        Ok(Value::List(vec![Value::from("aria-label"), Value::from("required")]))
    );
    assert_eq!(
        input.invoke("setAttribute", &[Value::from("bad name"), Value::from("x")]),
        Err(DomError::InvalidCharacter("bad name".to_string()))
    );
}

#[test]
fn properties_are_not_callable() {
    let doc = Document::new();
    let div = doc.create_element("div").unwrap();
    assert_eq!(
        div.invoke("tagName", &[]),
        Err(DomError::NotCallable("tagName".to_string()))
    );
    assert_eq!(div.get_member("tagName"), Some(Value::from("DIV")));
}

#[test]
fn dataset_collects_data_attributes() {
    let doc = Document::new();
    let div = doc.create_element("div").unwrap();
    div.set_attribute("data-user-id", "7").unwrap();
    div.set_attribute("title", "x").unwrap();
    assert_eq!(
        div.get_member("dataset"),
        Some(Value::Record(vec![("userId".to_string(), Value::from("7"))]))
    );
}
