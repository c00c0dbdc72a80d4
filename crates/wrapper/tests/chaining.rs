use dom::{Document, Value};
use dom_test_support::assert_dom_snapshot;
use wrapper::{Access, CompositeOp, Props, Reply, Wrapper, wrap};

#[test]
fn insertion_order_matches_call_order() {
    let doc = Document::new();
    let div = wrap(&doc, "div")
        .unwrap()
        .append([wrap(&doc, "h1").unwrap().append(["a"]).unwrap()])
        .unwrap()
        .append([wrap(&doc, "h2").unwrap().append(["b"]).unwrap()])
        .unwrap()
        .unwrap()
        .unwrap();
    assert_eq!(div.outer_html(), "<div><h1>a</h1><h2>b</h2></div>");
    assert_dom_snapshot(&div, &["<div>", "  <h1>", "    \"a\"", "  <h2>", "    \"b\""]);
    for child in div.child_nodes() {
        assert!(child.own_keys().is_empty(), "{child:?} kept helper keys");
    }
}

#[test]
fn getters_are_transparent_and_setters_chain() {
    let doc = Document::new();
    let handle = wrap(&doc, "div").unwrap();
    assert_eq!(handle.get_attribute("id").unwrap(), None);

    let same = handle.set_attribute("id", "x").unwrap();
    assert!(same.ptr_eq(&handle));
    assert_eq!(handle.get_attribute("id").unwrap(), Some("x".to_string()));
    assert!(handle.has_attribute("id").unwrap());

    match handle.call("getAttribute", &[Value::from("id")]).unwrap() {
        Reply::Value(value) => assert_eq!(value, Value::from("x")),
        Reply::Chain(_) => panic!("getAttribute should be transparent"),
    }
    let reply = handle
        .call("setAttribute", &[Value::from("title"), Value::from("t")])
        .unwrap();
    assert!(reply.into_handle().is_some_and(|h| h.ptr_eq(&handle)));
    let missing = handle
        .call("getAttribute", &[Value::from("missing")])
        .unwrap();
    assert_eq!(missing.into_value(), Some(Value::Null));
}

#[test]
fn mixed_append_unwraps_handles_and_keeps_nodes() {
    let doc = Document::new();
    let native = doc.create_element("li").unwrap();
    native.set_attribute("class", "native").unwrap();
    let li = wrap(&doc, "li").unwrap();
    let ul = wrap(&doc, "ul")
        .unwrap()
        .append([li.clone().into(), "raw text".into(), wrapper::Child::from(&native)])
        .unwrap();
    assert!(li.is_revoked());

    let node = ul.unwrap().unwrap();
    let children = node.child_nodes();
    assert_eq!(children.len(), 3);
    assert_eq!(children[0].local_name().as_deref(), Some("li"));
    assert!(children[0].own_keys().is_empty());
    assert_eq!(children[1].node_value().as_deref(), Some("raw text"));
    assert_eq!(children[2], native);
}

#[test]
fn prepend_puts_the_last_argument_first() {
    let doc = Document::new();
    let div = wrap(&doc, "div")
        .unwrap()
        .append_text("end")
        .unwrap()
        .prepend(["b", "a"])
        .unwrap();
    assert_eq!(div.inner_html().unwrap(), "abend");
}

#[test]
fn composite_members_are_reported_as_composites() {
    let doc = Document::new();
    let handle = wrap(&doc, "div").unwrap();
    match handle.get("append").unwrap() {
        Access::Composite(composite) => assert_eq!(composite.op(), CompositeOp::Append),
        other => panic!("expected a composite, got {other:?}"),
    }
    match handle.get("prepend").unwrap() {
        Access::Composite(composite) => {
            let back = composite.call([wrap(&doc, "b").unwrap()]).unwrap();
            assert!(back.ptr_eq(&handle));
        }
        other => panic!("expected a composite, got {other:?}"),
    }
    let reply = handle
        .call("append", &[Value::from("x"), Value::from(3)])
        .unwrap();
    assert!(reply.into_handle().is_some());
    assert_eq!(handle.inner_html().unwrap(), "<b></b>x3");
}

#[test]
fn helpers_build_a_tree_fluently() {
    let doc = Document::new();
    let cat = wrap(&doc, "li").unwrap().append_text("Cat").unwrap();
    let list = Wrapper::new(&doc)
        .wrap_with("ul", &Props::new().with("class", "animals"))
        .unwrap()
        .append_node("li", &Props::new().with("textContent", "Dog"))
        .unwrap()
        .prepend_wrapped([cat])
        .unwrap()
        .append_wrapped([doc.create_element("li").unwrap()])
        .unwrap()
        .prepend_text("Animals:")
        .unwrap()
        .prepend_node("h3", &Props::new())
        .unwrap()
        .unwrap()
        .unwrap();
    assert_dom_snapshot(
        &list,
        &[
            "<ul class=\"animals\">",
            "  <h3>",
            "  \"Animals:\"",
            "  <li>",
            "    \"Cat\"",
            "  <li>",
            "    \"Dog\"",
            "  <li>",
        ],
    );
}

#[test]
fn whitelisted_methods_return_real_results() {
    let doc = Document::new();
    let handle = Wrapper::new(&doc)
        .wrap_with("section", &Props::new().with("id", "outer"))
        .unwrap()
        .append_node("p", &Props::new().with("class", "lead"))
        .unwrap()
        .append_node("p", &Props::new())
        .unwrap();
    let lead = handle.query_selector("p.lead").unwrap().expect("lead paragraph");
    assert_eq!(lead.class_name(), "lead");
    assert_eq!(handle.query_selector_all("p").unwrap().len(), 2);
    assert!(handle.query_selector("table").unwrap().is_none());
    assert!(handle.matches("section#outer").unwrap());
    assert!(handle.contains(&lead).unwrap());

    let copy = handle.clone_node(true).unwrap();
    assert_eq!(copy.child_count(), 2);
    assert!(copy.own_keys().is_empty());

    let closest = handle.call("closest", &[Value::from("section")]).unwrap();
    assert_eq!(closest.into_value(), Some(Value::Node(handle.node().unwrap())));

    let equal = handle.call("isEqualNode", &[Value::from(&copy)]).unwrap();
    assert_eq!(equal.into_value(), Some(Value::Bool(true)));
}

#[test]
fn commands_chain_and_property_reads_pass_through() {
    let doc = Document::new();
    let handle = wrap(&doc, "div").unwrap();
    let reply = handle
        .call("toggleAttribute", &[Value::from("hidden")])
        .unwrap();
    assert!(matches!(reply, Reply::Chain(_)));
    assert_eq!(handle.property("hidden").unwrap(), Value::Bool(true));
    assert_eq!(handle.property("childElementCount").unwrap(), Value::Number(0.0));
    assert!(matches!(handle.get("tagName").unwrap(), Access::Value(_)));
    match handle.get("removeAttribute").unwrap() {
        Access::Method(method) => {
            assert_eq!(method.name(), "removeAttribute");
            assert!(!method.is_transparent());
        }
        other => panic!("expected a method, got {other:?}"),
    }
}

#[test]
fn host_functions_set_on_the_node_are_chainable() {
    let doc = Document::new();
    let handle = wrap(&doc, "div").unwrap();
    handle
        .set(
            "mark",
            dom::Function::new(|node, _| {
                node.set_attribute("data-marked", "yes")?;
                Ok(Value::from(42))
            }),
        )
        .unwrap();
    let reply = handle.call("mark", &[]).unwrap();
    assert!(reply.into_handle().is_some());
    assert_eq!(handle.get_attribute("data-marked").unwrap().as_deref(), Some("yes"));
    assert_eq!(handle.own_keys().unwrap(), ["mark"]);
}

#[test]
fn failing_argument_keeps_earlier_children_inserted() {
    let doc = Document::new();
    let first = wrap(&doc, "li").unwrap();
    let first_node = first.node().unwrap();
    let dead = wrap(&doc, "li").unwrap();
    dead.unwrap().unwrap();
    let later = wrap(&doc, "li").unwrap();

    let parent = wrap(&doc, "ul").unwrap();
    let err = parent
        .append([
            wrapper::Child::from(&first),
            wrapper::Child::from(&dead),
            wrapper::Child::from(&later),
        ])
        .unwrap_err();
    assert_eq!(err, wrapper::WrapError::DoubleRevocation);
    assert!(first.is_revoked());
    assert!(!later.is_revoked());
    assert!(first_node.own_keys().is_empty());
    assert_eq!(parent.node().unwrap().child_nodes(), vec![first_node]);
}

#[test]
fn failing_wrapped_argument_keeps_earlier_nodes_inserted() {
    let doc = Document::new();
    let first = wrap(&doc, "p").unwrap();
    let first_node = first.node().unwrap();
    let dead = wrap(&doc, "p").unwrap();
    dead.unwrap().unwrap();
    let later = wrap(&doc, "p").unwrap();

    let parent = wrap(&doc, "div").unwrap();
    let err = parent
        .append_wrapped([first.clone(), dead, later.clone()])
        .unwrap_err();
    assert_eq!(err, wrapper::WrapError::DoubleRevocation);
    assert!(first.is_revoked());
    assert!(!later.is_revoked());
    assert_eq!(parent.node().unwrap().child_nodes(), vec![first_node]);
}
