use dom::{Document, Value};
use wrapper::{Helper, Props, WrapError, Wrapper, wrap};

const HELPER_NAMES: [&str; 7] = [
    "appendNode",
    "prependNode",
    "appendText",
    "prependText",
    "appendWrapped",
    "prependWrapped",
    "unwrap",
];

#[test]
fn second_unwrap_is_a_double_revocation() {
    let doc = Document::new();
    let handle = wrap(&doc, "div").unwrap();
    handle.unwrap().unwrap();
    assert_eq!(handle.unwrap().unwrap_err(), WrapError::DoubleRevocation);
    assert!(handle.is_revoked());
}

#[test]
fn every_access_fails_after_unwrap() {
    let doc = Document::new();
    let handle = wrap(&doc, "div").unwrap();
    let clone = handle.clone();
    handle.unwrap().unwrap();
    assert_eq!(clone.get("id").unwrap_err(), WrapError::DoubleRevocation);
    assert_eq!(clone.append_text("x").unwrap_err(), WrapError::DoubleRevocation);
    assert_eq!(clone.set("custom", 1).unwrap_err(), WrapError::DoubleRevocation);
    assert_eq!(clone.own_keys().unwrap_err(), WrapError::DoubleRevocation);
    assert_eq!(clone.has("id").unwrap_err(), WrapError::DoubleRevocation);
}

#[test]
fn unknown_members_are_rejected() {
    let doc = Document::new();
    let handle = wrap(&doc, "div").unwrap();
    let err = handle.get("apendChild").unwrap_err();
    assert_eq!(err, WrapError::InvalidMemberAccess("apendChild".to_string()));
    assert_eq!(err.to_string(), "Invalid method or property name \"apendChild\"");
    assert!(!handle.has("apendChild").unwrap());
    assert!(matches!(
        handle.call("nope", &[]),
        Err(WrapError::InvalidMemberAccess(name)) if name == "nope"
    ));
}

#[test]
fn unknown_element_kind_surfaces_from_the_document() {
    let doc = Document::new();
    assert_eq!(
        wrap(&doc, "blink").unwrap_err(),
        WrapError::InvalidElementKind("blink".to_string())
    );
    assert_eq!(doc.node_count(), 0);
}

#[test]
fn custom_elements_can_be_wrapped() {
    let doc = Document::new();
    let handle = wrap(&doc, "fancy-card").unwrap();
    assert_eq!(handle.property("tagName").unwrap(), Value::from("FANCY-CARD"));
}

#[test]
fn enumeration_hides_helpers() {
    let doc = Document::new();
    let handle = wrap(&doc, "div").unwrap();
    assert_eq!(handle.own_keys().unwrap(), Vec::<String>::new());
    let node = handle.node().unwrap();
    assert_eq!(node.own_keys(), HELPER_NAMES);
    assert_eq!(handle.injected_keys(), HELPER_NAMES);
}

#[test]
fn enumeration_keeps_caller_keys_in_insertion_order() {
    let doc = Document::new();
    let node = doc.create_element("div").unwrap();
    node.set_own("custom1", Value::from(1));
    let handle = wrap(&doc, &node).unwrap();
    node.set_own("custom2", Value::from(2));
    handle.set("custom3", 3).unwrap();
    assert_eq!(handle.own_keys().unwrap(), ["custom1", "custom2", "custom3"]);
}

#[test]
fn unwrap_returns_the_same_node_without_helpers() {
    let doc = Document::new();
    let node = doc.create_element("section").unwrap();
    let handle = wrap(&doc, &node).unwrap();
    for name in HELPER_NAMES {
        assert!(node.has_own(name), "{name} should be attached while wrapped");
    }
    let restored = handle.unwrap().unwrap();
    assert_eq!(restored, node);
    for helper in Helper::ALL {
        assert!(!restored.has_own(helper.name()), "{} survived unwrap", helper.name());
    }
    assert!(restored.own_keys().is_empty());
}

#[test]
fn config_expandos_are_stripped_but_later_writes_survive() {
    let doc = Document::new();
    let node = doc.create_element("div").unwrap();
    let props = Props::new().with("whatever", "x").with("id", "main");
    let handle = Wrapper::new(&doc).wrap_with(&node, &props).unwrap();
    assert_eq!(handle.own_keys().unwrap(), Vec::<String>::new());
    assert_eq!(handle.property("whatever").unwrap(), Value::from("x"));

    handle.set("later", true).unwrap();
    assert_eq!(handle.own_keys().unwrap(), ["later"]);

    let node = handle.unwrap().unwrap();
    assert_eq!(node.own_keys(), ["later"]);
    assert_eq!(node.id(), "main");
}

#[test]
fn fresh_handle_enumerates_like_the_pristine_node() {
    let doc = Document::new();
    let node = doc.create_element("div").unwrap();
    node.set_own("mine", Value::from(1));
    let props = Props::new().with("extra", 2);
    let handle = Wrapper::new(&doc).wrap_with(&node, &props).unwrap();
    assert_eq!(handle.own_keys().unwrap(), ["mine"]);
    assert!(handle.injected_keys().iter().any(|key| key == "extra"));
    assert_eq!(handle.unwrap().unwrap().own_keys(), ["mine"]);
}

#[test]
fn pre_existing_helper_names_belong_to_the_caller() {
    let doc = Document::new();
    let node = doc.create_element("div").unwrap();
    node.set_own("appendText", Value::from("mine"));
    let handle = wrap(&doc, &node).unwrap();
    assert!(!handle.injected_keys().iter().any(|k| k == "appendText"));
    assert_eq!(handle.property("appendText").unwrap(), Value::from("mine"));

    let node = handle.unwrap().unwrap();
    assert_eq!(node.get_own("appendText"), Some(Value::from("mine")));
}

#[test]
fn dropping_an_active_handle_strips_helpers() {
    let doc = Document::new();
    let node = doc.create_element("div").unwrap();
    {
        let handle = wrap(&doc, &node).unwrap();
        handle.append_text("kept").unwrap();
    }
    assert!(node.own_keys().is_empty());
    assert_eq!(node.text_content(), "kept");
}

#[test]
fn clones_share_one_revocation() {
    let doc = Document::new();
    let handle = wrap(&doc, "div").unwrap();
    let clone = handle.clone();
    assert!(handle.ptr_eq(&clone));
    clone.unwrap().unwrap();
    assert_eq!(handle.unwrap().unwrap_err(), WrapError::DoubleRevocation);
}

#[test]
fn unwrap_through_the_dynamic_path_returns_the_node() {
    let doc = Document::new();
    let handle = wrap(&doc, "div").unwrap();
    let node = handle.node().unwrap();
    let reply = handle.call("unwrap", &[]).unwrap();
    assert_eq!(reply.into_value(), Some(Value::Node(node.clone())));
    assert!(handle.is_revoked());
    assert!(node.own_keys().is_empty());
}

#[test]
fn a_node_can_be_wrapped_again_after_unwrap() {
    let doc = Document::new();
    let first = wrap(&doc, "div").unwrap();
    let node = first.unwrap().unwrap();
    let second = wrap(&doc, &node).unwrap();
    assert_eq!(second.injected_keys(), HELPER_NAMES);
    second.append_text("again").unwrap();
    assert_eq!(second.unwrap().unwrap().text_content(), "again");
}

#[test]
fn non_callable_members_cannot_be_called() {
    let doc = Document::new();
    let handle = wrap(&doc, "div").unwrap();
    let err = handle.call("tagName", &[]).unwrap_err();
    assert!(matches!(err, WrapError::Dom(dom::DomError::NotCallable(ref name)) if name == "tagName"));
}

#[test]
fn a_node_held_by_a_live_handle_cannot_be_wrapped_again() {
    let doc = Document::new();
    let first = wrap(&doc, "div").unwrap();
    let node = first.node().unwrap();
    assert_eq!(wrap(&doc, &node).unwrap_err(), WrapError::AlreadyWrapped);
    assert!(!first.is_revoked());
    assert_eq!(node.own_keys(), HELPER_NAMES);

    first.unwrap().unwrap();
    let second = wrap(&doc, &node).unwrap();
    assert_eq!(second.injected_keys(), HELPER_NAMES);
}

#[test]
fn stale_unwrap_function_reports_double_revocation() {
    let doc = Document::new();
    let handle = wrap(&doc, "div").unwrap();
    let node = handle.node().unwrap();
    let Value::Function(stale) = handle.property("unwrap").unwrap() else {
        panic!("unwrap should be a function");
    };
    handle.unwrap().unwrap();

    let err = stale.call(&node, &[]).unwrap_err();
    assert_eq!(err, dom::DomError::Revoked);
    assert_eq!(WrapError::from(err), WrapError::DoubleRevocation);
}

#[test]
fn stale_unwrap_function_after_release_reports_double_revocation() {
    let doc = Document::new();
    let node = doc.create_element("div").unwrap();
    let stale = {
        let handle = wrap(&doc, &node).unwrap();
        handle.property("unwrap").unwrap()
    };
    let Value::Function(stale) = stale else {
        panic!("unwrap should be a function");
    };
    assert_eq!(
        WrapError::from(stale.call(&node, &[]).unwrap_err()),
        WrapError::DoubleRevocation
    );
}
