//! End-to-end behaviour of the contract resolver.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use pretty_assertions::assert_eq;
use serde_json::{Map, Value, json};
use trellis_application::resolver::ContractResolver;
use trellis_application::{ApplicationError, Resolution};
use trellis_domain::{InterpolationCoercion, ResolveError, ResolveOptions};

fn resolve(contract: Value) -> Result<Resolution, ApplicationError> {
    ContractResolver::default().resolve_document(contract, None)
}

fn resolve_with(contract: Value, options: ResolveOptions) -> Result<Resolution, ApplicationError> {
    ContractResolver::new(options).resolve_document(contract, None)
}

fn root(contract: Value) -> Value {
    resolve(contract).unwrap().output.root_element
}

fn resolve_error(contract: Value) -> ResolveError {
    match resolve(contract) {
        Err(ApplicationError::Resolve(err)) => err,
        other => panic!("expected a resolution error, got {other:?}"),
    }
}

fn dashboard() -> Value {
    json!({
        "data": {
            "title": "Dashboard",
            "cards": [
                {"type": "Card", "title": "Sales"},
                {"type": "Card", "title": "Traffic"}
            ],
            "footer": {"type": "Footer", "text": "${computed.summary}"}
        },
        "state": {"user": "Ann", "admin": false, "unread": 4},
        "computed": {
            "summary": "${computed.greeting} You have ${state.unread} messages.",
            "greeting": "Hello ${state.user}!",
            "role": {
                "kind": "if",
                "condition": "${state.admin}",
                "thenBranch": "admin",
                "elseBranch": "viewer"
            }
        },
        "rootElement": {
            "type": "Page",
            "title": "${data.title}",
            "$layout": "grid",
            "$children": ["${data.cards}", "${data.footer}"],
            "role": "${computed.role}"
        }
    })
}

#[test]
fn test_full_contract() {
    assert_eq!(
        root(dashboard()),
        json!({
            "type": "Page",
            "title": "Dashboard",
            "children": [
                {"type": "Card", "title": "Sales"},
                {"type": "Card", "title": "Traffic"},
                {"type": "Footer", "text": "Hello Ann! You have 4 messages."}
            ],
            "role": "viewer"
        })
    );
}

#[test]
fn test_determinism() {
    let first = resolve(dashboard()).unwrap();
    let second = resolve(dashboard()).unwrap();

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first.output).unwrap(),
        serde_json::to_string(&second.output).unwrap()
    );
}

#[test]
fn test_forward_reference() {
    let resolution = resolve(json!({
        "computed": {"b": "${computed.a}", "a": "1"},
        "rootElement": "${computed.b}"
    }))
    .unwrap();

    assert_eq!(resolution.order, vec!["a", "b"]);
    assert_eq!(resolution.computed.get("b"), Some(&json!("1")));
}

#[test]
fn test_static_cycle_names_both_fields() {
    let err = resolve_error(json!({
        "computed": {"a": "${computed.b}", "b": "${computed.a}"},
        "rootElement": "${computed.a}"
    }));

    let ResolveError::CircularDependency { cycle } = &err else {
        panic!("expected CircularDependency, got {err:?}");
    };
    assert!(cycle.contains(&"a".to_string()));
    assert!(cycle.contains(&"b".to_string()));
    assert_eq!(cycle.first(), cycle.last());
}

#[test]
fn test_conditional_branching() {
    let contract = |flag: bool| {
        json!({
            "state": {"flag": flag},
            "computed": {
                "answer": {"kind": "if", "condition": "${state.flag}", "thenBranch": "yes", "elseBranch": "no"}
            },
            "rootElement": "${computed.answer}"
        })
    };

    assert_eq!(root(contract(true)), json!("yes"));
    assert_eq!(root(contract(false)), json!("no"));
}

#[test]
fn test_partial_interpolation() {
    assert_eq!(
        root(json!({
            "state": {"name": "Ann", "count": 2},
            "rootElement": {"a": "Hello ${state.name}!", "b": "${state.name} has ${state.count}"}
        })),
        json!({"a": "Hello Ann!", "b": "Ann has 2"})
    );
}

#[test]
fn test_child_flattening() {
    assert_eq!(
        root(json!({
            "data": {"a": {"type": "X"}, "b": {"type": "Y"}},
            "rootElement": {"$children": ["${data.a}", "${data.b}"]}
        })),
        json!({"children": [{"type": "X"}, {"type": "Y"}]})
    );
}

#[test]
fn test_artifact_filtering() {
    assert_eq!(
        root(json!({
            "data": {"gone": null},
            "rootElement": {"items": ["first", null, {}, "${data.gone}", "last"]}
        })),
        json!({"items": ["first", "last"]})
    );
}

#[test]
fn test_missing_path_reporting() {
    let err = resolve_error(json!({
        "data": {"present": 1},
        "rootElement": {"label": "${data.missing.deep}"}
    }));

    assert_eq!(err.location(), Some("rootElement.label"));
    let ResolveError::UnresolvablePath { path, segment, available } = err.root_cause() else {
        panic!("expected UnresolvablePath, got {err:?}");
    };
    assert_eq!(path, "data.missing.deep");
    assert_eq!(segment, "missing");
    assert_eq!(available, &vec!["present".to_string()]);
}

#[test]
fn test_control_key_stripping() {
    assert_eq!(
        root(json!({"rootElement": {"type": "X", "$tag": "internal", "visible": true}})),
        json!({"type": "X", "visible": true})
    );
}

#[test]
fn test_placeholder_free_tree_is_unchanged() {
    let tree = json!({
        "type": "Column",
        "children": [{"type": "Text", "text": "plain", "size": 1.5}],
        "meta": {"empty": {}, "none": null, "flags": [true, false]}
    });

    assert_eq!(root(json!({"rootElement": tree.clone()})), tree);
}

#[test]
fn test_dynamic_cycle_through_data() {
    let err = resolve_error(json!({
        "data": {"a": "${data.b}", "b": "${data.a}"},
        "rootElement": {"x": "${data.a}"}
    }));

    assert_eq!(
        err.root_cause(),
        &ResolveError::CircularReference {
            chain: vec!["${data.a}".to_string(), "${data.b}".to_string()],
            reference: "${data.a}".to_string(),
        }
    );
    assert_eq!(err.location(), Some("rootElement.x"));
}

#[test]
fn test_computed_failure_names_field() {
    let err = resolve_error(json!({
        "computed": {"ok": "fine", "broken": "${state.nope.deeper}"},
        "rootElement": "${computed.ok}"
    }));

    assert_eq!(err.field(), Some("broken"));
    assert_eq!(err.location(), Some("computed.broken"));
}

#[test]
fn test_strict_coercion() {
    let contract = json!({
        "state": {"tags": ["a", "b"]},
        "rootElement": "tags: ${state.tags}"
    });

    let structural = resolve_with(contract.clone(), ResolveOptions::default()).unwrap();
    assert_eq!(structural.output.root_element, json!(r#"tags: ["a","b"]"#));

    let strict = resolve_with(
        contract,
        ResolveOptions::default().with_coercion(InterpolationCoercion::Strict),
    )
    .unwrap_err();
    assert!(matches!(
        strict.as_resolve().map(ResolveError::root_cause),
        Some(ResolveError::NonScalarInterpolation { kind: "sequence", .. })
    ));
}

#[test]
fn test_depth_guard() {
    let mut tree = json!({"type": "Leaf"});
    for _ in 0..50 {
        tree = json!({"type": "Box", "child": tree});
    }

    let err = resolve_with(
        json!({"rootElement": tree}),
        ResolveOptions::default().with_max_depth(16),
    )
    .unwrap_err();

    assert!(matches!(
        err,
        ApplicationError::Resolve(ResolveError::DepthExceeded { limit: 16, .. })
    ));
}

#[test]
fn test_input_is_not_mutated() {
    let contract = dashboard();
    let before = contract.clone();
    let _ = resolve(contract.clone()).unwrap();
    assert_eq!(contract, before);
}

#[test]
fn test_long_placeholder_chain_fails_cleanly_at_default_limit() {
    let mut state = Map::new();
    for i in 0..2000 {
        state.insert(format!("a{i}"), json!(format!("${{state.a{}}}", i + 1)));
    }

    let err = resolve(json!({"state": state, "rootElement": "${state.a0}"})).unwrap_err();

    assert_eq!(
        err,
        ApplicationError::Resolve(ResolveError::DepthExceeded {
            limit: 1000,
            location: "rootElement".to_string(),
        })
    );
}
