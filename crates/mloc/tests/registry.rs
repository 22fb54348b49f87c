//! Integration tests for rule and formatter registries.

use std::sync::Arc;

use mloc::{Formatter, Locale, LocaleError, LocaleOps, NamedArgs, Rule, Value, config};

fn parent_and_child() -> (Arc<Locale>, Locale) {
    let parent = Arc::new(
        Locale::builder()
            .name("en")
            .config(config! { "count" => 3, "price" => 10 })
            .build()
            .unwrap(),
    );
    let child = Locale::builder()
        .name("en-GB")
        .config(config! { "price" => 8 })
        .fallback(Arc::clone(&parent))
        .build()
        .unwrap();
    (parent, child)
}

fn constant_rule(value: &'static str) -> Rule {
    Rule::new(move |_, _| Value::from(value))
}

fn constant_formatter(text: &'static str) -> Formatter {
    Formatter::new(move |_, _, _| text.to_string())
}

// =========================================================================
// Rule Resolution
// =========================================================================

#[test]
fn rule_registered_on_parent_is_visible_from_child() {
    let (parent, child) = parent_and_child();
    parent.register_rule("plural", constant_rule("parent"));

    let rule = child.get_rule("plural", None).unwrap();
    assert_eq!(rule.call(None, &[]), Value::from("parent"));
}

#[test]
fn rule_registration_is_local() {
    let (parent, child) = parent_and_child();
    child.register_rule("plural", constant_rule("child"));

    assert!(child.get_rule("plural", None).is_some());
    assert!(parent.get_rule("plural", None).is_none());
    assert_eq!(parent.rule_ids(), Vec::<String>::new());
}

#[test]
fn child_rule_shadows_parent_rule() {
    let (parent, child) = parent_and_child();
    parent.register_rule("plural", constant_rule("parent"));
    child.register_rule("plural", constant_rule("child"));

    let from_child = child.get_rule("plural", None).unwrap();
    let from_parent = parent.get_rule("plural", None).unwrap();
    assert_eq!(from_child.call(None, &[]), Value::from("child"));
    assert_eq!(from_parent.call(None, &[]), Value::from("parent"));
}

#[test]
fn registering_same_rule_id_overwrites() {
    let (_parent, child) = parent_and_child();
    child.register_rule("plural", constant_rule("first"));
    child.register_rule("plural", constant_rule("second"));

    let rule = child.get_rule("plural", None).unwrap();
    assert_eq!(rule.call(None, &[]), Value::from("second"));
    assert_eq!(child.rule_ids(), vec!["plural".to_string()]);
}

#[test]
fn rule_default_used_only_when_missing_everywhere() {
    let (parent, child) = parent_and_child();
    let fallback_rule = constant_rule("default");

    let rule = child.get_rule("missing", Some(fallback_rule.clone())).unwrap();
    assert!(rule.ptr_eq(&fallback_rule));

    let registered = constant_rule("registered");
    parent.register_rule("present", registered.clone());
    let rule = child.get_rule("present", Some(fallback_rule)).unwrap();
    assert!(rule.ptr_eq(&registered));
}

#[test]
fn rule_ids_merge_the_chain() {
    let (parent, child) = parent_and_child();
    parent.register_rule("b", constant_rule("b"));
    parent.register_rule("shared", constant_rule("parent"));
    child.register_rule("a", constant_rule("a"));
    child.register_rule("shared", constant_rule("child"));

    assert_eq!(child.rule_ids(), vec!["a", "b", "shared"]);
}

// =========================================================================
// Rule Application
// =========================================================================

#[test]
fn apply_rule_passes_resolved_config_and_args() {
    let (parent, child) = parent_and_child();
    parent.register_rule(
        "discount",
        Rule::new(|base, args| {
            let base = base.and_then(|v| v.as_int()).unwrap_or(0);
            let off = args.first().and_then(Value::as_int).unwrap_or(0);
            Value::Int(base - off)
        }),
    );

    // "price" resolves locally in the child, "count" through the parent.
    assert_eq!(child.apply_rule("price", "discount", &[2.into()]).unwrap(), Value::Int(6));
    assert_eq!(child.apply_rule("count", "discount", &[1.into()]).unwrap(), Value::Int(2));
    assert_eq!(parent.apply_rule("price", "discount", &[2.into()]).unwrap(), Value::Int(8));
}

#[test]
fn apply_rule_passes_none_for_missing_config() {
    let (_parent, child) = parent_and_child();
    child.register_rule(
        "describe",
        Rule::new(|base, _| Value::from(if base.is_some() { "present" } else { "absent" })),
    );

    assert_eq!(
        child.apply_rule("nonexistent", "describe", &[]).unwrap(),
        Value::from("absent")
    );
}

#[test]
fn apply_rule_named_forwards_keyword_arguments() {
    let (parent, child) = parent_and_child();
    parent.register_rule(
        "discount",
        Rule::with_named(|base, args, named| {
            let base = base.and_then(|v| v.as_int()).unwrap_or(0);
            let off = args.first().and_then(Value::as_int).unwrap_or(0);
            let factor = named.get("factor").and_then(Value::as_int).unwrap_or(1);
            Value::Int((base - off) * factor)
        }),
    );

    let named = NamedArgs::from([("factor".to_string(), Value::from(3))]);
    assert_eq!(
        child.apply_rule_named("price", "discount", &[2.into()], &named).unwrap(),
        Value::Int(18)
    );
    // Without keyword arguments the rule sees an empty map.
    assert_eq!(child.apply_rule("price", "discount", &[2.into()]).unwrap(), Value::Int(6));
}

#[test]
fn positional_rule_ignores_keyword_arguments() {
    let (_parent, child) = parent_and_child();
    child.register_rule("count_args", Rule::new(|_, args| Value::from(args.len())));

    let named = NamedArgs::from([("unused".to_string(), Value::from(true))]);
    assert_eq!(
        child.apply_rule_named("count", "count_args", &[1.into()], &named).unwrap(),
        Value::Int(1)
    );
}

#[test]
fn apply_rule_without_rule_fails() {
    let (_parent, child) = parent_and_child();

    let err = child.apply_rule("count", "pluralize", &[]).unwrap_err();
    match err {
        LocaleError::RuleNotFound {
            rule_id,
            locale,
            suggestions,
        } => {
            assert_eq!(rule_id, "pluralize");
            assert_eq!(locale, "en-GB");
            assert!(suggestions.is_empty());
        }
        other => panic!("expected RuleNotFound, got {other:?}"),
    }
}

#[test]
fn rule_not_found_suggests_similar_ids() {
    let (parent, child) = parent_and_child();
    parent.register_rule("pluralize", constant_rule("p"));
    child.register_rule("currency", constant_rule("c"));

    let err = child.apply_rule("count", "pluralise", &[]).unwrap_err();
    let LocaleError::RuleNotFound { suggestions, .. } = err else {
        panic!("expected RuleNotFound");
    };
    assert_eq!(suggestions, vec!["pluralize"]);
}

// =========================================================================
// Formatter Resolution
// =========================================================================

#[test]
fn formatter_registration_is_local() {
    let (parent, child) = parent_and_child();
    child.register_formatter("money", constant_formatter("child"));

    assert!(child.get_formatter("money", None).is_some());
    assert!(parent.get_formatter("money", None).is_none());
    assert!(parent.formatter_ids().is_empty());
}

#[test]
fn child_formatter_shadows_parent_formatter() {
    let (parent, child) = parent_and_child();
    let parent_formatter = constant_formatter("parent");
    let child_formatter = constant_formatter("child");
    parent.register_formatter("money", parent_formatter.clone());
    child.register_formatter("money", child_formatter.clone());

    assert!(child.get_formatter("money", None).unwrap().ptr_eq(&child_formatter));
    assert!(parent.get_formatter("money", None).unwrap().ptr_eq(&parent_formatter));
}

#[test]
fn formatter_found_through_fallback() {
    let (parent, child) = parent_and_child();
    let formatter = constant_formatter("parent");
    parent.register_formatter("money", formatter.clone());

    assert!(child.get_formatter("money", None).unwrap().ptr_eq(&formatter));
    assert_eq!(child.formatter_ids(), vec!["money"]);
}

#[test]
fn formatter_default_used_only_when_missing_everywhere() {
    let (_parent, child) = parent_and_child();
    let default = constant_formatter("default");

    let found = child.get_formatter("money", Some(default.clone())).unwrap();
    assert!(found.ptr_eq(&default));
    assert!(child.get_formatter("money", None).is_none());
}

// =========================================================================
// Concurrent Registration
// =========================================================================

#[test]
fn registration_and_lookup_from_many_threads() {
    let (parent, _child) = parent_and_child();

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let locale = Arc::clone(&parent);
            std::thread::spawn(move || {
                let id = format!("rule{i}");
                locale.register_rule(&id, Rule::new(move |_, _| Value::Int(i)));
                locale.apply_rule("count", &id, &[]).unwrap()
            })
        })
        .collect();

    let results: Vec<Value> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(results, (0..8).map(Value::Int).collect::<Vec<_>>());
    assert_eq!(parent.rule_ids().len(), 8);
}
