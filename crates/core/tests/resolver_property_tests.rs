//! Property tests for the keybuffer resolver.

use std::sync::Arc;

use keychord_core::{
    AbortReason, ActionRef, BindOptions, ContextRegistry, Direction, Invocation, Outcome,
    parse_keys,
};
use proptest::prelude::*;

fn action(name: &str) -> ActionRef {
    let noop = |_: &Invocation| -> anyhow::Result<()> { Ok(()) };
    ActionRef::new(name, Arc::new(noop))
}

fn feed(registry: &mut ContextRegistry, context: &str, keys: &str) -> Vec<Outcome> {
    parse_keys(keys)
        .unwrap()
        .iter()
        .map(|token| registry.feed_token(context, *token).unwrap())
        .collect()
}

fn registry_with(bindings: &[(&str, &str)]) -> ContextRegistry {
    let mut registry = ContextRegistry::default();
    registry.get_or_create("main");
    for (keys, name) in bindings {
        registry
            .bind("main", &[*keys], action(name), BindOptions::default())
            .unwrap();
    }
    registry
}

proptest! {
    #[test]
    fn prop_prefixes_wait_and_full_sequence_dispatches(keys in "[a-z]{1,6}") {
        let mut registry = registry_with(&[(keys.as_str(), "target")]);
        let outcomes = feed(&mut registry, "main", &keys);

        let (last, prefixes) = outcomes.split_last().unwrap();
        for outcome in prefixes {
            prop_assert_eq!(outcome, &Outcome::Waiting);
        }
        let dispatch = last.dispatch().unwrap();
        prop_assert_eq!(dispatch.action.name(), "target");
        prop_assert_eq!(&dispatch.invocation.matched_keys, &keys);
        prop_assert!(registry.pending("main").unwrap().is_empty());
    }

    #[test]
    fn prop_count_prefix_is_reported(count in 1u32..100_000, keys in "[a-z]{1,4}") {
        let mut registry = registry_with(&[(keys.as_str(), "target")]);
        let outcomes = feed(&mut registry, "main", &format!("{count}{keys}"));

        let dispatch = outcomes.last().unwrap().dispatch().unwrap();
        prop_assert_eq!(dispatch.invocation.repeat_count, Some(count));
        prop_assert_eq!(&dispatch.invocation.matched_keys, &keys);
    }

    #[test]
    fn prop_unbound_suffix_aborts(keys in "[a-y]{1,4}") {
        // `z` never appears in the bound sequence, so appending it cannot match.
        let mut registry = registry_with(&[(keys.as_str(), "target")]);
        let prefix_len = keys.len() - 1;
        let probe = format!("{}z", &keys[..prefix_len]);
        let outcomes = feed(&mut registry, "main", &probe);

        prop_assert!(matches!(
            outcomes.last().unwrap(),
            Outcome::Aborted(AbortReason::NoBinding { .. })
        ), "expected last outcome to be Aborted(NoBinding)");
        prop_assert!(registry.pending("main").unwrap().is_empty());
    }
}

#[test]
fn test_zz_waits_then_dispatches() {
    let mut registry = registry_with(&[("ZZ", "fm.exit")]);
    let outcomes = feed(&mut registry, "main", "ZZ");
    assert_eq!(outcomes[0], Outcome::Waiting);
    assert_eq!(outcomes[1].dispatch().unwrap().action.name(), "fm.exit");
}

#[test]
fn test_count_and_no_count_reach_same_action() {
    let mut registry = registry_with(&[("gg", "fm.move")]);

    let with_count = feed(&mut registry, "main", "5gg");
    let counted = with_count.last().unwrap().dispatch().unwrap();
    assert_eq!(counted.invocation.repeat_count, Some(5));

    let without = feed(&mut registry, "main", "gg");
    let plain = without.last().unwrap().dispatch().unwrap();
    assert_eq!(plain.invocation.repeat_count, None);
    assert_eq!(plain.action, counted.action);
}

#[test]
fn test_direction_alias_matches_target() {
    let mut registry = ContextRegistry::default();
    registry.get_or_create("main");
    registry
        .bind_direction("main", "<down>", Direction::down(1))
        .unwrap();
    registry.alias_direction("main", "j", "<down>").unwrap();
    registry
        .bind("main", &["<dir>"], action("move"), BindOptions::default())
        .unwrap();

    let via_alias = feed(&mut registry, "main", "j").pop().unwrap();
    let direct = feed(&mut registry, "main", "<down>").pop().unwrap();
    let (a, b) = (via_alias.dispatch().unwrap(), direct.dispatch().unwrap());
    assert_eq!(a.action, b.action);
    assert_eq!(a.invocation.direction, b.invocation.direction);
    assert_eq!(a.invocation.direction, Some(Direction::down(1)));
}

#[test]
fn test_binding_alias_dispatches_like_its_target() {
    let mut registry = ContextRegistry::default();
    registry.get_or_create("main");
    registry
        .bind_direction("main", "<down>", Direction::down(1))
        .unwrap();
    registry
        .bind(
            "main",
            &["<dir>"],
            action("move").with_args(["cursor"]),
            BindOptions::default(),
        )
        .unwrap();
    registry.alias("main", "j", "<down>").unwrap();

    let via_alias = feed(&mut registry, "main", "3j").pop().unwrap();
    let direct = feed(&mut registry, "main", "3<down>").pop().unwrap();
    let (a, b) = (via_alias.dispatch().unwrap(), direct.dispatch().unwrap());

    assert_eq!(a.action, b.action);
    assert_eq!(a.invocation.repeat_count, Some(3));
    assert_eq!(a.invocation.repeat_count, b.invocation.repeat_count);
    assert_eq!(a.invocation.direction, Some(Direction::down(3)));
    assert_eq!(a.invocation.direction, b.invocation.direction);
    assert_eq!(a.invocation.args, vec!["cursor"]);
    assert_eq!(a.invocation.args, b.invocation.args);
    assert_eq!(a.invocation.matched_keys, "j");
    assert_eq!(b.invocation.matched_keys, "<down>");
}

#[test]
fn test_direction_composition_with_inner_count() {
    let mut registry = ContextRegistry::default();
    registry.get_or_create("main");
    registry
        .bind_direction("main", "gg", Direction::down(0).absolute())
        .unwrap();
    registry
        .bind(
            "main",
            &["d<dir>"],
            action("cut"),
            BindOptions::with_direction(),
        )
        .unwrap();

    let plain = feed(&mut registry, "main", "dgg").pop().unwrap();
    let direction = plain.dispatch().unwrap().invocation.direction.unwrap();
    assert!(direction.absolute);
    assert_eq!(direction.target(), Some(0));

    let counted = feed(&mut registry, "main", "5d3gg").pop().unwrap();
    let dispatch = counted.dispatch().unwrap();
    assert_eq!(dispatch.invocation.repeat_count, Some(5));
    assert_eq!(dispatch.invocation.direction.unwrap().target(), Some(3));

    let outer_only = feed(&mut registry, "main", "5dgg").pop().unwrap();
    let dispatch = outer_only.dispatch().unwrap();
    assert_eq!(dispatch.invocation.repeat_count, Some(5));
    assert_eq!(dispatch.invocation.direction.unwrap().target(), Some(5));
}

#[test]
fn test_unbind_is_local_to_context() {
    let mut registry = registry_with(&[("Q", "fm.exit")]);
    registry.get_or_create("console");
    registry.merge_context("console", "main").unwrap();
    assert_eq!(registry.unbind("console", "Q").unwrap(), 1);

    assert!(matches!(
        feed(&mut registry, "console", "Q").pop().unwrap(),
        Outcome::Aborted(AbortReason::NoBinding { .. })
    ));
    assert!(feed(&mut registry, "main", "Q").pop().unwrap().dispatch().is_some());
}

#[test]
fn test_ambiguity_then_abandon() {
    let mut registry = registry_with(&[("zh", "show_hidden"), ("zp", "preview")]);
    let outcomes = feed(&mut registry, "main", "zx");
    assert_eq!(outcomes[0], Outcome::Waiting);
    assert_eq!(
        outcomes[1],
        Outcome::Aborted(AbortReason::NoBinding {
            keys: "zx".to_string()
        })
    );
}
