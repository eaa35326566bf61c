//! Property-based tests for the domain crate.
//!
//! These verify invariants around:
//! - naming-convention classification
//! - pack identity and rule de-duplication
//! - structure-preserving wire translation
//! - repeatable evaluation

use crate::classify::{classify_pack, classify_rule};
use crate::evaluate::evaluate;
use crate::model::{ModuleDecl, PackMetadata};
use crate::test_support::{FakeEngine, module};
use crate::translate::translate;
use proptest::prelude::*;
use regopack_types::{EnforcementLevel, ModuleId, PropertyMap, PropertyValue};
use serde_json::{Value as JsonValue, json};
use std::collections::BTreeSet;

// ============================================================================
// Strategies
// ============================================================================

fn arb_suffixes() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-zA-Z]{1,8}", 0..4).prop_map(|parts| {
        parts
            .into_iter()
            .map(|p| format!("_{p}"))
            .collect::<String>()
    })
}

fn arb_mandatory_name() -> impl Strategy<Value = String> {
    (prop_oneof![Just("deny"), Just("violation")], arb_suffixes())
        .prop_map(|(prefix, suffix)| format!("{prefix}{suffix}"))
}

fn arb_advisory_name() -> impl Strategy<Value = String> {
    arb_suffixes().prop_map(|suffix| format!("warn{suffix}"))
}

/// Names that must never be classified.
fn arb_library_name() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-ce-uxyz][a-z_]{0,12}",
        arb_mandatory_name().prop_map(|n| format!("{n}_1")),
        arb_advisory_name().prop_map(|n| format!("{n}-x")),
        arb_mandatory_name().prop_map(|n| format!("is_{n}")),
    ]
}

fn arb_rule_name() -> impl Strategy<Value = String> {
    prop_oneof![arb_mandatory_name(), arb_advisory_name(), arb_library_name()]
}

fn arb_modules(package: &'static str) -> impl Strategy<Value = Vec<ModuleDecl>> {
    prop::collection::btree_map(
        "[a-z]{1,6}(/[a-z]{1,6}){0,2}",
        prop::collection::vec(arb_rule_name(), 0..6),
        1..5,
    )
    .prop_map(move |mods| {
        mods.into_iter()
            .map(|(id, rules)| ModuleDecl {
                id: ModuleId::new(id),
                package: package.to_string(),
                rules: dedup_in_order(rules),
            })
            .collect()
    })
}

fn dedup_in_order(rules: Vec<String>) -> Vec<String> {
    let mut seen = BTreeSet::new();
    rules.into_iter().filter(|r| seen.insert(r.clone())).collect()
}

/// Pairs of wire value and the generic value it must translate to.
fn arb_value_pair() -> impl Strategy<Value = (PropertyValue, JsonValue)> {
    let leaf = prop_oneof![
        Just((PropertyValue::null(), JsonValue::Null)),
        any::<bool>().prop_map(|b| (PropertyValue::bool(b), json!(b))),
        (-1_000_000i64..1_000_000).prop_map(|n| (PropertyValue::number(n as f64), json!(n))),
        (-1000i32..1000).prop_map(|n| {
            let f = n as f64 + 0.25;
            (PropertyValue::number(f), json!(f))
        }),
        "[ -~]{0,16}".prop_map(|s| (PropertyValue::string(s.clone()), json!(s))),
    ];

    leaf.prop_recursive(4, 64, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(|items| {
                let (wire, generic): (Vec<_>, Vec<_>) = items.into_iter().unzip();
                (PropertyValue::list(wire), JsonValue::Array(generic))
            }),
            prop::collection::btree_map("[a-zA-Z_][a-zA-Z0-9_]{0,8}", inner, 0..6).prop_map(
                |fields| {
                    let mut wire = PropertyMap::new();
                    let mut generic = serde_json::Map::new();
                    for (k, (w, g)) in fields {
                        wire.insert(k.clone(), w);
                        generic.insert(k, g);
                    }
                    (PropertyValue::structure(wire), JsonValue::Object(generic))
                }
            ),
        ]
    })
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn mandatory_names_classify_mandatory(name in arb_mandatory_name()) {
        prop_assert_eq!(classify_rule(&name), Some(EnforcementLevel::Mandatory));
    }

    #[test]
    fn advisory_names_classify_advisory(name in arb_advisory_name()) {
        prop_assert_eq!(classify_rule(&name), Some(EnforcementLevel::Advisory));
    }

    #[test]
    fn library_names_are_excluded(name in arb_library_name()) {
        prop_assert_eq!(classify_rule(&name), None);
    }

    #[test]
    fn shared_package_always_loads(modules in arb_modules("shared.pkg")) {
        let pack = classify_pack(&modules, &PackMetadata::default()).expect("same package loads");
        prop_assert_eq!(pack.name.as_str(), "shared.pkg");
    }

    #[test]
    fn any_differing_package_fails(
        mut modules in arb_modules("first"),
        victim in any::<prop::sample::Index>(),
    ) {
        let i = victim.index(modules.len());
        modules[i].package = "second".to_string();
        let all_second = modules.iter().all(|m| m.package == "second");
        prop_assume!(!all_second);

        prop_assert!(classify_pack(&modules, &PackMetadata::default()).is_err());
    }

    #[test]
    fn catalog_holds_each_classified_name_once(modules in arb_modules("pkg")) {
        let pack = classify_pack(&modules, &PackMetadata::default()).expect("pack");

        let distinct: BTreeSet<&str> = modules
            .iter()
            .flat_map(|m| m.rules.iter())
            .filter(|r| classify_rule(r).is_some())
            .map(|r| r.as_str())
            .collect();
        prop_assert_eq!(pack.policies.len(), distinct.len());

        // First occurrence (in module order) wins.
        for policy in &pack.policies {
            let first = modules
                .iter()
                .find(|m| m.rules.contains(&policy.name))
                .expect("declared somewhere");
            prop_assert_eq!(policy.display_name.as_str(), first.id.as_str());
        }
    }

    #[test]
    fn catalog_order_ignores_input_order(modules in arb_modules("pkg")) {
        let mut reversed = modules.clone();
        reversed.reverse();
        let a = classify_pack(&modules, &PackMetadata::default()).expect("pack");
        let b = classify_pack(&reversed, &PackMetadata::default()).expect("pack");
        prop_assert_eq!(a, b);
    }

    #[test]
    fn translation_preserves_structure((wire, generic) in arb_value_pair()) {
        prop_assert_eq!(translate(&wire).expect("translate"), generic);
    }

    #[test]
    fn evaluation_is_repeatable(messages in prop::collection::vec("[a-z ]{1,12}", 0..5)) {
        let pack = crate::test_support::pack_from(&[module("m", "p", &["deny", "warn_x"])]);
        let mut engine = FakeEngine::default();
        engine.answer("p.deny", Ok(Some(json!(messages))));
        engine.answer("p.warn_x", Ok(Some(json!(true))));

        let input = json!({"acl": "public"});
        let first = evaluate(&engine, &(), &pack, &input).expect("first");
        let second = evaluate(&engine, &(), &pack, &input).expect("second");
        prop_assert_eq!(first.len(), messages.len() + 1);
        prop_assert_eq!(first, second);
    }
}
