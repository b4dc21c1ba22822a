//! Property-based tests for the matching rule language.
//!
//! Tests validate:
//! - Literal templates always accept the value they were built from
//! - Example projection inverts literal template construction
//! - Open object matching ignores extra actual fields
//! - Minimum-length arrays always fail below the bound
//! - Content paths survive a render/parse round trip

use msgpact_matching::{match_template, ContentPath, MatchRule, Template};
use proptest::prelude::*;
use serde_json::Value;

// Strategy for generating scalar JSON values
fn scalar_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        prop::num::f64::NORMAL.prop_map(Value::from),
        "[a-zA-Z0-9 ]{0,12}".prop_map(Value::from),
    ]
}

// Strategy for generating JSON value trees
fn value_strategy() -> impl Strategy<Value = Value> {
    scalar_strategy().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::from),
            prop::collection::btree_map("[a-z]{1,8}", inner, 0..4)
                .prop_map(|map| Value::Object(map.into_iter().collect())),
        ]
    })
}

// Strategy for generating path steps
#[derive(Debug, Clone)]
enum Step {
    Field(String),
    Index(usize),
    Any,
}

fn step_strategy() -> impl Strategy<Value = Step> {
    prop_oneof![
        "[a-zA-Z_][a-zA-Z0-9_]{0,6}".prop_map(Step::Field),
        (0usize..20).prop_map(Step::Index),
        Just(Step::Any),
    ]
}

fn build_path(steps: &[Step]) -> ContentPath {
    let mut path = ContentPath::root();
    for step in steps {
        path = match step {
            Step::Field(name) => path.field(name.clone()),
            Step::Index(index) => path.index(*index),
            Step::Any => path.any_index(),
        };
    }
    path
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// A literal template accepts the exact value it was built from.
    #[test]
    fn prop_literal_template_matches_itself(value in value_strategy()) {
        let template = Template::from(value.clone());
        let mismatches = match_template(&template, &value);
        prop_assert!(mismatches.is_empty(),
            "literal template rejected its own value: {mismatches:?}");
    }

    /// Example projection inverts literal template construction.
    #[test]
    fn prop_example_projection_round_trips(value in value_strategy()) {
        let template = Template::from(value.clone());
        prop_assert_eq!(template.example(), value);
    }

    /// Open object matching never fails on extra actual fields.
    #[test]
    fn prop_open_objects_ignore_extra_fields(
        base in prop::collection::btree_map("[a-z]{1,8}", scalar_strategy(), 0..4),
        extra in scalar_strategy(),
    ) {
        let expected = Value::Object(base.clone().into_iter().collect());
        let template = Template::from(expected);

        let mut widened: serde_json::Map<String, Value> = base.into_iter().collect();
        widened.insert("EXTRA".to_string(), extra);
        let mismatches = match_template(&template, &Value::Object(widened));
        prop_assert!(mismatches.is_empty(),
            "extra field caused mismatches: {mismatches:?}");
    }

    /// Arrays shorter than the bound always fail with a length mismatch.
    #[test]
    fn prop_min_type_rejects_short_arrays(
        element in scalar_strategy(),
        min in 1usize..5,
        shortfall in 1usize..5,
    ) {
        let len = min.saturating_sub(shortfall);
        let template = Template::from(MatchRule::min_type(
            Template::from(element.clone()),
            min,
        ));
        let actual = Value::Array(vec![element; len]);

        let mismatches = match_template(&template, &actual);
        prop_assert_eq!(mismatches.len(), 1);
        prop_assert_eq!(
            &mismatches[0].reason,
            &format!("array length {len} < required {min}")
        );
    }

    /// Arrays meeting the bound with conforming elements always pass.
    #[test]
    fn prop_min_type_accepts_conforming_arrays(
        element in scalar_strategy(),
        min in 0usize..4,
        surplus in 0usize..4,
    ) {
        let template = Template::from(MatchRule::min_type(
            Template::from(element.clone()),
            min,
        ));
        let actual = Value::Array(vec![element; min + surplus]);
        prop_assert!(match_template(&template, &actual).is_empty());
    }

    /// Content paths survive a render/parse round trip.
    #[test]
    fn prop_path_render_parse_round_trip(steps in prop::collection::vec(step_strategy(), 0..6)) {
        let path = build_path(&steps);
        let rendered = path.to_string();
        let parsed = ContentPath::parse(&rendered);
        prop_assert_eq!(parsed, Some(path), "failed to re-parse {}", rendered);
    }

    /// Type rules accept any value of the example's class.
    #[test]
    fn prop_type_rule_accepts_same_class(
        example in "[a-zA-Z]{1,8}",
        actual in "[a-zA-Z0-9 ]{0,16}",
    ) {
        let template = Template::from(MatchRule::like(Value::from(example)));
        prop_assert!(match_template(&template, &Value::from(actual)).is_empty());
    }
}

#[test]
fn test_bracket_quoted_keys_round_trip() {
    let path = ContentPath::root().field("a key").field("it's");
    let rendered = path.to_string();
    assert_eq!(rendered, "$['a key']['it\\'s']");
    assert_eq!(ContentPath::parse(&rendered), Some(path));
}
