//! Shared proptest generators for the contract domain.
//!
//! This module provides reusable generators for templates, rules, paths,
//! and the surrounding contract vocabulary.

use msgpact_contract::{ArtifactMetadata, Contract, ExpectedMessage, Interaction, Participant};
use msgpact_matching::{ContentPath, MatchRule, PathToken, Template};
use proptest::prelude::*;
use serde_json::Value;
use std::collections::BTreeMap;

/// Generate interaction descriptions.
pub fn interaction_description_strategy() -> impl Strategy<Value = String> {
    ("(a|an|some)", "[a-z]{3,10}", "(event|update|snapshot|batch)")
        .prop_map(|(article, noun, kind)| format!("{article} {noun} {kind}"))
}

/// Generate participant names.
pub fn participant_name_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9]{2,12}-(consumer|provider|service)"
}

/// Generate provider state descriptions.
pub fn provider_state_strategy() -> impl Strategy<Value = String> {
    "[a-z]{3,8}( [a-z]{3,8}){0,2} (exists|is available|has updates)"
}

/// Generate scalar JSON values.
pub fn scalar_json_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        (-1.0e9..1.0e9_f64).prop_map(Value::from),
        "[a-zA-Z0-9 ]{0,12}".prop_map(Value::from),
    ]
}

/// Generate flat JSON objects with scalar fields.
pub fn json_object_strategy() -> impl Strategy<Value = Value> {
    prop::collection::btree_map("[a-z][a-z0-9]{0,8}", scalar_json_strategy(), 0..5)
        .prop_map(|fields| Value::Object(fields.into_iter().collect()))
}

/// Generate leaf matching rules.
pub fn match_rule_strategy() -> impl Strategy<Value = MatchRule> {
    prop_oneof![
        scalar_json_strategy().prop_map(MatchRule::equality),
        scalar_json_strategy().prop_map(MatchRule::like),
        "[A-Z]{2,5}".prop_map(|example| MatchRule::regex("[A-Z]{2,5}", example)),
        (-1.0e6..1.0e6_f64).prop_map(MatchRule::decimal),
        any::<i64>().prop_map(MatchRule::integer),
    ]
}

/// Generate message content templates up to a few levels deep.
pub fn template_strategy() -> impl Strategy<Value = Template> {
    match_rule_strategy()
        .prop_map(Template::from)
        .prop_recursive(3, 24, 4, |inner| {
            prop_oneof![
                prop::collection::btree_map("[a-z][a-zA-Z0-9]{0,8}", inner.clone(), 1..4)
                    .prop_map(Template::Object),
                prop::collection::vec(inner, 1..4).prop_map(Template::List),
            ]
        })
}

/// Generate metadata templates keyed by common transport attributes.
pub fn metadata_strategy() -> impl Strategy<Value = BTreeMap<String, Template>> {
    prop::collection::btree_map(
        prop_oneof![
            Just("contentType".to_string()),
            Just("routingKey".to_string()),
            Just("topic".to_string()),
            "[a-z][a-zA-Z0-9]{0,10}",
        ],
        prop_oneof![
            "[a-z][a-z/.-]{0,19}".prop_map(|value| Template::from(Value::from(value))),
            "[a-z][a-z/.-]{0,19}"
                .prop_map(|value| Template::from(MatchRule::like(Value::from(value)))),
        ],
        0..3,
    )
}

/// Generate whole contracts with unique interaction descriptions.
pub fn contract_strategy() -> impl Strategy<Value = Contract> {
    (
        participant_name_strategy(),
        participant_name_strategy(),
        prop::collection::btree_map(
            interaction_description_strategy(),
            (
                prop::option::of(provider_state_strategy()),
                metadata_strategy(),
                template_strategy(),
            ),
            0..4,
        ),
    )
        .prop_map(|(consumer, provider, interactions)| {
            let interactions = interactions
                .into_iter()
                .map(|(description, (state, metadata, contents))| {
                    let mut expected = ExpectedMessage::new(contents);
                    expected.metadata = metadata;
                    let mut interaction = Interaction::new(description, expected);
                    interaction.provider_state = state;
                    interaction
                })
                .collect();
            Contract {
                consumer: Participant::new(consumer),
                provider: Participant::new(provider),
                interactions,
                metadata: ArtifactMetadata::default(),
            }
        })
}

/// Generate content paths.
pub fn content_path_strategy() -> impl Strategy<Value = ContentPath> {
    prop::collection::vec(
        prop_oneof![
            "[a-z][a-zA-Z0-9_]{0,8}".prop_map(PathToken::Field),
            (0usize..5).prop_map(PathToken::Index),
            Just(PathToken::AnyIndex),
        ],
        0..4,
    )
    .prop_map(|tokens| {
        tokens
            .into_iter()
            .fold(ContentPath::root(), |path, token| match token {
                PathToken::Field(name) => path.field(name),
                PathToken::Index(i) => path.index(i),
                PathToken::AnyIndex => path.any_index(),
            })
    })
}
