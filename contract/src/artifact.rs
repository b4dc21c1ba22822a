//! Artifact (de)serialization: the Pact-v3-style message document.
//!
//! `contents` carries the example-value projection of each template so the
//! artifact reads as plain JSON; `matchingRules` carries the annotations
//! under `body` and `metadata` categories keyed by content path. Equality is
//! the unannotated default.

use crate::error::{ContractError, ContractResult};
use crate::model::{ArtifactMetadata, Contract, ExpectedMessage, Interaction, Participant};
use msgpact_matching::{ContentPath, MatchRule, Template};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::warn;

#[derive(Debug, Serialize, Deserialize)]
struct ArtifactDoc {
    consumer: Participant,
    provider: Participant,
    messages: Vec<MessageDoc>,
    metadata: ArtifactMetadata,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MessageDoc {
    description: String,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    provider_states: Vec<ProviderStateDoc>,
    /// Legacy single-state field, accepted on read only.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    provider_state: Option<String>,
    #[serde(rename = "metaData", skip_serializing_if = "BTreeMap::is_empty", default)]
    metadata: BTreeMap<String, Value>,
    contents: Value,
    #[serde(skip_serializing_if = "RulesDoc::is_empty", default)]
    matching_rules: RulesDoc,
}

#[derive(Debug, Serialize, Deserialize)]
struct ProviderStateDoc {
    name: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct RulesDoc {
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    body: BTreeMap<String, MatcherListDoc>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    metadata: BTreeMap<String, MatcherListDoc>,
}

impl RulesDoc {
    fn is_empty(&self) -> bool {
        self.body.is_empty() && self.metadata.is_empty()
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct MatcherListDoc {
    matchers: Vec<MatcherDoc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct MatcherDoc {
    #[serde(rename = "match", skip_serializing_if = "Option::is_none", default)]
    kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    min: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    regex: Option<String>,
}

impl Contract {
    /// Serialize to the artifact document value.
    ///
    /// # Errors
    /// Returns [`ContractError::Json`] when the document cannot be built.
    pub fn to_artifact_json(&self) -> ContractResult<Value> {
        let doc = ArtifactDoc {
            consumer: self.consumer.clone(),
            provider: self.provider.clone(),
            messages: self.interactions.iter().map(message_doc).collect(),
            metadata: self.metadata.clone(),
        };
        Ok(serde_json::to_value(doc)?)
    }

    /// Render the artifact as pretty-printed JSON with a trailing newline.
    ///
    /// Output is byte-deterministic: all maps are ordered, so serializing
    /// the same contract always yields the same bytes.
    ///
    /// # Errors
    /// Returns [`ContractError::Json`] when the document cannot be built.
    pub fn to_artifact_string(&self) -> ContractResult<String> {
        let mut rendered = serde_json::to_string_pretty(&self.to_artifact_json()?)?;
        rendered.push('\n');
        Ok(rendered)
    }

    /// Parse a contract from artifact JSON text.
    ///
    /// # Errors
    /// Returns [`ContractError`] when the document is not valid JSON, does
    /// not follow the artifact structure, or holds inconsistent rules.
    pub fn from_artifact_str(input: &str) -> ContractResult<Self> {
        Self::from_artifact_json(serde_json::from_str(input)?)
    }

    /// Parse a contract from an artifact document value.
    ///
    /// Unknown matcher types degrade to literal equality on the example
    /// with a warning, so artifacts from newer writers stay verifiable.
    ///
    /// # Errors
    /// Returns [`ContractError`] when the document does not follow the
    /// artifact structure or holds inconsistent rules.
    pub fn from_artifact_json(value: Value) -> ContractResult<Self> {
        let doc: ArtifactDoc = serde_json::from_value(value)?;
        let mut contract = Self {
            consumer: doc.consumer,
            provider: doc.provider,
            interactions: Vec::new(),
            metadata: doc.metadata,
        };
        for message in doc.messages {
            contract.add_interaction(reify_message(message)?)?;
        }
        Ok(contract)
    }
}

fn message_doc(interaction: &Interaction) -> MessageDoc {
    let mut rules = RulesDoc::default();
    collect_rules(
        &interaction.expected.contents,
        &ContentPath::root(),
        &mut rules.body,
    );
    for (key, template) in &interaction.expected.metadata {
        collect_rules(template, &ContentPath::root().field(key), &mut rules.metadata);
    }
    MessageDoc {
        description: interaction.description.clone(),
        provider_states: interaction
            .provider_state
            .iter()
            .map(|name| ProviderStateDoc { name: name.clone() })
            .collect(),
        provider_state: None,
        metadata: interaction
            .expected
            .metadata
            .iter()
            .map(|(key, template)| (key.clone(), template.example()))
            .collect(),
        contents: interaction.expected.contents.example(),
        matching_rules: rules,
    }
}

fn collect_rules(
    template: &Template,
    path: &ContentPath,
    rules: &mut BTreeMap<String, MatcherListDoc>,
) {
    match template {
        Template::Rule(rule) => {
            let doc = match rule {
                // Unannotated: the example literal carries the expectation.
                MatchRule::Equality(_) => None,
                MatchRule::Type { .. } => Some(matcher("type", None, None)),
                MatchRule::Regex { pattern, .. } => {
                    Some(matcher("regex", None, Some(pattern.clone())))
                }
                MatchRule::Decimal { .. } => Some(matcher("decimal", None, None)),
                MatchRule::Integer { .. } => Some(matcher("integer", None, None)),
                MatchRule::MinType { min, template } => {
                    collect_rules(template, &path.any_index(), rules);
                    Some(matcher("type", Some(*min), None))
                }
            };
            if let Some(doc) = doc {
                rules.insert(path.to_string(), MatcherListDoc { matchers: vec![doc] });
            }
        }
        Template::Object(fields) => {
            for (key, field_template) in fields {
                collect_rules(field_template, &path.field(key), rules);
            }
        }
        Template::List(items) => {
            for (index, item_template) in items.iter().enumerate() {
                collect_rules(item_template, &path.index(index), rules);
            }
        }
    }
}

fn matcher(kind: &str, min: Option<usize>, regex: Option<String>) -> MatcherDoc {
    MatcherDoc {
        kind: Some(kind.to_string()),
        min,
        regex,
    }
}

fn reify_message(doc: MessageDoc) -> ContractResult<Interaction> {
    let body_rules = normalize_rules(&doc.matching_rules.body)?;
    let metadata_rules = normalize_rules(&doc.matching_rules.metadata)?;

    let contents = reify_template(&doc.contents, &ContentPath::root(), &body_rules)?;
    let mut metadata = BTreeMap::new();
    for (key, value) in &doc.metadata {
        let template = reify_template(value, &ContentPath::root().field(key), &metadata_rules)?;
        metadata.insert(key.clone(), template);
    }

    let provider_state = doc
        .provider_states
        .into_iter()
        .next()
        .map(|state| state.name)
        .or(doc.provider_state);

    Ok(Interaction {
        description: doc.description,
        provider_state,
        expected: ExpectedMessage { metadata, contents },
    })
}

/// Normalize rule keys to rendered path form. Keys without a `$` root are
/// treated as plain metadata key names. Only the first matcher of each
/// list is applied.
fn normalize_rules(
    docs: &BTreeMap<String, MatcherListDoc>,
) -> ContractResult<BTreeMap<String, MatcherDoc>> {
    let mut rules = BTreeMap::new();
    for (key, list) in docs {
        let path = if key.starts_with('$') {
            ContentPath::parse(key)
                .ok_or_else(|| ContractError::malformed(format!("invalid matching rule path: {key}")))?
        } else {
            ContentPath::root().field(key)
        };
        if let Some(first) = list.matchers.first() {
            rules.insert(path.to_string(), first.clone());
        }
    }
    Ok(rules)
}

fn reify_template(
    example: &Value,
    path: &ContentPath,
    rules: &BTreeMap<String, MatcherDoc>,
) -> ContractResult<Template> {
    if let Some(matcher) = lookup(rules, path) {
        if let Some(template) = apply_matcher(matcher, example, path, rules)? {
            return Ok(template);
        }
    }
    match example {
        Value::Object(map) => {
            let mut fields = BTreeMap::new();
            for (key, value) in map {
                fields.insert(key.clone(), reify_template(value, &path.field(key), rules)?);
            }
            Ok(Template::Object(fields))
        }
        Value::Array(items) => {
            let mut templates = Vec::with_capacity(items.len());
            for (index, value) in items.iter().enumerate() {
                templates.push(reify_template(value, &path.index(index), rules)?);
            }
            Ok(Template::List(templates))
        }
        scalar => Ok(Template::Rule(MatchRule::Equality(scalar.clone()))),
    }
}

fn lookup<'a>(
    rules: &'a BTreeMap<String, MatcherDoc>,
    path: &ContentPath,
) -> Option<&'a MatcherDoc> {
    rules
        .get(&path.to_string())
        .or_else(|| rules.get(&path.with_wildcard_indices().to_string()))
}

fn apply_matcher(
    matcher: &MatcherDoc,
    example: &Value,
    path: &ContentPath,
    rules: &BTreeMap<String, MatcherDoc>,
) -> ContractResult<Option<Template>> {
    match (matcher.kind.as_deref(), matcher.min) {
        (Some("type") | None, Some(min)) => {
            let Value::Array(items) = example else {
                return Err(ContractError::malformed(format!(
                    "min rule over non-array example at {path}"
                )));
            };
            let first = items.first().ok_or_else(|| {
                ContractError::malformed(format!("min rule over empty example array at {path}"))
            })?;
            let element = reify_template(first, &path.any_index(), rules)?;
            Ok(Some(Template::Rule(MatchRule::MinType {
                min,
                template: Box::new(element),
            })))
        }
        (Some("type"), None) => Ok(Some(Template::Rule(MatchRule::Type {
            example: example.clone(),
        }))),
        (Some("regex"), _) => {
            let pattern = matcher.regex.clone().ok_or_else(|| {
                ContractError::malformed(format!("regex matcher without pattern at {path}"))
            })?;
            let Value::String(example_str) = example else {
                return Err(ContractError::malformed(format!(
                    "regex matcher over non-string example at {path}"
                )));
            };
            Ok(Some(Template::Rule(MatchRule::Regex {
                pattern,
                example: example_str.clone(),
            })))
        }
        (Some("decimal" | "number"), _) => {
            let Value::Number(number) = example else {
                return Err(ContractError::malformed(format!(
                    "decimal matcher over non-numeric example at {path}"
                )));
            };
            Ok(Some(Template::Rule(MatchRule::Decimal {
                example: number.clone(),
            })))
        }
        (Some("integer"), _) => {
            let Value::Number(number) = example else {
                return Err(ContractError::malformed(format!(
                    "integer matcher over non-numeric example at {path}"
                )));
            };
            Ok(Some(Template::Rule(MatchRule::Integer {
                example: number.clone(),
            })))
        }
        (Some("equality"), _) => Ok(Some(Template::Rule(MatchRule::Equality(example.clone())))),
        (Some(unknown), _) => {
            warn!(matcher = %unknown, path = %path, "unknown matching rule type, treating as literal equality");
            Ok(None)
        }
        (None, None) => {
            warn!(path = %path, "matcher without a type, treating as literal equality");
            Ok(None)
        }
    }
}
