//! Templates: structural composition of matching rules.

use crate::rule::MatchRule;
use serde_json::Value;
use std::collections::BTreeMap;

/// Expected shape of message content or a metadata value.
///
/// A template is a tree whose leaves are [`MatchRule`]s. Object templates
/// match openly: listed fields must be present and satisfy their templates,
/// extra actual fields are ignored. List templates match closed: exact
/// length, element by position.
#[derive(Debug, Clone, PartialEq)]
pub enum Template {
    /// Single rule at this location
    Rule(MatchRule),
    /// Open object template
    Object(BTreeMap<String, Template>),
    /// Closed positional list template
    List(Vec<Template>),
}

impl Template {
    /// Object template from field/template pairs.
    #[must_use]
    pub fn object<K, V, I>(fields: I) -> Self
    where
        K: Into<String>,
        V: Into<Self>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self::Object(
            fields
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }

    /// Closed list template from element templates.
    #[must_use]
    pub fn list<V, I>(items: I) -> Self
    where
        V: Into<Self>,
        I: IntoIterator<Item = V>,
    {
        Self::List(items.into_iter().map(Into::into).collect())
    }

    /// Project the example-value tree this template describes.
    #[must_use]
    pub fn example(&self) -> Value {
        match self {
            Self::Rule(rule) => rule.example(),
            Self::Object(fields) => Value::Object(
                fields
                    .iter()
                    .map(|(key, template)| (key.clone(), template.example()))
                    .collect(),
            ),
            Self::List(items) => Value::Array(items.iter().map(Self::example).collect()),
        }
    }

    /// Whether this template can only be satisfied by an array.
    ///
    /// Drives batch aggregation: a multi-message trigger result is matched
    /// as one array only when the expected content is array shaped.
    #[must_use]
    pub fn expects_array(&self) -> bool {
        match self {
            Self::List(_) => true,
            Self::Object(_) => false,
            Self::Rule(rule) => matches!(
                rule,
                MatchRule::MinType { .. }
                    | MatchRule::Type {
                        example: Value::Array(_)
                    }
                    | MatchRule::Equality(Value::Array(_))
            ),
        }
    }
}

impl From<MatchRule> for Template {
    fn from(rule: MatchRule) -> Self {
        Self::Rule(rule)
    }
}

/// Literal values decompose structurally: objects become open object
/// templates, arrays become closed lists, scalars become equality rules.
impl From<Value> for Template {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => Self::Object(
                map.into_iter()
                    .map(|(key, value)| (key, Self::from(value)))
                    .collect(),
            ),
            Value::Array(items) => Self::List(items.into_iter().map(Self::from).collect()),
            scalar => Self::Rule(MatchRule::Equality(scalar)),
        }
    }
}

impl From<&str> for Template {
    fn from(value: &str) -> Self {
        Self::from(Value::from(value))
    }
}

impl From<String> for Template {
    fn from(value: String) -> Self {
        Self::from(Value::from(value))
    }
}

impl From<bool> for Template {
    fn from(value: bool) -> Self {
        Self::from(Value::from(value))
    }
}

impl From<i64> for Template {
    fn from(value: i64) -> Self {
        Self::from(Value::from(value))
    }
}

impl From<u64> for Template {
    fn from(value: u64) -> Self {
        Self::from(Value::from(value))
    }
}

impl From<f64> for Template {
    fn from(value: f64) -> Self {
        Self::from(Value::from(value))
    }
}
