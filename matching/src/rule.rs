//! Matching rules: the leaf constraints of the rule language.

use crate::template::Template;
use serde_json::{Number, Value};
use std::fmt;

/// Type classes a JSON value can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueClass {
    /// `null`
    Null,
    /// `true` / `false`
    Boolean,
    /// Any JSON number
    Number,
    /// A JSON string
    String,
    /// A JSON array
    Array,
    /// A JSON object
    Object,
}

impl ValueClass {
    /// Type class of a value.
    #[must_use]
    pub const fn of(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Boolean,
            Value::Number(_) => Self::Number,
            Value::String(_) => Self::String,
            Value::Array(_) => Self::Array,
            Value::Object(_) => Self::Object,
        }
    }

    /// Lowercase class name as used in mismatch reasons.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean => "boolean",
            Self::Number => "number",
            Self::String => "string",
            Self::Array => "array",
            Self::Object => "object",
        }
    }
}

impl fmt::Display for ValueClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A matching rule constraining one location in a message.
///
/// Every rule carries an example value; examples are projected into the
/// artifact's `contents` so the document reads as plain JSON.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchRule {
    /// Actual must deeply equal the example. Numeric comparison is
    /// decimal-exact, so `1` equals `1.0` but not `1.000001`.
    Equality(Value),
    /// Actual must share the example's type class.
    Type {
        /// Example value defining the expected class
        example: Value,
    },
    /// Actual must be a string fully matched by the pattern.
    Regex {
        /// Pattern, anchored at both ends during evaluation
        pattern: String,
        /// Example string satisfying the pattern
        example: String,
    },
    /// Actual must be numeric, integral or fractional.
    Decimal {
        /// Example number
        example: Number,
    },
    /// Actual must be an integral number.
    Integer {
        /// Example number
        example: Number,
    },
    /// Actual must be an array of at least `min` elements, every element
    /// matching the template.
    MinType {
        /// Minimum accepted length
        min: usize,
        /// Template each element must satisfy
        template: Box<Template>,
    },
}

impl MatchRule {
    /// Deep-equality rule on the example value.
    #[must_use]
    pub fn equality(example: impl Into<Value>) -> Self {
        Self::Equality(example.into())
    }

    /// Type-only rule: actual must share the example's type class.
    #[must_use]
    pub fn like(example: impl Into<Value>) -> Self {
        Self::Type {
            example: example.into(),
        }
    }

    /// Full-match regex rule with an example satisfying the pattern.
    #[must_use]
    pub fn regex(pattern: impl Into<String>, example: impl Into<String>) -> Self {
        Self::Regex {
            pattern: pattern.into(),
            example: example.into(),
        }
    }

    /// Any-numeric rule. A non-finite example falls back to zero.
    #[must_use]
    pub fn decimal(example: f64) -> Self {
        let example = Number::from_f64(example).unwrap_or_else(|| Number::from(0));
        Self::Decimal { example }
    }

    /// Integral-numeric rule.
    #[must_use]
    pub fn integer(example: i64) -> Self {
        Self::Integer {
            example: Number::from(example),
        }
    }

    /// Minimum-length array rule; every element must match the template.
    #[must_use]
    pub fn min_type(template: impl Into<Template>, min: usize) -> Self {
        Self::MinType {
            min,
            template: Box::new(template.into()),
        }
    }

    /// Example value this rule projects into artifact contents.
    ///
    /// `MinType` projects `max(min, 1)` copies of the element example so the
    /// array is never empty in the document.
    #[must_use]
    pub fn example(&self) -> Value {
        match self {
            Self::Equality(value) => value.clone(),
            Self::Type { example } => example.clone(),
            Self::Regex { example, .. } => Value::String(example.clone()),
            Self::Decimal { example } | Self::Integer { example } => {
                Value::Number(example.clone())
            }
            Self::MinType { min, template } => {
                let element = template.example();
                Value::Array(vec![element; (*min).max(1)])
            }
        }
    }
}

impl fmt::Display for MatchRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Equality(value) => write!(f, "equality({value})"),
            Self::Type { example } => write!(f, "type({})", ValueClass::of(example)),
            Self::Regex { pattern, .. } => write!(f, "regex({pattern})"),
            Self::Decimal { .. } => f.write_str("decimal"),
            Self::Integer { .. } => f.write_str("integer"),
            Self::MinType { min, .. } => write!(f, "array(min {min})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_value_class_names() {
        assert_eq!(ValueClass::of(&json!("AAPL")).to_string(), "string");
        assert_eq!(ValueClass::of(&json!(1.23)).to_string(), "number");
        assert_eq!(ValueClass::of(&json!([1, 2])).to_string(), "array");
        assert_eq!(ValueClass::of(&json!({"a": 1})).to_string(), "object");
        assert_eq!(ValueClass::of(&Value::Null).to_string(), "null");
    }

    #[test]
    fn test_rule_display() {
        assert_eq!(MatchRule::equality(json!("AAPL")).to_string(), "equality(\"AAPL\")");
        assert_eq!(MatchRule::like(json!("x")).to_string(), "type(string)");
        assert_eq!(MatchRule::regex("[0-9]+", "42").to_string(), "regex([0-9]+)");
        assert_eq!(MatchRule::decimal(1.23).to_string(), "decimal");
        assert_eq!(MatchRule::integer(7).to_string(), "integer");
        assert_eq!(
            MatchRule::min_type(Template::from(json!({"a": 1})), 2).to_string(),
            "array(min 2)"
        );
    }

    #[test]
    fn test_examples() {
        assert_eq!(MatchRule::like(json!("AAPL")).example(), json!("AAPL"));
        assert_eq!(MatchRule::regex("[A-Z]+", "AAPL").example(), json!("AAPL"));
        assert_eq!(MatchRule::decimal(1.23).example(), json!(1.23));
        assert_eq!(MatchRule::integer(42).example(), json!(42));
    }

    #[test]
    fn test_min_type_example_repeats_to_min() {
        let rule = MatchRule::min_type(Template::from(json!("tick")), 3);
        assert_eq!(rule.example(), json!(["tick", "tick", "tick"]));

        let zero_min = MatchRule::min_type(Template::from(json!("tick")), 0);
        assert_eq!(zero_min.example(), json!(["tick"]));
    }

    #[test]
    fn test_non_finite_decimal_example_falls_back() {
        assert_eq!(MatchRule::decimal(f64::NAN).example(), json!(0));
    }
}
