//! Template evaluation against actual message content.
//!
//! One pass collects every mismatch in the message: sibling paths are all
//! visited even after a failure, while a failed path itself is not descended
//! further (a type-class failure already explains everything below it).

use crate::mismatch::Mismatch;
use crate::path::ContentPath;
use crate::rule::{MatchRule, ValueClass};
use crate::template::Template;
use regex::Regex;
use serde_json::{Number, Value};
use std::collections::BTreeMap;

/// Evaluate a content template against an actual value.
///
/// Returns every mismatch found; an empty vec means the content matches.
#[must_use]
pub fn match_template(template: &Template, actual: &Value) -> Vec<Mismatch> {
    let mut mismatches = Vec::new();
    eval_template(template, actual, &ContentPath::root(), &mut mismatches);
    mismatches
}

/// Evaluate expected metadata against actual metadata.
///
/// Metadata matches openly: actual keys without an expectation are ignored.
#[must_use]
pub fn match_metadata(
    expected: &BTreeMap<String, Template>,
    actual: &BTreeMap<String, Value>,
) -> Vec<Mismatch> {
    match_metadata_at(expected, actual, &ContentPath::root())
}

/// Evaluate expected metadata with mismatch paths rooted at `root`.
///
/// Batch verification roots each message's metadata at its position, so a
/// failure in the third message reports under `$[2]`.
#[must_use]
pub fn match_metadata_at(
    expected: &BTreeMap<String, Template>,
    actual: &BTreeMap<String, Value>,
    root: &ContentPath,
) -> Vec<Mismatch> {
    let mut mismatches = Vec::new();
    for (key, template) in expected {
        let path = root.field(key);
        match actual.get(key) {
            Some(value) => eval_template(template, value, &path, &mut mismatches),
            None => mismatches.push(Mismatch::new(
                path.to_string(),
                expected_label(template),
                Value::Null,
                "missing field",
            )),
        }
    }
    mismatches
}

fn eval_template(template: &Template, actual: &Value, path: &ContentPath, out: &mut Vec<Mismatch>) {
    match template {
        Template::Rule(rule) => eval_rule(rule, actual, path, out),
        Template::Object(fields) => {
            let Value::Object(map) = actual else {
                out.push(type_mismatch(path, "object", ValueClass::Object, actual));
                return;
            };
            for (key, field_template) in fields {
                let child = path.field(key);
                match map.get(key) {
                    Some(value) => eval_template(field_template, value, &child, out),
                    None => out.push(Mismatch::new(
                        child.to_string(),
                        expected_label(field_template),
                        Value::Null,
                        "missing field",
                    )),
                }
            }
        }
        Template::List(items) => {
            let Value::Array(elements) = actual else {
                out.push(type_mismatch(
                    path,
                    expected_label(template),
                    ValueClass::Array,
                    actual,
                ));
                return;
            };
            if elements.len() != items.len() {
                out.push(Mismatch::new(
                    path.to_string(),
                    expected_label(template),
                    actual.clone(),
                    format!(
                        "array length {} != expected {}",
                        elements.len(),
                        items.len()
                    ),
                ));
            }
            for (index, (item_template, element)) in items.iter().zip(elements).enumerate() {
                eval_template(item_template, element, &path.index(index), out);
            }
        }
    }
}

fn eval_rule(rule: &MatchRule, actual: &Value, path: &ContentPath, out: &mut Vec<Mismatch>) {
    match rule {
        MatchRule::Equality(expected) => {
            if !values_equal(expected, actual) {
                out.push(Mismatch::new(
                    path.to_string(),
                    rule.to_string(),
                    actual.clone(),
                    "value mismatch",
                ));
            }
        }
        MatchRule::Type { example } => {
            let expected = ValueClass::of(example);
            if expected != ValueClass::of(actual) {
                out.push(type_mismatch(path, rule.to_string(), expected, actual));
            }
        }
        MatchRule::Regex { pattern, .. } => {
            let Value::String(actual_str) = actual else {
                out.push(type_mismatch(path, rule.to_string(), ValueClass::String, actual));
                return;
            };
            // Anchored: the rule is a full match, not a substring search.
            match Regex::new(&format!("^(?:{pattern})$")) {
                Ok(regex) => {
                    if !regex.is_match(actual_str) {
                        out.push(Mismatch::new(
                            path.to_string(),
                            rule.to_string(),
                            actual.clone(),
                            "regex mismatch",
                        ));
                    }
                }
                Err(_) => out.push(Mismatch::new(
                    path.to_string(),
                    rule.to_string(),
                    actual.clone(),
                    "invalid regex pattern",
                )),
            }
        }
        MatchRule::Decimal { .. } => {
            if !actual.is_number() {
                out.push(type_mismatch(path, rule.to_string(), ValueClass::Number, actual));
            }
        }
        MatchRule::Integer { .. } => match actual {
            Value::Number(number) if number.is_i64() || number.is_u64() => {}
            Value::Number(_) => out.push(Mismatch::new(
                path.to_string(),
                rule.to_string(),
                actual.clone(),
                "integer mismatch: value has a fractional part",
            )),
            _ => out.push(type_mismatch(path, rule.to_string(), ValueClass::Number, actual)),
        },
        MatchRule::MinType { min, template } => {
            let Value::Array(elements) = actual else {
                out.push(type_mismatch(path, rule.to_string(), ValueClass::Array, actual));
                return;
            };
            if elements.len() < *min {
                out.push(Mismatch::new(
                    path.to_string(),
                    rule.to_string(),
                    actual.clone(),
                    format!("array length {} < required {min}", elements.len()),
                ));
            }
            for (index, element) in elements.iter().enumerate() {
                eval_template(template, element, &path.index(index), out);
            }
        }
    }
}

fn type_mismatch(
    path: &ContentPath,
    expected_rule: impl Into<String>,
    expected: ValueClass,
    actual: &Value,
) -> Mismatch {
    Mismatch::new(
        path.to_string(),
        expected_rule,
        actual.clone(),
        format!(
            "type mismatch: expected {expected}, got {}",
            ValueClass::of(actual)
        ),
    )
}

fn expected_label(template: &Template) -> String {
    match template {
        Template::Rule(rule) => rule.to_string(),
        Template::Object(_) => "object".to_string(),
        Template::List(items) => format!("array of {}", items.len()),
    }
}

/// Deep equality with decimal-exact numeric comparison. Objects compare
/// closed here: equality means the same key set, unlike open template
/// matching.
fn values_equal(expected: &Value, actual: &Value) -> bool {
    match (expected, actual) {
        (Value::Number(e), Value::Number(a)) => numbers_equal(e, a),
        (Value::Array(e), Value::Array(a)) => {
            e.len() == a.len() && e.iter().zip(a).all(|(x, y)| values_equal(x, y))
        }
        (Value::Object(e), Value::Object(a)) => {
            e.len() == a.len()
                && e.iter()
                    .all(|(key, value)| a.get(key).is_some_and(|other| values_equal(value, other)))
        }
        _ => expected == actual,
    }
}

// Exact comparison is the rule semantics; no epsilon.
#[allow(clippy::float_cmp)]
fn numbers_equal(expected: &Number, actual: &Number) -> bool {
    match (as_integer(expected), as_integer(actual)) {
        (Some(e), Some(a)) => e == a,
        (Some(int), None) => float_equals_integer(actual, int),
        (None, Some(int)) => float_equals_integer(expected, int),
        (None, None) => match (expected.as_f64(), actual.as_f64()) {
            (Some(e), Some(a)) => e == a,
            _ => false,
        },
    }
}

fn as_integer(number: &Number) -> Option<i128> {
    if let Some(signed) = number.as_i64() {
        return Some(i128::from(signed));
    }
    number.as_u64().map(i128::from)
}

// Integers past 2^53 have no exact f64 representation, so a float can
// only equal an integer inside that range.
#[allow(clippy::cast_precision_loss, clippy::float_cmp)]
fn float_equals_integer(float: &Number, int: i128) -> bool {
    const LOSSLESS: i128 = 1 << 53;
    if !(-LOSSLESS..=LOSSLESS).contains(&int) {
        return false;
    }
    float
        .as_f64()
        .is_some_and(|value| value.fract() == 0.0 && value == int as f64)
}
