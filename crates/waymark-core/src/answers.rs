//! Answers: the flat question-id → value map collected by the flow.
//!
//! Keys are not declared up front; any string is a legal question id. Values
//! are kept exactly as submitted and interpreted lazily by the helpers below.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Sentinel value recorded for an affirmative single-choice answer.
pub const AFFIRMATIVE: &str = "yes";

/// The answers given so far for one case.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Answers(BTreeMap<String, String>);

/// A single persisted answer row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
  pub question_id: String,
  pub value:       String,
}

impl Answer {
  pub fn new(question_id: impl Into<String>, value: impl Into<String>) -> Self {
    Self { question_id: question_id.into(), value: value.into() }
  }
}

impl Answers {
  pub fn new() -> Self { Self::default() }

  pub fn len(&self) -> usize { self.0.len() }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }

  /// Whether `id` has been answered at all, whatever the value.
  pub fn contains(&self, id: &str) -> bool { self.0.contains_key(id) }

  pub fn get(&self, id: &str) -> Option<&str> { self.0.get(id).map(String::as_str) }

  pub fn insert(
    &mut self,
    id: impl Into<String>,
    value: impl Into<String>,
  ) -> Option<String> {
    self.0.insert(id.into(), value.into())
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
    self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
  }

  /// The raw value, or the empty string when unanswered.
  pub fn text(&self, id: &str) -> &str { self.get(id).unwrap_or_default() }

  /// Trimmed, ASCII case-insensitive comparison against `expected`.
  pub fn equals(&self, id: &str, expected: &str) -> bool {
    self
      .get(id)
      .is_some_and(|v| v.trim().eq_ignore_ascii_case(expected))
  }

  /// Whether `id` was answered with the affirmative sentinel.
  pub fn is_yes(&self, id: &str) -> bool { self.equals(id, AFFIRMATIVE) }

  /// Numeric value of `id`; missing or malformed input reads as zero.
  pub fn number(&self, id: &str) -> f64 { parse_number(self.text(id)) }

  /// Like [`Answers::number`], but `None` when a non-blank value does not
  /// parse. Missing or blank input still reads as zero.
  pub fn number_opt(&self, id: &str) -> Option<f64> {
    let raw = self.text(id).trim();
    if raw.is_empty() {
      return Some(0.0);
    }
    raw.parse::<f64>().ok().filter(|n| n.is_finite())
  }
}

/// Parse-or-zero: a finite decimal after trimming, otherwise `0.0`.
pub fn parse_number(raw: &str) -> f64 {
  raw
    .trim()
    .parse::<f64>()
    .ok()
    .filter(|n| n.is_finite())
    .unwrap_or(0.0)
}

impl<K, V> FromIterator<(K, V)> for Answers
where
  K: Into<String>,
  V: Into<String>,
{
  fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
    Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
  }
}

impl FromIterator<Answer> for Answers {
  fn from_iter<I: IntoIterator<Item = Answer>>(iter: I) -> Self {
    Self(iter.into_iter().map(|a| (a.question_id, a.value)).collect())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn malformed_numbers_read_as_zero() {
    assert_eq!(parse_number("4"), 4.0);
    assert_eq!(parse_number(" 2.5 "), 2.5);
    assert_eq!(parse_number(""), 0.0);
    assert_eq!(parse_number("three"), 0.0);
    assert_eq!(parse_number("NaN"), 0.0);
    assert_eq!(parse_number("inf"), 0.0);
  }

  #[test]
  fn strict_numbers_distinguish_blank_from_malformed() {
    let a: Answers = [("blank", "  "), ("bad", "a while"), ("ok", "2")]
      .into_iter()
      .collect();
    assert_eq!(a.number_opt("missing"), Some(0.0));
    assert_eq!(a.number_opt("blank"), Some(0.0));
    assert_eq!(a.number_opt("ok"), Some(2.0));
    assert_eq!(a.number_opt("bad"), None);
    assert_eq!(a.number("bad"), 0.0);
  }

  #[test]
  fn yes_is_trimmed_and_case_insensitive() {
    let a: Answers = [("x", " YES "), ("y", "no")].into_iter().collect();
    assert!(a.is_yes("x"));
    assert!(!a.is_yes("y"));
    assert!(!a.is_yes("missing"));
  }

  #[test]
  fn serializes_as_a_plain_object() {
    let a: Answers = [("situation", "vpf")].into_iter().collect();
    assert_eq!(
      serde_json::to_string(&a).unwrap(),
      r#"{"situation":"vpf"}"#
    );
  }
}
