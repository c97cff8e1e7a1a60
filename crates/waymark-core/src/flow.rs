//! Question flow selector.
//!
//! The questionnaire is a fixed base sequence followed by the sequence of the
//! branch picked by the `situation` answer. The next question is always the
//! first id of the applicable sequence that has no answer yet, excluding
//! questions switched off by the skip table.

use serde::{Deserialize, Serialize};

use crate::{
  answers::{Answer, Answers},
  case::Locale,
  labels,
};

// ─── Question ids ────────────────────────────────────────────────────────────

pub mod ids {
  pub const SITUATION: &str = "situation";
  pub const YEARS_IN_FRANCE: &str = "years_in_france";
  pub const HAS_CHILDREN: &str = "has_children";

  pub const ASYLUM_DOMICILIATION: &str = "asylum_domiciliation";
  pub const ASYLUM_OFII_ORIENTATION: &str = "asylum_ofii_orientation";
  pub const ASYLUM_LANGUAGE: &str = "asylum_language";
  pub const ASYLUM_INTERPRETER: &str = "asylum_interpreter";
  pub const ASYLUM_DUBLIN: &str = "asylum_dublin";
  pub const ASYLUM_OFPRA_FILED: &str = "asylum_ofpra_filed";
  pub const ASYLUM_DELAY_MONTHS: &str = "asylum_delay_months";
  pub const ASYLUM_OFPRA_DECISION: &str = "asylum_ofpra_decision";
  pub const ASYLUM_CNDA_APPEAL: &str = "asylum_cnda_appeal";
  pub const ASYLUM_VULNERABLE: &str = "asylum_vulnerable";
  pub const ASYLUM_EVIDENCE_READY: &str = "asylum_evidence_ready";

  pub const WORK_HAS_OFFER: &str = "work_has_offer";
  pub const WORK_YEARS_WORKED: &str = "work_years_worked";
  pub const WORK_TAXES_PAID: &str = "work_taxes_paid";
  pub const WORK_DEPARTMENT: &str = "work_department";
  pub const WORK_JOB_SECTOR: &str = "work_job_sector";
  pub const WORK_TENSION_GUESS: &str = "work_tension_guess";
}

use ids::*;

// ─── Sequences ───────────────────────────────────────────────────────────────

const BASE_SEQUENCE: &[&str] = &[SITUATION, YEARS_IN_FRANCE, HAS_CHILDREN];

const ASYLUM_SEQUENCE: &[&str] = &[
  ASYLUM_DOMICILIATION,
  ASYLUM_OFII_ORIENTATION,
  ASYLUM_LANGUAGE,
  ASYLUM_INTERPRETER,
  ASYLUM_DUBLIN,
  ASYLUM_OFPRA_FILED,
  ASYLUM_DELAY_MONTHS,
  ASYLUM_OFPRA_DECISION,
  ASYLUM_CNDA_APPEAL,
  ASYLUM_VULNERABLE,
  ASYLUM_EVIDENCE_READY,
];

const EMPLOYMENT_SEQUENCE: &[&str] = &[
  WORK_HAS_OFFER,
  WORK_YEARS_WORKED,
  WORK_TAXES_PAID,
  WORK_DEPARTMENT,
  WORK_JOB_SECTOR,
  WORK_TENSION_GUESS,
];

/// A question dropped from the flow when `prerequisite` was answered with
/// `trigger`.
struct Skip {
  question:     &'static str,
  prerequisite: &'static str,
  trigger:      &'static str,
}

const SKIPS: &[Skip] = &[
  Skip {
    question:     ASYLUM_OFPRA_DECISION,
    prerequisite: ASYLUM_OFPRA_FILED,
    trigger:      "no",
  },
  Skip {
    question:     ASYLUM_CNDA_APPEAL,
    prerequisite: ASYLUM_OFPRA_FILED,
    trigger:      "no",
  },
];

const NO_CHOICES: &[&str] = &[];
const YES_NO_CHOICES: &[&str] = &["yes", "no"];
const SITUATION_CHOICES: &[&str] = &["asile", "vpf", "travail"];
const OFPRA_DECISION_CHOICES: &[&str] = &["pending", "refused", "none"];
const TENSION_CHOICES: &[&str] = &["yes", "no", "unknown"];

// ─── Branch ──────────────────────────────────────────────────────────────────

/// The branch chosen by the `situation` answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Branch {
  /// `asile`
  Asylum,
  /// `vpf`
  FamilyLife,
  /// `travail`
  Employment,
}

impl Branch {
  /// Read the branch selector; `None` when absent or unrecognised.
  pub fn from_answers(answers: &Answers) -> Option<Self> {
    let raw = answers.text(SITUATION).trim();
    if raw.eq_ignore_ascii_case("asile") {
      Some(Self::Asylum)
    } else if raw.eq_ignore_ascii_case("vpf") {
      Some(Self::FamilyLife)
    } else if raw.eq_ignore_ascii_case("travail") {
      Some(Self::Employment)
    } else {
      None
    }
  }

  /// The value stored in the `situation` answer for this branch.
  pub fn selector_value(self) -> &'static str {
    match self {
      Self::Asylum => "asile",
      Self::FamilyLife => "vpf",
      Self::Employment => "travail",
    }
  }

  fn sequence(self) -> &'static [&'static str] {
    match self {
      Self::Asylum => ASYLUM_SEQUENCE,
      Self::FamilyLife => &[],
      Self::Employment => EMPLOYMENT_SEQUENCE,
    }
  }
}

// ─── Question descriptor ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
  SingleChoice,
  Number,
  Text,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceOption {
  pub value: String,
  pub label: String,
}

/// What the client needs to render one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
  pub id:      String,
  pub kind:    QuestionKind,
  pub label:   String,
  /// Ordered choices; empty unless `kind` is `SingleChoice`.
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub options: Vec<ChoiceOption>,
}

// ─── Selector ────────────────────────────────────────────────────────────────

fn is_skipped(id: &str, answers: &Answers) -> bool {
  SKIPS
    .iter()
    .any(|s| s.question == id && answers.equals(s.prerequisite, s.trigger))
}

/// Every question id that applies given `answers`, in presentation order.
///
/// The branch part only appears once the branch selector has been answered.
pub fn applicable_sequence(answers: &Answers) -> Vec<&'static str> {
  let branch = Branch::from_answers(answers)
    .map(Branch::sequence)
    .unwrap_or_default();

  BASE_SEQUENCE
    .iter()
    .chain(branch)
    .copied()
    .filter(|id| !is_skipped(id, answers))
    .collect()
}

/// Id of the next unanswered question, or `None` when the flow is complete.
pub fn next_question_id(answers: &Answers) -> Option<&'static str> {
  // The base sequence must be complete before the branch is consulted.
  if let Some(id) = BASE_SEQUENCE.iter().copied().find(|id| !answers.contains(id)) {
    return Some(id);
  }
  applicable_sequence(answers)
    .into_iter()
    .find(|id| !answers.contains(id))
}

/// The next question to present, localized, or `None` at the end of the flow.
pub fn next_question(answers: &Answers, locale: Locale) -> Option<Question> {
  next_question_id(answers).map(|id| question(id, locale))
}

/// Build the descriptor for `id`. Unknown ids become free-text questions
/// labelled with their own id.
pub fn question(id: &str, locale: Locale) -> Question {
  let (kind, choices) = match id {
    SITUATION => (QuestionKind::SingleChoice, SITUATION_CHOICES),
    YEARS_IN_FRANCE | ASYLUM_DELAY_MONTHS | WORK_YEARS_WORKED => {
      (QuestionKind::Number, NO_CHOICES)
    }
    ASYLUM_OFPRA_DECISION => (QuestionKind::SingleChoice, OFPRA_DECISION_CHOICES),
    WORK_TENSION_GUESS => (QuestionKind::SingleChoice, TENSION_CHOICES),
    HAS_CHILDREN
    | ASYLUM_DOMICILIATION
    | ASYLUM_OFII_ORIENTATION
    | ASYLUM_INTERPRETER
    | ASYLUM_DUBLIN
    | ASYLUM_OFPRA_FILED
    | ASYLUM_CNDA_APPEAL
    | ASYLUM_VULNERABLE
    | ASYLUM_EVIDENCE_READY
    | WORK_HAS_OFFER
    | WORK_TAXES_PAID => (QuestionKind::SingleChoice, YES_NO_CHOICES),
    // ASYLUM_LANGUAGE, WORK_DEPARTMENT, WORK_JOB_SECTOR and unknown ids
    _ => (QuestionKind::Text, NO_CHOICES),
  };

  Question {
    id: id.to_owned(),
    kind,
    label: labels::question(id, locale).unwrap_or(id).to_owned(),
    options: choices
      .iter()
      .map(|&value| ChoiceOption {
        value: value.to_owned(),
        label: labels::choice(id, value, locale).unwrap_or(value).to_owned(),
      })
      .collect(),
  }
}

/// Answers in presentation order: flow questions first, then any other keys
/// alphabetically.
pub fn ordered_answers(answers: &Answers) -> Vec<Answer> {
  let sequence = applicable_sequence(answers);
  let mut ordered: Vec<Answer> = sequence
    .iter()
    .filter_map(|id| answers.get(id).map(|v| Answer::new(*id, v)))
    .collect();

  ordered.extend(
    answers
      .iter()
      .filter(|(id, _)| !sequence.iter().any(|s| s == id))
      .map(|(id, v)| Answer::new(id, v)),
  );
  ordered
}
