//! Eligibility evaluator.
//!
//! Maps a set of answers to a [`Decision`]. Each [`Branch`] owns an ordered
//! table of `(condition, pathway)` rules; the first condition that holds
//! decides the outcome, and a branch-level fallback covers everything else.
//! Answers without a recognised branch selector get [`Pathway::Incomplete`].
//!
//! Evaluation is pure and total: numeric answers are parse-or-zero and no
//! input makes it fail.

use serde::{Deserialize, Serialize};
use strum::IntoStaticStr;

use crate::{
  answers::Answers,
  decision::Decision,
  flow::{Branch, ids::*},
};

// ─── Thresholds ──────────────────────────────────────────────────────────────

/// Every numeric cut-off used by the rule tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
  /// Maximum months between entry and filing that still count as timely.
  pub asylum_timely_filing_months: f64,
  /// Minimum years of residence for the parent-of-schooled-child pathway.
  pub family_min_years_in_france:  f64,
  /// Minimum years worked for the reinforced employment pathway without a
  /// shortage occupation.
  pub employment_min_years_worked: f64,
}

impl Default for Thresholds {
  fn default() -> Self {
    Self {
      asylum_timely_filing_months: 3.0,
      family_min_years_in_france:  5.0,
      employment_min_years_worked: 3.0,
    }
  }
}

// ─── Pathways ────────────────────────────────────────────────────────────────

/// Every terminal outcome of the evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Pathway {
  AsylumDublin,
  AsylumRegisterThenFile,
  AsylumLateFiling,
  AsylumUnderReview,
  AsylumCndaAppeal,
  AsylumRefused,
  AsylumFollowUp,

  FamilyParentOfSchooledChild,
  FamilyCaseByCase,

  EmploymentReinforced,
  EmploymentOfferToConsolidate,
  EmploymentNoOffer,

  Incomplete,
}

impl Pathway {
  /// Stable machine key, used in logs.
  pub fn key(self) -> &'static str { self.into() }

  pub fn label(self) -> &'static str {
    match self {
      Self::AsylumDublin => "Asylum: Dublin procedure",
      Self::AsylumRegisterThenFile => {
        "Asylum: register at the single desk, then file with OFPRA"
      }
      Self::AsylumLateFiling => "Asylum: late filing, justification required",
      Self::AsylumUnderReview => "Asylum: OFPRA review in progress",
      Self::AsylumCndaAppeal => "Asylum: appeal before the CNDA",
      Self::AsylumRefused => "Asylum: OFPRA rejection, check appeal deadlines",
      Self::AsylumFollowUp => "Asylum: procedure follow-up",
      Self::FamilyParentOfSchooledChild => {
        "Private and family life: parent of a schooled child"
      }
      Self::FamilyCaseByCase => "Private and family life: case-by-case review",
      Self::EmploymentReinforced => {
        "Employment: reinforced regularisation through work"
      }
      Self::EmploymentOfferToConsolidate => {
        "Employment: job offer, file to consolidate"
      }
      Self::EmploymentNoOffer => "Employment: no offer yet, prepare a file",
      Self::Incomplete => "General orientation: incomplete answers",
    }
  }

  pub fn citations(self) -> &'static [&'static str] {
    match self {
      Self::AsylumDublin => &[
        "Regulation (EU) No 604/2013 (Dublin III) determines the Member State responsible for the claim.",
        "Keep every notification received together with the date it was handed over.",
      ],
      Self::AsylumRegisterThenFile => &[
        "Register at the single reception desk (GUDA) of the prefecture.",
        "File the application with OFPRA within 21 days of registration.",
        "Keep a domiciliation address for all notifications.",
        "Contact OFII about reception conditions (CMA).",
      ],
      Self::AsylumLateFiling => &[
        "Explain the delay between entry and filing: obstacles, vulnerabilities.",
        "Report any vulnerability so that it is taken into account.",
      ],
      Self::AsylumUnderReview => &[
        "Keep the domiciliation address up to date.",
        "Ask for an interpreter at the interview if needed.",
        "Complete the personal account and the supporting documents.",
      ],
      Self::AsylumCndaAppeal => &[
        "Respect the appeal deadline, generally one month from notification.",
        "Prepare a written statement and evidence; legal assistance is recommended.",
      ],
      Self::AsylumRefused => &[
        "Check whether the CNDA appeal deadline is still open.",
        "Otherwise consider a re-examination request or another route.",
      ],
      Self::AsylumFollowUp => &[
        "Obtain or update the domiciliation address.",
        "Stay in contact with OFII.",
      ],
      Self::FamilyParentOfSchooledChild => &[
        "Prefecture: evidence of stable presence, schooling of the children and resources where possible.",
      ],
      Self::FamilyCaseByCase => &[
        "Ties assessed: length of stay, family links, integration, resources.",
      ],
      Self::EmploymentReinforced => &[
        "Job offer or promise of employment together with evidence of experience.",
        "A shortage occupation in the department is an asset; check the prefecture list.",
        "Tax notices and payslips strengthen the file.",
      ],
      Self::EmploymentOfferToConsolidate => &[
        "Gather evidence of activity: contracts, payslips where available.",
        "Check whether the occupation is in shortage in the department.",
        "Any tax or social security record helps the file.",
      ],
      Self::EmploymentNoOffer => &[
        "Identify shortage sectors in the department.",
        "Build up the record: evidence of experience, training, references.",
      ],
      Self::Incomplete => &[
        "Complete the questionnaire for a more precise orientation.",
      ],
    }
  }
}

impl From<Pathway> for Decision {
  fn from(p: Pathway) -> Self {
    Decision {
      pathway:   p.label().to_owned(),
      citations: p.citations().iter().map(|c| (*c).to_owned()).collect(),
    }
  }
}

// ─── Rule tables ─────────────────────────────────────────────────────────────

/// One row of a branch table: if `when` holds, the outcome is `then`.
struct Rule {
  when: fn(&Answers, &Thresholds) -> bool,
  then: Pathway,
}

fn asylum_filed(a: &Answers) -> bool { a.is_yes(ASYLUM_OFPRA_FILED) }

fn asylum_refused(a: &Answers) -> bool {
  a.equals(ASYLUM_OFPRA_DECISION, "refused")
}

const ASYLUM_RULES: &[Rule] = &[
  Rule {
    when: |a, _| a.is_yes(ASYLUM_DUBLIN),
    then: Pathway::AsylumDublin,
  },
  Rule {
    when: |a, t| {
      // An unparseable delay never counts as timely.
      !asylum_filed(a)
        && a
          .number_opt(ASYLUM_DELAY_MONTHS)
          .is_some_and(|m| m <= t.asylum_timely_filing_months)
    },
    then: Pathway::AsylumRegisterThenFile,
  },
  Rule {
    when: |a, _| !asylum_filed(a),
    then: Pathway::AsylumLateFiling,
  },
  Rule {
    when: |a, _| a.equals(ASYLUM_OFPRA_DECISION, "pending"),
    then: Pathway::AsylumUnderReview,
  },
  Rule {
    when: |a, _| asylum_refused(a) && a.is_yes(ASYLUM_CNDA_APPEAL),
    then: Pathway::AsylumCndaAppeal,
  },
  Rule {
    when: |a, _| asylum_refused(a),
    then: Pathway::AsylumRefused,
  },
];

const FAMILY_RULES: &[Rule] = &[Rule {
  when: |a, t| {
    a.is_yes(HAS_CHILDREN)
      && a.number(YEARS_IN_FRANCE) >= t.family_min_years_in_france
  },
  then: Pathway::FamilyParentOfSchooledChild,
}];

const EMPLOYMENT_RULES: &[Rule] = &[
  Rule {
    when: |a, _| a.is_yes(WORK_HAS_OFFER) && a.is_yes(WORK_TENSION_GUESS),
    then: Pathway::EmploymentReinforced,
  },
  Rule {
    when: |a, t| {
      a.is_yes(WORK_HAS_OFFER)
        && a.number(WORK_YEARS_WORKED) >= t.employment_min_years_worked
        && a.is_yes(WORK_TAXES_PAID)
    },
    then: Pathway::EmploymentReinforced,
  },
  Rule {
    when: |a, _| a.is_yes(WORK_HAS_OFFER),
    then: Pathway::EmploymentOfferToConsolidate,
  },
];

fn rules(branch: Branch) -> &'static [Rule] {
  match branch {
    Branch::Asylum => ASYLUM_RULES,
    Branch::FamilyLife => FAMILY_RULES,
    Branch::Employment => EMPLOYMENT_RULES,
  }
}

fn fallback(branch: Branch) -> Pathway {
  match branch {
    Branch::Asylum => Pathway::AsylumFollowUp,
    Branch::FamilyLife => Pathway::FamilyCaseByCase,
    Branch::Employment => Pathway::EmploymentNoOffer,
  }
}

// ─── Evaluation ──────────────────────────────────────────────────────────────

/// Select the pathway for `answers`: first matching rule of the branch table.
pub fn select(answers: &Answers, thresholds: &Thresholds) -> Pathway {
  let Some(branch) = Branch::from_answers(answers) else {
    return Pathway::Incomplete;
  };

  rules(branch)
    .iter()
    .find(|rule| (rule.when)(answers, thresholds))
    .map_or_else(|| fallback(branch), |rule| rule.then)
}

/// Evaluate `answers` into a [`Decision`].
pub fn evaluate(answers: &Answers, thresholds: &Thresholds) -> Decision {
  select(answers, thresholds).into()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn answers(pairs: &[(&str, &str)]) -> Answers {
    pairs.iter().copied().collect()
  }

  fn pathway(pairs: &[(&str, &str)]) -> Pathway {
    select(&answers(pairs), &Thresholds::default())
  }

  // ── Fallback ───────────────────────────────────────────────────────────────

  #[test]
  fn missing_selector_is_incomplete() {
    assert_eq!(pathway(&[]), Pathway::Incomplete);
    assert_eq!(
      pathway(&[(HAS_CHILDREN, "yes"), (YEARS_IN_FRANCE, "12")]),
      Pathway::Incomplete
    );
  }

  #[test]
  fn unknown_selector_is_incomplete() {
    assert_eq!(pathway(&[(SITUATION, "student")]), Pathway::Incomplete);
  }

  #[test]
  fn incomplete_decision_carries_fixed_citations() {
    let d = evaluate(&Answers::new(), &Thresholds::default());
    assert_eq!(d.pathway, Pathway::Incomplete.label());
    assert_eq!(d.citations.len(), 1);
  }

  // ── Employment ─────────────────────────────────────────────────────────────

  #[test]
  fn all_employment_signals_give_reinforced() {
    let p = pathway(&[
      (SITUATION, "travail"),
      (WORK_HAS_OFFER, "yes"),
      (WORK_TENSION_GUESS, "yes"),
      (WORK_YEARS_WORKED, "3"),
      (WORK_TAXES_PAID, "yes"),
    ]);
    assert_eq!(p, Pathway::EmploymentReinforced);
  }

  #[test]
  fn seniority_and_taxes_reinforce_without_shortage() {
    let p = pathway(&[
      (SITUATION, "travail"),
      (WORK_HAS_OFFER, "yes"),
      (WORK_TENSION_GUESS, "unknown"),
      (WORK_YEARS_WORKED, "4"),
      (WORK_TAXES_PAID, "yes"),
    ]);
    assert_eq!(p, Pathway::EmploymentReinforced);
  }

  #[test]
  fn offer_without_other_signals_needs_consolidation() {
    let p = pathway(&[
      (SITUATION, "travail"),
      (WORK_HAS_OFFER, "yes"),
      (WORK_YEARS_WORKED, "2"),
      (WORK_TAXES_PAID, "yes"),
    ]);
    assert_eq!(p, Pathway::EmploymentOfferToConsolidate);
  }

  #[test]
  fn malformed_years_worked_reads_as_zero() {
    let p = pathway(&[
      (SITUATION, "travail"),
      (WORK_HAS_OFFER, "yes"),
      (WORK_YEARS_WORKED, "many"),
      (WORK_TAXES_PAID, "yes"),
    ]);
    assert_eq!(p, Pathway::EmploymentOfferToConsolidate);
  }

  #[test]
  fn no_offer_falls_back() {
    let p = pathway(&[
      (SITUATION, "Travail"),
      (WORK_HAS_OFFER, "no"),
      (WORK_TENSION_GUESS, "yes"),
    ]);
    assert_eq!(p, Pathway::EmploymentNoOffer);
  }

  #[test]
  fn thresholds_are_tunable() {
    let a = answers(&[
      (SITUATION, "travail"),
      (WORK_HAS_OFFER, "yes"),
      (WORK_YEARS_WORKED, "2"),
      (WORK_TAXES_PAID, "yes"),
    ]);
    let lenient = Thresholds {
      employment_min_years_worked: 2.0,
      ..Thresholds::default()
    };
    assert_eq!(select(&a, &lenient), Pathway::EmploymentReinforced);
  }

  // ── Family life ────────────────────────────────────────────────────────────

  #[test]
  fn parent_with_enough_residence() {
    let p = pathway(&[
      (SITUATION, "vpf"),
      (HAS_CHILDREN, "yes"),
      (YEARS_IN_FRANCE, "5"),
    ]);
    assert_eq!(p, Pathway::FamilyParentOfSchooledChild);
  }

  #[test]
  fn short_residence_is_case_by_case() {
    let p = pathway(&[
      (SITUATION, "vpf"),
      (HAS_CHILDREN, "yes"),
      (YEARS_IN_FRANCE, "4.5"),
    ]);
    assert_eq!(p, Pathway::FamilyCaseByCase);
  }

  // ── Asylum ─────────────────────────────────────────────────────────────────

  #[test]
  fn dublin_wins_over_everything_after_it() {
    let p = pathway(&[
      (SITUATION, "asile"),
      (ASYLUM_DUBLIN, "yes"),
      (ASYLUM_OFPRA_FILED, "yes"),
      (ASYLUM_OFPRA_DECISION, "pending"),
    ]);
    assert_eq!(p, Pathway::AsylumDublin);
  }

  #[test]
  fn unfiled_and_timely() {
    let p = pathway(&[
      (SITUATION, "asile"),
      (ASYLUM_OFPRA_FILED, "no"),
      (ASYLUM_DELAY_MONTHS, "3"),
    ]);
    assert_eq!(p, Pathway::AsylumRegisterThenFile);
  }

  #[test]
  fn unfiled_and_late() {
    let p = pathway(&[
      (SITUATION, "asile"),
      (ASYLUM_OFPRA_FILED, "no"),
      (ASYLUM_DELAY_MONTHS, "7"),
    ]);
    assert_eq!(p, Pathway::AsylumLateFiling);
  }

  #[test]
  fn malformed_delay_is_late_filing() {
    let p = pathway(&[
      (SITUATION, "asile"),
      (ASYLUM_OFPRA_FILED, "no"),
      (ASYLUM_DELAY_MONTHS, "a while"),
    ]);
    assert_eq!(p, Pathway::AsylumLateFiling);
  }

  #[test]
  fn missing_delay_reads_as_zero() {
    let p = pathway(&[(SITUATION, "asile"), (ASYLUM_OFPRA_FILED, "no")]);
    assert_eq!(p, Pathway::AsylumRegisterThenFile);

    let p = pathway(&[
      (SITUATION, "asile"),
      (ASYLUM_OFPRA_FILED, "no"),
      (ASYLUM_DELAY_MONTHS, " "),
    ]);
    assert_eq!(p, Pathway::AsylumRegisterThenFile);
  }

  #[test]
  fn pending_decision() {
    let p = pathway(&[
      (SITUATION, "asile"),
      (ASYLUM_OFPRA_FILED, "yes"),
      (ASYLUM_OFPRA_DECISION, "pending"),
    ]);
    assert_eq!(p, Pathway::AsylumUnderReview);
  }

  #[test]
  fn refused_with_and_without_appeal() {
    let appealed = pathway(&[
      (SITUATION, "asile"),
      (ASYLUM_OFPRA_FILED, "yes"),
      (ASYLUM_OFPRA_DECISION, "refused"),
      (ASYLUM_CNDA_APPEAL, "yes"),
    ]);
    assert_eq!(appealed, Pathway::AsylumCndaAppeal);

    let not_appealed = pathway(&[
      (SITUATION, "asile"),
      (ASYLUM_OFPRA_FILED, "yes"),
      (ASYLUM_OFPRA_DECISION, "refused"),
      (ASYLUM_CNDA_APPEAL, "no"),
    ]);
    assert_eq!(not_appealed, Pathway::AsylumRefused);
  }

  #[test]
  fn filed_without_decision_is_follow_up() {
    let p = pathway(&[
      (SITUATION, "asile"),
      (ASYLUM_OFPRA_FILED, "yes"),
      (ASYLUM_OFPRA_DECISION, "none"),
    ]);
    assert_eq!(p, Pathway::AsylumFollowUp);
  }

  #[test]
  fn citations_do_not_depend_on_free_text() {
    let base = [(SITUATION, "asile"), (ASYLUM_DUBLIN, "yes")];
    let mut with_lang = base.to_vec();
    with_lang.push((ASYLUM_LANGUAGE, "dari"));

    let t = Thresholds::default();
    assert_eq!(
      evaluate(&answers(&base), &t),
      evaluate(&answers(&with_lang), &t)
    );
  }

  #[test]
  fn pathway_keys_are_snake_case() {
    assert_eq!(Pathway::EmploymentReinforced.key(), "employment_reinforced");
  }
}
