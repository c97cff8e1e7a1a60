//! Localized strings for the report.

use waymark_core::case::Locale;

/// Every piece of fixed text the report prints.
#[derive(Debug, Clone, Copy)]
pub struct ReportText {
  /// Locale used for question and option labels.
  pub labels:      Locale,
  pub title:       &'static str,
  pub subtitle:    &'static str,
  pub case:        &'static str,
  pub status:      &'static str,
  pub created:     &'static str,
  pub pathway:     &'static str,
  pub citations:   &'static str,
  pub no_decision: &'static str,
  pub answers:     &'static str,
  pub next_steps:  &'static str,
  pub steps:       &'static [&'static str],
  pub disclaimer:  &'static str,
  pub page:        &'static str,
  /// Extra line printed under the subtitle, if any.
  pub notice:      Option<&'static str>,
}

const FR: ReportText = ReportText {
  labels:      Locale::Fr,
  title:       "Orientation - information non juridique",
  subtitle:    "Résumé de votre situation et références selon vos réponses.",
  case:        "Dossier",
  status:      "Statut",
  created:     "Créé le",
  pathway:     "Voie retenue",
  citations:   "Références",
  no_decision: "Aucune décision enregistrée pour ce dossier.",
  answers:     "Vos réponses",
  next_steps:  "Les prochaines étapes",
  steps:       &[
    "Prendre contact avec un avocat ou une association.",
    "Rassembler les pièces listées.",
    "Vérifier les éventuelles consignes locales de la préfecture.",
  ],
  disclaimer:  "Information indicative, n'a pas valeur de conseil juridique.",
  page:        "Page",
  notice:      None,
};

const EN: ReportText = ReportText {
  labels:      Locale::En,
  title:       "Orientation - not legal advice",
  subtitle:    "Summary of your situation and references based on your answers.",
  case:        "Case",
  status:      "Status",
  created:     "Created",
  pathway:     "Selected pathway",
  citations:   "References",
  no_decision: "No decision recorded for this case.",
  answers:     "Your answers",
  next_steps:  "Next steps",
  steps:       &[
    "Book an appointment with a lawyer or an association.",
    "Gather the listed documents.",
    "Check the local rules of your prefecture, if any.",
  ],
  disclaimer:  "Not legal advice, indicative orientation only.",
  page:        "Page",
  notice:      None,
};

/// Arabic script cannot be set without an embedded font, so Arabic cases get
/// the English report with a notice.
const AR: ReportText = ReportText {
  notice: Some(
    "This document is in English: Arabic text is not available in the PDF \
     version.",
  ),
  ..EN
};

impl ReportText {
  pub fn for_locale(locale: Locale) -> Self {
    match locale {
      Locale::Fr => FR,
      Locale::En => EN,
      Locale::Ar => AR,
    }
  }
}
