//! Display labels for the questionnaire, per locale.

use crate::{case::Locale, flow::ids::*};

/// Localized label for a known question id.
pub(crate) fn question(id: &str, locale: Locale) -> Option<&'static str> {
  use Locale::*;

  let label = match (id, locale) {
    (SITUATION, Fr) => "Votre situation principale",
    (SITUATION, En) => "Your main situation",
    (SITUATION, Ar) => "وضعك الرئيسي",

    (YEARS_IN_FRANCE, Fr) => "Depuis combien d'années êtes-vous en France ?",
    (YEARS_IN_FRANCE, En) => "How many years have you been in France?",
    (YEARS_IN_FRANCE, Ar) => "منذ كم سنة أنت في فرنسا؟",

    (HAS_CHILDREN, Fr) => "Avez-vous des enfants mineurs en France ?",
    (HAS_CHILDREN, En) => "Do you have minor children in France?",
    (HAS_CHILDREN, Ar) => "هل لديك أطفال قُصّر في فرنسا؟",

    (ASYLUM_DOMICILIATION, Fr) => {
      "Avez-vous une domiciliation (adresse pour les notifications) ?"
    }
    (ASYLUM_DOMICILIATION, En) => {
      "Do you have a domiciliation address for notifications?"
    }
    (ASYLUM_DOMICILIATION, Ar) => "هل لديك عنوان للتبليغات؟",

    (ASYLUM_OFII_ORIENTATION, Fr) => {
      "Avez-vous été orienté par l'OFII (conditions d'accueil) ?"
    }
    (ASYLUM_OFII_ORIENTATION, En) => {
      "Were you referred by OFII (reception conditions)?"
    }
    (ASYLUM_OFII_ORIENTATION, Ar) => "هل وُجّهت من OFII؟",

    (ASYLUM_LANGUAGE, Fr) => "Langue préférée pour la procédure",
    (ASYLUM_LANGUAGE, En) => "Preferred language for the procedure",
    (ASYLUM_LANGUAGE, Ar) => "اللغة المفضلة للإجراءات",

    (ASYLUM_INTERPRETER, Fr) => "Avez-vous besoin d'un interprète ?",
    (ASYLUM_INTERPRETER, En) => "Do you need an interpreter?",
    (ASYLUM_INTERPRETER, Ar) => "هل تحتاج إلى مترجم؟",

    (ASYLUM_DUBLIN, Fr) => "Avez-vous été informé d'une procédure Dublin ?",
    (ASYLUM_DUBLIN, En) => "Were you informed of a Dublin procedure?",
    (ASYLUM_DUBLIN, Ar) => "هل تم إبلاغك بإجراءات دبلن؟",

    (ASYLUM_OFPRA_FILED, Fr) => "Avez-vous déposé votre dossier à l'OFPRA ?",
    (ASYLUM_OFPRA_FILED, En) => "Have you filed your application with OFPRA?",
    (ASYLUM_OFPRA_FILED, Ar) => "هل قدمت طلبك لدى OFPRA؟",

    (ASYLUM_DELAY_MONTHS, Fr) => {
      "Délai (mois) entre l'entrée en France et le dépôt OFPRA"
    }
    (ASYLUM_DELAY_MONTHS, En) => {
      "Delay in months between entering France and filing"
    }
    (ASYLUM_DELAY_MONTHS, Ar) => "الفترة (بالأشهر) بين الدخول والإيداع",

    (ASYLUM_OFPRA_DECISION, Fr) => "Décision de l'OFPRA",
    (ASYLUM_OFPRA_DECISION, En) => "OFPRA decision",
    (ASYLUM_OFPRA_DECISION, Ar) => "قرار OFPRA",

    (ASYLUM_CNDA_APPEAL, Fr) => "Recours devant la CNDA déjà déposé ?",
    (ASYLUM_CNDA_APPEAL, En) => "Have you already appealed to the CNDA?",
    (ASYLUM_CNDA_APPEAL, Ar) => "هل قدمت طعناً لدى CNDA؟",

    (ASYLUM_VULNERABLE, Fr) => "Présentez-vous des vulnérabilités ?",
    (ASYLUM_VULNERABLE, En) => "Do you have any vulnerabilities?",
    (ASYLUM_VULNERABLE, Ar) => "هل لديك هشاشة/ضعف؟",

    (ASYLUM_EVIDENCE_READY, Fr) => "Avez-vous déjà des éléments de preuve ?",
    (ASYLUM_EVIDENCE_READY, En) => "Do you already have evidence for your claim?",
    (ASYLUM_EVIDENCE_READY, Ar) => "هل لديك أدلة/وثائق؟",

    (WORK_HAS_OFFER, Fr) => {
      "Avez-vous une promesse d'embauche ou une offre d'emploi ?"
    }
    (WORK_HAS_OFFER, En) => "Do you have a job offer or promise of employment?",
    (WORK_HAS_OFFER, Ar) => "هل لديك عرض عمل أو وعد بالتوظيف؟",

    (WORK_YEARS_WORKED, Fr) => {
      "Combien d'années avez-vous travaillé en France (au total) ?"
    }
    (WORK_YEARS_WORKED, En) => {
      "How many years have you worked in France in total?"
    }
    (WORK_YEARS_WORKED, Ar) => "كم عدد سنوات العمل في فرنسا (إجمالي)؟",

    (WORK_TAXES_PAID, Fr) => {
      "Avez-vous déjà payé des impôts sur le revenu en France ?"
    }
    (WORK_TAXES_PAID, En) => "Have you already paid income tax in France?",
    (WORK_TAXES_PAID, Ar) => "هل دفعت ضرائب الدخل في فرنسا؟",

    (WORK_DEPARTMENT, Fr) => "Votre département",
    (WORK_DEPARTMENT, En) => "Your department",
    (WORK_DEPARTMENT, Ar) => "المقاطعة (الديبارتمان)",

    (WORK_JOB_SECTOR, Fr) => "Votre métier ou secteur (texte libre)",
    (WORK_JOB_SECTOR, En) => "Your job or sector (free text)",
    (WORK_JOB_SECTOR, Ar) => "وظيفتك / قطاعك (نص حر)",

    (WORK_TENSION_GUESS, Fr) => {
      "Pensez-vous que votre métier est en tension dans votre département ?"
    }
    (WORK_TENSION_GUESS, En) => {
      "Do you think your job is a shortage occupation in your department?"
    }
    (WORK_TENSION_GUESS, Ar) => {
      "هل تعتقد أن مهنتك ضمن المهن المطلوبة في مقاطعتك؟"
    }

    _ => return None,
  };
  Some(label)
}

/// Localized label for one option of a single-choice question.
pub(crate) fn choice(id: &str, value: &str, locale: Locale) -> Option<&'static str> {
  use Locale::*;

  let label = match (id, value, locale) {
    (SITUATION, "asile", Fr) => "Demande d'asile / protection",
    (SITUATION, "asile", En) => "Asylum / protection",
    (SITUATION, "asile", Ar) => "اللجوء / الحماية",
    (SITUATION, "vpf", Fr) => "Vie privée et familiale",
    (SITUATION, "vpf", En) => "Private and family life",
    (SITUATION, "vpf", Ar) => "الحياة الخاصة والعائلية",
    (SITUATION, "travail", Fr) => "Travail / salarié",
    (SITUATION, "travail", En) => "Work / employee",
    (SITUATION, "travail", Ar) => "العمل / موظف",

    (ASYLUM_OFPRA_DECISION, "pending", Fr) => "En cours",
    (ASYLUM_OFPRA_DECISION, "pending", En) => "Pending",
    (ASYLUM_OFPRA_DECISION, "pending", Ar) => "جاري",
    (ASYLUM_OFPRA_DECISION, "refused", Fr) => "Rejet",
    (ASYLUM_OFPRA_DECISION, "refused", En) => "Refused",
    (ASYLUM_OFPRA_DECISION, "refused", Ar) => "مرفوض",
    (ASYLUM_OFPRA_DECISION, "none", Fr) => "Aucune",
    (ASYLUM_OFPRA_DECISION, "none", En) => "None",
    (ASYLUM_OFPRA_DECISION, "none", Ar) => "لا يوجد",

    (_, "yes", Fr) => "Oui",
    (_, "yes", En) => "Yes",
    (_, "yes", Ar) => "نعم",
    (_, "no", Fr) => "Non",
    (_, "no", En) => "No",
    (_, "no", Ar) => "لا",
    (_, "unknown", Fr) => "Je ne sais pas",
    (_, "unknown", En) => "I don't know",
    (_, "unknown", Ar) => "لا أعرف",

    _ => return None,
  };
  Some(label)
}
