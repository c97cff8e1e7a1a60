//! Report layout: turns a case into pages of text runs.

use waymark_core::{
  answers::Answer,
  case::{Case, CaseStatus},
  decision::Decision,
  flow,
};

use crate::{
  error::{Error, Result},
  pdf::{self, Font, TextRun, MARGIN, PAGE_HEIGHT},
  text::ReportText,
};

const TOP: u32 = PAGE_HEIGHT - 70;
const BOTTOM: u32 = 80;
const FOOTER_Y: u32 = 40;

/// Approximate characters per line of 11pt Helvetica across the text width.
const WRAP_COLUMNS: usize = 90;
/// Same for 13pt Helvetica-Bold headings.
const HEADING_COLUMNS: usize = 60;

/// Everything the report prints about one case.
#[derive(Debug, Clone)]
pub struct CaseDocument {
  pub case:     Case,
  pub decision: Option<Decision>,
  /// Answers in presentation order.
  pub answers:  Vec<Answer>,
}

#[derive(Clone, Copy)]
enum Style {
  Title,
  Heading,
  Body,
  Blank,
}

impl Style {
  fn font(self) -> (Font, u32) {
    match self {
      Self::Title => (Font::Bold, 16),
      Self::Heading => (Font::Bold, 13),
      Self::Body | Self::Blank => (Font::Regular, 11),
    }
  }

  fn leading(self) -> u32 {
    match self {
      Self::Title => 24,
      Self::Heading => 20,
      Self::Body => 15,
      Self::Blank => 8,
    }
  }
}

struct Line {
  style: Style,
  text:  String,
}

/// Render a paid case as PDF bytes.
pub fn render(doc: &CaseDocument, text: &ReportText) -> Result<Vec<u8>> {
  if doc.case.status != CaseStatus::Paid {
    return Err(Error::NotPaid(doc.case.status));
  }

  let pages = paginate(&lines(doc, text), text);
  Ok(pdf::write_document(&pages))
}

fn lines(doc: &CaseDocument, text: &ReportText) -> Vec<Line> {
  let mut out = Vec::new();
  let mut push = |style: Style, s: String| out.push(Line { style, text: s });

  push(Style::Title, text.title.to_owned());
  push(Style::Body, text.subtitle.to_owned());
  if let Some(notice) = text.notice {
    push(Style::Body, notice.to_owned());
  }
  push(Style::Blank, String::new());

  push(Style::Body, format!("{}: {}", text.case, doc.case.case_id));
  push(Style::Body, format!("{}: {}", text.status, doc.case.status));
  push(
    Style::Body,
    format!(
      "{}: {}",
      text.created,
      doc.case.created_at.format("%Y-%m-%d %H:%M UTC")
    ),
  );
  push(Style::Blank, String::new());

  match &doc.decision {
    Some(decision) => {
      let heading = format!("{}: {}", text.pathway, decision.pathway);
      for part in wrap(&heading, HEADING_COLUMNS) {
        push(Style::Heading, part);
      }
      if !decision.citations.is_empty() {
        push(Style::Body, format!("{}:", text.citations));
        for citation in &decision.citations {
          for (i, part) in wrap(citation, WRAP_COLUMNS - 4).into_iter().enumerate() {
            let bullet = if i == 0 { "- " } else { "  " };
            push(Style::Body, format!("{bullet}{part}"));
          }
        }
      }
    }
    None => push(Style::Body, text.no_decision.to_owned()),
  }
  push(Style::Blank, String::new());

  push(Style::Heading, text.answers.to_owned());
  for answer in &doc.answers {
    let q = flow::question(&answer.question_id, text.labels);
    let value = q
      .options
      .iter()
      .find(|o| o.value == answer.value)
      .map_or(answer.value.as_str(), |o| o.label.as_str());
    for part in wrap(&format!("• {}: {}", q.label, value), WRAP_COLUMNS) {
      push(Style::Body, part);
    }
  }
  push(Style::Blank, String::new());

  push(Style::Heading, text.next_steps.to_owned());
  for (n, step) in text.steps.iter().enumerate() {
    push(Style::Body, format!("{}. {step}", n + 1));
  }

  out
}

/// Greedy word wrap on character count; words longer than `width` are kept
/// whole on their own line.
fn wrap(s: &str, width: usize) -> Vec<String> {
  let mut out = Vec::new();
  let mut line = String::new();
  for word in s.split_whitespace() {
    let fits =
      line.is_empty() || line.chars().count() + 1 + word.chars().count() <= width;
    if !fits {
      out.push(std::mem::take(&mut line));
    }
    if !line.is_empty() {
      line.push(' ');
    }
    line.push_str(word);
  }
  if !line.is_empty() || out.is_empty() {
    out.push(line);
  }
  out
}

/// Lay out lines top to bottom, starting a new page when the bottom margin is
/// reached. Every page gets the disclaimer and a page counter.
fn paginate(lines: &[Line], text: &ReportText) -> Vec<Vec<TextRun>> {
  let mut pages: Vec<Vec<TextRun>> = vec![Vec::new()];
  let mut y = TOP;

  for line in lines {
    let leading = line.style.leading();
    if y < BOTTOM + leading {
      pages.push(Vec::new());
      y = TOP;
    }
    if let Style::Blank = line.style {
      y -= leading;
      continue;
    }
    let (font, size) = line.style.font();
    if let Some(page) = pages.last_mut() {
      page.push(TextRun { font, size, x: MARGIN, y, text: line.text.clone() });
    }
    y -= leading;
  }

  let total = pages.len();
  for (i, page) in pages.iter_mut().enumerate() {
    page.push(TextRun {
      font: Font::Regular,
      size: 8,
      x:    MARGIN,
      y:    FOOTER_Y,
      text: format!("{}  |  {} {}/{}", text.disclaimer, text.page, i + 1, total),
    });
  }
  pages
}
