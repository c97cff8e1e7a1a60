//! Minimal PDF 1.4 writer.
//!
//! Supports exactly what the report needs: A4 pages of left-aligned text
//! lines in Helvetica and Helvetica-Bold, with a cross-reference table so
//! that readers can open the file without repairing it.

use std::fmt::Write as _;

pub(crate) const PAGE_WIDTH: u32 = 595;
pub(crate) const PAGE_HEIGHT: u32 = 842;
pub(crate) const MARGIN: u32 = 50;

// ─── WinAnsi text encoding ───────────────────────────────────────────────────

/// Map a character to its WinAnsiEncoding byte, if it has one.
fn win_ansi(c: char) -> Option<u8> {
  let byte = match c {
    ' '..='~' => c as u8,
    '\u{a0}'..='\u{ff}' => c as u32 as u8,
    '€' => 0x80,
    '‚' => 0x82,
    'ƒ' => 0x83,
    '„' => 0x84,
    '…' => 0x85,
    '†' => 0x86,
    '‡' => 0x87,
    'ˆ' => 0x88,
    '‰' => 0x89,
    'Š' => 0x8a,
    '‹' => 0x8b,
    'Œ' => 0x8c,
    'Ž' => 0x8e,
    '‘' => 0x91,
    '’' => 0x92,
    '“' => 0x93,
    '”' => 0x94,
    '•' => 0x95,
    '–' => 0x96,
    '—' => 0x97,
    '˜' => 0x98,
    '™' => 0x99,
    'š' => 0x9a,
    '›' => 0x9b,
    'œ' => 0x9c,
    'ž' => 0x9e,
    'Ÿ' => 0x9f,
    _ => return None,
  };
  Some(byte)
}

/// Encode `s` as the body of a PDF literal string.
///
/// Parentheses and backslashes are escaped, whitespace collapses to a space
/// and anything WinAnsi cannot represent becomes `?`.
pub(crate) fn encode_text(s: &str) -> Vec<u8> {
  let mut out = Vec::with_capacity(s.len());
  for c in s.chars() {
    match c {
      '(' | ')' | '\\' => {
        out.push(b'\\');
        out.push(c as u8);
      }
      c if c.is_whitespace() => out.push(b' '),
      c => out.push(win_ansi(c).unwrap_or(b'?')),
    }
  }
  out
}

// ─── Page content ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Font {
  Regular,
  Bold,
}

impl Font {
  fn resource(self) -> &'static str {
    match self {
      Self::Regular => "F1",
      Self::Bold => "F2",
    }
  }
}

/// One positioned run of text.
#[derive(Debug, Clone)]
pub(crate) struct TextRun {
  pub font: Font,
  pub size: u32,
  pub x:    u32,
  pub y:    u32,
  pub text: String,
}

/// Build the content stream for one page.
fn content_stream(runs: &[TextRun]) -> Vec<u8> {
  let mut out = Vec::new();
  for run in runs {
    let mut head = String::new();
    // Writing into a String cannot fail.
    let _ = write!(
      head,
      "BT /{} {} Tf {} {} Td (",
      run.font.resource(),
      run.size,
      run.x,
      run.y
    );
    out.extend_from_slice(head.as_bytes());
    out.extend_from_slice(&encode_text(&run.text));
    out.extend_from_slice(b") Tj ET\n");
  }
  out
}

// ─── Document assembly ───────────────────────────────────────────────────────

/// Accumulates numbered objects and their byte offsets.
struct Writer {
  buf:     Vec<u8>,
  offsets: Vec<usize>,
}

impl Writer {
  fn new() -> Self {
    // The binary comment line marks the file as 8-bit for transfer tools.
    let mut buf = b"%PDF-1.4\n%\xe2\xe3\xcf\xd3\n".to_vec();
    buf.reserve(4096);
    Self { buf, offsets: Vec::new() }
  }

  /// Append object number `offsets.len() + 1` with a dictionary body.
  fn object(&mut self, body: &str) {
    self.offsets.push(self.buf.len());
    let n = self.offsets.len();
    self
      .buf
      .extend_from_slice(format!("{n} 0 obj\n{body}\nendobj\n").as_bytes());
  }

  fn stream(&mut self, data: &[u8]) {
    self.offsets.push(self.buf.len());
    let n = self.offsets.len();
    self.buf.extend_from_slice(
      format!("{n} 0 obj\n<< /Length {} >>\nstream\n", data.len()).as_bytes(),
    );
    self.buf.extend_from_slice(data);
    self.buf.extend_from_slice(b"\nendstream\nendobj\n");
  }

  fn finish(mut self) -> Vec<u8> {
    let xref_at = self.buf.len();
    let size = self.offsets.len() + 1;

    let mut xref = format!("xref\n0 {size}\n0000000000 65535 f \n");
    for offset in &self.offsets {
      let _ = writeln!(xref, "{offset:010} 00000 n ");
    }
    let _ = write!(
      xref,
      "trailer\n<< /Size {size} /Root 1 0 R >>\nstartxref\n{xref_at}\n%%EOF\n"
    );

    self.buf.extend_from_slice(xref.as_bytes());
    self.buf
  }
}

/// Serialise `pages` into a complete PDF file.
///
/// Object layout: 1 catalog, 2 page tree, 3 and 4 fonts, then a page object
/// followed by its content stream for each page.
pub(crate) fn write_document(pages: &[Vec<TextRun>]) -> Vec<u8> {
  const FIRST_PAGE: usize = 5;

  let kids = (0..pages.len())
    .map(|i| format!("{} 0 R", FIRST_PAGE + 2 * i))
    .collect::<Vec<_>>()
    .join(" ");

  let mut w = Writer::new();
  w.object("<< /Type /Catalog /Pages 2 0 R >>");
  w.object(&format!(
    "<< /Type /Pages /Kids [{kids}] /Count {} >>",
    pages.len()
  ));
  w.object(
    "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica \
     /Encoding /WinAnsiEncoding >>",
  );
  w.object(
    "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold \
     /Encoding /WinAnsiEncoding >>",
  );

  for (i, runs) in pages.iter().enumerate() {
    let contents = FIRST_PAGE + 2 * i + 1;
    w.object(&format!(
      "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {PAGE_WIDTH} {PAGE_HEIGHT}] \
       /Resources << /Font << /F1 3 0 R /F2 4 0 R >> >> /Contents {contents} 0 R >>"
    ));
    w.stream(&content_stream(runs));
  }

  w.finish()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn latin_text_is_win_ansi() {
    assert_eq!(encode_text("Créé"), vec![b'C', b'r', 0xe9, 0xe9]);
    assert_eq!(encode_text("’€"), vec![0x92, 0x80]);
  }

  #[test]
  fn delimiters_are_escaped() {
    assert_eq!(encode_text(r"a(b)\c"), br"a\(b\)\\c".to_vec());
  }

  #[test]
  fn unrepresentable_chars_become_question_marks() {
    assert_eq!(encode_text("مرحبا"), b"?????".to_vec());
    assert_eq!(encode_text("a\tb\nc"), b"a b c".to_vec());
  }

  #[test]
  fn xref_offsets_point_at_objects() {
    let pdf = write_document(&[vec![TextRun {
      font: Font::Regular,
      size: 11,
      x:    MARGIN,
      y:    700,
      text: "hello".into(),
    }]]);

    let marker = b"startxref\n";
    let tail = pdf
      .windows(marker.len())
      .rposition(|w| w == marker)
      .unwrap()
      + marker.len();
    let xref_at: usize = std::str::from_utf8(&pdf[tail..])
      .unwrap()
      .lines()
      .next()
      .unwrap()
      .parse()
      .unwrap();

    let table = std::str::from_utf8(&pdf[xref_at..]).unwrap();
    assert!(table.starts_with("xref\n0 7\n"));

    // Object 5 is the first page.
    let entries: Vec<&str> = table.lines().skip(3).take(6).collect();
    let page_offset: usize = entries[4][..10].parse().unwrap();
    assert!(pdf[page_offset..].starts_with(b"5 0 obj\n<< /Type /Page "));
  }
}
