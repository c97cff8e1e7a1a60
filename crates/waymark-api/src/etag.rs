//! ETag computation for case documents.
//!
//! The tag is a SHA-256 over everything the document prints that can change:
//! case id, status, decision pathway and the ordered answers.

use sha2::{Digest, Sha256};
use waymark_core::{answers::Answer, case::Case};

pub fn compute_etag(case: &Case, pathway: Option<&str>, answers: &[Answer]) -> String {
  let mut hasher = Sha256::new();
  hasher.update(case.case_id.as_bytes());
  hasher.update(case.status.as_ref().as_bytes());
  hasher.update([0]);
  hasher.update(pathway.unwrap_or_default().as_bytes());
  hasher.update([0]);
  for answer in answers {
    hasher.update(answer.question_id.as_bytes());
    hasher.update([0x1f]);
    hasher.update(answer.value.as_bytes());
    hasher.update([0x1e]);
  }
  let hash = hasher.finalize();
  format!("\"{}\"", hex::encode(hash))
}
