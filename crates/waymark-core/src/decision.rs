//! Decision: the derived routing outcome for a case.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Output of [`crate::rules::evaluate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
  /// Human-readable outcome label.
  pub pathway:   String,
  /// Static informational references attached to the outcome, in order.
  pub citations: Vec<String>,
}

/// A decision as persisted against its case.
///
/// Only ever replaced by re-running the evaluator; it goes stale silently if
/// the answers change afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordedDecision {
  pub case_id:    Uuid,
  #[serde(flatten)]
  pub decision:   Decision,
  pub decided_at: DateTime<Utc>,
}
