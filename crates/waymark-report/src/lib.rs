//! Case report rendering.
//!
//! Produces a self-contained PDF summarising a paid case: identity, decision,
//! citations, answers, next steps and a disclaimer. Text is set in the
//! standard Helvetica font with WinAnsi encoding, so no font is embedded.

mod error;
mod pdf;
mod render;
mod text;

pub use error::{Error, Result};
pub use render::{render, CaseDocument};
pub use text::ReportText;
