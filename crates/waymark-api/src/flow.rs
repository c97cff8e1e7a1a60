//! `POST /flow/next`: the question flow selector over HTTP.

use axum::Json;
use serde::{Deserialize, Serialize};
use waymark_core::{
  answers::Answers,
  case::Locale,
  flow::{self, Question},
};

#[derive(Debug, Deserialize)]
pub struct NextBody {
  pub locale:  Option<String>,
  #[serde(default)]
  pub answers: Answers,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NextResponse {
  /// `null` once every applicable question has been answered.
  pub question: Option<Question>,
}

/// `POST /flow/next`: body: `{"locale":"en","answers":{…}}`
pub async fn next(Json(body): Json<NextBody>) -> Json<NextResponse> {
  let locale = Locale::parse_or_default(body.locale.as_deref());
  Json(NextResponse { question: flow::next_question(&body.answers, locale) })
}
