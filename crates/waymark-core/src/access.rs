//! Six-digit access codes that let an applicant resume a case.

use rand_core::RngCore;

use crate::{Error, Result};

/// Number of digits in an access code.
pub const CODE_LEN: usize = 6;

const CODE_MIN: u32 = 100_000;
const CODE_SPAN: u32 = 900_000;
/// Largest multiple of `CODE_SPAN` that fits in the `u32` range. Draws at or
/// above it are rejected so every code is equally likely.
const ACCEPT_BELOW: u64 = (1 << 32) - (1 << 32) % CODE_SPAN as u64;

/// Validate a submitted code: exactly six ASCII digits once surrounding
/// whitespace is removed. Returns the trimmed code.
pub fn parse_code(raw: &str) -> Result<&str> {
  let code = raw.trim();
  if code.len() == CODE_LEN && code.bytes().all(|b| b.is_ascii_digit()) {
    Ok(code)
  } else {
    Err(Error::InvalidAccessCode)
  }
}

/// Draw a fresh code in `100000..=999999`; never starts with a zero.
///
/// Uniqueness is the store's responsibility: it retries on collision.
pub fn generate_code(rng: &mut impl RngCore) -> String {
  loop {
    let draw = rng.next_u32();
    if u64::from(draw) < ACCEPT_BELOW {
      return (CODE_MIN + draw % CODE_SPAN).to_string();
    }
  }
}

#[cfg(test)]
mod tests {
  use rand_core::OsRng;

  use super::*;

  /// Replays a fixed list of draws.
  struct Scripted(Vec<u32>);

  impl RngCore for Scripted {
    fn next_u32(&mut self) -> u32 { self.0.remove(0) }

    fn next_u64(&mut self) -> u64 { u64::from(self.next_u32()) }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
      rand_core::impls::fill_bytes_via_next(self, dest)
    }

    fn try_fill_bytes(
      &mut self,
      dest: &mut [u8],
    ) -> std::result::Result<(), rand_core::Error> {
      self.fill_bytes(dest);
      Ok(())
    }
  }

  #[test]
  fn accepts_six_digits_with_whitespace() {
    assert_eq!(parse_code(" 012345\n").unwrap(), "012345");
  }

  #[test]
  fn rejects_wrong_length_or_non_digits() {
    for bad in ["12345", "1234567", "12a456", "", "１２３４５６"] {
      assert!(
        matches!(parse_code(bad), Err(Error::InvalidAccessCode)),
        "accepted {bad:?}"
      );
    }
  }

  #[test]
  fn generated_codes_are_valid() {
    for _ in 0..200 {
      let code = generate_code(&mut OsRng);
      assert!(parse_code(&code).is_ok(), "{code}");
      assert!(!code.starts_with('0'));
    }
  }

  #[test]
  fn draws_past_the_last_full_span_are_redrawn() {
    let mut rng = Scripted(vec![u32::MAX, 4_294_800_000, 5]);
    assert_eq!(generate_code(&mut rng), "100005");
    assert!(rng.0.is_empty());
  }

  #[test]
  fn top_of_the_accepted_range_maps_to_the_largest_code() {
    let mut rng = Scripted(vec![4_294_799_999]);
    assert_eq!(generate_code(&mut rng), "999999");
  }
}
