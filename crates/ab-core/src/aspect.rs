//! Board aspect ratio: parsing of the author-entered value.
//!
//! Built on `winnow` 0.7. Accepted forms are a bare number (`"2"`, `1.5`),
//! which reads as `N/1`, and `W/H` or `W:H`. Anything else, including a
//! zero or non-finite result, falls back to `16/9`.

use crate::model::RawAspectRatio;
use winnow::combinator::{alt, opt, preceded};
use winnow::error::ContextError;
use winnow::prelude::*;
use winnow::token::take_while;

/// The fallback ratio as written by an author.
pub const DEFAULT_ASPECT_RATIO_TEXT: &str = "16/9";

/// Canvas width divided by canvas height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AspectRatio(f64);

impl Default for AspectRatio {
    fn default() -> Self {
        AspectRatio(16.0 / 9.0)
    }
}

impl AspectRatio {
    /// A ratio from a plain value. Zero, negative and non-finite values
    /// yield the default.
    pub fn new(value: f64) -> Self {
        if value.is_finite() && value > 0.0 {
            AspectRatio(value)
        } else {
            Self::default()
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// Parse an author-entered ratio string.
    pub fn parse(text: &str) -> Self {
        let mut input = text;
        match parse_ratio.parse_next(&mut input) {
            Ok(ratio) if input.is_empty() => Self::new(ratio),
            _ => {
                log::debug!("unparseable aspect ratio {text:?}, using {DEFAULT_ASPECT_RATIO_TEXT}");
                Self::default()
            }
        }
    }

    pub fn from_raw(raw: Option<&RawAspectRatio>) -> Self {
        match raw {
            Some(RawAspectRatio::Number(n)) => Self::parse(&n.to_string()),
            Some(RawAspectRatio::Text(s)) => Self::parse(s),
            None => Self::default(),
        }
    }
}

// ─── Parsers ─────────────────────────────────────────────────────────────

/// Unsigned decimal: digits with an optional fractional part.
fn parse_decimal(input: &mut &str) -> ModalResult<f64> {
    let start = *input;
    let _ = take_while(1.., |c: char| c.is_ascii_digit()).parse_next(input)?;
    if input.starts_with('.') {
        let mut probe = &input[1..];
        if take_while::<_, _, ContextError>(1.., |c: char| c.is_ascii_digit())
            .parse_next(&mut probe)
            .is_ok()
        {
            *input = probe;
        }
    }
    let matched = &start[..start.len() - input.len()];
    matched
        .parse::<f64>()
        .map_err(|_| winnow::error::ErrMode::Backtrack(ContextError::new()))
}

fn parse_ratio(input: &mut &str) -> ModalResult<f64> {
    let width = parse_decimal.parse_next(input)?;
    let height = opt(preceded(alt((':', '/')), parse_decimal)).parse_next(input)?;
    Ok(width / height.unwrap_or(1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_slash_and_colon() {
        assert_eq!(AspectRatio::parse("16/9").value(), 16.0 / 9.0);
        assert_eq!(AspectRatio::parse("4:3").value(), 4.0 / 3.0);
        assert_eq!(AspectRatio::parse("2.5/1.25").value(), 2.0);
    }

    #[test]
    fn bare_number_reads_as_n_over_one() {
        assert_eq!(AspectRatio::parse("2").value(), 2.0);
        assert_eq!(
            AspectRatio::from_raw(Some(&RawAspectRatio::Number(1.5))).value(),
            1.5
        );
    }

    #[test]
    fn garbage_falls_back() {
        let default = AspectRatio::default().value();
        for bad in ["", "wide", "16/", "/9", "-4/3", "16/9/2", "4 : 3", "16/0", "0/9"] {
            assert_eq!(AspectRatio::parse(bad).value(), default, "input {bad:?}");
        }
        assert_eq!(AspectRatio::from_raw(None).value(), default);
        assert_eq!(AspectRatio::new(f64::INFINITY).value(), default);
    }
}
