//! Parsing of `sleep` operands.
//!
//! Accepted expressions are an optional sign followed by one or more
//! `<decimal><unit>` groups, e.g. `300ms`, `1.5h`, `2h45m`. The bare string `0` is
//! also accepted. Valid units are `ns`, `us` (`µs`/`μs`), `ms`, `s`, `m`, `h`.
//!
//! Negative durations parse successfully and saturate to zero, so a negative
//! `sleep` never pauses.

// External crates
use lazy_static::lazy_static;
use regex::Regex;
use std::time::Duration;
use tracing::instrument;

/// Upper bound for a single expression, in nanoseconds.
const MAX_NANOS: u128 = i64::MAX as u128;

/// Fractional digits beyond this precision cannot change a nanosecond result.
const MAX_FRACTION_DIGITS: usize = 18;

lazy_static! {
    static ref DURATION_RE: Regex =
        Regex::new(r"^[-+]?(?:(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)(?:ns|us|µs|μs|ms|s|m|h))+$")
            .unwrap_or_else(|e| unreachable!("duration regex is a literal: {e}"));
    static ref COMPONENT_RE: Regex =
        Regex::new(r"([0-9]*)(?:\.([0-9]*))?(ns|us|µs|μs|ms|s|m|h)")
            .unwrap_or_else(|e| unreachable!("duration regex is a literal: {e}"));
}

/// Errors produced while parsing a duration expression.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DurationError {
    #[error("invalid duration {0:?}")]
    Invalid(String),
    #[error("duration {0:?} is out of range")]
    Overflow(String),
}

/// Parse a duration expression such as `500ms` or `1h30m`.
#[instrument(
    name = "dogcmd_duration::parse",
    target = "helpers::duration",
    level = "trace"
)]
pub fn parse_duration(input: &str) -> Result<Duration, DurationError> {
    let (negative, body) = match input.as_bytes().first() {
        Some(b'-') => (true, &input[1..]),
        Some(b'+') => (false, &input[1..]),
        _ => (false, input),
    };

    if body == "0" {
        return Ok(Duration::ZERO);
    }

    if !DURATION_RE.is_match(input) {
        tracing::trace!(duration = %input, "Duration expression does not match grammar");
        return Err(DurationError::Invalid(input.to_string()));
    }

    let mut total: u128 = 0;
    for caps in COMPONENT_RE.captures_iter(body) {
        let whole = caps.get(1).map_or("", |m| m.as_str());
        let fraction = caps.get(2).map_or("", |m| m.as_str());
        let unit = caps.get(3).map_or("", |m| m.as_str());

        let nanos = component_nanos(whole, fraction, unit_nanos(unit))
            .ok_or_else(|| DurationError::Overflow(input.to_string()))?;
        total = total
            .checked_add(nanos)
            .filter(|t| *t <= MAX_NANOS)
            .ok_or_else(|| DurationError::Overflow(input.to_string()))?;
    }

    if negative {
        return Ok(Duration::ZERO);
    }

    // MAX_NANOS fits in a u64
    Ok(Duration::from_nanos(total as u64))
}

fn unit_nanos(unit: &str) -> u128 {
    match unit {
        "ns" => 1,
        "us" | "µs" | "μs" => 1_000,
        "ms" => 1_000_000,
        "s" => 1_000_000_000,
        "m" => 60 * 1_000_000_000,
        _ => 3_600 * 1_000_000_000,
    }
}

fn component_nanos(whole: &str, fraction: &str, scale: u128) -> Option<u128> {
    let whole_value = if whole.is_empty() {
        0
    } else {
        whole.parse::<u128>().ok()?
    };
    let mut nanos = whole_value.checked_mul(scale)?;

    let fraction = &fraction[..fraction.len().min(MAX_FRACTION_DIGITS)];
    if !fraction.is_empty() {
        let numerator = fraction.parse::<u128>().ok()?;
        let denominator = 10u128.pow(fraction.len() as u32);
        nanos = nanos.checked_add(numerator * scale / denominator)?;
    }

    (nanos <= MAX_NANOS).then_some(nanos)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_units() {
        assert_eq!(parse_duration("500ms"), Ok(Duration::from_millis(500)));
        assert_eq!(parse_duration("2s"), Ok(Duration::from_secs(2)));
        assert_eq!(parse_duration("3m"), Ok(Duration::from_secs(180)));
        assert_eq!(parse_duration("1h"), Ok(Duration::from_secs(3_600)));
        assert_eq!(parse_duration("10us"), Ok(Duration::from_micros(10)));
        assert_eq!(parse_duration("10µs"), Ok(Duration::from_micros(10)));
        assert_eq!(parse_duration("10μs"), Ok(Duration::from_micros(10)));
        assert_eq!(parse_duration("7ns"), Ok(Duration::from_nanos(7)));
    }

    #[test]
    fn parses_compound_and_fractional_expressions() {
        assert_eq!(parse_duration("1h30m"), Ok(Duration::from_secs(5_400)));
        assert_eq!(parse_duration("2h45m10s"), Ok(Duration::from_secs(9_910)));
        assert_eq!(parse_duration("1.5s"), Ok(Duration::from_millis(1_500)));
        assert_eq!(parse_duration(".5s"), Ok(Duration::from_millis(500)));
        assert_eq!(parse_duration("1.s"), Ok(Duration::from_secs(1)));
        assert_eq!(parse_duration("+250ms"), Ok(Duration::from_millis(250)));
    }

    #[test]
    fn zero_and_negative_durations_do_not_pause() {
        assert_eq!(parse_duration("0"), Ok(Duration::ZERO));
        assert_eq!(parse_duration("-0"), Ok(Duration::ZERO));
        assert_eq!(parse_duration("0s"), Ok(Duration::ZERO));
        assert_eq!(parse_duration("-5s"), Ok(Duration::ZERO));
    }

    #[test]
    fn rejects_malformed_expressions() {
        for input in ["", "5", "ms", "abc", "5 s", "5x", "1.5", "s5", ".s", "--1s"] {
            assert_eq!(
                parse_duration(input),
                Err(DurationError::Invalid(input.to_string())),
                "{input:?} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_out_of_range_expressions() {
        assert_eq!(
            parse_duration("9999999999h"),
            Err(DurationError::Overflow("9999999999h".to_string()))
        );
    }
}
