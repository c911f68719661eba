//! Timeout parsing for `<number><unit>` sequences such as `5s` or `1m30s`.

use std::time::Duration;

const UNITS: &[(&str, u128)] = &[
    ("ns", 1),
    ("us", 1_000),
    ("µs", 1_000),
    ("μs", 1_000),
    ("ms", 1_000_000),
    ("s", 1_000_000_000),
    ("m", 60_000_000_000),
    ("h", 3_600_000_000_000),
];

// Fractions finer than a nanosecond carry no information.
const MAX_FRACTION_DIGITS: usize = 18;

pub(crate) fn parse_duration(input: &str) -> Result<Duration, &'static str> {
    let text = input.trim();
    if text.is_empty() {
        return Err("empty duration");
    }
    if text == "0" {
        return Ok(Duration::ZERO);
    }

    let mut rest = text;
    let mut total: u128 = 0;
    while !rest.is_empty() {
        let (whole, after_whole) = split_digits(rest);
        let (fraction, after_fraction) = match after_whole.strip_prefix('.') {
            Some(tail) => split_digits(tail),
            None => ("", after_whole),
        };
        if whole.is_empty() && fraction.is_empty() {
            return Err("expected a number");
        }

        let unit_len = after_fraction
            .find(|ch: char| ch.is_ascii_digit() || ch == '.')
            .unwrap_or(after_fraction.len());
        let (unit, tail) = after_fraction.split_at(unit_len);
        if unit.is_empty() {
            return Err("missing unit");
        }
        let scale = UNITS
            .iter()
            .find(|(name, _)| *name == unit)
            .map(|(_, scale)| *scale)
            .ok_or("unknown unit")?;

        total = total
            .checked_add(segment_nanos(whole, fraction, scale)?)
            .ok_or("duration out of range")?;
        rest = tail;
    }

    u64::try_from(total)
        .map(Duration::from_nanos)
        .map_err(|_| "duration out of range")
}

fn split_digits(text: &str) -> (&str, &str) {
    let len = text
        .find(|ch: char| !ch.is_ascii_digit())
        .unwrap_or(text.len());
    text.split_at(len)
}

fn segment_nanos(whole: &str, fraction: &str, scale: u128) -> Result<u128, &'static str> {
    let whole_value: u128 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| "duration out of range")?
    };
    let mut nanos = whole_value
        .checked_mul(scale)
        .ok_or("duration out of range")?;

    let fraction = &fraction[..fraction.len().min(MAX_FRACTION_DIGITS)];
    if !fraction.is_empty() {
        let digits = u32::try_from(fraction.len()).map_err(|_| "duration out of range")?;
        let numerator: u128 = fraction.parse().map_err(|_| "duration out of range")?;
        nanos = nanos
            .checked_add(numerator * scale / 10u128.pow(digits))
            .ok_or("duration out of range")?;
    }
    Ok(nanos)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_and_compound_segments() {
        assert_eq!(parse_duration("5s"), Ok(Duration::from_secs(5)));
        assert_eq!(parse_duration("250ms"), Ok(Duration::from_millis(250)));
        assert_eq!(parse_duration("1m30s"), Ok(Duration::from_secs(90)));
        assert_eq!(parse_duration("1h"), Ok(Duration::from_secs(3600)));
        assert_eq!(parse_duration("1.5s"), Ok(Duration::from_millis(1500)));
        assert_eq!(parse_duration("10us"), Ok(Duration::from_micros(10)));
        assert_eq!(parse_duration(" 0 "), Ok(Duration::ZERO));
    }

    #[test]
    fn rejects_malformed_input() {
        assert_eq!(parse_duration(""), Err("empty duration"));
        assert_eq!(parse_duration("5"), Err("missing unit"));
        assert_eq!(parse_duration("5d"), Err("unknown unit"));
        assert_eq!(parse_duration("s"), Err("expected a number"));
        assert_eq!(parse_duration("-5s"), Err("expected a number"));
    }

    #[test]
    fn rejects_values_beyond_the_nanosecond_range() {
        let whole = u128::MAX / 3_600_000_000_000;
        assert_eq!(
            parse_duration(&format!("{whole}.999999999999999999h")),
            Err("duration out of range")
        );
        assert_eq!(
            parse_duration("999999999999999999999h"),
            Err("duration out of range")
        );
    }
}
