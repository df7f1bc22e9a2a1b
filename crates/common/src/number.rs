//! Number literal parsing.
//!
//! A literal is the longest leading prefix of the token that reads as a
//! floating-point number: decimal with optional fraction and exponent, hex
//! (`0X1F`, `0X1.8P3`), or `INF`/`INFINITY`/`NAN`. Trailing characters are
//! ignored, so `5X` reads as 5 and `1.2.3` as 1.2. A token with no such
//! prefix, or whose value overflows or underflows `f64`, is rejected.

use crate::error::DecodeError;

/// Parse the leading number literal of `token`.
pub fn parse_number(token: &str) -> Result<f64, DecodeError> {
    scan(token)
        .map(|(value, _)| value)
        .ok_or_else(|| DecodeError::InvalidNumber(token.to_string()))
}

/// Scan the longest literal prefix, returning its value and byte length.
fn scan(token: &str) -> Option<(f64, usize)> {
    let (negative, start) = match token.as_bytes().first() {
        Some(b'-') => (true, 1),
        Some(b'+') => (false, 1),
        _ => (false, 0),
    };
    let rest = &token[start..];
    let (magnitude, len) = scan_special(rest)
        .or_else(|| scan_hex(rest))
        .or_else(|| scan_decimal(rest))?;
    let value = if negative { -magnitude } else { magnitude };
    Some((value, start + len))
}

fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    text.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

/// `INFINITY`, `INF`, or `NAN` with an optional `(chars)` payload.
fn scan_special(text: &str) -> Option<(f64, usize)> {
    if starts_with_ignore_case(text, "INFINITY") {
        return Some((f64::INFINITY, 8));
    }
    if starts_with_ignore_case(text, "INF") {
        return Some((f64::INFINITY, 3));
    }
    if !starts_with_ignore_case(text, "NAN") {
        return None;
    }
    let bytes = text.as_bytes();
    let mut len = 3;
    if bytes.get(len) == Some(&b'(') {
        let payload = bytes[len + 1..]
            .iter()
            .take_while(|b| b.is_ascii_alphanumeric() || **b == b'_')
            .count();
        if bytes.get(len + 1 + payload) == Some(&b')') {
            len += payload + 2;
        }
    }
    Some((f64::NAN, len))
}

/// Count the run of bytes at `from` that satisfy `pred`.
fn run_len(bytes: &[u8], from: usize, pred: impl Fn(u8) -> bool) -> usize {
    bytes
        .get(from..)
        .map_or(0, |tail| tail.iter().take_while(|b| pred(**b)).count())
}

/// Length of an exponent `<marker>[+-]digits` at `from`, or 0 if incomplete.
fn exponent_len(bytes: &[u8], from: usize, marker: u8) -> usize {
    if !bytes.get(from).is_some_and(|b| b.eq_ignore_ascii_case(&marker)) {
        return 0;
    }
    let sign = usize::from(matches!(bytes.get(from + 1), Some(b'+' | b'-')));
    match run_len(bytes, from + 1 + sign, |b| b.is_ascii_digit()) {
        0 => 0,
        digits => 1 + sign + digits,
    }
}

fn scan_decimal(text: &str) -> Option<(f64, usize)> {
    let bytes = text.as_bytes();
    let int = run_len(bytes, 0, |b| b.is_ascii_digit());
    let mut len = int;
    let mut frac = 0;
    if bytes.get(len) == Some(&b'.') {
        frac = run_len(bytes, len + 1, |b| b.is_ascii_digit());
        if int + frac > 0 {
            len += 1 + frac;
        }
    }
    if int + frac == 0 {
        return None;
    }
    let mantissa_nonzero = bytes[..len].iter().any(|b| matches!(b, b'1'..=b'9'));
    len += exponent_len(bytes, len, b'E');

    let value = text[..len].parse::<f64>().ok()?;
    in_range(value, mantissa_nonzero).then_some((value, len))
}

/// `0X` followed by hex digits, an optional fraction, and an optional
/// binary exponent. Without any hex digit only the leading `0` is a literal,
/// which the decimal scanner picks up.
fn scan_hex(text: &str) -> Option<(f64, usize)> {
    if !starts_with_ignore_case(text, "0X") {
        return None;
    }
    let bytes = text.as_bytes();
    let int = run_len(bytes, 2, |b| b.is_ascii_hexdigit());
    let mut len = 2 + int;
    let mut frac = 0;
    if bytes.get(len) == Some(&b'.') {
        frac = run_len(bytes, len + 1, |b| b.is_ascii_hexdigit());
        if int + frac > 0 {
            len += 1 + frac;
        }
    }
    if int + frac == 0 {
        return None;
    }

    let mut mantissa = 0.0_f64;
    for &b in bytes[2..len].iter().filter(|b| **b != b'.') {
        let digit = char::from(b).to_digit(16)?;
        mantissa = mantissa * 16.0 + f64::from(digit);
    }
    let mut exponent = i32::try_from(frac)
        .unwrap_or(i32::MAX)
        .saturating_mul(-4);
    let exp_len = exponent_len(bytes, len, b'P');
    if exp_len > 0 {
        let digits = &text[len + 1..len + exp_len];
        let parsed = digits.parse::<i32>().unwrap_or(if digits.starts_with('-') {
            i32::MIN / 2
        } else {
            i32::MAX / 2
        });
        exponent = exponent.saturating_add(parsed);
        len += exp_len;
    }

    let value = if mantissa == 0.0 {
        0.0
    } else {
        mantissa * 2f64.powi(exponent.clamp(-2200, 2200))
    };
    in_range(value, mantissa != 0.0).then_some((value, len))
}

/// Reject results that overflowed to infinity or underflowed below the
/// normal range.
fn in_range(value: f64, mantissa_nonzero: bool) -> bool {
    if value.is_infinite() {
        return false;
    }
    !(mantissa_nonzero && (value == 0.0 || value.is_subnormal()))
}
