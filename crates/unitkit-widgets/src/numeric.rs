#![forbid(unsafe_code)]

//! Lenient number parsing and canonical number formatting.
//!
//! These follow the web platform's `parseFloat` and `Number#toString`
//! closely enough that text typed into a stepper behaves the same way users
//! expect from a browser form: the longest numeric prefix wins, and integral
//! values print without a fraction.

/// Replace the first `,` with `.` so `"12,3"` reads as `12.3`.
pub fn normalize_decimal_separator(text: &str) -> std::borrow::Cow<'_, str> {
    match text.find(',') {
        Some(idx) => {
            let mut owned = String::with_capacity(text.len());
            owned.push_str(&text[..idx]);
            owned.push('.');
            owned.push_str(&text[idx + 1..]);
            std::borrow::Cow::Owned(owned)
        }
        None => std::borrow::Cow::Borrowed(text),
    }
}

/// Parse the longest valid leading decimal literal.
///
/// Leading whitespace is skipped. The literal is an optional sign, then
/// digits with an optional fraction (at least one digit overall), then an
/// optional exponent that is only consumed when it has digits. A signed
/// `Infinity` literal is accepted. Anything after the literal is ignored.
///
/// ```
/// use unitkit_widgets::numeric::parse_leading_float;
///
/// assert_eq!(parse_leading_float("12a3"), Some(12.0));
/// assert_eq!(parse_leading_float("12.4.5"), Some(12.4));
/// assert_eq!(parse_leading_float(" .5"), Some(0.5));
/// assert_eq!(parse_leading_float("1e"), Some(1.0));
/// assert_eq!(parse_leading_float("a123"), None);
/// ```
pub fn parse_leading_float(text: &str) -> Option<f64> {
    let s = text.trim_start();
    let bytes = s.as_bytes();
    let mut pos = 0;

    let negative = match bytes.first() {
        Some(b'-') => {
            pos += 1;
            true
        }
        Some(b'+') => {
            pos += 1;
            false
        }
        _ => false,
    };

    if s[pos..].starts_with("Infinity") {
        return Some(if negative {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }

    let int_start = pos;
    while pos < bytes.len() && bytes[pos].is_ascii_digit() {
        pos += 1;
    }
    let mut digits = pos - int_start;

    if pos < bytes.len() && bytes[pos] == b'.' {
        let frac_start = pos + 1;
        let mut end = frac_start;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
        digits += end - frac_start;
        pos = end;
    }

    if digits == 0 {
        return None;
    }

    if pos < bytes.len() && matches!(bytes[pos], b'e' | b'E') {
        let mut end = pos + 1;
        if end < bytes.len() && matches!(bytes[end], b'+' | b'-') {
            end += 1;
        }
        let exp_digits_start = end;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
        if end > exp_digits_start {
            pos = end;
        }
    }

    s[..pos].parse::<f64>().ok()
}

/// Canonical display string for a number.
///
/// Integral values have no fraction, the shortest round-tripping decimal is
/// used, negative zero prints as `"0"`, and magnitudes outside
/// `[1e-6, 1e21)` use exponent notation with an explicit exponent sign.
///
/// ```
/// use unitkit_widgets::numeric::format_value;
///
/// assert_eq!(format_value(15.0), "15");
/// assert_eq!(format_value(1.1), "1.1");
/// assert_eq!(format_value(-0.0), "0");
/// assert_eq!(format_value(1e21), "1e+21");
/// ```
pub fn format_value(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    let magnitude = value.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return format!("{value}");
    }
    let sci = format!("{value:e}");
    match sci.split_once('e') {
        Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
        _ => sci,
    }
}

/// Number of fractional digits in the canonical form of `step`.
///
/// `0.1` has one, `0.25` two, `1` none.
pub fn decimals_of(step: f64) -> u32 {
    let text = format!("{}", step.abs());
    text.split_once('.')
        .map_or(0, |(_, frac)| frac.len() as u32)
}

/// Round to `decimals` fractional digits the way `Number(x.toFixed(d))` does.
///
/// The exact binary value is rounded, not its product with `10^d`, and an
/// exact tie goes away from zero. This keeps `1.1 - 0.1` at `1` instead of
/// `1.0000000000000002` while `0.25 + 0.1` (really `0.34999...`) stays `0.3`.
///
/// Values that are already integral (magnitude at least `2^52`) and
/// non-finite values come back unchanged.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    const INTEGRAL: f64 = 4_503_599_627_370_496.0; // 2^52
    if !value.is_finite() || value.abs() >= INTEGRAL || value == 0.0 {
        return value;
    }
    let Some(scale) = 10u128.checked_pow(decimals).filter(|_| decimals <= 20) else {
        return format!("{:.prec$}", value, prec = decimals as usize)
            .parse()
            .unwrap_or(value);
    };

    // value = mantissa * 2^-shift; shift >= 1 since |value| < 2^52.
    let bits = value.abs().to_bits();
    let exponent = ((bits >> 52) & 0x7ff) as i32;
    let fraction = u128::from(bits & ((1u64 << 52) - 1));
    let (mantissa, shift) = if exponent == 0 {
        (fraction, 1074)
    } else {
        (fraction | (1u128 << 52), 1075 - exponent)
    };
    let shift = shift as u32;

    // mantissa < 2^53 and scale <= 10^20 < 2^67, so this cannot overflow.
    let numerator = mantissa * scale;
    let digits = if shift >= 128 {
        0
    } else {
        let quotient = numerator >> shift;
        let remainder = numerator - (quotient << shift);
        if remainder >= 1u128 << (shift - 1) {
            quotient + 1
        } else {
            quotient
        }
    };

    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}{digits}e-{decimals}")
        .parse()
        .unwrap_or(value)
}
