//! Number display helpers: compact suffixes, thousands grouping and
//! scientific-notation expansion.

use tracing::warn;

use crate::error::CodecError;

/// Largest exponent accepted by [`expand_scientific`].
const MAX_EXPONENT: i64 = 1_000;

const SCALES: [(f64, &str); 5] = [(1.0, ""), (1e3, "K"), (1e6, "M"), (1e9, "B"), (1e12, "T")];

/// Formats a value with a K/M/B/T suffix and two decimals.
///
/// The suffix is chosen after rounding, so `999_999` is `"1.00M"` rather
/// than `"1000.00K"`. `None`, NaN and infinities render as `"0"`.
pub fn format_compact_number(value: Option<f64>) -> String {
    let Some(value) = value.filter(|v| v.is_finite()) else {
        if let Some(v) = value {
            warn!(value = %v, "non-finite value passed to compact formatter");
        }
        return "0".to_string();
    };

    let magnitude = value.abs();
    let mut scale = SCALES
        .iter()
        .rposition(|(threshold, _)| magnitude >= *threshold)
        .unwrap_or(0);
    if scale + 1 < SCALES.len() && rounds_past_scale(magnitude / SCALES[scale].0) {
        scale += 1;
    }
    let (threshold, suffix) = SCALES[scale];
    format!("{:.2}{suffix}", value / threshold)
}

/// True when two-decimal rounding carries a scaled value to `1000.00`.
fn rounds_past_scale(scaled: f64) -> bool {
    format!("{scaled:.2}").len() > "999.99".len()
}

/// Formats a fiat value as `$` followed by its compact form.
pub fn format_currency(value: Option<f64>) -> String {
    match value.filter(|v| v.is_finite()) {
        Some(v) => format!("${}", format_compact_number(Some(v))),
        None => "$0.00".to_string(),
    }
}

/// Inserts `,` between every group of three digits, counting from the right.
///
/// The input is expected to be a plain run of ASCII digits.
pub fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Groups the integer digits of a number with thousands separators.
///
/// Fractional digits are left alone. `None` renders as `"0"`; text that is
/// not a plain number is returned unchanged.
pub fn format_number_with_commas(value: Option<&str>) -> String {
    let Some(value) = value else {
        return "0".to_string();
    };

    let (sign, unsigned) = match value.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", value),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    if int_part.is_empty() || !int_part.bytes().all(|b| b.is_ascii_digit()) {
        return value.to_string();
    }

    let grouped = group_thousands(int_part);
    match frac_part {
        Some(frac) => format!("{sign}{grouped}.{frac}"),
        None => format!("{sign}{grouped}"),
    }
}

/// Rewrites a decimal number, possibly in scientific notation, as a plain
/// decimal string.
///
/// Works on digits only, so no precision is lost: `"1.5e-7"` becomes
/// `"0.00000015"` and `"1e+21"` becomes `"1000000000000000000000"`. The
/// output has no leading zeros in the integer part and no trailing zeros in
/// the fraction.
pub fn expand_scientific(value: &str) -> Result<String, CodecError> {
    let invalid = || CodecError::InvalidAmount(value.to_string());
    let trimmed = value.trim();

    let (negative, unsigned) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let (mantissa, exponent) = match unsigned.split_once(['e', 'E']) {
        Some((m, e)) => {
            let exp: i64 = e.parse().map_err(|_| invalid())?;
            if exp.abs() > MAX_EXPONENT {
                return Err(invalid());
            }
            (m, exp)
        }
        None => (unsigned, 0),
    };

    let (int_digits, frac_digits) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if (int_digits.is_empty() && frac_digits.is_empty())
        || !all_digits(int_digits)
        || !all_digits(frac_digits)
    {
        return Err(invalid());
    }

    let digits = format!("{int_digits}{frac_digits}");
    let point = int_digits.len() as i64 + exponent;

    let (whole, fraction) = if point <= 0 {
        let zeros = "0".repeat(point.unsigned_abs() as usize);
        (String::new(), format!("{zeros}{digits}"))
    } else if point as usize >= digits.len() {
        let zeros = "0".repeat(point as usize - digits.len());
        (format!("{digits}{zeros}"), String::new())
    } else {
        let (w, f) = digits.split_at(point as usize);
        (w.to_string(), f.to_string())
    };

    let whole = whole.trim_start_matches('0');
    let whole = if whole.is_empty() { "0" } else { whole };
    let fraction = fraction.trim_end_matches('0');

    let sign = if negative && !(whole == "0" && fraction.is_empty()) {
        "-"
    } else {
        ""
    };

    if fraction.is_empty() {
        Ok(format!("{sign}{whole}"))
    } else {
        Ok(format!("{sign}{whole}.{fraction}"))
    }
}

/// Plain-decimal rendering of a possibly scientific number, `"0"` on
/// missing or malformed input.
pub fn to_plain_decimal(value: Option<&str>) -> String {
    let Some(value) = value else {
        return "0".to_string();
    };
    expand_scientific(value).unwrap_or_else(|e| {
        warn!(error = %e, "could not expand number");
        "0".to_string()
    })
}
