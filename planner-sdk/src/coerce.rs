//! Form field coercion
//!
//! Raw form strings become typed payload fields here. Numeric coercion never
//! fails: anything without a leading integer becomes `0`. Text coercion trims
//! and reports blank input as `None` so the caller can reject it.

/// How a raw form value should be read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Base-10 integer, defaulting to `0`
    Numeric,
    /// Trimmed free text
    Text,
}

/// A coerced field value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Coerced {
    Integer(i64),
    /// `None` when the input was empty or all whitespace
    Text(Option<String>),
}

/// Coerce a raw value according to its kind
pub fn coerce(raw: &str, kind: FieldKind) -> Coerced {
    match kind {
        FieldKind::Numeric => Coerced::Integer(coerce_int(raw)),
        FieldKind::Text => Coerced::Text(coerce_text(raw)),
    }
}

/// Parse the leading base-10 integer of `raw`, or `0` if there is none
///
/// Leading whitespace and a single sign are accepted and parsing stops at the
/// first non-digit, so `"12 days"` reads as `12` and `"3.9"` as `3`. Values
/// outside the `i64` range saturate.
pub fn coerce_int(raw: &str) -> i64 {
    let trimmed = raw.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return 0;
    }

    let mut value: i64 = 0;
    for b in digits[..end].bytes() {
        let digit = i64::from(b - b'0');
        value = match value.checked_mul(10).and_then(|v| v.checked_add(digit)) {
            Some(v) => v,
            None => return if negative { i64::MIN } else { i64::MAX },
        };
    }

    if negative {
        -value
    } else {
        value
    }
}

/// Trim `raw`, returning `None` if nothing is left
pub fn coerce_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_int_defaults_to_zero() {
        for raw in ["", "   ", "abc", "NaN", "-", "+", ".5", "x12"] {
            assert_eq!(coerce_int(raw), 0, "input {:?}", raw);
        }
    }

    #[test]
    fn test_coerce_int_reads_leading_integer() {
        assert_eq!(coerce_int("17"), 17);
        assert_eq!(coerce_int("  4"), 4);
        assert_eq!(coerce_int("-2"), -2);
        assert_eq!(coerce_int("+8"), 8);
        assert_eq!(coerce_int("3.9"), 3);
        assert_eq!(coerce_int("12 days"), 12);
        assert_eq!(coerce_int("99999999999999999999999"), i64::MAX);
    }

    #[test]
    fn test_coerce_text() {
        assert_eq!(coerce_text("  Python \n"), Some("Python".to_string()));
        assert_eq!(coerce_text(" \t "), None);
        assert_eq!(coerce("", FieldKind::Text), Coerced::Text(None));
        assert_eq!(coerce("5", FieldKind::Numeric), Coerced::Integer(5));
    }
}
