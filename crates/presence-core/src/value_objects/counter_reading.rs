//! Interpretation of the raw counter value held in the shared store.
//!
//! The external chat service keeps the number of active participants as a
//! string-encoded integer. Readers take its leading integer and treat anything
//! without one as zero, but "absent", "truncated" and "malformed" are kept
//! apart so that callers can log them differently.

use std::fmt;

/// Well-known store key holding the active participant count
pub const ACTIVE_KEY: &str = "active";

/// Result of interpreting a raw stored counter value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CounterReading {
    /// A valid non-negative integer
    Present(u64),
    /// A leading non-negative integer followed by other text, which is dropped
    Truncated { count: u64, raw: String },
    /// No value stored (missing key or empty string)
    Absent,
    /// A value is stored but does not start with a non-negative integer
    Malformed(String),
}

impl CounterReading {
    /// Interpret a raw value read from the store.
    ///
    /// Surrounding whitespace is ignored and an optional sign is accepted.
    /// The leading run of digits is the count; anything after it (a decimal
    /// part, an exponent, a unit) is dropped. No leading digits, a negative
    /// count, or a count beyond `u64` make the value malformed.
    pub fn from_raw(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::Absent;
        };

        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Self::Absent;
        }

        let (negative, unsigned) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };

        let digits = unsigned.bytes().take_while(u8::is_ascii_digit).count();
        if digits == 0 {
            return Self::Malformed(raw.to_string());
        }

        let Ok(count) = unsigned[..digits].parse::<u64>() else {
            return Self::Malformed(raw.to_string());
        };
        if negative && count != 0 {
            return Self::Malformed(raw.to_string());
        }

        if digits == unsigned.len() {
            Self::Present(count)
        } else {
            Self::Truncated {
                count,
                raw: raw.to_string(),
            }
        }
    }

    /// Count to report, coercing absent and malformed values to zero
    #[must_use]
    pub fn count(&self) -> u64 {
        match self {
            Self::Present(n) | Self::Truncated { count: n, .. } => *n,
            Self::Absent | Self::Malformed(_) => 0,
        }
    }

    #[must_use]
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed(_))
    }
}

impl fmt::Display for CounterReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Present(n) => write!(f, "{n}"),
            Self::Truncated { count, raw } => write!(f, "{count} (from {raw:?})"),
            Self::Absent => write!(f, "absent"),
            Self::Malformed(raw) => write!(f, "malformed({raw:?})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_present_values() {
        assert_eq!(CounterReading::from_raw(Some("42")), CounterReading::Present(42));
        assert_eq!(CounterReading::from_raw(Some("0")), CounterReading::Present(0));
        assert_eq!(CounterReading::from_raw(Some(" 7\n")), CounterReading::Present(7));
        assert_eq!(
            CounterReading::from_raw(Some("18446744073709551615")),
            CounterReading::Present(u64::MAX)
        );
    }

    #[test]
    fn test_absent_values() {
        assert_eq!(CounterReading::from_raw(None), CounterReading::Absent);
        assert_eq!(CounterReading::from_raw(Some("")), CounterReading::Absent);
        assert_eq!(CounterReading::from_raw(Some("   ")), CounterReading::Absent);
    }

    #[test]
    fn test_signed_values() {
        assert_eq!(CounterReading::from_raw(Some("+5")), CounterReading::Present(5));
        assert_eq!(CounterReading::from_raw(Some("-0")), CounterReading::Present(0));
    }

    #[test]
    fn test_leading_integer_is_kept() {
        for (raw, expected) in [("12abc", 12), ("3.7", 3), ("4.2", 4), ("42 users", 42), ("1e3", 1)] {
            let reading = CounterReading::from_raw(Some(raw));
            assert_eq!(
                reading,
                CounterReading::Truncated {
                    count: expected,
                    raw: raw.to_string()
                },
                "raw value {raw:?}"
            );
            assert_eq!(reading.count(), expected);
            assert!(!reading.is_malformed());
        }
    }

    #[test]
    fn test_malformed_values() {
        for raw in ["abc", "-5", "-3.5", "-", ".5", "NaN", "Infinity", "99999999999999999999"] {
            let reading = CounterReading::from_raw(Some(raw));
            assert!(reading.is_malformed(), "expected {raw:?} to be malformed");
            assert_eq!(reading.count(), 0);
        }
    }

    #[test]
    fn test_count_coercion() {
        assert_eq!(CounterReading::Present(3).count(), 3);
        assert_eq!(
            CounterReading::Truncated {
                count: 8,
                raw: "8x".to_string()
            }
            .count(),
            8
        );
        assert_eq!(CounterReading::Absent.count(), 0);
        assert_eq!(CounterReading::Malformed("x".to_string()).count(), 0);
    }

    #[test]
    fn test_display() {
        assert_eq!(CounterReading::Present(12).to_string(), "12");
        assert_eq!(CounterReading::Absent.to_string(), "absent");
        assert_eq!(CounterReading::Malformed("x".to_string()).to_string(), "malformed(\"x\")");
    }
}
