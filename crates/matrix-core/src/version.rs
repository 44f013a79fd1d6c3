//! # Numeric Versions
//!
//! Exact decimal numbers for PHP versions (`7.4`, `8.0`) and core version
//! numbers (`2018120300`, `2022041900.00`).
//!
//! Values compare by magnitude, never as text, and never through floats:
//! `8.0 == 8`, `7.4 < 8.0`, `310 > 39`.

use crate::MatrixError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// A non-negative decimal number.
///
/// The fractional digits are stored without trailing zeros, so the derived
/// ordering (whole part, then fractional digits as text) is numeric order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NumericVersion {
    whole: u64,
    fraction: String,
}

impl NumericVersion {
    /// Create a whole-number version.
    #[must_use]
    pub const fn from_whole(whole: u64) -> Self {
        Self {
            whole,
            fraction: String::new(),
        }
    }

    /// The integer part.
    #[must_use]
    pub const fn whole(&self) -> u64 {
        self.whole
    }

    /// Whether the value is zero (`0`, `0.0`).
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.whole == 0 && self.fraction.is_empty()
    }

    /// Read a number out of a JSON/YAML scalar.
    ///
    /// Strings and numbers are accepted; anything else is `None`.
    #[must_use]
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => s.parse().ok(),
            Value::Number(n) => n.to_string().parse().ok(),
            _ => None,
        }
    }
}

impl FromStr for NumericVersion {
    type Err = MatrixError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let invalid = || MatrixError::InvalidNumber(s.to_string());

        let (whole, fraction) = match trimmed.split_once('.') {
            Some((w, f)) => (w, f),
            None => (trimmed, ""),
        };

        // "7." and ".5" are both valid.
        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid());
        }
        if !whole.bytes().all(|b| b.is_ascii_digit()) || !fraction.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }

        let whole = if whole.is_empty() {
            0
        } else {
            whole.parse::<u64>().map_err(|_| invalid())?
        };

        Ok(Self {
            whole,
            fraction: fraction.trim_end_matches('0').to_string(),
        })
    }
}

impl fmt::Display for NumericVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.fraction.is_empty() {
            write!(f, "{}", self.whole)
        } else {
            write!(f, "{}.{}", self.whole, self.fraction)
        }
    }
}

impl Serialize for NumericVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for NumericVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_json(&value)
            .ok_or_else(|| serde::de::Error::custom(format!("not a decimal number: {value}")))
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> NumericVersion {
        s.parse().expect("valid number")
    }

    #[test]
    fn trailing_zeros_do_not_matter() {
        assert_eq!(v("8.0"), v("8"));
        assert_eq!(v("2022041900.00"), v("2022041900"));
        assert_eq!(v("7.40"), v("7.4"));
    }

    #[test]
    fn ordering_is_numeric() {
        assert!(v("7.4") < v("8.0"));
        assert!(v("310") > v("39"));
        assert!(v("7.10") > v("7.9"));
        assert!(v("7.05") < v("7.5"));
        assert!(v("2018051700") < v("2018120300"));
    }

    #[test]
    fn zero_in_any_spelling() {
        assert!(v("0").is_zero());
        assert!(v("0.00").is_zero());
        assert!(!v("0.01").is_zero());
        assert!(!v("10").is_zero());
    }

    #[test]
    fn rejects_non_numbers() {
        assert!("main".parse::<NumericVersion>().is_err());
        assert!("".parse::<NumericVersion>().is_err());
        assert!(".".parse::<NumericVersion>().is_err());
        assert!("-1".parse::<NumericVersion>().is_err());
        assert!("1.2.3".parse::<NumericVersion>().is_err());
    }

    #[test]
    fn accepts_bare_fractions_and_padding() {
        assert_eq!(v(".5"), v("0.5"));
        assert_eq!(v(" 8.1 "), v("8.1"));
        assert_eq!(v("7."), v("7"));
    }

    #[test]
    fn reads_json_scalars() {
        assert_eq!(NumericVersion::from_json(&Value::from("7.4")), Some(v("7.4")));
        assert_eq!(NumericVersion::from_json(&Value::from(8.0)), Some(v("8")));
        assert_eq!(
            NumericVersion::from_json(&Value::from(2020061500_u64)),
            Some(v("2020061500"))
        );
        assert_eq!(NumericVersion::from_json(&Value::Bool(true)), None);
    }

    #[test]
    fn display_and_serde() {
        assert_eq!(v("8.10").to_string(), "8.1");
        assert_eq!(v("39").to_string(), "39");

        let json = serde_json::to_string(&v("2022041900.01")).expect("serialize");
        assert_eq!(json, "\"2022041900.01\"");

        let back: NumericVersion = serde_json::from_str("2022041900").expect("deserialize");
        assert_eq!(back, NumericVersion::from_whole(2022041900));
        let back: NumericVersion = serde_json::from_str("\"7.4\"").expect("deserialize");
        assert_eq!(back, v("7.4"));
    }
}
