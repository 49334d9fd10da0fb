//! UK postcode district codes.
//!
//! A district is the outward half of a postcode (`"B15"` from `"B15 2TT"`).
//! Codes order numerically on their number part so that `"B2"` sorts before
//! `"B10"`, which is the order the fused output is emitted in.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// A validated postcode district code such as `"B1"`, `"B15"`, or `"WS10"`.
///
/// Always stored trimmed and upper-cased.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DistrictCode(String);

impl DistrictCode {
    /// Parses and normalizes a district code.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidDistrictCodeError`] if the code is empty, does not
    /// start with a letter, or contains anything other than ASCII letters
    /// and digits.
    pub fn parse(raw: &str) -> Result<Self, InvalidDistrictCodeError> {
        let code = raw.trim().to_ascii_uppercase();

        let valid = code.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
            && code.chars().all(|c| c.is_ascii_alphanumeric());

        if valid {
            Ok(Self(code))
        } else {
            Err(InvalidDistrictCodeError {
                value: raw.to_string(),
            })
        }
    }

    /// Derives the district from a full postcode.
    ///
    /// Spaced postcodes (`"B15 2TT"`) use the first token. Unspaced ones
    /// (`"B152TT"`) drop the three-character inward code.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidDistrictCodeError`] if no valid outward code can be
    /// extracted.
    pub fn from_postcode(postcode: &str) -> Result<Self, InvalidDistrictCodeError> {
        let trimmed = postcode.trim();

        let outward = match trimmed.split_whitespace().next() {
            Some(first) if trimmed.contains(char::is_whitespace) => first,
            _ if trimmed.len() > 3 && trimmed.is_ascii() => &trimmed[..trimmed.len() - 3],
            _ => trimmed,
        };

        Self::parse(outward).map_err(|_| InvalidDistrictCodeError {
            value: postcode.to_string(),
        })
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Splits the code into `(letters, number, remainder)`.
    ///
    /// `"B15"` → `("B", Some(15), "")`, `"EC1A"` → `("EC", Some(1), "A")`.
    fn sort_key(&self) -> (&str, Option<u32>, &str) {
        let digits_start = self
            .0
            .find(|c: char| c.is_ascii_digit())
            .unwrap_or(self.0.len());
        let (prefix, rest) = self.0.split_at(digits_start);

        let digits_end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        let (digits, suffix) = rest.split_at(digits_end);

        (prefix, digits.parse().ok(), suffix)
    }
}

impl Ord for DistrictCode {
    fn cmp(&self, other: &Self) -> Ordering {
        let (a_prefix, a_num, a_suffix) = self.sort_key();
        let (b_prefix, b_num, b_suffix) = other.sort_key();

        // Codes without a number sort after every numbered code
        a_prefix
            .cmp(b_prefix)
            .then_with(|| match (a_num, b_num) {
                (Some(a), Some(b)) => a.cmp(&b),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            })
            .then_with(|| a_suffix.cmp(b_suffix))
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for DistrictCode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl std::fmt::Display for DistrictCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for DistrictCode {
    type Err = InvalidDistrictCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for DistrictCode {
    type Error = InvalidDistrictCodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<DistrictCode> for String {
    fn from(value: DistrictCode) -> Self {
        value.0
    }
}

/// Error returned when a string is not a usable postcode district code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidDistrictCodeError {
    /// The rejected input.
    pub value: String,
}

impl std::fmt::Display for InvalidDistrictCodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid district code '{}': expected letters followed by digits (e.g. B15)",
            self.value
        )
    }
}

impl std::error::Error for InvalidDistrictCodeError {}
