// ── Resource identity ──
//
// The backend mixes numeric ids (categories) with string ids (Mongo
// ObjectIds for customers, banners, orders). `ResourceId` holds either
// behind one hashable key.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Canonical identifier for any backend resource.
///
/// Deserializes from a JSON number or string without a tag. Two ids are
/// equal only when both variant and value match; use
/// [`matches_str`](Self::matches_str) to compare against user input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResourceId {
    Numeric(i64),
    Text(String),
}

impl ResourceId {
    /// Compare against a user-supplied identifier by rendered form.
    pub fn matches_str(&self, raw: &str) -> bool {
        match self {
            Self::Text(s) => s == raw,
            Self::Numeric(n) => raw.parse::<i64>().is_ok_and(|r| r == *n),
        }
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

/// Parses decimal input as `Numeric`, anything else as `Text`.
impl FromStr for ResourceId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.parse::<i64>()
            .map_or_else(|_| Self::Text(s.to_owned()), Self::Numeric))
    }
}

impl From<i64> for ResourceId {
    fn from(n: i64) -> Self {
        Self::Numeric(n)
    }
}

impl From<String> for ResourceId {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for ResourceId {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_numbers_and_strings() {
        let n: ResourceId = serde_json::from_str("7").unwrap();
        let s: ResourceId = serde_json::from_str(r#""64f1c0ab""#).unwrap();
        assert_eq!(n, ResourceId::Numeric(7));
        assert_eq!(s, ResourceId::Text("64f1c0ab".into()));
    }

    #[test]
    fn matches_str_handles_both_variants() {
        assert!(ResourceId::Numeric(42).matches_str("42"));
        assert!(!ResourceId::Numeric(42).matches_str("042x"));
        assert!(ResourceId::from("abc").matches_str("abc"));
    }

    #[test]
    fn from_str_prefers_numeric() {
        assert_eq!("12".parse::<ResourceId>().unwrap(), ResourceId::Numeric(12));
        assert_eq!(
            "a1".parse::<ResourceId>().unwrap(),
            ResourceId::Text("a1".into())
        );
    }
}
