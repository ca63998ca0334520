use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use thiserror::Error;

/// Numeric identity the external calculator runs against (an osu! user id).
///
/// Only constructible through [`SubjectId::parse`], so every value held by the
/// queue is known to be a non-empty string of ASCII digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SubjectId(String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("`{0}` is not a numeric subject id")]
pub struct InvalidSubjectId(pub String);

impl SubjectId {
    pub fn parse(raw: &str) -> Result<Self, InvalidSubjectId> {
        if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(InvalidSubjectId(raw.to_string()));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for SubjectId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for SubjectId {
    type Error = InvalidSubjectId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<SubjectId> for String {
    fn from(value: SubjectId) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_digits() {
        let id = SubjectId::parse("7562902").unwrap();
        assert_eq!(id.as_str(), "7562902");
    }

    #[test]
    fn test_parse_rejects_non_numeric() {
        assert_eq!(
            SubjectId::parse("abc"),
            Err(InvalidSubjectId("abc".to_string()))
        );
        assert!(SubjectId::parse("12a").is_err());
        assert!(SubjectId::parse("-12").is_err());
        assert!(SubjectId::parse("1e3").is_err());
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert!(SubjectId::parse("").is_err());
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: SubjectId = serde_json::from_str("\"123\"").unwrap();
        assert_eq!(ok.as_str(), "123");
        assert!(serde_json::from_str::<SubjectId>("\"x1\"").is_err());
    }
}
