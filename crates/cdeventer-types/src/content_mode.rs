//! CloudEvents HTTP content modes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How a CloudEvent is laid out on an HTTP request.
///
/// Names are matched case-insensitively, from config files and the CLI alike.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum ContentMode {
    /// Attributes travel as `ce-*` headers, the body is the event data.
    #[default]
    Binary,
    /// The whole event is one `application/cloudevents+json` document.
    Structured,
}

impl ContentMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Binary => "binary",
            Self::Structured => "structured",
        }
    }
}

impl fmt::Display for ContentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown content mode name.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown content mode '{0}' (expected 'binary' or 'structured')")]
pub struct ParseContentModeError(String);

impl FromStr for ContentMode {
    type Err = ParseContentModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "binary" => Ok(Self::Binary),
            "structured" => Ok(Self::Structured),
            _ => Err(ParseContentModeError(s.to_string())),
        }
    }
}

impl TryFrom<String> for ContentMode {
    type Error = ParseContentModeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_binary() {
        assert_eq!(ContentMode::default(), ContentMode::Binary);
    }

    #[test]
    fn test_parse() {
        assert_eq!("binary".parse::<ContentMode>().unwrap(), ContentMode::Binary);
        assert_eq!(
            "Structured".parse::<ContentMode>().unwrap(),
            ContentMode::Structured
        );
        assert!("batched".parse::<ContentMode>().is_err());
    }

    #[test]
    fn test_deserialize_ignores_case() {
        let mode: ContentMode = serde_json::from_str(r#""STRUCTURED""#).unwrap();
        assert_eq!(mode, ContentMode::Structured);
        let mode: ContentMode = serde_json::from_str(r#""Binary""#).unwrap();
        assert_eq!(mode, ContentMode::Binary);

        let err = serde_json::from_str::<ContentMode>(r#""batched""#).unwrap_err();
        assert!(err.to_string().contains("unknown content mode"));
        assert_eq!(serde_json::to_string(&ContentMode::Structured).unwrap(), r#""structured""#);
    }
}
