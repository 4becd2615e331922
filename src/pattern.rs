//! Pattern specifications: what to search for.
//!
//! A scanner is built from either an already-compiled [`Matcher`] or a
//! [`Descriptor`] carrying the pattern source and its flags. The two cases
//! form a closed set of variants; there is no runtime probing of
//! "matcher-like" values.

use serde::{Deserialize, Serialize};

use crate::error::PatternError;
use crate::matcher::Matcher;

/// How to obtain a matcher.
#[derive(Debug)]
pub enum PatternSpec {
    /// An already-built matcher, used as-is (including its current cursor).
    Ready(Matcher),
    /// Pattern source plus flags, compiled at construction.
    Descriptor(Descriptor),
}

/// Textual pattern descriptor.
///
/// Deserializable so pattern configuration can ship as JSON, with the same
/// defaults the constructors use:
///
/// ```json
/// { "source": "\\w+", "flags": "gd" }
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Descriptor {
    /// The pattern source, without surrounding delimiters.
    pub source: String,
    /// Flag string; defaults to global-only.
    #[serde(default = "default_flags")]
    pub flags: String,
    /// Starting cursor into the first buffer. Clamped into `[0, 2^32]`
    /// when the matcher is built.
    #[serde(default)]
    pub last_index: u64,
}

fn default_flags() -> String {
    "g".to_string()
}

impl Descriptor {
    /// Descriptor with explicit flags.
    pub fn new(source: impl Into<String>, flags: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            flags: flags.into(),
            last_index: 0,
        }
    }

    /// Same descriptor with a starting cursor.
    pub fn starting_at(mut self, last_index: u64) -> Self {
        self.last_index = last_index;
        self
    }

    /// Decode a descriptor from JSON bytes.
    pub fn from_json(bytes: &[u8]) -> Result<Self, PatternError> {
        serde_json::from_slice(bytes).map_err(|e| PatternError::InvalidDescriptor(e.to_string()))
    }
}

impl From<&str> for Descriptor {
    /// A bare string is a pattern source with default (global) flags.
    fn from(source: &str) -> Self {
        Descriptor {
            source: source.to_string(),
            flags: default_flags(),
            last_index: 0,
        }
    }
}

impl From<Matcher> for PatternSpec {
    fn from(matcher: Matcher) -> Self {
        PatternSpec::Ready(matcher)
    }
}

impl From<Descriptor> for PatternSpec {
    fn from(descriptor: Descriptor) -> Self {
        PatternSpec::Descriptor(descriptor)
    }
}

impl From<&str> for PatternSpec {
    fn from(source: &str) -> Self {
        PatternSpec::Descriptor(Descriptor::from(source))
    }
}

impl From<String> for PatternSpec {
    fn from(source: String) -> Self {
        PatternSpec::Descriptor(Descriptor {
            source,
            flags: default_flags(),
            last_index: 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_string_gets_global_flags() {
        let spec = Descriptor::from("hello|world");
        assert_eq!(spec.source, "hello|world");
        assert_eq!(spec.flags, "g");
        assert_eq!(spec.last_index, 0);
    }

    #[test]
    fn test_starting_at() {
        let spec = Descriptor::new(r"\d+", "g").starting_at(3);
        assert_eq!(spec.last_index, 3);
    }

    #[test]
    fn test_json_defaults() {
        let spec = Descriptor::from_json(br#"{"source": "\\w+"}"#).unwrap();
        assert_eq!(spec.source, r"\w+");
        assert_eq!(spec.flags, "g");
        assert_eq!(spec.last_index, 0);
    }

    #[test]
    fn test_json_full() {
        let spec =
            Descriptor::from_json(br#"{"source": "a", "flags": "gd", "last_index": 7}"#).unwrap();
        assert_eq!(spec, Descriptor::new("a", "gd").starting_at(7));
    }

    #[test]
    fn test_json_malformed() {
        let err = Descriptor::from_json(b"{not json").unwrap_err();
        assert!(matches!(err, PatternError::InvalidDescriptor(_)));
    }

    #[test]
    fn test_json_missing_source() {
        let err = Descriptor::from_json(br#"{"flags": "g"}"#).unwrap_err();
        assert!(matches!(err, PatternError::InvalidDescriptor(_)));
    }
}
