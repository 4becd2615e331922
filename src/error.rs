//! Error taxonomy for pattern construction and scanning.
//!
//! Construction problems surface synchronously, before any chunk is
//! accepted. Runtime problems are fatal for the scanner instance that hit
//! them: a partially consumed buffer with an unknown matcher cursor cannot
//! be safely resumed, so there is no retry path anywhere in this crate.

use std::fmt;

/// Why a pattern specification could not be turned into a matcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    /// The engine rejected the pattern source.
    Syntax(String),
    /// A flag character outside the supported set (`dgimsuvy`).
    UnknownFlag(char),
    /// The same flag was given twice.
    DuplicateFlag(char),
    /// A valid RegExp flag this engine cannot honor (`y`).
    UnsupportedFlag(char),
    /// Global-search semantics (`g`) were not requested. A matcher that
    /// does not advance cannot scan a stream.
    MissingGlobal,
    /// A serialized descriptor could not be decoded.
    InvalidDescriptor(String),
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternError::Syntax(msg) => write!(f, "Invalid pattern: {}", msg),
            PatternError::UnknownFlag(c) => write!(f, "Unknown flag '{}'", c),
            PatternError::DuplicateFlag(c) => write!(f, "Duplicate flag '{}'", c),
            PatternError::UnsupportedFlag(c) => write!(f, "Unsupported flag '{}'", c),
            PatternError::MissingGlobal => write!(f, "Pattern must have the g flag set"),
            PatternError::InvalidDescriptor(msg) => write!(f, "Invalid descriptor: {}", msg),
        }
    }
}

impl std::error::Error for PatternError {}

/// Why a scan stopped. Fatal for the scanner that returned it; the same
/// error is replayed on every later call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    /// The rolling buffer would exceed the configured cap.
    BufferOverflow {
        /// Bytes the buffer would have to hold.
        needed: usize,
        /// The configured cap.
        limit: usize,
    },
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanError::BufferOverflow { needed, limit } => {
                write!(f, "Buffer would grow to {} bytes, cap is {}", needed, limit)
            }
        }
    }
}

impl std::error::Error for ScanError {}
