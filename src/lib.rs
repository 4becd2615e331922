//! Incremental regex matching over chunked text streams.
//!
//! Text arrives in arbitrary pieces; matches are reported exactly once, at
//! the positions they would have in the concatenated whole. Only text that
//! can still participate in a match is retained: after every hit the
//! consumed prefix is dropped, and later match positions are rewritten to
//! stream-global offsets. All positions are byte offsets into the UTF-8
//! text.
//!
//! The synchronous core is [`MatchScanner`]; [`MatchStream`] plugs it into
//! an async chunk stream, and [`Utf8Decoder`] sits in front when the
//! source delivers raw bytes.
//!
//! ```
//! use match_stream::{Descriptor, MatchScanner};
//!
//! # fn main() -> Result<(), match_stream::PatternError> {
//! let mut scanner = MatchScanner::new(Descriptor::new("Hello|world", "g"))?;
//! let mut found = scanner.feed("Hello wor").unwrap();
//! found.extend(scanner.feed("ld. Goodbye world.").unwrap());
//!
//! let seen: Vec<(u64, &str)> = found.iter().map(|m| (m.index, m.text.as_str())).collect();
//! assert_eq!(seen, [(0, "Hello"), (6, "world"), (21, "world")]);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod flags;
pub mod matcher;
pub mod pattern;
pub mod record;
pub mod scanner;
pub mod stream;
pub mod utf8;

pub use error::{PatternError, ScanError};
pub use flags::Flags;
pub use matcher::{CURSOR_CEILING, Matcher};
pub use pattern::{Descriptor, PatternSpec};
pub use record::{MatchIndices, MatchRecord, Span};
pub use scanner::{MatchScanner, ScanSummary};
pub use stream::{MatchAllExt, MatchStream};
pub use utf8::Utf8Decoder;
