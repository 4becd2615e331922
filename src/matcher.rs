//! Matcher adapter over the regex engine.
//!
//! CRITICAL: the engine is handed a *suffix* of the stream, never the
//! whole text. The cursor state that makes repeated calls advance lives
//! here, so the scanner can drive one instance against a rolling buffer
//! and trust the cursor arithmetic.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::Range;

use log::debug;

use crate::error::PatternError;
use crate::flags::Flags;
use crate::pattern::{Descriptor, PatternSpec};
use crate::record::{MatchIndices, MatchRecord, Span};

/// Cursor values are clamped to this ceiling (2^32).
pub const CURSOR_CEILING: u64 = 1 << 32;

/// A compiled pattern plus the cursor that makes repeated searches advance
/// through the text instead of re-matching from the start.
pub struct Matcher {
    regex: regress::Regex,
    source: String,
    flags: Flags,
    last_index: u64,
}

impl Matcher {
    /// Build a matcher from a pattern specification. Fails fast when the
    /// flag string is malformed, when it lacks `g`, or when the engine
    /// rejects the pattern source. Ready-made matchers pass through
    /// untouched, current cursor included.
    pub fn build(spec: impl Into<PatternSpec>) -> Result<Matcher, PatternError> {
        match spec.into() {
            PatternSpec::Ready(matcher) => Ok(matcher),
            PatternSpec::Descriptor(descriptor) => Matcher::compile(&descriptor),
        }
    }

    fn compile(descriptor: &Descriptor) -> Result<Matcher, PatternError> {
        let flags = Flags::parse(&descriptor.flags)?;
        if !flags.global {
            return Err(PatternError::MissingGlobal);
        }
        let regex = regress::Regex::with_flags(&descriptor.source, flags.engine_flags().as_str())
            .map_err(|e| PatternError::Syntax(e.to_string()))?;
        debug!("compiled /{}/{}", descriptor.source, flags);
        Ok(Matcher {
            regex,
            source: descriptor.source.clone(),
            flags,
            last_index: descriptor.last_index.min(CURSOR_CEILING),
        })
    }

    /// Run one search against `text`.
    ///
    /// The search starts at `last_index`; a match advances the cursor to
    /// the match end, a failed search resets it to zero, and a cursor
    /// already past the end of `text` fails without consulting the engine.
    /// The reset-on-failure is what lets a scanner re-scan its retained
    /// buffer from the start once more text arrives.
    pub fn exec(&mut self, text: &str) -> Option<MatchRecord> {
        let start = usize::try_from(self.last_index).unwrap_or(usize::MAX);
        if start > text.len() {
            self.last_index = 0;
            return None;
        }
        // A caller-supplied cursor may land inside a multi-byte character.
        let start = ceil_char_boundary(text, start);
        match self.regex.find_from(text, start).next() {
            Some(found) => {
                self.last_index = found.end() as u64;
                Some(self.record(&found, text))
            }
            None => {
                self.last_index = 0;
                None
            }
        }
    }

    /// Assemble a buffer-local record from an engine match.
    fn record(&self, found: &regress::Match, text: &str) -> MatchRecord {
        let slice = |r: &Range<usize>| text[r.clone()].to_string();

        let captures: Vec<Option<String>> = found
            .captures
            .iter()
            .map(|c| c.as_ref().map(slice))
            .collect();

        let mut named_texts: BTreeMap<String, Option<String>> = BTreeMap::new();
        for (name, range) in found.named_groups() {
            named_texts.insert(name.to_string(), range.as_ref().map(slice));
        }
        let named = (!named_texts.is_empty()).then_some(named_texts);

        let indices = self.flags.has_indices.then(|| {
            let as_span = |r: &Range<usize>| Span::new(r.start as u64, r.end as u64);
            let mut named_spans: BTreeMap<String, Option<Span>> = BTreeMap::new();
            for (name, range) in found.named_groups() {
                named_spans.insert(name.to_string(), range.as_ref().map(as_span));
            }
            MatchIndices {
                span: Span::new(found.start() as u64, found.end() as u64),
                captures: found
                    .captures
                    .iter()
                    .map(|c| c.as_ref().map(as_span))
                    .collect(),
                named: (!named_spans.is_empty()).then_some(named_spans),
            }
        });

        MatchRecord {
            index: found.start() as u64,
            text: text[found.range()].to_string(),
            captures,
            named,
            indices,
        }
    }

    /// Pattern source, without delimiters.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Parsed flags.
    pub fn flags(&self) -> Flags {
        self.flags
    }

    /// Current cursor.
    pub fn last_index(&self) -> u64 {
        self.last_index
    }

    /// Move the cursor. Values beyond [`CURSOR_CEILING`] are clamped.
    pub fn set_last_index(&mut self, value: u64) {
        self.last_index = value.min(CURSOR_CEILING);
    }
}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Matcher")
            .field("source", &self.source)
            .field("flags", &self.flags.to_string())
            .field("last_index", &self.last_index)
            .finish()
    }
}

/// Round `index` up to the nearest character boundary of `text`, capped at
/// `text.len()`.
pub(crate) fn ceil_char_boundary(text: &str, index: usize) -> usize {
    let mut index = index.min(text.len());
    while !text.is_char_boundary(index) {
        index += 1;
    }
    index
}
