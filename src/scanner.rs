//! Incremental matching over a rolling buffer.
//!
//! The scanner owns the retained text, the running global offset, and the
//! matcher. Each chunk is appended and scanned to exhaustion; after every
//! match the consumed prefix is dropped, so the buffer only holds text that
//! can still participate in a future match. Patterns that look backwards
//! (lookbehind, `^` under `m`) lose whatever context trimming removed;
//! that narrowing is inherent to single-pass streaming.

use log::{debug, trace, warn};

use crate::error::{PatternError, ScanError};
use crate::matcher::{ceil_char_boundary, Matcher};
use crate::pattern::PatternSpec;
use crate::record::MatchRecord;

/// End-of-stream accounting returned by [`MatchScanner::finish`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanSummary {
    /// Chunks fed, empty ones included.
    pub chunks: u64,
    /// Matches emitted.
    pub matches: u64,
    /// Residual bytes discarded at end of stream.
    pub discarded: u64,
}

/// Stateful chunk-at-a-time matcher.
///
/// Emitted records carry stream-global positions even though the engine
/// only ever sees the retained suffix.
#[derive(Debug)]
pub struct MatchScanner {
    matcher: Matcher,
    buffer: String,
    offset: u64,
    limit: Option<usize>,
    chunks: u64,
    matches: u64,
    failed: Option<ScanError>,
}

impl MatchScanner {
    /// Build a scanner with an unbounded buffer.
    pub fn new(spec: impl Into<PatternSpec>) -> Result<MatchScanner, PatternError> {
        Self::build(spec.into(), None)
    }

    /// Build a scanner that refuses to retain more than `limit` bytes.
    ///
    /// Exceeding the cap is fatal for the scan: text dropped unscanned
    /// would make every later position unreliable, so the scanner fails
    /// instead.
    pub fn with_limit(
        spec: impl Into<PatternSpec>,
        limit: usize,
    ) -> Result<MatchScanner, PatternError> {
        Self::build(spec.into(), Some(limit))
    }

    fn build(spec: PatternSpec, limit: Option<usize>) -> Result<MatchScanner, PatternError> {
        Ok(MatchScanner {
            matcher: Matcher::build(spec)?,
            buffer: String::new(),
            offset: 0,
            limit,
            chunks: 0,
            matches: 0,
            failed: None,
        })
    }

    /// Feed one chunk and return every match it completes, in discovery
    /// order, at stream-global positions. An empty chunk still re-runs the
    /// scan over the retained buffer.
    ///
    /// A failed scanner replays its error on every subsequent call.
    pub fn feed(&mut self, chunk: &str) -> Result<Vec<MatchRecord>, ScanError> {
        if let Some(err) = &self.failed {
            return Err(err.clone());
        }
        self.chunks += 1;
        if let Some(limit) = self.limit {
            let needed = self.buffer.len() + chunk.len();
            if needed > limit {
                let err = ScanError::BufferOverflow { needed, limit };
                warn!("scan aborted: {}", err);
                self.failed = Some(err.clone());
                self.buffer = String::new();
                return Err(err);
            }
        }
        self.buffer.push_str(chunk);

        let mut out = Vec::new();
        while let Some(mut record) = self.matcher.exec(&self.buffer) {
            self.matches += 1;
            record.apply_offset(self.offset);
            out.push(record);

            // Drop the consumed prefix and rebase the cursor into what
            // remains. The 1-floor forces progress past zero-width matches;
            // consumption rounds up to a character boundary.
            let last_index = self.matcher.last_index().max(1);
            let used = last_index.min(self.buffer.len() as u64) as usize;
            let used = ceil_char_boundary(&self.buffer, used);
            self.buffer.drain(..used);
            self.offset += used as u64;
            self.matcher
                .set_last_index(last_index.saturating_sub(used as u64));
        }
        trace!(
            "chunk {}: +{} bytes, {} matches, {} retained",
            self.chunks,
            chunk.len(),
            out.len(),
            self.buffer.len()
        );
        Ok(out)
    }

    /// End the stream and return the final accounting.
    ///
    /// Retained text never produces a match here: a partial match at the
    /// boundary stays unreported rather than speculative.
    pub fn finish(self) -> ScanSummary {
        let summary = ScanSummary {
            chunks: self.chunks,
            matches: self.matches,
            discarded: self.buffer.len() as u64,
        };
        debug!(
            "scan finished: {} chunks, {} matches, {} bytes discarded",
            summary.chunks, summary.matches, summary.discarded
        );
        summary
    }

    /// Stream-global position of the first retained byte.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Bytes currently retained.
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Chunks fed so far.
    pub fn chunks(&self) -> u64 {
        self.chunks
    }

    /// Matches emitted so far.
    pub fn matches(&self) -> u64 {
        self.matches
    }
}
