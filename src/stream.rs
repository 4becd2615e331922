//! Pipeline stage: a stream of text chunks in, a stream of match records
//! out.
//!
//! Pull-based end to end: the upstream is polled only when no
//! already-discovered record is waiting, so downstream backpressure is
//! simply the downstream not asking. After a scan error or upstream end
//! the scanner is dropped and the stream stays terminated.

use std::collections::VecDeque;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures_core::Stream;

use crate::error::{PatternError, ScanError};
use crate::pattern::PatternSpec;
use crate::record::MatchRecord;
use crate::scanner::MatchScanner;

/// Adapter that runs a [`MatchScanner`] over an upstream stream of text
/// chunks and yields match records in discovery order.
#[derive(Debug)]
pub struct MatchStream<S> {
    source: S,
    scanner: Option<MatchScanner>,
    ready: VecDeque<MatchRecord>,
}

impl<S> MatchStream<S> {
    /// Wrap `source`, compiling the pattern up front. Fails before any
    /// chunk is pulled.
    pub fn new(source: S, spec: impl Into<PatternSpec>) -> Result<MatchStream<S>, PatternError> {
        Ok(MatchStream {
            source,
            scanner: Some(MatchScanner::new(spec)?),
            ready: VecDeque::new(),
        })
    }

    /// Like [`MatchStream::new`], with a retained-byte cap on the scan
    /// buffer.
    pub fn with_limit(
        source: S,
        spec: impl Into<PatternSpec>,
        limit: usize,
    ) -> Result<MatchStream<S>, PatternError> {
        Ok(MatchStream {
            source,
            scanner: Some(MatchScanner::with_limit(spec, limit)?),
            ready: VecDeque::new(),
        })
    }
}

impl<S, C> Stream for MatchStream<S>
where
    S: Stream<Item = C> + Unpin,
    C: AsRef<str>,
{
    type Item = Result<MatchRecord, ScanError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        loop {
            if let Some(record) = this.ready.pop_front() {
                return Poll::Ready(Some(Ok(record)));
            }
            let Some(scanner) = this.scanner.as_mut() else {
                return Poll::Ready(None);
            };
            match Pin::new(&mut this.source).poll_next(cx) {
                Poll::Ready(Some(chunk)) => match scanner.feed(chunk.as_ref()) {
                    Ok(records) => this.ready.extend(records),
                    Err(err) => {
                        this.scanner = None;
                        return Poll::Ready(Some(Err(err)));
                    }
                },
                Poll::Ready(None) => {
                    // Logs the end-of-stream summary; the tail is never
                    // scanned again.
                    if let Some(scanner) = this.scanner.take() {
                        scanner.finish();
                    }
                    return Poll::Ready(None);
                }
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}

/// Plugs a matcher into a chunk-stream pipeline:
/// `chunks.match_all(pattern)?`.
pub trait MatchAllExt: Stream + Sized {
    /// Shorthand for [`MatchStream::new`].
    fn match_all(self, spec: impl Into<PatternSpec>) -> Result<MatchStream<Self>, PatternError> {
        MatchStream::new(self, spec)
    }
}

impl<S, C> MatchAllExt for S
where
    S: Stream<Item = C>,
    C: AsRef<str>,
{
}
