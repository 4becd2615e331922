//! Match records and offset translation.
//!
//! The engine reports positions relative to whatever buffer it was handed.
//! Records are born buffer-local and rewritten to stream-global coordinates
//! by [`MatchRecord::apply_offset`] before they leave the scanner. All
//! positions are byte offsets into the logical UTF-8 stream.

use std::collections::BTreeMap;

use serde::Serialize;

/// A half-open `[start, end)` byte interval in the logical stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Span {
    pub start: u64,
    pub end: u64,
}

impl Span {
    pub fn new(start: u64, end: u64) -> Self {
        Self { start, end }
    }

    /// Interval length in bytes.
    pub fn len(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    /// Zero-width intervals are produced by empty matches.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    fn shift(&mut self, offset: u64) {
        self.start = self.start.saturating_add(offset);
        self.end = self.end.saturating_add(offset);
    }
}

/// Per-group position intervals, present when the `d` flag was requested.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MatchIndices {
    /// Interval of the full match.
    pub span: Span,
    /// Intervals of the numbered capture groups, `None` for groups that did
    /// not participate in the match.
    pub captures: Vec<Option<Span>>,
    /// Intervals of the named groups, present iff the pattern declares any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub named: Option<BTreeMap<String, Option<Span>>>,
}

/// One match.
///
/// Inside the scanner positions are buffer-local; every record is
/// translated before it is handed downstream, so consumers only ever see
/// stream-global offsets.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MatchRecord {
    /// Start of the full match.
    pub index: u64,
    /// The matched text.
    pub text: String,
    /// Numbered capture groups in declaration order; `None` when a group
    /// did not participate in the match.
    pub captures: Vec<Option<String>>,
    /// Named capture groups, present iff the pattern declares any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub named: Option<BTreeMap<String, Option<String>>>,
    /// Position intervals, present iff the pattern requested them (`d`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indices: Option<MatchIndices>,
}

impl MatchRecord {
    /// Number of groups including the full match (what a RegExp result
    /// reports as its `length`).
    pub fn group_count(&self) -> usize {
        self.captures.len() + 1
    }

    /// End of the full match.
    pub fn end(&self) -> u64 {
        self.index.saturating_add(self.text.len() as u64)
    }

    /// Rewrite every position field from buffer-local to stream-global
    /// coordinates by adding `offset`: the match start, and, when present,
    /// each interval in the indices table, named intervals included.
    /// Additions saturate; translation never fails.
    pub fn apply_offset(&mut self, offset: u64) {
        self.index = self.index.saturating_add(offset);
        if let Some(indices) = &mut self.indices {
            indices.span.shift(offset);
            for span in indices.captures.iter_mut().flatten() {
                span.shift(offset);
            }
            if let Some(named) = &mut indices.named {
                for span in named.values_mut().flatten() {
                    span.shift(offset);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_with_indices() -> MatchRecord {
        let mut named_texts = BTreeMap::new();
        named_texts.insert("word".to_string(), Some("de".to_string()));
        let mut named_spans = BTreeMap::new();
        named_spans.insert("word".to_string(), Some(Span::new(1, 3)));
        MatchRecord {
            index: 1,
            text: "def".to_string(),
            captures: vec![Some("de".to_string()), None],
            named: Some(named_texts),
            indices: Some(MatchIndices {
                span: Span::new(1, 4),
                captures: vec![Some(Span::new(1, 3)), None],
                named: Some(named_spans),
            }),
        }
    }

    #[test]
    fn test_apply_offset_shifts_everything() {
        let mut record = record_with_indices();
        record.apply_offset(3);

        assert_eq!(record.index, 4);
        let indices = record.indices.as_ref().unwrap();
        assert_eq!(indices.span, Span::new(4, 7));
        assert_eq!(indices.captures[0], Some(Span::new(4, 6)));
        assert_eq!(indices.captures[1], None);
        assert_eq!(indices.named.as_ref().unwrap()["word"], Some(Span::new(4, 6)));
        // Text fields are not positions and stay put.
        assert_eq!(record.text, "def");
        assert_eq!(record.captures[0].as_deref(), Some("de"));
    }

    #[test]
    fn test_apply_offset_without_indices() {
        let mut record = MatchRecord {
            index: 2,
            text: "ab".to_string(),
            captures: Vec::new(),
            named: None,
            indices: None,
        };
        record.apply_offset(10);
        assert_eq!(record.index, 12);
        assert_eq!(record.indices, None);
    }

    #[test]
    fn test_apply_offset_saturates() {
        let mut record = record_with_indices();
        record.apply_offset(u64::MAX);
        assert_eq!(record.index, u64::MAX);
        assert_eq!(record.indices.as_ref().unwrap().span.end, u64::MAX);
    }

    #[test]
    fn test_group_count_and_end() {
        let record = record_with_indices();
        assert_eq!(record.group_count(), 3);
        assert_eq!(record.end(), 4);
    }

    #[test]
    fn test_span_len() {
        assert_eq!(Span::new(4, 7).len(), 3);
        assert!(Span::new(5, 5).is_empty());
        assert!(!Span::new(4, 7).is_empty());
    }

    #[test]
    fn test_serialized_shape() {
        let record = record_with_indices();
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "index": 1,
                "text": "def",
                "captures": ["de", null],
                "named": { "word": "de" },
                "indices": {
                    "span": { "start": 1, "end": 4 },
                    "captures": [ { "start": 1, "end": 3 }, null ],
                    "named": { "word": { "start": 1, "end": 3 } }
                }
            })
        );
    }

    #[test]
    fn test_serialized_shape_skips_absent_tables() {
        let record = MatchRecord {
            index: 0,
            text: "x".to_string(),
            captures: Vec::new(),
            named: None,
            indices: None,
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "index": 0, "text": "x", "captures": [] })
        );
    }
}
