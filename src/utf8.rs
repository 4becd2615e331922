//! UTF-8 boundary handling for byte-chunk sources.
//!
//! CRITICAL: multi-byte UTF-8 characters can split across chunk
//! boundaries. Matching operates on `str`, so byte chunks pass through
//! this decoder first: an incomplete trailing sequence (at most 3 bytes)
//! is held back until the next chunk, and bytes that can never become
//! valid UTF-8 are replaced with U+FFFD, the way a lossy text decoder
//! does.
//!
//! A UTF-8 character is 1-4 bytes:
//! - 1 byte:  0xxxxxxx (ASCII)
//! - 2 bytes: 110xxxxx 10xxxxxx
//! - 3 bytes: 1110xxxx 10xxxxxx 10xxxxxx
//! - 4 bytes: 11110xxx 10xxxxxx 10xxxxxx 10xxxxxx

use std::borrow::Cow;

/// Incremental lossy UTF-8 decoder.
#[derive(Debug)]
pub struct Utf8Decoder {
    /// Held-back bytes from the previous chunk.
    pending: [u8; 4],
    /// Number of held-back bytes (never more than 3 between calls).
    pending_len: usize,
}

impl Utf8Decoder {
    pub fn new() -> Self {
        Self {
            pending: [0u8; 4],
            pending_len: 0,
        }
    }

    /// Decode one chunk. Borrows the input whenever nothing was held back
    /// and no byte needs replacing; otherwise returns owned text.
    pub fn decode<'a>(&mut self, chunk: &'a [u8]) -> Cow<'a, str> {
        if self.pending_len == 0 {
            match std::str::from_utf8(chunk) {
                Ok(text) => return Cow::Borrowed(text),
                Err(err) if err.error_len().is_none() => {
                    // Clean split: valid text up to an incomplete trailing
                    // sequence, which waits for the next chunk.
                    let (valid, tail) = chunk.split_at(err.valid_up_to());
                    if let Ok(text) = std::str::from_utf8(valid) {
                        self.stash(tail);
                        return Cow::Borrowed(text);
                    }
                }
                Err(_) => {}
            }
        }
        Cow::Owned(self.decode_slow(chunk))
    }

    fn decode_slow(&mut self, chunk: &[u8]) -> String {
        let mut out = String::with_capacity(self.pending_len + chunk.len());
        let mut input = chunk;

        // Step 1: try to complete the sequence held back from the previous
        // chunk.
        if self.pending_len > 0 {
            let expected = sequence_length(self.pending[0]);
            while self.pending_len < expected && !input.is_empty() && is_continuation(input[0]) {
                self.pending[self.pending_len] = input[0];
                self.pending_len += 1;
                input = &input[1..];
            }
            if self.pending_len == expected {
                let held = &self.pending[..self.pending_len];
                // A completed sequence can still be invalid (overlong
                // forms, surrogates); lossy conversion replaces it with
                // the same replacement characters a fresh decode would.
                out.push_str(&String::from_utf8_lossy(held));
                self.pending_len = 0;
            } else if !input.is_empty() {
                // The next byte cannot continue the held-back sequence.
                out.push(char::REPLACEMENT_CHARACTER);
                self.pending_len = 0;
            }
        }

        // Step 2: decode the rest, replacing invalid sequences and holding
        // back an incomplete tail.
        loop {
            match std::str::from_utf8(input) {
                Ok(text) => {
                    out.push_str(text);
                    break;
                }
                Err(err) => {
                    let (valid, rest) = input.split_at(err.valid_up_to());
                    out.push_str(&String::from_utf8_lossy(valid));
                    match err.error_len() {
                        Some(bad) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            input = &rest[bad..];
                        }
                        None => {
                            self.stash(rest);
                            break;
                        }
                    }
                }
            }
        }
        out
    }

    fn stash(&mut self, tail: &[u8]) {
        self.pending[..tail.len()].copy_from_slice(tail);
        self.pending_len = tail.len();
    }

    /// End of stream. A held-back incomplete sequence becomes one
    /// replacement character.
    pub fn finish(self) -> Option<String> {
        (self.pending_len > 0).then(|| String::from(char::REPLACEMENT_CHARACTER))
    }

    /// Bytes currently held back waiting for the rest of a sequence.
    pub fn pending(&self) -> usize {
        self.pending_len
    }
}

impl Default for Utf8Decoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Check if byte is a UTF-8 continuation byte (10xxxxxx).
#[inline]
fn is_continuation(byte: u8) -> bool {
    (byte & 0b1100_0000) == 0b1000_0000
}

/// Expected length of a UTF-8 sequence from its first byte.
#[inline]
fn sequence_length(first_byte: u8) -> usize {
    match first_byte {
        0x00..=0x7F => 1,
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF7 => 4,
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_borrows() {
        let mut decoder = Utf8Decoder::new();
        let text = decoder.decode(b"Hello, World!");
        assert!(matches!(text, Cow::Borrowed(_)));
        assert_eq!(text, "Hello, World!");
        assert_eq!(decoder.pending(), 0);
    }

    #[test]
    fn test_split_crab_across_chunks() {
        // 🦀 is F0 9F A6 80
        let mut decoder = Utf8Decoder::new();
        let first = decoder.decode(b"Hi \xF0\x9F");
        assert!(matches!(first, Cow::Borrowed(_)));
        assert_eq!(first, "Hi ");
        assert_eq!(decoder.pending(), 2);

        let second = decoder.decode(b"\xA6\x80!");
        assert_eq!(second, "🦀!");
        assert_eq!(decoder.pending(), 0);
    }

    #[test]
    fn test_three_way_split() {
        let mut decoder = Utf8Decoder::new();
        assert_eq!(decoder.decode(b"\xF0"), "");
        assert_eq!(decoder.decode(b"\x9F\xA6"), "");
        assert_eq!(decoder.pending(), 3);
        assert_eq!(decoder.decode(b"\x80"), "🦀");
    }

    #[test]
    fn test_invalid_byte_replaced() {
        let mut decoder = Utf8Decoder::new();
        assert_eq!(decoder.decode(b"a\xFFb"), "a\u{FFFD}b");
    }

    #[test]
    fn test_surrogate_bytes_replaced_individually() {
        let mut decoder = Utf8Decoder::new();
        assert_eq!(
            decoder.decode(b"\xED\xA0\x80"),
            "\u{FFFD}\u{FFFD}\u{FFFD}"
        );
    }

    #[test]
    fn test_broken_heldback_sequence() {
        let mut decoder = Utf8Decoder::new();
        assert_eq!(decoder.decode(b"\xF0\x9F"), "");
        assert_eq!(decoder.decode(b"A"), "\u{FFFD}A");
        assert_eq!(decoder.pending(), 0);
    }

    #[test]
    fn test_finish_replaces_dangling_tail() {
        // € is E2 82 AC; the last byte never arrives
        let mut decoder = Utf8Decoder::new();
        assert_eq!(decoder.decode(b"ok\xE2\x82"), "ok");
        assert_eq!(decoder.pending(), 2);
        assert_eq!(decoder.finish().as_deref(), Some("\u{FFFD}"));
    }

    #[test]
    fn test_finish_clean_stream() {
        let mut decoder = Utf8Decoder::new();
        decoder.decode(b"abc");
        assert_eq!(decoder.finish(), None);
    }
}
