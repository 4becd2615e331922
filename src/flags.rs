//! RegExp-style flag strings.
//!
//! Flags arrive as a compact string (`"g"`, `"gd"`, `"gims"`) and are
//! validated up front. Every matcher built by this crate must carry
//! global-search semantics, so `g` is tracked here and enforced at
//! construction; `d` switches on per-group position intervals; the rest are
//! forwarded to the engine.

use std::fmt;

use crate::error::PatternError;

/// Parsed form of a RegExp flag string.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Flags {
    /// Record per-group position intervals on every match (`d`).
    pub has_indices: bool,
    /// Repeated searches advance through the text instead of re-matching
    /// from the start (`g`).
    pub global: bool,
    /// Case-insensitive matching (`i`).
    pub ignore_case: bool,
    /// `^` and `$` also match at line boundaries (`m`).
    pub multiline: bool,
    /// `.` also matches line terminators (`s`).
    pub dot_all: bool,
    /// Unicode mode (`u`).
    pub unicode: bool,
    /// Unicode sets mode (`v`).
    pub unicode_sets: bool,
}

impl Flags {
    /// Parse a flag string. Each flag may appear at most once; characters
    /// outside `dgimsuv` are rejected. `y` (sticky) anchors at the cursor
    /// where this crate searches from it, so it is rejected as unsupported
    /// rather than accepted with different semantics.
    pub fn parse(input: &str) -> Result<Flags, PatternError> {
        let mut flags = Flags::default();
        for c in input.chars() {
            let slot = match c {
                'd' => &mut flags.has_indices,
                'g' => &mut flags.global,
                'i' => &mut flags.ignore_case,
                'm' => &mut flags.multiline,
                's' => &mut flags.dot_all,
                'u' => &mut flags.unicode,
                'v' => &mut flags.unicode_sets,
                'y' => return Err(PatternError::UnsupportedFlag('y')),
                other => return Err(PatternError::UnknownFlag(other)),
            };
            if *slot {
                return Err(PatternError::DuplicateFlag(c));
            }
            *slot = true;
        }
        Ok(flags)
    }

    /// The subset the engine itself understands, rendered as its flag
    /// string. `g` and `d` are handled by this crate, not the engine.
    pub(crate) fn engine_flags(&self) -> String {
        let mut out = String::new();
        if self.ignore_case {
            out.push('i');
        }
        if self.multiline {
            out.push('m');
        }
        if self.dot_all {
            out.push('s');
        }
        if self.unicode {
            out.push('u');
        }
        if self.unicode_sets {
            out.push('v');
        }
        out
    }
}

impl fmt::Display for Flags {
    /// Canonical `dgimsuv` order, independent of parse order.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.has_indices {
            f.write_str("d")?;
        }
        if self.global {
            f.write_str("g")?;
        }
        if self.ignore_case {
            f.write_str("i")?;
        }
        if self.multiline {
            f.write_str("m")?;
        }
        if self.dot_all {
            f.write_str("s")?;
        }
        if self.unicode {
            f.write_str("u")?;
        }
        if self.unicode_sets {
            f.write_str("v")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_set() {
        let flags = Flags::parse("dgimsuv").unwrap();
        assert!(flags.has_indices);
        assert!(flags.global);
        assert!(flags.ignore_case);
        assert!(flags.multiline);
        assert!(flags.dot_all);
        assert!(flags.unicode);
        assert!(flags.unicode_sets);
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(Flags::parse("").unwrap(), Flags::default());
    }

    #[test]
    fn test_order_does_not_matter() {
        assert_eq!(Flags::parse("gd").unwrap(), Flags::parse("dg").unwrap());
    }

    #[test]
    fn test_unknown_flag() {
        assert_eq!(Flags::parse("gx"), Err(PatternError::UnknownFlag('x')));
    }

    #[test]
    fn test_duplicate_flag() {
        assert_eq!(Flags::parse("gg"), Err(PatternError::DuplicateFlag('g')));
        assert_eq!(Flags::parse("gii"), Err(PatternError::DuplicateFlag('i')));
    }

    #[test]
    fn test_sticky_rejected() {
        assert_eq!(Flags::parse("gy"), Err(PatternError::UnsupportedFlag('y')));
    }

    #[test]
    fn test_display_canonical_order() {
        assert_eq!(Flags::parse("vusmigd").unwrap().to_string(), "dgimsuv");
        assert_eq!(Flags::parse("g").unwrap().to_string(), "g");
    }

    #[test]
    fn test_engine_flags_subset() {
        let flags = Flags::parse("gdis").unwrap();
        assert_eq!(flags.engine_flags(), "is");
    }
}
