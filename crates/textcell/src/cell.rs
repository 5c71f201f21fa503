#![forbid(unsafe_code)]

//! The text cell: raw UTF-16 code units or validated scalar text.
//!
//! A [`TextCell`] owns one of two representations:
//! - raw UTF-16 code units, stored verbatim, possibly ill-formed
//!   (unpaired surrogates permitted)
//! - scalar text, a validated sequence of Unicode scalar values
//!
//! Cells are immutable once constructed. Converting between the
//! representations produces a new cell; raw units bridge to scalar text
//! through a total, deterministic repair that substitutes U+FFFD for
//! every code unit that is not part of a valid surrogate pair.
//!
//! # Example
//! ```
//! use textcell::TextCell;
//!
//! // A lone high surrogate is representable as raw units...
//! let raw = TextCell::from_code_units(&[0xD83D]);
//! assert_eq!(raw.utf16_len(), 1);
//! assert!(!raw.is_well_formed_utf16());
//!
//! // ...and bridges to scalar text as a single replacement scalar.
//! let joined = TextCell::from("|").concat(&raw).concat(&"|".into());
//! assert_eq!(joined.utf16_len(), 3);
//! assert_eq!(joined.to_string_lossy(), "|\u{FFFD}|");
//! ```

use crate::unit::{self, REPLACEMENT};
use smallvec::SmallVec;
use std::fmt;

/// Inline capacity before sequences spill to the heap. Cells hold short
/// sequences in the common case.
const INLINE: usize = 8;

type UnitBuf = SmallVec<[u16; INLINE]>;
type ScalarBuf = SmallVec<[char; INLINE]>;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Repr {
    /// Raw UTF-16 code units, stored verbatim. May be ill-formed.
    Units(UnitBuf),
    /// Validated scalar values. `char` cannot hold a surrogate, so
    /// well-formedness is carried by the element type.
    Scalars(ScalarBuf),
}

/// An immutable cell of text in one of two representations.
///
/// Equality compares representation and content: a raw-unit cell never
/// equals a scalar-text cell, even when their UTF-16 views agree. See
/// the [module docs](self) for the representation rules.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TextCell {
    repr: Repr,
}

/// Rejection raised by [`TextCell::from_scalars`] for values that are not
/// Unicode scalar values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidScalar {
    /// The value falls in the surrogate range U+D800..=U+DFFF.
    Surrogate { index: usize, value: u32 },
    /// The value exceeds U+10FFFF.
    OutOfRange { index: usize, value: u32 },
}

impl fmt::Display for InvalidScalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Surrogate { index, value } => write!(
                f,
                "surrogate code point U+{value:04X} at index {index} is not a scalar value"
            ),
            Self::OutOfRange { index, value } => {
                write!(f, "value {value:#X} at index {index} exceeds U+10FFFF")
            }
        }
    }
}

impl std::error::Error for InvalidScalar {}

impl TextCell {
    /// Create a cell from raw UTF-16 code units, verbatim.
    ///
    /// No validation is applied; the units may contain unpaired
    /// surrogates. This models constructing a string-like object directly
    /// from 16-bit values, such as a standalone high surrogate `0xD83D`.
    #[must_use]
    pub fn from_code_units(units: &[u16]) -> Self {
        Self {
            repr: Repr::Units(UnitBuf::from_slice(units)),
        }
    }

    /// Create a scalar-text cell from numeric scalar values.
    ///
    /// # Errors
    /// Returns [`InvalidScalar`] if any value is a surrogate code point or
    /// exceeds U+10FFFF. Nothing is constructed on failure.
    pub fn from_scalars(values: &[u32]) -> Result<Self, InvalidScalar> {
        let mut scalars = ScalarBuf::with_capacity(values.len());
        for (index, &value) in values.iter().enumerate() {
            match char::from_u32(value) {
                Some(scalar) => scalars.push(scalar),
                None if unit::is_surrogate_code_point(value) => {
                    return Err(InvalidScalar::Surrogate { index, value });
                }
                None => return Err(InvalidScalar::OutOfRange { index, value }),
            }
        }
        Ok(Self {
            repr: Repr::Scalars(scalars),
        })
    }

    /// Whether this cell holds validated scalar text.
    #[must_use]
    pub const fn is_scalar_text(&self) -> bool {
        matches!(self.repr, Repr::Scalars(_))
    }

    /// The raw code units, if this cell holds the raw representation.
    #[must_use]
    pub fn as_code_units(&self) -> Option<&[u16]> {
        match &self.repr {
            Repr::Units(units) => Some(units),
            Repr::Scalars(_) => None,
        }
    }

    /// The scalar values, if this cell holds scalar text.
    #[must_use]
    pub fn as_scalars(&self) -> Option<&[char]> {
        match &self.repr {
            Repr::Units(_) => None,
            Repr::Scalars(scalars) => Some(scalars),
        }
    }

    /// Whether the cell is well-formed when viewed as UTF-16.
    ///
    /// True iff every high surrogate is immediately followed by a low
    /// surrogate and every low surrogate is immediately preceded by a high
    /// surrogate. Scalar text is always well-formed.
    #[must_use]
    pub fn is_well_formed_utf16(&self) -> bool {
        let units = match &self.repr {
            Repr::Scalars(_) => return true,
            Repr::Units(units) => units,
        };
        let mut i = 0;
        while i < units.len() {
            let u = units[i];
            if unit::is_high_surrogate(u) {
                if i + 1 < units.len() && unit::is_low_surrogate(units[i + 1]) {
                    i += 2;
                } else {
                    return false;
                }
            } else if unit::is_low_surrogate(u) {
                return false;
            } else {
                i += 1;
            }
        }
        true
    }

    /// Number of 16-bit code units the cell occupies viewed as UTF-16.
    ///
    /// For raw units this is the stored unit count with no validation
    /// applied: a lone surrogate counts as 1. For scalar text it sums 1
    /// per BMP scalar and 2 per scalar above U+FFFF.
    #[must_use]
    pub fn utf16_len(&self) -> usize {
        match &self.repr {
            Repr::Units(units) => units.len(),
            Repr::Scalars(scalars) => scalars.iter().map(|&c| unit::utf16_len_of(c)).sum(),
        }
    }

    /// Number of scalar values, if the cell holds scalar text.
    ///
    /// Returns `None` for raw units: a raw unit count has no scalar
    /// meaning before repair.
    #[must_use]
    pub fn scalar_len(&self) -> Option<usize> {
        match &self.repr {
            Repr::Units(_) => None,
            Repr::Scalars(scalars) => Some(scalars.len()),
        }
    }

    /// Whether the cell contains no units or scalars at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match &self.repr {
            Repr::Units(units) => units.is_empty(),
            Repr::Scalars(scalars) => scalars.is_empty(),
        }
    }

    /// Bridge to scalar text, repairing ill-formed UTF-16.
    ///
    /// Scans left to right: a high surrogate immediately followed by a low
    /// surrogate combines into the scalar it encodes (both units
    /// consumed); any unit not part of a valid pair becomes one U+FFFD
    /// (one unit in, one scalar out); every other unit passes through as
    /// its own scalar. Total and deterministic; already-scalar cells come
    /// back equal.
    #[must_use]
    pub fn to_scalar_text_lossy(&self) -> Self {
        Self {
            repr: Repr::Scalars(self.repaired_scalars()),
        }
    }

    /// Re-encode as raw UTF-16 code units.
    ///
    /// Lossless: scalars above U+FFFF become surrogate pairs, everything
    /// else one unit. Raw-unit cells come back equal.
    #[must_use]
    pub fn to_utf16_units(&self) -> Self {
        match &self.repr {
            Repr::Units(_) => self.clone(),
            Repr::Scalars(_) => Self {
                repr: Repr::Units(self.code_units().collect()),
            },
        }
    }

    /// The cell's text as an owned `String`, repairing raw units first.
    #[must_use]
    pub fn to_string_lossy(&self) -> String {
        self.repaired_scalars().iter().collect()
    }

    /// Iterate the cell's UTF-16 view without converting it.
    ///
    /// Raw units are yielded verbatim (lone surrogates included); scalar
    /// text is encoded on the fly.
    #[must_use]
    pub fn code_units(&self) -> CodeUnits<'_> {
        let inner = match &self.repr {
            Repr::Units(units) => CodeUnitsInner::Units(units.iter()),
            Repr::Scalars(scalars) => CodeUnitsInner::Scalars {
                scalars: scalars.iter(),
                pending: None,
            },
        };
        CodeUnits { inner }
    }

    /// Concatenate two cells into scalar text.
    ///
    /// Either operand still holding raw units is repaired first, then the
    /// scalars are joined in order. Neither source is mutated.
    #[must_use]
    pub fn concat(&self, other: &Self) -> Self {
        let mut scalars = self.repaired_scalars();
        scalars.extend(other.repaired_scalars());
        Self {
            repr: Repr::Scalars(scalars),
        }
    }

    fn repaired_scalars(&self) -> ScalarBuf {
        let units = match &self.repr {
            Repr::Scalars(scalars) => return scalars.clone(),
            Repr::Units(units) => units,
        };
        let mut out = ScalarBuf::with_capacity(units.len());
        let mut replaced = 0usize;
        let mut i = 0;
        while i < units.len() {
            let u = units[i];
            if unit::is_high_surrogate(u)
                && i + 1 < units.len()
                && unit::is_low_surrogate(units[i + 1])
            {
                out.push(unit::combine_surrogates(u, units[i + 1]));
                i += 2;
            } else if unit::is_surrogate(u) {
                out.push(REPLACEMENT);
                replaced += 1;
                i += 1;
            } else {
                // BMP unit outside the surrogate gap is its own scalar
                out.push(char::from_u32(u as u32).unwrap_or(REPLACEMENT));
                i += 1;
            }
        }
        if replaced > 0 {
            tracing::trace!(replaced, units = units.len(), "repaired ill-formed UTF-16");
        }
        out
    }
}

impl From<&str> for TextCell {
    /// A `&str` is scalar text by construction; never fails.
    fn from(text: &str) -> Self {
        Self {
            repr: Repr::Scalars(text.chars().collect()),
        }
    }
}

impl fmt::Display for TextCell {
    /// Formats the repaired text; raw units show U+FFFD where ill-formed.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use fmt::Write;
        for scalar in self.repaired_scalars() {
            f.write_char(scalar)?;
        }
        Ok(())
    }
}

/// Iterator over a cell's UTF-16 code-unit view.
///
/// Returned by [`TextCell::code_units`].
#[derive(Debug, Clone)]
pub struct CodeUnits<'a> {
    inner: CodeUnitsInner<'a>,
}

#[derive(Debug, Clone)]
enum CodeUnitsInner<'a> {
    Units(std::slice::Iter<'a, u16>),
    Scalars {
        scalars: std::slice::Iter<'a, char>,
        pending: Option<u16>,
    },
}

impl Iterator for CodeUnits<'_> {
    type Item = u16;

    fn next(&mut self) -> Option<u16> {
        match &mut self.inner {
            CodeUnitsInner::Units(units) => units.next().copied(),
            CodeUnitsInner::Scalars { scalars, pending } => {
                if let Some(unit) = pending.take() {
                    return Some(unit);
                }
                let scalar = *scalars.next()?;
                let mut buf = [0u16; 2];
                let encoded = scalar.encode_utf16(&mut buf);
                if let [first, second] = *encoded {
                    *pending = Some(second);
                    Some(first)
                } else {
                    Some(encoded[0])
                }
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.inner {
            CodeUnitsInner::Units(units) => units.size_hint(),
            CodeUnitsInner::Scalars { scalars, pending } => {
                let extra = usize::from(pending.is_some());
                let (lo, hi) = scalars.size_hint();
                (lo + extra, hi.and_then(|h| h.checked_mul(2)).map(|h| h + extra))
            }
        }
    }
}

impl std::iter::FusedIterator for CodeUnits<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    // ==========================================================================
    // Construction
    // ==========================================================================

    #[test]
    fn from_code_units_stores_verbatim() {
        let cell = TextCell::from_code_units(&[0x7C, 0xD83D, 0x7C]);
        assert_eq!(cell.as_code_units(), Some(&[0x7C, 0xD83D, 0x7C][..]));
        assert!(!cell.is_scalar_text());
    }

    #[test]
    fn from_scalars_accepts_valid_values() {
        let cell = TextCell::from_scalars(&[0x41, 0x1F4A9]).unwrap();
        assert_eq!(cell.as_scalars(), Some(&['A', '\u{1F4A9}'][..]));
    }

    #[test]
    fn from_scalars_rejects_surrogate() {
        let err = TextCell::from_scalars(&[0x41, 0xD800]).unwrap_err();
        assert_eq!(
            err,
            InvalidScalar::Surrogate {
                index: 1,
                value: 0xD800
            }
        );
    }

    #[test]
    fn from_scalars_rejects_out_of_range() {
        let err = TextCell::from_scalars(&[0x110000]).unwrap_err();
        assert_eq!(
            err,
            InvalidScalar::OutOfRange {
                index: 0,
                value: 0x110000
            }
        );
    }

    #[test]
    fn from_scalars_accepts_max_scalar() {
        let cell = TextCell::from_scalars(&[0x10FFFF]).unwrap();
        assert_eq!(cell.utf16_len(), 2);
        assert_eq!(cell.scalar_len(), Some(1));
    }

    #[test]
    fn from_str_is_scalar_text() {
        let cell = TextCell::from("|");
        assert!(cell.is_scalar_text());
        assert_eq!(cell.scalar_len(), Some(1));
    }

    // ==========================================================================
    // Classification
    // ==========================================================================

    #[test]
    fn lone_high_surrogate_is_ill_formed() {
        let cell = TextCell::from_code_units(&[0xD83D]);
        assert!(!cell.is_well_formed_utf16());
    }

    #[test]
    fn lone_low_surrogate_is_ill_formed() {
        let cell = TextCell::from_code_units(&[0xDC00]);
        assert!(!cell.is_well_formed_utf16());
    }

    #[test]
    fn swapped_pair_is_ill_formed() {
        let cell = TextCell::from_code_units(&[0xDCA9, 0xD83D]);
        assert!(!cell.is_well_formed_utf16());
    }

    #[test]
    fn valid_pair_is_well_formed() {
        let cell = TextCell::from_code_units(&[0xD83D, 0xDCA9]);
        assert!(cell.is_well_formed_utf16());
    }

    #[test]
    fn scalar_text_is_always_well_formed() {
        assert!(TextCell::from("hi").is_well_formed_utf16());
        assert!(TextCell::from("").is_well_formed_utf16());
    }

    // ==========================================================================
    // Counting
    // ==========================================================================

    #[test]
    fn raw_unit_count_applies_no_validation() {
        // the motivating anomaly: a lone surrogate counts as one unit
        let cell = TextCell::from_code_units(&[0xD83D]);
        assert_eq!(cell.utf16_len(), 1);
    }

    #[test]
    fn scalar_text_counts_pairs_as_two() {
        let cell = TextCell::from("a\u{1F4A9}");
        assert_eq!(cell.utf16_len(), 3);
        assert_eq!(cell.scalar_len(), Some(2));
    }

    #[test]
    fn scalar_len_is_none_for_raw_units() {
        assert_eq!(TextCell::from_code_units(&[0x41]).scalar_len(), None);
    }

    #[test]
    fn empty_cells() {
        assert!(TextCell::from_code_units(&[]).is_empty());
        assert!(TextCell::from("").is_empty());
        assert_eq!(TextCell::from_code_units(&[]).utf16_len(), 0);
    }

    // ==========================================================================
    // Repair
    // ==========================================================================

    #[test]
    fn repair_replaces_lone_surrogate() {
        let repaired = TextCell::from_code_units(&[0xD83D]).to_scalar_text_lossy();
        assert_eq!(repaired.as_scalars(), Some(&['\u{FFFD}'][..]));
    }

    #[test]
    fn repair_combines_valid_pair() {
        let repaired = TextCell::from_code_units(&[0xD83D, 0xDCA9]).to_scalar_text_lossy();
        assert_eq!(repaired.as_scalars(), Some(&['\u{1F4A9}'][..]));
    }

    #[test]
    fn repair_replaces_each_unpaired_unit_once() {
        // low-then-high: neither unit forms a pair, each becomes U+FFFD
        let repaired = TextCell::from_code_units(&[0xDCA9, 0xD83D]).to_scalar_text_lossy();
        assert_eq!(repaired.as_scalars(), Some(&['\u{FFFD}', '\u{FFFD}'][..]));
    }

    #[test]
    fn repair_passes_ordinary_units_through() {
        let repaired = TextCell::from_code_units(&[0x7C, 0xD83D, 0x7C]).to_scalar_text_lossy();
        assert_eq!(repaired.as_scalars(), Some(&['|', '\u{FFFD}', '|'][..]));
        assert_eq!(repaired.utf16_len(), 3);
    }

    #[test]
    fn repair_is_idempotent_on_scalar_text() {
        let cell = TextCell::from("a\u{1F4A9}b");
        assert_eq!(cell.to_scalar_text_lossy(), cell);
    }

    #[test]
    fn high_surrogate_at_end_of_longer_sequence() {
        let repaired = TextCell::from_code_units(&[0x41, 0xD800]).to_scalar_text_lossy();
        assert_eq!(repaired.as_scalars(), Some(&['A', '\u{FFFD}'][..]));
    }

    // ==========================================================================
    // Round trip
    // ==========================================================================

    #[test]
    fn well_formed_units_round_trip() {
        let original = [0x41, 0xD83D, 0xDCA9, 0x42];
        let cell = TextCell::from_code_units(&original);
        assert!(cell.is_well_formed_utf16());
        let back = cell.to_scalar_text_lossy().to_utf16_units();
        assert_eq!(back.as_code_units(), Some(&original[..]));
    }

    #[test]
    fn to_utf16_units_is_identity_on_raw_cells() {
        let cell = TextCell::from_code_units(&[0xD800]);
        assert_eq!(cell.to_utf16_units(), cell);
    }

    // ==========================================================================
    // Concatenation
    // ==========================================================================

    #[test]
    fn concat_bridges_raw_operand() {
        // "|" + lone surrogate + "|": the repaired middle is one
        // replacement scalar, so the joined length is 3
        let pipe = TextCell::from("|");
        let lone = TextCell::from_code_units(&[0xD83D]);
        let joined = pipe.concat(&lone).concat(&pipe);
        assert!(joined.is_scalar_text());
        assert_eq!(joined.utf16_len(), 3);
        assert_eq!(joined.to_string_lossy(), "|\u{FFFD}|");
    }

    #[test]
    fn concat_does_not_mutate_operands() {
        let lone = TextCell::from_code_units(&[0xD83D]);
        let _ = TextCell::from("|").concat(&lone);
        assert_eq!(lone.as_code_units(), Some(&[0xD83D][..]));
    }

    #[test]
    fn concat_preserves_astral_scalars() {
        let a = TextCell::from_code_units(&[0xD83D, 0xDCA9]);
        let joined = a.concat(&TextCell::from("!"));
        assert_eq!(joined.as_scalars(), Some(&['\u{1F4A9}', '!'][..]));
        assert_eq!(joined.utf16_len(), 3);
    }

    // ==========================================================================
    // Code-unit view
    // ==========================================================================

    #[test]
    fn code_units_yields_raw_units_verbatim() {
        let cell = TextCell::from_code_units(&[0xD83D, 0x41]);
        let units: Vec<u16> = cell.code_units().collect();
        assert_eq!(units, vec![0xD83D, 0x41]);
    }

    #[test]
    fn code_units_encodes_scalar_text() {
        let cell = TextCell::from("a\u{1F4A9}");
        let units: Vec<u16> = cell.code_units().collect();
        assert_eq!(units, vec![0x61, 0xD83D, 0xDCA9]);
    }

    #[test]
    fn code_units_count_matches_utf16_len() {
        for cell in [
            TextCell::from("a\u{1F4A9}b"),
            TextCell::from_code_units(&[0xDC00, 0x41]),
            TextCell::from(""),
        ] {
            assert_eq!(cell.code_units().count(), cell.utf16_len());
        }
    }

    // ==========================================================================
    // Display / errors
    // ==========================================================================

    #[test]
    fn display_shows_repaired_text() {
        let cell = TextCell::from_code_units(&[0x68, 0x69, 0xD800]);
        assert_eq!(cell.to_string(), "hi\u{FFFD}");
    }

    #[test]
    fn invalid_scalar_messages_name_the_value() {
        let surrogate = InvalidScalar::Surrogate {
            index: 2,
            value: 0xDFFF,
        };
        assert!(surrogate.to_string().contains("U+DFFF"));
        let range = InvalidScalar::OutOfRange {
            index: 0,
            value: 0x110000,
        };
        assert!(range.to_string().contains("0x110000"));
    }
}
