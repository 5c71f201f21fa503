#![forbid(unsafe_code)]

//! Hexadecimal presentation of cell contents.
//!
//! Pure formatting only; printing belongs to the caller. Code units are
//! rendered in the `0x` form, scalars as `U+` followed by four to six
//! hexadecimal digits.

use crate::cell::TextCell;
use std::fmt::Write;

/// Render the cell's UTF-16 view as a bracketed code-unit list.
///
/// Raw units appear verbatim, lone surrogates included; scalar text is
/// encoded first.
///
/// # Example
/// ```
/// use textcell::{TextCell, hex};
///
/// let cell = TextCell::from_code_units(&[0x7C, 0xD83D, 0x7C]);
/// assert_eq!(hex::units(&cell), "[0x007C, 0xD83D, 0x007C]");
/// ```
#[must_use]
pub fn units(cell: &TextCell) -> String {
    let mut out = String::from("[");
    for (i, unit) in cell.code_units().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        // infallible: String's fmt::Write never errors
        let _ = write!(out, "{unit:#06X}");
    }
    out.push(']');
    out
}

/// Render a scalar-text cell as a bracketed `U+` list.
///
/// Returns `None` for raw-unit cells, which have no scalar view before
/// repair.
///
/// # Example
/// ```
/// use textcell::{TextCell, hex};
///
/// let cell = TextCell::from("|\u{FFFD}|");
/// assert_eq!(hex::scalars(&cell).as_deref(), Some("[U+007C, U+FFFD, U+007C]"));
/// ```
#[must_use]
pub fn scalars(cell: &TextCell) -> Option<String> {
    let scalars = cell.as_scalars()?;
    let mut out = String::from("[");
    for (i, scalar) in scalars.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        let _ = write!(out, "U+{:04X}", *scalar as u32);
    }
    out.push(']');
    Some(out)
}
