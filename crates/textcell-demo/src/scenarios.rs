#![forbid(unsafe_code)]

//! The printed scenarios.
//!
//! Each builder returns its output as lines; `main` does the printing.

use crate::cli::Scenario;
use textcell::{TextCell, hex};

/// A lone high surrogate constructed from raw code units, then bridged
/// into scalar text between two ASCII delimiters.
#[must_use]
pub fn bridge() -> Vec<String> {
    let raw = TextCell::from_code_units(&[0xD83D]);
    let mut lines = vec![
        String::from("A cell built from one raw code unit:"),
        format!("  code units   = {}", hex::units(&raw)),
        format!("  utf16 length = {}", raw.utf16_len()),
        format!("  well-formed  = {}", raw.is_well_formed_utf16()),
    ];

    let bridged = TextCell::from("|").concat(&raw).concat(&TextCell::from("|"));
    lines.push(format!("Bridged between delimiters: {bridged}"));
    lines.push(format!("  utf16 length = {}", bridged.utf16_len()));
    lines.push(format!("  code units   = {}", hex::units(&bridged)));
    lines
}

/// A well-formed astral scalar next to the lone surrogate that scalar
/// construction rejects.
#[must_use]
pub fn pair() -> Vec<String> {
    let well_formed = TextCell::from("ABC: \u{1F4A9}");
    let mut lines = vec![
        String::from("A well-formed astral scalar occupies two code units:"),
        format!("  text         = {well_formed}"),
        format!("  utf16 length = {}", well_formed.utf16_len()),
        format!("  code units   = {}", hex::units(&well_formed)),
    ];

    lines.push(String::from(
        "The same lead unit alone is not a scalar value:",
    ));
    if let Err(err) = TextCell::from_scalars(&[0xD83D]) {
        lines.push(format!("  rejected: {err}"));
    }
    lines.push(String::from(
        "  ...but raw-unit construction accepts it verbatim:",
    ));
    let raw = TextCell::from("ABC: ").concat(&TextCell::from_code_units(&[0xD83D]));
    lines.push(format!("  repaired text = {raw}"));
    lines.push(format!("  utf16 length  = {}", raw.utf16_len()));
    lines
}

/// An ill-formed unit sequence walked through lossy repair.
#[must_use]
pub fn repair() -> Vec<String> {
    let cell = TextCell::from_code_units(&[0x65E5, 0xD800, 0x41, 0xDC00]);
    let repaired = cell.to_scalar_text_lossy();
    vec![
        String::from("An ill-formed sequence under lossy repair:"),
        format!("  code units   = {}", hex::units(&cell)),
        format!("  well-formed  = {}", cell.is_well_formed_utf16()),
        format!(
            "  scalars      = {}",
            hex::scalars(&repaired).unwrap_or_default()
        ),
        format!("  text         = {repaired}"),
        format!(
            "  utf16 length = {} (raw length was {})",
            repaired.utf16_len(),
            cell.utf16_len()
        ),
    ]
}

/// Assemble the lines for the selected scenario(s).
#[must_use]
pub fn run(scenario: Scenario) -> Vec<String> {
    let sections: Vec<(&str, Vec<String>)> = match scenario {
        Scenario::Bridge => vec![("bridge", bridge())],
        Scenario::Pair => vec![("pair", pair())],
        Scenario::Repair => vec![("repair", repair())],
        Scenario::All => vec![
            ("bridge", bridge()),
            ("pair", pair()),
            ("repair", repair()),
        ],
    };

    let mut lines = Vec::new();
    for (i, (name, body)) in sections.into_iter().enumerate() {
        if i > 0 {
            lines.push(String::new());
        }
        lines.push(format!("=== {name} ==="));
        lines.extend(body);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bridge_reports_length_three() {
        let lines = bridge().join("\n");
        assert!(lines.contains("utf16 length = 1"));
        assert!(lines.contains("utf16 length = 3"));
        assert!(lines.contains("0xFFFD"));
    }

    #[test]
    fn pair_shows_rejection_and_repair() {
        let lines = pair().join("\n");
        assert!(lines.contains("utf16 length = 7"));
        assert!(lines.contains("rejected: surrogate code point U+D83D"));
        assert!(lines.contains("utf16 length  = 6"));
    }

    #[test]
    fn repair_walks_each_unit() {
        let lines = repair().join("\n");
        assert!(lines.contains("well-formed  = false"));
        assert!(lines.contains("[U+65E5, U+FFFD, U+0041, U+FFFD]"));
        assert!(lines.contains("utf16 length = 4 (raw length was 4)"));
    }

    #[test]
    fn run_all_includes_every_section() {
        let lines = run(Scenario::All).join("\n");
        for name in ["=== bridge ===", "=== pair ===", "=== repair ==="] {
            assert!(lines.contains(name));
        }
    }
}
