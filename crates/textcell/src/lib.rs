#![forbid(unsafe_code)]

//! Unicode text cells that survive ill-formed UTF-16.
//!
//! This crate provides a small cell abstraction for text that may arrive
//! as raw UTF-16 code units, lone surrogates included:
//! - [`TextCell`] - one immutable cell, either raw units or scalar text
//! - [`InvalidScalar`] - rejection for values that are not scalar values
//! - [`CellMetrics`] / [`MetricsCache`] - one-pass measurement with an
//!   LRU cache for re-measuring hot cells
//! - [`unit`] - UTF-16 code-unit predicates and pair combination
//! - [`hex`] - hexadecimal presentation of units and scalars
//!
//! # Example
//! ```
//! use textcell::TextCell;
//!
//! // Raw construction accepts anything, even a lone high surrogate
//! let lone = TextCell::from_code_units(&[0xD83D]);
//! assert_eq!(lone.utf16_len(), 1);
//! assert!(!lone.is_well_formed_utf16());
//!
//! // Bridging to scalar text repairs it to one replacement scalar,
//! // so delimiter + cell + delimiter measures 3 code units
//! let bridged = TextCell::from("|").concat(&lone).concat(&"|".into());
//! assert_eq!(bridged.utf16_len(), 3);
//!
//! // Well-formed sequences round-trip exactly
//! let pair = TextCell::from_code_units(&[0xD83D, 0xDCA9]);
//! let back = pair.to_scalar_text_lossy().to_utf16_units();
//! assert_eq!(back, pair);
//! ```

pub mod cell;
pub mod hex;
pub mod metrics;
pub mod unit;

pub use cell::{CodeUnits, InvalidScalar, TextCell};
pub use metrics::{CacheStats, CellMetrics, DEFAULT_CACHE_CAPACITY, MetricsCache};

#[cfg(feature = "thread_local_cache")]
pub use metrics::cached_metrics;
