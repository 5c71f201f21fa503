#![forbid(unsafe_code)]

//! Presentation layer for the `textcell` crate.
//!
//! Formats and prints the UTF-16 bridging scenarios; the core crate does
//! no I/O of its own. Scenario builders return their output as lines so
//! tests can assert on them without capturing stdout.

pub mod cli;
pub mod scenarios;
