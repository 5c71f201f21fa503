#![forbid(unsafe_code)]

//! Command-line argument parsing for the textcell demo.
//!
//! Parses args manually (no external dependencies) to keep the binary
//! lean. Supports environment variable overrides via `TEXTCELL_DEMO_*`.

use std::env;
use std::process;

const VERSION: &str = env!("CARGO_PKG_VERSION");

const HELP_TEXT: &str = "\
textcell-demo — UTF-16 bridging scenarios

USAGE:
    textcell-demo [OPTIONS]

OPTIONS:
    --scenario=NAME   Scenario to print: 'bridge', 'pair', 'repair',
                      or 'all' (default: all)
    --help, -h        Show this help message
    --version, -V     Show version

SCENARIOS:
    bridge   A lone high surrogate constructed from raw code units,
             bridged between two ASCII delimiters (length 3)
    pair     A well-formed surrogate pair versus a rejected lone
             surrogate scalar
    repair   An ill-formed unit sequence walked through lossy repair

ENVIRONMENT VARIABLES:
    TEXTCELL_DEMO_SCENARIO   Override --scenario
    TEXTCELL_DEMO_TRACE      Set to 1 to enable trace logging";

/// Which scenario(s) to print.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    Bridge,
    Pair,
    Repair,
    All,
}

impl Scenario {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "bridge" => Some(Self::Bridge),
            "pair" => Some(Self::Pair),
            "repair" => Some(Self::Repair),
            "all" => Some(Self::All),
            _ => None,
        }
    }
}

/// Parsed command-line options.
pub struct Opts {
    /// Scenario selection.
    pub scenario: Scenario,
    /// Whether trace logging is enabled.
    pub trace: bool,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            scenario: Scenario::All,
            trace: false,
        }
    }
}

impl Opts {
    /// Parse command-line arguments and environment variables.
    ///
    /// Environment variables take precedence over defaults but are
    /// overridden by explicit command-line flags.
    pub fn parse() -> Self {
        let mut opts = Self::default();

        // Apply environment variable defaults first
        if let Ok(val) = env::var("TEXTCELL_DEMO_SCENARIO")
            && let Some(s) = Scenario::from_name(&val)
        {
            opts.scenario = s;
        }
        if let Ok(val) = env::var("TEXTCELL_DEMO_TRACE") {
            opts.trace = val == "1";
        }

        // Parse command-line args (override env vars)
        for arg in env::args().skip(1) {
            match arg.as_str() {
                "--help" | "-h" => {
                    println!("{HELP_TEXT}");
                    process::exit(0);
                }
                "--version" | "-V" => {
                    println!("textcell-demo {VERSION}");
                    process::exit(0);
                }
                other => {
                    if let Some(val) = other.strip_prefix("--scenario=") {
                        match Scenario::from_name(val) {
                            Some(s) => opts.scenario = s,
                            None => {
                                eprintln!("Invalid --scenario value: {val}");
                                process::exit(1);
                            }
                        }
                    } else {
                        eprintln!("Unknown argument: {other}");
                        eprintln!("Run with --help for usage information.");
                        process::exit(1);
                    }
                }
            }
        }

        opts
    }
}
