#![forbid(unsafe_code)]

//! textcell demo binary entry point.

use textcell_demo::cli;
use textcell_demo::scenarios;

fn main() {
    let opts = cli::Opts::parse();

    if opts.trace {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("trace")),
            )
            .init();
    }

    for line in scenarios::run(opts.scenario) {
        println!("{line}");
    }
}
