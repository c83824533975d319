//! # extloc
//!
//! A CLI tool that counts blank, non-blank and deprecated lines of a source
//! tree, grouped by file extension.
//!
//! ## Usage
//!
//! ```bash
//! # Count the current directory
//! extloc
//!
//! # Count a source directory decoded as windows-1251
//! extloc src/main --encoding windows-1251
//!
//! # Output as JSON
//! extloc src --output json
//!
//! # Send the report through the log instead of stdout
//! extloc src --output log
//! ```
//!
//! Diagnostics are written to stderr; `RUST_LOG` overrides the log filter.

use std::process::ExitCode;

use clap::{Arg, ArgAction, ArgMatches, Command};
use extloclib::{
    count_tree, failure_message, run, CountOptions, ReportSink, TracingSink, DEFAULT_ENCODING,
};
use tracing::error;
use tracing_subscriber::EnvFilter;

/// Prints blocks to stdout and routes diagnostics to the log.
struct ConsoleSink;

impl ReportSink for ConsoleSink {
    fn block(&mut self, text: &str) {
        // Blocks end with a newline; println adds the blank separator line
        println!("{}", text);
    }

    fn diagnostic(&mut self, message: &str) {
        error!("{}", message);
    }
}

/// Build the clap Command structure
fn build_command() -> Command {
    Command::new("extloc")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Arthur Debert")
        .about("Counts empty, non-empty and deprecated lines per file extension")
        .arg(
            Arg::new("path")
                .help("File or directory to analyze (defaults to current directory)")
                .default_value("."),
        )
        .arg(
            Arg::new("encoding")
                .short('e')
                .long("encoding")
                .default_value(DEFAULT_ENCODING)
                .help("Encoding of the source files (e.g. UTF-8, UTF-16LE, windows-1251)"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .default_value("text")
                .value_parser(["text", "json", "log"])
                .help("Output format"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Log every visited file"),
        )
}

/// Set up the stderr log; `RUST_LOG` wins over the defaults.
fn init_logging(verbose: bool, output: &str) {
    let default_filter = if verbose {
        "debug"
    } else if output == "log" {
        "info"
    } else {
        "warn"
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Count and print as JSON.
fn print_json(path: &str, options: &CountOptions) -> Result<(), anyhow::Error> {
    let report = count_tree(path, options, &mut ConsoleSink)
        .map_err(|e| anyhow::anyhow!(failure_message(&e)))?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn count(matches: &ArgMatches) -> ExitCode {
    let path = matches
        .get_one::<String>("path")
        .map(|s| s.as_str())
        .unwrap_or(".");
    let encoding = matches
        .get_one::<String>("encoding")
        .map(|s| s.as_str())
        .unwrap_or(DEFAULT_ENCODING);
    let output = matches
        .get_one::<String>("output")
        .map(|s| s.as_str())
        .unwrap_or("text");

    let options = CountOptions::new().encoding(encoding);

    match output {
        "json" => match print_json(path, &options) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                error!("{:#}", e);
                ExitCode::FAILURE
            }
        },
        "log" => match run(path, &options, &mut TracingSink) {
            Some(_) => ExitCode::SUCCESS,
            None => ExitCode::FAILURE,
        },
        _ => match run(path, &options, &mut ConsoleSink) {
            Some(_) => ExitCode::SUCCESS,
            None => ExitCode::FAILURE,
        },
    }
}

fn main() -> ExitCode {
    let matches = build_command().get_matches();

    let output = matches
        .get_one::<String>("output")
        .map(|s| s.as_str())
        .unwrap_or("text");
    init_logging(matches.get_flag("verbose"), output);

    count(&matches)
}
