//! CLI binary for the BPLT converter
//!
//! Converts one BPLT file to CSV. The size guard limit comes from
//! `BPLT_MAX_CELLS` unless `--max-cells` is given.

use anyhow::{anyhow, Context, Result};
use bplt_converter::{
    compute_export_paths, convert_bplt_to_csv, export_header_to_csv, ConversionOptions,
    DEFAULT_MAX_CELLS,
};
use clap::{Arg, Command};
use log::{debug, warn, LevelFilter};
use std::path::Path;

const MAX_CELLS_ENV: &str = "BPLT_MAX_CELLS";

fn long_version() -> String {
    match option_env!("VERGEN_GIT_SHA") {
        Some(sha) => format!("{} ({sha})", env!("CARGO_PKG_VERSION")),
        None => env!("CARGO_PKG_VERSION").to_string(),
    }
}

fn build_command() -> Command {
    Command::new("BPLT Converter")
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version())
        .about("Convert ECI Binary Plot Data (.bplt) files to CSV")
        .arg(
            Arg::new("input")
                .help("Input BPLT file")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("output")
                .help("Output CSV file")
                .required(true)
                .index(2),
        )
        .arg(
            Arg::new("debug")
                .long("debug")
                .help("Enable debug output and detailed decoding information")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("headers")
                .long("headers")
                .help("Also export decoded header fields to <output>.headers.csv")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("max-cells")
                .long("max-cells")
                .help("Maximum declared rows x columns before refusing to convert (<= 0 disables; overrides BPLT_MAX_CELLS)")
                .value_name("CELLS")
                .allow_negative_numbers(true)
                .value_parser(clap::value_parser!(i64)),
        )
}

/// Initialize logging; `RUST_LOG` still applies on top of the chosen level
fn init_logging(debug: bool) {
    use env_logger::Builder;
    use std::io::Write;

    let level = if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .init();
}

/// Size guard limit from the environment, falling back to the default
fn max_cells_from_env() -> Result<i64> {
    match std::env::var(MAX_CELLS_ENV) {
        Ok(raw) => raw
            .trim()
            .parse::<i64>()
            .with_context(|| format!("Invalid {MAX_CELLS_ENV} value: {raw:?}")),
        Err(std::env::VarError::NotPresent) => Ok(DEFAULT_MAX_CELLS),
        Err(e) => Err(anyhow!("Invalid {MAX_CELLS_ENV} value: {e}")),
    }
}

fn run(input: &Path, output: &Path, options: &ConversionOptions, headers: bool) -> Result<()> {
    let conversion = convert_bplt_to_csv(input, output, options)?;

    for skipped in &conversion.skipped {
        warn!("Channel {} not converted: {}", skipped.name, skipped.reason);
    }

    if headers {
        let header_path = compute_export_paths(output);
        export_header_to_csv(&conversion.header, &header_path)
            .with_context(|| format!("Failed to export headers to {header_path:?}"))?;
        println!("Exported headers to: {}", header_path.display());
    }

    Ok(())
}

fn main() {
    let matches = build_command().get_matches();

    let debug = matches.get_flag("debug");
    init_logging(debug);

    let input = matches
        .get_one::<String>("input")
        .map(Path::new)
        .unwrap_or(Path::new(""));
    let output = matches
        .get_one::<String>("output")
        .map(Path::new)
        .unwrap_or(Path::new(""));

    if !input.exists() {
        eprintln!("Error: Input file not found: {}", input.display());
        std::process::exit(1);
    }

    let max_cells = match matches.get_one::<i64>("max-cells") {
        Some(&limit) => Ok(limit),
        None => max_cells_from_env(),
    };
    let options = match max_cells {
        Ok(limit) => ConversionOptions::with_max_cells(limit),
        Err(e) => {
            eprintln!("Error converting file: {e:#}");
            std::process::exit(1);
        }
    };
    debug!("Size guard: {} cells", options.max_cells);

    match run(input, output, &options, matches.get_flag("headers")) {
        Ok(()) => {
            println!(
                "Successfully converted {} to {}",
                input.display(),
                output.display()
            );
        }
        Err(e) => {
            eprintln!("Error converting file: {e:#}");
            std::process::exit(1);
        }
    }
}
