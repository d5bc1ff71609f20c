//! # brat2bio
//!
//! A CLI tool for converting BRAT standoff annotation files into BIO tagging.
//!
//! ## Overview
//!
//! brat2bio is built on top of brat2biolib. It finds `.ann` files in a catalog,
//! converts each one to a token-per-line BIO file written next to it, and
//! prints how many files were converted.
//!
//! ## Usage
//!
//! ```bash
//! # Convert .ann files in the current directory
//! brat2bio
//!
//! # Convert a relative catalog and everything below it
//! brat2bio corpus/train --recursive
//!
//! # Custom suffix and extensions
//! brat2bio corpus --suff-conv _tags --init-extension .ann --final-extension .tsv
//!
//! # Print a JSON report
//! brat2bio corpus --output json
//! ```

mod render;

use std::process::ExitCode;

use brat2biolib::{
    locate, resolve_catalog, ConvertOptions, Converter, FilterConfig, ShortTokenPolicy,
};
use clap::{Arg, ArgAction, ArgMatches, Command};
use render::{render_report, OutputMode};
use tracing::level_filters::LevelFilter;

/// Build the clap Command structure
fn build_command() -> Command {
    Command::new("brat2bio")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert BRAT standoff annotations to BIO tagging")
        .arg(
            Arg::new("catalog")
                .help("Directory to search, relative to the current directory (defaults to current directory)"),
        )
        .arg(
            Arg::new("suff-conv")
                .long("suff-conv")
                .default_value("_bio")
                .help("Suffix added to converted files and excluded from the search"),
        )
        .arg(
            Arg::new("init-extension")
                .long("init-extension")
                .default_value(".ann")
                .help("Extension of files to convert"),
        )
        .arg(
            Arg::new("final-extension")
                .long("final-extension")
                .default_value(".ann")
                .help("Extension of converted files"),
        )
        .arg(
            Arg::new("recursive")
                .long("recursive")
                .action(ArgAction::SetTrue)
                .help("Search subdirectories too"),
        )
        .arg(
            Arg::new("short-tokens")
                .long("short-tokens")
                .value_parser(["demote", "keep"])
                .default_value("demote")
                .help("Tag tokens of two characters or fewer inside a span as O (demote) or like any other token (keep)"),
        )
        .arg(
            Arg::new("parallel")
                .long("parallel")
                .action(ArgAction::SetTrue)
                .help("Convert files in parallel"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_parser(["text", "json"])
                .default_value("text")
                .help("Summary format"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .help("Log more detail to stderr (-v info, -vv debug)"),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .action(ArgAction::SetTrue)
                .conflicts_with("verbose")
                .help("Only log errors"),
        )
}

/// Install the stderr log subscriber
fn init_logging(matches: &ArgMatches) {
    let level = if matches.get_flag("quiet") {
        LevelFilter::ERROR
    } else {
        match matches.get_count("verbose") {
            0 => LevelFilter::WARN,
            1 => LevelFilter::INFO,
            _ => LevelFilter::DEBUG,
        }
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn get_str<'a>(matches: &'a ArgMatches, id: &str) -> &'a str {
    matches
        .get_one::<String>(id)
        .map(|s| s.as_str())
        .unwrap_or_default()
}

/// Locate and convert, returning the rendered summary
fn run(matches: &ArgMatches) -> Result<String, anyhow::Error> {
    let suffix = get_str(matches, "suff-conv");
    let init_extension = get_str(matches, "init-extension");
    let final_extension = get_str(matches, "final-extension");
    let policy: ShortTokenPolicy = get_str(matches, "short-tokens").parse()?;
    let mode: OutputMode = get_str(matches, "output")
        .parse()
        .map_err(anyhow::Error::msg)?;

    let catalog = resolve_catalog(matches.get_one::<String>("catalog").map(|s| s.as_str()))?;
    let filter = FilterConfig::new()
        .extension(init_extension)
        .exclude_suffix(suffix)
        .recursive(matches.get_flag("recursive"));

    let files = locate(&catalog, &filter)?;
    tracing::info!("found {} file(s) in {}", files.len(), catalog.display());

    let options = ConvertOptions::new()
        .suffix(suffix)
        .input_extension(init_extension)
        .output_extension(final_extension)
        .short_tokens(policy);
    let converter = Converter::new(options).with_parallelism(matches.get_flag("parallel"));
    let report = converter.convert_all(&files);

    render_report(&report, mode)
}

fn main() -> ExitCode {
    let matches = build_command().get_matches();
    init_logging(&matches);

    match run(&matches) {
        Ok(output) => {
            print!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
