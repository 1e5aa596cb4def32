//! `ason` CLI: normalize, check and match ASON expressions from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Normalize an expression (stdin → stdout)
//! echo '{"a": 1, "b": 2} & {"a": 1, "c": 3}' | ason normalize
//!
//! # Normalize from file to file, indented
//! ason normalize -i query.ason -o result.ason --pretty
//!
//! # Keep unbound variables instead of failing
//! echo '[v, 1]' | ason normalize --partial
//!
//! # Check that a file parses
//! ason check -i query.ason
//!
//! # Match a subject against a pattern
//! echo '{"x": 5, "y": 6}' | ason match --pattern '{"x": v}'
//!
//! # Combine two expressions
//! ason union '1 | 2' '3'
//! ason intersect '{"a": 1}' '{"b": 2}'
//!
//! # Use an engine configuration and debug logging
//! ason --config engine.json -vv normalize -i query.ason
//! ```

use anyhow::{Context, Result};
use ason_core::{
    parse_with, serialize, serialize_pretty, EngineConfig, Normalizer, ParseOptions, Resolution,
    Value,
};
use clap::{ArgAction, Parser, Subcommand};
use std::io::{self, Read};
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "ason",
    version,
    about = "ASON (JSON with union and intersection) CLI"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Engine configuration file (JSON)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Log more (-v info, -vv debug, -vvv trace). Logs go to stderr.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse, normalize and print an expression in canonical form
    Normalize {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Indent lists and objects
        #[arg(long)]
        pretty: bool,
        /// Keep unbound variables in the result
        #[arg(long)]
        partial: bool,
    },
    /// Check that the input parses
    Check {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
    /// Match the input against a pattern and print each set of bindings
    Match {
        /// Pattern expression
        #[arg(short, long)]
        pattern: String,
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
    /// Normalize `A | B`
    Union { a: String, b: String },
    /// Normalize `A & B`
    Intersect { a: String, b: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(cli.config.as_deref())?;
    let options = config.parse_options();
    let normalizer = config.normalizer();

    match cli.command {
        Commands::Normalize {
            input,
            output,
            pretty,
            partial,
        } => {
            let value = parse_input(&read_input(input.as_deref())?, &options)?;
            let normalizer = if partial {
                normalizer.with_resolution(Resolution::Partial)
            } else {
                normalizer
            };
            let canonical = normalizer
                .normalize(&value)
                .context("Failed to normalize expression")?;
            let text = if pretty {
                serialize_pretty(&canonical)?
            } else {
                serialize(&canonical)?
            };
            write_output(output.as_deref(), &text)?;
        }
        Commands::Check { input } => {
            let value = parse_input(&read_input(input.as_deref())?, &options)?;
            tracing::info!(kind = %value.kind(), "input parsed");
            println!("ok");
        }
        Commands::Match { pattern, input } => {
            let subject = parse_input(&read_input(input.as_deref())?, &options)?;
            let pattern = parse_with(&pattern, &options).context("Failed to parse pattern")?;
            let found = normalizer
                .match_pattern(&subject, &pattern)
                .context("Failed to match pattern")?;
            if found.is_empty() {
                println!("no match");
                process::exit(1);
            }
            for bindings in &found {
                println!("{bindings}");
            }
        }
        Commands::Union { a, b } => {
            let combined = ason_core::union(parse_input(&a, &options)?, parse_input(&b, &options)?);
            print_normalized(&normalizer, &combined)?;
        }
        Commands::Intersect { a, b } => {
            let combined =
                ason_core::intersect(parse_input(&a, &options)?, parse_input(&b, &options)?);
            print_normalized(&normalizer, &combined)?;
        }
    }

    Ok(())
}

/// `-v` flags take precedence over `RUST_LOG`; with neither, only warnings show.
fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_config(path: Option<&str>) -> Result<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path))?;
    let config = EngineConfig::from_json_str(&text)
        .with_context(|| format!("Invalid config file: {}", path))?;
    tracing::info!(path, "loaded engine configuration");
    Ok(config)
}

fn parse_input(text: &str, options: &ParseOptions) -> Result<Value> {
    parse_with(text, options).context("Failed to parse ASON input")
}

fn print_normalized(normalizer: &Normalizer, value: &Value) -> Result<()> {
    let canonical = normalizer
        .normalize(value)
        .context("Failed to normalize expression")?;
    println!("{}", serialize(&canonical)?);
    Ok(())
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, format!("{content}\n"))
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
