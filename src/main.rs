use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use json_condition_query as jcq;
use serde_json::Value;
use tracing::{debug, Level};

/// Match values against conditions and project them through queries.
#[derive(Parser, Debug)]
#[command(name = "jcq", author, version, about)]
struct Args {
    /// Raise log verbosity (-v debug, -vv trace). Logs go to stderr.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Test a value against a condition. Exits 0 on match, 1 otherwise.
    Match {
        /// JSON value, or @file
        value: String,
        /// JSON condition expression, or @file
        condition: String,
    },
    /// Project a value through a query. Prints nothing when the result is absent.
    Query {
        /// JSON value, or @file
        value: String,
        /// JSON query, or @file
        query: String,
    },
    /// Split a field path into its segments.
    Split { path: String },
    /// Join a JSON array of segments into a field path.
    Join { segments: String },
}

/// Inline JSON, or `@path` to read it from a file.
fn read_json(arg: &str) -> Result<Value, String> {
    let text = match arg.strip_prefix('@') {
        Some(path) => std::fs::read_to_string(path).map_err(|e| format!("cannot read {path}: {e}"))?,
        None => arg.to_string(),
    };
    serde_json::from_str(&text).map_err(|e| format!("Invalid JSON: {e}"))
}

fn pretty(value: &impl serde::Serialize) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| e.to_string())
}

fn run(command: Command) -> Result<ExitCode, String> {
    match command {
        Command::Match { value, condition } => {
            let (value, condition) = (read_json(&value)?, read_json(&condition)?);
            let matched = jcq::is_match(&value, &condition).map_err(|e| e.to_string())?;
            println!("{matched}");
            Ok(if matched { ExitCode::SUCCESS } else { ExitCode::from(1) })
        }
        Command::Query { value, query } => {
            let (value, query) = (read_json(&value)?, read_json(&query)?);
            if let Some(result) = jcq::execute(&value, &query).map_err(|e| e.to_string())? {
                println!("{}", pretty(&result)?);
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Split { path } => {
            let segments = jcq::field_path::split(&path).map_err(|e| e.to_string())?;
            println!("{}", pretty(&segments)?);
            Ok(ExitCode::SUCCESS)
        }
        Command::Join { segments } => {
            let segments: Vec<String> = serde_json::from_value(read_json(&segments)?)
                .map_err(|e| format!("expected an array of strings: {e}"))?;
            println!("{}", jcq::field_path::join(&segments));
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = match args.verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
    debug!(command = ?args.command, "starting");

    match run(args.command) {
        Ok(code) => code,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::from(2)
        }
    }
}
