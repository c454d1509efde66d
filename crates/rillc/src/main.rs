//! The Rill type inference CLI.
//!
//! Provides the `rillc` command with the following subcommands:
//!
//! - `rillc infer <file>` - Infer the type of a manifest's final statement
//! - `rillc infer -e <source>` - Infer inline source instead of a file
//!
//! Options:
//! - `--json` - Output the result (or error) as JSON
//! - `--no-color` - Disable colorized diagnostics

use std::fs;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use rill_typeck::diagnostics::{render_parse_error, render_type_error};

#[derive(Parser)]
#[command(name = "rillc", version, about = "The Rill type inferencer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Infer the type of a manifest's final statement
    Infer {
        /// Path to the manifest file
        #[arg(required_unless_present = "evaluate", conflicts_with = "evaluate")]
        file: Option<PathBuf>,

        /// Infer this source text instead of reading a file
        #[arg(short, long)]
        evaluate: Option<String>,

        /// Output the result as JSON instead of a rendered type string
        #[arg(long)]
        json: bool,

        /// Disable colorized output
        #[arg(long = "no-color")]
        no_color: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Infer {
            file,
            evaluate,
            json,
            no_color,
        } => {
            let source = match (&file, evaluate) {
                (_, Some(source)) => source,
                (Some(path), None) => match fs::read_to_string(path) {
                    Ok(source) => source,
                    Err(e) => {
                        eprintln!("error: cannot read {}: {}", path.display(), e);
                        process::exit(1);
                    }
                },
                (None, None) => unreachable!("clap enforces file or --evaluate"),
            };

            let color = !no_color && !json;
            if let Err(code) = infer(&source, json, color) {
                process::exit(code);
            }
        }
    }
}

/// Parse and infer `source`, printing the result. Returns the exit code on
/// failure.
fn infer(source: &str, json: bool, color: bool) -> Result<(), i32> {
    let program = match rill_parser::parse(source) {
        Ok(program) => program,
        Err(err) => {
            if json {
                let msg = serde_json::json!({
                    "error": "parse",
                    "message": err.message,
                    "span": { "start": err.span.start, "end": err.span.end },
                });
                eprintln!("{msg}");
            } else {
                eprint!("{}", render_parse_error(&err, source, color));
            }
            return Err(1);
        }
    };

    match rill_typeck::infer(&program) {
        Ok(ty) => {
            if json {
                let msg = serde_json::json!({
                    "type": serde_json::to_value(&ty).expect("types serialize"),
                    "rendered": ty.to_string(),
                });
                println!("{msg}");
            } else {
                println!("{ty}");
            }
            Ok(())
        }
        Err(err) => {
            if json {
                let msg = serde_json::json!({
                    "error": "type",
                    "message": err.to_string(),
                    "span": { "start": err.span().start, "end": err.span().end },
                });
                eprintln!("{msg}");
            } else {
                eprint!("{}", render_type_error(&err, source, color));
            }
            Err(1)
        }
    }
}
