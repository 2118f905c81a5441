//! pgnorm CLI
//!
//! Command-line tool that replaces the constants in SQL statements with
//! `$n` placeholders.

use std::io::Read;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

use pgnorm_core::config::DEFAULT_MAX_DEPTH;
use pgnorm_core::{NormalizeConfig, NormalizedQuery, Normalizer};

/// Normalize PostgreSQL statements by replacing constants with placeholders.
#[derive(Parser)]
#[command(name = "pgnorm")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// SQL to normalize. Each argument is normalized on its own.
    /// Reads standard input if neither SQL nor --file is given.
    #[arg(conflicts_with = "file")]
    sql: Vec<String>,

    /// Read SQL from a file ("-" for standard input).
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Normalize each `;`-separated statement separately, one per line.
    #[arg(short, long)]
    split: bool,

    /// Print one JSON object per result instead of plain text.
    #[arg(short, long)]
    json: bool,

    /// Maximum statement nesting depth.
    #[arg(long, env = "PGNORM_MAX_DEPTH", default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,
}

/// One normalized query as printed with `--json`.
#[derive(Serialize)]
struct Report<'a> {
    query: &'a str,
    normalized: &'a str,
    constants: usize,
    highest_param_id: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    location: Option<usize>,
}

impl<'a> Report<'a> {
    fn new(query: &'a str, normalized: &'a NormalizedQuery, location: Option<usize>) -> Self {
        Self {
            query,
            normalized: &normalized.text,
            constants: normalized.constants,
            highest_param_id: normalized.highest_param_id,
            location,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let normalizer = Normalizer::new(NormalizeConfig::new().with_max_depth(cli.max_depth));

    for (index, input) in read_inputs(&cli)?.iter().enumerate() {
        let sql = input.trim_end();
        debug!(input = index + 1, bytes = sql.len(), "normalizing");

        if cli.split {
            let statements = normalizer
                .normalize_statements(sql)
                .with_context(|| format!("failed to normalize input {}", index + 1))?;
            for statement in &statements {
                if cli.json {
                    let report = Report::new(
                        &statement.original,
                        &statement.query,
                        Some(statement.location),
                    );
                    println!("{}", serde_json::to_string(&report)?);
                } else {
                    println!("{}", statement.query.text);
                }
            }
        } else {
            let query = normalizer
                .normalize_query(sql)
                .with_context(|| format!("failed to normalize input {}", index + 1))?;
            if cli.json {
                println!("{}", serde_json::to_string(&Report::new(sql, &query, None))?);
            } else {
                println!("{}", query.text);
            }
        }
    }

    Ok(())
}

/// Collects the texts to normalize: the SQL arguments, the file, or stdin.
fn read_inputs(cli: &Cli) -> anyhow::Result<Vec<String>> {
    if !cli.sql.is_empty() {
        return Ok(cli.sql.clone());
    }

    let text = match &cli.file {
        Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        _ => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("failed to read standard input")?;
            text
        }
    };
    Ok(vec![text])
}
