// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! `sql-fluent`: convert positional SQL into query-builder calls

mod output;

use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use sql_fluent_lowering::scanner::split_top_level;
use sql_fluent_lowering::{ConversionStats, Converter, ConverterConfig, SqlFragment, normalize};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::output::{Report, render_json, render_text};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Parser)]
#[command(
    name = "sql-fluent",
    about = "Convert positional-parameter SQL into fluent query-builder calls"
)]
struct Cli {
    /// Input files; stdin is read when none are given
    input: Vec<PathBuf>,

    /// Converter configuration (.json, .yaml or .yml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Treat each input as a JSON-serialized SQL fragment
    #[arg(long)]
    fragment: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    format: Format,
}

fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ConverterConfig::from_path(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ConverterConfig::default(),
    };
    let mode = config.emission_mode;
    let converter = Converter::new(config);

    let mut statements = Vec::new();
    for text in read_inputs(&cli.input)? {
        if cli.fragment {
            let fragment: SqlFragment =
                serde_json::from_str(&text).context("Failed to parse SQL fragment")?;
            statements.push((fragment.to_string(), converter.convert(&fragment)));
        } else {
            // Comment-only chunks are not statements
            let chunks = split_top_level(&text, ';').into_iter();
            for sql in chunks.filter(|s| !normalize(s).is_empty()) {
                let result = converter.convert_sql(&sql);
                statements.push((sql, result));
            }
        }
    }
    info!(statements = statements.len(), "converted input");

    let mut stats = ConversionStats::new();
    let mut json = Vec::new();
    for (i, (sql, result)) in statements.iter().enumerate() {
        stats.record(result);
        let report = Report {
            index: i + 1,
            sql,
            result,
        };
        match cli.format {
            Format::Text => println!("{}", render_text(mode, &report)),
            Format::Json => json.push(render_json(&report)),
        }
    }

    if cli.format == Format::Json {
        let rendered = serde_json::to_string_pretty(&json).context("Failed to render JSON")?;
        println!("{}", rendered);
    }

    eprintln!(
        "{} statement(s): {} converted, {} partial, {} declined",
        stats.total(),
        stats.converted,
        stats.partial,
        stats.declined
    );
    Ok(())
}

fn read_inputs(paths: &[PathBuf]) -> Result<Vec<String>> {
    if paths.is_empty() {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read stdin")?;
        return Ok(vec![text]);
    }

    paths
        .iter()
        .map(|path| {
            std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))
        })
        .collect()
}
