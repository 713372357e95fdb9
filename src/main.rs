use std::io::{self, BufWriter};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use vcdatatable::cli::Cli;
use vcdatatable::datatable::writer;
use vcdatatable::DatatableBuilder;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    cli.validate()
        .context("Failed to validate command-line arguments")?;
    let config = cli
        .table_config()
        .context("Failed to load table configuration")?;

    let builder = DatatableBuilder::new(cli.layout(), &config);
    let table = builder
        .build(&cli.ids)
        .with_context(|| format!("Failed to build datatable from {:?}", cli.ids))?;

    match &cli.output {
        Some(path) => writer::save(&table, path, config.delimiter)
            .with_context(|| format!("Failed to write datatable to {:?}", path))?,
        None => table
            .write_delimited(BufWriter::new(io::stdout().lock()), config.delimiter)
            .context("Failed to write datatable to stdout")?,
    }

    Ok(())
}

/// Logs go to stderr so a table written to stdout stays clean.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
