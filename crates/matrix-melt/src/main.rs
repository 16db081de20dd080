//! Matrix workbook reshaper CLI
//!
//! Reads an attributes-by-classes workbook and writes the long-form
//! `<stem>_converted.xlsx` table next to it.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use matrix_melt::melt;
use tracing::{info, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "matrix-melt")]
#[command(about = "Reshapes an attributes-by-classes workbook into a long-form table")]
struct Args {
    /// Matrix workbook; prompted for when omitted
    input: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let input = match args.input {
        Some(path) => path,
        None => prompt_for_input()?,
    };

    let output = melt(&input)?;
    info!("Saved {}", output.display());

    Ok(())
}

fn prompt_for_input() -> Result<PathBuf> {
    print!("Path to the matrix workbook: ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(PathBuf::from(line.trim()))
}
