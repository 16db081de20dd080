//! PDF reviewer-remark extraction CLI
//!
//! Enumerates the PDF documents of a folder, extracts their reviewer
//! annotations and consolidates the result into a styled spreadsheet
//! report plus a `comments` table in an embedded database, both written
//! into the source folder. Single-shot batch run, one invocation per
//! extraction pass.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Parser;
use tracing::{error, info, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod run;

use run::{process_folder, RunOutcome};

/// Command-line arguments for the remark extractor
#[derive(Parser, Debug)]
#[command(name = "remark-cli")]
#[command(about = "Extracts reviewer comments from PDF annotations into a report and a database")]
struct Args {
    /// Folder containing the PDF documents; prompted for when omitted
    folder: Option<PathBuf>,

    /// Template workbook; defaults to template.xlsx beside the executable
    #[arg(long)]
    template: Option<PathBuf>,

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

    let template = match args.template {
        Some(path) => path,
        None => default_template_path()?,
    };
    if !template.is_file() {
        error!("Template workbook not found at {}", template.display());
        return Ok(());
    }

    let folder = match args.folder {
        Some(path) => path,
        None => prompt_for_folder()?,
    };

    match process_folder(&folder, &template)? {
        RunOutcome::FolderMissing => {
            error!("Folder {} does not exist", folder.display());
        }
        RunOutcome::NoPdfFiles => {
            info!("No PDF files in {}", folder.display());
        }
        RunOutcome::NoComments => {
            info!("No comments found to write");
        }
        RunOutcome::Written {
            spreadsheet,
            database,
            comments,
        } => {
            info!(
                "Run complete: {} comments written to {} and {}",
                comments,
                spreadsheet.display(),
                database.display()
            );
        }
    }

    Ok(())
}

/// The template workbook ships beside the executable.
fn default_template_path() -> Result<PathBuf> {
    let exe = std::env::current_exe()?;
    let dir = exe.parent().unwrap_or_else(|| Path::new("."));
    Ok(dir.join("template.xlsx"))
}

fn prompt_for_folder() -> Result<PathBuf> {
    print!("Folder with PDF documents: ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(PathBuf::from(line.trim()))
}
