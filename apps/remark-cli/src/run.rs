//! Folder orchestration
//!
//! Drives the extractor over every PDF in the input folder, aggregates
//! the comments in discovery order, and feeds the spreadsheet sink then
//! the database sink. Data flows one way: files, records, two
//! independent persisted representations.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use remark_core::{extract_comments, Comment};
use remark_report::{write_database, write_report};
use tracing::warn;

/// What a single batch run produced.
#[derive(Debug)]
pub enum RunOutcome {
    /// The input folder does not exist.
    FolderMissing,
    /// The folder holds no `.pdf` files.
    NoPdfFiles,
    /// Every discovered PDF produced zero comments; no sinks were invoked.
    NoComments,
    /// Both sinks ran over the aggregated comments.
    Written {
        spreadsheet: PathBuf,
        database: PathBuf,
        comments: usize,
    },
}

/// Process every PDF in `folder`, then feed both sinks.
///
/// A file that fails to parse is logged and contributes zero comments;
/// sink failures propagate to the caller.
pub fn process_folder(folder: &Path, template: &Path) -> Result<RunOutcome> {
    if !folder.is_dir() {
        return Ok(RunOutcome::FolderMissing);
    }

    let pdf_files = list_pdf_files(folder)?;
    if pdf_files.is_empty() {
        return Ok(RunOutcome::NoPdfFiles);
    }

    let mut all_comments: Vec<Comment> = Vec::new();
    for path in &pdf_files {
        match extract_comments(path) {
            Ok(comments) => all_comments.extend(comments),
            Err(err) => {
                warn!("Skipping {}: {}", path.display(), err);
            }
        }
    }

    if all_comments.is_empty() {
        return Ok(RunOutcome::NoComments);
    }

    let spreadsheet = write_report(&all_comments, template, folder)?;
    let database = write_database(&all_comments, folder)?;

    Ok(RunOutcome::Written {
        spreadsheet,
        database,
        comments: all_comments.len(),
    })
}

/// `.pdf` entries of the folder in directory-listing order.
fn list_pdf_files(folder: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(folder)? {
        let path = entry?.path();
        let is_pdf = path
            .extension()
            .map_or(false, |ext| ext.eq_ignore_ascii_case("pdf"));
        if path.is_file() && is_pdf {
            files.push(path);
        }
    }
    Ok(files)
}
