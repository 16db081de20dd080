//! Matrix workbook reshaper
//!
//! Turns a matrix-style sheet (attribute rows × class columns) into a
//! long-form table holding one row per non-empty relationship. A
//! single-pass reshape with no state between runs.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum MeltError {
    #[error("workbook error: {0}")]
    Workbook(String),

    #[error("input workbook has no sheets")]
    NoSheet,
}

const OUTPUT_HEADER: [&str; 3] = ["Attribute", "Class", "Value"];

/// One non-empty matrix cell in long form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relation {
    pub attribute: String,
    pub class: String,
    pub value: String,
}

/// Read the matrix sheet into its non-empty relationships, attributes
/// row-ascending then classes column-ascending. Row 1 holds the class
/// names from column B on; column A holds the attribute names from row 2.
pub fn read_relations(input: &Path) -> Result<Vec<Relation>, MeltError> {
    let book = umya_spreadsheet::reader::xlsx::read(input)
        .map_err(|e| MeltError::Workbook(format!("failed to open {}: {}", input.display(), e)))?;
    let sheet = book.get_sheet(&0).ok_or(MeltError::NoSheet)?;

    let highest_row = sheet.get_highest_row();
    let highest_col = sheet.get_highest_column();

    let mut relations = Vec::new();
    for row in 2..=highest_row {
        let attribute = sheet.get_value((1, row));
        for col in 2..=highest_col {
            let value = sheet.get_value((col, row));
            if value.is_empty() {
                continue;
            }
            let class = sheet.get_value((col, 1));
            debug!("{}: {} = {}", attribute, class, value);
            relations.push(Relation {
                attribute: attribute.clone(),
                class,
                value,
            });
        }
    }
    Ok(relations)
}

/// Reshape `input` into a new workbook named `<stem>_converted.xlsx`
/// beside it and return the output path.
pub fn melt(input: &Path) -> Result<PathBuf, MeltError> {
    let relations = read_relations(input)?;
    let output_path = converted_path(input);

    let mut book = umya_spreadsheet::new_file();
    let sheet = book.get_sheet_mut(&0).ok_or(MeltError::NoSheet)?;

    for (col, title) in OUTPUT_HEADER.iter().enumerate() {
        sheet.get_cell_mut((col as u32 + 1, 1)).set_value(*title);
    }
    for (idx, relation) in relations.iter().enumerate() {
        let row = idx as u32 + 2;
        sheet
            .get_cell_mut((1, row))
            .set_value(relation.attribute.as_str());
        sheet
            .get_cell_mut((2, row))
            .set_value(relation.class.as_str());
        sheet
            .get_cell_mut((3, row))
            .set_value(relation.value.as_str());
    }

    umya_spreadsheet::writer::xlsx::write(&book, &output_path).map_err(|e| {
        MeltError::Workbook(format!("failed to save {}: {}", output_path.display(), e))
    })?;

    info!(
        "Wrote {} long-form rows to {}",
        relations.len(),
        output_path.display()
    );
    Ok(output_path)
}

fn converted_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "matrix".to_string());
    input.with_file_name(format!("{}_converted.xlsx", stem))
}
