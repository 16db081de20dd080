//! Spreadsheet sink
//!
//! Copies the pre-formatted template workbook, appends the comment rows
//! after whatever data the template already holds, and propagates the
//! template's canonical row style onto every newly written row.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use remark_core::Comment;
use tracing::{debug, info};
use umya_spreadsheet::{Style, Worksheet};

use crate::error::ReportError;

/// Columns A through Q; the template's fixed report layout.
pub const REPORT_COLUMNS: u32 = 17;

/// Rows 1-3 are the template's header block and stay untouched.
const HEADER_ROWS: u32 = 3;

/// Row 4 is the template's canonical styled data row.
const STYLE_ROW: u32 = 4;

/// Write the comment rows into a timestamped copy of the template.
///
/// Returns the path of the report file. The template itself is never
/// modified. A failure after the copy may leave a partially written
/// output file behind; there is no atomic commit.
pub fn write_report(
    comments: &[Comment],
    template_path: &Path,
    dest_dir: &Path,
) -> Result<PathBuf, ReportError> {
    if !template_path.is_file() {
        return Err(ReportError::TemplateMissing(template_path.to_path_buf()));
    }

    let output_name = format!(
        "comments_output_{}.xlsx",
        Local::now().format("%Y%m%d_%H%M%S")
    );
    let output_path = dest_dir.join(output_name);
    fs::copy(template_path, &output_path)?;

    let mut book = umya_spreadsheet::reader::xlsx::read(&output_path)
        .map_err(|e| ReportError::Workbook(format!("failed to open copied template: {}", e)))?;
    let sheet = book
        .get_sheet_mut(&0)
        .ok_or_else(|| ReportError::Workbook("template workbook has no sheets".to_string()))?;

    unmerge_below_header(sheet);

    let start_row = first_free_row(sheet);
    for (offset, comment) in comments.iter().enumerate() {
        write_comment_row(sheet, start_row + offset as u32, comment);
    }
    apply_template_styles(sheet, start_row, comments.len() as u32);

    umya_spreadsheet::writer::xlsx::write(&book, &output_path)
        .map_err(|e| ReportError::Workbook(format!("failed to save report: {}", e)))?;

    info!(
        "Report written to {} ({} rows starting at row {})",
        output_path.display(),
        comments.len(),
        start_row
    );
    Ok(output_path)
}

/// Drop merged ranges that begin below the header block. Ranges lower down
/// are leftovers of a previous data block and would corrupt per-row writes.
fn unmerge_below_header(sheet: &mut Worksheet) {
    sheet.get_merge_cells_mut().retain(|range| {
        let spec = range.get_range();
        if range_start_row(&spec) > HEADER_ROWS {
            debug!("Unmerged stale range {}", spec);
            false
        } else {
            true
        }
    });
}

/// Starting row of a range spec such as `A5:B6`.
fn range_start_row(range: &str) -> u32 {
    let first = range.split(':').next().unwrap_or(range);
    first
        .chars()
        .filter(|c| c.is_ascii_digit())
        .collect::<String>()
        .parse()
        .unwrap_or(1)
}

/// First row at or after row 4 whose column-A cell holds no value.
/// Data is appended after existing content, never over it.
fn first_free_row(sheet: &Worksheet) -> u32 {
    let mut row = STYLE_ROW;
    while !sheet.get_value((1, row)).is_empty() {
        row += 1;
    }
    row
}

/// One comment across columns A-Q: the seven record fields with the
/// category in column H, every other slot an empty string.
fn write_comment_row(sheet: &mut Worksheet, row: u32, comment: &Comment) {
    let text_cells: [(u32, &str); 5] = [
        (1, &comment.document),
        (2, &comment.nonconformance_id),
        (3, &comment.chapter),
        (5, &comment.remark),
        (6, &comment.owner),
    ];
    for (col, value) in text_cells {
        sheet.get_cell_mut((col, row)).set_value(value);
    }
    sheet.get_cell_mut((4, row)).set_value_number(comment.page);
    sheet.get_cell_mut((7, row)).set_value("");
    sheet
        .get_cell_mut((8, row))
        .set_value(comment.category.as_str());
    for col in 9..=REPORT_COLUMNS {
        sheet.get_cell_mut((col, row)).set_value("");
    }
}

/// Copy row 4's cell styles onto each newly written row. The 17 styles
/// are read once into owned values and applied per target cell.
fn apply_template_styles(sheet: &mut Worksheet, start_row: u32, rows: u32) {
    let styles: Vec<Style> = (1..=REPORT_COLUMNS)
        .map(|col| {
            sheet
                .get_cell((col, STYLE_ROW))
                .map(|cell| cell.get_style().clone())
                .unwrap_or_default()
        })
        .collect();

    for offset in 0..rows {
        let row = start_row + offset;
        for (idx, style) in styles.iter().enumerate() {
            let col = idx as u32 + 1;
            *sheet.get_style_mut((col, row)) = style.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use remark_core::Comment;

    fn sample_comments(count: usize) -> Vec<Comment> {
        (0..count)
            .map(|i| {
                Comment::new(
                    "review.pdf",
                    i as u32 + 1,
                    &format!("#Q# remark {}", i),
                    "Reviewer",
                )
            })
            .collect()
    }

    /// A template with a merged title, a styled canonical row 4 and
    /// `existing_rows` of data already present in column A.
    fn build_template(path: &Path, existing_rows: u32, stale_merge: Option<&str>) {
        let mut book = umya_spreadsheet::new_file();
        let sheet = book.get_sheet_mut(&0).unwrap();

        sheet.get_cell_mut((1, 1)).set_value("Review remarks");
        sheet.add_merge_cells("A1:Q1");
        sheet.get_cell_mut((1, 3)).set_value("Document");
        sheet.get_cell_mut((8, 3)).set_value("Category of remark");

        for col in 1..=REPORT_COLUMNS {
            sheet
                .get_style_mut((col, 4))
                .set_background_color("FFDDEBF7");
        }
        for row in 0..existing_rows {
            sheet
                .get_cell_mut((1, 4 + row))
                .set_value(format!("existing {}", row + 1));
        }
        if let Some(range) = stale_merge {
            sheet.add_merge_cells(range);
        }

        umya_spreadsheet::writer::xlsx::write(&book, path).unwrap();
    }

    #[test]
    fn test_missing_template_aborts() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.xlsx");

        let result = write_report(&sample_comments(1), &missing, dir.path());
        assert!(matches!(result, Err(ReportError::TemplateMissing(_))));
    }

    #[test]
    fn test_template_is_never_modified() {
        let dir = tempfile::tempdir().unwrap();
        let template = dir.path().join("template.xlsx");
        build_template(&template, 0, None);
        let before = fs::read(&template).unwrap();

        write_report(&sample_comments(2), &template, dir.path()).unwrap();

        assert_eq!(fs::read(&template).unwrap(), before);
    }

    #[test]
    fn test_output_name_is_timestamped() {
        let dir = tempfile::tempdir().unwrap();
        let template = dir.path().join("template.xlsx");
        build_template(&template, 0, None);

        let output = write_report(&sample_comments(1), &template, dir.path()).unwrap();
        let name = output.file_name().unwrap().to_string_lossy();
        assert!(name.starts_with("comments_output_"));
        assert!(name.ends_with(".xlsx"));
    }

    #[test]
    fn test_rows_are_appended_after_existing_data() {
        let dir = tempfile::tempdir().unwrap();
        let template = dir.path().join("template.xlsx");
        // Data already present through row 6
        build_template(&template, 3, None);

        let output = write_report(&sample_comments(3), &template, dir.path()).unwrap();

        let book = umya_spreadsheet::reader::xlsx::read(&output).unwrap();
        let sheet = book.get_sheet(&0).unwrap();
        assert_eq!(sheet.get_value((1, 6)), "existing 3");
        assert_eq!(sheet.get_value((1, 7)), "review.pdf");
        assert_eq!(sheet.get_value((1, 9)), "review.pdf");
        assert_eq!(sheet.get_value((1, 10)), "");
    }

    #[test]
    fn test_row_layout_matches_the_template_columns() {
        let dir = tempfile::tempdir().unwrap();
        let template = dir.path().join("template.xlsx");
        build_template(&template, 0, None);

        let output = write_report(&sample_comments(1), &template, dir.path()).unwrap();

        let book = umya_spreadsheet::reader::xlsx::read(&output).unwrap();
        let sheet = book.get_sheet(&0).unwrap();
        assert_eq!(sheet.get_value((1, 4)), "review.pdf");
        assert_eq!(sheet.get_value((2, 4)), "");
        assert_eq!(sheet.get_value((3, 4)), "");
        assert_eq!(sheet.get_value((4, 4)), "1");
        assert_eq!(sheet.get_value((5, 4)), "remark 0");
        assert_eq!(sheet.get_value((6, 4)), "Reviewer");
        assert_eq!(sheet.get_value((7, 4)), "");
        assert_eq!(sheet.get_value((8, 4)), "Question");
        assert_eq!(sheet.get_value((17, 4)), "");
    }

    #[test]
    fn test_new_rows_carry_the_canonical_row_style() {
        let dir = tempfile::tempdir().unwrap();
        let template = dir.path().join("template.xlsx");
        build_template(&template, 3, None);

        let output = write_report(&sample_comments(3), &template, dir.path()).unwrap();

        let book = umya_spreadsheet::reader::xlsx::read(&output).unwrap();
        let sheet = book.get_sheet(&0).unwrap();
        let canonical = sheet.get_cell((1, 4)).unwrap().get_style().clone();
        for row in 7..=9 {
            let style = sheet.get_cell((1, row)).unwrap().get_style();
            assert_eq!(style, &canonical);
        }
    }

    #[test]
    fn test_stale_merge_below_header_is_removed() {
        let dir = tempfile::tempdir().unwrap();
        let template = dir.path().join("template.xlsx");
        build_template(&template, 0, Some("A5:B6"));

        let output = write_report(&sample_comments(1), &template, dir.path()).unwrap();

        let book = umya_spreadsheet::reader::xlsx::read(&output).unwrap();
        let ranges: Vec<String> = book
            .get_sheet(&0)
            .unwrap()
            .get_merge_cells()
            .iter()
            .map(|r| r.get_range())
            .collect();
        assert_eq!(ranges, vec!["A1:Q1".to_string()]);
    }

    #[test]
    fn test_header_merge_is_preserved() {
        let dir = tempfile::tempdir().unwrap();
        let template = dir.path().join("template.xlsx");
        build_template(&template, 0, None);

        let output = write_report(&sample_comments(1), &template, dir.path()).unwrap();

        let book = umya_spreadsheet::reader::xlsx::read(&output).unwrap();
        let sheet = book.get_sheet(&0).unwrap();
        assert_eq!(sheet.get_merge_cells().len(), 1);
        assert_eq!(sheet.get_merge_cells()[0].get_range(), "A1:Q1");
    }

    #[test]
    fn test_range_start_row_parses_specs() {
        assert_eq!(range_start_row("A5:B6"), 5);
        assert_eq!(range_start_row("AA12:AB14"), 12);
        assert_eq!(range_start_row("C3"), 3);
    }
}
