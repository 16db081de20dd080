//! Database sink
//!
//! Appends the comment sequence to a `comments` table in an embedded
//! SQLite file. The table accumulates across runs: historical remark
//! trails from earlier extraction passes are kept.

use std::path::{Path, PathBuf};

use remark_core::Comment;
use rusqlite::{params, Connection};
use tracing::info;

use crate::error::ReportError;

/// File name of the embedded database inside the destination folder.
pub const DATABASE_FILE: &str = "comments.db";

const CREATE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS comments (
    "Document" TEXT,
    "Non-conformance ID" TEXT,
    "Chapter" TEXT,
    "Page" INTEGER,
    "Owner's remark" TEXT,
    "Name (Owner)" TEXT,
    "Category of remark" TEXT
)
"#;

const INSERT_COMMENT: &str = r#"
INSERT INTO comments
    ("Document", "Non-conformance ID", "Chapter", "Page",
     "Owner's remark", "Name (Owner)", "Category of remark")
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
"#;

/// Append all comments to `comments.db` in the destination folder,
/// creating the file and table when absent. Rows are written in input
/// order inside one transaction committed before returning.
pub fn write_database(comments: &[Comment], dest_dir: &Path) -> Result<PathBuf, ReportError> {
    let db_path = dest_dir.join(DATABASE_FILE);
    let mut conn = Connection::open(&db_path)?;

    conn.execute(CREATE_TABLE, [])?;

    let tx = conn.transaction()?;
    {
        let mut stmt = tx.prepare(INSERT_COMMENT)?;
        for comment in comments {
            stmt.execute(params![
                comment.document,
                comment.nonconformance_id,
                comment.chapter,
                comment.page,
                comment.remark,
                comment.owner,
                comment.category.as_str(),
            ])?;
        }
    }
    tx.commit()?;

    info!("Appended {} comments to {}", comments.len(), db_path.display());
    Ok(db_path)
}
