//! Output sinks for extracted reviewer comments
//!
//! Two independent persisted representations of the same comment sequence:
//! a styled spreadsheet report appended into a copy of a pre-formatted
//! template workbook, and a `comments` table in an embedded SQLite file.
//! Neither sink depends on the other's state.

pub mod db;
pub mod error;
pub mod xlsx;

pub use db::{write_database, DATABASE_FILE};
pub use error::ReportError;
pub use xlsx::write_report;
