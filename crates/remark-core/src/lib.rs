//! Reviewer-remark extraction from PDF annotations
//!
//! This crate reads per-page annotation objects out of PDF documents,
//! filters out form/signature widgets, classifies the remaining content by
//! its `#C#`/`#Q#`/`#R#` prefix tag, and produces a flat sequence of
//! [`Comment`] records for downstream sinks.

pub mod comment;
pub mod error;
pub mod extract;

pub use comment::{classify, Category, Comment};
pub use error::ExtractError;
pub use extract::{extract_comments, Annotation, AnnotationKind, UNKNOWN_OWNER};
