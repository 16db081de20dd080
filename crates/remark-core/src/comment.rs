//! Comment records and prefix-tag classification

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

lazy_static! {
    /// Matches `#C#`, `#Q#` or `#R#` at the start of annotation content,
    /// consuming the whitespace between the tag and the remark text.
    static ref TAG_PATTERN: Regex =
        Regex::new(r"^#([CQR])#\s*(.*)").expect("tag pattern is valid");
}

/// Remark category derived from the content's prefix tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Contents,
    Question,
    Requirements,
    Unknown,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Contents => "Contents",
            Category::Question => "Question",
            Category::Requirements => "Requirements",
            Category::Unknown => "Unknown",
        }
    }

    fn from_tag(tag: &str) -> Self {
        match tag {
            "C" => Category::Contents,
            "Q" => Category::Question,
            "R" => Category::Requirements,
            _ => Category::Unknown,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Split annotation content into its category and remark text.
///
/// Tagged content (`#C#`, `#Q#`, `#R#`) yields the mapped category and the
/// text after the tag; anything else yields [`Category::Unknown`] with the
/// content kept verbatim. Trailing whitespace in the remark is preserved,
/// and a tagged remark captures through the end of its first line only —
/// both deliberate compatibility choices (see DESIGN.md).
pub fn classify(content: &str) -> (Category, String) {
    match TAG_PATTERN.captures(content) {
        Some(caps) => (Category::from_tag(&caps[1]), caps[2].to_string()),
        None => (Category::Unknown, content.to_string()),
    }
}

/// One extracted reviewer annotation.
///
/// Exactly seven fields, column-aligned with both sinks. Reserved fields
/// (`nonconformance_id`, `chapter`) are always empty strings, never absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub document: String,
    pub nonconformance_id: String,
    pub chapter: String,
    /// 1-based page number.
    pub page: u32,
    pub remark: String,
    pub owner: String,
    pub category: Category,
}

impl Comment {
    /// Build a comment from raw annotation content, classifying it by tag.
    pub fn new(
        document: impl Into<String>,
        page: u32,
        content: &str,
        owner: impl Into<String>,
    ) -> Self {
        let (category, remark) = classify(content);
        Self {
            document: document.into(),
            nonconformance_id: String::new(),
            chapter: String::new(),
            page,
            remark,
            owner: owner.into(),
            category,
        }
    }
}
