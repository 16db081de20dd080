//! PDF annotation traversal
//!
//! Walks per-page `/Annots` collections, resolving indirect references
//! explicitly, and turns every non-widget annotation into a [`Comment`].

use std::path::Path;

use lopdf::{Dictionary, Document, Object};
use tracing::{debug, info};

use crate::comment::Comment;
use crate::error::ExtractError;

/// Author recorded when an annotation carries no `/T` entry.
pub const UNKNOWN_OWNER: &str = "Unknown";

/// Annotation subtype, reduced to what the pipeline distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationKind {
    /// Form-field or digital-signature widget; never a reviewer comment.
    Widget,
    /// Non-widget annotation carrying a `/Contents` string.
    Text,
    /// Any other non-widget subtype; still yields a content-less comment.
    Other,
}

/// One page annotation with its optional fields resolved to defaults
/// at construction time, not at the access sites.
#[derive(Debug, Clone)]
pub struct Annotation {
    pub kind: AnnotationKind,
    pub content: String,
    pub author: String,
}

impl Annotation {
    /// Build an annotation from its PDF dictionary.
    pub fn from_dict(doc: &Document, dict: &Dictionary) -> Self {
        let subtype = dict
            .get(b"Subtype")
            .ok()
            .map(|obj| resolve(doc, obj))
            .and_then(|obj| obj.as_name().ok());
        let content = string_value(doc, dict, b"Contents");
        let author = string_value(doc, dict, b"T");

        let kind = match subtype {
            Some(name) if name == b"Widget" => AnnotationKind::Widget,
            _ if content.is_some() => AnnotationKind::Text,
            _ => AnnotationKind::Other,
        };

        Self {
            kind,
            content: content.unwrap_or_default(),
            author: author.unwrap_or_else(|| UNKNOWN_OWNER.to_string()),
        }
    }

    pub fn is_widget(&self) -> bool {
        self.kind == AnnotationKind::Widget
    }
}

/// Extract reviewer comments from one PDF document.
///
/// Comments come back in page-ascending order, annotations in source order
/// within each page. A load or structure failure surfaces as
/// [`ExtractError`]; callers treat it as a per-file failure and keep
/// processing the remaining documents.
pub fn extract_comments(path: &Path) -> Result<Vec<Comment>, ExtractError> {
    let document_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let doc = Document::load(path)?;
    let pages = doc.get_pages();
    info!("Scanning {} ({} pages)", document_name, pages.len());

    let mut comments = Vec::new();
    let mut saw_annotations = false;

    for (&page_num, &page_id) in &pages {
        let page = doc.get_dictionary(page_id)?;

        let annots = match page.get(b"Annots") {
            Ok(obj) => annotation_array(&doc, obj)?,
            Err(_) => {
                debug!("Page {}: no annotations", page_num);
                continue;
            }
        };

        saw_annotations = true;
        debug!("Page {}: {} annotations", page_num, annots.len());

        for entry in annots {
            let dict = annotation_dict(&doc, entry)?;
            let annotation = Annotation::from_dict(&doc, dict);

            if annotation.is_widget() {
                debug!("Page {}: skipping signature widget", page_num);
                continue;
            }

            comments.push(Comment::new(
                document_name.clone(),
                page_num,
                &annotation.content,
                annotation.author,
            ));
        }
    }

    if !saw_annotations {
        info!("{}: no annotations in document", document_name);
    } else if comments.is_empty() {
        info!("{}: no comments besides signature widgets", document_name);
    }

    Ok(comments)
}

/// Resolve the `/Annots` entry to its annotation array.
fn annotation_array<'a>(doc: &'a Document, obj: &'a Object) -> Result<&'a [Object], ExtractError> {
    match obj {
        Object::Array(arr) => Ok(arr.as_slice()),
        Object::Reference(id) => Ok(doc.get_object(*id)?.as_array()?.as_slice()),
        _ => Err(ExtractError::Malformed(
            "/Annots is neither an array nor a reference",
        )),
    }
}

/// Resolve one annotation array entry to its dictionary.
fn annotation_dict<'a>(doc: &'a Document, obj: &'a Object) -> Result<&'a Dictionary, ExtractError> {
    match obj {
        Object::Dictionary(dict) => Ok(dict),
        Object::Reference(id) => Ok(doc.get_dictionary(*id)?),
        _ => Err(ExtractError::Malformed(
            "annotation entry is not a dictionary",
        )),
    }
}

/// Follow a single level of indirection.
fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> &'a Object {
    match obj {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(obj),
        other => other,
    }
}

/// Read a text-string entry from an annotation dictionary.
fn string_value(doc: &Document, dict: &Dictionary, key: &[u8]) -> Option<String> {
    let obj = resolve(doc, dict.get(key).ok()?);
    match obj {
        Object::String(bytes, _) => Some(decode_pdf_string(bytes)),
        Object::Name(name) => Some(String::from_utf8_lossy(name).into_owned()),
        _ => None,
    }
}

/// PDF text strings are UTF-16BE when they carry a BOM, byte text otherwise.
fn decode_pdf_string(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let units: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        String::from_utf16_lossy(&units)
    } else {
        String::from_utf8_lossy(bytes).into_owned()
    }
}
