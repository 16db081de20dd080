use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("failed to read PDF: {0}")]
    Parse(#[from] lopdf::Error),

    #[error("malformed annotation structure: {0}")]
    Malformed(&'static str),
}
