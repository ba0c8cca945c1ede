use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EpsError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Unable to get inverse of matrix: {0}")]
    NonInvertibleTransform(String),
    #[error("Stroke must be a basic stroke: {0}")]
    UnsupportedStroke(String),
    #[error("Could not write to the output: {0}")]
    Output(#[from] io::Error),
    #[error("invalid font data: {0}")]
    InvalidFont(#[from] ttf_parser::FaceParsingError),
}

pub type Result<T> = std::result::Result<T, EpsError>;

/// Returned by operations the format cannot express. Nothing is written to the
/// output when an operation reports this.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unsupported {
    pub operation: &'static str,
}

impl Unsupported {
    pub(crate) fn report(operation: &'static str) -> Self {
        log::info!("not supported: {}", operation);
        Self { operation }
    }
}
