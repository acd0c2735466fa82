//! Error type shared by every imaging operation.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImagingError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("PNG encoding error: {0}")]
    Png(#[from] png::EncodingError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Quantization failed: {0}")]
    Quantize(String),
}

/// Result type for imaging operations.
pub type Result<T> = std::result::Result<T, ImagingError>;

pub(crate) fn invalid(msg: impl Into<String>) -> ImagingError {
    ImagingError::InvalidArgument(msg.into())
}
