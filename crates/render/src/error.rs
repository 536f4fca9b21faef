//! Error types for page rendering.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while rendering slide pages.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to read the PDF file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// Pdfium could not be loaded or failed on the document.
    #[error("PDF error: {0}")]
    PdfError(String),

    /// The notes reference a page the PDF does not have.
    #[error("Slide {page} does not exist, the PDF has {count} pages")]
    PageOutOfRange { page: u32, count: usize },

    /// Image conversion failed.
    #[error("Image error: {0}")]
    ImageError(#[from] image::ImageError),
}
