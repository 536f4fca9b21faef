//! PDF rasterization backend for slide flashcards.
//!
//! Renders PDF pages through pdfium and crops/resizes them with `image`.

pub mod error;
pub mod pdf;
pub mod renderer;

pub use error::{Error, Result};
pub use pdf::PdfRenderer;
pub use renderer::{
    crop_image, crop_rect, resize_to_width, PageRenderer, DEFAULT_WIDTH, MAX_UPSCALE,
};
