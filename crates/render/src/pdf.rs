//! Pdfium-backed page renderer.

use crate::error::{Error, Result};
use crate::renderer::{PageRenderer, DEFAULT_WIDTH};
use image::DynamicImage;
use pdfium_render::prelude::*;
use slides_core::SlideNumber;
use std::path::Path;

/// Renders pages of a PDF file.
///
/// The file is read once; the document is reloaded from memory for every
/// render since pdfium documents borrow the library handle.
pub struct PdfRenderer {
    pdfium: Pdfium,
    bytes: Vec<u8>,
    page_count: usize,
    width: u32,
}

impl PdfRenderer {
    /// Open a PDF, binding pdfium from the working directory or the system.
    pub fn open(path: &Path) -> Result<Self> {
        let bindings = Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
            .or_else(|_| Pdfium::bind_to_system_library())
            .map_err(|e| Error::PdfError(format!("Failed to load pdfium: {}", e)))?;
        let pdfium = Pdfium::new(bindings);

        let bytes = std::fs::read(path)?;
        let page_count = {
            let document = pdfium
                .load_pdf_from_byte_slice(&bytes, None)
                .map_err(|e| Error::PdfError(format!("Failed to open {}: {}", path.display(), e)))?;
            usize::from(document.pages().len())
        };
        log::debug!("Opened {} with {} pages", path.display(), page_count);

        Ok(Self {
            pdfium,
            bytes,
            page_count,
            width: DEFAULT_WIDTH,
        })
    }

    /// Set the width of rendered images.
    pub fn with_width(mut self, width: u32) -> Self {
        self.width = width.max(1);
        self
    }
}

impl PageRenderer for PdfRenderer {
    fn page_count(&self) -> usize {
        self.page_count
    }

    fn target_width(&self) -> u32 {
        self.width
    }

    fn render_page_at(&self, page: SlideNumber, width: u32) -> Result<DynamicImage> {
        self.check_page(page)?;
        let index = PdfPageIndex::try_from(page - 1).map_err(|_| Error::PageOutOfRange {
            page,
            count: self.page_count,
        })?;

        let document = self
            .pdfium
            .load_pdf_from_byte_slice(&self.bytes, None)
            .map_err(|e| Error::PdfError(e.to_string()))?;
        let pdf_page = document
            .pages()
            .get(index)
            .map_err(|e| Error::PdfError(format!("Failed to load page {}: {}", page, e)))?;

        let config = PdfRenderConfig::new().set_target_width(width.min(i32::MAX as u32) as i32);
        let bitmap = pdf_page
            .render_with_config(&config)
            .map_err(|e| Error::PdfError(format!("Failed to render page {}: {}", page, e)))?;

        Ok(bitmap.as_image())
    }
}
