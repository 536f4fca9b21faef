//! Page rendering interface and pixel helpers.

use crate::error::{Error, Result};
use image::imageops::FilterType;
use image::DynamicImage;
use slides_core::{CropSpec, SlideNumber};

/// Width in pixels of rendered slide images unless configured otherwise.
pub const DEFAULT_WIDTH: u32 = 640;

/// Largest factor by which a page is rendered above the target width before
/// cropping. Crops narrower than `1 / MAX_UPSCALE` of the page come out
/// narrower than the target width.
pub const MAX_UPSCALE: u32 = 4;

/// Something that can rasterize 1-based pages of a slide deck.
pub trait PageRenderer {
    /// Number of pages in the deck.
    fn page_count(&self) -> usize;

    /// Width of the images returned by [`render_page`](Self::render_page).
    fn target_width(&self) -> u32;

    /// Render a page scaled to `width`, preserving the aspect ratio.
    fn render_page_at(&self, page: SlideNumber, width: u32) -> Result<DynamicImage>;

    /// Fail unless `page` is within `1..=page_count`.
    fn check_page(&self, page: SlideNumber) -> Result<()> {
        let count = self.page_count();
        if page == 0 || page as usize > count {
            return Err(Error::PageOutOfRange { page, count });
        }
        Ok(())
    }

    /// Render a whole page at the target width.
    fn render_page(&self, page: SlideNumber) -> Result<DynamicImage> {
        self.render_page_at(page, self.target_width())
    }

    /// Render the region of a page selected by `crop`, scaled down to at most
    /// the target width.
    fn render_cropped_page(&self, page: SlideNumber, crop: &CropSpec) -> Result<DynamicImage> {
        if crop.is_full() {
            return self.render_page(page);
        }

        // Render large enough that the cropped region is about target width.
        let width = self.target_width();
        let span = u32::from(crop.width.span()).max(1);
        let full_width = (width.saturating_mul(100) / span).min(width.saturating_mul(MAX_UPSCALE));
        let full = self.render_page_at(page, full_width)?;

        let cropped = crop_image(&full, crop);
        if cropped.width() > width {
            Ok(resize_to_width(&cropped, width))
        } else {
            Ok(cropped)
        }
    }
}

/// Pixel rectangle `(x, y, width, height)` selected by a crop in an image of
/// the given size. The rectangle is at least 1x1 and lies inside the image.
pub fn crop_rect(width: u32, height: u32, crop: &CropSpec) -> (u32, u32, u32, u32) {
    let (x, w) = axis(width, crop.width.min, crop.width.max);
    let (y, h) = axis(height, crop.height.min, crop.height.max);
    (x, y, w, h)
}

fn axis(length: u32, min: u8, max: u8) -> (u32, u32) {
    let length = u64::from(length);
    let start = length * u64::from(min) / 100;
    let end = length * u64::from(max) / 100;

    let start = start.min(length.saturating_sub(1));
    let size = end.saturating_sub(start).max(1);
    (start as u32, size as u32)
}

/// Crop an image to the region selected by `crop`.
pub fn crop_image(image: &DynamicImage, crop: &CropSpec) -> DynamicImage {
    let (x, y, w, h) = crop_rect(image.width(), image.height(), crop);
    image.crop_imm(x, y, w, h)
}

/// Scale an image to `width` pixels wide, preserving the aspect ratio.
pub fn resize_to_width(image: &DynamicImage, width: u32) -> DynamicImage {
    if image.width() == width || image.width() == 0 {
        return image.clone();
    }

    let height = (u64::from(image.height()) * u64::from(width) / u64::from(image.width())).max(1);
    image.resize_exact(width, height as u32, FilterType::Lanczos3)
}

#[cfg(test)]
mod tests {
    use super::*;
    use slides_core::resolve_crop;
    use std::cell::RefCell;

    /// Renders blank 4:3 pages.
    struct BlankDeck {
        pages: usize,
        width: u32,
    }

    impl PageRenderer for BlankDeck {
        fn page_count(&self) -> usize {
            self.pages
        }

        fn target_width(&self) -> u32 {
            self.width
        }

        fn render_page_at(&self, page: SlideNumber, width: u32) -> Result<DynamicImage> {
            self.check_page(page)?;
            Ok(DynamicImage::new_rgb8(width, width * 3 / 4))
        }
    }

    /// Records the widths pages were rendered at.
    struct RecordingDeck {
        width: u32,
        requested: RefCell<Vec<u32>>,
    }

    impl PageRenderer for RecordingDeck {
        fn page_count(&self) -> usize {
            1
        }

        fn target_width(&self) -> u32 {
            self.width
        }

        fn render_page_at(&self, page: SlideNumber, width: u32) -> Result<DynamicImage> {
            self.check_page(page)?;
            self.requested.borrow_mut().push(width);
            Ok(DynamicImage::new_rgb8(width, width * 3 / 4))
        }
    }

    #[test]
    fn test_crop_rect_quarters() {
        assert_eq!(crop_rect(800, 600, &CropSpec::FULL), (0, 0, 800, 600));
        assert_eq!(crop_rect(800, 600, &resolve_crop("br")), (400, 300, 400, 300));
        assert_eq!(crop_rect(800, 600, &resolve_crop("t")), (0, 0, 800, 300));
        assert_eq!(crop_rect(900, 300, &resolve_crop("mt")), (297, 0, 306, 300));
    }

    #[test]
    fn test_crop_rect_never_empty() {
        let (x, y, w, h) = crop_rect(10, 10, &resolve_crop("99-100,99-100"));
        assert_eq!((x, y), (9, 9));
        assert_eq!((w, h), (1, 1));
    }

    #[test]
    fn test_resize_preserves_aspect_ratio() {
        let image = DynamicImage::new_rgb8(1280, 960);
        let resized = resize_to_width(&image, 640);
        assert_eq!((resized.width(), resized.height()), (640, 480));
    }

    #[test]
    fn test_render_page_uses_target_width() {
        let deck = BlankDeck { pages: 3, width: 640 };
        let page = deck.render_page(2).unwrap();
        assert_eq!((page.width(), page.height()), (640, 480));
    }

    #[test]
    fn test_render_cropped_page_is_target_width() {
        let deck = BlankDeck { pages: 3, width: 640 };
        let page = deck.render_cropped_page(1, &resolve_crop("tl")).unwrap();
        assert_eq!((page.width(), page.height()), (640, 480));

        let strip = deck.render_cropped_page(1, &resolve_crop("t")).unwrap();
        assert_eq!((strip.width(), strip.height()), (640, 240));
    }

    #[test]
    fn test_narrow_crop_render_width_is_capped() {
        let deck = RecordingDeck {
            width: 640,
            requested: RefCell::new(Vec::new()),
        };

        let strip = deck
            .render_cropped_page(1, &resolve_crop("99-100,0-100"))
            .unwrap();
        assert_eq!((strip.width(), strip.height()), (26, 1920));

        deck.render_cropped_page(1, &resolve_crop("tl")).unwrap();
        assert_eq!(*deck.requested.borrow(), vec![640 * MAX_UPSCALE, 1280]);
    }

    #[test]
    fn test_page_out_of_range() {
        let deck = BlankDeck { pages: 3, width: 640 };
        assert!(matches!(
            deck.render_page(4),
            Err(Error::PageOutOfRange { page: 4, count: 3 })
        ));
        assert!(deck.check_page(0).is_err());
        assert!(deck.check_page(3).is_ok());
    }
}
