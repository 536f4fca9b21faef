//! Domain types for representing parsed notes.

use crate::crop::CropSpec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// 1-based slide number, as written in a `Slide <N>:` header.
pub type SlideNumber = u32;

/// The kind of text a content line contributes to a slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    /// Every content line, verbatim.
    Full,
    /// `Q:` question shown without the slide.
    QWithoutSlide,
    /// `Q_S:` question followed by the slide image.
    QFollowedBySlide,
    /// `S_Q:` slide image followed by the question.
    SlideFollowedByQ,
    /// `A:` answer shown without the slide.
    AWithoutSlide,
    /// `A_S:` answer followed by the slide image.
    AFollowedBySlide,
    /// `S_A:` slide image followed by the answer.
    SlideFollowedByA,
}

/// Static description of one category.
#[derive(Debug, Clone, Copy)]
pub struct CategorySpec {
    pub category: Category,
    /// Tag name preceding the colon, `None` for [`Category::Full`].
    pub tag: Option<&'static str>,
    /// Whether a `[crop]` directive may follow the tag.
    pub accepts_crop: bool,
    /// Suffix for the media file rendered for this category.
    pub media_suffix: Option<&'static str>,
}

/// All categories, in the order annotations are matched.
pub const CATEGORY_TABLE: &[CategorySpec] = &[
    CategorySpec {
        category: Category::Full,
        tag: None,
        accepts_crop: false,
        media_suffix: None,
    },
    CategorySpec {
        category: Category::QWithoutSlide,
        tag: Some("Q"),
        accepts_crop: false,
        media_suffix: None,
    },
    CategorySpec {
        category: Category::QFollowedBySlide,
        tag: Some("Q_S"),
        accepts_crop: true,
        media_suffix: Some("qs"),
    },
    CategorySpec {
        category: Category::SlideFollowedByQ,
        tag: Some("S_Q"),
        accepts_crop: true,
        media_suffix: Some("sq"),
    },
    CategorySpec {
        category: Category::AWithoutSlide,
        tag: Some("A"),
        accepts_crop: false,
        media_suffix: None,
    },
    CategorySpec {
        category: Category::AFollowedBySlide,
        tag: Some("A_S"),
        accepts_crop: true,
        media_suffix: Some("as"),
    },
    CategorySpec {
        category: Category::SlideFollowedByA,
        tag: Some("S_A"),
        accepts_crop: true,
        media_suffix: Some("sa"),
    },
];

impl Category {
    /// Number of categories.
    pub const COUNT: usize = 7;

    /// Look up the static description of this category.
    pub fn spec(self) -> &'static CategorySpec {
        &CATEGORY_TABLE[self.index()]
    }

    /// Position of this category in [`CATEGORY_TABLE`].
    pub fn index(self) -> usize {
        match self {
            Category::Full => 0,
            Category::QWithoutSlide => 1,
            Category::QFollowedBySlide => 2,
            Category::SlideFollowedByQ => 3,
            Category::AWithoutSlide => 4,
            Category::AFollowedBySlide => 5,
            Category::SlideFollowedByA => 6,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.spec().tag.unwrap_or("Full"))
    }
}

/// Separator placed between fragments of one category on one slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Separator {
    /// HTML line break, rendered as a new line inside an Anki card.
    HtmlBreak,
    /// Plain `\n`.
    Newline,
}

/// Separator used unless configured otherwise.
pub const DEFAULT_SEPARATOR: Separator = Separator::HtmlBreak;

impl Separator {
    pub fn as_str(self) -> &'static str {
        match self {
            Separator::HtmlBreak => "<br />",
            Separator::Newline => "\n",
        }
    }
}

impl Default for Separator {
    fn default() -> Self {
        DEFAULT_SEPARATOR
    }
}

/// All text and crops gathered for one slide.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideRecord {
    pub full: String,
    pub q_without_slide: String,
    pub q_followed_by_slide: String,
    pub slide_followed_by_q: String,
    pub a_without_slide: String,
    pub a_followed_by_slide: String,
    pub slide_followed_by_a: String,

    pub q_followed_by_slide_crop: CropSpec,
    pub slide_followed_by_q_crop: CropSpec,
    pub a_followed_by_slide_crop: CropSpec,
    pub slide_followed_by_a_crop: CropSpec,
}

impl SlideRecord {
    /// Joined text for a category, empty if nothing was written for it.
    pub fn text(&self, category: Category) -> &str {
        match category {
            Category::Full => &self.full,
            Category::QWithoutSlide => &self.q_without_slide,
            Category::QFollowedBySlide => &self.q_followed_by_slide,
            Category::SlideFollowedByQ => &self.slide_followed_by_q,
            Category::AWithoutSlide => &self.a_without_slide,
            Category::AFollowedBySlide => &self.a_followed_by_slide,
            Category::SlideFollowedByA => &self.slide_followed_by_a,
        }
    }

    pub(crate) fn text_mut(&mut self, category: Category) -> &mut String {
        match category {
            Category::Full => &mut self.full,
            Category::QWithoutSlide => &mut self.q_without_slide,
            Category::QFollowedBySlide => &mut self.q_followed_by_slide,
            Category::SlideFollowedByQ => &mut self.slide_followed_by_q,
            Category::AWithoutSlide => &mut self.a_without_slide,
            Category::AFollowedBySlide => &mut self.a_followed_by_slide,
            Category::SlideFollowedByA => &mut self.slide_followed_by_a,
        }
    }

    /// Crop for a slide-bearing category; `None` for the others.
    pub fn crop(&self, category: Category) -> Option<&CropSpec> {
        match category {
            Category::QFollowedBySlide => Some(&self.q_followed_by_slide_crop),
            Category::SlideFollowedByQ => Some(&self.slide_followed_by_q_crop),
            Category::AFollowedBySlide => Some(&self.a_followed_by_slide_crop),
            Category::SlideFollowedByA => Some(&self.slide_followed_by_a_crop),
            _ => None,
        }
    }

    pub(crate) fn crop_mut(&mut self, category: Category) -> Option<&mut CropSpec> {
        match category {
            Category::QFollowedBySlide => Some(&mut self.q_followed_by_slide_crop),
            Category::SlideFollowedByQ => Some(&mut self.slide_followed_by_q_crop),
            Category::AFollowedBySlide => Some(&mut self.a_followed_by_slide_crop),
            Category::SlideFollowedByA => Some(&mut self.slide_followed_by_a_crop),
            _ => None,
        }
    }
}

/// Non-fatal observations made while parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParseWarning {
    /// A crop directive was not understood and the whole slide is used.
    UnrecognizedCrop { line: usize, directive: String },
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseWarning::UnrecognizedCrop { line, directive } => write!(
                f,
                "line {}: unrecognized crop '{}', using the whole slide",
                line, directive
            ),
        }
    }
}

/// Result of parsing a whole notes file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParsedNotes {
    /// One record per slide that had at least one content line.
    pub slides: BTreeMap<SlideNumber, SlideRecord>,

    /// Warnings collected during the parse.
    pub warnings: Vec<ParseWarning>,
}

impl ParsedNotes {
    pub fn get(&self, slide: SlideNumber) -> Option<&SlideRecord> {
        self.slides.get(&slide)
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    /// Slide numbers referenced by the notes.
    pub fn slide_numbers(&self) -> impl Iterator<Item = SlideNumber> + '_ {
        self.slides.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_table_order_matches_index() {
        for (idx, spec) in CATEGORY_TABLE.iter().enumerate() {
            assert_eq!(spec.category.index(), idx);
        }
        assert_eq!(CATEGORY_TABLE.len(), Category::COUNT);
    }

    #[test]
    fn test_slide_categories_have_media_suffix() {
        for spec in CATEGORY_TABLE {
            assert_eq!(spec.accepts_crop, spec.media_suffix.is_some());
        }
    }

    #[test]
    fn test_crop_only_for_slide_categories() {
        let record = SlideRecord::default();
        assert!(record.crop(Category::Full).is_none());
        assert!(record.crop(Category::QWithoutSlide).is_none());
        assert!(record.crop(Category::AWithoutSlide).is_none());
        assert_eq!(
            record.crop(Category::SlideFollowedByA),
            Some(&CropSpec::FULL)
        );
    }

    #[test]
    fn test_separator_strings() {
        assert_eq!(Separator::HtmlBreak.as_str(), "<br />");
        assert_eq!(Separator::Newline.as_str(), "\n");
        assert_eq!(Separator::default(), DEFAULT_SEPARATOR);
    }

    #[test]
    fn test_category_display_uses_tag() {
        assert_eq!(Category::QFollowedBySlide.to_string(), "Q_S");
        assert_eq!(Category::Full.to_string(), "Full");
    }
}
