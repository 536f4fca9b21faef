//! Anki deck text output.
//!
//! Generates one line per slide in the semicolon-separated form Anki imports:
//!
//! ```text
//! "What does the graph show?"; "Growth."
//! "Free text about slide 4"; <img src="lecture-4.png" />
//! ```

use crate::crop::CropSpec;
use crate::parser::escape_html;
use crate::types::{Category, ParsedNotes, SlideNumber, SlideRecord};

/// Extension of rendered slide images.
pub const IMAGE_EXTENSION: &str = "png";

/// A rendered slide image a card refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaRequest {
    /// Slide (and PDF page) number.
    pub slide: SlideNumber,
    /// Category the image belongs to; `None` for the plain slide image.
    pub category: Option<Category>,
    /// Region of the page to render.
    pub crop: CropSpec,
    /// File name relative to the media folder.
    pub file_name: String,
}

/// One side of a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardField {
    /// HTML text, written quoted.
    Html(String),
    /// Nothing but an image, written as a bare `<img>` tag.
    Image(String),
}

/// A flashcard ready to be written to the deck.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub slide: SlideNumber,
    pub question: CardField,
    pub answer: CardField,
    /// Images this card needs rendered.
    pub media: Vec<MediaRequest>,
}

impl Card {
    /// The deck line for this card, without a trailing newline.
    pub fn to_line(&self) -> String {
        format!("{}; {}", render_field(&self.question), render_field(&self.answer))
    }
}

fn render_field(field: &CardField) -> String {
    match field {
        CardField::Html(html) => format!("\"{}\"", html),
        CardField::Image(name) => format!("<img src=\"{}\" />", escape_attribute(name)),
    }
}

/// Image tag for use inside a quoted field.
fn inline_image(name: &str) -> String {
    format!("<img src='{}' />", escape_attribute(name))
}

/// Escape a value for either a single- or double-quoted attribute.
fn escape_attribute(value: &str) -> String {
    escape_html(value).replace('\'', "&#39;")
}

/// Builds cards and deck text from parsed notes.
#[derive(Debug, Clone)]
pub struct DeckFormatter {
    /// Prefix of every media file name.
    prefix: String,
}

impl DeckFormatter {
    /// Create a formatter naming media files `<prefix>-<slide>.png`.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Media file name for a slide image, optionally for a specific category.
    pub fn media_name(&self, slide: SlideNumber, category: Option<Category>) -> String {
        match category.and_then(|c| c.spec().media_suffix) {
            Some(suffix) => format!("{}-{}-{}.{}", self.prefix, slide, suffix, IMAGE_EXTENSION),
            None => format!("{}-{}.{}", self.prefix, slide, IMAGE_EXTENSION),
        }
    }

    fn media_request(
        &self,
        slide: SlideNumber,
        record: &SlideRecord,
        category: Option<Category>,
    ) -> MediaRequest {
        let crop = category
            .and_then(|c| record.crop(c).copied())
            .unwrap_or(CropSpec::FULL);
        MediaRequest {
            slide,
            category,
            crop,
            file_name: self.media_name(slide, category),
        }
    }

    /// Build one side of a card from the first populated category.
    ///
    /// Order: text only, text followed by slide, slide followed by text.
    fn side(
        &self,
        slide: SlideNumber,
        record: &SlideRecord,
        [plain, text_first, slide_first]: [Category; 3],
        media: &mut Vec<MediaRequest>,
    ) -> Option<CardField> {
        let text = record.text(plain);
        if !text.is_empty() {
            return Some(CardField::Html(text.to_string()));
        }

        let text = record.text(text_first);
        if !text.is_empty() {
            let request = self.media_request(slide, record, Some(text_first));
            let html = format!("{}<br />{}", text, inline_image(&request.file_name));
            media.push(request);
            return Some(CardField::Html(html));
        }

        let text = record.text(slide_first);
        if !text.is_empty() {
            let request = self.media_request(slide, record, Some(slide_first));
            let html = format!("{}<br />{}", inline_image(&request.file_name), text);
            media.push(request);
            return Some(CardField::Html(html));
        }

        None
    }

    /// Build the card for one slide.
    pub fn card(&self, slide: SlideNumber, record: &SlideRecord) -> Card {
        let mut media = Vec::new();

        let question = self
            .side(
                slide,
                record,
                [
                    Category::QWithoutSlide,
                    Category::QFollowedBySlide,
                    Category::SlideFollowedByQ,
                ],
                &mut media,
            )
            .unwrap_or_else(|| CardField::Html(record.full.clone()));

        let answer = self
            .side(
                slide,
                record,
                [
                    Category::AWithoutSlide,
                    Category::AFollowedBySlide,
                    Category::SlideFollowedByA,
                ],
                &mut media,
            )
            .unwrap_or_else(|| {
                let request = self.media_request(slide, record, None);
                let field = CardField::Image(request.file_name.clone());
                media.push(request);
                field
            });

        Card {
            slide,
            question,
            answer,
            media,
        }
    }

    /// Build cards for every slide, in slide order.
    pub fn cards(&self, notes: &ParsedNotes) -> Vec<Card> {
        notes
            .slides
            .iter()
            .map(|(&slide, record)| self.card(slide, record))
            .collect()
    }

    /// Format cards into deck text, one line each with a trailing newline.
    pub fn format(&self, cards: &[Card]) -> String {
        cards
            .iter()
            .map(|card| format!("{}\n", card.to_line()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_notes;

    fn card_for(notes: &str) -> Card {
        let parsed = parse_notes(notes).unwrap();
        let formatter = DeckFormatter::new("lec");
        let mut cards = formatter.cards(&parsed);
        assert_eq!(cards.len(), 1);
        cards.remove(0)
    }

    #[test]
    fn test_media_names() {
        let formatter = DeckFormatter::new("lec");
        assert_eq!(formatter.media_name(3, None), "lec-3.png");
        assert_eq!(
            formatter.media_name(3, Some(Category::SlideFollowedByA)),
            "lec-3-sa.png"
        );
        assert_eq!(
            formatter.media_name(3, Some(Category::QWithoutSlide)),
            "lec-3.png"
        );
    }

    #[test]
    fn test_plain_notes_use_full_text_and_slide_image() {
        let card = card_for("Slide 4:\n    some <notes>\n");
        assert_eq!(card.question, CardField::Html("some &lt;notes&gt;".to_string()));
        assert_eq!(card.answer, CardField::Image("lec-4.png".to_string()));
        assert_eq!(card.media.len(), 1);
        assert!(card.media[0].crop.is_full());
        assert_eq!(
            card.to_line(),
            "\"some &lt;notes&gt;\"; <img src=\"lec-4.png\" />"
        );
    }

    #[test]
    fn test_question_and_answer_without_slide() {
        let card = card_for("Slide 1:\n    Q: What?\n    A: That.\n");
        assert_eq!(card.to_line(), "\"What?\"; \"That.\"");
        assert!(card.media.is_empty());
    }

    #[test]
    fn test_question_followed_by_slide() {
        let card = card_for("Slide 2:\n    Q_S[t]: Look:\n    A: Up.\n");
        assert_eq!(
            card.question,
            CardField::Html("Look:<br /><img src='lec-2-qs.png' />".to_string())
        );
        assert_eq!(card.media.len(), 1);
        assert_eq!(card.media[0].category, Some(Category::QFollowedBySlide));
        assert_eq!(card.media[0].crop, crate::resolve_crop("t"));
    }

    #[test]
    fn test_slide_followed_by_answer() {
        let card = card_for("Slide 2:\n    Q: Where?\n    S_A[bl]: there\n");
        assert_eq!(
            card.answer,
            CardField::Html("<img src='lec-2-sa.png' /><br />there".to_string())
        );
        assert_eq!(card.media[0].file_name, "lec-2-sa.png");
        assert_eq!(card.media[0].crop, crate::resolve_crop("bl"));
    }

    #[test]
    fn test_text_only_tag_takes_precedence() {
        let card = card_for("Slide 9:\n    S_Q: later\n    Q: first\n    A: yes\n");
        assert_eq!(card.question, CardField::Html("first".to_string()));
        assert!(card.media.is_empty());
    }

    #[test]
    fn test_media_names_escaped_in_html() {
        let parsed = parse_notes("Slide 1:\n    Q_S: look\nSlide 2:\n    plain\n").unwrap();
        let formatter = DeckFormatter::new("Bob's \"deck\".pdf");
        let cards = formatter.cards(&parsed);

        assert_eq!(
            cards[0].question,
            CardField::Html(
                "look<br /><img src='Bob&#39;s &quot;deck&quot;.pdf-1-qs.png' />".to_string()
            )
        );
        assert_eq!(
            cards[1].to_line(),
            "\"plain\"; <img src=\"Bob&#39;s &quot;deck&quot;.pdf-2.png\" />"
        );
        // The file itself keeps the raw name.
        assert_eq!(cards[1].media[0].file_name, "Bob's \"deck\".pdf-2.png");
    }

    #[test]
    fn test_format_lines() {
        let parsed = parse_notes("Slide 1:\n    Q: a\n    A: b\nSlide 2:\n    Q: c\n    A: d\n")
            .unwrap();
        let formatter = DeckFormatter::new("p");
        let deck = formatter.format(&formatter.cards(&parsed));
        assert_eq!(deck, "\"a\"; \"b\"\n\"c\"; \"d\"\n");
    }

    #[test]
    fn test_format_empty() {
        let formatter = DeckFormatter::new("p");
        assert_eq!(formatter.format(&[]), "");
    }
}
