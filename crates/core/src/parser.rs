//! Notes file parser.
//!
//! # Format
//! ```text
//! Slide 3:
//!     Free text about the slide
//!     Q: What does the graph show?
//!     A: Growth.
//!     S_A[tl]: answer shown under the top-left quarter of the slide
//! # a comment prefix is allowed on headers
//! #draft Slide 4:
//!     Q_S[0-100,0:50]: question shown above the top half of the slide
//! ```
//!
//! Parsing runs in one pass: every line is classified, every content line is
//! matched against the tag table, and the resulting fragments are accumulated
//! per slide number.

use crate::crop::CropSpec;
use crate::error::{Error, Result};
use crate::types::{
    Category, ParseWarning, ParsedNotes, Separator, SlideNumber, SlideRecord, CATEGORY_TABLE,
};
use regex::Regex;
use std::collections::BTreeMap;
use std::io::BufRead;
use std::sync::LazyLock;

/// Slide header, optionally preceded by a `#` comment prefix.
static SLIDE_HEADER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#.*)?Slide (?P<slide>[0-9]+):").unwrap());

/// Content line: indented by at least one whitespace character.
static CONTENT_LINE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s+(?P<line>.*)$").unwrap());

/// One compiled pattern per tagged category in [`CATEGORY_TABLE`].
static TAG_PATTERNS: LazyLock<Vec<(Category, Regex)>> = LazyLock::new(|| {
    CATEGORY_TABLE
        .iter()
        .filter_map(|spec| {
            let tag = regex::escape(spec.tag?);
            let pattern = if spec.accepts_crop {
                format!(r"^{}(?:\[(?P<crop>[^\]]*)\])?:(?P<text>.*)$", tag)
            } else {
                format!(r"^{}:(?P<text>.*)$", tag)
            };
            Some((spec.category, Regex::new(&pattern).unwrap()))
        })
        .collect()
});

/// What a single input line turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// Empty or whitespace-only.
    Blank,
    /// `Slide <N>:` header.
    Header(SlideNumber),
    /// Indented content under the active slide, leading whitespace removed.
    Content(&'a str),
}

/// Classify one line given the currently active slide.
///
/// `line_number` is 1-based and only used for error reporting.
pub fn classify_line(
    line: &str,
    active: Option<SlideNumber>,
    line_number: usize,
) -> Result<LineKind<'_>> {
    if line.trim().is_empty() {
        return Ok(LineKind::Blank);
    }

    if active.is_some() {
        if let Some(caps) = CONTENT_LINE_REGEX.captures(line) {
            if let Some(m) = caps.name("line") {
                return Ok(LineKind::Content(m.as_str()));
            }
        }
    }

    let slide = SLIDE_HEADER_REGEX
        .captures(line)
        .and_then(|caps| caps["slide"].parse::<SlideNumber>().ok())
        .filter(|&n| n > 0);

    match slide {
        Some(n) => Ok(LineKind::Header(n)),
        None => Err(Error::MalformedLine {
            line: line_number,
            text: line.to_string(),
        }),
    }
}

/// A categorized piece of text from one content line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub category: Category,
    /// Trimmed, HTML-escaped text.
    pub text: String,
    /// Crop given in brackets after the tag, if any.
    pub crop: Option<CropSpec>,
}

/// Everything extracted from one content line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineAnnotations {
    pub fragments: Vec<Fragment>,
    /// Crop directives that could not be resolved exactly.
    pub inexact_crops: Vec<String>,
}

/// Match a content line against every tag.
///
/// The line always yields a [`Category::Full`] fragment, followed by one
/// fragment per tag that matches.
pub fn match_annotations(content: &str) -> LineAnnotations {
    let content = content.trim();
    let mut annotations = LineAnnotations::default();

    annotations.fragments.push(Fragment {
        category: Category::Full,
        text: escape_html(content),
        crop: None,
    });

    for (category, pattern) in TAG_PATTERNS.iter() {
        let Some(caps) = pattern.captures(content) else {
            continue;
        };

        let crop = caps.name("crop").map(|m| {
            let resolution = CropSpec::resolve(m.as_str());
            if !resolution.exact {
                annotations.inexact_crops.push(m.as_str().to_string());
            }
            resolution.spec
        });

        let text = caps.name("text").map_or("", |m| m.as_str().trim());
        annotations.fragments.push(Fragment {
            category: *category,
            text: escape_html(text),
            crop,
        });
    }

    annotations
}

/// Fragments gathered for one slide so far.
#[derive(Debug, Default)]
struct SlideAccumulator {
    texts: [Vec<String>; Category::COUNT],
    record: SlideRecord,
}

/// Per-slide accumulation of fragments.
#[derive(Debug, Default)]
pub struct Aggregator {
    slides: BTreeMap<SlideNumber, SlideAccumulator>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a fragment to a slide. A crop overwrites any earlier crop of the
    /// same category on that slide.
    pub fn push(&mut self, slide: SlideNumber, fragment: Fragment) {
        let acc = self.slides.entry(slide).or_default();
        acc.texts[fragment.category.index()].push(fragment.text);

        if let Some(crop) = fragment.crop {
            if let Some(slot) = acc.record.crop_mut(fragment.category) {
                *slot = crop;
            }
        }
    }

    /// Join all fragments and drop slides without content.
    pub fn finish(self, separator: Separator) -> BTreeMap<SlideNumber, SlideRecord> {
        let sep = separator.as_str();

        self.slides
            .into_iter()
            .filter(|(_, acc)| !acc.texts[Category::Full.index()].is_empty())
            .map(|(slide, mut acc)| {
                for spec in CATEGORY_TABLE {
                    *acc.record.text_mut(spec.category) =
                        acc.texts[spec.category.index()].join(sep);
                }
                (slide, acc.record)
            })
            .collect()
    }
}

/// Parser for notes files.
#[derive(Debug, Clone, Default)]
pub struct NotesParser {
    separator: Separator,
}

impl NotesParser {
    /// Create a parser using [`crate::DEFAULT_SEPARATOR`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the separator placed between fragments of one category.
    pub fn with_separator(mut self, separator: Separator) -> Self {
        self.separator = separator;
        self
    }

    /// Parse notes held in memory.
    pub fn parse_str(&self, content: &str) -> Result<ParsedNotes> {
        self.parse_lines(content.lines())
    }

    /// Parse notes from a buffered reader.
    pub fn parse_reader<R: BufRead>(&self, reader: R) -> Result<ParsedNotes> {
        let lines = reader.lines().collect::<std::io::Result<Vec<String>>>()?;
        self.parse_lines(lines.iter().map(String::as_str))
    }

    /// Parse a sequence of lines.
    pub fn parse_lines<'a, I>(&self, lines: I) -> Result<ParsedNotes>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut aggregator = Aggregator::new();
        let mut warnings = Vec::new();
        let mut active: Option<SlideNumber> = None;

        for (idx, line) in lines.into_iter().enumerate() {
            let line_number = idx + 1;

            match classify_line(line, active, line_number)? {
                LineKind::Blank => {}
                LineKind::Header(slide) => {
                    log::debug!("Line {}: slide {}", line_number, slide);
                    active = Some(slide);
                }
                LineKind::Content(content) => {
                    // Content is only classified while a slide is active.
                    let Some(slide) = active else {
                        return Err(Error::MalformedLine {
                            line: line_number,
                            text: line.to_string(),
                        });
                    };

                    let annotations = match_annotations(content);
                    for directive in annotations.inexact_crops {
                        log::warn!(
                            "Line {}: crop '{}' not understood, using the whole slide",
                            line_number,
                            directive
                        );
                        warnings.push(ParseWarning::UnrecognizedCrop {
                            line: line_number,
                            directive,
                        });
                    }
                    for fragment in annotations.fragments {
                        aggregator.push(slide, fragment);
                    }
                }
            }
        }

        let slides = aggregator.finish(self.separator);
        log::debug!("Parsed notes for {} slides", slides.len());

        Ok(ParsedNotes { slides, warnings })
    }
}

/// Parse notes with the default configuration.
pub fn parse_notes(content: &str) -> Result<ParsedNotes> {
    NotesParser::new().parse_str(content)
}

/// Escape characters significant in HTML and in the quoted deck fields.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
