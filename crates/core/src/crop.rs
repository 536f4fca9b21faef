//! Crop directives.
//!
//! A crop directive selects a rectangle of a rendered slide in percent of its
//! width and height. Two forms are accepted:
//!
//! ```text
//! 10-90,0:50     numeric: wMin-wMax,hMin-hMax (separator '-' or ':')
//! tl             named: top-left quarter (case-insensitive)
//! ```
//!
//! Anything else resolves to the whole slide.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

/// Regex for the numeric form `wMin<sep>wMax,hMin<sep>hMax`.
static NUMERIC_CROP_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(\d+)\s*[-:]\s*(\d+)\s*,\s*(\d+)\s*[-:]\s*(\d+)\s*$").unwrap()
});

/// A `[min, max]` range in percent along one image axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PercentRange {
    pub min: u8,
    pub max: u8,
}

impl PercentRange {
    /// The whole axis, `[0, 100]`.
    pub const FULL: PercentRange = PercentRange { min: 0, max: 100 };

    pub const fn new(min: u8, max: u8) -> Self {
        Self { min, max }
    }

    /// Build a range from parsed bounds, resetting to the whole axis unless
    /// `min < max <= 100`.
    fn checked(min: u32, max: u32) -> (Self, bool) {
        if max > min && max <= 100 {
            (Self::new(min as u8, max as u8), true)
        } else {
            (Self::FULL, false)
        }
    }

    /// Length of the range in percent.
    pub fn span(&self) -> u8 {
        self.max - self.min
    }
}

/// Rectangular region of a slide in relative coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CropSpec {
    pub width: PercentRange,
    pub height: PercentRange,
}

impl Default for CropSpec {
    fn default() -> Self {
        Self::FULL
    }
}

impl CropSpec {
    /// The whole slide.
    pub const FULL: CropSpec = CropSpec {
        width: PercentRange::FULL,
        height: PercentRange::FULL,
    };

    const fn of(w_min: u8, w_max: u8, h_min: u8, h_max: u8) -> Self {
        Self {
            width: PercentRange::new(w_min, w_max),
            height: PercentRange::new(h_min, h_max),
        }
    }

    pub fn is_full(&self) -> bool {
        *self == Self::FULL
    }

    /// Resolve a directive, reporting whether it was fully understood.
    pub fn resolve(directive: &str) -> CropResolution {
        if let Some(caps) = NUMERIC_CROP_REGEX.captures(directive) {
            // Bounds too large for u32 are out of range like any bound above 100.
            let b: Vec<u32> = (1..=4)
                .map(|i| caps[i].parse().unwrap_or(u32::MAX))
                .collect();
            let (width, width_ok) = PercentRange::checked(b[0], b[1]);
            let (height, height_ok) = PercentRange::checked(b[2], b[3]);
            return CropResolution {
                spec: CropSpec { width, height },
                exact: width_ok && height_ok,
            };
        }

        let code = directive.trim();
        if code.is_empty() {
            return CropResolution {
                spec: CropSpec::FULL,
                exact: true,
            };
        }

        match named_crop(&code.to_ascii_lowercase()) {
            Some(spec) => CropResolution { spec, exact: true },
            None => CropResolution {
                spec: CropSpec::FULL,
                exact: false,
            },
        }
    }
}

/// Serializes in the numeric directive form, `wMin-wMax,hMin-hMax`.
impl fmt::Display for CropSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{},{}-{}",
            self.width.min, self.width.max, self.height.min, self.height.max
        )
    }
}

/// Outcome of resolving a crop directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropResolution {
    pub spec: CropSpec,
    /// False when the directive was unrecognized or an axis had to be reset.
    pub exact: bool,
}

/// Resolve a crop directive to a [`CropSpec`], falling back to the whole slide.
pub fn resolve_crop(directive: &str) -> CropSpec {
    CropSpec::resolve(directive).spec
}

/// Named crop codes. Expects a lowercase code.
fn named_crop(code: &str) -> Option<CropSpec> {
    let spec = match code {
        // whole
        "a" | "w" => CropSpec::FULL,

        // halves
        "t" | "th" => CropSpec::of(0, 100, 0, 50),
        "b" | "bh" => CropSpec::of(0, 100, 50, 100),
        "l" | "lh" => CropSpec::of(0, 50, 0, 100),
        "r" | "rh" => CropSpec::of(50, 100, 0, 100),
        "mh" | "hmh" => CropSpec::of(25, 75, 0, 100),
        "vmh" => CropSpec::of(0, 100, 25, 75),

        // quarters
        "tl" | "tlq" => CropSpec::of(0, 50, 0, 50),
        "tr" | "trq" => CropSpec::of(50, 100, 0, 50),
        "bl" | "blq" => CropSpec::of(0, 50, 50, 100),
        "br" | "brq" => CropSpec::of(50, 100, 50, 100),
        "m" | "c" | "mq" | "cq" => CropSpec::of(25, 75, 25, 75),

        // thirds
        "tt" => CropSpec::of(0, 100, 0, 33),
        "vmt" => CropSpec::of(0, 100, 33, 67),
        "bt" => CropSpec::of(0, 100, 67, 100),
        "lt" => CropSpec::of(0, 33, 0, 100),
        "mt" | "hmt" => CropSpec::of(33, 67, 0, 100),
        "rt" => CropSpec::of(67, 100, 0, 100),

        _ => return None,
    };
    Some(spec)
}
