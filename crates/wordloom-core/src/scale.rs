//! Maps word counts onto font sizes.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_MIN_FONT: f64 = 25.0;
pub const DEFAULT_MAX_FONT: f64 = 190.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FontScale {
    pub min_font: f64,
    pub max_font: f64,
}

impl Default for FontScale {
    fn default() -> Self {
        Self {
            min_font: DEFAULT_MIN_FONT,
            max_font: DEFAULT_MAX_FONT,
        }
    }
}

impl FontScale {
    pub fn new(min_font: f64, max_font: f64) -> Result<Self> {
        if !(min_font.is_finite() && max_font.is_finite()) || min_font <= 0.0 || min_font > max_font
        {
            return Err(Error::InvalidFontScale { min_font, max_font });
        }
        Ok(Self { min_font, max_font })
    }

    pub fn midpoint(&self) -> f64 {
        (self.min_font + self.max_font) / 2.0
    }

    /// Position of `count` within `[min_count, max_count]` as a fraction in `[0, 1]`.
    ///
    /// A degenerate range (every word equally frequent) maps to `0.5`.
    pub fn normalized(count: u32, min_count: u32, max_count: u32) -> f64 {
        if max_count <= min_count {
            return 0.5;
        }
        let t = (f64::from(count) - f64::from(min_count)) / (f64::from(max_count) - f64::from(min_count));
        t.clamp(0.0, 1.0)
    }

    /// Linear interpolation between the font bounds.
    ///
    /// When `max_count == min_count` the midpoint is returned exactly.
    pub fn size_for(&self, count: u32, min_count: u32, max_count: u32) -> f64 {
        if max_count <= min_count {
            return self.midpoint();
        }
        let t = Self::normalized(count, min_count, max_count);
        let size = self.min_font + t * (self.max_font - self.min_font);
        size.clamp(self.min_font, self.max_font)
    }
}
