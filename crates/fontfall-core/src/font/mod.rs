//! Glyph coverage resolution
//!
//! Finds, for an arbitrary codepoint, an installed font instance whose face
//! maps that codepoint to a real glyph, remembering codepoints no font covers.

pub mod coverage;
pub mod face_lock;
pub mod names;
pub mod resolver;

pub use coverage::NegativeCoverageCache;
pub use face_lock::FaceLock;
pub use names::FontNameMatches;
pub use resolver::GlyphCoverageResolver;

use crate::constants::{DEFAULT_LANGUAGE, DEFAULT_PIXEL_SIZE};
use std::hash::{Hash, Hasher};

/// Font weight variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

/// Font slant variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FontSlant {
    #[default]
    Normal,
    Italic,
}

/// Reference style a coverage check is made against
///
/// The resolver only reads `language`; everything else is handed through to
/// the font instance cache untouched.
#[derive(Debug, Clone)]
pub struct FontStyle {
    pub language: String,
    pub weight: FontWeight,
    pub slant: FontSlant,
    pub pixel_size: f32,
}

impl Default for FontStyle {
    fn default() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
            weight: FontWeight::Normal,
            slant: FontSlant::Normal,
            pixel_size: DEFAULT_PIXEL_SIZE,
        }
    }
}

impl FontStyle {
    pub fn new(language: &str) -> Self {
        Self {
            language: language.to_string(),
            ..Self::default()
        }
    }

    pub fn with_weight(mut self, weight: FontWeight) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_slant(mut self, slant: FontSlant) -> Self {
        self.slant = slant;
        self
    }

    pub fn with_pixel_size(mut self, size: f32) -> Self {
        self.pixel_size = size;
        self
    }
}

// Sizes compare bitwise so the style can key a HashMap
impl PartialEq for FontStyle {
    fn eq(&self, other: &Self) -> bool {
        self.language == other.language
            && self.weight == other.weight
            && self.slant == other.slant
            && self.pixel_size.to_bits() == other.pixel_size.to_bits()
    }
}

impl Eq for FontStyle {}

impl Hash for FontStyle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.language.hash(state);
        self.weight.hash(state);
        self.slant.hash(state);
        self.pixel_size.to_bits().hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_style_keys_hash_consistently() {
        let a = FontStyle::new("ja").with_weight(FontWeight::Bold);
        let b = FontStyle::new("ja").with_weight(FontWeight::Bold);
        let c = FontStyle::new("ja").with_pixel_size(14.0);

        let mut set = HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
        assert!(!set.contains(&c));
    }
}
