//! Codepoint to font instance resolution

use crate::constants::DEFAULT_GENERIC_ENTRY_COUNT;
use crate::font::{FaceLock, FontStyle, NegativeCoverageCache};
use crate::traits::{FaceCharmap, FontCatalog, FontInstance, FontInstanceCache};
use std::sync::Arc;

/// Searches installed families for one that covers a codepoint
///
/// Every miss walks the whole catalog once; the negative cache makes each
/// uncovered codepoint pay that walk at most once per font-list generation.
/// Caching each family's coverage up front would remove the first-miss walk
/// as well.
pub struct GlyphCoverageResolver<C, F> {
    catalog: C,
    fonts: F,
    no_font_codepoints: NegativeCoverageCache,
    generic_entry_count: usize,
}

impl<C: FontCatalog, F: FontInstanceCache> GlyphCoverageResolver<C, F> {
    pub fn new(catalog: C, fonts: F) -> Self {
        Self {
            catalog,
            fonts,
            no_font_codepoints: NegativeCoverageCache::new(),
            generic_entry_count: DEFAULT_GENERIC_ENTRY_COUNT,
        }
    }

    /// Number of leading font list entries skipped as generic aliases
    pub fn with_generic_entry_count(mut self, count: usize) -> Self {
        self.generic_entry_count = count;
        self
    }

    /// Find an instance whose face has a real glyph for `codepoint`
    ///
    /// Returns `None` both for confirmed non-coverage (remembered) and for a
    /// failed catalog enumeration (not remembered).
    pub fn resolve(&self, codepoint: u32, style: &FontStyle) -> Option<Arc<F::Font>> {
        if self.no_font_codepoints.test(codepoint) {
            tracing::trace!("U+{:04X} is known to have no font", codepoint);
            return None;
        }

        let generation = self.no_font_codepoints.generation();
        let families = match self.catalog.font_list(&style.language, "") {
            Ok(families) => families,
            Err(e) => {
                tracing::warn!(
                    "Font list for '{}' unavailable while resolving U+{:04X}: {}",
                    style.language,
                    codepoint,
                    e
                );
                return None;
            }
        };

        for family in families.iter().skip(self.generic_entry_count) {
            tracing::trace!("Searching '{}' for U+{:04X}", family, codepoint);

            let Some(font) = self.fonts.get_or_make_font(family, style) else {
                tracing::debug!("No usable instance for '{}'", family);
                continue;
            };

            if font_covers(&*font, codepoint) {
                tracing::debug!("U+{:04X} resolved to '{}'", codepoint, family);
                return Some(font);
            }
        }

        if self.no_font_codepoints.set_if_generation(codepoint, generation) {
            tracing::debug!(
                "No installed font covers U+{:04X}, remembering the miss",
                codepoint
            );
        } else {
            tracing::debug!(
                "Font list refreshed while resolving U+{:04X}, miss not remembered",
                codepoint
            );
        }
        None
    }

    /// [`resolve`](Self::resolve) for a `char`
    pub fn resolve_char(&self, ch: char, style: &FontStyle) -> Option<Arc<F::Font>> {
        self.resolve(ch as u32, style)
    }

    pub fn negative_cache(&self) -> &NegativeCoverageCache {
        &self.no_font_codepoints
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn fonts(&self) -> &F {
        &self.fonts
    }
}

/// Lock the face just long enough to look up the glyph
fn font_covers<I: FontInstance + ?Sized>(font: &I, codepoint: u32) -> bool {
    let Some(face) = FaceLock::acquire(font) else {
        tracing::debug!("Could not lock face of '{}'", font.family());
        return false;
    };

    if !face.has_charmap() {
        tracing::debug!("Face of '{}' has no charmap", font.family());
        return false;
    }

    face.glyph_index(codepoint) != 0
}
