use crate::error::{CatalogError, PlatformError};
use crate::font::{FontNameMatches, FontStyle};
use crate::surface::{PixelFormat, SurfaceRequest};
use std::sync::Arc;

/// Source of installed font family names
pub trait FontCatalog {
    /// Prepare the underlying font-metadata service
    fn init(&self) -> Result<(), CatalogError> {
        Ok(())
    }

    /// Release the underlying font-metadata service
    fn shutdown(&self) {}

    /// Ordered family names for a language group
    ///
    /// With an empty `generic_hint` the list starts with the generic aliases
    /// (serif, sans-serif, monospace) followed by concrete families.
    fn font_list(&self, language: &str, generic_hint: &str) -> Result<Vec<String>, CatalogError>;

    /// Rebuild the catalog from the installed fonts
    fn update_font_list(&self) -> Result<(), CatalogError>;

    /// Family names a requested name resolves to
    fn resolve_font_name(&self, name: &str) -> Result<FontNameMatches, CatalogError>;

    /// Canonical spelling of a family name, if the catalog knows it
    fn standard_family_name(&self, name: &str) -> Result<Option<String>, CatalogError>;
}

/// Provider of reusable, scaled font instances
pub trait FontInstanceCache {
    type Font: FontInstance;

    fn get_or_make_font(&self, family: &str, style: &FontStyle) -> Option<Arc<Self::Font>>;
}

/// A scaled font whose underlying face must be locked before use
///
/// Callers should go through [`FaceLock`](crate::font::FaceLock), which pairs
/// every successful `lock_face` with exactly one `unlock_face`.
pub trait FontInstance {
    type Face: FaceCharmap + ?Sized;

    fn family(&self) -> &str;

    /// Lock the face, waiting while another caller holds it
    ///
    /// `None` means the face is unusable (it failed to load) and needs no
    /// unlock. Contention alone must never produce `None`.
    fn lock_face(&self) -> Option<&Self::Face>;

    fn unlock_face(&self);
}

/// Character-to-glyph mapping of a locked face
pub trait FaceCharmap {
    fn has_charmap(&self) -> bool;

    /// Glyph id for `codepoint`, 0 when the face has no glyph for it
    fn glyph_index(&self, codepoint: u32) -> u32;
}

/// Bytes per pixel row for a format and width, including alignment padding
pub trait RowStride {
    fn row_stride(&self, format: PixelFormat, width: u32) -> usize;
}

/// Constructs surfaces for each backend choice
pub trait SurfaceFactory {
    type Surface;

    /// Surface backed by ordinary process heap memory
    fn create_lightweight(
        &self,
        request: &SurfaceRequest,
        stride: usize,
    ) -> Result<Self::Surface, PlatformError>;

    /// Surface backed by system-managed memory suitable for presentation
    fn create_native(
        &self,
        request: &SurfaceRequest,
        stride: usize,
    ) -> Result<Self::Surface, PlatformError>;
}

impl<T: FontCatalog + ?Sized> FontCatalog for Arc<T> {
    fn init(&self) -> Result<(), CatalogError> {
        (**self).init()
    }

    fn shutdown(&self) {
        (**self).shutdown()
    }

    fn font_list(&self, language: &str, generic_hint: &str) -> Result<Vec<String>, CatalogError> {
        (**self).font_list(language, generic_hint)
    }

    fn update_font_list(&self) -> Result<(), CatalogError> {
        (**self).update_font_list()
    }

    fn resolve_font_name(&self, name: &str) -> Result<FontNameMatches, CatalogError> {
        (**self).resolve_font_name(name)
    }

    fn standard_family_name(&self, name: &str) -> Result<Option<String>, CatalogError> {
        (**self).standard_family_name(name)
    }
}

impl<T: FontInstanceCache + ?Sized> FontInstanceCache for Arc<T> {
    type Font = T::Font;

    fn get_or_make_font(&self, family: &str, style: &FontStyle) -> Option<Arc<Self::Font>> {
        (**self).get_or_make_font(family, style)
    }
}
