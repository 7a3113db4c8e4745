//! fontfall core - glyph coverage resolution and surface backend selection
//!
//! This crate holds the decision logic of the platform layer, independent of
//! any particular font library or surface implementation. Collaborators plug
//! in through the traits in [`traits`].

pub mod config;
pub mod constants;
pub mod dummy_backend;
pub mod error;
pub mod font;
pub mod platform;
pub mod surface;
pub mod traits;

// Re-export main types
pub use config::PlatformConfig;
pub use error::{CatalogError, PlatformError, PlatformResult};
pub use font::{
    FaceLock, FontNameMatches, FontSlant, FontStyle, FontWeight, GlyphCoverageResolver,
    NegativeCoverageCache,
};
pub use platform::Platform;
pub use surface::{
    BackendChoice, ContentType, PackedStride, PixelFormat, SurfaceAllocator, SurfaceRequest,
};

// Re-export traits
pub use traits::*;
