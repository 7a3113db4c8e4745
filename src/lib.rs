//! fontfall - font coverage fallback and off-screen surface allocation
//!
//! This crate ties the platform layer together:
//! - Finding an installed font with a glyph for any codepoint
//! - Remembering codepoints no installed font covers
//! - Choosing heap or system memory for off-screen surfaces

pub mod error;
pub mod probe;

// Re-export main types for convenience
pub use error::{ProbeError, ProbeResult};
pub use fontfall_cairo::{
    system_platform, CairoStride, CairoSurface, CairoSurfaceFactory, SystemCatalog,
    SystemCatalogConfig, SystemPlatform,
};
pub use fontfall_core::{
    BackendChoice, ContentType, FontStyle, NegativeCoverageCache, Platform, PlatformConfig,
    PlatformError, SurfaceAllocator, SurfaceRequest,
};
