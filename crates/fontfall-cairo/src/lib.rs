//! System collaborators for fontfall-core
//!
//! A directory-scanning (optionally fontconfig-backed) font catalog, fontdue
//! font instances, and cairo image surfaces for both allocation backends.

pub mod catalog;
pub mod font;
pub mod surface;

pub use catalog::{FaceEntry, SystemCatalog, SystemCatalogConfig};
pub use font::{FontLoadError, FontdueFace, FontdueInstance, FontdueInstanceCache};
pub use surface::{CairoStride, CairoSurface, CairoSurfaceFactory};

use fontfall_core::{Platform, PlatformConfig, PlatformResult};
use std::sync::Arc;

/// Platform wired to the installed system fonts and cairo surfaces
pub type SystemPlatform = Platform<Arc<SystemCatalog>, FontdueInstanceCache, CairoStride>;

/// Scan the system fonts and build a ready platform
pub fn system_platform(
    catalog_config: SystemCatalogConfig,
    config: PlatformConfig,
) -> PlatformResult<SystemPlatform> {
    let catalog = Arc::new(SystemCatalog::new(catalog_config));
    let fonts = FontdueInstanceCache::new(Arc::clone(&catalog));
    Platform::init_with_stride(catalog, fonts, CairoStride, config)
}
