//! Platform context owning the coverage resolver and the surface allocator

use crate::config::PlatformConfig;
use crate::error::{PlatformError, PlatformResult};
use crate::font::{FontNameMatches, FontStyle, GlyphCoverageResolver, NegativeCoverageCache};
use crate::surface::{
    BackendChoice, ContentType, PackedStride, PixelFormat, SurfaceAllocator, SurfaceRequest,
};
use crate::traits::{FontCatalog, FontInstanceCache, RowStride, SurfaceFactory};
use std::sync::Arc;

/// Explicit replacement for process-wide platform state
///
/// Created with [`init`](Self::init) and torn down with
/// [`shutdown`](Self::shutdown). Independent instances do not share any state.
pub struct Platform<C: FontCatalog, F: FontInstanceCache, S: RowStride = PackedStride> {
    resolver: GlyphCoverageResolver<C, F>,
    allocator: SurfaceAllocator<S>,
    config: PlatformConfig,
}

impl<C: FontCatalog, F: FontInstanceCache> Platform<C, F> {
    pub fn init(catalog: C, fonts: F, config: PlatformConfig) -> PlatformResult<Self> {
        Self::init_with_stride(catalog, fonts, PackedStride, config)
    }
}

impl<C: FontCatalog, F: FontInstanceCache, S: RowStride> Platform<C, F, S> {
    pub fn init_with_stride(
        catalog: C,
        fonts: F,
        stride: S,
        config: PlatformConfig,
    ) -> PlatformResult<Self> {
        config.validate()?;

        catalog.init().map_err(|e| PlatformError::Initialization {
            reason: e.to_string(),
        })?;

        tracing::info!(
            "Platform initialized (small surface limit {} bytes, {} generic entries)",
            config.small_surface_limit,
            config.generic_entry_count
        );

        Ok(Self {
            resolver: GlyphCoverageResolver::new(catalog, fonts)
                .with_generic_entry_count(config.generic_entry_count),
            allocator: SurfaceAllocator::with_stride(stride)
                .with_small_surface_limit(config.small_surface_limit),
            config,
        })
    }

    /// Release the catalog; the negative cache goes with `self`
    pub fn shutdown(self) {
        self.resolver.catalog().shutdown();
        tracing::info!(
            "Platform shut down ({} codepoints had no font)",
            self.resolver.negative_cache().len()
        );
    }

    pub fn config(&self) -> &PlatformConfig {
        &self.config
    }

    pub fn font_list(&self, language: &str, generic: &str) -> PlatformResult<Vec<String>> {
        Ok(self.resolver.catalog().font_list(language, generic)?)
    }

    /// Refresh the installed font list
    ///
    /// On success every remembered miss is dropped, since newly installed
    /// fonts may cover it. On failure the cache is left as it was.
    pub fn update_font_list(&self) -> PlatformResult<()> {
        self.resolver
            .catalog()
            .update_font_list()
            .map_err(|e| PlatformError::FontListRefresh {
                message: e.to_string(),
            })?;
        self.resolver.negative_cache().reset_all();
        tracing::info!("Font list refreshed, negative coverage cache reset");
        Ok(())
    }

    pub fn resolve_font_name(&self, name: &str) -> PlatformResult<FontNameMatches> {
        Ok(self.resolver.catalog().resolve_font_name(name)?)
    }

    pub fn standard_family_name(&self, name: &str) -> PlatformResult<Option<String>> {
        Ok(self.resolver.catalog().standard_family_name(name)?)
    }

    pub fn find_font_for_char(&self, codepoint: u32, style: &FontStyle) -> Option<Arc<F::Font>> {
        self.resolver.resolve(codepoint, style)
    }

    /// Style in the configured default language
    pub fn default_style(&self) -> FontStyle {
        FontStyle::new(&self.config.default_language)
    }

    pub fn negative_cache(&self) -> &NegativeCoverageCache {
        self.resolver.negative_cache()
    }

    pub fn resolver(&self) -> &GlyphCoverageResolver<C, F> {
        &self.resolver
    }

    pub fn allocator(&self) -> &SurfaceAllocator<S> {
        &self.allocator
    }

    pub fn optimal_format_for_content(&self, content: ContentType) -> PixelFormat {
        content.optimal_format()
    }

    /// Build an off-screen surface on whichever backend its size calls for
    pub fn create_offscreen_surface<B: SurfaceFactory>(
        &self,
        factory: &B,
        width: u32,
        height: u32,
        content: ContentType,
    ) -> PlatformResult<B::Surface> {
        let request = SurfaceRequest::new(width, height, self.optimal_format_for_content(content));
        let stride = self.allocator.stride(&request);
        match self.allocator.allocate(&request) {
            BackendChoice::Lightweight => factory.create_lightweight(&request, stride),
            BackendChoice::Native => factory.create_native(&request, stride),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dummy_backend::{
        DummyFont, DummyInstanceCache, HeapSurfaceFactory, StaticCatalog,
    };

    fn platform(
        catalog: Arc<StaticCatalog>,
    ) -> Platform<Arc<StaticCatalog>, Arc<DummyInstanceCache>> {
        let fonts = Arc::new(DummyInstanceCache::new(vec![DummyFont::new("Arial", &[0x41])]));
        Platform::init(catalog, fonts, PlatformConfig::default()).unwrap()
    }

    fn arial_catalog() -> Arc<StaticCatalog> {
        Arc::new(StaticCatalog::new(
            ["serif", "sans-serif", "monospace", "Arial"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        ))
    }

    #[test]
    fn test_init_failure() {
        let catalog = arial_catalog();
        catalog.fail_init(true);
        let result = Platform::init(
            catalog,
            Arc::new(DummyInstanceCache::default()),
            PlatformConfig::default(),
        );
        assert!(matches!(result, Err(PlatformError::Initialization { .. })));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = Platform::init(
            arial_catalog(),
            Arc::new(DummyInstanceCache::default()),
            PlatformConfig::default().with_generic_entry_count(100),
        );
        assert!(matches!(result, Err(PlatformError::Configuration { .. })));
    }

    #[test]
    fn test_refresh_resets_misses() {
        let catalog = arial_catalog();
        let platform = platform(Arc::clone(&catalog));
        let style = platform.default_style();

        assert!(platform.find_font_for_char(0x3042, &style).is_none());
        assert!(platform.negative_cache().test(0x3042));

        platform.update_font_list().unwrap();
        assert!(!platform.negative_cache().test(0x3042));
        assert!(platform.negative_cache().test(0x1B));
        assert!(platform.negative_cache().test(0x9B));
    }

    #[test]
    fn test_failed_refresh_keeps_misses() {
        let catalog = arial_catalog();
        let platform = platform(Arc::clone(&catalog));
        let style = platform.default_style();

        assert!(platform.find_font_for_char(0x3042, &style).is_none());
        catalog.fail_update(true);
        assert!(matches!(
            platform.update_font_list(),
            Err(PlatformError::FontListRefresh { .. })
        ));
        assert!(platform.negative_cache().test(0x3042));
    }

    #[test]
    fn test_pass_through_queries() {
        let platform = platform(arial_catalog());
        assert_eq!(platform.font_list("en", "").unwrap().len(), 4);
        assert_eq!(
            platform.standard_family_name("ARIAL").unwrap().as_deref(),
            Some("Arial")
        );
        let matches: Vec<String> = platform.resolve_font_name("arial").unwrap().collect();
        assert_eq!(matches, vec!["Arial".to_string()]);
    }

    #[test]
    fn test_shutdown_releases_catalog() {
        let catalog = arial_catalog();
        let platform = platform(Arc::clone(&catalog));
        platform.shutdown();
        assert!(catalog.is_shut_down());
    }

    #[test]
    fn test_offscreen_surface_backends() {
        let platform = platform(arial_catalog());
        let factory = HeapSurfaceFactory::new();

        let small = platform
            .create_offscreen_surface(&factory, 32, 32, ContentType::ColorAlpha)
            .unwrap();
        assert_eq!(small.backend, BackendChoice::Lightweight);
        assert_eq!(small.stride, 128);
        assert_eq!(small.data.len(), 4096);

        let large = platform
            .create_offscreen_surface(&factory, 33, 32, ContentType::ColorAlpha)
            .unwrap();
        assert_eq!(large.backend, BackendChoice::Native);
        assert_eq!(large.request.format, PixelFormat::Argb32);
    }

    #[test]
    fn test_native_failure_propagates() {
        let platform = platform(arial_catalog());
        let result = platform.create_offscreen_surface(
            &HeapSurfaceFactory::failing_native(),
            512,
            512,
            ContentType::Color,
        );
        assert!(matches!(result, Err(PlatformError::SurfaceCreation { .. })));
    }
}
