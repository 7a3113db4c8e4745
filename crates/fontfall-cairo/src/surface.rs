//! Cairo image surfaces for both backends

use cairo::{Format, ImageSurface};
use fontfall_core::{
    BackendChoice, PackedStride, PixelFormat, PlatformError, RowStride, SurfaceFactory,
    SurfaceRequest,
};

pub fn cairo_format(format: PixelFormat) -> Format {
    match format {
        PixelFormat::Argb32 => Format::ARgb32,
        PixelFormat::Rgb24 => Format::Rgb24,
        PixelFormat::A8 => Format::A8,
        PixelFormat::A1 => Format::A1,
        PixelFormat::Rgb16_565 => Format::Rgb16_565,
        PixelFormat::Rgb30 => Format::Rgb30,
    }
}

/// Row stride as cairo computes it
#[derive(Debug, Clone, Copy, Default)]
pub struct CairoStride;

impl RowStride for CairoStride {
    fn row_stride(&self, format: PixelFormat, width: u32) -> usize {
        match cairo_format(format).stride_for_width(width) {
            Ok(stride) if stride >= 0 => stride as usize,
            _ => {
                // Too wide for cairo; the packed size still routes it correctly
                tracing::debug!("cairo has no stride for {:?} x {}", format, width);
                PackedStride.row_stride(format, width)
            }
        }
    }
}

/// An off-screen cairo surface and where its pixels live
pub struct CairoSurface {
    pub backend: BackendChoice,
    pub surface: ImageSurface,
}

/// Builds heap-backed or cairo-managed image surfaces
#[derive(Debug, Clone, Copy, Default)]
pub struct CairoSurfaceFactory;

impl CairoSurfaceFactory {
    fn dimensions(
        backend: BackendChoice,
        request: &SurfaceRequest,
        stride: usize,
    ) -> Result<(i32, i32, i32), PlatformError> {
        let convert = |value: usize, what: &str| {
            i32::try_from(value).map_err(|_| PlatformError::SurfaceCreation {
                backend: backend.to_string(),
                message: format!("{} {} out of range", what, value),
            })
        };
        Ok((
            convert(request.width as usize, "width")?,
            convert(request.height as usize, "height")?,
            convert(stride, "stride")?,
        ))
    }

    fn creation_error(backend: BackendChoice, e: cairo::Error) -> PlatformError {
        PlatformError::SurfaceCreation {
            backend: backend.to_string(),
            message: e.to_string(),
        }
    }
}

impl SurfaceFactory for CairoSurfaceFactory {
    type Surface = CairoSurface;

    fn create_lightweight(
        &self,
        request: &SurfaceRequest,
        stride: usize,
    ) -> Result<CairoSurface, PlatformError> {
        let backend = BackendChoice::Lightweight;
        let (width, height, stride_i32) = Self::dimensions(backend, request, stride)?;
        let len = stride
            .checked_mul(request.height as usize)
            .ok_or_else(|| PlatformError::SurfaceCreation {
                backend: backend.to_string(),
                message: format!("{} rows of {} bytes overflow", request.height, stride),
            })?;
        let data = vec![0u8; len];

        let surface = ImageSurface::create_for_data(
            data,
            cairo_format(request.format),
            width,
            height,
            stride_i32,
        )
        .map_err(|e| Self::creation_error(backend, e))?;

        Ok(CairoSurface { backend, surface })
    }

    fn create_native(
        &self,
        request: &SurfaceRequest,
        stride: usize,
    ) -> Result<CairoSurface, PlatformError> {
        let backend = BackendChoice::Native;
        let (width, height, _) = Self::dimensions(backend, request, stride)?;

        let surface = ImageSurface::create(cairo_format(request.format), width, height)
            .map_err(|e| Self::creation_error(backend, e))?;

        Ok(CairoSurface { backend, surface })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fontfall_core::SurfaceAllocator;

    const FORMATS: [PixelFormat; 6] = [
        PixelFormat::Argb32,
        PixelFormat::Rgb24,
        PixelFormat::A8,
        PixelFormat::A1,
        PixelFormat::Rgb16_565,
        PixelFormat::Rgb30,
    ];

    #[test]
    fn test_packed_stride_matches_cairo() {
        for format in FORMATS {
            for width in [0, 1, 3, 7, 31, 32, 33, 64, 100, 1023] {
                assert_eq!(
                    CairoStride.row_stride(format, width),
                    PackedStride.row_stride(format, width),
                    "{:?} width {}",
                    format,
                    width
                );
            }
        }
    }

    #[test]
    fn test_lightweight_surface() {
        let request = SurfaceRequest::new(32, 32, PixelFormat::Argb32);
        let stride = CairoStride.row_stride(request.format, request.width);
        let surface = CairoSurfaceFactory.create_lightweight(&request, stride).unwrap();

        assert_eq!(surface.backend, BackendChoice::Lightweight);
        assert_eq!(surface.surface.width(), 32);
        assert_eq!(surface.surface.stride(), 128);
        assert_eq!(surface.surface.format(), Format::ARgb32);
    }

    #[test]
    fn test_native_surface() {
        let allocator = SurfaceAllocator::with_stride(CairoStride);
        let request = SurfaceRequest::new(256, 128, PixelFormat::A8);
        assert_eq!(allocator.allocate(&request), BackendChoice::Native);

        let surface = CairoSurfaceFactory
            .create_native(&request, allocator.stride(&request))
            .unwrap();
        assert_eq!(surface.backend, BackendChoice::Native);
        assert_eq!(surface.surface.height(), 128);
        assert_eq!(surface.surface.stride() as usize, allocator.stride(&request));
    }

    #[test]
    fn test_oversized_dimensions_rejected() {
        let request = SurfaceRequest::new(u32::MAX, 1, PixelFormat::A8);
        let result = CairoSurfaceFactory.create_native(&request, 16);
        assert!(matches!(result, Err(PlatformError::SurfaceCreation { .. })));
    }
}
