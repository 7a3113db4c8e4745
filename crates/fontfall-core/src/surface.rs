//! Off-screen surface backend selection

use crate::constants::{SMALL_SURFACE_LIMIT, STRIDE_ALIGNMENT};
use crate::traits::RowStride;

/// Pixel layouts, matching cairo's image formats
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    Argb32,
    Rgb24,
    A8,
    A1,
    Rgb16_565,
    Rgb30,
}

impl PixelFormat {
    pub fn bits_per_pixel(self) -> usize {
        match self {
            PixelFormat::Argb32 | PixelFormat::Rgb24 | PixelFormat::Rgb30 => 32,
            PixelFormat::Rgb16_565 => 16,
            PixelFormat::A8 => 8,
            PixelFormat::A1 => 1,
        }
    }
}

/// What a surface will hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    Color,
    Alpha,
    ColorAlpha,
}

impl ContentType {
    /// Cheapest pixel format able to represent this content
    pub fn optimal_format(self) -> PixelFormat {
        match self {
            ContentType::Color => PixelFormat::Rgb24,
            ContentType::Alpha => PixelFormat::A8,
            ContentType::ColorAlpha => PixelFormat::Argb32,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceRequest {
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
}

impl SurfaceRequest {
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Self {
        Self { width, height, format }
    }
}

/// Where a surface's pixels live
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendChoice {
    /// Ordinary process heap memory
    Lightweight,
    /// System-managed shared surface, presentable by the display subsystem
    Native,
}

impl std::fmt::Display for BackendChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendChoice::Lightweight => write!(f, "lightweight"),
            BackendChoice::Native => write!(f, "native"),
        }
    }
}

/// Row packing used by cairo/pixman: whole bytes, padded to 4-byte multiples
#[derive(Debug, Clone, Copy, Default)]
pub struct PackedStride;

impl RowStride for PackedStride {
    fn row_stride(&self, format: PixelFormat, width: u32) -> usize {
        let bytes = (width as usize)
            .saturating_mul(format.bits_per_pixel())
            .saturating_add(7)
            / 8;
        bytes
            .saturating_add(STRIDE_ALIGNMENT - 1)
            & !(STRIDE_ALIGNMENT - 1)
    }
}

/// Routes surface requests to a backend by memory footprint
///
/// Small surfaces are churned often; keeping them on the heap avoids the cost
/// and fragmentation of system surface allocation. The limit applies to every
/// format alike.
#[derive(Debug, Clone)]
pub struct SurfaceAllocator<S = PackedStride> {
    stride: S,
    small_surface_limit: usize,
}

impl Default for SurfaceAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl SurfaceAllocator {
    pub fn new() -> Self {
        Self::with_stride(PackedStride)
    }
}

impl<S: RowStride> SurfaceAllocator<S> {
    pub fn with_stride(stride: S) -> Self {
        Self {
            stride,
            small_surface_limit: SMALL_SURFACE_LIMIT,
        }
    }

    pub fn with_small_surface_limit(mut self, bytes: usize) -> Self {
        self.small_surface_limit = bytes;
        self
    }

    pub fn small_surface_limit(&self) -> usize {
        self.small_surface_limit
    }

    pub fn stride(&self, request: &SurfaceRequest) -> usize {
        self.stride.row_stride(request.format, request.width)
    }

    /// Total bytes the surface's pixel rows occupy
    pub fn footprint(&self, request: &SurfaceRequest) -> usize {
        self.stride(request).saturating_mul(request.height as usize)
    }

    pub fn allocate(&self, request: &SurfaceRequest) -> BackendChoice {
        let footprint = self.footprint(request);
        let choice = if footprint <= self.small_surface_limit {
            BackendChoice::Lightweight
        } else {
            BackendChoice::Native
        };
        tracing::debug!(
            "{}x{} {:?} surface ({} bytes) -> {}",
            request.width,
            request.height,
            request.format,
            footprint,
            choice
        );
        choice
    }
}
