// src/constants.rs

/// Highest valid Unicode scalar value; the negative cache covers 0..=MAX_CODEPOINT.
pub const MAX_CODEPOINT: u32 = 0x10FFFF;

// Codepoints that never carry displayable glyphs, preset in the negative cache
pub const C0_CONTROLS: (u32, u32) = (0x00, 0x1F);
pub const C1_CONTROLS: (u32, u32) = (0x7F, 0x9F);

// Font list conventions
pub const DEFAULT_GENERIC_ENTRY_COUNT: usize = 3;
pub const MAX_GENERIC_ENTRIES: usize = 16;
pub const DEFAULT_GENERIC_FAMILIES: [&str; 3] = ["serif", "sans-serif", "monospace"];
pub const DEFAULT_LANGUAGE: &str = "x-western";

// Surfaces at or below this many bytes are backed by the process heap
pub const SMALL_SURFACE_LIMIT: usize = 4096;

// Row strides are padded to a multiple of this many bytes
pub const STRIDE_ALIGNMENT: usize = 4;

pub const DEFAULT_PIXEL_SIZE: f32 = 12.0;
