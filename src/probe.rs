//! Coverage probing for the `fontfall` binary

use crate::error::{ProbeError, ProbeResult};
use fontfall_core::constants::MAX_CODEPOINT;
use fontfall_core::{FontCatalog, FontInstance, FontInstanceCache, FontStyle, Platform, RowStride};
use std::fmt;

/// Parse "U+4E00", "0x4e00", "19968" or a single character
pub fn parse_codepoint(arg: &str) -> ProbeResult<u32> {
    let invalid = || ProbeError::InvalidCodepoint(arg.to_string());

    let hex = arg
        .strip_prefix("U+")
        .or_else(|| arg.strip_prefix("u+"))
        .or_else(|| arg.strip_prefix("0x"))
        .or_else(|| arg.strip_prefix("0X"));

    let codepoint = if let Some(hex) = hex {
        u32::from_str_radix(hex, 16).map_err(|_| invalid())?
    } else if let Ok(decimal) = arg.parse::<u32>() {
        decimal
    } else {
        let mut chars = arg.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => ch as u32,
            _ => return Err(invalid()),
        }
    };

    if codepoint > MAX_CODEPOINT {
        return Err(invalid());
    }
    Ok(codepoint)
}

/// Parse a surface size such as "64x64"
pub fn parse_surface_size(arg: &str) -> ProbeResult<(u32, u32)> {
    let invalid = || ProbeError::InvalidSurfaceSize(arg.to_string());
    let (width, height) = arg.split_once(['x', 'X']).ok_or_else(invalid)?;
    Ok((
        width.parse().map_err(|_| invalid())?,
        height.parse().map_err(|_| invalid())?,
    ))
}

/// Outcome of resolving one codepoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverageReport {
    pub codepoint: u32,
    pub family: Option<String>,
}

impl fmt::Display for CoverageReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.family {
            Some(family) => write!(f, "U+{:04X}\t{}", self.codepoint, family),
            None => write!(f, "U+{:04X}\t(no font)", self.codepoint),
        }
    }
}

pub fn probe_codepoints<C, F, S>(
    platform: &Platform<C, F, S>,
    codepoints: &[u32],
    style: &FontStyle,
) -> Vec<CoverageReport>
where
    C: FontCatalog,
    F: FontInstanceCache,
    S: RowStride,
{
    codepoints
        .iter()
        .map(|&codepoint| CoverageReport {
            codepoint,
            family: platform
                .find_font_for_char(codepoint, style)
                .map(|font| font.family().to_string()),
        })
        .collect()
}
