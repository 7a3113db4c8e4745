// src/config.rs
use crate::constants::{
    DEFAULT_GENERIC_ENTRY_COUNT, DEFAULT_LANGUAGE, MAX_GENERIC_ENTRIES, SMALL_SURFACE_LIMIT,
};
use crate::error::{PlatformError, PlatformResult};

#[derive(Clone, Debug)]
pub struct PlatformConfig {
    /// Largest surface footprint, in bytes, that stays on the process heap
    pub small_surface_limit: usize,
    /// Leading font list entries that are generic aliases rather than faces
    pub generic_entry_count: usize,
    pub default_language: String,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            small_surface_limit: SMALL_SURFACE_LIMIT,
            generic_entry_count: DEFAULT_GENERIC_ENTRY_COUNT,
            default_language: DEFAULT_LANGUAGE.to_string(),
        }
    }
}

impl PlatformConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_small_surface_limit(mut self, bytes: usize) -> Self {
        self.small_surface_limit = bytes;
        self
    }

    pub fn with_generic_entry_count(mut self, count: usize) -> Self {
        self.generic_entry_count = count;
        self
    }

    pub fn with_default_language(mut self, language: &str) -> Self {
        self.default_language = language.to_string();
        self
    }

    pub fn validate(&self) -> PlatformResult<()> {
        if self.generic_entry_count > MAX_GENERIC_ENTRIES {
            return Err(PlatformError::Configuration {
                field: "generic_entry_count".to_string(),
                value: self.generic_entry_count.to_string(),
            });
        }
        if self.default_language.is_empty() {
            return Err(PlatformError::Configuration {
                field: "default_language".to_string(),
                value: String::new(),
            });
        }
        Ok(())
    }
}
