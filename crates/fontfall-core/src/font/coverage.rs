//! Per-codepoint memo of "no installed font covers this"

use crate::constants::{C0_CONTROLS, C1_CONTROLS, MAX_CODEPOINT};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};

const WORD_BITS: u32 = u64::BITS;
const WORD_COUNT: usize = ((MAX_CODEPOINT + 1) / WORD_BITS) as usize;

/// Bit set over the whole Unicode code space (0..=0x10FFFF)
///
/// Bits are only ever set individually; the only way to clear one is
/// [`reset_all`](Self::reset_all), which is called when the installed font
/// list changes. Both control ranges are set at creation and after every reset.
///
/// Codepoints above 0x10FFFF are rejected: [`test`](Self::test) reports them
/// as uncovered and [`set`](Self::set) ignores them.
///
/// `test` and `set` are atomic word operations under a shared guard, so they
/// run concurrently with each other. `reset_all` takes the guard exclusively
/// and bumps the [`generation`](Self::generation); a miss found against an
/// older generation is dropped by [`set_if_generation`](Self::set_if_generation).
pub struct NegativeCoverageCache {
    words: RwLock<Box<[AtomicU64]>>,
    // Only written under the write guard
    generation: AtomicU64,
}

impl Default for NegativeCoverageCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for NegativeCoverageCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NegativeCoverageCache")
            .field("set_bits", &self.len())
            .finish()
    }
}

impl NegativeCoverageCache {
    /// Create a cache with only the control-character presets set
    pub fn new() -> Self {
        let words: Box<[AtomicU64]> = (0..WORD_COUNT).map(|_| AtomicU64::new(0)).collect();
        apply_presets(&words);
        Self {
            words: RwLock::new(words),
            generation: AtomicU64::new(0),
        }
    }

    /// True if `codepoint` is known to have no font
    #[inline]
    pub fn test(&self, codepoint: u32) -> bool {
        let Some((word, mask)) = locate(codepoint) else {
            return true;
        };
        let words = self.words.read().unwrap_or_else(PoisonError::into_inner);
        words[word].load(Ordering::Relaxed) & mask != 0
    }

    /// Record that no font covers `codepoint`
    #[inline]
    pub fn set(&self, codepoint: u32) {
        if let Some((word, mask)) = locate(codepoint) {
            let words = self.words.read().unwrap_or_else(PoisonError::into_inner);
            words[word].fetch_or(mask, Ordering::Relaxed);
        }
    }

    /// Record a miss found while the cache was at `generation`
    ///
    /// Returns false, recording nothing, if a reset happened since.
    pub fn set_if_generation(&self, codepoint: u32, generation: u64) -> bool {
        let words = self.words.read().unwrap_or_else(PoisonError::into_inner);
        if self.generation.load(Ordering::Acquire) != generation {
            return false;
        }
        if let Some((word, mask)) = locate(codepoint) {
            words[word].fetch_or(mask, Ordering::Relaxed);
        }
        true
    }

    /// Number of resets so far
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Set every codepoint in `first..=last`; the range is clipped to 0x10FFFF
    pub fn set_range(&self, first: u32, last: u32) {
        let words = self.words.read().unwrap_or_else(PoisonError::into_inner);
        set_range_in(&words, first, last);
    }

    /// Forget every recorded miss and restore the control presets
    pub fn reset_all(&self) {
        let words = self.words.write().unwrap_or_else(PoisonError::into_inner);
        for word in words.iter() {
            word.store(0, Ordering::Relaxed);
        }
        apply_presets(&words);
        self.generation.fetch_add(1, Ordering::AcqRel);
    }

    /// Number of codepoints currently marked uncovered
    pub fn len(&self) -> usize {
        let words = self.words.read().unwrap_or_else(PoisonError::into_inner);
        words
            .iter()
            .map(|word| word.load(Ordering::Relaxed).count_ones() as usize)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[inline]
fn locate(codepoint: u32) -> Option<(usize, u64)> {
    if codepoint > MAX_CODEPOINT {
        return None;
    }
    Some((
        (codepoint / WORD_BITS) as usize,
        1u64 << (codepoint % WORD_BITS),
    ))
}

fn set_range_in(words: &[AtomicU64], first: u32, last: u32) {
    let last = last.min(MAX_CODEPOINT);
    for codepoint in first..=last {
        if let Some((word, mask)) = locate(codepoint) {
            words[word].fetch_or(mask, Ordering::Relaxed);
        }
    }
}

fn apply_presets(words: &[AtomicU64]) {
    set_range_in(words, C0_CONTROLS.0, C0_CONTROLS.1);
    set_range_in(words, C1_CONTROLS.0, C1_CONTROLS.1);
}
