//! Scoped face locking

use crate::traits::FontInstance;
use std::ops::Deref;

/// A locked face, unlocked again when the guard drops
pub struct FaceLock<'a, F: FontInstance + ?Sized> {
    font: &'a F,
    face: &'a F::Face,
}

impl<'a, F: FontInstance + ?Sized> FaceLock<'a, F> {
    /// Lock `font`'s face, or `None` if it cannot be acquired
    pub fn acquire(font: &'a F) -> Option<Self> {
        font.lock_face().map(|face| Self { font, face })
    }
}

impl<F: FontInstance + ?Sized> Deref for FaceLock<'_, F> {
    type Target = F::Face;

    fn deref(&self) -> &Self::Target {
        self.face
    }
}

impl<F: FontInstance + ?Sized> Drop for FaceLock<'_, F> {
    fn drop(&mut self) {
        self.font.unlock_face();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dummy_backend::DummyFont;
    use crate::traits::FaceCharmap;

    #[test]
    fn test_guard_unlocks_on_drop() {
        let font = DummyFont::new("Arial", &[0x41]);
        {
            let face = FaceLock::acquire(&font).expect("lockable");
            assert!(font.is_locked());
            assert_eq!(face.glyph_index(0x41), 1);
        }
        assert!(!font.is_locked());
        assert_eq!(font.lock_count(), 1);
        assert_eq!(font.unlock_count(), 1);
    }

    #[test]
    fn test_failed_acquire_needs_no_unlock() {
        let font = DummyFont::new("Broken", &[]).failing_lock();
        assert!(FaceLock::acquire(&font).is_none());
        assert_eq!(font.unlock_count(), 0);
    }
}
