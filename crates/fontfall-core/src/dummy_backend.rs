//! In-memory collaborators for testing the platform layer without system fonts

use crate::error::{CatalogError, PlatformError};
use crate::font::{FontNameMatches, FontStyle};
use crate::surface::{BackendChoice, SurfaceRequest};
use crate::traits::{FaceCharmap, FontCatalog, FontInstance, FontInstanceCache, SurfaceFactory};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex, PoisonError, RwLock};

/// Catalog serving a fixed family list, counting every call
#[derive(Debug, Default)]
pub struct StaticCatalog {
    families: RwLock<Vec<String>>,
    pending: Mutex<Option<Vec<String>>>,
    font_list_calls: AtomicUsize,
    update_calls: AtomicUsize,
    fail_font_list: AtomicBool,
    fail_update: AtomicBool,
    fail_init: AtomicBool,
    shut_down: AtomicBool,
}

impl StaticCatalog {
    pub fn new(families: Vec<String>) -> Self {
        Self {
            families: RwLock::new(families),
            ..Self::default()
        }
    }

    /// List served after the next successful `update_font_list`
    pub fn install(&self, families: Vec<String>) {
        *self.pending.lock().unwrap_or_else(PoisonError::into_inner) = Some(families);
    }

    pub fn fail_font_list(&self, fail: bool) {
        self.fail_font_list.store(fail, Ordering::SeqCst);
    }

    pub fn fail_update(&self, fail: bool) {
        self.fail_update.store(fail, Ordering::SeqCst);
    }

    pub fn fail_init(&self, fail: bool) {
        self.fail_init.store(fail, Ordering::SeqCst);
    }

    pub fn font_list_calls(&self) -> usize {
        self.font_list_calls.load(Ordering::SeqCst)
    }

    pub fn update_calls(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down.load(Ordering::SeqCst)
    }

    fn families(&self) -> Vec<String> {
        self.families
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl FontCatalog for StaticCatalog {
    fn init(&self) -> Result<(), CatalogError> {
        if self.fail_init.load(Ordering::SeqCst) {
            return Err(CatalogError::Unavailable {
                message: "static catalog refused to start".to_string(),
            });
        }
        Ok(())
    }

    fn shutdown(&self) {
        self.shut_down.store(true, Ordering::SeqCst);
    }

    fn font_list(&self, _language: &str, _generic_hint: &str) -> Result<Vec<String>, CatalogError> {
        self.font_list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_font_list.load(Ordering::SeqCst) {
            return Err(CatalogError::Unavailable {
                message: "font list enumeration failed".to_string(),
            });
        }
        Ok(self.families())
    }

    fn update_font_list(&self) -> Result<(), CatalogError> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_update.load(Ordering::SeqCst) {
            return Err(CatalogError::Unavailable {
                message: "font list refresh failed".to_string(),
            });
        }
        if let Some(families) = self.pending.lock().unwrap_or_else(PoisonError::into_inner).take() {
            *self.families.write().unwrap_or_else(PoisonError::into_inner) = families;
        }
        Ok(())
    }

    fn resolve_font_name(&self, name: &str) -> Result<FontNameMatches, CatalogError> {
        Ok(self
            .families()
            .into_iter()
            .filter(|family| family.eq_ignore_ascii_case(name))
            .collect())
    }

    fn standard_family_name(&self, name: &str) -> Result<Option<String>, CatalogError> {
        Ok(self
            .families()
            .into_iter()
            .find(|family| family.eq_ignore_ascii_case(name)))
    }
}

/// Charmap of a [`DummyFont`]
#[derive(Debug, Default)]
pub struct DummyFace {
    glyphs: HashMap<u32, u32>,
    has_charmap: bool,
}

impl FaceCharmap for DummyFace {
    fn has_charmap(&self) -> bool {
        self.has_charmap
    }

    fn glyph_index(&self, codepoint: u32) -> u32 {
        self.glyphs.get(&codepoint).copied().unwrap_or(0)
    }
}

/// Font instance that records how its face was locked
#[derive(Debug)]
pub struct DummyFont {
    family: String,
    face: DummyFace,
    lockable: bool,
    locked: Mutex<bool>,
    released: Condvar,
    locks: AtomicUsize,
    unlocks: AtomicUsize,
}

impl DummyFont {
    /// A font covering `codepoints`, with glyph ids assigned from 1
    pub fn new(family: &str, codepoints: &[u32]) -> Self {
        let glyphs = codepoints
            .iter()
            .enumerate()
            .map(|(i, &cp)| (cp, i as u32 + 1))
            .collect();
        Self {
            family: family.to_string(),
            face: DummyFace {
                glyphs,
                has_charmap: true,
            },
            lockable: true,
            locked: Mutex::new(false),
            released: Condvar::new(),
            locks: AtomicUsize::new(0),
            unlocks: AtomicUsize::new(0),
        }
    }

    /// Every lock attempt fails, as for a face that cannot be loaded
    pub fn failing_lock(mut self) -> Self {
        self.lockable = false;
        self
    }

    pub fn without_charmap(mut self) -> Self {
        self.face.has_charmap = false;
        self
    }

    pub fn is_locked(&self) -> bool {
        *self.locked.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn lock_count(&self) -> usize {
        self.locks.load(Ordering::SeqCst)
    }

    pub fn unlock_count(&self) -> usize {
        self.unlocks.load(Ordering::SeqCst)
    }
}

impl FontInstance for DummyFont {
    type Face = DummyFace;

    fn family(&self) -> &str {
        &self.family
    }

    /// Waits while another caller holds the face
    fn lock_face(&self) -> Option<&DummyFace> {
        if !self.lockable {
            return None;
        }
        let mut locked = self.locked.lock().unwrap_or_else(PoisonError::into_inner);
        while *locked {
            locked = self
                .released
                .wait(locked)
                .unwrap_or_else(PoisonError::into_inner);
        }
        *locked = true;
        self.locks.fetch_add(1, Ordering::SeqCst);
        Some(&self.face)
    }

    fn unlock_face(&self) {
        self.unlocks.fetch_add(1, Ordering::SeqCst);
        *self.locked.lock().unwrap_or_else(PoisonError::into_inner) = false;
        self.released.notify_one();
    }
}

/// Instance cache over a fixed set of fonts, logging every lookup
#[derive(Debug, Default)]
pub struct DummyInstanceCache {
    fonts: HashMap<String, Arc<DummyFont>>,
    lookups: Mutex<Vec<String>>,
}

impl DummyInstanceCache {
    pub fn new(fonts: Vec<DummyFont>) -> Self {
        Self {
            fonts: fonts
                .into_iter()
                .map(|font| (font.family.clone(), Arc::new(font)))
                .collect(),
            lookups: Mutex::new(Vec::new()),
        }
    }

    pub fn font(&self, family: &str) -> Option<Arc<DummyFont>> {
        self.fonts.get(family).cloned()
    }

    /// Families requested so far, in order
    pub fn lookups(&self) -> Vec<String> {
        self.lookups
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl FontInstanceCache for DummyInstanceCache {
    type Font = DummyFont;

    fn get_or_make_font(&self, family: &str, _style: &FontStyle) -> Option<Arc<DummyFont>> {
        self.lookups
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(family.to_string());
        self.fonts.get(family).cloned()
    }
}

/// Surface produced by [`HeapSurfaceFactory`]
#[derive(Debug, Clone)]
pub struct DummySurface {
    pub backend: BackendChoice,
    pub request: SurfaceRequest,
    pub stride: usize,
    pub data: Vec<u8>,
}

/// Surface factory that backs both choices with zeroed heap buffers
#[derive(Debug, Default)]
pub struct HeapSurfaceFactory {
    fail_native: bool,
}

impl HeapSurfaceFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_native() -> Self {
        Self { fail_native: true }
    }

    fn build(
        backend: BackendChoice,
        request: &SurfaceRequest,
        stride: usize,
    ) -> Result<DummySurface, PlatformError> {
        let len = stride
            .checked_mul(request.height as usize)
            .ok_or_else(|| PlatformError::SurfaceCreation {
                backend: backend.to_string(),
                message: format!("{}x{} overflows", request.width, request.height),
            })?;
        Ok(DummySurface {
            backend,
            request: *request,
            stride,
            data: vec![0; len],
        })
    }
}

impl SurfaceFactory for HeapSurfaceFactory {
    type Surface = DummySurface;

    fn create_lightweight(
        &self,
        request: &SurfaceRequest,
        stride: usize,
    ) -> Result<DummySurface, PlatformError> {
        Self::build(BackendChoice::Lightweight, request, stride)
    }

    fn create_native(
        &self,
        request: &SurfaceRequest,
        stride: usize,
    ) -> Result<DummySurface, PlatformError> {
        if self.fail_native {
            return Err(PlatformError::SurfaceCreation {
                backend: BackendChoice::Native.to_string(),
                message: "no system surface available".to_string(),
            });
        }
        Self::build(BackendChoice::Native, request, stride)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_dummy_font_lock_waits_for_release() {
        let font = Arc::new(DummyFont::new("Arial", &[0x41, 0x42]));
        assert!(font.lock_face().is_some());

        let waiter = {
            let font = Arc::clone(&font);
            thread::spawn(move || {
                let acquired = font.lock_face().is_some();
                font.unlock_face();
                acquired
            })
        };
        thread::sleep(Duration::from_millis(20));
        assert!(font.is_locked());
        font.unlock_face();

        assert!(waiter.join().unwrap());
        assert!(!font.is_locked());
        assert_eq!(font.lock_count(), 2);
        assert_eq!(font.unlock_count(), 2);
    }

    #[test]
    fn test_failing_lock_never_acquires() {
        let font = DummyFont::new("Broken", &[0x41]).failing_lock();
        assert!(font.lock_face().is_none());
        assert_eq!(font.lock_count(), 0);
    }

    #[test]
    fn test_static_catalog_update() {
        let catalog = StaticCatalog::new(vec!["Arial".to_string()]);
        catalog.install(vec!["Arial".to_string(), "Noto Sans CJK".to_string()]);
        assert_eq!(catalog.font_list("en", "").unwrap().len(), 1);

        catalog.update_font_list().unwrap();
        assert_eq!(catalog.font_list("en", "").unwrap().len(), 2);
        assert_eq!(
            catalog.standard_family_name("noto sans cjk").unwrap().as_deref(),
            Some("Noto Sans CJK")
        );
    }
}
