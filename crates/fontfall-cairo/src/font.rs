//! fontdue-backed font instances

use crate::catalog::{FaceEntry, SystemCatalog};
use fontdue::{Font, FontSettings};
use fontfall_core::{FaceCharmap, FontInstance, FontInstanceCache, FontStyle};
use lru::LruCache;
use std::num::NonZeroUsize;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex, PoisonError};

/// Instances kept before the least recently used one is dropped
pub const DEFAULT_MAX_INSTANCES: usize = 512;

/// Font loading error types
#[derive(Debug, thiserror::Error)]
pub enum FontLoadError {
    #[error("Font file unreadable: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid font data: {0}")]
    InvalidFontData(&'static str),

    #[error("Family has no font files: {0}")]
    NoFaces(String),
}

/// Parsed face data of one font file
pub struct FontdueFace {
    font: Font,
}

impl FaceCharmap for FontdueFace {
    fn has_charmap(&self) -> bool {
        !self.font.chars().is_empty()
    }

    fn glyph_index(&self, codepoint: u32) -> u32 {
        match char::from_u32(codepoint) {
            Some(ch) => u32::from(self.font.lookup_glyph_index(ch)),
            None => 0,
        }
    }
}

/// A family's face loaded at one style
///
/// `lock_face` waits until any other holder unlocks, so a busy face is never
/// mistaken for one that lacks the glyph.
pub struct FontdueInstance {
    family: String,
    style: FontStyle,
    face: FontdueFace,
    locked: Mutex<bool>,
    released: Condvar,
}

impl std::fmt::Debug for FontdueInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontdueInstance")
            .field("family", &self.family)
            .field("style", &self.style)
            .field("locked", &self.is_locked())
            .finish()
    }
}

impl FontdueInstance {
    pub fn load(family: &str, style: &FontStyle, path: &Path) -> Result<Self, FontLoadError> {
        let data = std::fs::read(path)?;
        let settings = FontSettings {
            scale: style.pixel_size,
            ..Default::default()
        };
        let font = Font::from_bytes(data, settings).map_err(FontLoadError::InvalidFontData)?;
        Ok(Self {
            family: family.to_string(),
            style: style.clone(),
            face: FontdueFace { font },
            locked: Mutex::new(false),
            released: Condvar::new(),
        })
    }

    pub fn style(&self) -> &FontStyle {
        &self.style
    }

    pub fn is_locked(&self) -> bool {
        *self.locked.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The underlying fontdue font, for rasterizing once resolved
    pub fn font(&self) -> &Font {
        &self.face.font
    }
}

impl FontInstance for FontdueInstance {
    type Face = FontdueFace;

    fn family(&self) -> &str {
        &self.family
    }

    fn lock_face(&self) -> Option<&FontdueFace> {
        let mut locked = self.locked.lock().unwrap_or_else(PoisonError::into_inner);
        while *locked {
            locked = self
                .released
                .wait(locked)
                .unwrap_or_else(PoisonError::into_inner);
        }
        *locked = true;
        Some(&self.face)
    }

    fn unlock_face(&self) {
        *self.locked.lock().unwrap_or_else(PoisonError::into_inner) = false;
        self.released.notify_one();
    }
}

type InstanceKey = (String, FontStyle);

/// Loads fonts named by a [`SystemCatalog`] on first use
///
/// Failed loads are remembered as well, so a broken file is read once per
/// catalog generation. Everything is dropped when the catalog rescans, and at
/// most `capacity` instances are kept. Files are read without holding the
/// cache lock; when two callers load the same font, the first insert wins.
pub struct FontdueInstanceCache {
    catalog: Arc<SystemCatalog>,
    instances: Mutex<LruCache<InstanceKey, Option<Arc<FontdueInstance>>>>,
    generation: AtomicU64,
}

impl FontdueInstanceCache {
    pub fn new(catalog: Arc<SystemCatalog>) -> Self {
        Self::with_capacity(catalog, DEFAULT_MAX_INSTANCES)
    }

    /// A zero capacity falls back to [`DEFAULT_MAX_INSTANCES`]
    pub fn with_capacity(catalog: Arc<SystemCatalog>, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity)
            .or(NonZeroUsize::new(DEFAULT_MAX_INSTANCES))
            .unwrap_or(NonZeroUsize::MIN);
        let generation = catalog.generation();
        Self {
            catalog,
            instances: Mutex::new(LruCache::new(capacity)),
            generation: AtomicU64::new(generation),
        }
    }

    /// Get number of cached entries, failed loads included
    pub fn len(&self) -> usize {
        self.instances
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.instances
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .cap()
            .get()
    }

    pub fn clear(&self) {
        self.instances
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn load(&self, family: &str, style: &FontStyle) -> Result<FontdueInstance, FontLoadError> {
        let faces = self.catalog.faces(family);
        let entry = best_face(&faces, style)
            .ok_or_else(|| FontLoadError::NoFaces(family.to_string()))?;
        FontdueInstance::load(family, style, &entry.path)
    }
}

impl FontInstanceCache for FontdueInstanceCache {
    type Font = FontdueInstance;

    fn get_or_make_font(&self, family: &str, style: &FontStyle) -> Option<Arc<FontdueInstance>> {
        let key = (family.to_string(), style.clone());

        let generation = {
            let mut instances = self.instances.lock().unwrap_or_else(PoisonError::into_inner);
            let current = self.catalog.generation();
            if self.generation.swap(current, Ordering::AcqRel) != current {
                tracing::debug!("Font catalog changed, dropping {} instances", instances.len());
                instances.clear();
            }
            if let Some(cached) = instances.get(&key) {
                return cached.clone();
            }
            current
        };

        let loaded = match self.load(family, style) {
            Ok(instance) => Some(Arc::new(instance)),
            Err(e) => {
                tracing::warn!("Failed to load font {}: {}", family, e);
                None
            }
        };

        let mut instances = self.instances.lock().unwrap_or_else(PoisonError::into_inner);
        if self.catalog.generation() != generation {
            // Loaded from a catalog that has since rescanned
            return loaded;
        }
        if let Some(cached) = instances.get(&key) {
            return cached.clone();
        }
        instances.put(key, loaded.clone());
        loaded
    }
}

/// Exact weight and slant, then weight alone, then whatever is first
fn best_face<'a>(faces: &'a [FaceEntry], style: &FontStyle) -> Option<&'a FaceEntry> {
    faces
        .iter()
        .find(|f| f.weight == style.weight && f.slant == style.slant)
        .or_else(|| faces.iter().find(|f| f.weight == style.weight))
        .or_else(|| faces.first())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::tests::font_dir;
    use crate::catalog::SystemCatalogConfig;
    use fontfall_core::{FaceLock, FontCatalog, FontSlant, FontWeight};
    use std::path::PathBuf;
    use std::thread;
    use std::time::Duration;

    fn broken_fonts(files: &[&str]) -> Arc<SystemCatalog> {
        let dir = font_dir(files);
        let catalog = Arc::new(SystemCatalog::new(
            SystemCatalogConfig::default()
                .with_search_paths(vec![dir])
                .with_fontconfig(false),
        ));
        catalog.init().unwrap();
        catalog
    }

    fn entry(name: &str, weight: FontWeight, slant: FontSlant) -> FaceEntry {
        FaceEntry {
            path: PathBuf::from(name),
            weight,
            slant,
        }
    }

    /// First real font file under the usual system directories, if any
    fn system_font() -> Option<PathBuf> {
        let catalog = SystemCatalog::new(SystemCatalogConfig::default().with_fontconfig(false));
        catalog.init().ok()?;
        let families = catalog.families();
        families
            .iter()
            .flat_map(|family| catalog.faces(family))
            .map(|face| face.path)
            .find(|path| {
                path.extension()
                    .and_then(|e| e.to_str())
                    .map_or(false, |e| e.eq_ignore_ascii_case("ttf"))
            })
    }

    #[test]
    fn test_best_face() {
        let faces = vec![
            entry("Regular", FontWeight::Normal, FontSlant::Normal),
            entry("Bold", FontWeight::Bold, FontSlant::Normal),
            entry("BoldItalic", FontWeight::Bold, FontSlant::Italic),
        ];
        let bold_italic = FontStyle::default()
            .with_weight(FontWeight::Bold)
            .with_slant(FontSlant::Italic);
        let italic = FontStyle::default().with_slant(FontSlant::Italic);

        assert_eq!(best_face(&faces, &bold_italic).unwrap().path, PathBuf::from("BoldItalic"));
        assert_eq!(best_face(&faces, &italic).unwrap().path, PathBuf::from("Regular"));
        assert!(best_face(&[], &italic).is_none());
    }

    #[test]
    fn test_invalid_font_is_unusable_and_remembered() {
        let catalog = broken_fonts(&["Broken.ttf"]);

        let cache = FontdueInstanceCache::new(Arc::clone(&catalog));
        assert!(cache.get_or_make_font("Broken", &FontStyle::default()).is_none());
        assert!(cache.get_or_make_font("Missing", &FontStyle::default()).is_none());
        assert_eq!(cache.len(), 2);

        catalog.update_font_list().unwrap();
        assert!(cache.get_or_make_font("Broken", &FontStyle::default()).is_none());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_sizes_are_bounded() {
        let catalog = broken_fonts(&["Broken.ttf"]);
        let cache = FontdueInstanceCache::with_capacity(catalog, 8);
        assert_eq!(cache.capacity(), 8);

        for size in 1..=100 {
            let style = FontStyle::default().with_pixel_size(size as f32);
            assert!(cache.get_or_make_font("Broken", &style).is_none());
        }
        assert_eq!(cache.len(), 8);

        let fallback = FontdueInstanceCache::with_capacity(broken_fonts(&[]), 0);
        assert_eq!(fallback.capacity(), DEFAULT_MAX_INSTANCES);
    }

    #[test]
    fn test_concurrent_loads_share_one_entry() {
        let catalog = broken_fonts(&["Broken.ttf", "AlsoBroken.otf"]);
        let cache = Arc::new(FontdueInstanceCache::new(catalog));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || {
                    for family in ["Broken", "AlsoBroken"] {
                        assert!(cache.get_or_make_font(family, &FontStyle::default()).is_none());
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_real_font_lookup_and_lock() {
        let Some(path) = system_font() else {
            eprintln!("No system fonts available - skipping");
            return;
        };
        let instance = match FontdueInstance::load("System", &FontStyle::default(), &path) {
            Ok(instance) => instance,
            Err(e) => {
                eprintln!("Could not parse {}: {}", path.display(), e);
                return;
            }
        };

        let instance = Arc::new(instance);
        let face = FaceLock::acquire(&*instance).expect("unlocked face");
        assert!(instance.is_locked());
        assert_eq!(face.glyph_index(0xD800), 0);
        assert_eq!(face.glyph_index(0x110000), 0);

        // A second caller waits for the holder instead of failing
        let waiter = {
            let instance = Arc::clone(&instance);
            thread::spawn(move || {
                let acquired = FaceLock::acquire(&*instance).is_some();
                acquired
            })
        };
        thread::sleep(Duration::from_millis(20));
        drop(face);

        assert!(waiter.join().unwrap());
        assert!(!instance.is_locked());
    }
}
