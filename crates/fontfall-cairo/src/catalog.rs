//! System font catalog built from the installed font files

use fontfall_core::constants::DEFAULT_GENERIC_FAMILIES;
use fontfall_core::{CatalogError, FontCatalog, FontNameMatches, FontSlant, FontWeight};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

// Font directories are rarely nested deeper than vendor/family/file
const MAX_SCAN_DEPTH: usize = 4;

/// One font file of a family
#[derive(Debug, Clone, PartialEq)]
pub struct FaceEntry {
    pub path: PathBuf,
    pub weight: FontWeight,
    pub slant: FontSlant,
}

#[derive(Debug, Clone)]
pub struct SystemCatalogConfig {
    pub search_paths: Vec<PathBuf>,
    /// Aliases placed ahead of the concrete families in every font list
    pub generic_families: Vec<String>,
    /// Ask fontconfig before scanning directories (Linux, `font-discovery`)
    pub use_fontconfig: bool,
    /// Concrete families a generic alias stands for, keyed by normalized alias
    pub generic_aliases: HashMap<String, Vec<String>>,
}

impl Default for SystemCatalogConfig {
    fn default() -> Self {
        Self {
            search_paths: default_search_paths(),
            generic_families: DEFAULT_GENERIC_FAMILIES.iter().map(|s| s.to_string()).collect(),
            use_fontconfig: cfg!(feature = "font-discovery"),
            generic_aliases: HashMap::new(),
        }
    }
}

impl SystemCatalogConfig {
    pub fn with_search_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.search_paths = paths;
        self
    }

    pub fn with_fontconfig(mut self, enabled: bool) -> Self {
        self.use_fontconfig = enabled;
        self
    }

    /// Map `alias` (e.g. "monospace") to preferred families, in order
    pub fn with_generic_alias(mut self, alias: &str, families: &[&str]) -> Self {
        self.generic_aliases.insert(
            normalize(alias),
            families.iter().map(|s| s.to_string()).collect(),
        );
        self
    }
}

#[derive(Debug, Default)]
struct Snapshot {
    /// Display names, sorted case-insensitively
    families: Arc<[String]>,
    /// Normalized family name -> faces
    faces: HashMap<String, Vec<FaceEntry>>,
}

/// Catalog of installed families, rebuilt on `update_font_list`
///
/// Families are named after their file stems with any style suffix removed,
/// so "DejaVuSans-BoldOblique.ttf" lands in family "DejaVuSans". Files are not
/// parsed here; unreadable ones surface later as unusable instances.
#[derive(Debug)]
pub struct SystemCatalog {
    config: SystemCatalogConfig,
    snapshot: RwLock<Arc<Snapshot>>,
    generation: AtomicU64,
}

impl SystemCatalog {
    pub fn new(config: SystemCatalogConfig) -> Self {
        Self {
            config,
            snapshot: RwLock::new(Arc::new(Snapshot::default())),
            generation: AtomicU64::new(0),
        }
    }

    /// Bumped on every successful rescan
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Concrete family names, without the generic aliases
    pub fn families(&self) -> Arc<[String]> {
        Arc::clone(&self.snapshot().families)
    }

    pub fn faces(&self, family: &str) -> Vec<FaceEntry> {
        self.snapshot()
            .faces
            .get(&normalize(family))
            .cloned()
            .unwrap_or_default()
    }

    fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&self.snapshot.read().unwrap_or_else(PoisonError::into_inner))
    }

    fn rescan(&self) -> Result<(), CatalogError> {
        let files = self.discover()?;

        let mut names: HashMap<String, String> = HashMap::new();
        let mut faces: HashMap<String, Vec<FaceEntry>> = HashMap::new();
        for (family, entry) in files {
            let key = normalize(&family);
            names.entry(key.clone()).or_insert(family);
            let entries = faces.entry(key).or_default();
            if !entries.contains(&entry) {
                entries.push(entry);
            }
        }

        let mut families: Vec<String> = names.into_values().collect();
        families.sort_by_key(|name| name.to_lowercase());

        tracing::info!("Font catalog holds {} families", families.len());

        *self.snapshot.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(Snapshot {
            families: families.into(),
            faces,
        });
        self.generation.fetch_add(1, Ordering::AcqRel);
        Ok(())
    }

    fn discover(&self) -> Result<Vec<(String, FaceEntry)>, CatalogError> {
        #[cfg(all(target_os = "linux", feature = "font-discovery"))]
        {
            if self.config.use_fontconfig {
                match discover_fontconfig() {
                    Ok(found) if !found.is_empty() => return Ok(found),
                    Ok(_) => tracing::debug!("Fontconfig listed no fonts, scanning directories"),
                    Err(e) => tracing::warn!("Fontconfig discovery failed: {}", e),
                }
            }
        }

        discover_in_dirs(&self.config.search_paths)
    }
}

impl FontCatalog for SystemCatalog {
    fn init(&self) -> Result<(), CatalogError> {
        self.rescan()
    }

    fn shutdown(&self) {
        *self.snapshot.write().unwrap_or_else(PoisonError::into_inner) =
            Arc::new(Snapshot::default());
    }

    fn font_list(&self, language: &str, generic_hint: &str) -> Result<Vec<String>, CatalogError> {
        if language.is_empty() {
            return Err(CatalogError::UnknownLanguage(String::new()));
        }

        let snapshot = self.snapshot();
        let mut list =
            Vec::with_capacity(self.config.generic_families.len() + snapshot.families.len());
        if generic_hint.is_empty() {
            list.extend(self.config.generic_families.iter().cloned());
        } else {
            list.push(generic_hint.to_string());
        }
        list.extend(snapshot.families.iter().cloned());
        Ok(list)
    }

    fn update_font_list(&self) -> Result<(), CatalogError> {
        self.rescan()
    }

    /// Configured aliases resolve to their installed families; unconfigured
    /// generic names fall back to matching family names by design class
    fn resolve_font_name(&self, name: &str) -> Result<FontNameMatches, CatalogError> {
        let snapshot = self.snapshot();

        if let Some(preferred) = self.config.generic_aliases.get(&normalize(name)) {
            let installed: Vec<String> = preferred
                .iter()
                .filter_map(|wanted| {
                    let wanted = normalize(wanted);
                    snapshot.families.iter().find(|f| normalize(f) == wanted).cloned()
                })
                .collect();
            if !installed.is_empty() {
                return Ok(FontNameMatches::new(installed));
            }
            tracing::debug!("No configured family for '{}' is installed", name);
        }

        let families = snapshot.families.iter();

        let matches: Vec<String> = match generic_class(name) {
            Some(class) => families.filter(|f| class.matches(f)).cloned().collect(),
            None => {
                let wanted = normalize(name);
                let exact: Vec<String> = families
                    .clone()
                    .filter(|f| normalize(f) == wanted)
                    .cloned()
                    .collect();
                if exact.is_empty() {
                    families.filter(|f| normalize(f).starts_with(&wanted)).cloned().collect()
                } else {
                    exact
                }
            }
        };

        tracing::trace!("'{}' resolves to {} families", name, matches.len());
        Ok(FontNameMatches::new(matches))
    }

    fn standard_family_name(&self, name: &str) -> Result<Option<String>, CatalogError> {
        let wanted = normalize(name);
        Ok(self
            .snapshot()
            .families
            .iter()
            .find(|f| normalize(f) == wanted)
            .cloned())
    }
}

/// Case, space and hyphen insensitive key
fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum GenericClass {
    Serif,
    SansSerif,
    Monospace,
}

impl GenericClass {
    fn matches(self, family: &str) -> bool {
        let lower = family.to_lowercase();
        match self {
            GenericClass::Monospace => is_monospace_name(&lower),
            GenericClass::SansSerif => lower.contains("sans") && !is_monospace_name(&lower),
            GenericClass::Serif => {
                lower.contains("serif") && !lower.contains("sans") && !is_monospace_name(&lower)
            }
        }
    }
}

fn generic_class(name: &str) -> Option<GenericClass> {
    match name.to_lowercase().as_str() {
        "serif" => Some(GenericClass::Serif),
        "sans-serif" | "sans" => Some(GenericClass::SansSerif),
        "monospace" | "mono" => Some(GenericClass::Monospace),
        _ => None,
    }
}

/// Check if a lowercase family name indicates a monospace design
fn is_monospace_name(lower: &str) -> bool {
    [
        "mono", "typewriter", "console", "terminal", "code", "fixed", "courier", "menlo",
        "consolas", "inconsolata", "hack",
    ]
    .iter()
    .any(|hint| lower.contains(hint))
}

/// Check if a file is likely a font file
fn is_font_file(path: &Path) -> bool {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => matches!(ext.to_ascii_lowercase().as_str(), "ttf" | "otf" | "ttc" | "otc"),
        None => false,
    }
}

/// Split "Family-BoldItalic" into the family and its style
pub fn parse_file_stem(stem: &str) -> (String, FontWeight, FontSlant) {
    const STYLE_WORDS: [&str; 12] = [
        "regular", "bold", "italic", "oblique", "book", "medium", "light", "thin", "black",
        "semibold", "heavy", "roman",
    ];

    let (family, suffix) = match stem.rsplit_once('-') {
        Some((family, suffix))
            if !family.is_empty()
                && STYLE_WORDS.iter().any(|w| suffix.to_lowercase().contains(w)) =>
        {
            (family, suffix.to_lowercase())
        }
        _ => (stem, String::new()),
    };

    let weight = if suffix.contains("bold") || suffix.contains("black") || suffix.contains("heavy") {
        FontWeight::Bold
    } else {
        FontWeight::Normal
    };
    let slant = if suffix.contains("italic") || suffix.contains("oblique") {
        FontSlant::Italic
    } else {
        FontSlant::Normal
    };
    (family.to_string(), weight, slant)
}

/// Walk font directories; errors if none of them could be read
fn discover_in_dirs(search_paths: &[PathBuf]) -> Result<Vec<(String, FaceEntry)>, CatalogError> {
    let mut found = Vec::new();
    let mut readable = 0;

    for search_path in search_paths {
        if scan_dir(search_path, 0, &mut found) {
            readable += 1;
        } else {
            tracing::debug!("Font directory {} not readable", search_path.display());
        }
    }

    if readable == 0 && !search_paths.is_empty() {
        return Err(CatalogError::Unavailable {
            message: format!("none of {} font directories could be read", search_paths.len()),
        });
    }
    Ok(found)
}

fn scan_dir(dir: &Path, depth: usize, found: &mut Vec<(String, FaceEntry)>) -> bool {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return false;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            if depth < MAX_SCAN_DEPTH {
                scan_dir(&path, depth + 1, found);
            }
            continue;
        }
        if !is_font_file(&path) {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let (family, weight, slant) = parse_file_stem(stem);
        found.push((family, FaceEntry { path, weight, slant }));
    }
    true
}

/// Discover fonts using the fontconfig library
#[cfg(all(target_os = "linux", feature = "font-discovery"))]
fn discover_fontconfig() -> Result<Vec<(String, FaceEntry)>, CatalogError> {
    let fc = fontconfig::Fontconfig::new().ok_or_else(|| CatalogError::Unavailable {
        message: "fontconfig could not be initialized".to_string(),
    })?;

    let pattern = fontconfig::Pattern::new(&fc);
    let fonts = fontconfig::list_fonts(&pattern, None);

    let mut found = Vec::new();
    for font in fonts.iter() {
        let (Some(name), Some(file)) = (font.name(), font.filename()) else {
            continue;
        };
        let path = PathBuf::from(file);
        let (_, weight, slant) = path
            .file_stem()
            .and_then(|s| s.to_str())
            .map(parse_file_stem)
            .unwrap_or((String::new(), FontWeight::Normal, FontSlant::Normal));
        found.push((name.to_string(), FaceEntry { path, weight, slant }));
    }
    Ok(found)
}

/// Get platform-specific font search paths
pub fn default_search_paths() -> Vec<PathBuf> {
    #[cfg(target_os = "linux")]
    {
        let mut paths: Vec<PathBuf> = vec![
            "/usr/share/fonts".into(),
            "/usr/local/share/fonts".into(),
        ];
        if let Some(home) = std::env::var_os("HOME") {
            paths.push(PathBuf::from(&home).join(".fonts"));
            paths.push(PathBuf::from(home).join(".local/share/fonts"));
        }
        paths
    }

    #[cfg(target_os = "macos")]
    {
        let mut paths: Vec<PathBuf> = vec!["/System/Library/Fonts".into(), "/Library/Fonts".into()];
        if let Some(home) = std::env::var_os("HOME") {
            paths.push(PathBuf::from(home).join("Library/Fonts"));
        }
        paths
    }

    #[cfg(target_os = "windows")]
    {
        vec!["C:\\Windows\\Fonts".into()]
    }

    #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
    {
        vec![]
    }
}
