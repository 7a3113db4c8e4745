//! Lazy family-name matches

use std::sync::Arc;

/// Family names a requested font name resolved to
///
/// Consumers stop early by simply not pulling further items. The sequence is
/// finite and can be replayed with [`restart`](Self::restart) or by cloning
/// before iterating.
#[derive(Debug, Clone, Default)]
pub struct FontNameMatches {
    names: Arc<[String]>,
    pos: usize,
}

impl FontNameMatches {
    pub fn new(names: impl Into<Arc<[String]>>) -> Self {
        Self {
            names: names.into(),
            pos: 0,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Rewind to the first match
    pub fn restart(&mut self) {
        self.pos = 0;
    }

    /// Total number of matches, consumed or not
    pub fn total(&self) -> usize {
        self.names.len()
    }
}

impl Iterator for FontNameMatches {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let name = self.names.get(self.pos)?.clone();
        self.pos += 1;
        Some(name)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.names.len() - self.pos;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for FontNameMatches {}

impl FromIterator<String> for FontNameMatches {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect::<Vec<_>>())
    }
}
