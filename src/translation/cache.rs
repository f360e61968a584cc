/*!
 * Translation caching functionality.
 *
 * Successful translations are memoized per source text and normalized
 * language so repeated cells in a column cost a single provider call.
 * Failures are never stored.
 */

use log::debug;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Cache key combining source text and target language subtag
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    text: String,
    language: String,
}

impl CacheKey {
    fn new(text: &str, language: &str) -> Self {
        Self {
            text: text.to_string(),
            language: language.to_string(),
        }
    }
}

/// Hit and miss counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
}

impl CacheStats {
    /// Fraction of lookups answered from the cache
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total > 0 {
            self.hits as f64 / total as f64
        } else {
            0.0
        }
    }
}

/// Translation cache for storing and retrieving translations
#[derive(Debug, Clone)]
pub struct TranslationCache {
    /// Entries shared between clones
    entries: Arc<RwLock<HashMap<CacheKey, String>>>,

    /// Lookup counters
    stats: Arc<RwLock<CacheStats>>,

    /// Whether caching is enabled
    enabled: bool,
}

impl TranslationCache {
    /// Create a new translation cache
    pub fn new(enabled: bool) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            stats: Arc::new(RwLock::new(CacheStats::default())),
            enabled,
        }
    }

    /// Look up a previous successful translation
    pub fn get(&self, text: &str, language: &str) -> Option<String> {
        if !self.enabled {
            return None;
        }

        let found = self.entries.read().get(&CacheKey::new(text, language)).cloned();
        let mut stats = self.stats.write();
        match found {
            Some(translation) => {
                stats.hits += 1;
                debug!("Cache hit for '{}' ({})", truncate_text(text, 30), language);
                Some(translation)
            }
            None => {
                stats.misses += 1;
                None
            }
        }
    }

    /// Remember a successful translation
    pub fn store(&self, text: &str, language: &str, translation: &str) {
        if !self.enabled {
            return;
        }
        self.entries
            .write()
            .insert(CacheKey::new(text, language), translation.to_string());
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        *self.stats.read()
    }

    /// Drop every entry and reset the counters
    pub fn clear(&self) {
        self.entries.write().clear();
        *self.stats.write() = CacheStats::default();
        debug!("Translation cache cleared");
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl Default for TranslationCache {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Truncate text to at most `max_chars` characters with an ellipsis
fn truncate_text(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => format!("{}...", &text[..end]),
        None => text.to_string(),
    }
}
