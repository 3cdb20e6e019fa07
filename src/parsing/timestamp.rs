//! Timestamp normalization.
//!
//! A header timestamp is cleaned up (brackets, narrow no-break spaces,
//! meridiem case) and parsed against the grammar's ordered layout list. The
//! first layout that parses wins.
//!
//! Within one export every timestamp uses the same layout, so the parser
//! remembers the last winning layout per grammar in a [`LayoutCache`]. A
//! cache hit never changes the result: before the cached layout, the parser
//! re-tries the earlier layouts that share its clock (the only ones that
//! could also accept the string), and falls back to the full list if none of
//! them parse.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::NaiveDateTime;

use crate::error::{ChatlensError, Result};

use super::grammar::{LineGrammar, layout_clock};

/// Hit/miss counters of a [`LayoutCache`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

impl CacheStats {
    /// Counters accumulated since `earlier`.
    #[must_use]
    pub fn since(self, earlier: CacheStats) -> CacheStats {
        CacheStats {
            hits: self.hits.saturating_sub(earlier.hits),
            misses: self.misses.saturating_sub(earlier.misses),
        }
    }
}

/// Last successful layout index per grammar.
///
/// Safe to share between threads. A poisoned lock is recovered, since the
/// map only ever holds plain indices.
#[derive(Debug, Default)]
pub struct LayoutCache {
    slots: Mutex<HashMap<LineGrammar, usize>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl LayoutCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn slots(&self) -> MutexGuard<'_, HashMap<LineGrammar, usize>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get(&self, grammar: LineGrammar) -> Option<usize> {
        self.slots().get(&grammar).copied()
    }

    pub fn set(&self, grammar: LineGrammar, layout: usize) {
        self.slots().insert(grammar, layout);
    }

    /// Forgets every remembered layout. Counters are kept.
    pub fn clear(&self) {
        self.slots().clear();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }
}

/// Parses header timestamps for a given grammar.
///
/// # Example
///
/// ```
/// use chatlens::parsing::{LineGrammar, TimestampParser};
///
/// let parser = TimestampParser::new();
/// let ts = parser.parse("8/1/25, 9:00\u{202f}am", LineGrammar::Dashed12h).unwrap();
/// assert_eq!(ts.to_string(), "2025-08-01 09:00:00");
/// ```
#[derive(Debug, Clone)]
pub struct TimestampParser {
    cache: Option<Arc<LayoutCache>>,
}

impl Default for TimestampParser {
    fn default() -> Self {
        Self::new()
    }
}

impl TimestampParser {
    /// A parser with its own layout cache.
    pub fn new() -> Self {
        Self::with_cache(Arc::new(LayoutCache::new()))
    }

    /// A parser that always searches the full layout list.
    pub fn uncached() -> Self {
        Self { cache: None }
    }

    /// A parser using a cache that may be shared with other parsers.
    pub fn with_cache(cache: Arc<LayoutCache>) -> Self {
        Self { cache: Some(cache) }
    }

    pub fn cache(&self) -> Option<&Arc<LayoutCache>> {
        self.cache.as_ref()
    }

    /// Current cache counters (zero when uncached).
    pub fn stats(&self) -> CacheStats {
        self.cache.as_ref().map(|c| c.stats()).unwrap_or_default()
    }

    /// Forgets remembered layouts.
    pub fn reset(&self) {
        if let Some(cache) = &self.cache {
            cache.clear();
        }
    }

    /// Parses `text` with the layouts of `grammar`.
    ///
    /// # Errors
    ///
    /// Returns [`ChatlensError::TimestampParse`] if no layout accepts the text.
    pub fn parse(&self, text: &str, grammar: LineGrammar) -> Result<NaiveDateTime> {
        let normalized = normalize(text);
        let layouts = grammar.layouts();

        if let Some(cache) = &self.cache {
            if let Some(cached) = cache.get(grammar) {
                if let Some((index, ts)) = parse_cached(&normalized, layouts, cached) {
                    cache.record_hit();
                    tracing::trace!(grammar = grammar.name(), layout = layouts[index], "layout cache hit");
                    if index != cached {
                        cache.set(grammar, index);
                    }
                    return Ok(ts);
                }
            }
            cache.record_miss();
        }

        let (index, ts) = parse_any(&normalized, layouts)
            .ok_or_else(|| ChatlensError::timestamp_parse(text.trim(), grammar.name()))?;
        if let Some(cache) = &self.cache {
            cache.set(grammar, index);
        }
        Ok(ts)
    }
}

/// Strips brackets, folds no-break spaces and uppercases the meridiem.
fn normalize(text: &str) -> String {
    let trimmed = text.trim();
    let inner = trimmed
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .unwrap_or(trimmed);
    inner
        .replace(['\u{202f}', '\u{a0}'], " ")
        .trim()
        .to_uppercase()
}

fn parse_layout(text: &str, layout: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, layout).ok()
}

fn parse_any(text: &str, layouts: &[&str]) -> Option<(usize, NaiveDateTime)> {
    layouts
        .iter()
        .enumerate()
        .find_map(|(i, layout)| parse_layout(text, layout).map(|ts| (i, ts)))
}

/// Tries the cached layout, preceded by the earlier layouts sharing its clock.
fn parse_cached(text: &str, layouts: &[&str], cached: usize) -> Option<(usize, NaiveDateTime)> {
    let clock = layout_clock(layouts.get(cached)?);
    layouts[..=cached]
        .iter()
        .enumerate()
        .filter(|(_, layout)| layout_clock(layout) == clock)
        .find_map(|(i, layout)| parse_layout(text, layout).map(|ts| (i, ts)))
}
