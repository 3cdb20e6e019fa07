//! Format detection.
//!
//! Samples the leading lines of a transcript, counts header matches per
//! grammar, and stops as soon as one grammar reaches the confidence
//! threshold. Otherwise the grammar with the most matches wins, ties going to
//! the earlier-registered grammar.

use crate::config::DetectorConfig;
use crate::error::{ChatlensError, Result};

use super::clean_line;
use super::grammar::LineGrammar;

/// Detects the line grammar used by `text`.
///
/// # Errors
///
/// Returns [`ChatlensError::FormatDetection`] if no sampled line matches any
/// grammar.
pub fn detect_grammar(text: &str, config: &DetectorConfig) -> Result<LineGrammar> {
    let grammars = LineGrammar::all();
    let mut scores = vec![0usize; grammars.len()];
    let mut sampled = 0;

    for raw in text.lines().take(config.sample_lines) {
        sampled += 1;
        let line = clean_line(raw);
        if line.chars().count() < config.min_line_len {
            continue;
        }
        for (score, grammar) in scores.iter_mut().zip(grammars) {
            if grammar.is_match(line) {
                *score += 1;
                if *score >= config.confidence_threshold {
                    tracing::debug!(grammar = grammar.name(), sampled, "grammar detected early");
                    return Ok(*grammar);
                }
            }
        }
    }

    let mut best: Option<(LineGrammar, usize)> = None;
    for (&score, &grammar) in scores.iter().zip(grammars) {
        if score > best.map_or(0, |(_, s)| s) {
            best = Some((grammar, score));
        }
    }

    match best {
        Some((grammar, score)) => {
            tracing::debug!(grammar = grammar.name(), score, sampled, "grammar detected");
            Ok(grammar)
        }
        None => Err(ChatlensError::format_detection(sampled)),
    }
}
