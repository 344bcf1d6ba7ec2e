//! Relevance filter: keyword-based page selection and prompt budgeting.
//!
//! Manifestos open with cover art, party symbols, and leader portraits, and
//! pad their middles with greetings and acknowledgements. None of that is
//! worth LLM tokens. The heuristic here is deliberately crude: drop page 0
//! unconditionally (assumed cover), keep every other page whose lowercased
//! text mentions at least one policy keyword, and cap the joined result at a
//! fixed character budget.

use crate::config::AnalyzerConfig;
use crate::error::AnalyzerError;
use tracing::debug;

/// Marker inserted between kept pages so the model sees page boundaries.
pub const PAGE_BREAK: &str = "\n\n--- PAGE BREAK ---\n\n";

/// Policy keywords that mark a page as worth analyzing. Matched as
/// substrings of the lowercased page text.
pub const RELEVANCE_KEYWORDS: &[&str] = &[
    "economy",
    "economic",
    "jobs",
    "employment",
    "farmers",
    "agriculture",
    "msp",
    "healthcare",
    "health",
    "education",
    "tax",
    "welfare",
    "infrastructure",
    "women",
    "youth",
    "security",
    "corruption",
    "environment",
];

/// Reduce per-page text to a single prompt-ready string.
///
/// Drops page 0, keeps keyword-matching pages joined by [`PAGE_BREAK`],
/// truncates to `config.max_prompt_chars` (on a char boundary), and fails
/// with [`AnalyzerError::NotEnoughRelevantText`] when the survivors are too
/// short to be worth a provider call.
pub fn filter_relevant(pages: &[String], config: &AnalyzerConfig) -> Result<String, AnalyzerError> {
    let kept: Vec<&str> = pages
        .iter()
        .skip(1) // page 0 is the cover
        .filter(|text| is_relevant(text))
        .map(|text| text.trim())
        .collect();

    debug!(total = pages.len(), kept = kept.len(), "relevance filter");

    let joined = kept.join(PAGE_BREAK);
    let truncated = truncate_chars(&joined, config.max_prompt_chars);

    let chars = truncated.chars().count();
    if chars < config.min_relevant_chars {
        return Err(AnalyzerError::NotEnoughRelevantText {
            found: chars,
            needed: config.min_relevant_chars,
        });
    }

    Ok(truncated.to_string())
}

/// True when the page mentions at least one policy keyword.
fn is_relevant(text: &str) -> bool {
    let lowered = text.to_lowercase();
    RELEVANCE_KEYWORDS.iter().any(|kw| lowered.contains(kw))
}

/// Truncate to at most `max` chars without splitting a UTF-8 code point.
fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
