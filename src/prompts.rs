//! Prompt templates for manifesto analysis, comparison, and translation.
//!
//! Centralising every prompt here serves two purposes:
//!
//! 1. **Single source of truth** — the JSON schema the model is asked to
//!    produce lives in exactly one place, next to the serde types that
//!    deserialize it.
//!
//! 2. **Testability** — unit tests can render and inspect prompts directly
//!    without a live provider.
//!
//! Templates use named `{placeholder}` tokens substituted with plain string
//! replacement; literal braces in the embedded JSON schemas need no escaping.

use crate::analysis::AnalysisResult;

/// Prompt for analyzing a single manifesto.
///
/// `{manifesto_text}` is replaced with the filtered, truncated page text.
pub const ANALYSIS_PROMPT_TEMPLATE: &str = r#"You are an expert, unbiased political analyst AI based in India. Your task is to analyze the following political manifesto text.
Provide a neutral, factual, and easy-to-understand breakdown. The analysis should be relevant to the Indian context.
The manifesto text is:
---
{manifesto_text}
---
Based on the text, provide ONLY a single, valid JSON object with the following structure and nothing else. Do not wrap it in markdown.
{
  "party_name": "The full name of the political party that published this manifesto. Extract this from the text.",
  "summary": "A concise, neutral summary of the manifesto's main goals (around 150 words).",
  "key_themes": ["A list of 5-7 main policy areas or themes mentioned, e.g., 'Economic Growth', 'Healthcare Reform', 'Agricultural Support', 'National Security', 'Environmental Policy', 'Education', 'Social Welfare'"],
  "sentiment": "A single descriptive word for the overall tone (e.g., 'Optimistic', 'Pragmatic', 'Nationalistic', 'Populist', 'Aggressive', 'Welfare-focused').",
  "analysis_for": {
    "youth": { "relevance_score": "A score from 0 to 10 for youth.", "policies": ["Key policies affecting youth."], "example": "A day-to-day example for one policy." },
    "seniors": { "relevance_score": "A score from 0 to 10 for seniors.", "policies": ["Policies for seniors."], "example": "A day-to-day example for one policy." },
    "farmers": { "relevance_score": "A score from 0 to 10 for farmers.", "policies": ["Policies for farmers."], "example": "A day-to-day example for one policy." },
    "corporate_sector": { "relevance_score": "A score from 0 to 10 for the corporate sector.", "policies": ["Policies for businesses."], "example": "A day-to-day example for one policy." }
  }
}"#;

/// Prompt for a head-to-head comparison of two prior analyses.
///
/// Placeholders: `{party_a_name}`, `{party_b_name}`, `{analysis_a}`,
/// `{analysis_b}` (the last two are indented JSON).
pub const COMPARISON_PROMPT_TEMPLATE: &str = r#"You are an expert, unbiased political analyst AI. Your task is to create a deep, insightful, and neutral side-by-side comparison of two political manifestos.
Instead of using "Manifesto A" and "Manifesto B", you MUST use their actual party names: '{party_a_name}' and '{party_b_name}'.
**Analysis for {party_a_name}:**
{analysis_a}
**Analysis for {party_b_name}:**
{analysis_b}
Generate ONLY a single, valid JSON object with the following structure. Do not wrap it in markdown.
{
  "party_names": { "party_a": "{party_a_name}", "party_b": "{party_b_name}" },
  "head_to_head": { "economy": "Directly compare their economic policies...", "welfare_and_social_justice": "Compare their approaches to social welfare...", "agriculture": "Contrast their promises to farmers...", "governance_and_democracy": "Compare their stances on key governance issues..." },
  "key_differentiators": ["A list of 2-3 of the most significant policy differences."],
  "voter_appeal_analysis": "Provide a neutral analysis of which voter demographics each manifesto might appeal to most, and why."
}"#;

/// Render the analysis prompt for the given filtered manifesto text.
pub fn analysis_prompt(manifesto_text: &str) -> String {
    ANALYSIS_PROMPT_TEMPLATE.replace("{manifesto_text}", manifesto_text)
}

/// Render the comparison prompt from two serialized analyses and their
/// resolved party names.
pub fn comparison_prompt(
    party_a_name: &str,
    party_b_name: &str,
    analysis_a_json: &str,
    analysis_b_json: &str,
) -> String {
    COMPARISON_PROMPT_TEMPLATE
        .replace("{party_a_name}", party_a_name)
        .replace("{party_b_name}", party_b_name)
        .replace("{analysis_a}", analysis_a_json)
        .replace("{analysis_b}", analysis_b_json)
}

/// Render the translation prompt. Plain text out, no JSON constraint.
pub fn translation_prompt(text: &str, language: &str) -> String {
    format!(
        "Translate the following text to {language}. \
         Provide only the translated text, nothing else:\n\n{text}"
    )
}

// ── Party name resolution ────────────────────────────────────────────────

/// Known party aliases matched against a lowercased filename stem.
const PARTY_ALIASES: &[(&str, &str)] = &[
    ("bjp", "BJP"),
    ("congress", "Congress"),
    ("cpim", "CPI(M)"),
    ("tmc", "TMC"),
];

/// Guess a party name from an uploaded filename.
///
/// Checks the fixed alias table first, then falls back to title-casing the
/// stem with separators replaced by spaces:
/// `"BJP_Manifesto_2024.pdf"` → `"BJP"`,
/// `"my_local_party.pdf"` → `"My Local Party"`.
pub fn extract_party_name_from_filename(filename: &str) -> String {
    let stem = filename
        .rsplit_once('.')
        .map(|(stem, _ext)| stem)
        .unwrap_or(filename)
        .to_lowercase();

    for (alias, name) in PARTY_ALIASES {
        if stem.contains(alias) {
            return (*name).to_string();
        }
    }

    stem.replace(['_', '-'], " ")
        .split_whitespace()
        .map(title_case_word)
        .collect::<Vec<_>>()
        .join(" ")
}

fn title_case_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Resolve the display name for an analysis: prefer the model-extracted
/// party name, then a filename-derived guess, then `default`.
pub fn resolve_party_name(analysis: &AnalysisResult, default: &str) -> String {
    if let Some(name) = analysis.party_name.as_deref() {
        if !name.trim().is_empty() {
            return name.to_string();
        }
    }
    if let Some(filename) = analysis.filename.as_deref() {
        if !filename.trim().is_empty() {
            return extract_party_name_from_filename(filename);
        }
    }
    default.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filename_alias_table() {
        assert_eq!(extract_party_name_from_filename("BJP_Manifesto_2024.pdf"), "BJP");
        assert_eq!(extract_party_name_from_filename("inc-congress-2024.pdf"), "Congress");
        assert_eq!(extract_party_name_from_filename("cpim_manifesto.pdf"), "CPI(M)");
        assert_eq!(extract_party_name_from_filename("tmc-bengal.pdf"), "TMC");
    }

    #[test]
    fn filename_title_case_fallback() {
        assert_eq!(
            extract_party_name_from_filename("my_local_party.pdf"),
            "My Local Party"
        );
        assert_eq!(extract_party_name_from_filename("greens.pdf"), "Greens");
    }

    #[test]
    fn resolution_prefers_model_name() {
        let analysis = AnalysisResult {
            party_name: Some("Bharatiya Janata Party".into()),
            summary: None,
            key_themes: vec![],
            sentiment: None,
            analysis_for: None,
            filename: Some("upload.pdf".into()),
            extra: Default::default(),
        };
        assert_eq!(
            resolve_party_name(&analysis, "Party A"),
            "Bharatiya Janata Party"
        );
    }

    #[test]
    fn resolution_falls_back_to_filename_then_default() {
        let mut analysis = AnalysisResult {
            party_name: None,
            summary: None,
            key_themes: vec![],
            sentiment: None,
            analysis_for: None,
            filename: Some("tmc_manifesto.pdf".into()),
            extra: Default::default(),
        };
        assert_eq!(resolve_party_name(&analysis, "Party A"), "TMC");

        analysis.filename = None;
        assert_eq!(resolve_party_name(&analysis, "Party A"), "Party A");
    }

    #[test]
    fn analysis_prompt_embeds_text_and_schema() {
        let prompt = analysis_prompt("Roads, jobs, and farm support.");
        assert!(prompt.contains("Roads, jobs, and farm support."));
        assert!(prompt.contains("\"party_name\""));
        assert!(prompt.contains("corporate_sector"));
        assert!(!prompt.contains("{manifesto_text}"));
    }

    #[test]
    fn comparison_prompt_uses_real_names() {
        let prompt = comparison_prompt("BJP", "TMC", "{\"a\": 1}", "{\"b\": 2}");
        assert!(prompt.contains("'BJP' and 'TMC'"));
        assert!(prompt.contains("{\"a\": 1}"));
        assert!(!prompt.contains("{party_a_name}"));
    }

    #[test]
    fn translation_prompt_names_language() {
        let prompt = translation_prompt("hello", "Bengali");
        assert!(prompt.starts_with("Translate the following text to Bengali"));
        assert!(prompt.ends_with("hello"));
    }
}
