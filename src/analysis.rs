//! Structured analysis records returned by the LLM gateway.
//!
//! These types deserialize *model output*, which is well-specified by the
//! prompt but not guaranteed. Two tolerances keep a slightly off-schema
//! response from failing the whole request:
//!
//! * every field is optional or defaulted, and unknown fields are preserved
//!   through a `#[serde(flatten)]` map so re-serialization is lossless;
//! * relevance scores accept either a JSON number or a numeric string,
//!   because models asked for "a score from 0 to 10" return both.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// The structured analysis of a single manifesto.
///
/// Cached by content hash; the cache hands out clones, so a stored result is
/// never mutated by its consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Party name as extracted from the manifesto text by the model.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub party_name: Option<String>,

    /// Neutral ~150-word summary of the manifesto's main goals.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    /// 5-7 main policy areas or themes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub key_themes: Vec<String>,

    /// One-word descriptor of the overall tone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<String>,

    /// Fixed four-audience relevance breakdown.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis_for: Option<AudienceBreakdown>,

    /// Name of the uploaded file; attached by the service after the model
    /// call, never produced by the model itself.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,

    /// Any fields the model emitted beyond the requested schema.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Per-audience relevance data for the four fixed audiences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudienceBreakdown {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub youth: Option<AudienceInsight>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seniors: Option<AudienceInsight>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub farmers: Option<AudienceInsight>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corporate_sector: Option<AudienceInsight>,
}

/// Relevance data for one audience.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudienceInsight {
    /// 0-10 relevance score. Accepts a number or a numeric string on input.
    #[serde(default, deserialize_with = "de_score")]
    pub relevance_score: Option<u8>,

    /// Key policies affecting this audience.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub policies: Vec<String>,

    /// A day-to-day example for one policy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
}

/// Head-to-head comparison of two prior analyses. Not cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub party_names: Option<PartyNames>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head_to_head: Option<HeadToHead>,

    /// The 2-3 most significant policy differences.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub key_differentiators: Vec<String>,

    /// Which voter demographics each manifesto appeals to, and why.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voter_appeal_analysis: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Resolved names of the two compared parties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartyNames {
    pub party_a: String,
    pub party_b: String,
}

/// Category-by-category comparison prose.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadToHead {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub economy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub welfare_and_social_justice: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agriculture: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub governance_and_democracy: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Deserialize a 0-10 score that may arrive as a number or a string.
fn de_score<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().map(|f| f.round() as u64))
            .map(|n| n.min(10) as u8),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok().map(|f| {
            let clamped = f.round().clamp(0.0, 10.0);
            clamped as u8
        }),
        _ => None,
    })
}
