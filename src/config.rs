//! Configuration for the manifesto analysis service.
//!
//! All behaviour is controlled through [`AnalyzerConfig`], built via its
//! [`AnalyzerConfigBuilder`] or read from the environment with
//! [`AnalyzerConfig::from_env`]. Keeping every knob in one struct makes it
//! trivial to share the config across handlers, clone it into blocking
//! extraction tasks, and inject deterministic values in tests.
//!
//! Provider API keys are deliberately *optional*: a missing key is logged at
//! startup but does not prevent the process from starting. The corresponding
//! provider simply fails at call time, which the gateway surfaces as a
//! server error.

use crate::error::AnalyzerError;
use tracing::warn;

/// Configuration for PDF analysis, comparison, and translation.
///
/// Built via [`AnalyzerConfig::builder()`], [`AnalyzerConfig::from_env()`],
/// or [`AnalyzerConfig::default()`].
///
/// # Example
/// ```rust
/// use manifesto_lens::AnalyzerConfig;
///
/// let config = AnalyzerConfig::builder()
///     .temperature(0.2)
///     .max_prompt_chars(20_000)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// API key for the primary (Gemini) provider. `None` means the primary
    /// provider is unusable and every analysis fails at call time.
    pub gemini_api_key: Option<String>,

    /// Gemini model identifier. Default: `gemini-1.5-flash-latest`.
    pub gemini_model: String,

    /// API key for the fallback (DeepSeek) provider.
    pub deepseek_api_key: Option<String>,

    /// Base URL of the OpenAI-compatible fallback endpoint.
    /// Default: `https://api.deepseek.com/v1`.
    pub deepseek_base_url: String,

    /// Fallback model identifier. Default: `deepseek-chat`.
    pub deepseek_model: String,

    /// Sampling temperature for analysis and comparison calls. Default: 0.3.
    ///
    /// Low enough that the model stays faithful to the manifesto text, high
    /// enough that summaries read naturally. Translation always uses 0.0
    /// regardless of this value.
    pub temperature: f32,

    /// Per-provider-call HTTP timeout in seconds. Default: 120.
    ///
    /// A full-manifesto analysis prompt runs to tens of thousands of input
    /// characters; generation regularly takes 30-60 s on free tiers.
    pub api_timeout_secs: u64,

    /// Aggregate extracted-character count below which native extraction is
    /// discarded and the OCR fallback runs. Default: 500.
    pub ocr_trigger_chars: usize,

    /// Hard minimum of total extracted characters (native or OCR). Below
    /// this the request fails as an image-based/unsupported PDF. Default: 200.
    pub min_extracted_chars: usize,

    /// Maximum number of leading pages to rasterize and OCR. Default: 10.
    ///
    /// OCR is by far the slowest stage; manifestos front-load their policy
    /// content, so the first pages carry most of the signal.
    pub ocr_max_pages: usize,

    /// Rendering resolution handed to `pdftoppm`, in DPI. Default: 200.
    pub ocr_dpi: u32,

    /// Tesseract language code. Default: `eng`.
    pub ocr_language: String,

    /// Character budget for the filtered manifesto text embedded in the
    /// analysis prompt. Default: 40 000.
    pub max_prompt_chars: usize,

    /// Minimum filtered-text length required to send a prompt at all.
    /// Default: 250.
    pub min_relevant_chars: usize,

    /// Origins allowed by CORS. Always contains the local dev origin;
    /// [`AnalyzerConfig::from_env`] appends `FRONTEND_ORIGIN` when set.
    pub allowed_origins: Vec<String>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            gemini_model: "gemini-1.5-flash-latest".to_string(),
            deepseek_api_key: None,
            deepseek_base_url: "https://api.deepseek.com/v1".to_string(),
            deepseek_model: "deepseek-chat".to_string(),
            temperature: 0.3,
            api_timeout_secs: 120,
            ocr_trigger_chars: 500,
            min_extracted_chars: 200,
            ocr_max_pages: 10,
            ocr_dpi: 200,
            ocr_language: "eng".to_string(),
            max_prompt_chars: 40_000,
            min_relevant_chars: 250,
            allowed_origins: vec!["http://localhost:3000".to_string()],
        }
    }
}

impl AnalyzerConfig {
    /// Create a new builder for `AnalyzerConfig`.
    pub fn builder() -> AnalyzerConfigBuilder {
        AnalyzerConfigBuilder {
            config: Self::default(),
        }
    }

    /// Build a configuration from the process environment.
    ///
    /// Reads `GEMINI_API_KEY` (or `GOOGLE_API_KEY`), `DEEPSEEK_API_KEY`, and
    /// `FRONTEND_ORIGIN`. Missing keys are logged but never fatal.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        config.gemini_api_key = std::env::var("GEMINI_API_KEY")
            .ok()
            .or_else(|| std::env::var("GOOGLE_API_KEY").ok())
            .filter(|k| !k.is_empty());
        if config.gemini_api_key.is_none() {
            warn!("GEMINI_API_KEY / GOOGLE_API_KEY not set; primary provider is unusable");
        }

        config.deepseek_api_key = std::env::var("DEEPSEEK_API_KEY")
            .ok()
            .filter(|k| !k.is_empty());
        if config.deepseek_api_key.is_none() {
            warn!("DEEPSEEK_API_KEY not set; fallback provider is unusable");
        }

        if let Ok(origin) = std::env::var("FRONTEND_ORIGIN") {
            if !origin.is_empty() {
                config.allowed_origins.push(origin);
            }
        }

        config
    }
}

/// Builder for [`AnalyzerConfig`].
#[derive(Debug)]
pub struct AnalyzerConfigBuilder {
    config: AnalyzerConfig,
}

impl AnalyzerConfigBuilder {
    pub fn gemini_api_key(mut self, key: impl Into<String>) -> Self {
        self.config.gemini_api_key = Some(key.into());
        self
    }

    pub fn gemini_model(mut self, model: impl Into<String>) -> Self {
        self.config.gemini_model = model.into();
        self
    }

    pub fn deepseek_api_key(mut self, key: impl Into<String>) -> Self {
        self.config.deepseek_api_key = Some(key.into());
        self
    }

    pub fn deepseek_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.deepseek_base_url = url.into();
        self
    }

    pub fn deepseek_model(mut self, model: impl Into<String>) -> Self {
        self.config.deepseek_model = model.into();
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs.max(1);
        self
    }

    pub fn ocr_trigger_chars(mut self, n: usize) -> Self {
        self.config.ocr_trigger_chars = n;
        self
    }

    pub fn min_extracted_chars(mut self, n: usize) -> Self {
        self.config.min_extracted_chars = n;
        self
    }

    pub fn ocr_max_pages(mut self, n: usize) -> Self {
        self.config.ocr_max_pages = n.max(1);
        self
    }

    pub fn ocr_dpi(mut self, dpi: u32) -> Self {
        self.config.ocr_dpi = dpi.clamp(72, 600);
        self
    }

    pub fn ocr_language(mut self, lang: impl Into<String>) -> Self {
        self.config.ocr_language = lang.into();
        self
    }

    pub fn max_prompt_chars(mut self, n: usize) -> Self {
        self.config.max_prompt_chars = n;
        self
    }

    pub fn min_relevant_chars(mut self, n: usize) -> Self {
        self.config.min_relevant_chars = n;
        self
    }

    pub fn allowed_origin(mut self, origin: impl Into<String>) -> Self {
        self.config.allowed_origins.push(origin.into());
        self
    }

    /// Build the configuration, validating cross-field constraints.
    pub fn build(self) -> Result<AnalyzerConfig, AnalyzerError> {
        let c = &self.config;
        if c.min_extracted_chars > c.ocr_trigger_chars {
            return Err(AnalyzerError::InvalidConfig(format!(
                "min_extracted_chars ({}) must not exceed ocr_trigger_chars ({})",
                c.min_extracted_chars, c.ocr_trigger_chars
            )));
        }
        if c.min_relevant_chars > c.max_prompt_chars {
            return Err(AnalyzerError::InvalidConfig(format!(
                "min_relevant_chars ({}) must not exceed max_prompt_chars ({})",
                c.min_relevant_chars, c.max_prompt_chars
            )));
        }
        Ok(self.config)
    }
}
