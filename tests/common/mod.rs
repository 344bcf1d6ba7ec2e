//! Shared test helpers: scripted provider backends and in-memory PDF
//! fixtures built with lopdf.
#![allow(dead_code)]

use async_trait::async_trait;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use manifesto_lens::{BackendError, ChatBackend, ChatRequest};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// What a scripted backend should do when called.
pub enum Reply {
    /// Return this text verbatim.
    Text(String),
    /// Report quota exhaustion (the retryable condition).
    RateLimited,
    /// Report a non-retryable API error.
    Error(String),
}

/// A [`ChatBackend`] with a fixed reply, a call counter, and a record of
/// the last request it saw.
pub struct ScriptedBackend {
    pub name: &'static str,
    pub reply: Reply,
    pub calls: AtomicUsize,
    pub last_request: Mutex<Option<ChatRequest>>,
}

impl ScriptedBackend {
    pub fn replying(name: &'static str, text: &str) -> Arc<Self> {
        Arc::new(Self {
            name,
            reply: Reply::Text(text.to_string()),
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        })
    }

    pub fn rate_limited(name: &'static str) -> Arc<Self> {
        Arc::new(Self {
            name,
            reply: Reply::RateLimited,
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        })
    }

    pub fn failing(name: &'static str, detail: &str) -> Arc<Self> {
        Arc::new(Self {
            name,
            reply: Reply::Error(detail.to_string()),
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.last_request
            .lock()
            .unwrap()
            .as_ref()
            .map(|r| r.prompt.clone())
    }
}

#[async_trait]
impl ChatBackend for ScriptedBackend {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn complete(&self, request: &ChatRequest) -> Result<String, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());
        match &self.reply {
            Reply::Text(text) => Ok(text.clone()),
            Reply::RateLimited => Err(BackendError::RateLimited {
                provider: self.name,
                detail: "quota exhausted".to_string(),
            }),
            Reply::Error(detail) => Err(BackendError::Api {
                provider: self.name,
                status: 500,
                detail: detail.clone(),
            }),
        }
    }
}

/// A complete analysis payload matching the prompt's JSON schema.
pub fn analysis_payload() -> String {
    serde_json::json!({
        "party_name": "BJP",
        "summary": "A growth-focused manifesto centred on infrastructure and welfare delivery.",
        "key_themes": ["Economic Growth", "Agricultural Support", "Education"],
        "sentiment": "Optimistic",
        "analysis_for": {
            "youth": { "relevance_score": 8, "policies": ["apprenticeship scheme"], "example": "A graduate joins a funded apprenticeship." },
            "seniors": { "relevance_score": 5, "policies": ["pension top-up"], "example": "A retiree receives a higher monthly pension." },
            "farmers": { "relevance_score": 7, "policies": ["crop insurance"], "example": "A farmer claims insurance after a failed monsoon." },
            "corporate_sector": { "relevance_score": 6, "policies": ["single-window clearance"], "example": "A factory clears permits in one application." }
        }
    })
    .to_string()
}

/// A comparison payload matching the comparison prompt's schema.
pub fn comparison_payload() -> String {
    serde_json::json!({
        "party_names": { "party_a": "Congress", "party_b": "BJP" },
        "head_to_head": {
            "economy": "Divergent fiscal approaches.",
            "welfare_and_social_justice": "Different delivery models.",
            "agriculture": "Both court farmers, with different instruments.",
            "governance_and_democracy": "Contrasting federalism stances."
        },
        "key_differentiators": ["income guarantee vs infrastructure spending"],
        "voter_appeal_analysis": "Each appeals to a distinct coalition."
    })
    .to_string()
}

// ── PDF fixtures ─────────────────────────────────────────────────────────

/// Build a minimal text-based PDF with one page per entry in `pages`.
pub fn pdf_with_pages(pages: &[&str]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for text in pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 11.into()]),
                Operation::new("Td", vec![50.into(), 750.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().expect("encode page content"),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Resources" => resources_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("serialize fixture PDF");
    bytes
}

/// A manifesto-shaped fixture: a cover page followed by two keyword-rich
/// policy pages, long enough to stay above the OCR trigger threshold.
pub fn manifesto_pdf() -> Vec<u8> {
    let policy = "Our plan for the economy creates jobs through investment in \
                  infrastructure, supports farmers with fair prices, funds \
                  healthcare for every family, and strengthens education from \
                  primary school to university while keeping tax rates stable. "
        .repeat(4);
    let agrarian = "We stand with farmers: agriculture credit will be expanded, \
                    crop insurance simplified, and rural employment guaranteed, \
                    alongside welfare pensions and healthcare outreach for every \
                    village across the country. "
        .repeat(4);
    pdf_with_pages(&["National Manifesto 2024", &policy, &agrarian])
}

/// A fixture whose pages carry plenty of text but no policy keywords, so
/// the relevance filter keeps nothing.
pub fn irrelevant_pdf() -> Vec<u8> {
    let filler = "Greetings and heartfelt thanks to our volunteers, well-wishers, \
                  and supporters for their tireless enthusiasm during the campaign \
                  trail across every district and town. "
        .repeat(4);
    pdf_with_pages(&["Cover", &filler, &filler])
}
