//! Pipeline stages turning raw PDF bytes into prompt-ready text.
//!
//! Each submodule implements exactly one transformation step, independently
//! testable:
//!
//! ```text
//! bytes ──▶ extract ──▶ filter ──▶ prompt
//!           (lopdf /    (keyword    (templates,
//!            OCR)        heuristic)  src/prompts.rs)
//! ```
//!
//! 1. [`extract`] — per-page text via lopdf, with a pdftoppm + tesseract OCR
//!    fallback for image-based PDFs; runs under `spawn_blocking` because both
//!    paths are synchronous and CPU/subprocess bound
//! 2. [`filter`] — drop the cover page, keep keyword-relevant pages, join
//!    with a page-break marker, truncate to the prompt character budget

pub mod extract;
pub mod filter;
