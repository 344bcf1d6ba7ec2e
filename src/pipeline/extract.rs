//! Per-page text extraction with an OCR fallback for image-based PDFs.
//!
//! Native extraction (lopdf) handles text-based PDFs in milliseconds. When a
//! manifesto is a scan, the text layer is missing or near-empty; below
//! [`crate::config::AnalyzerConfig::ocr_trigger_chars`] total characters the
//! native result is discarded and the leading pages are rasterized with
//! `pdftoppm` and read with `tesseract`, both invoked as subprocesses.
//!
//! Missing OCR binaries are a deployment problem and surface as
//! [`AnalyzerError::OcrUnavailable`], distinct from "this PDF has no text".
//!
//! Everything here is synchronous; callers run it under
//! `tokio::task::spawn_blocking`.

use crate::config::AnalyzerConfig;
use crate::error::AnalyzerError;
use lopdf::Document;
use std::path::Path;
use std::process::Command;
use tracing::{debug, info, warn};

/// Extract one text string per page from raw PDF bytes.
///
/// Falls back to OCR when native extraction yields too little text. Fails
/// with [`AnalyzerError::ImageOnlyPdf`] when even the fallback result is
/// below the hard minimum, so callers never send a near-empty prompt.
pub fn extract_pages(bytes: &[u8], config: &AnalyzerConfig) -> Result<Vec<String>, AnalyzerError> {
    let native = extract_native(bytes)?;
    let native_chars: usize = native.iter().map(|p| p.trim().chars().count()).sum();
    debug!(
        pages = native.len(),
        chars = native_chars,
        "native extraction complete"
    );

    let pages = if native_chars < config.ocr_trigger_chars {
        info!(
            chars = native_chars,
            threshold = config.ocr_trigger_chars,
            "too little native text, falling back to OCR"
        );
        ocr_pages(bytes, config)?
    } else {
        native
    };

    let total_chars: usize = pages.iter().map(|p| p.trim().chars().count()).sum();
    if total_chars < config.min_extracted_chars {
        warn!(chars = total_chars, "PDF yielded too little text to analyze");
        return Err(AnalyzerError::ImageOnlyPdf {
            extracted_chars: total_chars,
        });
    }

    Ok(pages)
}

/// Native per-page extraction via lopdf.
///
/// A page whose text stream fails to decode contributes an empty string
/// rather than failing the document; the aggregate threshold decides whether
/// the result is usable.
fn extract_native(bytes: &[u8]) -> Result<Vec<String>, AnalyzerError> {
    let doc = Document::load_mem(bytes).map_err(|e| AnalyzerError::CorruptPdf {
        detail: e.to_string(),
    })?;

    let pages = doc
        .get_pages()
        .keys()
        .map(|&page_num| doc.extract_text(&[page_num]).unwrap_or_default())
        .collect();

    Ok(pages)
}

/// Rasterize the leading pages and run tesseract on each.
fn ocr_pages(bytes: &[u8], config: &AnalyzerConfig) -> Result<Vec<String>, AnalyzerError> {
    check_ocr_tools()?;

    let scratch = tempfile::tempdir().map_err(|e| AnalyzerError::OcrFailed {
        detail: format!("could not create scratch directory: {e}"),
    })?;
    let pdf_path = scratch.path().join("upload.pdf");
    std::fs::write(&pdf_path, bytes).map_err(|e| AnalyzerError::OcrFailed {
        detail: format!("could not write scratch PDF: {e}"),
    })?;

    let output_prefix = scratch.path().join("page");
    let pdftoppm = Command::new("pdftoppm")
        .arg("-png")
        .arg("-r")
        .arg(config.ocr_dpi.to_string())
        .arg("-f")
        .arg("1")
        .arg("-l")
        .arg(config.ocr_max_pages.to_string())
        .arg(&pdf_path)
        .arg(&output_prefix)
        .output()
        .map_err(|e| AnalyzerError::OcrFailed {
            detail: format!("failed to run pdftoppm: {e}"),
        })?;

    if !pdftoppm.status.success() {
        let stderr = String::from_utf8_lossy(&pdftoppm.stderr);
        return Err(AnalyzerError::OcrFailed {
            detail: format!("pdftoppm failed: {}", stderr.trim()),
        });
    }

    let mut images: Vec<_> = std::fs::read_dir(scratch.path())
        .map_err(|e| AnalyzerError::OcrFailed {
            detail: format!("could not list scratch directory: {e}"),
        })?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "png"))
        .collect();
    images.sort();

    if images.is_empty() {
        return Err(AnalyzerError::OcrFailed {
            detail: "pdftoppm produced no page images".to_string(),
        });
    }

    info!(pages = images.len(), dpi = config.ocr_dpi, "running OCR");

    let mut pages = Vec::with_capacity(images.len());
    for (i, image) in images.iter().enumerate() {
        pages.push(ocr_single_page(image, i + 1, &config.ocr_language)?);
    }

    Ok(pages)
}

fn ocr_single_page(image: &Path, page_num: usize, lang: &str) -> Result<String, AnalyzerError> {
    let output = Command::new("tesseract")
        .arg(image)
        .arg("stdout")
        .arg("-l")
        .arg(lang)
        .arg("--psm")
        .arg("1")
        .output()
        .map_err(|e| AnalyzerError::OcrFailed {
            detail: format!("failed to run tesseract on page {page_num}: {e}"),
        })?;

    if !output.status.success() {
        // Tesseract writes warnings for hard pages but usually still emits
        // text; only log, the aggregate threshold catches real failures.
        let stderr = String::from_utf8_lossy(&output.stderr);
        warn!(page = page_num, "tesseract warning: {}", stderr.trim());
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Verify both OCR binaries are on PATH before doing any work.
fn check_ocr_tools() -> Result<(), AnalyzerError> {
    let pdftoppm = Command::new("pdftoppm").arg("-v").output().is_ok();
    let tesseract = Command::new("tesseract").arg("--version").output().is_ok();

    match (pdftoppm, tesseract) {
        (true, true) => Ok(()),
        (false, true) => Err(AnalyzerError::OcrUnavailable {
            detail: "pdftoppm (poppler-utils) not found".to_string(),
        }),
        (true, false) => Err(AnalyzerError::OcrUnavailable {
            detail: "tesseract not found".to_string(),
        }),
        (false, false) => Err(AnalyzerError::OcrUnavailable {
            detail: "pdftoppm and tesseract not found".to_string(),
        }),
    }
}
