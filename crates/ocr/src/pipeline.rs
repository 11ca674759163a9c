use chrono::{NaiveDate, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::extract::Extractor;
use crate::preprocess::{self, PreprocessError};
use crate::recognizer::{OcrBackend, OcrError};
use crate::store::ReceiptStore;
use crate::types::ExtractedReceipt;

/// Failures that reach the caller. Recognition problems never do: they
/// degrade the extracted receipt instead.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
enum RecognitionError {
    #[error("Image preprocessing failed: {0}")]
    Preprocess(#[from] PreprocessError),
    #[error("OCR recognition failed: {0}")]
    Ocr(#[from] OcrError),
}

/// The result of scanning one receipt image.
#[derive(Debug, Clone, Serialize)]
pub struct ScanOutcome {
    /// Content hash of the image, when a store is configured.
    pub receipt_ref: Option<String>,
    pub stored_path: Option<PathBuf>,
    /// Raw OCR text; absent when recognition failed.
    pub ocr_text: Option<String>,
    pub extracted: ExtractedReceipt,
    /// Why extraction fell back to the parse-error receipt.
    pub degraded: Option<String>,
}

/// Orchestrates: store → preprocess → OCR → extract.
pub struct ReceiptScanner<R: OcrBackend> {
    recognizer: R,
    extractor: Extractor,
    store: Option<ReceiptStore>,
    max_image_side: u32,
}

impl<R: OcrBackend> ReceiptScanner<R> {
    pub fn new(recognizer: R, extractor: Extractor) -> Self {
        Self { recognizer, extractor, store: None, max_image_side: 2800 }
    }

    pub fn with_store(mut self, store: ReceiptStore) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_max_image_side(mut self, max_image_side: u32) -> Self {
        self.max_image_side = max_image_side.max(1);
        self
    }

    /// Scan a file on disk.
    pub async fn scan_file(&self, path: &Path) -> Result<ScanOutcome, PipelineError> {
        self.scan_file_on(path, Utc::now().date_naive()).await
    }

    /// The stored image keeps the file's lowercased extension, `bin` if it has none.
    pub async fn scan_file_on(
        &self,
        path: &Path,
        today: NaiveDate,
    ) -> Result<ScanOutcome, PipelineError> {
        let bytes = tokio::fs::read(path).await?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("bin")
            .to_lowercase();
        self.scan_bytes_on(&bytes, &ext, today).await
    }

    /// Scan raw bytes (from camera capture or file read).
    pub async fn scan_bytes(&self, data: &[u8], ext: &str) -> Result<ScanOutcome, PipelineError> {
        self.scan_bytes_on(data, ext, Utc::now().date_naive()).await
    }

    pub async fn scan_bytes_on(
        &self,
        data: &[u8],
        ext: &str,
        today: NaiveDate,
    ) -> Result<ScanOutcome, PipelineError> {
        let (receipt_ref, stored_path) = match &self.store {
            Some(store) => {
                let stored = store.put(data, ext).await?;
                (Some(stored.receipt_ref), Some(stored.path))
            }
            None => (None, None),
        };

        let outcome = match self.recognize(data) {
            Ok(text) => {
                let extracted = self.extractor.extract_on(&text, today);
                ScanOutcome { receipt_ref, stored_path, ocr_text: Some(text), extracted, degraded: None }
            }
            Err(e) => {
                tracing::warn!("Receipt recognition failed, using fallback: {e}");
                ScanOutcome {
                    receipt_ref,
                    stored_path,
                    ocr_text: None,
                    extracted: ExtractedReceipt::parse_error(today),
                    degraded: Some(e.to_string()),
                }
            }
        };
        Ok(outcome)
    }

    fn recognize(&self, data: &[u8]) -> Result<String, RecognitionError> {
        let image_bytes = preprocess::prepare_for_ocr(data, self.max_image_side)?;
        Ok(self.recognizer.recognize(&image_bytes)?)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
