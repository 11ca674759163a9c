use thiserror::Error;

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("Image decode error: {0}")]
    ImageDecode(String),
    #[error("OCR engine error: {0}")]
    Engine(String),
    #[error("Tesseract not available; build with `tesseract` feature")]
    NotAvailable,
}

/// Abstraction over an OCR backend.
/// Implementations accept PNG image bytes and return the recognized text.
pub trait OcrBackend: Send + Sync {
    fn recognize(&self, image_bytes: &[u8]) -> Result<String, OcrError>;
}

impl<T: OcrBackend + ?Sized> OcrBackend for Box<T> {
    fn recognize(&self, image_bytes: &[u8]) -> Result<String, OcrError> {
        (**self).recognize(image_bytes)
    }
}

// ── Mock backend ──────────────────────────────────────────────────────────────

/// Returns a pre-set string regardless of the image.
pub struct MockRecognizer {
    pub text: String,
}

impl MockRecognizer {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl OcrBackend for MockRecognizer {
    fn recognize(&self, _image_bytes: &[u8]) -> Result<String, OcrError> {
        Ok(self.text.clone())
    }
}

/// Stand-in used when no engine was compiled in; every call fails.
pub struct UnavailableRecognizer;

impl OcrBackend for UnavailableRecognizer {
    fn recognize(&self, _image_bytes: &[u8]) -> Result<String, OcrError> {
        Err(OcrError::NotAvailable)
    }
}

// ── Tesseract backend (optional, gated behind `tesseract` feature) ─────────────

#[cfg(feature = "tesseract")]
pub mod tesseract_backend {
    use super::{OcrBackend, OcrError};
    use leptess::LepTess;

    pub struct TesseractRecognizer {
        data_path: Option<String>,
        lang: String,
    }

    impl TesseractRecognizer {
        pub fn new(data_path: Option<String>, lang: &str) -> Self {
            Self { data_path, lang: lang.to_string() }
        }
    }

    impl OcrBackend for TesseractRecognizer {
        fn recognize(&self, image_bytes: &[u8]) -> Result<String, OcrError> {
            let mut lt = LepTess::new(self.data_path.as_deref(), &self.lang)
                .map_err(|e| OcrError::Engine(e.to_string()))?;
            lt.set_image_from_mem(image_bytes)
                .map_err(|e| OcrError::ImageDecode(e.to_string()))?;
            lt.get_utf8_text().map_err(|e| OcrError::Engine(e.to_string()))
        }
    }
}

/// The best backend this build offers for the given scan settings.
pub fn default_backend(scan: &crate::config::ScanConfig) -> Box<dyn OcrBackend> {
    #[cfg(feature = "tesseract")]
    {
        Box::new(tesseract_backend::TesseractRecognizer::new(
            scan.tesseract_data_path.clone(),
            &scan.tesseract_lang,
        ))
    }
    #[cfg(not(feature = "tesseract"))]
    {
        let _ = scan;
        Box::new(UnavailableRecognizer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_returns_preset_text() {
        let r = MockRecognizer::new("INDOMARET\nTOTAL 22.000");
        assert_eq!(r.recognize(b"fake image data").unwrap(), "INDOMARET\nTOTAL 22.000");
        assert_eq!(r.recognize(b"").unwrap(), "INDOMARET\nTOTAL 22.000");
    }

    #[test]
    fn unavailable_always_fails() {
        assert!(matches!(UnavailableRecognizer.recognize(b"x"), Err(OcrError::NotAvailable)));
    }

    #[test]
    fn boxed_backend_delegates() {
        let boxed: Box<dyn OcrBackend> = Box::new(MockRecognizer::new("hello"));
        assert_eq!(boxed.recognize(b"").unwrap(), "hello");
    }

    #[cfg(not(feature = "tesseract"))]
    #[test]
    fn default_backend_without_engine_is_unavailable() {
        let backend = default_backend(&crate::config::ScanConfig::default());
        assert!(matches!(backend.recognize(b""), Err(OcrError::NotAvailable)));
    }
}
