pub mod config;
pub mod extract;
pub mod pipeline;
pub mod preprocess;
pub mod recognizer;
pub mod store;
pub mod types;

pub use config::{ConfigError, DateOrder, DecimalConvention, ExtractionConfig, ScanConfig, StrukConfig};
pub use extract::Extractor;
pub use pipeline::{PipelineError, ReceiptScanner, ScanOutcome};
pub use preprocess::{prepare_for_ocr, PreprocessError};
pub use recognizer::{default_backend, MockRecognizer, OcrBackend, OcrError, UnavailableRecognizer};
pub use store::{receipt_ref, ReceiptStore, StoredReceipt};
pub use types::{ExtractedReceipt, Extraction, ExtractionReport};
