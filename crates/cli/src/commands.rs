use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{NaiveDate, Utc};
use clap::Args;
use serde::Serialize;
use struk_core::{Category, TransactionDraft, ValidatedTransaction};
use struk_ocr::{default_backend, ExtractedReceipt, Extractor, ReceiptScanner, ReceiptStore, StrukConfig};

#[derive(Debug, Args)]
pub struct ExtractArgs {
    /// OCR text file; reads stdin when omitted or `-`
    pub file: Option<PathBuf>,

    /// Print per-field outcomes (found / defaulted / anomaly) instead of the receipt
    #[arg(long)]
    pub report: bool,
}

#[derive(Debug, Args)]
pub struct ScanArgs {
    /// Receipt image (JPEG, PNG, WEBP)
    pub image: PathBuf,

    /// Content-addressed store for the image, overrides `scan.store_dir`
    #[arg(long)]
    pub store: Option<PathBuf>,

    /// Category for the draft transaction
    #[arg(long, default_value_t = Category::Food)]
    pub category: Category,
}

#[derive(Debug, Serialize)]
pub struct ScanReport {
    pub receipt: ExtractedReceipt,
    pub draft: TransactionDraft,
    /// Whether the draft would be accepted as-is.
    pub ready: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub problem: Option<String>,
}

pub fn extract(args: ExtractArgs, config: &StrukConfig) -> anyhow::Result<()> {
    let text = read_input(args.file.as_deref())?;
    println!("{}", render_extract(&text, config, args.report, Utc::now().date_naive())?);
    Ok(())
}

pub fn render_extract(
    text: &str,
    config: &StrukConfig,
    report: bool,
    today: NaiveDate,
) -> anyhow::Result<String> {
    let extractor = Extractor::new(config.extraction.clone())?;
    let json = if report {
        serde_json::to_string_pretty(&extractor.report(text, today))?
    } else {
        serde_json::to_string_pretty(&extractor.extract_on(text, today))?
    };
    Ok(json)
}

pub async fn scan(args: ScanArgs, config: &StrukConfig) -> anyhow::Result<()> {
    let today = Utc::now().date_naive();
    let mut scanner = ReceiptScanner::new(
        default_backend(&config.scan),
        Extractor::new(config.extraction.clone())?,
    )
    .with_max_image_side(config.scan.max_image_side);
    if let Some(dir) = args.store.as_ref().or(config.scan.store_dir.as_ref()) {
        scanner = scanner.with_store(ReceiptStore::new(dir));
    }

    let outcome = scanner
        .scan_file_on(&args.image, today)
        .await
        .with_context(|| format!("scanning {}", args.image.display()))?;
    tracing::info!(receipt_ref = ?outcome.receipt_ref, "receipt scanned");

    let mut draft = outcome.extracted.to_draft(args.category, today);
    if let Some(receipt_ref) = &outcome.receipt_ref {
        draft = draft.with_receipt_ref(receipt_ref.clone());
    }
    let report = build_scan_report(outcome.extracted, draft, outcome.degraded);
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

pub fn build_scan_report(
    receipt: ExtractedReceipt,
    draft: TransactionDraft,
    degraded: Option<String>,
) -> ScanReport {
    let problem = match (degraded, ValidatedTransaction::validate(draft.clone())) {
        (Some(cause), _) => Some(cause),
        (None, Err(e)) => Some(e.to_string()),
        (None, Ok(_)) => None,
    };
    ScanReport { receipt, draft, ready: problem.is_none(), problem }
}

pub fn show_config(config: &StrukConfig) -> anyhow::Result<()> {
    print!("{}", config.to_toml()?);
    Ok(())
}

fn read_input(file: Option<&Path>) -> anyhow::Result<String> {
    match file {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display())),
        _ => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text).context("reading stdin")?;
            Ok(text)
        }
    }
}
