use std::sync::OnceLock;

use chrono::{NaiveDate, Utc};
use regex::Regex;
use tracing::debug;

use crate::config::{ConfigError, DateOrder, DecimalConvention, ExtractionConfig};
use crate::types::{ExtractedReceipt, Extraction, ExtractionReport, UNKNOWN_MERCHANT};

// ── Compiled regex cache ─────────────────────────────────────────────────────

macro_rules! re {
    ($name:ident, $pat:expr) => {
        fn $name() -> &'static Regex {
            static R: OnceLock<Regex> = OnceLock::new();
            R.get_or_init(|| Regex::new($pat).expect("invalid regex"))
        }
    };
}

// ASCII classes on purpose: `\d` would also match non-Latin digits.
re!(re_date,
    r"[0-9]{1,2}[./-][0-9]{1,2}[./-][0-9]{2,4}|[0-9]{4}[./-][0-9]{1,2}[./-][0-9]{1,2}");
re!(re_number_run,
    r"[0-9.,]+");

// ── Public extraction API ─────────────────────────────────────────────────────

/// Heuristic merchant/date/amount extraction over raw OCR text.
///
/// Extraction never fails: fields that cannot be inferred fall back to
/// sentinels (`"Unknown Merchant"`, today's date, `"0"`).
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    config: ExtractionConfig,
}

impl Extractor {
    /// Fails when the amount bounds leave no room for any candidate.
    pub fn new(config: ExtractionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Extract using the current UTC date as the date fallback.
    pub fn extract(&self, ocr_text: &str) -> ExtractedReceipt {
        self.extract_on(ocr_text, Utc::now().date_naive())
    }

    pub fn extract_on(&self, ocr_text: &str, today: NaiveDate) -> ExtractedReceipt {
        self.report(ocr_text, today).into_receipt()
    }

    /// Runs the three passes and records which path each field took.
    pub fn report(&self, ocr_text: &str, today: NaiveDate) -> ExtractionReport {
        let merchant = self.extract_merchant(ocr_text);
        let date = self.extract_date(ocr_text, today);
        let amount = self.extract_amount(ocr_text);
        debug!(?merchant, ?date, ?amount, "receipt fields extracted");
        ExtractionReport { merchant, date, amount }
    }

    // ── Merchant ──────────────────────────────────────────────────────────────

    fn extract_merchant(&self, text: &str) -> Extraction<String> {
        match merchant_line(text, &self.config.merchant_stopwords) {
            Some(line) => Extraction::Found(line.to_string()),
            None => Extraction::Defaulted(UNKNOWN_MERCHANT.to_string()),
        }
    }

    // ── Date ─────────────────────────────────────────────────────────────────

    fn extract_date(&self, text: &str, today: NaiveDate) -> Extraction<NaiveDate> {
        let Some(fragment) = find_date_fragment(text) else {
            return Extraction::Defaulted(today);
        };
        match parse_date_fragment(fragment, self.config.date_order) {
            Some(date) => Extraction::Found(date),
            None => Extraction::Anomaly {
                fallback: today,
                detail: format!(
                    "'{fragment}' is not a calendar date in {} order",
                    self.config.date_order
                ),
            },
        }
    }

    // ── Amount ────────────────────────────────────────────────────────────────

    fn extract_amount(&self, text: &str) -> Extraction<u64> {
        let (min, max) = (self.config.min_amount, self.config.max_amount);
        amount_candidates(text)
            .filter_map(|c| normalize_candidate(c, self.config.decimal_convention))
            .filter(|&v| v > min && v < max)
            .max()
            .map_or(Extraction::Defaulted(0), Extraction::Found)
    }
}

// ── Merchant pass ─────────────────────────────────────────────────────────────

/// First non-empty trimmed line that looks like a business name.
pub fn merchant_line<'a>(text: &'a str, stopwords: &[String]) -> Option<&'a str> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .find(|l| is_merchant_candidate(l, stopwords))
}

/// Longer than three characters, not all digits, and free of stopwords.
pub fn is_merchant_candidate(line: &str, stopwords: &[String]) -> bool {
    line.chars().count() > 3
        && !line.chars().all(|c| c.is_ascii_digit())
        && !contains_stopword(line, stopwords)
}

fn contains_stopword(line: &str, stopwords: &[String]) -> bool {
    let lower = line.to_lowercase();
    stopwords
        .iter()
        .filter(|w| !w.is_empty())
        .any(|w| lower.contains(&w.to_lowercase()))
}

// ── Date pass ─────────────────────────────────────────────────────────────────

/// Leftmost `D-M-Y`-like or `Y-M-D`-like fragment in the whole text.
pub fn find_date_fragment(text: &str) -> Option<&str> {
    re_date().find(text).map(|m| m.as_str())
}

/// Interpret a fragment found by [`find_date_fragment`].
///
/// `.` and `/` are read as `-`. A four-digit first component always means
/// year-month-day; otherwise `order` decides. Two-digit years are 20xx;
/// a three-digit year is not a date.
pub fn parse_date_fragment(fragment: &str, order: DateOrder) -> Option<NaiveDate> {
    let normalized = fragment.replace(['.', '/'], "-");
    let parts: Vec<&str> = normalized.split('-').collect();
    let [a, b, c] = parts.as_slice() else {
        return None;
    };
    let (p1, p2, p3): (u32, u32, u32) = (a.parse().ok()?, b.parse().ok()?, c.parse().ok()?);

    let (year, month, day) = if a.len() == 4 {
        (p1, p2, p3)
    } else {
        match order {
            DateOrder::Dmy => (p3, p2, p1),
            DateOrder::Mdy => (p3, p1, p2),
            DateOrder::Ymd => (p1, p2, p3),
        }
    };
    let year = expand_year(year)?;
    NaiveDate::from_ymd_opt(year as i32, month, day)
}

fn expand_year(y: u32) -> Option<u32> {
    match y {
        0..=99 => Some(2000 + y),
        100..=999 => None,
        _ => Some(y),
    }
}

// ── Amount pass ───────────────────────────────────────────────────────────────

/// Every maximal run of digits, `.` and `,`.
pub fn amount_candidates(text: &str) -> impl Iterator<Item = &str> {
    re_number_run().find_iter(text).map(|m| m.as_str())
}

/// Turn a candidate run into whole units.
///
/// One trailing separator is dropped first. Under [`DecimalConvention::None`]
/// every separator is a thousands separator; otherwise a final decimal
/// separator followed by one or two digits starts a fraction, which is
/// truncated. `None` when no digits remain or the value overflows.
pub fn normalize_candidate(candidate: &str, convention: DecimalConvention) -> Option<u64> {
    let trimmed = candidate
        .strip_suffix(|c: char| c == '.' || c == ',')
        .unwrap_or(candidate);

    let integer_part = match convention.decimal_separator() {
        Some(sep) => match trimmed.rfind(sep) {
            Some(idx) if is_fraction(&trimmed[idx + 1..]) => &trimmed[..idx],
            _ => trimmed,
        },
        None => trimmed,
    };

    let digits: String = integer_part.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

fn is_fraction(s: &str) -> bool {
    (1..=2).contains(&s.len()) && s.chars().all(|c| c.is_ascii_digit())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
