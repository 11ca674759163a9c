use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use struk_core::{Category, Money, TransactionDraft};

pub const UNKNOWN_MERCHANT: &str = "Unknown Merchant";
pub const PARSE_ERROR_MERCHANT: &str = "Parse Error";

/// Which heuristic path produced a field value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "value", rename_all = "snake_case")]
pub enum Extraction<T> {
    /// A heuristic matched and produced this value.
    Found(T),
    /// Nothing matched; the fallback sentinel was used.
    Defaulted(T),
    /// Something matched but could not be interpreted.
    Anomaly { fallback: T, detail: String },
}

impl<T> Extraction<T> {
    pub fn value(&self) -> &T {
        match self {
            Extraction::Found(v) | Extraction::Defaulted(v) => v,
            Extraction::Anomaly { fallback, .. } => fallback,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Extraction::Found(v) | Extraction::Defaulted(v) => v,
            Extraction::Anomaly { fallback, .. } => fallback,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Extraction::Found(_))
    }
}

/// Per-field outcomes of one extraction run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractionReport {
    pub merchant: Extraction<String>,
    pub date: Extraction<NaiveDate>,
    pub amount: Extraction<u64>,
}

impl ExtractionReport {
    pub fn into_receipt(self) -> ExtractedReceipt {
        ExtractedReceipt {
            merchant: self.merchant.into_value(),
            date: format_date(*self.date.value()),
            amount: self.amount.into_value().to_string(),
        }
    }
}

/// Review-form pre-fill for a scanned receipt. Every field is always populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedReceipt {
    pub merchant: String,
    /// `YYYY-MM-DD`.
    pub date: String,
    /// Whole units as a decimal integer, `"0"` when nothing was found.
    pub amount: String,
}

impl ExtractedReceipt {
    /// The result handed back when recognition itself failed.
    pub fn parse_error(today: NaiveDate) -> Self {
        ExtractedReceipt {
            merchant: PARSE_ERROR_MERCHANT.to_string(),
            date: format_date(today),
            amount: "0".to_string(),
        }
    }

    /// Builds an expense draft from the (possibly user-edited) fields.
    /// An unreadable amount becomes zero and an unreadable date becomes `today`;
    /// validation of the draft is left to the caller.
    pub fn to_draft(&self, category: Category, today: NaiveDate) -> TransactionDraft {
        let amount = Money::parse(&self.amount).unwrap_or_else(Money::zero);
        let date = NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d").unwrap_or(today);
        TransactionDraft::expense(amount, category, self.merchant.trim(), date)
    }
}

pub(crate) fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use struk_core::{DraftError, ValidatedTransaction};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parse_error_shape() {
        let r = ExtractedReceipt::parse_error(date(2024, 5, 1));
        assert_eq!(
            r,
            ExtractedReceipt {
                merchant: "Parse Error".into(),
                date: "2024-05-01".into(),
                amount: "0".into(),
            }
        );
    }

    #[test]
    fn report_into_receipt_uses_fallbacks() {
        let report = ExtractionReport {
            merchant: Extraction::Defaulted(UNKNOWN_MERCHANT.to_string()),
            date: Extraction::Anomaly { fallback: date(2024, 1, 2), detail: "bad".into() },
            amount: Extraction::Defaulted(0),
        };
        let r = report.into_receipt();
        assert_eq!(r.merchant, "Unknown Merchant");
        assert_eq!(r.date, "2024-01-02");
        assert_eq!(r.amount, "0");
    }

    #[test]
    fn extraction_value_accessors() {
        let found = Extraction::Found(5u64);
        assert!(found.is_found());
        assert_eq!(*found.value(), 5);
        let anomaly = Extraction::Anomaly { fallback: 7u64, detail: "x".into() };
        assert!(!anomaly.is_found());
        assert_eq!(anomaly.into_value(), 7);
    }

    #[test]
    fn extraction_serializes_with_outcome_tag() {
        let json = serde_json::to_value(Extraction::Found("Indomaret".to_string())).unwrap();
        assert_eq!(json, serde_json::json!({ "outcome": "found", "value": "Indomaret" }));
    }

    #[test]
    fn to_draft_builds_expense() {
        let receipt = ExtractedReceipt {
            merchant: "Warung Padang Sederhana".into(),
            date: "2024-03-15".into(),
            amount: "150000".into(),
        };
        let draft = receipt.to_draft(Category::Food, date(2030, 1, 1));
        assert_eq!(draft.amount, Money::from_units(150_000));
        assert_eq!(draft.date, date(2024, 3, 15));
        assert_eq!(draft.description, "Warung Padang Sederhana");
        assert!(draft.is_expense);
        assert!(ValidatedTransaction::validate(draft).is_ok());
    }

    #[test]
    fn to_draft_from_degraded_receipt_fails_validation() {
        let draft = ExtractedReceipt::parse_error(date(2024, 5, 1)).to_draft(Category::Food, date(2024, 5, 1));
        assert!(matches!(
            ValidatedTransaction::validate(draft),
            Err(DraftError::NonPositiveAmount(_))
        ));
    }

    #[test]
    fn to_draft_tolerates_edited_garbage() {
        let receipt = ExtractedReceipt {
            merchant: "Kopi".into(),
            date: "yesterday".into(),
            amount: "lots".into(),
        };
        let today = date(2024, 8, 17);
        let draft = receipt.to_draft(Category::Other, today);
        assert_eq!(draft.date, today);
        assert!(draft.amount.is_zero());
    }
}
