use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::category::Category;
use super::money::Money;

#[derive(Debug, Error, PartialEq)]
pub enum DraftError {
    #[error("Amount must be positive, got {0}")]
    NonPositiveAmount(Money),
    #[error("Description must not be blank")]
    BlankDescription,
}

/// A transaction as entered on a form or pre-filled from a scanned receipt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionDraft {
    pub amount: Money,
    pub category: Category,
    pub description: String,
    pub date: NaiveDate,
    pub is_expense: bool,
    /// Content hash of the stored receipt image, when the draft came from a scan.
    pub receipt_ref: Option<String>,
}

impl TransactionDraft {
    pub fn expense(
        amount: Money,
        category: Category,
        description: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        TransactionDraft {
            amount,
            category,
            description: description.into(),
            date,
            is_expense: true,
            receipt_ref: None,
        }
    }

    pub fn income(
        amount: Money,
        category: Category,
        description: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        TransactionDraft { is_expense: false, ..Self::expense(amount, category, description, date) }
    }

    pub fn with_receipt_ref(mut self, receipt_ref: impl Into<String>) -> Self {
        self.receipt_ref = Some(receipt_ref.into());
        self
    }

    /// Amount with its sign applied: expenses count negative.
    pub fn signed_amount(&self) -> Money {
        if self.is_expense {
            Money::zero() - self.amount
        } else {
            self.amount
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatedTransaction {
    pub amount: Money,
    pub category: Category,
    pub description: String,
    pub date: NaiveDate,
    pub is_expense: bool,
    pub receipt_ref: Option<String>,
}

impl ValidatedTransaction {
    pub fn validate(draft: TransactionDraft) -> Result<ValidatedTransaction, DraftError> {
        if !draft.amount.is_positive() {
            return Err(DraftError::NonPositiveAmount(draft.amount));
        }

        let description = draft.description.trim();
        if description.is_empty() {
            return Err(DraftError::BlankDescription);
        }

        Ok(ValidatedTransaction {
            amount: draft.amount,
            category: draft.category,
            description: description.to_string(),
            date: draft.date,
            is_expense: draft.is_expense,
            receipt_ref: draft.receipt_ref,
        })
    }
}
