use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::money::Money;

#[derive(Debug, Error, PartialEq)]
pub enum GoalError {
    #[error("Goal name must not be blank")]
    BlankName,
    #[error("Target amount must be positive, got {0}")]
    NonPositiveTarget(Money),
    #[error("Target date is required")]
    MissingTargetDate,
    #[error("Contribution must be positive, got {0}")]
    NonPositiveContribution(Money),
}

/// What a savings goal is for; picks the card artwork in the goals view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GoalCategory {
    #[default]
    Emergency,
    Travel,
    Tech,
    Health,
    Education,
    Other,
}

/// A savings goal as entered on the goal form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalDraft {
    pub name: String,
    pub category: GoalCategory,
    pub target_amount: Money,
    pub target_date: Option<NaiveDate>,
}

impl GoalDraft {
    pub fn new(name: impl Into<String>, target_amount: Money, target_date: NaiveDate) -> Self {
        GoalDraft {
            name: name.into(),
            category: GoalCategory::default(),
            target_amount,
            target_date: Some(target_date),
        }
    }

    pub fn with_category(mut self, category: GoalCategory) -> Self {
        self.category = category;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub name: String,
    pub category: GoalCategory,
    pub target_amount: Money,
    /// Never exceeds `target_amount`.
    pub current_amount: Money,
    pub target_date: NaiveDate,
}

impl Goal {
    /// New goals start with nothing saved.
    pub fn validate(draft: GoalDraft) -> Result<Goal, GoalError> {
        let name = draft.name.trim();
        if name.is_empty() {
            return Err(GoalError::BlankName);
        }
        if !draft.target_amount.is_positive() {
            return Err(GoalError::NonPositiveTarget(draft.target_amount));
        }
        let target_date = draft.target_date.ok_or(GoalError::MissingTargetDate)?;

        Ok(Goal {
            name: name.to_string(),
            category: draft.category,
            target_amount: draft.target_amount,
            current_amount: Money::zero(),
            target_date,
        })
    }

    /// Adds to the saved amount, capped at the target. Returns the new saved amount.
    pub fn contribute(&mut self, amount: Money) -> Result<Money, GoalError> {
        if !amount.is_positive() {
            return Err(GoalError::NonPositiveContribution(amount));
        }
        self.current_amount = (self.current_amount + amount).min(self.target_amount);
        Ok(self.current_amount)
    }

    pub fn remaining(&self) -> Money {
        self.target_amount - self.current_amount
    }

    /// Saved fraction of the target, in `0.0..=1.0`.
    pub fn progress(&self) -> f64 {
        let ratio = self.current_amount.to_units() as f64 / self.target_amount.to_units() as f64;
        ratio.clamp(0.0, 1.0)
    }

    pub fn is_reached(&self) -> bool {
        self.current_amount >= self.target_amount
    }
}
