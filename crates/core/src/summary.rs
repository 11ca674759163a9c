use chrono::Datelike;
use serde::Serialize;
use std::collections::BTreeMap;

use super::category::Category;
use super::money::Money;
use super::transaction::ValidatedTransaction;

/// Dashboard totals over a set of transactions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub balance: Money,
    pub income: Money,
    pub expense: Money,
    /// Number of transactions counted, income and expense alike.
    pub count: usize,
    /// Expense totals per category, largest first.
    pub spending_by_category: Vec<(Category, Money)>,
}

impl Summary {
    pub fn from_transactions<'a, I>(transactions: I) -> Self
    where
        I: IntoIterator<Item = &'a ValidatedTransaction>,
    {
        let mut income = Money::zero();
        let mut expense = Money::zero();
        let mut by_category: BTreeMap<Category, Money> = BTreeMap::new();
        let mut count = 0;

        for tx in transactions {
            count += 1;
            if tx.is_expense {
                expense = expense + tx.amount;
                let slot = by_category.entry(tx.category).or_insert_with(Money::zero);
                *slot = *slot + tx.amount;
            } else {
                income = income + tx.amount;
            }
        }

        let mut spending_by_category: Vec<(Category, Money)> = by_category.into_iter().collect();
        // Stable sort keeps category order for ties.
        spending_by_category.sort_by(|a, b| b.1.cmp(&a.1));

        Summary { balance: income - expense, income, expense, count, spending_by_category }
    }

    /// Totals restricted to one calendar month.
    pub fn for_month(transactions: &[ValidatedTransaction], year: i32, month: u32) -> Self {
        Self::from_transactions(
            transactions
                .iter()
                .filter(|tx| tx.date.year() == year && tx.date.month() == month),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::TransactionDraft;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn tx(units: i64, category: Category, expense: bool, d: (i32, u32, u32)) -> ValidatedTransaction {
        let date = NaiveDate::from_ymd_opt(d.0, d.1, d.2).unwrap();
        let draft = if expense {
            TransactionDraft::expense(Money::from_units(units), category, "t", date)
        } else {
            TransactionDraft::income(Money::from_units(units), category, "t", date)
        };
        ValidatedTransaction::validate(draft).unwrap()
    }

    #[test]
    fn totals_and_balance() {
        let txs = vec![
            tx(5_000_000, Category::Salary, false, (2024, 3, 1)),
            tx(50_000, Category::Food, true, (2024, 3, 2)),
            tx(150_000, Category::Transport, true, (2024, 3, 3)),
            tx(25_000, Category::Food, true, (2024, 3, 4)),
        ];
        let s = Summary::from_transactions(&txs);
        assert_eq!(s.income, Money::from_units(5_000_000));
        assert_eq!(s.expense, Money::from_units(225_000));
        assert_eq!(s.balance, Money::from_units(4_775_000));
        assert_eq!(s.count, 4);
        assert_eq!(
            s.spending_by_category,
            vec![
                (Category::Transport, Money::from_units(150_000)),
                (Category::Food, Money::from_units(75_000)),
            ]
        );
    }

    #[test]
    fn empty_summary_is_zero() {
        let s = Summary::from_transactions(&Vec::<ValidatedTransaction>::new());
        assert!(s.balance.is_zero());
        assert_eq!(s.count, 0);
        assert!(s.spending_by_category.is_empty());
    }

    #[test]
    fn for_month_filters_by_calendar_month() {
        let txs = vec![
            tx(10_000, Category::Food, true, (2024, 2, 29)),
            tx(20_000, Category::Food, true, (2024, 3, 1)),
            tx(30_000, Category::Food, true, (2023, 3, 15)),
        ];
        let s = Summary::for_month(&txs, 2024, 3);
        assert_eq!(s.expense, Money::from_units(20_000));
        assert_eq!(s.count, 1);
    }
}
