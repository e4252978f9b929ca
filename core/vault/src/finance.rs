//! Summaries over finance tracker transactions.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::transaction::{Transaction, TransactionKind};

pub const DEFAULT_INCOME_CATEGORIES: &[&str] =
    &["Salary", "Freelance", "Investments", "Gifts", "Other Income"];

pub const DEFAULT_EXPENSE_CATEGORIES: &[&str] = &[
    "Housing",
    "Food",
    "Transportation",
    "Entertainment",
    "Healthcare",
    "Shopping",
    "Utilities",
    "Education",
    "Travel",
    "Other",
];

/// Total amount recorded under one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: f64,
}

/// Income and expense within one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlySummary {
    /// Display label, e.g. "Mar 2024".
    pub month: String,
    pub year: i32,
    pub month_number: u32,
    pub income: f64,
    pub expense: f64,
}

fn total_of<'a>(transactions: impl IntoIterator<Item = &'a Transaction>, kind: TransactionKind) -> f64 {
    transactions
        .into_iter()
        .filter(|t| t.kind == kind)
        .map(|t| t.amount)
        .sum()
}

pub fn total_income(transactions: &[Transaction]) -> f64 {
    total_of(transactions, TransactionKind::Income)
}

pub fn total_expense(transactions: &[Transaction]) -> f64 {
    total_of(transactions, TransactionKind::Expense)
}

/// Income minus expense.
pub fn net_balance(transactions: &[Transaction]) -> f64 {
    total_income(transactions) - total_expense(transactions)
}

/// Per-category totals for one kind, in order of first appearance.
pub fn category_totals(transactions: &[Transaction], kind: TransactionKind) -> Vec<CategoryTotal> {
    let mut totals: Vec<CategoryTotal> = Vec::new();
    for transaction in transactions.iter().filter(|t| t.kind == kind) {
        match totals
            .iter_mut()
            .find(|total| total.category == transaction.category)
        {
            Some(total) => total.total += transaction.amount,
            None => totals.push(CategoryTotal {
                category: transaction.category.clone(),
                total: transaction.amount,
            }),
        }
    }
    totals
}

/// Income and expense for the `months` calendar months ending with the
/// month of `today`, oldest first.
pub fn monthly_summary(
    transactions: &[Transaction],
    months: u32,
    today: NaiveDate,
) -> Vec<MonthlySummary> {
    let current = today.year() * 12 + today.month0() as i32;
    // Months before chrono's earliest date cannot be represented.
    let representable = current - NaiveDate::MIN.year() * 12 + 1;
    let span = i32::try_from(months).unwrap_or(i32::MAX).min(representable);

    (0..span)
        .rev()
        .filter_map(|back| {
            let index = current - back;
            let year = index.div_euclid(12);
            let month_number = index.rem_euclid(12) as u32 + 1;
            let first = NaiveDate::from_ymd_opt(year, month_number, 1)?;

            let in_month = || {
                transactions
                    .iter()
                    .filter(move |t| t.date.year() == year && t.date.month() == month_number)
            };

            Some(MonthlySummary {
                month: first.format("%b %Y").to_string(),
                year,
                month_number,
                income: total_of(in_month(), TransactionKind::Income),
                expense: total_of(in_month(), TransactionKind::Expense),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::parse_date;
    use pocketvault_common::EntryId;

    fn tx(amount: f64, kind: TransactionKind, category: &str, date: &str) -> Transaction {
        Transaction {
            id: EntryId::generate(),
            amount,
            kind,
            category: category.into(),
            description: "test".into(),
            date: parse_date(date).unwrap(),
        }
    }

    fn sample() -> Vec<Transaction> {
        vec![
            tx(3000.0, TransactionKind::Income, "Salary", "2024-01-31"),
            tx(120.0, TransactionKind::Expense, "Food", "2024-02-03"),
            tx(800.0, TransactionKind::Expense, "Housing", "2024-02-01"),
            tx(45.5, TransactionKind::Expense, "Food", "2024-03-10"),
            tx(200.0, TransactionKind::Income, "Freelance", "2024-03-12"),
        ]
    }

    #[test]
    fn test_totals() {
        let transactions = sample();
        assert_eq!(total_income(&transactions), 3200.0);
        assert_eq!(total_expense(&transactions), 965.5);
        assert_eq!(net_balance(&transactions), 2234.5);
        assert_eq!(net_balance(&[]), 0.0);
    }

    #[test]
    fn test_category_totals_first_appearance_order() {
        let totals = category_totals(&sample(), TransactionKind::Expense);
        assert_eq!(
            totals,
            vec![
                CategoryTotal {
                    category: "Food".into(),
                    total: 165.5
                },
                CategoryTotal {
                    category: "Housing".into(),
                    total: 800.0
                },
            ]
        );
    }

    #[test]
    fn test_monthly_summary() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 20).unwrap();
        let months = monthly_summary(&sample(), 3, today);

        let labels: Vec<_> = months.iter().map(|m| m.month.as_str()).collect();
        assert_eq!(labels, ["Jan 2024", "Feb 2024", "Mar 2024"]);
        assert_eq!(months[0].income, 3000.0);
        assert_eq!(months[1].expense, 920.0);
        assert_eq!(months[2].income, 200.0);
        assert_eq!(months[2].expense, 45.5);
    }

    #[test]
    fn test_monthly_summary_crosses_year_boundary() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        let months = monthly_summary(&[], 3, today);
        let labels: Vec<_> = months.iter().map(|m| m.month.as_str()).collect();
        assert_eq!(labels, ["Nov 2023", "Dec 2023", "Jan 2024"]);
        assert!(months.iter().all(|m| m.income == 0.0 && m.expense == 0.0));
    }

    #[test]
    fn test_monthly_summary_huge_month_count() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 20).unwrap();
        let months = monthly_summary(&sample(), u32::MAX, today);

        assert!(months.len() > 12);
        assert_eq!(months[0].year, NaiveDate::MIN.year());
        let last = months.last().unwrap();
        assert_eq!(last.month, "Mar 2024");
        assert_eq!(last.income, 200.0);
        assert!(months.iter().any(|m| m.month == "Jan 2024" && m.income == 3000.0));
    }

    #[test]
    fn test_default_categories() {
        assert!(DEFAULT_INCOME_CATEGORIES.contains(&"Salary"));
        assert_eq!(DEFAULT_EXPENSE_CATEGORIES.len(), 10);
    }
}
