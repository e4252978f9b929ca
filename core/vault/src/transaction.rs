//! Finance tracker records.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::record::VaultRecord;
use pocketvault_common::{EntryId, Error, Result};

/// Direction of money flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Income => f.pad("income"),
            Self::Expense => f.pad("expense"),
        }
    }
}

impl FromStr for TransactionKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            other => Err(Error::InvalidInput(format!(
                "Unknown transaction type '{}'. Use: income or expense",
                other
            ))),
        }
    }
}

/// One income or expense record.
///
/// Transactions have no edit timestamps; an edit replaces the whole record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: EntryId,
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub category: String,
    pub description: String,
    pub date: DateTime<Utc>,
}

/// Fields for a new transaction.
#[derive(Debug, Clone)]
pub struct TransactionDraft {
    pub amount: f64,
    pub kind: TransactionKind,
    pub category: String,
    pub description: String,
    /// Defaults to the creation time when absent.
    pub date: Option<DateTime<Utc>>,
}

fn check_required(amount: f64, category: &str, description: &str) -> Result<()> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(Error::Validation(
            "amount (must be a positive number)".to_string(),
        ));
    }
    if category.trim().is_empty() {
        return Err(Error::Validation("category".to_string()));
    }
    if description.trim().is_empty() {
        return Err(Error::Validation("description".to_string()));
    }
    Ok(())
}

impl VaultRecord for Transaction {
    type Draft = TransactionDraft;

    const KIND: &'static str = "transaction";
    const SLOT: &'static str = "finance_vault";

    fn id(&self) -> &EntryId {
        &self.id
    }

    fn from_draft(draft: TransactionDraft, now: DateTime<Utc>) -> Result<Self> {
        check_required(draft.amount, &draft.category, &draft.description)?;
        Ok(Self {
            id: EntryId::generate(),
            amount: draft.amount,
            kind: draft.kind,
            category: draft.category,
            description: draft.description,
            date: draft.date.unwrap_or(now),
        })
    }

    fn validate(&self) -> Result<()> {
        check_required(self.amount, &self.category, &self.description)
    }
}

/// Parse a transaction date given as RFC 3339 or as a plain `YYYY-MM-DD`
/// (taken as midnight UTC).
pub fn parse_date(input: &str) -> Result<DateTime<Utc>> {
    let input = input.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(input) {
        return Ok(timestamp.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| Error::InvalidInput(format!("Invalid date '{}'", input)))
}
