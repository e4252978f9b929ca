//! Settlement data types.
//!
//! Participants and expenses are owned by the caller's backend; balances
//! and settlements are derived and never stored.

use serde::{Deserialize, Serialize};

/// Member of an expense group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Participant {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

/// Share of one expense owed by a participant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Split {
    pub participant_id: String,
    pub amount: f64,
}

impl Split {
    pub fn new(participant_id: impl Into<String>, amount: f64) -> Self {
        Self {
            participant_id: participant_id.into(),
            amount,
        }
    }
}

/// Amount paid by one participant and split across the group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: String,
    pub amount: f64,
    pub paid_by: String,
    #[serde(default)]
    pub splits: Vec<Split>,
}

/// Net position of a participant.
///
/// Positive: the group owes this participant. Negative: this participant
/// owes the group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Balance {
    pub participant_id: String,
    pub participant_name: String,
    pub balance: f64,
}

/// Suggested payment from a debtor to a creditor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settlement {
    pub from: String,
    pub to: String,
    pub amount: f64,
    pub from_name: String,
    pub to_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expense_wire_names() {
        let expense: Expense = serde_json::from_value(serde_json::json!({
            "id": "e1",
            "amount": 90.0,
            "paid_by": "a",
            "splits": [{"participant_id": "b", "amount": 90.0}]
        }))
        .unwrap();
        assert_eq!(expense.paid_by, "a");
        assert_eq!(expense.splits[0], Split::new("b", 90.0));
    }

    #[test]
    fn test_balance_and_settlement_wire_names() {
        let balance = Balance {
            participant_id: "a".into(),
            participant_name: "Alice".into(),
            balance: 1.5,
        };
        let value = serde_json::to_value(&balance).unwrap();
        assert_eq!(value["participantId"], "a");
        assert_eq!(value["participantName"], "Alice");

        let settlement = Settlement {
            from: "b".into(),
            to: "a".into(),
            amount: 1.5,
            from_name: "Bob".into(),
            to_name: "Alice".into(),
        };
        let value = serde_json::to_value(&settlement).unwrap();
        assert_eq!(value["fromName"], "Bob");
        assert_eq!(value["toName"], "Alice");
    }

    #[test]
    fn test_participant_email_optional() {
        let p: Participant =
            serde_json::from_value(serde_json::json!({"id": "a", "name": "Alice"})).unwrap();
        assert_eq!(p, Participant::new("a", "Alice"));
    }
}
