//! Net balances from shared expenses.

use std::collections::HashMap;
use tracing::debug;

use crate::model::{Balance, Expense, Participant};

/// Compute one balance per participant, in participant order.
///
/// Each expense credits its payer with the full amount and debits every
/// split participant with their share. Payers and split participants that
/// are not in `participants` do not affect any balance.
pub fn calculate_balances(participants: &[Participant], expenses: &[Expense]) -> Vec<Balance> {
    let mut running: HashMap<&str, f64> = participants
        .iter()
        .map(|p| (p.id.as_str(), 0.0))
        .collect();

    for expense in expenses {
        match running.get_mut(expense.paid_by.as_str()) {
            Some(balance) => *balance += expense.amount,
            None => debug!(
                expense = %expense.id,
                participant = %expense.paid_by,
                "Payer is not a group participant"
            ),
        }

        for split in &expense.splits {
            match running.get_mut(split.participant_id.as_str()) {
                Some(balance) => *balance -= split.amount,
                None => debug!(
                    expense = %expense.id,
                    participant = %split.participant_id,
                    "Split participant is not a group participant"
                ),
            }
        }
    }

    participants
        .iter()
        .map(|p| Balance {
            participant_id: p.id.clone(),
            participant_name: p.name.clone(),
            balance: running.get(p.id.as_str()).copied().unwrap_or(0.0),
        })
        .collect()
}
