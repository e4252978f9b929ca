//! Payment plans that settle a group's balances.
//!
//! The algorithm is greedy in arrival order: the first outstanding debtor
//! always pays the first outstanding creditor. It is not minimal in the
//! number of payments, and callers rely on its exact pairing order.

use serde::Serialize;
use std::collections::VecDeque;
use tracing::{debug, warn};

use crate::model::{Balance, Settlement};
use pocketvault_common::money::is_zero;

/// Settlements plus whatever the payments could not clear.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SettlementPlan {
    pub settlements: Vec<Settlement>,
    /// Balances still outstanding after every settlement is applied.
    /// Empty whenever the input balances sum to zero.
    pub residual: Vec<Balance>,
}

impl SettlementPlan {
    pub fn is_balanced(&self) -> bool {
        self.residual.is_empty()
    }
}

/// Compute the settlements for `balances`.
///
/// Debtors (negative balance) and creditors (positive balance) are queued in
/// input order. Each step moves `min(|debtor|, creditor)` from the front
/// debtor to the front creditor and dequeues whichever side is now within
/// the money tolerance of zero.
pub fn calculate_settlements(balances: &[Balance]) -> Vec<Settlement> {
    settle(balances).settlements
}

/// Like [`calculate_settlements`], but also reports what remains unsettled.
///
/// Residual balances only occur when the input does not sum to zero, for
/// example when an expense's splits do not add up to its amount. Balances
/// that are not finite (overflowed or NaN) never enter the queues and are
/// reported as residual as-is.
pub fn settle(balances: &[Balance]) -> SettlementPlan {
    let (finite, non_finite): (Vec<&Balance>, Vec<&Balance>) =
        balances.iter().partition(|b| b.balance.is_finite());
    let mut residual: Vec<Balance> = non_finite.into_iter().cloned().collect();

    if !residual.is_empty() {
        warn!(
            participants = residual.len(),
            "Balances are not finite; leaving them unsettled"
        );
    }

    let mut debtors: VecDeque<Balance> = finite
        .iter()
        .filter(|b| b.balance < 0.0)
        .map(|&b| b.clone())
        .collect();
    let mut creditors: VecDeque<Balance> = finite
        .iter()
        .filter(|b| b.balance > 0.0)
        .map(|&b| b.clone())
        .collect();

    debug!(
        debtors = debtors.len(),
        creditors = creditors.len(),
        "Calculating settlements"
    );

    let mut settlements = Vec::new();
    while let (Some(debtor), Some(creditor)) = (debtors.front_mut(), creditors.front_mut()) {
        let amount = debtor.balance.abs().min(creditor.balance);

        settlements.push(Settlement {
            from: debtor.participant_id.clone(),
            to: creditor.participant_id.clone(),
            amount,
            from_name: debtor.participant_name.clone(),
            to_name: creditor.participant_name.clone(),
        });

        debtor.balance += amount;
        creditor.balance -= amount;

        if is_zero(debtor.balance) {
            debtors.pop_front();
        }
        if is_zero(creditor.balance) {
            creditors.pop_front();
        }
    }

    let unsettled_before = residual.len();
    residual.extend(
        debtors
            .into_iter()
            .chain(creditors)
            .filter(|b| !is_zero(b.balance)),
    );

    if residual.len() > unsettled_before {
        let unsettled: f64 = residual[unsettled_before..].iter().map(|b| b.balance).sum();
        warn!(
            participants = residual.len(),
            unsettled,
            "Balances do not sum to zero; settlement plan leaves a residual"
        );
    }

    SettlementPlan {
        settlements,
        residual,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::balance::calculate_balances;
    use crate::model::{Expense, Participant, Split};
    use pocketvault_common::money::approx_eq;
    use proptest::prelude::*;
    use std::collections::HashMap;

    fn balance(id: &str, amount: f64) -> Balance {
        Balance {
            participant_id: id.to_string(),
            participant_name: id.to_uppercase(),
            balance: amount,
        }
    }

    fn pairs(settlements: &[Settlement]) -> Vec<(&str, &str, f64)> {
        settlements
            .iter()
            .map(|s| (s.from.as_str(), s.to.as_str(), s.amount))
            .collect()
    }

    #[test]
    fn test_three_way_dinner() {
        let participants = vec![
            Participant::new("a", "A"),
            Participant::new("b", "B"),
            Participant::new("c", "C"),
        ];
        let expense = Expense {
            id: "e1".into(),
            amount: 90.0,
            paid_by: "a".into(),
            splits: vec![Split::new("a", 30.0), Split::new("b", 30.0), Split::new("c", 30.0)],
        };

        let balances = calculate_balances(&participants, &[expense]);
        let settlements = calculate_settlements(&balances);

        assert_eq!(pairs(&settlements), [("b", "a", 30.0), ("c", "a", 30.0)]);
        assert_eq!(settlements[0].from_name, "B");
        assert_eq!(settlements[0].to_name, "A");
    }

    #[test]
    fn test_first_in_first_out_pairing() {
        // The largest debtor is not preferred.
        let balances = [
            balance("a", 10.0),
            balance("b", -5.0),
            balance("c", 20.0),
            balance("d", -25.0),
        ];
        let settlements = calculate_settlements(&balances);
        assert_eq!(
            pairs(&settlements),
            [("b", "a", 5.0), ("d", "a", 5.0), ("d", "c", 20.0)]
        );
    }

    #[test]
    fn test_all_settled_yields_nothing() {
        let balances = [balance("a", 0.0), balance("b", 0.0)];
        assert!(calculate_settlements(&balances).is_empty());
        assert!(calculate_settlements(&[]).is_empty());
    }

    #[test]
    fn test_near_zero_remainder_is_dropped() {
        let balances = [balance("a", 10.004), balance("b", -10.0)];
        let plan = settle(&balances);
        assert_eq!(pairs(&plan.settlements), [("b", "a", 10.0)]);
        assert!(plan.is_balanced());
    }

    #[test]
    fn test_unbalanced_input_reports_residual() {
        let balances = [balance("a", 50.0), balance("b", -20.0)];
        let plan = settle(&balances);

        assert_eq!(pairs(&plan.settlements), [("b", "a", 20.0)]);
        assert_eq!(plan.residual.len(), 1);
        assert_eq!(plan.residual[0].participant_id, "a");
        assert!(approx_eq(plan.residual[0].balance, 30.0));
        assert!(!plan.is_balanced());
    }

    #[test]
    fn test_overflowing_balances_are_left_unsettled() {
        let participants = vec![Participant::new("a", "A"), Participant::new("b", "B")];
        let huge = Expense {
            id: "e1".into(),
            amount: 1e308,
            paid_by: "a".into(),
            splits: vec![Split::new("b", 1e308)],
        };
        let balances = calculate_balances(&participants, &[huge.clone(), huge]);
        assert!(balances.iter().all(|b| b.balance.is_infinite()));

        let plan = settle(&balances);
        assert!(plan.settlements.is_empty());
        assert_eq!(plan.residual.len(), 2);
        assert!(calculate_settlements(&balances).is_empty());
    }

    #[test]
    fn test_nan_balance_is_residual_and_others_still_settle() {
        let balances = [balance("a", f64::NAN), balance("b", -5.0), balance("c", 5.0)];
        let plan = settle(&balances);

        assert_eq!(pairs(&plan.settlements), [("b", "c", 5.0)]);
        assert_eq!(plan.residual.len(), 1);
        assert_eq!(plan.residual[0].participant_id, "a");
    }

    /// Participants plus expenses whose splits sum exactly to their amount,
    /// all in whole cents.
    fn group_strategy() -> impl Strategy<Value = (Vec<Participant>, Vec<Expense>)> {
        (2usize..8).prop_flat_map(|n| {
            let expense = (
                0..n,
                prop::collection::vec((0..n, 1u32..50_000), 1..6),
            );
            prop::collection::vec(expense, 0..10).prop_map(move |raw| {
                let participants: Vec<Participant> = (0..n)
                    .map(|i| Participant::new(format!("p{}", i), format!("P{}", i)))
                    .collect();
                let expenses = raw
                    .into_iter()
                    .enumerate()
                    .map(|(idx, (payer, shares))| {
                        let splits: Vec<Split> = shares
                            .iter()
                            .map(|(who, cents)| Split::new(format!("p{}", who), *cents as f64 / 100.0))
                            .collect();
                        let cents: u32 = shares.iter().map(|(_, c)| c).sum();
                        Expense {
                            id: format!("e{}", idx),
                            amount: cents as f64 / 100.0,
                            paid_by: format!("p{}", payer),
                            splits,
                        }
                    })
                    .collect();
                (participants, expenses)
            })
        })
    }

    proptest! {
        #[test]
        fn prop_balances_sum_to_zero((participants, expenses) in group_strategy()) {
            let total: f64 = calculate_balances(&participants, &expenses)
                .iter()
                .map(|b| b.balance)
                .sum();
            prop_assert!(approx_eq(total, 0.0), "sum was {}", total);
        }

        #[test]
        fn prop_settlements_clear_every_balance((participants, expenses) in group_strategy()) {
            let balances = calculate_balances(&participants, &expenses);
            let plan = settle(&balances);
            prop_assert!(plan.is_balanced());

            let mut remaining: HashMap<&str, f64> = balances
                .iter()
                .map(|b| (b.participant_id.as_str(), b.balance))
                .collect();
            for s in &plan.settlements {
                prop_assert!(s.amount > 0.0);
                *remaining.get_mut(s.from.as_str()).unwrap() += s.amount;
                *remaining.get_mut(s.to.as_str()).unwrap() -= s.amount;
            }
            for (id, left) in remaining {
                prop_assert!(left.abs() < 0.01, "{} left with {}", id, left);
            }
        }

        #[test]
        fn prop_at_most_n_minus_one_settlements((participants, expenses) in group_strategy()) {
            let balances = calculate_balances(&participants, &expenses);
            let settlements = calculate_settlements(&balances);
            prop_assert!(settlements.len() < participants.len());
        }
    }
}
