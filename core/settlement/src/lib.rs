//! Group expense settlement for PocketVault.
//!
//! Given the participants of a group and the expenses they shared, this
//! crate derives each participant's net balance and a list of payments
//! that settles the group.
//!
//! Amounts are `f64` currency units compared with the shared
//! `MONEY_TOLERANCE`. The engine is pure: it performs no I/O and keeps no
//! state between calls.

pub mod balance;
pub mod model;
pub mod plan;
pub mod split;

pub use balance::calculate_balances;
pub use model::{Balance, Expense, Participant, Settlement, Split};
pub use plan::{calculate_settlements, settle, SettlementPlan};
pub use split::{find_participant_by_email, normalize_email, split_equally, validate_exact_splits};
