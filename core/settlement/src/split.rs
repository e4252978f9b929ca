//! Helpers for building expense splits and matching participants.

use crate::model::{Participant, Split};
use pocketvault_common::money::approx_eq;
use pocketvault_common::{Error, Result};

/// Divide `amount` evenly across `participant_ids`, in the given order.
///
/// Shares are not rounded to cents. An empty id list yields no splits.
pub fn split_equally<S: AsRef<str>>(amount: f64, participant_ids: &[S]) -> Vec<Split> {
    if participant_ids.is_empty() {
        return Vec::new();
    }
    let share = amount / participant_ids.len() as f64;
    participant_ids
        .iter()
        .map(|id| Split::new(id.as_ref(), share))
        .collect()
}

/// Check that hand-entered splits add up to the expense amount.
///
/// # Errors
/// - `InvalidInput` if the total differs from `amount` by more than the
///   money tolerance
pub fn validate_exact_splits(amount: f64, splits: &[Split]) -> Result<()> {
    let total: f64 = splits.iter().map(|s| s.amount).sum();
    if approx_eq(total, amount) {
        Ok(())
    } else {
        Err(Error::InvalidInput(format!(
            "splits total {:.2} but the expense is {:.2}",
            total, amount
        )))
    }
}

/// Trim and lowercase an email address.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Id of the participant whose email matches `email`, ignoring case.
pub fn find_participant_by_email<'a>(participants: &'a [Participant], email: &str) -> Option<&'a str> {
    if email.is_empty() {
        return None;
    }
    let wanted = email.to_lowercase();
    participants
        .iter()
        .find(|p| {
            p.email
                .as_deref()
                .is_some_and(|own| own.to_lowercase() == wanted)
        })
        .map(|p| p.id.as_str())
}
