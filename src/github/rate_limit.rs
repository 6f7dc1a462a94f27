//! Rate budget tracking and the guard that decides whether to keep spending it.

use log::{debug, warn};
use serde::Deserialize;

use crate::error::{PrlensError, Result};

/// Remaining budget below which a warning is emitted before proceeding.
pub const LOW_BUDGET_THRESHOLD: i64 = 100;

/// The most recently observed rate-limit snapshot, refreshed from every
/// response that carries one.
#[derive(Debug, Clone, Deserialize)]
pub struct RateBudget {
    /// Points the query that returned this snapshot cost.
    pub cost: i64,
    /// Request points left in the current window.
    pub remaining: i64,
    /// RFC 3339 timestamp at which the window resets.
    #[serde(rename = "resetAt")]
    pub reset_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetStatus {
    Ok,
    Low,
    Exhausted,
}

/// Classify a budget snapshot without side effects.
pub fn classify(budget: &RateBudget) -> BudgetStatus {
    if budget.remaining <= 0 {
        BudgetStatus::Exhausted
    } else if budget.remaining < LOW_BUDGET_THRESHOLD {
        BudgetStatus::Low
    } else {
        BudgetStatus::Ok
    }
}

/// Decide whether the next request may be issued.
///
/// Runs after every response that reports a budget: proceeds silently while
/// budget is healthy, warns when it drops below [`LOW_BUDGET_THRESHOLD`],
/// and aborts with the reset timestamp once it reaches zero.
pub fn check_budget(budget: &RateBudget) -> Result<()> {
    debug!(
        "rate budget: cost {}, {} points remaining, resets at {}",
        budget.cost, budget.remaining, budget.reset_at
    );

    match classify(budget) {
        BudgetStatus::Exhausted => Err(PrlensError::RateLimitExceeded {
            reset_at: budget.reset_at.clone(),
        }),
        BudgetStatus::Low => {
            warn!(
                "GitHub rate limit low: {} points remaining (resets at {})",
                budget.remaining, budget.reset_at
            );
            Ok(())
        }
        BudgetStatus::Ok => Ok(()),
    }
}
