//! Pluggable rules the reducer consults: which status moves are legal, and
//! what deleting a customer does to its tickets.

use crate::types::{ParseEnumError, TicketStatus};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Decides whether a ticket may move between two statuses
///
/// Consulted only when a patch actually changes the status.
pub trait TransitionPolicy: fmt::Debug + Send + Sync {
    /// Returns true if moving from `from` to `to` is allowed
    fn allows(&self, from: TicketStatus, to: TicketStatus) -> bool;
}

/// Every assignment is legal; the last write wins
#[derive(Debug, Clone, Copy, Default)]
pub struct PermissiveTransitions;

impl TransitionPolicy for PermissiveTransitions {
    fn allows(&self, _from: TicketStatus, _to: TicketStatus) -> bool {
        true
    }
}

/// The lifecycle table
///
/// - forward moves, including skipping ahead toward resolution
///   (`open → resolved`)
/// - reopening a resolved or closed ticket (`→ open`)
///
/// Anything else, such as `waiting → in_progress` or `closed → resolved`,
/// is refused.
#[derive(Debug, Clone, Copy, Default)]
pub struct GuardedTransitions;

impl TransitionPolicy for GuardedTransitions {
    fn allows(&self, from: TicketStatus, to: TicketStatus) -> bool {
        if from == to {
            return true;
        }
        if to == TicketStatus::Open {
            return from.is_finished();
        }
        to.rank() > from.rank()
    }
}

/// Which [`TransitionPolicy`] a store is built with
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionRules {
    /// [`PermissiveTransitions`]
    #[default]
    Permissive,
    /// [`GuardedTransitions`]
    Guarded,
}

impl TransitionRules {
    /// Instantiates the policy
    #[must_use]
    pub fn policy(self) -> Arc<dyn TransitionPolicy> {
        match self {
            Self::Permissive => Arc::new(PermissiveTransitions),
            Self::Guarded => Arc::new(GuardedTransitions),
        }
    }
}

impl fmt::Display for TransitionRules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::Permissive => "permissive",
            Self::Guarded => "guarded",
        })
    }
}

impl FromStr for TransitionRules {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "permissive" => Ok(Self::Permissive),
            "guarded" => Ok(Self::Guarded),
            _ => Err(ParseEnumError::new("transition rules", s)),
        }
    }
}

/// What happens to a customer's tickets when the customer is deleted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerDeletePolicy {
    /// Tickets stay and keep the now dangling customer id
    #[default]
    Orphan,
    /// Tickets are deleted along with the customer
    Cascade,
    /// The delete is refused while any ticket references the customer
    Block,
}

impl fmt::Display for CustomerDeletePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::Orphan => "orphan",
            Self::Cascade => "cascade",
            Self::Block => "block",
        })
    }
}

impl FromStr for CustomerDeletePolicy {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "orphan" => Ok(Self::Orphan),
            "cascade" => Ok(Self::Cascade),
            "block" => Ok(Self::Block),
            _ => Err(ParseEnumError::new("customer delete policy", s)),
        }
    }
}
