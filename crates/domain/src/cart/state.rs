//! Cart state machine.

use serde::{Deserialize, Serialize};

/// The state of a cart in its lifecycle.
///
/// State transitions:
/// ```text
/// Active ──► Completed
/// ```
///
/// The transition is one-way; a completed cart never reopens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CartState {
    /// Cart is open, items can be added.
    #[default]
    Active,

    /// Checkout happened (terminal state).
    Completed,
}

impl CartState {
    /// Returns true if items can be modified in this state.
    pub fn can_modify_items(&self) -> bool {
        matches!(self, CartState::Active)
    }

    /// Returns true if this is a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, CartState::Completed)
    }

    /// Returns the state name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            CartState::Active => "Active",
            CartState::Completed => "Completed",
        }
    }
}

impl std::fmt::Display for CartState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
