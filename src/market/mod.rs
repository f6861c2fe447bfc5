//! Market entity and lifecycle state machine
//!
//! A market prices one binary question on a cricket fixture: YES the home
//! side wins, NO the away side wins. States move strictly forward,
//! DRAFT -> OPEN -> LOCKED -> {RESOLVED, VOID}, with OPEN -> VOID allowed
//! for abandoned fixtures. RESOLVED and VOID are terminal.

mod lifecycle;

pub use lifecycle::LifecycleService;

use crate::error::{CoreError, CoreResult};
use crate::pool::Side;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Market question type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MarketType {
    /// Which team wins the match
    MatchWinner,
}

/// Lifecycle state of a market
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MarketState {
    /// Created but not yet tradable
    Draft,
    /// Accepting trades
    Open,
    /// Trading blocked, positions held
    Locked,
    /// Settled to a YES/NO outcome
    Resolved,
    /// Settled by refunding all stakes
    Void,
}

impl MarketState {
    /// Whether a transition to `to` is permitted
    pub fn can_transition(self, to: MarketState) -> bool {
        matches!(
            (self, to),
            (MarketState::Draft, MarketState::Open)
                | (MarketState::Open, MarketState::Locked)
                | (MarketState::Open, MarketState::Void)
                | (MarketState::Locked, MarketState::Resolved)
                | (MarketState::Locked, MarketState::Void)
        )
    }

    /// RESOLVED and VOID accept no further transitions
    pub fn is_terminal(self) -> bool {
        matches!(self, MarketState::Resolved | MarketState::Void)
    }
}

/// Resolution outcome of a market
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Outcome {
    /// Home team won
    Yes,
    /// Away team won
    No,
    /// Fixture abandoned; stakes refunded
    Void,
}

impl Outcome {
    /// The side paid out by this outcome, if any
    pub fn winning_side(self) -> Option<Side> {
        match self {
            Outcome::Yes => Some(Side::Yes),
            Outcome::No => Some(Side::No),
            Outcome::Void => None,
        }
    }

    /// The terminal market state this outcome settles into
    pub fn terminal_state(self) -> MarketState {
        match self {
            Outcome::Yes | Outcome::No => MarketState::Resolved,
            Outcome::Void => MarketState::Void,
        }
    }
}

/// A binary market tied to one fixture
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Market {
    /// Market identifier
    pub id: String,
    /// Fixture this market prices
    pub fixture_id: String,
    /// Question type
    pub market_type: MarketType,
    /// Lifecycle state
    pub state: MarketState,
    /// Trading fee in basis points, 0..=10000
    pub fee_bps: u32,
    /// Operator uid that created the market
    pub created_by: String,
    /// Set on DRAFT -> OPEN
    pub published_at: Option<DateTime<Utc>>,
    /// Set iff the state is terminal
    pub resolution: Option<Outcome>,
    /// Set iff the state is terminal
    pub resolved_at: Option<DateTime<Utc>>,
}

impl Market {
    /// Create a DRAFT market for a fixture
    pub fn new(
        id: impl Into<String>,
        fixture_id: impl Into<String>,
        fee_bps: u32,
        created_by: impl Into<String>,
    ) -> Market {
        Market {
            id: id.into(),
            fixture_id: fixture_id.into(),
            market_type: MarketType::MatchWinner,
            state: MarketState::Draft,
            fee_bps,
            created_by: created_by.into(),
            published_at: None,
            resolution: None,
            resolved_at: None,
        }
    }

    /// Move to `to`, rejecting anything the state machine does not allow.
    pub fn transition_to(&mut self, to: MarketState) -> CoreResult<()> {
        if !self.state.can_transition(to) {
            return Err(CoreError::IllegalStateTransition {
                from: self.state,
                to,
            });
        }
        self.state = to;
        Ok(())
    }

    /// Whether the trade engine accepts orders against this market
    pub fn is_open(&self) -> bool {
        self.state == MarketState::Open
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_market_is_draft() {
        let market = Market::new("m1", "f1", 100, "ops");
        assert_eq!(market.state, MarketState::Draft);
        assert_eq!(market.market_type, MarketType::MatchWinner);
        assert!(market.published_at.is_none());
        assert!(market.resolution.is_none());
        assert!(market.resolved_at.is_none());
    }

    #[test]
    fn test_forward_transitions_allowed() {
        assert!(MarketState::Draft.can_transition(MarketState::Open));
        assert!(MarketState::Open.can_transition(MarketState::Locked));
        assert!(MarketState::Open.can_transition(MarketState::Void));
        assert!(MarketState::Locked.can_transition(MarketState::Resolved));
        assert!(MarketState::Locked.can_transition(MarketState::Void));
    }

    #[test]
    fn test_backward_transitions_rejected() {
        assert!(!MarketState::Resolved.can_transition(MarketState::Open));
        assert!(!MarketState::Void.can_transition(MarketState::Open));
        assert!(!MarketState::Locked.can_transition(MarketState::Open));
        assert!(!MarketState::Open.can_transition(MarketState::Draft));
        // No skipping straight to RESOLVED
        assert!(!MarketState::Draft.can_transition(MarketState::Resolved));
        assert!(!MarketState::Open.can_transition(MarketState::Resolved));
        // DRAFT markets are discarded, not voided
        assert!(!MarketState::Draft.can_transition(MarketState::Void));
    }

    #[test]
    fn test_terminal_states() {
        assert!(MarketState::Resolved.is_terminal());
        assert!(MarketState::Void.is_terminal());
        assert!(!MarketState::Draft.is_terminal());
        assert!(!MarketState::Open.is_terminal());
        assert!(!MarketState::Locked.is_terminal());
    }

    #[test]
    fn test_transition_to_rejects_illegal() {
        let mut market = Market::new("m1", "f1", 100, "ops");
        let result = market.transition_to(MarketState::Locked);
        assert!(matches!(
            result,
            Err(CoreError::IllegalStateTransition {
                from: MarketState::Draft,
                to: MarketState::Locked,
            })
        ));
        // State untouched on rejection
        assert_eq!(market.state, MarketState::Draft);
    }

    #[test]
    fn test_transition_to_full_path() {
        let mut market = Market::new("m1", "f1", 100, "ops");
        market.transition_to(MarketState::Open).unwrap();
        market.transition_to(MarketState::Locked).unwrap();
        market.transition_to(MarketState::Resolved).unwrap();
        assert!(market.transition_to(MarketState::Open).is_err());
    }

    #[test]
    fn test_outcome_winning_side() {
        assert_eq!(Outcome::Yes.winning_side(), Some(Side::Yes));
        assert_eq!(Outcome::No.winning_side(), Some(Side::No));
        assert_eq!(Outcome::Void.winning_side(), None);
    }

    #[test]
    fn test_outcome_terminal_state() {
        assert_eq!(Outcome::Yes.terminal_state(), MarketState::Resolved);
        assert_eq!(Outcome::No.terminal_state(), MarketState::Resolved);
        assert_eq!(Outcome::Void.terminal_state(), MarketState::Void);
    }

    #[test]
    fn test_state_serde_uppercase() {
        assert_eq!(
            serde_json::to_string(&MarketState::Resolved).unwrap(),
            "\"RESOLVED\""
        );
        assert_eq!(
            serde_json::to_string(&MarketType::MatchWinner).unwrap(),
            "\"MATCH_WINNER\""
        );
        let state: MarketState = serde_json::from_str("\"OPEN\"").unwrap();
        assert_eq!(state, MarketState::Open);
    }
}
