use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use bastion_core::TransactionId;
use bastion_events::Event;

use crate::model::{Circle, CircleId, Loan};

/// Facts recorded by the account aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LedgerEvent {
    Staked {
        transaction_id: TransactionId,
        amount: Decimal,
        occurred_at: DateTime<Utc>,
    },
    /// Releases the whole staked balance. Records no transaction.
    Unstaked {
        amount: Decimal,
        occurred_at: DateTime<Utc>,
    },
    LoanOffered {
        transaction_id: TransactionId,
        loan: Loan,
        occurred_at: DateTime<Utc>,
    },
    LoanTaken {
        transaction_id: TransactionId,
        loan: Loan,
        occurred_at: DateTime<Utc>,
    },
    CircleCreated {
        transaction_id: TransactionId,
        circle: Circle,
        occurred_at: DateTime<Utc>,
    },
    CircleJoined {
        transaction_id: TransactionId,
        circle: Circle,
        stake_amount: Decimal,
        occurred_at: DateTime<Utc>,
    },
    /// Only the fee leaves the wallet. Records no transaction.
    BidPlaced {
        circle_id: CircleId,
        bid_amount: Decimal,
        fee: Decimal,
        occurred_at: DateTime<Utc>,
    },
    PayoutDistributed {
        transaction_id: TransactionId,
        circle_id: CircleId,
        payout: Decimal,
        occurred_at: DateTime<Utc>,
    },
}

impl Event for LedgerEvent {
    fn event_type(&self) -> &'static str {
        match self {
            LedgerEvent::Staked { .. } => "lending.account.staked",
            LedgerEvent::Unstaked { .. } => "lending.account.unstaked",
            LedgerEvent::LoanOffered { .. } => "lending.account.loan_offered",
            LedgerEvent::LoanTaken { .. } => "lending.account.loan_taken",
            LedgerEvent::CircleCreated { .. } => "lending.account.circle_created",
            LedgerEvent::CircleJoined { .. } => "lending.account.circle_joined",
            LedgerEvent::BidPlaced { .. } => "lending.account.bid_placed",
            LedgerEvent::PayoutDistributed { .. } => "lending.account.payout_distributed",
        }
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            LedgerEvent::Staked { occurred_at, .. }
            | LedgerEvent::Unstaked { occurred_at, .. }
            | LedgerEvent::LoanOffered { occurred_at, .. }
            | LedgerEvent::LoanTaken { occurred_at, .. }
            | LedgerEvent::CircleCreated { occurred_at, .. }
            | LedgerEvent::CircleJoined { occurred_at, .. }
            | LedgerEvent::BidPlaced { occurred_at, .. }
            | LedgerEvent::PayoutDistributed { occurred_at, .. } => *occurred_at,
        }
    }
}
