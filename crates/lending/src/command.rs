use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bastion_core::{DomainError, DomainResult, LoanId, TransactionId};

use crate::catalog::{CircleCatalog, CircleListing};
use crate::model::CircleId;

/// A state-changing request against the account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Operation {
    Stake {
        amount: Decimal,
    },
    Unstake,
    Lend {
        amount: Decimal,
        interest_rate: Decimal,
        duration_days: u32,
    },
    /// Rate and duration are protocol constants and deliberately absent.
    Borrow {
        amount: Decimal,
        collateral: Decimal,
        purpose: String,
    },
    CreateCircle {
        name: String,
        monthly_amount: Decimal,
        member_count: u32,
    },
    JoinCircle {
        listing: CircleListing,
        stake_amount: Decimal,
    },
    Bid {
        circle_id: CircleId,
        bid_amount: Decimal,
    },
    Distribute {
        circle_id: CircleId,
    },
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Stake { .. } => "stake",
            Operation::Unstake => "unstake",
            Operation::Lend { .. } => "lend",
            Operation::Borrow { .. } => "borrow",
            Operation::CreateCircle { .. } => "create_circle",
            Operation::JoinCircle { .. } => "join_circle",
            Operation::Bid { .. } => "bid",
            Operation::Distribute { .. } => "distribute",
        }
    }
}

/// Command envelope: the operation plus the identity and time it is issued with.
///
/// Ids of anything the command creates are derived from `command_id`, which
/// keeps `Account::handle` deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerCommand {
    pub command_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub operation: Operation,
}

impl LedgerCommand {
    pub fn new(operation: Operation) -> Self {
        Self {
            command_id: Uuid::now_v7(),
            occurred_at: Utc::now(),
            operation,
        }
    }

    pub fn stake(amount: Decimal) -> Self {
        Self::new(Operation::Stake { amount })
    }

    pub fn unstake() -> Self {
        Self::new(Operation::Unstake)
    }

    pub fn lend(amount: Decimal, interest_rate: Decimal, duration_days: u32) -> Self {
        Self::new(Operation::Lend {
            amount,
            interest_rate,
            duration_days,
        })
    }

    pub fn borrow(amount: Decimal, collateral: Decimal, purpose: impl Into<String>) -> Self {
        Self::new(Operation::Borrow {
            amount,
            collateral,
            purpose: purpose.into(),
        })
    }

    pub fn create_circle(name: impl Into<String>, monthly_amount: Decimal, member_count: u32) -> Self {
        Self::new(Operation::CreateCircle {
            name: name.into(),
            monthly_amount,
            member_count,
        })
    }

    /// Resolve `circle_id` against the catalog and build a join command.
    pub fn join_circle(
        catalog: &dyn CircleCatalog,
        circle_id: &CircleId,
        stake_amount: Decimal,
    ) -> DomainResult<Self> {
        let listing = catalog
            .find_circle(circle_id)
            .ok_or_else(|| DomainError::not_found(format!("circle {circle_id} is not offered")))?;
        Ok(Self::new(Operation::JoinCircle {
            listing,
            stake_amount,
        }))
    }

    pub fn bid(circle_id: impl Into<CircleId>, bid_amount: Decimal) -> Self {
        Self::new(Operation::Bid {
            circle_id: circle_id.into(),
            bid_amount,
        })
    }

    pub fn distribute(circle_id: impl Into<CircleId>) -> Self {
        Self::new(Operation::Distribute {
            circle_id: circle_id.into(),
        })
    }

    pub fn loan_id(&self) -> LoanId {
        LoanId::from_uuid(self.command_id)
    }

    pub fn transaction_id(&self) -> TransactionId {
        TransactionId::from_uuid(self.command_id)
    }

    pub fn created_circle_id(&self) -> CircleId {
        CircleId::new(format!("circle-{}", self.command_id))
    }
}
