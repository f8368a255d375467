use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use bastion_core::{Entity, LoanId, TransactionId};

use crate::preview;

/// Which side of a loan the account is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoanKind {
    Lent,
    Borrowed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoanStatus {
    Active,
    Completed,
}

/// A loan position owned by the account.
///
/// Never mutated after creation except `status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loan {
    pub id: LoanId,
    pub amount: Decimal,
    /// Percent per annum.
    pub interest_rate: Decimal,
    pub duration_days: u32,
    pub status: LoanStatus,
    pub kind: LoanKind,
    /// Escrowed collateral (borrowed loans only).
    pub collateral: Option<Decimal>,
    /// Stated purpose (borrowed loans only).
    pub purpose: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Loan {
    pub fn is_active(&self) -> bool {
        self.status == LoanStatus::Active
    }

    /// Principal plus simple interest prorated over the loan term.
    pub fn expected_return(&self) -> Option<Decimal> {
        preview::expected_return(self.amount, self.interest_rate, self.duration_days)
    }
}

impl Entity for Loan {
    type Id = LoanId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Identifier of a savings circle.
///
/// Circles come from an external catalog (`circle-1`, ...) or are minted on
/// creation, so the id is an opaque string rather than a UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CircleId(String);

impl CircleId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl core::fmt::Display for CircleId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CircleId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for CircleId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CircleStatus {
    Active,
    Bidding,
    Distributing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CircleRole {
    Creator,
    Member,
}

/// A rotating savings circle (ROSCA) the account holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Circle {
    pub id: CircleId,
    pub name: String,
    pub monthly_amount: Decimal,
    /// Capacity.
    pub member_count: u32,
    pub current_members: u32,
    pub status: CircleStatus,
    pub role: Option<CircleRole>,
}

impl Circle {
    pub fn is_full(&self) -> bool {
        self.current_members >= self.member_count
    }

    /// What one distribution pays out: every current member's monthly amount.
    pub fn payout(&self) -> Option<Decimal> {
        preview::circle_pool(self.monthly_amount, self.current_members)
    }
}

impl Entity for Circle {
    type Id = CircleId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Stake,
    Lend,
    Borrow,
    Circle,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Stake => "stake",
            TransactionKind::Lend => "lend",
            TransactionKind::Borrow => "borrow",
            TransactionKind::Circle => "circle",
        }
    }
}

/// One entry of the account's activity history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub timestamp: DateTime<Utc>,
}

impl Entity for Transaction {
    type Id = TransactionId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
