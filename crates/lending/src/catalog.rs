//! Read-only catalog of circles and loan offers published by other users.
//!
//! The catalog is an external collaborator: the aggregate never stores it, it
//! only receives a resolved [`CircleListing`] inside a join command.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::model::{CircleId, CircleStatus};

/// A circle open for new members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircleListing {
    pub id: CircleId,
    pub name: String,
    pub monthly_amount: Decimal,
    pub member_count: u32,
    pub current_members: u32,
    pub status: CircleStatus,
}

impl CircleListing {
    pub fn is_full(&self) -> bool {
        self.current_members >= self.member_count
    }
}

/// A loan offered by a peer (display only).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanOffer {
    pub id: String,
    pub amount: Decimal,
    pub interest_rate: Decimal,
    pub duration_days: u32,
    pub lender: String,
    pub reputation: Decimal,
}

impl LoanOffer {
    pub fn total_repayment(&self) -> Option<Decimal> {
        crate::preview::expected_return(self.amount, self.interest_rate, self.duration_days)
    }
}

pub trait CircleCatalog: Send + Sync {
    fn circles(&self) -> Vec<CircleListing>;

    fn find_circle(&self, id: &CircleId) -> Option<CircleListing> {
        self.circles().into_iter().find(|c| &c.id == id)
    }
}

pub trait LoanOfferCatalog: Send + Sync {
    fn offers(&self) -> Vec<LoanOffer>;
}
