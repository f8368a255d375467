//! Static sample catalog served to demo sessions.

use rust_decimal::Decimal;

use bastion_lending::{
    CircleCatalog, CircleId, CircleListing, CircleStatus, LoanOffer, LoanOfferCatalog,
};

#[derive(Debug, Default, Clone, Copy)]
pub struct SampleCatalog;

fn circle(
    id: &str,
    name: &str,
    monthly: i64,
    capacity: u32,
    current: u32,
    status: CircleStatus,
) -> CircleListing {
    CircleListing {
        id: CircleId::from(id),
        name: name.to_string(),
        monthly_amount: Decimal::from(monthly),
        member_count: capacity,
        current_members: current,
        status,
    }
}

fn offer(id: &str, amount: i64, rate_tenths: i64, days: u32, lender: &str, rep_tenths: i64) -> LoanOffer {
    LoanOffer {
        id: id.to_string(),
        amount: Decimal::from(amount),
        interest_rate: Decimal::new(rate_tenths, 1),
        duration_days: days,
        lender: lender.to_string(),
        reputation: Decimal::new(rep_tenths, 1),
    }
}

impl CircleCatalog for SampleCatalog {
    fn circles(&self) -> Vec<CircleListing> {
        vec![
            circle("circle-1", "Startup Entrepreneurs", 200, 8, 6, CircleStatus::Active),
            circle("circle-2", "Tech Workers Savings", 500, 10, 8, CircleStatus::Bidding),
            circle("circle-3", "Small Business Fund", 300, 6, 4, CircleStatus::Active),
            circle("circle-4", "Student Emergency Fund", 100, 12, 10, CircleStatus::Distributing),
        ]
    }
}

impl LoanOfferCatalog for SampleCatalog {
    fn offers(&self) -> Vec<LoanOffer> {
        vec![
            offer("1", 500, 55, 30, "Alice", 48),
            offer("2", 1000, 60, 45, "Bob", 49),
            offer("3", 750, 58, 60, "Charlie", 47),
            offer("4", 2000, 62, 90, "Diana", 50),
        ]
    }
}
