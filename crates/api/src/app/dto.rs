use rust_decimal::Decimal;
use serde::Deserialize;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct StakeRequest {
    pub amount: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct LendRequest {
    pub amount: Decimal,
    pub interest_rate: Decimal,
    pub duration_days: u32,
}

#[derive(Debug, Deserialize)]
pub struct BorrowRequest {
    pub amount: Decimal,
    pub collateral: Decimal,
    pub purpose: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateCircleRequest {
    pub name: String,
    pub monthly_amount: Decimal,
    pub member_count: u32,
}

#[derive(Debug, Deserialize)]
pub struct JoinCircleRequest {
    pub circle_id: String,
    pub stake_amount: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct BidRequest {
    pub circle_id: String,
    pub bid_amount: Decimal,
}

// -------------------------
// Query parameters
// -------------------------

#[derive(Debug, Deserialize)]
pub struct LendPreviewQuery {
    pub amount: Decimal,
    pub interest_rate: Decimal,
    pub duration_days: u32,
}

#[derive(Debug, Deserialize)]
pub struct BorrowPreviewQuery {
    pub amount: Decimal,
    pub collateral: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct CirclePreviewQuery {
    pub monthly_amount: Decimal,
    pub member_count: u32,
}

#[derive(Debug, Deserialize)]
pub struct StakePreviewQuery {
    /// Defaults to the currently staked amount.
    pub amount: Option<Decimal>,
}
