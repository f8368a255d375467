//! Point-in-time loan, circle and staking economics.
//!
//! Nothing here accrues over wall-clock time; these are the figures shown to a
//! user before they commit to an operation. Every figure is `None` when it does
//! not fit in a `Decimal`.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::terms::{BORROW_RATE, DAYS_PER_YEAR, MIN_COLLATERAL_RATIO, STAKING_APY};

/// `amount × (1 + rate/100 × days/365)`.
pub fn expected_return(
    amount: Decimal,
    interest_rate: Decimal,
    duration_days: u32,
) -> Option<Decimal> {
    let growth = (interest_rate / Decimal::ONE_HUNDRED)
        .checked_mul(Decimal::from(duration_days))?
        .checked_div(DAYS_PER_YEAR)?;
    amount.checked_mul(Decimal::ONE.checked_add(growth)?)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LendPreview {
    pub expected_return: Decimal,
    pub profit: Decimal,
}

pub fn lend_preview(
    amount: Decimal,
    interest_rate: Decimal,
    duration_days: u32,
) -> Option<LendPreview> {
    let expected_return = expected_return(amount, interest_rate, duration_days)?;
    Some(LendPreview {
        expected_return,
        profit: expected_return.checked_sub(amount)?,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BorrowPreview {
    pub required_collateral: Decimal,
    /// Flat rate applied to the principal, as quoted on the request form.
    pub total_repayment: Decimal,
    /// Percent; absent when no collateral is given.
    pub loan_to_value: Option<Decimal>,
    pub sufficiently_collateralised: bool,
}

pub fn required_collateral(amount: Decimal) -> Option<Decimal> {
    amount.checked_mul(MIN_COLLATERAL_RATIO)
}

pub fn borrow_preview(amount: Decimal, collateral: Decimal) -> Option<BorrowPreview> {
    let required = required_collateral(amount)?;
    let loan_to_value = if collateral > Decimal::ZERO {
        Some(amount.checked_div(collateral)?.checked_mul(Decimal::ONE_HUNDRED)?)
    } else {
        None
    };
    let flat_rate = Decimal::ONE + BORROW_RATE / Decimal::ONE_HUNDRED;
    Some(BorrowPreview {
        required_collateral: required,
        total_repayment: amount.checked_mul(flat_rate)?,
        loan_to_value,
        sufficiently_collateralised: amount > Decimal::ZERO
            && collateral > Decimal::ZERO
            && collateral >= required,
    })
}

/// Total a circle collects each month from `member_count` members.
pub fn circle_pool(monthly_amount: Decimal, member_count: u32) -> Option<Decimal> {
    monthly_amount.checked_mul(Decimal::from(member_count))
}

/// Advertised yearly reward for a staked balance.
pub fn staking_reward(staked: Decimal) -> Option<Decimal> {
    staked.checked_mul(STAKING_APY)?.checked_div(Decimal::ONE_HUNDRED)
}
