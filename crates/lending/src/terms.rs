//! Protocol constants.
//!
//! Borrow terms are fixed by the protocol; callers can never override them.

use rust_decimal::Decimal;

/// Collateral must be at least 150% of the borrowed amount.
pub const MIN_COLLATERAL_RATIO: Decimal = Decimal::from_parts(15, 0, 0, false, 1);

/// Annual rate (percent) charged on every borrowed loan.
pub const BORROW_RATE: Decimal = Decimal::from_parts(65, 0, 0, false, 1);

/// Term of every borrowed loan, in days.
pub const BORROW_DURATION_DAYS: u32 = 30;

/// Fraction of a bid charged as a fee.
pub const BID_FEE_RATE: Decimal = Decimal::from_parts(10, 0, 0, false, 2);

/// Smallest circle a member may create.
pub const MIN_CIRCLE_MEMBERS: u32 = 3;

/// Advertised staking yield (percent per annum). Display only; never accrued.
pub const STAKING_APY: Decimal = Decimal::from_parts(85, 0, 0, false, 1);

pub const DAYS_PER_YEAR: Decimal = Decimal::from_parts(365, 0, 0, false, 0);
