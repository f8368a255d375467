//! Derived, read-only views over an account.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::account::Account;
use crate::catalog::{CircleCatalog, CircleListing};
use crate::model::{CircleRole, LoanKind, Transaction};
use crate::preview::staking_reward;

/// Number of transactions shown as recent activity.
pub const RECENT_ACTIVITY: usize = 5;

/// Totals are display figures; they pin at `Decimal::MAX` rather than fail.
fn total(values: impl Iterator<Item = Decimal>) -> Decimal {
    values.fold(Decimal::ZERO, Decimal::saturating_add)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountSummary {
    pub wallet_balance: Decimal,
    pub staked_amount: Decimal,
    pub estimated_staking_reward: Decimal,
    /// Lent loans of any status.
    pub loans_given: usize,
    pub active_circles: usize,

    pub active_lent_loans: usize,
    pub total_lent: Decimal,
    /// Mean rate of active lent loans; zero when there are none.
    pub average_lent_rate: Decimal,

    pub active_borrowed_loans: usize,
    pub total_borrowed: Decimal,
    pub collateral_locked: Decimal,

    pub monthly_commitment: Decimal,
    pub circles_created: usize,

    pub recent_activity: Vec<Transaction>,
}

impl Account {
    pub fn summary(&self) -> AccountSummary {
        let lent: Vec<_> = self.active_loans(LoanKind::Lent).collect();
        let borrowed: Vec<_> = self.active_loans(LoanKind::Borrowed).collect();

        let average_lent_rate = if lent.is_empty() {
            Decimal::ZERO
        } else {
            total(lent.iter().map(|l| l.interest_rate)) / Decimal::from(lent.len())
        };

        AccountSummary {
            wallet_balance: self.wallet_balance(),
            staked_amount: self.staked_amount(),
            estimated_staking_reward: staking_reward(self.staked_amount()).unwrap_or(Decimal::MAX),
            loans_given: self
                .loans()
                .iter()
                .filter(|l| l.kind == LoanKind::Lent)
                .count(),
            active_circles: self.circles().len(),
            active_lent_loans: lent.len(),
            total_lent: total(lent.iter().map(|l| l.amount)),
            average_lent_rate,
            active_borrowed_loans: borrowed.len(),
            total_borrowed: total(borrowed.iter().map(|l| l.amount)),
            collateral_locked: total(borrowed.iter().filter_map(|l| l.collateral)),
            monthly_commitment: total(self.circles().iter().map(|c| c.monthly_amount)),
            circles_created: self
                .circles()
                .iter()
                .filter(|c| c.role == Some(CircleRole::Creator))
                .count(),
            recent_activity: self.history().recent(RECENT_ACTIVITY),
        }
    }

    /// Catalog circles the account does not hold yet.
    pub fn available_circles(&self, catalog: &dyn CircleCatalog) -> Vec<CircleListing> {
        catalog
            .circles()
            .into_iter()
            .filter(|listing| self.circle(&listing.id).is_none())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::DEFAULT_OPENING_BALANCE;
    use crate::command::{LedgerCommand, Operation};
    use crate::model::{CircleId, CircleStatus};
    use bastion_core::AccountId;
    use bastion_events::execute;

    struct TwoCircles;

    impl CircleCatalog for TwoCircles {
        fn circles(&self) -> Vec<CircleListing> {
            ["circle-1", "circle-2"]
                .into_iter()
                .map(|id| CircleListing {
                    id: CircleId::from(id),
                    name: id.to_string(),
                    monthly_amount: Decimal::from(100),
                    member_count: 5,
                    current_members: 2,
                    status: CircleStatus::Active,
                })
                .collect()
        }
    }

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn empty_account_summary() {
        let account = Account::open(AccountId::new(), DEFAULT_OPENING_BALANCE).unwrap();
        let summary = account.summary();
        assert_eq!(summary.wallet_balance, d("1000"));
        assert_eq!(summary.average_lent_rate, Decimal::ZERO);
        assert_eq!(summary.loans_given, 0);
        assert!(summary.recent_activity.is_empty());
    }

    #[test]
    fn summary_aggregates_positions() {
        let mut account = Account::open(AccountId::new(), DEFAULT_OPENING_BALANCE).unwrap();
        for cmd in [
            LedgerCommand::stake(d("200")),
            LedgerCommand::lend(d("100"), d("5"), 30),
            LedgerCommand::lend(d("50"), d("6"), 60),
            LedgerCommand::borrow(d("40"), d("60"), "stock"),
            LedgerCommand::create_circle("Family", d("25"), 4),
            LedgerCommand::join_circle(&TwoCircles, &CircleId::from("circle-1"), d("100")).unwrap(),
        ] {
            execute(&mut account, &cmd).unwrap();
        }

        let s = account.summary();
        assert_eq!(s.staked_amount, d("200"));
        assert_eq!(s.estimated_staking_reward, d("17"));
        assert_eq!(s.loans_given, 2);
        assert_eq!(s.active_lent_loans, 2);
        assert_eq!(s.total_lent, d("150"));
        assert_eq!(s.average_lent_rate, d("5.5"));
        assert_eq!(s.active_borrowed_loans, 1);
        assert_eq!(s.total_borrowed, d("40"));
        assert_eq!(s.collateral_locked, d("60"));
        assert_eq!(s.active_circles, 2);
        assert_eq!(s.monthly_commitment, d("125"));
        assert_eq!(s.circles_created, 1);
        assert_eq!(s.recent_activity.len(), RECENT_ACTIVITY);
    }

    #[test]
    fn totals_pin_at_the_decimal_ceiling() {
        let mut account = Account::open(AccountId::new(), Decimal::MAX).unwrap();
        let amount = d("50000000000000000000000000000");
        let collateral = d("75000000000000000000000000000");
        for _ in 0..2 {
            execute(&mut account, &LedgerCommand::borrow(amount, collateral, "fleet")).unwrap();
        }

        let s = account.summary();
        assert_eq!(s.active_borrowed_loans, 2);
        assert_eq!(s.total_borrowed, Decimal::MAX);
        assert_eq!(s.collateral_locked, Decimal::MAX);
    }

    #[test]
    fn available_circles_hides_held_ones() {
        let mut account = Account::open(AccountId::new(), DEFAULT_OPENING_BALANCE).unwrap();
        let listing = TwoCircles.find_circle(&CircleId::from("circle-2")).unwrap();
        execute(
            &mut account,
            &LedgerCommand::new(Operation::JoinCircle {
                listing,
                stake_amount: d("100"),
            }),
        )
        .unwrap();

        let ids: Vec<_> = account
            .available_circles(&TwoCircles)
            .into_iter()
            .map(|l| l.id)
            .collect();
        assert_eq!(ids, vec![CircleId::from("circle-1")]);
    }
}
