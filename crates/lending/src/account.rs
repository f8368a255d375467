use rust_decimal::Decimal;
use serde::Serialize;

use bastion_core::entity::find_by_id;
use bastion_core::{AccountId, Aggregate, AggregateRoot, DomainError, DomainResult, LoanId};

use crate::catalog::CircleListing;
use crate::command::{LedgerCommand, Operation};
use crate::event::LedgerEvent;
use crate::history::TransactionHistory;
use crate::model::{
    Circle, CircleId, CircleRole, CircleStatus, Loan, LoanKind, LoanStatus, Transaction,
    TransactionKind,
};
use crate::preview::{circle_pool, required_collateral};
use crate::terms::{BID_FEE_RATE, BORROW_DURATION_DAYS, BORROW_RATE, MIN_CIRCLE_MEMBERS};

/// Wallet balance a fresh session starts with.
pub const DEFAULT_OPENING_BALANCE: Decimal = Decimal::from_parts(1000, 0, 0, false, 0);

/// Aggregate root: the user's account.
///
/// Owns the wallet and staked balances, every loan position and circle
/// membership, and the bounded transaction history. Both balances are
/// non-negative in every reachable state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Account {
    id: AccountId,
    wallet_balance: Decimal,
    staked_amount: Decimal,
    loans: Vec<Loan>,
    circles: Vec<Circle>,
    #[serde(rename = "transactions")]
    history: TransactionHistory,
    version: u64,
}

impl Account {
    pub fn open(id: AccountId, opening_balance: Decimal) -> DomainResult<Self> {
        if opening_balance < Decimal::ZERO {
            return Err(DomainError::validation("opening balance must not be negative"));
        }
        Ok(Self {
            id,
            wallet_balance: opening_balance,
            staked_amount: Decimal::ZERO,
            loans: Vec::new(),
            circles: Vec::new(),
            history: TransactionHistory::new(),
            version: 0,
        })
    }

    pub fn id_typed(&self) -> AccountId {
        self.id
    }

    pub fn wallet_balance(&self) -> Decimal {
        self.wallet_balance
    }

    pub fn staked_amount(&self) -> Decimal {
        self.staked_amount
    }

    pub fn loans(&self) -> &[Loan] {
        &self.loans
    }

    pub fn circles(&self) -> &[Circle] {
        &self.circles
    }

    pub fn history(&self) -> &TransactionHistory {
        &self.history
    }

    pub fn loan(&self, id: &LoanId) -> Option<&Loan> {
        find_by_id(&self.loans, id)
    }

    pub fn circle(&self, id: &CircleId) -> Option<&Circle> {
        find_by_id(&self.circles, id)
    }

    pub fn active_loans(&self, kind: LoanKind) -> impl Iterator<Item = &Loan> {
        self.loans
            .iter()
            .filter(move |l| l.kind == kind && l.is_active())
    }
}

impl AggregateRoot for Account {
    type Id = AccountId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

impl Aggregate for Account {
    type Command = LedgerCommand;
    type Event = LedgerEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            LedgerEvent::Staked {
                transaction_id,
                amount,
                occurred_at,
            } => {
                self.wallet_balance -= *amount;
                self.staked_amount += *amount;
                self.record(*transaction_id, TransactionKind::Stake, *amount, *occurred_at);
            }
            LedgerEvent::Unstaked { amount, .. } => {
                self.wallet_balance += *amount;
                self.staked_amount = Decimal::ZERO;
            }
            LedgerEvent::LoanOffered {
                transaction_id,
                loan,
                occurred_at,
            } => {
                self.wallet_balance -= loan.amount;
                self.loans.push(loan.clone());
                self.record(*transaction_id, TransactionKind::Lend, loan.amount, *occurred_at);
            }
            LedgerEvent::LoanTaken {
                transaction_id,
                loan,
                occurred_at,
            } => {
                let collateral = loan.collateral.unwrap_or(Decimal::ZERO);
                self.wallet_balance += loan.amount - collateral;
                self.loans.push(loan.clone());
                self.record(*transaction_id, TransactionKind::Borrow, loan.amount, *occurred_at);
            }
            LedgerEvent::CircleCreated {
                transaction_id,
                circle,
                occurred_at,
            } => {
                self.circles.push(circle.clone());
                self.record(
                    *transaction_id,
                    TransactionKind::Circle,
                    circle.monthly_amount,
                    *occurred_at,
                );
            }
            LedgerEvent::CircleJoined {
                transaction_id,
                circle,
                stake_amount,
                occurred_at,
            } => {
                self.wallet_balance -= *stake_amount;
                self.circles.push(circle.clone());
                self.record(*transaction_id, TransactionKind::Circle, *stake_amount, *occurred_at);
            }
            LedgerEvent::BidPlaced { fee, .. } => {
                self.wallet_balance -= *fee;
            }
            LedgerEvent::PayoutDistributed {
                transaction_id,
                payout,
                occurred_at,
                ..
            } => {
                self.wallet_balance += *payout;
                self.record(*transaction_id, TransactionKind::Circle, *payout, *occurred_at);
            }
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match &command.operation {
            Operation::Stake { amount } => self.handle_stake(command, *amount),
            Operation::Unstake => self.handle_unstake(command),
            Operation::Lend {
                amount,
                interest_rate,
                duration_days,
            } => self.handle_lend(command, *amount, *interest_rate, *duration_days),
            Operation::Borrow {
                amount,
                collateral,
                purpose,
            } => self.handle_borrow(command, *amount, *collateral, purpose),
            Operation::CreateCircle {
                name,
                monthly_amount,
                member_count,
            } => self.handle_create_circle(command, name, *monthly_amount, *member_count),
            Operation::JoinCircle {
                listing,
                stake_amount,
            } => self.handle_join_circle(command, listing, *stake_amount),
            Operation::Bid {
                circle_id,
                bid_amount,
            } => self.handle_bid(command, circle_id, *bid_amount),
            Operation::Distribute { circle_id } => self.handle_distribute(command, circle_id),
        }
    }
}

fn ensure_positive(value: Decimal, what: &str) -> DomainResult<()> {
    if value <= Decimal::ZERO {
        return Err(DomainError::validation(format!("{what} must be positive")));
    }
    Ok(())
}

/// Rejects a figure that overflowed `Decimal` before any event carries it.
fn in_range(value: Option<Decimal>, what: &str) -> DomainResult<Decimal> {
    value.ok_or_else(|| DomainError::invariant(format!("{what} exceeds the representable range")))
}

impl Account {
    fn record(
        &mut self,
        id: bastion_core::TransactionId,
        kind: TransactionKind,
        amount: Decimal,
        timestamp: chrono::DateTime<chrono::Utc>,
    ) {
        self.history.record(Transaction {
            id,
            kind,
            amount,
            timestamp,
        });
    }

    fn ensure_affordable(&self, amount: Decimal, what: &str) -> DomainResult<()> {
        if amount > self.wallet_balance {
            return Err(DomainError::insufficient_funds(format!(
                "{what} of {amount} exceeds wallet balance of {}",
                self.wallet_balance
            )));
        }
        Ok(())
    }

    fn handle_stake(&self, cmd: &LedgerCommand, amount: Decimal) -> DomainResult<Vec<LedgerEvent>> {
        ensure_positive(amount, "stake amount")?;
        self.ensure_affordable(amount, "stake")?;
        in_range(self.staked_amount.checked_add(amount), "staked balance")?;

        Ok(vec![LedgerEvent::Staked {
            transaction_id: cmd.transaction_id(),
            amount,
            occurred_at: cmd.occurred_at,
        }])
    }

    fn handle_unstake(&self, cmd: &LedgerCommand) -> DomainResult<Vec<LedgerEvent>> {
        if self.staked_amount <= Decimal::ZERO {
            return Err(DomainError::validation("nothing is staked"));
        }
        in_range(self.wallet_balance.checked_add(self.staked_amount), "wallet balance")?;

        Ok(vec![LedgerEvent::Unstaked {
            amount: self.staked_amount,
            occurred_at: cmd.occurred_at,
        }])
    }

    fn handle_lend(
        &self,
        cmd: &LedgerCommand,
        amount: Decimal,
        interest_rate: Decimal,
        duration_days: u32,
    ) -> DomainResult<Vec<LedgerEvent>> {
        ensure_positive(amount, "loan amount")?;
        if interest_rate < Decimal::ZERO {
            return Err(DomainError::validation("interest rate must not be negative"));
        }
        if duration_days == 0 {
            return Err(DomainError::validation("duration must be at least one day"));
        }
        self.ensure_affordable(amount, "loan")?;

        let loan = Loan {
            id: cmd.loan_id(),
            amount,
            interest_rate,
            duration_days,
            status: LoanStatus::Active,
            kind: LoanKind::Lent,
            collateral: None,
            purpose: None,
            created_at: cmd.occurred_at,
        };
        in_range(loan.expected_return(), "expected return")?;

        Ok(vec![LedgerEvent::LoanOffered {
            transaction_id: cmd.transaction_id(),
            loan,
            occurred_at: cmd.occurred_at,
        }])
    }

    fn handle_borrow(
        &self,
        cmd: &LedgerCommand,
        amount: Decimal,
        collateral: Decimal,
        purpose: &str,
    ) -> DomainResult<Vec<LedgerEvent>> {
        ensure_positive(amount, "loan amount")?;
        ensure_positive(collateral, "collateral")?;
        if purpose.trim().is_empty() {
            return Err(DomainError::validation("loan purpose is required"));
        }
        let required = in_range(required_collateral(amount), "required collateral")?;
        if collateral < required {
            return Err(DomainError::validation(format!(
                "collateral of {collateral} is below the required {required}"
            )));
        }
        // Cash arrives and collateral is escrowed in the same step.
        let escrow_shortfall = collateral - amount;
        self.ensure_affordable(escrow_shortfall, "net collateral")?;

        let loan = Loan {
            id: cmd.loan_id(),
            amount,
            interest_rate: BORROW_RATE,
            duration_days: BORROW_DURATION_DAYS,
            status: LoanStatus::Active,
            kind: LoanKind::Borrowed,
            collateral: Some(collateral),
            purpose: Some(purpose.trim().to_string()),
            created_at: cmd.occurred_at,
        };
        in_range(loan.expected_return(), "repayment")?;

        Ok(vec![LedgerEvent::LoanTaken {
            transaction_id: cmd.transaction_id(),
            loan,
            occurred_at: cmd.occurred_at,
        }])
    }

    fn handle_create_circle(
        &self,
        cmd: &LedgerCommand,
        name: &str,
        monthly_amount: Decimal,
        member_count: u32,
    ) -> DomainResult<Vec<LedgerEvent>> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("circle name is required"));
        }
        ensure_positive(monthly_amount, "monthly amount")?;
        if member_count < MIN_CIRCLE_MEMBERS {
            return Err(DomainError::validation(format!(
                "a circle needs at least {MIN_CIRCLE_MEMBERS} members"
            )));
        }
        in_range(circle_pool(monthly_amount, member_count), "circle pool")?;

        // The creator's first contribution is not charged here.
        Ok(vec![LedgerEvent::CircleCreated {
            transaction_id: cmd.transaction_id(),
            circle: Circle {
                id: cmd.created_circle_id(),
                name: name.to_string(),
                monthly_amount,
                member_count,
                current_members: 1,
                status: CircleStatus::Active,
                role: Some(CircleRole::Creator),
            },
            occurred_at: cmd.occurred_at,
        }])
    }

    fn handle_join_circle(
        &self,
        cmd: &LedgerCommand,
        listing: &CircleListing,
        stake_amount: Decimal,
    ) -> DomainResult<Vec<LedgerEvent>> {
        ensure_positive(stake_amount, "stake amount")?;
        if self.circle(&listing.id).is_some() {
            return Err(DomainError::validation(format!(
                "already a member of circle {}",
                listing.id
            )));
        }
        if listing.is_full() {
            return Err(DomainError::validation(format!("circle {} is full", listing.id)));
        }
        self.ensure_affordable(stake_amount, "circle stake")?;

        Ok(vec![LedgerEvent::CircleJoined {
            transaction_id: cmd.transaction_id(),
            circle: Circle {
                id: listing.id.clone(),
                name: listing.name.clone(),
                monthly_amount: listing.monthly_amount,
                member_count: listing.member_count,
                current_members: listing.current_members + 1,
                status: listing.status,
                role: Some(CircleRole::Member),
            },
            stake_amount,
            occurred_at: cmd.occurred_at,
        }])
    }

    fn handle_bid(
        &self,
        cmd: &LedgerCommand,
        circle_id: &CircleId,
        bid_amount: Decimal,
    ) -> DomainResult<Vec<LedgerEvent>> {
        if circle_id.is_blank() {
            return Err(DomainError::validation("circle id is required"));
        }
        ensure_positive(bid_amount, "bid amount")?;
        let fee = in_range(bid_amount.checked_mul(BID_FEE_RATE), "bid fee")?;
        self.ensure_affordable(fee, "bid fee")?;

        Ok(vec![LedgerEvent::BidPlaced {
            circle_id: circle_id.clone(),
            bid_amount,
            fee,
            occurred_at: cmd.occurred_at,
        }])
    }

    fn handle_distribute(
        &self,
        cmd: &LedgerCommand,
        circle_id: &CircleId,
    ) -> DomainResult<Vec<LedgerEvent>> {
        let circle = self
            .circle(circle_id)
            .ok_or_else(|| DomainError::not_found(format!("circle {circle_id} is not held")))?;
        let payout = in_range(circle.payout(), "payout")?;
        in_range(self.wallet_balance.checked_add(payout), "wallet balance")?;

        // Circle state is not reset, so a second call pays out again.
        Ok(vec![LedgerEvent::PayoutDistributed {
            transaction_id: cmd.transaction_id(),
            circle_id: circle.id.clone(),
            payout,
            occurred_at: cmd.occurred_at,
        }])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bastion_events::execute;
    use proptest::prelude::*;

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn fresh() -> Account {
        Account::open(AccountId::new(), DEFAULT_OPENING_BALANCE).unwrap()
    }

    fn listing(id: &str, monthly: i64, capacity: u32, current: u32) -> CircleListing {
        CircleListing {
            id: CircleId::from(id),
            name: format!("{id} circle"),
            monthly_amount: Decimal::from(monthly),
            member_count: capacity,
            current_members: current,
            status: CircleStatus::Distributing,
        }
    }

    fn join(listing: CircleListing, stake: &str) -> LedgerCommand {
        LedgerCommand::new(Operation::JoinCircle {
            listing,
            stake_amount: d(stake),
        })
    }

    /// Run a command that must be rejected and check nothing moved.
    fn assert_rejected(account: &mut Account, cmd: LedgerCommand) -> DomainError {
        let before = account.clone();
        let err = execute(account, &cmd).unwrap_err();
        assert_eq!(*account, before);
        err
    }

    #[test]
    fn opening_balance_must_not_be_negative() {
        assert!(Account::open(AccountId::new(), d("-1")).is_err());
        assert_eq!(fresh().wallet_balance(), d("1000"));
    }

    #[test]
    fn stake_moves_funds_and_records_transaction() {
        let mut account = fresh();
        let cmd = LedgerCommand::stake(d("250"));

        let events = execute(&mut account, &cmd).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(account.wallet_balance(), d("750"));
        assert_eq!(account.staked_amount(), d("250"));
        assert_eq!(account.version(), 1);

        let tx = account.history().latest().unwrap();
        assert_eq!(tx.kind, TransactionKind::Stake);
        assert_eq!(tx.amount, d("250"));
        assert_eq!(tx.id, cmd.transaction_id());
    }

    #[test]
    fn stake_rejects_non_positive_and_overdrawn_amounts() {
        let mut account = fresh();
        let err = assert_rejected(&mut account, LedgerCommand::stake(Decimal::ZERO));
        assert!(matches!(err, DomainError::Validation(_)));
        let err = assert_rejected(&mut account, LedgerCommand::stake(d("1000.01")));
        assert!(matches!(err, DomainError::InsufficientFunds(_)));
    }

    #[test]
    fn unstake_returns_everything_without_a_transaction() {
        let mut account = fresh();
        execute(&mut account, &LedgerCommand::stake(d("400"))).unwrap();
        execute(&mut account, &LedgerCommand::unstake()).unwrap();

        assert_eq!(account.wallet_balance(), d("1000"));
        assert_eq!(account.staked_amount(), Decimal::ZERO);
        assert_eq!(account.history().len(), 1);

        let err = assert_rejected(&mut account, LedgerCommand::unstake());
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn lend_debits_wallet_and_opens_position() {
        let mut account = fresh();
        let cmd = LedgerCommand::lend(d("300"), d("5"), 30);
        execute(&mut account, &cmd).unwrap();

        assert_eq!(account.wallet_balance(), d("700"));
        let loan = account.loan(&cmd.loan_id()).unwrap();
        assert_eq!(loan.kind, LoanKind::Lent);
        assert_eq!(loan.status, LoanStatus::Active);
        assert_eq!(loan.interest_rate, d("5"));
        assert_eq!(loan.duration_days, 30);
        assert_eq!(account.history().latest().unwrap().kind, TransactionKind::Lend);
    }

    #[test]
    fn lend_rejects_bad_terms() {
        let mut account = fresh();
        let err = assert_rejected(&mut account, LedgerCommand::lend(d("1001"), d("5"), 30));
        assert!(matches!(err, DomainError::InsufficientFunds(_)));
        assert_rejected(&mut account, LedgerCommand::lend(d("-5"), d("5"), 30));
        assert_rejected(&mut account, LedgerCommand::lend(d("100"), d("-0.1"), 30));
        assert_rejected(&mut account, LedgerCommand::lend(d("100"), d("5"), 0));
    }

    #[test]
    fn lend_accepts_zero_rate() {
        let mut account = fresh();
        execute(&mut account, &LedgerCommand::lend(d("100"), Decimal::ZERO, 1)).unwrap();
        assert_eq!(account.wallet_balance(), d("900"));
    }

    #[test]
    fn borrow_requires_one_and_a_half_times_collateral() {
        let mut account = fresh();
        let err = assert_rejected(&mut account, LedgerCommand::borrow(d("100"), d("149"), "x"));
        assert!(matches!(err, DomainError::Validation(_)));

        let cmd = LedgerCommand::borrow(d("100"), d("150"), "x");
        execute(&mut account, &cmd).unwrap();

        assert_eq!(account.wallet_balance(), d("950"));
        let loan = account.loan(&cmd.loan_id()).unwrap();
        assert_eq!(loan.kind, LoanKind::Borrowed);
        assert_eq!(loan.amount, d("100"));
        assert_eq!(loan.interest_rate, d("6.5"));
        assert_eq!(loan.duration_days, 30);
        assert_eq!(loan.collateral, Some(d("150")));
        let tx = account.history().latest().unwrap();
        assert_eq!((tx.kind, tx.amount), (TransactionKind::Borrow, d("100")));
    }

    #[test]
    fn borrow_rejects_blank_purpose_and_unaffordable_escrow() {
        let mut account = fresh();
        assert_rejected(&mut account, LedgerCommand::borrow(d("100"), d("150"), "  "));
        assert_rejected(&mut account, LedgerCommand::borrow(Decimal::ZERO, d("150"), "x"));
        assert_rejected(&mut account, LedgerCommand::borrow(d("100"), Decimal::ZERO, "x"));

        // Net escrow of 1100 would overdraw a 1000 wallet.
        let err = assert_rejected(&mut account, LedgerCommand::borrow(d("100"), d("1200"), "x"));
        assert!(matches!(err, DomainError::InsufficientFunds(_)));
    }

    #[test]
    fn create_circle_enforces_minimum_members_and_charges_nothing() {
        let mut account = fresh();
        assert_rejected(&mut account, LedgerCommand::create_circle("Family", d("50"), 2));
        assert_rejected(&mut account, LedgerCommand::create_circle("", d("50"), 3));
        assert_rejected(&mut account, LedgerCommand::create_circle("Family", Decimal::ZERO, 3));

        let cmd = LedgerCommand::create_circle("Family", d("50"), 3);
        execute(&mut account, &cmd).unwrap();

        let circle = account.circle(&cmd.created_circle_id()).unwrap();
        assert_eq!(circle.current_members, 1);
        assert_eq!(circle.role, Some(CircleRole::Creator));
        assert_eq!(circle.status, CircleStatus::Active);
        assert_eq!(account.wallet_balance(), d("1000"));
        let tx = account.history().latest().unwrap();
        assert_eq!((tx.kind, tx.amount), (TransactionKind::Circle, d("50")));
    }

    #[test]
    fn join_circle_copies_listing_and_debits_stake() {
        let mut account = fresh();
        execute(&mut account, &join(listing("circle-1", 200, 8, 6), "200")).unwrap();

        let circle = account.circle(&CircleId::from("circle-1")).unwrap();
        assert_eq!(circle.current_members, 7);
        assert_eq!(circle.member_count, 8);
        assert_eq!(circle.role, Some(CircleRole::Member));
        assert_eq!(account.wallet_balance(), d("800"));
    }

    #[test]
    fn join_circle_accepts_any_affordable_stake() {
        let mut account = fresh();
        execute(&mut account, &join(listing("circle-1", 200, 8, 6), "15")).unwrap();
        assert_eq!(account.wallet_balance(), d("985"));
    }

    #[test]
    fn join_circle_rejections() {
        let mut account = fresh();
        let err = assert_rejected(&mut account, join(listing("circle-9", 100, 4, 4), "100"));
        assert!(matches!(err, DomainError::Validation(_)));
        let err = assert_rejected(&mut account, join(listing("circle-1", 100, 8, 6), "1500"));
        assert!(matches!(err, DomainError::InsufficientFunds(_)));
        assert_rejected(&mut account, join(listing("circle-1", 100, 8, 6), "0"));

        execute(&mut account, &join(listing("circle-1", 100, 8, 6), "100")).unwrap();
        assert_rejected(&mut account, join(listing("circle-1", 100, 8, 6), "100"));
    }

    #[test]
    fn bid_charges_ten_percent_fee_without_transaction() {
        let mut account = fresh();
        execute(&mut account, &LedgerCommand::bid("circle-2", d("250"))).unwrap();
        assert_eq!(account.wallet_balance(), d("975"));
        assert!(account.history().is_empty());

        assert_rejected(&mut account, LedgerCommand::bid("", d("250")));
        assert_rejected(&mut account, LedgerCommand::bid("circle-2", d("-1")));
        let err = assert_rejected(&mut account, LedgerCommand::bid("circle-2", d("10000")));
        assert!(matches!(err, DomainError::InsufficientFunds(_)));
    }

    #[test]
    fn distribute_pays_out_again_on_every_call() {
        let mut account = fresh();
        execute(&mut account, &join(listing("circle-3", 100, 6, 3), "100")).unwrap();
        assert_eq!(account.wallet_balance(), d("900"));

        let id = CircleId::from("circle-3");
        execute(&mut account, &LedgerCommand::distribute(id.clone())).unwrap();
        assert_eq!(account.wallet_balance(), d("1300"));
        execute(&mut account, &LedgerCommand::distribute(id.clone())).unwrap();
        assert_eq!(account.wallet_balance(), d("1700"));

        let circle = account.circle(&id).unwrap();
        assert_eq!(circle.current_members, 4);
        assert_eq!(account.history().latest().unwrap().amount, d("400"));
    }

    #[test]
    fn distribute_rejects_circles_not_held() {
        let mut account = fresh();
        let err = assert_rejected(&mut account, LedgerCommand::distribute("circle-1"));
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[test]
    fn figures_beyond_decimal_range_are_rejected() {
        let mut account = fresh();
        for cmd in [
            LedgerCommand::create_circle("Big", Decimal::MAX, 3),
            LedgerCommand::borrow(Decimal::MAX, Decimal::MAX, "x"),
            LedgerCommand::lend(d("100"), Decimal::MAX, 365),
        ] {
            let err = assert_rejected(&mut account, cmd);
            assert!(matches!(err, DomainError::InvariantViolation(_)));
        }
        assert_eq!(account.version(), 0);
    }

    #[test]
    fn payout_that_would_overflow_the_wallet_is_rejected() {
        let mut account = Account::open(AccountId::new(), Decimal::MAX).unwrap();
        execute(&mut account, &join(listing("circle-3", 100, 6, 3), "100")).unwrap();

        let err = assert_rejected(&mut account, LedgerCommand::distribute("circle-3"));
        assert!(matches!(err, DomainError::InvariantViolation(_)));

        // The account stays usable afterwards.
        execute(&mut account, &LedgerCommand::stake(d("1"))).unwrap();
        assert_eq!(account.staked_amount(), d("1"));
    }

    #[test]
    fn history_keeps_ten_newest() {
        let mut account = fresh();
        for i in 1..=12 {
            execute(&mut account, &LedgerCommand::stake(Decimal::from(i))).unwrap();
        }
        assert_eq!(account.history().len(), 10);
        assert_eq!(account.history().latest().unwrap().amount, d("12"));
        assert_eq!(account.history().iter().last().unwrap().amount, d("3"));
    }

    fn op_strategy() -> impl Strategy<Value = Operation> {
        let amount = || {
            prop_oneof![
                9 => (-50i64..1500).prop_map(Decimal::from),
                1 => Just(Decimal::MAX),
            ]
        };
        let rate = || {
            prop_oneof![
                9 => (-2i64..20).prop_map(Decimal::from),
                1 => Just(Decimal::MAX),
            ]
        };
        let catalog = [
            listing("circle-1", 200, 8, 6),
            listing("circle-2", 500, 10, 8),
            listing("circle-4", 100, 12, 12),
        ];
        let pick = move |i: usize| catalog[i].clone();

        prop_oneof![
            amount().prop_map(|amount| Operation::Stake { amount }),
            Just(Operation::Unstake),
            (amount(), rate(), 0u32..120).prop_map(|(amount, interest_rate, duration_days)| {
                Operation::Lend {
                    amount,
                    interest_rate,
                    duration_days,
                }
            }),
            (amount(), amount()).prop_map(|(amount, collateral)| Operation::Borrow {
                amount,
                collateral,
                purpose: "equipment".to_string(),
            }),
            (amount(), 1u32..8).prop_map(|(monthly_amount, member_count)| {
                Operation::CreateCircle {
                    name: "Neighbours".to_string(),
                    monthly_amount,
                    member_count,
                }
            }),
            (0usize..3, amount()).prop_map(move |(i, stake_amount)| Operation::JoinCircle {
                listing: pick(i),
                stake_amount,
            }),
            amount().prop_map(|bid_amount| Operation::Bid {
                circle_id: CircleId::from("circle-2"),
                bid_amount,
            }),
            (1usize..3).prop_map(|i| Operation::Distribute {
                circle_id: CircleId::new(format!("circle-{i}")),
            }),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: balances never go negative, history never exceeds its
        /// bound, and a rejected command leaves the account untouched. Starting
        /// from a full wallet drives the arithmetic to the edge of `Decimal`.
        #[test]
        fn invariants_hold_for_any_operation_sequence(
            opening in prop_oneof![Just(DEFAULT_OPENING_BALANCE), Just(Decimal::MAX)],
            ops in prop::collection::vec(op_strategy(), 1..40)
        ) {
            let mut account = Account::open(AccountId::new(), opening).unwrap();

            for op in ops {
                let before = account.clone();
                let result = execute(&mut account, &LedgerCommand::new(op));
                if result.is_err() {
                    prop_assert_eq!(&account, &before);
                } else {
                    prop_assert_eq!(account.version(), before.version() + 1);
                }
                prop_assert!(account.wallet_balance() >= Decimal::ZERO);
                prop_assert!(account.staked_amount() >= Decimal::ZERO);
                prop_assert!(account.history().len() <= crate::HISTORY_LIMIT);
            }
        }

        /// Property: stake followed by unstake restores the wallet.
        #[test]
        fn stake_then_unstake_round_trips(cents in 1i64..=100_000) {
            let mut account = fresh();
            let amount = Decimal::new(cents, 2);

            execute(&mut account, &LedgerCommand::stake(amount)).unwrap();
            execute(&mut account, &LedgerCommand::unstake()).unwrap();

            prop_assert_eq!(account.wallet_balance(), DEFAULT_OPENING_BALANCE);
            prop_assert_eq!(account.staked_amount(), Decimal::ZERO);
        }
    }
}
