//! Command execution pipeline around the account aggregate.
//!
//! ```text
//! LedgerCommand
//!   ↓
//! 1. Claim the pending gate of the operation's slot
//!   ↓
//! 2. Pre-validate against a snapshot (fast rejection, no delay)
//!   ↓
//! 3. Await the configured processing delay
//!   ↓
//! 4. Re-run handle + apply under the state lock (atomic)
//!   ↓
//! 5. Publish the applied events to the bus
//! ```
//!
//! The gate guard is dropped on every exit path, so a rejected or failed
//! command never leaves its slot pending.

use std::sync::{Arc, Mutex};

use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use bastion_core::{Aggregate, AggregateRoot, DomainError};
use bastion_events::{Event, EventBus, EventEnvelope, Subscription, execute};
use bastion_lending::{Account, LedgerCommand, LedgerEvent};

use crate::delay::Delay;
use crate::gate::{OperationSlot, PendingGates};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("insufficient funds: {0}")]
    InsufficientFunds(String),
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("invariant violated: {0}")]
    InvariantViolation(String),
    /// Another request for the same slot is still in flight.
    #[error("a {0} operation is already pending")]
    Pending(OperationSlot),
    /// The state lock was poisoned by a panicking writer.
    #[error("ledger state is unavailable")]
    Poisoned,
    /// Publication failed after the state was updated (the change stands).
    #[error("event publication failed: {0}")]
    Publish(String),
}

impl From<DomainError> for DispatchError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::InsufficientFunds(msg) => DispatchError::InsufficientFunds(msg),
            DomainError::Validation(msg) => DispatchError::Validation(msg),
            DomainError::InvariantViolation(msg) => DispatchError::InvariantViolation(msg),
            DomainError::InvalidId(msg) => DispatchError::Validation(msg),
            DomainError::NotFound(msg) => DispatchError::NotFound(msg),
        }
    }
}

pub type LedgerEnvelope = EventEnvelope<LedgerEvent>;

/// Serialises commands against a single in-memory account.
#[derive(Debug)]
pub struct CommandDispatcher<B> {
    state: Mutex<Account>,
    gates: PendingGates,
    delay: Arc<dyn Delay>,
    bus: B,
}

impl<B> CommandDispatcher<B>
where
    B: EventBus<LedgerEnvelope>,
{
    pub fn new(account: Account, delay: Arc<dyn Delay>, bus: B) -> Self {
        Self {
            state: Mutex::new(account),
            gates: PendingGates::new(),
            delay,
            bus,
        }
    }

    pub fn snapshot(&self) -> Result<Account, DispatchError> {
        self.state
            .lock()
            .map(|account| account.clone())
            .map_err(|_| DispatchError::Poisoned)
    }

    pub fn is_pending(&self, slot: OperationSlot) -> bool {
        self.gates.is_pending(slot)
    }

    pub fn subscribe(&self) -> Subscription<LedgerEnvelope> {
        self.bus.subscribe()
    }

    /// Run one command through the pipeline and return the resulting state.
    ///
    /// On any error the account is unchanged (except `Publish`, which is
    /// reported after the state was committed).
    pub async fn dispatch(&self, command: LedgerCommand) -> Result<Account, DispatchError> {
        let operation = command.operation.name();
        let slot = OperationSlot::of(&command.operation);

        let Some(_guard) = self.gates.try_acquire(slot) else {
            debug!(%slot, operation, "rejected: slot already pending");
            return Err(DispatchError::Pending(slot));
        };

        let snapshot = self.snapshot()?;
        if let Err(err) = snapshot.handle(&command) {
            warn!(operation, error = %err, "command rejected");
            return Err(err.into());
        }

        debug!(%slot, operation, command_id = %command.command_id, "awaiting processing delay");
        self.delay.wait(&command.operation).await;

        let (account, events) = {
            let mut state = self.state.lock().map_err(|_| DispatchError::Poisoned)?;
            if state.version() != snapshot.version() {
                debug!(operation, "state changed during delay; revalidating");
            }
            match execute(&mut *state, &command) {
                Ok(events) => (state.clone(), events),
                Err(err) => {
                    warn!(operation, error = %err, "command rejected after delay");
                    return Err(err.into());
                }
            }
        };

        self.publish(&account, events)?;

        info!(
            operation,
            command_id = %command.command_id,
            version = account.version(),
            wallet_balance = %account.wallet_balance(),
            staked_amount = %account.staked_amount(),
            "operation applied"
        );

        Ok(account)
    }

    fn publish(&self, account: &Account, events: Vec<LedgerEvent>) -> Result<(), DispatchError> {
        let first = account.version() + 1 - events.len() as u64;
        for (offset, event) in events.into_iter().enumerate() {
            let envelope = EventEnvelope::new(
                Uuid::now_v7(),
                account.id_typed(),
                event.event_type(),
                event.occurred_at(),
                first + offset as u64,
                event,
            );
            self.bus
                .publish(envelope)
                .map_err(|e| DispatchError::Publish(format!("{e:?}")))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use bastion_core::AccountId;
    use bastion_events::InMemoryEventBus;
    use bastion_lending::DEFAULT_OPENING_BALANCE;
    use rust_decimal::Decimal;

    use crate::delay::{FixedDelay, NoDelay};

    type Bus = Arc<InMemoryEventBus<LedgerEnvelope>>;

    fn dispatcher(delay: Arc<dyn Delay>) -> CommandDispatcher<Bus> {
        let account = Account::open(AccountId::new(), DEFAULT_OPENING_BALANCE).unwrap();
        CommandDispatcher::new(account, delay, Arc::new(InMemoryEventBus::new()))
    }

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[tokio::test]
    async fn applies_and_publishes_in_sequence() {
        let dispatcher = dispatcher(Arc::new(NoDelay));
        let sub = dispatcher.subscribe();

        let stake = LedgerCommand::stake(d("100"));
        let staked_at = stake.occurred_at;
        dispatcher.dispatch(stake).await.unwrap();
        let account = dispatcher.dispatch(LedgerCommand::unstake()).await.unwrap();

        assert_eq!(account.wallet_balance(), d("1000"));
        assert_eq!(account.staked_amount(), Decimal::ZERO);

        let published = sub.drain();
        let seqs: Vec<_> = published.iter().map(|e| e.sequence_number()).collect();
        assert_eq!(seqs, vec![1, 2]);
        assert_eq!(published[0].occurred_at(), staked_at);
        assert_eq!(published[0].event_type(), "lending.account.staked");
        assert_eq!(published[1].account_id(), account.id_typed());
    }

    #[tokio::test]
    async fn rejection_leaves_state_and_releases_slot() {
        let dispatcher = dispatcher(Arc::new(NoDelay));
        let sub = dispatcher.subscribe();

        let err = dispatcher
            .dispatch(LedgerCommand::stake(d("5000")))
            .await
            .unwrap_err();
        assert!(matches!(err, DispatchError::InsufficientFunds(_)));

        let err = dispatcher
            .dispatch(LedgerCommand::lend(d("-1"), d("5"), 30))
            .await
            .unwrap_err();
        assert!(matches!(err, DispatchError::Validation(_)));

        assert_eq!(dispatcher.snapshot().unwrap().wallet_balance(), d("1000"));
        assert!(!dispatcher.is_pending(OperationSlot::Staking));
        assert!(sub.drain().is_empty());
    }

    #[tokio::test]
    async fn second_request_on_a_busy_slot_is_pending() {
        let dispatcher = dispatcher(Arc::new(FixedDelay(Duration::from_millis(50))));

        let (first, second) = tokio::join!(
            dispatcher.dispatch(LedgerCommand::stake(d("10"))),
            dispatcher.dispatch(LedgerCommand::stake(d("20"))),
        );

        assert!(first.is_ok());
        assert_eq!(second.unwrap_err(), DispatchError::Pending(OperationSlot::Staking));
        assert_eq!(dispatcher.snapshot().unwrap().staked_amount(), d("10"));
        assert!(!dispatcher.is_pending(OperationSlot::Staking));
    }

    #[tokio::test]
    async fn different_slots_proceed_concurrently() {
        let dispatcher = dispatcher(Arc::new(FixedDelay(Duration::from_millis(20))));

        let (stake, lend) = tokio::join!(
            dispatcher.dispatch(LedgerCommand::stake(d("100"))),
            dispatcher.dispatch(LedgerCommand::lend(d("200"), d("5"), 30)),
        );

        assert!(stake.is_ok());
        assert!(lend.is_ok());
        let account = dispatcher.snapshot().unwrap();
        assert_eq!(account.wallet_balance(), d("700"));
        assert_eq!(account.version(), 2);
    }

    #[tokio::test]
    async fn command_invalidated_during_delay_is_rejected() {
        let dispatcher = dispatcher(Arc::new(FixedDelay(Duration::from_millis(30))));

        // Both pass pre-validation against 1000; only one fits once the other lands.
        let (stake, lend) = tokio::join!(
            dispatcher.dispatch(LedgerCommand::stake(d("800"))),
            dispatcher.dispatch(LedgerCommand::lend(d("800"), d("5"), 30)),
        );

        let ok = [stake.is_ok(), lend.is_ok()].iter().filter(|b| **b).count();
        assert_eq!(ok, 1);
        assert_eq!(dispatcher.snapshot().unwrap().wallet_balance(), d("200"));
    }

    #[tokio::test]
    async fn overflowing_payout_is_rejected_and_the_ledger_stays_usable() {
        let account = Account::open(AccountId::new(), Decimal::MAX).unwrap();
        let dispatcher: CommandDispatcher<Bus> =
            CommandDispatcher::new(account, Arc::new(NoDelay), Arc::new(InMemoryEventBus::new()));

        let create = LedgerCommand::create_circle("Big", d("1000"), 3);
        let circle_id = create.created_circle_id();
        dispatcher.dispatch(create).await.unwrap();

        let err = dispatcher
            .dispatch(LedgerCommand::distribute(circle_id))
            .await
            .unwrap_err();
        assert!(matches!(err, DispatchError::InvariantViolation(_)));
        assert!(!dispatcher.is_pending(OperationSlot::Circles));

        let account = dispatcher.dispatch(LedgerCommand::stake(d("1"))).await.unwrap();
        assert_eq!(account.staked_amount(), d("1"));
        assert_eq!(account.version(), 2);
    }

    #[test]
    fn domain_errors_map_onto_dispatch_errors() {
        assert!(matches!(
            DispatchError::from(DomainError::invalid_id("x")),
            DispatchError::Validation(_)
        ));
        assert!(matches!(
            DispatchError::from(DomainError::not_found("circle-9")),
            DispatchError::NotFound(_)
        ));
        assert!(matches!(
            DispatchError::from(DomainError::invariant("payout")),
            DispatchError::InvariantViolation(_)
        ));
    }
}
