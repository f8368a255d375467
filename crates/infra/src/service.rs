//! Typed entry point used by adapters (HTTP, tests, benches).

use std::sync::Arc;

use rust_decimal::Decimal;

use bastion_core::AccountId;
use bastion_events::{EventBus, InMemoryEventBus, Subscription};
use bastion_lending::{
    Account, AccountSummary, CircleCatalog, CircleId, CircleListing, LedgerCommand, LoanOffer,
    LoanOfferCatalog,
};

use crate::catalog::SampleCatalog;
use crate::command_dispatcher::{CommandDispatcher, DispatchError, LedgerEnvelope};
use crate::config::EngineConfig;
use crate::delay::Delay;
use crate::gate::OperationSlot;

pub struct LedgerService<B> {
    dispatcher: CommandDispatcher<B>,
    circles: Arc<dyn CircleCatalog>,
    offers: Arc<dyn LoanOfferCatalog>,
}

pub type InMemoryLedgerService = LedgerService<Arc<InMemoryEventBus<LedgerEnvelope>>>;

impl InMemoryLedgerService {
    /// Fresh session backed by the sample catalog and an in-memory bus.
    pub fn in_memory(config: &EngineConfig) -> Result<Self, DispatchError> {
        let account = Account::open(AccountId::new(), config.opening_balance)?;
        let catalog = Arc::new(SampleCatalog);
        Ok(LedgerService::new(
            account,
            config.delay.into_delay(),
            Arc::new(InMemoryEventBus::new()),
            catalog.clone(),
            catalog,
        ))
    }
}

impl<B> LedgerService<B>
where
    B: EventBus<LedgerEnvelope>,
{
    pub fn new(
        account: Account,
        delay: Arc<dyn Delay>,
        bus: B,
        circles: Arc<dyn CircleCatalog>,
        offers: Arc<dyn LoanOfferCatalog>,
    ) -> Self {
        Self {
            dispatcher: CommandDispatcher::new(account, delay, bus),
            circles,
            offers,
        }
    }

    pub async fn dispatch(&self, command: LedgerCommand) -> Result<Account, DispatchError> {
        self.dispatcher.dispatch(command).await
    }

    pub async fn stake(&self, amount: Decimal) -> Result<Account, DispatchError> {
        self.dispatch(LedgerCommand::stake(amount)).await
    }

    pub async fn unstake(&self) -> Result<Account, DispatchError> {
        self.dispatch(LedgerCommand::unstake()).await
    }

    pub async fn lend(
        &self,
        amount: Decimal,
        interest_rate: Decimal,
        duration_days: u32,
    ) -> Result<Account, DispatchError> {
        self.dispatch(LedgerCommand::lend(amount, interest_rate, duration_days))
            .await
    }

    pub async fn borrow(
        &self,
        amount: Decimal,
        collateral: Decimal,
        purpose: impl Into<String>,
    ) -> Result<Account, DispatchError> {
        self.dispatch(LedgerCommand::borrow(amount, collateral, purpose))
            .await
    }

    pub async fn create_circle(
        &self,
        name: impl Into<String>,
        monthly_amount: Decimal,
        member_count: u32,
    ) -> Result<Account, DispatchError> {
        self.dispatch(LedgerCommand::create_circle(name, monthly_amount, member_count))
            .await
    }

    /// Join a catalog circle; unknown ids are `NotFound`.
    pub async fn join_circle(
        &self,
        circle_id: &CircleId,
        stake_amount: Decimal,
    ) -> Result<Account, DispatchError> {
        let command = LedgerCommand::join_circle(self.circles.as_ref(), circle_id, stake_amount)?;
        self.dispatch(command).await
    }

    pub async fn bid(
        &self,
        circle_id: impl Into<CircleId>,
        bid_amount: Decimal,
    ) -> Result<Account, DispatchError> {
        self.dispatch(LedgerCommand::bid(circle_id, bid_amount)).await
    }

    pub async fn distribute(&self, circle_id: impl Into<CircleId>) -> Result<Account, DispatchError> {
        self.dispatch(LedgerCommand::distribute(circle_id)).await
    }

    pub fn snapshot(&self) -> Result<Account, DispatchError> {
        self.dispatcher.snapshot()
    }

    pub fn summary(&self) -> Result<AccountSummary, DispatchError> {
        Ok(self.snapshot()?.summary())
    }

    pub fn available_circles(&self) -> Result<Vec<CircleListing>, DispatchError> {
        Ok(self.snapshot()?.available_circles(self.circles.as_ref()))
    }

    pub fn loan_offers(&self) -> Vec<LoanOffer> {
        self.offers.offers()
    }

    pub fn is_pending(&self, slot: OperationSlot) -> bool {
        self.dispatcher.is_pending(slot)
    }

    pub fn subscribe(&self) -> Subscription<LedgerEnvelope> {
        self.dispatcher.subscribe()
    }
}
