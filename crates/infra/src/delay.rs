//! Processing delay between validation and application of a command.
//!
//! The pause is a UX affordance that lets a front-end show a pending state;
//! it is not a network round-trip. Tests use [`NoDelay`].

use std::time::Duration;

use async_trait::async_trait;

use bastion_lending::Operation;

#[async_trait]
pub trait Delay: Send + Sync + core::fmt::Debug {
    /// Suspend before `operation` is applied. Never cancelled once started.
    async fn wait(&self, operation: &Operation);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoDelay;

#[async_trait]
impl Delay for NoDelay {
    async fn wait(&self, _operation: &Operation) {}
}

/// Same pause for every operation.
#[derive(Debug, Clone, Copy)]
pub struct FixedDelay(pub Duration);

#[async_trait]
impl Delay for FixedDelay {
    async fn wait(&self, _operation: &Operation) {
        tokio::time::sleep(self.0).await;
    }
}

/// Per-operation timings of the demo front-end.
#[derive(Debug, Default, Clone, Copy)]
pub struct SimulatedLatency;

impl SimulatedLatency {
    pub fn duration_for(operation: &Operation) -> Duration {
        let millis = match operation {
            Operation::Stake { .. } | Operation::Unstake => 1500,
            Operation::Lend { .. } => 2000,
            Operation::Borrow { .. } => 2500,
            Operation::CreateCircle { .. } => 2000,
            Operation::JoinCircle { .. } => 1500,
            Operation::Bid { .. } => 1000,
            Operation::Distribute { .. } => 1500,
        };
        Duration::from_millis(millis)
    }
}

#[async_trait]
impl Delay for SimulatedLatency {
    async fn wait(&self, operation: &Operation) {
        tokio::time::sleep(Self::duration_for(operation)).await;
    }
}
