//! Infrastructure layer: the engine boundary around the account aggregate.

pub mod catalog;
pub mod command_dispatcher;
pub mod config;
pub mod delay;
pub mod gate;
pub mod service;

pub use catalog::SampleCatalog;
pub use command_dispatcher::{CommandDispatcher, DispatchError, LedgerEnvelope};
pub use config::{ConfigError, DelayMode, EngineConfig};
pub use delay::{Delay, FixedDelay, NoDelay, SimulatedLatency};
pub use gate::{OperationSlot, PendingGates, PendingGuard};
pub use service::{InMemoryLedgerService, LedgerService};
