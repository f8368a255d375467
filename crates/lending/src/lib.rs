//! Lending module: the account ledger behind staking, peer loans and savings circles.
//!
//! Pure domain logic only: no IO, no HTTP, no persistence concerns.

pub mod account;
pub mod catalog;
pub mod command;
pub mod event;
pub mod history;
pub mod model;
pub mod preview;
pub mod summary;
pub mod terms;
pub mod transition;

pub use account::{Account, DEFAULT_OPENING_BALANCE};
pub use catalog::{CircleCatalog, CircleListing, LoanOffer, LoanOfferCatalog};
pub use command::{LedgerCommand, Operation};
pub use event::LedgerEvent;
pub use history::{HISTORY_LIMIT, TransactionHistory};
pub use model::{
    Circle, CircleId, CircleRole, CircleStatus, Loan, LoanKind, LoanStatus, Transaction,
    TransactionKind,
};
pub use preview::{BorrowPreview, LendPreview};
pub use summary::AccountSummary;
pub use transition::apply;
