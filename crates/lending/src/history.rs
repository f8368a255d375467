use std::collections::VecDeque;

use serde::Serialize;

use crate::model::Transaction;

/// Number of transactions the account keeps.
pub const HISTORY_LIMIT: usize = 10;

/// Bounded, newest-first transaction history.
///
/// Recording beyond [`HISTORY_LIMIT`] evicts the oldest entry.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct TransactionHistory {
    entries: VecDeque<Transaction>,
}

impl TransactionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, tx: Transaction) {
        self.entries.push_front(tx);
        self.entries.truncate(HISTORY_LIMIT);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn latest(&self) -> Option<&Transaction> {
        self.entries.front()
    }

    /// Newest first.
    pub fn iter(&self) -> impl Iterator<Item = &Transaction> {
        self.entries.iter()
    }

    pub fn recent(&self, n: usize) -> Vec<Transaction> {
        self.entries.iter().take(n).cloned().collect()
    }
}
