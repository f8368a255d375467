//! Pending gates: at most one in-flight request per operation slot.

use std::collections::HashSet;
use std::sync::Mutex;

use serde::Serialize;

use bastion_lending::Operation;

/// Operations that share one in-flight request.
///
/// Staking covers both stake and unstake; every circle operation shares the
/// circles slot.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationSlot {
    Staking,
    Lending,
    Borrowing,
    Circles,
}

impl OperationSlot {
    pub fn of(operation: &Operation) -> Self {
        match operation {
            Operation::Stake { .. } | Operation::Unstake => OperationSlot::Staking,
            Operation::Lend { .. } => OperationSlot::Lending,
            Operation::Borrow { .. } => OperationSlot::Borrowing,
            Operation::CreateCircle { .. }
            | Operation::JoinCircle { .. }
            | Operation::Bid { .. }
            | Operation::Distribute { .. } => OperationSlot::Circles,
        }
    }
}

impl core::fmt::Display for OperationSlot {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            OperationSlot::Staking => "staking",
            OperationSlot::Lending => "lending",
            OperationSlot::Borrowing => "borrowing",
            OperationSlot::Circles => "circles",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Default)]
pub struct PendingGates {
    busy: Mutex<HashSet<OperationSlot>>,
}

impl PendingGates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `slot`. Returns `None` while another request holds it.
    ///
    /// The slot is released when the returned guard drops.
    pub fn try_acquire(&self, slot: OperationSlot) -> Option<PendingGuard<'_>> {
        let mut busy = self.busy.lock().ok()?;
        if !busy.insert(slot) {
            return None;
        }
        Some(PendingGuard { gates: self, slot })
    }

    pub fn is_pending(&self, slot: OperationSlot) -> bool {
        self.busy
            .lock()
            .map(|busy| busy.contains(&slot))
            .unwrap_or(false)
    }
}

#[derive(Debug)]
pub struct PendingGuard<'a> {
    gates: &'a PendingGates,
    slot: OperationSlot,
}

impl PendingGuard<'_> {
    pub fn slot(&self) -> OperationSlot {
        self.slot
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        if let Ok(mut busy) = self.gates.busy.lock() {
            busy.remove(&self.slot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_is_exclusive_until_guard_drops() {
        let gates = PendingGates::new();
        let guard = gates.try_acquire(OperationSlot::Lending).unwrap();

        assert!(gates.is_pending(OperationSlot::Lending));
        assert!(gates.try_acquire(OperationSlot::Lending).is_none());
        assert!(gates.try_acquire(OperationSlot::Borrowing).is_some());

        drop(guard);
        assert!(!gates.is_pending(OperationSlot::Lending));
        assert!(gates.try_acquire(OperationSlot::Lending).is_some());
    }

    #[test]
    fn stake_and_unstake_share_a_slot() {
        use rust_decimal::Decimal;
        assert_eq!(
            OperationSlot::of(&Operation::Stake { amount: Decimal::ONE }),
            OperationSlot::of(&Operation::Unstake)
        );
    }
}
