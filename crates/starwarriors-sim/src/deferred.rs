//! Deferred effects keyed to their owning entity.
//!
//! Real-time delayed actions (overheat recovery, the second bomb of a
//! paired salvo) are queued with a due time on the sim clock and drained at
//! the start of each tick. Every action re-checks that its owner, and its
//! target where it has one, is still alive before it applies.

use hecs::Entity;

/// What to do when an entry comes due.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DeferredAction {
    /// Clear overheat and refill the primary weapon.
    OverheatRecovery,
    /// Launch a homing bomb at `target` along `angle` from the owner's center.
    PairedBomb { target: Entity, angle: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeferredEntry {
    pub owner: Entity,
    pub due_ms: f64,
    pub action: DeferredAction,
}

/// Pending deferred effects in scheduling order.
#[derive(Debug, Default)]
pub struct DeferredQueue {
    entries: Vec<DeferredEntry>,
}

impl DeferredQueue {
    pub fn schedule(&mut self, owner: Entity, due_ms: f64, action: DeferredAction) {
        self.entries.push(DeferredEntry {
            owner,
            due_ms,
            action,
        });
    }

    /// Remove and return every entry due at or before `now_ms`, oldest first.
    pub fn take_due(&mut self, now_ms: f64) -> Vec<DeferredEntry> {
        let (due, pending): (Vec<_>, Vec<_>) = self.entries.drain(..).partition(|e| e.due_ms <= now_ms);
        self.entries = pending;
        due
    }

    /// Drop every entry owned by `owner`.
    pub fn cancel_owner(&mut self, owner: Entity) {
        self.entries.retain(|e| e.owner != owner);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
