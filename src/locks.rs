// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Per-account transfer locks.
//!
//! A transfer holds the locks of both of its accounts for its whole
//! critical section. Locks are always taken in ascending [`AccountId`]
//! order, so two transfers over the same pair in opposite directions cannot
//! deadlock, and transfers over disjoint pairs never contend.
//!
//! These locks are separate from each account's balance lock, which is only
//! held for the duration of a single balance operation.

use crate::base::AccountId;
use dashmap::DashMap;
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Debug, Default)]
pub struct AccountLocks {
    /// One slot per account currently locked or waited on. A slot is removed
    /// when its last holder releases it.
    slots: DashMap<AccountId, Arc<Mutex<()>>>,
}

/// A checked-out slot. Dropping it removes the slot from the table if no
/// other transfer holds or waits on it.
struct Slot<'a> {
    locks: &'a AccountLocks,
    id: AccountId,
    mutex: Arc<Mutex<()>>,
}

impl Drop for Slot<'_> {
    fn drop(&mut self) {
        // Clones are only taken under the shard lock, so a count of two (the
        // table's and ours) cannot grow while `remove_if` holds it.
        self.locks.slots.remove_if(&self.id, |_, mutex| {
            Arc::ptr_eq(mutex, &self.mutex) && Arc::strong_count(mutex) == 2
        });
    }
}

impl AccountLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, id: AccountId) -> Slot<'_> {
        // The map shard guard is released before the slot itself is locked.
        let mutex = Arc::clone(self.slots.entry(id).or_default().value());
        Slot {
            locks: self,
            id,
            mutex,
        }
    }

    /// Runs `f` while holding the locks of `a` and `b`. Passing the same id
    /// twice takes a single lock.
    pub fn with_pair<T>(&self, a: AccountId, b: AccountId, f: impl FnOnce() -> T) -> T {
        let (first, second) = if a <= b { (a, b) } else { (b, a) };

        // Guards are declared after their slots so they unlock first.
        let first_slot = self.slot(first);
        let _first = first_slot.mutex.lock();
        if first == second {
            return f();
        }

        let second_slot = self.slot(second);
        let _second = second_slot.mutex.lock();
        f()
    }

    /// Number of accounts currently locked or waited on.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
