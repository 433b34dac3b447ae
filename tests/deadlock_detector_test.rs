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

//! Checks that the deadlock harness fails a test instead of hanging.
//!
//! Lives in its own test binary: the threads it deadlocks on purpose never
//! exit and would trip the detector of any other test in the same process.

use parking_lot::Mutex;
use std::sync::{Arc, Barrier};
use std::thread;

mod common;

use common::run_with_deadlock_detector;

#[test]
#[should_panic(expected = "Deadlock detected")]
fn harness_fails_on_lock_order_inversion() {
    run_with_deadlock_detector(|| {
        let a = Arc::new(Mutex::new(()));
        let b = Arc::new(Mutex::new(()));
        let barrier = Arc::new(Barrier::new(2));

        let handles: Vec<_> = [(a.clone(), b.clone()), (b, a)]
            .into_iter()
            .map(|(first, second)| {
                let barrier = barrier.clone();
                thread::spawn(move || {
                    let _first = first.lock();
                    barrier.wait();
                    let _second = second.lock();
                })
            })
            .collect();

        for handle in handles {
            let _ = handle.join();
        }
    });
}
