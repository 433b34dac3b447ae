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

//! Deadlock detection harness shared by the deadlock test binaries.

use crossbeam::channel::{self, RecvTimeoutError};
use parking_lot::deadlock;
use std::thread;
use std::time::Duration;

/// Runs `workload` on its own thread while the test thread polls parking_lot's
/// deadlock detector. Panics on the test thread as soon as a deadlock is
/// found, so the test fails instead of hanging on a stuck join.
pub fn run_with_deadlock_detector<T, F>(workload: F) -> T
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    let (done_tx, done_rx) = channel::bounded(1);
    let worker = thread::spawn(move || {
        let result = workload();
        let _ = done_tx.send(());
        result
    });

    loop {
        match done_rx.recv_timeout(Duration::from_millis(100)) {
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            Err(RecvTimeoutError::Timeout) => {
                let deadlocks = deadlock::check_deadlock();
                if !deadlocks.is_empty() {
                    eprintln!("\n=== DEADLOCK DETECTED ===");
                    for (i, threads) in deadlocks.iter().enumerate() {
                        eprintln!("\nDeadlock #{}", i + 1);
                        for t in threads {
                            eprintln!("Thread ID: {:?}", t.thread_id());
                            eprintln!("Backtrace:\n{:#?}", t.backtrace());
                        }
                    }
                    panic!("Deadlock detected! See output above for details.");
                }
            }
        }
    }

    worker.join().expect("Workload panicked")
}
