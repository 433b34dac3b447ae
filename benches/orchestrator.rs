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

//! Benchmarks for transfer orchestration.
//!
//! Run with: cargo bench
//!
//! Benchmarks include:
//! - Single-threaded transfer execution
//! - Multi-threaded transfers over disjoint account pairs
//! - Multi-threaded transfers contending on one pair

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use p2p_transfer_rs::{
    Account, AccountId, AccountKind, Authorizer, AuthorizerError, MemoryStore, Notifier,
    NotifierError, TransferOrchestrator, TransferRequest,
};
use rayon::prelude::*;
use std::sync::Arc;

// =============================================================================
// Helper Functions
// =============================================================================

struct AllowAll;

impl Authorizer for AllowAll {
    fn is_authorized(&self, _key: &str) -> Result<bool, AuthorizerError> {
        Ok(true)
    }
}

struct Silent;

impl Notifier for Silent {
    fn send(&self, _recipient_email: &str, _message: &str) -> Result<(), NotifierError> {
        Ok(())
    }
}

fn setup(accounts: i64) -> TransferOrchestrator {
    let store = Arc::new(MemoryStore::new());
    for id in 1..=accounts {
        store
            .insert_account(Account::new(AccountId(id), AccountKind::Common, i64::MAX / 4))
            .unwrap();
    }
    TransferOrchestrator::new(store, Arc::new(AllowAll), Arc::new(Silent))
}

fn make_transfer(sender: i64, recipient: i64) -> TransferRequest {
    TransferRequest::new(AccountId(sender), AccountId(recipient), 100)
}

// =============================================================================
// Single-Threaded Benchmarks
// =============================================================================

fn bench_single_transfer(c: &mut Criterion) {
    let orchestrator = setup(2);
    let request = make_transfer(1, 2);
    c.bench_function("single_transfer", |b| {
        b.iter(|| orchestrator.execute(black_box(&request)))
    });
}

fn bench_rejected_transfer(c: &mut Criterion) {
    let orchestrator = setup(2);
    // Unknown recipient, rejected at resolve
    let request = make_transfer(1, 99);
    c.bench_function("rejected_transfer", |b| {
        b.iter(|| orchestrator.execute(black_box(&request)))
    });
}

// =============================================================================
// Multi-Threaded Benchmarks
// =============================================================================

fn bench_parallel_disjoint_pairs(c: &mut Criterion) {
    let mut group = c.benchmark_group("parallel_disjoint_pairs");

    for count in [1_000, 10_000].iter() {
        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, &count| {
            let orchestrator = setup(64);
            b.iter(|| {
                (0..count as i64).into_par_iter().for_each(|i| {
                    // Pairs (1,2), (3,4), ... never share an account.
                    let sender = (i % 32) * 2 + 1;
                    orchestrator.execute(&make_transfer(sender, sender + 1));
                });
            })
        });
    }
    group.finish();
}

fn bench_parallel_single_pair(c: &mut Criterion) {
    let mut group = c.benchmark_group("parallel_single_pair");

    for count in [1_000, 10_000].iter() {
        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, &count| {
            let orchestrator = setup(2);
            b.iter(|| {
                (0..count as i64).into_par_iter().for_each(|i| {
                    let (sender, recipient) = if i % 2 == 0 { (1, 2) } else { (2, 1) };
                    orchestrator.execute(&make_transfer(sender, recipient));
                });
            })
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_single_transfer,
    bench_rejected_transfer,
    bench_parallel_disjoint_pairs,
    bench_parallel_single_pair,
);
criterion_main!(benches);
