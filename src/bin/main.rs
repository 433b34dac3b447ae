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

use chrono::{DateTime, Utc};
use clap::Parser;
use crossbeam::channel;
use csv::{ReaderBuilder, Trim, Writer};
use p2p_transfer_rs::logging::init_logging;
use p2p_transfer_rs::{
    Account, AccountId, AccountKind, AccountProfile, LogNotifier, MemoryStore,
    OrchestratorConfig, StaticAuthorizer, StoreError, TransferId, TransferOrchestrator,
    TransferOutcome, TransferRequest, TransferStatus,
};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};

/// P2P Transfer - Run transfer CSVs against in-memory accounts
///
/// Provisions accounts from one CSV, executes the transfers listed in another
/// and writes one outcome row per transfer to stdout.
#[derive(Parser, Debug)]
#[command(name = "p2p-transfer")]
#[command(about = "Executes peer-to-peer transfers from CSV files", long_about = None)]
struct Args {
    /// Accounts CSV: id,kind,balance,full_name,document,email
    #[arg(value_name = "ACCOUNTS")]
    accounts: PathBuf,

    /// Transfers CSV: sender,recipient,value[,date]
    ///
    /// Example: cargo run -- accounts.csv transfers.csv > outcomes.csv
    #[arg(value_name = "TRANSFERS")]
    transfers: PathBuf,

    /// Number of worker threads executing transfers
    #[arg(long, default_value_t = 4)]
    workers: usize,

    /// Key presented to the authorizer
    #[arg(long)]
    authorization_key: Option<String>,

    /// Deny every transfer at the authorization stage
    #[arg(long)]
    deny_all: bool,

    /// Write final account balances to this file
    #[arg(long, value_name = "FILE")]
    balances: Option<PathBuf>,

    /// Log level, overridden by RUST_LOG
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("cannot open '{path}': {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error("a transfer worker panicked")]
    WorkerPanicked,
}

fn main() {
    let args = Args::parse();
    init_logging(&args.log_level, args.log_json);

    if let Err(e) = run(&args) {
        error!(error = %e, "Run failed");
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), CliError> {
    let store = Arc::new(MemoryStore::new());
    let provisioned = load_accounts(BufReader::new(open(&args.accounts)?), &store)?;
    let requests = read_transfers(BufReader::new(open(&args.transfers)?))?;
    info!(accounts = provisioned, transfers = requests.len(), "Input loaded");

    let mut config = OrchestratorConfig::default();
    if let Some(key) = &args.authorization_key {
        config.authorization_key = key.clone();
    }
    let authorizer = if args.deny_all {
        StaticAuthorizer::deny_all()
    } else {
        StaticAuthorizer::new(config.authorization_key.clone())
    };
    let orchestrator = TransferOrchestrator::with_config(
        store.clone(),
        Arc::new(authorizer),
        Arc::new(LogNotifier),
        config,
    );

    let outcomes = execute_transfers(&orchestrator, &requests, args.workers)?;
    write_outcomes(&requests, &outcomes, std::io::stdout())?;

    if let Some(path) = &args.balances {
        let file = File::create(path).map_err(|source| CliError::Open {
            path: path.clone(),
            source,
        })?;
        write_balances(&store, file)?;
    }

    Ok(())
}

fn open(path: &PathBuf) -> Result<File, CliError> {
    File::open(path).map_err(|source| CliError::Open {
        path: path.clone(),
        source,
    })
}

/// Raw account row.
#[derive(Debug, Deserialize)]
struct CsvAccount {
    id: i64,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    kind: Option<AccountKind>,
    balance: i64,
    #[serde(default)]
    full_name: String,
    #[serde(default)]
    document: String,
    #[serde(default)]
    email: String,
}

impl CsvAccount {
    fn into_account(self) -> Account {
        let id = AccountId(self.id);
        let account = match self.kind {
            Some(kind) => Account::new(id, kind, self.balance),
            None => Account::untyped(id, self.balance),
        };
        account.with_profile(AccountProfile {
            full_name: self.full_name,
            document: self.document,
            email: self.email,
            credential: String::new(),
        })
    }
}

/// Raw transfer row. A missing date means "now". The date is only logged;
/// records are dated at settlement.
#[derive(Debug, Deserialize)]
struct CsvTransfer {
    sender: i64,
    recipient: i64,
    value: i64,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    date: Option<DateTime<Utc>>,
}

impl CsvTransfer {
    fn into_request(self) -> TransferRequest {
        TransferRequest {
            date: self.date.unwrap_or_else(Utc::now),
            sender: AccountId(self.sender),
            recipient: AccountId(self.recipient),
            value: self.value,
        }
    }
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .has_headers(true)
        .from_reader(reader)
}

/// Provisions every well-formed account row into `store`.
///
/// Malformed rows and duplicate ids are skipped with a warning. Returns the
/// number of accounts provisioned.
fn load_accounts<R: Read>(reader: R, store: &MemoryStore) -> Result<usize, csv::Error> {
    let mut provisioned = 0;

    for result in csv_reader(reader).deserialize::<CsvAccount>() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                warn!(error = %e, "Skipping malformed account row");
                continue;
            }
        };
        let account = record.into_account();
        if let Err(e) = account.is_valid() {
            warn!(account = %account.id(), error = %e, "Provisioning invalid account");
        }
        match store.insert_account(account) {
            Ok(_) => provisioned += 1,
            Err(e @ StoreError::DuplicateAccount(_)) => {
                warn!(error = %e, "Skipping duplicate account row");
            }
            Err(e) => warn!(error = %e, "Skipping account row"),
        }
    }

    Ok(provisioned)
}

/// Reads every well-formed transfer row, skipping malformed ones.
fn read_transfers<R: Read>(reader: R) -> Result<Vec<TransferRequest>, csv::Error> {
    let mut requests = Vec::new();

    for result in csv_reader(reader).deserialize::<CsvTransfer>() {
        match result {
            Ok(record) => requests.push(record.into_request()),
            Err(e) => warn!(error = %e, "Skipping malformed transfer row"),
        }
    }

    Ok(requests)
}

/// Executes `requests` over `workers` threads.
///
/// Outcomes are returned in request order, whatever order they completed in.
fn execute_transfers(
    orchestrator: &TransferOrchestrator,
    requests: &[TransferRequest],
    workers: usize,
) -> Result<Vec<TransferOutcome>, CliError> {
    let (job_tx, job_rx) = channel::unbounded::<(usize, TransferRequest)>();
    let (done_tx, done_rx) = channel::unbounded::<(usize, TransferOutcome)>();

    for job in requests.iter().copied().enumerate() {
        // Cannot fail: job_rx is alive until the workers are done.
        let _ = job_tx.send(job);
    }
    drop(job_tx);

    crossbeam::scope(|scope| {
        for _ in 0..workers.max(1) {
            let job_rx = job_rx.clone();
            let done_tx = done_tx.clone();
            scope.spawn(move |_| {
                for (index, request) in job_rx.iter() {
                    let outcome = orchestrator.execute(&request);
                    if done_tx.send((index, outcome)).is_err() {
                        break;
                    }
                }
            });
        }
    })
    .map_err(|_| CliError::WorkerPanicked)?;
    drop(done_tx);

    let mut outcomes: Vec<Option<TransferOutcome>> = vec![None; requests.len()];
    for (index, outcome) in done_rx.iter() {
        outcomes[index] = Some(outcome);
    }
    Ok(outcomes.into_iter().flatten().collect())
}

/// Output row for one transfer.
#[derive(Debug, Serialize)]
struct OutcomeRow {
    sender: AccountId,
    recipient: AccountId,
    value: i64,
    status: TransferStatus,
    id: Option<TransferId>,
    error: Option<String>,
}

/// Writes one CSV row per transfer.
///
/// # CSV Format
///
/// Columns: `sender, recipient, value, status, id, error`
///
/// ```csv
/// sender,recipient,value,status,id,error
/// 1,2,5000,success,1,
/// 1,3,99999,rejected,,insufficient balance
/// ```
fn write_outcomes<W: Write>(
    requests: &[TransferRequest],
    outcomes: &[TransferOutcome],
    writer: W,
) -> Result<(), csv::Error> {
    let mut wtr = Writer::from_writer(writer);

    for (request, outcome) in requests.iter().zip(outcomes) {
        wtr.serialize(OutcomeRow {
            sender: request.sender,
            recipient: request.recipient,
            value: request.value,
            status: outcome.status(),
            id: outcome.id(),
            error: outcome.error_message(),
        })?;
    }

    wtr.flush()?;
    Ok(())
}

/// Writes a balance snapshot of every account, ordered by id.
fn write_balances<W: Write>(store: &MemoryStore, writer: W) -> Result<(), csv::Error> {
    let mut wtr = Writer::from_writer(writer);

    for account in store.accounts() {
        wtr.serialize(account.as_ref())?;
    }

    wtr.flush()?;
    Ok(())
}
