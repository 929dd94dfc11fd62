//! Trace: the fully materialized access stream a simulation replays.
//!
//! Format:
//! - Whitespace separated token pairs `<op> <address>`
//! - `op` is `l` (load) or `s` (store), in either case
//! - `address` is a `0x`-prefixed hexadecimal virtual address
//!
//! The whole stream is kept in memory because the optimal policy looks
//! ahead from arbitrary positions.

use std::collections::HashSet;
use std::fs;
use std::num::ParseIntError;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use thiserror::Error;

use crate::PageId;

/// Errors returned while loading or parsing a trace.
#[derive(Debug, Error)]
pub enum TraceError {
    /// The trace file could not be read.
    #[error("cannot read trace file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The operation token is neither `l` nor `s`.
    #[error("record {record}: unknown operation {token:?}")]
    UnknownOperation { record: usize, token: String },
    /// The stream ended after an operation token.
    #[error("record {record}: missing address")]
    MissingAddress { record: usize },
    /// The address token lacks the `0x` prefix.
    #[error("record {record}: address {token:?} is missing the 0x prefix")]
    MissingHexPrefix { record: usize, token: String },
    /// The address digits are empty or not hexadecimal.
    #[error("record {record}: invalid address {token:?}: expected hexadecimal digits")]
    InvalidAddress { record: usize, token: String },
    /// The address does not fit in 64 bits.
    #[error("record {record}: address {token:?} out of range: {source}")]
    AddressOverflow {
        record: usize,
        token: String,
        #[source]
        source: ParseIntError,
    },
}

/// Convenience alias for trace results.
pub type TraceResult<T> = Result<T, TraceError>;

/// Kind of memory access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Load,
    Store,
}

impl Operation {
    /// Returns whether the access modifies the page.
    pub fn is_store(self) -> bool {
        matches!(self, Operation::Store)
    }
}

impl FromStr for Operation {
    type Err = ();

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        if token.eq_ignore_ascii_case("l") {
            Ok(Operation::Load)
        } else if token.eq_ignore_ascii_case("s") {
            Ok(Operation::Store)
        } else {
            Err(())
        }
    }
}

/// One access of the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessRecord {
    pub operation: Operation,
    pub page: PageId,
}

impl AccessRecord {
    /// Creates a load of `page`.
    pub fn load(page: PageId) -> Self {
        Self {
            operation: Operation::Load,
            page,
        }
    }

    /// Creates a store to `page`.
    pub fn store(page: PageId) -> Self {
        Self {
            operation: Operation::Store,
            page,
        }
    }
}

/// Immutable, randomly indexable sequence of access records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Trace {
    records: Vec<AccessRecord>,
}

impl Trace {
    /// Reads and parses a trace file.
    pub fn open<P: AsRef<Path>>(path: P) -> TraceResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| TraceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let trace = Self::parse(&text)?;
        log::info!(
            "loaded {} records ({} distinct pages) from {}",
            trace.len(),
            trace.distinct_pages(),
            path.display()
        );
        Ok(trace)
    }

    /// Parses trace text. Fails on the first malformed record.
    pub fn parse(text: &str) -> TraceResult<Self> {
        let mut tokens = text.split_whitespace();
        let mut records = Vec::new();
        while let Some(op_token) = tokens.next() {
            let record = records.len();
            let operation = op_token
                .parse::<Operation>()
                .map_err(|_| TraceError::UnknownOperation {
                    record,
                    token: op_token.to_string(),
                })?;
            let address_token = tokens
                .next()
                .ok_or(TraceError::MissingAddress { record })?;
            let address = parse_address(record, address_token)?;
            records.push(AccessRecord {
                operation,
                page: PageId::from_address(address),
            });
        }
        Ok(Self { records })
    }

    /// Returns the number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns whether the trace holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the record at `index`.
    ///
    /// Panics if `index` is out of bounds.
    pub fn record_at(&self, index: usize) -> AccessRecord {
        self.records[index]
    }

    /// Returns all records in stream order.
    pub fn records(&self) -> &[AccessRecord] {
        &self.records
    }

    /// Iterates over the records in stream order.
    pub fn iter(&self) -> impl Iterator<Item = &AccessRecord> {
        self.records.iter()
    }

    /// Number of different pages referenced anywhere in the stream.
    pub fn distinct_pages(&self) -> usize {
        self.records
            .iter()
            .map(|record| record.page)
            .collect::<HashSet<_>>()
            .len()
    }
}

impl From<Vec<AccessRecord>> for Trace {
    fn from(records: Vec<AccessRecord>) -> Self {
        Self { records }
    }
}

fn parse_address(record: usize, token: &str) -> TraceResult<u64> {
    let digits = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
        .ok_or_else(|| TraceError::MissingHexPrefix {
            record,
            token: token.to_string(),
        })?;
    if digits.is_empty() || !digits.bytes().all(|byte| byte.is_ascii_hexdigit()) {
        return Err(TraceError::InvalidAddress {
            record,
            token: token.to_string(),
        });
    }
    u64::from_str_radix(digits, 16).map_err(|source| TraceError::AddressOverflow {
        record,
        token: token.to_string(),
        source,
    })
}
