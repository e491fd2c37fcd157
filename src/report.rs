//! Record source and result sink seams, and the persisted result row.

use crate::session::{OutcomeStatus, SearchOutcome, SearchRecord};
use std::fmt;

/// Persisted status of one record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RowStatus {
    Completed,
    Error,
}

impl fmt::Display for RowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed => f.write_str("completed"),
            Self::Error => f.write_str("error"),
        }
    }
}

impl From<OutcomeStatus> for RowStatus {
    fn from(value: OutcomeStatus) -> Self {
        match value {
            OutcomeStatus::Success => Self::Completed,
            OutcomeStatus::Error => Self::Error,
        }
    }
}

/// One line of output, in input order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultRow {
    pub sequence_number: u64,
    pub identifier: String,
    pub display_name: String,
    pub count: usize,
    pub status: RowStatus,
    pub message: String,
}

impl ResultRow {
    /// Joins a record with its outcome. `index` is the 0-based input position,
    /// used as `index + 1` when the record carries no sequence number.
    pub fn from_outcome(index: usize, record: &SearchRecord, outcome: &SearchOutcome) -> Self {
        Self {
            sequence_number: record.sequence_number.unwrap_or(index as u64 + 1),
            identifier: outcome.identifier.clone(),
            display_name: record.display_name.clone().unwrap_or_default(),
            count: outcome.count,
            status: outcome.status.into(),
            message: outcome.message.clone(),
        }
    }

    /// Zips attempted outcomes with their records; records past the last
    /// outcome (cancelled runs) produce no row.
    pub fn collect(records: &[SearchRecord], outcomes: &[SearchOutcome]) -> Vec<Self> {
        records
            .iter()
            .zip(outcomes)
            .enumerate()
            .map(|(idx, (record, outcome))| Self::from_outcome(idx, record, outcome))
            .collect()
    }
}

/// Supplies the ordered records of one batch run.
pub trait RecordSource {
    type Error;

    fn read_records(&mut self) -> Result<Vec<SearchRecord>, Self::Error>;
}

/// Persists result rows in order.
pub trait ResultSink {
    type Error;

    fn write_rows(&mut self, rows: &[ResultRow]) -> Result<(), Self::Error>;
}
