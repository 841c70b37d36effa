//! Replaying serialized operation streams against a shared record.
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use thiserror::Error;
use tracing::warn;

use crate::operation::Operation;
use crate::record::{OutOfRange, Record};

/// Errors that abort a worker's replay.
#[derive(Debug, Error)]
pub enum ReplayError {
    /// The script file is missing or unreadable.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// An operation named a field outside the record.
    #[error(transparent)]
    OutOfRange(#[from] OutOfRange),
}

/// Counts of what a replay actually executed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReplayStats {
    /// Operations dispatched against the record.
    pub executed: u64,
    /// Malformed lines that were dropped.
    pub skipped: u64,
}

impl ReplayStats {
    pub(crate) fn absorb(&mut self, other: ReplayStats) {
        self.executed += other.executed;
        self.skipped += other.skipped;
    }
}

/// Dispatches one operation against the record.
///
/// Read and snapshot results are discarded; only the access pattern
/// matters here.
pub fn apply<R, const F: usize>(record: &R, operation: Operation) -> Result<(), OutOfRange>
where
    R: Record<F, Value = i64>,
{
    match operation {
        Operation::Read { field } => {
            record.read(field)?;
        }
        Operation::Write { field, value } => record.write(field, value)?,
        Operation::Snapshot => {
            record.snapshot();
        }
    }
    Ok(())
}

/// Replays an in-memory script to completion.
pub fn replay_script<R, const F: usize>(record: &R, script: &[Operation]) -> Result<(), OutOfRange>
where
    R: Record<F, Value = i64>,
{
    for operation in script {
        apply(record, *operation)?;
    }
    Ok(())
}

/// Replays a line stream, skipping malformed lines.
///
/// Blank lines are ignored. A line that fails to parse is counted and
/// dropped without reaching the record; a well-formed operation naming a
/// bad field aborts the replay.
pub fn replay_lines<R, B, const F: usize>(record: &R, reader: B) -> Result<ReplayStats, ReplayError>
where
    R: Record<F, Value = i64>,
    B: BufRead,
{
    let mut stats = ReplayStats::default();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match line.parse::<Operation>() {
            Ok(operation) => {
                apply(record, operation)?;
                stats.executed += 1;
            }
            Err(error) => {
                warn!(%error, line = %line, "skipping malformed operation");
                stats.skipped += 1;
            }
        }
    }
    Ok(stats)
}

/// Replays a script file against the record.
pub fn replay_file<R, const F: usize>(record: &R, path: &Path) -> Result<ReplayStats, ReplayError>
where
    R: Record<F, Value = i64>,
{
    replay_lines(record, BufReader::new(File::open(path)?))
}
