//! Timed fan-out/join trials over a shared record.
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::operation::Operation;
use crate::record::{OutOfRange, Record};
use crate::replay::{self, ReplayError, ReplayStats};

/// Outcome of one timed trial.
#[derive(Clone, Copy, Debug)]
pub struct TrialReport {
    /// Worker threads that replayed a script.
    pub threads: usize,
    /// Wall-clock time from before the first spawn to after the last join.
    pub elapsed: Duration,
    pub stats: ReplayStats,
}

/// Replays one in-memory script per worker thread against `record`.
///
/// The clock starts before the first worker is spawned and stops only
/// after every worker has joined. Returns the elapsed wall-clock time, or
/// the first worker error.
pub fn replay_scripts<R, const F: usize>(
    record: &R,
    scripts: &[Vec<Operation>],
) -> Result<Duration, OutOfRange>
where
    R: Record<F, Value = i64> + Sync,
{
    let start = Instant::now();
    let outcome = thread::scope(|scope| {
        let workers: Vec<_> = scripts
            .iter()
            .map(|script| scope.spawn(move || replay::replay_script(record, script)))
            .collect();
        workers
            .into_iter()
            .map(|worker| worker.join().expect("replay worker panicked"))
            .collect::<Result<(), OutOfRange>>()
    });
    outcome.map(|()| start.elapsed())
}

/// Runs one trial: a fresh record shared by one worker per script file.
///
/// Workers open their own files inside the timed region. Any worker error
/// fails the whole trial; the record is discarded either way, so a failed
/// trial cannot leak state into the next one.
pub fn replay_script_files<R, const F: usize>(paths: &[PathBuf]) -> Result<TrialReport, ReplayError>
where
    R: Record<F, Value = i64> + Sync,
{
    let record = R::new();
    let start = Instant::now();
    let outcome: Result<ReplayStats, ReplayError> = thread::scope(|scope| {
        let workers: Vec<_> = paths
            .iter()
            .map(|path| {
                let record = &record;
                scope.spawn(move || replay::replay_file(record, path))
            })
            .collect();
        let mut stats = ReplayStats::default();
        for worker in workers {
            stats.absorb(worker.join().expect("replay worker panicked")?);
        }
        Ok(stats)
    });
    let elapsed = start.elapsed();
    let stats = outcome?;
    debug!(threads = paths.len(), ?elapsed, "trial finished");
    Ok(TrialReport {
        threads: paths.len(),
        elapsed,
        stats,
    })
}
