//! Contention experiment over a striped-lock record.
//!
//! Generates three workload profiles, replays each with 1..=3 worker
//! threads against a fresh shared record, and prints the measured
//! wall-clock time per trial.
use std::env;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use lockstripe::record::StripedRecord;
use lockstripe::runner;
use lockstripe::workload::Mix;

/// Arity of the shared record under test.
const FIELDS: usize = 3;
/// Operations per generated script file.
const SCRIPT_LEN: usize = 100_000;
/// Worker counts exercised per profile.
const THREAD_COUNTS: [usize; 3] = [1, 2, 3];

type SharedRecord = StripedRecord<i64, FIELDS>;

/// The three profiles under comparison: the mix the striping is tuned for
/// (snapshots dominate, field 2 write-hot), a uniform mix, and a strongly
/// mismatched write-heavy mix.
fn profiles() -> Result<Vec<(&'static str, Mix)>> {
    Ok(vec![
        (
            "snapshot_heavy",
            Mix::from_labels([
                ("read 0", 0.10),
                ("write 0 1", 0.05),
                ("read 1", 0.10),
                ("write 1 1", 0.05),
                ("read 2", 0.10),
                ("write 2 1", 0.20),
                ("snapshot", 0.40),
            ])?,
        ),
        (
            "uniform",
            Mix::from_labels([
                ("read 0", 1.0),
                ("write 0 1", 1.0),
                ("read 1", 1.0),
                ("write 1 1", 1.0),
                ("read 2", 1.0),
                ("write 2 1", 1.0),
                ("snapshot", 1.0),
            ])?,
        ),
        (
            "write_heavy",
            Mix::from_labels([
                ("read 0", 0.05),
                ("write 0 1", 0.05),
                ("read 1", 0.10),
                ("write 1 1", 0.05),
                ("read 2", 0.30),
                ("write 2 1", 0.40),
                ("snapshot", 0.05),
            ])?,
        ),
    ])
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut args = env::args().skip(1);
    let out_dir = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("workloads"));
    let mut rng = match args.next() {
        Some(seed) => SmallRng::seed_from_u64(seed.parse().context("seed must be an unsigned integer")?),
        None => SmallRng::from_entropy(),
    };

    fs::create_dir_all(&out_dir).with_context(|| format!("creating {}", out_dir.display()))?;
    let max_threads = THREAD_COUNTS.into_iter().max().unwrap_or(1);

    for (name, mix) in profiles()? {
        let paths: Vec<PathBuf> = (0..max_threads)
            .map(|worker| out_dir.join(format!("{name}_{worker}.txt")))
            .collect();
        for path in &paths {
            mix.write_script_file(path, SCRIPT_LEN, &mut rng)
                .with_context(|| format!("generating {}", path.display()))?;
        }
        info!(profile = name, scripts = paths.len(), ops = SCRIPT_LEN, "generated workload");

        println!("--- {name} ---");
        println!("{:<8} {:>12} {:>10} {:>8}", "threads", "time (ms)", "executed", "skipped");
        for &threads in &THREAD_COUNTS {
            match runner::replay_script_files::<SharedRecord, FIELDS>(&paths[..threads]) {
                Ok(report) => println!(
                    "{:<8} {:>12.3} {:>10} {:>8}",
                    report.threads,
                    report.elapsed.as_secs_f64() * 1_000.0,
                    report.stats.executed,
                    report.stats.skipped,
                ),
                Err(error) => warn!(profile = name, threads, %error, "trial skipped"),
            }
        }
        println!();
    }
    Ok(())
}
