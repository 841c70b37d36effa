//! Weighted generation of operation scripts.
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use thiserror::Error;

use crate::operation::{Operation, ParseError};

/// Errors arising while building or materializing a workload.
#[derive(Debug, Error)]
pub enum WorkloadError {
    /// The weight table is empty, contains a negative weight, or sums to zero.
    #[error("invalid operation weights: {0}")]
    Weights(#[from] rand::distributions::WeightedError),
    /// A label in a weight table is not a valid operation.
    #[error("invalid operation label: {0}")]
    Label(#[from] ParseError),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// A weighted mix of operations describing one workload.
///
/// Weights are relative and need not sum to one; the sampler normalizes
/// them. A mix is valid once at least one weight is positive and none are
/// negative.
#[derive(Clone, Debug)]
pub struct Mix {
    entries: Vec<(Operation, f64)>,
}

impl Mix {
    pub fn new(entries: Vec<(Operation, f64)>) -> Self {
        Self { entries }
    }

    /// Builds a mix from `(label, weight)` pairs in the serialized line
    /// format, e.g. `("write 2 1", 0.20)`.
    pub fn from_labels<'a, I>(labels: I) -> Result<Self, WorkloadError>
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        let entries = labels
            .into_iter()
            .map(|(label, weight)| Ok((label.parse()?, weight)))
            .collect::<Result<Vec<_>, ParseError>>()?;
        Ok(Self::new(entries))
    }

    /// Draws `count` operations independently from the weighted
    /// distribution.
    ///
    /// Any rng is accepted; pass a seeded one for a reproducible script.
    pub fn sample<R: Rng>(&self, count: usize, rng: &mut R) -> Result<Vec<Operation>, WorkloadError> {
        let index = WeightedIndex::new(self.entries.iter().map(|(_, weight)| *weight))?;
        Ok((0..count).map(|_| self.entries[index.sample(rng)].0).collect())
    }

    /// Writes `count` sampled operations to `out`, one per line.
    pub fn write_script<R, W>(&self, count: usize, rng: &mut R, out: &mut W) -> Result<(), WorkloadError>
    where
        R: Rng,
        W: Write,
    {
        for operation in self.sample(count, rng)? {
            writeln!(out, "{operation}")?;
        }
        Ok(())
    }

    /// Materializes a script file at `path`.
    pub fn write_script_file<R: Rng>(
        &self,
        path: &Path,
        count: usize,
        rng: &mut R,
    ) -> Result<(), WorkloadError> {
        let mut out = BufWriter::new(File::create(path)?);
        self.write_script(count, rng, &mut out)?;
        out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    use super::*;

    fn uniform() -> Mix {
        Mix::from_labels([
            ("read 0", 1.0),
            ("write 0 1", 1.0),
            ("read 1", 1.0),
            ("write 1 1", 1.0),
            ("read 2", 1.0),
            ("write 2 1", 1.0),
            ("snapshot", 1.0),
        ])
        .unwrap()
    }

    #[test]
    fn same_seed_same_script() {
        let mix = uniform();
        let mut first = SmallRng::seed_from_u64(42);
        let mut second = SmallRng::seed_from_u64(42);
        assert_eq!(
            mix.sample(200, &mut first).unwrap(),
            mix.sample(200, &mut second).unwrap()
        );
    }

    #[test]
    fn zero_weight_operations_are_never_drawn() {
        let mix = Mix::from_labels([("snapshot", 0.0), ("read 0", 1.0)]).unwrap();
        let mut rng = SmallRng::seed_from_u64(7);
        let script = mix.sample(500, &mut rng).unwrap();
        assert!(script.iter().all(|op| *op == Operation::Read { field: 0 }));
    }

    #[test]
    fn all_zero_weights_are_rejected() {
        let mix = Mix::from_labels([("read 0", 0.0), ("snapshot", 0.0)]).unwrap();
        let mut rng = SmallRng::seed_from_u64(7);
        assert!(matches!(
            mix.sample(1, &mut rng),
            Err(WorkloadError::Weights(_))
        ));
    }

    #[test]
    fn empty_mix_is_rejected() {
        let mix = Mix::new(vec![]);
        let mut rng = SmallRng::seed_from_u64(7);
        assert!(matches!(
            mix.sample(1, &mut rng),
            Err(WorkloadError::Weights(_))
        ));
    }

    #[test]
    fn bad_labels_are_rejected() {
        assert!(matches!(
            Mix::from_labels([("frobnicate", 1.0)]),
            Err(WorkloadError::Label(_))
        ));
    }

    #[test]
    fn scripts_are_parseable_line_per_operation() {
        let mix = uniform();
        let mut rng = SmallRng::seed_from_u64(3);
        let mut buffer = Vec::new();
        mix.write_script(50, &mut rng, &mut buffer).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 50);
        for line in lines {
            line.parse::<Operation>().unwrap();
        }
    }
}
