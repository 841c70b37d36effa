//! A whole-record mutex baseline.
use crate::sync::Mutex;

use super::{lock, OutOfRange, Record};

/// A record guarded by a single mutex around all `F` fields.
///
/// Every operation, including a read of one field, excludes every other
/// operation. Snapshots are trivially atomic. This implementation exists
/// as the baseline the striped record is benchmarked against; it is not
/// expected to scale with thread count.
pub struct CoarseRecord<T: Copy + Default, const F: usize> {
    fields: Mutex<[T; F]>,
}

impl<T: Copy + Default, const F: usize> Record<F> for CoarseRecord<T, F> {
    type Value = T;

    fn new() -> Self {
        Self {
            fields: Mutex::new([T::default(); F]),
        }
    }

    fn read(&self, index: usize) -> Result<T, OutOfRange> {
        if index >= F {
            return Err(OutOfRange { index, arity: F });
        }
        Ok(lock(&self.fields)[index])
    }

    fn write(&self, index: usize, value: T) -> Result<(), OutOfRange> {
        if index >= F {
            return Err(OutOfRange { index, arity: F });
        }
        lock(&self.fields)[index] = value;
        Ok(())
    }

    fn snapshot(&self) -> [T; F] {
        *lock(&self.fields)
    }
}

impl<T: Copy + Default, const F: usize> Default for CoarseRecord<T, F> {
    fn default() -> Self {
        CoarseRecord::<T, F>::new()
    }
}
