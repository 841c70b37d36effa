//! The per-field-mutex record at the heart of the harness.
use core::array::from_fn;
use std::sync::TryLockError;

use crate::sync::{Mutex, MutexGuard};

use super::{lock, OutOfRange, Record};

/// A record protecting each of its `F` fields with its own mutex.
///
/// Reads and writes to distinct fields proceed in parallel; operations on
/// the same field are serialized by that field's lock. [`snapshot`] is the
/// only operation that holds more than one lock at a time, and it acquires
/// them all-or-nothing, so no lock-order cycle can form between concurrent
/// snapshots and single-field operations.
///
/// # Examples
///
/// ```
/// use lockstripe::record::{Record, StripedRecord};
///
/// let record: StripedRecord<i64, 3> = StripedRecord::new();
///
/// record.write(0, 5)?;
/// record.write(1, 7)?;
/// record.write(2, 9)?;
///
/// assert_eq!(record.snapshot(), [5, 7, 9]);
/// # Ok::<(), lockstripe::record::OutOfRange>(())
/// ```
///
/// [`snapshot`]: Record::snapshot
pub struct StripedRecord<T: Copy + Default, const F: usize> {
    fields: [Mutex<T>; F],
}

impl<T: Copy + Default, const F: usize> StripedRecord<T, F> {
    fn guard(&self, index: usize) -> Result<MutexGuard<'_, T>, OutOfRange> {
        let field = self.fields.get(index).ok_or(OutOfRange { index, arity: F })?;
        Ok(lock(field))
    }

    /// Acquires every field lock without ever blocking while holding a
    /// strict subset.
    ///
    /// Blocks on one pivot field, then tries the rest. On contention all
    /// held guards are released and the contended field becomes the next
    /// pivot, so each retry blocks with empty hands.
    fn lock_all(&self) -> [MutexGuard<'_, T>; F] {
        let mut pivot = 0;
        loop {
            match self.try_lock_all(pivot) {
                Ok(guards) => return guards,
                Err(contended) => pivot = contended,
            }
        }
    }

    fn try_lock_all(&self, pivot: usize) -> Result<[MutexGuard<'_, T>; F], usize> {
        let mut guards: [Option<MutexGuard<'_, T>>; F] = from_fn(|_| None);
        guards[pivot] = Some(lock(&self.fields[pivot]));
        for offset in 1..F {
            let index = (pivot + offset) % F;
            match self.fields[index].try_lock() {
                Ok(guard) => guards[index] = Some(guard),
                Err(TryLockError::Poisoned(poisoned)) => guards[index] = Some(poisoned.into_inner()),
                // Dropping `guards` here releases everything already held.
                Err(TryLockError::WouldBlock) => return Err(index),
            }
        }
        Ok(guards.map(|guard| guard.expect("pivot and every offset filled a slot")))
    }
}

impl<T: Copy + Default, const F: usize> Record<F> for StripedRecord<T, F> {
    type Value = T;

    fn new() -> Self {
        Self {
            fields: [(); F].map(|_| Mutex::new(T::default())),
        }
    }

    fn read(&self, index: usize) -> Result<T, OutOfRange> {
        Ok(*self.guard(index)?)
    }

    fn write(&self, index: usize, value: T) -> Result<(), OutOfRange> {
        *self.guard(index)? = value;
        Ok(())
    }

    fn snapshot(&self) -> [T; F] {
        let guards = self.lock_all();
        from_fn(|i| *guards[i])
    }
}

impl<T: Copy + Default, const F: usize> Default for StripedRecord<T, F> {
    fn default() -> Self {
        StripedRecord::<T, F>::new()
    }
}
