//! Shared fixed-arity records.
//!
//! See [`StripedRecord`].
mod coarse;
pub use self::coarse::CoarseRecord;
mod striped;
pub use self::striped::StripedRecord;

use std::sync::PoisonError;

use thiserror::Error;

use crate::sync::{Mutex, MutexGuard};

/// A shared record of `F` independently addressable fields.
///
/// A record is created once per trial, shared by reference between worker
/// threads, and never copied or reassigned as a whole. Arity must be at
/// least one.
pub trait Record<const F: usize> {
    /// The value stored in each field.
    type Value: Copy;

    /// Creates a record with every field set to the default value.
    fn new() -> Self;

    /// Returns the current value of one field.
    fn read(&self, index: usize) -> Result<Self::Value, OutOfRange>;

    /// Stores a value into one field.
    ///
    /// The new value is visible to every later read of the same field,
    /// from any thread.
    fn write(&self, index: usize, value: Self::Value) -> Result<(), OutOfRange>;

    /// Returns the value of every field as they existed at one instant.
    ///
    /// No concurrent write to any field interleaves with the view; the
    /// result is a linearizable point-in-time copy of the whole record.
    fn snapshot(&self) -> [Self::Value; F];
}

/// Error returned when an operation names a field outside the record.
///
/// Always the caller's fault and never retried. A rejected operation
/// acquires no locks and mutates nothing.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
#[error("field index {index} is out of range for a record of {arity} fields")]
pub struct OutOfRange {
    pub index: usize,
    pub arity: usize,
}

/// Acquires a mutex, recovering the guard if a previous holder panicked.
///
/// Field stores are single assignments under the guard, so a poisoned lock
/// still protects a well-formed value and the surviving workers may keep
/// going.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
