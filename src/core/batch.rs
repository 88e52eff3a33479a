//! Batched hand-off of records to a store
//!
//! Records accumulate in an ordered buffer and are flushed whenever it
//! reaches the batch size, then once more at end of stream. A failed flush
//! aborts the import: the pending batch is discarded and earlier batches
//! stay in the store as they are.

use super::error::{StoreError, StoreResult};
use super::model::{Allele, Variant};
use crate::store::Store;
use log::debug;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Default number of records per store call
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Cooperative cancellation signal shared with every store call
#[derive(Debug, Clone, Default)]
pub struct Cancellation {
    cancelled: Arc<AtomicBool>,
}

impl Cancellation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation; visible to every clone
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Fail with [`StoreError::Cancelled`] once cancellation was requested
    pub fn check(&self) -> StoreResult<()> {
        if self.is_cancelled() {
            Err(StoreError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Record kinds that a [`Store`] accepts in bulk
pub trait Batchable: Sized {
    /// Human readable name for log messages
    const KIND: &'static str;

    fn store_batch<S: Store + ?Sized>(
        store: &mut S,
        cancel: &Cancellation,
        batch: &[Self],
    ) -> StoreResult<()>;
}

impl Batchable for Variant {
    const KIND: &'static str = "variants";

    fn store_batch<S: Store + ?Sized>(
        store: &mut S,
        cancel: &Cancellation,
        batch: &[Self],
    ) -> StoreResult<()> {
        store.store_variants(cancel, batch)
    }
}

impl Batchable for Allele {
    const KIND: &'static str = "alleles";

    fn store_batch<S: Store + ?Sized>(
        store: &mut S,
        cancel: &Cancellation,
        batch: &[Self],
    ) -> StoreResult<()> {
        store.store_alleles(cancel, batch)
    }
}

/// Totals reported by [`BatchWriter::finish`]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FlushStats {
    pub batches: usize,
    pub records: usize,
}

/// Buffers records and flushes them to a store in fixed-size batches
pub struct BatchWriter<'a, T: Batchable, S: Store + ?Sized> {
    store: &'a mut S,
    cancel: &'a Cancellation,
    buffer: Vec<T>,
    batch_size: usize,
    stats: FlushStats,
}

impl<'a, T: Batchable, S: Store + ?Sized> BatchWriter<'a, T, S> {
    pub fn new(store: &'a mut S, cancel: &'a Cancellation) -> Self {
        Self::with_batch_size(store, cancel, DEFAULT_BATCH_SIZE)
    }

    /// A zero batch size is treated as 1
    pub fn with_batch_size(store: &'a mut S, cancel: &'a Cancellation, batch_size: usize) -> Self {
        let batch_size = batch_size.max(1);
        Self {
            store,
            cancel,
            buffer: Vec::with_capacity(batch_size),
            batch_size,
            stats: FlushStats::default(),
        }
    }

    /// Append a record, flushing if the buffer is full
    pub fn push(&mut self, record: T) -> StoreResult<()> {
        self.buffer.push(record);
        if self.buffer.len() >= self.batch_size {
            self.flush()?;
        }
        Ok(())
    }

    /// Number of records waiting for the next flush
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    fn flush(&mut self) -> StoreResult<()> {
        if self.buffer.is_empty() {
            return Ok(());
        }

        self.cancel.check()?;
        T::store_batch(&mut *self.store, self.cancel, &self.buffer)?;

        self.stats.batches += 1;
        self.stats.records += self.buffer.len();
        debug!(
            "Stored batch of {} {} ({} total)",
            self.buffer.len(),
            T::KIND,
            self.stats.records
        );
        self.buffer.clear();
        Ok(())
    }

    /// Flush whatever is left and report totals
    pub fn finish(mut self) -> StoreResult<FlushStats> {
        self.flush()?;
        Ok(self.stats)
    }
}
