//! Bounded FIFO queue that favours recent items over old ones.
//!
//! [`LossyQueue::push`] never blocks and never fails. When admitting an item
//! would bring the queue to its capacity, a batch of the oldest items is
//! dropped first. Consumers therefore always see the most recent items in
//! their original order, minus whatever prefix was discarded.
//!
//! **Thread Safety**
//! - All operations take `&self` and may be invoked concurrently by multiple
//!   producers and consumers.
//! - The discard-then-enqueue sequence runs under a single lock, so two
//!   producers can never both discard for the same overflow.
//! - Mutex poisoning is recovered transparently.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use thiserror::Error;

/// Rejected queue geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LossyQueueError {
    #[error("lossy queue capacity must be greater than 0")]
    ZeroCapacity,
    #[error("discard batch {batch} must be between 1 and capacity - 1 ({capacity})")]
    InvalidDiscardBatch { batch: usize, capacity: usize },
}

/// Bounded, ordered queue with a drop-oldest overflow policy.
#[derive(Debug)]
pub struct LossyQueue<T> {
    items: Mutex<VecDeque<T>>,
    capacity: usize,
    discard_batch: usize,
}

impl<T> LossyQueue<T> {
    /// Create a queue holding at most `capacity` items that drops
    /// `discard_batch` items at a time on overflow.
    ///
    /// # Errors
    /// Returns [`LossyQueueError`] unless `0 < discard_batch < capacity`.
    pub fn new(capacity: usize, discard_batch: usize) -> Result<Self, LossyQueueError> {
        if capacity == 0 {
            return Err(LossyQueueError::ZeroCapacity);
        }
        if discard_batch == 0 || discard_batch >= capacity {
            return Err(LossyQueueError::InvalidDiscardBatch { batch: discard_batch, capacity });
        }
        Ok(Self { items: Mutex::new(VecDeque::with_capacity(capacity)), capacity, discard_batch })
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<T>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Enqueue `item`, discarding the oldest batch first if the queue would
    /// reach capacity. Returns how many items were discarded.
    pub fn push(&self, item: T) -> usize {
        let mut items = self.lock();
        let mut discarded = 0;
        if items.len() + 1 >= self.capacity {
            discarded = self.discard_batch.min(items.len());
            items.drain(..discarded);
        }
        items.push_back(item);
        discarded
    }

    /// Remove and return the oldest item, if any.
    pub fn pop(&self) -> Option<T> {
        self.lock().pop_front()
    }

    /// Remove and return every queued item in order.
    pub fn drain(&self) -> Vec<T> {
        self.lock().drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn discard_batch(&self) -> usize {
        self.discard_batch
    }
}
