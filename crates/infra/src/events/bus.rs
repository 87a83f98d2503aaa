use std::sync::Arc;

use spacetraders_common::LossyQueue;
use spacetraders_domain::{Event, EventBusConfig, Result, SpaceTradersError};
use tokio::sync::Notify;
use tracing::debug;

/// Producer side of the client's event channel.
///
/// Emitting never blocks: when the queue is about to fill up, the oldest
/// batch of events is discarded before the new one is admitted.
#[derive(Debug, Clone)]
pub struct EventBus {
    queue: Arc<LossyQueue<Event>>,
    notify: Arc<Notify>,
}

impl EventBus {
    pub fn new(config: &EventBusConfig) -> Result<Self> {
        let queue = LossyQueue::new(config.capacity, config.discard_batch)
            .map_err(|err| SpaceTradersError::Config(err.to_string()))?;
        Ok(Self { queue: Arc::new(queue), notify: Arc::new(Notify::new()) })
    }

    pub fn emit(&self, event: Event) {
        let name = event.name();
        let discarded = self.queue.push(event);
        if discarded > 0 {
            debug!(discarded, event = name, "event queue full, dropped oldest events");
        }
        self.notify.notify_one();
    }

    /// Consumer handle sharing this bus's queue.
    pub fn stream(&self) -> EventStream {
        EventStream { queue: Arc::clone(&self.queue), notify: Arc::clone(&self.notify) }
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.queue.capacity()
    }
}

/// Consumer side of the event channel.
///
/// All streams obtained from one bus read the same queue, so each event is
/// delivered to at most one of them.
#[derive(Debug, Clone)]
pub struct EventStream {
    queue: Arc<LossyQueue<Event>>,
    notify: Arc<Notify>,
}

impl EventStream {
    /// Wait for the next event.
    pub async fn recv(&self) -> Event {
        loop {
            if let Some(event) = self.queue.pop() {
                return event;
            }
            self.notify.notified().await;
        }
    }

    pub fn try_recv(&self) -> Option<Event> {
        self.queue.pop()
    }

    /// Take every queued event, oldest first.
    pub fn drain(&self) -> Vec<Event> {
        self.queue.drain()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
