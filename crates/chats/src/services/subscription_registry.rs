//! Live channel subscriptions and event fan-out.
//!
//! The registry maps a channel id to the queues of everyone currently
//! streaming it. One mutex guards the whole map. It is only held to push,
//! splice or snapshot a list and never across an await or a send.
//!
//! Broadcasts are best effort: each queue is bounded and a send that would
//! block is dropped for that subscriber only.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, warn};

use crate::types::{ChannelEvent, ChannelId};

/// Destination for events pulled off a subscription queue, usually a
/// network stream.
#[async_trait]
pub trait EventSink: Send {
    async fn deliver(&mut self, event: ChannelEvent) -> Result<(), SinkClosed>;
}

/// Returned by an [`EventSink`] that can no longer accept events.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("event sink closed")]
pub struct SinkClosed;

#[async_trait]
impl EventSink for mpsc::Sender<ChannelEvent> {
    async fn deliver(&mut self, event: ChannelEvent) -> Result<(), SinkClosed> {
        self.send(event).await.map_err(|_| SinkClosed)
    }
}

/// Outcome of one broadcast.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    pub delivered: usize,
    pub dropped: usize,
}

struct Slot {
    id: u64,
    sender: mpsc::Sender<ChannelEvent>,
}

struct RegistryInner {
    channels: Mutex<HashMap<ChannelId, Vec<Slot>>>,
    queue_capacity: usize,
    next_id: AtomicU64,
}

impl RegistryInner {
    fn lock(&self) -> MutexGuard<'_, HashMap<ChannelId, Vec<Slot>>> {
        // The guarded map stays consistent even if a holder panicked.
        self.channels.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn remove(&self, channel_id: &str, id: u64) {
        let mut channels = self.lock();
        if let Some(slots) = channels.get_mut(channel_id) {
            if let Some(position) = slots.iter().position(|slot| slot.id == id) {
                slots.remove(position);
            }
            if slots.is_empty() {
                channels.remove(channel_id);
            }
        }
    }
}

/// Shared registry handle. Cloning is cheap and every clone sees the same map.
#[derive(Clone)]
pub struct SubscriptionRegistry {
    inner: Arc<RegistryInner>,
}

impl SubscriptionRegistry {
    /// Create a registry whose subscriber queues hold `queue_capacity` events.
    /// A capacity of zero is raised to one.
    pub fn new(queue_capacity: usize) -> Self {
        Self {
            inner: Arc::new(RegistryInner {
                channels: Mutex::new(HashMap::new()),
                queue_capacity: queue_capacity.max(1),
                next_id: AtomicU64::new(1),
            }),
        }
    }

    pub fn queue_capacity(&self) -> usize {
        self.inner.queue_capacity
    }

    /// Register a fresh queue for `channel_id` with the default capacity.
    pub fn register(&self, channel_id: &str) -> Subscription {
        self.register_with_capacity(channel_id, self.inner.queue_capacity)
    }

    pub fn register_with_capacity(&self, channel_id: &str, capacity: usize) -> Subscription {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);

        self.inner
            .lock()
            .entry(channel_id.to_string())
            .or_default()
            .push(Slot { id, sender });

        debug!(channel_id, subscriber = id, "subscriber registered");

        Subscription {
            registry: Arc::clone(&self.inner),
            channel_id: channel_id.to_string(),
            id,
            receiver,
        }
    }

    /// Offer `event` to every queue registered for `channel_id` without waiting.
    pub fn broadcast(&self, channel_id: &str, event: ChannelEvent) -> BroadcastReport {
        let targets: Vec<(u64, mpsc::Sender<ChannelEvent>)> = self
            .inner
            .lock()
            .get(channel_id)
            .map(|slots| {
                slots
                    .iter()
                    .map(|slot| (slot.id, slot.sender.clone()))
                    .collect()
            })
            .unwrap_or_default();

        let mut report = BroadcastReport::default();
        for (id, sender) in targets {
            match sender.try_send(event.clone()) {
                Ok(()) => report.delivered += 1,
                Err(TrySendError::Full(_)) => {
                    report.dropped += 1;
                    warn!(channel_id, subscriber = id, "subscriber queue full, dropping event");
                }
                Err(TrySendError::Closed(_)) => {
                    report.dropped += 1;
                    debug!(channel_id, subscriber = id, "subscriber closed before delivery");
                }
            }
        }
        report
    }

    /// Number of live subscriptions for `channel_id`.
    pub fn subscriber_count(&self, channel_id: &str) -> usize {
        self.inner.lock().get(channel_id).map_or(0, Vec::len)
    }

    /// Number of channels with at least one subscriber.
    pub fn channel_count(&self) -> usize {
        self.inner.lock().len()
    }
}

/// A registered queue. Dropping it closes the queue and removes it from the
/// registry, whatever path the owner leaves by.
pub struct Subscription {
    registry: Arc<RegistryInner>,
    channel_id: ChannelId,
    id: u64,
    receiver: mpsc::Receiver<ChannelEvent>,
}

impl Subscription {
    pub fn channel_id(&self) -> &str {
        &self.channel_id
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Wait for the next event. Cancel safe.
    pub async fn recv(&mut self) -> Option<ChannelEvent> {
        self.receiver.recv().await
    }

    pub fn try_recv(&mut self) -> Option<ChannelEvent> {
        self.receiver.try_recv().ok()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.receiver.close();
        self.registry.remove(&self.channel_id, self.id);
        debug!(channel_id = %self.channel_id, subscriber = self.id, "subscriber removed");
    }
}
