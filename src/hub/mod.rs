// src/hub/mod.rs

//! In-process broadcast hub (C1).
//!
//! One publisher-side operation ([`EventHub::publish`]) and one
//! subscriber-side operation ([`EventHub::subscribe`]). Modeled on the
//! teacher's `mpsc`-channel plumbing (`engine::runtime`, `exec::executor_loop`)
//! but generalized from "one fixed runtime consumer" to "N independent
//! subscribers with slow-consumer eviction", since the spec requires
//! fan-out broadcast rather than a single internal event loop.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::{SystemTime, UNIX_EPOCH};

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::domain::StreamEvent;

/// Default bounded queue capacity for a new subscription (§4.1).
pub const DEFAULT_SUBSCRIBER_CAPACITY: usize = 1000;

struct Subscriber {
    id: u64,
    tx: mpsc::Sender<StreamEvent>,
}

/// The broadcast hub. Cheap to clone (wraps an `Arc`-free `RwLock` directly,
/// so share it behind an `Arc<EventHub>` if multiple owners need it).
#[derive(Debug)]
pub struct EventHub {
    subscribers: RwLock<Vec<Subscriber>>,
    next_event_id: AtomicU64,
    next_subscriber_id: AtomicU64,
    slow_disconnects: AtomicU64,
    capacity: usize,
}

impl Default for EventHub {
    fn default() -> Self {
        Self::new(DEFAULT_SUBSCRIBER_CAPACITY)
    }
}

impl EventHub {
    pub fn new(capacity: usize) -> Self {
        Self {
            subscribers: RwLock::new(Vec::new()),
            next_event_id: AtomicU64::new(1),
            next_subscriber_id: AtomicU64::new(1),
            slow_disconnects: AtomicU64::new(0),
            capacity,
        }
    }

    /// Register a new subscriber and return the receiving half of its
    /// per-subscriber bounded queue.
    ///
    /// The caller drives its own cancellation (e.g. by dropping the returned
    /// receiver, or racing it against a cancellation token); when the
    /// receiver is dropped, the next `publish` finds the channel closed and
    /// prunes it like any other disconnect.
    pub fn subscribe(&self) -> mpsc::Receiver<StreamEvent> {
        let (tx, rx) = mpsc::channel(self.capacity);
        let id = self.next_subscriber_id.fetch_add(1, Ordering::SeqCst);
        self.subscribers.write().unwrap().push(Subscriber { id, tx });
        debug!(subscriber_id = id, "hub: new subscriber");
        rx
    }

    /// Fan out `event` to every live subscriber.
    ///
    /// Assigns `id`/`ts` if the caller left them zero. Non-blocking: a full
    /// queue evicts that subscriber rather than stalling the publisher.
    pub fn publish(&self, mut event: StreamEvent) {
        if event.id == 0 {
            event.id = self.next_event_id.fetch_add(1, Ordering::SeqCst);
        }
        if event.ts == 0 {
            event.ts = now_millis();
        }

        // Copy the subscriber list under the read lock, then send outside it,
        // mirroring the teacher's "copy under lock, act outside it" discipline.
        let snapshot: Vec<(u64, mpsc::Sender<StreamEvent>)> = {
            let subs = self.subscribers.read().unwrap();
            subs.iter().map(|s| (s.id, s.tx.clone())).collect()
        };

        let mut evicted = Vec::new();
        let mut slow = 0u64;
        for (id, tx) in snapshot {
            match tx.try_send(event.clone()) {
                Ok(()) => {}
                Err(mpsc::error::TrySendError::Full(_)) => {
                    evicted.push(id);
                    slow += 1;
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    // The subscriber dropped its receiver on its own (normal
                    // unsubscribe); this isn't a slow-consumer eviction.
                    evicted.push(id);
                }
            }
        }

        if !evicted.is_empty() {
            let mut subs = self.subscribers.write().unwrap();
            subs.retain(|s| !evicted.contains(&s.id));
            if slow > 0 {
                self.slow_disconnects.fetch_add(slow, Ordering::SeqCst);
                info!(count = slow, "hub: evicted slow subscribers");
            }
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.read().unwrap().len()
    }

    pub fn slow_disconnects(&self) -> u64 {
        self.slow_disconnects.load(Ordering::SeqCst)
    }
}

fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
