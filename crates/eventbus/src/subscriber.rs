// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bounded subscriber queues with drop-oldest-on-full backpressure.
//!
//! `tokio::sync::mpsc` has no drop-oldest primitive, so the queue is a
//! bespoke bounded ring behind a mutex plus a `Notify` for the async
//! receive side. A slow or dead subscriber never blocks the publisher.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::Notify;

use orc_core::Event;

pub const SUBSCRIBER_QUEUE_CAPACITY: usize = 100;
pub const MAX_SUBSCRIBERS: usize = 100;

struct Inner {
    queue: Mutex<VecDeque<Event>>,
    notify: Notify,
    dead: AtomicBool,
}

/// Publisher-side handle: push events, never blocks, drops oldest on overflow.
#[derive(Clone)]
pub struct SubscriberSlot {
    inner: Arc<Inner>,
}

impl SubscriberSlot {
    /// Push an event into the subscriber's queue. Returns `false` if the
    /// subscriber has been marked dead and should be removed by the caller.
    pub fn push(&self, event: Event) -> bool {
        if self.inner.dead.load(Ordering::Relaxed) {
            return false;
        }
        let mut queue = self.inner.queue.lock();
        if queue.len() >= SUBSCRIBER_QUEUE_CAPACITY {
            queue.pop_front();
        }
        queue.push_back(event);
        drop(queue);
        self.inner.notify.notify_one();
        true
    }

    pub fn is_dead(&self) -> bool {
        self.inner.dead.load(Ordering::Relaxed)
    }
}

/// Consumer-side handle: receives a ring snapshot first, then live events
/// until dropped.
pub struct Subscriber {
    inner: Arc<Inner>,
}

impl Subscriber {
    pub async fn recv(&self) -> Event {
        loop {
            if let Some(event) = self.inner.queue.lock().pop_front() {
                return event;
            }
            self.inner.notify.notified().await;
        }
    }

    pub fn try_recv(&self) -> Option<Event> {
        self.inner.queue.lock().pop_front()
    }
}

impl Drop for Subscriber {
    fn drop(&mut self) {
        self.inner.dead.store(true, Ordering::Relaxed);
    }
}

/// Create a linked publisher slot and consumer handle.
pub fn channel() -> (SubscriberSlot, Subscriber) {
    let inner = Arc::new(Inner {
        queue: Mutex::new(VecDeque::with_capacity(SUBSCRIBER_QUEUE_CAPACITY)),
        notify: Notify::new(),
        dead: AtomicBool::new(false),
    });
    (SubscriberSlot { inner: inner.clone() }, Subscriber { inner })
}

#[cfg(test)]
#[path = "subscriber_tests.rs"]
mod tests;
