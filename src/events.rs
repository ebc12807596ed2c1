//! Interrupt-driven edge queue.
//!
//! Button edges are produced by the GPIO ISR and consumed by the control
//! loop, which debounces them and turns accepted presses into mode changes.
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ fan ISR     │────▶│  Edge Queue  │────▶│  Main Loop   │
//! │ light ISR   │────▶│ (crit. sect.)│     │  (debounce)  │
//! └─────────────┘     └──────────────┘     └──────────────┘
//! ```
//!
//! Pushing never blocks: when the queue is full the new edge is dropped
//! and counted. Dropping an edge at worst costs one press, never a stuck
//! counter, since the debouncer treats the next edge on its own merits.

use core::cell::RefCell;
use core::sync::atomic::{AtomicU32, Ordering};

use embassy_sync::blocking_mutex::{Mutex, raw::CriticalSectionRawMutex};
use heapless::Deque;

use crate::app::mode::Appliance;

/// Maximum number of pending edges.
pub const EDGE_QUEUE_CAP: usize = 16;

/// Logic level sampled on a button input. Buttons are active-low.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// Pressed.
    Low,
    /// Released.
    High,
}

impl Level {
    pub fn from_high(high: bool) -> Self {
        if high { Self::High } else { Self::Low }
    }

    pub fn is_pressed(self) -> bool {
        self == Self::Low
    }
}

/// One raw edge, timestamped in interrupt context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeEvent {
    pub input: Appliance,
    pub level: Level,
    /// Milliseconds since boot (wrapping).
    pub at_ms: u32,
}

/// Bounded FIFO shared between ISRs and the control loop.
pub struct EdgeQueue {
    inner: Mutex<CriticalSectionRawMutex, RefCell<Deque<EdgeEvent, EDGE_QUEUE_CAP>>>,
    dropped: AtomicU32,
}

/// The queue the GPIO ISRs feed.
pub static EDGE_QUEUE: EdgeQueue = EdgeQueue::new();

impl EdgeQueue {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Deque::new())),
            dropped: AtomicU32::new(0),
        }
    }

    /// Push an edge. Safe to call from ISR context.
    /// Returns `false` if the queue is full (edge dropped).
    pub fn push(&self, event: EdgeEvent) -> bool {
        let accepted = self
            .inner
            .lock(|q| q.borrow_mut().push_back(event).is_ok());
        if !accepted {
            self.dropped.fetch_add(1, Ordering::Relaxed);
        }
        accepted
    }

    /// Pop the oldest pending edge.
    pub fn pop(&self) -> Option<EdgeEvent> {
        self.inner.lock(|q| q.borrow_mut().pop_front())
    }

    /// Hand every pending edge to `handler`, oldest first. Edges pushed
    /// while the handler runs are drained too.
    pub fn drain(&self, mut handler: impl FnMut(EdgeEvent)) {
        while let Some(event) = self.pop() {
            handler(event);
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock(|q| q.borrow().len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Edges lost to a full queue since boot.
    pub fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl Default for EdgeQueue {
    fn default() -> Self {
        Self::new()
    }
}
