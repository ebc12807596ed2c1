//! Button debouncing.
//!
//! ## Hardware
//!
//! Active-low momentary switches with pull-ups. The GPIO interrupt fires
//! on any edge; the ISR samples the level and timestamp and pushes an
//! [`EdgeEvent`] onto [`EDGE_QUEUE`](crate::events::EDGE_QUEUE). The main
//! loop drains the queue through [`Debouncer::on_edge`].
//!
//! ## Debounce rule
//!
//! | Edge     | Condition                                   | Result      |
//! |----------|---------------------------------------------|-------------|
//! | press    | first edge ever on this input               | `LogicalPress` |
//! | press    | `now - last_edge > window`                  | `LogicalPress` |
//! | press    | `now - last_edge <= window`                 | suppressed  |
//! | release  | always                                      | suppressed  |
//!
//! Every edge, emitted or not, becomes the new `last_edge` for its input.

use heapless::LinearMap;

use crate::app::mode::Appliance;
use crate::events::{EdgeEvent, Level};

pub const DEFAULT_DEBOUNCE_MS: u32 = 150;

/// A press that survived debouncing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogicalPress {
    pub input: Appliance,
    pub at_ms: u32,
}

pub struct Debouncer {
    window_ms: u32,
    last_edge_ms: LinearMap<Appliance, u32, 2>,
}

impl Debouncer {
    pub fn new(window_ms: u32) -> Self {
        Self {
            window_ms,
            last_edge_ms: LinearMap::new(),
        }
    }

    pub fn window_ms(&self) -> u32 {
        self.window_ms
    }

    /// Feed one raw edge. `now_ms` is wrapping milliseconds since boot.
    pub fn on_edge(&mut self, input: Appliance, level: Level, now_ms: u32) -> Option<LogicalPress> {
        let settled = match self.last_edge_ms.get(&input) {
            None => true,
            Some(&last) => now_ms.wrapping_sub(last) > self.window_ms,
        };

        // One slot per appliance; the map can never be full.
        let _ = self.last_edge_ms.insert(input, now_ms);

        (level.is_pressed() && settled).then_some(LogicalPress {
            input,
            at_ms: now_ms,
        })
    }

    pub fn on_event(&mut self, edge: EdgeEvent) -> Option<LogicalPress> {
        self.on_edge(edge.input, edge.level, edge.at_ms)
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE_MS)
    }
}

/// ISR body for either button. Safe to call from interrupt context.
pub fn button_isr_handler(input: Appliance, level_high: bool, now_ms: u32) {
    crate::events::EDGE_QUEUE.push(EdgeEvent {
        input,
        level: Level::from_high(level_high),
        at_ms: now_ms,
    });
}
