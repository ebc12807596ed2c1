//! Shared adapter-layer helpers: credential validation and retry backoff.

/// Returns `true` if every byte of `s` is in the printable ASCII range
/// `0x20..=0x7E` (space through tilde, inclusive).
///
/// Used to validate Wi-Fi SSID strings.
pub(crate) fn is_printable_ascii(s: &str) -> bool {
    s.bytes().all(|b| (0x20..=0x7E).contains(&b))
}

/// Exponential retry delay: starts at `initial_ms`, doubles after every
/// failure, never exceeds `max_ms`. [`reset`](Self::reset) after a success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Backoff {
    initial_ms: u32,
    max_ms: u32,
    current_ms: u32,
}

impl Backoff {
    pub(crate) const fn new(initial_ms: u32, max_ms: u32) -> Self {
        Self {
            initial_ms,
            max_ms,
            current_ms: initial_ms,
        }
    }

    /// The delay to wait now; the next call returns double (capped).
    pub(crate) fn next_delay_ms(&mut self) -> u32 {
        let delay = self.current_ms;
        self.current_ms = self.current_ms.saturating_mul(2).min(self.max_ms);
        delay
    }

    pub(crate) fn reset(&mut self) {
        self.current_ms = self.initial_ms;
    }
}
