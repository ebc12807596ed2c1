//! Mode convergence.
//!
//! The appliance only understands "button pressed", so reaching a target
//! mode means pressing until the counter wraps round to it. The number of
//! presses is always `(target - current) mod COUNT`, which is at most
//! `COUNT - 1`; the loop is bounded because both ends are already valid
//! ring members.

use core::fmt;

use crate::error::ActuatorError;

use super::mode::CyclicMode;
use super::ports::PulsePort;

/// A pulse failed part-way through a convergence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvergeError<M> {
    /// The mode the appliance is in after the last successful pulse.
    pub reached: M,
    pub source: ActuatorError,
}

impl<M: fmt::Debug> fmt::Display for ConvergeError<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (stopped at {:?})", self.source, self.reached)
    }
}

/// Pulse `M::APPLIANCE` from `current` to `target`, blocking for every
/// pulse. Returns the reached mode, which is `target` on success.
pub fn converge<M: CyclicMode>(
    mut current: M,
    target: M,
    port: &mut impl PulsePort,
) -> Result<M, ConvergeError<M>> {
    for _ in 0..current.steps_to(target) {
        port.pulse(M::APPLIANCE).map_err(|source| ConvergeError {
            reached: current,
            source,
        })?;
        current = current.next();
    }
    debug_assert_eq!(current, target);
    Ok(current)
}
