//! Per-appliance mode owner.

use log::{debug, warn};

use super::actuator::converge;
use super::events::AppEvent;
use super::mode::CyclicMode;
use super::ports::{EventSink, PulsePort};

/// Owns one appliance's mode counter. The counter changes only through
/// [`converge`], and every change is followed by a status event.
#[derive(Debug)]
pub struct ApplianceController<M> {
    current: M,
}

impl<M> ApplianceController<M>
where
    M: CyclicMode + Into<AppEvent>,
{
    /// A controller at the power-on mode.
    pub fn new() -> Self {
        Self { current: M::boot() }
    }

    pub fn current(&self) -> M {
        self.current
    }

    /// One button press worth of progress.
    pub fn advance(&mut self, hw: &mut impl PulsePort, sink: &mut impl EventSink) -> M {
        let target = self.current.next();
        self.set_mode(target, hw, sink)
    }

    /// Pulse until the appliance reads `target`, then publish. Asking for
    /// the current mode pulses nothing but still publishes.
    pub fn set_mode(&mut self, target: M, hw: &mut impl PulsePort, sink: &mut impl EventSink) -> M {
        debug!(
            "{}: {:?} -> {:?} ({} pulses)",
            M::APPLIANCE,
            self.current,
            target,
            self.current.steps_to(target)
        );
        self.current = match converge(self.current, target, hw) {
            Ok(reached) => reached,
            Err(e) => {
                warn!("{}: convergence to {:?} failed: {}", M::APPLIANCE, target, e);
                e.reached
            }
        };
        self.republish(sink);
        self.current
    }

    /// Re-advertise the current mode without touching the appliance.
    pub fn republish(&self, sink: &mut impl EventSink) {
        sink.emit(&self.current.into());
    }
}

impl<M> Default for ApplianceController<M>
where
    M: CyclicMode + Into<AppEvent>,
{
    fn default() -> Self {
        Self::new()
    }
}
