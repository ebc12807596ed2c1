//! Fuzz target: `AppService::handle_message`
//!
//! The first byte picks one of the command topics (or a bogus one), the
//! rest is the payload. Whatever arrives, the service must not panic, must
//! never press a button more than twice for one message, and must leave
//! both mode counters on the ring.
//!
//! cargo fuzz run fuzz_command_decoder

#![no_main]

use homedic::app::events::AppEvent;
use homedic::app::mode::{Appliance, CyclicMode, FanMode, LightMode};
use homedic::app::ports::{EventSink, PulsePort};
use homedic::app::service::AppService;
use homedic::config::BridgeConfig;
use homedic::error::ActuatorError;
use libfuzzer_sys::fuzz_target;

#[derive(Default)]
struct Pulses(usize);

impl PulsePort for Pulses {
    fn pulse(&mut self, _appliance: Appliance) -> Result<(), ActuatorError> {
        self.0 += 1;
        Ok(())
    }
}

struct Discard;

impl EventSink for Discard {
    fn emit(&mut self, _event: &AppEvent) {}
}

fuzz_target!(|data: &[u8]| {
    let Some((&selector, payload)) = data.split_first() else {
        return;
    };

    let mut app = AppService::new(&BridgeConfig::default());
    let mut hw = Pulses::default();
    app.start(&mut hw, &mut Discard);
    assert_eq!(hw.0, 0, "boot must not pulse");

    let topics = app.topics().clone();
    let subs = topics.subscriptions();
    let topic = subs.get(selector as usize % 5).copied().unwrap_or("homedic/bogus");

    let _ = app.handle_message(topic, payload, &mut hw, &mut Discard);

    assert!(hw.0 < 3, "one message pressed {} times", hw.0);
    assert!(app.fan_mode().index() < FanMode::COUNT);
    assert!(app.light_mode().index() < LightMode::COUNT);
});
