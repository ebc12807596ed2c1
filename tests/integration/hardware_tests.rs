//! Integration tests for AppService → HardwareAdapter → GPIO.
//!
//! Uses the real pulse drivers over traced pins and a simulated clock, so
//! the waveform the appliance would see can be checked edge by edge.

use std::cell::RefCell;
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, OutputPin};

use homedic::adapters::hardware::HardwareAdapter;
use homedic::app::mode::{Appliance, FanMode, LightMode};
use homedic::app::service::AppService;
use homedic::config::BridgeConfig;
use homedic::drivers::pulse::PulseDriver;
use homedic::drivers::status_led::StatusIndicator;
use homedic::pins;

use super::mock_hw::RecordingSink;

/// `(gpio, high, at_ms)` for every pin write.
type Trace = Rc<RefCell<Vec<(i32, bool, u32)>>>;

#[derive(Clone, Default)]
struct Clock(Rc<RefCell<u32>>);

impl Clock {
    fn now(&self) -> u32 {
        *self.0.borrow()
    }
}

impl DelayNs for Clock {
    fn delay_ns(&mut self, ns: u32) {
        *self.0.borrow_mut() += ns / 1_000_000;
    }

    fn delay_ms(&mut self, ms: u32) {
        *self.0.borrow_mut() += ms;
    }
}

struct TracePin {
    gpio: i32,
    clock: Clock,
    trace: Trace,
}

impl ErrorType for TracePin {
    type Error = Infallible;
}

impl OutputPin for TracePin {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.trace
            .borrow_mut()
            .push((self.gpio, false, self.clock.now()));
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.trace
            .borrow_mut()
            .push((self.gpio, true, self.clock.now()));
        Ok(())
    }
}

struct Rig {
    app: AppService,
    hw: HardwareAdapter<TracePin, Clock>,
    sink: RecordingSink,
    clock: Clock,
    trace: Trace,
}

impl Rig {
    fn new() -> Self {
        let config = BridgeConfig::default();
        let clock = Clock::default();
        let trace: Trace = Rc::default();
        let pin = |gpio| TracePin {
            gpio,
            clock: clock.clone(),
            trace: trace.clone(),
        };
        let hw = HardwareAdapter::new(
            PulseDriver::new(
                pin(pins::FAN_PULSE_GPIO),
                clock.clone(),
                config.pulse_on_ms,
                config.pulse_off_ms,
            ),
            PulseDriver::new(
                pin(pins::LIGHT_PULSE_GPIO),
                clock.clone(),
                config.pulse_on_ms,
                config.pulse_off_ms,
            ),
            StatusIndicator::new(pin(pins::STATUS_LED_GPIO), true),
        );
        Self {
            app: AppService::new(&config),
            hw,
            sink: RecordingSink::new(),
            clock,
            trace,
        }
    }

    fn writes_to(&self, gpio: i32) -> Vec<(bool, u32)> {
        self.trace
            .borrow()
            .iter()
            .filter(|(g, _, _)| *g == gpio)
            .map(|(_, high, at)| (*high, *at))
            .collect()
    }
}

#[test]
fn boot_touches_no_pulse_output_and_clears_indicator() {
    let mut rig = Rig::new();
    rig.app.start(&mut rig.hw, &mut rig.sink);
    rig.hw.clear_status_indicator().unwrap();

    assert!(rig.writes_to(pins::FAN_PULSE_GPIO).is_empty());
    assert!(rig.writes_to(pins::LIGHT_PULSE_GPIO).is_empty());
    // Active-low: clearing drives the LED pin high.
    assert_eq!(rig.writes_to(pins::STATUS_LED_GPIO), [(true, 0)]);
    assert!(!rig.hw.status_lit());
}

#[test]
fn fan_low_drives_two_timed_pulses() {
    let mut rig = Rig::new();
    rig.app.start(&mut rig.hw, &mut rig.sink);

    rig.app
        .handle_message("homedic/fan/speed", b"low", &mut rig.hw, &mut rig.sink)
        .unwrap();

    assert_eq!(rig.app.fan_mode(), FanMode::Low);
    assert_eq!(
        rig.writes_to(pins::FAN_PULSE_GPIO),
        [(true, 0), (false, 30), (true, 80), (false, 110)]
    );
    assert_eq!(rig.clock.now(), 160);
    assert_eq!(rig.hw.pulse_count(Appliance::Fan), 2);
    assert_eq!(rig.hw.pulse_count(Appliance::Light), 0);
}

#[test]
fn light_pulses_never_touch_the_fan_output() {
    let mut rig = Rig::new();
    rig.app.start(&mut rig.hw, &mut rig.sink);

    rig.app
        .handle_message("homedic/light/effect", b"color_loop", &mut rig.hw, &mut rig.sink)
        .unwrap();

    assert_eq!(rig.app.light_mode(), LightMode::ColorLoop);
    assert_eq!(rig.writes_to(pins::LIGHT_PULSE_GPIO).len(), 4);
    assert!(rig.writes_to(pins::FAN_PULSE_GPIO).is_empty());
    assert_eq!(rig.hw.pulse_count(Appliance::Light), 2);
}
