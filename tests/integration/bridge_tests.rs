//! Integration tests for the Bridge → AppService → adapters pipeline.
//!
//! Drives the bridge the way the firmware's control loop does: inbound
//! broker items and queued button edges go in, pulses and status publishes
//! come out through the mock adapters.

use homedic::adapters::mqtt::{Inbound, LinkState};
use homedic::app::mode::{Appliance, FanMode, LightMode};
use homedic::bridge::Bridge;
use homedic::config::BridgeConfig;
use homedic::events::{EdgeEvent, EdgeQueue, Level};

use super::mock_hw::{MockClient, MockPulses};

type TestBridge = Bridge<MockPulses, MockClient>;

fn msg(topic: &str, payload: &str) -> Inbound {
    Inbound::Message {
        topic: topic.to_owned(),
        payload: payload.as_bytes().to_vec(),
    }
}

/// Connected, subscribed, and through the boot sequence, with the
/// recorders cleared.
fn booted() -> TestBridge {
    let mut bridge = Bridge::new(&BridgeConfig::default(), MockPulses::new(), MockClient::new());
    assert!(bridge.link_mut().on_connected(0));
    bridge.start();
    bridge.link_mut().client_mut().clear();
    bridge.hw_mut().clear();
    bridge
}

fn published(bridge: &TestBridge) -> Vec<(&str, &str)> {
    bridge.link().client().sent()
}

// ── Boot ──────────────────────────────────────────────────────

#[test]
fn boot_publishes_light_then_fan_at_mode_zero() {
    let mut bridge = Bridge::new(&BridgeConfig::default(), MockPulses::new(), MockClient::new());
    assert!(bridge.link_mut().on_connected(0));
    bridge.start();

    assert!(bridge.hw().pulses.is_empty(), "boot must not pulse");
    assert_eq!(
        bridge.link().client().subscriptions,
        [
            "homedic/light/switch",
            "homedic/light/effect",
            "homedic/fan/set",
            "homedic/fan/speed"
        ]
    );
    assert_eq!(
        published(&bridge),
        [
            ("homedic/light/status", "0"),
            ("homedic/light/effect_status", "none"),
            ("homedic/fan/speed_state", "off"),
            ("homedic/fan/state", "off"),
        ]
    );
}

#[test]
fn boot_before_connect_publishes_on_first_connect() {
    let mut bridge = Bridge::new(&BridgeConfig::default(), MockPulses::new(), MockClient::new());
    bridge.start();
    assert!(published(&bridge).is_empty());
    assert_eq!(bridge.link().dropped(), 4);

    bridge.on_inbound(Inbound::Connected, 500);
    assert_eq!(bridge.link().client().subscriptions.len(), 4);
    assert_eq!(
        published(&bridge),
        [
            ("homedic/fan/speed_state", "off"),
            ("homedic/fan/state", "off"),
            ("homedic/light/status", "0"),
            ("homedic/light/effect_status", "none"),
        ]
    );
}

// ── Fan ───────────────────────────────────────────────────────

#[test]
fn fan_on_then_low_converges_forward() {
    let mut bridge = booted();

    bridge.on_inbound(msg("homedic/fan/set", "on"), 10);
    assert_eq!(bridge.hw().count(Appliance::Fan), 1);
    assert_eq!(bridge.app().fan_mode(), FanMode::High);
    assert_eq!(
        published(&bridge),
        [("homedic/fan/speed_state", "high"), ("homedic/fan/state", "on")]
    );

    bridge.link_mut().client_mut().clear();
    bridge.on_inbound(msg("homedic/fan/speed", "low"), 20);
    assert_eq!(bridge.hw().count(Appliance::Fan), 2);
    assert_eq!(bridge.app().fan_mode(), FanMode::Low);
    assert_eq!(
        published(&bridge),
        [("homedic/fan/speed_state", "low"), ("homedic/fan/state", "on")]
    );
}

#[test]
fn fan_on_while_running_keeps_speed_and_republishes() {
    let mut bridge = booted();
    bridge.on_inbound(msg("homedic/fan/speed", "low"), 10);
    assert_eq!(bridge.hw().count(Appliance::Fan), 2);
    bridge.link_mut().client_mut().clear();

    bridge.on_inbound(msg("homedic/fan/set", "on"), 20);
    assert_eq!(bridge.hw().count(Appliance::Fan), 2, "no extra pulses");
    assert_eq!(bridge.app().fan_mode(), FanMode::Low);
    assert_eq!(
        published(&bridge),
        [("homedic/fan/speed_state", "low"), ("homedic/fan/state", "on")]
    );
}

#[test]
fn fan_off_from_high_wraps_through_low() {
    let mut bridge = booted();
    bridge.on_inbound(msg("homedic/fan/set", "on"), 10);
    bridge.hw_mut().clear();

    bridge.on_inbound(msg("homedic/fan/set", "off"), 20);
    assert_eq!(bridge.hw().pulses, [Appliance::Fan, Appliance::Fan]);
    assert_eq!(bridge.app().fan_mode(), FanMode::Off);
    assert_eq!(bridge.link().client().last_on("homedic/fan/state"), Some("off"));
}

// ── Light ─────────────────────────────────────────────────────

#[test]
fn switch_on_echo_after_color_loop_is_ignored() {
    let mut bridge = booted();

    bridge.on_inbound(msg("homedic/light/effect", "color_loop"), 10);
    assert_eq!(bridge.hw().count(Appliance::Light), 2);
    assert_eq!(bridge.app().light_mode(), LightMode::ColorLoop);
    assert_eq!(
        published(&bridge),
        [
            ("homedic/light/status", "1"),
            ("homedic/light/effect_status", "color_loop"),
        ]
    );

    bridge.link_mut().client_mut().clear();
    bridge.on_inbound(msg("homedic/light/switch", "1"), 20);
    assert_eq!(bridge.hw().count(Appliance::Light), 2, "echo must not pulse");
    assert!(published(&bridge).is_empty(), "echo must not publish");
    assert_eq!(bridge.app().light_mode(), LightMode::ColorLoop);
}

#[test]
fn effect_none_from_color_loop_falls_back_to_on() {
    let mut bridge = booted();
    bridge.on_inbound(msg("homedic/light/effect", "color_loop"), 10);
    bridge.hw_mut().clear();
    bridge.link_mut().client_mut().clear();

    bridge.on_inbound(msg("homedic/light/effect", "none"), 20);
    // 2 → 0 → 1
    assert_eq!(bridge.hw().pulses, [Appliance::Light, Appliance::Light]);
    assert_eq!(bridge.app().light_mode(), LightMode::On);
    assert_eq!(
        published(&bridge),
        [
            ("homedic/light/status", "1"),
            ("homedic/light/effect_status", "none"),
        ]
    );
}

#[test]
fn switch_reduces_out_of_range_values() {
    let mut bridge = booted();

    bridge.on_inbound(msg("homedic/light/switch", "4"), 10);
    assert_eq!(bridge.app().light_mode(), LightMode::On);

    bridge.on_inbound(msg("homedic/light/switch", "-1"), 20);
    assert_eq!(bridge.app().light_mode(), LightMode::ColorLoop);

    assert_eq!(bridge.hw().count(Appliance::Light), 2);
}

#[test]
fn repeated_command_is_idempotent() {
    let mut bridge = booted();
    bridge.on_inbound(msg("homedic/light/switch", "1"), 10);
    assert_eq!(bridge.hw().count(Appliance::Light), 1);
    bridge.link_mut().client_mut().clear();

    bridge.on_inbound(msg("homedic/light/switch", "1"), 20);
    assert_eq!(bridge.hw().count(Appliance::Light), 1);
    assert_eq!(
        published(&bridge),
        [
            ("homedic/light/status", "1"),
            ("homedic/light/effect_status", "none"),
        ]
    );
}

// ── Malformed input ───────────────────────────────────────────

#[test]
fn malformed_messages_change_nothing() {
    let mut bridge = booted();

    for (topic, payload) in [
        ("homedic/fan/set", "maybe"),
        ("homedic/fan/speed", "medium"),
        ("homedic/light/switch", "bright"),
        ("homedic/light/effect", "strobe"),
        ("homedic/fan/state", "on"),
        ("elsewhere/fan/set", "on"),
    ] {
        bridge.on_inbound(msg(topic, payload), 10);
    }
    bridge.on_inbound(
        Inbound::Message {
            topic: "homedic/fan/set".to_owned(),
            payload: vec![0xff, 0xfe],
        },
        10,
    );

    assert!(bridge.hw().pulses.is_empty());
    assert!(published(&bridge).is_empty());
    assert_eq!(bridge.app().fan_mode(), FanMode::Off);
    assert_eq!(bridge.app().light_mode(), LightMode::Off);
}

// ── Buttons ───────────────────────────────────────────────────

#[test]
fn queued_button_edges_are_debounced_and_advance() {
    let mut bridge = booted();
    let queue = EdgeQueue::new();
    let edge = |input, level, at_ms| EdgeEvent {
        input,
        level,
        at_ms,
    };

    // A bouncy fan press, then a clean light press.
    queue.push(edge(Appliance::Fan, Level::Low, 1_000));
    queue.push(edge(Appliance::Fan, Level::High, 1_020));
    queue.push(edge(Appliance::Fan, Level::Low, 1_040));
    queue.push(edge(Appliance::Fan, Level::High, 1_300));
    queue.push(edge(Appliance::Light, Level::Low, 1_310));
    bridge.service_edges(&queue);

    assert!(queue.is_empty());
    assert_eq!(bridge.hw().pulses, [Appliance::Fan, Appliance::Light]);
    assert_eq!(bridge.app().fan_mode(), FanMode::High);
    assert_eq!(bridge.app().light_mode(), LightMode::On);
    assert_eq!(
        published(&bridge),
        [
            ("homedic/fan/speed_state", "high"),
            ("homedic/fan/state", "on"),
            ("homedic/light/status", "1"),
            ("homedic/light/effect_status", "none"),
        ]
    );

    // Third light press wraps back to off.
    queue.push(edge(Appliance::Light, Level::Low, 1_600));
    queue.push(edge(Appliance::Light, Level::Low, 1_900));
    bridge.service_edges(&queue);
    assert_eq!(bridge.app().light_mode(), LightMode::Off);
}

// ── Link ──────────────────────────────────────────────────────

#[test]
fn reconnect_resubscribes_and_republishes_current_modes() {
    let mut bridge = booted();
    bridge.on_inbound(msg("homedic/fan/speed", "low"), 10);
    bridge.on_inbound(Inbound::Disconnected, 20);
    assert_eq!(bridge.link().state(), LinkState::Disconnected);

    // Press while offline: the pulse happens, the publish is dropped.
    bridge.on_edge(EdgeEvent {
        input: Appliance::Light,
        level: Level::Low,
        at_ms: 30,
    });
    assert_eq!(bridge.app().light_mode(), LightMode::On);
    assert_eq!(bridge.link().dropped(), 2);
    bridge.link_mut().client_mut().clear();
    let pulses = bridge.hw().pulses.len();

    bridge.on_inbound(Inbound::Connected, 40);
    assert!(bridge.link().is_subscribed());
    assert_eq!(bridge.link().client().subscriptions.len(), 4);
    assert_eq!(bridge.hw().pulses.len(), pulses, "republish never pulses");
    assert_eq!(
        published(&bridge),
        [
            ("homedic/fan/speed_state", "low"),
            ("homedic/fan/state", "on"),
            ("homedic/light/status", "1"),
            ("homedic/light/effect_status", "none"),
        ]
    );
}

#[test]
fn failed_subscribe_is_retried_from_poll() {
    let mut bridge = Bridge::new(&BridgeConfig::default(), MockPulses::new(), MockClient::new());
    bridge.link_mut().client_mut().fail_subscribe = true;
    bridge.on_inbound(Inbound::Connected, 0);
    assert!(!bridge.link().is_subscribed());

    bridge.link_mut().client_mut().fail_subscribe = false;
    bridge.poll(500);
    assert!(!bridge.link().is_subscribed(), "backoff not yet elapsed");

    bridge.poll(1_000);
    assert!(bridge.link().is_subscribed());
    assert_eq!(bridge.link().client().subscriptions.len(), 4);
}

#[test]
fn custom_prefix_is_honoured_end_to_end() {
    let config = BridgeConfig {
        topic_prefix: "house/den".into(),
        ..BridgeConfig::default()
    };
    let mut bridge = Bridge::new(&config, MockPulses::new(), MockClient::new());
    bridge.link_mut().on_connected(0);
    bridge.link_mut().client_mut().clear();

    bridge.on_inbound(msg("homedic/fan/set", "on"), 10);
    assert!(bridge.hw().pulses.is_empty());

    bridge.on_inbound(msg("house/den/fan/set", "on"), 20);
    assert_eq!(bridge.hw().count(Appliance::Fan), 1);
    assert_eq!(bridge.link().client().last_on("house/den/fan/state"), Some("on"));
}
