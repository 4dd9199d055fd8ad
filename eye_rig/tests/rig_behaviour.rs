//! Behavioural tests for the shared controller, driven through the public API
//! and observed at the simulated servo outputs.

use eye_common::rig::channel::{Channel, Lid, Side};
use eye_common::rig::config::RigConfig;
use eye_common::rig::driver::ActuatorDriver;
use eye_rig::control::blink::BlinkRejected;
use eye_rig::control::position::{EyelidMode, LidAngles};
use eye_rig::control::request::{blink_channel, BlinkSource};
use eye_rig::drivers::simulation::{SimulationDriver, SimulationProbe};
use eye_rig::EyeController;

fn rig() -> (EyeController, SimulationProbe) {
    let mut config = RigConfig::default();
    config.blink.hold_ms = 5;
    let mut driver = SimulationDriver::new();
    let probe = driver.probe();
    driver.init(&config).unwrap();
    let controller = EyeController::new(&config, Box::new(driver)).unwrap();
    controller.startup_pose();
    (controller, probe)
}

fn lids(probe: &SimulationProbe) -> LidAngles {
    let mut angles = LidAngles::default();
    for lid in Lid::ALL {
        angles[lid] = probe.angle(lid.channel()).unwrap();
    }
    angles
}

fn assert_lids_close(actual: LidAngles, expected: LidAngles) {
    for lid in Lid::ALL {
        assert!(
            (actual[lid] - expected[lid]).abs() < 1e-9,
            "{:?}: expected {}, got {}",
            lid,
            expected[lid],
            actual[lid]
        );
    }
}

fn trigger_upper(pressure: f64) -> f64 {
    // Left upper lid: open at 80, closed at 0.
    80.0 - pressure / 255.0 * 80.0
}

#[test]
fn mode_application_is_idempotent() {
    let (c, probe) = rig();
    c.set_vertical_angle(70.0);
    c.set_mode(EyelidMode::Squint);
    let first = lids(&probe);
    let commands = probe.commands();
    c.set_mode(EyelidMode::Squint);
    assert_eq!(lids(&probe), first);
    assert!(probe.commands() > commands);
    assert_lids_close(first, c.mode_targets());
}

#[test]
fn blink_restores_mid_with_gaze_offset() {
    let (c, probe) = rig();
    c.set_vertical_angle(85.0);
    c.blink().unwrap();

    let offset = (85.0 / 90.0 - 0.5) * 0.8;
    let after = lids(&probe);
    assert!((after[Lid::LeftUpper] - (40.0 + 80.0 * offset)).abs() < 1e-9);
    assert!((after[Lid::RightUpper] - (40.0 - 80.0 * offset)).abs() < 1e-9);
    assert_eq!(after[Lid::LeftLower], 146.0);
    assert_eq!(after[Lid::RightLower], 154.0);
    assert!(!c.is_blinking());
}

#[test]
fn engaged_trigger_dominates_mode_and_gaze() {
    let (c, probe) = rig();
    c.set_trigger(Side::Left, 255);
    assert_eq!(probe.angle(Channel::LeftUpperLid), Some(0.0));
    assert_eq!(probe.angle(Channel::LeftLowerLid), Some(155.0));

    c.set_mode(EyelidMode::Open);
    c.set_vertical_angle(10.0);
    assert_eq!(probe.angle(Channel::LeftUpperLid), Some(0.0));
    assert_eq!(probe.angle(Channel::LeftLowerLid), Some(155.0));
    // Right side follows mode and gaze.
    assert_eq!(probe.angle(Channel::RightLowerLid), Some(155.0));
    let right_upper = c.mode_targets()[Lid::RightUpper];
    assert_eq!(probe.angle(Channel::RightUpperLid), Some(right_upper));
}

#[test]
fn trigger_release_restores_squint_with_gaze() {
    let (c, probe) = rig();
    c.set_mode(EyelidMode::Squint);
    c.set_vertical_angle(85.0);
    c.set_trigger(Side::Left, 200);
    assert!((probe.angle(Channel::LeftUpperLid).unwrap() - trigger_upper(200.0)).abs() < 1e-9);

    c.set_vertical_angle(20.0);
    c.set_trigger(Side::Left, 5);
    assert_lids_close(lids(&probe), c.mode_targets());
}

#[test]
fn reentrant_blink_is_rejected() {
    let (c, _) = rig();
    c.begin_blink().unwrap();
    assert_eq!(c.blink(), Err(BlinkRejected::AlreadyBlinking));
    c.finish_blink();
    assert_eq!(c.snapshot().blinks_completed, 1);
}

#[test]
fn engaged_trigger_blocks_auto_blink_and_right_gaze_writes() {
    let (c, probe) = rig();
    c.set_trigger(Side::Right, 128);
    let right_upper = probe.angle(Channel::RightUpperLid);
    let cached = c.snapshot().upper_lid[1];

    let (requester, worker) = blink_channel(c.clone());
    assert!(requester.request(BlinkSource::Auto));
    worker.serve(BlinkSource::Auto);
    assert_eq!(c.snapshot().blinks_completed, 0);
    assert!(!requester.is_busy());

    c.set_vertical_angle(0.0);
    assert_eq!(probe.angle(Channel::RightUpperLid), right_upper);
    assert_ne!(c.snapshot().upper_lid[1], cached);
    assert_eq!(
        probe.angle(Channel::LeftUpperLid),
        Some(c.mode_targets()[Lid::LeftUpper])
    );
}

#[test]
fn gaze_scenario_offset() {
    let (c, probe) = rig();
    c.set_vertical_angle(85.0);
    let offset = (85.0_f64 / 90.0 - 0.5) * 0.8;
    assert!((offset - 0.355_555_5).abs() < 1e-6);
    let left_upper = probe.angle(Channel::LeftUpperLid).unwrap();
    assert!((left_upper - (40.0 + 80.0 * offset)).abs() < 1e-9);
}

#[test]
fn trigger_engaged_during_hold_takes_over_at_restore() {
    let (c, probe) = rig();
    c.begin_blink().unwrap();
    c.set_trigger(Side::Left, 128);
    // No writes while blinking.
    assert_eq!(probe.angle(Channel::LeftUpperLid), Some(0.0));

    c.finish_blink();
    assert!((probe.angle(Channel::LeftUpperLid).unwrap() - trigger_upper(128.0)).abs() < 1e-9);
    let targets = c.mode_targets();
    assert_eq!(probe.angle(Channel::RightUpperLid), Some(targets[Lid::RightUpper]));
    assert_eq!(probe.angle(Channel::RightLowerLid), Some(targets[Lid::RightLower]));
}

#[test]
fn mode_change_during_blink_retargets_restore() {
    let (c, probe) = rig();
    c.begin_blink().unwrap();
    let closed = lids(&probe);
    c.set_mode(EyelidMode::Squint);
    assert_eq!(lids(&probe), closed);

    c.finish_blink();
    assert_eq!(c.mode(), EyelidMode::Squint);
    assert_lids_close(lids(&probe), c.mode_targets());
}

#[test]
fn concurrent_blinks_from_threads_never_overlap() {
    let (c, _) = rig();
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let c = c.clone();
            std::thread::spawn(move || c.blink().is_ok())
        })
        .collect();
    let accepted = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|ok| *ok)
        .count();
    assert!(accepted >= 1);
    assert_eq!(c.snapshot().blinks_completed, accepted as u64);
    assert!(!c.is_blinking());
}
