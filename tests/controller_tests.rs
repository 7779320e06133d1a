//! Timing and rotation behaviour of the intersection controller
//!
//! All tests run on the controller's virtual clock.

use intersection_signals::simulation::{
    Approach, IntersectionController, LightState, Signal, SignalEvent, TimingConfig,
    TransitionPhase,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

fn started(cycle_ms: u64) -> IntersectionController {
    IntersectionController::started(TimingConfig::with_cycle(ms(cycle_ms)))
        .expect("valid timing")
}

fn greens(events: &[SignalEvent]) -> Vec<Approach> {
    events
        .iter()
        .filter_map(|event| match event {
            SignalEvent::Green { approach, .. } => Some(*approach),
            _ => None,
        })
        .collect()
}

fn cleared_times(events: &[SignalEvent]) -> Vec<Duration> {
    events
        .iter()
        .filter_map(|event| match event {
            SignalEvent::Cleared { at, .. } => Some(*at),
            _ => None,
        })
        .collect()
}

#[test]
fn test_start_state() {
    let controller = started(2500);
    assert!(controller.is_running());
    assert_eq!(controller.cursor(), 0);
    assert_eq!(controller.current_state(), LightState::initial());
    assert_eq!(controller.phase(), TransitionPhase::Idle);
    assert_eq!(controller.next_transition_at(), Some(ms(2500)));
}

#[test]
fn test_first_transition_waits_a_full_cycle() {
    let mut controller = started(1000);
    assert!(controller.advance_to(ms(999)).is_empty());
    assert_eq!(controller.current_state(), LightState::initial());

    let events = controller.advance_to(ms(1000));
    assert_eq!(
        events,
        vec![SignalEvent::Cleared {
            at: ms(1000),
            approach: Approach::North
        }]
    );
}

#[test]
fn test_scenario_one_second_cycle() {
    let mut controller = started(1000);

    controller.advance_to(ms(1000));
    assert!(controller.current_state().is_all_red());
    assert_eq!(controller.cursor(), 0);

    controller.advance_to(ms(1149));
    assert_eq!(controller.cursor(), 0);

    controller.advance_to(ms(1150));
    assert_eq!(controller.cursor(), 1);
    assert!(controller.current_state().is_all_red());

    controller.advance_to(ms(1209));
    assert!(controller.current_state().is_all_red());

    controller.advance_to(ms(1210));
    assert_eq!(controller.current_state(), LightState::with_green(Approach::East));

    controller.advance_to(ms(2209));
    assert_eq!(controller.current_state().get(Approach::East), Signal::Green);

    let events = controller.advance_to(ms(2210));
    assert_eq!(cleared_times(&events), vec![ms(2210)]);
    assert_eq!(controller.current_state().get(Approach::East), Signal::Red);

    controller.advance_to(ms(2419));
    assert!(controller.current_state().is_all_red());
    assert_eq!(controller.cursor(), 2);

    controller.advance_to(ms(2420));
    assert_eq!(controller.current_state(), LightState::with_green(Approach::South));
}

#[test]
fn test_timing_law_holds_for_every_transition() {
    let mut controller = started(700);
    let events = controller.advance_to(ms(20_000));

    let mut cleared_at = None;
    let mut settled_at = None;
    for event in &events {
        match *event {
            SignalEvent::Cleared { at, .. } => cleared_at = Some(at),
            SignalEvent::AllRedAsserted { at, .. } => {
                assert_eq!(Some(at), cleared_at.map(|t| t + ms(150)));
                settled_at = Some(at);
            }
            SignalEvent::Green { at, .. } => {
                assert_eq!(Some(at), settled_at.map(|t| t + ms(60)));
            }
            _ => {}
        }
    }

    let cleared = cleared_times(&events);
    for pair in cleared.windows(2) {
        assert_eq!(pair[1] - pair[0], ms(700 + 210));
    }
}

#[test]
fn test_rotation_order_is_clockwise_forever() {
    let mut controller = started(300);
    let events = controller.advance_to(ms(60_000));
    let order = greens(&events);

    assert!(order.len() > 100);
    for (i, approach) in order.iter().enumerate() {
        assert_eq!(*approach, Approach::at(i + 1));
    }

    let stats = controller.stats();
    assert_eq!(stats.transitions_completed, order.len() as u64);
    let counts: Vec<u64> = Approach::ROTATION
        .iter()
        .map(|approach| stats.greens_for(*approach))
        .collect();
    let max = counts.iter().max().copied().unwrap_or(0);
    let min = counts.iter().min().copied().unwrap_or(0);
    assert!(max - min <= 1);
}

#[test]
fn test_reset_mid_cycle_restarts_the_interval() {
    let mut controller = started(1000);
    controller.advance_to(ms(500));

    let event = controller.reset();
    assert_eq!(event, Some(SignalEvent::Reset { at: ms(500) }));
    assert_eq!(controller.cursor(), 0);
    assert_eq!(controller.current_state(), LightState::initial());

    assert!(controller.advance_to(ms(1499)).is_empty());
    assert_eq!(cleared_times(&controller.advance_to(ms(1500))), vec![ms(1500)]);
}

#[test]
fn test_reset_inside_transition_window_cancels_pending_phases() {
    let mut controller = started(1000);

    controller.advance_to(ms(1100));
    assert_eq!(controller.phase(), TransitionPhase::AllRedSettling);
    controller.reset();
    assert!(controller.advance_to(ms(1300)).is_empty());
    assert_eq!(controller.current_state(), LightState::initial());

    controller.advance_to(ms(2255));
    assert_eq!(controller.phase(), TransitionPhase::AwaitingGreen);
    controller.reset();
    assert!(controller.advance_to(ms(3000)).is_empty());
    assert_eq!(controller.current_state(), LightState::initial());
    assert_eq!(controller.pending_timers(), 1);
}

#[test]
fn test_double_reset_schedules_one_transition_per_cycle() {
    let mut once = started(1000);
    let mut twice = started(1000);
    once.advance_to(ms(500));
    twice.advance_to(ms(500));

    once.reset();
    twice.reset();
    twice.reset();

    assert_eq!(twice.pending_timers(), 1);
    assert_eq!(once.current_state(), twice.current_state());
    assert_eq!(once.cursor(), twice.cursor());

    let events_once = once.advance_to(ms(4000));
    let events_twice = twice.advance_to(ms(4000));
    assert_eq!(events_once, events_twice);
    assert_eq!(
        cleared_times(&events_twice),
        vec![ms(1500), ms(2710), ms(3920)]
    );
}

#[test]
fn test_reset_restores_origin_after_many_cycles() {
    let mut controller = started(400);
    controller.advance_to(ms(7_777));
    assert_ne!(controller.stats().transitions_completed, 0);

    controller.reset();
    let fresh = started(400);
    assert_eq!(controller.cursor(), fresh.cursor());
    assert_eq!(controller.current_state(), fresh.current_state());
    assert_eq!(controller.phase(), fresh.phase());
    assert_eq!(controller.timing(), fresh.timing());
    assert_eq!(controller.stats().resets, 1);
}

#[test]
fn test_all_red_is_reasserted_after_interference() {
    let mut controller = started(1000);
    controller.advance_to(ms(1000));

    let mut perturbed = LightState::all_red();
    perturbed.set(Approach::West, Signal::Green);
    controller.override_lights(perturbed);

    controller.advance_to(ms(1150));
    assert!(controller.current_state().is_all_red());
    controller.advance_to(ms(1210));
    assert_eq!(controller.current_state(), LightState::with_green(Approach::East));
}

#[test]
fn test_stop_prevents_further_callbacks() {
    let mut controller = started(1000);
    controller.advance_to(ms(1100));

    assert!(matches!(controller.stop(), Some(SignalEvent::Stopped { .. })));
    assert_eq!(controller.pending_timers(), 0);
    assert!(controller.advance_to(ms(60_000)).is_empty());
    assert_eq!(controller.reset(), None);
    assert_eq!(controller.stop(), None);

    controller.start(ms(1000)).unwrap();
    assert_eq!(controller.current_state(), LightState::initial());
    assert_eq!(controller.next_transition_at(), Some(ms(61_000)));
}

#[test]
fn test_invalid_timing_is_rejected() {
    assert!(IntersectionController::new(TimingConfig::with_cycle(Duration::ZERO)).is_err());

    let mut controller = IntersectionController::new(TimingConfig::default()).unwrap();
    assert!(controller.start(Duration::ZERO).is_err());
    assert!(!controller.is_running());
    assert_eq!(controller.pending_timers(), 0);
}

#[test]
fn test_custom_phase_pauses() {
    let timing = TimingConfig::from_millis(500, 100, 20).unwrap();
    let mut controller = IntersectionController::started(timing).unwrap();

    let events = controller.advance_to(ms(620));
    assert_eq!(
        events,
        vec![
            SignalEvent::Cleared {
                at: ms(500),
                approach: Approach::North
            },
            SignalEvent::AllRedAsserted {
                at: ms(600),
                next: Approach::East
            },
            SignalEvent::Green {
                at: ms(620),
                approach: Approach::East
            },
        ]
    );
}

#[test]
fn test_one_green_invariant_under_random_resets() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let mut controller = started(250);

    for _ in 0..20_000 {
        if rng.random_bool(0.002) {
            controller.reset();
        }
        controller.advance_by(ms(rng.random_range(1..=7)));

        let lights = controller.current_state();
        match controller.phase() {
            TransitionPhase::Idle => {
                assert_eq!(lights.green_count(), 1, "at {:?}", controller.now());
                assert_eq!(lights.green_approach(), Some(controller.current_approach()));
            }
            TransitionPhase::AllRedSettling | TransitionPhase::AwaitingGreen => {
                assert!(lights.is_all_red(), "at {:?}", controller.now());
            }
        }
        assert!(controller.pending_timers() <= 2);
    }
}
