//! Tick-level tests for the move sequencer and animator systems.

use magicube::animator::{Direction, FaceTurn, RotationMove};
use magicube::app::CubeApp;
use magicube::error::CubeError;
use magicube::pacer::FixedPacer;
use magicube::resolver::FaceGroup;
use magicube::resources::animator::Animator;
use magicube::resources::bodyregistry::{BodyId, BodyKind, BodyRegistry};
use magicube::resources::cubeconfig::CubeConfig;
use magicube::resources::facetable::{Face, FaceTable};
use magicube::resources::movehistory::MoveHistory;
use magicube::resources::sequencer::{MoveSequencer, SequenceMode, StopSignal};
use magicube::resources::worldtime::WorldTime;
use std::time::Duration;

const TICK: f32 = 0.03;

fn config() -> CubeConfig {
    let mut config = CubeConfig::new();
    config.step_count = 5;
    config.step_delay_ms = 30;
    config.move_pause_ms = 90;
    config.seed = Some(11);
    config
}

#[test]
fn only_the_turning_group_moves() {
    let mut app = CubeApp::new(config());
    app.world_mut()
        .resource_mut::<MoveSequencer>()
        .start_count(6);

    let mut prev = app.registry().positions();
    let mut last_group: Option<FaceGroup> = None;
    for _ in 0..400 {
        app.tick(TICK);

        if let Some(turn) = app.animator().current() {
            for id in turn.group().iter() {
                let expected = turn.position_at(id, turn.step_index()).unwrap();
                assert_eq!(app.registry().get(id).unwrap().position, expected);
            }
            last_group = Some(turn.group().clone());
        }

        let now = app.registry().positions();
        for (id, p) in &now {
            if prev[id] != *p {
                let group = last_group.as_ref().expect("move without a turn");
                assert!(group.contains(id), "{id} moved outside its turn");
            }
        }
        prev = now;
    }
    assert_eq!(app.history().len(), 6);
    assert!(!app.world().resource::<MoveSequencer>().is_running());
}

#[test]
fn animator_refuses_a_second_turn() {
    let config = config();
    let mut app = CubeApp::new(config.clone());
    let table = config.face_table();
    let reg = app.registry().clone();
    let first = FaceTurn::begin(
        RotationMove::new(Face::U, Direction::Positive),
        &reg,
        &table,
        config.slice_tolerance,
        config.step_count,
    )
    .unwrap();
    let second = FaceTurn::begin(
        RotationMove::new(Face::R, Direction::Positive),
        &reg,
        &table,
        config.slice_tolerance,
        config.step_count,
    )
    .unwrap();

    let mut animator = app.world_mut().resource_mut::<Animator>();
    assert!(animator.start(first));
    assert!(!animator.start(second));
    assert_eq!(
        animator.current().map(|t| t.rotation_move().face),
        Some(Face::U)
    );
}

#[test]
fn steps_follow_world_time() {
    let mut app = CubeApp::new(config());
    app.world_mut()
        .resource_mut::<MoveSequencer>()
        .start_count(1);

    // Half a step delay: the move starts but no step lands yet.
    app.tick(TICK / 2.0);
    let turn = app.animator().current().expect("turn started");
    assert_eq!(turn.step_index(), 0);

    // A long tick catches up on several steps at once.
    app.tick(TICK * 3.0);
    assert_eq!(app.animator().current().unwrap().step_index(), 3);

    app.tick(TICK * 10.0);
    assert!(app.animator().is_idle());
    assert_eq!(app.history().len(), 1);
    assert!(app.world().resource::<WorldTime>().frame_count >= 3);
}

#[test]
fn pause_separates_moves() {
    let mut app = CubeApp::new(config());
    app.world_mut()
        .resource_mut::<MoveSequencer>()
        .start_count(2);

    // 5 steps at one step per tick.
    for _ in 0..5 {
        app.tick(TICK);
    }
    assert!(app.animator().is_idle());
    assert_eq!(app.history().len(), 1);

    // 90ms pause: idle for two more ticks, third one starts the next move.
    app.tick(TICK);
    app.tick(TICK);
    assert!(app.animator().is_idle());
    app.tick(TICK * 1.5);
    assert!(!app.animator().is_idle());
}

#[test]
fn continuous_mode_stops_between_moves() {
    let mut app = CubeApp::new(config());
    let stop = StopSignal::new();
    let trigger = stop.clone();
    let mut ticks = 0;
    let mut pacer = |delay: Duration| {
        ticks += 1;
        // Raise the signal in the middle of the third move.
        if ticks == 30 {
            trigger.request();
        }
        delay.as_secs_f32()
    };
    let done = app.perform_continuous(stop, &mut pacer).unwrap();

    assert!(done >= 1);
    assert_eq!(done, app.history().len());
    assert!(app.animator().is_idle());
    let seq = app.world().resource::<MoveSequencer>();
    assert_eq!(seq.mode, SequenceMode::Idle);
    assert_eq!(seq.issued(), done);
}

#[test]
fn counted_run_ignores_an_earlier_stop() {
    let mut app = CubeApp::new(config());
    let stop = StopSignal::new();
    stop.request();
    assert_eq!(app.perform_continuous(stop.clone(), &mut FixedPacer).unwrap(), 0);

    assert_eq!(app.perform_n_random_moves(5, &mut FixedPacer).unwrap(), 5);
    assert_eq!(app.history().len(), 5);
    // The caller's signal is left as they raised it.
    assert!(stop.is_requested());
}

#[test]
fn resolution_fault_stops_the_sequence() {
    let mut app = CubeApp::new(config());
    // Knock a body off the grid so every face containing it fails to resolve.
    app.world_mut()
        .resource_mut::<BodyRegistry>()
        .set_position(&BodyId::new("Center_U"), magicube::geometry::Point::new(0.0, 12.0, 0.0))
        .unwrap();

    let err = app.perform_n_random_moves(50, &mut FixedPacer).unwrap_err();
    assert!(matches!(err, CubeError::FaceResolutionFault { .. }));
    assert!(app.history().len() < 50);
    assert!(!app.world().resource::<MoveSequencer>().is_running());
}

#[test]
fn broken_face_table_is_reported() {
    let mut app = CubeApp::new(config());
    app.world_mut().insert_resource(FaceTable::empty(25.0));
    let err = app
        .animate_face(RotationMove::new(Face::B, Direction::Negative), &mut FixedPacer)
        .unwrap_err();
    assert!(matches!(err, CubeError::InvalidAxis(_)));
    assert!(app.world().resource::<MoveHistory>().is_empty());
}

#[test]
fn telescoping_legs_extend_over_moves() {
    let mut config = config();
    config.leg.telescoping = true;
    config.move_pause_ms = 0;
    let mut app = CubeApp::new(config.clone());
    app.perform_n_random_moves(30, &mut FixedPacer).unwrap();

    let mut moved = 0;
    for body in app.registry().iter().filter(|b| b.kind == BodyKind::LegInner) {
        let t = body.telescope.unwrap();
        assert!(t.extension >= -1e-9 && t.extension <= config.leg.travel + 1e-9);
        if t.extension > 0.0 {
            moved += 1;
        }
    }
    assert!(moved > 0);

    // Legs keep resolving with their corners.
    for face in Face::ALL {
        let group = magicube::resolver::resolve(
            face,
            app.registry(),
            &config.face_table(),
            config.slice_tolerance,
        )
        .unwrap();
        assert_eq!(group.legs.len(), 8);
    }
}

#[test]
fn single_face_turn_telescopes_its_legs() {
    let mut config = config();
    config.leg.telescoping = true;
    let mut app = CubeApp::new(config);
    app.animate_face(RotationMove::new(Face::U, Direction::Positive), &mut FixedPacer)
        .unwrap();

    let extended: Vec<&str> = app
        .registry()
        .iter()
        .filter(|b| b.telescope.is_some_and(|t| t.extension > 0.0))
        .map(|b| b.id.as_str())
        .collect();
    assert_eq!(extended.len(), 4);
    assert!(extended.iter().all(|id| id.starts_with("InnerLeg_") && id.contains('U')));
}

#[test]
fn shutdown_releases_every_body() {
    let mut app = CubeApp::new(config());
    app.attach_host(Vec::new());
    app.perform_n_random_moves(2, &mut FixedPacer).unwrap();
    app.shutdown();

    assert!(app.registry().is_empty());
    assert_eq!(app.history().len(), 2);
}

#[test]
fn seeded_runs_repeat() {
    let mut a = CubeApp::new(config());
    let mut b = CubeApp::new(config());
    a.perform_n_random_moves(12, &mut FixedPacer).unwrap();
    b.perform_n_random_moves(12, &mut FixedPacer).unwrap();
    assert_eq!(a.history().notation(), b.history().notation());
    assert_eq!(a.registry().positions(), b.registry().positions());
}
