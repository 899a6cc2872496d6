//! Random move sequencing.
//!
//! [`move_sequencer_system`] runs before the face turn system. Whenever the
//! animator is idle and a sequence is running, it waits out the pause after
//! the previous move, checks the stop signal, resolves the next random move
//! and hands the resulting turn to the animator. Resolution faults end the
//! sequence before anything is moved.

use crate::animator::FaceTurn;
use crate::resources::animator::Animator;
use crate::resources::bodyregistry::BodyRegistry;
use crate::resources::cubeconfig::CubeConfig;
use crate::resources::facetable::FaceTable;
use crate::resources::sequencer::{MoveSequencer, SequenceMode};
use crate::resources::worldtime::WorldTime;
use crate::telescope::telescope_turn;
use bevy_ecs::prelude::*;
use log::{error, info};

pub fn move_sequencer_system(
    world_time: Res<WorldTime>,
    config: Res<CubeConfig>,
    table: Res<FaceTable>,
    mut sequencer: ResMut<MoveSequencer>,
    mut animator: ResMut<Animator>,
    mut registry: ResMut<BodyRegistry>,
) {
    if !animator.is_idle() {
        return;
    }
    match sequencer.mode {
        SequenceMode::Idle => return,
        SequenceMode::Count(0) => {
            info!("Sequence complete: {} moves", sequencer.issued());
            sequencer.halt();
            return;
        }
        SequenceMode::Count(_) | SequenceMode::Continuous => {}
    }
    if sequencer.mode == SequenceMode::Continuous && sequencer.stop.is_requested() {
        info!("Stop requested after {} moves", sequencer.issued());
        sequencer.halt();
        return;
    }

    if sequencer.issued() > 0 {
        sequencer.since_move += world_time.delta;
        if sequencer.since_move < config.move_pause_secs() {
            return;
        }
    }

    let mv = sequencer.next_move();
    let number = sequencer.issued() + 1;
    let mut turn = match FaceTurn::begin(
        mv,
        &registry,
        &table,
        config.slice_tolerance,
        config.step_count,
    ) {
        Ok(turn) => turn,
        Err(e) => {
            error!("Move {number} ({mv}) not started: {e}");
            sequencer.set_fault(e);
            return;
        }
    };

    if let Err(e) = telescope_turn(&mut turn, &mut registry, &config, sequencer.rng_mut()) {
        error!("Move {number} ({mv}) telescoping failed: {e}");
        sequencer.set_fault(e);
        return;
    }

    info!("Move {number}: {mv}");
    animator.start(turn);
    sequencer.note_issued();
}
