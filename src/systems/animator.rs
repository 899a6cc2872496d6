//! Face turn stepping.
//!
//! [`face_turn_system`] advances the animator's current turn by as many steps
//! as the elapsed time allows, one step per `step_delay`. Host position
//! updates are written as [`HostCmd`] messages. When the last step lands the
//! turn is dropped and [`TurnCompletedEvent`] is triggered; if a step fails
//! the turn is abandoned and [`TurnFaultEvent`] is triggered instead.
//!
//! Completed turns log the grid cell of every cubelet they moved.

use crate::animator::StepProgress;
use crate::events::host::HostCmd;
use crate::events::turn::{TurnCompletedEvent, TurnFaultEvent};
use crate::geometry::grid_coords;
use crate::resources::animator::{Animator, AnimatorState};
use crate::resources::bodyregistry::BodyRegistry;
use crate::resources::cubeconfig::CubeConfig;
use crate::resources::worldtime::WorldTime;
use bevy_ecs::prelude::*;
use log::debug;

pub fn face_turn_system(
    world_time: Res<WorldTime>,
    config: Res<CubeConfig>,
    mut animator: ResMut<Animator>,
    mut registry: ResMut<BodyRegistry>,
    mut host: MessageWriter<HostCmd>,
    mut commands: Commands,
) {
    let delay = config.step_delay_secs();
    let animator = &mut *animator;
    let AnimatorState::Stepping(turn) = &mut animator.state else {
        return;
    };
    let mv = turn.rotation_move();

    animator.since_step += world_time.delta;
    let mut outcome = Ok(StepProgress::Stepping {
        step: turn.step_index(),
        of: turn.step_count(),
    });
    while animator.since_step >= delay {
        animator.since_step -= delay;
        outcome = turn.step(&mut registry, &mut host);
        match &outcome {
            Ok(StepProgress::Stepping { step, of }) => debug!("{mv}: step {step}/{of}"),
            _ => break,
        }
    }

    match outcome {
        Ok(StepProgress::Finished) => {
            for id in &turn.group().cubelets {
                if let Ok(body) = registry.get(id) {
                    let [x, y, z] = grid_coords(&body.position, config.spacing());
                    debug!("{mv}: {id} now at ({x}, {y}, {z})");
                }
            }
            animator.finish();
            commands.trigger(TurnCompletedEvent { mv });
        }
        Err(error) => {
            animator.finish();
            commands.trigger(TurnFaultEvent { mv, error });
        }
        Ok(StepProgress::Stepping { .. }) => {}
    }
}
