//! Animator state for the ECS world.
//!
//! At most one [`FaceTurn`] is in flight. The sequencer starts turns only
//! while the animator is idle and the step system advances the current one,
//! so every registry write during a turn comes from that turn.

use crate::animator::FaceTurn;
use bevy_ecs::prelude::Resource;
use log::warn;

#[derive(Debug, Default)]
pub enum AnimatorState {
    #[default]
    Idle,
    Stepping(FaceTurn),
}

#[derive(Resource, Debug, Default)]
pub struct Animator {
    pub state: AnimatorState,
    /// Seconds accumulated towards the next step.
    pub since_step: f32,
}

impl Animator {
    pub fn is_idle(&self) -> bool {
        matches!(self.state, AnimatorState::Idle)
    }

    pub fn current(&self) -> Option<&FaceTurn> {
        match &self.state {
            AnimatorState::Stepping(turn) => Some(turn),
            AnimatorState::Idle => None,
        }
    }

    /// Begin animating `turn`. Refused while another turn is in flight.
    pub fn start(&mut self, turn: FaceTurn) -> bool {
        if !self.is_idle() {
            warn!(
                "Turn {} refused, another turn is still running",
                turn.rotation_move()
            );
            return false;
        }
        self.state = AnimatorState::Stepping(turn);
        self.since_step = 0.0;
        true
    }

    /// Drop the current turn, if any, and go back to idle.
    pub fn finish(&mut self) -> Option<FaceTurn> {
        self.since_step = 0.0;
        match std::mem::take(&mut self.state) {
            AnimatorState::Stepping(turn) => Some(turn),
            AnimatorState::Idle => None,
        }
    }
}
