//! Turn lifecycle events and their observers.
//!
//! The face turn system triggers [`TurnCompletedEvent`] once the last step
//! of a turn has been committed, and [`TurnFaultEvent`] when a turn had to
//! be abandoned. Observers here keep [`MoveHistory`] and the
//! [`MoveSequencer`] up to date.

use crate::animator::RotationMove;
use crate::error::CubeError;
use crate::resources::movehistory::MoveHistory;
use crate::resources::sequencer::MoveSequencer;
use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use log::{error, info};

#[derive(Event, Debug, Clone, Copy)]
pub struct TurnCompletedEvent {
    pub mv: RotationMove,
}

#[derive(Event, Debug, Clone)]
pub struct TurnFaultEvent {
    pub mv: RotationMove,
    pub error: CubeError,
}

/// Append completed turns to the history.
pub fn record_turn_observer(trigger: On<TurnCompletedEvent>, mut history: ResMut<MoveHistory>) {
    let mv = trigger.event().mv;
    history.push(mv);
    info!("Turn {} done ({} total)", mv.notation(), history.len());
}

/// Stop the running sequence when a turn fails.
pub fn turn_fault_observer(trigger: On<TurnFaultEvent>, mut sequencer: ResMut<MoveSequencer>) {
    let event = trigger.event();
    error!("Turn {} failed: {}", event.mv, event.error);
    sequencer.set_fault(event.error.clone());
}
