//! Random move sequencer state.
//!
//! The sequencer issues one random move at a time, waits for the animator to
//! finish it, pauses, and then issues the next. It runs either a fixed count
//! of moves or continuously until a [`StopSignal`] is raised. The signal is
//! only looked at between moves, so a turn that has started always finishes.

use crate::animator::RotationMove;
use crate::error::CubeError;
use bevy_ecs::prelude::Resource;
use fastrand::Rng;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Cross-thread stop request for continuous sequences.
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    pub fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SequenceMode {
    #[default]
    Idle,
    /// Moves still to be issued.
    Count(usize),
    Continuous,
}

#[derive(Resource, Debug)]
pub struct MoveSequencer {
    pub mode: SequenceMode,
    pub stop: StopSignal,
    /// Seconds spent idle since the last move finished.
    pub since_move: f32,
    rng: Rng,
    issued: usize,
    fault: Option<CubeError>,
}

impl Default for MoveSequencer {
    fn default() -> Self {
        Self::new(None)
    }
}

impl MoveSequencer {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => Rng::with_seed(seed),
            None => Rng::new(),
        };
        Self {
            mode: SequenceMode::Idle,
            stop: StopSignal::new(),
            since_move: 0.0,
            rng,
            issued: 0,
            fault: None,
        }
    }

    fn reset_run(&mut self) {
        self.issued = 0;
        self.since_move = 0.0;
        self.fault = None;
    }

    /// Issue `count` random moves. A stop raised for an earlier continuous
    /// run does not carry over.
    pub fn start_count(&mut self, count: usize) {
        self.reset_run();
        self.stop = StopSignal::new();
        self.mode = SequenceMode::Count(count);
    }

    /// Issue random moves until `stop` is raised.
    pub fn start_continuous(&mut self, stop: StopSignal) {
        self.reset_run();
        self.stop = stop;
        self.mode = SequenceMode::Continuous;
    }

    pub fn is_running(&self) -> bool {
        self.mode != SequenceMode::Idle
    }

    /// Moves issued in the current run.
    pub fn issued(&self) -> usize {
        self.issued
    }

    pub fn fault(&self) -> Option<&CubeError> {
        self.fault.as_ref()
    }

    /// Record a fault and end the run.
    pub fn set_fault(&mut self, error: CubeError) {
        self.fault = Some(error);
        self.mode = SequenceMode::Idle;
    }

    pub fn clear_fault(&mut self) {
        self.fault = None;
    }

    pub fn halt(&mut self) {
        self.mode = SequenceMode::Idle;
    }

    pub fn rng_mut(&mut self) -> &mut Rng {
        &mut self.rng
    }

    pub fn next_move(&mut self) -> RotationMove {
        RotationMove::random(&mut self.rng)
    }

    /// Count a move that has been handed to the animator.
    pub fn note_issued(&mut self) {
        self.issued += 1;
        self.since_move = 0.0;
        if let SequenceMode::Count(n) = &mut self.mode {
            *n = n.saturating_sub(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_mode_counts_down() {
        let mut seq = MoveSequencer::new(Some(1));
        seq.start_count(2);
        seq.note_issued();
        assert_eq!(seq.mode, SequenceMode::Count(1));
        seq.note_issued();
        assert_eq!(seq.mode, SequenceMode::Count(0));
        assert!(seq.is_running());
        assert_eq!(seq.issued(), 2);
    }

    #[test]
    fn test_seeded_sequences_repeat() {
        let mut a = MoveSequencer::new(Some(42));
        let mut b = MoveSequencer::new(Some(42));
        for _ in 0..20 {
            assert_eq!(a.next_move(), b.next_move());
        }
    }

    #[test]
    fn test_stop_signal_is_shared() {
        let stop = StopSignal::new();
        let mut seq = MoveSequencer::default();
        seq.start_continuous(stop.clone());
        assert!(!seq.stop.is_requested());
        stop.request();
        assert!(seq.stop.is_requested());
    }

    #[test]
    fn test_fault_ends_run() {
        let mut seq = MoveSequencer::default();
        seq.start_count(5);
        seq.set_fault(CubeError::InvalidAxis("q".into()));
        assert!(!seq.is_running());
        assert!(seq.fault().is_some());
        seq.start_count(1);
        assert!(seq.fault().is_none());
    }
}
