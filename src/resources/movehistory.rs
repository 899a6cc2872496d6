use crate::animator::RotationMove;
use bevy_ecs::prelude::Resource;
use serde::Serialize;

/// Completed moves, oldest first.
#[derive(Resource, Debug, Clone, Default, Serialize)]
pub struct MoveHistory {
    moves: Vec<RotationMove>,
}

impl MoveHistory {
    pub fn push(&mut self, mv: RotationMove) {
        self.moves.push(mv);
    }

    pub fn moves(&self) -> &[RotationMove] {
        &self.moves
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn last(&self) -> Option<RotationMove> {
        self.moves.last().copied()
    }

    /// Space separated notation, e.g. `R U' F`.
    pub fn notation(&self) -> String {
        self.moves
            .iter()
            .map(|m| m.notation())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animator::Direction;
    use crate::resources::facetable::Face;

    #[test]
    fn test_notation() {
        let mut h = MoveHistory::default();
        assert_eq!(h.notation(), "");
        h.push(RotationMove::new(Face::R, Direction::Positive));
        h.push(RotationMove::new(Face::U, Direction::Negative));
        assert_eq!(h.notation(), "R U'");
        assert_eq!(h.len(), 2);
        assert_eq!(h.last(), Some(RotationMove::new(Face::U, Direction::Negative)));
    }
}
