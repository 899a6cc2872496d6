//! Inner-leg telescoping plans.
//!
//! Before a face turn, every inner leg segment in the turning group gets a
//! movement for this turn. A leg that has (nearly) reached its target picks
//! the opposite end of its travel as the new target and a fresh random speed;
//! it then moves at most `speed` millimetres per turn towards the target.
//!
//! [`telescope_turn`] is the single entry point used by everything that
//! starts a turn.

use crate::animator::FaceTurn;
use crate::error::Result;
use crate::resources::bodyregistry::{BodyId, BodyRegistry, Telescope};
use crate::resources::cubeconfig::{CubeConfig, LegSettings};
use fastrand::Rng;

/// Within this distance a leg counts as having reached its target.
const TARGET_REACHED: f64 = 2.0;
/// Movements shorter than this are not animated.
const MIN_MOVEMENT: f64 = 0.1;

/// Update `telescope` for one turn and return the signed extension change.
pub fn plan_turn(telescope: &mut Telescope, leg: &LegSettings, rng: &mut Rng) -> f64 {
    if (telescope.extension - telescope.target).abs() < TARGET_REACHED {
        telescope.target = if telescope.extension < leg.travel / 2.0 {
            leg.travel
        } else {
            0.0
        };
        telescope.speed = leg.speed_min + (leg.speed_max - leg.speed_min) * rng.f64();
    }

    let remaining = telescope.target - telescope.extension;
    let movement = telescope.speed.min(remaining.abs()).max(0.0) * remaining.signum();
    if movement.abs() > MIN_MOVEMENT {
        movement
    } else {
        0.0
    }
}

/// Plan the movement of each inner leg in `legs`, storing the new targets
/// and speeds in the registry. Legs that do not move are left out.
pub fn plan_extensions(
    registry: &mut BodyRegistry,
    legs: &[BodyId],
    leg: &LegSettings,
    rng: &mut Rng,
) -> Result<Vec<(BodyId, f64)>> {
    let mut plan = Vec::with_capacity(legs.len());
    for id in legs {
        let Some(mut telescope) = registry.get(id)?.telescope else {
            continue;
        };
        let delta = plan_turn(&mut telescope, leg, rng);
        registry.set_telescope(id, telescope)?;
        if delta != 0.0 {
            plan.push((id.clone(), delta));
        }
    }
    Ok(plan)
}

/// Attach this turn's leg movements to `turn` when telescoping is enabled.
pub fn telescope_turn(
    turn: &mut FaceTurn,
    registry: &mut BodyRegistry,
    config: &CubeConfig,
    rng: &mut Rng,
) -> Result<()> {
    if !(config.legs && config.leg.telescoping) {
        return Ok(());
    }
    let legs = turn.inner_legs(registry);
    let plan = plan_extensions(registry, &legs, &config.leg, rng)?;
    turn.set_extensions(plan);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animator::{Direction, RotationMove};
    use crate::assembly::build_assembly;
    use crate::events::host::NullHost;
    use crate::resources::facetable::Face;

    fn begin_up(registry: &BodyRegistry, config: &CubeConfig) -> FaceTurn {
        FaceTurn::begin(
            RotationMove::new(Face::U, Direction::Positive),
            registry,
            &config.face_table(),
            config.slice_tolerance,
            2,
        )
        .unwrap()
    }

    fn inner_extensions(registry: &BodyRegistry) -> Vec<f64> {
        registry
            .iter()
            .filter_map(|b| b.telescope.map(|t| t.extension))
            .collect()
    }

    #[test]
    fn test_telescope_turn_respects_config() {
        let mut config = CubeConfig::new();
        let mut reg = build_assembly(&config);
        let mut rng = Rng::with_seed(5);

        let mut turn = begin_up(&reg, &config);
        telescope_turn(&mut turn, &mut reg, &config, &mut rng).unwrap();
        while !turn.is_finished() {
            turn.step(&mut reg, &mut NullHost).unwrap();
        }
        assert!(inner_extensions(&reg).iter().all(|&e| e == 0.0));

        config.leg.telescoping = true;
        let mut turn = begin_up(&reg, &config);
        telescope_turn(&mut turn, &mut reg, &config, &mut rng).unwrap();
        while !turn.is_finished() {
            turn.step(&mut reg, &mut NullHost).unwrap();
        }
        assert_eq!(inner_extensions(&reg).iter().filter(|&&e| e > 0.0).count(), 4);
    }

    #[test]
    fn test_retracted_leg_starts_extending() {
        let leg = LegSettings::default();
        let mut t = Telescope::default();
        let mut rng = Rng::with_seed(1);
        let delta = plan_turn(&mut t, &leg, &mut rng);
        assert_eq!(t.target, leg.travel);
        assert!(t.speed >= leg.speed_min && t.speed <= leg.speed_max);
        assert!((delta - t.speed).abs() < 1e-12);
    }

    #[test]
    fn test_movement_is_clamped_to_remaining() {
        let leg = LegSettings::default();
        let mut t = Telescope {
            extension: 25.0,
            target: 30.0,
            speed: 12.0,
        };
        let mut rng = Rng::with_seed(2);
        assert!((plan_turn(&mut t, &leg, &mut rng) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_extended_leg_turns_back() {
        let leg = LegSettings::default();
        let mut t = Telescope {
            extension: 30.0,
            target: 30.0,
            speed: 10.0,
        };
        let mut rng = Rng::with_seed(3);
        let delta = plan_turn(&mut t, &leg, &mut rng);
        assert_eq!(t.target, 0.0);
        assert!(delta < 0.0);
    }

    #[test]
    fn test_tiny_movement_is_skipped() {
        let leg = LegSettings::default();
        let mut t = Telescope {
            extension: 10.0,
            target: 30.0,
            speed: 0.05,
        };
        let mut rng = Rng::with_seed(4);
        assert_eq!(plan_turn(&mut t, &leg, &mut rng), 0.0);
    }
}
