//! World setup and the tick loop.
//!
//! [`CubeApp`] owns the ECS world and the per-tick schedule. Every public
//! operation is a loop of `pacer.wait` followed by one tick, so a caller can
//! run the cube in real time with [`RealTimePacer`](crate::pacer::RealTimePacer)
//! or as fast as possible with [`FixedPacer`](crate::pacer::FixedPacer).
//!
//! Tick order:
//! 1. [`update_world_time`] with the pacer's delta
//! 2. advance the `HostCmd` queue
//! 3. [`move_sequencer_system`] starts a move if the animator is idle
//! 4. [`face_turn_system`] steps the in-flight turn
//! 5. forward host commands to the writer thread, if one is attached

use crate::animator::{FaceTurn, RotationMove};
use crate::assembly::{announce_assembly, build_assembly};
use crate::error::Result;
use crate::events::host::HostCmd;
use crate::events::turn::{record_turn_observer, turn_fault_observer};
use crate::pacer::Pacer;
use crate::resources::animator::Animator;
use crate::resources::bodyregistry::BodyRegistry;
use crate::resources::cubeconfig::CubeConfig;
use crate::resources::facetable::FaceTable;
use crate::resources::host::{HostBridge, setup_host, shutdown_host};
use crate::resources::movehistory::MoveHistory;
use crate::resources::sequencer::{MoveSequencer, StopSignal};
use crate::resources::worldtime::WorldTime;
use crate::systems::animator::face_turn_system;
use crate::systems::host::{forward_host_cmds, update_bevy_host_cmds};
use crate::systems::sequencer::move_sequencer_system;
use crate::systems::time::update_world_time;
use crate::telescope::telescope_turn;
use bevy_ecs::observer::Observer;
use bevy_ecs::prelude::*;
use log::{info, warn};
use std::io::Write;
use std::time::Duration;

const MIN_TICK: Duration = Duration::from_millis(1);

pub struct CubeApp {
    world: World,
    schedule: Schedule,
}

impl CubeApp {
    /// Build the assembly in its solved state and set up the world.
    pub fn new(config: CubeConfig) -> Self {
        let mut world = World::new();
        world.insert_resource(WorldTime::default());
        world.insert_resource(build_assembly(&config));
        world.insert_resource(config.face_table());
        world.insert_resource(MoveSequencer::new(config.seed));
        world.insert_resource(config);
        world.insert_resource(Animator::default());
        world.insert_resource(MoveHistory::default());
        world.init_resource::<Messages<HostCmd>>();

        world.spawn(Observer::new(record_turn_observer));
        world.spawn(Observer::new(turn_fault_observer));
        world.flush();

        let mut schedule = Schedule::default();
        schedule.add_systems(
            (
                update_bevy_host_cmds,
                move_sequencer_system,
                face_turn_system,
                forward_host_cmds.run_if(resource_exists::<HostBridge>),
            )
                .chain(),
        );

        Self { world, schedule }
    }

    /// Attach a host writer thread and announce every body to it.
    pub fn attach_host<W: Write + Send + 'static>(&mut self, out: W) {
        setup_host(&mut self.world, out);
        self.world
            .resource_scope(|world, mut bridge: Mut<HostBridge>| {
                announce_assembly(world.resource::<BodyRegistry>(), &mut *bridge);
            });
    }

    /// Flush and join the host thread, if attached, then release every body.
    pub fn shutdown(&mut self) {
        shutdown_host(&mut self.world);
        let mut registry = self.world.resource_mut::<BodyRegistry>();
        info!("Releasing {} bodies", registry.len());
        registry.clear();
    }

    /// Advance the world by `dt` seconds.
    pub fn tick(&mut self, dt: f32) {
        update_world_time(&mut self.world, dt);
        self.schedule.run(&mut self.world);
        self.world.clear_trackers();
    }

    /// Animate one face turn to completion.
    pub fn animate_face<P: Pacer + ?Sized>(
        &mut self,
        mv: RotationMove,
        pacer: &mut P,
    ) -> Result<()> {
        if !self.world.resource::<Animator>().is_idle() {
            warn!("Turn {mv} requested while another is running, waiting for it");
            self.run_until_idle(pacer)?;
        }
        let mut turn = {
            let config = self.world.resource::<CubeConfig>();
            FaceTurn::begin(
                mv,
                self.world.resource::<BodyRegistry>(),
                self.world.resource::<FaceTable>(),
                config.slice_tolerance,
                config.step_count,
            )?
        };
        self.world
            .resource_scope(|world, mut sequencer: Mut<MoveSequencer>| {
                world.resource_scope(|world, mut registry: Mut<BodyRegistry>| {
                    telescope_turn(
                        &mut turn,
                        &mut registry,
                        world.resource::<CubeConfig>(),
                        sequencer.rng_mut(),
                    )
                })
            })?;
        info!("Turn {mv}");
        self.world.resource_mut::<Animator>().start(turn);
        self.run_until_idle(pacer)
    }

    /// Perform `count` random moves. Returns the number of moves completed.
    pub fn perform_n_random_moves<P: Pacer + ?Sized>(
        &mut self,
        count: usize,
        pacer: &mut P,
    ) -> Result<usize> {
        info!("Performing {count} random moves");
        self.world
            .resource_mut::<MoveSequencer>()
            .start_count(count);
        self.run_sequence(pacer)
    }

    /// Perform random moves until `stop` is raised. The move in progress when
    /// the signal arrives is finished first. Returns the number completed.
    pub fn perform_continuous<P: Pacer + ?Sized>(
        &mut self,
        stop: StopSignal,
        pacer: &mut P,
    ) -> Result<usize> {
        info!("Performing random moves until stopped");
        self.world
            .resource_mut::<MoveSequencer>()
            .start_continuous(stop);
        self.run_sequence(pacer)
    }

    fn run_sequence<P: Pacer + ?Sized>(&mut self, pacer: &mut P) -> Result<usize> {
        let before = self.history().len();
        // Ticks must carry time or the pause between moves never elapses.
        let delay = self.config().step_delay().max(MIN_TICK);
        loop {
            let dt = pacer.wait(delay);
            self.tick(dt);
            let sequencer = self.world.resource::<MoveSequencer>();
            if let Some(e) = sequencer.fault() {
                return Err(e.clone());
            }
            if !sequencer.is_running() && self.world.resource::<Animator>().is_idle() {
                break;
            }
        }
        let done = self.history().len() - before;
        info!("Sequence finished: {done} moves");
        Ok(done)
    }

    fn run_until_idle<P: Pacer + ?Sized>(&mut self, pacer: &mut P) -> Result<()> {
        let delay = self.config().step_delay();
        self.world.resource_mut::<MoveSequencer>().clear_fault();
        while !self.world.resource::<Animator>().is_idle() {
            let dt = pacer.wait(delay);
            self.tick(dt);
        }
        match self.world.resource::<MoveSequencer>().fault() {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }

    pub fn registry(&self) -> &BodyRegistry {
        self.world.resource::<BodyRegistry>()
    }

    pub fn config(&self) -> &CubeConfig {
        self.world.resource::<CubeConfig>()
    }

    pub fn history(&self) -> &MoveHistory {
        self.world.resource::<MoveHistory>()
    }

    pub fn animator(&self) -> &Animator {
        self.world.resource::<Animator>()
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }
}
