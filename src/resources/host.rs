//! ECS resources that bridge the world with the host writer thread.
//!
//! Use [`setup_host`] once to spawn the thread and insert the [`HostBridge`]
//! and `Messages<HostCmd>` resources. Call [`shutdown_host`] during teardown
//! so buffered output is flushed and the thread is joined.

use crate::events::host::{HostCmd, HostSink};
use crate::systems::host::host_thread;
use bevy_ecs::prelude::*;
use crossbeam_channel::{Sender, unbounded};
use std::io::Write;

/// Shared bridge between the ECS world and the host thread.
#[derive(Resource)]
pub struct HostBridge {
    /// Sender for [`HostCmd`] messages (ECS -> host thread).
    pub tx_cmd: Sender<HostCmd>,
    /// Join handle for the background host thread.
    pub handle: std::thread::JoinHandle<()>,
}

impl HostSink for HostBridge {
    fn send(&mut self, cmd: HostCmd) {
        // The thread only goes away on shutdown.
        let _ = self.tx_cmd.send(cmd);
    }
}

/// Spawn the host thread writing JSON lines to `out`.
pub fn setup_host<W: Write + Send + 'static>(world: &mut World, out: W) {
    let (tx_cmd, rx_cmd) = unbounded::<HostCmd>();

    let handle = std::thread::spawn(move || {
        host_thread(rx_cmd, out);
    });

    world.insert_resource(HostBridge { tx_cmd, handle });
    if !world.contains_resource::<Messages<HostCmd>>() {
        world.insert_resource(Messages::<HostCmd>::default());
    }
}

/// Send [`HostCmd::Shutdown`], wait for the thread, and remove the bridge.
pub fn shutdown_host(world: &mut World) {
    if let Some(bridge) = world.remove_resource::<HostBridge>() {
        let _ = bridge.tx_cmd.send(HostCmd::Shutdown);
        let _ = bridge.handle.join();
    }
}
