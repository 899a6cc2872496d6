//! Systems run once per tick, in this order:
//!
//! - [`host::update_bevy_host_cmds`] – advance the host command queue
//! - [`sequencer`] – start the next random move when the animator is idle
//! - [`animator`] – step the in-flight face turn
//! - [`host::forward_host_cmds`] – hand host commands to the writer thread
//!
//! [`time::update_world_time`] runs before the schedule with the tick delta.

pub mod animator;
pub mod host;
pub mod sequencer;
pub mod time;
