//! Messages and events exchanged between systems.
//!
//! Submodules:
//! - [`host`] – commands for the host application and the [`host::HostSink`] seam
//! - [`turn`] – turn completion/fault notifications and their observers
pub mod host;
pub mod turn;
