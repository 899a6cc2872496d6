//! ECS resources made available to systems.
//!
//! Overview
//! - `animator` – the in-flight face turn, if any
//! - `bodyregistry` – every movable body and its live position
//! - `cubeconfig` – geometry, animation and leg settings, INI backed
//! - `facetable` – face label to rotation axis and slice
//! - `host` – bridge and channel for the host writer thread
//! - `movehistory` – completed moves
//! - `sequencer` – random move sequence state and stop signal
//! - `worldtime` – simulation time and delta
pub mod animator;
pub mod bodyregistry;
pub mod cubeconfig;
pub mod facetable;
pub mod host;
pub mod movehistory;
pub mod sequencer;
pub mod worldtime;
