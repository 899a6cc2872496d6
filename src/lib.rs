//! Magic cube animation core.
//!
//! This crate keeps the live positions of a 3×3×3 cube and animates random
//! face turns on it. Faces are resolved from current positions before every
//! turn; nothing assumes a body is still where it started.
//!
//! - [`resources`] – ECS resources (body registry, face table, config, ...)
//! - [`systems`] – ECS systems run by the tick schedule
//! - [`events`] – host commands and turn lifecycle events
//! - [`app`] – world setup and the tick loop
//! - [`animator`], [`resolver`], [`geometry`] – the pure geometric core

pub mod animator;
pub mod app;
pub mod assembly;
pub mod error;
pub mod events;
pub mod geometry;
pub mod pacer;
pub mod resolver;
pub mod resources;
pub mod systems;
pub mod telescope;
