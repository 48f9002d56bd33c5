//! The Entity-Component-System (ECS) module.
//!
//! This module contains all the ECS-related logic, including components, systems,
//! and resources.

pub mod animation;
pub mod collision;
pub mod combat;
pub mod components;
pub mod enemy;
pub mod input;
pub mod physics;
pub mod player;
pub mod profiling;
pub mod projectile;
pub mod scroll;
pub mod snapshot;
pub mod spawn;
pub mod state;
