//! Centralized error types for the simulation.
//!
//! This module defines all error types used throughout the crate,
//! providing a consistent error handling approach.

use bevy_ecs::event::Event;

/// Main error type for the game.
///
/// This is the primary error type that should be used in public APIs.
/// It can represent any error that can occur during a run.
#[derive(thiserror::Error, Debug, Event)]
pub enum GameError {
    #[error("Asset error: {0}")]
    Asset(#[from] AssetError),

    #[error("Level error: {0}")]
    Level(#[from] LevelError),

    #[error("Console error: {0}")]
    Console(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),
}

/// Errors raised while resolving embedded assets.
#[derive(thiserror::Error, Debug)]
pub enum AssetError {
    #[error("Asset not found: {0}")]
    NotFound(String),
}

/// Errors raised while building a level.
#[derive(thiserror::Error, Debug)]
pub enum LevelError {
    #[error("Level {0} does not exist")]
    UnknownLevel(u32),

    #[error("Level grid is empty")]
    EmptyGrid,
}

/// Result type for game operations.
pub type GameResult<T> = Result<T, GameError>;
