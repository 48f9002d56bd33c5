//! Level storage: parsed grids and the worlds built from them.

pub mod parser;
pub mod world;

use bevy_ecs::resource::Resource;

use crate::asset::{Asset, get_asset_str};
use crate::constants::LEVEL_COUNT;
use crate::error::{GameResult, LevelError};
use crate::level::parser::{LevelGrid, LevelParser};
use crate::level::world::TileWorld;

/// The campaign: every level grid, parsed once at startup.
#[derive(Resource, Debug, Clone)]
pub struct Levels {
    grids: Vec<LevelGrid>,
}

impl Levels {
    /// Loads the grids embedded in the binary.
    pub fn shipped() -> GameResult<Self> {
        let mut grids = Vec::with_capacity(LEVEL_COUNT as usize);
        for number in 1..=LEVEL_COUNT {
            let text = get_asset_str(Asset::Level(number))?;
            grids.push(LevelParser::parse(&text));
        }
        Ok(Self { grids })
    }

    /// Builds a campaign from in-memory grids.
    pub fn from_grids(grids: Vec<LevelGrid>) -> Self {
        Self { grids }
    }

    pub fn count(&self) -> u32 {
        self.grids.len() as u32
    }

    /// Builds the world for a level, numbered from 1.
    pub fn build(&self, number: u32) -> GameResult<TileWorld> {
        let grid = number
            .checked_sub(1)
            .and_then(|index| self.grids.get(index as usize))
            .ok_or(LevelError::UnknownLevel(number))?;
        Ok(TileWorld::from_grid(grid)?)
    }
}
