//! The collision world built from a parsed grid.

use bevy_ecs::resource::Resource;
use glam::Vec2;
use smallvec::SmallVec;

use crate::constants::{TILE_SIZE, TileKind};
use crate::error::LevelError;
use crate::geometry::Rect;
use crate::level::parser::LevelGrid;

/// A placed tile: its raw grid id (for display) and its world rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tile {
    pub id: i32,
    pub rect: Rect,
}

/// All tiles of the active level, in world coordinates.
///
/// Scrolling shifts every rectangle in here, so collision queries and
/// display positions always agree without a separate camera transform.
#[derive(Resource, Debug, Clone)]
pub struct TileWorld {
    obstacles: Vec<Tile>,
    decorations: Vec<Tile>,
    player_spawn: Option<Vec2>,
    enemy_spawns: Vec<Vec2>,
    length: f32,
}

impl TileWorld {
    /// Builds the world from a grid. Cell `(col, row)` covers the square
    /// starting at `(col * TILE_SIZE, row * TILE_SIZE)`.
    pub fn from_grid(grid: &LevelGrid) -> Result<Self, LevelError> {
        if grid.rows() == 0 || grid.columns() == 0 {
            return Err(LevelError::EmptyGrid);
        }

        let mut obstacles = Vec::new();
        let mut decorations = Vec::new();
        let mut player_spawn = None;
        let mut enemy_spawns = Vec::new();

        let tile_size = Vec2::splat(TILE_SIZE as f32);
        for (col, row, id) in grid.iter() {
            let pos = Vec2::new((col as u32 * TILE_SIZE) as f32, (row as u32 * TILE_SIZE) as f32);
            match TileKind::from_id(id) {
                TileKind::Obstacle => obstacles.push(Tile {
                    id,
                    rect: Rect::new(pos, tile_size),
                }),
                TileKind::Decoration => decorations.push(Tile {
                    id,
                    rect: Rect::new(pos, tile_size),
                }),
                // If a grid carries several player markers, the last one wins.
                TileKind::PlayerSpawn => player_spawn = Some(pos),
                TileKind::EnemySpawn => enemy_spawns.push(pos),
                // Inert ids (water, items, exit) are recognized but dropped.
                TileKind::Inert | TileKind::Empty => {}
            }
        }

        Ok(Self {
            obstacles,
            decorations,
            player_spawn,
            enemy_spawns,
            length: (grid.columns() as u32 * TILE_SIZE) as f32,
        })
    }

    /// Every solid rectangle overlapping `body`.
    ///
    /// A body moving at most one tile per tick touches at most a handful of
    /// tiles, so results stay inline.
    pub fn collisions(&self, body: &Rect) -> SmallVec<[Rect; 8]> {
        self.obstacles
            .iter()
            .filter(|tile| tile.rect.intersects(body))
            .map(|tile| tile.rect)
            .collect()
    }

    /// True when a solid tile covers `point`. Used by the ledge probe.
    pub fn solid_at(&self, point: Vec2) -> bool {
        self.obstacles.iter().any(|tile| tile.rect.contains(point))
    }

    /// Moves every tile and spawn point horizontally by `delta`.
    pub fn shift(&mut self, delta: f32) {
        for tile in self.obstacles.iter_mut().chain(self.decorations.iter_mut()) {
            tile.rect.pos.x += delta;
        }
        if let Some(spawn) = self.player_spawn.as_mut() {
            spawn.x += delta;
        }
        for spawn in self.enemy_spawns.iter_mut() {
            spawn.x += delta;
        }
    }

    pub fn obstacles(&self) -> &[Tile] {
        &self.obstacles
    }

    pub fn decorations(&self) -> &[Tile] {
        &self.decorations
    }

    pub fn player_spawn(&self) -> Option<Vec2> {
        self.player_spawn
    }

    pub fn enemy_spawns(&self) -> &[Vec2] {
        &self.enemy_spawns
    }

    /// Total pixel length of the level. Unaffected by scrolling.
    pub fn length(&self) -> f32 {
        self.length
    }
}
