#![allow(dead_code)]

use bevy_ecs::component::Component;
use bevy_ecs::query::With;
use glam::Vec2;
use waveshooter::constants::GRID_SIZE;
use waveshooter::events::UpgradeKind;
use waveshooter::game::Game;
use waveshooter::level::Levels;
use waveshooter::level::parser::LevelParser;
use waveshooter::level::world::TileWorld;
use waveshooter::systems::components::{PlayerControlled, Position};
use waveshooter::systems::input::{Buttons, InputState, held};
use waveshooter::systems::state::Mode;

/// Builds a grid: a solid two-row floor at the bottom, a player marker on
/// column 2, everything else empty, then `cells` overrides as
/// `(row, column, id)`. Pass `(13, 2, -1)` to drop the player marker.
pub fn grid_text(columns: usize, cells: &[(usize, usize, i32)]) -> String {
    let rows = GRID_SIZE.y as usize;
    let mut grid = vec![vec![-1; columns]; rows];
    for cell in &mut grid[rows - 2] {
        *cell = 0;
    }
    for cell in &mut grid[rows - 1] {
        *cell = 1;
    }
    grid[rows - 3][2] = 15;
    for &(row, column, id) in cells {
        grid[row][column] = id;
    }

    grid.iter()
        .map(|row| row.iter().map(i32::to_string).collect::<Vec<_>>().join(","))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn world_from(text: &str) -> TileWorld {
    TileWorld::from_grid(&LevelParser::parse(text)).unwrap()
}

/// A game whose campaign is exactly the given grids.
pub fn game_with(texts: &[&str]) -> Game {
    Game::new(Levels::from_grids(texts.iter().map(|text| LevelParser::parse(text)).collect()))
}

/// A one-level game on a plain floor.
pub fn flat_game(columns: usize) -> Game {
    game_with(&[&grid_text(columns, &[])])
}

pub fn mode(game: &Game) -> Mode {
    *game.world.resource::<Mode>()
}

pub fn tick(game: &mut Game, buttons: Buttons) -> bool {
    game.tick(held(buttons))
}

pub fn tick_many(game: &mut Game, ticks: u32, buttons: Buttons) {
    for _ in 0..ticks {
        game.tick(held(buttons));
    }
}

/// Holds `buttons` for one tick, then releases for one tick, so the edge
/// detector sees a clean press.
pub fn press(game: &mut Game, buttons: Buttons) {
    game.tick(held(buttons));
    game.tick(held(Buttons::empty()));
}

/// Confirms out of the menu (or a banner) into a running game.
pub fn start_run(game: &mut Game) {
    press(game, Buttons::CONFIRM);
    assert_eq!(mode(game), Mode::Playing);
}

/// One tick carrying a store purchase request.
pub fn purchase(game: &mut Game, upgrade: UpgradeKind) {
    game.tick(InputState {
        held: Buttons::empty(),
        purchase: Some(upgrade),
    });
}

pub fn player_position(game: &mut Game) -> Vec2 {
    let mut query = game.world.query_filtered::<&Position, With<PlayerControlled>>();
    query.single(&game.world).expect("expected a player").0
}

/// Reads a single component off the player.
pub fn player_component<T: Component + Copy>(game: &mut Game) -> T {
    let mut query = game.world.query_filtered::<&T, With<PlayerControlled>>();
    *query.single(&game.world).expect("expected a player")
}

/// Overwrites a single component on the player.
pub fn set_player_component<T: Component<Mutability = bevy_ecs::component::Mutable>>(game: &mut Game, value: T) {
    let mut query = game.world.query_filtered::<&mut T, With<PlayerControlled>>();
    *query.single_mut(&mut game.world).expect("expected a player") = value;
}

/// Counts entities carrying the marker component.
pub fn count<T: Component>(game: &mut Game) -> usize {
    game.world.query_filtered::<(), With<T>>().iter(&game.world).count()
}
