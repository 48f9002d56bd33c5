//! Embedded asset access.
//! Level grids are compiled into the binary with include_str!, so a built
//! binary never depends on files next to it.

use std::borrow::Cow;

use crate::error::{AssetError, GameResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Asset {
    /// A level grid, numbered from 1.
    Level(u32),
}

pub fn get_asset_str(asset: Asset) -> GameResult<Cow<'static, str>> {
    match asset {
        Asset::Level(1) => Ok(Cow::Borrowed(include_str!("../assets/levels/level_1.csv"))),
        Asset::Level(2) => Ok(Cow::Borrowed(include_str!("../assets/levels/level_2.csv"))),
        Asset::Level(3) => Ok(Cow::Borrowed(include_str!("../assets/levels/level_3.csv"))),
        Asset::Level(n) => Err(AssetError::NotFound(format!("level_{n}.csv")).into()),
    }
}

#[cfg(test)]
mod tests {
    use speculoos::prelude::*;

    use super::*;
    use crate::constants::LEVEL_COUNT;

    #[test]
    fn every_shipped_level_resolves() {
        for number in 1..=LEVEL_COUNT {
            let text = get_asset_str(Asset::Level(number));
            assert_that(&text.is_ok()).is_true();
        }
    }

    #[test]
    fn unknown_level_is_an_error() {
        assert_that(&get_asset_str(Asset::Level(0)).is_err()).is_true();
        assert_that(&get_asset_str(Asset::Level(LEVEL_COUNT + 1)).is_err()).is_true();
    }
}
