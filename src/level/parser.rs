//! Parsing of comma-separated level grids.

use tracing::warn;

/// A parsed grid of raw tile ids, row-major.
///
/// The grid is always rectangular: short rows are padded with `-1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelGrid {
    cells: Vec<Vec<i32>>,
}

impl LevelGrid {
    pub fn rows(&self) -> usize {
        self.cells.len()
    }

    pub fn columns(&self) -> usize {
        self.cells.first().map_or(0, Vec::len)
    }

    /// Iterates over `(column, row, id)` for every cell.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, i32)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .flat_map(|(row, line)| line.iter().enumerate().map(move |(col, &id)| (col, row, id)))
    }
}

pub struct LevelParser;

impl LevelParser {
    /// Parses comma-separated integers into a rectangular grid.
    ///
    /// Parsing is permissive: blank lines are skipped and unparseable
    /// cells become `-1` (empty), so a hand-edited grid with a stray
    /// character degrades to a hole instead of a failed load.
    pub fn parse(text: &str) -> LevelGrid {
        let mut cells: Vec<Vec<i32>> = Vec::new();

        for (index, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }

            let row: Vec<i32> = line
                .split(',')
                .map(|cell| {
                    cell.trim().parse::<i32>().unwrap_or_else(|_| {
                        warn!(row = index, cell, "unparseable grid cell, treating as empty");
                        -1
                    })
                })
                .collect();
            cells.push(row);
        }

        let width = cells.iter().map(Vec::len).max().unwrap_or(0);
        for row in &mut cells {
            row.resize(width, -1);
        }

        LevelGrid { cells }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use speculoos::prelude::*;

    use super::LevelParser;

    #[test]
    fn parses_a_rectangular_grid() {
        let grid = LevelParser::parse("0,1,2\n3,4,5\n");
        assert_that(&grid.rows()).is_equal_to(2);
        assert_that(&grid.columns()).is_equal_to(3);
        let cells: Vec<(usize, usize, i32)> = grid.iter().collect();
        assert_eq!(
            cells,
            vec![(0, 0, 0), (1, 0, 1), (2, 0, 2), (0, 1, 3), (1, 1, 4), (2, 1, 5)]
        );
    }

    #[test]
    fn pads_short_rows_with_empty() {
        let grid = LevelParser::parse("0,1,2\n3\n");
        assert_that(&grid.columns()).is_equal_to(3);
        let last_row: Vec<i32> = grid.iter().filter(|&(_, row, _)| row == 1).map(|(_, _, id)| id).collect();
        assert_eq!(last_row, vec![3, -1, -1]);
    }

    #[test]
    fn tolerates_garbage_cells_and_whitespace() {
        let grid = LevelParser::parse(" 0 , oops ,2\n\n 15 ,16, -1 \n");
        assert_that(&grid.rows()).is_equal_to(2);
        let cells: Vec<i32> = grid.iter().map(|(_, _, id)| id).collect();
        assert_eq!(cells, vec![0, -1, 2, 15, 16, -1]);
    }

    #[test]
    fn empty_input_is_an_empty_grid() {
        let grid = LevelParser::parse("");
        assert_that(&grid.rows()).is_equal_to(0);
        assert_that(&grid.columns()).is_equal_to(0);
    }
}
