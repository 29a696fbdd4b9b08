#![no_std]

extern crate alloc;

use core::fmt;
use core::ops::Index;
use core::str::FromStr;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use engine::*;
pub use error::*;
pub use feedback::*;
pub use generator::*;
pub use tile::*;
pub use timer::*;
pub use types::*;

mod engine;
mod error;
mod feedback;
mod generator;
mod tile;
mod timer;
mod types;

/// Board value marking a mine, every other value is an adjacent-mine count.
pub const MINE: i8 = -1;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// `(rows, cols)`
    pub size: Coord2,
    pub mines: CellCount,
}

impl GameConfig {
    pub const fn new_unchecked(size: Coord2, mines: CellCount) -> Self {
        Self { size, mines }
    }

    /// Rejects an empty board or a mine count the board cannot hold.
    pub fn checked(size: Coord2, mines: CellCount) -> Result<Self> {
        if size.0 == 0 || size.1 == 0 {
            return Err(GameError::InvalidCoords);
        }
        if mines > mult(size.0, size.1) {
            return Err(GameError::TooManyMines);
        }
        Ok(Self::new_unchecked(size, mines))
    }

    pub const fn rows(&self) -> Coord {
        self.size.0
    }

    pub const fn cols(&self) -> Coord {
        self.size.1
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }
}

/// The three board presets offered to the player.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Beginner,
    Intermediate,
    Expert,
}

impl Difficulty {
    pub const ALL: [Self; 3] = [Self::Beginner, Self::Intermediate, Self::Expert];

    pub const fn config(self) -> GameConfig {
        use Difficulty::*;
        match self {
            Beginner => GameConfig::new_unchecked((12, 8), 10),
            Intermediate => GameConfig::new_unchecked((20, 13), 40),
            Expert => GameConfig::new_unchecked((24, 14), 70),
        }
    }

    pub const fn key(self) -> &'static str {
        use Difficulty::*;
        match self {
            Beginner => "beginner",
            Intermediate => "intermediate",
            Expert => "expert",
        }
    }
}

impl FromStr for Difficulty {
    type Err = GameError;

    fn from_str(key: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|difficulty| difficulty.key() == key)
            .ok_or(GameError::UnknownDifficulty)
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Grid of cell values: [`MINE`] or the number of mines among the 8 neighbors.
///
/// Deserialized boards are rebuilt from their mines and must match the stored numbers and count.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BoardData")]
pub struct Board {
    cells: Array2<i8>,
    mine_count: CellCount,
}

impl Board {
    /// A board of the given `(rows, cols)` without any mines.
    pub fn empty(size: Coord2) -> Self {
        Self {
            cells: Array2::default(size.to_nd_index()),
            mine_count: 0,
        }
    }

    /// Places `config.mines` mines with `placer` and fills in the numbers.
    pub fn generate<P: MinePlacer>(config: GameConfig, placer: P) -> Self {
        let mut board = Self::empty(config.size);
        placer.place_mines(&mut board, config.mines);
        board.calculate_numbers();
        board
    }

    /// Builds a board with mines at exactly `mine_coords`, duplicates count once.
    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        let mut board = Self::empty(size);

        for &coords in mine_coords {
            let coords = board.validate_coords(coords)?;
            board.place_mine(coords);
        }

        board.calculate_numbers();
        Ok(board)
    }

    /// Marks `coords` as a mine, returns `false` if it already was one.
    pub(crate) fn place_mine(&mut self, coords: Coord2) -> bool {
        let cell = &mut self.cells[coords.to_nd_index()];
        if *cell == MINE {
            return false;
        }
        *cell = MINE;
        self.mine_count += 1;
        true
    }

    /// Sets every non-mine cell to the count of mines around it.
    pub fn calculate_numbers(&mut self) {
        for coords in iter_coords(self.size()) {
            if self[coords] == MINE {
                continue;
            }
            let count = self.adjacent_mine_count(coords);
            self.cells[coords.to_nd_index()] = count as i8;
        }
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        if self.in_bounds(coords) {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn in_bounds(&self, (row, col): Coord2) -> bool {
        let (rows, cols) = self.size();
        row < rows && col < cols
    }

    pub fn size(&self) -> Coord2 {
        let (rows, cols) = self.cells.dim();
        (
            rows.try_into().unwrap_or(Coord::MAX),
            cols.try_into().unwrap_or(Coord::MAX),
        )
    }

    pub fn total_cells(&self) -> CellCount {
        mult(self.size().0, self.size().1)
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    pub fn contains_mine(&self, coords: Coord2) -> bool {
        self[coords] == MINE
    }

    pub fn adjacent_mine_count(&self, coords: Coord2) -> u8 {
        self.iter_neighbors(coords)
            .filter(|&pos| self[pos] == MINE)
            .count() as u8
    }

    pub fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        self.cells.iter_neighbors(coords)
    }

    pub fn iter_mines(&self) -> impl Iterator<Item = Coord2> + '_ {
        iter_coords(self.size()).filter(|&coords| self[coords] == MINE)
    }
}

#[derive(Deserialize)]
struct BoardData {
    cells: Array2<i8>,
    mine_count: CellCount,
}

impl TryFrom<BoardData> for Board {
    type Error = GameError;

    fn try_from(BoardData { cells, mine_count }: BoardData) -> Result<Self> {
        let (rows, cols) = cells.dim();
        let size = (
            Coord::try_from(rows).map_err(|_| GameError::InvalidCoords)?,
            Coord::try_from(cols).map_err(|_| GameError::InvalidCoords)?,
        );
        GameConfig::checked(size, mine_count)?;

        let mut board = Self::empty(size);
        for coords in iter_coords(size) {
            if cells[coords.to_nd_index()] == MINE {
                board.place_mine(coords);
            }
        }
        board.calculate_numbers();

        if board.mine_count != mine_count || board.cells != cells {
            log::debug!(
                "rejected {}x{} board claiming {} mines, found {}",
                size.0,
                size.1,
                mine_count,
                board.mine_count
            );
            return Err(GameError::InvalidBoard);
        }
        Ok(board)
    }
}

impl Index<Coord2> for Board {
    type Output = i8;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[coords.to_nd_index()]
    }
}
