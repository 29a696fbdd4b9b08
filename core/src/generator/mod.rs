use crate::*;
pub use random::*;

mod random;

/// Strategy that decides where the mines of a fresh board go.
pub trait MinePlacer {
    /// Marks exactly `mines` distinct cells of `board` as mines, or every cell when the board
    /// is too small to hold them.
    fn place_mines(self, board: &mut Board, mines: CellCount);
}
