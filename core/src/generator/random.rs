use super::*;

/// Uniform placement: draw a random cell and retry whenever it already holds a mine.
///
/// There is no first-move protection, the very first reveal may hit a mine.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomMinePlacer {
    seed: u64,
}

impl RandomMinePlacer {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl MinePlacer for RandomMinePlacer {
    fn place_mines(self, board: &mut Board, mines: CellCount) {
        use rand::prelude::*;

        let (rows, cols) = board.size();
        let total_cells = board.total_cells();

        // rejection sampling never finishes on a full board
        if mines >= total_cells {
            if mines > total_cells {
                log::warn!(
                    "Board already full, generated anyway, requested {} but only fits {}",
                    mines,
                    total_cells
                );
            }
            for coords in iter_coords((rows, cols)) {
                board.place_mine(coords);
            }
            return;
        }

        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mut mines_placed: CellCount = 0;
        let mut collisions: u32 = 0;
        while mines_placed < mines {
            let coords = (rng.random_range(0..rows), rng.random_range(0..cols));
            if board.place_mine(coords) {
                mines_placed += 1;
            } else {
                collisions += 1;
            }
        }

        log::debug!(
            "Placed {} mines on {}x{} board with seed {}, {} collisions",
            mines_placed,
            rows,
            cols,
            self.seed,
            collisions
        );
    }
}
