use alloc::vec;
use alloc::vec::Vec;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use web_time::Instant;

use crate::*;

/// Valid transitions:
/// - Idle -> InProgress
/// - Idle -> Won
/// - Idle -> Lost
/// - InProgress -> Won
/// - InProgress -> Lost
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    /// Freshly initialized, timer not started
    Idle,
    /// First action taken, timer running
    InProgress,
    Won,
    Lost,
}

impl Status {
    pub const fn is_idle(self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Game has ended and no moves are accepted anymore
    pub const fn is_over(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for Status {
    fn default() -> Self {
        Self::Idle
    }
}

/// What a single engine call changed, so a view can redraw only those cells.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSet {
    cells: Vec<Coord2>,
    status: Option<Status>,
}

impl ChangeSet {
    /// Cells whose revealed or flagged state changed, in the order they changed.
    pub fn cells(&self) -> &[Coord2] {
        &self.cells
    }

    /// The new status, if the call moved the session to another state.
    pub fn status_change(&self) -> Option<Status> {
        self.status
    }

    pub fn contains(&self, coords: Coord2) -> bool {
        self.cells.contains(&coords)
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty() && self.status.is_none()
    }

    pub fn has_update(&self) -> bool {
        !self.is_empty()
    }

    fn push(&mut self, coords: Coord2) {
        self.cells.push(coords);
    }
}

/// One game session: the board, what the player has uncovered and marked, and the clock.
#[derive(Clone, Debug)]
pub struct BoardEngine {
    difficulty: Option<Difficulty>,
    board: Board,
    revealed: Array2<bool>,
    flagged: Array2<bool>,
    revealed_safe: CellCount,
    flagged_count: CellCount,
    status: Status,
    triggered_mine: Option<Coord2>,
    timer: Timer,
}

impl BoardEngine {
    /// Starts a session on a freshly generated board for `difficulty`.
    pub fn new(difficulty: Difficulty, seed: u64) -> Self {
        Self::with_session(
            Some(difficulty),
            generate_board(difficulty, seed),
            SessionId::default(),
        )
    }

    /// Starts a session on a prepared board, e.g. one with mines in known positions.
    pub fn with_board(board: Board) -> Self {
        Self::with_session(None, board, SessionId::default())
    }

    fn with_session(difficulty: Option<Difficulty>, board: Board, session: SessionId) -> Self {
        let size = board.size().to_nd_index();
        Self {
            difficulty,
            board,
            revealed: Array2::default(size),
            flagged: Array2::default(size),
            revealed_safe: 0,
            flagged_count: 0,
            status: Default::default(),
            triggered_mine: None,
            timer: Timer::new(session),
        }
    }

    /// Throws the current session away and starts a new one for `difficulty`.
    pub fn reset(&mut self, difficulty: Difficulty, seed: u64) {
        self.replace(Some(difficulty), generate_board(difficulty, seed));
    }

    /// Throws the current session away and starts a new one on `board`.
    pub fn reset_with_board(&mut self, board: Board) {
        self.replace(None, board);
    }

    fn replace(&mut self, difficulty: Option<Difficulty>, board: Board) {
        let session = self.session_id().next();
        log::info!(
            "new session {} ({}x{}, {} mines)",
            session.get(),
            board.size().0,
            board.size().1,
            board.mine_count()
        );
        *self = Self::with_session(difficulty, board, session);
    }

    /// Preset this session was created from, `None` for prepared boards.
    pub fn difficulty(&self) -> Option<Difficulty> {
        self.difficulty
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn size(&self) -> Coord2 {
        self.board.size()
    }

    /// Mines minus flags, negative when the player over-flags.
    pub fn remaining_mines(&self) -> isize {
        (self.board.mine_count() as isize) - (self.flagged_count as isize)
    }

    pub fn elapsed_secs(&self) -> u32 {
        self.timer.elapsed_secs()
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_over(&self) -> bool {
        self.status.is_over()
    }

    pub fn session_id(&self) -> SessionId {
        self.timer.session()
    }

    pub fn timer_state(&self) -> TimerState {
        self.timer.state()
    }

    /// The mine that ended a lost game.
    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    pub fn is_revealed(&self, coords: Coord2) -> bool {
        self.board.in_bounds(coords) && self.revealed[coords.to_nd_index()]
    }

    pub fn is_flagged(&self, coords: Coord2) -> bool {
        self.board.in_bounds(coords) && self.flagged[coords.to_nd_index()]
    }

    /// What the player sees at `coords`, `None` when out of bounds.
    pub fn cell_display(&self, coords: Coord2) -> Option<CellDisplay> {
        if !self.board.in_bounds(coords) {
            return None;
        }

        let index = coords.to_nd_index();
        Some(if self.flagged[index] {
            CellDisplay::Flagged
        } else if !self.revealed[index] {
            CellDisplay::Hidden
        } else if self.board.contains_mine(coords) {
            CellDisplay::Mine
        } else {
            CellDisplay::Revealed(self.board[coords] as u8)
        })
    }

    /// Applies a timer tick scheduled for `session`, returns whether the elapsed seconds changed.
    pub fn tick(&mut self, session: SessionId) -> bool {
        self.tick_at(session, Instant::now())
    }

    pub fn tick_at(&mut self, session: SessionId, now: Instant) -> bool {
        self.timer.tick(session, now)
    }

    /// Uncovers a cell, flood-filling from cells without adjacent mines.
    ///
    /// Out-of-bounds coordinates, revealed or flagged cells and finished games are left alone and
    /// give an empty change set.
    pub fn reveal(&mut self, coords: Coord2) -> ChangeSet {
        self.reveal_at(coords, Instant::now())
    }

    pub fn reveal_at(&mut self, coords: Coord2, now: Instant) -> ChangeSet {
        let mut changes = ChangeSet::default();

        if self.status.is_over() || self.is_revealed(coords) || self.is_flagged(coords) {
            return changes;
        }
        let Ok(coords) = self.board.validate_coords(coords) else {
            return changes;
        };

        self.mark_started(now, &mut changes);

        if self.board.contains_mine(coords) {
            log::debug!("revealed mine at {:?}", coords);
            self.revealed[coords.to_nd_index()] = true;
            changes.push(coords);
            self.triggered_mine = Some(coords);
            self.end_game(false, now, &mut changes);
            return changes;
        }

        self.flood_reveal(coords, &mut changes);
        self.check_win(now, &mut changes);
        changes
    }

    /// Flips the flag on an unrevealed cell.
    pub fn toggle_flag(&mut self, coords: Coord2) -> ChangeSet {
        self.toggle_flag_at(coords, Instant::now())
    }

    pub fn toggle_flag_at(&mut self, coords: Coord2, now: Instant) -> ChangeSet {
        let mut changes = ChangeSet::default();

        if self.status.is_over() || self.is_revealed(coords) {
            return changes;
        }
        let Ok(coords) = self.board.validate_coords(coords) else {
            return changes;
        };

        self.mark_started(now, &mut changes);

        let flag = &mut self.flagged[coords.to_nd_index()];
        *flag = !*flag;
        if *flag {
            self.flagged_count += 1;
        } else {
            self.flagged_count -= 1;
        }
        log::debug!("flag at {:?} set to {}", coords, self.flagged[coords.to_nd_index()]);
        changes.push(coords);

        self.check_win(now, &mut changes);
        changes
    }

    fn flood_reveal(&mut self, start: Coord2, changes: &mut ChangeSet) {
        let mut to_visit = vec![start];

        while let Some(coords) = to_visit.pop() {
            let index = coords.to_nd_index();
            if self.revealed[index] || self.flagged[index] {
                continue;
            }

            self.revealed[index] = true;
            self.revealed_safe += 1;
            changes.push(coords);

            if self.board[coords] == 0 {
                to_visit.extend(self.board.iter_neighbors(coords).filter(|pos| {
                    let index = pos.to_nd_index();
                    !self.revealed[index] && !self.flagged[index]
                }));
            }
        }

        log::trace!(
            "reveal from {:?} uncovered {} cells",
            start,
            changes.cells().len()
        );
    }

    fn check_win(&mut self, now: Instant, changes: &mut ChangeSet) {
        if self.revealed_safe == self.board.safe_cell_count() {
            self.end_game(true, now, changes);
        }
    }

    fn mark_started(&mut self, now: Instant, changes: &mut ChangeSet) {
        if self.status.is_idle() {
            self.status = Status::InProgress;
            self.timer.start(now);
            changes.status = Some(Status::InProgress);
        }
    }

    /// Finishes the session. A loss uncovers every mine that is not flagged, a win flags every
    /// mine, so the remaining count ends at zero.
    fn end_game(&mut self, won: bool, now: Instant, changes: &mut ChangeSet) {
        if self.status.is_over() {
            return;
        }

        self.status = if won { Status::Won } else { Status::Lost };
        changes.status = Some(self.status);
        self.timer.stop(now);

        let mines: Vec<Coord2> = self.board.iter_mines().collect();
        for coords in mines {
            let index = coords.to_nd_index();
            if self.flagged[index] {
                continue;
            }
            if won {
                self.flagged[index] = true;
                self.flagged_count += 1;
                changes.push(coords);
            } else if !self.revealed[index] {
                self.revealed[index] = true;
                changes.push(coords);
            }
        }

        log::info!(
            "session {} over: {:?} after {}s",
            self.session_id().get(),
            self.status,
            self.timer.elapsed_secs()
        );
    }
}

fn generate_board(difficulty: Difficulty, seed: u64) -> Board {
    Board::generate(difficulty.config(), RandomMinePlacer::new(seed))
}
