use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Too many mines")]
    TooManyMines,
    #[error("Cell values do not match the mine layout")]
    InvalidBoard,
    #[error("Unknown difficulty, expected one of: beginner, intermediate, expert")]
    UnknownDifficulty,
}

pub type Result<T> = core::result::Result<T, GameError>;
