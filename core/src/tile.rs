use serde::{Deserialize, Serialize};

/// Player-visible state of a single cell, as handed to the presentation layer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellDisplay {
    Hidden,
    Revealed(u8),
    Mine,
    Flagged,
}

impl Default for CellDisplay {
    fn default() -> Self {
        Self::Hidden
    }
}
