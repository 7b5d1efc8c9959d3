//! D8 direction codes used by least-cost-path routing
//!
//! Flow direction encoding (codes are fixed; persisted grids and downstream
//! tools rely on them):
//! ```text
//!   80  10  20
//!   70   0  30
//!   60  50  40
//! ```
//! `0` = unvisited or outlet (no outflow). North is `row - 1`.

use runoff_core::{Error, Result};

/// Code of a cell that has no outward flow edge: seeds, and cells the
/// routing never reached.
pub const UNVISITED: i32 = 0;

/// One of the eight compass directions a cell can drain towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum D8Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl D8Direction {
    /// All directions in code order (N first, clockwise)
    pub const ALL: [D8Direction; 8] = [
        D8Direction::North,
        D8Direction::NorthEast,
        D8Direction::East,
        D8Direction::SouthEast,
        D8Direction::South,
        D8Direction::SouthWest,
        D8Direction::West,
        D8Direction::NorthWest,
    ];

    /// Persisted integer code
    pub fn code(self) -> i32 {
        match self {
            D8Direction::North => 10,
            D8Direction::NorthEast => 20,
            D8Direction::East => 30,
            D8Direction::SouthEast => 40,
            D8Direction::South => 50,
            D8Direction::SouthWest => 60,
            D8Direction::West => 70,
            D8Direction::NorthWest => 80,
        }
    }

    /// Decode a persisted code. `0` and unknown codes yield `None`.
    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.code() == code)
    }

    /// Decode the code stored at `(row, col)`.
    ///
    /// `UNVISITED` maps to `Ok(None)`; any other unknown value is reported as
    /// [`Error::InvalidDirectionCode`].
    pub fn decode_at(code: i32, row: usize, col: usize) -> Result<Option<Self>> {
        if code == UNVISITED {
            return Ok(None);
        }
        Self::from_code(code)
            .map(Some)
            .ok_or(Error::InvalidDirectionCode { row, col, code })
    }

    /// `(row, col)` offset of the neighbor this direction points at
    pub fn offset(self) -> (isize, isize) {
        match self {
            D8Direction::North => (-1, 0),
            D8Direction::NorthEast => (-1, 1),
            D8Direction::East => (0, 1),
            D8Direction::SouthEast => (1, 1),
            D8Direction::South => (1, 0),
            D8Direction::SouthWest => (1, -1),
            D8Direction::West => (0, -1),
            D8Direction::NorthWest => (-1, -1),
        }
    }

    /// The direction pointing the other way
    pub fn opposite(self) -> Self {
        match self {
            D8Direction::North => D8Direction::South,
            D8Direction::NorthEast => D8Direction::SouthWest,
            D8Direction::East => D8Direction::West,
            D8Direction::SouthEast => D8Direction::NorthWest,
            D8Direction::South => D8Direction::North,
            D8Direction::SouthWest => D8Direction::NorthEast,
            D8Direction::West => D8Direction::East,
            D8Direction::NorthWest => D8Direction::SouthEast,
        }
    }
}
