#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the PathX crates.
//!
//! This crate defines the vocabulary that connects adapters, the
//! authoritative session, and pure systems. Adapters submit [`Command`]
//! values describing desired mutations, the session executes those commands
//! via its `apply` entry point, and then broadcasts [`Event`] values for
//! systems to react to deterministically.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Index of an intersection within a level's intersection arena.
///
/// Roads and the start/destination markers refer to intersections through
/// this index rather than through references, which keeps the on-disk
/// layout trivial and sidesteps cyclic ownership.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IntersectionId(u32);

impl IntersectionId {
    /// Creates a new intersection identifier with the provided index value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric index of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Converts the identifier into a `usize` arena index.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }
}

/// Stable sort key assigned to a tile for the lifetime of a session.
///
/// Tiles are considered sorted when their ids run ascending along the snake.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileId(u32);

impl TileId {
    /// Creates a new tile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single snake-grid cell expressed as column and row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCell {
    column: u32,
    row: u32,
}

impl GridCell {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }
}

/// A single recorded swap produced by a reference sort algorithm.
///
/// Equality is symmetric: swapping `a` with `b` is the same transaction as
/// swapping `b` with `a`. `Hash` agrees with that equality by hashing the
/// ordered pair.
#[derive(Clone, Copy, Debug, Eq, Serialize, Deserialize)]
pub struct SortTransaction {
    from_index: usize,
    to_index: usize,
}

impl SortTransaction {
    /// Creates a new transaction describing a swap of the two indices.
    #[must_use]
    pub const fn new(from_index: usize, to_index: usize) -> Self {
        Self {
            from_index,
            to_index,
        }
    }

    /// Index of the first tile participating in the swap.
    #[must_use]
    pub const fn from_index(&self) -> usize {
        self.from_index
    }

    /// Index of the second tile participating in the swap.
    #[must_use]
    pub const fn to_index(&self) -> usize {
        self.to_index
    }

    fn ordered(&self) -> (usize, usize) {
        if self.from_index <= self.to_index {
            (self.from_index, self.to_index)
        } else {
            (self.to_index, self.from_index)
        }
    }
}

impl PartialEq for SortTransaction {
    fn eq(&self, other: &Self) -> bool {
        self.ordered() == other.ordered()
    }
}

impl Hash for SortTransaction {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.ordered().hash(state);
    }
}

/// Reference sort algorithm variants a level may be played against.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlgorithmKind {
    /// Adjacent-swap bubble sort.
    BubbleSort,
    /// Minimum-selection sort, which logs no-op swaps as well.
    SelectionSort,
}

impl AlgorithmKind {
    /// Stable name used by the record codec and the command line.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::BubbleSort => "bubble_sort",
            Self::SelectionSort => "selection_sort",
        }
    }
}

impl fmt::Display for AlgorithmKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error produced when parsing an algorithm name fails.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownAlgorithm(String);

impl UnknownAlgorithm {
    /// The name that failed to parse.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UnknownAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown sort algorithm '{}'", self.0)
    }
}

impl std::error::Error for UnknownAlgorithm {}

impl FromStr for AlgorithmKind {
    type Err = UnknownAlgorithm;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "bubble_sort" => Ok(Self::BubbleSort),
            "selection_sort" => Ok(Self::SelectionSort),
            other => Err(UnknownAlgorithm(other.to_owned())),
        }
    }
}

/// Commands that express all permissible session mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Advances the session clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests a swap of the tiles at the two snake positions.
    RequestSwap {
        /// Snake index of the first tile.
        first: usize,
        /// Snake index of the second tile.
        second: usize,
    },
    /// Requests that the most recent applied swap be undone.
    UndoSwap,
}

/// Events broadcast by the session after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Indicates that the session clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that a requested swap matched the reference transaction.
    SwapApplied {
        /// Snake index of the first tile that moved.
        first: usize,
        /// Snake index of the second tile that moved.
        second: usize,
        /// Number of reference transactions applied so far.
        progress: usize,
    },
    /// Reports that a requested swap did not match the reference transaction.
    ///
    /// A front-end plays its "bad move" cue on this event; the tiles do not
    /// move and the session does not advance.
    SwapRejected {
        /// Snake index of the first tile in the rejected request.
        first: usize,
        /// Snake index of the second tile in the rejected request.
        second: usize,
        /// Total mistakes recorded so far, including this one.
        mistakes: u32,
    },
    /// Confirms that the most recent applied swap was stepped back.
    SwapUndone {
        /// Snake index of the first tile that moved back.
        first: usize,
        /// Snake index of the second tile that moved back.
        second: usize,
        /// Number of reference transactions still applied after the undo.
        progress: usize,
    },
    /// Announces that every reference transaction has been applied.
    SortCompleted {
        /// Summary of the finished session.
        outcome: SessionOutcome,
    },
}

/// Summary published when a session completes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionOutcome {
    /// Number of rejected swaps accumulated over the session.
    pub mistakes: u32,
    /// Simulated time that elapsed before completion.
    pub elapsed: Duration,
}

impl SessionOutcome {
    /// Reports whether the session finished without a single mistake.
    #[must_use]
    pub const fn is_perfect(&self) -> bool {
        self.mistakes == 0
    }
}
