#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative sort-session state for PathX.
//!
//! A [`Session`] owns the immutable [`Level`], the snake layout the tiles
//! occupy, the live tile sequence, and the reference transaction order
//! generated at construction. Adapters submit [`Command`] values through
//! [`apply`], the session mutates its state deterministically, and systems
//! observe the resulting [`Event`] stream. Read access goes through the
//! [`query`] module.

use std::time::Duration;

use pathx_core::{AlgorithmKind, Command, Event, GridCell, SessionOutcome, SortTransaction, TileId};
use pathx_level::{Level, LevelIntegrityError};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

/// The snake of grid cells the sortable tiles occupy.
///
/// Cells are stored in snake order: the tile at sequence position `i` sits
/// on `cells[i]`. Layouts are normalised so the minimum column and row are
/// zero, and every cell must fit the declared grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SnakeLayout {
    algorithm: AlgorithmKind,
    columns: u32,
    rows: u32,
    cells: Vec<GridCell>,
}

impl SnakeLayout {
    /// Creates a layout from raw cells, normalising it to the origin.
    ///
    /// The minimum column and row across all cells are subtracted from every
    /// cell, so a snake loaded from anywhere sits against the origin.
    /// Duplicated cells and cells that fall outside the declared grid after
    /// normalisation are rejected.
    pub fn new(
        algorithm: AlgorithmKind,
        columns: u32,
        rows: u32,
        raw_cells: Vec<GridCell>,
    ) -> Result<Self, SnakeLayoutError> {
        if raw_cells.is_empty() {
            return Err(SnakeLayoutError::Empty);
        }

        let min_column = raw_cells.iter().map(GridCell::column).min().unwrap_or(0);
        let min_row = raw_cells.iter().map(GridCell::row).min().unwrap_or(0);
        let cells: Vec<GridCell> = raw_cells
            .iter()
            .map(|cell| GridCell::new(cell.column() - min_column, cell.row() - min_row))
            .collect();

        for (index, cell) in cells.iter().enumerate() {
            if cell.column() >= columns || cell.row() >= rows {
                return Err(SnakeLayoutError::CellOutOfBounds {
                    index,
                    cell: *cell,
                    columns,
                    rows,
                });
            }
            if cells[..index].contains(cell) {
                return Err(SnakeLayoutError::DuplicateCell {
                    index,
                    cell: *cell,
                });
            }
        }

        Ok(Self {
            algorithm,
            columns,
            rows,
            cells,
        })
    }

    /// Algorithm the layout's level is played against.
    #[must_use]
    pub const fn algorithm(&self) -> AlgorithmKind {
        self.algorithm
    }

    /// Number of columns in the snake grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows in the snake grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Cells composing the snake, in snake order.
    #[must_use]
    pub fn cells(&self) -> &[GridCell] {
        &self.cells
    }

    /// Number of tiles the snake holds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Reports whether the snake holds no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Violations detectable while assembling a snake layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum SnakeLayoutError {
    /// The layout contained no cells.
    #[error("snake layout holds no cells")]
    Empty,
    /// A normalised cell fell outside the declared grid.
    #[error("snake cell {index} at {cell:?} exceeds the {columns}x{rows} grid")]
    CellOutOfBounds {
        /// Snake index of the offending cell.
        index: usize,
        /// The normalised cell.
        cell: GridCell,
        /// Declared column count.
        columns: u32,
        /// Declared row count.
        rows: u32,
    },
    /// Two snake positions share the same grid cell.
    #[error("snake cell {index} at {cell:?} duplicates an earlier cell")]
    DuplicateCell {
        /// Snake index of the second occurrence.
        index: usize,
        /// The duplicated cell.
        cell: GridCell,
    },
}

/// Errors that prevent a session from being constructed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The level failed cross-reference validation.
    #[error("level failed validation: {0}")]
    InvalidLevel(#[from] LevelIntegrityError),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Tile {
    id: TileId,
    cell: GridCell,
}

/// Authoritative state of one tile-sorting play session.
#[derive(Debug)]
pub struct Session {
    level: Level,
    snake: SnakeLayout,
    tiles: Vec<Tile>,
    proper_transactions: Vec<SortTransaction>,
    transaction_counter: usize,
    mistakes: u32,
    elapsed: Duration,
    complete: bool,
}

impl Session {
    /// Starts a session on the provided level and snake layout.
    ///
    /// Tiles receive ids `0..n` in snake order, are shuffled with a ChaCha8
    /// generator seeded from `seed`, and placed onto the snake cells in
    /// shuffled order. The reference transaction order is generated from
    /// that shuffled sequence with the layout's algorithm. Reshuffles until
    /// the starting order is unsorted so a session never begins won.
    pub fn new(level: Level, snake: SnakeLayout, seed: u64) -> Result<Self, SessionError> {
        level.validate()?;

        let mut ids: Vec<TileId> = (0..snake.len() as u32).map(TileId::new).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        if ids.len() > 1 {
            loop {
                ids.shuffle(&mut rng);
                if !ids.windows(2).all(|pair| pair[0] <= pair[1]) {
                    break;
                }
            }
        }

        let proper_transactions = pathx_system_sorting::generate(snake.algorithm(), &ids);
        let tiles = ids
            .iter()
            .zip(snake.cells())
            .map(|(id, cell)| Tile {
                id: *id,
                cell: *cell,
            })
            .collect();
        let complete = proper_transactions.is_empty();

        Ok(Self {
            level,
            snake,
            tiles,
            proper_transactions,
            transaction_counter: 0,
            mistakes: 0,
            elapsed: Duration::ZERO,
            complete,
        })
    }

    fn swap_tiles(&mut self, first: usize, second: usize) {
        let first_cell = self.tiles[first].cell;
        let second_cell = self.tiles[second].cell;
        self.tiles.swap(first, second);
        self.tiles[first].cell = first_cell;
        self.tiles[second].cell = second_cell;
    }
}

/// Applies the provided command to the session, mutating state
/// deterministically.
pub fn apply(session: &mut Session, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => {
            if !session.complete {
                session.elapsed = session.elapsed.saturating_add(dt);
            }
            out_events.push(Event::TimeAdvanced { dt });
        }
        Command::RequestSwap { first, second } => {
            if session.complete || first >= session.tiles.len() || second >= session.tiles.len() {
                return;
            }

            let candidate = SortTransaction::new(first, second);
            let expected = session.proper_transactions[session.transaction_counter];
            if candidate == expected {
                session.swap_tiles(first, second);
                session.transaction_counter += 1;
                out_events.push(Event::SwapApplied {
                    first,
                    second,
                    progress: session.transaction_counter,
                });

                if session.transaction_counter == session.proper_transactions.len() {
                    session.complete = true;
                    out_events.push(Event::SortCompleted {
                        outcome: SessionOutcome {
                            mistakes: session.mistakes,
                            elapsed: session.elapsed,
                        },
                    });
                }
            } else {
                session.mistakes += 1;
                out_events.push(Event::SwapRejected {
                    first,
                    second,
                    mistakes: session.mistakes,
                });
            }
        }
        Command::UndoSwap => {
            if session.complete || session.transaction_counter == 0 {
                return;
            }

            session.transaction_counter -= 1;
            let undone = session.proper_transactions[session.transaction_counter];
            session.swap_tiles(undone.from_index(), undone.to_index());
            out_events.push(Event::SwapUndone {
                first: undone.from_index(),
                second: undone.to_index(),
                progress: session.transaction_counter,
            });
        }
    }
}

/// Query functions that provide read-only access to the session state.
pub mod query {
    use std::time::Duration;

    use pathx_core::{GridCell, SortTransaction, TileId};
    use pathx_level::Level;

    use super::{Session, SnakeLayout};

    /// Immutable representation of a single tile's state used for queries.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct TileSnapshot {
        /// Stable sort key of the tile.
        pub id: TileId,
        /// Snake position the tile currently occupies.
        pub snake_index: usize,
        /// Grid cell the tile currently occupies.
        pub cell: GridCell,
    }

    /// Read-only snapshot describing all tiles, ordered by snake position.
    #[must_use]
    pub fn tile_view(session: &Session) -> Vec<TileSnapshot> {
        session
            .tiles
            .iter()
            .enumerate()
            .map(|(snake_index, tile)| TileSnapshot {
                id: tile.id,
                snake_index,
                cell: tile.cell,
            })
            .collect()
    }

    /// Provides read-only access to the level the session was staged on.
    #[must_use]
    pub fn level(session: &Session) -> &Level {
        &session.level
    }

    /// Provides read-only access to the snake layout.
    #[must_use]
    pub fn snake(session: &Session) -> &SnakeLayout {
        &session.snake
    }

    /// The full reference transaction order for the session.
    #[must_use]
    pub fn transactions(session: &Session) -> &[SortTransaction] {
        &session.proper_transactions
    }

    /// Number of reference transactions applied so far.
    #[must_use]
    pub fn progress(session: &Session) -> usize {
        session.transaction_counter
    }

    /// Number of rejected swaps accumulated so far.
    #[must_use]
    pub fn mistakes(session: &Session) -> u32 {
        session.mistakes
    }

    /// Simulated time accumulated while the session was running.
    #[must_use]
    pub fn elapsed(session: &Session) -> Duration {
        session.elapsed
    }

    /// Reports whether every reference transaction has been applied.
    #[must_use]
    pub fn is_complete(session: &Session) -> bool {
        session.complete
    }

    /// Finds the tile occupying the provided grid cell, if any.
    #[must_use]
    pub fn tile_at_cell(session: &Session, cell: GridCell) -> Option<TileSnapshot> {
        tile_view(session)
            .into_iter()
            .find(|snapshot| snapshot.cell == cell)
    }
}
