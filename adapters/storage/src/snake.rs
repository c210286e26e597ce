//! Codec for the snake layout format.
//!
//! A snake file stages the tile-sorting mini-game for a level: the
//! algorithm the player is measured against, the grid dimensions, and the
//! ordered run of cells the tiles occupy. Layout order: algorithm name,
//! grid columns, grid rows, snake length, then one column/row pair per
//! cell. Decoded layouts are normalised to the origin by
//! [`SnakeLayout::new`], which also enforces the declared grid bounds.

use pathx_core::GridCell;
use pathx_world::SnakeLayout;

use crate::bytes::{ByteReader, ByteWriter};
use crate::CodecError;

/// Encoded size of one snake cell: column and row.
const CELL_BYTES: usize = 4 + 4;

/// Serializes a snake layout.
pub fn encode_snake(layout: &SnakeLayout) -> Result<Vec<u8>, CodecError> {
    let mut writer = ByteWriter::new();
    writer.write_string(layout.algorithm().as_str(), "algorithm name")?;
    writer.write_count(layout.columns() as usize, "grid columns")?;
    writer.write_count(layout.rows() as usize, "grid rows")?;
    writer.write_count(layout.len(), "snake length")?;
    for cell in layout.cells() {
        writer.write_count(cell.column() as usize, "snake cell column")?;
        writer.write_count(cell.row() as usize, "snake cell row")?;
    }
    Ok(writer.into_bytes())
}

/// Deserializes a snake layout, normalising it to the origin.
pub fn decode_snake(bytes: &[u8]) -> Result<SnakeLayout, CodecError> {
    let mut reader = ByteReader::new(bytes);

    let algorithm = reader
        .read_string()?
        .parse()
        .map_err(CodecError::UnknownAlgorithm)?;
    let columns = read_dimension(&mut reader, "grid columns")?;
    let rows = read_dimension(&mut reader, "grid rows")?;

    let length = reader.read_count("snake length")?;
    // Cap the preallocation by what the input can actually hold; a hostile
    // length must fail as a truncated read, not as a giant allocation.
    let mut cells = Vec::with_capacity(length.min(reader.remaining() / CELL_BYTES));
    for _ in 0..length {
        let column = read_dimension(&mut reader, "snake cell column")?;
        let row = read_dimension(&mut reader, "snake cell row")?;
        cells.push(GridCell::new(column, row));
    }

    reader.finish()?;

    SnakeLayout::new(algorithm, columns, rows, cells).map_err(CodecError::from)
}

fn read_dimension(reader: &mut ByteReader<'_>, what: &'static str) -> Result<u32, CodecError> {
    let value = reader.read_i32()?;
    u32::try_from(value).map_err(|_| CodecError::NegativeCount { what, value })
}
