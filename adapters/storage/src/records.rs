//! Codec for the player record format.
//!
//! Layout: level count, then per level the level name, the algorithm name,
//! games played, wins, perfect wins, and the fastest perfect-win time in
//! milliseconds. A missing fastest time is stored as `i64::MAX`, the
//! sentinel the format reserves for a level yet to see a perfect win.

use std::time::Duration;

use pathx_system_records::{LevelRecord, PlayerRecords};

use crate::bytes::{ByteReader, ByteWriter};
use crate::CodecError;

const NO_FASTEST_TIME: i64 = i64::MAX;

/// Serializes the complete player record set.
pub fn encode_records(records: &PlayerRecords) -> Result<Vec<u8>, CodecError> {
    let mut writer = ByteWriter::new();
    writer.write_count(records.len(), "level records")?;
    for (level_name, record) in records.iter() {
        writer.write_string(level_name, "level name")?;
        writer.write_string(record.algorithm().as_str(), "algorithm name")?;
        writer.write_count(record.games_played() as usize, "games played")?;
        writer.write_count(record.wins() as usize, "wins")?;
        writer.write_count(record.perfect_wins() as usize, "perfect wins")?;
        writer.write_i64(encode_fastest(record.fastest_perfect_win())?);
    }
    Ok(writer.into_bytes())
}

/// Deserializes the complete player record set.
pub fn decode_records(bytes: &[u8]) -> Result<PlayerRecords, CodecError> {
    let mut reader = ByteReader::new(bytes);
    let mut records = PlayerRecords::new();

    let count = reader.read_count("level records")?;
    for _ in 0..count {
        let level_name = reader.read_string()?;
        let algorithm = reader
            .read_string()?
            .parse()
            .map_err(CodecError::UnknownAlgorithm)?;
        let games_played = read_stat(&mut reader, "games played")?;
        let wins = read_stat(&mut reader, "wins")?;
        let perfect_wins = read_stat(&mut reader, "perfect wins")?;
        let fastest = decode_fastest(reader.read_i64()?)?;
        records.insert(
            level_name,
            LevelRecord::from_stats(algorithm, games_played, wins, perfect_wins, fastest),
        );
    }

    reader.finish()?;
    Ok(records)
}

fn read_stat(reader: &mut ByteReader<'_>, what: &'static str) -> Result<u32, CodecError> {
    let value = reader.read_i32()?;
    u32::try_from(value).map_err(|_| CodecError::NegativeCount { what, value })
}

fn encode_fastest(fastest: Option<Duration>) -> Result<i64, CodecError> {
    match fastest {
        None => Ok(NO_FASTEST_TIME),
        Some(elapsed) => i64::try_from(elapsed.as_millis()).map_err(|_| {
            CodecError::ValueTooLarge {
                what: "fastest perfect win",
            }
        }),
    }
}

fn decode_fastest(value: i64) -> Result<Option<Duration>, CodecError> {
    match value {
        NO_FASTEST_TIME => Ok(None),
        millis if millis >= 0 => Ok(Some(Duration::from_millis(millis as u64))),
        value => Err(CodecError::InvalidTime { value }),
    }
}
