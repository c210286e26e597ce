//! Codec for the `.bin` level format.
//!
//! Field order is fixed and must not change: level name, background image,
//! the intersection list, the road list, the start marker, the destination
//! marker, then money and the three opposition counts. Roads and markers
//! reference intersections by index, which the decoder validates before a
//! [`Level`] is ever handed to a caller.

use pathx_core::IntersectionId;
use pathx_level::{Intersection, Level, LevelSeed, Road};

use crate::bytes::{ByteReader, ByteWriter};
use crate::CodecError;

/// Encoded size of one intersection: x, y, and the open flag.
const INTERSECTION_BYTES: usize = 4 + 4 + 1;
/// Encoded size of one road: both endpoints, the one-way flag, and the
/// speed limit.
const ROAD_BYTES: usize = 4 + 4 + 1 + 4;

/// Serializes a level into the fixed binary layout.
///
/// A level that fails [`Level::validate`] is refused; encoding it would
/// produce a file the decoder rejects.
pub fn encode_level(level: &Level) -> Result<Vec<u8>, CodecError> {
    level.validate()?;

    let mut writer = ByteWriter::new();
    writer.write_string(level.name(), "level name")?;
    writer.write_string(level.background_image(), "background image")?;

    writer.write_count(level.intersections().len(), "intersections")?;
    for intersection in level.intersections() {
        writer.write_i32(intersection.x());
        writer.write_i32(intersection.y());
        writer.write_bool(intersection.is_open());
    }

    writer.write_count(level.roads().len(), "roads")?;
    for road in level.roads() {
        write_id(&mut writer, road.from())?;
        write_id(&mut writer, road.to())?;
        writer.write_bool(road.is_one_way());
        writer.write_i32(road.speed_limit());
    }

    write_id(&mut writer, level.start())?;
    writer.write_string(level.starting_location_image(), "starting image")?;
    write_id(&mut writer, level.destination())?;
    writer.write_string(level.destination_image(), "destination image")?;

    writer.write_i32(level.money());
    writer.write_i32(level.num_police());
    writer.write_i32(level.num_bandits());
    writer.write_i32(level.num_zombies());

    Ok(writer.into_bytes())
}

/// Deserializes a level from the fixed binary layout.
///
/// Any truncation, malformed field, dangling index, or trailing garbage
/// yields an error; no partially-populated level escapes.
pub fn decode_level(bytes: &[u8]) -> Result<Level, CodecError> {
    let mut reader = ByteReader::new(bytes);

    let name = reader.read_string()?;
    let background_image = reader.read_string()?;

    let intersection_count = reader.read_count("intersections")?;
    // Cap the preallocation by what the input can actually hold; a hostile
    // count must fail as a truncated read, not as a giant allocation.
    let mut intersections =
        Vec::with_capacity(intersection_count.min(reader.remaining() / INTERSECTION_BYTES));
    for _ in 0..intersection_count {
        let x = reader.read_i32()?;
        let y = reader.read_i32()?;
        let open = reader.read_bool()?;
        let mut intersection = Intersection::new(x, y);
        intersection.set_open(open);
        intersections.push(intersection);
    }

    let road_count = reader.read_count("roads")?;
    let mut roads = Vec::with_capacity(road_count.min(reader.remaining() / ROAD_BYTES));
    for _ in 0..road_count {
        let from = read_id(&mut reader, intersection_count, "road origin")?;
        let to = read_id(&mut reader, intersection_count, "road destination")?;
        let one_way = reader.read_bool()?;
        let speed_limit = reader.read_i32()?;
        roads.push(Road::new(from, to, one_way, speed_limit));
    }

    let start = read_id(&mut reader, intersection_count, "start marker")?;
    let starting_location_image = reader.read_string()?;
    let destination = read_id(&mut reader, intersection_count, "destination marker")?;
    let destination_image = reader.read_string()?;

    let money = reader.read_i32()?;
    let num_police = reader.read_i32()?;
    let num_bandits = reader.read_i32()?;
    let num_zombies = reader.read_i32()?;

    reader.finish()?;

    let mut level = Level::new(LevelSeed {
        name,
        background_image,
        starting_location_image,
        destination_image,
        money,
        num_police,
        num_bandits,
        num_zombies,
    });
    for intersection in intersections {
        let _ = level.add_intersection(intersection);
    }
    for road in roads {
        level.add_road(road)?;
    }
    level.set_start(start)?;
    level.set_destination(destination)?;

    Ok(level)
}

fn write_id(writer: &mut ByteWriter, id: IntersectionId) -> Result<(), CodecError> {
    let value = i32::try_from(id.get()).map_err(|_| CodecError::ValueTooLarge {
        what: "intersection index",
    })?;
    writer.write_i32(value);
    Ok(())
}

fn read_id(
    reader: &mut ByteReader<'_>,
    intersection_count: usize,
    what: &'static str,
) -> Result<IntersectionId, CodecError> {
    let index = reader.read_i32()?;
    let resolved = usize::try_from(index).ok().filter(|i| *i < intersection_count);
    match resolved {
        Some(_) => Ok(IntersectionId::new(index as u32)),
        None => Err(CodecError::IndexOutOfRange {
            what,
            index,
            len: intersection_count,
        }),
    }
}
