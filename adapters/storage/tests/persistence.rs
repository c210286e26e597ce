use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use pathx_core::{AlgorithmKind, GridCell};
use pathx_level::{Intersection, Level, LevelSeed, Road};
use pathx_storage::{
    load_level, load_records, load_snake, save_level, save_records, save_snake, StorageError,
};
use pathx_system_records::PlayerRecords;
use pathx_world::SnakeLayout;

fn scratch_dir(label: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("pathx-{label}-{}-{nanos}", std::process::id()));
    fs::create_dir_all(&dir).expect("create scratch dir");
    dir
}

fn sample_level() -> Level {
    let mut level = Level::new(LevelSeed {
        name: "harbour".to_owned(),
        background_image: "harbour_bg.png".to_owned(),
        starting_location_image: "pier.png".to_owned(),
        destination_image: "warehouse.png".to_owned(),
        money: 800,
        num_police: 2,
        num_bandits: 1,
        num_zombies: 3,
    });
    let a = level.add_intersection(Intersection::new(10, 10));
    let b = level.add_intersection(Intersection::new(90, 10));
    let c = level.add_intersection(Intersection::new(50, 70));
    level.add_road(Road::new(a, b, false, 60)).expect("road");
    level.add_road(Road::new(b, c, true, 25)).expect("road");
    level.set_start(a).expect("start");
    level.set_destination(c).expect("destination");
    level
}

#[test]
fn levels_survive_a_disk_round_trip() {
    let dir = scratch_dir("level");
    let path = dir.join("harbour.bin");

    let level = sample_level();
    save_level(&path, &level).expect("save");
    let loaded = load_level(&path).expect("load");
    assert_eq!(loaded, level);

    fs::remove_dir_all(&dir).expect("cleanup");
}

#[test]
fn snake_layouts_survive_a_disk_round_trip() {
    let dir = scratch_dir("snake");
    let path = dir.join("harbour_snake.bin");

    let layout = SnakeLayout::new(
        AlgorithmKind::BubbleSort,
        4,
        2,
        vec![
            GridCell::new(0, 0),
            GridCell::new(1, 0),
            GridCell::new(2, 0),
            GridCell::new(3, 0),
            GridCell::new(3, 1),
        ],
    )
    .expect("layout");

    save_snake(&path, &layout).expect("save");
    assert_eq!(load_snake(&path).expect("load"), layout);

    fs::remove_dir_all(&dir).expect("cleanup");
}

#[test]
fn missing_record_files_fall_back_to_empty_history() {
    let dir = scratch_dir("records-missing");
    let records = load_records(&dir.join("never_written.bin")).expect("load");
    assert!(records.is_empty());
    fs::remove_dir_all(&dir).expect("cleanup");
}

#[test]
fn malformed_record_files_are_reported_not_discarded() {
    let dir = scratch_dir("records-malformed");
    let path = dir.join("records.bin");
    fs::write(&path, [0xDE, 0xAD]).expect("write garbage");

    let error = load_records(&path).unwrap_err();
    assert!(
        matches!(error, StorageError::Malformed { .. }),
        "a corrupt records file must surface as malformed, got {error}",
    );

    fs::remove_dir_all(&dir).expect("cleanup");
}

#[test]
fn records_survive_a_disk_round_trip_after_play() {
    let dir = scratch_dir("records");
    let path = dir.join("records.bin");

    let mut records = PlayerRecords::new();
    records.ensure_level("harbour", AlgorithmKind::BubbleSort);
    records.record_win("harbour");
    records.record_perfect_win("harbour", std::time::Duration::from_millis(61_500));

    save_records(&path, &records).expect("save");
    assert_eq!(load_records(&path).expect("load"), records);

    fs::remove_dir_all(&dir).expect("cleanup");
}

#[test]
fn failed_saves_leave_the_previous_file_untouched() {
    let dir = scratch_dir("atomic");
    let path = dir.join("level.bin");

    let level = sample_level();
    save_level(&path, &level).expect("save");

    // An unencodable level must be refused before any byte hits the disk.
    let broken = Level::new(LevelSeed::default());
    let error = save_level(&path, &broken).unwrap_err();
    assert!(matches!(error, StorageError::Unencodable { .. }));

    assert_eq!(load_level(&path).expect("reload"), level);
    assert!(
        fs::read_dir(&dir)
            .expect("read dir")
            .filter_map(Result::ok)
            .all(|entry| entry.file_name() == "level.bin"),
        "no temporary files may linger after a refused save",
    );

    fs::remove_dir_all(&dir).expect("cleanup");
}

#[test]
fn truncated_level_files_never_load_partially() {
    let dir = scratch_dir("truncated");
    let path = dir.join("level.bin");

    save_level(&path, &sample_level()).expect("save");
    let bytes = fs::read(&path).expect("read back");
    // Cut the file inside the road list.
    fs::write(&path, &bytes[..bytes.len() * 2 / 3]).expect("truncate");

    assert!(matches!(
        load_level(&path),
        Err(StorageError::Malformed { .. }),
    ));

    fs::remove_dir_all(&dir).expect("cleanup");
}
