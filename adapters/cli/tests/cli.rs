use std::fs;
use std::path::PathBuf;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

use pathx_core::{AlgorithmKind, GridCell};
use pathx_level::{Intersection, Level, LevelSeed, Road};
use pathx_world::SnakeLayout;

fn scratch_dir(label: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let dir =
        std::env::temp_dir().join(format!("pathx-cli-{label}-{}-{nanos}", std::process::id()));
    fs::create_dir_all(&dir).expect("create scratch dir");
    dir
}

fn sample_level() -> Level {
    let mut level = Level::new(LevelSeed {
        name: "riverside".to_owned(),
        background_image: "riverside_bg.png".to_owned(),
        starting_location_image: "dock.png".to_owned(),
        destination_image: "mill.png".to_owned(),
        money: 400,
        num_police: 1,
        num_bandits: 1,
        num_zombies: 2,
    });
    let a = level.add_intersection(Intersection::new(0, 0));
    let b = level.add_intersection(Intersection::new(60, 40));
    level.add_road(Road::new(a, b, true, 35)).expect("road");
    level.set_start(a).expect("start");
    level.set_destination(b).expect("destination");
    level
}

fn pathx(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_pathx"))
        .args(args)
        .output()
        .expect("failed to spawn the pathx binary")
}

#[test]
fn inspect_prints_the_level_summary() {
    let dir = scratch_dir("inspect");
    let path = dir.join("riverside.bin");
    pathx_storage::save_level(&path, &sample_level()).expect("save");

    let output = pathx(&["inspect", path.to_str().expect("utf-8 path")]);
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("utf-8 output");
    assert!(stdout.contains("level: riverside"));
    assert!(stdout.contains("0 -> 1 at 35 mph"), "one-way road line: {stdout}");

    fs::remove_dir_all(&dir).expect("cleanup");
}

#[test]
fn validate_rejects_truncated_level_files() {
    let dir = scratch_dir("validate");
    let path = dir.join("riverside.bin");
    pathx_storage::save_level(&path, &sample_level()).expect("save");
    let bytes = fs::read(&path).expect("read back");
    fs::write(&path, &bytes[..bytes.len() - 5]).expect("truncate");

    let output = pathx(&["validate", path.to_str().expect("utf-8 path")]);
    assert!(
        !output.status.success(),
        "a truncated level must fail validation",
    );

    fs::remove_dir_all(&dir).expect("cleanup");
}

#[test]
fn replay_wins_the_staged_session() {
    let dir = scratch_dir("replay");
    let level_path = dir.join("riverside.bin");
    let snake_path = dir.join("riverside_snake.bin");
    pathx_storage::save_level(&level_path, &sample_level()).expect("save level");

    let layout = SnakeLayout::new(
        AlgorithmKind::BubbleSort,
        5,
        1,
        (0..5).map(|column| GridCell::new(column, 0)).collect(),
    )
    .expect("layout");
    pathx_storage::save_snake(&snake_path, &layout).expect("save snake");

    let output = pathx(&[
        "replay",
        snake_path.to_str().expect("utf-8 path"),
        "--level",
        level_path.to_str().expect("utf-8 path"),
        "--seed",
        "7",
    ]);
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("utf-8 output");
    assert!(
        stdout.contains("perfect"),
        "replaying the reference sequence must report a perfect win: {stdout}",
    );

    fs::remove_dir_all(&dir).expect("cleanup");
}

#[test]
fn transfer_strings_round_trip_through_the_binary() {
    let dir = scratch_dir("transfer");
    let path = dir.join("riverside.bin");
    pathx_storage::save_level(&path, &sample_level()).expect("save");

    let encoded = pathx(&["transfer", "encode", path.to_str().expect("utf-8 path")]);
    assert!(encoded.status.success());
    let payload = String::from_utf8(encoded.stdout).expect("utf-8 output");
    assert!(payload.starts_with("pathx:v1:2x1:"), "payload: {payload}");

    let decoded = pathx(&["transfer", "decode", payload.trim()]);
    assert!(decoded.status.success());
    let stdout = String::from_utf8(decoded.stdout).expect("utf-8 output");
    assert!(stdout.contains("level: riverside"));

    fs::remove_dir_all(&dir).expect("cleanup");
}
