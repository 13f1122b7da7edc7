mod common;

use std::fs;
use std::path::Path;

use serde_json::Value;
use tempfile::TempDir;

use common::*;
use solaris_sync::cache::TickCache;
use solaris_sync::codec;
use solaris_sync::load::{dump_game, load_offline, load_online};
use solaris_sync::log::TracingLogger;
use solaris_sync::models::GameInfoResponse;
use solaris_sync::LoadError;

fn write_json(path: &Path, value: &Value) {
    fs::write(path, value.to_string()).unwrap();
}

fn dump_dir(ticks: &[i64]) -> TempDir {
    let dir = TempDir::new().unwrap();
    write_json(&dir.path().join("intel.json"), &intel_run(1, 2));
    for tick in ticks {
        write_json(
            &dir.path().join(format!("tick_{}.json", tick)),
            &snapshot(*tick),
        );
    }
    dir
}

#[test]
fn test_offline_orders_ticks_numerically() {
    let dir = dump_dir(&[1, 2, 10]);
    fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

    let game = load_offline(&TracingLogger, dir.path()).unwrap();

    assert_eq!(game.current_tick(), 10);
    assert_eq!(
        game.sync_history.keys().copied().collect::<Vec<_>>(),
        vec![1, 2, 10]
    );
    assert_eq!(game.me_player_id, "p1");
    assert_eq!(game.me().unwrap().alias, "Player 1");
    assert_eq!(game.game_intel.len(), 2);
    assert_eq!(game.game_events.count, 0);
    assert!(game.game_events.events.is_empty());
}

#[test]
fn test_offline_requires_single_perspective() {
    for perspective in [&[false, false][..], &[true, true][..]] {
        let dir = TempDir::new().unwrap();
        write_json(&dir.path().join("intel.json"), &intel_run(1, 1));
        write_json(
            &dir.path().join("tick_1.json"),
            &snapshot_with_perspective(1, perspective),
        );

        let err = load_offline(&TracingLogger, dir.path()).unwrap_err();
        let expected = perspective.iter().filter(|p| **p).count();
        assert!(matches!(err, LoadError::Perspective { count } if count == expected));
    }
}

#[test]
fn test_offline_failures() {
    let missing_intel = TempDir::new().unwrap();
    write_json(&missing_intel.path().join("tick_1.json"), &snapshot(1));
    assert!(matches!(
        load_offline(&TracingLogger, missing_intel.path()),
        Err(LoadError::Io { .. })
    ));

    let no_ticks = dump_dir(&[]);
    assert!(matches!(
        load_offline(&TracingLogger, no_ticks.path()),
        Err(LoadError::NoSnapshots(_))
    ));

    let bad_name = dump_dir(&[1]);
    write_json(&bad_name.path().join("tick_latest.json"), &snapshot(2));
    assert!(matches!(
        load_offline(&TracingLogger, bad_name.path()),
        Err(LoadError::BadTickFile(_))
    ));

    let corrupt = dump_dir(&[1]);
    fs::write(corrupt.path().join("tick_2.json"), "{ nope").unwrap();
    assert!(matches!(
        load_offline(&TracingLogger, corrupt.path()),
        Err(LoadError::Decode { .. })
    ));
}

#[tokio::test]
async fn test_online_load_runs_steps_in_order() {
    let transport = MockTransport::new()
        .route(&galaxy_key(Some(3)), snapshot(3))
        .route(&intel_key(1, 3), intel_run(1, 3))
        .route(&events_key(), events(1))
        .route(&galaxy_key(Some(1)), snapshot(1))
        .route(&galaxy_key(Some(2)), snapshot(2));
    let mut client = client(transport, TickCache::new(None));
    let info: GameInfoResponse = codec::decode_value("game info", info(GAME_ID, "Test Galaxy", 3)).unwrap();

    let game = load_online(&TracingLogger, &mut client, &info).await.unwrap();

    assert_eq!(game.current_tick(), 3);
    assert_eq!(game.me_player_id, "p1");
    assert_eq!(game.game_intel.len(), 3);
    assert_eq!(game.game_events.count, 1);
    assert_eq!(
        game.sync_history.keys().copied().collect::<Vec<_>>(),
        vec![1, 2, 3]
    );
    assert_eq!(
        client.transport().requests(),
        vec![
            galaxy_key(Some(3)),
            intel_key(1, 3),
            events_key(),
            galaxy_key(Some(1)),
            galaxy_key(Some(2)),
        ]
    );
}

#[tokio::test]
async fn test_online_load_stops_at_first_failure() {
    let transport = MockTransport::new()
        .route(&galaxy_key(Some(3)), snapshot(3))
        .fail(&intel_key(1, 3), 503);
    let mut client = client(transport, TickCache::new(None));
    let info: GameInfoResponse = codec::decode_value("game info", info(GAME_ID, "Test Galaxy", 3)).unwrap();

    let err = load_online(&TracingLogger, &mut client, &info).await.unwrap_err();

    assert!(matches!(err, LoadError::Client(_)));
    assert_eq!(
        client.transport().requests(),
        vec![galaxy_key(Some(3)), intel_key(1, 3)]
    );
}

#[test]
fn test_dump_then_offline_load() {
    let source = dump_dir(&[1, 2]);
    let loaded = load_offline(&TracingLogger, source.path()).unwrap();

    let target = TempDir::new().unwrap();
    let out = target.path().join("dump");
    dump_game(&TracingLogger, &out, &loaded).unwrap();
    assert!(out.join("intel.json").exists());
    assert!(out.join("tick_2.json").exists());

    let reloaded = load_offline(&TracingLogger, &out).unwrap();
    assert_eq!(reloaded, loaded);
}
