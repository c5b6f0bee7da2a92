//! End-to-end runs against a SQLite file in a temporary directory.

mod common;

use common::{config_for, sample_tree, write, SONG_BOX_TOPS, SONG_SETANTA};
use rusqlite::Connection;
use songplay_etl::pipeline::{process_log_file, process_song_file};
use songplay_etl::{process_data, run, Database, RunSummary, SchemaRegistry};
use tempfile::TempDir;

fn count(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |r| r.get(0))
        .unwrap()
}

fn play_for_user(conn: &Connection, user_id: i64) -> (Option<String>, Option<String>, String, Option<String>) {
    conn.query_row(
        "SELECT song_id, artist_id, start_time, user_agent FROM songplays WHERE user_id = ?1",
        [user_id],
        |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?)),
    )
    .unwrap()
}

#[test]
fn test_full_run_loads_every_table() {
    let dir = sample_tree();
    let config = config_for(&dir);
    let registry = SchemaRegistry::default();
    let mut db = Database::open(&config.database_path, &registry, false).unwrap();

    run(&mut db, &registry, &config).unwrap();

    let counts = db.counts(&registry).unwrap();
    assert_eq!(
        counts,
        vec![
            ("songs", 3),
            ("artists", 3),
            ("users", 2),
            ("time", 2),
            ("songplays", 2),
        ]
    );
}

#[test]
fn test_matched_play_gets_catalog_ids() {
    let dir = sample_tree();
    let config = config_for(&dir);
    let registry = SchemaRegistry::default();
    let mut db = Database::open(&config.database_path, &registry, false).unwrap();

    run(&mut db, &registry, &config).unwrap();

    let (song_id, artist_id, start_time, user_agent) = play_for_user(db.connection(), 15);
    assert_eq!(song_id.as_deref(), Some("SOZCTXZ12AB0182364"));
    assert_eq!(artist_id.as_deref(), Some("AR5KOSW1187FB35FF4"));
    assert_eq!(start_time, "2018-11-21 21:56:47.796");
    let user_agent = user_agent.unwrap();
    assert!(user_agent.starts_with("Mozilla/5.0 (X11; Linux x86_64)"));
    assert!(!user_agent.contains('"'));
}

#[test]
fn test_unmatched_play_keeps_null_ids() {
    let dir = sample_tree();
    let config = config_for(&dir);
    let registry = SchemaRegistry::default();
    let mut db = Database::open(&config.database_path, &registry, false).unwrap();

    run(&mut db, &registry, &config).unwrap();

    let (song_id, artist_id, start_time, _) = play_for_user(db.connection(), 10);
    assert_eq!(song_id, None);
    assert_eq!(artist_id, None);
    assert_eq!(start_time, "2018-11-12 02:37:38.796");

    let time: (i64, i64, i64, i64, i64, i64) = db
        .connection()
        .query_row(
            "SELECT hour, day, week, month, year, weekday FROM time WHERE start_time = ?1",
            [&start_time],
            |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?, r.get(4)?, r.get(5)?)),
        )
        .unwrap();
    assert_eq!(time, (2, 12, 46, 11, 2018, 0));
}

#[test]
fn test_artist_nulls_survive_the_bulk_path() {
    let dir = sample_tree();
    let config = config_for(&dir);
    let registry = SchemaRegistry::default();
    let mut db = Database::open(&config.database_path, &registry, false).unwrap();

    run(&mut db, &registry, &config).unwrap();

    let row: (Option<String>, Option<f64>, Option<f64>) = db
        .connection()
        .query_row(
            "SELECT location, latitude, longitude FROM artists WHERE artist_id = 'ARD7TVE1187B99BFB1'",
            [],
            |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
        )
        .unwrap();
    assert_eq!(row, (Some("California - LA".to_string()), None, None));

    let location: Option<String> = db
        .connection()
        .query_row(
            "SELECT location FROM artists WHERE artist_id = 'ARMJAGH1187FB546F3'",
            [],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(location.as_deref(), Some("Memphis, TN"));
}

#[test]
fn test_reloading_logs_does_not_duplicate_dimensions() {
    let dir = sample_tree();
    let config = config_for(&dir);
    let registry = SchemaRegistry::default();
    let mut db = Database::open(&config.database_path, &registry, false).unwrap();

    run(&mut db, &registry, &config).unwrap();
    let summary = process_data(
        db.connection_mut(),
        &registry,
        &config.log_data_dir,
        "json",
        process_log_file,
    )
    .unwrap();

    assert_eq!(summary.files_processed, 2);
    let conn = db.connection();
    assert_eq!(count(conn, "users"), 2);
    assert_eq!(count(conn, "time"), 2);
    assert_eq!(count(conn, "songplays"), 4);
}

#[test]
fn test_user_level_follows_latest_event() {
    let dir = TempDir::new().unwrap();
    let registry = SchemaRegistry::default();
    let mut db = Database::open(dir.path().join("db.sqlite"), &registry, false).unwrap();
    let free = r#"{"page":"NextSong","ts":1541990258796,"userId":"10","firstName":"Sylvie","lastName":"Cruz","gender":"F","level":"free","sessionId":345,"song":null,"artist":null,"length":null,"location":null,"userAgent":null}"#;
    let paid = r#"{"page":"NextSong","ts":1542990258796,"userId":"10","firstName":"Sylvie","lastName":"Cruz","gender":"F","level":"paid","sessionId":346,"song":null,"artist":null,"length":null,"location":null,"userAgent":null}"#;
    write(dir.path(), "logs/1.json", free);
    write(dir.path(), "logs/2.json", paid);

    process_data(
        db.connection_mut(),
        &registry,
        &dir.path().join("logs"),
        "json",
        process_log_file,
    )
    .unwrap();

    let level: String = db
        .connection()
        .query_row("SELECT level FROM users WHERE user_id = 10", [], |r| r.get(0))
        .unwrap();
    assert_eq!(level, "paid");
    assert_eq!(count(db.connection(), "users"), 1);
}

#[test]
fn test_empty_trees_report_zero_files() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join("song_data")).unwrap();
    std::fs::create_dir_all(dir.path().join("log_data")).unwrap();
    let config = config_for(&dir);
    let registry = SchemaRegistry::default();
    let mut db = Database::open(&config.database_path, &registry, false).unwrap();

    let summary = process_data(
        db.connection_mut(),
        &registry,
        &config.song_data_dir,
        "json",
        process_song_file,
    )
    .unwrap();
    assert_eq!(summary, RunSummary::default());

    run(&mut db, &registry, &config).unwrap();
    assert!(db.counts(&registry).unwrap().iter().all(|(_, n)| *n == 0));
}

#[test]
fn test_multi_record_song_file_loads_every_record() {
    let dir = TempDir::new().unwrap();
    let registry = SchemaRegistry::default();
    let mut db = Database::open(dir.path().join("db.sqlite"), &registry, false).unwrap();
    write(
        dir.path(),
        "songs/both.json",
        &format!("{}\n{}\n", SONG_SETANTA, SONG_BOX_TOPS),
    );

    let summary = process_data(
        db.connection_mut(),
        &registry,
        &dir.path().join("songs"),
        "json",
        process_song_file,
    )
    .unwrap();

    assert_eq!(summary.files_processed, 1);
    assert_eq!(count(db.connection(), "songs"), 2);
    assert_eq!(count(db.connection(), "artists"), 2);
}

#[test]
fn test_malformed_file_stops_the_run_and_keeps_earlier_files() {
    let dir = TempDir::new().unwrap();
    let registry = SchemaRegistry::default();
    let mut db = Database::open(dir.path().join("db.sqlite"), &registry, false).unwrap();
    write(dir.path(), "songs/a.json", SONG_SETANTA);
    write(dir.path(), "songs/b.json", "{\"song_id\": ");
    write(dir.path(), "songs/c.json", SONG_BOX_TOPS);

    let err = process_data(
        db.connection_mut(),
        &registry,
        &dir.path().join("songs"),
        "json",
        process_song_file,
    )
    .unwrap_err();

    assert!(format!("{:#}", err).contains("b.json"));
    assert_eq!(count(db.connection(), "songs"), 1);
    assert_eq!(count(db.connection(), "artists"), 1);
}

#[test]
fn test_existing_database_is_reused_across_runs() {
    let dir = sample_tree();
    let config = config_for(&dir);
    let registry = SchemaRegistry::default();

    let mut db = Database::open(&config.database_path, &registry, false).unwrap();
    run(&mut db, &registry, &config).unwrap();
    db.close().unwrap();

    let mut db = Database::open(&config.database_path, &registry, false).unwrap();
    run(&mut db, &registry, &config).unwrap();
    let conn = db.connection();
    assert_eq!(count(conn, "songs"), 3);
    assert_eq!(count(conn, "artists"), 3);
    assert_eq!(count(conn, "users"), 2);
    assert_eq!(count(conn, "songplays"), 4);
    db.close().unwrap();

    let mut db = Database::open(&config.database_path, &registry, true).unwrap();
    run(&mut db, &registry, &config).unwrap();
    assert_eq!(count(db.connection(), "songplays"), 2);
}
