#![allow(dead_code)]

use songplay_etl::config::AppConfig;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

pub const SONG_SETANTA: &str = r#"{"num_songs": 1, "artist_id": "AR5KOSW1187FB35FF4", "artist_latitude": 49.80388, "artist_location": "Dubai UAE", "artist_longitude": 15.47491, "artist_name": "Elena", "song_id": "SOZCTXZ12AB0182364", "title": "Setanta matins", "duration": 269.58322, "year": 0}"#;

pub const SONG_BOX_TOPS: &str = r#"{"num_songs": 1, "artist_id": "ARMJAGH1187FB546F3", "artist_latitude": 35.14968, "artist_longitude": -90.04892, "artist_location": "Memphis, TN", "artist_name": "The Box Tops", "song_id": "SOCIWDW12A8C13D406", "title": "Soul Deep", "duration": 148.03546, "year": 1969}"#;

pub const SONG_CASUAL: &str = r#"{"num_songs": 1, "artist_id": "ARD7TVE1187B99BFB1", "artist_latitude": null, "artist_longitude": null, "artist_location": "California - LA", "artist_name": "Casual", "song_id": "SOMZWCG12A8C13C480", "title": "I Didn't Mean To", "duration": 218.93179, "year": 0}"#;

/// Matches SONG_SETANTA.
pub const PLAY_MATCHED: &str = r#"{"artist":"Elena","auth":"Logged In","firstName":"Lily","gender":"F","itemInSession":5,"lastName":"Koch","length":269.58322,"level":"paid","location":"Chicago-Naperville-Elgin, IL-IN-WI","method":"PUT","page":"NextSong","registration":1541048010796.0,"sessionId":818,"song":"Setanta matins","status":200,"ts":1542837407796,"userAgent":"\"Mozilla\/5.0 (X11; Linux x86_64) AppleWebKit\/537.36 (KHTML, like Gecko) Ubuntu Chromium\/36.0.1985.125 Chrome\/36.0.1985.125 Safari\/537.36\"","userId":"15"}"#;

pub const PLAY_UNMATCHED: &str = r#"{"artist":"Pavement","auth":"Logged In","firstName":"Sylvie","gender":"F","itemInSession":0,"lastName":"Cruz","length":99.16036,"level":"free","location":"Washington-Arlington-Alexandria, DC-VA-MD-WV","method":"PUT","page":"NextSong","registration":1540266185796.0,"sessionId":345,"song":"Mercy:The Laundromat","status":200,"ts":1541990258796,"userAgent":"\"Mozilla\/5.0 (Macintosh; Intel Mac OS X 10_9_4) AppleWebKit\/537.77.4 (KHTML, like Gecko) Version\/7.0.5 Safari\/537.77.4\"","userId":"10"}"#;

pub const HOME_EVENT: &str = r#"{"artist":null,"auth":"Logged In","firstName":"Lily","gender":"F","itemInSession":6,"lastName":"Koch","length":null,"level":"paid","location":"Chicago-Naperville-Elgin, IL-IN-WI","method":"GET","page":"Home","registration":1541048010796.0,"sessionId":818,"song":null,"status":200,"ts":1542837408796,"userAgent":"Mozilla","userId":"15"}"#;

pub const LOGOUT_EVENT: &str = r#"{"artist":null,"auth":"Logged Out","firstName":null,"gender":null,"itemInSession":7,"lastName":null,"length":null,"level":"paid","location":null,"method":"PUT","page":"Logout","registration":null,"sessionId":818,"song":null,"status":307,"ts":1542837409796,"userAgent":null,"userId":""}"#;

pub fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// A data tree laid out like the real dataset: nested song files and
/// one log file per day.
pub fn sample_tree() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("song_data")).unwrap();
    fs::create_dir_all(root.join("log_data")).unwrap();

    write(root, "song_data/A/A/A/TRAAAAW128F429D538.json", SONG_CASUAL);
    write(root, "song_data/A/B/C/TRABCEI128F424C983.json", SONG_SETANTA);
    write(root, "song_data/A/A/B/TRAABJL12903CDCF1A.json", SONG_BOX_TOPS);
    write(root, "song_data/A/A/B/README.txt", "not a song");

    write(
        root,
        "log_data/2018/11/2018-11-12-events.json",
        &format!("{}\n", PLAY_UNMATCHED),
    );
    write(
        root,
        "log_data/2018/11/2018-11-21-events.json",
        &format!("{}\n{}\n{}\n", PLAY_MATCHED, HOME_EVENT, LOGOUT_EVENT),
    );
    dir
}

pub fn config_for(dir: &TempDir) -> AppConfig {
    AppConfig {
        database_path: dir.path().join("sparkify.sqlite"),
        song_data_dir: dir.path().join("song_data"),
        log_data_dir: dir.path().join("log_data"),
        file_extension: "json".to_string(),
        reset: false,
    }
}
