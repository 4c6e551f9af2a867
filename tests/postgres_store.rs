//! Runs against a real database: `DATABASE_URL=... cargo test -- --ignored`.
//! Drops and recreates the `logs` table.

use chrono::Utc;

use elevlog::db::{append, get_session};
use elevlog::export::to_csv;
use elevlog::{
    create_db, empty_db, establish_connection, establish_pool, DatabaseConfig, LogStore, NewLogEntry,
    PgLogStore,
};

fn sample(session_id: &str, user_id: &str, lat: f64, lon: f64, ele: f64) -> NewLogEntry {
    NewLogEntry {
        session_id: session_id.to_string(),
        user_id: user_id.to_string(),
        latitude: lat,
        longitude: lon,
        elevation: ele,
    }
}

fn fresh_store() -> PgLogStore {
    let database = DatabaseConfig::from_env().expect("DATABASE_URL must be set");
    let mut db = establish_connection(&database).unwrap();
    empty_db(&mut db).unwrap();
    create_db(&mut db).unwrap();
    PgLogStore::new(establish_pool(&database).unwrap())
}

#[test]
#[ignore]
fn logs_round_trip_through_postgres() {
    let store = fresh_store();

    let before = Utc::now() - chrono::Duration::seconds(1);
    let first = store.append(sample("s1", "u1", 1.0, 2.0, 10.0)).unwrap();
    let second = store.append(sample("s1", "u1", 1.1, 2.1, 12.0)).unwrap();
    store.append(sample("s1", "u2", 3.0, 4.0, 5.0)).unwrap();
    assert!(first.timestamp >= before);

    let entries = store.get_session("s1").unwrap();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].id, first.id);
    assert_eq!(entries[1].id, second.id);
    assert!(entries.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));

    let sessions = store.list_sessions().unwrap();
    assert_eq!(sessions.len(), 2);
    let u1 = sessions.iter().find(|s| s.user_id == "u1").unwrap();
    assert_eq!(u1.start_time, first.timestamp);
    assert_eq!(sessions[0].user_id, "u2");

    assert!(store.get_session("unknown-id").unwrap().is_empty());
}

#[test]
#[ignore]
fn export_reads_over_a_single_connection() {
    let database = DatabaseConfig::from_env().expect("DATABASE_URL must be set");
    let mut db = establish_connection(&database).unwrap();
    empty_db(&mut db).unwrap();
    create_db(&mut db).unwrap();

    append(&mut db, sample("ride", "u1", 1.0, 2.0, 10.0)).unwrap();
    append(&mut db, sample("ride", "u1", 1.5, 2.5, 11.0)).unwrap();

    let entries = get_session(&mut db, "ride").unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(to_csv(&entries).lines().count(), 3);
    assert!(get_session(&mut db, "other").unwrap().is_empty());
}
