use postgres::config::SslMode;
use postgres::{Client, Row};
use r2d2::Pool;
use r2d2_postgres::PostgresConnectionManager;
use tokio_postgres_rustls::MakeRustlsConnect;

use crate::config::{DatabaseConfig, DatabaseSsl};
use crate::error::StoreError;
use crate::models::{LogEntry, NewLogEntry, SessionSummary};
use crate::store::LogStore;
use crate::tls;

pub type DbPool = Pool<PostgresConnectionManager<MakeRustlsConnect>>;

const CREATE_LOGS: &str = "CREATE TABLE IF NOT EXISTS logs (
    id BIGSERIAL PRIMARY KEY,
    session_id TEXT NOT NULL,
    user_id TEXT NOT NULL,
    latitude DOUBLE PRECISION NOT NULL,
    longitude DOUBLE PRECISION NOT NULL,
    elevation DOUBLE PRECISION NOT NULL,
    timestamp TIMESTAMPTZ NOT NULL DEFAULT now()
)";

fn client_config(db: &DatabaseConfig) -> Result<(postgres::Config, MakeRustlsConnect), StoreError> {
    let mut config: postgres::Config = db.url.parse()?;
    config.ssl_mode(match db.ssl {
        DatabaseSsl::Disable => SslMode::Disable,
        DatabaseSsl::Require | DatabaseSsl::VerifyFull => SslMode::Require,
    });
    Ok((config, tls::connector(db.ssl)?))
}

/// Single connection for the command line tools.
pub fn establish_connection(db: &DatabaseConfig) -> Result<Client, StoreError> {
    let (config, tls) = client_config(db)?;
    Ok(config.connect(tls)?)
}

/// Connection pool for the server.
pub fn establish_pool(db: &DatabaseConfig) -> Result<DbPool, StoreError> {
    let (config, tls) = client_config(db)?;
    let pool = Pool::new(PostgresConnectionManager::new(config, tls))?;
    Ok(pool)
}

pub fn create_db(db: &mut Client) -> Result<(), postgres::Error> {
    db.batch_execute(CREATE_LOGS)
}

pub fn empty_db(db: &mut Client) -> Result<(), postgres::Error> {
    db.batch_execute("DROP TABLE IF EXISTS logs")
}

fn entry_from_row(row: &Row) -> Result<LogEntry, postgres::Error> {
    Ok(LogEntry {
        id: row.try_get("id")?,
        session_id: row.try_get("session_id")?,
        user_id: row.try_get("user_id")?,
        latitude: row.try_get("latitude")?,
        longitude: row.try_get("longitude")?,
        elevation: row.try_get("elevation")?,
        timestamp: row.try_get("timestamp")?,
    })
}

pub fn append(db: &mut Client, entry: NewLogEntry) -> Result<LogEntry, postgres::Error> {
    let row = db.query_one(
        "INSERT INTO logs (session_id, user_id, latitude, longitude, elevation)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING id, timestamp",
        &[
            &entry.session_id,
            &entry.user_id,
            &entry.latitude,
            &entry.longitude,
            &entry.elevation,
        ],
    )?;
    let id: i64 = row.try_get("id")?;
    let timestamp = row.try_get("timestamp")?;
    Ok(entry.into_entry(id, timestamp))
}

pub fn list_sessions(db: &mut Client) -> Result<Vec<SessionSummary>, postgres::Error> {
    let rows = db.query(
        "SELECT session_id, user_id, MIN(timestamp) AS start_time
         FROM logs
         GROUP BY session_id, user_id
         ORDER BY start_time DESC",
        &[],
    )?;

    let mut sessions = Vec::with_capacity(rows.len());
    for row in &rows {
        sessions.push(SessionSummary {
            session_id: row.try_get("session_id")?,
            user_id: row.try_get("user_id")?,
            start_time: row.try_get("start_time")?,
        });
    }
    Ok(sessions)
}

pub fn get_session(db: &mut Client, session_id: &str) -> Result<Vec<LogEntry>, postgres::Error> {
    let rows = db.query(
        "SELECT * FROM logs WHERE session_id = $1 ORDER BY timestamp ASC, id ASC",
        &[&session_id],
    )?;

    let mut entries = Vec::with_capacity(rows.len());
    for row in &rows {
        entries.push(entry_from_row(row)?);
    }
    Ok(entries)
}

/// Log store backed by the `logs` table.
#[derive(Clone)]
pub struct PgLogStore {
    pool: DbPool,
}

impl PgLogStore {
    pub fn new(pool: DbPool) -> PgLogStore {
        PgLogStore { pool }
    }
}

impl LogStore for PgLogStore {
    fn append(&self, entry: NewLogEntry) -> Result<LogEntry, StoreError> {
        let mut db = self.pool.get()?;
        Ok(append(&mut db, entry)?)
    }

    fn list_sessions(&self) -> Result<Vec<SessionSummary>, StoreError> {
        let mut db = self.pool.get()?;
        Ok(list_sessions(&mut db)?)
    }

    fn get_session(&self, session_id: &str) -> Result<Vec<LogEntry>, StoreError> {
        let mut db = self.pool.get()?;
        Ok(get_session(&mut db, session_id)?)
    }
}
