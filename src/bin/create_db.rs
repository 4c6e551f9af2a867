use std::process;

use elevlog::{create_db, establish_connection, DatabaseConfig};

fn main() {
    elevlog::init_logging();

    let database = match DatabaseConfig::from_env() {
        Ok(database) => database,
        Err(err) => {
            tracing::error!(error = %err, "invalid configuration");
            process::exit(1);
        }
    };

    let mut db = match establish_connection(&database) {
        Ok(db) => db,
        Err(err) => {
            tracing::error!(error = %err, "failed to connect to database");
            process::exit(1);
        }
    };

    match create_db(&mut db) {
        Ok(_) => tracing::info!("logs table ready"),
        Err(err) => {
            tracing::error!(error = %err, "failed to create DB");
            process::exit(1);
        }
    }
}
