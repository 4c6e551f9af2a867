use std::process;

use elevlog::{empty_db, establish_connection, DatabaseConfig};

fn main() {
    elevlog::init_logging();

    let database = match DatabaseConfig::from_env() {
        Ok(database) => database,
        Err(err) => {
            tracing::error!(error = %err, "invalid configuration");
            process::exit(1);
        }
    };

    let result = establish_connection(&database).and_then(|mut db| Ok(empty_db(&mut db)?));
    if let Err(err) = result {
        tracing::error!(error = %err, "failed to empty DB");
        process::exit(1);
    }
    tracing::info!("logs table dropped");
}
