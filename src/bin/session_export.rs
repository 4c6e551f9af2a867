use std::env;
use std::fs;
use std::io::{self, Write};
use std::process;

use getopts::Options;

use elevlog::export::to_csv;
use elevlog::db::get_session;
use elevlog::{establish_connection, DatabaseConfig};

fn print_usage(program: &str, opts: Options) {
    let brief = format!("Usage: {} -s SESSION [options]", program);
    print!("{}", opts.usage(&brief));
}

fn main() {
    elevlog::init_logging();

    let args: Vec<String> = env::args().collect();
    let program = args[0].clone();

    let mut opts = Options::new();
    opts.optopt("s", "session", "session id", "SESSION");
    opts.optopt("o", "output", "write to file instead of stdout", "FILE");
    opts.optflag("h", "help", "print this help menu");
    let matches = match opts.parse(&args[1..]) {
        Ok(m) => m,
        Err(f) => {
            eprintln!("{}", f);
            print_usage(&program, opts);
            process::exit(2);
        }
    };
    if matches.opt_present("h") {
        print_usage(&program, opts);
        return;
    }
    let session_id = match matches.opt_str("s") {
        Some(s) => s,
        None => {
            print_usage(&program, opts);
            process::exit(2);
        }
    };

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

    let entries = match get_session(&mut db, &session_id) {
        Ok(entries) => entries,
        Err(err) => {
            tracing::error!(error = %err, "failed to read session");
            process::exit(1);
        }
    };
    if entries.is_empty() {
        tracing::error!(session_id = %session_id, "session not found");
        process::exit(1);
    }

    let csv = to_csv(&entries);
    let written = match matches.opt_str("o") {
        Some(path) => fs::write(&path, csv),
        None => io::stdout().write_all(csv.as_bytes()),
    };
    if let Err(err) = written {
        tracing::error!(error = %err, "failed to write CSV");
        process::exit(1);
    }
    tracing::info!(session_id = %session_id, rows = entries.len(), "exported session");
}
