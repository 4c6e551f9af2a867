use std::env;
use std::process;
use std::sync::Arc;

use actix_web::{middleware, web, App, HttpServer};
use getopts::Options;

use elevlog::config::{parse_port, Config};
use elevlog::server::{configure, AppState};
use elevlog::{establish_pool, LogStore, MemoryLogStore, PgLogStore};

fn print_usage(program: &str, opts: Options) {
    let brief = format!("Usage: {} [options]", program);
    print!("{}", opts.usage(&brief));
}

async fn serve(config: Config, store: Arc<dyn LogStore>) -> std::io::Result<()> {
    let state = web::Data::new(AppState::new(store, &config));

    tracing::info!("server running at http://{}:{}", config.bind_address, config.port);
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(middleware::Logger::default())
            .configure(configure)
    })
    .bind((config.bind_address.clone(), config.port))?
    .run()
    .await
}

fn main() {
    elevlog::init_logging();

    let args: Vec<String> = env::args().collect();
    let program = args[0].clone();

    let mut opts = Options::new();
    opts.optopt("p", "port", "port to listen on", "PORT");
    opts.optopt("b", "bind", "address to listen on", "ADDR");
    opts.optflag("", "memory", "keep logs in memory instead of Postgres");
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

    let mut config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!(error = %err, "invalid configuration");
            process::exit(1);
        }
    };
    if let Some(port) = matches.opt_str("p") {
        config.port = match parse_port(&port) {
            Ok(port) => port,
            Err(err) => {
                tracing::error!(error = %err, "invalid configuration");
                process::exit(1);
            }
        };
    }
    if let Some(bind) = matches.opt_str("b") {
        config.bind_address = bind;
    }

    let store: Arc<dyn LogStore> = if matches.opt_present("memory") {
        tracing::warn!("keeping logs in memory, they are lost on exit");
        Arc::new(MemoryLogStore::new())
    } else {
        let database = match config.database() {
            Ok(database) => database,
            Err(err) => {
                tracing::error!(error = %err, "invalid configuration");
                process::exit(1);
            }
        };
        match establish_pool(&database) {
            Ok(pool) => Arc::new(PgLogStore::new(pool)),
            Err(err) => {
                tracing::error!(error = %err, "failed to connect to database");
                process::exit(1);
            }
        }
    };

    if let Err(err) = actix_web::rt::System::new().block_on(serve(config, store)) {
        tracing::error!(error = %err, "server stopped");
        process::exit(1);
    }
}
