use oredb::aof::{AofConfig, AofReader, AofWriter};
use oredb::dispatch::Dispatcher;
use oredb::server;
use oredb::store::{start_sweeper, Keyspace};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};

/// Server configuration: the listen address and the command-log location.
struct Config {
    addr: String,
    log: AofConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            addr: "127.0.0.1:6379".to_string(),
            log: AofConfig::default(),
        }
    }
}

impl Config {
    /// Parse configuration from command-line arguments
    fn from_args() -> Self {
        let mut config = Config::default();
        let args: Vec<String> = std::env::args().collect();

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--addr" | "-a" => {
                    config.addr = Self::value_of(&args, i, "--addr");
                    i += 2;
                }
                "--log-file" => {
                    config.log.path = PathBuf::from(Self::value_of(&args, i, "--log-file"));
                    i += 2;
                }
                "--no-log" => {
                    config.log.enabled = false;
                    i += 1;
                }
                "--help" => {
                    print_help();
                    std::process::exit(0);
                }
                other => {
                    eprintln!("Unknown argument: {}", other);
                    print_help();
                    std::process::exit(1);
                }
            }
        }

        config
    }

    fn value_of(args: &[String], i: usize, flag: &str) -> String {
        match args.get(i + 1) {
            Some(value) => value.clone(),
            None => {
                eprintln!("Error: {} requires a value", flag);
                std::process::exit(1);
            }
        }
    }
}

fn print_help() {
    println!(
        r#"oredb - an in-memory multi-type key-value server

USAGE:
    oredb [OPTIONS]

OPTIONS:
    -a, --addr <HOST:PORT>    Listen address (default: 127.0.0.1:6379)
        --log-file <PATH>     Command log location (default: oredb.aof)
        --no-log              Disable the command log
        --help                Print this help message
"#
    );
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let config = Config::from_args();
    info!("oredb starting");

    let keyspace = Arc::new(Keyspace::new());

    let dispatcher = if config.log.enabled {
        let recovered = if config.log.path.exists() {
            match AofReader::load(&config.log.path) {
                Ok(reader) => reader.parse_commands(),
                Err(e) => {
                    warn!("failed to read command log {:?}: {}", config.log.path, e);
                    Vec::new()
                }
            }
        } else {
            Vec::new()
        };

        let writer = match AofWriter::new(&config.log.path, config.log.sync_policy) {
            Ok(writer) => Arc::new(writer),
            Err(e) => {
                error!("failed to open command log {:?}: {}", config.log.path, e);
                std::process::exit(1);
            }
        };

        let dispatcher = Dispatcher::with_log(keyspace.clone(), writer);
        if !recovered.is_empty() {
            let applied = dispatcher.replay(recovered);
            info!("replayed {} commands from {:?}", applied, config.log.path);
        }
        dispatcher
    } else {
        Dispatcher::new(keyspace.clone())
    };
    let dispatcher = Arc::new(dispatcher);

    let sweeper = start_sweeper(keyspace);

    tokio::select! {
        result = server::run(&config.addr, dispatcher) => {
            if let Err(e) = result {
                error!("server error: {}", e);
            }
        }
        _ = signal::ctrl_c() => {
            info!("shutdown signal received");
        }
    }

    sweeper.abort();
    info!("oredb stopped");
}
