mod builtin;
mod gateway;
mod handler;
mod logger;
mod macros;
mod plugins;
mod signal;

use handler::Handler;

use nokari_core::config::Config;
use nokari_core::state::State;
use nokari_core::store::mem::MemStore;
use nokari_core::store::mysql::MysqlStore;
use nokari_core::store::PrefixStore;

use clap::Parser;
use serenity::client::Client;
use serenity::model::gateway::GatewayIntents;

use std::path::PathBuf;
use std::process;
use std::sync::Arc;

#[derive(Debug, Parser)]
#[clap(name = "nokari", version, about = "A Discord bot")]
struct Args {
    /// Path to the config file.
    #[clap(short, long, value_name = "FILE", default_value = "./config.toml")]
    config: PathBuf,
    /// Create the database tables and exit.
    #[clap(long)]
    init: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let config = match Config::load(&args.config) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Failed to load {}: {}", args.config.display(), err);
            process::exit(1);
        }
    };

    if let Err(err) = logger::init(&config) {
        eprintln!("Failed to install logger: {}", err);
    }

    let store: Arc<dyn PrefixStore> = match config.database.driver.as_str() {
        "mysql" => match MysqlStore::connect(&config.database.connect_string()).await {
            Ok(store) => Arc::new(store),
            Err(err) => fatal(format_args!("Failed to connect to database: {}", err)),
        },
        "memory" => Arc::new(MemStore::new()),
        driver => fatal(format_args!("Unsupported database driver: {}", driver)),
    };

    if args.init {
        log::info!("[CORE] Creating tables");

        if let Err(err) = store.create_tables().await {
            fatal(format_args!("Failed to create tables: {}", err));
        }

        return;
    }

    let token = config.token.clone();
    let message_cache_size = config.message_cache_size;
    let state = Arc::new(State::new(config, store, plugins::catalog()));

    if let Err(err) = state.load_prefixes().await {
        fatal(format_args!("Failed to load prefixes: {}", err));
    }

    log::info!("[CORE] Loading builtin commands");

    if let Err(err) = builtin::init(&state) {
        fatal(format_args!("Failed to load builtin commands: {}", err));
    }

    log::info!("[PLUGIN] Loading plugins");
    let report = state.plugins().load_all();
    log::info!(
        "[PLUGIN] Loaded {} plugins, {} failed",
        report.succeeded.len(),
        report.failed.len()
    );

    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MEMBERS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT;

    log::info!("[BOT] Connecting");

    let mut client = match Client::builder(&token, intents)
        .cache_settings(|s| s.max_messages(message_cache_size))
        .event_handler(Handler::new(state))
        .await
    {
        Ok(client) => client,
        Err(err) => fatal(format_args!("Failed to create client: {}", err)),
    };

    let shard_manager = client.shard_manager.clone();
    tokio::spawn(async move {
        signal::shutdown().await;

        log::info!("[BOT] Shutting down");
        shard_manager.lock().await.shutdown_all().await;
    });

    if let Err(err) = client.start().await {
        fatal(format_args!("Client error: {}", err));
    }
}

fn fatal(args: std::fmt::Arguments) -> ! {
    log::error!("[CORE] {}", args);
    log::error!("[CORE] Fatal error, exiting");
    process::exit(1);
}
