//! tastycart server
//!
//! Storefront backend: checkout orders, Razorpay payment verification,
//! refund webhooks, accounts, coupons, feedback and the admin panel API.

mod api;
mod config;
mod server;
mod shutdown;
mod state;

use anyhow::Context;
use clap::Parser;
use config::{ConfigLoader, get_database_url, hash_password};
use server::{build_router, run_server};
use shutdown::spawn_config_reload_handler;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use state::AppState;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const MAX_DB_CONNECTIONS: u32 = 10;

/// tastycart: storefront order and payment backend
#[derive(Parser, Debug)]
#[command(name = "tastycart-server")]
#[command(version, about, long_about = None)]
struct Args {
    /// TOML config file; reloaded on SIGHUP
    #[arg(short, long, default_value = "./tastycart.toml")]
    config: PathBuf,

    /// Listen address, overriding `server.listen`
    #[arg(short, long)]
    listen: Option<SocketAddr>,

    /// Apply pending schema migrations before serving
    #[arg(long)]
    migrate: bool,

    /// Print the argon2 hash of an admin password and exit
    #[arg(long, value_name = "PLAINTEXT", env = "TASTYCART_ADMIN_PASSWORD")]
    hash_password: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = Args::parse();

    if let Some(plaintext) = args.hash_password.as_deref() {
        println!("{}", hash_password(plaintext)?);
        return Ok(());
    }

    let loader = Arc::new(ConfigLoader::new(&args.config, args.listen));
    let loaded = loader
        .load()
        .with_context(|| format!("loading {}", args.config.display()))?;
    let listen = loaded.server.listen;
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = ?loaded.server.environment,
        config = %args.config.display(),
        "tastycart-server starting"
    );

    let pool = open_pool(args.migrate).await?;
    let state = AppState::new(pool.clone(), loaded.into_shared());
    let reload_stop = spawn_config_reload_handler(state.clone(), loader);

    let served = run_server(build_router(state), listen).await;

    reload_stop.notify_one();
    pool.close().await;
    tracing::info!("tastycart-server stopped");
    served.context("HTTP server failed")
}

/// Connect to `DATABASE_URL` and optionally bring the schema up to date.
async fn open_pool(migrate: bool) -> anyhow::Result<PgPool> {
    let url = get_database_url()?;
    let pool = PgPoolOptions::new()
        .max_connections(MAX_DB_CONNECTIONS)
        .connect(&url)
        .await
        .context("connecting to the database")?;

    if migrate {
        sqlx::migrate!("../migrations")
            .run(&pool)
            .await
            .context("running migrations")?;
        tracing::info!("Schema migrations applied");
    }
    Ok(pool)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn,tower_http=debug"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
