use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    sync::Arc,
};

use anyhow::Context;
use clap::Parser;
use readinglist::{
    cli_args::CliArgs,
    server::{Server, ServerConfig},
    store::postgres::PgBookStore,
};
use sqlx::postgres::PgPoolOptions;

fn init_tracing() -> anyhow::Result<()> {
    tracing::subscriber::set_global_default(
        tracing_subscriber::fmt::Subscriber::builder()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .finish(),
    )
    .context("Failed to set global tracing subscriber")?;

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    if std::env::var_os("RUST_LOG").is_none() {
        std::env::set_var("RUST_LOG", "server=info,readinglist=info,tower_http=info");
    }

    init_tracing()?;

    let cli_args = CliArgs::parse();

    tracing::info!("Starting ...");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&cli_args.database_url)
        .await
        .context("Failed to connect to the database")?;

    tracing::info!("Database connection pool established");

    let store = Arc::new(PgBookStore::new(pool));

    let socket_address = SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), cli_args.port);
    let server_config = ServerConfig::new(socket_address, cli_args.env, cli_args.error_verbosity);
    let server = Server::new(server_config, store);

    server.run().await?;

    Ok(())
}
