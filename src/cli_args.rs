use clap::Parser;

use crate::error::ErrorVerbosity;

#[derive(Parser)]
#[command(author, about, version)]
pub struct CliArgs {
    /// API server port.
    #[clap(long, env = "PORT", default_value_t = 3001)]
    pub port: u16,

    /// Environment name reported by the healthcheck.
    #[clap(long, env = "ENV", default_value = "dev")]
    pub env: String,

    /// Postgres connection string.
    #[clap(long, env = "DATABASE_URL")]
    pub database_url: String,

    /// How much error detail responses carry.
    #[clap(long, env = "ERROR_VERBOSITY", value_enum, default_value = "message")]
    pub error_verbosity: ErrorVerbosity,
}
