//! CLI command definitions and dispatch.

pub mod admin;
pub mod migrate;
pub mod password;
pub mod session;
pub mod user;

use clap::{Parser, Subcommand};

use warden_core::config::AppConfig;
use warden_core::error::AppError;
use warden_database::{DatabasePool, Stores};

use crate::output::OutputFormat;

/// Warden: role-based access control and session management
#[derive(Debug, Parser)]
#[command(name = "warden", version, about, long_about = None)]
pub struct Cli {
    /// Configuration environment (loads config/default.toml then config/<env>.toml)
    #[arg(short, long, env = "WARDEN_ENV", default_value = "development")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// Bootstrap the administrator role and account
    Admin(admin::AdminArgs),
    /// User management
    User(user::UserArgs),
    /// Session management
    Session(session::SessionArgs),
    /// Hash a password for manual seeding
    HashPassword(password::HashPasswordArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        match &self.command {
            Commands::Migrate(args) => migrate::execute(args, &self.env).await,
            Commands::Admin(args) => admin::execute(args, &self.env).await,
            Commands::User(args) => user::execute(args, &self.env, self.format).await,
            Commands::Session(args) => session::execute(args, &self.env, self.format).await,
            Commands::HashPassword(args) => password::execute(args),
        }
    }
}

/// Helper: load configuration for an environment
pub fn load_config(env: &str) -> Result<AppConfig, AppError> {
    AppConfig::load(env)
}

/// Helper: connect and build PostgreSQL-backed stores
pub async fn connect(config: &AppConfig) -> Result<(DatabasePool, Stores), AppError> {
    let pool = DatabasePool::connect(&config.database).await?;
    let stores = Stores::postgres(pool.pool().clone());
    Ok((pool, stores))
}

/// Helper: map a prompt failure into an application error
pub fn input_error(e: dialoguer::Error) -> AppError {
    AppError::internal(format!("Input error: {e}"))
}
