//! Session inspection commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use warden_auth::SessionAuthority;
use warden_core::error::AppError;
use warden_entity::session::ActiveSession;

use crate::output::{self, OutputFormat};

/// Arguments for session commands
#[derive(Debug, Args)]
pub struct SessionArgs {
    /// Session subcommand
    #[command(subcommand)]
    pub command: SessionCommand,
}

/// Session subcommands
#[derive(Debug, Subcommand)]
pub enum SessionCommand {
    /// List active sessions
    List,
}

#[derive(Debug, Serialize, Tabled)]
struct SessionRow {
    id: String,
    user: String,
    ip_address: String,
    created_at: String,
    expires_at: String,
}

impl From<ActiveSession> for SessionRow {
    fn from(s: ActiveSession) -> Self {
        Self {
            id: s.id.to_string(),
            user: s.username,
            ip_address: s.ip_address.unwrap_or_else(|| "-".to_string()),
            created_at: s.created_at.format("%Y-%m-%d %H:%M").to_string(),
            expires_at: s.expires_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Execute session commands
pub async fn execute(args: &SessionArgs, env: &str, format: OutputFormat) -> Result<(), AppError> {
    let config = super::load_config(env)?;
    let (pool, stores) = super::connect(&config).await?;
    let authority = SessionAuthority::new(stores, &config.auth, &config.session);

    match &args.command {
        SessionCommand::List => {
            let rows: Vec<SessionRow> = authority
                .list_active()
                .await?
                .into_iter()
                .map(SessionRow::from)
                .collect();
            output::print_list(&rows, format);
        }
    }

    pool.close().await;
    Ok(())
}
