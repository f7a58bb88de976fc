//! User management CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use warden_auth::SessionAuthority;
use warden_core::error::AppError;
use warden_core::types::pagination::{MAX_PAGE_SIZE, PageRequest};
use warden_entity::user::{User, UserFilter};

use crate::output::{self, OutputFormat};

/// Arguments for user commands
#[derive(Debug, Args)]
pub struct UserArgs {
    /// User subcommand
    #[command(subcommand)]
    pub command: UserCommand,
}

/// User subcommands
#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// List users
    List {
        /// Substring match over username, email and names
        #[arg(short, long)]
        search: Option<String>,
        /// Page number
        #[arg(long, default_value_t = 1)]
        page: u64,
    },
    /// Enable a user
    Enable {
        /// Email address
        email: String,
    },
    /// Disable a user and end their sessions
    Disable {
        /// Email address
        email: String,
    },
}

/// User display row for table output
#[derive(Debug, Serialize, Tabled)]
struct UserRow {
    id: i64,
    username: String,
    email: String,
    role: String,
    status: String,
    last_login: String,
}

impl From<User> for UserRow {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
            role: u.role_name,
            status: if u.is_active { "active" } else { "disabled" }.to_string(),
            last_login: u
                .last_login
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "-".to_string()),
        }
    }
}

/// Execute user commands
pub async fn execute(args: &UserArgs, env: &str, format: OutputFormat) -> Result<(), AppError> {
    let config = super::load_config(env)?;
    let (pool, stores) = super::connect(&config).await?;

    match &args.command {
        UserCommand::List { search, page } => {
            let filter = UserFilter {
                search: search.clone(),
                ..UserFilter::default()
            };
            let result = stores
                .users
                .list(&filter, &PageRequest::new(*page, MAX_PAGE_SIZE))
                .await?;
            let rows: Vec<UserRow> = result.items.into_iter().map(UserRow::from).collect();
            output::print_list(&rows, format);
            if format == OutputFormat::Table {
                println!(
                    "Page {} of {} ({} users)",
                    result.page, result.total_pages, result.total_items
                );
            }
        }
        UserCommand::Enable { email } => {
            let user = find_by_email(&stores, email).await?;
            stores.users.set_active(user.id, true).await?;
            output::print_success(&format!("User '{}' enabled", user.username));
        }
        UserCommand::Disable { email } => {
            let user = find_by_email(&stores, email).await?;
            stores.users.set_active(user.id, false).await?;
            let authority = SessionAuthority::new(stores.clone(), &config.auth, &config.session);
            let ended = authority.expire_all_for_user(user.id).await?;
            output::print_success(&format!(
                "User '{}' disabled ({ended} session(s) ended)",
                user.username
            ));
        }
    }

    pool.close().await;
    Ok(())
}

async fn find_by_email(stores: &warden_database::Stores, email: &str) -> Result<User, AppError> {
    stores
        .users
        .find_by_email(email)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User '{email}' not found")))
}
