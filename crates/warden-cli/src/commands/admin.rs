//! Administrator bootstrap commands.

use clap::{Args, Subcommand};

use warden_auth::{PasswordHasher, PasswordValidator};
use warden_core::error::AppError;
use warden_entity::role::CreateRole;
use warden_entity::user::CreateUser;

use crate::output;

/// Arguments for admin commands
#[derive(Debug, Args)]
pub struct AdminArgs {
    /// Admin subcommand
    #[command(subcommand)]
    pub command: AdminCommand,
}

/// Admin subcommands
#[derive(Debug, Subcommand)]
pub enum AdminCommand {
    /// Create the administrator role (if missing) and an administrator account
    Create {
        /// Username
        #[arg(short, long)]
        username: Option<String>,
        /// Email
        #[arg(short, long)]
        email: Option<String>,
        /// Password (will prompt if not provided)
        #[arg(short, long)]
        password: Option<String>,
    },
}

/// Execute admin commands
pub async fn execute(args: &AdminArgs, env: &str) -> Result<(), AppError> {
    let config = super::load_config(env)?;
    let (pool, stores) = super::connect(&config).await?;

    match &args.command {
        AdminCommand::Create {
            username,
            email,
            password,
        } => {
            let username = match username {
                Some(u) => u.clone(),
                None => dialoguer::Input::new()
                    .with_prompt("Admin username")
                    .interact_text()
                    .map_err(super::input_error)?,
            };

            let email = match email {
                Some(e) => e.clone(),
                None => dialoguer::Input::new()
                    .with_prompt("Admin email")
                    .interact_text()
                    .map_err(super::input_error)?,
            };

            let password = match password {
                Some(p) => p.clone(),
                None => dialoguer::Password::new()
                    .with_prompt("Admin password")
                    .with_confirmation("Confirm password", "Passwords do not match")
                    .interact()
                    .map_err(super::input_error)?,
            };

            PasswordValidator::new(&config.auth).validate(&password, &[username.as_str(), email.as_str()])?;
            let password_hash = PasswordHasher::new().hash(&password)?;

            let role = match stores.roles.find_by_name(&config.auth.admin_role).await? {
                Some(role) => role,
                None => {
                    let role = stores
                        .roles
                        .create(&CreateRole {
                            name: config.auth.admin_role.clone(),
                            description: Some("Full administrative access".to_string()),
                        })
                        .await?;
                    output::print_success(&format!("Role '{}' created", role.name));
                    role
                }
            };

            let user = stores
                .users
                .create(&CreateUser {
                    username: username.clone(),
                    email: email.to_lowercase(),
                    password_hash,
                    first_name: username.clone(),
                    last_name: String::new(),
                    role_id: role.id,
                })
                .await?;

            output::print_success(&format!(
                "Admin user '{}' created (id: {})",
                user.username, user.id
            ));
        }
    }

    pool.close().await;
    Ok(())
}
