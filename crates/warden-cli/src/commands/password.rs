//! Password hashing helper.

use clap::Args;

use warden_auth::PasswordHasher;
use warden_core::error::AppError;

/// Arguments for the hash-password command
#[derive(Debug, Args)]
pub struct HashPasswordArgs {
    /// Password to hash (will prompt if not provided)
    #[arg(short, long)]
    pub password: Option<String>,
}

/// Print the Argon2id hash of a password
pub fn execute(args: &HashPasswordArgs) -> Result<(), AppError> {
    let password = match &args.password {
        Some(p) => p.clone(),
        None => dialoguer::Password::new()
            .with_prompt("Password")
            .interact()
            .map_err(super::input_error)?,
    };

    println!("{}", PasswordHasher::new().hash(&password)?);
    Ok(())
}
