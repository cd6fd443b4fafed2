use sqlx::PgPool;
use tracing::{info, warn};

use crate::{
    auth::password::hash_password,
    config::{AppConfig, BootstrapAccount},
    users::{
        model::{Role, User},
        repo::NewUser,
    },
};

/// Provision the configured break-glass accounts once at startup, keeping
/// them out of the per-request authentication path. Existing accounts are
/// left untouched.
pub async fn provision_accounts(db: &PgPool, config: &AppConfig) -> anyhow::Result<()> {
    if let Some(account) = &config.bootstrap_admin {
        provision(db, account, Role::Admin).await?;
    }
    if let Some(account) = &config.bootstrap_manager {
        provision(db, account, Role::Manager).await?;
    }
    Ok(())
}

async fn provision(db: &PgPool, account: &BootstrapAccount, role: Role) -> anyhow::Result<()> {
    if User::find_by_email(db, &account.email).await?.is_some() {
        return Ok(());
    }
    let hash = hash_password(&account.password)?;
    match User::create(
        db,
        NewUser {
            name: &account.name,
            email: &account.email,
            password_hash: Some(&hash),
            google_id: None,
            picture: None,
            is_google_sign_in: false,
            role,
        },
    )
    .await
    {
        Ok(user) => {
            info!(user_id = %user.id, email = %user.email, role = %role, "bootstrap account provisioned");
            Ok(())
        }
        Err(e) if crate::error::is_unique_violation(&e) => {
            // Another instance provisioned it first
            warn!(email = %account.email, "bootstrap account already exists");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
