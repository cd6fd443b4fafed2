use serde::Deserialize;
use tracing::warn;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub ttl_days: i64,
}

/// Break-glass account provisioned at startup if absent.
#[derive(Debug, Clone, Deserialize)]
pub struct BootstrapAccount {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GoogleConfig {
    pub client_id: String,
    pub client_secret: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub bootstrap_admin: Option<BootstrapAccount>,
    pub bootstrap_manager: Option<BootstrapAccount>,
    pub google: Option<GoogleConfig>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;

        let secret = match std::env::var("JWT_SECRET") {
            Ok(s) if !s.is_empty() => s,
            _ => {
                warn!("JWT_SECRET not set, falling back to insecure development default");
                "dev_secret".into()
            }
        };
        let jwt = JwtConfig {
            secret,
            ttl_days: std::env::var("JWT_TTL_DAYS")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(7),
        };

        let bootstrap_admin = bootstrap_from_env("Admin", "ADMIN_EMAIL", "ADMIN_PASSWORD");
        let bootstrap_manager = bootstrap_from_env("Manager", "MANAGER_EMAIL", "MANAGER_PASSWORD");

        let google = match (
            std::env::var("GOOGLE_CLIENT_ID"),
            std::env::var("GOOGLE_CLIENT_SECRET"),
        ) {
            (Ok(client_id), Ok(client_secret)) if !client_id.is_empty() => Some(GoogleConfig {
                client_id,
                client_secret,
            }),
            _ => {
                warn!("Google credentials not configured, Google sign-in disabled");
                None
            }
        };

        Ok(Self {
            database_url,
            jwt,
            bootstrap_admin,
            bootstrap_manager,
            google,
        })
    }
}

fn bootstrap_from_env(name: &str, email_var: &str, password_var: &str) -> Option<BootstrapAccount> {
    match (std::env::var(email_var), std::env::var(password_var)) {
        (Ok(email), Ok(password)) if !email.is_empty() && !password.is_empty() => {
            Some(BootstrapAccount {
                name: name.to_string(),
                email: email.trim().to_lowercase(),
                password,
            })
        }
        _ => None,
    }
}
