use serde::Deserialize;
use tracing::warn;

use crate::config::GoogleConfig;

const TOKENINFO_URL: &str = "https://oauth2.googleapis.com/tokeninfo";

/// Identity claims extracted from a verified Google ID token.
#[derive(Debug, Clone)]
pub struct GoogleIdentity {
    pub google_id: String,
    pub email: String,
    pub name: Option<String>,
    pub picture: Option<String>,
}

/// Subset of Google's tokeninfo response we care about.
#[derive(Debug, Deserialize)]
struct TokenInfo {
    aud: String,
    sub: String,
    email: Option<String>,
    name: Option<String>,
    picture: Option<String>,
}

/// Validates Google ID tokens against the configured OAuth client id.
#[derive(Clone)]
pub struct GoogleVerifier {
    client_id: String,
    http: reqwest::Client,
}

impl GoogleVerifier {
    pub fn new(config: &GoogleConfig) -> Self {
        Self {
            client_id: config.client_id.clone(),
            http: reqwest::Client::new(),
        }
    }

    /// Sends the ID token to Google's tokeninfo endpoint, which checks the
    /// signature and expiry; we additionally verify the audience and require
    /// an email claim.
    pub async fn verify(&self, credential: &str) -> anyhow::Result<GoogleIdentity> {
        let response = self
            .http
            .get(TOKENINFO_URL)
            .query(&[("id_token", credential)])
            .send()
            .await?;

        if !response.status().is_success() {
            warn!(status = %response.status(), "google tokeninfo rejected credential");
            anyhow::bail!("Google credential verification failed");
        }

        let info: TokenInfo = response.json().await?;
        check_token_info(info, &self.client_id)
    }
}

fn check_token_info(info: TokenInfo, expected_audience: &str) -> anyhow::Result<GoogleIdentity> {
    if info.aud != expected_audience {
        anyhow::bail!("Google credential audience mismatch");
    }
    let email = match info.email {
        Some(email) if !email.is_empty() => email.trim().to_lowercase(),
        _ => anyhow::bail!("Google credential carries no email"),
    };
    Ok(GoogleIdentity {
        google_id: info.sub,
        email,
        name: info.name,
        picture: info.picture,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_info(aud: &str, email: Option<&str>) -> TokenInfo {
        TokenInfo {
            aud: aud.into(),
            sub: "10769150350006150715113082367".into(),
            email: email.map(Into::into),
            name: Some("Alice".into()),
            picture: None,
        }
    }

    #[test]
    fn accepts_matching_audience_with_email() {
        let identity =
            check_token_info(token_info("client-1", Some("Alice@X.com")), "client-1").expect("ok");
        assert_eq!(identity.email, "alice@x.com");
        assert_eq!(identity.google_id, "10769150350006150715113082367");
    }

    #[test]
    fn rejects_audience_mismatch() {
        let err = check_token_info(token_info("client-2", Some("a@x.com")), "client-1").unwrap_err();
        assert!(err.to_string().contains("audience"));
    }

    #[test]
    fn rejects_missing_email() {
        let err = check_token_info(token_info("client-1", None), "client-1").unwrap_err();
        assert!(err.to_string().contains("email"));
    }
}
