use crate::{
    api::{self, RouterConfig},
    auth::{AuthConfig, AuthService, IdentifierKind, SessionKeys},
    store::UserStore,
};
use anyhow::{Context, Result};
use secrecy::{ExposeSecret, SecretString};
use std::{path::PathBuf, sync::Arc};
use tracing::info;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub dsn: String,
    pub session_secret: SecretString,
    pub production: bool,
    pub identifier_kind: IdentifierKind,
    pub min_password_length: usize,
    pub bcrypt_cost: u32,
    pub session_ttl_seconds: i64,
    pub login_redirect: Option<String>,
    pub public_dir: PathBuf,
    pub expose_users: bool,
    pub allowed_origin: Option<String>,
}

impl Args {
    fn auth_config(&self) -> AuthConfig {
        AuthConfig::new()
            .with_identifier_kind(self.identifier_kind)
            .with_min_password_length(self.min_password_length)
            .with_bcrypt_cost(self.bcrypt_cost)
            .with_session_ttl_seconds(self.session_ttl_seconds)
            .with_session_cookie_secure(self.production)
            .with_login_redirect(self.login_redirect.clone())
    }

    fn router_config(&self) -> RouterConfig {
        RouterConfig::new()
            .with_public_dir(self.public_dir.clone())
            .with_expose_users(self.expose_users)
            .with_allowed_origin(self.allowed_origin.clone())
    }
}

/// Execute the server action.
/// # Errors
/// Returns an error if the database cannot be opened or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    log_startup_args(&args);

    let store = UserStore::connect(&args.dsn).await?;
    store
        .migrate()
        .await
        .context("Could not prepare the users table")?;

    let keys = SessionKeys::new(args.session_secret.expose_secret().as_bytes());
    let auth = Arc::new(AuthService::new(args.auth_config(), keys, store));

    api::new(args.port, auth, args.router_config()).await
}

fn log_startup_args(args: &Args) {
    let entries = [
        ("listen", format!("tcp:{}", args.port)),
        ("dsn", args.dsn.clone()),
        (
            "environment",
            if args.production {
                "production".to_string()
            } else {
                "development".to_string()
            },
        ),
        ("identifier_kind", args.identifier_kind.to_string()),
        ("min_password_length", args.min_password_length.to_string()),
        ("bcrypt_cost", args.bcrypt_cost.to_string()),
        ("session_ttl_seconds", args.session_ttl_seconds.to_string()),
        (
            "login_redirect",
            args.login_redirect
                .clone()
                .unwrap_or_else(|| "none".to_string()),
        ),
        ("public_dir", args.public_dir.display().to_string()),
        ("expose_users", args.expose_users.to_string()),
        (
            "allowed_origin",
            args.allowed_origin
                .clone()
                .unwrap_or_else(|| "none".to_string()),
        ),
    ];
    info!("{}", startup_message(&entries));
}

fn startup_message(entries: &[(&str, String)]) -> String {
    let max_key_len = entries.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
    let mut message = format!(
        "portero {} - {}\n\nStartup configuration:",
        env!("CARGO_PKG_VERSION"),
        short_commit(crate::GIT_COMMIT_HASH)
    );
    for (key, value) in entries {
        let padding = " ".repeat(max_key_len.saturating_sub(key.len()));
        let _ =
            std::fmt::Write::write_fmt(&mut message, format_args!("\n  {key}:{padding} {value}"));
    }
    message
}

fn short_commit(hash: &str) -> String {
    let trimmed = hash.trim();
    if trimmed.len() > 7 {
        trimmed[..7].to_string()
    } else {
        trimmed.to_string()
    }
}
