use crate::{
    auth::IdentifierKind,
    cli::{
        actions::{server::Args, Action},
        commands::{auth, http, ARG_DSN, ARG_PORT},
    },
};
use anyhow::{anyhow, Context, Result};
use secrecy::SecretString;
use std::path::PathBuf;

/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>(ARG_PORT).copied().unwrap_or(3000);
    let dsn = matches
        .get_one::<String>(ARG_DSN)
        .cloned()
        .context("missing required argument: --dsn")?;

    let session_secret = matches
        .get_one::<String>(auth::ARG_SESSION_SECRET)
        .filter(|secret| !secret.is_empty())
        .map(|secret| SecretString::from(secret.clone()))
        .context("missing required argument: --session-secret")?;

    let production = matches
        .get_one::<String>(auth::ARG_ENVIRONMENT)
        .is_some_and(|env| env == "production");

    let identifier_kind = matches
        .get_one::<String>(auth::ARG_IDENTIFIER_KIND)
        .map_or(Ok(IdentifierKind::default()), |kind| kind.parse())
        .map_err(|err| anyhow!(err))?;

    let min_password_length = matches
        .get_one::<u16>(auth::ARG_MIN_PASSWORD_LENGTH)
        .copied()
        .map_or(crate::auth::DEFAULT_MIN_PASSWORD_LENGTH, usize::from);

    let bcrypt_cost = matches
        .get_one::<u32>(auth::ARG_BCRYPT_COST)
        .copied()
        .unwrap_or(crate::auth::DEFAULT_BCRYPT_COST);

    let session_ttl_seconds = matches
        .get_one::<i64>(auth::ARG_SESSION_TTL_SECONDS)
        .copied()
        .unwrap_or(crate::auth::DEFAULT_SESSION_TTL_SECONDS);

    let expose_users = matches
        .get_one::<bool>(http::ARG_EXPOSE_USERS)
        .copied()
        .unwrap_or(!production);

    Ok(Action::Server(Args {
        port,
        dsn,
        session_secret,
        production,
        identifier_kind,
        min_password_length,
        bcrypt_cost,
        session_ttl_seconds,
        login_redirect: matches.get_one::<String>(auth::ARG_LOGIN_REDIRECT).cloned(),
        public_dir: matches
            .get_one::<String>(http::ARG_PUBLIC_DIR)
            .map_or_else(|| PathBuf::from("public"), PathBuf::from),
        expose_users,
        allowed_origin: matches.get_one::<String>(http::ARG_ALLOWED_ORIGIN).cloned(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands;
    use secrecy::ExposeSecret;

    fn server_args(args: &[&str]) -> Result<Args> {
        let mut argv = vec!["portero", "--session-secret", "s3cret"];
        argv.extend_from_slice(args);
        let matches = temp_env::with_vars(
            [
                ("PORTERO_ENV", None::<&str>),
                ("PORTERO_EXPOSE_USERS", None::<&str>),
                ("PORTERO_IDENTIFIER_KIND", None::<&str>),
                ("PORTERO_MIN_PASSWORD_LENGTH", None::<&str>),
            ],
            || commands::new().try_get_matches_from(argv),
        )?;
        match handler(&matches)? {
            Action::Server(args) => Ok(args),
        }
    }

    #[test]
    fn development_defaults() -> Result<()> {
        let args = server_args(&[])?;
        assert!(!args.production);
        assert!(args.expose_users);
        assert_eq!(args.identifier_kind, IdentifierKind::Email);
        assert_eq!(args.min_password_length, 6);
        assert_eq!(args.session_secret.expose_secret(), "s3cret");
        Ok(())
    }

    #[test]
    fn production_hides_users_by_default() -> Result<()> {
        let args = server_args(&["--environment", "production"])?;
        assert!(args.production);
        assert!(!args.expose_users);

        let args = server_args(&["--environment", "production", "--expose-users"])?;
        assert!(args.expose_users);
        Ok(())
    }

    #[test]
    fn parses_identifier_kind_and_policy() -> Result<()> {
        let args = server_args(&["--identifier-kind", "username", "--min-password-length", "10"])?;
        assert_eq!(args.identifier_kind, IdentifierKind::Username);
        assert_eq!(args.min_password_length, 10);
        Ok(())
    }

    #[test]
    fn empty_secret_is_rejected() -> Result<()> {
        let matches = temp_env::with_vars([("PORTERO_SESSION_SECRET", None::<&str>)], || {
            commands::new().try_get_matches_from(["portero", "--session-secret", ""])
        })?;
        assert!(handler(&matches).is_err());
        Ok(())
    }
}
