pub mod auth;
pub mod http;
pub mod logging;

use clap::{
    builder::styling::{AnsiColor, Effects, Styles},
    Arg, ColorChoice, Command,
};

pub const ARG_PORT: &str = "port";
pub const ARG_DSN: &str = "dsn";

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    let command = Command::new("portero")
        .about("Registration and login with cookie sessions")
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .arg(
            Arg::new(ARG_PORT)
                .short('p')
                .long("port")
                .help("Port to listen on")
                .default_value("3000")
                .env("PORTERO_PORT")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new(ARG_DSN)
                .short('d')
                .long("dsn")
                .help("SQLite connection string")
                .env("PORTERO_DSN")
                .default_value("sqlite://auth.db?mode=rwc"),
        );

    let command = auth::with_args(command);
    let command = http::with_args(command);
    logging::with_args(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENV_VARS: [&str; 14] = [
        "PORTERO_PORT",
        "PORTERO_DSN",
        "PORTERO_SESSION_SECRET",
        "PORTERO_ENV",
        "PORTERO_IDENTIFIER_KIND",
        "PORTERO_MIN_PASSWORD_LENGTH",
        "PORTERO_BCRYPT_COST",
        "PORTERO_SESSION_TTL_SECONDS",
        "PORTERO_LOGIN_REDIRECT",
        "PORTERO_PUBLIC_DIR",
        "PORTERO_EXPOSE_USERS",
        "PORTERO_ALLOWED_ORIGIN",
        "PORTERO_LOG_LEVEL",
        "OTEL_EXPORTER_OTLP_ENDPOINT",
    ];

    // Run with every PORTERO_* variable unset
    fn with_clean_env<F, R>(f: F) -> R
    where
        F: FnOnce() -> R,
    {
        temp_env::with_vars(ENV_VARS.map(|key| (key, None::<&str>)), f)
    }

    #[test]
    fn test_new() {
        let command = new();

        assert_eq!(command.get_name(), "portero");
        assert_eq!(
            command.get_about().map(ToString::to_string),
            Some("Registration and login with cookie sessions".to_string())
        );
        assert_eq!(
            command.get_version().map(ToString::to_string),
            Some(env!("CARGO_PKG_VERSION").to_string())
        );
    }

    #[test]
    fn test_defaults() -> Result<(), Box<dyn std::error::Error>> {
        with_clean_env(|| {
            let matches =
                new().try_get_matches_from(["portero", "--session-secret", "s3cret"])?;

            assert_eq!(matches.get_one::<u16>(ARG_PORT).copied(), Some(3000));
            assert_eq!(
                matches.get_one::<String>(ARG_DSN).cloned(),
                Some("sqlite://auth.db?mode=rwc".to_string())
            );
            assert_eq!(
                matches.get_one::<String>(auth::ARG_ENVIRONMENT).cloned(),
                Some("development".to_string())
            );
            assert_eq!(
                matches.get_one::<String>(auth::ARG_IDENTIFIER_KIND).cloned(),
                Some("email".to_string())
            );
            assert_eq!(
                matches.get_one::<u16>(auth::ARG_MIN_PASSWORD_LENGTH).copied(),
                Some(6)
            );
            assert_eq!(matches.get_one::<u32>(auth::ARG_BCRYPT_COST).copied(), Some(10));
            assert_eq!(
                matches.get_one::<i64>(auth::ARG_SESSION_TTL_SECONDS).copied(),
                Some(604_800)
            );
            assert_eq!(matches.get_one::<String>(auth::ARG_LOGIN_REDIRECT), None);
            assert_eq!(matches.get_one::<bool>(http::ARG_EXPOSE_USERS), None);
            assert_eq!(
                matches.get_one::<String>(http::ARG_PUBLIC_DIR).cloned(),
                Some("public".to_string())
            );
            Ok(())
        })
    }

    #[test]
    fn test_session_secret_required() {
        with_clean_env(|| {
            let result = new().try_get_matches_from(["portero"]);
            assert_eq!(
                result.map_err(|e| e.kind()).err(),
                Some(clap::error::ErrorKind::MissingRequiredArgument)
            );
        });
    }

    #[test]
    fn test_check_args() -> Result<(), Box<dyn std::error::Error>> {
        with_clean_env(|| {
            let matches = new().try_get_matches_from([
                "portero",
                "--port",
                "8080",
                "--dsn",
                "sqlite::memory:",
                "--session-secret",
                "s3cret",
                "--environment",
                "production",
                "--identifier-kind",
                "username",
                "--expose-users",
                "--allowed-origin",
                "https://app.example.com",
            ])?;

            assert_eq!(matches.get_one::<u16>(ARG_PORT).copied(), Some(8080));
            assert_eq!(
                matches.get_one::<String>(ARG_DSN).cloned(),
                Some("sqlite::memory:".to_string())
            );
            assert_eq!(
                matches.get_one::<String>(auth::ARG_ENVIRONMENT).cloned(),
                Some("production".to_string())
            );
            assert_eq!(
                matches.get_one::<String>(auth::ARG_IDENTIFIER_KIND).cloned(),
                Some("username".to_string())
            );
            assert_eq!(matches.get_one::<bool>(http::ARG_EXPOSE_USERS).copied(), Some(true));
            assert_eq!(
                matches.get_one::<String>(http::ARG_ALLOWED_ORIGIN).cloned(),
                Some("https://app.example.com".to_string())
            );
            Ok(())
        })
    }

    #[test]
    fn test_check_env() {
        temp_env::with_vars(
            [
                ("PORTERO_PORT", Some("443")),
                ("PORTERO_DSN", Some("sqlite:///var/lib/portero/auth.db")),
                ("PORTERO_SESSION_SECRET", Some("from-env")),
                ("PORTERO_ENV", Some("production")),
                ("PORTERO_BCRYPT_COST", Some("12")),
                ("PORTERO_EXPOSE_USERS", Some("false")),
                ("PORTERO_LOGIN_REDIRECT", Some("https://shop.example.com")),
                ("PORTERO_LOG_LEVEL", Some("info")),
            ],
            || {
                let matches = new().get_matches_from(vec!["portero"]);
                assert_eq!(matches.get_one::<u16>(ARG_PORT).copied(), Some(443));
                assert_eq!(
                    matches.get_one::<String>(ARG_DSN).cloned(),
                    Some("sqlite:///var/lib/portero/auth.db".to_string())
                );
                assert_eq!(
                    matches.get_one::<String>(auth::ARG_SESSION_SECRET).cloned(),
                    Some("from-env".to_string())
                );
                assert_eq!(matches.get_one::<u32>(auth::ARG_BCRYPT_COST).copied(), Some(12));
                assert_eq!(
                    matches.get_one::<bool>(http::ARG_EXPOSE_USERS).copied(),
                    Some(false)
                );
                assert_eq!(
                    matches.get_one::<String>(auth::ARG_LOGIN_REDIRECT).cloned(),
                    Some("https://shop.example.com".to_string())
                );
                assert_eq!(
                    matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                    Some(2)
                );
            },
        );
    }

    #[test]
    fn test_rejects_out_of_range_values() {
        with_clean_env(|| {
            for (flag, value) in [
                ("--bcrypt-cost", "3"),
                ("--bcrypt-cost", "32"),
                ("--min-password-length", "0"),
                ("--session-ttl-seconds", "0"),
                ("--environment", "staging"),
                ("--identifier-kind", "phone"),
            ] {
                let result =
                    new().try_get_matches_from(["portero", "--session-secret", "s", flag, value]);
                assert!(result.is_err(), "{flag} {value} should be rejected");
            }
        });
    }

    #[test]
    fn test_check_log_level_env() {
        // loop cover all possible value_parse
        let levels = ["error", "warn", "info", "debug", "trace"];
        for (index, &level) in levels.iter().enumerate() {
            temp_env::with_vars(
                [
                    ("PORTERO_LOG_LEVEL", Some(level)),
                    ("PORTERO_SESSION_SECRET", Some("s3cret")),
                ],
                || {
                    let matches = new().get_matches_from(vec!["portero"]);
                    assert_eq!(
                        matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                        u8::try_from(index).ok()
                    );
                },
            );
        }
    }

    #[test]
    fn test_check_log_level_verbosity() {
        let levels = ["error", "warn", "info", "debug", "trace"];
        for (index, _) in levels.iter().enumerate() {
            temp_env::with_vars([("PORTERO_LOG_LEVEL", None::<String>)], || {
                let mut args = vec![
                    "portero".to_string(),
                    "--session-secret".to_string(),
                    "s3cret".to_string(),
                ];

                // Add the appropriate number of "-v" flags based on the index
                if index > 0 {
                    args.push(format!("-{}", "v".repeat(index)));
                }

                let matches = new().get_matches_from(args);

                assert_eq!(
                    matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                    u8::try_from(index).ok()
                );
            });
        }
    }
}
