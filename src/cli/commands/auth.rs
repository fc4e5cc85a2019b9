use clap::{Arg, Command};

pub const ARG_SESSION_SECRET: &str = "session-secret";
pub const ARG_ENVIRONMENT: &str = "environment";
pub const ARG_IDENTIFIER_KIND: &str = "identifier-kind";
pub const ARG_MIN_PASSWORD_LENGTH: &str = "min-password-length";
pub const ARG_BCRYPT_COST: &str = "bcrypt-cost";
pub const ARG_SESSION_TTL_SECONDS: &str = "session-ttl-seconds";
pub const ARG_LOGIN_REDIRECT: &str = "login-redirect";

#[must_use]
pub fn with_args(command: Command) -> Command {
    let command = with_session_args(command);
    with_credential_args(command)
}

fn with_session_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_SESSION_SECRET)
                .long(ARG_SESSION_SECRET)
                .help("Secret used to sign session tokens")
                .env("PORTERO_SESSION_SECRET")
                .hide_env_values(true)
                .required(true),
        )
        .arg(
            Arg::new(ARG_ENVIRONMENT)
                .long(ARG_ENVIRONMENT)
                .help("Deployment environment, production marks cookies Secure")
                .env("PORTERO_ENV")
                .default_value("development")
                .value_parser(["development", "production"]),
        )
        .arg(
            Arg::new(ARG_SESSION_TTL_SECONDS)
                .long(ARG_SESSION_TTL_SECONDS)
                .help("Session cookie TTL in seconds")
                .env("PORTERO_SESSION_TTL_SECONDS")
                .default_value("604800")
                .value_parser(clap::value_parser!(i64).range(1..)),
        )
        .arg(
            Arg::new(ARG_LOGIN_REDIRECT)
                .long(ARG_LOGIN_REDIRECT)
                .help("URL returned to clients after a successful login")
                .env("PORTERO_LOGIN_REDIRECT"),
        )
}

fn with_credential_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_IDENTIFIER_KIND)
                .long(ARG_IDENTIFIER_KIND)
                .help("Kind of login identifier")
                .env("PORTERO_IDENTIFIER_KIND")
                .default_value("email")
                .value_parser(["email", "username"]),
        )
        .arg(
            Arg::new(ARG_MIN_PASSWORD_LENGTH)
                .long(ARG_MIN_PASSWORD_LENGTH)
                .help("Minimum password length in characters")
                .env("PORTERO_MIN_PASSWORD_LENGTH")
                .default_value("6")
                .value_parser(clap::value_parser!(u16).range(1..=72)),
        )
        .arg(
            Arg::new(ARG_BCRYPT_COST)
                .long(ARG_BCRYPT_COST)
                .help("bcrypt work factor")
                .env("PORTERO_BCRYPT_COST")
                .default_value("10")
                .value_parser(clap::value_parser!(u32).range(4..=31)),
        )
}
