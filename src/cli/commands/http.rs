use clap::{Arg, Command};

pub const ARG_PUBLIC_DIR: &str = "public-dir";
pub const ARG_EXPOSE_USERS: &str = "expose-users";
pub const ARG_ALLOWED_ORIGIN: &str = "allowed-origin";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_PUBLIC_DIR)
                .long(ARG_PUBLIC_DIR)
                .help("Directory with static files served for unmatched paths")
                .env("PORTERO_PUBLIC_DIR")
                .default_value("public"),
        )
        .arg(
            Arg::new(ARG_EXPOSE_USERS)
                .long(ARG_EXPOSE_USERS)
                .help("Serve GET /users (default: enabled outside production)")
                .env("PORTERO_EXPOSE_USERS")
                .num_args(0..=1)
                .default_missing_value("true")
                .value_parser(clap::value_parser!(bool)),
        )
        .arg(
            Arg::new(ARG_ALLOWED_ORIGIN)
                .long(ARG_ALLOWED_ORIGIN)
                .help("Browser origin allowed to call the API with credentials")
                .env("PORTERO_ALLOWED_ORIGIN"),
        )
}
