use clap::{Arg, ArgMatches, Command};
use std::path::PathBuf;

pub const ARG_USERS_FILE: &str = "users-file";

#[derive(Debug)]
pub struct Options {
    /// JSON file backing the credential store; in-memory when absent.
    pub users_file: Option<PathBuf>,
}

impl Options {
    #[must_use]
    pub fn parse(matches: &ArgMatches) -> Self {
        Self {
            users_file: matches.get_one::<PathBuf>(ARG_USERS_FILE).cloned(),
        }
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command.arg(
        Arg::new(ARG_USERS_FILE)
            .long(ARG_USERS_FILE)
            .help("Path to the JSON users file (in-memory store when omitted)")
            .env("ACCESSO_USERS_FILE")
            .value_parser(clap::value_parser!(PathBuf)),
    )
}
