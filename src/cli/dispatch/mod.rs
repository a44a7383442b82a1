//! Maps parsed CLI arguments to the action the binary runs.

use crate::cli::actions::{Action, server::Args};
use crate::cli::commands::{ARG_PORT, auth, store};
use anyhow::{Context, Result};

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches
        .get_one::<u16>(ARG_PORT)
        .copied()
        .context("missing required argument: --port")?;

    let auth_opts = auth::Options::parse(matches)?;
    let store_opts = store::Options::parse(matches);

    Ok(Action::Server(Args {
        port,
        users_file: store_opts.users_file,
        frontend_base_url: auth_opts.frontend_base_url,
        session_ttl_seconds: auth_opts.session_ttl_seconds,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn server_action_from_env() -> Result<()> {
        temp_env::with_vars(
            [
                ("ACCESSO_PORT", Some("9000")),
                ("ACCESSO_USERS_FILE", Some("/tmp/accesso-users.json")),
                ("ACCESSO_FRONTEND_BASE_URL", Some("https://app.accesso.dev")),
                ("ACCESSO_SESSION_TTL_SECONDS", Some("120")),
            ],
            || {
                let matches = crate::cli::commands::new().get_matches_from(vec!["accesso"]);
                let Action::Server(args) = handler(&matches)?;
                assert_eq!(args.port, 9000);
                assert_eq!(
                    args.users_file,
                    Some(PathBuf::from("/tmp/accesso-users.json"))
                );
                assert_eq!(args.frontend_base_url, "https://app.accesso.dev");
                assert_eq!(args.session_ttl_seconds, 120);
                Ok(())
            },
        )
    }

    #[test]
    fn server_action_defaults_to_memory_store() -> Result<()> {
        temp_env::with_vars(
            [
                ("ACCESSO_PORT", None::<&str>),
                ("ACCESSO_USERS_FILE", None),
                ("ACCESSO_FRONTEND_BASE_URL", None),
                ("ACCESSO_SESSION_TTL_SECONDS", None),
            ],
            || {
                let matches = crate::cli::commands::new().get_matches_from(vec!["accesso"]);
                let Action::Server(args) = handler(&matches)?;
                assert_eq!(args.port, 3000);
                assert!(args.users_file.is_none());
                assert_eq!(args.session_ttl_seconds, 43_200);
                Ok(())
            },
        )
    }
}
