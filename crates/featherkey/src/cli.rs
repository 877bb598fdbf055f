//! Command-line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Obtain an `OAuth 1.0a` access token and secret for an account.
#[derive(Debug, Parser)]
#[command(name = "featherkey", version, about)]
pub struct Cli {
    /// Options shared by every flow.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Flow to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every flow.
#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Consumer key of the application.
    #[arg(long, env = "FEATHERKEY_CONSUMER_KEY", global = true)]
    pub consumer_key: Option<String>,

    /// Consumer secret of the application.
    #[arg(long, env = "FEATHERKEY_CONSUMER_SECRET", global = true, hide_env_values = true)]
    pub consumer_secret: Option<String>,

    /// Config file (defaults to `<config dir>/featherkey/config.json`).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Request timeout in seconds.
    #[arg(long, global = true)]
    pub timeout: Option<u64>,
}

/// Authorization flow to run.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Authorize in the browser and type back the PIN.
    Pin {
        /// Print the authorization URL instead of opening a browser.
        #[arg(long)]
        no_browser: bool,
    },
    /// Authorize in the browser and capture the redirect on a local port.
    Broker {
        /// Local port for the callback listener.
        #[arg(long, default_value_t = 8765)]
        port: u16,

        /// Callback path.
        #[arg(long, default_value = "/callback")]
        path: String,

        /// Seconds to wait for the redirect.
        #[arg(long, default_value_t = 300)]
        wait: u64,
    },
    /// Exchange a username and password directly (xAuth).
    Xauth {
        /// Account username.
        #[arg(long)]
        username: String,

        /// Account password; prompted for when absent.
        #[arg(long, env = "FEATHERKEY_XAUTH_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_broker_defaults() {
        let cli = Cli::try_parse_from(["featherkey", "broker"]).unwrap();
        match cli.command {
            Command::Broker { port, path, wait } => {
                assert_eq!(port, 8765);
                assert_eq!(path, "/callback");
                assert_eq!(wait, 300);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_xauth() {
        let cli = Cli::try_parse_from([
            "featherkey",
            "--consumer-key",
            "ck",
            "xauth",
            "--username",
            "bob",
            "--password",
            "pw",
        ])
        .unwrap();
        assert_eq!(cli.global.consumer_key.as_deref(), Some("ck"));
        assert!(matches!(
            cli.command,
            Command::Xauth { ref username, password: Some(_) } if username == "bob"
        ));
    }

    #[test]
    fn test_xauth_requires_username() {
        assert!(Cli::try_parse_from(["featherkey", "xauth"]).is_err());
    }
}
