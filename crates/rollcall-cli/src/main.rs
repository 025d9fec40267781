mod shell;

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use rollcall_shell::hash_secret;
use rollcall_types::ConfigLoader;

use shell::Shell;

/// rollcall -- tutor record shell with privilege levels.
#[derive(Parser, Debug)]
#[command(name = "rollcall", version, about)]
struct Cli {
    /// Config file layered over the user and workspace files
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Run this line and exit instead of starting the prompt (repeatable)
    #[arg(long = "command", short = 'c', value_name = "LINE")]
    commands: Vec<String>,

    /// Print each result as a JSON object
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    action: Option<Action>,
}

#[derive(Subcommand, Debug)]
enum Action {
    /// Print the secret_sha256 value for an account secret
    HashSecret {
        /// The secret to hash
        secret: String,
    },
}

fn main() -> Result<()> {
    // Logs go to stderr so they never mix with command output.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    if let Some(Action::HashSecret { secret }) = &cli.action {
        println!("{}", hash_secret(secret));
        return Ok(());
    }

    let mut loader = ConfigLoader::new();
    if let Some(path) = &cli.config {
        loader = loader.with_explicit_path(path.clone());
    }
    let effective = loader.load().context("failed to load configuration")?;
    tracing::info!(
        files = effective.source_files.len(),
        accounts = effective.config.accounts.len(),
        seed = effective.config.seed.len(),
        "configuration loaded"
    );

    let mut shell = Shell::from_config(&effective.config, cli.json)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if cli.commands.is_empty() {
        let stdin = io::stdin();
        shell.run_interactive(stdin.lock(), &mut out, &effective.config.prompt)
    } else {
        shell.run_script(&cli.commands, &mut out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn cli_parse_defaults() {
        let cli = Cli::try_parse_from(["rollcall"]);
        assert!(cli.is_ok(), "should parse with no arguments: {cli:?}");
        let cli = cli.unwrap();
        assert!(cli.config.is_none());
        assert!(cli.commands.is_empty());
        assert!(!cli.json);
        assert!(cli.action.is_none());
    }

    #[test]
    fn cli_parse_repeated_commands() {
        let cli = Cli::try_parse_from([
            "rollcall",
            "--config",
            "tutor.toml",
            "--command",
            "login u/amy pw/secret",
            "-c",
            "list",
        ]);
        assert!(cli.is_ok(), "should parse scripted mode: {cli:?}");
        let cli = cli.unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("tutor.toml")));
        assert_eq!(cli.commands, vec!["login u/amy pw/secret", "list"]);
    }

    #[test]
    fn cli_parse_hash_secret() {
        let cli = Cli::try_parse_from(["rollcall", "hash-secret", "hunter2"]);
        assert!(cli.is_ok(), "should parse hash-secret: {cli:?}");
        match cli.unwrap().action {
            Some(Action::HashSecret { secret }) => assert_eq!(secret, "hunter2"),
            other => panic!("expected HashSecret, got {other:?}"),
        }
    }
}
