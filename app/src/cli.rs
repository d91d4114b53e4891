use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Command-line client for the artshare platform.
#[derive(Parser, Debug)]
#[command(name = "artshare", version)]
#[command(about = "Browse, upload and manage artworks on an artshare server")]
pub struct Cli {
  /// Log filter, e.g. `artshare=debug`. `RUST_LOG` takes precedence.
  #[arg(long, global = true, default_value = "artshare=info")]
  pub log: String,

  #[command(subcommand)]
  pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
  /// Create an account
  Register {
    username: String,
    email: String,
    #[arg(long, env = "ARTSHARE_PASSWORD", hide_env_values = true)]
    password: String,
    /// Defaults to `--password`
    #[arg(long)]
    confirm_password: Option<String>,
    #[arg(long)]
    bio: Option<String>,
    /// Profile picture to upload
    #[arg(long)]
    picture: Option<PathBuf>,
  },

  /// Sign in and remember the session
  Login {
    username: String,
    #[arg(long, env = "ARTSHARE_PASSWORD", hide_env_values = true)]
    password: String,
  },

  /// Forget the stored session
  Logout,

  /// Show who is signed in
  Whoami,

  #[command(subcommand)]
  Profile(ProfileCommand),

  /// List every artwork
  Gallery {
    /// Show one artwork in detail (1-based position in the listing)
    #[arg(long)]
    open: Option<usize>,
  },

  /// List the works of one artist, by id or username
  Artist { artist: String },

  /// Upload a new artwork
  Upload {
    title: String,
    image: PathBuf,
    #[arg(long)]
    description: Option<String>,
  },

  #[command(subcommand)]
  Artwork(ArtworkCommand),

  #[command(subcommand)]
  Config(ConfigCommand),
}

/// The signed-in artist's profile
#[derive(Subcommand, Debug)]
pub enum ProfileCommand {
  Show,
  /// Change username, bio or picture; omitted values are kept
  Edit {
    #[arg(long)]
    username: Option<String>,
    #[arg(long)]
    bio: Option<String>,
    #[arg(long)]
    picture: Option<PathBuf>,
  },
  /// Delete the account (irreversible)
  Delete {
    /// Skip the confirmation prompt
    #[arg(long)]
    yes: bool,
  },
}

/// A single artwork
#[derive(Subcommand, Debug)]
pub enum ArtworkCommand {
  Show { id: i64 },
  Update {
    id: i64,
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    image: Option<PathBuf>,
    #[arg(long)]
    description: Option<String>,
  },
  Delete { id: i64 },
}

/// Client configuration
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
  /// Print the effective configuration
  Show,
  /// Persist a new API base URL
  SetUrl { url: String },
}

#[cfg(test)]
mod tests {
  use super::*;
  use clap::CommandFactory;

  #[test]
  fn cli_definition_is_consistent() {
    Cli::command().debug_assert();
  }

  #[test]
  fn gallery_open_and_nested_commands_parse() {
    let cli = Cli::try_parse_from(["artshare", "gallery", "--open", "2"]).unwrap();
    assert!(matches!(cli.command, Command::Gallery { open: Some(2) }));

    let cli = Cli::try_parse_from(["artshare", "artwork", "delete", "9"]).unwrap();
    assert!(matches!(cli.command, Command::Artwork(ArtworkCommand::Delete { id: 9 })));

    let cli = Cli::try_parse_from(["artshare", "config", "set-url", "http://h:8000/api"]).unwrap();
    assert!(matches!(cli.command, Command::Config(ConfigCommand::SetUrl { .. })));
  }
}
