mod account;
mod artwork;
mod browse;
mod config;

use std::path::Path;

use anyhow::{Context, bail};
use artshare_core::domain::{Route, UploadFile};
use artshare_core::views::require_auth;

use crate::AppContext;
use crate::cli::Command;

pub async fn run(ctx: &AppContext, command: Command) -> anyhow::Result<()> {
  match command {
    Command::Register { username, email, password, confirm_password, bio, picture } => {
      account::register(ctx, username, email, password, confirm_password, bio, picture).await
    }
    Command::Login { username, password } => account::login(ctx, username, password).await,
    Command::Logout => account::logout(ctx),
    Command::Whoami => account::whoami(ctx),
    Command::Profile(cmd) => account::profile(ctx, cmd).await,
    Command::Gallery { open } => browse::gallery(ctx, open).await,
    Command::Artist { artist } => browse::artist(ctx, &artist).await,
    Command::Upload { title, image, description } => {
      artwork::upload(ctx, title, &image, description).await
    }
    Command::Artwork(cmd) => artwork::artwork(ctx, cmd).await,
    Command::Config(cmd) => config::config(ctx, cmd),
  }
}

/// Fails with a sign-in hint when `route` needs a session we don't have.
fn ensure_signed_in(ctx: &AppContext, route: Route) -> anyhow::Result<()> {
  if !require_auth(&ctx.session, &route) {
    bail!("{route} requires a signed-in artist");
  }
  Ok(())
}

fn read_upload(path: &Path) -> anyhow::Result<UploadFile> {
  let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
  let file_name = path
    .file_name()
    .map(|n| n.to_string_lossy().into_owned())
    .unwrap_or_else(|| "upload".to_string());
  Ok(UploadFile::new(file_name, bytes))
}
