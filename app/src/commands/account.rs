use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Context;
use artshare_core::domain::{Artist, Route};
use artshare_core::services::Credential;
use artshare_core::views::edit_profile::DELETE_CONFIRMATION;
use artshare_core::views::{EditProfileView, Loadable, ProfileView, SignInForm, SignupForm};
use tracing::info;

use crate::AppContext;
use crate::cli::ProfileCommand;
use crate::commands::{ensure_signed_in, read_upload};

pub async fn register(
  ctx: &AppContext,
  username: String,
  email: String,
  password: String,
  confirm_password: Option<String>,
  bio: Option<String>,
  picture: Option<PathBuf>,
) -> anyhow::Result<()> {
  let mut form = SignupForm::new(ctx.gateway.clone());
  form.username = username;
  form.email = email;
  form.confirm_password = confirm_password.unwrap_or_else(|| password.clone());
  form.password = password;
  form.next()?;

  form.bio = bio.unwrap_or_default();
  form.profile_picture = picture.as_deref().map(read_upload).transpose()?;

  let result = form.submit().await;
  match result {
    Ok(artist) => {
      println!("Registration successful! Welcome, {} (id {}).", artist.username, artist.id);
      Ok(())
    }
    Err(e) => {
      for (field, messages) in form.field_errors().iter() {
        eprintln!("  {field}: {}", messages.join(" "));
      }
      Err(e.into())
    }
  }
}

pub async fn login(ctx: &AppContext, username: String, password: String) -> anyhow::Result<()> {
  let mut form = SignInForm::new(ctx.gateway.clone());
  form.username = username;
  form.password = password;

  let outcome = form.submit().await?;
  let how = match outcome.credential {
    Credential::Token(_) => "token",
    Credential::SessionCookie => "session cookie",
  };
  match outcome.artist {
    Some(artist) => println!("Signed in as {} ({how}).", artist.username),
    None => println!("Signed in ({how})."),
  }
  Ok(())
}

pub fn logout(ctx: &AppContext) -> anyhow::Result<()> {
  ctx.session.logout()?;
  println!("Signed out.");
  Ok(())
}

pub fn whoami(ctx: &AppContext) -> anyhow::Result<()> {
  let session = ctx.session.snapshot();
  match (&session.artist, ctx.session.is_authenticated()) {
    (Some(artist), _) => println!("{} (id {})", artist.username, artist.id),
    (None, true) => match ctx.session.artist_id() {
      Some(id) => println!("signed in as artist {id}"),
      None => println!("signed in"),
    },
    (None, false) => println!("not signed in"),
  }
  Ok(())
}

pub async fn profile(ctx: &AppContext, cmd: ProfileCommand) -> anyhow::Result<()> {
  match cmd {
    ProfileCommand::Show => {
      ensure_signed_in(ctx, Route::Profile)?;
      let mut view = ProfileView::new(ctx.gateway.clone());
      match view.load().await {
        Loadable::Ready(card) => {
          print_artist(&card.artist);
          if let Some(url) = &card.avatar_url {
            println!("avatar:   {url}");
          }
          Ok(())
        }
        Loadable::Failed(message) => anyhow::bail!("{message}"),
        Loadable::Loading => Ok(()),
      }
    }

    ProfileCommand::Edit { username, bio, picture } => {
      ensure_signed_in(ctx, Route::EditProfile)?;
      let mut view = EditProfileView::new(ctx.gateway.clone());
      if let Some(message) = view.load().await.error() {
        anyhow::bail!("{message}");
      }

      if let Some(username) = username {
        view.username = username;
      }
      if let Some(bio) = bio {
        view.bio = bio;
      }
      view.picture = picture.as_deref().map(read_upload).transpose()?;

      let updated = view.save().await?;
      println!("Profile updated.");
      print_artist(&updated);
      Ok(())
    }

    ProfileCommand::Delete { yes } => {
      ensure_signed_in(ctx, Route::EditProfile)?;
      let mut view = EditProfileView::new(ctx.gateway.clone());
      if let Some(message) = view.load().await.error() {
        anyhow::bail!("{message}");
      }

      let confirmed = yes || confirm(DELETE_CONFIRMATION)?;
      if view.delete_account(confirmed).await? {
        info!("account removed");
        println!("Account deleted.");
      } else {
        println!("Cancelled.");
      }
      Ok(())
    }
  }
}

fn print_artist(artist: &Artist) {
  println!("id:       {}", artist.id);
  println!("username: {}", artist.username);
  if !artist.email.is_empty() {
    println!("email:    {}", artist.email);
  }
  if let Some(bio) = artist.bio.as_deref().filter(|b| !b.is_empty()) {
    println!("bio:      {bio}");
  }
  if let Some(created) = &artist.created_at {
    println!("joined:   {created}");
  }
}

fn confirm(question: &str) -> anyhow::Result<bool> {
  print!("{question} [y/N] ");
  io::stdout().flush()?;
  let mut answer = String::new();
  io::stdin().lock().read_line(&mut answer).context("reading confirmation")?;
  Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}
