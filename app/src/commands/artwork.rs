use std::path::Path;
use std::sync::Arc;

use artshare_core::domain::{ArtworkId, ArtworkPatch, Route};
use artshare_core::views::{ArtworkCard, UploadForm};

use crate::AppContext;
use crate::cli::ArtworkCommand;
use crate::commands::browse::print_detail;
use crate::commands::{ensure_signed_in, read_upload};
use crate::infrastructure::progress::TerminalProgress;

pub async fn upload(
  ctx: &AppContext,
  title: String,
  image: &Path,
  description: Option<String>,
) -> anyhow::Result<()> {
  ensure_signed_in(ctx, Route::Upload)?;

  let progress = Arc::new(TerminalProgress::new());
  let mut form = UploadForm::new(ctx.gateway.clone()).with_progress(progress);
  form.title = title;
  form.image = Some(read_upload(image)?);
  form.description = description.unwrap_or_default();

  let created = form.submit().await?;
  println!("{} (#{})", form.message().unwrap_or_default(), created.id);
  Ok(())
}

pub async fn artwork(ctx: &AppContext, cmd: ArtworkCommand) -> anyhow::Result<()> {
  let gateway = &ctx.gateway;
  match cmd {
    ArtworkCommand::Show { id } => {
      let artwork = gateway.get_artwork(ArtworkId::new(id)).await?;
      print_detail(&ArtworkCard::build(&artwork, None, gateway.base()));
    }

    ArtworkCommand::Update { id, title, image, description } => {
      ensure_signed_in(ctx, Route::Upload)?;
      let patch = ArtworkPatch {
        title,
        image: image.as_deref().map(read_upload).transpose()?,
        description,
      };
      let updated = gateway.update_artwork(ArtworkId::new(id), &patch).await?;
      println!("Artwork updated.");
      print_detail(&ArtworkCard::build(&updated, None, gateway.base()));
    }

    ArtworkCommand::Delete { id } => {
      ensure_signed_in(ctx, Route::Upload)?;
      gateway.delete_artwork(ArtworkId::new(id)).await?;
      println!("Artwork #{id} deleted.");
    }
  }
  Ok(())
}
