use anyhow::bail;
use artshare_core::domain::Route;
use artshare_core::views::artist_page::NO_ARTWORKS;
use artshare_core::views::{ArtistPageView, ArtworkCard, GalleryView, Loadable};

use crate::AppContext;

pub async fn gallery(ctx: &AppContext, open: Option<usize>) -> anyhow::Result<()> {
  let mut view = GalleryView::new(ctx.gateway.clone());
  if let Loadable::Failed(message) = view.load().await {
    bail!("{message}");
  }

  let Some(position) = open else {
    if view.cards().is_empty() {
      println!("No artworks yet.");
    }
    for (i, card) in view.cards().iter().enumerate() {
      print_line(i + 1, card);
    }
    return Ok(());
  };

  let total = view.cards().len();
  if position == 0 || position > total {
    bail!("no artwork at position {position} (gallery has {total})");
  }

  view.lightbox().open(position - 1);
  if let Some(card) = view.current_card() {
    println!("[{position}/{total}]");
    print_detail(card);
  }

  if total > 1 {
    view.lightbox().prev();
    let prev = view.current_card().map(|c| c.title.clone()).unwrap_or_default();
    view.lightbox().next();
    view.lightbox().next();
    let next = view.current_card().map(|c| c.title.clone()).unwrap_or_default();
    println!("< {prev}  |  {next} >");
  }
  Ok(())
}

pub async fn artist(ctx: &AppContext, param: &str) -> anyhow::Result<()> {
  let mut view = ArtistPageView::new(ctx.gateway.clone(), param);
  let Loadable::Ready(page) = view.load().await else {
    return Ok(());
  };

  println!("{}", page.heading);
  if let Some(bio) = page.artist.as_ref().and_then(|a| a.bio.as_deref()).filter(|b| !b.is_empty()) {
    println!("{bio}");
  }
  if let Some(url) = &page.avatar_url {
    println!("avatar: {url}");
  }
  println!();

  if page.artworks.is_empty() {
    println!("{NO_ARTWORKS}");
  }
  for (i, card) in page.artworks.iter().enumerate() {
    print_line(i + 1, card);
  }
  Ok(())
}

fn print_line(position: usize, card: &ArtworkCard) {
  println!(
    "{position:>3}. #{} {} by {}",
    card.id,
    if card.title.is_empty() { "(untitled)" } else { card.title.as_str() },
    card.artist.display_name
  );
}

pub(crate) fn print_detail(card: &ArtworkCard) {
  println!("#{} {}", card.id, card.title);
  match &card.artist.navigation {
    Some(target) => println!("by {} ({})", card.artist.display_name, Route::Artist(target.clone())),
    None => println!("by {}", card.artist.display_name),
  }
  if let Some(description) = &card.description {
    println!("{description}");
  }
  if let Some(url) = &card.image_url {
    println!("image:  {url}");
  }
  if let Some(url) = &card.avatar_url {
    println!("avatar: {url}");
  }
  if let Some(created) = &card.created_at {
    println!("posted: {created}");
  }
}
