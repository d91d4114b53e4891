use std::io::Write;
use std::sync::atomic::{AtomicU8, Ordering};

use artshare_core::ports::{UploadProgress, percent};

const NOTHING_SHOWN: u8 = u8::MAX;

/// An `UploadProgress` for the terminal: one `Uploading... NN%` line on
/// stderr, redrawn in place whenever the whole percentage changes.
#[derive(Debug)]
pub struct TerminalProgress {
  shown: AtomicU8,
}

impl TerminalProgress {
  pub fn new() -> Self {
    Self { shown: AtomicU8::new(NOTHING_SHOWN) }
  }

  /// Whether `pct` differs from what is on screen; records it if so.
  fn should_draw(&self, pct: u8) -> bool {
    self.shown.swap(pct, Ordering::Relaxed) != pct
  }
}

impl Default for TerminalProgress {
  fn default() -> Self {
    Self::new()
  }
}

impl UploadProgress for TerminalProgress {
  fn start(&self, total_bytes: u64) {
    self.shown.store(NOTHING_SHOWN, Ordering::Relaxed);
    tracing::debug!(total_bytes, "upload started");
  }

  fn advance(&self, sent_bytes: u64, total_bytes: u64) {
    let Some(pct) = percent(sent_bytes, total_bytes) else {
      return;
    };
    if self.should_draw(pct) {
      let mut stderr = std::io::stderr().lock();
      let _ = write!(stderr, "\rUploading... {pct:>3}%");
      let _ = stderr.flush();
    }
  }

  fn finish(&self) {
    if self.shown.load(Ordering::Relaxed) != NOTHING_SHOWN {
      eprintln!();
    }
  }
}
