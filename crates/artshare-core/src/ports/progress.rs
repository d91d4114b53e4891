use std::fmt;

/// Output port for upload progress. The front end implements it to draw a
/// progress bar or a percentage.
///
/// The transport calls it while the request body is being streamed, so
/// implementations must return quickly and never block.
pub trait UploadProgress: fmt::Debug + Send + Sync {
  fn start(&self, total_bytes: u64);
  fn advance(&self, sent_bytes: u64, total_bytes: u64);
  fn finish(&self);
}

/// Rounded percentage of `total` sent so far; `None` while the total is zero.
pub fn percent(sent: u64, total: u64) -> Option<u8> {
  if total == 0 {
    return None;
  }
  let sent = sent.min(total) as u128;
  let total = total as u128;
  Some(((sent * 100 + total / 2) / total) as u8)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn percent_rounds_and_clamps() {
    assert_eq!(percent(0, 0), None);
    assert_eq!(percent(0, 200), Some(0));
    assert_eq!(percent(1, 200), Some(1));
    assert_eq!(percent(2, 3), Some(67));
    assert_eq!(percent(200, 200), Some(100));
    assert_eq!(percent(500, 200), Some(100));
  }
}
