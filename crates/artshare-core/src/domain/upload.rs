use std::fmt;

/// A file picked for upload (profile picture or artwork image).
#[derive(Clone, PartialEq, Eq)]
pub struct UploadFile {
  pub file_name: String,
  pub mime: Option<String>,
  pub bytes: Vec<u8>,
}

impl UploadFile {
  pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
    let file_name = file_name.into();
    let mime = guess_image_mime(&file_name).map(str::to_string);
    Self { file_name, mime, bytes }
  }

  pub fn len(&self) -> usize {
    self.bytes.len()
  }

  pub fn is_empty(&self) -> bool {
    self.bytes.is_empty()
  }
}

// Byte payloads make derived Debug output unreadable.
impl fmt::Debug for UploadFile {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("UploadFile")
      .field("file_name", &self.file_name)
      .field("mime", &self.mime)
      .field("len", &self.bytes.len())
      .finish()
  }
}

/// Mime type for the image extensions the gallery accepts.
pub fn guess_image_mime(file_name: &str) -> Option<&'static str> {
  let ext = file_name.rsplit_once('.')?.1.to_ascii_lowercase();
  match ext.as_str() {
    "jpg" | "jpeg" => Some("image/jpeg"),
    "png" => Some("image/png"),
    "gif" => Some("image/gif"),
    "webp" => Some("image/webp"),
    "bmp" => Some("image/bmp"),
    "avif" => Some("image/avif"),
    _ => None,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn mime_is_guessed_from_extension() {
    assert_eq!(UploadFile::new("cat.JPG", vec![1]).mime.as_deref(), Some("image/jpeg"));
    assert_eq!(UploadFile::new("cat.png", vec![1]).mime.as_deref(), Some("image/png"));
    assert_eq!(UploadFile::new("notes.txt", vec![1]).mime, None);
    assert_eq!(UploadFile::new("noext", vec![1]).mime, None);
  }
}
