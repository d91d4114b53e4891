use std::fs;
use std::io::{self, ErrorKind, Write};
use std::path::Path;

use tracing::trace;

/// Writes `contents` to a sibling temp file, syncs it and renames it over `path`.
///
/// The parent directory is created when missing, so callers can point this at
/// a fresh data dir on first run.
pub fn atomic_write_str(path: &Path, contents: &str) -> io::Result<()> {
  write_via_temp(path, contents, false)
}

/// Like [`atomic_write_str`], but the file is readable by its owner only
/// (mode `0600` on unix). For files holding credentials.
pub fn atomic_write_private(path: &Path, contents: &str) -> io::Result<()> {
  write_via_temp(path, contents, true)
}

fn write_via_temp(path: &Path, contents: &str, private: bool) -> io::Result<()> {
  if let Some(parent) = path.parent() {
    if !parent.as_os_str().is_empty() {
      fs::create_dir_all(parent)?;
    }
  }

  let tmp_path = path.with_extension("tmp");

  {
    let mut tmp_file = open_truncated(&tmp_path, private)?;
    tmp_file.write_all(contents.as_bytes())?;
    tmp_file.sync_all()?;
  }

  fs::rename(&tmp_path, path)?;
  trace!(path = %path.display(), bytes = contents.len(), private, "atomic write");
  Ok(())
}

#[cfg(unix)]
fn open_truncated(path: &Path, private: bool) -> io::Result<fs::File> {
  use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

  let mut options = fs::OpenOptions::new();
  options.write(true).create(true).truncate(true);
  if private {
    options.mode(0o600);
  }
  let file = options.open(path)?;
  // `mode` only applies on creation; a leftover temp file keeps its old bits.
  if private {
    file.set_permissions(fs::Permissions::from_mode(0o600))?;
  }
  Ok(file)
}

#[cfg(not(unix))]
fn open_truncated(path: &Path, _private: bool) -> io::Result<fs::File> {
  fs::File::create(path)
}

/// Reads a UTF-8 file, mapping "not found" to `Ok(None)`.
pub fn read_optional(path: &Path) -> io::Result<Option<String>> {
  match fs::read_to_string(path) {
    Ok(content) => Ok(Some(content)),
    Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
    Err(e) => Err(e),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::tempdir;

  #[test]
  fn atomic_write_creates_parent_and_replaces_content() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("nested").join("session.json");

    atomic_write_str(&path, "{\"a\":1}").unwrap();
    atomic_write_str(&path, "{\"a\":2}").unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "{\"a\":2}");
    assert!(!path.with_extension("tmp").exists());
  }

  #[cfg(unix)]
  #[test]
  fn private_write_is_owner_only() {
    use std::os::unix::fs::PermissionsExt;

    let tmp = tempdir().unwrap();
    let path = tmp.path().join("session.json");
    fs::write(path.with_extension("tmp"), "stale").unwrap();
    fs::set_permissions(path.with_extension("tmp"), fs::Permissions::from_mode(0o644)).unwrap();

    atomic_write_private(&path, "{}").unwrap();

    let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode, 0o600);
    assert_eq!(fs::read_to_string(&path).unwrap(), "{}");
  }

  #[test]
  fn read_optional_missing_file_is_none() {
    let tmp = tempdir().unwrap();
    assert_eq!(read_optional(&tmp.path().join("nope.toml")).unwrap(), None);
  }
}
