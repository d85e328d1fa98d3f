//! A single lang file on disk.

use std::{
  fs,
  io::Write,
  path::{Path, PathBuf},
};

use tempfile::NamedTempFile;

#[cfg(feature = "tracing")]
use tracing::{debug, trace};

use crate::{parse::LangContent, sync::LangSyncError};

/// One lang file and its parsed content.
///
/// Content only changes through [`LangFile::reload`] and
/// [`LangFile::replace_content`], both of which re-parse what is on disk.
#[derive(Debug, Clone)]
pub struct LangFile {
  name: String,
  path: PathBuf,
  content: LangContent<'static>,
}

impl LangFile {
  /// Creates an unparsed file handle. Call [`LangFile::reload`] to read it.
  pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
    Self {
      name: name.into(),
      path: path.into(),
      content: LangContent::default(),
    }
  }

  /// Opens and parses the file at `path`, naming it after its file name.
  pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, LangSyncError> {
    let path = path.as_ref();
    let name = path
      .file_name()
      .map(|name| name.to_string_lossy().into_owned())
      .unwrap_or_default();

    let mut file = Self::new(name, path);
    file.reload()?;
    Ok(file)
  }

  #[cfg(test)]
  pub(crate) fn with_content(name: &str, content: &str) -> Self {
    Self {
      name: name.to_string(),
      path: PathBuf::from(name),
      content: LangContent::from(content).into_owned(),
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  pub fn content(&self) -> &LangContent<'static> {
    &self.content
  }

  /// Re-reads and re-parses the file from disk.
  pub fn reload(&mut self) -> Result<(), LangSyncError> {
    #[cfg(feature = "tracing")]
    trace!("Reading {:?}", self.path);

    let text = fs::read_to_string(&self.path).map_err(|source| LangSyncError::Read {
      path: self.path.clone(),
      source,
    })?;

    self.content = LangContent::from(text.as_str()).into_owned();
    Ok(())
  }

  /// Persists `content` as the new file body, then reloads from disk.
  ///
  /// The new body is written to a temporary file next to the target and
  /// renamed over it, so a failed write leaves the old content in place.
  pub fn replace_content(&mut self, content: &LangContent<'_>) -> Result<(), LangSyncError> {
    #[cfg(feature = "tracing")]
    debug!(
      "Writing {} lines to {:?}",
      content.lines().len(),
      self.path
    );

    write_atomic(&self.path, &content.to_string()).map_err(|source| LangSyncError::Write {
      path: self.path.clone(),
      source,
    })?;

    self.reload()
  }
}

fn write_atomic(path: &Path, contents: &str) -> std::io::Result<()> {
  let dir = match path.parent() {
    Some(parent) if !parent.as_os_str().is_empty() => parent,
    _ => Path::new("."),
  };

  let mut tmp = NamedTempFile::new_in(dir)?;
  tmp.write_all(contents.as_bytes())?;
  tmp.as_file().sync_all()?;

  // Keep the mode of the file being replaced
  if let Ok(metadata) = fs::metadata(path) {
    tmp.as_file().set_permissions(metadata.permissions())?;
  }

  tmp.persist(path).map_err(|err| err.error)?;
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::parse::LangLine;
  use tempfile::TempDir;

  #[test]
  fn test_open_parses_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("en_us.lang");
    fs::write(&path, "# header\ngreeting=Hello\n").unwrap();

    let file = LangFile::open(&path).unwrap();

    assert_eq!(file.name(), "en_us.lang");
    assert_eq!(file.path(), path.as_path());
    assert_eq!(file.content().get("greeting"), Some("Hello"));
    assert_eq!(file.content().lines().len(), 2);
  }

  #[test]
  fn test_open_missing_file() {
    let dir = TempDir::new().unwrap();

    match LangFile::open(dir.path().join("nope.lang")) {
      Err(LangSyncError::Read { path, .. }) => assert!(path.ends_with("nope.lang")),
      other => panic!("Expected Read error, got {:?}", other),
    }
  }

  #[test]
  fn test_replace_content_writes_and_reloads() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("fr_fr.lang");
    fs::write(&path, "old=value\n").unwrap();

    let mut file = LangFile::open(&path).unwrap();
    let content = LangContent::from_lines(vec![
      LangLine::raw("# generated"),
      LangLine::entry("new", "valeur"),
    ]);
    file.replace_content(&content).unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "# generated\nnew=valeur\n");
    assert_eq!(file.content().get("new"), Some("valeur"));
    assert!(!file.content().contains_key("old"));
  }

  #[test]
  fn test_replace_content_leaves_no_temp_files() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("de_de.lang");
    fs::write(&path, "a=1\n").unwrap();

    let mut file = LangFile::open(&path).unwrap();
    file
      .replace_content(&LangContent::from("a=2\n"))
      .unwrap();

    let names: Vec<_> = fs::read_dir(dir.path())
      .unwrap()
      .map(|entry| entry.unwrap().file_name())
      .collect();
    assert_eq!(names, vec![std::ffi::OsString::from("de_de.lang")]);
  }

  #[test]
  fn test_replace_content_into_missing_dir_fails() {
    let dir = TempDir::new().unwrap();
    let mut file = LangFile::new("x.lang", dir.path().join("missing").join("x.lang"));

    let result = file.replace_content(&LangContent::from("a=1\n"));
    assert!(matches!(result, Err(LangSyncError::Write { .. })));
  }

  #[cfg(unix)]
  #[test]
  fn test_failed_write_keeps_previous_content() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let locked = dir.path().join("locked");
    fs::create_dir(&locked).unwrap();
    let path = locked.join("fr_fr.lang");
    fs::write(&path, "a=Ah\n# note\n").unwrap();

    let mut file = LangFile::open(&path).unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o555)).unwrap();

    // Privileged users ignore directory permissions; nothing to check then
    if fs::File::create(locked.join("canary")).is_ok() {
      fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
      return;
    }

    let result = file.replace_content(&LangContent::from("a=new\n"));
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    assert!(matches!(result, Err(LangSyncError::Write { .. })));
    assert_eq!(fs::read_to_string(&path).unwrap(), "a=Ah\n# note\n");
    assert_eq!(file.content().get("a"), Some("Ah"));
  }

  #[test]
  fn test_failed_rename_keeps_previous_target() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("fr_fr.lang");
    fs::write(&path, "a=Ah\n").unwrap();
    let mut file = LangFile::open(&path).unwrap();

    // A non-empty directory at the target path makes the final rename fail
    fs::remove_file(&path).unwrap();
    fs::create_dir(&path).unwrap();
    fs::write(path.join("keep"), "old bytes").unwrap();

    let result = file.replace_content(&LangContent::from("a=new\n"));

    assert!(matches!(result, Err(LangSyncError::Write { .. })));
    assert_eq!(fs::read_to_string(path.join("keep")).unwrap(), "old bytes");
    assert_eq!(file.content().get("a"), Some("Ah"));
    let names: Vec<_> = fs::read_dir(dir.path())
      .unwrap()
      .map(|entry| entry.unwrap().file_name())
      .collect();
    assert_eq!(names, vec![std::ffi::OsString::from("fr_fr.lang")]);
  }
}
