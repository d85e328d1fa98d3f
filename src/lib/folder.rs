//! A folder of lang files, one per language.

use std::{
  collections::BTreeMap,
  fs,
  path::{Path, PathBuf},
};

#[cfg(feature = "tracing")]
use tracing::{debug, info};

use crate::{
  file::LangFile,
  index::KeyIndex,
  report::{MissingKey, missing_keys},
  sync::{LangSync, LangSyncError},
};

/// Extension of lang files, without the dot.
pub const DEFAULT_EXTENSION: &str = "lang";

/// All lang files directly inside one directory, keyed by file name.
#[derive(Debug, Clone)]
pub struct LangFolder {
  dir: PathBuf,
  files: BTreeMap<String, LangFile>,
}

impl LangFolder {
  /// Loads and parses every `*.<extension>` file directly inside `dir`.
  pub fn load<P: AsRef<Path>>(dir: P, extension: &str) -> Result<Self, LangSyncError> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
      return Err(LangSyncError::NotADirectory(dir.to_path_buf()));
    }

    let read_dir_err = |source| LangSyncError::ReadDir {
      path: dir.to_path_buf(),
      source,
    };

    let suffix = format!(".{}", extension);
    let mut files = BTreeMap::new();

    for entry in fs::read_dir(dir).map_err(read_dir_err)? {
      let entry = entry.map_err(read_dir_err)?;
      let path = entry.path();

      let Ok(name) = entry.file_name().into_string() else {
        continue;
      };
      if !name.ends_with(&suffix) || !path.is_file() {
        continue;
      }

      files.insert(name.clone(), LangFile::new(name, path));
    }

    #[cfg(feature = "tracing")]
    info!("Found {} lang files in {:?}", files.len(), dir);

    let mut folder = Self {
      dir: dir.to_path_buf(),
      files,
    };
    folder.scan_all()?;
    Ok(folder)
  }

  /// Re-reads every file from disk.
  pub fn scan_all(&mut self) -> Result<(), LangSyncError> {
    for file in self.files.values_mut() {
      file.reload()?;
    }

    #[cfg(feature = "tracing")]
    debug!("Scanned {} files", self.files.len());

    Ok(())
  }

  pub fn dir(&self) -> &Path {
    &self.dir
  }

  /// Files in ascending name order.
  pub fn files(&self) -> impl Iterator<Item = &LangFile> {
    self.files.values()
  }

  pub fn names(&self) -> impl Iterator<Item = &str> {
    self.files.keys().map(String::as_str)
  }

  pub fn len(&self) -> usize {
    self.files.len()
  }

  pub fn is_empty(&self) -> bool {
    self.files.is_empty()
  }

  pub fn file(&self, name: &str) -> Result<&LangFile, LangSyncError> {
    self.files.get(name).ok_or_else(|| self.unknown(name))
  }

  /// Builds a fresh index from the current content of every file.
  pub fn key_index(&self) -> KeyIndex {
    KeyIndex::from_files(self.files.values())
  }

  pub fn missing_keys(&self, name: &str) -> Result<Vec<MissingKey>, LangSyncError> {
    Ok(missing_keys(self.file(name)?, &self.key_index()))
  }

  /// Rewrites `target` so it carries the model's keys and layout.
  ///
  /// Both names are checked before anything is written.
  pub fn apply_model_to_file(
    &mut self,
    model: &str,
    target: &str,
    add_marker: bool,
  ) -> Result<(), LangSyncError> {
    let reconciled = LangSync::reconcile(
      self.file(model)?.content(),
      self.file(target)?.content(),
      add_marker,
    )
    .into_owned();

    #[cfg(feature = "tracing")]
    debug!("Applying {} to {}", model, target);

    let Some(file) = self.files.get_mut(target) else {
      return Err(self.unknown(target));
    };
    file.replace_content(&reconciled)
  }

  /// Applies the model to every other file in name order.
  ///
  /// Returns the names of the files rewritten. Stops at the first failure.
  pub fn apply_model_to_all(
    &mut self,
    model: &str,
    add_marker: bool,
  ) -> Result<Vec<String>, LangSyncError> {
    self.apply_model_to_all_with(model, add_marker, |_| {})
  }

  /// Like [`LangFolder::apply_model_to_all`], calling `on_applied` with each
  /// file name as soon as that file has been rewritten.
  pub fn apply_model_to_all_with<F>(
    &mut self,
    model: &str,
    add_marker: bool,
    mut on_applied: F,
  ) -> Result<Vec<String>, LangSyncError>
  where
    F: FnMut(&str),
  {
    self.file(model)?;

    let targets: Vec<String> = self
      .names()
      .filter(|name| *name != model)
      .map(str::to_string)
      .collect();

    for target in &targets {
      self.apply_model_to_file(model, target, add_marker)?;

      #[cfg(feature = "tracing")]
      info!("Applied model to: {}", target);

      on_applied(target);
    }

    Ok(targets)
  }

  fn unknown(&self, name: &str) -> LangSyncError {
    LangSyncError::UnknownFile {
      name: name.to_string(),
      available: self.names().map(str::to_string).collect(),
    }
  }
}
