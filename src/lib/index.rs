//! Key union across every loaded lang file.

use std::collections::{BTreeMap, BTreeSet};

#[cfg(feature = "tracing")]
use tracing::debug;

use crate::file::LangFile;

/// Every key known to a set of files, and which files define it.
///
/// The index is derived data: it is rebuilt from scratch rather than
/// updated, and goes stale as soon as any file it was built from changes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyIndex {
  all_keys: BTreeSet<String>,
  key_sources: BTreeMap<String, BTreeSet<String>>,
}

impl KeyIndex {
  pub fn from_files<'f, I>(files: I) -> Self
  where
    I: IntoIterator<Item = &'f LangFile>,
  {
    let mut index = Self::default();
    index.rebuild(files);
    index
  }

  /// Clears the index and recomputes it from `files`.
  pub fn rebuild<'f, I>(&mut self, files: I)
  where
    I: IntoIterator<Item = &'f LangFile>,
  {
    self.all_keys.clear();
    self.key_sources.clear();

    for file in files {
      for key in file.content().keys() {
        self.all_keys.insert(key.to_string());
        self
          .key_sources
          .entry(key.to_string())
          .or_default()
          .insert(file.name().to_string());
      }
    }

    #[cfg(feature = "tracing")]
    debug!("Indexed {} unique keys", self.all_keys.len());
  }

  /// All keys in ascending order.
  pub fn all_keys(&self) -> &BTreeSet<String> {
    &self.all_keys
  }

  /// Names of the files containing `key`.
  pub fn sources(&self, key: &str) -> Option<&BTreeSet<String>> {
    self.key_sources.get(key)
  }

  pub fn len(&self) -> usize {
    self.all_keys.len()
  }

  pub fn is_empty(&self) -> bool {
    self.all_keys.is_empty()
  }
}
