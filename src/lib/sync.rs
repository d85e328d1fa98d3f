//! Lang file reconciliation.
//!
//! This module brings a target lang file in line with a model file, keeping
//! the target's translations and comments while adopting the model's keys and
//! layout.
//!
//! # Reconcile Logic
//!
//! The reconcile pass:
//! 1. Walks the model lines in order:
//!    - Blank and comment lines are copied, invalid lines are dropped
//!    - Entries take the target's value when the target has the key, otherwise
//!      the model's value (optionally suffixed with ` TOTRANSLATE`)
//! 2. Appends target entries the model does not define
//! 3. Appends target raw lines the model did not already supply, after a
//!    blank separator
//!
//! # Examples
//!
//! ```rust,no_run
//! use lang_sync::sync::{LangSync, LangSyncOptions};
//! use std::path::PathBuf;
//!
//! let options = LangSyncOptions {
//!     folder: PathBuf::from("assets/lang"),
//!     model: "en_us.lang".to_string(),
//!     add_marker: true,
//!     extension: None,
//! };
//!
//! let summary = LangSync::apply_with_options(options).unwrap();
//! println!("updated {} file(s)", summary.count());
//! ```

use std::{borrow::Cow, collections::HashSet, path::PathBuf};

#[cfg(feature = "tracing")]
use tracing::{debug, info, trace};

use crate::{
  folder::{DEFAULT_EXTENSION, LangFolder},
  parse::{LangContent, LangLine},
};

/// Suffix flagging a value copied from the model that still needs translating.
pub const TRANSLATE_MARKER: &str = " TOTRANSLATE";

/// Main reconciliation service for lang files.
pub struct LangSync;

impl LangSync {
  /// Loads `options.folder` and applies the model to every other file.
  ///
  /// Fails without touching any file if the folder is missing or the model is
  /// not one of its files.
  pub fn apply_with_options(options: LangSyncOptions) -> Result<ApplySummary, LangSyncError> {
    Self::apply_with_progress(options, |_| {})
  }

  /// Same as [`LangSync::apply_with_options`], reporting each rewritten file
  /// to `on_applied` as soon as it is written.
  pub fn apply_with_progress<F>(
    options: LangSyncOptions,
    on_applied: F,
  ) -> Result<ApplySummary, LangSyncError>
  where
    F: FnMut(&str),
  {
    #[cfg(feature = "tracing")]
    info!("Starting lang sync");

    let LangSyncOptions {
      folder,
      model,
      add_marker,
      extension,
    } = options;

    let extension = extension.as_deref().unwrap_or(DEFAULT_EXTENSION);

    #[cfg(feature = "tracing")]
    debug!(?folder, %model, extension, add_marker, "Resolved options");

    let mut folder = LangFolder::load(&folder, extension)?;
    let updated = folder.apply_model_to_all_with(&model, add_marker, on_applied)?;

    Ok(ApplySummary { updated })
  }

  /// Computes the target's new content from the model and the target.
  ///
  /// The target's values always win; the model only fills in missing keys
  /// and decides key order and comment layout. Does not touch the disk.
  pub fn reconcile<'a>(
    model: &'a LangContent<'_>,
    target: &'a LangContent<'_>,
    add_marker: bool,
  ) -> LangContent<'a> {
    #[cfg(feature = "tracing")]
    debug!(
      "Reconciling {} model lines against {} target lines",
      model.lines().len(),
      target.lines().len()
    );

    let mut lines = Vec::with_capacity(model.lines().len());
    let mut used_keys: HashSet<&str> = HashSet::new();
    let mut model_raw_texts: HashSet<&str> = HashSet::new();

    for line in model.lines() {
      match line {
        LangLine::Raw(text) => {
          let text: &str = text;
          if line.raw_kind().is_some_and(|kind| kind.is_layout()) {
            model_raw_texts.insert(text);
            lines.push(LangLine::raw(text));
          } else {
            #[cfg(feature = "tracing")]
            trace!("Dropping invalid model line: {:?}", text);
          }
        }
        LangLine::Entry(entry) => {
          let key: &str = &entry.key;

          let value = if let Some(existing) = target.get(key) {
            Cow::Borrowed(existing)
          } else {
            let value = model.get(key).unwrap_or(entry.value.as_ref());

            #[cfg(feature = "tracing")]
            trace!("Adding missing key: {}", key);

            if add_marker {
              Cow::Owned(format!("{}{}", value, TRANSLATE_MARKER))
            } else {
              Cow::Borrowed(value)
            }
          };

          lines.push(LangLine::entry(key, value));
          used_keys.insert(key);
        }
      }
    }

    for (key, value) in target.entries() {
      if !used_keys.contains(key) {
        #[cfg(feature = "tracing")]
        trace!("Keeping target-only key: {}", key);

        lines.push(LangLine::entry(key, value));
      }
    }

    let target_raw: Vec<_> = target
      .lines()
      .iter()
      .filter_map(|line| match line {
        LangLine::Raw(text) if !model_raw_texts.contains(&**text) => Some(LangLine::raw(&**text)),
        _ => None,
      })
      .collect();

    if !target_raw.is_empty() {
      #[cfg(feature = "tracing")]
      trace!("Moving {} target raw lines to the end", target_raw.len());

      lines.push(LangLine::raw(""));
      lines.extend(target_raw);
    }

    LangContent::from_lines(lines)
  }
}

/// Outcome of applying a model to a folder.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ApplySummary {
  /// Names of the files rewritten, in the order they were processed.
  pub updated: Vec<String>,
}

impl ApplySummary {
  pub fn count(&self) -> usize {
    self.updated.len()
  }
}

/// Errors that can occur while loading or reconciling lang files.
#[derive(Debug, thiserror::Error)]
pub enum LangSyncError {
  /// The requested folder does not exist or is not a directory
  #[error("Could not load folder: {}", .0.display())]
  NotADirectory(PathBuf),
  /// A model or target name is not among the loaded files
  #[error("File '{name}' not found in folder. Available files: {}", .available.join(", "))]
  UnknownFile { name: String, available: Vec<String> },
  /// Error listing the folder
  #[error("Failed to read folder {}: {source}", .path.display())]
  ReadDir {
    path: PathBuf,
    source: std::io::Error,
  },
  /// Error reading a lang file
  #[error("Failed to read {}: {source}", .path.display())]
  Read {
    path: PathBuf,
    source: std::io::Error,
  },
  /// Error writing a reconciled lang file
  #[error("Failed to write {}: {source}", .path.display())]
  Write {
    path: PathBuf,
    source: std::io::Error,
  },
}

/// Configuration options for applying a model to a folder.
pub struct LangSyncOptions {
  /// Folder holding the lang files.
  pub folder: PathBuf,
  /// File name of the model, e.g. `en_us.lang`.
  pub model: String,
  /// Append [`TRANSLATE_MARKER`] to values copied from the model.
  pub add_marker: bool,
  /// File extension to load, without the dot. Defaults to `lang`.
  pub extension: Option<String>,
}
