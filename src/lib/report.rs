//! Missing-key diagnostics and a plain-text view of a lang file.

use std::fmt;

use crate::{
  file::LangFile,
  index::KeyIndex,
  parse::{LangLine, RawKind},
};

const INVALID_MARKER: &str = "  # INVALID";
const MISSING_HEADER: &str = "# Missing entries:";

/// A key some other file defines but this one lacks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingKey {
  pub key: String,
  /// Files defining the key, ascending.
  pub sources: Vec<String>,
}

/// Keys of `index` absent from `file`, in ascending key order.
pub fn missing_keys(file: &LangFile, index: &KeyIndex) -> Vec<MissingKey> {
  index
    .all_keys()
    .iter()
    .filter(|key| !file.content().contains_key(key))
    .map(|key| MissingKey {
      key: key.clone(),
      sources: index
        .sources(key)
        .map(|sources| sources.iter().cloned().collect())
        .unwrap_or_default(),
    })
    .collect()
}

/// Text view of a file: its lines with invalid ones flagged, followed by the
/// keys it is missing.
pub struct FileReport<'a> {
  file: &'a LangFile,
  missing: Vec<MissingKey>,
}

impl<'a> FileReport<'a> {
  pub fn new(file: &'a LangFile, missing: Vec<MissingKey>) -> Self {
    Self { file, missing }
  }

  pub fn for_file(file: &'a LangFile, index: &KeyIndex) -> Self {
    Self::new(file, missing_keys(file, index))
  }

  pub fn missing(&self) -> &[MissingKey] {
    &self.missing
  }
}

impl<'a> fmt::Display for FileReport<'a> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for line in self.file.content().lines() {
      match line {
        LangLine::Raw(text) if line.raw_kind() == Some(RawKind::Invalid) => {
          writeln!(f, "{}{}", text, INVALID_MARKER)?
        }
        _ => write!(f, "{}", line)?,
      }
    }

    if self.missing.is_empty() {
      return Ok(());
    }

    writeln!(f)?;
    writeln!(f, "{}", MISSING_HEADER)?;
    for missing in &self.missing {
      if missing.sources.is_empty() {
        writeln!(f, "{}=", missing.key)?;
      } else {
        writeln!(f, "{}=  # from: {}", missing.key, missing.sources.join(", "))?;
      }
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_missing_keys_with_sources() {
    let en = LangFile::with_content("en_us.lang", "a=A\nb=B\n");
    let fr = LangFile::with_content("fr_fr.lang", "a=A\n");
    let index = KeyIndex::from_files([&en, &fr]);

    assert_eq!(
      missing_keys(&fr, &index),
      vec![MissingKey {
        key: "b".to_string(),
        sources: vec!["en_us.lang".to_string()],
      }]
    );
    assert!(missing_keys(&en, &index).is_empty());
  }

  #[test]
  fn test_missing_keys_sorted_with_all_sources() {
    let en = LangFile::with_content("en_us.lang", "zeta=Z\nalpha=A\n");
    let de = LangFile::with_content("de_de.lang", "zeta=Z\n");
    let fr = LangFile::with_content("fr_fr.lang", "mid=M\n");
    let index = KeyIndex::from_files([&en, &de, &fr]);

    let missing = missing_keys(&fr, &index);
    let keys: Vec<_> = missing.iter().map(|m| m.key.as_str()).collect();

    assert_eq!(keys, vec!["alpha", "zeta"]);
    assert_eq!(missing[1].sources, vec!["de_de.lang", "en_us.lang"]);
  }

  #[test]
  fn test_missing_key_outside_index_has_no_sources() {
    let fr = LangFile::with_content("fr_fr.lang", "a=A\n");
    let report = FileReport::new(
      &fr,
      vec![MissingKey {
        key: "orphan".to_string(),
        sources: Vec::new(),
      }],
    );

    assert!(report.to_string().ends_with("# Missing entries:\norphan=\n"));
  }

  #[test]
  fn test_render_flags_invalid_and_missing() {
    let en = LangFile::with_content("en_us.lang", "a=A\nb=B\n");
    let fr = LangFile::with_content("fr_fr.lang", "# French\n\na=A\nbroken line\n");
    let index = KeyIndex::from_files([&en, &fr]);

    let report = FileReport::for_file(&fr, &index);

    assert_eq!(report.missing().len(), 1);
    assert_eq!(
      report.to_string(),
      "# French\n\na=A\nbroken line  # INVALID\n\n# Missing entries:\nb=  # from: en_us.lang\n"
    );
  }

  #[test]
  fn test_render_complete_file_has_no_missing_section() {
    let en = LangFile::with_content("en_us.lang", "a=A\n");
    let index = KeyIndex::from_files([&en]);

    assert_eq!(FileReport::for_file(&en, &index).to_string(), "a=A\n");
  }
}
