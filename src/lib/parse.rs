use std::{borrow::Cow, fmt};

use indexmap::IndexMap;

#[cfg(feature = "tracing")]
use tracing::{debug, trace};

const COMMENT_PREFIX: &str = "#";
const ASSIGNMENT_OPERATOR: &str = "=";

/// Classification of a line that did not parse as an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawKind {
  Blank,
  Comment,
  Invalid,
}

impl RawKind {
  /// Blank and comment lines are layout; invalid lines are not.
  pub fn is_layout(self) -> bool {
    matches!(self, RawKind::Blank | RawKind::Comment)
  }
}

/// Classifies a raw line by inspecting its trimmed text.
pub fn classify_raw(text: &str) -> RawKind {
  let trimmed = text.trim();

  if trimmed.is_empty() {
    RawKind::Blank
  } else if trimmed.starts_with(COMMENT_PREFIX) {
    RawKind::Comment
  } else {
    RawKind::Invalid
  }
}

/// Parsed content of one lang file.
///
/// `lines` is the source of truth; `entries` is derived from it and only ever
/// rebuilt as a whole, so the two cannot drift apart.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LangContent<'a> {
  lines: Vec<LangLine<'a>>,
  entries: IndexMap<Cow<'a, str>, Cow<'a, str>>,
}

impl<'a> LangContent<'a> {
  /// Builds content from an ordered line sequence, recomputing the entries.
  ///
  /// A key seen twice keeps the position of its first occurrence and the
  /// value of its last one.
  pub fn from_lines(lines: Vec<LangLine<'a>>) -> Self {
    let mut entries = IndexMap::new();
    for line in &lines {
      if let LangLine::Entry(entry) = line {
        entries.insert(entry.key.clone(), entry.value.clone());
      }
    }

    Self { lines, entries }
  }

  pub fn lines(&self) -> &[LangLine<'a>] {
    &self.lines
  }

  pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
    self
      .entries
      .iter()
      .map(|(key, value)| (key.as_ref(), value.as_ref()))
  }

  pub fn keys(&self) -> impl Iterator<Item = &str> {
    self.entries.keys().map(|key| key.as_ref())
  }

  pub fn get(&self, key: &str) -> Option<&str> {
    self.entries.get(key).map(|value| value.as_ref())
  }

  pub fn contains_key(&self, key: &str) -> bool {
    self.entries.contains_key(key)
  }

  pub fn into_owned(self) -> LangContent<'static> {
    LangContent::from_lines(self.lines.into_iter().map(LangLine::into_owned).collect())
  }
}

impl<'a> From<&'a str> for LangContent<'a> {
  fn from(s: &'a str) -> Self {
    #[cfg(feature = "tracing")]
    debug!("Parsing lang file with {} bytes", s.len());

    let lines: Vec<LangLine> = s
      .lines()
      .map(|line| {
        #[cfg(feature = "tracing")]
        trace!("Parsing line: {:?}", line);

        LangLine::from(line)
      })
      .collect();

    #[cfg(feature = "tracing")]
    debug!("Parsed {} lines", lines.len());

    Self::from_lines(lines)
  }
}

impl<'a> fmt::Display for LangContent<'a> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for line in &self.lines {
      write!(f, "{}", line)?;
    }
    Ok(())
  }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LangLine<'a> {
  Entry(LangEntry<'a>),
  Raw(Cow<'a, str>),
}

impl<'a> LangLine<'a> {
  pub fn entry(key: impl Into<Cow<'a, str>>, value: impl Into<Cow<'a, str>>) -> Self {
    LangLine::Entry(LangEntry {
      key: key.into(),
      value: value.into(),
    })
  }

  pub fn raw(text: impl Into<Cow<'a, str>>) -> Self {
    LangLine::Raw(text.into())
  }

  /// `None` for entries.
  pub fn raw_kind(&self) -> Option<RawKind> {
    match self {
      LangLine::Raw(text) => Some(classify_raw(text)),
      LangLine::Entry(_) => None,
    }
  }

  pub fn into_owned(self) -> LangLine<'static> {
    match self {
      LangLine::Entry(entry) => LangLine::entry(entry.key.into_owned(), entry.value.into_owned()),
      LangLine::Raw(text) => LangLine::raw(text.into_owned()),
    }
  }
}

impl<'a> fmt::Display for LangLine<'a> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      LangLine::Entry(entry) => writeln!(f, "{}", entry),
      LangLine::Raw(text) => writeln!(f, "{}", text),
    }
  }
}

impl<'a> From<&'a str> for LangLine<'a> {
  fn from(s: &'a str) -> Self {
    if !s.trim().starts_with(COMMENT_PREFIX)
      && let Some((key, value)) = s.split_once(ASSIGNMENT_OPERATOR)
    {
      LangLine::entry(key, value)
    } else {
      LangLine::raw(s)
    }
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LangEntry<'a> {
  pub key: Cow<'a, str>,
  pub value: Cow<'a, str>,
}

impl<'a> fmt::Display for LangEntry<'a> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}{}{}", self.key, ASSIGNMENT_OPERATOR, self.value)
  }
}
