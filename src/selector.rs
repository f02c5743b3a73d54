//! File selection: exact path or pattern
//!
//! Supports:
//! - Exact paths: `lib/app.rb` (single-file mode)
//! - Patterns: `/app/models/.*\.rb$/` (pattern mode, unanchored search)

use crate::error::{Result, UsageError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;
use std::path::{Path, PathBuf};

/// Criterion deciding which files are profiled
#[derive(Debug, Clone)]
pub enum Selector {
    /// Profile exactly one file, compared by full string equality
    Path(String),
    /// Profile every file whose identifier matches
    Pattern(Regex),
}

impl Selector {
    /// Select a single file by path
    pub fn path(path: impl Into<String>) -> Self {
        Selector::Path(path.into())
    }

    /// Select files by regular expression
    pub fn pattern(expr: &str) -> Result<Self> {
        Ok(Selector::Pattern(Regex::new(expr)?))
    }

    /// Parse a textual selector
    ///
    /// `/expr/` is a pattern, any other non-empty string is an exact path.
    pub fn parse(text: &str) -> Result<Self> {
        if text.is_empty() {
            return Err(UsageError::InvalidSelector);
        }

        match text
            .strip_prefix('/')
            .and_then(|rest| rest.strip_suffix('/'))
        {
            Some(expr) => Self::pattern(expr),
            None => Ok(Self::path(text)),
        }
    }

    /// Build a selector from a dynamically typed value
    ///
    /// Accepts `Selector`, `Regex`, `String`, `&'static str` and `PathBuf`.
    /// Anything else, including an empty path, is rejected.
    pub fn from_any(value: &dyn Any) -> Result<Self> {
        if let Some(selector) = value.downcast_ref::<Selector>() {
            return match selector {
                Selector::Path(path) => Self::non_empty_path(path),
                Selector::Pattern(_) => Ok(selector.clone()),
            };
        }
        if let Some(regex) = value.downcast_ref::<Regex>() {
            return Ok(Selector::Pattern(regex.clone()));
        }
        if let Some(path) = value.downcast_ref::<String>() {
            return Self::non_empty_path(path);
        }
        if let Some(path) = value.downcast_ref::<&'static str>() {
            return Self::non_empty_path(path);
        }
        if let Some(path) = value.downcast_ref::<PathBuf>() {
            return Self::non_empty_path(&path.to_string_lossy());
        }

        Err(UsageError::InvalidSelector)
    }

    fn non_empty_path(path: &str) -> Result<Self> {
        if path.is_empty() {
            Err(UsageError::InvalidSelector)
        } else {
            Ok(Self::path(path))
        }
    }

    /// Whether `file` is in scope for this selector
    pub fn matches(&self, file: &str) -> bool {
        match self {
            Selector::Path(path) => path == file,
            Selector::Pattern(regex) => regex.is_match(file),
        }
    }

    pub fn is_pattern(&self) -> bool {
        matches!(self, Selector::Pattern(_))
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Path(path) => write!(f, "{}", path),
            Selector::Pattern(regex) => write!(f, "/{}/", regex.as_str()),
        }
    }
}

impl From<Regex> for Selector {
    fn from(regex: Regex) -> Self {
        Selector::Pattern(regex)
    }
}

/// How a single-file target is resolved at session start
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathResolution {
    /// Compare the path exactly as given
    #[default]
    Verbatim,
    /// Canonicalize through the filesystem, falling back to the path as given
    Canonical,
}

impl PathResolution {
    /// Resolve `path` once, for comparison against every event
    pub fn resolve(self, path: &str) -> String {
        match self {
            PathResolution::Verbatim => path.to_string(),
            PathResolution::Canonical => match Path::new(path).canonicalize() {
                Ok(resolved) => resolved.to_string_lossy().into_owned(),
                Err(err) => {
                    tracing::debug!(path, %err, "keeping unresolvable target path verbatim");
                    path.to_string()
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_path() {
        let selector = Selector::parse("lib/a.rb").unwrap();
        assert!(matches!(selector, Selector::Path(ref p) if p == "lib/a.rb"));
    }

    #[test]
    fn test_parse_slash_delimited_pattern() {
        let selector = Selector::parse(r"/models/.*\.rb$/").unwrap();
        assert!(selector.is_pattern());
        assert!(selector.matches("app/models/user.rb"));
        assert!(!selector.matches("app/views/user.erb"));
    }

    #[test]
    fn test_parse_absolute_path_is_not_a_pattern() {
        let selector = Selector::parse("/srv/app/a.rb").unwrap();
        assert!(!selector.is_pattern());
        assert!(selector.matches("/srv/app/a.rb"));
    }

    #[test]
    fn test_parse_lone_slash_is_a_path() {
        let selector = Selector::parse("/").unwrap();
        assert!(!selector.is_pattern());
    }

    #[test]
    fn test_parse_empty_is_invalid() {
        assert!(matches!(
            Selector::parse(""),
            Err(UsageError::InvalidSelector)
        ));
    }

    #[test]
    fn test_parse_invalid_regex() {
        assert!(matches!(
            Selector::parse("/[invalid/"),
            Err(UsageError::InvalidPattern(_))
        ));
    }

    #[test]
    fn test_pattern_is_unanchored_search() {
        let selector = Selector::pattern("app").unwrap();
        assert!(selector.matches("/srv/app/a.rb"));
        assert!(!selector.matches("/srv/lib/a.rb"));
    }

    #[test]
    fn test_path_requires_full_equality() {
        let selector = Selector::path("a.rb");
        assert!(selector.matches("a.rb"));
        assert!(!selector.matches("lib/a.rb"));
        assert!(!selector.matches("a.rbx"));
    }

    #[test]
    fn test_from_any_accepts_paths_and_patterns() {
        let owned = String::from("a.rb");
        let borrowed: &'static str = "b.rb";
        let buf = PathBuf::from("c.rb");
        let regex = Regex::new(r"\.rb$").unwrap();

        assert!(matches!(Selector::from_any(&owned), Ok(Selector::Path(_))));
        assert!(matches!(Selector::from_any(&borrowed), Ok(Selector::Path(_))));
        assert!(matches!(Selector::from_any(&buf), Ok(Selector::Path(_))));
        assert!(matches!(Selector::from_any(&regex), Ok(Selector::Pattern(_))));
        assert!(matches!(
            Selector::from_any(&Selector::path("d.rb")),
            Ok(Selector::Path(_))
        ));
    }

    #[test]
    fn test_from_any_rejects_other_types() {
        assert!(matches!(
            Selector::from_any(&42_i32),
            Err(UsageError::InvalidSelector)
        ));
        assert!(matches!(
            Selector::from_any(&vec!["a.rb"]),
            Err(UsageError::InvalidSelector)
        ));
        assert!(matches!(
            Selector::from_any(&String::new()),
            Err(UsageError::InvalidSelector)
        ));
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        let selector = Selector::parse(r"/\.rb$/").unwrap();
        assert_eq!(selector.to_string(), r"/\.rb$/");
        assert_eq!(Selector::path("a.rb").to_string(), "a.rb");
    }

    #[test]
    fn test_verbatim_resolution_keeps_path() {
        assert_eq!(PathResolution::Verbatim.resolve("./a.rb"), "./a.rb");
    }

    #[test]
    fn test_canonical_resolution_of_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.rb");
        std::fs::write(&file, "puts 1\n").unwrap();

        let resolved = PathResolution::Canonical.resolve(&file.to_string_lossy());
        assert_eq!(
            resolved,
            file.canonicalize().unwrap().to_string_lossy().into_owned()
        );
    }

    #[test]
    fn test_canonical_resolution_falls_back_for_missing_file() {
        assert_eq!(
            PathResolution::Canonical.resolve("does/not/exist.rb"),
            "does/not/exist.rb"
        );
    }
}
