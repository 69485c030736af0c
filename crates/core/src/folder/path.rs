//! Validated folder paths.

use std::fmt;

use thiserror::Error;

/// Why a folder path was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FolderPathError {
    /// No segments at all.
    #[error("folder path is empty")]
    Empty,

    /// A segment is empty or whitespace.
    #[error("folder name at position {index} is empty")]
    EmptySegment {
        /// Segment position.
        index: usize,
    },

    /// A segment contains `/` or `\`.
    #[error("folder name '{name}' at position {index} contains a path separator")]
    Separator {
        /// Segment position.
        index: usize,
        /// Offending name.
        name: String,
    },
}

/// Ordered, non-empty list of folder names below a root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderPath(Vec<String>);

impl FolderPath {
    /// Validate and build a path.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is empty, or a name is blank or holds a separator.
    pub fn new<I, S>(segments: I) -> Result<Self, FolderPathError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() {
            return Err(FolderPathError::Empty);
        }

        for (index, name) in segments.iter().enumerate() {
            if name.trim().is_empty() {
                return Err(FolderPathError::EmptySegment { index });
            }
            if name.contains(['/', '\\']) {
                return Err(FolderPathError::Separator {
                    index,
                    name: name.clone(),
                });
            }
        }

        Ok(Self(segments))
    }

    /// Folder names, root-most first.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Number of segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the path has no segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over folder names.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl fmt::Display for FolderPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_valid_path() {
        let path = FolderPath::new(["Acme", "E123", "2024-01-01"]).expect("valid path");
        assert_eq!(path.len(), 3);
        assert!(!path.is_empty());
        assert_eq!(path.to_string(), "Acme/E123/2024-01-01");
        assert_eq!(path.iter().collect::<Vec<_>>(), vec!["Acme", "E123", "2024-01-01"]);
    }

    #[test]
    fn test_empty_path() {
        let segments: Vec<String> = Vec::new();
        assert_eq!(FolderPath::new(segments), Err(FolderPathError::Empty));
    }

    #[rstest]
    #[case(vec!["Acme", ""], 1)]
    #[case(vec!["  ", "E123"], 0)]
    #[case(vec!["Acme", "E123", "\t"], 2)]
    fn test_blank_segment(#[case] segments: Vec<&str>, #[case] index: usize) {
        assert_eq!(
            FolderPath::new(segments),
            Err(FolderPathError::EmptySegment { index })
        );
    }

    #[rstest]
    #[case("a/b")]
    #[case("a\\b")]
    fn test_separator_rejected(#[case] name: &str) {
        let err = FolderPath::new(["Acme", name]).unwrap_err();
        assert!(matches!(err, FolderPathError::Separator { index: 1, .. }));
    }
}
