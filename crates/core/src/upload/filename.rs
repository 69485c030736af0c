//! Stored filename policies.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::path::Path;
use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Utc};

use stowage_shared::FilenamePolicyKind;

/// How the stored filename is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilenamePolicy {
    /// Use the caller's filename as is.
    Verbatim,
    /// `{identifier}_{YYYYMMDDHHMMSS}{ext}`, unique per identifier.
    Derived,
}

impl From<FilenamePolicyKind> for FilenamePolicy {
    fn from(kind: FilenamePolicyKind) -> Self {
        match kind {
            FilenamePolicyKind::Verbatim => Self::Verbatim,
            FilenamePolicyKind::Derived => Self::Derived,
        }
    }
}

/// Extension of `filename` including the dot, or `""`.
///
/// Leading dots do not start an extension (`.env` has none).
#[must_use]
pub fn file_extension(filename: &str) -> String {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{ext}"))
        .unwrap_or_default()
}

/// Issues derived filenames.
///
/// Second resolution alone collides when one identifier uploads twice within
/// a second, so repeats in the same second get a `-{n}` suffix.
#[derive(Debug, Default)]
pub struct DerivedNameIssuer {
    // identifier -> (unix second, repeats within that second)
    issued: Mutex<HashMap<String, (i64, u32)>>,
}

impl DerivedNameIssuer {
    /// Create an issuer with no history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a name for `identifier` at the current time.
    pub fn issue(&self, identifier: &str, original_filename: &str) -> String {
        self.issue_at(identifier, original_filename, Utc::now())
    }

    /// Issue a name for `identifier` at `now`.
    pub fn issue_at(&self, identifier: &str, original_filename: &str, now: DateTime<Utc>) -> String {
        let second = now.timestamp();
        let repeat = {
            let mut issued = self.issued.lock().unwrap_or_else(PoisonError::into_inner);
            issued.retain(|_, (at, _)| *at >= second);

            match issued.entry(identifier.to_string()) {
                Entry::Occupied(mut slot) if slot.get().0 == second => {
                    slot.get_mut().1 += 1;
                    slot.get().1
                }
                Entry::Occupied(mut slot) => {
                    slot.insert((second, 0));
                    0
                }
                Entry::Vacant(slot) => {
                    slot.insert((second, 0));
                    0
                }
            }
        };

        let stamp = now.format("%Y%m%d%H%M%S");
        let ext = file_extension(original_filename);
        if repeat == 0 {
            format!("{identifier}_{stamp}{ext}")
        } else {
            format!("{identifier}_{stamp}-{repeat}{ext}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    fn at(secs: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 9, 30, secs)
            .single()
            .expect("valid time")
    }

    #[rstest]
    #[case("photo.png", ".png")]
    #[case("archive.tar.gz", ".gz")]
    #[case("README", "")]
    #[case(".env", "")]
    #[case("", "")]
    fn test_file_extension(#[case] filename: &str, #[case] expected: &str) {
        assert_eq!(file_extension(filename), expected);
    }

    #[test]
    fn test_derived_name_format() {
        let issuer = DerivedNameIssuer::new();
        assert_eq!(
            issuer.issue_at("Jane Doe", "scan.pdf", at(5)),
            "Jane Doe_20240101093005.pdf"
        );
    }

    #[test]
    fn test_same_second_is_disambiguated() {
        let issuer = DerivedNameIssuer::new();
        let first = issuer.issue_at("jane", "a.png", at(5));
        let second = issuer.issue_at("jane", "b.png", at(5));
        let third = issuer.issue_at("jane", "c.png", at(5));

        assert_eq!(first, "jane_20240101093005.png");
        assert_eq!(second, "jane_20240101093005-1.png");
        assert_eq!(third, "jane_20240101093005-2.png");
    }

    #[test]
    fn test_next_second_resets() {
        let issuer = DerivedNameIssuer::new();
        issuer.issue_at("jane", "a.png", at(5));
        issuer.issue_at("jane", "a.png", at(5));
        assert_eq!(
            issuer.issue_at("jane", "a.png", at(6)),
            "jane_20240101093006.png"
        );
    }

    #[test]
    fn test_identifiers_are_independent() {
        let issuer = DerivedNameIssuer::new();
        issuer.issue_at("jane", "a.png", at(5));
        assert_eq!(
            issuer.issue_at("john", "a.png", at(5)),
            "john_20240101093005.png"
        );
    }

    #[test]
    fn test_policy_from_config_kind() {
        assert_eq!(
            FilenamePolicy::from(FilenamePolicyKind::Verbatim),
            FilenamePolicy::Verbatim
        );
        assert_eq!(
            FilenamePolicy::from(FilenamePolicyKind::Derived),
            FilenamePolicy::Derived
        );
    }
}
