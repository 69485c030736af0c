//! Upload profiles: where an endpoint stores files and how it names them.

use std::collections::HashMap;

use thiserror::Error;

use stowage_shared::EndpointConfig;

use super::filename::FilenamePolicy;
use crate::storage::FolderHandle;

/// Profile resolution errors.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// The profile names a root that is not configured.
    #[error("root folder '{0}' is not configured")]
    UnknownRoot(String),
}

/// Root folder plus filename policy for one endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadProfile {
    /// Root the destination path is resolved under.
    pub root: FolderHandle,
    /// Stored filename policy.
    pub filename_policy: FilenamePolicy,
}

impl UploadProfile {
    /// Create a profile.
    #[must_use]
    pub fn new(root: FolderHandle, filename_policy: FilenamePolicy) -> Self {
        Self {
            root,
            filename_policy,
        }
    }

    /// Resolve an endpoint's configured root name against the named roots.
    ///
    /// # Errors
    ///
    /// Returns an error if the root name is missing or blank in `roots`.
    pub fn resolve(
        endpoint: &EndpointConfig,
        roots: &HashMap<String, String>,
    ) -> Result<Self, ProfileError> {
        let root = roots
            .get(&endpoint.root)
            .map(|id| id.trim())
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ProfileError::UnknownRoot(endpoint.root.clone()))?;

        Ok(Self::new(
            FolderHandle::new(root),
            endpoint.filename_policy.into(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stowage_shared::FilenamePolicyKind;

    fn endpoint(root: &str) -> EndpointConfig {
        EndpointConfig {
            root: root.to_string(),
            filename_policy: FilenamePolicyKind::Derived,
        }
    }

    #[test]
    fn test_resolve_known_root() {
        let roots = HashMap::from([("secondary".to_string(), "folder-2".to_string())]);
        let profile = UploadProfile::resolve(&endpoint("secondary"), &roots).expect("resolves");

        assert_eq!(profile.root, FolderHandle::new("folder-2"));
        assert_eq!(profile.filename_policy, FilenamePolicy::Derived);
    }

    #[test]
    fn test_resolve_unknown_root() {
        let err = UploadProfile::resolve(&endpoint("primary"), &HashMap::new()).unwrap_err();
        assert!(matches!(err, ProfileError::UnknownRoot(name) if name == "primary"));
    }

    #[test]
    fn test_resolve_blank_root() {
        let roots = HashMap::from([("primary".to_string(), "  ".to_string())]);
        assert!(UploadProfile::resolve(&endpoint("primary"), &roots).is_err());
    }
}
