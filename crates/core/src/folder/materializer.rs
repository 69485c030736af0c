//! Ensure-folder-hierarchy.

use tracing::debug;

use super::error::FolderError;
use super::path::FolderPath;
use crate::storage::{FolderHandle, StorageBackend};

/// Ensure every folder of `path` exists below `root` and return the leaf handle.
///
/// Segments are resolved left to right, one round trip at a time: look up a
/// folder with the segment's name under the current parent, take the first
/// match, or create it when none exists. Nothing is cached between calls, so
/// repeating a call with the same arguments re-resolves the same folders and
/// creates nothing new.
///
/// # Errors
///
/// Returns a [`FolderError`] naming the failing segment. Folders created for
/// earlier segments are not removed.
pub async fn ensure_path<B: StorageBackend>(
    backend: &B,
    root: &FolderHandle,
    path: &FolderPath,
) -> Result<FolderHandle, FolderError> {
    let mut current = root.clone();

    for (index, name) in path.iter().enumerate() {
        let existing = backend
            .find_folder(&current, name)
            .await
            .map_err(|e| FolderError::lookup_failed(index, name, e))?;

        // Names are not unique in Drive; the first match wins.
        current = match existing.into_iter().next() {
            Some(found) => {
                debug!(segment = index, name, folder = %found, "Folder exists");
                found
            }
            None => {
                let created = backend
                    .create_folder(&current, name)
                    .await
                    .map_err(|e| FolderError::create_failed(index, name, e))?;
                debug!(segment = index, name, folder = %created, "Folder created");
                created
            }
        };
    }

    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::folder::FolderErrorReason;
    use crate::storage::{DriveCall, DriveOperation, MemoryDrive};
    use proptest::prelude::*;

    fn root() -> FolderHandle {
        FolderHandle::new("R")
    }

    fn path(segments: &[&str]) -> FolderPath {
        FolderPath::new(segments.iter().copied()).expect("valid path")
    }

    #[tokio::test]
    async fn test_creates_missing_folders_in_order() {
        let drive = MemoryDrive::recording();
        let leaf = ensure_path(&drive, &root(), &path(&["Acme", "E123", "2024-01-01"]))
            .await
            .expect("should materialize");

        let creates: Vec<(FolderHandle, String)> = drive
            .calls()
            .into_iter()
            .filter_map(|call| match call {
                DriveCall::CreateFolder { parent, name } => Some((parent, name)),
                _ => None,
            })
            .collect();

        let acme = drive.children(&root(), "Acme")[0].clone();
        let employee = drive.children(&acme, "E123")[0].clone();
        assert_eq!(
            creates,
            vec![
                (root(), "Acme".to_string()),
                (acme.clone(), "E123".to_string()),
                (employee.clone(), "2024-01-01".to_string()),
            ]
        );
        assert_eq!(drive.children(&employee, "2024-01-01"), vec![leaf]);
    }

    #[tokio::test]
    async fn test_second_call_only_looks_up() {
        let drive = MemoryDrive::recording();
        let p = path(&["Acme", "E123", "2024-01-01"]);

        let first = ensure_path(&drive, &root(), &p).await.unwrap();
        let before = drive.calls().len();
        let second = ensure_path(&drive, &root(), &p).await.unwrap();

        assert_eq!(first, second);
        let after: Vec<DriveCall> = drive.calls().split_off(before);
        assert_eq!(after.len(), 3);
        assert!(after.iter().all(|c| c.operation() == DriveOperation::FindFolder));
    }

    #[tokio::test]
    async fn test_only_missing_segment_is_created() {
        let drive = MemoryDrive::recording();
        let acme = drive.insert_folder(&root(), "Acme");
        let employee = drive.insert_folder(&acme, "E123");

        ensure_path(&drive, &root(), &path(&["Acme", "E123", "2024-01-01"]))
            .await
            .unwrap();

        assert_eq!(drive.count(DriveOperation::FindFolder), 3);
        assert_eq!(
            drive
                .calls()
                .into_iter()
                .filter(|c| c.operation() == DriveOperation::CreateFolder)
                .collect::<Vec<_>>(),
            vec![DriveCall::CreateFolder {
                parent: employee,
                name: "2024-01-01".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn test_first_duplicate_wins() {
        let drive = MemoryDrive::recording();
        let first = drive.insert_folder(&root(), "Acme");
        drive.insert_folder(&root(), "Acme");

        let leaf = ensure_path(&drive, &root(), &path(&["Acme"])).await.unwrap();
        assert_eq!(leaf, first);
        assert_eq!(drive.count(DriveOperation::CreateFolder), 0);
    }

    #[tokio::test]
    async fn test_create_failure_keeps_earlier_folders() {
        let drive = MemoryDrive::recording();
        drive.fail_on(DriveOperation::CreateFolder, "E123");

        let err = ensure_path(&drive, &root(), &path(&["Acme", "E123", "2024-01-01"]))
            .await
            .unwrap_err();

        assert_eq!(err.reason, FolderErrorReason::CreateFailed);
        assert_eq!(err.at_segment, 1);
        assert_eq!(err.segment, "E123");
        assert_eq!(drive.children(&root(), "Acme").len(), 1);
        // Nothing after the failing segment was attempted.
        assert_eq!(drive.calls().len(), 4);
    }

    #[tokio::test]
    async fn test_lookup_failure() {
        let drive = MemoryDrive::recording();
        drive.fail_on(DriveOperation::FindFolder, "Acme");

        let err = ensure_path(&drive, &root(), &path(&["Acme", "E123"]))
            .await
            .unwrap_err();

        assert_eq!(err.reason, FolderErrorReason::LookupFailed);
        assert_eq!(err.at_segment, 0);
        assert_eq!(drive.count(DriveOperation::CreateFolder), 0);
    }

    #[tokio::test]
    async fn test_error_message_names_segment() {
        let drive = MemoryDrive::recording();
        drive.fail_on(DriveOperation::CreateFolder, "Acme");

        let err = ensure_path(&drive, &root(), &path(&["Acme"]))
            .await
            .unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("create_failed for folder 'Acme' at segment 0"));
        assert!(message.contains("503"));
    }

    // Materializing the same path twice yields the same handle, and every
    // folder is created at most once.
    proptest! {
        #[test]
        fn prop_ensure_path_is_idempotent(
            segments in prop::collection::vec("[a-zA-Z0-9 _-]{0,6}[a-zA-Z0-9]", 1..6),
            preexisting in 0usize..6,
        ) {
            let rt = tokio::runtime::Builder::new_current_thread()
                .build()
                .expect("runtime");
            let drive = MemoryDrive::recording();
            let p = FolderPath::new(segments.clone()).expect("valid path");

            let mut parent = root();
            for name in segments.iter().take(preexisting) {
                parent = drive.insert_folder(&parent, name);
            }

            let first = rt.block_on(ensure_path(&drive, &root(), &p)).expect("first call");
            let second = rt.block_on(ensure_path(&drive, &root(), &p)).expect("second call");

            prop_assert_eq!(first, second);
            let expected_creates = segments.len().saturating_sub(preexisting);
            prop_assert_eq!(drive.count(DriveOperation::CreateFolder), expected_creates);
            prop_assert_eq!(drive.count(DriveOperation::FindFolder), segments.len() * 2);
        }
    }
}
