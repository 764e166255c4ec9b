//! On-disk package store.
//!
//! Layout: one directory per package id under the store root, holding
//! the archive (`<id>.zip` or `<id>.tar`) and a canonical-JSON manifest
//! sidecar (`<id>_manifest.json`). Writes are keyed by freshly
//! generated ids, so concurrent packaging calls never collide; listing
//! and deletion are eventually consistent with concurrent writers.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use modcraft_core::hashing;
use modcraft_core::manifest::PackageManifest;
use modcraft_core::options::ArchiveFormat;

use crate::error::PackagingError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Default package retention before the expiry sweep removes it.
pub const DEFAULT_PACKAGE_TTL_HOURS: i64 = 7 * 24;

/// Manifest sidecar suffix appended to the package id.
pub const MANIFEST_SUFFIX: &str = "_manifest.json";

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

/// Listing filters; all present filters must match.
#[derive(Debug, Clone, Default)]
pub struct PackageFilters {
    pub author: Option<String>,
    pub name_contains: Option<String>,
    pub created_after: Option<DateTime<Utc>>,
}

impl PackageFilters {
    fn matches(&self, manifest: &PackageManifest) -> bool {
        if let Some(author) = &self.author {
            if &manifest.author != author {
                return false;
            }
        }
        if let Some(fragment) = &self.name_contains {
            if !manifest.name.contains(fragment.as_str()) {
                return false;
            }
        }
        if let Some(after) = self.created_after {
            if manifest.created_at <= after {
                return false;
            }
        }
        true
    }
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// Filesystem-backed package store rooted at one directory.
pub struct PackageStore {
    root: PathBuf,
    ttl: Duration,
}

impl PackageStore {
    /// Create a store with the default retention.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ttl: Duration::hours(DEFAULT_PACKAGE_TTL_HOURS),
        }
    }

    /// Create a store with a custom retention in hours.
    pub fn with_ttl(root: impl Into<PathBuf>, ttl_hours: i64) -> Self {
        Self {
            root: root.into(),
            ttl: Duration::hours(ttl_hours),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// When a package created at `created_at` stops being served.
    pub fn expires_at(&self, created_at: DateTime<Utc>) -> DateTime<Utc> {
        created_at + self.ttl
    }

    fn package_dir(&self, package_id: &str) -> PathBuf {
        self.root.join(package_id)
    }

    /// Path of the archive file for a package.
    pub fn archive_path(&self, package_id: &str, format: ArchiveFormat) -> PathBuf {
        self.package_dir(package_id)
            .join(format!("{package_id}.{}", format.extension()))
    }

    /// Path of the manifest sidecar for a package.
    pub fn manifest_path(&self, package_id: &str) -> PathBuf {
        self.package_dir(package_id)
            .join(format!("{package_id}{MANIFEST_SUFFIX}"))
    }

    /// Persist a finished package: archive bytes plus canonical-JSON
    /// manifest sidecar. Returns the archive path.
    pub fn save(
        &self,
        manifest: &PackageManifest,
        archive: &[u8],
        format: ArchiveFormat,
    ) -> Result<PathBuf, PackagingError> {
        let dir = self.package_dir(&manifest.package_id);
        fs::create_dir_all(&dir)?;

        let archive_path = self.archive_path(&manifest.package_id, format);
        fs::write(&archive_path, archive)?;

        let sidecar = hashing::canonical_json(manifest)?;
        fs::write(self.manifest_path(&manifest.package_id), sidecar)?;

        tracing::info!(
            package_id = %manifest.package_id,
            path = %archive_path.display(),
            size_bytes = archive.len(),
            "Package stored",
        );
        Ok(archive_path)
    }

    /// Read a package's manifest, `None` when the package does not exist.
    pub fn get_package_info(
        &self,
        package_id: &str,
    ) -> Result<Option<PackageManifest>, PackagingError> {
        if !valid_package_id(package_id) {
            return Ok(None);
        }
        let path = self.manifest_path(package_id);
        if !path.exists() {
            return Ok(None);
        }
        let text = fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&text)?))
    }

    /// List manifests matching `filters`, newest first.
    ///
    /// Unreadable entries are skipped with a warning rather than failing
    /// the whole listing.
    pub fn list_packages(&self, filters: &PackageFilters) -> Vec<PackageManifest> {
        let Ok(entries) = fs::read_dir(&self.root) else {
            return Vec::new();
        };

        let mut manifests = Vec::new();
        for entry in entries.flatten() {
            let Some(package_id) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            match self.get_package_info(&package_id) {
                Ok(Some(manifest)) => {
                    if filters.matches(&manifest) {
                        manifests.push(manifest);
                    }
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(
                        package_id = %package_id,
                        error = %e,
                        "Skipping unreadable package manifest",
                    );
                }
            }
        }

        manifests.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        manifests
    }

    /// Remove all artifact files of a package.
    ///
    /// Best-effort and idempotent: returns `true` if the package
    /// existed and was removed, `false` otherwise.
    pub fn delete_package(&self, package_id: &str) -> bool {
        if !valid_package_id(package_id) {
            return false;
        }
        let dir = self.package_dir(package_id);
        if !dir.exists() {
            return false;
        }
        match fs::remove_dir_all(&dir) {
            Ok(()) => {
                tracing::info!(package_id, "Package deleted");
                true
            }
            Err(e) => {
                tracing::warn!(package_id, error = %e, "Failed to delete package");
                false
            }
        }
    }

    /// Delete every package whose retention has elapsed at `now`.
    /// Returns the number of packages removed.
    pub fn cleanup_expired(&self, now: DateTime<Utc>) -> usize {
        let expired: Vec<String> = self
            .list_packages(&PackageFilters::default())
            .into_iter()
            .filter(|m| self.expires_at(m.created_at) <= now)
            .map(|m| m.package_id)
            .collect();

        let mut removed = 0;
        for package_id in expired {
            if self.delete_package(&package_id) {
                removed += 1;
            }
        }
        if removed > 0 {
            tracing::info!(removed, "Expired packages cleaned up");
        }
        removed
    }
}

/// Package ids are generated UUIDs; anything that could escape the
/// store directory is rejected outright.
fn valid_package_id(package_id: &str) -> bool {
    !package_id.is_empty()
        && !package_id.contains('/')
        && !package_id.contains('\\')
        && package_id != "."
        && package_id != ".."
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use modcraft_core::manifest::{ManifestMetadata, ValidationStatus};

    fn manifest(package_id: &str, author: &str, created_at: DateTime<Utc>) -> PackageManifest {
        PackageManifest {
            package_id: package_id.to_string(),
            name: format!("module-{package_id}"),
            version: "1.0.0".to_string(),
            author: author.to_string(),
            description: String::new(),
            dependencies: vec![],
            files: vec![],
            metadata: ManifestMetadata {
                total_size_bytes: 0,
                file_count: 0,
                compression_ratio: 0.0,
                validation_status: ValidationStatus::Valid,
                validation_errors: vec![],
            },
            created_at,
        }
    }

    #[test]
    fn save_then_get_roundtrips() {
        let dir = tempfile::tempdir().unwrap();
        let store = PackageStore::new(dir.path());
        let m = manifest("p1", "alice", Utc::now());
        let path = store.save(&m, b"archive-bytes", ArchiveFormat::Zip).unwrap();
        assert!(path.ends_with("p1/p1.zip"));
        assert!(path.exists());

        let loaded = store.get_package_info("p1").unwrap().unwrap();
        assert_eq!(loaded.package_id, "p1");
        assert_eq!(loaded.author, "alice");
    }

    #[test]
    fn get_missing_package_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = PackageStore::new(dir.path());
        assert!(store.get_package_info("nope").unwrap().is_none());
    }

    #[test]
    fn traversal_ids_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = PackageStore::new(dir.path());
        assert!(store.get_package_info("../escape").unwrap().is_none());
        assert!(!store.delete_package("../escape"));
    }

    #[test]
    fn list_sorted_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let store = PackageStore::new(dir.path());
        let older = Utc::now() - Duration::hours(2);
        let newer = Utc::now();
        store
            .save(&manifest("old", "a", older), b"x", ArchiveFormat::Zip)
            .unwrap();
        store
            .save(&manifest("new", "a", newer), b"x", ArchiveFormat::Zip)
            .unwrap();

        let listed = store.list_packages(&PackageFilters::default());
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].package_id, "new");
        assert_eq!(listed[1].package_id, "old");
    }

    #[test]
    fn list_filters_by_author() {
        let dir = tempfile::tempdir().unwrap();
        let store = PackageStore::new(dir.path());
        store
            .save(&manifest("p1", "alice", Utc::now()), b"x", ArchiveFormat::Zip)
            .unwrap();
        store
            .save(&manifest("p2", "bob", Utc::now()), b"x", ArchiveFormat::Zip)
            .unwrap();

        let filters = PackageFilters {
            author: Some("alice".to_string()),
            ..Default::default()
        };
        let listed = store.list_packages(&filters);
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].package_id, "p1");
    }

    #[test]
    fn list_filters_by_created_after() {
        let dir = tempfile::tempdir().unwrap();
        let store = PackageStore::new(dir.path());
        let cutoff = Utc::now();
        store
            .save(
                &manifest("old", "a", cutoff - Duration::hours(1)),
                b"x",
                ArchiveFormat::Zip,
            )
            .unwrap();
        store
            .save(
                &manifest("new", "a", cutoff + Duration::hours(1)),
                b"x",
                ArchiveFormat::Zip,
            )
            .unwrap();

        let filters = PackageFilters {
            created_after: Some(cutoff),
            ..Default::default()
        };
        let listed = store.list_packages(&filters);
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].package_id, "new");
    }

    #[test]
    fn delete_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = PackageStore::new(dir.path());
        store
            .save(&manifest("p1", "a", Utc::now()), b"x", ArchiveFormat::Tar)
            .unwrap();

        assert!(store.delete_package("p1"));
        assert!(!store.delete_package("p1"));
        assert!(store.get_package_info("p1").unwrap().is_none());
    }

    #[test]
    fn cleanup_removes_only_expired() {
        let dir = tempfile::tempdir().unwrap();
        let store = PackageStore::with_ttl(dir.path(), 24);
        let now = Utc::now();
        store
            .save(
                &manifest("stale", "a", now - Duration::hours(48)),
                b"x",
                ArchiveFormat::Zip,
            )
            .unwrap();
        store
            .save(&manifest("fresh", "a", now), b"x", ArchiveFormat::Zip)
            .unwrap();

        let removed = store.cleanup_expired(now);
        assert_eq!(removed, 1);
        assert!(store.get_package_info("stale").unwrap().is_none());
        assert!(store.get_package_info("fresh").unwrap().is_some());
    }

    #[test]
    fn manifest_sidecar_is_canonical_json() {
        let dir = tempfile::tempdir().unwrap();
        let store = PackageStore::new(dir.path());
        let m = manifest("p1", "a", Utc::now());
        store.save(&m, b"x", ArchiveFormat::Zip).unwrap();

        let text = fs::read_to_string(store.manifest_path("p1")).unwrap();
        assert_eq!(text, hashing::canonical_json(&m).unwrap());
    }
}
