//! Package building: the single entry point for turning module files
//! into a stored, integrity-checked archive.
//!
//! Pre-validation always runs; packaging is refused only on blocking
//! errors (missing or unparsable required files). Size and style
//! violations are carried into the manifest as warnings.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use modcraft_core::hashing::{canonical_json, sha256_hex};
use modcraft_core::manifest::{
    classify_file, compression_ratio, validation_status, ManifestFile, ManifestMetadata,
    PackageManifest, PackageMetadata, ValidationReport,
};
use modcraft_core::options::PackageOptions;
use uuid::Uuid;

use crate::archive::build_archive;
use crate::error::PackagingError;
use crate::files::PackageFile;
use crate::prevalidate::{prevalidate, SizeThresholds};
use crate::store::PackageStore;
use crate::transform::{minify_assets, synthesize_docs};

/// Name of the manifest copy embedded in the archive itself.
pub const EMBEDDED_MANIFEST_NAME: &str = "manifest.json";

/// Everything a caller needs to hand out a finished package.
#[derive(Debug, Clone)]
pub struct PackageResult {
    pub package_id: String,
    pub package_path: PathBuf,
    pub manifest: PackageManifest,
    pub download_url: String,
    pub expires_at: DateTime<Utc>,
    pub validation_report: ValidationReport,
}

/// Builds packages into a [`PackageStore`].
pub struct PackageBuilder {
    store: PackageStore,
    thresholds: SizeThresholds,
}

impl PackageBuilder {
    pub fn new(store: PackageStore) -> Self {
        Self {
            store,
            thresholds: SizeThresholds::default(),
        }
    }

    pub fn with_thresholds(store: PackageStore, thresholds: SizeThresholds) -> Self {
        Self { store, thresholds }
    }

    pub fn store(&self) -> &PackageStore {
        &self.store
    }

    /// Validate, transform, manifest, and archive the given files.
    ///
    /// Returns an error only for blocking validation failures and
    /// archive I/O; soft violations reduce the performance score and
    /// flow into the manifest's validation status instead.
    pub fn package_module(
        &self,
        files: Vec<PackageFile>,
        options: &PackageOptions,
        metadata: &PackageMetadata,
    ) -> Result<PackageResult, PackagingError> {
        tracing::info!(
            name = %metadata.name,
            version = %metadata.version,
            file_count = files.len(),
            format = ?options.format,
            "Packaging module",
        );

        let report = prevalidate(&files, &self.thresholds);
        if !report.is_valid {
            tracing::error!(
                errors = report.errors.len(),
                "Packaging refused by pre-validation",
            );
            return Err(PackagingError::Validation(report.errors.join("; ")));
        }

        let mut files = files;
        if options.minify_assets {
            minify_assets(&mut files);
        }
        if options.include_documentation {
            let doc = synthesize_docs(&files);
            files.push(PackageFile::new("README.md", doc));
        }

        let package_id = Uuid::new_v4().to_string();
        let created_at = Utc::now();

        let entries: Vec<ManifestFile> = files
            .iter()
            .map(|f| ManifestFile {
                path: f.path.clone(),
                size_bytes: f.contents.len() as u64,
                checksum: sha256_hex(&f.contents),
                file_type: classify_file(&f.path),
            })
            .collect();
        let total_size_bytes: u64 = entries.iter().map(|e| e.size_bytes).sum();

        // Measure compression over the content files alone so the ratio
        // recorded in the manifest matches what the embedded manifest
        // copy and the sidecar both report.
        let measured = build_archive(&files, options.format, options.compression)?;
        let ratio = compression_ratio(total_size_bytes, measured.len() as u64);

        let manifest = PackageManifest {
            package_id: package_id.clone(),
            name: metadata.name.clone(),
            version: metadata.version.clone(),
            author: metadata.author.clone(),
            description: metadata.description.clone(),
            dependencies: metadata.dependencies.clone(),
            files: entries,
            metadata: ManifestMetadata {
                total_size_bytes,
                file_count: files.len(),
                compression_ratio: ratio,
                validation_status: validation_status(&report),
                validation_errors: report
                    .errors
                    .iter()
                    .chain(report.warnings.iter())
                    .cloned()
                    .collect(),
            },
            created_at,
        };

        let mut archive_files = files;
        archive_files.push(PackageFile::new(
            EMBEDDED_MANIFEST_NAME,
            canonical_json(&manifest)?,
        ));
        let archive_bytes = build_archive(&archive_files, options.format, options.compression)?;

        let package_path = self.store.save(&manifest, &archive_bytes, options.format)?;
        let expires_at = self.store.expires_at(created_at);

        tracing::info!(
            package_id = %package_id,
            total_size_bytes,
            compression_ratio = ratio,
            performance_score = report.performance_score,
            "Package built",
        );

        Ok(PackageResult {
            download_url: format!("/api/packages/{package_id}/download"),
            package_id,
            package_path,
            manifest,
            expires_at,
            validation_report: report,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use modcraft_core::manifest::ValidationStatus;
    use modcraft_core::options::{ArchiveFormat, CompressionLevel};

    fn metadata() -> PackageMetadata {
        PackageMetadata {
            name: "hero-module".to_string(),
            version: "1.0.0".to_string(),
            author: "studio".to_string(),
            description: "Hero banner".to_string(),
            dependencies: vec![],
        }
    }

    fn module_files() -> Vec<PackageFile> {
        vec![
            PackageFile::new("module.html", "<div>{{ heading }}</div>"),
            PackageFile::new("fields.json", r#"[{"id": "heading", "name": "Heading"}]"#),
            PackageFile::new("meta.json", r#"{"label": "Hero", "description": "Banner"}"#),
            PackageFile::new("module.css", ".hero { color: red; }"),
        ]
    }

    fn builder() -> (tempfile::TempDir, PackageBuilder) {
        let dir = tempfile::tempdir().unwrap();
        let store = PackageStore::new(dir.path());
        (dir, PackageBuilder::new(store))
    }

    #[test]
    fn package_writes_archive_and_sidecar() {
        let (_dir, builder) = builder();
        let result = builder
            .package_module(module_files(), &PackageOptions::default(), &metadata())
            .unwrap();

        assert!(result.package_path.exists());
        assert!(builder
            .store()
            .manifest_path(&result.package_id)
            .exists());
        assert_eq!(
            result.manifest.metadata.validation_status,
            ValidationStatus::Valid
        );
        assert!(result.validation_report.is_valid);
        assert_eq!(result.validation_report.performance_score, 100);
        assert!(result.expires_at > result.manifest.created_at);
        assert!(result.download_url.contains(&result.package_id));
    }

    #[test]
    fn missing_required_file_refused_without_artifacts() {
        let (_dir, builder) = builder();
        let files = vec![PackageFile::new("module.html", "<div></div>")];
        let err = builder
            .package_module(files, &PackageOptions::default(), &metadata())
            .unwrap_err();
        assert_matches!(err, PackagingError::Validation(_));
        assert!(builder
            .store()
            .list_packages(&Default::default())
            .is_empty());
    }

    #[test]
    fn invalid_fields_json_refused() {
        let (_dir, builder) = builder();
        let mut files = module_files();
        files[1] = PackageFile::new("fields.json", "{broken");
        let err = builder
            .package_module(files, &PackageOptions::default(), &metadata())
            .unwrap_err();
        assert_matches!(err, PackagingError::Validation(msg) if msg.contains("fields.json"));
        assert!(builder
            .store()
            .list_packages(&Default::default())
            .is_empty());
    }

    #[test]
    fn identical_content_gets_identical_checksums() {
        let (_dir, builder) = builder();
        let mut files = module_files();
        files.push(PackageFile::new("copy_a.css", ".x { margin: 0; }"));
        files.push(PackageFile::new("copy_b.css", ".x { margin: 0; }"));
        let result = builder
            .package_module(files, &PackageOptions::default(), &metadata())
            .unwrap();

        let a = result
            .manifest
            .files
            .iter()
            .find(|f| f.path == "copy_a.css")
            .unwrap();
        let b = result
            .manifest
            .files
            .iter()
            .find(|f| f.path == "copy_b.css")
            .unwrap();
        assert_eq!(a.checksum, b.checksum);
        assert_ne!(a.path, b.path);
    }

    #[test]
    fn changed_content_changes_checksum() {
        let (_dir, builder) = builder();
        let result_a = builder
            .package_module(module_files(), &PackageOptions::default(), &metadata())
            .unwrap();
        let mut files = module_files();
        files[0] = PackageFile::new("module.html", "<div>{{ heading }}!</div>");
        let result_b = builder
            .package_module(files, &PackageOptions::default(), &metadata())
            .unwrap();

        let checksum = |r: &PackageResult| {
            r.manifest
                .files
                .iter()
                .find(|f| f.path == "module.html")
                .unwrap()
                .checksum
                .clone()
        };
        assert_ne!(checksum(&result_a), checksum(&result_b));
    }

    #[test]
    fn documentation_included_when_requested() {
        let (_dir, builder) = builder();
        let options = PackageOptions {
            include_documentation: true,
            ..Default::default()
        };
        let result = builder
            .package_module(module_files(), &options, &metadata())
            .unwrap();
        assert!(result.manifest.files.iter().any(|f| f.path == "README.md"));
    }

    #[test]
    fn documentation_omitted_when_disabled() {
        let (_dir, builder) = builder();
        let options = PackageOptions {
            include_documentation: false,
            ..Default::default()
        };
        let result = builder
            .package_module(module_files(), &options, &metadata())
            .unwrap();
        assert!(!result.manifest.files.iter().any(|f| f.path == "README.md"));
    }

    #[test]
    fn minification_shrinks_markup() {
        let (_dir, builder) = builder();
        let mut files = module_files();
        files[0] = PackageFile::new("module.html", "<div>\n    <p>x</p>\n</div>");
        let original_size = files[0].contents.len() as u64;

        let options = PackageOptions {
            minify_assets: true,
            include_documentation: false,
            ..Default::default()
        };
        let result = builder
            .package_module(files, &options, &metadata())
            .unwrap();
        let entry = result
            .manifest
            .files
            .iter()
            .find(|f| f.path == "module.html")
            .unwrap();
        assert!(entry.size_bytes < original_size);
    }

    #[test]
    fn soft_violations_reduce_score_but_package_succeeds() {
        let (_dir, builder) = builder();
        let mut files = module_files();
        files.push(PackageFile::new("big.css", vec![b'a'; 200 * 1024]));
        let result = builder
            .package_module(files, &PackageOptions::default(), &metadata())
            .unwrap();
        assert_eq!(
            result.manifest.metadata.validation_status,
            ValidationStatus::Warning
        );
        assert_eq!(result.validation_report.performance_score, 90);
        assert!(!result.manifest.metadata.validation_errors.is_empty());
    }

    #[test]
    fn tar_format_produces_tar_path() {
        let (_dir, builder) = builder();
        let options = PackageOptions {
            format: ArchiveFormat::Tar,
            compression: CompressionLevel::None,
            ..Default::default()
        };
        let result = builder
            .package_module(module_files(), &options, &metadata())
            .unwrap();
        assert!(result
            .package_path
            .to_string_lossy()
            .ends_with(".tar"));
    }

    #[test]
    fn total_size_sums_file_entries() {
        let (_dir, builder) = builder();
        let options = PackageOptions {
            include_documentation: false,
            ..Default::default()
        };
        let result = builder
            .package_module(module_files(), &options, &metadata())
            .unwrap();
        let sum: u64 = result.manifest.files.iter().map(|f| f.size_bytes).sum();
        assert_eq!(result.manifest.metadata.total_size_bytes, sum);
        assert_eq!(result.manifest.metadata.file_count, 4);
    }
}
