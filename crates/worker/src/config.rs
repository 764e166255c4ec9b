//! Worker configuration loaded from environment variables.

use modcraft_core::options::ProcessingOptions;

/// Configuration for one worker run.
///
/// All fields have defaults suitable for local development; override via
/// environment variables in production.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Base URL of the content-generation service
    /// (default: `http://localhost:8700`).
    pub generation_url: String,
    /// Path of the split-output JSON describing the sections to process
    /// (default: `sections.json`).
    pub sections_path: String,
    /// Root directory of the package store (default: `packages`).
    pub package_dir: String,
    /// Name recorded in the package manifest (default: `generated-module`).
    pub module_name: String,
    /// Version recorded in the package manifest (default: `0.1.0`).
    pub module_version: String,
    /// Author recorded in the package manifest (default: `modcraft`).
    pub module_author: String,
    /// Pipeline options assembled from the `MODCRAFT_*` variables.
    pub processing: ProcessingOptions,
}

impl WorkerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                      | Default                  |
    /// |------------------------------|--------------------------|
    /// | `MODCRAFT_GENERATION_URL`    | `http://localhost:8700`  |
    /// | `MODCRAFT_SECTIONS_PATH`     | `sections.json`          |
    /// | `MODCRAFT_PACKAGE_DIR`       | `packages`               |
    /// | `MODCRAFT_MODULE_NAME`       | `generated-module`       |
    /// | `MODCRAFT_MODULE_VERSION`    | `0.1.0`                  |
    /// | `MODCRAFT_MODULE_AUTHOR`     | `modcraft`               |
    /// | `MODCRAFT_BATCH_SIZE`        | `5`                      |
    /// | `MODCRAFT_QUALITY_THRESHOLD` | `75`                     |
    /// | `MODCRAFT_TIMEOUT_SECS`      | `120`                    |
    pub fn from_env() -> Self {
        let generation_url = std::env::var("MODCRAFT_GENERATION_URL")
            .unwrap_or_else(|_| "http://localhost:8700".into());
        let sections_path =
            std::env::var("MODCRAFT_SECTIONS_PATH").unwrap_or_else(|_| "sections.json".into());
        let package_dir =
            std::env::var("MODCRAFT_PACKAGE_DIR").unwrap_or_else(|_| "packages".into());
        let module_name =
            std::env::var("MODCRAFT_MODULE_NAME").unwrap_or_else(|_| "generated-module".into());
        let module_version =
            std::env::var("MODCRAFT_MODULE_VERSION").unwrap_or_else(|_| "0.1.0".into());
        let module_author =
            std::env::var("MODCRAFT_MODULE_AUTHOR").unwrap_or_else(|_| "modcraft".into());

        let batch_size: usize = std::env::var("MODCRAFT_BATCH_SIZE")
            .unwrap_or_else(|_| "5".into())
            .parse()
            .expect("MODCRAFT_BATCH_SIZE must be a valid usize");
        let quality_threshold: f64 = std::env::var("MODCRAFT_QUALITY_THRESHOLD")
            .unwrap_or_else(|_| "75".into())
            .parse()
            .expect("MODCRAFT_QUALITY_THRESHOLD must be a valid number");
        let timeout_per_section_secs: u64 = std::env::var("MODCRAFT_TIMEOUT_SECS")
            .unwrap_or_else(|_| "120".into())
            .parse()
            .expect("MODCRAFT_TIMEOUT_SECS must be a valid u64");

        Self {
            generation_url,
            sections_path,
            package_dir,
            module_name,
            module_version,
            module_author,
            processing: ProcessingOptions {
                batch_size,
                quality_threshold,
                timeout_per_section_secs,
                ..Default::default()
            },
        }
    }
}
