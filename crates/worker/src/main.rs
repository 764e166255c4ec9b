//! Pipeline worker: processes a split design into a packaged module.
//!
//! Reads the splitting step's output JSON, drives the batch pipeline
//! against the configured generation service, and packages the combined
//! module into the local store.

mod config;

use std::sync::Arc;

use anyhow::Context;
use modcraft_core::manifest::PackageMetadata;
use modcraft_core::module::CombinedModule;
use modcraft_core::options::PackageOptions;
use modcraft_core::section::SectionDescriptor;
use modcraft_genai::api::HttpContentGenerator;
use modcraft_genai::scoring::HeuristicScorer;
use modcraft_packager::{PackageBuilder, PackageFile, PackageStore};
use modcraft_pipeline::BatchScheduler;
use serde::Deserialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::WorkerConfig;

/// Output of the upstream splitting step.
#[derive(Debug, Deserialize)]
struct SplitOutput {
    sections: Vec<SectionDescriptor>,
    #[serde(default)]
    recommended_batch_size: Option<usize>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "modcraft_worker=debug,modcraft=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = WorkerConfig::from_env();
    tracing::info!(
        generation_url = %config.generation_url,
        sections_path = %config.sections_path,
        "Worker starting",
    );

    let raw = std::fs::read_to_string(&config.sections_path)
        .with_context(|| format!("reading {}", config.sections_path))?;
    let split: SplitOutput = serde_json::from_str(&raw)
        .with_context(|| format!("parsing {}", config.sections_path))?;

    let mut options = config.processing.clone();
    if let Some(recommended) = split.recommended_batch_size {
        options.batch_size = recommended.max(1);
    }

    let generator = Arc::new(HttpContentGenerator::new(config.generation_url.clone()));
    let scheduler = BatchScheduler::new(generator, Arc::new(HeuristicScorer));
    let result = scheduler.process(&split.sections, &options).await?;

    tracing::info!(
        total = result.total_sections,
        completed = result.processed_sections,
        failed = result.failed_sections,
        skipped = result.skipped_sections,
        "Pipeline run finished",
    );

    let Some(module) = &result.combined_module else {
        tracing::warn!("No combined module produced, nothing to package");
        return Ok(());
    };

    let store = PackageStore::new(&config.package_dir);
    let builder = PackageBuilder::new(store);
    let metadata = PackageMetadata {
        name: config.module_name.clone(),
        version: config.module_version.clone(),
        author: config.module_author.clone(),
        description: module.meta.description.clone(),
        dependencies: vec![],
    };
    let package = builder.package_module(
        module_files(module)?,
        &PackageOptions::default(),
        &metadata,
    )?;

    tracing::info!(
        package_id = %package.package_id,
        path = %package.package_path.display(),
        expires_at = %package.expires_at,
        performance_score = package.validation_report.performance_score,
        "Package ready",
    );
    Ok(())
}

/// Lay the combined module out as package files.
fn module_files(module: &CombinedModule) -> anyhow::Result<Vec<PackageFile>> {
    let mut files = vec![
        PackageFile::new("module.html", module.html.clone()),
        PackageFile::new(
            "fields.json",
            serde_json::to_string_pretty(&module.fields)?,
        ),
        PackageFile::new("meta.json", serde_json::to_string_pretty(&module.meta)?),
    ];
    if !module.css.is_empty() {
        files.push(PackageFile::new("module.css", module.css.clone()));
    }
    Ok(files)
}
