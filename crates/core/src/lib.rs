//! Domain types and pure logic for the module production pipeline.
//!
//! This crate has zero internal dependencies so it can be used by the
//! pipeline, the generation adapter, the packager, and any future CLI
//! tooling without dragging in I/O concerns.

pub mod error;
pub mod hashing;
pub mod manifest;
pub mod module;
pub mod options;
pub mod processing;
pub mod quality;
pub mod section;
pub mod status;

pub use error::CoreError;
pub use module::{CombinedModule, FieldDef, ModuleData, ModuleMeta};
pub use options::{ArchiveFormat, CompressionLevel, PackageOptions, ProcessingOptions};
pub use processing::{ProcessedSection, ProcessingBatch, ProcessingResult};
pub use section::{SectionDescriptor, SectionKind};
pub use status::{BatchStatus, SectionStatus};
