//! Module packaging: validation, transforms, manifest, and archive store.
//!
//! Takes the files of a combined module, validates them, optionally
//! minifies and documents them, and emits a versioned, integrity-checked
//! archive with a canonical-JSON manifest sidecar. The store exposes
//! lifecycle operations (get/list/delete) plus an expiry sweep.

pub mod archive;
pub mod builder;
pub mod error;
pub mod files;
pub mod prevalidate;
pub mod store;
pub mod transform;

pub use builder::{PackageBuilder, PackageResult};
pub use error::PackagingError;
pub use files::PackageFile;
pub use store::{PackageFilters, PackageStore};
