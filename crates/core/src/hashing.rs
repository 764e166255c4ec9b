//! SHA-256 digests and canonical JSON.
//!
//! Checksums are content-addressed: derived purely from file bytes, so
//! identical content always yields identical digests. Manifests are
//! serialized canonically (sorted keys, no whitespace) so the manifest
//! file itself hashes deterministically.

use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};

/// Compute a SHA-256 hex digest of the given bytes.
pub fn sha256_hex(data: &[u8]) -> String {
    let hash = Sha256::digest(data);
    format!("{hash:x}")
}

/// Serialize a value as canonical JSON: object keys sorted, no
/// insignificant whitespace.
pub fn canonical_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let v: Value = serde_json::to_value(value)?;
    serde_json::to_string(&sort_keys(&v))
}

fn sort_keys(v: &Value) -> Value {
    match v {
        Value::Object(map) => {
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.clone(), sort_keys(v)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.iter().map(sort_keys).collect()),
        _ => v.clone(),
    }
}
