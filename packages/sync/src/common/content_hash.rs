use serde::Serialize;
use sha2::{Digest, Sha256};

/// Generate a content hash for change detection
///
/// SHA256 over the JSON encoding of `value`, hex encoded. Field order in the
/// encoding follows the value's own order, so callers sort collections first
/// when order should not matter.
pub fn generate_content_hash<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<String> {
    let bytes = serde_json::to_vec(value)?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(format!("{:x}", hasher.finalize()))
}
