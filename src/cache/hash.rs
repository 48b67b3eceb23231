// SHA-256 (PNG bytes + output-affecting settings)
//
// Computes a cache key from the source bytes and the settings that change the
// encoded JPEG. The key is a SHA-256 hash encoded as a lowercase hexadecimal string.

use std::collections::BTreeMap;

use sha2::{Digest, Sha256};

use crate::codec::{DecodeLimits, Quality};
use crate::convert::compositor::WHITE;

/// Settings that change the outcome of a conversion.
///
/// `limits` decide whether a conversion succeeds at all, so an entry made
/// under looser limits must not satisfy a lookup under tighter ones.
pub struct CacheSettings {
    pub quality: Quality,
    pub limits: DecodeLimits,
}

/// Settings as JSON with keys in alphabetical order.
fn settings_to_canonical_json(settings: &CacheSettings) -> String {
    let mut map = BTreeMap::new();
    map.insert("background", serde_json::json!(hex::encode(WHITE.0)));
    map.insert("encoder", serde_json::json!("image-jpeg"));
    map.insert("max_alloc", serde_json::json!(settings.limits.max_alloc));
    map.insert("max_height", serde_json::json!(settings.limits.max_height));
    map.insert("max_width", serde_json::json!(settings.limits.max_width));
    map.insert(
        "quality",
        serde_json::json!(settings.quality.to_jpeg_scale()),
    );
    serde_json::to_string(&map).expect("serializing primitive cache settings to JSON must not fail")
}

/// Cache key for converting `png_bytes` with `settings`.
///
/// Hash input: `png_bytes || settings_canonical_json`. The key depends on
/// content only, so the same image under two paths shares one entry.
pub fn compute_cache_key(png_bytes: &[u8], settings: &CacheSettings) -> String {
    let mut hasher = Sha256::new();
    hasher.update((png_bytes.len() as u64).to_le_bytes());
    hasher.update(png_bytes);

    let settings_json = settings_to_canonical_json(settings);
    hasher.update(settings_json.as_bytes());

    hex::encode(hasher.finalize())
}
