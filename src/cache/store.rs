// File-system cache: hash -> converted JPEG
//
// Entries: <cache_dir>/<hex_hash>/converted.jpg + metadata.json

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::convert::ConvertedImage;
use crate::error::ConvertError;

/// Distinguishes scratch directories of concurrent writers in this process.
static TMP_COUNTER: AtomicU64 = AtomicU64::new(0);

fn unique_sibling(dir: &Path, tag: &str) -> PathBuf {
    dir.with_extension(format!(
        "{tag}.{}.{}",
        std::process::id(),
        TMP_COUNTER.fetch_add(1, Ordering::Relaxed)
    ))
}

/// Files every complete entry has.
const CACHE_FILES: &[&str] = &["converted.jpg", "metadata.json"];

/// File-system backed cache of converted images.
///
/// Each entry lives in `<cache_dir>/<hex_hash>/`.
pub struct CacheStore {
    cache_dir: PathBuf,
}

/// Contents of metadata.json.
#[derive(serde::Serialize, serde::Deserialize)]
struct CacheMetadata {
    cache_key: String,
    width: u32,
    height: u32,
    byte_len: usize,
}

/// Keys must be exactly 64 lowercase hex characters, which also keeps them
/// from escaping the cache directory.
fn validate_cache_key(key: &str) -> crate::error::Result<()> {
    if key.len() == 64 && key.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
        Ok(())
    } else {
        Err(ConvertError::cache(format!(
            "invalid cache key: expected 64-character lowercase hex string, got '{}'",
            key
        )))
    }
}

impl CacheStore {
    pub fn new(cache_dir: impl AsRef<Path>) -> Self {
        Self {
            cache_dir: cache_dir.as_ref().to_path_buf(),
        }
    }

    fn key_dir(&self, key: &str) -> crate::error::Result<PathBuf> {
        validate_cache_key(key)?;
        Ok(self.cache_dir.join(key))
    }

    /// Store a converted image under `key`.
    ///
    /// Files are written to a temporary directory private to this call and
    /// renamed into place, so a reader never sees a half-written entry and
    /// concurrent writers of the same key never share a temp directory.
    pub fn store(&self, key: &str, image: &ConvertedImage) -> crate::error::Result<()> {
        let dir = self.key_dir(key)?;
        let tmp_dir = unique_sibling(&dir, "tmp");

        let result = self.write_entry(key, image, &tmp_dir, &dir);
        if tmp_dir.exists() {
            let _ = fs::remove_dir_all(&tmp_dir);
        }
        result
    }

    fn write_entry(
        &self,
        key: &str,
        image: &ConvertedImage,
        tmp_dir: &Path,
        dir: &Path,
    ) -> crate::error::Result<()> {
        fs::create_dir_all(tmp_dir).map_err(|e| ConvertError::cache(e.to_string()))?;

        fs::write(tmp_dir.join("converted.jpg"), image.bytes())
            .map_err(|e| ConvertError::cache(e.to_string()))?;

        let metadata = CacheMetadata {
            cache_key: key.to_string(),
            width: image.width(),
            height: image.height(),
            byte_len: image.len(),
        };
        let metadata_json = serde_json::to_string(&metadata)?;
        fs::write(tmp_dir.join("metadata.json"), metadata_json.as_bytes())
            .map_err(|e| ConvertError::cache(e.to_string()))?;

        // Move the old entry aside in one step so `dir` is only ever absent
        // or complete, never half deleted.
        if dir.exists() {
            let old_dir = unique_sibling(dir, "old");
            if fs::rename(dir, &old_dir).is_ok() {
                let _ = fs::remove_dir_all(&old_dir);
            }
        }

        match fs::rename(tmp_dir, dir) {
            Ok(()) => Ok(()),
            // Another writer placed an entry for the same key in between;
            // equal keys mean equal content, so theirs is as good as ours.
            Err(_) if self.contains(key) => Ok(()),
            Err(e) => Err(ConvertError::cache(e.to_string())),
        }
    }

    /// Fetch the entry for `key`. `None` on a miss.
    ///
    /// An entry whose metadata disagrees with its key or its JPEG is an error.
    pub fn retrieve(&self, key: &str) -> crate::error::Result<Option<ConvertedImage>> {
        let dir = self.key_dir(key)?;
        if !dir.exists() {
            return Ok(None);
        }

        let metadata_str = fs::read_to_string(dir.join("metadata.json"))
            .map_err(|e| ConvertError::cache(e.to_string()))?;
        let metadata: CacheMetadata = serde_json::from_str(&metadata_str)?;

        if metadata.cache_key != key {
            return Err(ConvertError::cache(format!(
                "cache key mismatch: expected '{}', found '{}'",
                key, metadata.cache_key
            )));
        }

        let bytes =
            fs::read(dir.join("converted.jpg")).map_err(|e| ConvertError::cache(e.to_string()))?;

        if bytes.len() != metadata.byte_len || !bytes.starts_with(&[0xFF, 0xD8]) {
            return Err(ConvertError::cache(format!(
                "corrupt cache entry '{}': expected {} JPEG bytes, found {}",
                key,
                metadata.byte_len,
                bytes.len()
            )));
        }

        Ok(Some(ConvertedImage::from_parts(
            bytes,
            metadata.width,
            metadata.height,
        )))
    }

    /// Whether a complete entry exists for `key`.
    pub fn contains(&self, key: &str) -> bool {
        let dir = match self.key_dir(key) {
            Ok(d) => d,
            Err(_) => return false,
        };
        CACHE_FILES.iter().all(|f| dir.join(f).exists())
    }
}
