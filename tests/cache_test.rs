// Cache key and file-system store tests.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, RgbaImage};
use png_to_jpg::cache::hash::{CacheSettings, compute_cache_key};
use png_to_jpg::cache::store::CacheStore;
use png_to_jpg::codec::{DecodeLimits, Quality};
use png_to_jpg::convert::{ConvertedImage, convert};
use tempfile::tempdir;

fn sample_converted() -> ConvertedImage {
    let mut buf = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(RgbaImage::new(6, 4))
        .write_to(&mut buf, ImageFormat::Png)
        .expect("encode PNG fixture");
    convert(buf.get_ref(), 0.8).expect("convert")
}

fn settings(quality: f32) -> CacheSettings {
    CacheSettings {
        quality: Quality::new(quality).unwrap(),
        limits: DecodeLimits::default(),
    }
}

// ---- hash.rs tests ----

#[test]
fn test_compute_cache_key() {
    let key = compute_cache_key(b"png bytes", &settings(0.9));

    // SHA-256 produces a 64-character hex string
    assert_eq!(key.len(), 64, "Cache key should be 64 hex characters");
    assert!(key.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
}

#[test]
fn test_cache_key_deterministic() {
    let key1 = compute_cache_key(b"same", &settings(0.9));
    let key2 = compute_cache_key(b"same", &settings(0.9));
    assert_eq!(key1, key2, "Same inputs should produce the same cache key");
}

#[test]
fn test_cache_key_differs_with_content_or_quality() {
    let base = compute_cache_key(b"one", &settings(0.9));
    assert_ne!(base, compute_cache_key(b"two", &settings(0.9)));
    assert_ne!(base, compute_cache_key(b"one", &settings(0.5)));

    let tight = CacheSettings {
        limits: DecodeLimits::with_max_dimension(32),
        ..settings(0.9)
    };
    assert_ne!(base, compute_cache_key(b"one", &tight));
}

// ---- store.rs tests ----

#[test]
fn test_store_then_retrieve() {
    let dir = tempdir().expect("tempdir");
    let store = CacheStore::new(dir.path());
    let key = compute_cache_key(b"img", &settings(0.8));
    let image = sample_converted();

    assert!(!store.contains(&key));
    store.store(&key, &image).expect("store");
    assert!(store.contains(&key));

    let cached = store.retrieve(&key).expect("retrieve").expect("cache hit");
    assert_eq!(cached, image);
    assert!(!dir.path().join(format!("{key}.tmp")).exists());
}

#[test]
fn test_retrieve_miss_returns_none() {
    let dir = tempdir().expect("tempdir");
    let store = CacheStore::new(dir.path());
    let key = compute_cache_key(b"absent", &settings(0.8));

    assert!(store.retrieve(&key).expect("retrieve").is_none());
}

#[test]
fn test_store_overwrites_existing_entry() {
    let dir = tempdir().expect("tempdir");
    let store = CacheStore::new(dir.path());
    let key = compute_cache_key(b"img", &settings(0.8));
    let image = sample_converted();

    store.store(&key, &image).expect("first store");
    store.store(&key, &image).expect("second store");
    assert_eq!(store.retrieve(&key).expect("retrieve"), Some(image));
}

#[test]
fn test_corrupt_entry_is_error() {
    let dir = tempdir().expect("tempdir");
    let store = CacheStore::new(dir.path());
    let key = compute_cache_key(b"img", &settings(0.8));
    store.store(&key, &sample_converted()).expect("store");

    std::fs::write(dir.path().join(&key).join("converted.jpg"), b"junk").expect("corrupt");
    assert!(store.retrieve(&key).is_err());
}

#[test]
fn test_invalid_key_is_rejected() {
    let dir = tempdir().expect("tempdir");
    let store = CacheStore::new(dir.path());

    assert!(store.retrieve("../etc").is_err());
    assert!(store.store("not-a-key", &sample_converted()).is_err());
    assert!(!store.contains("not-a-key"));
}

#[test]
fn test_concurrent_stores_of_same_key() {
    let dir = tempdir().expect("tempdir");
    let store = CacheStore::new(dir.path());
    let key = compute_cache_key(b"shared", &settings(0.8));
    let image = sample_converted();

    std::thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| s.spawn(|| store.store(&key, &image)))
            .collect();
        for handle in handles {
            handle.join().expect("store thread").expect("concurrent store");
        }
    });

    assert_eq!(store.retrieve(&key).expect("retrieve"), Some(image));
    let leftovers: Vec<_> = std::fs::read_dir(dir.path())
        .expect("read cache dir")
        .map(|e| e.expect("entry").file_name())
        .filter(|name| name.to_string_lossy() != key.as_str())
        .collect();
    assert!(leftovers.is_empty(), "scratch dirs left behind: {leftovers:?}");
}
