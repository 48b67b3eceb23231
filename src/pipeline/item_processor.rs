// Per-file processing: load -> type check -> cache lookup -> convert -> write -> cache store

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::cache::hash::{CacheSettings, compute_cache_key};
use crate::cache::store::CacheStore;
use crate::codec::Codec;
use crate::convert::{CancellationToken, Converter};
use crate::report::SizeReport;
use crate::source::SourceImage;

/// What happened to a single input file.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemOutcome {
    /// A JPEG was written; `from_cache` when no conversion was needed.
    Converted { sizes: SizeReport, from_cache: bool },
    /// The output already existed and overwriting is off.
    SkippedExisting,
}

/// Process a single PNG file into `output_path`.
///
/// `settings` carries everything that shapes the output: the quality used
/// for encoding and the decode limits the converter was built with.
///
/// Cache failures are logged and otherwise ignored: a broken entry costs a
/// fresh conversion, never the item.
pub fn process_item<C: Codec>(
    input_path: &Path,
    output_path: &Path,
    converter: &Converter<C>,
    settings: &CacheSettings,
    cache_store: Option<&CacheStore>,
    token: &CancellationToken,
) -> crate::error::Result<ItemOutcome> {
    let source = SourceImage::from_path(input_path)?;
    source.ensure_png()?;

    let cache_key = cache_store.map(|_| compute_cache_key(source.bytes(), settings));

    if let Some(store) = cache_store
        && let Some(key) = cache_key.as_deref()
    {
        match store.retrieve(key) {
            Ok(Some(cached)) => {
                token.checkpoint()?;
                write_output(output_path, cached.bytes())?;
                debug!(input = %input_path.display(), key, "cache hit");
                return Ok(ItemOutcome::Converted {
                    sizes: SizeReport::new(source.len() as u64, cached.len() as u64),
                    from_cache: true,
                });
            }
            Ok(None) => {}
            Err(e) => warn!(input = %input_path.display(), error = %e, "ignoring unreadable cache entry"),
        }
    }

    let converted = converter.convert_with_cancel(source.bytes(), settings.quality, token)?;
    write_output(output_path, converted.bytes())?;

    if let Some(store) = cache_store
        && let Some(key) = cache_key.as_deref()
        && let Err(e) = store.store(key, &converted)
    {
        warn!(input = %input_path.display(), error = %e, "failed to store cache entry");
    }

    Ok(ItemOutcome::Converted {
        sizes: SizeReport::new(source.len() as u64, converted.len() as u64),
        from_cache: false,
    })
}

/// Write `bytes` to a hidden sibling of `output_path`, then rename it into
/// place. An interrupted write never leaves a truncated JPEG under the final
/// name, which a later run would otherwise skip as already converted.
fn write_output(output_path: &Path, bytes: &[u8]) -> crate::error::Result<()> {
    let tmp_path = temp_path_for(output_path);
    if let Err(e) = std::fs::write(&tmp_path, bytes) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(e.into());
    }
    if let Err(e) = std::fs::rename(&tmp_path, output_path) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(e.into());
    }
    Ok(())
}

fn temp_path_for(output_path: &Path) -> PathBuf {
    let mut name = std::ffi::OsString::from(".");
    name.push(output_path.file_name().unwrap_or_default());
    name.push(format!(".{}.tmp", std::process::id()));
    output_path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_path_is_hidden_sibling() {
        let tmp = temp_path_for(Path::new("/out/photo.jpg"));
        assert_eq!(tmp.parent(), Some(Path::new("/out")));
        let name = tmp.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with(".photo.jpg."));
        assert!(name.ends_with(".tmp"));
    }

    #[test]
    fn test_write_output_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("a.jpg");
        std::fs::write(&out, b"old").unwrap();

        write_output(&out, b"new bytes").unwrap();

        assert_eq!(std::fs::read(&out).unwrap(), b"new bytes");
        let leftovers: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .filter(|n| n.to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty(), "temp files left behind: {leftovers:?}");
    }
}
