// Fan-out/fan-in over independent conversions

use rayon::prelude::*;
use tracing::{info, warn};

use crate::codec::{Codec, Quality};
use crate::convert::{CancellationToken, ConvertedImage, Converter};
use crate::record::ConversionRecord;
use crate::source::SourceImage;

/// Convert every source in parallel and wait for all of them.
///
/// Results are in the same order as `sources`. A failed item does not
/// affect any other item.
pub fn convert_all<C: Codec>(
    converter: &Converter<C>,
    sources: &[SourceImage],
    quality: Quality,
    token: &CancellationToken,
) -> Vec<crate::error::Result<ConvertedImage>> {
    sources
        .par_iter()
        .map(|source| converter.convert_with_cancel(source.bytes(), quality, token))
        .collect()
}

/// Convert every record that is still idle, updating each record in place.
///
/// Sources not declared as PNG are marked as errors without being decoded.
/// Records in any other state are left alone. Returns how many records
/// completed in this call.
pub fn convert_records<C: Codec>(
    converter: &Converter<C>,
    records: &mut [ConversionRecord],
    quality: Quality,
    token: &CancellationToken,
) -> usize {
    records
        .par_iter_mut()
        .filter(|record| record.is_idle())
        .map(|record| {
            record.start();
            let result = record
                .source()
                .ensure_png()
                .and_then(|()| converter.convert_with_cancel(record.source().bytes(), quality, token));

            match &result {
                Ok(image) => info!(
                    id = record.id(),
                    name = record.source().name(),
                    original = record.source().len(),
                    converted = image.len(),
                    "conversion completed"
                ),
                Err(e) => warn!(
                    id = record.id(),
                    name = record.source().name(),
                    error = %e,
                    "conversion failed"
                ),
            }

            record.finish(result);
            usize::from(record.converted().is_some())
        })
        .sum()
}
