// RGBA raster -> opaque RGB canvas over a solid background

use image::{Rgb, RgbImage, Rgba};

use crate::codec::RawImage;

/// Background every conversion is flattened onto.
pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

/// Composite `raw` source-over onto a fresh canvas filled with `background`.
///
/// The canvas has the same dimensions as `raw` and no alpha channel.
/// Fully opaque pixels are copied unchanged; fully transparent pixels take
/// the background color exactly.
pub fn flatten_onto(raw: &RawImage, background: Rgb<u8>) -> RgbImage {
    let source = raw.pixels();
    let mut canvas = RgbImage::from_pixel(source.width(), source.height(), background);

    for (dst, src) in canvas.pixels_mut().zip(source.pixels()) {
        *dst = blend_source_over(*src, *dst);
    }

    canvas
}

/// [`flatten_onto`] with the white background.
pub fn flatten_onto_white(raw: &RawImage) -> RgbImage {
    flatten_onto(raw, WHITE)
}

/// Source-over blend of one pixel: `src * a + dst * (1 - a)`, rounded to nearest.
pub fn blend_source_over(src: Rgba<u8>, dst: Rgb<u8>) -> Rgb<u8> {
    let Rgba([r, g, b, a]) = src;
    match a {
        255 => Rgb([r, g, b]),
        0 => dst,
        _ => {
            let alpha = u16::from(a);
            let inverse = 255 - alpha;
            // 255 * 255 + 127 still fits in u16
            let mix = |s: u8, d: u8| ((u16::from(s) * alpha + u16::from(d) * inverse + 127) / 255) as u8;
            Rgb([mix(r, dst[0]), mix(g, dst[1]), mix(b, dst[2])])
        }
    }
}
