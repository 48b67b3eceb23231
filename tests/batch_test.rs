// Batch conversion tests: independent parallel items and record state.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use png_to_jpg::codec::Quality;
use png_to_jpg::convert::{CancellationToken, Converter};
use png_to_jpg::pipeline::batch::{convert_all, convert_records};
use png_to_jpg::record::{ConversionRecord, ConversionStatus};
use png_to_jpg::source::SourceImage;

fn solid_png(color: [u8; 4]) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(RgbaImage::from_pixel(24, 24, Rgba(color)))
        .write_to(&mut buf, ImageFormat::Png)
        .expect("encode PNG fixture");
    buf.into_inner()
}

fn center_pixel(jpeg: &[u8]) -> [u8; 3] {
    let decoded = image::load_from_memory_with_format(jpeg, ImageFormat::Jpeg)
        .expect("decode JPEG")
        .to_rgb8();
    decoded.get_pixel(12, 12).0
}

fn palette(n: usize) -> Vec<[u8; 3]> {
    (0..n)
        .map(|i| {
            let v = (i * 37 % 256) as u8;
            [v, 255 - v, (i * 91 % 256) as u8]
        })
        .collect()
}

// ============================================================
// 1. convert_all
// ============================================================

#[test]
fn test_concurrent_conversions_do_not_mix_pixels() {
    let colors = palette(32);
    let sources: Vec<SourceImage> = colors
        .iter()
        .enumerate()
        .map(|(i, c)| SourceImage::new(format!("{i}.png"), "image/png", solid_png([c[0], c[1], c[2], 255])))
        .collect();

    let results = convert_all(
        &Converter::new(),
        &sources,
        Quality::new(1.0).unwrap(),
        &CancellationToken::new(),
    );

    assert_eq!(results.len(), colors.len());
    for (result, expected) in results.iter().zip(&colors) {
        let image = result.as_ref().expect("conversion should succeed");
        let actual = center_pixel(image.bytes());
        for (a, e) in actual.iter().zip(expected) {
            assert!(
                a.abs_diff(*e) <= 6,
                "expected {expected:?}, got {actual:?}"
            );
        }
    }
}

#[test]
fn test_one_failure_does_not_affect_others() {
    let sources = vec![
        SourceImage::new("a.png", "image/png", solid_png([255, 0, 0, 255])),
        SourceImage::new("broken.png", "image/png", b"not a png".to_vec()),
        SourceImage::new("c.png", "image/png", solid_png([0, 0, 255, 0])),
    ];

    let results = convert_all(
        &Converter::new(),
        &sources,
        Quality::DEFAULT,
        &CancellationToken::new(),
    );

    assert!(results[0].is_ok());
    assert!(results[1].as_ref().unwrap_err().is_decode());
    let white = center_pixel(results[2].as_ref().unwrap().bytes());
    assert!(white.iter().all(|&c| c >= 250), "got {white:?}");
}

#[test]
fn test_cancelled_batch_fails_every_item() {
    let sources = vec![
        SourceImage::new("a.png", "image/png", solid_png([1, 2, 3, 255])),
        SourceImage::new("b.png", "image/png", solid_png([4, 5, 6, 255])),
    ];
    let token = CancellationToken::new();
    token.cancel();

    let results = convert_all(&Converter::new(), &sources, Quality::DEFAULT, &token);
    assert!(results
        .iter()
        .all(|r| matches!(r, Err(png_to_jpg::ConvertError::Cancelled))));
}

// ============================================================
// 2. convert_records
// ============================================================

#[test]
fn test_records_move_to_terminal_states() {
    let mut records = vec![
        ConversionRecord::new(0, SourceImage::new("ok.png", "image/png", solid_png([9, 9, 9, 255]))),
        ConversionRecord::new(1, SourceImage::new("bad.png", "image/png", vec![0, 1, 2])),
        ConversionRecord::new(2, SourceImage::new("photo.jpg", "image/jpeg", vec![0xFF, 0xD8])),
    ];

    let completed = convert_records(
        &Converter::new(),
        &mut records,
        Quality::DEFAULT,
        &CancellationToken::new(),
    );

    assert_eq!(completed, 1);
    assert_eq!(records[0].status().label(), "completed");
    assert!(records[0].converted().is_some());
    let sizes = records[0].size_report().expect("completed record has sizes");
    assert_eq!(sizes.original, records[0].source().len() as u64);

    assert!(matches!(records[1].status(), ConversionStatus::Error(msg) if msg.contains("Decode")));
    assert!(records[1].converted().is_none());
    assert!(records[1].size_report().is_none());

    assert!(matches!(records[2].status(), ConversionStatus::Error(msg) if msg.contains("image/jpeg")));
}

#[test]
fn test_only_idle_records_are_converted() {
    let mut records = vec![
        ConversionRecord::new(0, SourceImage::new("a.png", "image/png", solid_png([1, 1, 1, 255]))),
        ConversionRecord::new(1, SourceImage::new("b.png", "image/png", solid_png([2, 2, 2, 255]))),
    ];
    let converter = Converter::new();
    let token = CancellationToken::new();

    assert_eq!(convert_records(&converter, &mut records[..1], Quality::DEFAULT, &token), 1);
    let first = records[0].converted().cloned();

    assert_eq!(convert_records(&converter, &mut records, Quality::DEFAULT, &token), 1);
    assert_eq!(records[0].converted().cloned(), first);
    assert!(records.iter().all(|r| r.converted().is_some()));
}

#[test]
fn test_record_start_only_from_idle() {
    let mut record = ConversionRecord::new(7, SourceImage::new("x.png", "image/png", Vec::new()));
    assert_eq!(record.id(), 7);
    assert!(record.is_idle());

    assert!(record.start());
    assert_eq!(record.status(), &ConversionStatus::Converting);
    assert!(!record.start());

    record.fail(&png_to_jpg::ConvertError::Cancelled);
    assert_eq!(record.status().label(), "error");
    assert!(!record.start());
}
