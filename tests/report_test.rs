// Size formatting tests.

use png_to_jpg::report::{SizeReport, format_bytes};

#[test]
fn test_format_bytes_zero() {
    assert_eq!(format_bytes(0, 2), "0 Bytes");
}

#[test]
fn test_format_bytes_units() {
    assert_eq!(format_bytes(500, 2), "500 Bytes");
    assert_eq!(format_bytes(1024, 2), "1 KB");
    assert_eq!(format_bytes(1536, 2), "1.5 KB");
    assert_eq!(format_bytes(5 * 1024 * 1024, 2), "5 MB");
    assert_eq!(format_bytes(3 * 1024 * 1024 * 1024, 2), "3 GB");
}

#[test]
fn test_format_bytes_decimals() {
    assert_eq!(format_bytes(1234, 2), "1.21 KB");
    assert_eq!(format_bytes(1234, 0), "1 KB");
    assert_eq!(format_bytes(1234, 1), "1.2 KB");
}

#[test]
fn test_format_bytes_stays_in_gigabytes() {
    assert_eq!(format_bytes(2048 * 1024 * 1024 * 1024, 2), "2048 GB");
}

#[test]
fn test_size_report_ratio_and_display() {
    let report = SizeReport::new(2048, 512);
    assert_eq!(report.ratio(), Some(0.25));
    assert_eq!(report.change_percent(), Some(-75.0));
    assert_eq!(report.to_string(), "2 KB -> 512 Bytes (-75.0%)");
}

#[test]
fn test_size_report_empty_original() {
    let report = SizeReport::new(0, 100);
    assert_eq!(report.ratio(), None);
    assert_eq!(report.to_string(), "0 Bytes -> 100 Bytes");
}
