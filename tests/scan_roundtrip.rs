//! End-to-end scans of rendered symbols
//!
//! Every image here is produced by the crate's own renderer, so the expected
//! payload is known exactly.

use rust_barcode::render::raster::LIGHT;
use rust_barcode::render::{QrEncoder, code128, render_linear, render_matrix, rotate_180};
use rust_barcode::{
    ECLevel, MaskPattern, PixelBuffer, ScanConfig, ScanEngine, ScanError, SymbologyType, scan,
};

fn scan_image(image: &PixelBuffer<'_>) -> Vec<(SymbologyType, Vec<u8>)> {
    ScanEngine::default()
        .scan(image)
        .into_iter()
        .map(|symbol| (symbol.symbology, symbol.data))
        .collect()
}

fn hello() -> PixelBuffer<'static> {
    let widths = code128::encode(b"HELLO").unwrap();
    render_linear(&widths, 2, 40, 10).unwrap()
}

fn qr(data: &[u8], version: u8, mask: MaskPattern) -> PixelBuffer<'static> {
    let grid = QrEncoder::new(ECLevel::M)
        .with_version(version)
        .with_mask(mask)
        .encode(data)
        .unwrap();
    render_matrix(&grid, 4, 4).unwrap()
}

/// Stack `top` above `bottom` with a light gap, padding the narrower one
fn stack(top: &PixelBuffer<'_>, bottom: &PixelBuffer<'_>, gap: usize) -> PixelBuffer<'static> {
    let width = top.width().max(bottom.width());
    let height = top.height() + gap + bottom.height();
    let mut samples = vec![LIGHT; width * height];
    for y in 0..top.height() {
        samples[y * width..y * width + top.width()].copy_from_slice(top.row(y));
    }
    let offset = top.height() + gap;
    for y in 0..bottom.height() {
        let start = (offset + y) * width;
        samples[start..start + bottom.width()].copy_from_slice(bottom.row(y));
    }
    PixelBuffer::from_vec(samples, width, height).unwrap()
}

#[test]
fn test_uniform_images_decode_nothing() {
    for value in [0u8, 128, 255] {
        let samples = vec![value; 120 * 80];
        assert_eq!(scan(&samples, 120, 80), Ok(vec![]));
    }
    assert_eq!(scan(&[77], 1, 1), Ok(vec![]));
}

#[test]
fn test_wrong_buffer_length() {
    assert_eq!(
        scan(&[0u8; 99], 10, 10),
        Err(ScanError::UnsupportedFormat {
            width: 10,
            height: 10,
            len: 99
        })
    );
}

#[test]
fn test_code128_hello() {
    let image = hello();
    let results = scan(image.samples(), image.width(), image.height()).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].symbology, SymbologyType::Code128);
    assert_eq!(results[0].data, b"HELLO");
    assert_eq!(results[0].text(), "HELLO");
}

#[test]
fn test_code128_rotated_180() {
    let rotated = rotate_180(&hello()).unwrap();
    assert_eq!(
        scan_image(&rotated),
        vec![(SymbologyType::Code128, b"HELLO".to_vec())]
    );
}

#[test]
fn test_code128_code_sets() {
    for payload in [
        &b"0123456789"[..],
        b"Order #42: 7 items",
        b"abc\tdef",
        b"99 bottles",
    ] {
        let widths = code128::encode(payload).unwrap();
        let image = render_linear(&widths, 3, 20, 10).unwrap();
        assert_eq!(
            scan_image(&image),
            vec![(SymbologyType::Code128, payload.to_vec())],
            "{}",
            String::from_utf8_lossy(payload)
        );
    }
}

#[test]
fn test_qr_roundtrip_modes_and_versions() {
    let payloads: [&[u8]; 3] = [b"hello, qr!", b"HELLO WORLD 42", b"31415926535"];
    for version in 1..=7u8 {
        for (i, payload) in payloads.iter().enumerate() {
            let mask = MaskPattern::from_bits(version + i as u8);
            let image = qr(payload, version, mask);
            assert_eq!(
                scan_image(&image),
                vec![(SymbologyType::QrCode, payload.to_vec())],
                "version {version}, payload {i}"
            );
        }
    }
}

#[test]
fn test_qr_rotated_180() {
    let image = qr(b"UPSIDE DOWN", 3, MaskPattern::Pattern2);
    let rotated = rotate_180(&image).unwrap();
    assert_eq!(
        scan_image(&rotated),
        vec![(SymbologyType::QrCode, b"UPSIDE DOWN".to_vec())]
    );
}

#[test]
fn test_qr_bounding_box() {
    let image = qr(b"BOX", 1, MaskPattern::Pattern0);
    let results = ScanEngine::default().scan(&image);
    assert_eq!(results.len(), 1);
    let bbox = results[0].bounding_box.unwrap();
    // Symbol starts after a 4-module quiet zone at 4 px per module
    assert!((bbox.top() - 16.0).abs() < 2.0, "{bbox:?}");
    assert!((bbox.left() - 16.0).abs() < 2.0, "{bbox:?}");
}

#[test]
fn test_large_modules() {
    for module_px in [12, 20] {
        let widths = code128::encode(b"HELLO").unwrap();
        let image = render_linear(&widths, module_px, 30, 10).unwrap();
        let expected = vec![(SymbologyType::Code128, b"HELLO".to_vec())];
        assert_eq!(scan_image(&image), expected, "code128 at {module_px}px");
        let rotated = rotate_180(&image).unwrap();
        assert_eq!(scan_image(&rotated), expected, "rotated code128 at {module_px}px");

        let grid = QrEncoder::new(ECLevel::M).encode(b"BIG MODULES").unwrap();
        let image = render_matrix(&grid, module_px, 4).unwrap();
        assert_eq!(
            scan_image(&image),
            vec![(SymbologyType::QrCode, b"BIG MODULES".to_vec())],
            "qr at {module_px}px"
        );
    }
}

#[test]
fn test_small_and_large_symbols_together() {
    let grid = QrEncoder::new(ECLevel::M).encode(b"LARGE QR").unwrap();
    let image = stack(&hello(), &render_matrix(&grid, 16, 4).unwrap(), 20);
    assert_eq!(
        scan_image(&image),
        vec![
            (SymbologyType::Code128, b"HELLO".to_vec()),
            (SymbologyType::QrCode, b"LARGE QR".to_vec()),
        ]
    );
}

#[test]
fn test_mixed_image_groups_by_symbology() {
    let image = stack(&hello(), &qr(b"QR BELOW", 2, MaskPattern::Pattern5), 20);
    let results = ScanEngine::default().scan(&image);
    let summary: Vec<(SymbologyType, Vec<u8>)> = results
        .iter()
        .map(|s| (s.symbology, s.data.clone()))
        .collect();
    assert_eq!(
        summary,
        vec![
            (SymbologyType::Code128, b"HELLO".to_vec()),
            (SymbologyType::QrCode, b"QR BELOW".to_vec()),
        ]
    );
}

#[test]
fn test_restricted_symbologies() {
    let image = stack(&hello(), &qr(b"ONLY QR", 1, MaskPattern::Pattern1), 20);
    let engine = ScanEngine::new(ScanConfig::with_symbologies([SymbologyType::QrCode]));
    let results = engine.scan(&image);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].data, b"ONLY QR");
}

#[test]
fn test_scan_is_deterministic() {
    let image = stack(&hello(), &qr(b"TWICE", 4, MaskPattern::Pattern6), 20);
    let engine = ScanEngine::default();
    let first = engine.scan(&image);
    assert_eq!(first.len(), 2);
    assert_eq!(engine.scan(&image), first);

    let parallel = ScanEngine::new(ScanConfig {
        parallel: true,
        ..ScanConfig::default()
    });
    assert_eq!(parallel.scan(&image), first);
}
