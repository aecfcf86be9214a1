use std::io::Cursor;

use super::*;

fn png_bytes(width: u32, height: u32, px: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba(px));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_png_keeps_straight_alpha() {
    let img = decode_image(&png_bytes(3, 2, [100, 50, 200, 128])).unwrap();
    assert_eq!((img.width, img.height), (3, 2));
    assert_eq!(img.pixels.get_pixel(2, 1).0, [100, 50, 200, 128]);
    assert_eq!(
        img.dimensions(),
        Dimensions {
            width: 3,
            height: 2
        }
    );
}

#[test]
fn decode_garbage_is_a_decode_error() {
    let err = decode_image(b"definitely not an image").unwrap_err();
    assert!(matches!(err, MemeError::Decode(_)), "{err}");
}

#[test]
fn premultiply_then_unpremultiply_is_close() {
    let mut px = vec![100u8, 50, 200, 128, 10, 20, 30, 255, 1, 2, 3, 0];
    premultiply_rgba8_in_place(&mut px);
    assert_eq!(
        &px[0..4],
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
    assert_eq!(&px[4..8], &[10, 20, 30, 255]);
    assert_eq!(&px[8..12], &[0, 0, 0, 0]);

    unpremultiply_rgba8_in_place(&mut px);
    for (got, want) in px[0..3].iter().zip([100u8, 50, 200]) {
        assert!(got.abs_diff(want) <= 1, "{got} vs {want}");
    }
    assert_eq!(&px[4..8], &[10, 20, 30, 255]);
}
