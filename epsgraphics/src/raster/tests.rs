use super::*;
use euclid::Point2D;
use image::Rgba;

fn dst(x1: i32, y1: i32, x2: i32, y2: i32) -> Box2D<i32, UserSpace> {
    Box2D::new(Point2D::new(x1, y1), Point2D::new(x2, y2))
}

fn src(x1: i32, y1: i32, x2: i32, y2: i32) -> Box2D<i32, ImageSpace> {
    Box2D::new(Point2D::new(x1, y1), Point2D::new(x2, y2))
}

fn red_blue() -> RgbaImage {
    let mut img = RgbaImage::new(2, 1);
    img.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
    img.put_pixel(1, 0, Rgba([0, 0, 255, 128]));
    img
}

#[test]
fn rgb_image() {
    let img = red_blue();
    let r = encode_image(
        &img,
        &dst(0, 0, 2, 1),
        &src(0, 0, 2, 1),
        &UserToPageSpace::identity(),
        ColorMode::Rgb,
    )
    .unwrap();
    assert_eq!(r.header, "2 1 8 [1 0 0 -1 0 0]");
    assert_eq!(
        r.operators,
        [
            "{currentfile 3 2 mul string readhexstring pop} bind",
            "false 3 colorimage"
        ]
    );
    assert_eq!(r.data, ["ff00000000ff"]);
}

#[test]
fn scaled_matrix() {
    let m = image_matrix(2, 1, &dst(0, 0, 4, 2), &UserToPageSpace::identity()).unwrap();
    assert_eq!(matrix_operand(&m), "[0.5 0 0 -0.5 0 0]");
}

#[test]
fn grayscale_region() {
    let mut img = RgbaImage::new(3, 2);
    img.put_pixel(1, 1, Rgba([30, 60, 90, 255]));
    let r = encode_image(
        &img,
        &dst(0, 0, 1, 1),
        &src(1, 1, 2, 2),
        &UserToPageSpace::identity(),
        ColorMode::Grayscale,
    )
    .unwrap();
    assert_eq!(r.header, "1 1 8 [1 0 0 -1 0 0]");
    assert_eq!(r.operators[1], "image");
    assert_eq!(r.data, ["3c"]);
}

#[test]
fn lines_wrap_at_64() {
    let img = RgbaImage::from_pixel(40, 1, Rgba([1, 2, 3, 255]));
    let r = encode_image(
        &img,
        &dst(0, 0, 40, 1),
        &src(0, 0, 40, 1),
        &UserToPageSpace::identity(),
        ColorMode::Rgb,
    )
    .unwrap();
    let lens: Vec<_> = r.data.iter().map(String::len).collect();
    assert_eq!(lens, [64, 64, 64, 48]);
    assert!(r.data[0].starts_with("010203010203"));
}

#[test]
fn empty_destination() {
    let err = encode_image(
        &red_blue(),
        &dst(5, 0, 5, 1),
        &src(0, 0, 2, 1),
        &UserToPageSpace::identity(),
        ColorMode::Rgb,
    )
    .unwrap_err();
    assert_eq!(err.to_string(), "invalid argument: dx1 >= dx2");
}

#[test]
fn empty_source() {
    let err = encode_image(
        &red_blue(),
        &dst(0, 0, 2, 1),
        &src(0, 1, 2, 1),
        &UserToPageSpace::identity(),
        ColorMode::Rgb,
    )
    .unwrap_err();
    assert_eq!(err.to_string(), "invalid argument: sy1 >= sy2");
}

#[test]
fn source_outside_image() {
    let err = encode_image(
        &red_blue(),
        &dst(0, 0, 2, 1),
        &src(0, 0, 3, 1),
        &UserToPageSpace::identity(),
        ColorMode::Rgb,
    )
    .unwrap_err();
    assert!(matches!(err, EpsError::InvalidArgument(_)));
}

#[test]
fn singular_transform() {
    let err = encode_image(
        &red_blue(),
        &dst(0, 0, 2, 1),
        &src(0, 0, 2, 1),
        &UserToPageSpace::scale(0.0, 0.0),
        ColorMode::Rgb,
    )
    .unwrap_err();
    assert!(matches!(err, EpsError::NonInvertibleTransform(_)));
}
