use super::*;
use test_case::test_case;

fn rgb(r: u8, g: u8, b: u8) -> Color {
    Color::from_rgba8(r, g, b, 255)
}

#[test_case(ColorMode::Rgb, rgb(255, 0, 0) => "1 0 0 setrgbcolor")]
#[test_case(ColorMode::Rgb, rgb(0, 0, 0) => "0 0 0 setrgbcolor")]
#[test_case(ColorMode::Grayscale, rgb(255, 255, 255) => "1 setgray")]
#[test_case(ColorMode::Grayscale, rgb(0, 0, 0) => "0 setgray")]
#[test_case(ColorMode::BlackAndWhite, rgb(200, 200, 200) => "1 setgray"; "light is white")]
#[test_case(ColorMode::BlackAndWhite, rgb(100, 100, 100) => "0 setgray"; "dark is black")]
#[test_case(ColorMode::Cmyk, rgb(0, 0, 0) => "0 0 0 1 setcmykcolor")]
#[test_case(ColorMode::Cmyk, rgb(255, 255, 255) => "0 0 0 0 setcmykcolor")]
#[test_case(ColorMode::Cmyk, rgb(255, 0, 0) => "0 1 1 0 setcmykcolor")]
fn operator(mode: ColorMode, color: Color) -> String {
    mode.operator(color)
}

#[test]
fn black_and_white_threshold() {
    // 382 > 381.5, 381 is not
    assert_eq!(
        ColorMode::BlackAndWhite.components(rgb(255, 127, 0)),
        ColorComponents::Gray(1.0)
    );
    assert_eq!(
        ColorMode::BlackAndWhite.components(rgb(255, 126, 0)),
        ColorComponents::Gray(0.0)
    );
}

#[test]
fn components_in_unit_range() {
    let in_range = |v: f32| (0.0..=1.0).contains(&v);
    for r in 0..=255u8 {
        for g in 0..=255u8 {
            for b in 0..=255u8 {
                let c = rgb(r, g, b);
                for mode in [
                    ColorMode::BlackAndWhite,
                    ColorMode::Grayscale,
                    ColorMode::Rgb,
                    ColorMode::Cmyk,
                ] {
                    let ok = match mode.components(c) {
                        ColorComponents::Gray(v) if mode == ColorMode::BlackAndWhite => {
                            v == 0.0 || v == 1.0
                        }
                        ColorComponents::Gray(v) => in_range(v),
                        ColorComponents::Rgb(v) => v.into_iter().all(in_range),
                        ColorComponents::Cmyk(v) => v.into_iter().all(in_range),
                    };
                    assert!(ok, "{mode} of {r} {g} {b}");
                }
            }
        }
    }
}

#[test_case([1, 1, 1] => (0.0, 0.0, 0.0); "gray step above black")]
#[test_case([0, 0, 1] => (1.0, 1.0, 0.0); "blue step above black")]
#[test_case([0, 1, 1] => (1.0, 0.0, 0.0); "two channels above black")]
fn cmyk_near_black(pixel: [u8; 3]) -> (f32, f32, f32) {
    let ColorComponents::Cmyk([c, m, y, k]) =
        ColorMode::Cmyk.components(rgb(pixel[0], pixel[1], pixel[2]))
    else {
        unreachable!()
    };
    assert!((k - 254.0 / 255.0).abs() < 1e-6, "k: {k}");
    (c, m, y)
}

#[test_case(ColorMode::BlackAndWhite, [200, 200, 200] => vec![0xff])]
#[test_case(ColorMode::BlackAndWhite, [10, 20, 30] => vec![0])]
#[test_case(ColorMode::Grayscale, [30, 60, 91] => vec![60])]
#[test_case(ColorMode::Rgb, [1, 2, 3] => vec![1, 2, 3])]
#[test_case(ColorMode::Cmyk, [1, 2, 3] => vec![1, 2, 3])]
fn sample(mode: ColorMode, pixel: [u8; 3]) -> Vec<u8> {
    let mut r = vec![];
    mode.push_sample(pixel, &mut r);
    r
}

#[test]
fn image_operators() {
    assert_eq!(
        ColorMode::Grayscale.image_operators(7),
        ["{currentfile 7 string readhexstring pop} bind", "image"]
    );
    assert_eq!(
        ColorMode::Cmyk.image_operators(7),
        [
            "{currentfile 3 7 mul string readhexstring pop} bind",
            "false 3 colorimage"
        ]
    );
}

#[test_case([255, 255, 255] => [178, 178, 178])]
#[test_case([178, 10, 1] => [124, 7, 0])]
#[test_case([0, 0, 0] => [0, 0, 0])]
fn darker_color(rgb: [u8; 3]) -> [u8; 3] {
    rgb8(darker(Color::from_rgba8(rgb[0], rgb[1], rgb[2], 255)))
}

#[test_case([0, 0, 0] => [3, 3, 3]; "black lifted")]
#[test_case([3, 3, 3] => [4, 4, 4])]
#[test_case([1, 0, 200] => [4, 0, 255]; "dark channel lifted, bright clamped")]
#[test_case([100, 100, 100] => [142, 142, 142])]
fn brighter_color(rgb: [u8; 3]) -> [u8; 3] {
    rgb8(brighter(Color::from_rgba8(rgb[0], rgb[1], rgb[2], 255)))
}

#[test]
fn shading_keeps_alpha() {
    let c = Color::from_rgba8(100, 100, 100, 51);
    assert_eq!(brighter(c).to_color_u8().alpha(), 51);
    assert_eq!(darker(c).to_color_u8().alpha(), 51);
}
