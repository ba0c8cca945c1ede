//! Inline image encoding.

use crate::{
    graphics::{
        color::ColorMode,
        trans::{
            flip_y, image_to_page_space, invert, matrix_operand, DeviceSpace, DeviceToImageSpace,
            ImageSpace, PageSpace, UserSpace, UserToPageSpace,
        },
    },
    EpsError, Result,
};
use euclid::Box2D;
use image::RgbaImage;

/// Hex characters per data line.
const LINE_WIDTH: usize = 64;

/// Everything needed to write one image, computed before any output so a
/// failure leaves the document untouched.
#[derive(Debug)]
pub(crate) struct EncodedImage {
    /// `w h 8 [matrix]`, operands of the image operator.
    pub header: String,
    pub operators: [String; 2],
    pub data: Vec<String>,
}

fn check_region<U>(b: &Box2D<i32, U>, x_name: &str, y_name: &str) -> Result<()> {
    if b.min.x >= b.max.x {
        return Err(EpsError::InvalidArgument(format!(
            "{x_name}1 >= {x_name}2"
        )));
    }
    if b.min.y >= b.max.y {
        return Err(EpsError::InvalidArgument(format!(
            "{y_name}1 >= {y_name}2"
        )));
    }
    Ok(())
}

/// Map of device space onto the `src_w` x `src_h` sample grid drawn into
/// `dst` under `ctm`.
pub(crate) fn image_matrix(
    src_w: u32,
    src_h: u32,
    dst: &Box2D<i32, UserSpace>,
    ctm: &UserToPageSpace,
) -> Result<DeviceToImageSpace> {
    let to_page = image_to_page_space(src_w, src_h, &dst.to_f32(), ctm);
    let to_image = invert(&to_page)?;
    Ok(flip_y::<DeviceSpace, PageSpace>().then(&to_image))
}

/// Encode the `src` region of `img`, drawn into the user space rectangle
/// `dst` under the transform `ctm`.
pub(crate) fn encode_image(
    img: &RgbaImage,
    dst: &Box2D<i32, UserSpace>,
    src: &Box2D<i32, ImageSpace>,
    ctm: &UserToPageSpace,
    mode: ColorMode,
) -> Result<EncodedImage> {
    check_region(dst, "dx", "dy")?;
    check_region(src, "sx", "sy")?;
    let (img_w, img_h) = img.dimensions();
    if src.min.x < 0
        || src.min.y < 0
        || src.max.x as u32 > img_w
        || src.max.y as u32 > img_h
    {
        return Err(EpsError::InvalidArgument(format!(
            "source region {src:?} exceeds image of {img_w}x{img_h}"
        )));
    }

    let (w, h) = ((src.max.x - src.min.x) as u32, (src.max.y - src.min.y) as u32);
    let matrix = image_matrix(w, h, dst, ctm)?;

    let per_pixel = match mode {
        ColorMode::BlackAndWhite | ColorMode::Grayscale => 1,
        ColorMode::Rgb | ColorMode::Cmyk => 3,
    };
    let mut samples = Vec::with_capacity((w * h) as usize * per_pixel);
    for y in src.min.y as u32..src.max.y as u32 {
        for x in src.min.x as u32..src.max.x as u32 {
            let [r, g, b, _] = img.get_pixel(x, y).0;
            mode.push_sample([r, g, b], &mut samples);
        }
    }

    Ok(EncodedImage {
        header: format!("{w} {h} 8 {}", matrix_operand(&matrix)),
        operators: mode.image_operators(w),
        data: samples.chunks(LINE_WIDTH / 2).map(hex::encode).collect(),
    })
}

#[cfg(test)]
mod tests;
