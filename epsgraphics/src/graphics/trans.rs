//! Coordinate spaces and the transforms between them.
//!
//! User space is the caller's space, Y grows downward. The current transform
//! maps it to page space, still Y down. Device space is page space with the
//! Y axis negated, which is what the output coordinates are written in.

use crate::{graphics::PsNum, EpsError, Result};
use euclid::{Box2D, Point2D, Transform2D};
use tiny_skia::Path;

pub enum UserSpace {}
pub enum PageSpace {}
pub enum DeviceSpace {}
pub enum ImageSpace {}
pub type UserToPageSpace = Transform2D<f32, UserSpace, PageSpace>;
pub type UserToUserSpace = Transform2D<f32, UserSpace, UserSpace>;
pub type ImageToPageSpace = Transform2D<f32, ImageSpace, PageSpace>;
pub type DeviceToImageSpace = Transform2D<f32, DeviceSpace, ImageSpace>;
pub type DevicePoint = Point2D<f32, DeviceSpace>;
pub type PageBox = Box2D<f32, PageSpace>;

/// Convert current object into tiny_skia `Transform`.
pub trait IntoSkiaTransform {
    fn into_skia(self) -> tiny_skia::Transform;
}

impl<S, D> IntoSkiaTransform for Transform2D<f32, S, D> {
    fn into_skia(self) -> tiny_skia::Transform {
        tiny_skia::Transform::from_row(self.m11, self.m12, self.m21, self.m22, self.m31, self.m32)
    }
}

/// Negate the Y axis, page space and device space differ only by that.
pub fn flip_y<S, D>() -> Transform2D<f32, S, D> {
    Transform2D::scale(1.0, -1.0)
}

pub fn to_device(p: tiny_skia::Point) -> DevicePoint {
    DevicePoint::new(p.x, -p.y)
}

/// Matrix operand as written in the output: `[a b c d tx ty]`.
pub fn matrix_operand<S, D>(t: &Transform2D<f32, S, D>) -> String {
    format!(
        "[{} {} {} {} {} {}]",
        PsNum(t.m11),
        PsNum(t.m12),
        PsNum(t.m21),
        PsNum(t.m22),
        PsNum(t.m31),
        PsNum(t.m32)
    )
}

/// Inverse of `t`, or `NonInvertibleTransform` naming the matrix if its
/// determinant is zero.
pub fn invert<S, D>(t: &Transform2D<f32, S, D>) -> Result<Transform2D<f32, D, S>> {
    t.inverse()
        .ok_or_else(|| EpsError::NonInvertibleTransform(matrix_operand(t)))
}

/// Apply `t` to `path`. The identity returns the path untouched so no
/// rounding noise is introduced. `None` if the result is not finite.
pub fn transform_path<S, D>(path: &Path, t: &Transform2D<f32, S, D>) -> Option<Path> {
    if *t == Transform2D::identity() {
        Some(path.clone())
    } else {
        path.clone().transform(t.into_skia())
    }
}

/// Bounds of the control points of `path`, in the space the path is in.
pub fn path_bounds<S>(path: &Path) -> Box2D<f32, S> {
    let r = path.bounds();
    Box2D::new(
        Point2D::new(r.left(), r.top()),
        Point2D::new(r.right(), r.bottom()),
    )
}

/// Maps a `src_w` x `src_h` pixel grid onto the user space rectangle `dst`,
/// then through the current transform `ctm`.
pub fn image_to_page_space(
    src_w: u32,
    src_h: u32,
    dst: &Box2D<f32, UserSpace>,
    ctm: &UserToPageSpace,
) -> ImageToPageSpace {
    Transform2D::scale(dst.width() / src_w as f32, dst.height() / src_h as f32)
        .then_translate(dst.min.to_vector())
        .then(ctm)
}
