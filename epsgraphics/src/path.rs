//! Decompose shape outlines into path operators.

use crate::graphics::{
    trans::{to_device, DevicePoint},
    PsNum,
};
use log::debug;
use tiny_skia::{Path, PathSegment};

/// Operator terminating a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum PathAction {
    Stroke,
    Fill,
    Clip,
}

/// Elevate the quadratic `(p0, q, p1)` to a cubic with the same curve.
/// Returns the two cubic control points and the end point.
pub fn quad_to_cubic<U>(
    p0: euclid::Point2D<f32, U>,
    q: euclid::Point2D<f32, U>,
    p1: euclid::Point2D<f32, U>,
) -> [euclid::Point2D<f32, U>; 3] {
    let c1 = p0 + (q - p0) * (2.0 / 3.0);
    let c2 = p1 + (q - p1) * (1.0 / 3.0);
    [c1, c2, p1]
}

fn point(p: DevicePoint) -> String {
    format!("{} {}", PsNum(p.x), PsNum(p.y))
}

/// Operators drawing `path`, a path in page space: `newpath`, one operator per
/// segment with Y negated, `action`, then `newpath` so no path is left behind.
pub fn path_operators(path: &Path, action: PathAction) -> Vec<String> {
    let mut r = Vec::with_capacity(path.len() + 3);
    r.push("newpath".to_owned());

    let mut start = DevicePoint::origin();
    let mut last = DevicePoint::origin();
    for segment in path.segments() {
        match segment {
            PathSegment::MoveTo(p) => {
                let p = to_device(p);
                r.push(format!("{} moveto", point(p)));
                start = p;
                last = p;
            }
            PathSegment::LineTo(p) => {
                let p = to_device(p);
                r.push(format!("{} lineto", point(p)));
                last = p;
            }
            PathSegment::QuadTo(q, p) => {
                let [c1, c2, p] = quad_to_cubic(last, to_device(q), to_device(p));
                r.push(format!("{} {} {} curveto", point(c1), point(c2), point(p)));
                last = p;
            }
            PathSegment::CubicTo(c1, c2, p) => {
                let p = to_device(p);
                r.push(format!(
                    "{} {} {} curveto",
                    point(to_device(c1)),
                    point(to_device(c2)),
                    point(p)
                ));
                last = p;
            }
            PathSegment::Close => {
                r.push("closepath".to_owned());
                last = start;
            }
        }
    }
    debug!("{} path of {} segments", action, path.len());

    r.push(action.to_string());
    r.push("newpath".to_owned());
    r
}

#[cfg(test)]
mod tests;
