use super::*;
use assert_approx_eq::assert_approx_eq;
use euclid::default::Point2D;
use tiny_skia::{PathBuilder, Rect};

#[test]
fn rect_operators() {
    let path = PathBuilder::from_rect(Rect::from_xywh(0.0, 0.0, 10.0, 5.0).unwrap());
    assert_eq!(
        path_operators(&path, PathAction::Fill),
        [
            "newpath",
            "0 0 moveto",
            "10 0 lineto",
            "10 -5 lineto",
            "0 -5 lineto",
            "closepath",
            "fill",
            "newpath",
        ]
    );
}

#[test]
fn cubic_operators() {
    let mut pb = PathBuilder::new();
    pb.move_to(1.0, 2.0);
    pb.cubic_to(3.0, 4.0, 5.0, 6.0, 7.0, 8.0);
    let path = pb.finish().unwrap();
    assert_eq!(
        path_operators(&path, PathAction::Stroke),
        [
            "newpath",
            "1 -2 moveto",
            "3 -4 5 -6 7 -8 curveto",
            "stroke",
            "newpath",
        ]
    );
}

#[test]
fn quad_becomes_curveto() {
    let mut pb = PathBuilder::new();
    pb.move_to(0.0, 0.0);
    pb.quad_to(3.0, 3.0, 6.0, 0.0);
    let path = pb.finish().unwrap();
    let ops = path_operators(&path, PathAction::Clip);
    assert_eq!(ops.len(), 5);
    assert!(ops[2].ends_with(" 6 0 curveto"), "{}", ops[2]);
    assert_eq!(ops[3], "clip");
}

#[test]
fn quad_elevation() {
    let [c1, c2, p1] = quad_to_cubic(
        Point2D::new(0.0, 0.0),
        Point2D::new(3.0, -3.0),
        Point2D::new(6.0, 0.0),
    );
    assert_approx_eq!(c1.x, 2.0);
    assert_approx_eq!(c1.y, -2.0);
    assert_approx_eq!(c2.x, 5.0);
    assert_approx_eq!(c2.y, -1.0);
    assert_eq!(p1, Point2D::new(6.0, 0.0));
}

#[test]
fn quad_after_close_starts_at_subpath_start() {
    let mut pb = PathBuilder::new();
    pb.move_to(0.0, 0.0);
    pb.line_to(9.0, 0.0);
    pb.line_to(9.0, 9.0);
    pb.close();
    pb.quad_to(0.0, 3.0, 0.0, 6.0);
    let path = pb.finish().unwrap();
    let ops = path_operators(&path, PathAction::Stroke);
    let curve = ops.iter().find(|l| l.ends_with("curveto")).unwrap();
    assert_eq!(curve, "0 -2 0 -5 0 -6 curveto");
}

#[test]
fn action_names() {
    assert_eq!(PathAction::Stroke.to_string(), "stroke");
    assert_eq!(PathAction::Fill.to_string(), "fill");
    assert_eq!(PathAction::Clip.to_string(), "clip");
}
