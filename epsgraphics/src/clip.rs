use crate::graphics::trans::transform_path;
use euclid::Transform2D;
use tiny_skia::{Path, PathBuilder, PathSegment, Point, Rect};

/// Clip region: the intersection of one or more outlines in one space.
///
/// Written out as one clip operation per outline, each narrowing the
/// previous one, so the intersection is exact without computing it.
/// Axis aligned rectangles are merged into one when they overlap.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipRegion {
    paths: Vec<Path>,
}

impl From<Path> for ClipRegion {
    fn from(path: Path) -> Self {
        Self { paths: vec![path] }
    }
}

impl From<Rect> for ClipRegion {
    fn from(rect: Rect) -> Self {
        PathBuilder::from_rect(rect).into()
    }
}

/// `Some` if `path` is a single axis aligned rectangle.
fn as_rect(path: &Path) -> Option<Rect> {
    let mut points: Vec<Point> = Vec::with_capacity(5);
    for (i, segment) in path.segments().enumerate() {
        match segment {
            PathSegment::MoveTo(p) if i == 0 => points.push(p),
            PathSegment::LineTo(p) if i > 0 => points.push(p),
            PathSegment::Close if i > 0 => {}
            _ => return None,
        }
    }
    if points.len() == 5 && points[4] == points[0] {
        points.pop();
    }
    if points.len() != 4 {
        return None;
    }

    let b = path.bounds();
    let is_corner = |p: &Point| {
        (p.x == b.left() || p.x == b.right()) && (p.y == b.top() || p.y == b.bottom())
    };
    let axis_aligned = (0..4).all(|i| {
        let (a, c) = (points[i], points[(i + 1) % 4]);
        (a.x == c.x) != (a.y == c.y)
    });
    (axis_aligned && points.iter().all(is_corner)).then_some(b)
}

impl ClipRegion {
    pub fn paths(&self) -> &[Path] {
        &self.paths
    }

    /// The region as a rectangle, if it is one.
    pub fn as_rect(&self) -> Option<Rect> {
        match self.paths.as_slice() {
            [p] => as_rect(p),
            _ => None,
        }
    }

    /// Bounding rectangle, `None` if the outlines have no common area.
    pub fn bounds(&self) -> Option<Rect> {
        let (first, rest) = self.paths.split_first()?;
        rest.iter()
            .try_fold(first.bounds(), |acc, p| acc.intersect(&p.bounds()))
    }

    /// Region covered both by `self` and `path`.
    pub fn intersect(&self, path: &Path) -> Self {
        if let (Some(a), Some(b)) = (self.as_rect(), as_rect(path)) {
            if let Some(r) = a.intersect(&b) {
                return r.into();
            }
        }

        let mut paths = self.paths.clone();
        paths.push(path.clone());
        Self { paths }
    }

    /// True if the rectangle overlaps the bounds of the region.
    pub fn hit(&self, rect: &Rect) -> bool {
        self.bounds().and_then(|b| b.intersect(rect)).is_some()
    }

    /// Map every outline through `t`, `None` if a result is not finite.
    pub(crate) fn transform<S, D>(&self, t: &Transform2D<f32, S, D>) -> Option<Self> {
        let paths = self
            .paths
            .iter()
            .map(|p| transform_path(p, t))
            .collect::<Option<Vec<_>>>()?;
        Some(Self { paths })
    }
}
