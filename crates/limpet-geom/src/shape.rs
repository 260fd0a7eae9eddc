//! Connectible outlines of figures.

use crate::{EPSILON, Point, Rect, is_degenerate, point, rect};

/// Number of line pieces a curve segment is flattened into for containment and bounds.
const FLATTEN_STEPS: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathSegment {
    MoveTo(Point),
    LineTo(Point),
    QuadTo(Point, Point),
    CubicTo(Point, Point, Point),
    Close,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    segments: Vec<PathSegment>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(mut self, p: Point) -> Self {
        self.segments.push(PathSegment::MoveTo(p));
        self
    }

    pub fn line_to(mut self, p: Point) -> Self {
        self.segments.push(PathSegment::LineTo(p));
        self
    }

    pub fn quad_to(mut self, ctrl: Point, to: Point) -> Self {
        self.segments.push(PathSegment::QuadTo(ctrl, to));
        self
    }

    pub fn cubic_to(mut self, ctrl1: Point, ctrl2: Point, to: Point) -> Self {
        self.segments.push(PathSegment::CubicTo(ctrl1, ctrl2, to));
        self
    }

    pub fn close(mut self) -> Self {
        self.segments.push(PathSegment::Close);
        self
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Approximates the outline as closed polygons, one per subpath.
    pub fn flatten(&self) -> Vec<Vec<Point>> {
        let mut out: Vec<Vec<Point>> = Vec::new();
        let mut current: Vec<Point> = Vec::new();
        let mut last = point(0.0, 0.0);

        for seg in &self.segments {
            match *seg {
                PathSegment::MoveTo(p) => {
                    if current.len() > 1 {
                        out.push(std::mem::take(&mut current));
                    }
                    current.clear();
                    current.push(p);
                    last = p;
                }
                PathSegment::LineTo(p) => {
                    if current.is_empty() {
                        current.push(last);
                    }
                    current.push(p);
                    last = p;
                }
                PathSegment::QuadTo(c, p) => {
                    if current.is_empty() {
                        current.push(last);
                    }
                    for i in 1..=FLATTEN_STEPS {
                        let t = i as f64 / FLATTEN_STEPS as f64;
                        current.push(quad_at(last, c, p, t));
                    }
                    last = p;
                }
                PathSegment::CubicTo(c1, c2, p) => {
                    if current.is_empty() {
                        current.push(last);
                    }
                    for i in 1..=FLATTEN_STEPS {
                        let t = i as f64 / FLATTEN_STEPS as f64;
                        current.push(cubic_at(last, c1, c2, p, t));
                    }
                    last = p;
                }
                PathSegment::Close => {
                    if let Some(first) = current.first().copied() {
                        last = first;
                    }
                    if current.len() > 1 {
                        out.push(std::mem::take(&mut current));
                    }
                }
            }
        }
        if current.len() > 1 {
            out.push(current);
        }
        out
    }

    fn map_points(&self, f: impl Fn(Point) -> Point) -> Self {
        let segments = self
            .segments
            .iter()
            .map(|seg| match *seg {
                PathSegment::MoveTo(p) => PathSegment::MoveTo(f(p)),
                PathSegment::LineTo(p) => PathSegment::LineTo(f(p)),
                PathSegment::QuadTo(c, p) => PathSegment::QuadTo(f(c), f(p)),
                PathSegment::CubicTo(c1, c2, p) => PathSegment::CubicTo(f(c1), f(c2), f(p)),
                PathSegment::Close => PathSegment::Close,
            })
            .collect();
        Self { segments }
    }
}

pub(crate) fn quad_at(p0: Point, p1: Point, p2: Point, t: f64) -> Point {
    let mt = 1.0 - t;
    point(
        mt * mt * p0.x + 2.0 * mt * t * p1.x + t * t * p2.x,
        mt * mt * p0.y + 2.0 * mt * t * p1.y + t * t * p2.y,
    )
}

pub(crate) fn cubic_at(p0: Point, p1: Point, p2: Point, p3: Point, t: f64) -> Point {
    let mt = 1.0 - t;
    let a = mt * mt * mt;
    let b = 3.0 * mt * mt * t;
    let c = 3.0 * mt * t * t;
    let d = t * t * t;
    point(
        a * p0.x + b * p1.x + c * p2.x + d * p3.x,
        a * p0.y + b * p1.y + c * p2.y + d * p3.y,
    )
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Rect(Rect),
    /// Ellipse inscribed in the given bounds.
    Ellipse(Rect),
    Path(Path),
}

impl Shape {
    pub fn bounds(&self) -> Rect {
        match self {
            Shape::Rect(r) | Shape::Ellipse(r) => *r,
            Shape::Path(path) => {
                let mut min_x = f64::INFINITY;
                let mut min_y = f64::INFINITY;
                let mut max_x = f64::NEG_INFINITY;
                let mut max_y = f64::NEG_INFINITY;
                for p in path.flatten().iter().flatten() {
                    min_x = min_x.min(p.x);
                    min_y = min_y.min(p.y);
                    max_x = max_x.max(p.x);
                    max_y = max_y.max(p.y);
                }
                if !min_x.is_finite() {
                    return rect(0.0, 0.0, 0.0, 0.0);
                }
                rect(min_x, min_y, max_x - min_x, max_y - min_y)
            }
        }
    }

    pub fn center(&self) -> Point {
        self.bounds().center()
    }

    pub fn is_rectangular(&self) -> bool {
        matches!(self, Shape::Rect(_))
    }

    /// Inclusive containment; points within `EPSILON` of the outline count as inside.
    pub fn contains(&self, p: Point) -> bool {
        match self {
            Shape::Rect(r) => {
                p.x >= r.min_x() - EPSILON
                    && p.x <= r.max_x() + EPSILON
                    && p.y >= r.min_y() - EPSILON
                    && p.y <= r.max_y() + EPSILON
            }
            Shape::Ellipse(r) => {
                if is_degenerate(r) {
                    return false;
                }
                let c = r.center();
                let a = r.width() / 2.0;
                let b = r.height() / 2.0;
                let nx = (p.x - c.x) / (a + EPSILON);
                let ny = (p.y - c.y) / (b + EPSILON);
                nx * nx + ny * ny <= 1.0
            }
            Shape::Path(path) => {
                let polygons = path.flatten();
                if polygons
                    .iter()
                    .any(|poly| near_polygon_outline(poly, p, EPSILON))
                {
                    return true;
                }
                let mut inside = false;
                for poly in &polygons {
                    let n = poly.len();
                    for i in 0..n {
                        let a = poly[i];
                        let b = poly[(i + 1) % n];
                        if (a.y > p.y) != (b.y > p.y) {
                            let x = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
                            if p.x < x {
                                inside = !inside;
                            }
                        }
                    }
                }
                inside
            }
        }
    }

    /// Remaps the outline so that its bounds become `target`.
    pub fn fit_to(&self, target: Rect) -> Shape {
        match self {
            Shape::Rect(_) => Shape::Rect(target),
            Shape::Ellipse(_) => Shape::Ellipse(target),
            Shape::Path(path) => {
                let from = self.bounds();
                let sx = if from.width() > 0.0 {
                    target.width() / from.width()
                } else {
                    1.0
                };
                let sy = if from.height() > 0.0 {
                    target.height() / from.height()
                } else {
                    1.0
                };
                Shape::Path(path.map_points(|p| {
                    point(
                        target.min_x() + (p.x - from.min_x()) * sx,
                        target.min_y() + (p.y - from.min_y()) * sy,
                    )
                }))
            }
        }
    }
}

fn near_polygon_outline(poly: &[Point], p: Point, tolerance: f64) -> bool {
    let n = poly.len();
    (0..n).any(|i| {
        let a = poly[i];
        let b = poly[(i + 1) % n];
        let ab = b - a;
        let len2 = ab.square_length();
        let t = if len2 <= 0.0 {
            0.0
        } else {
            ((p - a).dot(ab) / len2).clamp(0.0, 1.0)
        };
        ((a + ab * t) - p).length() <= tolerance
    })
}
