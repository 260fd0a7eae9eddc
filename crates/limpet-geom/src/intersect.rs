//! Intersections of an infinite line with a shape outline.

use crate::shape::{Path, PathSegment, Shape, cubic_at, quad_at};
use crate::{EPSILON, Point, Rect, approx_eq, is_degenerate, point};

/// Intersections of the infinite line through `p1` and `p2` with the boundary of `shape`.
///
/// A zero-length line has no direction and yields no points. The result contains no duplicates.
pub fn find_intersection_points(shape: &Shape, p1: Point, p2: Point) -> Vec<Point> {
    if approx_eq(p1, p2) {
        return Vec::new();
    }
    match shape {
        Shape::Rect(r) => intersect_rect(r, p1, p2),
        Shape::Ellipse(r) => intersect_ellipse(r, p1, p2),
        Shape::Path(path) => intersect_path(path, p1, p2),
    }
}

fn push_unique(out: &mut Vec<Point>, p: Point) {
    if !out.iter().any(|q| approx_eq(*q, p)) {
        out.push(p);
    }
}

fn intersect_rect(r: &Rect, p1: Point, p2: Point) -> Vec<Point> {
    let mut out = Vec::new();
    if is_degenerate(r) {
        return out;
    }
    let (x0, x1, y0, y1) = (r.min_x(), r.max_x(), r.min_y(), r.max_y());
    let dx = p2.x - p1.x;
    let dy = p2.y - p1.y;

    if dx.abs() < EPSILON {
        if p1.x >= x0 - EPSILON && p1.x <= x1 + EPSILON {
            push_unique(&mut out, point(p1.x, y0));
            push_unique(&mut out, point(p1.x, y1));
        }
        return out;
    }
    if dy.abs() < EPSILON {
        if p1.y >= y0 - EPSILON && p1.y <= y1 + EPSILON {
            push_unique(&mut out, point(x0, p1.y));
            push_unique(&mut out, point(x1, p1.y));
        }
        return out;
    }

    let slope = dy / dx;
    let y_at = |x: f64| p1.y + slope * (x - p1.x);
    let x_at = |y: f64| p1.x + (y - p1.y) / slope;

    for x in [x0, x1] {
        let y = y_at(x);
        if y >= y0 - EPSILON && y <= y1 + EPSILON {
            push_unique(&mut out, point(x, y.clamp(y0, y1)));
        }
    }
    for y in [y0, y1] {
        let x = x_at(y);
        if x >= x0 - EPSILON && x <= x1 + EPSILON {
            push_unique(&mut out, point(x.clamp(x0, x1), y));
        }
    }
    out
}

fn intersect_ellipse(r: &Rect, p1: Point, p2: Point) -> Vec<Point> {
    let mut out = Vec::new();
    if is_degenerate(r) {
        return out;
    }
    let c = r.center();
    let a = r.width() / 2.0;
    let b = r.height() / 2.0;
    let dx = p2.x - p1.x;
    let dy = p2.y - p1.y;

    if dx.abs() < EPSILON {
        let t = (p1.x - c.x) / a;
        if t.abs() > 1.0 + EPSILON {
            return out;
        }
        let h = b * (1.0 - t * t).max(0.0).sqrt();
        push_unique(&mut out, point(p1.x, c.y - h));
        push_unique(&mut out, point(p1.x, c.y + h));
        return out;
    }
    if dy.abs() < EPSILON {
        let t = (p1.y - c.y) / b;
        if t.abs() > 1.0 + EPSILON {
            return out;
        }
        let w = a * (1.0 - t * t).max(0.0).sqrt();
        push_unique(&mut out, point(c.x - w, p1.y));
        push_unique(&mut out, point(c.x + w, p1.y));
        return out;
    }

    // ((x - cx) / a)^2 + ((y - cy) / b)^2 = 1 with (x, y) = p1 + t * d
    let ox = (p1.x - c.x) / a;
    let oy = (p1.y - c.y) / b;
    let ux = dx / a;
    let uy = dy / b;
    let qa = ux * ux + uy * uy;
    let qb = 2.0 * (ox * ux + oy * uy);
    let qc = ox * ox + oy * oy - 1.0;
    for t in solve_quadratic(qa, qb, qc) {
        push_unique(&mut out, point(p1.x + t * dx, p1.y + t * dy));
    }
    out
}

fn intersect_path(path: &Path, p1: Point, p2: Point) -> Vec<Point> {
    // Implicit line: a*x + b*y + c = 0
    let a = p2.y - p1.y;
    let b = p1.x - p2.x;
    let c = p2.x * p1.y - p1.x * p2.y;
    let eval = |p: Point| a * p.x + b * p.y + c;
    let linear = |p: Point| a * p.x + b * p.y;

    let mut out = Vec::new();
    let mut last = point(0.0, 0.0);
    let mut start = last;

    for seg in path.segments() {
        match *seg {
            PathSegment::MoveTo(p) => {
                last = p;
                start = p;
            }
            PathSegment::LineTo(p) => {
                intersect_line_segment(eval(last), eval(p), last, p, &mut out);
                last = p;
            }
            PathSegment::Close => {
                intersect_line_segment(eval(last), eval(start), last, start, &mut out);
                last = start;
            }
            PathSegment::QuadTo(c1, p) => {
                let qa = linear(last) - 2.0 * linear(c1) + linear(p);
                let qb = 2.0 * (linear(c1) - linear(last));
                let qc = eval(last);
                for t in solve_quadratic(qa, qb, qc) {
                    if let Some(t) = unit_param(t) {
                        push_unique(&mut out, quad_at(last, c1, p, t));
                    }
                }
                last = p;
            }
            PathSegment::CubicTo(c1, c2, p) => {
                let (l0, l1, l2, l3) = (linear(last), linear(c1), linear(c2), linear(p));
                let ca = -l0 + 3.0 * l1 - 3.0 * l2 + l3;
                let cb = 3.0 * l0 - 6.0 * l1 + 3.0 * l2;
                let cc = -3.0 * l0 + 3.0 * l1;
                let cd = eval(last);
                for t in solve_cubic(ca, cb, cc, cd) {
                    if let Some(t) = unit_param(t) {
                        push_unique(&mut out, cubic_at(last, c1, c2, p, t));
                    }
                }
                last = p;
            }
        }
    }
    out
}

fn unit_param(t: f64) -> Option<f64> {
    (t >= -EPSILON && t <= 1.0 + EPSILON).then(|| t.clamp(0.0, 1.0))
}

fn intersect_line_segment(s1: f64, s2: f64, q1: Point, q2: Point, out: &mut Vec<Point>) {
    let scale = (q2 - q1).length().max(1.0);
    let on1 = s1.abs() < EPSILON * scale;
    let on2 = s2.abs() < EPSILON * scale;
    if on1 && on2 {
        // Collinear: the segment's end points are the boundary hits.
        push_unique(out, q1);
        push_unique(out, q2);
        return;
    }
    if on1 {
        push_unique(out, q1);
        return;
    }
    if on2 {
        push_unique(out, q2);
        return;
    }
    if s1 * s2 > 0.0 {
        return;
    }
    let t = s1 / (s1 - s2);
    push_unique(out, q1 + (q2 - q1) * t);
}

/// Real roots of `a*t^2 + b*t + c = 0`, degrading to the linear case when `a` vanishes.
pub fn solve_quadratic(a: f64, b: f64, c: f64) -> Vec<f64> {
    const TINY: f64 = 1e-12;
    if a.abs() < TINY {
        if b.abs() < TINY {
            return Vec::new();
        }
        return vec![-c / b];
    }
    let disc = b * b - 4.0 * a * c;
    if disc < -TINY {
        return Vec::new();
    }
    if disc.abs() <= TINY {
        return vec![-b / (2.0 * a)];
    }
    let sq = disc.sqrt();
    // Numerically stable form.
    let q = -0.5 * (b + b.signum() * sq);
    let mut roots = vec![q / a];
    if q.abs() > TINY {
        roots.push(c / q);
    } else {
        roots.push(-b / a - q / a);
    }
    roots
}

/// Real roots of `a*t^3 + b*t^2 + c*t + d = 0`.
pub fn solve_cubic(a: f64, b: f64, c: f64, d: f64) -> Vec<f64> {
    const TINY: f64 = 1e-12;
    if a.abs() < TINY {
        return solve_quadratic(b, c, d);
    }
    let (b, c, d) = (b / a, c / a, d / a);
    // Depressed cubic t = x - b/3: x^3 + p*x + q = 0
    let p = c - b * b / 3.0;
    let q = 2.0 * b * b * b / 27.0 - b * c / 3.0 + d;
    let shift = -b / 3.0;
    let disc = q * q / 4.0 + p * p * p / 27.0;

    if disc.abs() < TINY {
        if p.abs() < TINY {
            return vec![shift];
        }
        let u = (q / 2.0).cbrt();
        return vec![shift - 2.0 * u, shift + u];
    }
    if disc > 0.0 {
        let sq = disc.sqrt();
        let u = (-q / 2.0 + sq).cbrt();
        let v = (-q / 2.0 - sq).cbrt();
        return vec![shift + u + v];
    }
    let r = (-p / 3.0).sqrt();
    let phi = (3.0 * q / (2.0 * p * r)).clamp(-1.0, 1.0).acos();
    (0..3)
        .map(|k| shift + 2.0 * r * ((phi - 2.0 * std::f64::consts::PI * k as f64) / 3.0).cos())
        .collect()
}
