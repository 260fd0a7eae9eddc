use limpet_geom::{Path, Shape, find_intersection_points, point, rect};

fn sorted(mut pts: Vec<limpet_geom::Point>) -> Vec<(f64, f64)> {
    pts.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
    pts.into_iter().map(|p| (p.x, p.y)).collect()
}

fn close(a: (f64, f64), b: (f64, f64)) -> bool {
    (a.0 - b.0).abs() < 1e-9 && (a.1 - b.1).abs() < 1e-9
}

#[test]
fn intersect_rect_horizontal_line_hits_both_sides() {
    let shape = Shape::Rect(rect(0.0, 0.0, 10.0, 10.0));
    let hits = find_intersection_points(&shape, point(-5.0, 5.0), point(15.0, 5.0));
    assert_eq!(sorted(hits), vec![(0.0, 5.0), (10.0, 5.0)]);
}

#[test]
fn intersect_zero_length_line_is_empty() {
    let shape = Shape::Rect(rect(0.0, 0.0, 10.0, 10.0));
    assert!(find_intersection_points(&shape, point(5.0, 5.0), point(5.0, 5.0)).is_empty());
}

#[test]
fn intersect_rect_vertical_and_diagonal_lines() {
    let shape = Shape::Rect(rect(0.0, 0.0, 10.0, 10.0));
    let hits = find_intersection_points(&shape, point(3.0, -1.0), point(3.0, 20.0));
    assert_eq!(sorted(hits), vec![(3.0, 0.0), (3.0, 10.0)]);

    // Corners are reported once even though two sides meet there.
    let hits = find_intersection_points(&shape, point(0.0, 0.0), point(10.0, 10.0));
    assert_eq!(sorted(hits), vec![(0.0, 0.0), (10.0, 10.0)]);

    let miss = find_intersection_points(&shape, point(20.0, -1.0), point(20.0, 1.0));
    assert!(miss.is_empty());
}

#[test]
fn intersect_ellipse_points_lie_on_the_outline() {
    let r = rect(0.0, 0.0, 20.0, 10.0);
    let shape = Shape::Ellipse(r);
    let hits = find_intersection_points(&shape, point(10.0, 5.0), point(20.0, 10.0));
    assert_eq!(hits.len(), 2);
    for p in hits {
        let nx = (p.x - 10.0) / 10.0;
        let ny = (p.y - 5.0) / 5.0;
        assert!((nx * nx + ny * ny - 1.0).abs() < 1e-9, "{p:?} is off the ellipse");
    }

    let hits = find_intersection_points(&shape, point(-1.0, 5.0), point(1.0, 5.0));
    assert_eq!(sorted(hits), vec![(0.0, 5.0), (20.0, 5.0)]);
}

#[test]
fn intersect_polygon_path_matches_rectangle() {
    let square = Shape::Path(
        Path::new()
            .move_to(point(0.0, 0.0))
            .line_to(point(10.0, 0.0))
            .line_to(point(10.0, 10.0))
            .line_to(point(0.0, 10.0))
            .close(),
    );
    let hits = sorted(find_intersection_points(
        &square,
        point(-5.0, 5.0),
        point(15.0, 5.0),
    ));
    assert_eq!(hits.len(), 2);
    assert!(close(hits[0], (0.0, 5.0)));
    assert!(close(hits[1], (10.0, 5.0)));
}

#[test]
fn intersect_quadratic_segment_keeps_roots_in_unit_range() {
    let arch = Shape::Path(
        Path::new()
            .move_to(point(0.0, 0.0))
            .quad_to(point(5.0, 10.0), point(10.0, 0.0)),
    );
    let hits = sorted(find_intersection_points(
        &arch,
        point(-1.0, 2.5),
        point(11.0, 2.5),
    ));
    let t0 = (1.0 - 0.5f64.sqrt()) / 2.0;
    let t1 = (1.0 + 0.5f64.sqrt()) / 2.0;
    assert_eq!(hits.len(), 2);
    assert!(close(hits[0], (10.0 * t0, 2.5)), "{hits:?}");
    assert!(close(hits[1], (10.0 * t1, 2.5)), "{hits:?}");
}

#[test]
fn intersect_cubic_segment_discards_roots_outside_the_curve() {
    let bump = Shape::Path(Path::new().move_to(point(0.0, 0.0)).cubic_to(
        point(0.0, 10.0),
        point(10.0, 10.0),
        point(10.0, 0.0),
    ));
    let hits = find_intersection_points(&bump, point(5.0, -1.0), point(5.0, 11.0));
    assert_eq!(hits.len(), 1);
    assert!(close((hits[0].x, hits[0].y), (5.0, 7.5)), "{hits:?}");
}
