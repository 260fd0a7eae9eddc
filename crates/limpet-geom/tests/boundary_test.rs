use limpet_geom::{
    Shape, calculate_boundary_point, calculate_boundary_point_thru_center, calculate_chop_point,
    point, rect, reflect_point,
};

#[test]
fn boundary_point_respects_direction() {
    let shape = Shape::Rect(rect(0.0, 0.0, 10.0, 10.0));
    let ahead = calculate_boundary_point(&shape, point(5.0, 5.0), point(15.0, 5.0), point(5.0, 5.0), true);
    assert_eq!(ahead, Some(point(10.0, 5.0)));
    let behind = calculate_boundary_point(&shape, point(5.0, 5.0), point(-5.0, 5.0), point(5.0, 5.0), true);
    assert_eq!(behind, Some(point(0.0, 5.0)));

    let nearest = calculate_boundary_point(&shape, point(5.0, 5.0), point(15.0, 5.0), point(-1.0, 5.0), false);
    assert_eq!(nearest, Some(point(0.0, 5.0)));

    let miss = calculate_boundary_point(&shape, point(20.0, 0.0), point(20.0, 1.0), point(20.0, 0.0), false);
    assert_eq!(miss, None);
}

#[test]
fn thru_center_on_rectangles_and_ellipses() {
    let square = Shape::Rect(rect(0.0, 0.0, 10.0, 10.0));
    let p = calculate_boundary_point_thru_center(&square, point(20.0, 5.0)).unwrap();
    assert!((p.x - 10.0).abs() < 1e-9 && (p.y - 5.0).abs() < 1e-9);

    // Center falls back to the middle of the right side.
    let c = calculate_boundary_point_thru_center(&square, point(5.0, 5.0)).unwrap();
    assert!((c.x - 10.0).abs() < 1e-9 && (c.y - 5.0).abs() < 1e-9);

    let ellipse = Shape::Ellipse(rect(0.0, 0.0, 20.0, 10.0));
    let e = calculate_boundary_point_thru_center(&ellipse, point(10.0, -20.0)).unwrap();
    assert!((e.x - 10.0).abs() < 1e-9 && e.y.abs() < 1e-9);

    let flat = Shape::Rect(rect(0.0, 0.0, 0.0, 10.0));
    assert_eq!(calculate_boundary_point_thru_center(&flat, point(3.0, 3.0)), None);
}

#[test]
fn chop_points_are_symmetric_for_equal_shapes() {
    let pairs = [
        (Shape::Rect(rect(0.0, 0.0, 20.0, 10.0)), Shape::Rect(rect(50.0, 30.0, 20.0, 10.0))),
        (Shape::Rect(rect(0.0, 0.0, 20.0, 10.0)), Shape::Rect(rect(5.0, 80.0, 20.0, 10.0))),
        (
            Shape::Ellipse(rect(0.0, 0.0, 30.0, 12.0)),
            Shape::Ellipse(rect(70.0, -40.0, 30.0, 12.0)),
        ),
    ];
    for (f1, f2) in pairs {
        let mid = point(
            (f1.center().x + f2.center().x) / 2.0,
            (f1.center().y + f2.center().y) / 2.0,
        );
        let a = calculate_chop_point(&f1, &f2).unwrap();
        let b = calculate_chop_point(&f2, &f1).unwrap();
        let mirrored = reflect_point(b, mid);
        assert!(
            (a.x - mirrored.x).abs() < 1e-9 && (a.y - mirrored.y).abs() < 1e-9,
            "{a:?} vs {mirrored:?}"
        );
    }
}

#[test]
fn chop_points_differ_for_different_shapes() {
    let small = Shape::Rect(rect(0.0, 0.0, 10.0, 10.0));
    let big = Shape::Rect(rect(40.0, 0.0, 40.0, 10.0));
    let a = calculate_chop_point(&small, &big).unwrap();
    let b = calculate_chop_point(&big, &small).unwrap();
    assert!((a.x - 10.0).abs() < 1e-9 && (a.y - 5.0).abs() < 1e-9, "{a:?}");
    assert!((b.x - 40.0).abs() < 1e-9 && (b.y - 5.0).abs() < 1e-9, "{b:?}");
}
