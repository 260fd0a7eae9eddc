use limpet_geom::{
    E2, EPSILON, OUT_BOTTOM, OUT_LEFT, OUT_RIGHT, OUT_TOP, find_side, is_vertex_point,
    make_non_vertex, opposite_side, outcode, point, project_onto_bounds, rect, rect_outcode,
    reflect_across_line, reflect_point,
};

#[test]
fn find_side_reports_every_touched_side() {
    let r = rect(0.0, 0.0, 10.0, 10.0);
    assert_eq!(find_side(point(0.0, 5.0), &r), OUT_LEFT);
    assert_eq!(find_side(point(10.0, 5.0 + 1e-7), &r), OUT_RIGHT);
    assert_eq!(find_side(point(10.0, 10.0), &r), OUT_RIGHT | OUT_BOTTOM);
    assert_eq!(find_side(point(5.0, 5.0), &r), 0);
}

#[test]
fn vertex_point_needs_both_classifications() {
    let r = rect(0.0, 0.0, 10.0, 10.0);
    assert!(is_vertex_point(point(0.0, 0.0), &r));
    assert!(!is_vertex_point(point(0.0, 0.5), &r));
    // A corner coordinate off by more than EPSILON is not a vertex.
    assert!(!is_vertex_point(point(10.0, 10.0 - 10.0 * EPSILON), &r));
}

#[test]
fn make_non_vertex_keeps_left_right_side() {
    let r = rect(0.0, 0.0, 10.0, 10.0);
    let p = make_non_vertex(point(10.0, 10.0), &r, true, true);
    assert_eq!(p.x, 10.0);
    assert!((p.y - (10.0 - E2)).abs() < 1e-5);
    assert!(!is_vertex_point(p, &r));
    assert!((10.0 - p.y) <= (E2 - EPSILON).abs() + 1e-12);
}

#[test]
fn make_non_vertex_keeps_top_bottom_side() {
    let r = rect(0.0, 0.0, 10.0, 10.0);
    let p = make_non_vertex(point(0.0, 0.0), &r, true, false);
    assert_eq!(p.y, 0.0);
    assert!(p.x > 0.0 && p.x < E2);
    assert_eq!(find_side(p, &r), OUT_TOP);

    // Non-vertex points pass through untouched.
    let q = point(0.0, 4.0);
    assert_eq!(make_non_vertex(q, &r, true, false), q);
}

#[test]
fn outcode_and_rect_outcode_classify_relative_position() {
    let r = rect(0.0, 0.0, 10.0, 10.0);
    assert_eq!(outcode(&r, point(-1.0, 5.0)), OUT_LEFT);
    assert_eq!(outcode(&r, point(11.0, 11.0)), OUT_RIGHT | OUT_BOTTOM);
    assert_eq!(outcode(&r, point(5.0, 5.0)), 0);

    let stationary = rect(100.0, 100.0, 50.0, 50.0);
    assert_eq!(rect_outcode(&stationary, &rect(0.0, 110.0, 50.0, 20.0)), OUT_LEFT);
    assert_eq!(rect_outcode(&stationary, &rect(110.0, 0.0, 20.0, 50.0)), OUT_TOP);
    assert_eq!(
        rect_outcode(&stationary, &rect(0.0, 0.0, 50.0, 50.0)),
        OUT_LEFT | OUT_TOP
    );
    // Overlap on both axes.
    assert_eq!(rect_outcode(&stationary, &rect(120.0, 120.0, 50.0, 50.0)), 0);
}

#[test]
fn opposite_side_flips_each_bit() {
    assert_eq!(opposite_side(OUT_LEFT), OUT_RIGHT);
    assert_eq!(opposite_side(OUT_BOTTOM), OUT_TOP);
    assert_eq!(opposite_side(OUT_LEFT | OUT_TOP), OUT_RIGHT | OUT_BOTTOM);
}

#[test]
fn project_onto_bounds_picks_nearest_side() {
    let r = rect(0.0, 0.0, 10.0, 20.0);
    assert_eq!(project_onto_bounds(point(2.0, 10.0), &r), point(0.0, 10.0));
    assert_eq!(project_onto_bounds(point(5.0, 19.0), &r), point(5.0, 20.0));
    assert_eq!(project_onto_bounds(point(-3.0, 25.0), &r), point(0.0, 20.0));
}

#[test]
fn reflection_helpers() {
    assert_eq!(reflect_point(point(1.0, 2.0), point(5.0, 5.0)), point(9.0, 8.0));
    let m = reflect_across_line(point(2.0, 3.0), point(0.0, 0.0), point(10.0, 0.0));
    assert!((m.x - 2.0).abs() < 1e-12 && (m.y + 3.0).abs() < 1e-12);
}
