use limpet::geom::{EPSILON, Point, Rect, Shape, is_vertex_point, rect};
use limpet::{
    ConnectOutcome, ConnectorCoordinator, ConnectorRef, Connections, End, FigureModel,
    FigureTable, NewEnd, PreviousBoundsTracker, Strategy,
};
use proptest::prelude::*;
use proptest::strategy::Strategy as _;

fn strategy(i: u8) -> Strategy {
    match i % 4 {
        0 => Strategy::chop(),
        1 => Strategy::boundary(),
        2 => Strategy::edge(),
        _ => Strategy::rotational(),
    }
}

fn arb_rect() -> impl proptest::strategy::Strategy<Value = Rect> {
    (-200.0f64..200.0, -200.0f64..200.0, 1.0f64..80.0, 1.0f64..80.0)
        .prop_map(|(x, y, w, h)| rect(x, y, w, h))
}

#[derive(Debug, Clone)]
struct Step {
    first: bool,
    resize: bool,
    dx: f64,
    dy: f64,
    w: f64,
    h: f64,
}

fn arb_step() -> impl proptest::strategy::Strategy<Value = Step> {
    (
        any::<bool>(),
        any::<bool>(),
        -120.0f64..120.0,
        -120.0f64..120.0,
        1.0f64..80.0,
        1.0f64..80.0,
    )
        .prop_map(|(first, resize, dx, dy, w, h)| Step {
            first,
            resize,
            dx,
            dy,
            w,
            h,
        })
}

fn within(p: Point, r: &Rect) -> bool {
    p.x >= r.min_x() - EPSILON
        && p.x <= r.max_x() + EPSILON
        && p.y >= r.min_y() - EPSILON
        && p.y <= r.max_y() + EPSILON
}

proptest! {
    #[test]
    fn connectors_stay_attached_through_moves_and_resizes(
        ra in arb_rect(),
        rb in arb_rect(),
        sa in any::<u8>(),
        sb in any::<u8>(),
        steps in proptest::collection::vec(arb_step(), 1..10),
    ) {
        let mut table = FigureTable::new();
        let a = table.add(Shape::Rect(ra));
        let b = table.add(Shape::Rect(rb));
        let mut connections = Connections::new();
        let outcome = {
            let mut co = ConnectorCoordinator::new(&table, &mut connections);
            co.connect(
                NewEnd { figure: a, strategy: strategy(sa), at: ra.center() },
                NewEnd { figure: b, strategy: strategy(sb), at: rb.center() },
                &mut |_: &str| true,
            )
            .unwrap()
        };
        let ConnectOutcome::Created(id) = outcome else {
            return Err(TestCaseError::fail(format!("connection vetoed: {outcome:?}")));
        };

        let mut tracker = PreviousBoundsTracker::new();
        for step in steps {
            let figure = if step.first { a } else { b };
            let current = table.bounds(figure).unwrap();
            let next = if step.resize {
                rect(current.min_x(), current.min_y(), step.w, step.h)
            } else {
                rect(current.min_x() + step.dx, current.min_y() + step.dy, current.width(), current.height())
            };
            let previous = table.set_bounds(figure, next).unwrap();
            let mut co = ConnectorCoordinator::new(&table, &mut connections);
            co.figure_bounds_changed(figure, previous, &mut tracker).unwrap();

            for end in [End::Start, End::End] {
                let at = ConnectorRef::new(id, end);
                let connector = *co.connector(at).unwrap();
                let bounds = table.bounds(connector.owner).unwrap();
                let p = co.point(at).unwrap();
                prop_assert!(within(p, &bounds), "{p:?} outside {bounds:?}");
                prop_assert_eq!(co.connection(id).unwrap().endpoint(end), p);
                if !connector.strategy.as_dyn().permits_vertex_points() {
                    prop_assert!(!is_vertex_point(p, &bounds), "{p:?} on a corner of {bounds:?}");
                }
            }
        }
    }
}

#[test]
fn chop_ends_are_the_only_ones_allowed_on_corners() {
    let vertex_ok: Vec<bool> = (0..4)
        .map(|i| strategy(i).as_dyn().permits_vertex_points())
        .collect();
    assert_eq!(vertex_ok, vec![true, false, false, false]);
}
