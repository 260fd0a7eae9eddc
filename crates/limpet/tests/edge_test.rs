use limpet::geom::{Point, Shape, is_vertex_point, point, rect};
use limpet::{
    Compatibility, ConnectOutcome, ConnectionId, Connection, Connector, ConnectorCoordinator,
    Connections, End, FigureId, FigureTable, NewEnd, PreviousBoundsTracker, Strategy,
};

fn assert_close(a: Point, b: Point) {
    assert!(
        (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9,
        "{a:?} != {b:?}"
    );
}

fn edge_pair() -> (FigureTable, Connections, FigureId, FigureId, ConnectionId) {
    let mut table = FigureTable::new();
    let a = table.add(Shape::Rect(rect(0.0, 0.0, 50.0, 50.0)));
    let b = table.add(Shape::Rect(rect(100.0, 0.0, 50.0, 50.0)));
    let mut connections = Connections::new();
    let outcome = {
        let mut co = ConnectorCoordinator::new(&table, &mut connections);
        co.connect(
            NewEnd {
                figure: a,
                strategy: Strategy::edge(),
                at: point(25.0, 25.0),
            },
            NewEnd {
                figure: b,
                strategy: Strategy::edge(),
                at: point(125.0, 25.0),
            },
            &mut |_: &str| -> bool { panic!("edge-edge needs no confirmation") },
        )
        .unwrap()
    };
    let ConnectOutcome::Created(id) = outcome else {
        panic!("edge-edge connection vetoed: {outcome:?}");
    };
    (table, connections, a, b, id)
}

fn move_figure(
    table: &mut FigureTable,
    connections: &mut Connections,
    tracker: &mut PreviousBoundsTracker,
    figure: FigureId,
    to: Point,
) {
    let previous = table.move_to(figure, to).unwrap();
    let mut co = ConnectorCoordinator::new(&*table, connections);
    co.figure_bounds_changed(figure, previous, tracker).unwrap();
}

#[test]
fn new_connection_uses_the_facing_sides() {
    let (_, connections, _, _, id) = edge_pair();
    let c = connections.get(id).unwrap();
    assert_close(c.endpoint(End::Start), point(50.0, 25.0));
    assert_close(c.endpoint(End::End), point(100.0, 25.0));
}

#[test]
fn new_connections_keep_their_position_along_the_facing_side() {
    let (table, mut connections, a, b, first) = edge_pair();
    let mut co = ConnectorCoordinator::new(&table, &mut connections);
    let outcome = co
        .connect(
            NewEnd {
                figure: a,
                strategy: Strategy::edge(),
                at: point(10.0, 40.0),
            },
            NewEnd {
                figure: b,
                strategy: Strategy::edge(),
                at: point(140.0, 10.0),
            },
            &mut |_: &str| true,
        )
        .unwrap();
    let ConnectOutcome::Created(second) = outcome else {
        panic!("second edge-edge connection vetoed: {outcome:?}");
    };

    let one = co.connection(first).unwrap();
    let two = co.connection(second).unwrap();
    assert_close(two.endpoint(End::Start), point(50.0, 40.0));
    assert_close(two.endpoint(End::End), point(100.0, 10.0));
    assert_ne!(one.endpoint(End::Start), two.endpoint(End::Start));
    assert_ne!(one.endpoint(End::End), two.endpoint(End::End));
}

#[test]
fn passing_the_other_figure_flips_both_ends() {
    let (mut table, mut connections, a, _, id) = edge_pair();
    let mut tracker = PreviousBoundsTracker::new();
    move_figure(&mut table, &mut connections, &mut tracker, a, point(200.0, 0.0));

    let c = connections.get(id).unwrap();
    assert_close(c.endpoint(End::Start), point(200.0, 25.0));
    assert_close(c.endpoint(End::End), point(150.0, 25.0));
}

#[test]
fn moving_above_turns_a_quarter() {
    let (mut table, mut connections, a, _, id) = edge_pair();
    let mut tracker = PreviousBoundsTracker::new();
    move_figure(&mut table, &mut connections, &mut tracker, a, point(100.0, -100.0));

    let c = connections.get(id).unwrap();
    // A now sits above B: A's bottom faces B's top.
    assert_close(c.endpoint(End::Start), point(125.0, -50.0));
    assert_close(c.endpoint(End::End), point(125.0, 0.0));
}

#[test]
fn diagonal_positions_leave_connectors_on_their_sides() {
    let (mut table, mut connections, a, _, id) = edge_pair();
    let mut tracker = PreviousBoundsTracker::new();
    move_figure(&mut table, &mut connections, &mut tracker, a, point(200.0, 200.0));

    let c = connections.get(id).unwrap();
    assert_close(c.endpoint(End::Start), point(250.0, 225.0));
    assert_close(c.endpoint(End::End), point(100.0, 25.0));
}

#[test]
fn staying_on_the_same_side_does_not_turn() {
    let (mut table, mut connections, a, _, id) = edge_pair();
    let mut tracker = PreviousBoundsTracker::new();
    move_figure(&mut table, &mut connections, &mut tracker, a, point(-30.0, 10.0));

    let c = connections.get(id).unwrap();
    assert_close(c.endpoint(End::Start), point(20.0, 35.0));
    assert_close(c.endpoint(End::End), point(100.0, 25.0));
}

#[test]
fn spacing_changes_by_the_same_amount_on_both_figures() {
    let mut table = FigureTable::new();
    let a = table.add(Shape::Rect(rect(0.0, 0.0, 100.0, 40.0)));
    let b = table.add(Shape::Rect(rect(200.0, 0.0, 20.0, 20.0)));
    let a_bounds = rect(0.0, 0.0, 100.0, 40.0);
    let b_bounds = rect(200.0, 0.0, 20.0, 20.0);
    let mut connections = Connections::new();
    let mut join = |from: Point, to: Point| {
        connections.insert(
            Connection::new(
                vec![from, to],
                Connector::new(a, Strategy::edge(), from, &a_bounds),
                Connector::new(b, Strategy::edge(), to, &b_bounds),
            )
            .unwrap(),
        )
    };
    let first = join(point(100.0, 10.0), point(200.0, 5.0));
    let second = join(point(100.0, 30.0), point(200.0, 15.0));

    let mut tracker = PreviousBoundsTracker::new();
    move_figure(&mut table, &mut connections, &mut tracker, b, point(-100.0, 0.0));

    let one = connections.get(first).unwrap();
    let two = connections.get(second).unwrap();
    // Half turns about 20x20 sub-rectangles swap the order and keep the spacing on each side.
    assert_close(one.endpoint(End::Start), point(0.0, 30.0));
    assert_close(two.endpoint(End::Start), point(0.0, 10.0));
    assert_close(one.endpoint(End::End), point(-80.0, 15.0));
    assert_close(two.endpoint(End::End), point(-80.0, 5.0));
}

#[test]
fn resizing_keeps_the_side_and_relative_position() {
    let (mut table, mut connections, a, _, id) = edge_pair();
    let mut tracker = PreviousBoundsTracker::new();
    let previous = table.set_bounds(a, rect(0.0, 0.0, 60.0, 100.0)).unwrap();
    {
        let mut co = ConnectorCoordinator::new(&table, &mut connections);
        co.figure_bounds_changed(a, previous, &mut tracker).unwrap();
    }
    let c = connections.get(id).unwrap();
    assert_close(c.endpoint(End::Start), point(60.0, 50.0));
}

#[test]
fn rotating_the_owner_snaps_to_quarter_turns() {
    let (table, mut connections, a, _, id) = edge_pair();
    let mut co = ConnectorCoordinator::new(&table, &mut connections);
    co.figure_rotated(a, 1.4).unwrap();
    let p = co.connection(id).unwrap().endpoint(End::Start);
    assert_close(p, point(25.0, 50.0));

    // Less than half a quarter does nothing.
    co.figure_rotated(a, 0.5).unwrap();
    let q = co.connection(id).unwrap().endpoint(End::Start);
    assert_close(q, point(25.0, 50.0));
}

#[test]
fn connectors_never_rest_on_a_corner() {
    let (table, mut connections, _, _, id) = edge_pair();
    let bounds = rect(0.0, 0.0, 50.0, 50.0);
    let mut co = ConnectorCoordinator::new(&table, &mut connections);
    let at = limpet::ConnectorRef::start(id);
    let strategy = co.strategy(at).unwrap();
    let p = strategy
        .as_dyn()
        .drag_connector(&mut co, at, point(50.0, 25.0), point(50.0, 60.0), Default::default())
        .unwrap();
    assert!(!is_vertex_point(p, &bounds), "{p:?} is a corner");
    assert!((p.x - 50.0).abs() < 1e-9);
}

#[test]
fn edge_and_rotational_ends_need_confirmation() {
    let mut table = FigureTable::new();
    let a = table.add(Shape::Rect(rect(0.0, 0.0, 50.0, 50.0)));
    let b = table.add(Shape::Rect(rect(100.0, 0.0, 50.0, 50.0)));
    let mut connections = Connections::new();
    let mut co = ConnectorCoordinator::new(&table, &mut connections);

    let verdict = co.compatible_with_opposite(a, &Strategy::edge(), b, &Strategy::rotational());
    assert!(matches!(verdict, Compatibility::NeedsConfirmation(ref r) if !r.is_empty()));

    let start = NewEnd {
        figure: a,
        strategy: Strategy::edge(),
        at: point(25.0, 25.0),
    };
    let end = NewEnd {
        figure: b,
        strategy: Strategy::rotational(),
        at: point(125.0, 25.0),
    };
    let mut asked = Vec::new();
    let declined = co
        .connect(start, end, &mut |message: &str| {
            asked.push(message.to_string());
            false
        })
        .unwrap();
    assert!(matches!(declined, ConnectOutcome::Vetoed(_)));
    assert_eq!(asked.len(), 1);
    assert!(asked[0].contains("rotational"));
    assert!(co.connections().is_empty());

    let accepted = co.connect(start, end, &mut |_: &str| true).unwrap();
    assert!(matches!(accepted, ConnectOutcome::Created(_)));
    assert_eq!(co.connections().len(), 1);
}
