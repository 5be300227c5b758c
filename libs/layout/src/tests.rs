use std::collections::HashSet;
use std::sync::Arc;

use geometry::prelude::*;
use routing::{GridConfig, RoutingGrid, TrackColoring, TrackId};
use test_log::test;

use crate::*;

const GRID_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data/grid.toml");

fn cellview() -> LayCellView {
    let config = GridConfig::from_file(GRID_PATH).expect("failed to load grid config");
    let grid = RoutingGrid::from_config(&config).expect("invalid routing grid");
    let colors = TrackColoring::from_config(&config);
    LayCellView::new(Arc::new(grid), Arc::new(colors), "pytest")
}

fn key(bbox: BBox) -> (i64, i64, i64, i64) {
    bbox.immutable_key()
}

#[test]
fn get_intersect_finds_wires_in_window() {
    let mut cv = cellview();
    let layer = 1;
    let wire_data = [(0, 0, 500), (2, 125, 175), (5, -200, 150), (5, 300, 500), (8, 150, 300)];
    let expect_idx = [0, 1, 2];

    let grid = cv.grid().clone();
    let xl = grid.htr_to_coord(layer, 0).unwrap();
    let xh = grid.htr_to_coord(layer, 7).unwrap();
    let bnd_box = BBox::new(xl, 100, xh, 200);

    let mut expected = HashSet::new();
    for (idx, (htr, lower, upper)) in wire_data.into_iter().enumerate() {
        let tid = TrackId::new(layer, htr, 1, 1, 0).unwrap();
        cv.add_warr(&tid, lower, upper).unwrap();
        if expect_idx.contains(&idx) {
            let (bl, bu) = tid.get_bounds(&grid).unwrap();
            expected.insert((bl, lower, bu, upper));
        }
    }

    let boxes = cv.get_intersect(layer, bnd_box, 0, 0, true);
    let found: HashSet<_> = boxes.iter().copied().map(key).collect();
    assert_eq!(found, expected);
    assert_eq!(boxes.len(), found.len());
}

#[test]
fn add_warr_returns_wire_boxes() {
    let mut cv = cellview();
    let tid = TrackId::new(1, 0, 1, 3, 4).unwrap();
    let boxes = cv.add_warr(&tid, -10, 90).unwrap();
    assert_eq!(
        boxes,
        vec![
            BBox::new(30, -10, 70, 90),
            BBox::new(230, -10, 270, 90),
            BBox::new(430, -10, 470, 90),
        ]
    );
    assert_eq!(cv.num_shapes(), 3);
    assert_eq!(cv.bbox(), BBox::new(30, -10, 470, 90));

    // Horizontal layers run along x.
    let tid = TrackId::single(2, 1, 1).unwrap();
    assert_eq!(
        cv.add_warr(&tid, 0, 1000).unwrap(),
        vec![BBox::new(0, 36, 1000, 84)]
    );
}

#[test]
fn wires_record_track_metadata() {
    let mut cv = cellview();
    let tid = TrackId::new(1, 0, 2, 2, 6).unwrap();
    cv.add_warr(&tid, 0, 100).unwrap();

    let track = cv.track(1, 6).unwrap();
    assert_eq!(track.len(), 1);
    let (span, wire) = track.iter().next().unwrap();
    assert_eq!(span, Interval::new(0, 100));
    assert_eq!(wire.ntr, 2);
    assert_eq!(wire.color, 1);
    assert_eq!(cv.track(1, 0).unwrap().get((0, 100)).unwrap().color, 0);
    assert!(cv.track(1, 4).is_none());
}

#[test]
fn conflicting_wires_are_rejected_atomically() {
    let mut cv = cellview();
    cv.add_warr(&TrackId::single(1, 4, 1).unwrap(), 0, 100).unwrap();
    let before = cv.num_shapes();

    // The second wire of the bundle lands on the occupied track.
    let bundle = TrackId::new(1, 2, 1, 2, 2).unwrap();
    assert!(matches!(
        cv.add_warr(&bundle, 50, 150),
        Err(LayoutError::Conflict { level: 1, htr: 4, .. })
    ));
    assert_eq!(cv.num_shapes(), before);
    assert!(cv.track(1, 2).is_none());

    // Touching wires on the same track conflict.
    assert!(matches!(
        cv.add_warr(&TrackId::single(1, 4, 1).unwrap(), 100, 200),
        Err(LayoutError::Conflict { .. })
    ));
    assert!(cv.add_warr(&TrackId::single(1, 4, 1).unwrap(), 101, 200).is_ok());
    assert_eq!(cv.track(1, 4).unwrap().len(), 2);
}

#[test]
fn invalid_wires_are_rejected() {
    let mut cv = cellview();
    let tid = TrackId::single(1, 0, 1).unwrap();
    assert!(matches!(
        cv.add_warr(&tid, 100, 100),
        Err(LayoutError::InvalidArgument(_))
    ));
    assert!(matches!(
        cv.add_warr(&TrackId::single(9, 0, 1).unwrap(), 0, 100),
        Err(LayoutError::Routing(routing::RoutingError::NoSuchLayer(9)))
    ));
    assert!(cv.is_empty());
}

#[test]
fn spacing_grows_stored_wires() {
    let mut cv = cellview();
    cv.add_warr(&TrackId::single(1, 0, 1).unwrap(), 0, 100).unwrap();

    // 5 units right of the wire edge at x = 70, well within the layer space.
    let query = BBox::new(75, 0, 80, 10);
    assert_eq!(cv.get_intersect(1, query, 0, 0, true), vec![]);
    assert_eq!(cv.get_intersect(1, query, 0, 0, false).len(), 1);
    assert_eq!(cv.get_intersect(1, query, 5, 0, true).len(), 1);
    assert_eq!(cv.get_intersect(1, query, 4, 0, true), vec![]);

    // Beyond the layer space.
    let far = BBox::new(131, 0, 140, 10);
    assert_eq!(cv.get_intersect(1, far, 0, 0, false), vec![]);
    assert_eq!(cv.get_intersect(1, BBox::new(130, 0, 140, 10), 0, 0, false).len(), 1);
}

#[test]
fn rectangles_and_layer_filtering() {
    let mut cv = cellview();
    assert!(matches!(
        cv.add_rect(1, BBox::new(0, 0, 0, 10)),
        Err(LayoutError::NotPhysical(_))
    ));
    cv.add_rect(2, BBox::new(0, 0, 100, 100)).unwrap();
    cv.add_warr(&TrackId::single(1, 0, 1).unwrap(), 0, 100).unwrap();

    let query = BBox::new(0, 0, 10, 10);
    assert_eq!(cv.get_intersect(1, query, 0, 0, false), vec![BBox::new(30, 0, 70, 100)]);
    assert_eq!(cv.get_intersect(2, query, 0, 0, false), vec![BBox::new(0, 0, 100, 100)]);
    assert_eq!(cv.get_intersect(3, query, 0, 0, false), vec![]);
    assert_eq!(cv.get_intersect(1, BBox::invalid(), 0, 0, false), vec![]);

    // Rectangles have no spacing of their own.
    assert_eq!(cv.get_intersect(2, BBox::new(101, 0, 110, 10), 0, 0, false), vec![]);
}

#[test]
fn remove_wire_frees_track() {
    let mut cv = cellview();
    let tid = TrackId::single(1, 2, 1).unwrap();
    cv.add_warr(&tid, 0, 100).unwrap();
    cv.add_warr(&tid, 200, 300).unwrap();

    assert_eq!(cv.remove_wire(1, 2, 0, 100).unwrap(), BBox::new(130, 0, 170, 100));
    assert_eq!(cv.num_shapes(), 1);
    assert!(matches!(
        cv.remove_wire(1, 2, 0, 100),
        Err(LayoutError::WireNotFound { level: 1, htr: 2, .. })
    ));
    assert_eq!(cv.get_intersect(1, BBox::new(0, 0, 500, 150), 0, 0, true), vec![]);

    // The space is free again.
    cv.add_warr(&tid, 0, 150).unwrap();
    cv.remove_wire(1, 2, 0, 150).unwrap();
    cv.remove_wire(1, 2, 200, 300).unwrap();
    assert!(cv.track(1, 2).is_none());
    assert!(cv.is_empty());
    assert!(!cv.bbox().is_valid());
}

#[test]
fn remove_wire_rejects_reversed_span() {
    let mut cv = cellview();
    let tid = TrackId::single(1, 2, 1).unwrap();
    cv.add_warr(&tid, 0, 100).unwrap();

    assert!(matches!(
        cv.remove_wire(1, 2, 100, 0),
        Err(LayoutError::InvalidArgument(_))
    ));
    assert!(matches!(
        cv.remove_wire(1, 2, 50, 50),
        Err(LayoutError::InvalidArgument(_))
    ));
    assert_eq!(cv.num_shapes(), 1);
    assert!(cv.track(1, 2).is_some_and(|track| track.contains((0, 100))));
}
