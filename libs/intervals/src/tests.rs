use std::rc::Rc;

use geometry::interval::Interval;
use test_log::test;

use crate::*;

fn build<V: Clone>(entries: &[((i64, i64), V)]) -> DisjointIntervals<V> {
    let mut intvs = DisjointIntervals::new();
    for (intv, val) in entries {
        assert!(intvs.add(*intv, val.clone(), false));
    }
    intvs
}

fn sample() -> DisjointIntervals<i32> {
    build(&[((1, 2), 1), ((4, 7), 2), ((10, 12), 3)])
}

#[test]
fn contains_is_exact_match() {
    let intvs = build(&[((1, 2), 'A'), ((3, 5), 'B')]);
    assert!(intvs.contains((1, 2)));
    assert!(intvs.contains((3, 5)));
    assert!(!intvs.contains((1, 3)));
    assert!(!intvs.contains((3, 6)));
    assert!(!intvs.contains((3, 4)));
    assert!(intvs.covers((3, 4)));
    assert!(!intvs.covers((2, 4)));
}

#[test]
fn iteration_is_sorted() {
    let mut intvs = DisjointIntervals::new();
    assert!(intvs.add((10, 12), 3, false));
    assert!(intvs.add((1, 2), 1, false));
    assert!(intvs.add((4, 7), 2, false));
    let got: Vec<_> = intvs.iter().map(|(i, v)| (i.into(), *v)).collect::<Vec<((i64, i64), i32)>>();
    assert_eq!(got, vec![((1, 2), 1), ((4, 7), 2), ((10, 12), 3)]);
    assert_eq!(intvs.len(), 3);
    assert_eq!(intvs.values().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
}

#[test]
fn start_and_stop() {
    let intvs = sample();
    assert_eq!(intvs.start(), Ok(1));
    assert_eq!(intvs.stop(), Ok(12));

    let empty = DisjointIntervals::<()>::new();
    assert_eq!(empty.start(), Err(IntervalError::Empty));
    assert_eq!(empty.stop(), Err(IntervalError::Empty));
    assert_eq!(empty.len(), 0);
    assert!(empty.iter().next().is_none());
}

#[test]
fn first_overlap_item() {
    let intvs = sample();
    assert_eq!(
        intvs.get_first_overlap_item((6, 8)),
        Some((Interval::new(4, 7), &2))
    );
    assert_eq!(
        intvs.get_first_overlap_item((6, 11)),
        Some((Interval::new(4, 7), &2))
    );
    assert_eq!(intvs.get_first_overlap_item((7, 10)), None);
    assert_eq!(
        intvs.get_first_overlap_item((0, 100)),
        Some((Interval::new(1, 2), &1))
    );

    let two = build(&[((1, 2), 'A'), ((3, 5), 'B')]);
    assert_eq!(
        two.get_first_overlap_item((3, 5)),
        Some((Interval::new(3, 5), &'B'))
    );
    assert_eq!(
        DisjointIntervals::<()>::new().get_first_overlap_item((1, 2)),
        None
    );
}

#[test]
fn abut_is_permitted_per_call() {
    let mut intvs = DisjointIntervals::new();
    assert!(intvs.add((0, 3), "hi", false));
    assert!(intvs.add((3, 5), "bye", true));
    assert!(!intvs.add((5, 7), "nope", false));
    assert_eq!(intvs.len(), 2);
    assert!(intvs.add((5, 7), "ok", true));
}

#[test]
fn abut_is_symmetric() {
    let mut intvs = DisjointIntervals::new();
    assert!(intvs.add((0, 3), 'a', false));
    assert!(intvs.add((6, 9), 'c', false));
    assert!(!intvs.add((3, 6), 'b', false));
    assert!(intvs.add((3, 6), 'b', true));
    assert!(intvs.add((-2, 0), 'z', true));
    assert_eq!(intvs.start(), Ok(-2));
}

#[test]
fn rejected_add_leaves_container_unchanged() {
    let mut intvs = sample();
    let before = intvs.clone();
    assert!(!intvs.add((0, 5), 9, true));
    assert!(!intvs.add((5, 6), 9, true));
    assert!(!intvs.add((4, 7), 9, true));
    assert!(!intvs.add((8, 8), 9, true));
    assert_eq!(intvs, before);
    assert_eq!(intvs.try_add((11, 20), 42, true), Err(42));
}

#[test]
fn overlap_queries_and_removal() {
    let mut intvs = sample();
    let hits: Vec<_> = intvs.overlap_items((1, 11)).map(|(_, v)| *v).collect();
    assert_eq!(hits, vec![1, 2, 3]);
    assert!(!intvs.overlaps((2, 4)));

    assert_eq!(intvs.remove((4, 7)), Some(2));
    assert_eq!(intvs.remove((4, 7)), None);
    assert!(intvs.add((2, 10), 5, true));

    let removed = intvs.remove_overlaps((0, 3));
    assert_eq!(
        removed,
        vec![(Interval::new(1, 2), 1), (Interval::new(2, 10), 5)]
    );
    assert_eq!(intvs.intervals().collect::<Vec<_>>(), vec![Interval::new(10, 12)]);
}

#[test]
fn from_disjoint_validates_input() {
    let ok = DisjointIntervals::from_disjoint([((0, 3), 'a'), ((3, 5), 'b')]).unwrap();
    assert_eq!(ok.len(), 2);

    assert_eq!(
        DisjointIntervals::from_disjoint([((0, 4), 'a'), ((3, 5), 'b')]),
        Err(IntervalError::NotDisjoint {
            prev: Interval::new(0, 4),
            next: Interval::new(3, 5),
        })
    );
    assert_eq!(
        DisjointIntervals::from_disjoint([((2, 2), 'a')]),
        Err(IntervalError::EmptyInterval { start: 2, stop: 2 })
    );
    assert_eq!(
        DisjointIntervals::from_disjoint([((0, 1), 'a'), ((3, 1), 'b')]),
        Err(IntervalError::EmptyInterval { start: 3, stop: 1 })
    );
}

#[test]
fn values_are_owned_and_released_once() {
    let vals: Vec<Rc<String>> = ["a", "b", "c"].iter().map(|s| Rc::new(s.to_string())).collect();
    let mut intvs = DisjointIntervals::new();
    for (i, v) in vals.iter().enumerate() {
        let lo = 3 * i as i64;
        assert!(intvs.add((lo, lo + 2), Rc::clone(v), false));
    }
    assert!(vals.iter().all(|v| Rc::strong_count(v) == 2));

    // A rejected value is dropped immediately.
    assert!(!intvs.add((0, 1), Rc::clone(&vals[0]), false));
    assert_eq!(Rc::strong_count(&vals[0]), 2);

    let popped = intvs.remove((3, 5)).unwrap();
    assert_eq!(Rc::strong_count(&vals[1]), 2);
    drop(popped);
    assert_eq!(Rc::strong_count(&vals[1]), 1);

    drop(intvs);
    assert!(vals.iter().all(|v| Rc::strong_count(v) == 1));
}

#[test]
fn reversed_intervals_are_rejected() {
    let mut intvs = sample();
    let before = intvs.clone();
    assert!(!intvs.can_add((9, 8), true));
    assert!(!intvs.add((9, 8), 9, true));
    assert_eq!(intvs.try_add((30, 20), 9, false), Err(9));
    assert_eq!(intvs, before);

    // Reversed keys never name a stored interval.
    assert!(!intvs.contains((7, 4)));
    assert_eq!(intvs.get((7, 4)), None);
    assert_eq!(intvs.remove((7, 4)), None);
    assert!(!intvs.covers((6, 5)));
    assert_eq!(intvs, before);

    let mut empty = DisjointIntervals::new();
    assert!(!empty.add((7, 5), 'x', false));
    assert!(empty.is_empty());
}

#[test]
fn empty_queries_overlap_nothing() {
    let mut intvs = sample();
    for query in [(5, 5), (1, 1), (7, 4)] {
        assert_eq!(intvs.get_first_overlap_item(query), None);
        assert!(!intvs.overlaps(query));
        assert_eq!(intvs.overlap_items(query).count(), 0);
        assert!(intvs.remove_overlaps(query).is_empty());
    }
    assert_eq!(intvs.len(), 3);

    // A unit span inside a stored interval does overlap.
    assert!(intvs.overlaps((5, 6)));
}

#[test]
fn intersection_of_two_maps() {
    let a = sample();
    let b = DisjointIntervals::from_disjoint([((0, 5), "x"), ((6, 11), "y")]).unwrap();
    let both = a.get_intersection(&b);
    let got: Vec<(i64, i64)> = both.intervals().map(Into::into).collect();
    assert_eq!(got, vec![(1, 2), (4, 5), (6, 7), (10, 11)]);
    assert_eq!(b.get_intersection(&a), both);

    let apart = DisjointIntervals::from_disjoint([((2, 4), ()), ((7, 10), ())]).unwrap();
    assert!(a.get_intersection(&apart).is_empty());
}

#[test]
fn complement_within_total() {
    let intvs = sample();
    let gaps = intvs.get_complement((0, 15)).unwrap();
    let got: Vec<(i64, i64)> = gaps.intervals().map(Into::into).collect();
    assert_eq!(got, vec![(0, 1), (2, 4), (7, 10), (12, 15)]);

    let inner = intvs.get_complement((5, 11)).unwrap();
    assert_eq!(inner.intervals().collect::<Vec<_>>(), vec![Interval::new(7, 10)]);

    let abutting = DisjointIntervals::from_disjoint([((0, 3), 'a'), ((3, 5), 'b')]).unwrap();
    assert!(abutting.get_complement((0, 5)).unwrap().is_empty());

    assert_eq!(
        intvs.get_complement((4, 4)),
        Err(IntervalError::EmptyInterval { start: 4, stop: 4 })
    );
}

#[test]
fn subtract_trims_and_splits() {
    let mut intvs = sample();
    assert!(intvs.subtract((5, 11)));
    let got: Vec<((i64, i64), i32)> = intvs.iter().map(|(i, v)| (i.into(), *v)).collect();
    assert_eq!(got, vec![((1, 2), 1), ((4, 5), 2), ((11, 12), 3)]);

    let mut wide = DisjointIntervals::from_disjoint([((0, 10), 'w')]).unwrap();
    assert!(wide.subtract((3, 6)));
    let got: Vec<((i64, i64), char)> = wide.iter().map(|(i, v)| (i.into(), *v)).collect();
    assert_eq!(got, vec![((0, 3), 'w'), ((6, 10), 'w')]);

    let before = wide.clone();
    assert!(!wide.subtract((3, 6)));
    assert!(!wide.subtract((8, 8)));
    assert!(!wide.subtract((9, 2)));
    assert_eq!(wide, before);
    assert!(wide.subtract((-5, 20)));
    assert!(wide.is_empty());
}

#[test]
fn transform_scales_and_shifts() {
    let intvs = sample();
    let moved = intvs.get_transform(1, 10).unwrap();
    let got: Vec<((i64, i64), i32)> = moved.iter().map(|(i, v)| (i.into(), *v)).collect();
    assert_eq!(got, vec![((11, 12), 1), ((14, 17), 2), ((20, 22), 3)]);

    let mirrored = intvs.get_transform(-1, 0).unwrap();
    let got: Vec<((i64, i64), i32)> = mirrored.iter().map(|(i, v)| (i.into(), *v)).collect();
    assert_eq!(got, vec![((-12, -10), 3), ((-7, -4), 2), ((-2, -1), 1)]);

    let doubled = intvs.get_transform(2, 0).unwrap();
    assert_eq!(doubled.stop(), Ok(24));
    assert_eq!(intvs.get_transform(0, 5), Err(IntervalError::ZeroScale));
}
