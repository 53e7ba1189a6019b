use super::*;
use proptest::prelude::*;

fn unit_square() -> Polygon {
    Polygon::from_points(&[
        Vec2::new(0.0, 0.0),
        Vec2::new(1.0, 0.0),
        Vec2::new(1.0, 1.0),
        Vec2::new(0.0, 1.0),
    ])
}

/// Nine-vertex L covering [0,2]x[0,1] plus [0,1]x[1,2].
fn l_shape() -> Polygon {
    Polygon::from_points(&[
        Vec2::new(0.0, 0.0),
        Vec2::new(1.0, 0.0),
        Vec2::new(2.0, 0.0),
        Vec2::new(2.0, 1.0),
        Vec2::new(1.0, 1.0),
        Vec2::new(1.0, 2.0),
        Vec2::new(0.5, 2.0),
        Vec2::new(0.0, 2.0),
        Vec2::new(0.0, 1.0),
    ])
}

#[test]
fn colinear_overlap_returns_overlap_interval() {
    let a = Segment::new(Vec2::new(0.0, 0.0), Vec2::new(2.0, 0.0));
    let b = Segment::new(Vec2::new(1.0, 0.0), Vec2::new(3.0, 0.0));
    let mut pts = intersect(&a, &b);
    assert_eq!(pts.len(), 2);
    pts.sort_by(|l, r| l.x.partial_cmp(&r.x).unwrap());
    assert!((pts[0] - Vec2::new(1.0, 0.0)).norm() < EPS);
    assert!((pts[1] - Vec2::new(2.0, 0.0)).norm() < EPS);
}

#[test]
fn colinear_containment_returns_inner_endpoints() {
    let a = Segment::new(Vec2::new(0.0, 0.0), Vec2::new(3.0, 0.0));
    let b = Segment::new(Vec2::new(1.0, 0.0), Vec2::new(2.0, 0.0));
    let pts = intersect(&a, &b);
    assert_eq!(pts.len(), 2);
}

#[test]
fn crossing_segments_meet_in_one_point() {
    let a = Segment::new(Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0));
    let b = Segment::new(Vec2::new(0.0, 1.0), Vec2::new(1.0, 0.0));
    let pts = intersect(&a, &b);
    assert_eq!(pts.len(), 1);
    assert!((pts[0] - Vec2::new(0.5, 0.5)).norm() < EPS);
}

#[test]
fn parallel_disjoint_segments_do_not_intersect() {
    let a = Segment::new(Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0));
    let b = Segment::new(Vec2::new(0.0, 1.0), Vec2::new(1.0, 1.0));
    assert!(intersect(&a, &b).is_empty());
    assert!(colinear(&a, &b));
}

#[test]
fn non_overlapping_colinear_segments_share_nothing() {
    let a = Segment::new(Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0));
    let b = Segment::new(Vec2::new(2.0, 0.0), Vec2::new(3.0, 0.0));
    assert!(intersect(&a, &b).is_empty());
}

#[test]
fn touching_colinear_segments_share_one_point() {
    let a = Segment::new(Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0));
    let b = Segment::new(Vec2::new(1.0, 0.0), Vec2::new(2.0, 0.0));
    let pts = intersect(&a, &b);
    assert_eq!(pts.len(), 1);
    assert!((pts[0] - Vec2::new(1.0, 0.0)).norm() < EPS);
}

#[test]
fn vertical_segments_share_max_slope() {
    let a = Segment::new(Vec2::new(0.0, 0.0), Vec2::new(0.0, 1.0));
    let b = Segment::new(Vec2::new(1.0, 0.0), Vec2::new(1.0, 5.0));
    assert!((a.slope() - b.slope()).abs() < EPS);
}

#[test]
fn distance_clamps_to_nearer_endpoint() {
    let s = Segment::new(Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0));
    assert!((s.distance_to(Vec2::new(0.5, 2.0)) - 2.0).abs() < EPS);
    // foot beyond p2: distance to p2, not to the carrier line
    assert!((s.distance_to(Vec2::new(2.0, 0.0)) - 1.0).abs() < EPS);
    let d = s.distance_to(Vec2::new(2.0, 1.0));
    assert!((d - 2f64.sqrt()).abs() < EPS);
}

#[test]
fn area_and_centroid_of_square() {
    let sq = unit_square();
    assert!((sq.area() - 1.0).abs() < EPS);
    assert!((sq.centroid() - Vec2::new(0.5, 0.5)).norm() < EPS);
}

#[test]
fn make_anticlockwise_flips_clockwise_ring_and_keeps_edge_tags() {
    let mut poly = Polygon::new();
    // clockwise square; tag the geometric bottom edge (from (1,0) to (0,0))
    poly.add_point(Vec2::new(0.0, 0.0));
    poly.add_point(Vec2::new(0.0, 1.0));
    poly.add_point(Vec2::new(1.0, 1.0));
    poly.add_point(Vec2::new(1.0, 0.0));
    poly.set_kind(3, EdgeKind::Fixed);
    assert!(poly.area() < 0.0);
    poly.make_anticlockwise();
    assert!(poly.area() > 0.0);
    // the bottom edge is now the closing edge (0,0)->... find it by geometry
    let n = poly.num_points();
    let mut found = false;
    for i in 0..n {
        let a = poly.point(i);
        let b = poly.point((i + 1) % n);
        if (a.y).abs() < EPS && (b.y).abs() < EPS {
            assert_eq!(poly.kind(i), EdgeKind::Fixed);
            found = true;
        }
    }
    assert!(found);
}

#[test]
fn point_in_and_on_l_shape() {
    let l = l_shape();
    assert!(l.point_in(Vec2::new(0.5, 0.5)));
    assert!(!l.point_in(Vec2::new(1.5, 1.5)));
    // exactly on edge 1 ((1,0)-(2,0)): reported on, not in
    let on_edge = Vec2::new(1.5, 0.0);
    assert_eq!(l.point_on(on_edge), Some(1));
    assert!(!l.point_in(on_edge));
    assert_eq!(l.point_on(Vec2::new(5.0, 5.0)), None);
}

#[test]
fn add_point_deduped_returns_existing_index() {
    let mut poly = unit_square();
    let i = poly.add_point_deduped(Vec2::new(1.0, 0.0));
    assert_eq!(i, 1);
    assert_eq!(poly.num_points(), 4);
    let j = poly.add_point_deduped(Vec2::new(0.25, 0.0));
    assert_eq!(j, 4);
}

#[test]
fn clip_square_along_vertical_line() {
    let sq = unit_square();
    let line = Segment::new(Vec2::new(0.5, -10.0), Vec2::new(0.5, 10.0));

    let left = sq.clip_left(&line);
    assert_eq!(left.len(), 1);
    assert!((left[0].area() - 0.5).abs() < 1e-9);
    assert!(left[0].point_in(Vec2::new(0.75, 0.5)));

    let right = sq.clip_right(&line);
    assert_eq!(right.len(), 1);
    assert!((right[0].area() - 0.5).abs() < 1e-9);
    assert!(right[0].point_in(Vec2::new(0.25, 0.5)));
}

#[test]
fn clip_line_missing_polygon_keeps_or_rejects_whole() {
    let sq = unit_square();
    let line = Segment::new(Vec2::new(2.0, -10.0), Vec2::new(2.0, 10.0));
    let right = sq.clip_right(&line);
    assert_eq!(right.len(), 1);
    assert!((right[0].area() - 1.0).abs() < 1e-9);
    let left = sq.clip_left(&line);
    assert!(left.is_empty());
}

#[test]
fn clip_l_shape_horizontal_conserves_area() {
    let l = l_shape();
    let line = Segment::new(Vec2::new(-10.0, 0.5), Vec2::new(10.0, 0.5));
    let below = l.clip_right(&line);
    let above = l.clip_left(&line);
    let area_below: f64 = below.iter().map(|p| p.area()).sum();
    let area_above: f64 = above.iter().map(|p| p.area()).sum();
    assert!((area_below + area_above - l.area()).abs() < 1e-9);
    assert!((area_below - 1.0).abs() < 1e-9);
}

#[test]
fn diagonal_clip_of_l_shape_produces_two_components() {
    let l = l_shape();
    // the line x + y = 2.6 shaves a triangle off each arm of the L
    let line = Segment::new(Vec2::new(3.0, -0.4), Vec2::new(-0.4, 3.0));
    let corners = l.clip_left(&line);
    assert_eq!(corners.len(), 2);
    let shaved: f64 = corners.iter().map(|p| p.area()).sum();
    assert!((shaved - 0.16).abs() < 1e-9);
    let rest: f64 = l.clip_right(&line).iter().map(|p| p.area()).sum();
    assert!((shaved + rest - l.area()).abs() < 1e-9);
}

#[test]
fn intersect_with_inserts_crossings_into_ring() {
    let mut sq = unit_square();
    let line = Segment::new(Vec2::new(0.5, -10.0), Vec2::new(0.5, 10.0));
    let pts = sq.intersect_with(&line);
    assert_eq!(pts.len(), 2);
    assert_eq!(sq.num_points(), 6);
    // sorted by distance from line.p1 (the bottom endpoint)
    assert!(pts[0].y < pts[1].y);
}

#[test]
fn ordered_intersections_include_segment_endpoints() {
    let sq = unit_square();
    let seg = Segment::new(Vec2::new(-1.0, 0.5), Vec2::new(2.0, 0.5));
    let pts = sq.ordered_intersections(&seg);
    assert_eq!(pts.len(), 4);
    assert!((pts[0] - seg.p1()).norm() < EPS);
    assert!((pts[3] - seg.p2()).norm() < EPS);
    assert!((pts[1] - Vec2::new(0.0, 0.5)).norm() < EPS);
    assert!((pts[2] - Vec2::new(1.0, 0.5)).norm() < EPS);
}

proptest! {
    #[test]
    fn intersection_is_symmetric(
        ax in -5.0..5.0f64, ay in -5.0..5.0f64,
        bx in -5.0..5.0f64, by in -5.0..5.0f64,
        cx in -5.0..5.0f64, cy in -5.0..5.0f64,
        dx in -5.0..5.0f64, dy in -5.0..5.0f64,
    ) {
        let a = Segment::new(Vec2::new(ax, ay), Vec2::new(bx, by));
        let b = Segment::new(Vec2::new(cx, cy), Vec2::new(dx, dy));
        let mut ab = intersect(&a, &b);
        let mut ba = intersect(&b, &a);
        prop_assert_eq!(ab.len(), ba.len());
        let key = |p: &Vec2| (p.x, p.y);
        ab.sort_by(|l, r| key(l).partial_cmp(&key(r)).unwrap());
        ba.sort_by(|l, r| key(l).partial_cmp(&key(r)).unwrap());
        for (p, q) in ab.iter().zip(ba.iter()) {
            prop_assert!((p - q).norm() < 1e-6);
        }
    }

    #[test]
    fn clip_halves_cover_the_square(x1 in 0.05..0.95f64, x2 in 0.05..0.95f64) {
        let sq = unit_square();
        let line = Segment::new(Vec2::new(x1, -10.0), Vec2::new(x2, 10.0));
        // keep the cut away from the corners
        for &v in sq.points() {
            prop_assume!(line.distance_to(v) > 1e-3);
        }
        let left: f64 = sq.clip_left(&line).iter().map(|p| p.area()).sum();
        let right: f64 = sq.clip_right(&line).iter().map(|p| p.area()).sum();
        prop_assert!((left + right - sq.area()).abs() < 1e-9);
    }

    #[test]
    fn clip_halves_cover_the_l_shape(y in 0.1..1.9f64) {
        let l = l_shape();
        let line = Segment::new(Vec2::new(-10.0, y), Vec2::new(10.0, y));
        for &v in l.points() {
            prop_assume!(line.distance_to(v) > 1e-3);
        }
        let below: f64 = l.clip_right(&line).iter().map(|p| p.area()).sum();
        let above: f64 = l.clip_left(&line).iter().map(|p| p.area()).sum();
        prop_assert!((below + above - l.area()).abs() < 1e-9);
    }
}
