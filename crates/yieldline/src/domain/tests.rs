use super::prune::segment_inside;
use super::*;
use crate::geom::{intersect, EdgeKind, Vec2, EPS};

fn square(kind: EdgeKind) -> Domain {
    let mut domain = Domain::new();
    domain.add_boundary_point(Vec2::new(0.0, 0.0), kind);
    domain.add_boundary_point(Vec2::new(1.0, 0.0), kind);
    domain.add_boundary_point(Vec2::new(1.0, 1.0), kind);
    domain.add_boundary_point(Vec2::new(0.0, 1.0), kind);
    domain
}

fn built_square(kind: EdgeKind, size: f64) -> Domain {
    let mut domain = square(kind);
    domain.discretize(size).unwrap();
    domain.build_edges();
    domain
}

#[test]
fn tesselation_places_equally_spaced_boundary_nodes() {
    let mut domain = square(EdgeKind::Fixed);
    domain.discretize(0.5).unwrap();
    // round(1 / 0.25) = 4 segments per unit side
    assert_eq!(domain.boundary_edge_count(), 16);
    assert!(domain.nodes().len() >= 16);
    for edge in domain.edges().iter().take(16) {
        assert!((edge.length - 0.25).abs() < EPS);
        assert_eq!(edge.kind, EdgeKind::Fixed);
        assert!(!edge.removable);
    }
}

#[test]
fn node_ids_are_dense_and_one_based() {
    let domain = built_square(EdgeKind::Fixed, 0.5);
    for (i, node) in domain.nodes().iter().enumerate() {
        assert_eq!(node.id, i + 1);
    }
}

#[test]
fn clockwise_outline_is_canonicalized_keeping_support_tags() {
    let mut domain = Domain::new();
    // clockwise input; the edge leaving (1,0) is the geometric bottom
    domain.add_boundary_point(Vec2::new(0.0, 0.0), EdgeKind::Free);
    domain.add_boundary_point(Vec2::new(0.0, 1.0), EdgeKind::Free);
    domain.add_boundary_point(Vec2::new(1.0, 1.0), EdgeKind::Free);
    domain.add_boundary_point(Vec2::new(1.0, 0.0), EdgeKind::Fixed);
    domain.discretize(0.5).unwrap();

    assert!(domain.polygon().area() > 0.0);
    let mut bottom = 0;
    for edge in domain.edges().iter().take(domain.boundary_edge_count()) {
        let (p1, p2) = edge.endpoints();
        if p1.y.abs() < EPS && p2.y.abs() < EPS {
            assert_eq!(edge.kind, EdgeKind::Fixed);
            bottom += 1;
        } else {
            assert_eq!(edge.kind, EdgeKind::Free);
        }
    }
    assert_eq!(bottom, 4);
}

#[test]
fn added_edges_have_unique_endpoint_pairs() {
    let domain = built_square(EdgeKind::Fixed, 0.5);
    let added: Vec<_> = domain.active_edges().filter(|e| e.added).collect();
    for (i, a) in added.iter().enumerate() {
        for b in added.iter().skip(i + 1) {
            let same = (a.n1 == b.n1 && a.n2 == b.n2) || (a.n1 == b.n2 && a.n2 == b.n1);
            assert!(!same, "duplicate edge {}-{}", a.n1, a.n2);
        }
    }
}

#[test]
fn surviving_colinear_edges_share_at_most_one_point() {
    let domain = built_square(EdgeKind::Fixed, 0.5);
    let active: Vec<_> = domain.active_edges().collect();
    for (i, a) in active.iter().enumerate() {
        for b in active.iter().skip(i + 1) {
            if (a.seg.slope() - b.seg.slope()).abs() < EPS && crate::geom::colinear(&a.seg, &b.seg)
            {
                assert!(
                    intersect(&a.seg, &b.seg).len() <= 1,
                    "overlap between {}-{} and {}-{}",
                    a.n1,
                    a.n2,
                    b.n1,
                    b.n2
                );
            }
        }
    }
}

#[test]
fn surviving_removable_edges_lie_inside_the_outline() {
    let domain = built_square(EdgeKind::Fixed, 0.5);
    for edge in domain.active_edges() {
        if edge.removable {
            assert!(segment_inside(domain.polygon(), &edge.seg));
        }
    }
}

#[test]
fn mesh_produces_interior_edges() {
    let domain = built_square(EdgeKind::Fixed, 0.25);
    assert!(domain.mesh_edge_count() > 0);
    assert!(domain.nodes().len() > 32);
}

#[test]
fn bottom_boundary_edge_tributary_is_its_column() {
    let domain = built_square(EdgeKind::Free, 0.5);
    let edge = domain
        .active_edges()
        .find(|e| {
            let (p1, p2) = e.endpoints();
            p1.y.abs() < EPS && p2.y.abs() < EPS && p1.x.abs() < EPS
        })
        .expect("first bottom boundary edge");
    let udl = edge.udl.expect("tributary cached");
    assert!((udl[0] - 0.125).abs() < 1e-6, "normal component {}", udl[0]);
    assert!(udl[1].abs() < 1e-6);
    assert!((udl[2] - 0.25).abs() < 1e-6);
}

#[test]
fn vertical_edge_tributary_is_zero() {
    let domain = built_square(EdgeKind::Free, 0.5);
    let edge = domain
        .active_edges()
        .find(|e| {
            let (p1, p2) = e.endpoints();
            (p1.x - p2.x).abs() < EPS
        })
        .expect("a vertical edge");
    assert_eq!(edge.udl, Some([0.0, 0.0, 0.0]));
}

#[test]
fn restrained_edge_tributary_keeps_only_normal_component() {
    let domain = built_square(EdgeKind::Fixed, 0.5);
    for edge in domain.active_edges() {
        if !edge.kind.unrestrained() {
            let udl = edge.udl.unwrap();
            assert_eq!(udl[1], 0.0);
            assert_eq!(udl[2], 0.0);
        }
    }
}

#[test]
fn tributary_areas_cover_a_free_square() {
    let domain = built_square(EdgeKind::Free, 0.5);
    let total: f64 = domain.active_edges().map(|e| e.udl.unwrap()[2]).sum();
    assert!((total - 1.0).abs() < 1e-6, "covered {total}");
}

#[test]
fn tributary_areas_cover_a_free_convex_pentagon() {
    let mut domain = Domain::new();
    for p in [
        Vec2::new(0.0, 0.0),
        Vec2::new(2.0, 0.0),
        Vec2::new(2.6, 1.2),
        Vec2::new(1.0, 2.0),
        Vec2::new(-0.6, 1.2),
    ] {
        domain.add_boundary_point(p, EdgeKind::Free);
    }
    domain.discretize(0.5).unwrap();
    domain.build_edges();
    let area = domain.polygon().area();
    let total: f64 = domain.active_edges().map(|e| e.udl.unwrap()[2]).sum();
    assert!((total - area).abs() < 1e-6 * area, "covered {total} of {area}");
}

#[test]
fn yield_moments_are_stored_and_resolved_at_discretisation() {
    let mut domain = square(EdgeKind::Fixed);
    domain.set_yield_moments(YieldMoments::new(2.0, 3.0, 2.0, 3.0));
    domain.discretize(0.5).unwrap();
    assert_eq!(domain.yield_moments().pos_x, 2.0);
    for edge in domain.edges() {
        assert!((edge.mp_pos - 2.0).abs() < EPS);
        assert!((edge.mp_neg - 3.0).abs() < EPS);
    }
}

#[test]
fn anisotropic_moments_resolve_onto_edge_direction() {
    let mut domain = square(EdgeKind::Fixed);
    domain.set_yield_moments(YieldMoments::new(4.0, 4.0, 2.0, 2.0));
    domain.discretize(0.5).unwrap();
    domain.build_edges();
    let horizontal = domain
        .active_edges()
        .find(|e| e.seg.dir().y.abs() < EPS)
        .unwrap();
    assert!((horizontal.mp_pos - 4.0).abs() < EPS);
    let vertical = domain
        .active_edges()
        .find(|e| e.seg.dir().x.abs() < EPS)
        .unwrap();
    assert!((vertical.mp_pos - 2.0).abs() < EPS);
}

#[test]
fn openings_and_supports_are_recorded() {
    let mut domain = square(EdgeKind::Fixed);
    domain.add_opening_point(0, Vec2::new(0.4, 0.4));
    domain.add_opening_point(0, Vec2::new(0.6, 0.4));
    domain.add_support(Vec2::new(0.2, 0.2), Vec2::new(0.8, 0.2), EdgeKind::KnifeAnchored);
    assert_eq!(domain.openings().len(), 1);
    assert_eq!(domain.openings()[0].num_points(), 2);
    assert_eq!(domain.supports().len(), 1);
    assert_eq!(domain.supports()[0].kind, EdgeKind::KnifeAnchored);
}

#[test]
fn domain_file_round_trip() {
    let mut domain = square(EdgeKind::SimpleAnchored);
    domain.set_yield_moments(YieldMoments::new(1.5, 2.5, 1.5, 2.5));

    let file = tempfile::NamedTempFile::new().unwrap();
    domain.save(file.path(), 0.5).unwrap();

    let loaded = Domain::load(file.path()).unwrap();
    assert_eq!(loaded.polygon().num_points(), 4);
    assert_eq!(loaded.yield_moments(), YieldMoments::new(1.5, 2.5, 1.5, 2.5));
    assert_eq!(loaded.live_load(), 1.0);
    assert_eq!(loaded.dead_load(), 0.0);
    // density 0.5 round-trips into the same tessellation
    assert_eq!(loaded.boundary_edge_count(), 16);
    for i in 0..4 {
        assert_eq!(loaded.polygon().kind(i), EdgeKind::SimpleAnchored);
    }
}

#[test]
fn malformed_domain_file_reports_parse_error() {
    let file = tempfile::NamedTempFile::new().unwrap();
    std::fs::write(file.path(), "2 0 0 zero").unwrap();
    match Domain::load(file.path()) {
        Err(crate::error::Error::Parse { .. }) => {}
        other => panic!("expected parse error, got {other:?}"),
    }
}
