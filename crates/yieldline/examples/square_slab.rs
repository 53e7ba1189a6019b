//! Collapse analysis of a clamped unit square slab under uniform load.
//!
//! Run with: cargo run -p yieldline --example square_slab --release

use yieldline::prelude::*;

fn main() {
    let mut domain = Domain::new();
    domain.add_boundary_point(Vec2::new(0.0, 0.0), EdgeKind::Fixed);
    domain.add_boundary_point(Vec2::new(1.0, 0.0), EdgeKind::Fixed);
    domain.add_boundary_point(Vec2::new(1.0, 1.0), EdgeKind::Fixed);
    domain.add_boundary_point(Vec2::new(0.0, 1.0), EdgeKind::Fixed);

    domain.set_yield_moments(YieldMoments::isotropic(1.0));
    domain.discretize(0.25).expect("discretize");
    domain.build_edges();
    domain.set_loads(1.0, 0.0);

    let mut backend = InteriorPoint::default();
    let result = solve(&mut domain, &mut backend).expect("collapse solve");

    println!("lambda = {:.4} after {} solves", result.lambda, result.solves);
    println!("{} yield lines:", result.yield_lines.len());
    for line in &result.yield_lines {
        let [phi_n, _, _, plastic, x1, y1, x2, y2] = line.to_row();
        println!(
            "  ({x1:6.3},{y1:6.3}) -> ({x2:6.3},{y2:6.3})  phi_n {phi_n:9.5}  p {plastic:9.5}"
        );
    }
}
