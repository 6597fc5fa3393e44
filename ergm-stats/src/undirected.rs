//! Structural change statistics for undirected graphs.
//!
//! Each function returns the change for adding edge i - j, evaluated on a
//! graph that does not contain the edge.

use ergm_graph::Graph;

#[inline]
fn rho(lambda: f64) -> f64 {
    1.0 - 1.0 / lambda
}

/// Edge count.
pub fn change_edge(_g: &Graph, _i: u32, _j: u32) -> f64 {
    1.0
}

/// 2-stars: sum over nodes of C(degree, 2).
pub fn change_two_stars(g: &Graph, i: u32, j: u32) -> f64 {
    (g.degree(i) + g.degree(j)) as f64
}

/// Alternating k-stars (AS).
pub fn change_alt_stars(g: &Graph, i: u32, j: u32, lambda: f64) -> f64 {
    debug_assert!(lambda > 1.0);
    let r = rho(lambda);
    lambda * (2.0 - r.powi(g.degree(i) as i32) - r.powi(g.degree(j) as i32))
}

/// Alternating two-paths (A2P), over unordered node pairs.
pub fn change_alt_two_paths(g: &Graph, i: u32, j: u32, lambda: f64) -> f64 {
    debug_assert!(lambda > 1.0);
    let r = rho(lambda);
    if i == j {
        return 0.0;
    }
    let mut delta = 0.0;
    for &v in g.out_neighbours(j) {
        if v != i && v != j {
            delta += r.powi(g.two_paths(i, v) as i32);
        }
    }
    for &v in g.out_neighbours(i) {
        if v != i && v != j {
            delta += r.powi(g.two_paths(j, v) as i32);
        }
    }
    delta
}

/// Alternating k-triangles (AT).
pub fn change_alt_k_triangles(g: &Graph, i: u32, j: u32, lambda: f64) -> f64 {
    debug_assert!(lambda > 1.0);
    let r = rho(lambda);
    if i == j {
        return 0.0;
    }
    // iterate the sparser endpoint's neighbour list
    let (i, j) = if g.degree(i) < g.degree(j) {
        (j, i)
    } else {
        (i, j)
    };
    let mut delta = 0.0;
    for &v in g.out_neighbours(j) {
        if v == i || v == j {
            continue;
        }
        if g.is_arc(i, v) {
            delta += r.powi(g.two_paths(i, v) as i32) + r.powi(g.two_paths(v, j) as i32);
        }
    }
    delta += lambda * (1.0 - r.powi(g.two_paths(i, j) as i32));
    delta
}
