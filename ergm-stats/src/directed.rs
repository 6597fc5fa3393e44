//! Structural change statistics for directed graphs.
//!
//! Each function returns the change in its sufficient statistic for
//! adding arc i -> j, evaluated on a graph that does not contain the arc.
//! `lambda` is the decay parameter of the alternating statistics and must
//! be > 1 there; non-alternating statistics ignore it.

use ergm_graph::Graph;

#[inline]
fn rho(lambda: f64) -> f64 {
    1.0 - 1.0 / lambda
}

/// Arc (edge count).
pub fn change_arc(_g: &Graph, _i: u32, _j: u32) -> f64 {
    1.0
}

/// Reciprocity: number of mutual dyads.
pub fn change_reciprocity(g: &Graph, i: u32, j: u32) -> f64 {
    if i == j {
        return 0.0;
    }
    if g.is_arc(j, i) {
        1.0
    } else {
        0.0
    }
}

/// Sink: nodes with positive in-degree and zero out-degree.
pub fn change_sink(g: &Graph, i: u32, j: u32) -> f64 {
    if i == j {
        return 0.0;
    }
    let mut delta = 0.0;
    if g.outdegree(i) == 0 && g.indegree(i) > 0 {
        delta -= 1.0; // i stops being a sink
    }
    if g.indegree(j) == 0 && g.outdegree(j) == 0 {
        delta += 1.0; // j becomes one
    }
    delta
}

/// Source: nodes with positive out-degree and zero in-degree.
pub fn change_source(g: &Graph, i: u32, j: u32) -> f64 {
    if i == j {
        return 0.0;
    }
    let mut delta = 0.0;
    if g.outdegree(i) == 0 && g.indegree(i) == 0 {
        delta += 1.0;
    }
    if g.indegree(j) == 0 && g.outdegree(j) > 0 {
        delta -= 1.0;
    }
    delta
}

/// In-2-stars: sum over nodes of C(indegree, 2).
pub fn change_in_two_stars(g: &Graph, _i: u32, j: u32) -> f64 {
    g.indegree(j) as f64
}

/// Out-2-stars: sum over nodes of C(outdegree, 2).
pub fn change_out_two_stars(g: &Graph, i: u32, _j: u32) -> f64 {
    g.outdegree(i) as f64
}

/// Isolates: nodes with no arcs at all.
pub fn change_isolates(g: &Graph, i: u32, j: u32) -> f64 {
    let mut delta = 0.0;
    if g.degree(i) == 0 {
        delta -= 1.0;
    }
    if i != j && g.degree(j) == 0 {
        delta -= 1.0;
    }
    delta
}

/// Directed two-paths u -> k -> v with u != v.
pub fn change_two_path(g: &Graph, i: u32, j: u32) -> f64 {
    if i == j {
        return 0.0;
    }
    let recip = if g.is_arc(j, i) { 1.0 } else { 0.0 };
    g.indegree(i) as f64 + g.outdegree(j) as f64 - 2.0 * recip
}

/// Transitive triads x->y, y->z, x->z.
pub fn change_transitive_triad(g: &Graph, i: u32, j: u32) -> f64 {
    if i == j {
        return 0.0;
    }
    (g.mix_two_paths(i, j) + g.in_two_paths(i, j) + g.out_two_paths(i, j)) as f64
}

/// Cyclic triads x->y, y->z, z->x (each cycle counted once).
pub fn change_cyclic_triad(g: &Graph, i: u32, j: u32) -> f64 {
    if i == j {
        return 0.0;
    }
    g.mix_two_paths(j, i) as f64
}

/// Alternating k-in-stars (AinS).
pub fn change_alt_in_stars(g: &Graph, _i: u32, j: u32, lambda: f64) -> f64 {
    debug_assert!(lambda > 1.0);
    lambda * (1.0 - rho(lambda).powi(g.indegree(j) as i32))
}

/// Alternating k-out-stars (AoutS).
pub fn change_alt_out_stars(g: &Graph, i: u32, _j: u32, lambda: f64) -> f64 {
    debug_assert!(lambda > 1.0);
    lambda * (1.0 - rho(lambda).powi(g.outdegree(i) as i32))
}

/// Alternating transitive k-triangles (AT-T).
pub fn change_alt_k_triangles_t(g: &Graph, i: u32, j: u32, lambda: f64) -> f64 {
    debug_assert!(lambda > 1.0);
    let r = rho(lambda);
    if i == j {
        return 0.0;
    }
    let mut delta = 0.0;
    // i -> j as the first leg of a path i -> j -> v closing base arc i -> v
    for &v in g.out_neighbours(j) {
        if v != i && v != j && g.is_arc(i, v) {
            delta += r.powi(g.mix_two_paths(i, v) as i32);
        }
    }
    // i -> j as the second leg of a path u -> i -> j closing base arc u -> j
    for &u in g.in_neighbours(i) {
        if u != i && u != j && g.is_arc(u, j) {
            delta += r.powi(g.mix_two_paths(u, j) as i32);
        }
    }
    // i -> j as a new base arc over its existing two-paths
    delta += lambda * (1.0 - r.powi(g.mix_two_paths(i, j) as i32));
    delta
}

/// Alternating cyclic k-triangles (AT-C).
pub fn change_alt_k_triangles_c(g: &Graph, i: u32, j: u32, lambda: f64) -> f64 {
    debug_assert!(lambda > 1.0);
    let r = rho(lambda);
    if i == j {
        return 0.0;
    }
    let mut delta = 0.0;
    for &v in g.out_neighbours(j) {
        if v != i && v != j && g.is_arc(v, i) {
            delta += r.powi(g.mix_two_paths(i, v) as i32);
        }
    }
    for &u in g.in_neighbours(i) {
        if u != i && u != j && g.is_arc(j, u) {
            delta += r.powi(g.mix_two_paths(u, j) as i32);
        }
    }
    delta += lambda * (1.0 - r.powi(g.mix_two_paths(j, i) as i32));
    delta
}

/// Alternating "down" k-triangles (AT-D): bases closed by shared in-neighbours.
pub fn change_alt_k_triangles_d(g: &Graph, i: u32, j: u32, lambda: f64) -> f64 {
    debug_assert!(lambda > 1.0);
    let r = rho(lambda);
    if i == j {
        return 0.0;
    }
    let mut delta = 0.0;
    for &x in g.out_neighbours(i) {
        if x == i || x == j {
            continue;
        }
        // adding i -> j makes i a shared in-neighbour of j and x
        let pow = r.powi(g.in_two_paths(j, x) as i32);
        if g.is_arc(j, x) {
            delta += pow;
        }
        if g.is_arc(x, j) {
            delta += pow;
        }
    }
    delta += lambda * (1.0 - r.powi(g.in_two_paths(i, j) as i32));
    delta
}

/// Alternating "up" k-triangles (AT-U): bases closed by shared out-neighbours.
pub fn change_alt_k_triangles_u(g: &Graph, i: u32, j: u32, lambda: f64) -> f64 {
    debug_assert!(lambda > 1.0);
    let r = rho(lambda);
    if i == j {
        return 0.0;
    }
    let mut delta = 0.0;
    for &y in g.in_neighbours(j) {
        if y == i || y == j {
            continue;
        }
        // adding i -> j makes j a shared out-neighbour of i and y
        let pow = r.powi(g.out_two_paths(i, y) as i32);
        if g.is_arc(i, y) {
            delta += pow;
        }
        if g.is_arc(y, i) {
            delta += pow;
        }
    }
    delta += lambda * (1.0 - r.powi(g.out_two_paths(i, j) as i32));
    delta
}

/// Alternating mixed two-paths (A2P-T), over ordered node pairs.
pub fn change_alt_two_paths_t(g: &Graph, i: u32, j: u32, lambda: f64) -> f64 {
    debug_assert!(lambda > 1.0);
    let r = rho(lambda);
    if i == j {
        return 0.0;
    }
    let mut delta = 0.0;
    for &v in g.out_neighbours(j) {
        if v != i && v != j {
            delta += r.powi(g.mix_two_paths(i, v) as i32);
        }
    }
    for &u in g.in_neighbours(i) {
        if u != i && u != j {
            delta += r.powi(g.mix_two_paths(u, j) as i32);
        }
    }
    delta
}

/// Alternating shared-in-neighbour two-paths (A2P-D), over unordered pairs.
pub fn change_alt_two_paths_d(g: &Graph, i: u32, j: u32, lambda: f64) -> f64 {
    debug_assert!(lambda > 1.0);
    let r = rho(lambda);
    if i == j {
        return 0.0;
    }
    let mut delta = 0.0;
    for &x in g.out_neighbours(i) {
        if x != i && x != j {
            delta += r.powi(g.in_two_paths(j, x) as i32);
        }
    }
    delta
}

/// Alternating shared-out-neighbour two-paths (A2P-U), over unordered pairs.
pub fn change_alt_two_paths_u(g: &Graph, i: u32, j: u32, lambda: f64) -> f64 {
    debug_assert!(lambda > 1.0);
    let r = rho(lambda);
    if i == j {
        return 0.0;
    }
    let mut delta = 0.0;
    for &y in g.in_neighbours(j) {
        if y != i && y != j {
            delta += r.powi(g.out_two_paths(i, y) as i32);
        }
    }
    delta
}

/// Average of A2P-T and A2P-D (A2P-TD).
pub fn change_alt_two_paths_td(g: &Graph, i: u32, j: u32, lambda: f64) -> f64 {
    0.5 * (change_alt_two_paths_t(g, i, j, lambda) + change_alt_two_paths_d(g, i, j, lambda))
}
