//! Invariant checks for the incremental graph store: every two-path
//! counter must match a from-scratch recount after any toggle sequence,
//! the reverse arc list must stay the transpose of the forward list, and
//! an insert/remove round trip must restore all observable state.

use ergm_graph::Graph;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

fn brute_mix(g: &Graph, i: u32, j: u32) -> u32 {
    (0..g.num_nodes() as u32)
        .filter(|&k| g.is_arc(i, k) && g.is_arc(k, j))
        .count() as u32
}

fn brute_instar(g: &Graph, i: u32, j: u32) -> u32 {
    (0..g.num_nodes() as u32)
        .filter(|&k| g.is_arc(k, i) && g.is_arc(k, j))
        .count() as u32
}

fn brute_outstar(g: &Graph, i: u32, j: u32) -> u32 {
    (0..g.num_nodes() as u32)
        .filter(|&k| g.is_arc(i, k) && g.is_arc(j, k))
        .count() as u32
}

fn check_directed_tables(g: &Graph) {
    let n = g.num_nodes() as u32;
    for i in 0..n {
        for j in 0..n {
            assert_eq!(g.mix_two_paths(i, j), brute_mix(g, i, j), "mix ({}, {})", i, j);
            assert_eq!(g.in_two_paths(i, j), brute_instar(g, i, j), "in ({}, {})", i, j);
            assert_eq!(g.out_two_paths(i, j), brute_outstar(g, i, j), "out ({}, {})", i, j);
        }
    }
}

fn check_undirected_table(g: &Graph) {
    let n = g.num_nodes() as u32;
    for i in 0..n {
        for j in 0..n {
            let brute = (0..n)
                .filter(|&k| g.is_arc(i, k) && g.is_arc(k, j))
                .count() as u32;
            assert_eq!(g.two_paths(i, j), brute, "two-path ({}, {})", i, j);
        }
    }
}

fn check_transpose(g: &Graph) {
    let n = g.num_nodes() as u32;
    for i in 0..n {
        for &j in g.out_neighbours(i) {
            assert!(
                g.in_neighbours(j).contains(&i),
                "arc ({}, {}) missing from reverse list",
                i,
                j
            );
        }
        for &j in g.in_neighbours(i) {
            assert!(
                g.out_neighbours(j).contains(&i),
                "reverse entry ({}, {}) missing from forward list",
                j,
                i
            );
        }
    }
}

fn check_allarcs(g: &Graph) {
    assert_eq!(g.allarcs().len(), g.num_arcs());
    for &(i, j) in g.allarcs() {
        assert!(g.is_arc(i, j));
    }
}

/// Random insert/remove sequence with a full recount after every toggle.
#[test]
fn test_twopath_consistency_small() {
    let n = 20u32;
    let mut g = Graph::new(n as usize, true);
    let mut rng = SmallRng::seed_from_u64(4242);

    for _ in 0..2000 {
        let i = rng.random_range(0..n);
        let j = rng.random_range(0..n);
        if i == j {
            continue;
        }
        if g.is_arc(i, j) {
            g.remove_arc(i, j);
        } else {
            g.insert_arc(i, j);
        }
        check_directed_tables(&g);
        check_transpose(&g);
        check_allarcs(&g);
    }
}

/// Longer sequence on a larger graph with periodic recounts.
#[test]
fn test_twopath_consistency_large() {
    let n = 50u32;
    let mut g = Graph::new(n as usize, true);
    let mut rng = SmallRng::seed_from_u64(99);

    for t in 0..10_000usize {
        let i = rng.random_range(0..n);
        let j = rng.random_range(0..n);
        if i == j {
            continue;
        }
        if g.is_arc(i, j) {
            g.remove_arc(i, j);
        } else {
            g.insert_arc(i, j);
        }
        if t % 200 == 0 {
            check_directed_tables(&g);
            check_transpose(&g);
            check_allarcs(&g);
        }
    }
    check_directed_tables(&g);
    check_allarcs(&g);
}

#[test]
fn test_twopath_consistency_undirected() {
    let n = 20u32;
    let mut g = Graph::new(n as usize, false);
    let mut rng = SmallRng::seed_from_u64(7);

    for _ in 0..2000 {
        let i = rng.random_range(0..n);
        let j = rng.random_range(0..n);
        if i == j {
            continue;
        }
        if g.is_arc(i, j) {
            g.remove_arc(i, j);
        } else {
            g.insert_arc(i, j);
        }
        check_undirected_table(&g);
        check_allarcs(&g);
    }
}

fn snapshot(g: &Graph) -> (Vec<(u32, u32)>, Vec<Vec<u32>>, Vec<u32>, Vec<(u32, u32)>) {
    let n = g.num_nodes() as u32;
    let mut arcs: Vec<(u32, u32)> = g.allarcs().to_vec();
    arcs.sort_unstable();
    let tables: Vec<Vec<u32>> = (0..n)
        .map(|i| {
            (0..n)
                .flat_map(|j| {
                    vec![
                        g.mix_two_paths(i, j),
                        g.in_two_paths(i, j),
                        g.out_two_paths(i, j),
                    ]
                })
                .collect()
        })
        .collect();
    let pwd = g
        .zones
        .as_ref()
        .map(|z| z.prev_wave_degree.clone())
        .unwrap_or_default();
    let mut inner: Vec<(u32, u32)> = g
        .zones
        .as_ref()
        .map(|z| z.allinnerarcs.clone())
        .unwrap_or_default();
    inner.sort_unstable();
    (arcs, tables, pwd, inner)
}

/// insert_arc then remove_arc must restore the graph exactly, including
/// two-path tables and snowball side state.
#[test]
fn test_toggle_round_trip() {
    let n = 15u32;
    let mut g = Graph::new(n as usize, true);
    let mut rng = SmallRng::seed_from_u64(321);
    for _ in 0..40 {
        let i = rng.random_range(0..n);
        let j = rng.random_range(0..n);
        if i != j && !g.is_arc(i, j) {
            g.insert_arc(i, j);
        }
    }
    let zone: Vec<u32> = (0..n).map(|v| (v % 3) as u32).collect();
    g.set_zones(zone).unwrap();

    let before = snapshot(&g);
    for i in 0..n {
        for j in 0..n {
            if i == j || g.is_arc(i, j) {
                continue;
            }
            g.insert_arc(i, j);
            g.remove_arc(i, j);
            assert_eq!(snapshot(&g), before, "round trip of ({}, {})", i, j);
        }
    }
}

/// Zone side lists stay consistent across a random toggle sequence.
#[test]
fn test_snowball_side_lists_consistent() {
    let n = 24u32;
    let mut g = Graph::new(n as usize, true);
    let zone: Vec<u32> = (0..n).map(|v| (v / 8) as u32).collect(); // 3 waves
    g.set_zones(zone).unwrap();
    let mut rng = SmallRng::seed_from_u64(5150);

    for _ in 0..3000 {
        let i = rng.random_range(0..n);
        let j = rng.random_range(0..n);
        if i == j {
            continue;
        }
        if g.is_arc(i, j) {
            g.remove_arc(i, j);
        } else {
            g.insert_arc(i, j);
        }

        let zones = g.zones.as_ref().unwrap();
        // inner arc list holds exactly the arcs between inner nodes
        let expected: Vec<(u32, u32)> = g
            .allarcs()
            .iter()
            .copied()
            .filter(|&(a, b)| zones.is_inner(a) && zones.is_inner(b))
            .collect();
        let mut got = zones.allinnerarcs.clone();
        let mut want = expected;
        got.sort_unstable();
        want.sort_unstable();
        assert_eq!(got, want);

        // previous-wave degree counts arcs to the preceding zone
        for v in 0..n {
            let zv = zones.zone_of(v);
            let mut count = 0u32;
            for &(a, b) in g.allarcs() {
                if a == v && zv > 0 && zones.zone_of(b) == zv - 1 {
                    count += 1;
                }
                if b == v && zv > 0 && zones.zone_of(a) == zv - 1 {
                    count += 1;
                }
            }
            assert_eq!(zones.prev_wave_degree[v as usize], count, "node {}", v);
        }
    }
}
