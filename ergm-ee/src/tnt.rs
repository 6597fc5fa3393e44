//! Tie / no-tie (TNT) sampler.
//!
//! Half the proposals toggle a uniform random dyad, the other half
//! delete a uniform random existing arc, which mixes far better than
//! plain dyad toggles on sparse graphs. Because the proposal is not
//! symmetric, the Metropolis-Hastings acceptance carries the proposal
//! ratio correction. Plain unconstrained regime only.

use anyhow::Result;
use ergm_graph::Graph;
use ergm_stats::{calc_change_stats, Term};
use rand::rngs::SmallRng;
use rand::Rng;

use crate::sampler::ChangeAccum;

fn pick_dyad(g: &Graph, rng: &mut SmallRng) -> (u32, u32) {
    let n = g.num_nodes() as u32;
    loop {
        let (i, j) = match g.mode_a_size() {
            Some(na) => (
                rng.random_range(0..na as u32),
                rng.random_range(na as u32..n),
            ),
            None => (rng.random_range(0..n), rng.random_range(0..n)),
        };
        if i != j {
            return (i, j);
        }
    }
}

#[allow(clippy::too_many_arguments)]
pub fn tnt_sampler(
    g: &mut Graph,
    terms: &[Term],
    theta: &[f64],
    accum: &mut ChangeAccum,
    sampler_m: usize,
    perform_move: bool,
    rng: &mut SmallRng,
) -> Result<f64> {
    let n = terms.len();
    let num_dyads = g.num_dyads(false);
    let mut changestats = vec![0.0; n];
    let mut accepted = 0usize;
    accum.reset();

    for _ in 0..sampler_m {
        let m = g.num_arcs();
        let edge_pick = rng.random::<bool>() && m > 0;
        let (i, j, is_delete) = if edge_pick {
            let (i, j) = g.arc_at(rng.random_range(0..m));
            (i, j, true)
        } else {
            let (i, j) = pick_dyad(g, rng);
            let present = g.is_arc(i, j);
            (i, j, present)
        };

        // proposal-ratio correction: a delete can be reached through both
        // the dyad and the edge pick, an add only through the dyad pick
        let log_ratio = if is_delete {
            (1.0 / num_dyads).ln() - (1.0 / num_dyads + 1.0 / m as f64).ln()
        } else {
            (1.0 / num_dyads + 1.0 / (m as f64 + 1.0)).ln() - (1.0 / num_dyads).ln()
        };

        if is_delete {
            g.remove_arc(i, j);
        }
        let total = calc_change_stats(g, i, j, terms, theta, is_delete, &mut changestats);

        if rng.random::<f64>() < (total + log_ratio).exp() {
            accepted += 1;
            if perform_move {
                if !is_delete {
                    g.insert_arc(i, j);
                }
            } else if is_delete {
                g.insert_arc(i, j);
            }
            let sums = if is_delete {
                &mut accum.del
            } else {
                &mut accum.add
            };
            for l in 0..n {
                sums[l] += changestats[l];
            }
        } else if is_delete {
            g.insert_arc(i, j);
        }
    }

    Ok(accepted as f64 / sampler_m as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ergm_stats::{StructuralStat, Term, DEFAULT_LAMBDA};
    use rand::SeedableRng;

    /// The TNT chain with a pure Arc model is a Bernoulli graph: theta
    /// fixes the expected density at exp(theta) / (1 + exp(theta)).
    #[test]
    fn test_density_matches_arc_parameter() {
        let terms = vec![Term::structural(StructuralStat::Arc, DEFAULT_LAMBDA)];
        let theta = vec![-1.0];
        let target = (-1.0f64).exp() / (1.0 + (-1.0f64).exp());
        let mut g = Graph::new(14, true);
        let mut accum = ChangeAccum::new(1);
        let mut rng = SmallRng::seed_from_u64(10);
        let mut densities = Vec::new();
        for t in 0..60 {
            tnt_sampler(&mut g, &terms, &theta, &mut accum, 1000, true, &mut rng).unwrap();
            if t >= 20 {
                densities.push(g.density());
            }
        }
        let mean: f64 = densities.iter().sum::<f64>() / densities.len() as f64;
        assert!(
            (mean - target).abs() < 0.05,
            "mean density = {}, target = {}",
            mean,
            target
        );
    }

    /// perform_move = false restores the graph exactly.
    #[test]
    fn test_no_move_leaves_graph_unchanged() {
        let terms = vec![Term::structural(StructuralStat::Arc, DEFAULT_LAMBDA)];
        let theta = vec![0.5];
        let mut g = Graph::new(10, true);
        g.insert_arc(0, 1);
        g.insert_arc(2, 3);
        let arcs_before: Vec<_> = g.allarcs().to_vec();
        let mut accum = ChangeAccum::new(1);
        let mut rng = SmallRng::seed_from_u64(11);
        tnt_sampler(&mut g, &terms, &theta, &mut accum, 500, false, &mut rng).unwrap();
        let mut before = arcs_before;
        let mut after: Vec<_> = g.allarcs().to_vec();
        before.sort_unstable();
        after.sort_unstable();
        assert_eq!(before, after);
    }
}
