//! Basic Metropolis sampler over arc toggles.
//!
//! Each proposal flips a fair coin between an add and a delete move,
//! draws a uniform candidate under the active regime, and accepts with
//! probability min(1, exp(theta . changestats)). Change statistics are
//! always computed on the graph without the candidate arc, so a delete
//! move removes the arc first and reinserts it unless the move is both
//! accepted and performed.

use anyhow::Result;
use ergm_graph::Graph;
use ergm_stats::{calc_change_stats, Term};
use log::warn;
use rand::rngs::SmallRng;
use rand::Rng;

use crate::propose::Regime;
use crate::sampler::ChangeAccum;

#[allow(clippy::too_many_arguments)]
pub fn basic_sampler(
    g: &mut Graph,
    terms: &[Term],
    theta: &[f64],
    accum: &mut ChangeAccum,
    sampler_m: usize,
    perform_move: bool,
    regime: Regime,
    rng: &mut SmallRng,
) -> Result<f64> {
    let n = terms.len();
    let mut changestats = vec![0.0; n];
    let mut accepted = 0usize;
    let mut forced_adds = 0usize;
    accum.reset();

    for _ in 0..sampler_m {
        let mut is_delete = rng.random::<bool>();
        let mut candidate = None;
        if is_delete {
            match regime.propose_delete(g, rng)? {
                Some(arc) => candidate = Some(arc),
                None => {
                    // nothing to delete: flip to an add move for this step
                    forced_adds += 1;
                    is_delete = false;
                }
            }
        }
        let (i, j) = match candidate {
            Some(arc) => arc,
            None => regime.propose_add(g, rng)?,
        };

        if is_delete {
            g.remove_arc(i, j);
        }
        let total = calc_change_stats(g, i, j, terms, theta, is_delete, &mut changestats);

        if rng.random::<f64>() < total.exp() {
            accepted += 1;
            if perform_move {
                if !is_delete {
                    g.insert_arc(i, j);
                }
            } else if is_delete {
                // not performing moves: undo the temporary removal
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

    if forced_adds > 0 {
        warn!(
            "basic sampler: {} delete proposals had no deletable arc, flipped to add",
            forced_adds
        );
    }
    Ok(accepted as f64 / sampler_m as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ergm_stats::{StructuralStat, Term, DEFAULT_LAMBDA};
    use rand::SeedableRng;

    fn arc_model() -> (Vec<Term>, Vec<f64>) {
        (
            vec![Term::structural(StructuralStat::Arc, DEFAULT_LAMBDA)],
            vec![0.0],
        )
    }

    /// Under zero theta every proposal is accepted with probability 1
    /// (exp(0) = 1), so the acceptance rate is exactly 1; with a strongly
    /// negative Arc parameter on an empty graph, adds are rarely accepted.
    #[test]
    fn test_acceptance_rates() {
        let regime = Regime::Plain {
            allow_loops: false,
            forbid_reciprocity: false,
        };
        let (terms, theta) = arc_model();
        let mut accum = ChangeAccum::new(1);

        let mut g = Graph::new(10, true);
        let mut rng = SmallRng::seed_from_u64(1);
        let rate = basic_sampler(
            &mut g, &terms, &theta, &mut accum, 2000, false, regime, &mut rng,
        )
        .unwrap();
        assert_eq!(rate, 1.0);
        assert_eq!(g.num_arcs(), 0); // perform_move = false leaves g alone

        let theta = vec![-8.0];
        let rate = basic_sampler(
            &mut g, &terms, &theta, &mut accum, 2000, true, regime, &mut rng,
        )
        .unwrap();
        assert!(rate < 0.05, "rate = {}", rate);
    }

    /// With perform_move the chain converges to the density implied by
    /// the Arc parameter: theta = 0 gives expected density 1/2.
    #[test]
    fn test_zero_theta_reaches_half_density() {
        let regime = Regime::Plain {
            allow_loops: false,
            forbid_reciprocity: false,
        };
        let (terms, theta) = arc_model();
        let mut accum = ChangeAccum::new(1);
        let mut g = Graph::new(12, true);
        let mut rng = SmallRng::seed_from_u64(99);
        let mut densities = Vec::new();
        for t in 0..40 {
            basic_sampler(
                &mut g, &terms, &theta, &mut accum, 1000, true, regime, &mut rng,
            )
            .unwrap();
            if t >= 20 {
                densities.push(g.density());
            }
        }
        let mean: f64 = densities.iter().sum::<f64>() / densities.len() as f64;
        assert!(
            (mean - 0.5).abs() < 0.05,
            "mean density = {} after long zero-theta run",
            mean
        );
    }

    /// Accumulated add sums count accepted adds for the Arc statistic.
    #[test]
    fn test_accumulators_track_accepted_moves() {
        let regime = Regime::Plain {
            allow_loops: false,
            forbid_reciprocity: false,
        };
        let (terms, theta) = arc_model();
        let mut accum = ChangeAccum::new(1);
        let mut g = Graph::new(8, true);
        let mut rng = SmallRng::seed_from_u64(3);
        basic_sampler(
            &mut g, &terms, &theta, &mut accum, 500, true, regime, &mut rng,
        )
        .unwrap();
        // every accepted add contributes +1, every accepted delete +1 in
        // the add direction; the net arc count is their difference
        assert_eq!(
            g.num_arcs() as f64,
            accum.add[0] - accum.del[0],
            "net arc count should equal add - del sums"
        );
    }

    /// forbidReciprocity never creates a mutual dyad.
    #[test]
    fn test_forbid_reciprocity_holds() {
        let regime = Regime::Plain {
            allow_loops: false,
            forbid_reciprocity: true,
        };
        let (terms, theta) = arc_model();
        let mut accum = ChangeAccum::new(1);
        let mut g = Graph::new(10, true);
        let mut rng = SmallRng::seed_from_u64(4);
        basic_sampler(
            &mut g, &terms, &theta, &mut accum, 5000, true, regime, &mut rng,
        )
        .unwrap();
        for &(i, j) in g.allarcs() {
            assert!(!g.is_arc(j, i), "reciprocated dyad ({}, {})", i, j);
        }
    }
}
