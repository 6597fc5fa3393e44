//! Proposal generation under the constraint regimes.
//!
//! A regime is a closed enum with one add-candidate and one
//! delete-candidate operation, so samplers never branch on option flags
//! in the hot loop. Rejection is by resampling; on sparse graphs the
//! expected number of attempts is O(1). The retry loops are bounded so a
//! dense or fully-constrained graph produces an error instead of a hang.

use anyhow::{anyhow, Result};
use ergm_graph::Graph;
use rand::rngs::SmallRng;
use rand::Rng;

/// Bound on rejection-resampling attempts per proposal.
pub const MAX_PROPOSAL_ATTEMPTS: usize = 100_000;

/// The active constraint regime (at most one conditional kind at a time).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Regime {
    /// Unconstrained toggles over all dyads
    Plain {
        allow_loops: bool,
        forbid_reciprocity: bool,
    },
    /// Snowball-conditional: only ties between inner-wave nodes move
    Snowball,
    /// Citation-conditional: only arcs sent from max-term nodes move
    Citation,
}

impl Regime {
    /// Pick a uniform random candidate arc to add.
    pub fn propose_add(&self, g: &Graph, rng: &mut SmallRng) -> Result<(u32, u32)> {
        let n = g.num_nodes() as u32;
        match *self {
            Regime::Plain {
                allow_loops,
                forbid_reciprocity,
            } => {
                for _ in 0..MAX_PROPOSAL_ATTEMPTS {
                    let (i, j) = match g.mode_a_size() {
                        Some(na) => (
                            rng.random_range(0..na as u32),
                            rng.random_range(na as u32..n),
                        ),
                        None => (rng.random_range(0..n), rng.random_range(0..n)),
                    };
                    if !allow_loops && i == j {
                        continue;
                    }
                    if g.is_arc(i, j) {
                        continue;
                    }
                    if forbid_reciprocity && g.is_arc(j, i) {
                        continue;
                    }
                    return Ok((i, j));
                }
                Err(anyhow!(
                    "no addable dyad found in {} attempts (graph too dense?)",
                    MAX_PROPOSAL_ATTEMPTS
                ))
            }
            Regime::Snowball => {
                let zones = g.zones.as_ref().expect("snowball regime without zones");
                let ni = zones.num_inner_nodes() as u32;
                for _ in 0..MAX_PROPOSAL_ATTEMPTS {
                    let i = zones.inner_nodes[rng.random_range(0..ni) as usize];
                    let j = zones.inner_nodes[rng.random_range(0..ni) as usize];
                    if i == j {
                        continue;
                    }
                    // ties may not skip over a wave
                    if zones.zone_of(i).abs_diff(zones.zone_of(j)) > 1 {
                        continue;
                    }
                    if g.is_arc(i, j) {
                        continue;
                    }
                    return Ok((i, j));
                }
                Err(anyhow!(
                    "no addable inner dyad found in {} attempts",
                    MAX_PROPOSAL_ATTEMPTS
                ))
            }
            Regime::Citation => {
                let terms = g.terms.as_ref().expect("citation regime without terms");
                let nm = terms.num_maxterm_nodes() as u32;
                for _ in 0..MAX_PROPOSAL_ATTEMPTS {
                    let i = terms.maxterm_nodes[rng.random_range(0..nm) as usize];
                    let j = rng.random_range(0..n);
                    if i == j {
                        continue;
                    }
                    if g.is_arc(i, j) {
                        continue;
                    }
                    return Ok((i, j));
                }
                Err(anyhow!(
                    "no addable max-term dyad found in {} attempts",
                    MAX_PROPOSAL_ATTEMPTS
                ))
            }
        }
    }

    /// Pick a uniform random deletable arc, or `None` when no arc of the
    /// regime's kind exists (the sampler then flips to an add move).
    pub fn propose_delete(&self, g: &Graph, rng: &mut SmallRng) -> Result<Option<(u32, u32)>> {
        match *self {
            Regime::Plain { .. } => {
                if g.num_arcs() == 0 {
                    return Ok(None);
                }
                Ok(Some(g.arc_at(rng.random_range(0..g.num_arcs()))))
            }
            Regime::Snowball => {
                let zones = g.zones.as_ref().expect("snowball regime without zones");
                if zones.num_inner_arcs() == 0 {
                    return Ok(None);
                }
                for _ in 0..MAX_PROPOSAL_ATTEMPTS {
                    let (i, j) =
                        zones.allinnerarcs[rng.random_range(0..zones.num_inner_arcs())];
                    let (zi, zj) = (zones.zone_of(i), zones.zone_of(j));
                    // never delete the last tie linking a node to the
                    // wave before it
                    if zi > zj && zones.prev_wave_degree[i as usize] == 1 {
                        continue;
                    }
                    if zj > zi && zones.prev_wave_degree[j as usize] == 1 {
                        continue;
                    }
                    return Ok(Some((i, j)));
                }
                Err(anyhow!(
                    "no deletable inner arc found in {} attempts",
                    MAX_PROPOSAL_ATTEMPTS
                ))
            }
            Regime::Citation => {
                let terms = g.terms.as_ref().expect("citation regime without terms");
                if terms.num_maxtermsender_arcs() == 0 {
                    return Ok(None);
                }
                Ok(Some(
                    terms.all_maxtermsender_arcs
                        [rng.random_range(0..terms.num_maxtermsender_arcs())],
                ))
            }
        }
    }

    /// Number of candidate dyads L under this regime (used by the IFD
    /// arc-parameter correction).
    pub fn num_candidate_dyads(&self, g: &Graph) -> f64 {
        match *self {
            Regime::Plain {
                allow_loops,
                forbid_reciprocity,
            } => {
                let n = g.num_nodes() as f64;
                let mut dyads = g.num_dyads(allow_loops);
                if forbid_reciprocity && g.is_directed() {
                    if allow_loops {
                        dyads -= n * (n - 1.0) / 2.0;
                    } else {
                        dyads /= 2.0;
                    }
                }
                dyads
            }
            Regime::Snowball => {
                let zones = g.zones.as_ref().expect("snowball regime without zones");
                zones.num_inner_dyads(g.is_directed())
            }
            Regime::Citation => {
                let terms = g.terms.as_ref().expect("citation regime without terms");
                terms.num_maxterm_nodes() as f64 * (g.num_nodes() as f64 - 1.0) / 2.0
            }
        }
    }

    /// Current arc count of the kind this regime toggles.
    pub fn num_toggleable_arcs(&self, g: &Graph) -> usize {
        match *self {
            Regime::Plain { .. } => g.num_arcs(),
            Regime::Snowball => g.zones.as_ref().map(|z| z.num_inner_arcs()).unwrap_or(0),
            Regime::Citation => g
                .terms
                .as_ref()
                .map(|t| t.num_maxtermsender_arcs())
                .unwrap_or(0),
        }
    }
}

/// Value subtracted from the IFD auxiliary parameter to report the
/// effective Arc (density) parameter: log((L - m) / (m + 1)).
pub fn arc_correction(g: &Graph, regime: Regime) -> f64 {
    let dyads = regime.num_candidate_dyads(g);
    let m = regime.num_toggleable_arcs(g) as f64;
    ((dyads - m) / (m + 1.0)).ln()
}
