//! Snowball sampling zone structure for conditional estimation.
//!
//! For a snowball-sampled network each node carries a wave (zone) index,
//! zone 0 being the seed set. Conditional estimation fixes all ties
//! involving the outermost wave, so the sampler only toggles arcs between
//! "inner" nodes (zone < max_zone) and must never delete the last tie
//! linking a node to the wave before it. This module keeps the inner node
//! list, the inner arc list, and the per-node previous-wave tie counts
//! consistent as arcs are inserted and removed.
//!
//! # References
//!
//! Pattison, P. E., Robins, G. L., Snijders, T. A. B., & Wang, P. (2013).
//! "Conditional estimation of exponential random graph models from
//! snowball sampling designs." Journal of Mathematical Psychology
//! 57(6):284-296.

use anyhow::anyhow;
use fnv::FnvHashMap;

use crate::graph::NodePair;

#[inline]
fn pair_key(i: u32, j: u32) -> u64 {
    ((i as u64) << 32) | j as u64
}

/// Zone indices and the side lists derived from them.
#[derive(Debug, Clone)]
pub struct SnowballZones {
    /// Zone (wave) index of each node
    pub zone: Vec<u32>,
    /// Highest zone index present
    pub max_zone: u32,
    /// Nodes with zone < max_zone, in node order
    pub inner_nodes: Vec<u32>,
    /// Arcs whose two endpoints are both inner nodes
    pub allinnerarcs: Vec<NodePair>,
    /// Position of each inner arc in `allinnerarcs`
    inner_pos: FnvHashMap<u64, u32>,
    /// For each node, number of ties (ignoring direction) to the
    /// immediately preceding zone. Counted per arc, so a reciprocated
    /// dyad contributes twice.
    pub prev_wave_degree: Vec<u32>,
}

impl SnowballZones {
    /// Build the static zone structure from per-node zone indices.
    ///
    /// Arc-dependent state (inner arcs, previous-wave degrees) is filled
    /// in by the graph when zones are attached.
    pub fn new(zone: Vec<u32>) -> anyhow::Result<Self> {
        let max_zone = *zone
            .iter()
            .max()
            .ok_or_else(|| anyhow!("empty zone file"))?;
        for z in 1..=max_zone {
            if !zone.contains(&z) {
                return Err(anyhow!(
                    "snowball zones must be contiguous: zone {} is empty but max zone is {}",
                    z,
                    max_zone
                ));
            }
        }
        let inner_nodes: Vec<u32> = (0..zone.len() as u32)
            .filter(|&v| zone[v as usize] < max_zone)
            .collect();
        let n = zone.len();
        Ok(SnowballZones {
            zone,
            max_zone,
            inner_nodes,
            allinnerarcs: Vec::new(),
            inner_pos: FnvHashMap::default(),
            prev_wave_degree: vec![0; n],
        })
    }

    #[inline]
    pub fn zone_of(&self, v: u32) -> u32 {
        self.zone[v as usize]
    }

    #[inline]
    pub fn is_inner(&self, v: u32) -> bool {
        self.zone[v as usize] < self.max_zone
    }

    pub fn num_inner_nodes(&self) -> usize {
        self.inner_nodes.len()
    }

    pub fn num_inner_arcs(&self) -> usize {
        self.allinnerarcs.len()
    }

    /// Number of candidate dyads between inner nodes: ordered pairs for a
    /// directed graph, unordered for an undirected one.
    pub fn num_inner_dyads(&self, is_directed: bool) -> f64 {
        let ni = self.inner_nodes.len() as f64;
        if is_directed {
            ni * (ni - 1.0)
        } else {
            ni * (ni - 1.0) / 2.0
        }
    }

    pub(crate) fn on_insert(&mut self, i: u32, j: u32) {
        let (zi, zj) = (self.zone[i as usize], self.zone[j as usize]);
        if zi + 1 == zj {
            self.prev_wave_degree[j as usize] += 1;
        } else if zj + 1 == zi {
            self.prev_wave_degree[i as usize] += 1;
        }
        if self.is_inner(i) && self.is_inner(j) {
            self.inner_pos
                .insert(pair_key(i, j), self.allinnerarcs.len() as u32);
            self.allinnerarcs.push((i, j));
        }
    }

    pub(crate) fn on_remove(&mut self, i: u32, j: u32) {
        let (zi, zj) = (self.zone[i as usize], self.zone[j as usize]);
        if zi + 1 == zj {
            self.prev_wave_degree[j as usize] -= 1;
        } else if zj + 1 == zi {
            self.prev_wave_degree[i as usize] -= 1;
        }
        if let Some(pos) = self.inner_pos.remove(&pair_key(i, j)) {
            let pos = pos as usize;
            self.allinnerarcs.swap_remove(pos);
            if pos < self.allinnerarcs.len() {
                let (mi, mj) = self.allinnerarcs[pos];
                self.inner_pos.insert(pair_key(mi, mj), pos as u32);
            }
        }
    }
}
