//! The graph itself: arc lists, flat arc index, incremental updates.
//!
//! Directed graphs keep a forward and a reverse arc list so both in- and
//! out-neighbours can be iterated without scanning; undirected graphs keep
//! a single neighbour list per node. A flat `allarcs` vector (with an
//! O(1) position index) supports uniform random arc picks and
//! swap-with-last removal. Two-path count tables are updated by localized
//! deltas on every insert/remove, as are the snowball and citation side
//! structures when present, so a single toggle is O(degree) worst case and
//! O(1) expected on sparse graphs.

use anyhow::{anyhow, Result};
use fnv::FnvHashMap;

use crate::attrs::Attributes;
use crate::citation::CitationTerms;
use crate::snowball::SnowballZones;
use crate::twopath::TwoPathTable;

/// An arc (i, j): directed i -> j, or an undirected edge stored once.
pub type NodePair = (u32, u32);

#[derive(Debug, Clone)]
enum TwoPaths {
    Directed {
        /// mix[i, j] = |{k : i->k and k->j}|
        mix: TwoPathTable,
        /// instar[i, j] = |{k : k->i and k->j}|
        instar: TwoPathTable,
        /// outstar[i, j] = |{k : i->k and j->k}|
        outstar: TwoPathTable,
    },
    Undirected {
        /// paths[i, j] = |{k : i-k and k-j}|
        paths: TwoPathTable,
    },
}

/// A labelled graph over nodes 0..n with a mutable arc set.
#[derive(Debug, Clone)]
pub struct Graph {
    num_nodes: usize,
    is_directed: bool,
    /// For a two-mode graph, the number of mode-A nodes (0..na); mode-B
    /// nodes are na..n. One-mode graphs have `None`.
    mode_a_size: Option<usize>,
    /// Out-neighbours of each node (all neighbours if undirected)
    arclist: Vec<Vec<u32>>,
    /// In-neighbours of each node (unused if undirected)
    revarclist: Vec<Vec<u32>>,
    /// Every arc, in insertion order modulo swap-with-last removal
    allarcs: Vec<NodePair>,
    /// Position of each arc in `allarcs`
    arc_pos: FnvHashMap<u64, u32>,
    twopaths: TwoPaths,
    pub attrs: Attributes,
    pub zones: Option<SnowballZones>,
    pub terms: Option<CitationTerms>,
}

impl Graph {
    pub fn new(num_nodes: usize, is_directed: bool) -> Self {
        let twopaths = if is_directed {
            TwoPaths::Directed {
                mix: TwoPathTable::new(num_nodes),
                instar: TwoPathTable::new(num_nodes),
                outstar: TwoPathTable::new(num_nodes),
            }
        } else {
            TwoPaths::Undirected {
                paths: TwoPathTable::new(num_nodes),
            }
        };
        Graph {
            num_nodes,
            is_directed,
            mode_a_size: None,
            arclist: vec![Vec::new(); num_nodes],
            revarclist: if is_directed {
                vec![Vec::new(); num_nodes]
            } else {
                Vec::new()
            },
            allarcs: Vec::new(),
            arc_pos: FnvHashMap::default(),
            twopaths,
            attrs: Attributes::default(),
            zones: None,
            terms: None,
        }
    }

    /// Two-mode (bipartite) graph: undirected, edges only between modes.
    pub fn new_bipartite(num_mode_a: usize, num_mode_b: usize) -> Self {
        let mut g = Graph::new(num_mode_a + num_mode_b, false);
        g.mode_a_size = Some(num_mode_a);
        g
    }

    #[inline]
    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    #[inline]
    pub fn num_arcs(&self) -> usize {
        self.allarcs.len()
    }

    #[inline]
    pub fn is_directed(&self) -> bool {
        self.is_directed
    }

    #[inline]
    pub fn is_bipartite(&self) -> bool {
        self.mode_a_size.is_some()
    }

    #[inline]
    pub fn mode_a_size(&self) -> Option<usize> {
        self.mode_a_size
    }

    #[inline]
    fn arc_key(&self, i: u32, j: u32) -> u64 {
        let (a, b) = if self.is_directed || i <= j { (i, j) } else { (j, i) };
        ((a as u64) << 32) | b as u64
    }

    /// Is arc i -> j (or edge i - j) present?
    #[inline]
    pub fn is_arc(&self, i: u32, j: u32) -> bool {
        self.arc_pos.contains_key(&self.arc_key(i, j))
    }

    /// Out-neighbours of i (all neighbours if undirected).
    #[inline]
    pub fn out_neighbours(&self, i: u32) -> &[u32] {
        &self.arclist[i as usize]
    }

    /// In-neighbours of i (all neighbours if undirected).
    #[inline]
    pub fn in_neighbours(&self, i: u32) -> &[u32] {
        if self.is_directed {
            &self.revarclist[i as usize]
        } else {
            &self.arclist[i as usize]
        }
    }

    #[inline]
    pub fn outdegree(&self, i: u32) -> usize {
        self.arclist[i as usize].len()
    }

    #[inline]
    pub fn indegree(&self, i: u32) -> usize {
        if self.is_directed {
            self.revarclist[i as usize].len()
        } else {
            self.arclist[i as usize].len()
        }
    }

    /// Degree of i ignoring arc direction.
    #[inline]
    pub fn degree(&self, i: u32) -> usize {
        if self.is_directed {
            self.outdegree(i) + self.indegree(i)
        } else {
            self.arclist[i as usize].len()
        }
    }

    pub fn allarcs(&self) -> &[NodePair] {
        &self.allarcs
    }

    #[inline]
    pub fn arc_at(&self, idx: usize) -> NodePair {
        self.allarcs[idx]
    }

    /// mix[i, j] = |{k : i->k and k->j}| (directed graphs only).
    #[inline]
    pub fn mix_two_paths(&self, i: u32, j: u32) -> u32 {
        match &self.twopaths {
            TwoPaths::Directed { mix, .. } => mix.get(i, j),
            TwoPaths::Undirected { .. } => panic!("mix_two_paths on undirected graph"),
        }
    }

    /// instar[i, j] = |{k : k->i and k->j}| (directed graphs only).
    #[inline]
    pub fn in_two_paths(&self, i: u32, j: u32) -> u32 {
        match &self.twopaths {
            TwoPaths::Directed { instar, .. } => instar.get(i, j),
            TwoPaths::Undirected { .. } => panic!("in_two_paths on undirected graph"),
        }
    }

    /// outstar[i, j] = |{k : i->k and j->k}| (directed graphs only).
    #[inline]
    pub fn out_two_paths(&self, i: u32, j: u32) -> u32 {
        match &self.twopaths {
            TwoPaths::Directed { outstar, .. } => outstar.get(i, j),
            TwoPaths::Undirected { .. } => panic!("out_two_paths on undirected graph"),
        }
    }

    /// paths[i, j] = |{k : i-k and k-j}| (undirected graphs only).
    #[inline]
    pub fn two_paths(&self, i: u32, j: u32) -> u32 {
        match &self.twopaths {
            TwoPaths::Undirected { paths } => paths.get(i, j),
            TwoPaths::Directed { .. } => panic!("two_paths on directed graph"),
        }
    }

    /// Insert arc i -> j (or edge i - j). The arc must be absent.
    pub fn insert_arc(&mut self, i: u32, j: u32) {
        debug_assert!((i as usize) < self.num_nodes && (j as usize) < self.num_nodes);
        debug_assert!(!self.is_arc(i, j));
        debug_assert!(self.is_directed || i != j);

        // two-path deltas are computed while the arc lists still exclude
        // (i, j), so the new arc never counts itself as a two-path leg
        self.update_two_paths(i, j, 1);

        self.arclist[i as usize].push(j);
        if self.is_directed {
            self.revarclist[j as usize].push(i);
        } else {
            self.arclist[j as usize].push(i);
        }
        let key = self.arc_key(i, j);
        self.arc_pos.insert(key, self.allarcs.len() as u32);
        self.allarcs.push((i, j));

        if let Some(zones) = self.zones.as_mut() {
            zones.on_insert(i, j);
        }
        if let Some(terms) = self.terms.as_mut() {
            terms.on_insert(i, j);
        }
    }

    /// Remove arc i -> j (or edge i - j). The arc must be present.
    pub fn remove_arc(&mut self, i: u32, j: u32) {
        let key = self.arc_key(i, j);
        let pos = self
            .arc_pos
            .remove(&key)
            .expect("remove_arc of absent arc") as usize;
        // the stored endpoint order may be the canonical (swapped) one
        let (i, j) = self.allarcs[pos];
        self.allarcs.swap_remove(pos);
        if pos < self.allarcs.len() {
            let moved = self.allarcs[pos];
            let moved_key = self.arc_key(moved.0, moved.1);
            self.arc_pos.insert(moved_key, pos as u32);
        }

        swap_remove_value(&mut self.arclist[i as usize], j);
        if self.is_directed {
            swap_remove_value(&mut self.revarclist[j as usize], i);
        } else {
            swap_remove_value(&mut self.arclist[j as usize], i);
        }

        self.update_two_paths(i, j, -1);

        if let Some(zones) = self.zones.as_mut() {
            zones.on_remove(i, j);
        }
        if let Some(terms) = self.terms.as_mut() {
            terms.on_remove(i, j);
        }
    }

    /// Localized two-path delta for toggling (i, j).
    ///
    /// Must be called while the arc lists exclude (i, j): before insertion
    /// on an add, after removal on a delete.
    fn update_two_paths(&mut self, i: u32, j: u32, delta: i32) {
        match &mut self.twopaths {
            TwoPaths::Directed {
                mix,
                instar,
                outstar,
            } => {
                for &v in &self.arclist[j as usize] {
                    mix.add(i, v, delta); // i -> j -> v
                }
                for &u in &self.revarclist[i as usize] {
                    mix.add(u, j, delta); // u -> i -> j
                }
                if i == j {
                    mix.add(i, j, delta); // a self-loop is its own two-path
                }
                for &v in &self.arclist[i as usize] {
                    instar.add(j, v, delta); // i -> j and i -> v
                    instar.add(v, j, delta);
                }
                instar.add(j, j, delta);
                for &u in &self.revarclist[j as usize] {
                    outstar.add(i, u, delta); // i -> j and u -> j
                    outstar.add(u, i, delta);
                }
                outstar.add(i, i, delta);
            }
            TwoPaths::Undirected { paths } => {
                for &v in &self.arclist[j as usize] {
                    paths.add(i, v, delta); // i - j - v
                    paths.add(v, i, delta);
                }
                for &u in &self.arclist[i as usize] {
                    paths.add(u, j, delta); // u - i - j
                    paths.add(j, u, delta);
                }
                paths.add(i, i, delta);
                paths.add(j, j, delta);
            }
        }
    }

    /// Number of candidate dyads: ordered pairs for directed graphs,
    /// unordered for undirected, mode-A x mode-B for two-mode graphs.
    pub fn num_dyads(&self, allow_loops: bool) -> f64 {
        let n = self.num_nodes as f64;
        if let Some(na) = self.mode_a_size {
            let nb = self.num_nodes - na;
            return na as f64 * nb as f64;
        }
        if self.is_directed {
            if allow_loops {
                n * n
            } else {
                n * (n - 1.0)
            }
        } else if allow_loops {
            n * (n - 1.0) / 2.0 + n
        } else {
            n * (n - 1.0) / 2.0
        }
    }

    pub fn density(&self) -> f64 {
        self.num_arcs() as f64 / self.num_dyads(false)
    }

    /// An arcless graph with the same nodes, directedness, modes and
    /// attributes (zone and term structures are not carried over).
    pub fn empty_like(&self) -> Graph {
        let mut g = match self.mode_a_size {
            Some(na) => Graph::new_bipartite(na, self.num_nodes - na),
            None => Graph::new(self.num_nodes, self.is_directed),
        };
        g.attrs = self.attrs.clone();
        g
    }

    /// Attach snowball zones (one per node) and build the zone side lists
    /// from the arcs already present.
    pub fn set_zones(&mut self, zone: Vec<u32>) -> Result<()> {
        if zone.len() != self.num_nodes {
            return Err(anyhow!(
                "zone file has {} entries but graph has {} nodes",
                zone.len(),
                self.num_nodes
            ));
        }
        let mut zones = SnowballZones::new(zone)?;
        for &(i, j) in &self.allarcs {
            zones.on_insert(i, j);
        }
        self.zones = Some(zones);
        Ok(())
    }

    /// Attach citation terms (one per node) and build the max-term-sender
    /// arc list from the arcs already present.
    pub fn set_terms(&mut self, term: Vec<u32>) -> Result<()> {
        if term.len() != self.num_nodes {
            return Err(anyhow!(
                "term file has {} entries but graph has {} nodes",
                term.len(),
                self.num_nodes
            ));
        }
        if !self.is_directed {
            return Err(anyhow!("citation terms require a directed graph"));
        }
        let mut terms = CitationTerms::new(term)?;
        for &(i, j) in &self.allarcs {
            terms.on_insert(i, j);
        }
        self.terms = Some(terms);
        Ok(())
    }
}

fn swap_remove_value(list: &mut Vec<u32>, value: u32) {
    let pos = list
        .iter()
        .position(|&x| x == value)
        .expect("neighbour list out of sync with arc set");
    list.swap_remove(pos);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_remove_directed() {
        let mut g = Graph::new(4, true);
        g.insert_arc(0, 1);
        g.insert_arc(1, 2);
        g.insert_arc(2, 0);
        assert_eq!(g.num_arcs(), 3);
        assert!(g.is_arc(0, 1));
        assert!(!g.is_arc(1, 0));
        assert_eq!(g.outdegree(0), 1);
        assert_eq!(g.indegree(0), 1);
        assert_eq!(g.mix_two_paths(0, 2), 1); // 0 -> 1 -> 2

        g.remove_arc(1, 2);
        assert_eq!(g.num_arcs(), 2);
        assert!(!g.is_arc(1, 2));
        assert_eq!(g.mix_two_paths(0, 2), 0);
    }

    #[test]
    fn test_undirected_edges_are_symmetric() {
        let mut g = Graph::new(3, false);
        g.insert_arc(0, 1);
        assert!(g.is_arc(0, 1));
        assert!(g.is_arc(1, 0));
        g.insert_arc(2, 1);
        assert_eq!(g.two_paths(0, 2), 1); // 0 - 1 - 2
        g.remove_arc(1, 0); // reversed endpoint order
        assert!(!g.is_arc(0, 1));
        assert_eq!(g.two_paths(0, 2), 0);
        assert_eq!(g.num_arcs(), 1);
    }

    #[test]
    fn test_directed_twopath_tables() {
        let mut g = Graph::new(5, true);
        g.insert_arc(0, 1);
        g.insert_arc(0, 2);
        g.insert_arc(3, 1);
        g.insert_arc(3, 2);
        // 1 and 2 share in-neighbours 0 and 3
        assert_eq!(g.in_two_paths(1, 2), 2);
        assert_eq!(g.in_two_paths(2, 1), 2);
        // 0 and 3 share out-neighbours 1 and 2
        assert_eq!(g.out_two_paths(0, 3), 2);
        // diagonals count degrees
        assert_eq!(g.in_two_paths(1, 1), 2);
        assert_eq!(g.out_two_paths(0, 0), 2);
    }

    #[test]
    fn test_self_loop_two_paths() {
        let mut g = Graph::new(3, true);
        g.insert_arc(0, 0);
        assert_eq!(g.mix_two_paths(0, 0), 1);
        g.insert_arc(0, 1);
        assert_eq!(g.mix_two_paths(0, 1), 1); // 0 -> 0 -> 1
        g.remove_arc(0, 0);
        assert_eq!(g.mix_two_paths(0, 1), 0);
        assert_eq!(g.mix_two_paths(0, 0), 0);
    }

    #[test]
    fn test_num_dyads() {
        let g = Graph::new(10, true);
        assert_eq!(g.num_dyads(false), 90.0);
        assert_eq!(g.num_dyads(true), 100.0);
        let g = Graph::new(10, false);
        assert_eq!(g.num_dyads(false), 45.0);
        let g = Graph::new_bipartite(4, 6);
        assert_eq!(g.num_dyads(false), 24.0);
    }

    #[test]
    fn test_side_lists_follow_toggles() {
        let mut g = Graph::new(4, true);
        g.insert_arc(0, 1);
        g.set_zones(vec![0, 0, 1, 2]).unwrap();
        g.insert_arc(0, 2);
        g.insert_arc(2, 3);
        let zones = g.zones.as_ref().unwrap();
        assert_eq!(zones.num_inner_arcs(), 2); // (0,1) and (0,2)
        assert_eq!(zones.prev_wave_degree[2], 1);
        g.remove_arc(0, 2);
        let zones = g.zones.as_ref().unwrap();
        assert_eq!(zones.num_inner_arcs(), 1);
        assert_eq!(zones.prev_wave_degree[2], 0);
    }
}
