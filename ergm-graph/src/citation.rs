//! Citation-term structure for cERGM conditional estimation.
//!
//! Each node carries a term (time period). Citation ERGM estimation is
//! conditional on the term structure: all arcs are fixed except those sent
//! by a node in the latest term, so the sampler only toggles arcs whose
//! tail has the maximum term value.
//!
//! # References
//!
//! Schmid, C. S., Chen, T. H. Y., & Desmarais, B. A. (2021). "Generative
//! dynamics of Supreme Court citations: analysis with a new statistical
//! network model." Political Analysis 30(4):448-467.

use anyhow::anyhow;
use fnv::FnvHashMap;

use crate::graph::NodePair;

#[inline]
fn pair_key(i: u32, j: u32) -> u64 {
    ((i as u64) << 32) | j as u64
}

/// Term indices and the max-term-sender arc list derived from them.
#[derive(Debug, Clone)]
pub struct CitationTerms {
    /// Term (time period) of each node
    pub term: Vec<u32>,
    /// Latest term present
    pub max_term: u32,
    /// Nodes whose term is `max_term`
    pub maxterm_nodes: Vec<u32>,
    /// Arcs whose tail is a max-term node
    pub all_maxtermsender_arcs: Vec<NodePair>,
    pos: FnvHashMap<u64, u32>,
}

impl CitationTerms {
    pub fn new(term: Vec<u32>) -> anyhow::Result<Self> {
        let max_term = *term
            .iter()
            .max()
            .ok_or_else(|| anyhow!("empty term file"))?;
        let maxterm_nodes: Vec<u32> = (0..term.len() as u32)
            .filter(|&v| term[v as usize] == max_term)
            .collect();
        Ok(CitationTerms {
            term,
            max_term,
            maxterm_nodes,
            all_maxtermsender_arcs: Vec::new(),
            pos: FnvHashMap::default(),
        })
    }

    #[inline]
    pub fn is_maxterm(&self, v: u32) -> bool {
        self.term[v as usize] == self.max_term
    }

    pub fn num_maxterm_nodes(&self) -> usize {
        self.maxterm_nodes.len()
    }

    pub fn num_maxtermsender_arcs(&self) -> usize {
        self.all_maxtermsender_arcs.len()
    }

    pub(crate) fn on_insert(&mut self, i: u32, j: u32) {
        if self.is_maxterm(i) {
            self.pos
                .insert(pair_key(i, j), self.all_maxtermsender_arcs.len() as u32);
            self.all_maxtermsender_arcs.push((i, j));
        }
    }

    pub(crate) fn on_remove(&mut self, i: u32, j: u32) {
        if let Some(pos) = self.pos.remove(&pair_key(i, j)) {
            let pos = pos as usize;
            self.all_maxtermsender_arcs.swap_remove(pos);
            if pos < self.all_maxtermsender_arcs.len() {
                let (mi, mj) = self.all_maxtermsender_arcs[pos];
                self.pos.insert(pair_key(mi, mj), pos as u32);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maxterm_sender_arc_list() {
        let mut t = CitationTerms::new(vec![0, 1, 2, 2]).unwrap();
        assert_eq!(t.maxterm_nodes, vec![2, 3]);
        t.on_insert(2, 0);
        t.on_insert(0, 1); // tail not max-term: ignored
        t.on_insert(3, 1);
        assert_eq!(t.num_maxtermsender_arcs(), 2);
        t.on_remove(2, 0);
        assert_eq!(t.all_maxtermsender_arcs, vec![(3, 1)]);
    }
}
