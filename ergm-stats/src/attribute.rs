//! Attribute-based change statistics.
//!
//! Missing data contributes zero: a toggle touching a node whose
//! attribute is the NA sentinel never moves an attribute statistic.

use ergm_graph::attrs::jaccard_index;
use ergm_graph::{Graph, BIN_NA, CAT_NA};

/// Sender effect: binary attribute of the arc's tail.
pub fn change_sender(g: &Graph, i: u32, _j: u32, a: usize) -> f64 {
    let v = g.attrs.binattr[a][i as usize];
    if v == BIN_NA {
        0.0
    } else {
        v as f64
    }
}

/// Receiver effect: binary attribute of the arc's head.
pub fn change_receiver(g: &Graph, _i: u32, j: u32, a: usize) -> f64 {
    let v = g.attrs.binattr[a][j as usize];
    if v == BIN_NA {
        0.0
    } else {
        v as f64
    }
}

/// Interaction: both endpoints carry the binary attribute.
pub fn change_interaction(g: &Graph, i: u32, j: u32, a: usize) -> f64 {
    let vi = g.attrs.binattr[a][i as usize];
    let vj = g.attrs.binattr[a][j as usize];
    if vi == BIN_NA || vj == BIN_NA {
        0.0
    } else {
        (vi * vj) as f64
    }
}

/// Activity (undirected): sum of the endpoints' binary attributes.
pub fn change_activity(g: &Graph, i: u32, j: u32, a: usize) -> f64 {
    let vi = g.attrs.binattr[a][i as usize];
    let vj = g.attrs.binattr[a][j as usize];
    (if vi == BIN_NA { 0 } else { vi } + if vj == BIN_NA { 0 } else { vj }) as f64
}

#[inline]
fn cat_pair(g: &Graph, i: u32, j: u32, a: usize) -> Option<(i32, i32)> {
    let vi = g.attrs.catattr[a][i as usize];
    let vj = g.attrs.catattr[a][j as usize];
    if vi == CAT_NA || vj == CAT_NA {
        None
    } else {
        Some((vi, vj))
    }
}

/// Matching: endpoints share the categorical value.
pub fn change_matching(g: &Graph, i: u32, j: u32, a: usize) -> f64 {
    match cat_pair(g, i, j, a) {
        Some((vi, vj)) if vi == vj => 1.0,
        _ => 0.0,
    }
}

/// Matching reciprocity: matching and the reverse arc exists.
pub fn change_matching_reciprocity(g: &Graph, i: u32, j: u32, a: usize) -> f64 {
    if g.is_arc(j, i) {
        change_matching(g, i, j, a)
    } else {
        0.0
    }
}

/// Mismatching: endpoints differ on the categorical value.
pub fn change_mismatching(g: &Graph, i: u32, j: u32, a: usize) -> f64 {
    match cat_pair(g, i, j, a) {
        Some((vi, vj)) if vi != vj => 1.0,
        _ => 0.0,
    }
}

/// Mismatching reciprocity: mismatching and the reverse arc exists.
pub fn change_mismatching_reciprocity(g: &Graph, i: u32, j: u32, a: usize) -> f64 {
    if g.is_arc(j, i) {
        change_mismatching(g, i, j, a)
    } else {
        0.0
    }
}

/// Continuous sender effect.
pub fn change_continuous_sender(g: &Graph, i: u32, _j: u32, a: usize) -> f64 {
    let v = g.attrs.contattr[a][i as usize];
    if v.is_nan() {
        0.0
    } else {
        v
    }
}

/// Continuous receiver effect.
pub fn change_continuous_receiver(g: &Graph, _i: u32, j: u32, a: usize) -> f64 {
    let v = g.attrs.contattr[a][j as usize];
    if v.is_nan() {
        0.0
    } else {
        v
    }
}

#[inline]
fn cont_pair(g: &Graph, i: u32, j: u32, a: usize) -> Option<(f64, f64)> {
    let vi = g.attrs.contattr[a][i as usize];
    let vj = g.attrs.contattr[a][j as usize];
    if vi.is_nan() || vj.is_nan() {
        None
    } else {
        Some((vi, vj))
    }
}

/// Heterophily: absolute difference of the continuous attribute.
pub fn change_diff(g: &Graph, i: u32, j: u32, a: usize) -> f64 {
    match cont_pair(g, i, j, a) {
        Some((vi, vj)) => (vi - vj).abs(),
        None => 0.0,
    }
}

/// Heterophily reciprocity: absolute difference when the reverse arc exists.
pub fn change_diff_reciprocity(g: &Graph, i: u32, j: u32, a: usize) -> f64 {
    if g.is_arc(j, i) {
        change_diff(g, i, j, a)
    } else {
        0.0
    }
}

/// Sign of sender minus receiver on the continuous attribute.
pub fn change_diff_sign(g: &Graph, i: u32, j: u32, a: usize) -> f64 {
    match cont_pair(g, i, j, a) {
        Some((vi, vj)) => {
            if vi > vj {
                1.0
            } else if vi < vj {
                -1.0
            } else {
                0.0
            }
        }
        None => 0.0,
    }
}

/// Jaccard similarity of the endpoints' category sets.
pub fn change_jaccard_similarity(g: &Graph, i: u32, j: u32, a: usize) -> f64 {
    match (
        &g.attrs.setattr[a][i as usize],
        &g.attrs.setattr[a][j as usize],
    ) {
        (Some(si), Some(sj)) => jaccard_index(si, sj),
        _ => 0.0,
    }
}
