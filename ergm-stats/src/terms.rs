//! Term registry and the change-statistic aggregator.
//!
//! A model is an ordered list of terms: structural first, then attribute,
//! dyadic-covariate and attribute-interaction terms, each bound to one
//! position of the parameter vector theta. Terms are built from config
//! names through the lookup functions here, which also enforce
//! applicability (directed vs. undirected statistics, attribute kinds).

use anyhow::{anyhow, Result};
use ergm_graph::Graph;

use crate::{attribute, directed, dyadic, undirected};

/// Default decay for the alternating statistics.
pub const DEFAULT_LAMBDA: f64 = 2.0;

/// Structural change statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructuralStat {
    // directed
    Arc,
    Reciprocity,
    Sink,
    Source,
    InTwoStars,
    OutTwoStars,
    Isolates,
    TwoPath,
    TransitiveTriad,
    CyclicTriad,
    AltInStars,
    AltOutStars,
    AltKTrianglesT,
    AltKTrianglesC,
    AltKTrianglesD,
    AltKTrianglesU,
    AltTwoPathsT,
    AltTwoPathsD,
    AltTwoPathsU,
    AltTwoPathsTD,
    // undirected
    Edge,
    TwoStars,
    AltStars,
    AltTwoPaths,
    AltKTriangles,
}

/// Every structural statistic, for `from_name` and `--list-params`.
pub const STRUCTURAL_STATS: &[StructuralStat] = &[
    StructuralStat::Arc,
    StructuralStat::Reciprocity,
    StructuralStat::Sink,
    StructuralStat::Source,
    StructuralStat::InTwoStars,
    StructuralStat::OutTwoStars,
    StructuralStat::Isolates,
    StructuralStat::TwoPath,
    StructuralStat::TransitiveTriad,
    StructuralStat::CyclicTriad,
    StructuralStat::AltInStars,
    StructuralStat::AltOutStars,
    StructuralStat::AltKTrianglesT,
    StructuralStat::AltKTrianglesC,
    StructuralStat::AltKTrianglesD,
    StructuralStat::AltKTrianglesU,
    StructuralStat::AltTwoPathsT,
    StructuralStat::AltTwoPathsD,
    StructuralStat::AltTwoPathsU,
    StructuralStat::AltTwoPathsTD,
    StructuralStat::Edge,
    StructuralStat::TwoStars,
    StructuralStat::AltStars,
    StructuralStat::AltTwoPaths,
    StructuralStat::AltKTriangles,
];

impl StructuralStat {
    pub fn name(&self) -> &'static str {
        match self {
            StructuralStat::Arc => "Arc",
            StructuralStat::Reciprocity => "Reciprocity",
            StructuralStat::Sink => "Sink",
            StructuralStat::Source => "Source",
            StructuralStat::InTwoStars => "InTwoStars",
            StructuralStat::OutTwoStars => "OutTwoStars",
            StructuralStat::Isolates => "Isolates",
            StructuralStat::TwoPath => "TwoPath",
            StructuralStat::TransitiveTriad => "TransitiveTriad",
            StructuralStat::CyclicTriad => "CyclicTriad",
            StructuralStat::AltInStars => "AltInStars",
            StructuralStat::AltOutStars => "AltOutStars",
            StructuralStat::AltKTrianglesT => "AltKTrianglesT",
            StructuralStat::AltKTrianglesC => "AltKTrianglesC",
            StructuralStat::AltKTrianglesD => "AltKTrianglesD",
            StructuralStat::AltKTrianglesU => "AltKTrianglesU",
            StructuralStat::AltTwoPathsT => "AltTwoPathsT",
            StructuralStat::AltTwoPathsD => "AltTwoPathsD",
            StructuralStat::AltTwoPathsU => "AltTwoPathsU",
            StructuralStat::AltTwoPathsTD => "AltTwoPathsTD",
            StructuralStat::Edge => "Edge",
            StructuralStat::TwoStars => "TwoStars",
            StructuralStat::AltStars => "AltStars",
            StructuralStat::AltTwoPaths => "AltTwoPaths",
            StructuralStat::AltKTriangles => "AltKTriangles",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        STRUCTURAL_STATS
            .iter()
            .copied()
            .find(|s| s.name().eq_ignore_ascii_case(name))
    }

    /// Alternating statistics take a decay parameter.
    pub fn takes_lambda(&self) -> bool {
        matches!(
            self,
            StructuralStat::AltInStars
                | StructuralStat::AltOutStars
                | StructuralStat::AltKTrianglesT
                | StructuralStat::AltKTrianglesC
                | StructuralStat::AltKTrianglesD
                | StructuralStat::AltKTrianglesU
                | StructuralStat::AltTwoPathsT
                | StructuralStat::AltTwoPathsD
                | StructuralStat::AltTwoPathsU
                | StructuralStat::AltTwoPathsTD
                | StructuralStat::AltStars
                | StructuralStat::AltTwoPaths
                | StructuralStat::AltKTriangles
        )
    }

    pub fn applies_to_directed(&self) -> bool {
        !matches!(
            self,
            StructuralStat::Edge
                | StructuralStat::TwoStars
                | StructuralStat::AltStars
                | StructuralStat::AltTwoPaths
                | StructuralStat::AltKTriangles
        )
    }

    pub fn applies_to_undirected(&self) -> bool {
        matches!(
            self,
            StructuralStat::Edge
                | StructuralStat::TwoStars
                | StructuralStat::AltStars
                | StructuralStat::AltTwoPaths
                | StructuralStat::AltKTriangles
                | StructuralStat::Isolates
        )
    }

    pub fn change(&self, g: &Graph, i: u32, j: u32, lambda: f64) -> f64 {
        match self {
            StructuralStat::Arc => directed::change_arc(g, i, j),
            StructuralStat::Reciprocity => directed::change_reciprocity(g, i, j),
            StructuralStat::Sink => directed::change_sink(g, i, j),
            StructuralStat::Source => directed::change_source(g, i, j),
            StructuralStat::InTwoStars => directed::change_in_two_stars(g, i, j),
            StructuralStat::OutTwoStars => directed::change_out_two_stars(g, i, j),
            StructuralStat::Isolates => directed::change_isolates(g, i, j),
            StructuralStat::TwoPath => directed::change_two_path(g, i, j),
            StructuralStat::TransitiveTriad => directed::change_transitive_triad(g, i, j),
            StructuralStat::CyclicTriad => directed::change_cyclic_triad(g, i, j),
            StructuralStat::AltInStars => directed::change_alt_in_stars(g, i, j, lambda),
            StructuralStat::AltOutStars => directed::change_alt_out_stars(g, i, j, lambda),
            StructuralStat::AltKTrianglesT => directed::change_alt_k_triangles_t(g, i, j, lambda),
            StructuralStat::AltKTrianglesC => directed::change_alt_k_triangles_c(g, i, j, lambda),
            StructuralStat::AltKTrianglesD => directed::change_alt_k_triangles_d(g, i, j, lambda),
            StructuralStat::AltKTrianglesU => directed::change_alt_k_triangles_u(g, i, j, lambda),
            StructuralStat::AltTwoPathsT => directed::change_alt_two_paths_t(g, i, j, lambda),
            StructuralStat::AltTwoPathsD => directed::change_alt_two_paths_d(g, i, j, lambda),
            StructuralStat::AltTwoPathsU => directed::change_alt_two_paths_u(g, i, j, lambda),
            StructuralStat::AltTwoPathsTD => directed::change_alt_two_paths_td(g, i, j, lambda),
            StructuralStat::Edge => undirected::change_edge(g, i, j),
            StructuralStat::TwoStars => undirected::change_two_stars(g, i, j),
            StructuralStat::AltStars => undirected::change_alt_stars(g, i, j, lambda),
            StructuralStat::AltTwoPaths => undirected::change_alt_two_paths(g, i, j, lambda),
            StructuralStat::AltKTriangles => undirected::change_alt_k_triangles(g, i, j, lambda),
        }
    }
}

/// Which attribute table a statistic reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrKind {
    Binary,
    Categorical,
    Continuous,
    Set,
}

/// Attribute change statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrStat {
    Sender,
    Receiver,
    Interaction,
    Activity,
    Matching,
    MatchingReciprocity,
    Mismatching,
    MismatchingReciprocity,
    ContinuousSender,
    ContinuousReceiver,
    Diff,
    DiffReciprocity,
    DiffSign,
    JaccardSimilarity,
}

/// Every attribute statistic, for `from_name` and `--list-params`.
pub const ATTR_STATS: &[AttrStat] = &[
    AttrStat::Sender,
    AttrStat::Receiver,
    AttrStat::Interaction,
    AttrStat::Activity,
    AttrStat::Matching,
    AttrStat::MatchingReciprocity,
    AttrStat::Mismatching,
    AttrStat::MismatchingReciprocity,
    AttrStat::ContinuousSender,
    AttrStat::ContinuousReceiver,
    AttrStat::Diff,
    AttrStat::DiffReciprocity,
    AttrStat::DiffSign,
    AttrStat::JaccardSimilarity,
];

impl AttrStat {
    pub fn name(&self) -> &'static str {
        match self {
            AttrStat::Sender => "Sender",
            AttrStat::Receiver => "Receiver",
            AttrStat::Interaction => "Interaction",
            AttrStat::Activity => "Activity",
            AttrStat::Matching => "Matching",
            AttrStat::MatchingReciprocity => "MatchingReciprocity",
            AttrStat::Mismatching => "Mismatching",
            AttrStat::MismatchingReciprocity => "MismatchingReciprocity",
            AttrStat::ContinuousSender => "ContinuousSender",
            AttrStat::ContinuousReceiver => "ContinuousReceiver",
            AttrStat::Diff => "Diff",
            AttrStat::DiffReciprocity => "DiffReciprocity",
            AttrStat::DiffSign => "DiffSign",
            AttrStat::JaccardSimilarity => "JaccardSimilarity",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        ATTR_STATS
            .iter()
            .copied()
            .find(|s| s.name().eq_ignore_ascii_case(name))
    }

    pub fn kind(&self) -> AttrKind {
        match self {
            AttrStat::Sender | AttrStat::Receiver | AttrStat::Interaction | AttrStat::Activity => {
                AttrKind::Binary
            }
            AttrStat::Matching
            | AttrStat::MatchingReciprocity
            | AttrStat::Mismatching
            | AttrStat::MismatchingReciprocity => AttrKind::Categorical,
            AttrStat::ContinuousSender
            | AttrStat::ContinuousReceiver
            | AttrStat::Diff
            | AttrStat::DiffReciprocity
            | AttrStat::DiffSign => AttrKind::Continuous,
            AttrStat::JaccardSimilarity => AttrKind::Set,
        }
    }

    pub fn applies_to_directed(&self) -> bool {
        !matches!(self, AttrStat::Activity)
    }

    pub fn applies_to_undirected(&self) -> bool {
        matches!(
            self,
            AttrStat::Activity
                | AttrStat::Interaction
                | AttrStat::Matching
                | AttrStat::Mismatching
                | AttrStat::Diff
                | AttrStat::JaccardSimilarity
        )
    }

    pub fn change(&self, g: &Graph, i: u32, j: u32, a: usize) -> f64 {
        match self {
            AttrStat::Sender => attribute::change_sender(g, i, j, a),
            AttrStat::Receiver => attribute::change_receiver(g, i, j, a),
            AttrStat::Interaction => attribute::change_interaction(g, i, j, a),
            AttrStat::Activity => attribute::change_activity(g, i, j, a),
            AttrStat::Matching => attribute::change_matching(g, i, j, a),
            AttrStat::MatchingReciprocity => attribute::change_matching_reciprocity(g, i, j, a),
            AttrStat::Mismatching => attribute::change_mismatching(g, i, j, a),
            AttrStat::MismatchingReciprocity => {
                attribute::change_mismatching_reciprocity(g, i, j, a)
            }
            AttrStat::ContinuousSender => attribute::change_continuous_sender(g, i, j, a),
            AttrStat::ContinuousReceiver => attribute::change_continuous_receiver(g, i, j, a),
            AttrStat::Diff => attribute::change_diff(g, i, j, a),
            AttrStat::DiffReciprocity => attribute::change_diff_reciprocity(g, i, j, a),
            AttrStat::DiffSign => attribute::change_diff_sign(g, i, j, a),
            AttrStat::JaccardSimilarity => attribute::change_jaccard_similarity(g, i, j, a),
        }
    }
}

/// Dyadic covariate change statistics, carrying their coordinate columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DyadicStat {
    GeoDistance { lat: usize, lon: usize },
    LogGeoDistance { lat: usize, lon: usize },
    EuclideanDistance { x: usize, y: usize },
}

impl DyadicStat {
    pub fn name(&self) -> &'static str {
        match self {
            DyadicStat::GeoDistance { .. } => "GeoDistance",
            DyadicStat::LogGeoDistance { .. } => "LogGeoDistance",
            DyadicStat::EuclideanDistance { .. } => "EuclideanDistance",
        }
    }

    pub fn change(&self, g: &Graph, i: u32, j: u32) -> f64 {
        match *self {
            DyadicStat::GeoDistance { lat, lon } => dyadic::change_geo_distance(g, i, j, lat, lon),
            DyadicStat::LogGeoDistance { lat, lon } => {
                dyadic::change_log_geo_distance(g, i, j, lat, lon)
            }
            DyadicStat::EuclideanDistance { x, y } => {
                dyadic::change_euclidean_distance(g, i, j, x, y)
            }
        }
    }
}

/// Names of the dyadic covariate statistics.
pub const DYADIC_NAMES: &[&str] = &["GeoDistance", "LogGeoDistance", "EuclideanDistance"];

/// Attribute-interaction change statistics, carrying their attribute pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionStat {
    MatchingInteraction { a: usize, b: usize },
}

impl InteractionStat {
    pub fn name(&self) -> &'static str {
        match self {
            InteractionStat::MatchingInteraction { .. } => "MatchingInteraction",
        }
    }

    pub fn change(&self, g: &Graph, i: u32, j: u32) -> f64 {
        match *self {
            InteractionStat::MatchingInteraction { a, b } => {
                dyadic::change_matching_interaction(g, i, j, a, b)
            }
        }
    }
}

/// Names of the attribute-interaction statistics.
pub const INTERACTION_NAMES: &[&str] = &["MatchingInteraction"];

/// One position of the parameter vector.
#[derive(Debug, Clone)]
pub struct Term {
    /// Column label in the trajectory file headers
    pub label: String,
    pub kind: TermKind,
}

#[derive(Debug, Clone)]
pub enum TermKind {
    Structural { stat: StructuralStat, lambda: f64 },
    Attribute { stat: AttrStat, attr: usize },
    Dyadic { stat: DyadicStat },
    AttrInteraction { stat: InteractionStat },
}

impl Term {
    /// Change in this term's sufficient statistic for adding arc i -> j.
    #[inline]
    pub fn change(&self, g: &Graph, i: u32, j: u32) -> f64 {
        match &self.kind {
            TermKind::Structural { stat, lambda } => stat.change(g, i, j, *lambda),
            TermKind::Attribute { stat, attr } => stat.change(g, i, j, *attr),
            TermKind::Dyadic { stat } => stat.change(g, i, j),
            TermKind::AttrInteraction { stat } => stat.change(g, i, j),
        }
    }

    pub fn structural(stat: StructuralStat, lambda: f64) -> Self {
        Term {
            label: stat.name().to_string(),
            kind: TermKind::Structural { stat, lambda },
        }
    }

    /// Is this term the plain density term (Arc or Edge)?
    pub fn is_density_term(&self) -> bool {
        matches!(
            self.kind,
            TermKind::Structural {
                stat: StructuralStat::Arc | StructuralStat::Edge,
                ..
            }
        )
    }
}

/// Build a structural term from its config name.
pub fn build_structural_term(
    name: &str,
    lambda: Option<f64>,
    is_directed: bool,
) -> Result<Term> {
    let stat = StructuralStat::from_name(name)
        .ok_or_else(|| anyhow!("unknown structural parameter '{}'", name))?;
    if is_directed && !stat.applies_to_directed() {
        return Err(anyhow!("parameter {} requires an undirected graph", name));
    }
    if !is_directed && !stat.applies_to_undirected() {
        return Err(anyhow!("parameter {} requires a directed graph", name));
    }
    if let Some(l) = lambda {
        if !stat.takes_lambda() {
            return Err(anyhow!("parameter {} does not take a lambda value", name));
        }
        if l <= 1.0 {
            return Err(anyhow!("lambda for {} must be > 1, got {}", name, l));
        }
    }
    Ok(Term::structural(stat, lambda.unwrap_or(DEFAULT_LAMBDA)))
}

/// Build an attribute term from its config name and attribute name.
pub fn build_attr_term(family: &str, attr_name: &str, g: &Graph) -> Result<Term> {
    let stat = AttrStat::from_name(family)
        .ok_or_else(|| anyhow!("unknown attribute parameter '{}'", family))?;
    if g.is_directed() && !stat.applies_to_directed() {
        return Err(anyhow!("parameter {} requires an undirected graph", family));
    }
    if !g.is_directed() && !stat.applies_to_undirected() {
        return Err(anyhow!("parameter {} requires a directed graph", family));
    }
    let attr = match stat.kind() {
        AttrKind::Binary => g.attrs.find_binattr(attr_name),
        AttrKind::Categorical => g.attrs.find_catattr(attr_name),
        AttrKind::Continuous => g.attrs.find_contattr(attr_name),
        AttrKind::Set => g.attrs.find_setattr(attr_name),
    }
    .ok_or_else(|| {
        anyhow!(
            "parameter {}: no {} attribute named '{}'",
            family,
            match stat.kind() {
                AttrKind::Binary => "binary",
                AttrKind::Categorical => "categorical",
                AttrKind::Continuous => "continuous",
                AttrKind::Set => "set",
            },
            attr_name
        )
    })?;
    Ok(Term {
        label: format!("{}_{}", stat.name(), attr_name),
        kind: TermKind::Attribute { stat, attr },
    })
}

/// Build a dyadic covariate term from its config name and coordinate
/// attribute names.
pub fn build_dyadic_term(family: &str, attr1: &str, attr2: &str, g: &Graph) -> Result<Term> {
    let find = |name: &str| {
        g.attrs
            .find_contattr(name)
            .ok_or_else(|| anyhow!("parameter {}: no continuous attribute named '{}'", family, name))
    };
    let stat = if family.eq_ignore_ascii_case("GeoDistance") {
        DyadicStat::GeoDistance {
            lat: find(attr1)?,
            lon: find(attr2)?,
        }
    } else if family.eq_ignore_ascii_case("LogGeoDistance") {
        DyadicStat::LogGeoDistance {
            lat: find(attr1)?,
            lon: find(attr2)?,
        }
    } else if family.eq_ignore_ascii_case("EuclideanDistance") {
        DyadicStat::EuclideanDistance {
            x: find(attr1)?,
            y: find(attr2)?,
        }
    } else {
        return Err(anyhow!("unknown dyadic parameter '{}'", family));
    };
    Ok(Term {
        label: stat.name().to_string(),
        kind: TermKind::Dyadic { stat },
    })
}

/// Build an attribute-interaction term from its config name and the pair
/// of attribute names.
pub fn build_interaction_term(family: &str, attr1: &str, attr2: &str, g: &Graph) -> Result<Term> {
    if !family.eq_ignore_ascii_case("MatchingInteraction") {
        return Err(anyhow!("unknown attribute interaction parameter '{}'", family));
    }
    let find = |name: &str| {
        g.attrs.find_catattr(name).ok_or_else(|| {
            anyhow!(
                "parameter {}: no categorical attribute named '{}'",
                family,
                name
            )
        })
    };
    let stat = InteractionStat::MatchingInteraction {
        a: find(attr1)?,
        b: find(attr2)?,
    };
    Ok(Term {
        label: format!("{}_{}_{}", stat.name(), attr1, attr2),
        kind: TermKind::AttrInteraction { stat },
    })
}

/// Sum of theta-weighted change statistics for toggling arc (i, j),
/// negated when `is_delete`.
///
/// The per-position add-direction changes are written into `changestats`
/// un-negated: the samplers accumulate them into separate add and delete
/// sums, and the engine's accumulator conventions (Algorithm S uses
/// del - add, Algorithm EE accumulates add - del) already encode the
/// delete direction. Pure with respect to the graph.
pub fn calc_change_stats(
    g: &Graph,
    i: u32,
    j: u32,
    terms: &[Term],
    theta: &[f64],
    is_delete: bool,
    changestats: &mut [f64],
) -> f64 {
    debug_assert_eq!(terms.len(), theta.len());
    debug_assert_eq!(terms.len(), changestats.len());
    let sign = if is_delete { -1.0 } else { 1.0 };
    let mut total = 0.0;
    for (l, term) in terms.iter().enumerate() {
        let delta = term.change(g, i, j);
        changestats[l] = delta;
        total += theta[l] * sign * delta;
    }
    total
}

/// Value of a term's sufficient statistic on an arcless graph.
///
/// Used to seed incremental statistic tracking in simulation: all terms
/// are zero on the empty graph except Isolates, which counts every node.
pub fn empty_graph_value(term: &Term, g: &Graph) -> f64 {
    match &term.kind {
        TermKind::Structural {
            stat: StructuralStat::Isolates,
            ..
        } => g.num_nodes() as f64,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_round_trip() {
        for stat in STRUCTURAL_STATS {
            assert_eq!(StructuralStat::from_name(stat.name()), Some(*stat));
        }
        for stat in ATTR_STATS {
            assert_eq!(AttrStat::from_name(stat.name()), Some(*stat));
        }
        assert!(StructuralStat::from_name("arc").is_some());
        assert!(StructuralStat::from_name("NoSuchThing").is_none());
    }

    #[test]
    fn test_structural_term_validation() {
        assert!(build_structural_term("Arc", None, true).is_ok());
        assert!(build_structural_term("Arc", None, false).is_err());
        assert!(build_structural_term("Edge", None, false).is_ok());
        assert!(build_structural_term("Edge", None, true).is_err());
        // lambda only on alternating statistics, and > 1
        assert!(build_structural_term("Arc", Some(2.0), true).is_err());
        assert!(build_structural_term("AltInStars", Some(2.0), true).is_ok());
        assert!(build_structural_term("AltInStars", Some(1.0), true).is_err());
    }

    #[test]
    fn test_attr_term_validation() {
        let mut g = Graph::new(3, true);
        g.attrs.binattr_names = vec!["smoker".into()];
        g.attrs.binattr = vec![vec![0, 1, 0]];
        let term = build_attr_term("Sender", "smoker", &g).unwrap();
        assert_eq!(term.label, "Sender_smoker");
        assert!(build_attr_term("Sender", "absent", &g).is_err());
        assert!(build_attr_term("Matching", "smoker", &g).is_err()); // wrong kind
    }

    #[test]
    fn test_calc_change_stats_totals() {
        let mut g = Graph::new(3, true);
        g.insert_arc(1, 0);
        let terms = vec![
            Term::structural(StructuralStat::Arc, DEFAULT_LAMBDA),
            Term::structural(StructuralStat::Reciprocity, DEFAULT_LAMBDA),
        ];
        let theta = vec![2.0, 3.0];
        let mut cs = vec![0.0; 2];
        // adding 0 -> 1 reciprocates 1 -> 0
        let total = calc_change_stats(&g, 0, 1, &terms, &theta, false, &mut cs);
        assert_eq!(cs, vec![1.0, 1.0]);
        assert_eq!(total, 5.0);
        // delete negates the total; the per-position buffer keeps the
        // add-direction values for the engine's accumulators
        let total = calc_change_stats(&g, 0, 1, &terms, &theta, true, &mut cs);
        assert_eq!(cs, vec![1.0, 1.0]);
        assert_eq!(total, -5.0);
    }

    #[test]
    fn test_change_stat_purity() {
        let mut g = Graph::new(4, true);
        g.insert_arc(0, 1);
        g.insert_arc(1, 2);
        let terms = vec![Term::structural(
            StructuralStat::AltKTrianglesT,
            DEFAULT_LAMBDA,
        )];
        let theta = vec![1.0];
        let mut cs1 = vec![0.0];
        let mut cs2 = vec![0.0];
        let arcs_before: Vec<_> = g.allarcs().to_vec();
        let t1 = calc_change_stats(&g, 0, 2, &terms, &theta, false, &mut cs1);
        let t2 = calc_change_stats(&g, 0, 2, &terms, &theta, false, &mut cs2);
        assert_eq!(t1.to_bits(), t2.to_bits());
        assert_eq!(cs1[0].to_bits(), cs2[0].to_bits());
        assert_eq!(g.allarcs(), arcs_before.as_slice());
    }
}
