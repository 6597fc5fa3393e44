//! Change statistics for ERGM estimation.
//!
//! A change statistic is the difference a single arc toggle makes to one
//! sufficient statistic of the model. Every function here computes the
//! change for *adding* arc i -> j and never mutates the graph; delete
//! moves are handled by the caller negating the value. Terms are
//! dispatched through closed enums (one per family) rather than function
//! pointers, so the aggregator is a single match-driven traversal.
//!
//! Formulas follow the PNet / statnet conventions:
//!
//! Snijders, T. A. B., Pattison, P. E., Robins, G. L., & Handcock, M. S.
//! (2006). "New specifications for exponential random graph models."
//! Sociological Methodology 36(1):99-153.
//!
//! Robins, G., Pattison, P., & Wang, P. (2009). "Closure, connectivity
//! and degree distributions: exponential random graph (p*) models for
//! directed social networks." Social Networks 31(2):105-117.

/// Attribute-based change statistics (binary, categorical, continuous, set)
pub mod attribute;

/// Structural change statistics for directed graphs
pub mod directed;

/// Dyadic covariate and attribute-interaction change statistics
pub mod dyadic;

/// Term registry and the change-statistic aggregator
pub mod terms;

/// Structural change statistics for undirected graphs
pub mod undirected;

pub use terms::{
    build_attr_term, build_dyadic_term, build_interaction_term, build_structural_term,
    calc_change_stats, empty_graph_value, AttrKind, AttrStat, DyadicStat, InteractionStat,
    StructuralStat, Term, TermKind, ATTR_STATS, DEFAULT_LAMBDA, DYADIC_NAMES, INTERACTION_NAMES,
    STRUCTURAL_STATS,
};
