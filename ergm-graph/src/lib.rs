//! In-memory graph store for exponential random graph model (ERGM) samplers.
//!
//! A graph is held as forward and reverse arc lists together with a flat
//! list of all arcs (for O(1) uniform arc picks) and incrementally
//! maintained two-path count tables, so that a Metropolis-Hastings toggle
//! proposal costs O(1) expected work. Node attributes (binary, categorical,
//! continuous, set) and the side structures needed for conditional
//! estimation (snowball sampling zones, citation terms) live alongside the
//! arc lists and are kept consistent by the same insert/remove entry points.
//!
//! # References
//!
//! Stivala, A., Robins, G., & Lomi, A. (2020). "Exponential random graph
//! model parameter estimation for very large directed networks."
//! PLoS ONE 15(1):e0227804.

/// Node attributes with missing-data sentinels
pub mod attrs;

/// Citation-term (cERGM) side structures
pub mod citation;

/// The graph itself: arc lists, flat arc index, incremental updates
pub mod graph;

/// Pajek arc-list and attribute/zone/term file readers and writers
pub mod io;

/// Snowball sampling zone side structures
pub mod snowball;

/// Dense and sparse two-path count tables
pub mod twopath;

pub use attrs::{Attributes, BIN_NA, CAT_NA};
pub use citation::CitationTerms;
pub use graph::{Graph, NodePair};
pub use snowball::SnowballZones;
pub use twopath::TwoPathTable;
