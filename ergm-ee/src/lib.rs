//! Equilibrium-expectation estimation and simulation for exponential
//! random graph models (ERGMs).
//!
//! The estimation pipeline is Algorithm S (burn-in and derivative
//! estimation, sampling without moves) followed by Algorithm EE (the
//! stochastic-approximation parameter update with moves performed),
//! driven by one of three Metropolis-Hastings kernels over arc toggles:
//! a basic sampler, the improved-fixed-density (IFD) sampler, and a
//! tie/no-tie (TNT) sampler. Constraint regimes (snowball-conditional,
//! citation-conditional, forbidden reciprocity, self-loops) are closed
//! enum variants of the proposal generator.
//!
//! # References
//!
//! Byshkin, M., Stivala, A., Mira, A., Robins, G., & Lomi, A. (2018).
//! "Fast maximum likelihood estimation via equilibrium expectation for
//! large network data." Scientific Reports 8:11509.
//!
//! Stivala, A., Robins, G., & Lomi, A. (2020). "Exponential random
//! graph model parameter estimation for very large directed networks."
//! PLoS ONE 15(1):e0227804.

/// Basic Metropolis sampler
pub mod basic;

/// Config-file parsing for both drivers
pub mod config;

/// Estimation driver (per-task chains)
pub mod driver;

/// Algorithm S, Algorithm EE and the estimation entry point
pub mod equilibrium;

/// Improved-fixed-density sampler
pub mod ifd;

/// Proposal generation under the constraint regimes
pub mod propose;

/// Shared sampler interface
pub mod sampler;

/// Simulation driver
pub mod simulation;

/// Tie/no-tie sampler
pub mod tnt;

pub use config::{EstimConfig, SimConfig};
pub use driver::{run_estimation, run_task};
pub use equilibrium::{algorithm_ee, algorithm_s, ee_estimate, EeOptions, TaskOutcome};
pub use propose::{arc_correction, Regime};
pub use sampler::{ChangeAccum, SampleOutcome, Sampler, SamplerKind};
pub use simulation::run_simulation;
