//! Equilibrium-expectation estimation: Algorithm S then Algorithm EE.
//!
//! Algorithm S samples without performing moves to push theta toward a
//! high-probability region and to estimate the squared-change-statistic
//! derivative scales. Algorithm EE then performs moves and drives each
//! theta component toward the fixed point where the accumulated change
//! in its sufficient statistic vanishes, i.e. where the expected
//! statistics under the model match the observed graph.
//!
//! # References
//!
//! Byshkin, M., Stivala, A., Mira, A., Robins, G., & Lomi, A. (2018).
//! "Fast maximum likelihood estimation via equilibrium expectation for
//! large network data." Scientific Reports 8:11509.
//!
//! Borisenko, A., Byshkin, M., & Lomi, A. (2019). "A simple algorithm
//! for scalable Monte Carlo inference." arXiv:1901.00533.

use anyhow::Result;
use ergm_graph::Graph;
use ergm_stats::Term;
use log::{info, warn};
use rand::rngs::SmallRng;
use std::io::Write;
use std::time::Instant;

use crate::propose::arc_correction;
use crate::sampler::{ChangeAccum, Sampler};

/// Tuning knobs of the two algorithms.
#[derive(Debug, Clone)]
pub struct EeOptions {
    /// Sampler proposals per algorithm step (samplerSteps)
    pub sampler_m: usize,
    /// Iterations of Algorithm S (Ssteps)
    pub m1_steps: usize,
    /// Outer iterations of Algorithm EE (EEsteps)
    pub mouter: usize,
    /// Inner iterations of Algorithm EE (EEinnerSteps)
    pub minner: usize,
    /// Step-size multiplier in Algorithm S
    pub aca_s: f64,
    /// Step-size multiplier in Algorithm EE (classical update)
    pub aca_ee: f64,
    /// Multiplier of sd(theta)/mean(theta) limiting theta variance
    pub comp_c: f64,
    /// Write theta and dzA every inner iteration, not just outer
    pub output_all_steps: bool,
    /// Use the Borisenko et al. (2019) update instead of the classical one
    pub use_borisenko_update: bool,
    /// Learning rate of the Borisenko update
    pub learning_rate: f64,
    /// Minimum |theta| magnitude in the Borisenko step
    pub min_theta: f64,
    /// Floor on |mean(theta)| in the D0 rescaling
    pub min_theta_mean: f64,
    /// sd(theta) below which the D0 rescaling is skipped
    pub theta_sd_min: f64,
}

/// How a task's estimation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOutcome {
    Completed,
    /// A non-finite derivative estimate after Algorithm S: the model is
    /// judged degenerate and Algorithm EE is skipped for this task.
    Degenerate,
}

/// Sample mean and standard deviation.
fn mean_and_sd(values: &[f64]) -> (f64, f64) {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    if values.len() < 2 {
        return (mean, 0.0);
    }
    let var = values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);
    (mean, var.sqrt())
}

#[inline]
fn sign(x: f64) -> f64 {
    if x < 0.0 {
        -1.0
    } else {
        1.0
    }
}

/// Algorithm S: initialise theta and estimate the derivative scales.
///
/// Returns Dmean, the per-position derivative estimates consumed as D0
/// by Algorithm EE. Theta is zeroed on entry; the sampler never performs
/// moves, so the graph is unchanged on return. Trajectory lines carry
/// negative iteration indices t - Ssteps, and under the IFD sampler a
/// leading effective-Arc column (V minus the arc correction).
#[allow(clippy::too_many_arguments)]
pub fn algorithm_s<W: Write>(
    g: &mut Graph,
    terms: &[Term],
    theta: &mut [f64],
    opts: &EeOptions,
    sampler: &mut Sampler,
    rng: &mut SmallRng,
    theta_out: &mut W,
) -> Result<Vec<f64>> {
    let n = terms.len();
    let mut accum = ChangeAccum::new(n);
    let mut d0 = vec![0.0; n];
    let correction = if sampler.is_ifd() {
        arc_correction(g, sampler.regime)
    } else {
        0.0
    };

    theta.fill(0.0);
    for t in 0..opts.m1_steps {
        let out = sampler.run(g, terms, theta, opts.sampler_m, false, rng, &mut accum)?;
        write!(theta_out, "{} ", t as i64 - opts.m1_steps as i64)?;
        if sampler.is_ifd() {
            write!(theta_out, "{} ", sampler.ifd.aux_param - correction)?;
        }
        for l in 0..n {
            let dz_a = accum.del[l] - accum.add[l];
            let sum = accum.add[l] + accum.del[l];
            // the mean squared change approximates the derivative of the
            // expected statistic with respect to its parameter
            d0[l] += dz_a * dz_a;
            let da = if sum != 0.0 {
                opts.aca_s / (sum * sum)
            } else {
                0.0
            };
            theta[l] += sign(dz_a) * da * dz_a * dz_a;
            write!(theta_out, "{} ", theta[l])?;
        }
        writeln!(theta_out, "{}", out.acceptance_rate)?;
    }

    Ok(d0
        .iter()
        .map(|&d| opts.sampler_m as f64 / d)
        .collect())
}

/// Algorithm EE: drive theta to the equilibrium-expectation fixed point.
///
/// The sampler performs moves here; `d0` is rescaled in place between
/// outer iterations unless the Borisenko update is selected.
#[allow(clippy::too_many_arguments)]
pub fn algorithm_ee<W1: Write, W2: Write>(
    g: &mut Graph,
    terms: &[Term],
    theta: &mut [f64],
    d0: &mut [f64],
    opts: &EeOptions,
    sampler: &mut Sampler,
    rng: &mut SmallRng,
    theta_out: &mut W1,
    dza_out: &mut W2,
) -> Result<()> {
    let n = terms.len();
    let mut accum = ChangeAccum::new(n);
    // dzA accumulates across all inner iterations
    let mut dz_a = vec![0.0; n];
    let mut theta_matrix = vec![vec![0.0; opts.minner]; n];
    let correction = if sampler.is_ifd() {
        arc_correction(g, sampler.regime)
    } else {
        0.0
    };

    let mut t = 0usize;
    for _touter in 0..opts.mouter {
        for tinner in 0..opts.minner {
            let emit = opts.output_all_steps || tinner == 0;
            let out = sampler.run(g, terms, theta, opts.sampler_m, true, rng, &mut accum)?;
            if emit {
                write!(theta_out, "{} ", t)?;
                write!(dza_out, "{} ", t)?;
                if sampler.is_ifd() {
                    write!(theta_out, "{} ", sampler.ifd.aux_param - correction)?;
                    write!(dza_out, "{} ", out.dz_arc)?;
                }
            }
            for l in 0..n {
                dz_a[l] += accum.add[l] - accum.del[l];
                let step = if opts.use_borisenko_update {
                    -sign(dz_a[l]) * opts.learning_rate * theta[l].abs().max(opts.min_theta)
                } else {
                    -sign(dz_a[l]) * d0[l] * opts.aca_ee * dz_a[l] * dz_a[l]
                };
                theta[l] += step;
                theta_matrix[l][tinner] = theta[l];
                if emit {
                    write!(theta_out, "{} ", theta[l])?;
                    write!(dza_out, "{} ", dz_a[l])?;
                }
            }
            if emit {
                writeln!(theta_out, "{}", out.acceptance_rate)?;
                writeln!(dza_out)?;
            }
            t += 1;
        }
        if !opts.use_borisenko_update {
            // rescale D0 to limit the variance of theta over the inner loop
            for l in 0..n {
                let (mean, sd) = mean_and_sd(&theta_matrix[l]);
                let mean_abs = mean.abs().max(opts.min_theta_mean);
                if sd > opts.theta_sd_min {
                    d0[l] *= (opts.comp_c * mean_abs / sd).sqrt();
                }
            }
        }
        theta_out.flush()?;
        dza_out.flush()?;
    }
    Ok(())
}

/// Estimate theta by Algorithm S followed by Algorithm EE.
///
/// Returns `Degenerate` (skipping EE) when any derivative estimate from
/// Algorithm S is non-finite.
#[allow(clippy::too_many_arguments)]
pub fn ee_estimate<W1: Write, W2: Write>(
    g: &mut Graph,
    terms: &[Term],
    theta: &mut [f64],
    opts: &EeOptions,
    sampler: &mut Sampler,
    tasknum: usize,
    rng: &mut SmallRng,
    theta_out: &mut W1,
    dza_out: &mut W2,
) -> Result<TaskOutcome> {
    if opts.use_borisenko_update {
        info!(
            "task {}: ACA_S = {}, Borisenko update learningRate = {}, minTheta = {}, \
             samplerSteps = {}, Ssteps = {}, EEsteps = {}, EEinnerSteps = {}",
            tasknum,
            opts.aca_s,
            opts.learning_rate,
            opts.min_theta,
            opts.sampler_m,
            opts.m1_steps,
            opts.mouter,
            opts.minner
        );
    } else {
        info!(
            "task {}: ACA_S = {}, ACA_EE = {}, compC = {}, samplerSteps = {}, Ssteps = {}, \
             EEsteps = {}, EEinnerSteps = {}",
            tasknum,
            opts.aca_s,
            opts.aca_ee,
            opts.comp_c,
            opts.sampler_m,
            opts.m1_steps,
            opts.mouter,
            opts.minner
        );
    }
    if sampler.is_ifd() {
        info!(
            "task {}: IFD sampler ifd_K = {}, arcCorrection = {}",
            tasknum,
            sampler.ifd_k,
            arc_correction(g, sampler.regime)
        );
    }

    let start = Instant::now();
    info!("task {}: running Algorithm S...", tasknum);
    let mut dmean = algorithm_s(g, terms, theta, opts, sampler, rng, theta_out)?;
    theta_out.flush()?;
    info!(
        "task {}: Algorithm S took {:.2} s, theta = {:?}, Dmean = {:?}",
        tasknum,
        start.elapsed().as_secs_f64(),
        theta,
        dmean
    );

    for (l, d) in dmean.iter().enumerate() {
        if !d.is_finite() {
            warn!(
                "task {}: derivative estimate for parameter {} ({}) is not finite; \
                 model may be degenerate, not continuing this run",
                tasknum, l, terms[l].label
            );
            return Ok(TaskOutcome::Degenerate);
        }
    }

    let start = Instant::now();
    info!("task {}: running Algorithm EE...", tasknum);
    algorithm_ee(
        g, terms, theta, &mut dmean, opts, sampler, rng, theta_out, dza_out,
    )?;
    info!(
        "task {}: Algorithm EE took {:.2} s",
        tasknum,
        start.elapsed().as_secs_f64()
    );
    Ok(TaskOutcome::Completed)
}
