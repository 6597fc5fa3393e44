//! Estimation driver: load the observed graph and its data, build the
//! model terms, validate the configuration against them, and run one
//! independent MCMC chain per task.
//!
//! Tasks are embarrassingly parallel: each owns a clone of the graph,
//! its own theta and sampler state, and a task-seeded RNG, and writes
//! its own pair of trajectory files `<prefix>_<tasknum>.txt`.

use anyhow::{anyhow, Context, Result};
use ergm_graph::{io, Graph};
use ergm_stats::{
    build_attr_term, build_dyadic_term, build_interaction_term, build_structural_term, Term,
};
use log::{info, warn};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use rayon::prelude::*;
use std::fs::File;
use std::io::{BufWriter, Write};

use crate::config::{EstimConfig, ParamSpec};
use crate::equilibrium::{ee_estimate, EeOptions, TaskOutcome};
use crate::propose::Regime;
use crate::sampler::Sampler;

/// Attach attribute, zone and term files to a loaded graph.
pub fn attach_data(
    g: &mut Graph,
    binattr_file: Option<&str>,
    catattr_file: Option<&str>,
    contattr_file: Option<&str>,
    setattr_file: Option<&str>,
    zone_file: Option<&str>,
    term_file: Option<&str>,
) -> Result<()> {
    let n = g.num_nodes();
    if let Some(f) = binattr_file {
        io::load_binattr(&mut g.attrs, f, n)?;
    }
    if let Some(f) = catattr_file {
        io::load_catattr(&mut g.attrs, f, n)?;
    }
    if let Some(f) = contattr_file {
        io::load_contattr(&mut g.attrs, f, n)?;
    }
    if let Some(f) = setattr_file {
        io::load_setattr(&mut g.attrs, f, n)?;
    }
    if let Some(f) = zone_file {
        let zones = io::load_node_ints(f, n)?;
        g.set_zones(zones)?;
    }
    if let Some(f) = term_file {
        let terms = io::load_node_ints(f, n)?;
        g.set_terms(terms)?;
    }
    Ok(())
}

/// Build the ordered term list (structural, attribute, dyadic,
/// attribute-interaction) from the config parameter lists.
///
/// With `with_values` (simulation) every entry must carry `= value` and
/// the returned theta holds them; otherwise values are rejected and
/// theta is all zeros.
pub fn build_model_terms(
    g: &Graph,
    struct_params: &[ParamSpec],
    attr_params: &[ParamSpec],
    dyadic_params: &[ParamSpec],
    attr_interaction_params: &[ParamSpec],
    with_values: bool,
) -> Result<(Vec<Term>, Vec<f64>)> {
    let mut terms = Vec::new();
    let mut theta = Vec::new();

    let mut push = |term: Term, spec: &ParamSpec| -> Result<()> {
        match (with_values, spec.value) {
            (true, Some(v)) => theta.push(v),
            (true, None) => {
                return Err(anyhow!(
                    "parameter {} needs a value (e.g. {} = -2.0) for simulation",
                    spec.name,
                    spec.name
                ))
            }
            (false, Some(_)) => {
                return Err(anyhow!(
                    "parameter {} must not carry a value for estimation",
                    spec.name
                ))
            }
            (false, None) => theta.push(0.0),
        }
        terms.push(term);
        Ok(())
    };

    for spec in struct_params {
        let lambda = match spec.args.len() {
            0 => None,
            1 => Some(spec.args[0].parse::<f64>().map_err(|_| {
                anyhow!("bad lambda value '{}' for parameter {}", spec.args[0], spec.name)
            })?),
            _ => {
                return Err(anyhow!(
                    "structural parameter {} takes at most one (lambda) argument",
                    spec.name
                ))
            }
        };
        push(build_structural_term(&spec.name, lambda, g.is_directed())?, spec)?;
    }
    for spec in attr_params {
        if spec.args.len() != 1 {
            return Err(anyhow!(
                "attribute parameter {} needs exactly one attribute name",
                spec.name
            ));
        }
        push(build_attr_term(&spec.name, &spec.args[0], g)?, spec)?;
    }
    for spec in dyadic_params {
        if spec.args.len() != 2 {
            return Err(anyhow!(
                "dyadic parameter {} needs exactly two attribute names",
                spec.name
            ));
        }
        push(
            build_dyadic_term(&spec.name, &spec.args[0], &spec.args[1], g)?,
            spec,
        )?;
    }
    for spec in attr_interaction_params {
        if spec.args.len() != 2 {
            return Err(anyhow!(
                "attribute interaction parameter {} needs exactly two attribute names",
                spec.name
            ));
        }
        push(
            build_interaction_term(&spec.name, &spec.args[0], &spec.args[1], g)?,
            spec,
        )?;
    }
    Ok((terms, theta))
}

/// Constraint checks that need the loaded graph.
pub fn validate_constraints(
    g: &Graph,
    use_conditional: bool,
    citation: bool,
    forbid_reciprocity: bool,
    allow_loops: bool,
) -> Result<()> {
    if citation && !g.is_directed() {
        return Err(anyhow!("citationERGM requires a directed graph"));
    }
    if !g.is_directed() && forbid_reciprocity {
        return Err(anyhow!("forbidReciprocity requires a directed graph"));
    }
    if !g.is_directed() && allow_loops {
        return Err(anyhow!("allowLoops requires a directed graph"));
    }
    if g.is_bipartite() && (use_conditional || citation) {
        return Err(anyhow!(
            "conditional estimation is not supported on two-mode networks"
        ));
    }
    if use_conditional {
        let zones = g
            .zones
            .as_ref()
            .ok_or_else(|| anyhow!("conditional estimation requested but no zones loaded"))?;
        if zones.max_zone < 1 {
            return Err(anyhow!(
                "conditional estimation requested but the zone file has only one zone"
            ));
        }
    }
    if citation && g.terms.is_none() {
        return Err(anyhow!("citationERGM requested but no terms loaded"));
    }
    Ok(())
}

/// The active proposal regime implied by the config flags.
pub fn select_regime(
    use_conditional: bool,
    citation: bool,
    allow_loops: bool,
    forbid_reciprocity: bool,
) -> Regime {
    if use_conditional {
        Regime::Snowball
    } else if citation {
        Regime::Citation
    } else {
        Regime::Plain {
            allow_loops,
            forbid_reciprocity,
        }
    }
}

fn make_sampler(cfg: &EstimConfig) -> Sampler {
    let regime = select_regime(
        cfg.use_conditional_estimation,
        cfg.citation_ergm,
        cfg.allow_loops,
        cfg.forbid_reciprocity,
    );
    if cfg.use_ifd_sampler {
        Sampler::ifd(regime, cfg.ifd_k)
    } else if cfg.use_tnt_sampler {
        Sampler::tnt(regime)
    } else {
        Sampler::basic(regime)
    }
}

fn ee_options(cfg: &EstimConfig) -> EeOptions {
    EeOptions {
        sampler_m: cfg.sampler_steps,
        m1_steps: cfg.s_steps,
        mouter: cfg.ee_steps,
        minner: cfg.ee_inner_steps,
        aca_s: cfg.aca_s,
        aca_ee: cfg.aca_ee,
        comp_c: cfg.comp_c,
        output_all_steps: cfg.output_all_steps,
        use_borisenko_update: cfg.use_borisenko_update,
        learning_rate: cfg.learning_rate,
        min_theta: cfg.min_theta,
        min_theta_mean: cfg.min_theta_mean,
        theta_sd_min: cfg.theta_sd_min,
    }
}

/// Header line naming each column; the IFD sampler always reports an
/// effective Arc column first.
fn file_header(terms: &[Term], ifd: bool) -> String {
    let mut header = String::from("t");
    if ifd {
        header.push_str(" Arc");
    }
    for term in terms {
        header.push(' ');
        header.push_str(&term.label);
    }
    header
}

/// Run one estimation chain: Algorithm S then Algorithm EE, writing the
/// task's trajectory files.
pub fn run_task(
    cfg: &EstimConfig,
    g: &Graph,
    terms: &[Term],
    tasknum: usize,
) -> Result<TaskOutcome> {
    let mut g = g.clone();
    let mut theta = vec![0.0; terms.len()];
    let mut sampler = make_sampler(cfg);
    let opts = ee_options(cfg);
    let mut rng = SmallRng::seed_from_u64(cfg.seed.wrapping_add(tasknum as u64));

    let theta_filename = format!("{}_{}.txt", cfg.theta_file_prefix, tasknum);
    let dza_filename = format!("{}_{}.txt", cfg.dza_file_prefix, tasknum);
    let mut theta_out = BufWriter::new(
        File::create(&theta_filename)
            .with_context(|| format!("error opening file {} for writing", theta_filename))?,
    );
    let mut dza_out = BufWriter::new(
        File::create(&dza_filename)
            .with_context(|| format!("error opening file {} for writing", dza_filename))?,
    );
    let header = file_header(terms, sampler.is_ifd());
    writeln!(theta_out, "{} AcceptanceRate", header)?;
    writeln!(dza_out, "{}", header)?;

    let outcome = ee_estimate(
        &mut g,
        terms,
        &mut theta,
        &opts,
        &mut sampler,
        tasknum,
        &mut rng,
        &mut theta_out,
        &mut dza_out,
    )?;
    theta_out.flush()?;
    dza_out.flush()?;

    if sampler.ifd.forced_add_count > 0 {
        warn!(
            "task {}: {} IFD delete moves were flipped to adds (no deletable arc)",
            tasknum, sampler.ifd.forced_add_count
        );
    }
    if cfg.output_simulated_network && outcome == TaskOutcome::Completed {
        let name = io::write_arclist_file(&cfg.sim_net_file_prefix, tasknum, &g)?;
        info!("task {}: wrote simulated network to {}", tasknum, name);
    }
    Ok(outcome)
}

/// Load the data, build the model, and run every task in parallel.
///
/// Returns the per-task outcomes in task order.
pub fn run_estimation(cfg: &EstimConfig) -> Result<Vec<TaskOutcome>> {
    let mut g = io::load_arclist(&cfg.arclist_file)?;
    attach_data(
        &mut g,
        cfg.binattr_file.as_deref(),
        cfg.catattr_file.as_deref(),
        cfg.contattr_file.as_deref(),
        cfg.setattr_file.as_deref(),
        cfg.zone_file.as_deref(),
        cfg.term_file.as_deref(),
    )?;
    validate_constraints(
        &g,
        cfg.use_conditional_estimation,
        cfg.citation_ergm,
        cfg.forbid_reciprocity,
        cfg.allow_loops,
    )?;
    let (terms, _) = build_model_terms(
        &g,
        &cfg.struct_params,
        &cfg.attr_params,
        &cfg.dyadic_params,
        &cfg.attr_interaction_params,
        false,
    )?;

    info!(
        "loaded {} graph: {} nodes, {} arcs, density {:.6}",
        if g.is_directed() { "directed" } else { "undirected" },
        g.num_nodes(),
        g.num_arcs(),
        g.density()
    );
    if let Some(zones) = &g.zones {
        info!(
            "snowball zones: {} waves, {} inner nodes, {} inner arcs",
            zones.max_zone + 1,
            zones.num_inner_nodes(),
            zones.num_inner_arcs()
        );
    }
    if let Some(terms_data) = &g.terms {
        info!(
            "citation terms: max term {}, {} max-term nodes, {} max-term-sender arcs",
            terms_data.max_term,
            terms_data.num_maxterm_nodes(),
            terms_data.num_maxtermsender_arcs()
        );
    }
    info!(
        "model has {} parameters: {}",
        terms.len(),
        terms
            .iter()
            .map(|t| t.label.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    );

    (0..cfg.num_tasks)
        .into_par_iter()
        .map(|tasknum| run_task(cfg, &g, &terms, tasknum))
        .collect()
}
