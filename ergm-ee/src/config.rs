//! Configuration-file parsing for the estimation and simulation drivers.
//!
//! The format is UTF-8 text with `#` comments and `keyword = value`
//! pairs; keywords are case-insensitive. Parameter lists are brace
//! blocks, possibly spanning lines:
//!
//! ```text
//! structParams = {Arc, Reciprocity, AltInStars(2.0)}
//! attrParams   = {Sender(gender), Matching(region)}
//! ```
//!
//! In simulation configs each parameter carries its value,
//! `Arc = -4.0` style. Unknown keys, bad types, duplicate keys and
//! contradictory option combinations are hard errors; options that are
//! merely ignored by the selected algorithm produce warnings at the
//! driver level.

use anyhow::{anyhow, Context, Result};
use fnv::FnvHashMap;
use std::collections::HashSet;

use ergm_graph::io::sibling_path;

pub const DEFAULT_ACA_S: f64 = 0.1;
pub const DEFAULT_ACA_EE: f64 = 1e-9;
pub const DEFAULT_COMP_C: f64 = 1e-2;
pub const DEFAULT_IFD_K: f64 = 0.1;
pub const DEFAULT_LEARNING_RATE: f64 = 0.001;
pub const DEFAULT_MIN_THETA: f64 = 0.01;
pub const DEFAULT_MIN_THETA_MEAN: f64 = 0.1;
pub const DEFAULT_THETA_SD_MIN: f64 = 1e-10;
pub const DEFAULT_SAMPLER_STEPS: usize = 1000;
pub const DEFAULT_S_STEPS: usize = 100;
pub const DEFAULT_EE_STEPS: usize = 500;
pub const DEFAULT_EE_INNER_STEPS: usize = 100;

/// One entry of a parameter list: `Name`, `Name(arg, ...)`, optionally
/// with `= value` (simulation configs).
#[derive(Debug, Clone, PartialEq)]
pub struct ParamSpec {
    pub name: String,
    pub args: Vec<String>,
    pub value: Option<f64>,
}

/// Raw `keyword = value` pairs with case-insensitive keys.
struct RawConfig {
    /// lowercased key -> (original key, value text)
    pairs: FnvHashMap<String, (String, String)>,
    consumed: HashSet<String>,
}

impl RawConfig {
    fn parse_str(text: &str) -> Result<Self> {
        // strip comments first so '#' never reaches the tokenizer
        let stripped: String = text
            .lines()
            .map(|line| match line.find('#') {
                Some(pos) => &line[..pos],
                None => line,
            })
            .collect::<Vec<&str>>()
            .join("\n");

        let mut pairs = FnvHashMap::default();
        let mut rest = stripped.as_str();
        loop {
            rest = rest.trim_start();
            if rest.is_empty() {
                break;
            }
            let key_len = rest
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                .unwrap_or(rest.len());
            if key_len == 0 {
                return Err(anyhow!(
                    "expected a keyword, found '{}'",
                    rest.chars().take(20).collect::<String>()
                ));
            }
            let key = &rest[..key_len];
            rest = rest[key_len..].trim_start();
            let Some(tail) = rest.strip_prefix('=') else {
                return Err(anyhow!("expected '=' after keyword '{}'", key));
            };
            rest = tail.trim_start();
            let value: String;
            if let Some(tail) = rest.strip_prefix('{') {
                let close = tail
                    .find('}')
                    .ok_or_else(|| anyhow!("unterminated '{{' in value of '{}'", key))?;
                value = tail[..close].to_string();
                rest = &tail[close + 1..];
            } else {
                let eol = rest.find('\n').unwrap_or(rest.len());
                value = rest[..eol].trim().to_string();
                rest = &rest[eol..];
            }
            if pairs
                .insert(key.to_lowercase(), (key.to_string(), value))
                .is_some()
            {
                return Err(anyhow!("duplicate configuration keyword '{}'", key));
            }
        }
        Ok(RawConfig {
            pairs,
            consumed: HashSet::new(),
        })
    }

    fn is_set(&self, key: &str) -> bool {
        self.pairs.contains_key(&key.to_lowercase())
    }

    fn take(&mut self, key: &str) -> Option<String> {
        let lower = key.to_lowercase();
        self.consumed.insert(lower.clone());
        self.pairs.get(&lower).map(|(_, v)| v.clone())
    }

    fn take_str(&mut self, key: &str) -> Option<String> {
        self.take(key).filter(|v| !v.is_empty())
    }

    fn take_f64(&mut self, key: &str, default: f64) -> Result<f64> {
        match self.take(key) {
            None => Ok(default),
            Some(v) => v
                .parse::<f64>()
                .map_err(|_| anyhow!("bad numeric value '{}' for '{}'", v, key)),
        }
    }

    fn take_usize(&mut self, key: &str, default: usize) -> Result<usize> {
        match self.take(key) {
            None => Ok(default),
            Some(v) => v
                .parse::<usize>()
                .map_err(|_| anyhow!("bad integer value '{}' for '{}'", v, key)),
        }
    }

    fn take_u64(&mut self, key: &str, default: u64) -> Result<u64> {
        match self.take(key) {
            None => Ok(default),
            Some(v) => v
                .parse::<u64>()
                .map_err(|_| anyhow!("bad integer value '{}' for '{}'", v, key)),
        }
    }

    fn take_bool(&mut self, key: &str, default: bool) -> Result<bool> {
        match self.take(key) {
            None => Ok(default),
            Some(v) => match v.to_lowercase().as_str() {
                "true" => Ok(true),
                "false" => Ok(false),
                _ => Err(anyhow!("bad boolean value '{}' for '{}' (use True or False)", v, key)),
            },
        }
    }

    fn take_params(&mut self, key: &str) -> Result<Vec<ParamSpec>> {
        match self.take(key) {
            None => Ok(Vec::new()),
            Some(v) => {
                parse_param_list(&v).with_context(|| format!("in parameter list '{}'", key))
            }
        }
    }

    /// Everything must have been consumed by now.
    fn finish(self) -> Result<()> {
        let mut unknown: Vec<String> = self
            .pairs
            .iter()
            .filter(|(lower, _)| !self.consumed.contains(*lower))
            .map(|(_, (orig, _))| orig.clone())
            .collect();
        if unknown.is_empty() {
            Ok(())
        } else {
            unknown.sort();
            Err(anyhow!("unknown configuration keyword(s): {}", unknown.join(", ")))
        }
    }
}

/// Split a brace-block body into `ParamSpec`s.
fn parse_param_list(text: &str) -> Result<Vec<ParamSpec>> {
    let mut entries = Vec::new();
    let mut depth = 0usize;
    let mut current = String::new();
    for c in text.chars() {
        match c {
            '(' => {
                depth += 1;
                current.push(c);
            }
            ')' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| anyhow!("unbalanced ')' in parameter list"))?;
                current.push(c);
            }
            ',' if depth == 0 => {
                entries.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }
    if depth != 0 {
        return Err(anyhow!("unbalanced '(' in parameter list"));
    }
    entries.push(current);

    let mut specs = Vec::new();
    for entry in entries {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }
        let (head, value) = match entry.rsplit_once('=') {
            Some((head, v)) => {
                let value: f64 = v
                    .trim()
                    .parse()
                    .map_err(|_| anyhow!("bad parameter value '{}' in '{}'", v.trim(), entry))?;
                (head.trim(), Some(value))
            }
            None => (entry, None),
        };
        let (name, args) = match head.split_once('(') {
            Some((name, tail)) => {
                let inner = tail
                    .strip_suffix(')')
                    .ok_or_else(|| anyhow!("missing ')' in parameter '{}'", entry))?;
                let args: Vec<String> = inner
                    .split(',')
                    .map(|a| a.trim().to_string())
                    .filter(|a| !a.is_empty())
                    .collect();
                (name.trim(), args)
            }
            None => (head, Vec::new()),
        };
        if name.is_empty() {
            return Err(anyhow!("empty parameter name in '{}'", entry));
        }
        specs.push(ParamSpec {
            name: name.to_string(),
            args,
            value,
        });
    }
    Ok(specs)
}

/// Configuration of the estimation driver.
#[derive(Debug, Clone)]
pub struct EstimConfig {
    pub aca_s: f64,
    pub aca_ee: f64,
    pub comp_c: f64,
    pub sampler_steps: usize,
    pub s_steps: usize,
    pub ee_steps: usize,
    pub ee_inner_steps: usize,
    pub output_all_steps: bool,

    pub use_ifd_sampler: bool,
    pub ifd_k: f64,
    pub use_tnt_sampler: bool,
    pub use_borisenko_update: bool,
    pub learning_rate: f64,
    pub min_theta: f64,
    pub min_theta_mean: f64,
    pub theta_sd_min: f64,

    pub use_conditional_estimation: bool,
    pub citation_ergm: bool,
    pub forbid_reciprocity: bool,
    pub allow_loops: bool,

    pub arclist_file: String,
    pub binattr_file: Option<String>,
    pub catattr_file: Option<String>,
    pub contattr_file: Option<String>,
    pub setattr_file: Option<String>,
    pub zone_file: Option<String>,
    pub term_file: Option<String>,

    pub theta_file_prefix: String,
    pub dza_file_prefix: String,
    pub sim_net_file_prefix: String,
    pub output_simulated_network: bool,

    pub seed: u64,
    pub num_tasks: usize,

    pub struct_params: Vec<ParamSpec>,
    pub attr_params: Vec<ParamSpec>,
    pub dyadic_params: Vec<ParamSpec>,
    pub attr_interaction_params: Vec<ParamSpec>,
}

impl EstimConfig {
    pub fn parse_file(path: &str) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("error opening config file {}", path))?;
        Self::parse_str(&text, path)
    }

    /// `base` is the config file path; data file names are resolved
    /// relative to its directory.
    pub fn parse_str(text: &str, base: &str) -> Result<Self> {
        let mut raw = RawConfig::parse_str(text)?;

        let use_ifd_sampler = raw.take_bool("useIFDsampler", false)?;
        let use_tnt_sampler = raw.take_bool("useTNTsampler", false)?;
        let use_borisenko_update = raw.take_bool("useBorisenkoUpdate", false)?;
        let use_conditional_estimation = raw.take_bool("useConditionalEstimation", false)?;
        let citation_ergm = raw.take_bool("citationERGM", false)?;
        let forbid_reciprocity = raw.take_bool("forbidReciprocity", false)?;
        let allow_loops = raw.take_bool("allowLoops", false)?;

        // option-compatibility matrix
        if use_ifd_sampler && use_tnt_sampler {
            return Err(anyhow!("cannot select both the IFD and the TNT sampler"));
        }
        if use_conditional_estimation && citation_ergm {
            return Err(anyhow!(
                "useConditionalEstimation and citationERGM are mutually exclusive"
            ));
        }
        let conditional = use_conditional_estimation || citation_ergm;
        if forbid_reciprocity && conditional {
            return Err(anyhow!(
                "forbidReciprocity cannot be combined with conditional estimation"
            ));
        }
        if allow_loops && conditional {
            return Err(anyhow!(
                "allowLoops cannot be combined with conditional estimation"
            ));
        }
        if use_tnt_sampler && (conditional || forbid_reciprocity || allow_loops) {
            return Err(anyhow!(
                "the TNT sampler supports only the plain unconstrained regime"
            ));
        }

        let arclist_file = raw
            .take_str("arclistFile")
            .ok_or_else(|| anyhow!("arclistFile is required"))?;
        let zone_file = raw.take_str("zoneFile");
        let term_file = raw.take_str("termFile");
        if use_conditional_estimation && zone_file.is_none() {
            return Err(anyhow!(
                "conditional estimation requested but no zoneFile specified"
            ));
        }
        if citation_ergm && term_file.is_none() {
            return Err(anyhow!("citationERGM requested but no termFile specified"));
        }

        let struct_params = raw.take_params("structParams")?;
        if use_ifd_sampler {
            // the IFD auxiliary parameter is the density coefficient
            if let Some(spec) = struct_params
                .iter()
                .find(|s| s.name.eq_ignore_ascii_case("Arc") || s.name.eq_ignore_ascii_case("Edge"))
            {
                return Err(anyhow!(
                    "cannot include the {} parameter when using the IFD sampler: \
                     either unset useIFDsampler or remove {} from structParams",
                    spec.name,
                    spec.name
                ));
            }
        }

        let resolve = |name: Option<String>| name.map(|f| sibling_path(base, &f));

        let config = EstimConfig {
            aca_s: raw.take_f64("ACA_S", DEFAULT_ACA_S)?,
            aca_ee: raw.take_f64("ACA_EE", DEFAULT_ACA_EE)?,
            comp_c: raw.take_f64("compC", DEFAULT_COMP_C)?,
            sampler_steps: raw.take_usize("samplerSteps", DEFAULT_SAMPLER_STEPS)?,
            s_steps: raw.take_usize("Ssteps", DEFAULT_S_STEPS)?,
            ee_steps: raw.take_usize("EEsteps", DEFAULT_EE_STEPS)?,
            ee_inner_steps: raw.take_usize("EEinnerSteps", DEFAULT_EE_INNER_STEPS)?,
            output_all_steps: raw.take_bool("outputAllSteps", false)?,
            use_ifd_sampler,
            ifd_k: raw.take_f64("ifd_K", DEFAULT_IFD_K)?,
            use_tnt_sampler,
            use_borisenko_update,
            learning_rate: raw.take_f64("learningRate", DEFAULT_LEARNING_RATE)?,
            min_theta: raw.take_f64("minTheta", DEFAULT_MIN_THETA)?,
            min_theta_mean: raw.take_f64("minThetaMean", DEFAULT_MIN_THETA_MEAN)?,
            theta_sd_min: raw.take_f64("thetaSdMin", DEFAULT_THETA_SD_MIN)?,
            use_conditional_estimation,
            citation_ergm,
            forbid_reciprocity,
            allow_loops,
            arclist_file: sibling_path(base, &arclist_file),
            binattr_file: resolve(raw.take_str("binattrFile")),
            catattr_file: resolve(raw.take_str("catattrFile")),
            contattr_file: resolve(raw.take_str("contattrFile")),
            setattr_file: resolve(raw.take_str("setattrFile")),
            zone_file: resolve(zone_file),
            term_file: resolve(term_file),
            theta_file_prefix: raw
                .take_str("thetaFilePrefix")
                .unwrap_or_else(|| "theta_values".to_string()),
            dza_file_prefix: raw
                .take_str("dzAFilePrefix")
                .unwrap_or_else(|| "dzA_values".to_string()),
            sim_net_file_prefix: raw
                .take_str("simNetFilePrefix")
                .unwrap_or_else(|| "sim".to_string()),
            output_simulated_network: raw.take_bool("outputSimulatedNetwork", false)?,
            seed: raw.take_u64("seed", 0)?,
            num_tasks: raw.take_usize("numTasks", 1)?,
            struct_params,
            attr_params: raw.take_params("attrParams")?,
            dyadic_params: raw.take_params("dyadicParams")?,
            attr_interaction_params: raw.take_params("attrInteractionParams")?,
        };

        // non-fatal: options that the selected algorithm ignores
        if !config.use_ifd_sampler && raw.is_set("ifd_K") {
            log::warn!("ifd_K is set but the IFD sampler is not selected");
        }
        if config.use_borisenko_update {
            if raw.is_set("ACA_EE") {
                log::warn!("ACA_EE is set but useBorisenkoUpdate is True so it is not used");
            }
            if raw.is_set("compC") {
                log::warn!("compC is set but useBorisenkoUpdate is True so it is not used");
            }
        } else {
            if raw.is_set("learningRate") {
                log::warn!("learningRate is set but useBorisenkoUpdate is not True");
            }
            if raw.is_set("minTheta") {
                log::warn!("minTheta is set but useBorisenkoUpdate is not True");
            }
        }

        raw.finish()?;
        if config.num_tasks == 0 {
            return Err(anyhow!("numTasks must be at least 1"));
        }
        Ok(config)
    }
}

/// Configuration of the simulation driver.
#[derive(Debug, Clone)]
pub struct SimConfig {
    pub num_nodes: Option<usize>,
    pub undirected: bool,
    pub sample_size: usize,
    pub interval: usize,
    pub burnin: usize,

    pub use_ifd_sampler: bool,
    pub ifd_k: f64,
    pub use_tnt_sampler: bool,
    pub use_conditional_estimation: bool,
    pub citation_ergm: bool,
    pub forbid_reciprocity: bool,
    pub allow_loops: bool,

    pub arclist_file: Option<String>,
    pub binattr_file: Option<String>,
    pub catattr_file: Option<String>,
    pub contattr_file: Option<String>,
    pub setattr_file: Option<String>,
    pub zone_file: Option<String>,
    pub term_file: Option<String>,

    pub stats_file_prefix: String,
    pub sim_net_file_prefix: String,
    pub output_simulated_network: bool,

    pub seed: u64,

    pub struct_params: Vec<ParamSpec>,
    pub attr_params: Vec<ParamSpec>,
    pub dyadic_params: Vec<ParamSpec>,
    pub attr_interaction_params: Vec<ParamSpec>,
}

impl SimConfig {
    pub fn parse_file(path: &str) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("error opening config file {}", path))?;
        Self::parse_str(&text, path)
    }

    pub fn parse_str(text: &str, base: &str) -> Result<Self> {
        let mut raw = RawConfig::parse_str(text)?;

        let use_ifd_sampler = raw.take_bool("useIFDsampler", false)?;
        let use_tnt_sampler = raw.take_bool("useTNTsampler", false)?;
        let use_conditional_estimation = raw.take_bool("useConditionalEstimation", false)?;
        let citation_ergm = raw.take_bool("citationERGM", false)?;
        let forbid_reciprocity = raw.take_bool("forbidReciprocity", false)?;
        let allow_loops = raw.take_bool("allowLoops", false)?;

        if use_ifd_sampler && use_tnt_sampler {
            return Err(anyhow!("cannot select both the IFD and the TNT sampler"));
        }
        if use_conditional_estimation && citation_ergm {
            return Err(anyhow!(
                "useConditionalEstimation and citationERGM are mutually exclusive"
            ));
        }
        let conditional = use_conditional_estimation || citation_ergm;
        if (forbid_reciprocity || allow_loops) && conditional {
            return Err(anyhow!(
                "forbidReciprocity / allowLoops cannot be combined with conditional simulation"
            ));
        }
        if use_tnt_sampler && (conditional || forbid_reciprocity || allow_loops) {
            return Err(anyhow!(
                "the TNT sampler supports only the plain unconstrained regime"
            ));
        }

        let num_nodes = match raw.take_str("numNodes") {
            Some(v) => Some(
                v.parse::<usize>()
                    .map_err(|_| anyhow!("bad integer value '{}' for 'numNodes'", v))?,
            ),
            None => None,
        };
        let arclist_file = raw.take_str("arclistFile");
        if num_nodes.is_none() && arclist_file.is_none() {
            return Err(anyhow!("either numNodes or arclistFile is required"));
        }
        let zone_file = raw.take_str("zoneFile");
        let term_file = raw.take_str("termFile");
        if use_conditional_estimation && zone_file.is_none() {
            return Err(anyhow!(
                "conditional simulation requested but no zoneFile specified"
            ));
        }
        if citation_ergm && term_file.is_none() {
            return Err(anyhow!("citationERGM requested but no termFile specified"));
        }

        let resolve = |name: Option<String>| name.map(|f| sibling_path(base, &f));

        let config = SimConfig {
            num_nodes,
            undirected: raw.take_bool("undirected", false)?,
            sample_size: raw.take_usize("sampleSize", 100)?,
            interval: raw.take_usize("interval", DEFAULT_SAMPLER_STEPS)?,
            burnin: raw.take_usize("burnin", 10_000)?,
            use_ifd_sampler,
            ifd_k: raw.take_f64("ifd_K", DEFAULT_IFD_K)?,
            use_tnt_sampler,
            use_conditional_estimation,
            citation_ergm,
            forbid_reciprocity,
            allow_loops,
            arclist_file: resolve(arclist_file),
            binattr_file: resolve(raw.take_str("binattrFile")),
            catattr_file: resolve(raw.take_str("catattrFile")),
            contattr_file: resolve(raw.take_str("contattrFile")),
            setattr_file: resolve(raw.take_str("setattrFile")),
            zone_file: resolve(zone_file),
            term_file: resolve(term_file),
            stats_file_prefix: raw
                .take_str("statsFilePrefix")
                .unwrap_or_else(|| "stats_sim".to_string()),
            sim_net_file_prefix: raw
                .take_str("simNetFilePrefix")
                .unwrap_or_else(|| "simnet".to_string()),
            output_simulated_network: raw.take_bool("outputSimulatedNetwork", false)?,
            seed: raw.take_u64("seed", 0)?,
            struct_params: raw.take_params("structParams")?,
            attr_params: raw.take_params("attrParams")?,
            dyadic_params: raw.take_params("dyadicParams")?,
            attr_interaction_params: raw.take_params("attrInteractionParams")?,
        };

        if !config.use_ifd_sampler && raw.is_set("ifd_K") {
            log::warn!("ifd_K is set but the IFD sampler is not selected");
        }
        raw.finish()?;
        if config.use_ifd_sampler {
            if let Some(spec) = config
                .struct_params
                .iter()
                .find(|s| s.name.eq_ignore_ascii_case("Arc") || s.name.eq_ignore_ascii_case("Edge"))
            {
                return Err(anyhow!(
                    "cannot include the {} parameter when using the IFD sampler",
                    spec.name
                ));
            }
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = "arclistFile = net.txt\n";

    #[test]
    fn test_minimal_config_defaults() {
        let cfg = EstimConfig::parse_str(MINIMAL, "cfg/estim.txt").unwrap();
        assert_eq!(cfg.arclist_file, "cfg/net.txt");
        assert_eq!(cfg.aca_s, DEFAULT_ACA_S);
        assert_eq!(cfg.sampler_steps, DEFAULT_SAMPLER_STEPS);
        assert_eq!(cfg.num_tasks, 1);
        assert!(!cfg.use_ifd_sampler);
        assert!(cfg.struct_params.is_empty());
    }

    #[test]
    fn test_full_config_round_trip() {
        let text = "\
# estimation settings
ACA_S = 0.5
EEsteps = 200   # outer iterations
useIFDsampler = True
ifd_K = 0.2
arclistFile = net.txt
zoneFile = zones.txt
useConditionalEstimation = True
structParams = {Reciprocity, AltInStars(2.0),
                AltOutStars(5)}
attrParams = {Sender(gender), Matching(region)}
dyadicParams = {GeoDistance(lat, lon)}
attrInteractionParams = {MatchingInteraction(region, class)}
";
        let cfg = EstimConfig::parse_str(text, "estim.txt").unwrap();
        assert_eq!(cfg.aca_s, 0.5);
        assert_eq!(cfg.ee_steps, 200);
        assert!(cfg.use_ifd_sampler);
        assert_eq!(cfg.ifd_k, 0.2);
        assert_eq!(
            cfg.struct_params,
            vec![
                ParamSpec {
                    name: "Reciprocity".into(),
                    args: vec![],
                    value: None
                },
                ParamSpec {
                    name: "AltInStars".into(),
                    args: vec!["2.0".into()],
                    value: None
                },
                ParamSpec {
                    name: "AltOutStars".into(),
                    args: vec!["5".into()],
                    value: None
                },
            ]
        );
        assert_eq!(cfg.attr_params[1].args, vec!["region".to_string()]);
        assert_eq!(
            cfg.dyadic_params[0].args,
            vec!["lat".to_string(), "lon".to_string()]
        );
        assert_eq!(cfg.attr_interaction_params.len(), 1);
    }

    #[test]
    fn test_unknown_keyword_rejected() {
        let err = EstimConfig::parse_str("arclistFile = x\nnoSuchOption = 1\n", "c").unwrap_err();
        assert!(err.to_string().contains("noSuchOption"), "{}", err);
    }

    #[test]
    fn test_duplicate_keyword_rejected() {
        assert!(EstimConfig::parse_str("arclistFile = x\nARCLISTFILE = y\n", "c").is_err());
    }

    #[test]
    fn test_bad_types_rejected() {
        assert!(EstimConfig::parse_str("arclistFile = x\nACA_S = fast\n", "c").is_err());
        assert!(EstimConfig::parse_str("arclistFile = x\nEEsteps = 1.5\n", "c").is_err());
        assert!(EstimConfig::parse_str("arclistFile = x\nuseIFDsampler = yes\n", "c").is_err());
    }

    #[test]
    fn test_contradictory_options_rejected() {
        let base = "arclistFile = x\n";
        for extra in [
            "useIFDsampler = True\nuseTNTsampler = True\n",
            "useConditionalEstimation = True\ncitationERGM = True\nzoneFile = z\ntermFile = t\n",
            "useConditionalEstimation = True\n", // no zoneFile
            "citationERGM = True\n",             // no termFile
            "useConditionalEstimation = True\nzoneFile = z\nforbidReciprocity = True\n",
            "citationERGM = True\ntermFile = t\nallowLoops = True\n",
            "useTNTsampler = True\nforbidReciprocity = True\n",
            "useIFDsampler = True\nstructParams = {Arc, Reciprocity}\n",
        ] {
            let text = format!("{}{}", base, extra);
            assert!(
                EstimConfig::parse_str(&text, "c").is_err(),
                "accepted: {}",
                extra
            );
        }
    }

    #[test]
    fn test_sim_config_values() {
        let text = "\
numNodes = 50
sampleSize = 10
interval = 500
structParams = {Arc = -4.0, Reciprocity = 1.25}
";
        let cfg = SimConfig::parse_str(text, "sim.txt").unwrap();
        assert_eq!(cfg.num_nodes, Some(50));
        assert_eq!(cfg.sample_size, 10);
        assert_eq!(cfg.struct_params[0].value, Some(-4.0));
        assert_eq!(cfg.struct_params[1].value, Some(1.25));
    }

    #[test]
    fn test_sim_requires_nodes_or_arclist() {
        assert!(SimConfig::parse_str("sampleSize = 5\n", "c").is_err());
        assert!(SimConfig::parse_str("arclistFile = net.txt\n", "c").is_ok());
    }

    #[test]
    fn test_param_list_with_lambda_and_value() {
        let specs = parse_param_list("AltKTrianglesT(3.0) = 0.5, Arc = -2").unwrap();
        assert_eq!(specs[0].name, "AltKTrianglesT");
        assert_eq!(specs[0].args, vec!["3.0".to_string()]);
        assert_eq!(specs[0].value, Some(0.5));
        assert_eq!(specs[1].value, Some(-2.0));
    }
}
