//! Configuration loading for ARC experiments.
//!
//! The canonical configuration lives in `arc-config.yaml` at the project
//! root. Simulation, scenario, controller, and metrics constants are flat
//! top-level keys collected into a [`ParamMap`]; the experiment layout
//! (`seeds`, `scenarios`, `controllers`, `sweep`) sits beside them as typed
//! fields. Every key absent from the file falls back to [`default_params`].

use std::path::Path;

use arc_control::ControllerKind;
use arc_metrics::MetricsParams;
use arc_scenarios::{Scenario, ScenarioError, ScenarioParams};
use arc_sim::SimParams;
use arc_types::{ParamError, ParamMap};
use serde::{Deserialize, Serialize};

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A parameter is missing or out of range after defaults are applied.
    #[error("invalid parameter: {source}")]
    Param {
        /// The underlying parameter error.
        #[from]
        source: ParamError,
    },

    /// A listed scenario does not exist.
    #[error("invalid scenario selection: {source}")]
    Scenario {
        /// The underlying scenario error.
        #[from]
        source: ScenarioError,
    },

    /// The seed list is empty.
    #[error("config lists no seeds")]
    NoSeeds,
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// The complete default parameter mapping.
///
/// Matches the shipped `arc-config.yaml`.
pub fn default_params() -> ParamMap {
    [
        // Initial state
        ("phi0", 0.85),
        ("g0", 0.85),
        ("p0", 0.85),
        ("i0", 0.85),
        ("s0", 0.25),
        ("v0", 0.5),
        ("a0", 0.3),
        ("mf0", 0.2),
        ("ms0", 0.2),
        // Attention and precision
        ("k_u_att", 0.6),
        ("k_i_att", 0.08),
        ("mu_i", 0.1),
        ("k_i_u", 0.05),
        ("k_p_pe", 0.15),
        ("k_p_u", 0.1),
        ("k_p_i", 0.06),
        ("mu_p", 0.1),
        // Gain and integration
        ("k_g_i", 0.04),
        ("k_g_p", 0.04),
        ("k_g_u", 0.08),
        ("k_g_a", 0.15),
        ("mu_g", 0.1),
        ("k_phi_gp", 0.06),
        ("mu_phi", 0.1),
        // Narrative and arousal
        ("k_s_u", 0.12),
        ("k_s_pe", 0.1),
        ("mu_s", 0.15),
        ("k_s_dmg", 0.2),
        ("k_a_pe", 0.12),
        ("k_a_u", 0.1),
        ("k_a_s", 0.15),
        ("mu_a", 0.15),
        ("k_a_calm", 0.25),
        // Valence
        ("k_v_r", 0.1),
        ("k_v_pe", 0.05),
        ("k_v_u", 0.05),
        ("mu_v", 0.1),
        ("k_v_reapp", 0.1),
        // Memory
        ("w_mem_pe", 0.4),
        ("w_mem_a", 0.3),
        ("w_mem_v", 0.3),
        ("eta0", 0.2),
        ("k_eta_a", 1.0),
        ("mu_mf", 0.05),
        ("k_ms", 0.02),
        ("mu_ms", 0.02),
        // Performance
        ("omega_s", 0.2),
        ("perf_bias", 0.1),
        ("perf_gain", 0.95),
        ("w_u", 0.2),
        ("w_a", 0.5),
        ("w_s", 0.5),
        // Thresholds
        ("a_safe", 0.6),
        ("s_safe", 0.55),
        ("s_rum_tau", 0.6),
        // Controller gains
        ("arc_w_u", 0.4),
        ("arc_w_a", 0.3),
        ("arc_w_s", 0.35),
        ("arc_k_dmg", 0.95),
        ("arc_k_att", 0.75),
        ("arc_k_mem_block", 0.8),
        ("arc_k_calm", 0.85),
        ("arc_k_reapp", 0.5),
        ("pid_k_p", 1.0),
        ("pid_k_i", 0.05),
        ("pid_k_d", 0.1),
        ("pid_i_limit", 2.0),
        ("lqi_s_tau", 0.45),
        // Metrics
        ("baseline_window", 20.0),
        ("rt_eps", 0.05),
        ("rt_a_eps", 0.05),
        ("rt_max", 100.0),
        ("ri_persistence_weight", 1.0),
        // Scenario
        ("horizon", 160.0),
        ("shock_t", 50.0),
        ("u_base", 0.2),
        ("u_shock", 0.8),
        ("pe_base", 0.1),
        ("pe_noise", 0.1),
        ("burst_len", 20.0),
    ]
    .into_iter()
    .collect()
}

/// An experiment: parameters plus the run matrix to execute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentConfig {
    /// Unique identifier, generated when the file does not name one.
    #[serde(default = "default_experiment_id")]
    pub experiment_id: String,

    /// Human-readable experiment name.
    #[serde(default)]
    pub name: String,

    /// Seeds run for every (scenario, controller) pair.
    #[serde(default = "default_seeds")]
    pub seeds: Vec<u64>,

    /// Scenario names to run; the whole catalog when absent.
    #[serde(default)]
    pub scenarios: Option<Vec<String>>,

    /// Controllers to run; the comparison set when absent.
    #[serde(default)]
    pub controllers: Option<Vec<ControllerKind>>,

    /// Threshold sensitivity sweep layout.
    #[serde(default)]
    pub sweep: SweepConfig,

    /// Flat simulation, scenario, controller, and metrics constants.
    #[serde(flatten)]
    pub params: ParamMap,
}

/// Grid for the `(a_safe, s_safe)` sensitivity sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepConfig {
    /// Arousal thresholds to try.
    #[serde(default = "default_sweep_grid")]
    pub a_safe: Vec<f64>,

    /// Narrative thresholds to try.
    #[serde(default = "default_sweep_grid")]
    pub s_safe: Vec<f64>,

    /// Scenario run at every grid point.
    #[serde(default = "default_sweep_scenario")]
    pub scenario: String,

    /// Controller run at every grid point.
    #[serde(default = "default_sweep_controller")]
    pub controller: ControllerKind,

    /// How many of the experiment's seeds each grid point uses.
    #[serde(default = "default_sweep_seeds")]
    pub seeds: usize,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            a_safe: default_sweep_grid(),
            s_safe: default_sweep_grid(),
            scenario: default_sweep_scenario(),
            controller: default_sweep_controller(),
            seeds: default_sweep_seeds(),
        }
    }
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            experiment_id: default_experiment_id(),
            name: String::new(),
            seeds: default_seeds(),
            scenarios: None,
            controllers: None,
            sweep: SweepConfig::default(),
            params: default_params(),
        }
    }
}

impl ExperimentConfig {
    /// Load experiment config from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or any error
    /// [`ExperimentConfig::parse`] reports.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse experiment config from a YAML string.
    ///
    /// Defaults are merged under the file's values and the result is
    /// validated: every typed parameter view must build and every listed
    /// scenario must exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML,
    /// [`ConfigError::Param`] or [`ConfigError::Scenario`] if validation
    /// fails, or [`ConfigError::NoSeeds`] for an empty seed list.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yml::from_str(yaml)?;
        let mut params = default_params();
        params.merge(&config.params);
        config.params = params;
        config.validate()?;
        Ok(config)
    }

    /// Check that a run built from this config cannot fail on parameters.
    ///
    /// # Errors
    ///
    /// See [`ExperimentConfig::parse`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.seeds.is_empty() {
            return Err(ConfigError::NoSeeds);
        }
        SimParams::from_map(&self.params)?;
        MetricsParams::from_map(&self.params)?;
        self.build_scenarios()?;
        Ok(())
    }

    /// The scenarios this experiment runs, in listed or catalog order.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError`] for an unknown name or a missing scenario
    /// key.
    pub fn build_scenarios(&self) -> Result<Vec<Scenario>, ScenarioError> {
        match &self.scenarios {
            Some(names) => names
                .iter()
                .map(|name| arc_scenarios::find(name, &self.params))
                .collect(),
            None => Ok(arc_scenarios::build_scenarios(&ScenarioParams::from_map(
                &self.params,
            )?)),
        }
    }

    /// The controllers this experiment runs.
    pub fn controller_set(&self) -> Vec<ControllerKind> {
        self.controllers
            .clone()
            .unwrap_or_else(|| ControllerKind::COMPARISON.to_vec())
    }
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

fn default_experiment_id() -> String {
    uuid::Uuid::now_v7().to_string()
}

fn default_seeds() -> Vec<u64> {
    (1..=10).collect()
}

fn default_sweep_grid() -> Vec<f64> {
    vec![0.4, 0.5, 0.6, 0.7, 0.8]
}

fn default_sweep_scenario() -> String {
    "reward_flip".to_owned()
}

const fn default_sweep_controller() -> ControllerKind {
    ControllerKind::ArcV1
}

const fn default_sweep_seeds() -> usize {
    5
}
