use clap::ValueEnum;
use serde::Deserialize;

const DEFAULT_CYCLE_LIMIT: u64 = 1000;

/// Trace emission mode.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SimMode {
    /// Dump every stage, every cycle.
    Display,
    /// No per-cycle output.
    Silent,
}

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            pipeline: PipelineConfig::default(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_mode")]
    pub mode: SimMode,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            mode: default_mode(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PipelineConfig {
    /// Resolve data hazards through the bypass network instead of
    /// scoreboard stalls alone.
    #[serde(default)]
    pub forwarding: bool,

    /// Hard cycle budget; the simulation stops when it is reached.
    #[serde(default = "default_cycle_limit")]
    pub cycle_limit: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            forwarding: false,
            cycle_limit: default_cycle_limit(),
        }
    }
}

fn default_mode() -> SimMode {
    SimMode::Silent
}

fn default_cycle_limit() -> u64 {
    DEFAULT_CYCLE_LIMIT
}
