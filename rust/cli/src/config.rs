//! Layered run configuration.
//!
//! Values resolve from built-in defaults, then a TOML file (`--config` or
//! `FIVEDRAW_CONFIG`), then `FIVEDRAW_*` environment variables, then explicit
//! command-line flags. Every value remembers which layer set it so `cfg` can
//! report it.

use std::fmt;
use std::path::{Path, PathBuf};

use fivedraw_engine::logger::LogFormat;
use fivedraw_engine::rules::DecisionRules;
use serde::{Deserialize, Serialize};

use crate::io_utils::read_text;
use crate::validation::{parse_agent_specs, AgentSpec};

pub const DEFAULT_AGENTS: &str = "Random:random,Heuristic:heuristic";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub games: u64,
    pub seed: Option<u64>,
    /// Agent specs, `name:kind[:bet_mode]` comma separated
    pub agents: String,
    pub initial_funds: u32,
    pub min_bet: u32,
    pub ante: u32,
    pub max_raises: u32,
    pub max_discards: usize,
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        let rules = DecisionRules::default();
        Self {
            games: 10,
            seed: None,
            agents: DEFAULT_AGENTS.into(),
            initial_funds: 500,
            min_bet: rules.min_bet,
            ante: rules.ante,
            max_raises: rules.max_raises,
            max_discards: rules.max_discards,
            log_format: LogFormat::Jsonl,
        }
    }
}

impl Config {
    pub fn rules(&self) -> DecisionRules {
        DecisionRules {
            max_discards: self.max_discards,
            min_bet: self.min_bet,
            ante: self.ante,
            max_raises: self.max_raises,
        }
    }

    pub fn agent_specs(&self) -> Result<Vec<AgentSpec>, ConfigError> {
        parse_agent_specs(&self.agents).map_err(ConfigError::Invalid)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    Default,
    File,
    Env,
    Cli,
}

#[derive(Debug, Clone, Copy)]
pub struct ConfigSources {
    pub games: ValueSource,
    pub seed: ValueSource,
    pub agents: ValueSource,
    pub initial_funds: ValueSource,
    pub min_bet: ValueSource,
    pub ante: ValueSource,
    pub max_raises: ValueSource,
    pub max_discards: ValueSource,
    pub log_format: ValueSource,
}

impl Default for ConfigSources {
    fn default() -> Self {
        Self {
            games: ValueSource::Default,
            seed: ValueSource::Default,
            agents: ValueSource::Default,
            initial_funds: ValueSource::Default,
            min_bet: ValueSource::Default,
            ante: ValueSource::Default,
            max_raises: ValueSource::Default,
            max_discards: ValueSource::Default,
            log_format: ValueSource::Default,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigResolved {
    pub config: Config,
    pub sources: ConfigSources,
    /// File the values came from, if any
    pub file: Option<PathBuf>,
}

/// Explicit command-line values; `None` leaves the lower layers in place.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub games: Option<u64>,
    pub seed: Option<u64>,
    pub agents: Option<String>,
    pub initial_funds: Option<u32>,
    pub min_bet: Option<u32>,
    pub ante: Option<u32>,
    pub max_raises: Option<u32>,
    pub max_discards: Option<usize>,
    pub log_format: Option<LogFormat>,
}

#[derive(Debug)]
pub enum ConfigError {
    Io(PathBuf, String),
    Parse(toml::de::Error),
    Invalid(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(path, e) => write!(f, "cannot read {}: {}", path.display(), e),
            ConfigError::Parse(e) => write!(f, "invalid TOML: {}", e),
            ConfigError::Invalid(msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    #[serde(default)]
    games: Option<u64>,
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default)]
    agents: Option<String>,
    #[serde(default)]
    initial_funds: Option<u32>,
    #[serde(default)]
    min_bet: Option<u32>,
    #[serde(default)]
    ante: Option<u32>,
    #[serde(default)]
    max_raises: Option<u32>,
    #[serde(default)]
    max_discards: Option<usize>,
    #[serde(default)]
    log_format: Option<String>,
}

/// Resolves defaults, file and environment. `env` looks up a variable by
/// name; [`crate::run`] passes the process environment.
pub fn load_with_sources(
    config_path: Option<&Path>,
    env: &dyn Fn(&str) -> Option<String>,
    overrides: &Overrides,
) -> Result<ConfigResolved, ConfigError> {
    let mut cfg = Config::default();
    let mut sources = ConfigSources::default();

    let file = config_path
        .map(Path::to_path_buf)
        .or_else(|| env("FIVEDRAW_CONFIG").filter(|p| !p.is_empty()).map(PathBuf::from));

    if let Some(path) = &file {
        let text = read_text(path).map_err(|e| ConfigError::Io(path.clone(), e.to_string()))?;
        let f: FileConfig = toml::from_str(&text)?;
        apply_file(&mut cfg, &mut sources, f)?;
    }

    apply_env(&mut cfg, &mut sources, env)?;
    apply_overrides(&mut cfg, &mut sources, overrides);

    validate(&cfg)?;
    Ok(ConfigResolved {
        config: cfg,
        sources,
        file,
    })
}

fn apply_file(cfg: &mut Config, sources: &mut ConfigSources, f: FileConfig) -> Result<(), ConfigError> {
    if let Some(v) = f.games {
        cfg.games = v;
        sources.games = ValueSource::File;
    }
    if let Some(v) = f.seed {
        cfg.seed = Some(v);
        sources.seed = ValueSource::File;
    }
    if let Some(v) = f.agents {
        cfg.agents = v;
        sources.agents = ValueSource::File;
    }
    if let Some(v) = f.initial_funds {
        cfg.initial_funds = v;
        sources.initial_funds = ValueSource::File;
    }
    if let Some(v) = f.min_bet {
        cfg.min_bet = v;
        sources.min_bet = ValueSource::File;
    }
    if let Some(v) = f.ante {
        cfg.ante = v;
        sources.ante = ValueSource::File;
    }
    if let Some(v) = f.max_raises {
        cfg.max_raises = v;
        sources.max_raises = ValueSource::File;
    }
    if let Some(v) = f.max_discards {
        cfg.max_discards = v;
        sources.max_discards = ValueSource::File;
    }
    if let Some(v) = f.log_format {
        cfg.log_format = v.parse().map_err(ConfigError::Invalid)?;
        sources.log_format = ValueSource::File;
    }
    Ok(())
}

fn env_value<T: std::str::FromStr>(
    env: &dyn Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<T>, ConfigError> {
    match env(key) {
        Some(v) if !v.trim().is_empty() => v
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid(format!("Invalid {}: {}", key, v))),
        _ => Ok(None),
    }
}

fn apply_env(
    cfg: &mut Config,
    sources: &mut ConfigSources,
    env: &dyn Fn(&str) -> Option<String>,
) -> Result<(), ConfigError> {
    if let Some(v) = env_value(env, "FIVEDRAW_SEED")? {
        cfg.seed = Some(v);
        sources.seed = ValueSource::Env;
    }
    if let Some(v) = env_value(env, "FIVEDRAW_MIN_BET")? {
        cfg.min_bet = v;
        sources.min_bet = ValueSource::Env;
    }
    if let Some(v) = env_value(env, "FIVEDRAW_ANTE")? {
        cfg.ante = v;
        sources.ante = ValueSource::Env;
    }
    if let Some(v) = env_value(env, "FIVEDRAW_MAX_RAISES")? {
        cfg.max_raises = v;
        sources.max_raises = ValueSource::Env;
    }
    if let Some(v) = env_value(env, "FIVEDRAW_MAX_DISCARDS")? {
        cfg.max_discards = v;
        sources.max_discards = ValueSource::Env;
    }
    Ok(())
}

fn apply_overrides(cfg: &mut Config, sources: &mut ConfigSources, o: &Overrides) {
    if let Some(v) = o.games {
        cfg.games = v;
        sources.games = ValueSource::Cli;
    }
    if let Some(v) = o.seed {
        cfg.seed = Some(v);
        sources.seed = ValueSource::Cli;
    }
    if let Some(v) = &o.agents {
        cfg.agents = v.clone();
        sources.agents = ValueSource::Cli;
    }
    if let Some(v) = o.initial_funds {
        cfg.initial_funds = v;
        sources.initial_funds = ValueSource::Cli;
    }
    if let Some(v) = o.min_bet {
        cfg.min_bet = v;
        sources.min_bet = ValueSource::Cli;
    }
    if let Some(v) = o.ante {
        cfg.ante = v;
        sources.ante = ValueSource::Cli;
    }
    if let Some(v) = o.max_raises {
        cfg.max_raises = v;
        sources.max_raises = ValueSource::Cli;
    }
    if let Some(v) = o.max_discards {
        cfg.max_discards = v;
        sources.max_discards = ValueSource::Cli;
    }
    if let Some(v) = o.log_format {
        cfg.log_format = v;
        sources.log_format = ValueSource::Cli;
    }
}

fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if cfg.games == 0 {
        return Err(ConfigError::Invalid(
            "Invalid configuration: games must be >= 1".into(),
        ));
    }
    if cfg.initial_funds == 0 {
        return Err(ConfigError::Invalid(
            "Invalid configuration: initial_funds must be > 0".into(),
        ));
    }
    let rules = cfg.rules();
    rules
        .validate()
        .map_err(|e| ConfigError::Invalid(format!("Invalid configuration: {}", e)))?;
    let specs = cfg.agent_specs()?;
    let max_seats = rules.seat_capacity();
    if specs.len() < 2 || specs.len() > max_seats {
        return Err(ConfigError::Invalid(format!(
            "Invalid configuration: between 2 and {} agents required with max_discards {}, got {}",
            max_seats,
            rules.max_discards,
            specs.len()
        )));
    }
    let total = u64::from(cfg.initial_funds) * specs.len() as u64;
    if total > u64::from(u32::MAX) {
        return Err(ConfigError::Invalid(format!(
            "Invalid configuration: {} agents with initial_funds {} exceed the chip limit",
            specs.len(),
            cfg.initial_funds
        )));
    }
    Ok(())
}
