//! Configuration command handler.
//!
//! Prints the resolved run configuration with the layer each value came
//! from (`default`, `file`, `env` or `cli`).
//!
//! # Example Output
//!
//! ```json
//! {
//!   "games": {
//!     "value": 10,
//!     "source": "default"
//!   },
//!   "ante": {
//!     "value": 5,
//!     "source": "env"
//!   },
//!   ...
//! }
//! ```

use std::io::Write;
use std::path::Path;

use crate::config::{self, ConfigResolved, Overrides};
use crate::error::CliError;

/// Handle the cfg command.
///
/// # Errors
///
/// Returns `CliError::Config` if configuration loading fails.
/// Returns `CliError::Io` if writing to output stream fails.
pub fn handle_cfg_command(
    config_path: Option<&Path>,
    out: &mut dyn Write,
    env: &dyn Fn(&str) -> Option<String>,
) -> Result<(), CliError> {
    let resolved = config::load_with_sources(config_path, env, &Overrides::default())?;

    let ConfigResolved {
        config,
        sources,
        file,
    } = resolved;
    let display = serde_json::json!({
        "config_file": file.map(|p| p.display().to_string()),
        "games": { "value": config.games, "source": sources.games },
        "seed": { "value": config.seed, "source": sources.seed },
        "agents": { "value": config.agents, "source": sources.agents },
        "initial_funds": { "value": config.initial_funds, "source": sources.initial_funds },
        "min_bet": { "value": config.min_bet, "source": sources.min_bet },
        "ante": { "value": config.ante, "source": sources.ante },
        "max_raises": { "value": config.max_raises, "source": sources.max_raises },
        "max_discards": { "value": config.max_discards, "source": sources.max_discards },
        "log_format": { "value": config.log_format, "source": sources.log_format },
    });
    let json_str = serde_json::to_string_pretty(&display).map_err(std::io::Error::other)?;
    writeln!(out, "{}", json_str)?;
    Ok(())
}
