//! Builds seats from agent specs.

use std::path::PathBuf;

use fivedraw_ai::cache::DecisionCache;
use fivedraw_ai::heuristic::HeuristicAgent;
use fivedraw_ai::model::{ModelAgent, DEFAULT_MODEL};
use fivedraw_ai::random::RandomAgent;
use fivedraw_engine::agent::Agent;
use fivedraw_engine::player::{Controller, Seat};

use crate::error::CliError;
use crate::validation::{AgentKind, AgentSpec};

/// Settings shared by every `model` seat.
#[derive(Debug, Clone)]
pub struct ModelOptions {
    pub model: String,
    /// Decision cache file; in memory when absent
    pub cache: Option<PathBuf>,
}

impl Default for ModelOptions {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            cache: None,
        }
    }
}

pub fn build_agent(spec: &AgentSpec, opts: &ModelOptions) -> Result<Box<dyn Agent>, CliError> {
    let agent: Box<dyn Agent> = match spec.kind {
        AgentKind::Random => Box::new(RandomAgent::new()),
        AgentKind::Heuristic => Box::new(HeuristicAgent::new()),
        AgentKind::Model => {
            let cache = match &opts.cache {
                Some(path) => DecisionCache::load(path).map_err(|e| {
                    CliError::Config(format!("cannot load cache {}: {}", path.display(), e))
                })?,
                None => DecisionCache::in_memory(),
            };
            // no transport is bundled: decisions come from the cache or the fallbacks
            Box::new(
                ModelAgent::new(opts.model.clone())
                    .with_cache(cache)
                    .with_bet_mode(spec.bet_mode),
            )
        }
    };
    Ok(agent)
}

/// One seat per spec, ids in spec order.
pub fn build_seats(specs: &[AgentSpec], funds: &[u32], opts: &ModelOptions) -> Result<Vec<Seat>, CliError> {
    specs
        .iter()
        .zip(funds)
        .enumerate()
        .map(|(id, (spec, &stack))| {
            let agent = build_agent(spec, opts)?;
            Ok(Seat::new(id, spec.name.clone(), Controller::Agent(agent), stack))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::parse_agent_specs;

    #[test]
    fn seats_follow_spec_order() {
        let specs = parse_agent_specs("A:random,B:heuristic,C:model").unwrap();
        let seats = build_seats(&specs, &[10, 20, 30], &ModelOptions::default()).unwrap();
        let names: Vec<_> = seats.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
        assert_eq!(seats[2].stack, 30);
        match &seats[2].controller {
            Controller::Agent(a) => assert_eq!(a.name(), "ModelAgent"),
            Controller::External => panic!("expected an agent"),
        }
    }
}
