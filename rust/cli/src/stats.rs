//! Run statistics for `sim`.

use std::collections::BTreeMap;
use std::io::Write;

use fivedraw_engine::agent::AgentMetrics;
use fivedraw_engine::logger::GameResult;
use fivedraw_engine::player::{Controller, Seat};
use serde::Serialize;

#[derive(Debug, Clone)]
struct SeatTally {
    name: String,
    agent: String,
    wins: u64,
    folds: u64,
    discards: u64,
    fallbacks: u64,
    initial_bankroll: u32,
    bankroll: u32,
}

/// Accumulates per-game results into a run summary.
#[derive(Debug, Clone)]
pub struct StatsCollector {
    total_games: u64,
    games_played: u64,
    split_pots: u64,
    total_pot: u64,
    seats: BTreeMap<usize, SeatTally>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SeatSummary {
    pub player_id: usize,
    pub name: String,
    pub agent: String,
    pub wins: u64,
    pub win_rate: f64,
    pub folds: u64,
    pub fold_rate: f64,
    pub avg_discards: f64,
    pub fallbacks: u64,
    pub initial_bankroll: u32,
    pub bankroll: u32,
    pub bankroll_change: i64,
    pub metrics: Option<AgentMetrics>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SimSummary {
    pub seed: u64,
    pub total_games: u64,
    pub games_played: u64,
    pub split_pots: u64,
    pub total_pot: u64,
    pub players: Vec<SeatSummary>,
}

fn controller_name(controller: &Controller) -> String {
    match controller {
        Controller::Agent(agent) => agent.name().to_string(),
        Controller::External => "external".to_string(),
    }
}

impl StatsCollector {
    pub fn new(seats: &[Seat]) -> Self {
        let seats = seats
            .iter()
            .map(|s| {
                (
                    s.id,
                    SeatTally {
                        name: s.name.clone(),
                        agent: controller_name(&s.controller),
                        wins: 0,
                        folds: 0,
                        discards: 0,
                        fallbacks: 0,
                        initial_bankroll: s.stack,
                        bankroll: s.stack,
                    },
                )
            })
            .collect();
        Self {
            total_games: 0,
            games_played: 0,
            split_pots: 0,
            total_pot: 0,
            seats,
        }
    }

    pub fn record(&mut self, result: &GameResult) {
        self.total_games += 1;
        for (id, &bankroll) in &result.bankrolls {
            if let Some(t) = self.seats.get_mut(id) {
                t.bankroll = bankroll;
            }
        }
        if result.is_idle() {
            return;
        }
        self.games_played += 1;
        self.total_pot += u64::from(result.pot);
        if result.is_split() {
            self.split_pots += 1;
        }
        for w in &result.winners {
            if let Some(t) = self.seats.get_mut(w) {
                t.wins += 1;
            }
        }
        for p in &result.players {
            if let Some(t) = self.seats.get_mut(&p.player_id) {
                if p.folded {
                    t.folds += 1;
                }
                t.discards += p.discard_indices.len() as u64;
                t.fallbacks += u64::from(p.fallbacks);
            }
        }
    }

    pub fn games_played(&self) -> u64 {
        self.games_played
    }

    /// `metrics` holds whatever agents reported, by seat id.
    pub fn summary(&self, seed: u64, metrics: &BTreeMap<usize, AgentMetrics>) -> SimSummary {
        let playable = self.games_played.max(1) as f64;
        let players = self
            .seats
            .iter()
            .map(|(&id, t)| SeatSummary {
                player_id: id,
                name: t.name.clone(),
                agent: t.agent.clone(),
                wins: t.wins,
                win_rate: t.wins as f64 / playable,
                folds: t.folds,
                fold_rate: t.folds as f64 / playable,
                avg_discards: t.discards as f64 / playable,
                fallbacks: t.fallbacks,
                initial_bankroll: t.initial_bankroll,
                bankroll: t.bankroll,
                bankroll_change: i64::from(t.bankroll) - i64::from(t.initial_bankroll),
                metrics: metrics.get(&id).copied(),
            })
            .collect();
        SimSummary {
            seed,
            total_games: self.total_games,
            games_played: self.games_played,
            split_pots: self.split_pots,
            total_pot: self.total_pot,
            players,
        }
    }
}

impl SimSummary {
    pub fn write_text(&self, out: &mut dyn Write) -> std::io::Result<()> {
        writeln!(out, "{}", "=".repeat(60))?;
        writeln!(
            out,
            "Games: {} | Played: {} | Split pots: {} | Total pot: {}",
            self.total_games, self.games_played, self.split_pots, self.total_pot
        )?;
        for p in &self.players {
            writeln!(
                out,
                "  {} (#{} {}): wins {} ({:.1}%), folds {} ({:.1}%), avg discards {:.2}, bankroll {} -> {} ({:+})",
                p.name,
                p.player_id,
                p.agent,
                p.wins,
                p.win_rate * 100.0,
                p.folds,
                p.fold_rate * 100.0,
                p.avg_discards,
                p.initial_bankroll,
                p.bankroll,
                p.bankroll_change
            )?;
            if let Some(m) = &p.metrics {
                writeln!(
                    out,
                    "    cache hits {} / misses {}, api calls {}, fallbacks {}, invalid responses {}",
                    m.cache_hits, m.cache_misses, m.api_calls, m.fallbacks, m.invalid_responses
                )?;
            }
        }
        writeln!(out, "{}", "=".repeat(60))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fivedraw_engine::engine::Table;
    use fivedraw_engine::rules::DecisionRules;

    fn table() -> Table {
        let seats = vec![
            Seat::new(0, "A", Controller::External, 100),
            Seat::new(1, "B", Controller::External, 100),
        ];
        let rules = DecisionRules {
            ante: 5,
            ..DecisionRules::default()
        };
        Table::new(seats, rules, Some(7)).unwrap()
    }

    #[test]
    fn tallies_follow_results() {
        let mut t = table();
        let mut stats = StatsCollector::new(t.seats());
        for id in 1..=4 {
            stats.record(&t.play_hand(id).unwrap());
        }
        let s = stats.summary(7, &BTreeMap::new());
        assert_eq!(s.total_games, 4);
        assert_eq!(s.games_played, 4);
        // every hand is two antes, nobody bets
        assert_eq!(s.total_pot, 40);
        let wins: u64 = s.players.iter().map(|p| p.wins).sum();
        assert_eq!(wins, 4 + s.split_pots);
        let change: i64 = s.players.iter().map(|p| p.bankroll_change).sum();
        assert_eq!(change, 0);
        assert_eq!(s.players[0].agent, "external");
    }

    #[test]
    fn idle_games_count_but_do_not_play() {
        let t = table();
        let mut stats = StatsCollector::new(t.seats());
        let mut idle = GameResult::idle(1, t.bankrolls());
        idle.bankrolls.insert(1, 0);
        stats.record(&idle);
        let s = stats.summary(0, &BTreeMap::new());
        assert_eq!((s.total_games, s.games_played), (1, 0));
        assert_eq!(s.players[1].bankroll_change, -100);
    }
}
