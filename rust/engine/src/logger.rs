use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::cards::{format_cards, Card};
use crate::hand::HandEvaluation;
use crate::player::{BettingEvent, RoundPlayer};
use crate::rules::BettingAction;

/// Per-participant outcome of a hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerResult {
    pub player_id: usize,
    pub name: String,
    /// Cards as dealt
    pub hand_before: Vec<Card>,
    /// Cards after the draw (same as dealt if the player never drew)
    pub hand_after: Vec<Card>,
    pub discard_indices: Vec<usize>,
    /// Rationale attached to the discard decision
    #[serde(default)]
    pub rationale: Option<String>,
    pub initial_eval: HandEvaluation,
    /// Absent for folded players
    #[serde(default)]
    pub final_eval: Option<HandEvaluation>,
    pub folded: bool,
    pub initial_stack: u32,
    pub final_stack: u32,
    pub stack_change: i64,
    pub betting_history: Vec<BettingEvent>,
    /// Decisions replaced by an engine default
    #[serde(default)]
    pub fallbacks: u32,
}

impl PlayerResult {
    pub fn from_round(p: &RoundPlayer) -> Self {
        let (discard_indices, rationale) = match &p.discard {
            Some(d) => (d.discard_indices.clone(), d.rationale.clone()),
            None => (Vec::new(), None),
        };
        Self {
            player_id: p.id(),
            name: p.name().to_string(),
            hand_before: p.hand.clone(),
            hand_after: p.hand_after.clone(),
            discard_indices,
            rationale,
            initial_eval: p.initial_eval.clone(),
            final_eval: if p.folded { None } else { p.final_eval.clone() },
            folded: p.folded,
            initial_stack: p.starting_stack,
            final_stack: p.stack(),
            stack_change: p.stack_change(),
            betting_history: p.history.clone(),
            fallbacks: p.fallbacks,
        }
    }
}

/// Complete record of one hand. Serialized one per line by [`GameLogger`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResult {
    pub game_id: u64,
    /// Pot at showdown
    pub pot: u32,
    pub winners: Vec<usize>,
    /// Stack of every seat after the hand, sitting-out seats included
    pub bankrolls: BTreeMap<usize, u32>,
    pub players: Vec<PlayerResult>,
    /// Timestamp when the result was logged (RFC3339 format)
    #[serde(default)]
    pub ts: Option<String>,
}

impl GameResult {
    /// A hand that could not be dealt because fewer than two seats had chips.
    pub fn idle(game_id: u64, bankrolls: BTreeMap<usize, u32>) -> Self {
        Self {
            game_id,
            pot: 0,
            winners: Vec::new(),
            bankrolls,
            players: Vec::new(),
            ts: None,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.players.is_empty()
    }

    pub fn is_split(&self) -> bool {
        self.winners.len() > 1
    }

    pub fn player(&self, player_id: usize) -> Option<&PlayerResult> {
        self.players.iter().find(|p| p.player_id == player_id)
    }

    /// Zero for every consistent result.
    pub fn net_stack_change(&self) -> i64 {
        self.players.iter().map(|p| p.stack_change).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatSnapshot {
    pub player_id: usize,
    pub name: String,
    pub stack: u32,
    pub hand: Vec<Card>,
}

/// Step-level log kept by an interactive hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HandEvent {
    HandStart {
        game_id: u64,
        pot: u32,
        players: Vec<SeatSnapshot>,
    },
    Bet {
        player_id: usize,
        action: BettingAction,
        amount: u32,
        pot: u32,
        stack: u32,
    },
    Discard {
        player_id: usize,
        discard_indices: Vec<usize>,
        hand_after: Vec<Card>,
    },
    Showdown {
        winners: Vec<usize>,
        payouts: Vec<u32>,
        pot: u32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Jsonl,
    Csv,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Jsonl => f.write_str("jsonl"),
            LogFormat::Csv => f.write_str("csv"),
        }
    }
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "jsonl" => Ok(LogFormat::Jsonl),
            "csv" => Ok(LogFormat::Csv),
            other => Err(format!("unknown log format: {other} (expected jsonl or csv)")),
        }
    }
}

use chrono::{SecondsFormat, Utc};
use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::Path;

pub const CSV_HEADER: &str =
    "game_id,player_id,name,hand_before,discards,hand_after,final_rank,folded,stack_change,winner";

/// Appends hand results to a file as JSON Lines or CSV.
pub struct GameLogger {
    writer: BufWriter<File>,
    format: LogFormat,
}

impl GameLogger {
    pub fn create<P: AsRef<Path>>(path: P, format: LogFormat) -> std::io::Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                create_dir_all(parent)?;
            }
        }
        let f = File::create(path)?;
        let mut writer = BufWriter::new(f);
        if format == LogFormat::Csv {
            writeln!(writer, "{CSV_HEADER}")?;
        }
        Ok(Self { writer, format })
    }

    pub fn format(&self) -> LogFormat {
        self.format
    }

    pub fn log(&mut self, result: &GameResult) -> std::io::Result<()> {
        match self.format {
            LogFormat::Jsonl => {
                // inject timestamp if missing
                let mut rec = result.clone();
                if rec.ts.is_none() {
                    rec.ts = Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));
                }
                let line = serde_json::to_string(&rec).map_err(std::io::Error::other)?;
                self.writer.write_all(line.as_bytes())?;
                self.writer.write_all(b"\n")?;
            }
            LogFormat::Csv => {
                for row in csv_rows(result) {
                    self.writer.write_all(row.as_bytes())?;
                    self.writer.write_all(b"\n")?;
                }
            }
        }
        self.writer.flush()
    }
}

/// One CSV row per participant, in the column order of [`CSV_HEADER`].
pub fn csv_rows(result: &GameResult) -> Vec<String> {
    result
        .players
        .iter()
        .map(|p| {
            let discards = p
                .discard_indices
                .iter()
                .map(usize::to_string)
                .collect::<Vec<_>>()
                .join(" ");
            let rank = p.final_eval.as_ref().map(|e| e.name()).unwrap_or("");
            [
                result.game_id.to_string(),
                p.player_id.to_string(),
                csv_field(&p.name),
                format_cards(&p.hand_before),
                discards,
                format_cards(&p.hand_after),
                rank.to_string(),
                p.folded.to_string(),
                p.stack_change.to_string(),
                result.winners.contains(&p.player_id).to_string(),
            ]
            .join(",")
        })
        .collect()
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
