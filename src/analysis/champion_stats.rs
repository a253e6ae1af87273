use serde::Serialize;
use std::collections::BTreeMap;

/// Rounds a percentage to two decimals for display and comparison.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChampionStats {
    pub name: String,
    pub games: usize,
    pub wins: usize,
}

impl ChampionStats {
    pub fn new(name: String) -> Self {
        ChampionStats {
            name,
            games: 0,
            wins: 0,
        }
    }

    /// Fraction of games won, 0 when nothing was recorded.
    pub fn win_rate(&self) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            self.wins as f64 / self.games as f64
        }
    }

    pub fn win_rate_percent(&self) -> f64 {
        round2(self.win_rate() * 100.0)
    }

    pub fn losses(&self) -> usize {
        self.games - self.wins
    }

    pub fn frequency(&self, total_games: usize) -> f64 {
        if total_games == 0 {
            0.0
        } else {
            (self.games as f64 / total_games as f64) * 100.0
        }
    }
}

/// Games/wins tally per key. Iteration is in key order.
#[derive(Debug, Clone, Default)]
pub struct StatsTracker {
    stats: BTreeMap<String, ChampionStats>,
}

impl StatsTracker {
    pub fn new() -> Self {
        StatsTracker {
            stats: BTreeMap::new(),
        }
    }

    pub fn add_encounter(&mut self, name: &str, won: bool) {
        if !self.stats.contains_key(name) {
            self.stats
                .insert(name.to_string(), ChampionStats::new(name.to_string()));
        }
        if let Some(entry) = self.stats.get_mut(name) {
            entry.games += 1;
            if won {
                entry.wins += 1;
            }
        }
    }

    pub fn get_stats(&self) -> Vec<ChampionStats> {
        self.stats.values().cloned().collect()
    }

    pub fn into_stats(self) -> Vec<ChampionStats> {
        self.stats.into_values().collect()
    }

    pub fn get(&self, name: &str) -> Option<&ChampionStats> {
        self.stats.get(name)
    }

    /// Sum of games over every key.
    pub fn total_games(&self) -> usize {
        self.stats.values().map(|s| s.games).sum()
    }

    pub fn len(&self) -> usize {
        self.stats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }
}
