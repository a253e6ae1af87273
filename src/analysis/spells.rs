use super::champion_stats::StatsTracker;
use crate::data::record::MatchDataset;
use serde::Serialize;

pub const DEFAULT_SPELL_LIMIT: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpellCombination {
    pub combination: String,
    pub count: usize,
    pub wins: usize,
    pub win_rate: f64,
}

/// The `limit` most played summoner-spell pairs for a champion.
pub fn top_spell_combinations(dataset: &MatchDataset, champion: &str, limit: usize) -> Vec<SpellCombination> {
    let mut tracker = StatsTracker::new();
    for record in dataset.for_champion(champion) {
        if let Some(combination) = record.spell_combination() {
            tracker.add_encounter(&combination, record.win);
        }
    }

    let mut stats = tracker.into_stats();
    // Stable sort keeps name order among equal counts
    stats.sort_by(|a, b| b.games.cmp(&a.games));
    stats
        .into_iter()
        .take(limit)
        .map(|s| SpellCombination {
            win_rate: s.win_rate_percent(),
            count: s.games,
            wins: s.wins,
            combination: s.name,
        })
        .collect()
}
