use super::champion_stats::StatsTracker;
use crate::data::record::{MatchDataset, RuneSlot};
use serde::Serialize;
use tracing::debug;

pub const DEFAULT_RUNE_LIMIT: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuneStat {
    pub rune: String,
    pub count: usize,
    pub wins: usize,
    pub win_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuneSlotPopularity {
    pub slot: RuneSlot,
    pub runes: Vec<RuneStat>,
}

/// The `limit` most picked runes of a champion for every rune slot.
///
/// Slots with no recorded value are left out. Equal counts keep name order.
pub fn top_runes(dataset: &MatchDataset, champion: &str, limit: usize) -> Vec<RuneSlotPopularity> {
    RuneSlot::ALL
        .into_iter()
        .filter_map(|slot| {
            let mut tracker = StatsTracker::new();
            for record in dataset.for_champion(champion) {
                if let Some(rune) = record.rune(slot) {
                    tracker.add_encounter(rune, record.win);
                }
            }
            if tracker.is_empty() {
                debug!(champion, slot = slot.column(), "no rune data");
                return None;
            }

            let mut stats = tracker.into_stats();
            stats.sort_by(|a, b| b.games.cmp(&a.games));
            let runes = stats
                .into_iter()
                .take(limit)
                .map(|s| RuneStat {
                    win_rate: s.win_rate_percent(),
                    count: s.games,
                    wins: s.wins,
                    rune: s.name,
                })
                .collect();
            Some(RuneSlotPopularity { slot, runes })
        })
        .collect()
}
