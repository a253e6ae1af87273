use super::champion_stats::StatsTracker;
use crate::data::record::{MatchDataset, Side};
use serde::Serialize;
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SideWinRate {
    pub champion: String,
    pub side: Side,
    pub n_games: usize,
    pub win_rate: f64,
    /// Absolute blue minus red win rate for the champion, one decimal.
    /// `None` unless the champion has games on both sides.
    pub win_rate_diff: Option<f64>,
}

/// Blue/red win rates for the given champions, or for every champion when
/// `champions` is empty. Rows without a side are ignored.
pub fn side_win_rates(dataset: &MatchDataset, champions: &[String]) -> Vec<SideWinRate> {
    let wanted: BTreeSet<&str> = champions.iter().map(String::as_str).collect();
    let mut blue = StatsTracker::new();
    let mut red = StatsTracker::new();

    for record in dataset.records() {
        if !wanted.is_empty() && !wanted.contains(record.champion.as_str()) {
            continue;
        }
        match record.side {
            Some(Side::Blue) => blue.add_encounter(&record.champion, record.win),
            Some(Side::Red) => red.add_encounter(&record.champion, record.win),
            None => {}
        }
    }

    let seen: BTreeSet<String> = blue
        .get_stats()
        .into_iter()
        .chain(red.get_stats())
        .map(|s| s.name)
        .collect();

    let mut rates = Vec::new();
    for champion in seen {
        let win_rate_diff = match (blue.get(&champion), red.get(&champion)) {
            (Some(b), Some(r)) => Some(side_gap(b.win_rate_percent(), r.win_rate_percent())),
            _ => None,
        };
        for (side, tracker) in [(Side::Blue, &blue), (Side::Red, &red)] {
            if let Some(stats) = tracker.get(&champion) {
                rates.push(SideWinRate {
                    champion: champion.clone(),
                    side,
                    n_games: stats.games,
                    win_rate: stats.win_rate_percent(),
                    win_rate_diff,
                });
            }
        }
    }
    rates
}

fn side_gap(blue: f64, red: f64) -> f64 {
    ((blue - red).abs() * 10.0).round() / 10.0
}
