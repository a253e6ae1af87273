// Enemy matchup and ally synergy aggregation.
//
// Every request is answered from scratch: filter the subject's rows, stack the
// selected counterpart slots, tally games and wins per counterpart, drop
// counterparts under the sample threshold, rank by win rate, then classify each
// counterpart against the subject's overall win rate.

use super::champion_stats::{ChampionStats, StatsTracker};
use crate::data::record::{MatchDataset, RoleFilter, Team};
use crate::data::slots::CounterpartSelector;
use serde::Serialize;
use std::fmt;
use tracing::debug;

pub const ENEMY_MIN_GAMES_DEFAULT: u32 = 10;
pub const ALLY_MIN_GAMES_DEFAULT: u32 = 10;
/// Threshold used when listing which counterparts can be picked for highlighting.
pub const OPTIONS_MIN_GAMES_DEFAULT: u32 = 50;

/// Minimum-games text from user input. Anything but plain digits gives `default`.
pub fn parse_min_games(input: Option<&str>, default: u32) -> u32 {
    match input {
        Some(text) if !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit()) => {
            text.parse().unwrap_or(default)
        }
        _ => default,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    Above,
    Below,
    Highlighted,
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Classification::Above => f.write_str("above"),
            Classification::Below => f.write_str("below"),
            Classification::Highlighted => f.write_str("highlighted"),
        }
    }
}

/// `Above` when `rate >= baseline`; a rate equal to the baseline counts as above.
pub fn classify(rate: f64, baseline: f64) -> Classification {
    if rate >= baseline {
        Classification::Above
    } else {
        Classification::Below
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AggregationRequest {
    pub champion: String,
    pub role: RoleFilter,
    pub counterpart: CounterpartSelector,
    pub min_games: u32,
    pub highlight: Option<String>,
}

impl AggregationRequest {
    pub fn new(champion: impl Into<String>, role: RoleFilter, counterpart: CounterpartSelector) -> Self {
        let min_games = match counterpart.team {
            Team::Enemy => ENEMY_MIN_GAMES_DEFAULT,
            Team::Ally => ALLY_MIN_GAMES_DEFAULT,
        };
        AggregationRequest {
            champion: champion.into(),
            role,
            counterpart,
            min_games,
            highlight: None,
        }
    }

    pub fn with_min_games(mut self, min_games: u32) -> Self {
        self.min_games = min_games;
        self
    }

    pub fn with_highlight(mut self, highlight: Option<String>) -> Self {
        self.highlight = highlight.filter(|h| !h.is_empty());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchupStat {
    pub counterpart: String,
    /// Percentage, two decimals.
    pub win_rate: f64,
    pub n_games: usize,
    pub wins: usize,
    pub classification: Classification,
    /// 1-based position in win-rate order.
    pub rank: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchupReport {
    pub champion: String,
    pub baseline: f64,
    pub stats: Vec<MatchupStat>,
}

impl MatchupReport {
    /// Rows whose win rate is at or above the baseline, whatever their tag.
    pub fn at_or_above_baseline(&self) -> usize {
        self.stats.iter().filter(|s| s.win_rate >= self.baseline).count()
    }
}

pub struct MatchupAggregator<'a> {
    dataset: &'a MatchDataset,
}

impl<'a> MatchupAggregator<'a> {
    pub fn new(dataset: &'a MatchDataset) -> Self {
        MatchupAggregator { dataset }
    }

    /// Overall win percentage of a champion across every role, 0 if unseen.
    pub fn compute_baseline_rate(&self, champion: &str) -> f64 {
        let mut stats = ChampionStats::new(champion.to_string());
        for record in self.dataset.for_champion(champion) {
            stats.games += 1;
            if record.win {
                stats.wins += 1;
            }
        }
        stats.win_rate_percent()
    }

    fn tally(&self, request: &AggregationRequest) -> StatsTracker {
        let mut tracker = StatsTracker::new();
        let slots = request.counterpart.resolve(request.role.role());
        if slots.is_empty() {
            debug!(champion = %request.champion, "no counterpart slots to aggregate");
            return tracker;
        }

        let mut rows = 0usize;
        for record in self
            .dataset
            .for_champion(&request.champion)
            .filter(|r| request.role.matches(r.role))
        {
            rows += 1;
            for &slot in &slots {
                let Some(counterpart) = record.counterpart(request.counterpart.team, slot) else {
                    continue;
                };
                // The subject sits in its own ally slot
                if request.counterpart.team == Team::Ally && counterpart == request.champion {
                    continue;
                }
                tracker.add_encounter(counterpart, record.win);
            }
        }

        debug!(
            champion = %request.champion,
            role = %request.role,
            rows,
            counterparts = tracker.len(),
            "tallied counterparts"
        );
        tracker
    }

    /// Counterparts with at least `min_games` games, best win rate first.
    pub fn compute_counterpart_rates(&self, request: &AggregationRequest) -> Vec<MatchupStat> {
        let baseline = self.compute_baseline_rate(&request.champion);
        let min_games = request.min_games as usize;

        let mut groups: Vec<ChampionStats> = self
            .tally(request)
            .into_stats()
            .into_iter()
            .filter(|s| s.games >= min_games)
            .collect();

        groups.sort_by(|a, b| {
            b.win_rate()
                .partial_cmp(&a.win_rate())
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.name.cmp(&b.name))
        });

        groups
            .into_iter()
            .enumerate()
            .map(|(idx, s)| {
                let win_rate = s.win_rate_percent();
                MatchupStat {
                    win_rate,
                    n_games: s.games,
                    wins: s.wins,
                    classification: classify(win_rate, baseline),
                    rank: idx + 1,
                    counterpart: s.name,
                }
            })
            .collect()
    }

    /// Best and worst matchups plus the requested highlight, with the baseline.
    pub fn highlight_report(&self, request: &AggregationRequest, top_n: usize, bottom_n: usize) -> MatchupReport {
        let ranked = self.compute_counterpart_rates(request);
        MatchupReport {
            champion: request.champion.clone(),
            baseline: self.compute_baseline_rate(&request.champion),
            stats: select_highlight_set(&ranked, top_n, bottom_n, request.highlight.as_deref()),
        }
    }

    pub fn full_report(&self, request: &AggregationRequest) -> MatchupReport {
        let ranked = self.compute_counterpart_rates(request);
        let stats = match request.highlight.as_deref() {
            Some(name) => ranked
                .into_iter()
                .map(|mut s| {
                    if s.counterpart == name {
                        s.classification = Classification::Highlighted;
                    }
                    s
                })
                .collect(),
            None => ranked,
        };
        MatchupReport {
            champion: request.champion.clone(),
            baseline: self.compute_baseline_rate(&request.champion),
            stats,
        }
    }

    /// Counterparts that meet `min_games`, sorted by name.
    pub fn counterpart_options(&self, request: &AggregationRequest) -> Vec<String> {
        let min_games = request.min_games as usize;
        self.tally(request)
            .into_stats()
            .into_iter()
            .filter(|s| s.games >= min_games)
            .map(|s| s.name)
            .collect()
    }
}

/// Top `top_n` and bottom `bottom_n` of a ranked list, deduplicated.
///
/// A named counterpart present anywhere in `ranked` is included and tagged
/// `Highlighted`; one that is absent is left out without error.
pub fn select_highlight_set(
    ranked: &[MatchupStat],
    top_n: usize,
    bottom_n: usize,
    explicit: Option<&str>,
) -> Vec<MatchupStat> {
    let bottom_start = ranked.len().saturating_sub(bottom_n);
    let mut selected: Vec<MatchupStat> = Vec::new();

    for stat in ranked.iter().take(top_n).chain(ranked.iter().skip(bottom_start)) {
        if !selected.iter().any(|s| s.counterpart == stat.counterpart) {
            selected.push(stat.clone());
        }
    }

    if let Some(name) = explicit {
        if let Some(found) = ranked.iter().find(|s| s.counterpart == name) {
            match selected.iter_mut().find(|s| s.counterpart == name) {
                Some(existing) => existing.classification = Classification::Highlighted,
                None => {
                    let mut highlighted = found.clone();
                    highlighted.classification = Classification::Highlighted;
                    selected.push(highlighted);
                }
            }
        }
    }

    selected.sort_by_key(|s| s.rank);
    selected
}
