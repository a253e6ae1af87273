use super::champion_stats::{round2, ChampionStats};
use crate::data::record::{MatchDataset, Patch};
use serde::Serialize;
use std::collections::BTreeMap;

pub const PATCH_MIN_GAMES_DEFAULT: u32 = 20;
pub const DEFAULT_FIRST_PATCH: Patch = Patch::new(14, 11);
pub const DEFAULT_LAST_PATCH: Patch = Patch::new(14, 19);

/// Inclusive patch window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatchRange {
    pub first: Patch,
    pub last: Patch,
}

impl PatchRange {
    /// The default window with either end replaced when given.
    pub fn bounded(first: Option<Patch>, last: Option<Patch>) -> Self {
        let defaults = PatchRange::default();
        PatchRange {
            first: first.unwrap_or(defaults.first),
            last: last.unwrap_or(defaults.last),
        }
    }

    pub fn contains(&self, patch: Patch) -> bool {
        self.first <= patch && patch <= self.last
    }
}

impl Default for PatchRange {
    fn default() -> Self {
        PatchRange {
            first: DEFAULT_FIRST_PATCH,
            last: DEFAULT_LAST_PATCH,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatchWinRate {
    pub patch: Patch,
    pub wins: usize,
    pub losses: usize,
    pub total_games: usize,
    pub win_rate: f64,
    pub loss_rate: f64,
}

/// Win and loss percentages per patch, oldest patch first.
pub fn patch_win_rates(
    dataset: &MatchDataset,
    champion: &str,
    range: PatchRange,
    min_games: u32,
) -> Vec<PatchWinRate> {
    let mut per_patch: BTreeMap<Patch, ChampionStats> = BTreeMap::new();
    for record in dataset.for_champion(champion) {
        let Some(patch) = record.patch() else {
            continue;
        };
        if range.contains(patch) {
            let stats = per_patch
                .entry(patch)
                .or_insert_with(|| ChampionStats::new(patch.to_string()));
            stats.games += 1;
            if record.win {
                stats.wins += 1;
            }
        }
    }

    per_patch
        .into_iter()
        .filter(|(_, stats)| stats.games >= min_games as usize)
        .map(|(patch, stats)| PatchWinRate {
            patch,
            wins: stats.wins,
            losses: stats.losses(),
            total_games: stats.games,
            win_rate: stats.win_rate_percent(),
            loss_rate: round2(100.0 - stats.win_rate() * 100.0),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::record::MatchRecord;
    use pretty_assertions::assert_eq;

    fn games(version: &str, wins: usize, losses: usize) -> Vec<MatchRecord> {
        (0..wins + losses)
            .map(|i| MatchRecord {
                champion: "Aatrox".into(),
                game_version: Some(version.into()),
                win: i < wins,
                ..Default::default()
            })
            .collect()
    }

    #[test]
    fn groups_patches_in_numeric_order() {
        let mut rows = games("14.12.601.1", 3, 1);
        rows.extend(games("14.9.1", 5, 5));
        rows.extend(games("14.11.2", 1, 3));
        rows.extend(games("14.11.7", 1, 0));
        let dataset = MatchDataset::new(rows);

        let rates = patch_win_rates(&dataset, "Aatrox", PatchRange::default(), 1);
        assert_eq!(
            rates,
            vec![
                PatchWinRate {
                    patch: Patch::new(14, 11),
                    wins: 2,
                    losses: 3,
                    total_games: 5,
                    win_rate: 40.0,
                    loss_rate: 60.0,
                },
                PatchWinRate {
                    patch: Patch::new(14, 12),
                    wins: 3,
                    losses: 1,
                    total_games: 4,
                    win_rate: 75.0,
                    loss_rate: 25.0,
                },
            ]
        );
    }

    #[test]
    fn sample_floor_drops_thin_patches() {
        let mut rows = games("14.15", 12, 10);
        rows.extend(games("14.16", 5, 5));
        let dataset = MatchDataset::new(rows);

        let rates = patch_win_rates(&dataset, "Aatrox", PatchRange::default(), PATCH_MIN_GAMES_DEFAULT);
        assert_eq!(rates.len(), 1);
        assert_eq!(rates[0].patch.to_string(), "14.15");
    }

    #[test]
    fn missing_bounds_fall_back_to_default_window() {
        assert_eq!(PatchRange::bounded(None, None), PatchRange::default());
        assert_eq!(
            PatchRange::bounded(Some(Patch::new(14, 15)), None),
            PatchRange {
                first: Patch::new(14, 15),
                last: DEFAULT_LAST_PATCH,
            }
        );
        let range = PatchRange::bounded(None, Some(Patch::new(14, 12)));
        assert_eq!(range.first, DEFAULT_FIRST_PATCH);
        assert!(range.contains(Patch::new(14, 12)));
        assert!(!range.contains(Patch::new(14, 13)));
    }

    #[test]
    fn unparseable_versions_are_ignored() {
        let dataset = MatchDataset::new(games("pbe", 3, 0));
        assert!(patch_win_rates(&dataset, "Aatrox", PatchRange::default(), 1).is_empty());
    }
}
