// Per-opponent performance heatmap.
//
// Rows are lane opponents, columns are metrics. Non-winrate metrics are
// min-max normalized across the opponents that survive the sample threshold,
// so colors compare opponents within one view. Deaths are inverted so that a
// higher normalized value is always better.

use crate::data::record::{MatchDataset, MatchRecord, RoleFilter};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

pub const HEATMAP_MIN_GAMES_DEFAULT: u32 = 50;
const NEUTRAL: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum HeatmapMetric {
    Winrate,
    CsFirst10,
    CsAdvantage,
    LevelLead,
    TurretPlates,
    SoloKills,
    Deaths,
}

impl HeatmapMetric {
    pub const ALL: [HeatmapMetric; 7] = [
        HeatmapMetric::Winrate,
        HeatmapMetric::CsFirst10,
        HeatmapMetric::CsAdvantage,
        HeatmapMetric::LevelLead,
        HeatmapMetric::TurretPlates,
        HeatmapMetric::SoloKills,
        HeatmapMetric::Deaths,
    ];

    pub fn label(self) -> &'static str {
        match self {
            HeatmapMetric::Winrate => "Winrate",
            HeatmapMetric::CsFirst10 => "CS First 10m",
            HeatmapMetric::CsAdvantage => "CS Advantage",
            HeatmapMetric::LevelLead => "Level Lead",
            HeatmapMetric::TurretPlates => "Turret Plates",
            HeatmapMetric::SoloKills => "Solo Kills",
            HeatmapMetric::Deaths => "Deaths",
        }
    }

    fn raw_value(self, record: &MatchRecord) -> Option<f64> {
        let m = &record.metrics;
        match self {
            HeatmapMetric::Winrate => Some(if record.win { 1.0 } else { 0.0 }),
            HeatmapMetric::CsFirst10 => m.lane_minions_first_10_minutes,
            HeatmapMetric::CsAdvantage => m.max_cs_advantage_on_lane_opponent,
            HeatmapMetric::LevelLead => m.max_level_lead_lane_opponent,
            HeatmapMetric::TurretPlates => m.turret_plates_taken,
            HeatmapMetric::SoloKills => m.solo_kills,
            HeatmapMetric::Deaths => m.deaths,
        }
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|m| *m == self).unwrap_or_default()
    }
}

impl fmt::Display for HeatmapMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for HeatmapMetric {
    type Err = String;

    /// Accepts the display label or a compact form such as "cs-advantage".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        HeatmapMetric::ALL
            .into_iter()
            .find(|m| {
                let label: String = m
                    .label()
                    .chars()
                    .filter(|c| c.is_ascii_alphanumeric())
                    .collect();
                label.to_ascii_lowercase() == wanted
            })
            .ok_or_else(|| format!("unknown metric '{}'", s))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapCell {
    pub metric: HeatmapMetric,
    /// Mean over the opponent's games; winrate as a fraction.
    pub raw: Option<f64>,
    /// In [0, 1], higher is better.
    pub normalized: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapRow {
    pub opponent: String,
    pub n_games: usize,
    pub wins: usize,
    pub cells: Vec<HeatmapCell>,
}

impl HeatmapRow {
    pub fn cell(&self, metric: HeatmapMetric) -> Option<&HeatmapCell> {
        self.cells.iter().find(|c| c.metric == metric)
    }
}

#[derive(Debug, Default)]
struct OpponentAccumulator {
    games: usize,
    wins: usize,
    sums: [f64; 7],
    counts: [usize; 7],
}

impl OpponentAccumulator {
    fn add(&mut self, record: &MatchRecord) {
        self.games += 1;
        if record.win {
            self.wins += 1;
        }
        for metric in HeatmapMetric::ALL {
            if let Some(value) = metric.raw_value(record) {
                let idx = metric.index();
                self.sums[idx] += value;
                self.counts[idx] += 1;
            }
        }
    }

    fn mean(&self, metric: HeatmapMetric) -> Option<f64> {
        let idx = metric.index();
        (self.counts[idx] > 0).then(|| self.sums[idx] / self.counts[idx] as f64)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapRequest {
    pub champion: String,
    pub role: RoleFilter,
    pub min_games: u32,
    pub sort_by: HeatmapMetric,
}

pub fn build_heatmap(dataset: &MatchDataset, request: &HeatmapRequest) -> Vec<HeatmapRow> {
    let mut opponents: BTreeMap<String, OpponentAccumulator> = BTreeMap::new();
    for record in dataset
        .for_champion(&request.champion)
        .filter(|r| request.role.matches(r.role))
    {
        if let Some(opponent) = record.lane_opponent() {
            opponents.entry(opponent.to_string()).or_default().add(record);
        }
    }

    let min_games = request.min_games as usize;
    let kept: Vec<(String, OpponentAccumulator)> = opponents
        .into_iter()
        .filter(|(_, acc)| acc.games >= min_games)
        .collect();
    debug!(champion = %request.champion, opponents = kept.len(), "heatmap opponents kept");

    let mut rows: Vec<HeatmapRow> = kept
        .iter()
        .map(|(opponent, acc)| HeatmapRow {
            opponent: opponent.clone(),
            n_games: acc.games,
            wins: acc.wins,
            cells: HeatmapMetric::ALL
                .into_iter()
                .map(|metric| HeatmapCell {
                    metric,
                    raw: acc.mean(metric),
                    normalized: None,
                })
                .collect(),
        })
        .collect();

    for metric in HeatmapMetric::ALL {
        normalize_column(&mut rows, metric);
    }

    let sort_idx = request.sort_by.index();
    rows.sort_by(|a, b| {
        let left = a.cells[sort_idx].normalized;
        let right = b.cells[sort_idx].normalized;
        match (left, right) {
            (Some(l), Some(r)) => r.partial_cmp(&l).unwrap_or(std::cmp::Ordering::Equal),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        }
        .then_with(|| a.opponent.cmp(&b.opponent))
    });

    rows
}

fn normalize_column(rows: &mut [HeatmapRow], metric: HeatmapMetric) {
    let idx = metric.index();
    if metric == HeatmapMetric::Winrate {
        for row in rows.iter_mut() {
            row.cells[idx].normalized = row.cells[idx].raw;
        }
        return;
    }

    let values: Vec<f64> = rows.iter().filter_map(|r| r.cells[idx].raw).collect();
    let Some(min) = values.iter().copied().reduce(f64::min) else {
        return;
    };
    let max = values.iter().copied().fold(min, f64::max);

    for row in rows.iter_mut() {
        let cell = &mut row.cells[idx];
        cell.normalized = cell.raw.map(|v| {
            let scaled = if max > min { (v - min) / (max - min) } else { NEUTRAL };
            if metric == HeatmapMetric::Deaths {
                1.0 - scaled
            } else {
                scaled
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::record::{PerformanceMetrics, Role};

    fn game(opponent: &str, win: bool, deaths: f64, solo_kills: Option<f64>) -> MatchRecord {
        MatchRecord {
            champion: "Aatrox".into(),
            role: Some(Role::Top),
            win,
            lane_opponent: Some(opponent.into()),
            metrics: PerformanceMetrics {
                deaths: Some(deaths),
                solo_kills,
                lane_minions_first_10_minutes: Some(70.0),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn request(min_games: u32, sort_by: HeatmapMetric) -> HeatmapRequest {
        HeatmapRequest {
            champion: "Aatrox".into(),
            role: RoleFilter::Only(Role::Top),
            min_games,
            sort_by,
        }
    }

    fn dataset() -> MatchDataset {
        MatchDataset::new(vec![
            game("Garen", true, 2.0, Some(1.0)),
            game("Garen", true, 4.0, Some(1.0)),
            game("Darius", false, 8.0, Some(0.0)),
            game("Darius", true, 6.0, None),
            game("Teemo", false, 5.0, Some(2.0)),
        ])
    }

    #[test]
    fn aggregates_and_sorts_by_winrate() {
        let rows = build_heatmap(&dataset(), &request(2, HeatmapMetric::Winrate));
        let names: Vec<_> = rows.iter().map(|r| r.opponent.as_str()).collect();
        assert_eq!(names, vec!["Garen", "Darius"]);

        let darius = &rows[1];
        assert_eq!(darius.n_games, 2);
        assert_eq!(darius.cell(HeatmapMetric::Winrate).unwrap().raw, Some(0.5));
        assert_eq!(darius.cell(HeatmapMetric::Deaths).unwrap().raw, Some(7.0));
        // Solo kills averaged only over games that recorded them
        assert_eq!(darius.cell(HeatmapMetric::SoloKills).unwrap().raw, Some(0.0));
    }

    #[test]
    fn deaths_are_inverted_and_flat_columns_are_neutral() {
        let rows = build_heatmap(&dataset(), &request(2, HeatmapMetric::Deaths));
        let garen = rows.iter().find(|r| r.opponent == "Garen").unwrap();
        let darius = rows.iter().find(|r| r.opponent == "Darius").unwrap();

        assert_eq!(garen.cell(HeatmapMetric::Deaths).unwrap().normalized, Some(1.0));
        assert_eq!(darius.cell(HeatmapMetric::Deaths).unwrap().normalized, Some(0.0));
        assert_eq!(garen.cell(HeatmapMetric::CsFirst10).unwrap().normalized, Some(0.5));
        assert_eq!(rows[0].opponent, "Garen");
    }

    #[test]
    fn normalized_values_stay_in_unit_range() {
        let rows = build_heatmap(&dataset(), &request(1, HeatmapMetric::SoloKills));
        for row in &rows {
            for cell in &row.cells {
                if let Some(v) = cell.normalized {
                    assert!((0.0..=1.0).contains(&v), "{:?} out of range", cell);
                }
            }
        }
        assert_eq!(rows[0].opponent, "Teemo");
    }

    #[test]
    fn threshold_can_empty_the_view() {
        assert!(build_heatmap(&dataset(), &request(50, HeatmapMetric::Winrate)).is_empty());
    }

    #[test]
    fn metric_names_parse_loosely() {
        assert_eq!("cs-advantage".parse::<HeatmapMetric>().unwrap(), HeatmapMetric::CsAdvantage);
        assert_eq!("Turret Plates".parse::<HeatmapMetric>().unwrap(), HeatmapMetric::TurretPlates);
        assert_eq!("winrate".parse::<HeatmapMetric>().unwrap(), HeatmapMetric::Winrate);
        assert!("gold".parse::<HeatmapMetric>().is_err());
    }
}
