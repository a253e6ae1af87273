use super::champion_stats::StatsTracker;
use super::swarm::swarm_layout;
use crate::data::loader::ItemCatalog;
use crate::data::record::{MatchDataset, RoleFilter};
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemStat {
    pub item: String,
    pub count: usize,
    /// Fraction of games won while the item was built.
    pub win_rate: f64,
    /// Share of all full-item occurrences, in percent.
    pub frequency: f64,
    /// Bubble size: distance of the win rate from 50%, in percentage points.
    pub size: f64,
    /// Swarm x coordinate.
    pub x: f64,
}

/// Full-item popularity for a champion in a role, with swarm positions.
pub fn item_popularity(
    dataset: &MatchDataset,
    catalog: &ItemCatalog,
    champion: &str,
    role: RoleFilter,
) -> Vec<ItemStat> {
    let mut tracker = StatsTracker::new();
    for record in dataset.for_champion(champion).filter(|r| role.matches(r.role)) {
        for item in record.items.iter().filter(|i| catalog.is_full_item(i)) {
            tracker.add_encounter(item, record.win);
        }
    }

    let total = tracker.total_games();
    debug!(champion, %role, occurrences = total, items = tracker.len(), "tallied full items");

    let stats = tracker.into_stats();
    let sizes: Vec<(f64, f64)> = stats
        .iter()
        .map(|s| (s.frequency(total), (s.win_rate() - 0.5).abs() * 100.0))
        .collect();
    let layout = swarm_layout(&sizes);

    stats
        .into_iter()
        .zip(sizes)
        .zip(layout)
        .map(|((s, (frequency, size)), point)| ItemStat {
            win_rate: s.win_rate(),
            count: s.games,
            item: s.name,
            frequency,
            size,
            x: point.x,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::record::{MatchRecord, Role};

    fn game(role: Role, items: &[&str], win: bool) -> MatchRecord {
        MatchRecord {
            champion: "Aatrox".into(),
            role: Some(role),
            items: items.iter().map(|i| i.to_string()).collect(),
            win,
            ..Default::default()
        }
    }

    fn catalog() -> ItemCatalog {
        ItemCatalog::from_full_items(["Eclipse", "Sterak's Gage", "Black Cleaver"])
    }

    #[test]
    fn counts_only_full_items_in_role() {
        let dataset = MatchDataset::new(vec![
            game(Role::Top, &["Eclipse", "Long Sword"], true),
            game(Role::Top, &["Eclipse", "Sterak's Gage"], false),
            game(Role::Top, &["Eclipse", "Black Cleaver"], true),
            game(Role::Mid, &["Eclipse"], false),
        ]);

        let stats = item_popularity(&dataset, &catalog(), "Aatrox", RoleFilter::Only(Role::Top));
        let names: Vec<_> = stats.iter().map(|s| s.item.as_str()).collect();
        assert_eq!(names, vec!["Black Cleaver", "Eclipse", "Sterak's Gage"]);

        let eclipse = &stats[1];
        assert_eq!(eclipse.count, 3);
        assert!((eclipse.win_rate - 2.0 / 3.0).abs() < 1e-9);
        assert!((eclipse.frequency - 60.0).abs() < 1e-9);
        assert!((eclipse.size - 100.0 / 6.0).abs() < 1e-9);

        let total: f64 = stats.iter().map(|s| s.frequency).sum();
        assert!((total - 100.0).abs() < 1e-9);
    }

    #[test]
    fn empty_catalog_yields_nothing() {
        let dataset = MatchDataset::new(vec![game(Role::Top, &["Eclipse"], true)]);
        let stats = item_popularity(&dataset, &ItemCatalog::default(), "Aatrox", RoleFilter::Any);
        assert!(stats.is_empty());
    }
}
