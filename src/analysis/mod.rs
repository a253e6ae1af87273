pub mod champion_stats;
pub mod heatmap;
pub mod items;
pub mod matchup;
pub mod patches;
pub mod runes;
pub mod sides;
pub mod spells;
pub mod swarm;
