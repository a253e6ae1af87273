use crate::error::ParseRoleError;
use serde::{Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Lane assignment, in ally/enemy slot order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Top,
    Jungle,
    Mid,
    Adc,
    Sup,
}

impl Role {
    #[cfg(test)]
    pub const ALL: [Role; 5] = [Role::Top, Role::Jungle, Role::Mid, Role::Adc, Role::Sup];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Top => "TOP",
            Role::Jungle => "JUNGLE",
            Role::Mid => "MID",
            Role::Adc => "ADC",
            Role::Sup => "SUP",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ParseRoleError;

    // Accepts both the dashboard names and Riot's teamPosition values
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "TOP" => Ok(Role::Top),
            "JUNGLE" | "JG" => Ok(Role::Jungle),
            "MID" | "MIDDLE" => Ok(Role::Mid),
            "ADC" | "BOTTOM" | "BOT" => Ok(Role::Adc),
            "SUP" | "SUPPORT" | "UTILITY" => Ok(Role::Sup),
            _ => Err(ParseRoleError(s.to_string())),
        }
    }
}

/// A role selection where `Any` means "do not filter on role".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoleFilter {
    #[default]
    Any,
    Only(Role),
}

impl RoleFilter {
    pub fn role(self) -> Option<Role> {
        match self {
            RoleFilter::Any => None,
            RoleFilter::Only(role) => Some(role),
        }
    }

    pub fn matches(self, role: Option<Role>) -> bool {
        match self {
            RoleFilter::Any => true,
            RoleFilter::Only(wanted) => role == Some(wanted),
        }
    }
}

impl fmt::Display for RoleFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoleFilter::Any => f.write_str("ANY"),
            RoleFilter::Only(role) => role.fmt(f),
        }
    }
}

impl FromStr for RoleFilter {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("ANY") {
            Ok(RoleFilter::Any)
        } else {
            s.parse().map(RoleFilter::Only)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Side {
    Blue,
    Red,
}

impl Side {
    /// Parses "blue"/"red" in any case, or the match-v5 team ids 100/200.
    pub fn parse(raw: &str) -> Option<Side> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "blue" | "100" => Some(Side::Blue),
            "red" | "200" => Some(Side::Red),
            _ => None,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Blue => f.write_str("Blue"),
            Side::Red => f.write_str("Red"),
        }
    }
}

/// Which team a counterpart champion played on, relative to the subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Team {
    Ally,
    Enemy,
}

impl Team {
    pub fn column_prefix(self) -> &'static str {
        match self {
            Team::Ally => "ally",
            Team::Enemy => "enemy",
        }
    }
}

/// Game patch, taken from the first two components of a game version string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Patch {
    pub major: u32,
    pub minor: u32,
}

impl Patch {
    pub const fn new(major: u32, minor: u32) -> Self {
        Patch { major, minor }
    }
}

impl FromStr for Patch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.trim().split('.');
        let major = parts
            .next()
            .and_then(|p| p.parse::<u32>().ok())
            .ok_or_else(|| format!("invalid patch '{}'", s))?;
        let minor = match parts.next() {
            Some(p) => p.parse::<u32>().map_err(|_| format!("invalid patch '{}'", s))?,
            None => 0,
        };
        Ok(Patch { major, minor })
    }
}

impl fmt::Display for Patch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.major, self.minor)
    }
}

impl Serialize for Patch {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Rune choice columns (`perk_*`), in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RuneSlot {
    Keystone,
    PrimaryRow1,
    PrimaryRow2,
    PrimaryRow3,
    SecondaryRow1,
    SecondaryRow2,
    PrimaryStyle,
    SecondaryStyle,
    ShardDefense,
    ShardFlex,
    ShardOffense,
}

pub const RUNE_SLOT_COUNT: usize = RuneSlot::ALL.len();

impl RuneSlot {
    pub const ALL: [RuneSlot; 11] = [
        RuneSlot::Keystone,
        RuneSlot::PrimaryRow1,
        RuneSlot::PrimaryRow2,
        RuneSlot::PrimaryRow3,
        RuneSlot::SecondaryRow1,
        RuneSlot::SecondaryRow2,
        RuneSlot::PrimaryStyle,
        RuneSlot::SecondaryStyle,
        RuneSlot::ShardDefense,
        RuneSlot::ShardFlex,
        RuneSlot::ShardOffense,
    ];

    pub fn column(self) -> &'static str {
        match self {
            RuneSlot::Keystone => "perk_keystone",
            RuneSlot::PrimaryRow1 => "perk_primary_row_1",
            RuneSlot::PrimaryRow2 => "perk_primary_row_2",
            RuneSlot::PrimaryRow3 => "perk_primary_row_3",
            RuneSlot::SecondaryRow1 => "perk_secondary_row_1",
            RuneSlot::SecondaryRow2 => "perk_secondary_row_2",
            RuneSlot::PrimaryStyle => "perk_primary_style",
            RuneSlot::SecondaryStyle => "perk_secondary_style",
            RuneSlot::ShardDefense => "perk_shard_defense",
            RuneSlot::ShardFlex => "perk_shard_flex",
            RuneSlot::ShardOffense => "perk_shard_offense",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RuneSlot::Keystone => "Keystone",
            RuneSlot::PrimaryRow1 => "Primary Row 1",
            RuneSlot::PrimaryRow2 => "Primary Row 2",
            RuneSlot::PrimaryRow3 => "Primary Row 3",
            RuneSlot::SecondaryRow1 => "Secondary Row 1",
            RuneSlot::SecondaryRow2 => "Secondary Row 2",
            RuneSlot::PrimaryStyle => "Primary Style",
            RuneSlot::SecondaryStyle => "Secondary Style",
            RuneSlot::ShardDefense => "Shard Defense",
            RuneSlot::ShardFlex => "Shard Flex",
            RuneSlot::ShardOffense => "Shard Offense",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for RuneSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for RuneSlot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.column())
    }
}

/// Per-game performance numbers. Any of them may be absent from the source file.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PerformanceMetrics {
    pub kills: Option<f64>,
    pub deaths: Option<f64>,
    pub assists: Option<f64>,
    pub gold_earned: Option<f64>,
    pub total_minions_killed: Option<f64>,
    pub game_duration: Option<f64>,
    pub lane_minions_first_10_minutes: Option<f64>,
    pub max_cs_advantage_on_lane_opponent: Option<f64>,
    pub max_level_lead_lane_opponent: Option<f64>,
    pub turret_plates_taken: Option<f64>,
    pub solo_kills: Option<f64>,
}

/// One participant's view of one game.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MatchRecord {
    pub champion: String,
    pub role: Option<Role>,
    pub side: Option<Side>,
    pub win: bool,
    /// Indexed by slot, see `data::slots`.
    pub allies: [Option<String>; 5],
    pub enemies: [Option<String>; 5],
    pub lane_opponent: Option<String>,
    pub game_version: Option<String>,
    pub summoner1_id: Option<String>,
    pub summoner2_id: Option<String>,
    pub items: Vec<String>,
    /// Indexed by `RuneSlot`.
    pub runes: [Option<String>; RUNE_SLOT_COUNT],
    pub metrics: PerformanceMetrics,
}

impl MatchRecord {
    pub fn counterpart(&self, team: Team, slot: usize) -> Option<&str> {
        let slots = match team {
            Team::Ally => &self.allies,
            Team::Enemy => &self.enemies,
        };
        slots.get(slot).and_then(|c| c.as_deref())
    }

    /// The `lane_opponent` column when present, otherwise the enemy in our own slot.
    pub fn lane_opponent(&self) -> Option<&str> {
        self.lane_opponent.as_deref().or_else(|| {
            self.role
                .and_then(|role| self.counterpart(Team::Enemy, crate::data::slots::slot_index(role)))
        })
    }

    pub fn rune(&self, slot: RuneSlot) -> Option<&str> {
        self.runes[slot.index()].as_deref()
    }

    pub fn patch(&self) -> Option<Patch> {
        self.game_version.as_deref().and_then(|v| v.parse().ok())
    }

    /// Summoner spells as an order-independent key, e.g. "14 + 4".
    pub fn spell_combination(&self) -> Option<String> {
        let first = self.summoner1_id.as_deref()?;
        let second = self.summoner2_id.as_deref()?;
        let mut pair = [first, second];
        pair.sort_unstable();
        Some(pair.join(" + "))
    }
}

/// The read-only table every analysis borrows.
#[derive(Debug, Clone, Default)]
pub struct MatchDataset {
    records: Vec<MatchRecord>,
}

impl MatchDataset {
    pub fn new(records: Vec<MatchRecord>) -> Self {
        MatchDataset { records }
    }

    pub fn records(&self) -> &[MatchRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn for_champion<'a>(&'a self, champion: &'a str) -> impl Iterator<Item = &'a MatchRecord> + 'a {
        self.records.iter().filter(move |r| r.champion == champion)
    }

    /// Sorted unique champion names.
    pub fn champions(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|r| r.champion.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_riot_position_names() {
        assert_eq!("MIDDLE".parse::<Role>().unwrap(), Role::Mid);
        assert_eq!("utility".parse::<Role>().unwrap(), Role::Sup);
        assert_eq!("BOTTOM".parse::<Role>().unwrap(), Role::Adc);
        assert!("FEEDER".parse::<Role>().is_err());
    }

    #[test]
    fn role_filter_any_matches_everything() {
        let any: RoleFilter = "any".parse().unwrap();
        assert_eq!(any, RoleFilter::Any);
        assert!(any.matches(None));
        assert!(any.matches(Some(Role::Top)));

        let top: RoleFilter = "TOP".parse().unwrap();
        assert!(top.matches(Some(Role::Top)));
        assert!(!top.matches(Some(Role::Mid)));
        assert!(!top.matches(None));
    }

    #[test]
    fn side_accepts_team_ids() {
        assert_eq!(Side::parse("Blue"), Some(Side::Blue));
        assert_eq!(Side::parse("200"), Some(Side::Red));
        assert_eq!(Side::parse(""), None);
    }

    #[test]
    fn single_digit_patches_sort_before_double_digit() {
        let early: Patch = "14.2.611.2".parse().unwrap();
        let late: Patch = "14.11".parse().unwrap();
        assert!(early < late);
        assert_eq!(early.to_string(), "14.02");
        assert_eq!("14".parse::<Patch>().unwrap(), Patch::new(14, 0));
        assert!("latest".parse::<Patch>().is_err());
    }

    #[test]
    fn spell_combination_ignores_order() {
        let a = MatchRecord {
            summoner1_id: Some("4".into()),
            summoner2_id: Some("14".into()),
            ..Default::default()
        };
        let b = MatchRecord {
            summoner1_id: Some("14".into()),
            summoner2_id: Some("4".into()),
            ..Default::default()
        };
        assert_eq!(a.spell_combination(), b.spell_combination());
        assert_eq!(a.spell_combination().as_deref(), Some("14 + 4"));
    }

    #[test]
    fn lane_opponent_falls_back_to_own_slot() {
        let mut record = MatchRecord {
            role: Some(Role::Mid),
            ..Default::default()
        };
        record.enemies[2] = Some("Ahri".into());
        assert_eq!(record.lane_opponent(), Some("Ahri"));

        record.lane_opponent = Some("Zed".into());
        assert_eq!(record.lane_opponent(), Some("Zed"));
    }

    #[test]
    fn rune_slots_line_up_with_columns() {
        let mut record = MatchRecord::default();
        record.runes[0] = Some("Conqueror".into());
        record.runes[RUNE_SLOT_COUNT - 1] = Some("Adaptive Force".into());

        assert_eq!(record.rune(RuneSlot::Keystone), Some("Conqueror"));
        assert_eq!(record.rune(RuneSlot::ShardOffense), Some("Adaptive Force"));
        assert_eq!(record.rune(RuneSlot::ShardFlex), None);
        assert_eq!(RuneSlot::PrimaryRow2.column(), "perk_primary_row_2");
        assert_eq!(RuneSlot::ALL[RUNE_SLOT_COUNT - 1], RuneSlot::ShardOffense);
    }

    #[test]
    fn champions_are_sorted_and_unique() {
        let dataset = MatchDataset::new(vec![
            MatchRecord { champion: "Gnar".into(), ..Default::default() },
            MatchRecord { champion: "Aatrox".into(), ..Default::default() },
            MatchRecord { champion: "Gnar".into(), ..Default::default() },
        ]);
        assert_eq!(dataset.champions(), vec!["Aatrox".to_string(), "Gnar".to_string()]);
    }
}
