// CSV loading for the match table and the item catalog.
//
// The match file is validated once up front: missing required columns fail the
// load with every missing name listed. Unknown categorical values (roles,
// sides) load as `None` and are treated as "no data" by the analyses.

use super::record::{MatchDataset, MatchRecord, PerformanceMetrics, Role, Side, Team};
use super::slots;
use crate::error::AppError;
use serde::{Deserialize, Deserializer};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use tracing::{debug, info, warn};

const FULL_ITEM_CATEGORY: &str = "Full Item";

/// Columns the analyses cannot do without.
pub fn required_columns() -> Vec<String> {
    let mut columns = vec![
        "champion".to_string(),
        "win".to_string(),
        "team_position".to_string(),
    ];
    columns.extend(slots::all_columns(Team::Ally));
    columns.extend(slots::all_columns(Team::Enemy));
    columns
}

#[derive(Debug, Deserialize)]
struct RawMatchRow {
    champion: String,
    #[serde(deserialize_with = "deserialize_win")]
    win: bool,
    #[serde(default)]
    team_position: Option<String>,
    #[serde(default)]
    side: Option<String>,
    ally_1: Option<String>,
    ally_2: Option<String>,
    ally_3: Option<String>,
    ally_4: Option<String>,
    ally_5: Option<String>,
    enemy_1: Option<String>,
    enemy_2: Option<String>,
    enemy_3: Option<String>,
    enemy_4: Option<String>,
    enemy_5: Option<String>,
    #[serde(default)]
    lane_opponent: Option<String>,
    #[serde(default)]
    game_version: Option<String>,
    #[serde(default)]
    summoner1_id: Option<String>,
    #[serde(default)]
    summoner2_id: Option<String>,
    #[serde(default)]
    item0: Option<String>,
    #[serde(default)]
    item1: Option<String>,
    #[serde(default)]
    item2: Option<String>,
    #[serde(default)]
    item3: Option<String>,
    #[serde(default)]
    item4: Option<String>,
    #[serde(default)]
    item5: Option<String>,
    #[serde(default)]
    item6: Option<String>,
    #[serde(default)]
    kills: Option<String>,
    #[serde(default)]
    deaths: Option<String>,
    #[serde(default)]
    assists: Option<String>,
    #[serde(default)]
    gold_earned: Option<String>,
    #[serde(default)]
    total_minions_killed: Option<String>,
    #[serde(default)]
    game_duration: Option<String>,
    #[serde(default)]
    lane_minions_first_10_minutes: Option<String>,
    #[serde(default)]
    max_cs_advantage_on_lane_opponent: Option<String>,
    #[serde(default)]
    max_level_lead_lane_opponent: Option<String>,
    #[serde(default)]
    turret_plates_taken: Option<String>,
    #[serde(default)]
    solo_kills: Option<String>,
    #[serde(default)]
    perk_keystone: Option<String>,
    #[serde(default)]
    perk_primary_row_1: Option<String>,
    #[serde(default)]
    perk_primary_row_2: Option<String>,
    #[serde(default)]
    perk_primary_row_3: Option<String>,
    #[serde(default)]
    perk_secondary_row_1: Option<String>,
    #[serde(default)]
    perk_secondary_row_2: Option<String>,
    #[serde(default)]
    perk_primary_style: Option<String>,
    #[serde(default)]
    perk_secondary_style: Option<String>,
    #[serde(default)]
    perk_shard_defense: Option<String>,
    #[serde(default)]
    perk_shard_flex: Option<String>,
    #[serde(default)]
    perk_shard_offense: Option<String>,
}

impl RawMatchRow {
    /// Builds the record and counts metric cells that were present but not numeric.
    fn into_record(self) -> (MatchRecord, usize) {
        let role = self
            .team_position
            .as_deref()
            .and_then(|p| p.parse::<Role>().ok());
        let side = self.side.as_deref().and_then(Side::parse);

        let items = [
            self.item0, self.item1, self.item2, self.item3, self.item4, self.item5, self.item6,
        ]
        .into_iter()
        .flatten()
        .collect();

        let mut malformed = 0;
        let mut metric = |raw: Option<String>| parse_metric(raw.as_deref(), &mut malformed);
        let metrics = PerformanceMetrics {
            kills: metric(self.kills),
            deaths: metric(self.deaths),
            assists: metric(self.assists),
            gold_earned: metric(self.gold_earned),
            total_minions_killed: metric(self.total_minions_killed),
            game_duration: metric(self.game_duration),
            lane_minions_first_10_minutes: metric(self.lane_minions_first_10_minutes),
            max_cs_advantage_on_lane_opponent: metric(self.max_cs_advantage_on_lane_opponent),
            max_level_lead_lane_opponent: metric(self.max_level_lead_lane_opponent),
            turret_plates_taken: metric(self.turret_plates_taken),
            solo_kills: metric(self.solo_kills),
        };

        // Same order as RuneSlot::ALL
        let runes = [
            self.perk_keystone,
            self.perk_primary_row_1,
            self.perk_primary_row_2,
            self.perk_primary_row_3,
            self.perk_secondary_row_1,
            self.perk_secondary_row_2,
            self.perk_primary_style,
            self.perk_secondary_style,
            self.perk_shard_defense,
            self.perk_shard_flex,
            self.perk_shard_offense,
        ];

        let record = MatchRecord {
            champion: self.champion,
            role,
            side,
            win: self.win,
            allies: [self.ally_1, self.ally_2, self.ally_3, self.ally_4, self.ally_5],
            enemies: [self.enemy_1, self.enemy_2, self.enemy_3, self.enemy_4, self.enemy_5],
            lane_opponent: self.lane_opponent,
            game_version: self.game_version,
            summoner1_id: self.summoner1_id,
            summoner2_id: self.summoner2_id,
            items,
            runes,
            metrics,
        };
        (record, malformed)
    }
}

/// Empty cells are missing data; anything else that is not a finite number
/// is counted in `malformed` and also treated as missing.
fn parse_metric(raw: Option<&str>, malformed: &mut usize) -> Option<f64> {
    let text = raw.map(str::trim).filter(|t| !t.is_empty())?;
    match text.parse::<f64>() {
        Ok(value) if value.is_finite() => Some(value),
        _ => {
            *malformed += 1;
            None
        }
    }
}

fn parse_win(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "1.0" => Some(true),
        "false" | "0" | "0.0" => Some(false),
        _ => None,
    }
}

fn deserialize_win<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_win(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid win value '{}'", raw)))
}

fn open(path: &Path) -> Result<File, AppError> {
    File::open(path).map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            AppError::DataFileNotFound {
                path: path.display().to_string(),
            }
        } else {
            AppError::Io {
                path: path.display().to_string(),
                source: e,
            }
        }
    })
}

pub fn load_matches(path: &Path) -> Result<MatchDataset, AppError> {
    let file = open(path)?;
    read_matches(file, &path.display().to_string())
}

/// Reads match rows from any reader. `source` names the input in errors.
pub fn read_matches<R: Read>(reader: R, source: &str) -> Result<MatchDataset, AppError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers().map_err(|e| AppError::Csv {
        path: source.to_string(),
        source: e,
    })?;
    let present: BTreeSet<&str> = headers.iter().collect();
    let missing: Vec<String> = required_columns()
        .into_iter()
        .filter(|column| !present.contains(column.as_str()))
        .collect();
    if !missing.is_empty() {
        return Err(AppError::MissingColumns {
            path: source.to_string(),
            columns: missing,
        });
    }

    let mut records = Vec::new();
    let mut malformed_rows = 0usize;
    let mut malformed_cells = 0usize;
    for row in rdr.deserialize::<RawMatchRow>() {
        let raw = row.map_err(|e| AppError::Csv {
            path: source.to_string(),
            source: e,
        })?;
        let (record, malformed) = raw.into_record();
        if malformed > 0 {
            malformed_rows += 1;
            malformed_cells += malformed;
        }
        records.push(record);
    }

    if malformed_rows > 0 {
        warn!(
            source,
            rows = malformed_rows,
            cells = malformed_cells,
            "non-numeric metric values treated as missing"
        );
    }

    let unplaced = records.iter().filter(|r| r.role.is_none()).count();
    if unplaced > 0 {
        warn!(source, unplaced, "rows without a recognised team_position");
    }
    info!(source, rows = records.len(), "loaded match data");

    Ok(MatchDataset::new(records))
}

#[derive(Debug, Deserialize)]
struct RawItemRow {
    #[serde(rename = "Item")]
    item: String,
    #[serde(rename = "Category", default)]
    category: Option<String>,
}

/// Item names known to be completed ("full") items.
#[derive(Debug, Clone, Default)]
pub struct ItemCatalog {
    full_items: BTreeSet<String>,
}

impl ItemCatalog {
    pub fn from_full_items<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ItemCatalog {
            full_items: items.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_full_item(&self, item: &str) -> bool {
        self.full_items.contains(item)
    }

    pub fn is_empty(&self) -> bool {
        self.full_items.is_empty()
    }
}

/// Loads the item catalog. A missing file gives an empty catalog.
pub fn load_item_catalog(path: &Path) -> Result<ItemCatalog, AppError> {
    match open(path) {
        Ok(file) => read_item_catalog(file, &path.display().to_string()),
        Err(AppError::DataFileNotFound { path: missing }) => {
            warn!(path = %missing, "item catalog not found, continuing without one");
            Ok(ItemCatalog::default())
        }
        Err(e) => Err(e),
    }
}

pub fn read_item_catalog<R: Read>(reader: R, source: &str) -> Result<ItemCatalog, AppError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut full_items = BTreeSet::new();
    for row in rdr.deserialize::<RawItemRow>() {
        let raw = row.map_err(|e| AppError::Csv {
            path: source.to_string(),
            source: e,
        })?;
        if raw.category.as_deref() == Some(FULL_ITEM_CATEGORY) {
            full_items.insert(raw.item);
        }
    }
    debug!(source, full_items = full_items.len(), "loaded item catalog");

    Ok(ItemCatalog::from_full_items(full_items))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::record::RuneSlot;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    const REQUIRED_COLUMNS_ONLY: &str = "champion,win,team_position,ally_1,ally_2,ally_3,ally_4,ally_5,enemy_1,enemy_2,enemy_3,enemy_4,enemy_5\nGnar,0,TOP,a,b,c,d,e,f,g,h,i,j\n";
    const HEADER: &str = "champion,win,team_position,side,ally_1,ally_2,ally_3,ally_4,ally_5,enemy_1,enemy_2,enemy_3,enemy_4,enemy_5,deaths,game_version,summoner1_id,summoner2_id,item0,item1";

    #[test]
    fn loads_typed_records() {
        let csv = format!(
            "{}\n{}\n{}\n",
            HEADER,
            "Aatrox,True,TOP,blue,Aatrox,Vi,Ahri,Jinx,Lulu,Garen,Lee Sin,Zed,Ezreal,Nami,3,14.2.611.2,4,12,Eclipse,",
            "Aatrox,0,MIDDLE,200,Gnar,Vi,Aatrox,Jinx,,Darius,Lee Sin,Zed,Ezreal,Nami,n/a,,4,12,,"
        );
        let dataset = read_matches(csv.as_bytes(), "inline").unwrap();
        assert_eq!(dataset.len(), 2);

        let first = &dataset.records()[0];
        assert!(first.win);
        assert_eq!(first.role, Some(Role::Top));
        assert_eq!(first.side, Some(Side::Blue));
        assert_eq!(first.enemies[0].as_deref(), Some("Garen"));
        assert_eq!(first.metrics.deaths, Some(3.0));
        assert_eq!(first.items, vec!["Eclipse".to_string()]);
        assert_eq!(first.patch().map(|p| p.to_string()).as_deref(), Some("14.02"));

        let second = &dataset.records()[1];
        assert!(!second.win);
        assert_eq!(second.role, Some(Role::Mid));
        assert_eq!(second.side, Some(Side::Red));
        assert_eq!(second.allies[4], None);
        assert_eq!(second.metrics.deaths, None);
        assert!(second.items.is_empty());
    }

    #[test]
    fn non_numeric_metrics_are_counted_and_dropped() {
        let csv = format!(
            "{}\n{}\n",
            HEADER, "Aatrox,True,TOP,blue,a,b,c,d,e,f,g,h,i,j,n/a,,,,,"
        );
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(csv.as_bytes());
        let raw: RawMatchRow = rdr.deserialize().next().unwrap().unwrap();
        let (record, malformed) = raw.into_record();
        assert_eq!(malformed, 1);
        assert_eq!(record.metrics.deaths, None);

        let mut malformed = 0;
        assert_eq!(parse_metric(Some(" 4.5 "), &mut malformed), Some(4.5));
        assert_eq!(parse_metric(Some(""), &mut malformed), None);
        assert_eq!(parse_metric(None, &mut malformed), None);
        assert_eq!(malformed, 0);
        assert_eq!(parse_metric(Some("inf"), &mut malformed), None);
        assert_eq!(malformed, 1);
    }

    #[test]
    fn rune_columns_are_optional() {
        let csv = concat!(
            "champion,win,team_position,ally_1,ally_2,ally_3,ally_4,ally_5,",
            "enemy_1,enemy_2,enemy_3,enemy_4,enemy_5,perk_keystone,perk_shard_flex\n",
            "Aatrox,True,TOP,a,b,c,d,e,f,g,h,i,j,Conqueror,\n",
        );
        let dataset = read_matches(csv.as_bytes(), "inline").unwrap();
        let record = &dataset.records()[0];
        assert_eq!(record.rune(RuneSlot::Keystone), Some("Conqueror"));
        assert_eq!(record.rune(RuneSlot::ShardFlex), None);
        assert_eq!(record.rune(RuneSlot::PrimaryStyle), None);

        let without = read_matches(REQUIRED_COLUMNS_ONLY.as_bytes(), "inline").unwrap();
        assert!(without.records()[0].runes.iter().all(Option::is_none));
    }

    #[test]
    fn unknown_role_loads_as_no_data() {
        let csv = format!(
            "{}\n{}\n",
            HEADER, "Aatrox,True,FILL,,a,b,c,d,e,f,g,h,i,j,,,,,,"
        );
        let dataset = read_matches(csv.as_bytes(), "inline").unwrap();
        assert_eq!(dataset.records()[0].role, None);
        assert_eq!(dataset.records()[0].side, None);
    }

    #[test]
    fn missing_columns_fail_fast_and_are_all_listed() {
        let csv = "champion,win,ally_1\nAatrox,True,Vi\n";
        let err = read_matches(csv.as_bytes(), "broken.csv").unwrap_err();
        match err {
            AppError::MissingColumns { path, columns } => {
                assert_eq!(path, "broken.csv");
                assert!(columns.contains(&"team_position".to_string()));
                assert!(columns.contains(&"enemy_5".to_string()));
                assert!(!columns.contains(&"ally_1".to_string()));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn bad_win_value_is_a_csv_error() {
        let csv = format!("{}\n{}\n", HEADER, "Aatrox,maybe,TOP,,a,b,c,d,e,f,g,h,i,j,,,,,,");
        let err = read_matches(csv.as_bytes(), "inline").unwrap_err();
        assert!(matches!(err, AppError::Csv { .. }));
    }

    #[test]
    fn missing_file_is_reported_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.csv");
        let err = load_matches(&path).unwrap_err();
        assert!(matches!(err, AppError::DataFileNotFound { .. }));
        assert!(err.to_string().contains("nope.csv"));
    }

    #[test]
    fn loads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{}", HEADER).unwrap();
        writeln!(file, "Gnar,False,TOP,Red,Gnar,Vi,Ahri,Jinx,Lulu,Garen,Lee Sin,Zed,Ezreal,Nami,,,,,,").unwrap();
        let dataset = load_matches(file.path()).unwrap();
        assert_eq!(dataset.champions(), vec!["Gnar".to_string()]);
    }

    #[test]
    fn item_catalog_keeps_only_full_items() {
        let csv = "Item,Category\nEclipse,Full Item\nLong Sword,Basic\nTrinity Force,Full Item\n";
        let catalog = read_item_catalog(csv.as_bytes(), "items.csv").unwrap();
        assert!(catalog.is_full_item("Eclipse"));
        assert!(catalog.is_full_item("Trinity Force"));
        assert!(!catalog.is_full_item("Long Sword"));
    }

    #[test]
    fn missing_item_catalog_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = load_item_catalog(&dir.path().join("items.csv")).unwrap();
        assert!(catalog.is_empty());
    }
}
