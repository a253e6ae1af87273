use crate::analysis::heatmap::{HeatmapMetric, HeatmapRow};
use crate::analysis::items::ItemStat;
use crate::analysis::matchup::{Classification, MatchupReport, MatchupStat};
use crate::analysis::patches::PatchWinRate;
use crate::analysis::runes::RuneSlotPopularity;
use crate::analysis::sides::SideWinRate;
use crate::analysis::spells::SpellCombination;
use crate::data::record::Side;
use crate::error::AppError;
use colored::*;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
struct MatchupRow {
    rank: String,
    champion: String,
    games: String,
    win_rate: String,
    vs_average: String,
}

#[derive(Tabled)]
struct SideRow {
    champion: String,
    side: String,
    games: String,
    win_rate: String,
    gap: String,
}

#[derive(Tabled)]
struct SpellRow {
    #[tabled(rename = "#")]
    number: String,
    spells: String,
    games: String,
    win_rate: String,
}

#[derive(Tabled)]
struct RuneRow {
    rune: String,
    games: String,
    win_rate: String,
}

#[derive(Tabled)]
struct ItemRow {
    item: String,
    games: String,
    frequency: String,
    win_rate: String,
    size: String,
    x: String,
}

#[derive(Tabled)]
struct PatchRow {
    patch: String,
    games: String,
    wins: String,
    losses: String,
    win_rate: String,
    loss_rate: String,
}

fn header(title: &str, width: usize) {
    println!("\n{}", title.bold().cyan());
    println!("{}\n", "=".repeat(width).cyan());
}

fn classification_label(classification: Classification) -> String {
    let label = classification.to_string();
    match classification {
        Classification::Above => label.green().to_string(),
        Classification::Below => label.red().to_string(),
        Classification::Highlighted => label.yellow().bold().to_string(),
    }
}

fn matchup_rows(stats: &[MatchupStat]) -> Vec<MatchupRow> {
    stats
        .iter()
        .map(|stat| MatchupRow {
            rank: format!("#{}", stat.rank),
            champion: stat.counterpart.clone(),
            games: format!("{}", stat.n_games),
            win_rate: format!("{:.2}%", stat.win_rate),
            vs_average: classification_label(stat.classification),
        })
        .collect()
}

fn print_table<T: Tabled>(rows: Vec<T>) {
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}", table);
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), AppError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn display_enemy_matchups(report: &MatchupReport, subject: &str) {
    header(&format!("⚔️  Enemy Matchups for {}", subject), 60);
    println!(
        "{} {:.2}%\n",
        "📈 Average win rate:".bold(),
        report.baseline
    );

    if report.stats.is_empty() {
        println!(
            "{}",
            "No matchups meet the minimum games threshold".yellow()
        );
        return;
    }

    print_table(matchup_rows(&report.stats));

    if let Some(best) = report.stats.first() {
        println!(
            "\n{} {} ({:.2}% over {} games)",
            "Best matchup:".bold().green(),
            best.counterpart,
            best.win_rate,
            best.n_games
        );
    }
    if let Some(worst) = report.stats.last().filter(|_| report.stats.len() > 1) {
        println!(
            "{} {} ({:.2}% over {} games)",
            "Worst matchup:".bold().red(),
            worst.counterpart,
            worst.win_rate,
            worst.n_games
        );
    }
    println!();
}

pub fn display_ally_synergies(report: &MatchupReport, subject: &str) {
    header(&format!("👥 Ally Synergies for {}", subject), 60);
    println!(
        "{} {:.2}%\n",
        "📈 Average win rate:".bold(),
        report.baseline
    );

    if report.stats.is_empty() {
        println!(
            "{}",
            "No allies meet the minimum games threshold for this role".yellow()
        );
        return;
    }

    print_table(matchup_rows(&report.stats));

    let above = report.at_or_above_baseline();
    println!("\n{}", "Analysis".bold().yellow());
    println!(
        "• {} of {} allies lift your win rate to or above your average",
        above,
        report.stats.len()
    );
    println!();
}

pub fn display_baseline(champion: &str, baseline: f64, games: usize) {
    if games == 0 {
        println!("{} {}", "No games found for".yellow(), champion);
        return;
    }
    println!(
        "{} {}",
        champion.bold(),
        format!("{:.1}% Win Rate | {} games", baseline, games).red().bold()
    );
}

pub fn display_champions(champions: &[String]) {
    header(&format!("🎮 Champions ({})", champions.len()), 40);
    for champion in champions {
        println!("  {}", champion);
    }
    println!();
}

pub fn display_counterpart_options(options: &[String], min_games: u32) {
    header(&format!("🔎 Selectable counterparts ({}+ games)", min_games), 40);
    if options.is_empty() {
        println!("{}", "None".yellow());
    }
    for option in options {
        println!("  {}", option);
    }
    println!();
}

pub fn display_side_win_rates(rates: &[SideWinRate]) {
    header("🟦🟥 Win Rate by Side", 50);
    if rates.is_empty() {
        println!("{}", "No games with a recorded side".yellow());
        return;
    }

    let rows = rates
        .iter()
        .map(|r| SideRow {
            champion: r.champion.clone(),
            side: match r.side {
                Side::Blue => "Blue".blue().to_string(),
                Side::Red => "Red".red().to_string(),
            },
            games: format!("{}", r.n_games),
            win_rate: format!("{:.2}%", r.win_rate),
            gap: match r.win_rate_diff {
                Some(diff) => format!("Δ {:.1}%", diff),
                None => "-".to_string(),
            },
        })
        .collect();
    print_table::<SideRow>(rows);
    println!();
}

pub fn display_spell_combinations(champion: &str, combinations: &[SpellCombination]) {
    header(&format!("✨ Top Summoner Spell Combinations for {}", champion), 50);
    if combinations.is_empty() {
        println!("{}", "No summoner spell data".yellow());
        return;
    }

    let rows = combinations
        .iter()
        .enumerate()
        .map(|(idx, c)| SpellRow {
            number: format!("{}", idx + 1),
            spells: c.combination.clone(),
            games: format!("{}", c.count),
            win_rate: format!("{:.2}%", c.win_rate),
        })
        .collect();
    print_table::<SpellRow>(rows);
    println!();
}

pub fn display_rune_popularity(champion: &str, slots: &[RuneSlotPopularity]) {
    header(&format!("🔮 Top Runes for {}", champion), 50);
    if slots.is_empty() {
        println!("{}", "No rune data".yellow());
        return;
    }

    for slot in slots {
        println!("{}", slot.slot.label().bold());
        let rows = slot
            .runes
            .iter()
            .map(|r| RuneRow {
                rune: r.rune.clone(),
                games: format!("{}", r.count),
                win_rate: format!("{:.2}%", r.win_rate),
            })
            .collect();
        print_table::<RuneRow>(rows);
        println!();
    }
}

pub fn display_item_popularity(champion: &str, items: &[ItemStat], catalog_loaded: bool) {
    header(&format!("🛡️  Full Items for {}", champion), 70);
    if !catalog_loaded {
        println!("{}", "No item catalog loaded; full items cannot be identified".yellow());
        return;
    }
    if items.is_empty() {
        println!("{}", "No full items recorded".yellow());
        return;
    }

    let rows = items
        .iter()
        .map(|i| ItemRow {
            item: i.item.clone(),
            games: format!("{}", i.count),
            frequency: format!("{:.2}%", i.frequency),
            win_rate: format!("{:.2}%", i.win_rate * 100.0),
            size: format!("{:.1}", i.size),
            x: format!("{:.1}", i.x),
        })
        .collect();
    print_table::<ItemRow>(rows);
    println!();
}

pub fn display_heatmap(champion: &str, rows: &[HeatmapRow], sort_by: HeatmapMetric) {
    header(
        &format!("🔥 Performance Against Lane Opponents as {} (sorted by {})", champion, sort_by),
        90,
    );
    if rows.is_empty() {
        println!("{}", "No opponents meet the minimum games threshold".yellow());
        return;
    }

    let mut builder = tabled::builder::Builder::default();
    let mut head = vec!["opponent".to_string(), "games".to_string()];
    head.extend(HeatmapMetric::ALL.iter().map(|m| m.label().to_string()));
    builder.push_record(head);

    for row in rows {
        let mut record = vec![row.opponent.clone(), format!("{}", row.n_games)];
        for metric in HeatmapMetric::ALL {
            let text = match row.cell(metric) {
                Some(cell) => heat_cell(cell.raw, cell.normalized),
                None => "-".to_string(),
            };
            record.push(text);
        }
        builder.push_record(record);
    }

    let mut table = builder.build();
    table.with(Style::rounded());
    println!("{}", table);
    println!("\n{}", "Values are means; color shows rank among these opponents (green = better)".dimmed());
    println!();
}

fn heat_cell(raw: Option<f64>, normalized: Option<f64>) -> String {
    let (Some(raw), Some(normalized)) = (raw, normalized) else {
        return "-".to_string();
    };
    let text = format!("{:.2}", raw);
    if normalized >= 0.67 {
        text.green().to_string()
    } else if normalized <= 0.33 {
        text.red().to_string()
    } else {
        text.yellow().to_string()
    }
}

pub fn display_patch_win_rates(champion: &str, rates: &[PatchWinRate]) {
    header(&format!("📅 Win/Loss per Patch for {}", champion), 60);
    if rates.is_empty() {
        println!("{}", "No patch has enough games in the selected range".yellow());
        return;
    }

    let rows = rates
        .iter()
        .map(|r| PatchRow {
            patch: r.patch.to_string(),
            games: format!("{}", r.total_games),
            wins: r.wins.to_string().green().to_string(),
            losses: r.losses.to_string().red().to_string(),
            win_rate: format!("{:.2}%", r.win_rate),
            loss_rate: format!("{:.2}%", r.loss_rate),
        })
        .collect();
    print_table::<PatchRow>(rows);
    println!();
}

pub fn display_error(error: &str) {
    eprintln!("{} {}", "❌ Error:".red().bold(), error);
}

pub fn display_info(message: &str) {
    println!("{} {}", "ℹ️".cyan(), message);
}

pub fn display_success(message: &str) {
    println!("{} {}", "✓".green(), message);
}
