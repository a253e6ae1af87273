mod analysis;
mod config;
mod data;
mod display;
mod error;

use analysis::heatmap::{build_heatmap, HeatmapMetric, HeatmapRequest, HEATMAP_MIN_GAMES_DEFAULT};
use analysis::items::item_popularity;
use analysis::matchup::{
    parse_min_games, AggregationRequest, MatchupAggregator, ALLY_MIN_GAMES_DEFAULT, ENEMY_MIN_GAMES_DEFAULT,
    OPTIONS_MIN_GAMES_DEFAULT,
};
use analysis::patches::{patch_win_rates, PatchRange, PATCH_MIN_GAMES_DEFAULT};
use analysis::runes::{top_runes, DEFAULT_RUNE_LIMIT};
use analysis::sides::side_win_rates;
use analysis::spells::{top_spell_combinations, DEFAULT_SPELL_LIMIT};
use anyhow::Context;
use clap::{Parser, Subcommand};
use config::Config;
use data::loader::{load_item_catalog, load_matches};
use data::record::{MatchDataset, Patch, RoleFilter};
use data::slots::CounterpartSelector;
use display::output::*;
use indicatif::ProgressBar;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "League Matchups")]
#[command(about = "Champion win rates, matchups and synergies from recorded match data", long_about = None)]
struct Args {
    /// Match data CSV (overrides LEAGUE_DATA_PATH)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Item catalog CSV (overrides LEAGUE_ITEMS_PATH)
    #[arg(long, global = true)]
    items: Option<PathBuf>,

    /// Number of best and of worst matchups to show (overrides LEAGUE_TOP_N)
    #[arg(long, global = true)]
    top_n: Option<usize>,

    /// Print results as JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every champion in the data set
    Champions,

    /// Overall win rate of a champion
    Baseline { champion: String },

    /// Best and worst enemy matchups
    Enemies {
        champion: String,

        /// Your role (TOP, JUNGLE, MID, ADC, SUP or ANY)
        #[arg(short, long, default_value = "ANY")]
        role: RoleFilter,

        /// Enemy role to compare against
        #[arg(short, long, default_value = "ANY")]
        enemy_role: RoleFilter,

        /// Minimum games per enemy; non-numeric values fall back to 10
        #[arg(short, long)]
        min_games: Option<String>,

        /// Always include this enemy, marked as highlighted
        #[arg(long)]
        highlight: Option<String>,

        /// Show every enemy instead of only the best and worst
        #[arg(long)]
        all: bool,
    },

    /// Win rate with each ally in a role
    Allies {
        champion: String,

        #[arg(short, long, default_value = "ANY")]
        role: RoleFilter,

        /// Ally role to look at
        #[arg(short, long, default_value = "JUNGLE")]
        ally_role: RoleFilter,

        /// Minimum games per ally; non-numeric values fall back to 10
        #[arg(short, long)]
        min_games: Option<String>,

        #[arg(long)]
        highlight: Option<String>,
    },

    /// Counterparts with enough games to be highlighted
    Options {
        champion: String,

        #[arg(short, long, default_value = "ANY")]
        role: RoleFilter,

        #[arg(short, long, default_value = "ANY")]
        enemy_role: RoleFilter,

        /// Non-numeric values fall back to 50
        #[arg(short, long)]
        min_games: Option<String>,
    },

    /// Blue and red side win rates
    Sides {
        /// Champions to include; all when omitted
        champions: Vec<String>,
    },

    /// Most played summoner spell combinations
    Spells {
        champion: String,

        #[arg(short, long, default_value_t = DEFAULT_SPELL_LIMIT)]
        limit: usize,
    },

    /// Most picked runes in every rune slot
    Runes {
        champion: String,

        #[arg(short, long, default_value_t = DEFAULT_RUNE_LIMIT)]
        limit: usize,
    },

    /// Full item popularity with swarm positions
    Items {
        champion: String,

        #[arg(short, long, default_value = "ANY")]
        role: RoleFilter,
    },

    /// Performance metrics against each lane opponent
    Heatmap {
        champion: String,

        #[arg(short, long, default_value = "ANY")]
        role: RoleFilter,

        /// Minimum games per opponent; non-numeric values fall back to 50
        #[arg(short, long)]
        min_games: Option<String>,

        /// Metric to sort by, e.g. winrate, cs-advantage, deaths
        #[arg(short, long, default_value = "Winrate")]
        sort_by: HeatmapMetric,
    },

    /// Win and loss rate per patch
    Patches {
        champion: String,

        /// First patch to include (default 14.11)
        #[arg(long)]
        from: Option<Patch>,

        /// Last patch to include (default 14.19)
        #[arg(long)]
        to: Option<Patch>,

        #[arg(short, long, default_value_t = PATCH_MIN_GAMES_DEFAULT)]
        min_games: u32,
    },
}

fn main() {
    let args = Args::parse();
    init_tracing(&args.log_level);

    if let Err(e) = run(args) {
        display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_dataset(path: &Path, quiet: bool) -> anyhow::Result<MatchDataset> {
    let spinner = if quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new_spinner()
    };
    spinner.set_message(format!("Loading {}", path.display()));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let dataset = load_matches(path).with_context(|| "could not load match data")?;
    spinner.finish_and_clear();

    if !quiet {
        if dataset.is_empty() {
            display_info(&format!("{} has no match rows", path.display()));
        } else {
            display_success(&format!("Loaded {} games from {}", dataset.len(), path.display()));
        }
    }
    Ok(dataset)
}

fn run(args: Args) -> anyhow::Result<()> {
    let mut config = Config::from_env()?;
    if let Some(data) = args.data {
        config.data_path = data;
    }
    if let Some(items) = args.items {
        config.items_path = items;
    }
    if let Some(top_n) = args.top_n {
        config.top_n = top_n;
    }

    let json = args.json;
    let dataset = load_dataset(&config.data_path, json)?;
    let aggregator = MatchupAggregator::new(&dataset);

    match args.command {
        Command::Champions => {
            let champions = dataset.champions();
            if json {
                print_json(&champions)?;
            } else {
                display_champions(&champions);
            }
        }

        Command::Baseline { champion } => {
            let baseline = aggregator.compute_baseline_rate(&champion);
            let games = dataset.for_champion(&champion).count();
            if json {
                print_json(&serde_json::json!({
                    "champion": champion,
                    "win_rate": baseline,
                    "n_games": games,
                }))?;
            } else {
                display_baseline(&champion, baseline, games);
            }
        }

        Command::Enemies {
            champion,
            role,
            enemy_role,
            min_games,
            highlight,
            all,
        } => {
            let request = AggregationRequest::new(&champion, role, CounterpartSelector::enemy(enemy_role))
                .with_min_games(parse_min_games(min_games.as_deref(), ENEMY_MIN_GAMES_DEFAULT))
                .with_highlight(highlight);

            let report = if all {
                aggregator.full_report(&request)
            } else {
                aggregator.highlight_report(&request, config.top_n, config.top_n)
            };

            if json {
                print_json(&report)?;
            } else {
                if !all {
                    display_info(&format!(
                        "Showing best and worst matchups vs {} enemies ({}+ games)",
                        enemy_role, request.min_games
                    ));
                }
                display_enemy_matchups(&report, &subject_label(&champion, role));
            }
        }

        Command::Allies {
            champion,
            role,
            ally_role,
            min_games,
            highlight,
        } => {
            let request = AggregationRequest::new(&champion, role, CounterpartSelector::ally(ally_role))
                .with_min_games(parse_min_games(min_games.as_deref(), ALLY_MIN_GAMES_DEFAULT))
                .with_highlight(highlight);
            let report = aggregator.full_report(&request);

            if json {
                print_json(&report)?;
            } else {
                if role.role().is_some() && role == ally_role {
                    display_info("Ally role matches your own role; there is no self-synergy to show");
                }
                display_ally_synergies(&report, &subject_label(&champion, role));
            }
        }

        Command::Options {
            champion,
            role,
            enemy_role,
            min_games,
        } => {
            let min_games = parse_min_games(min_games.as_deref(), OPTIONS_MIN_GAMES_DEFAULT);
            let request = AggregationRequest::new(&champion, role, CounterpartSelector::enemy(enemy_role))
                .with_min_games(min_games);
            let options = aggregator.counterpart_options(&request);
            if json {
                print_json(&options)?;
            } else {
                display_counterpart_options(&options, min_games);
            }
        }

        Command::Sides { champions } => {
            let rates = side_win_rates(&dataset, &champions);
            if json {
                print_json(&rates)?;
            } else {
                display_side_win_rates(&rates);
            }
        }

        Command::Spells { champion, limit } => {
            let combinations = top_spell_combinations(&dataset, &champion, limit);
            if json {
                print_json(&combinations)?;
            } else {
                display_spell_combinations(&champion, &combinations);
            }
        }

        Command::Runes { champion, limit } => {
            let slots = top_runes(&dataset, &champion, limit);
            if json {
                print_json(&slots)?;
            } else {
                display_rune_popularity(&champion, &slots);
            }
        }

        Command::Items { champion, role } => {
            let catalog = load_item_catalog(&config.items_path)?;
            let items = item_popularity(&dataset, &catalog, &champion, role);
            if json {
                print_json(&items)?;
            } else {
                display_item_popularity(&subject_label(&champion, role), &items, !catalog.is_empty());
            }
        }

        Command::Heatmap {
            champion,
            role,
            min_games,
            sort_by,
        } => {
            let request = HeatmapRequest {
                champion,
                role,
                min_games: parse_min_games(min_games.as_deref(), HEATMAP_MIN_GAMES_DEFAULT),
                sort_by,
            };
            let rows = build_heatmap(&dataset, &request);
            if json {
                print_json(&rows)?;
            } else {
                display_heatmap(&subject_label(&request.champion, request.role), &rows, sort_by);
            }
        }

        Command::Patches {
            champion,
            from,
            to,
            min_games,
        } => {
            let range = PatchRange::bounded(from, to);
            let rates = patch_win_rates(&dataset, &champion, range, min_games);
            if json {
                print_json(&rates)?;
            } else {
                display_patch_win_rates(&champion, &rates);
            }
        }
    }

    Ok(())
}

fn subject_label(champion: &str, role: RoleFilter) -> String {
    match role.role() {
        Some(role) => format!("{} ({})", champion, role),
        None => champion.to_string(),
    }
}
