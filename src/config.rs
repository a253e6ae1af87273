use crate::error::AppError;
use std::env;
use std::path::PathBuf;

const DEFAULT_DATA_PATH: &str = "data/cleaned_data.csv";
const DEFAULT_ITEMS_PATH: &str = "data/items.csv";
const DEFAULT_TOP_N: usize = 5;

#[derive(Debug, Clone)]
pub struct Config {
    pub data_path: PathBuf,
    pub items_path: PathBuf,
    pub top_n: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let data_path = lookup("LEAGUE_DATA_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH));

        let items_path = lookup("LEAGUE_ITEMS_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ITEMS_PATH));

        let top_n = match lookup("LEAGUE_TOP_N") {
            Some(raw) => raw.trim().parse::<usize>().map_err(|_| {
                AppError::ConfigError(format!("LEAGUE_TOP_N must be a whole number, got '{}'", raw))
            })?,
            None => DEFAULT_TOP_N,
        };

        Ok(Config {
            data_path,
            items_path,
            top_n,
        })
    }
}
