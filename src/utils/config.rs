use std::collections::HashMap;
use std::fs::File;
use std::io::{Write, BufRead, BufReader};
use std::path::Path;
use std::time::Duration;
use anyhow::{Result, Context, anyhow};
use tracing::info;

use crate::analytics::aggregate::DEFAULT_TOP_N;
use crate::sources::{FetchParams, SourceKind};

pub const DEFAULT_DB_PATH: &str = "artmuseum.db";
pub const DEFAULT_CAP: usize = 25;

const KEYS: &[&str] = &[
    "MUSEUM_DB_PATH",
    "HARVARD_API_KEY",
    "AIC_CAP",
    "MET_CAP",
    "HARVARD_CAP",
    "CLEVELAND_CAP",
    "AIC_PAGES",
    "TOP_N",
    "HTTP_TIMEOUT_SECS",
];

/// Per-run insertion ceiling for each museum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caps {
    pub aic: usize,
    pub met: usize,
    pub harvard: usize,
    pub cleveland: usize,
}

impl Default for Caps {
    fn default() -> Self {
        Self {
            aic: DEFAULT_CAP,
            met: DEFAULT_CAP,
            harvard: DEFAULT_CAP,
            cleveland: DEFAULT_CAP,
        }
    }
}

impl Caps {
    pub fn for_source(&self, kind: SourceKind) -> usize {
        match kind {
            SourceKind::Aic => self.aic,
            SourceKind::Met => self.met,
            SourceKind::Harvard => self.harvard,
            SourceKind::Cleveland => self.cleveland,
        }
    }

    pub fn set_all(&mut self, cap: usize) {
        *self = Self { aic: cap, met: cap, harvard: cap, cleveland: cap };
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub db_path: String,
    pub harvard_api_key: Option<String>,
    pub caps: Caps,
    pub aic_pages: u32,
    pub top_n: usize,
    pub http_timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            db_path: DEFAULT_DB_PATH.to_string(),
            harvard_api_key: None,
            caps: Caps::default(),
            aic_pages: 6,
            top_n: DEFAULT_TOP_N,
            http_timeout: Duration::from_secs(10),
        }
    }
}

impl Settings {
    /// Defaults, then `env_file` if it exists, then the process environment.
    pub fn load(env_file: &Path) -> Result<Self> {
        let mut values = HashMap::new();

        if env_file.exists() {
            values.extend(load_from_env(env_file)?);
            info!("Loaded settings from {:?}", env_file);
        }

        for key in KEYS {
            if let Ok(value) = std::env::var(key) {
                values.insert(key.to_string(), value);
            }
        }

        Self::from_values(&values)
    }

    fn from_values(values: &HashMap<String, String>) -> Result<Self> {
        let mut settings = Self::default();

        if let Some(path) = values.get("MUSEUM_DB_PATH") {
            settings.db_path = path.clone();
        }
        settings.harvard_api_key = values
            .get("HARVARD_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .cloned();

        settings.caps.aic = parse_or(values, "AIC_CAP", settings.caps.aic)?;
        settings.caps.met = parse_or(values, "MET_CAP", settings.caps.met)?;
        settings.caps.harvard = parse_or(values, "HARVARD_CAP", settings.caps.harvard)?;
        settings.caps.cleveland = parse_or(values, "CLEVELAND_CAP", settings.caps.cleveland)?;
        settings.aic_pages = parse_or(values, "AIC_PAGES", settings.aic_pages)?;
        settings.top_n = parse_or(values, "TOP_N", settings.top_n)?;
        settings.http_timeout =
            Duration::from_secs(parse_or(values, "HTTP_TIMEOUT_SECS", settings.http_timeout.as_secs())?);

        Ok(settings)
    }

    pub fn fetch_params(&self) -> FetchParams {
        FetchParams {
            aic_pages: self.aic_pages,
            met_batch_size: self.caps.met,
            harvard_api_key: self.harvard_api_key.clone(),
            timeout: self.http_timeout,
            ..FetchParams::default()
        }
    }
}

fn parse_or<T>(values: &HashMap<String, String>, key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match values.get(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid value for {}: {:?}", key, raw)),
        None => Ok(default),
    }
}

fn load_from_env(path: &Path) -> Result<HashMap<String, String>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut values = HashMap::new();

    for (number, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let (key, value) = line
            .split_once('=')
            .ok_or_else(|| anyhow!("{:?} line {}: expected KEY=VALUE", path, number + 1))?;
        values.insert(key.trim().to_string(), value.trim().to_string());
    }

    Ok(values)
}

/// Writes `settings` as a `.env` file that `Settings::load` reads back.
pub fn save_to_env(path: &Path, settings: &Settings) -> Result<()> {
    let mut file = File::create(path).context("Failed to create .env file")?;
    writeln!(file, "MUSEUM_DB_PATH={}", settings.db_path)?;
    if let Some(key) = &settings.harvard_api_key {
        writeln!(file, "HARVARD_API_KEY={}", key)?;
    }
    writeln!(file, "AIC_CAP={}", settings.caps.aic)?;
    writeln!(file, "MET_CAP={}", settings.caps.met)?;
    writeln!(file, "HARVARD_CAP={}", settings.caps.harvard)?;
    writeln!(file, "CLEVELAND_CAP={}", settings.caps.cleveland)?;
    writeln!(file, "AIC_PAGES={}", settings.aic_pages)?;
    writeln!(file, "TOP_N={}", settings.top_n)?;
    writeln!(file, "HTTP_TIMEOUT_SECS={}", settings.http_timeout.as_secs())?;
    Ok(())
}
