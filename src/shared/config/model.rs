use std::env;

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub index: IndexConfig,
    #[serde(default)]
    pub jobs: JobsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Daily rolling log files are written here when set.
    pub log_dir: Option<String>,
    #[serde(default = "default_stdout_level")]
    pub stdout_level: String,
    #[serde(default = "default_file_level")]
    pub file_level: String,
}

fn default_stdout_level() -> String {
    "info".to_string()
}

fn default_file_level() -> String {
    "debug".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_dir: None,
            stdout_level: default_stdout_level(),
            file_level: default_file_level(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    pub name: String,
    pub batch_size: usize,
    pub shards: u32,
    pub replicas: u32,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            name: "dataw_fro03".to_string(),
            batch_size: 500,
            shards: 1,
            replicas: 1,
        }
    }
}

/// How a delimited input file is read.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// One file per shard.
    pub paths: Vec<String>,
    pub delimiter: char,
    /// Column names for header-less files. Empty means the first line is a header.
    pub columns: Vec<String>,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            paths: Vec::new(),
            delimiter: ',',
            columns: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct JobsConfig {
    pub top_orders: TopOrdersConfig,
    pub sampled_orders: SampledOrdersConfig,
    pub best_city_order: BestCityOrderConfig,
    pub orders_by_year: OrdersByYearConfig,
    pub top_client: TopClientConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TopOrdersConfig {
    pub input: InputConfig,
    pub departments: Vec<String>,
    pub year_min: i32,
    pub year_max: i32,
    pub bound: usize,
}

impl Default for TopOrdersConfig {
    fn default() -> Self {
        Self {
            input: InputConfig::default(),
            departments: vec!["53".into(), "61".into(), "28".into()],
            year_min: 2006,
            year_max: 2010,
            bound: 100,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SampledOrdersConfig {
    pub input: InputConfig,
    pub departments: Vec<String>,
    pub year_min: i32,
    pub year_max: i32,
    pub bound: usize,
    pub fraction: f64,
    pub seed: u64,
}

impl Default for SampledOrdersConfig {
    fn default() -> Self {
        Self {
            input: InputConfig::default(),
            departments: vec!["22".into(), "49".into(), "53".into()],
            year_min: 2011,
            year_max: 2016,
            bound: 100,
            fraction: 0.05,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BestCityOrderConfig {
    pub input: InputConfig,
    /// Matched as a substring of the order date.
    pub year: String,
    /// Matched case-insensitively as a substring of the client city.
    pub city: String,
    pub bound: usize,
}

impl Default for BestCityOrderConfig {
    fn default() -> Self {
        Self {
            input: InputConfig::default(),
            year: "2020".to_string(),
            city: "NANTES".to_string(),
            bound: 1,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OrdersByYearConfig {
    pub input: InputConfig,
    pub year_min: i32,
    pub year_max: i32,
}

impl Default for OrdersByYearConfig {
    fn default() -> Self {
        Self {
            input: InputConfig::default(),
            year_min: 2010,
            year_max: 2015,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TopClientConfig {
    pub input: InputConfig,
    pub bound: usize,
}

impl Default for TopClientConfig {
    fn default() -> Self {
        Self {
            input: InputConfig::default(),
            bound: 1,
        }
    }
}

/// Loads `path`, else `$RETAIL_RANK_CONFIG`, else `config.toml` when present,
/// then applies `RETAIL_RANK__SECTION__KEY` environment overrides.
pub fn load_settings(path: Option<&str>) -> Result<Settings, config::ConfigError> {
    let explicit = path
        .map(str::to_string)
        .or_else(|| env::var("RETAIL_RANK_CONFIG").ok());
    let file = match &explicit {
        Some(path) => config::File::with_name(path),
        None => config::File::with_name("config").required(false),
    };

    let settings: Settings = config::Config::builder()
        .add_source(file)
        .add_source(
            config::Environment::with_prefix("RETAIL_RANK")
                .separator("__")
                .try_parsing(true),
        )
        .build()?
        .try_deserialize()?;

    Ok(settings)
}
