//! Configuration for the sync job, the CLI and the API server
//!
//! Loaded from a YAML file (`tasklytics.yaml` by default) and then overridden
//! from the environment. Every field has a default, so an absent file is fine.

use crate::error::{TasklyticsError, TasklyticsResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "tasklytics.yaml";

/// What to do when the period label already exists in the remote header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePeriodPolicy {
    /// Leave the sheet untouched and report `DuplicatePeriod`
    #[default]
    Refuse,
    /// Write matched categories into the existing column
    Rewrite,
}

/// What to do with categories present in new data but missing remotely
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NewCategoryPolicy {
    #[default]
    Skip,
    Append,
}

/// How repeated categories in a source table are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicateCategoryPolicy {
    #[default]
    Sum,
    First,
}

/// The knobs shared by the parser, classifier, aggregator and sync engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Leading columns that never hold observations (category, legacy revenue)
    pub reserved_columns: usize,
    /// Substrings stripped from text cells before numeric parsing
    pub currency_symbols: Vec<String>,
    pub duplicate_period: DuplicatePeriodPolicy,
    pub new_categories: NewCategoryPolicy,
    pub duplicate_categories: DuplicateCategoryPolicy,
    /// Source header naming the category column (falls back to column 0)
    pub category_column: String,
    /// Source header naming the price/revenue column (falls back to detection)
    pub value_column: String,
    /// Source header naming the quantity column (absent → 1.0 per row)
    pub units_column: String,
    /// Regex tried against lowercased headers when `value_column` is missing
    pub value_pattern: String,
    /// Regex tried against lowercased headers when `units_column` is missing
    pub units_pattern: String,
    /// chrono format for default period labels
    pub label_format: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            reserved_columns: 2,
            currency_symbols: vec!["₹".to_string(), "Rs".to_string(), "€".to_string()],
            duplicate_period: DuplicatePeriodPolicy::default(),
            new_categories: NewCategoryPolicy::default(),
            duplicate_categories: DuplicateCategoryPolicy::default(),
            category_column: "category".to_string(),
            value_column: "order_value_eur".to_string(),
            units_column: "units".to_string(),
            value_pattern: "revenue|order_value|sales|amount|price".to_string(),
            units_pattern: "units|quantity|qty".to_string(),
            label_format: "%Y-%m-%d".to_string(),
        }
    }
}

/// Which spreadsheet backend holds the dashboard table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemoteKind {
    #[default]
    Google,
    Xlsx,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    pub kind: RemoteKind,
    pub spreadsheet_id: String,
    pub worksheet: String,
    /// Workbook path for the xlsx backend
    pub path: Option<PathBuf>,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            kind: RemoteKind::default(),
            spreadsheet_id: String::new(),
            worksheet: "Sheet1".to_string(),
            path: None,
            base_url: "https://sheets.googleapis.com".to_string(),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CredentialsConfig {
    /// Environment variable holding a bearer token
    pub token_env: String,
    /// Command printing a bearer token (e.g. `gcloud auth print-access-token`)
    pub token_command: Option<String>,
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            token_env: "TASKLYTICS_ACCESS_TOKEN".to_string(),
            token_command: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Sales spreadsheet read by `sync` and `POST /api/sync`
    pub source: PathBuf,
    pub remote: RemoteConfig,
    pub credentials: CredentialsConfig,
    /// Shared secret required in `X-Sync-Secret` when set
    pub sync_secret: Option<String>,
    pub sync: SyncConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            source: PathBuf::from("sales_data.xlsx"),
            remote: RemoteConfig::default(),
            credentials: CredentialsConfig::default(),
            sync_secret: None,
            sync: SyncConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load config from `path`, or `tasklytics.yaml` if present, then apply env overrides
    pub fn load(path: Option<&Path>) -> TasklyticsResult<Self> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> TasklyticsResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            TasklyticsError::Config(format!("Cannot read {}: {}", path.display(), e))
        })?;
        Self::from_yaml_str(&content)
            .map_err(|e| TasklyticsError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn from_yaml_str(yaml: &str) -> TasklyticsResult<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml).map_err(|e| TasklyticsError::Config(e.to_string()))
    }

    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply `TASKLYTICS_*` overrides from any key lookup
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(id) = lookup("TASKLYTICS_SPREADSHEET_ID") {
            self.remote.spreadsheet_id = id;
        }
        if let Some(worksheet) = lookup("TASKLYTICS_WORKSHEET") {
            self.remote.worksheet = worksheet;
        }
        if let Some(source) = lookup("TASKLYTICS_SOURCE") {
            self.source = PathBuf::from(source);
        }
        if let Some(secret) = lookup("TASKLYTICS_SYNC_SECRET") {
            self.sync_secret = Some(secret).filter(|s| !s.is_empty());
        }
    }

    /// Point the remote at a local workbook instead of the hosted sheet
    pub fn with_workbook(mut self, path: impl Into<PathBuf>) -> Self {
        self.remote.kind = RemoteKind::Xlsx;
        self.remote.path = Some(path.into());
        self
    }

    pub fn validate(&self) -> TasklyticsResult<()> {
        if self.sync.reserved_columns == 0 {
            return Err(TasklyticsError::Config(
                "sync.reserved_columns must be at least 1 (column 0 is the category)".to_string(),
            ));
        }
        if self.remote.timeout_secs == 0 {
            return Err(TasklyticsError::Config(
                "remote.timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.remote.worksheet.trim().is_empty() {
            return Err(TasklyticsError::Config(
                "remote.worksheet must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
