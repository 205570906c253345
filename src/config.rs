use std::{env, path::Path, path::PathBuf};

use config::ConfigError;
use directories::BaseDirs;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

use crate::insight::InsightConfig;
use crate::table::DEFAULT_PAGE_SIZE;

const CONFIG: &str = include_str!("../.config/config.json5");

lazy_static! {
    pub static ref PROJECT_NAME: String = env!("CARGO_CRATE_NAME").to_uppercase().to_string();
    pub static ref CONFIG_FOLDER: Option<PathBuf> =
        env::var(format!("{}_CONFIG", PROJECT_NAME.clone()))
            .ok()
            .map(PathBuf::from);
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    #[serde(default = "default_orchestrator_url")]
    pub url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_orchestrator_url() -> String {
    "http://localhost:8000/".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            url: default_orchestrator_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TableConfig {
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default = "default_page_buttons")]
    pub page_buttons: usize,
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_page_buttons() -> usize {
    5
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            page_buttons: default_page_buttons(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    #[serde(default = "default_chart_title")]
    pub default_title: String,
}

fn default_chart_title() -> String {
    crate::chart::DEFAULT_CHART_TITLE.to_string()
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            default_title: default_chart_title(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryConfig {
    #[serde(default = "default_sql_preview_chars")]
    pub sql_preview_chars: usize,
}

fn default_sql_preview_chars() -> usize {
    50
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            sql_preview_chars: default_sql_preview_chars(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub orchestrator: OrchestratorConfig,
    #[serde(default)]
    pub table: TableConfig,
    #[serde(default)]
    pub chart: ChartConfig,
    #[serde(default)]
    pub insights: InsightConfig,
    #[serde(default)]
    pub history: HistoryConfig,
}

impl Config {
    /// The defaults compiled into the binary
    pub fn embedded() -> Result<Self, ConfigError> {
        json5::from_str(CONFIG).map_err(|e| ConfigError::Message(format!("embedded config: {e}")))
    }

    /// Layer the embedded defaults, a config file and `SQLDASH_*` environment
    /// variables, later sources winning.
    ///
    /// An explicit `config_path` must exist. Without one,
    /// `$SQLDASH_CONFIG/config.json5` and then `~/.sqldash-config.json5` are
    /// used when present.
    pub fn from_path(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::from_sources(config_path, None)
    }

    /// Like [`Config::from_path`], reading overrides from `env` instead of
    /// the process environment when given.
    pub fn from_sources(
        config_path: Option<&Path>,
        env: Option<config::Map<String, String>>,
    ) -> Result<Self, ConfigError> {
        let mut builder =
            config::Config::builder().add_source(config::Config::try_from(&Self::embedded()?)?);

        let selected = match config_path {
            Some(p) => Some((expand_tilde(p), true)),
            None => default_config_paths().into_iter().find(|p| p.exists()).map(|p| (p, false)),
        };
        if let Some((path, required)) = selected {
            builder = builder.add_source(
                config::File::from(path)
                    .format(config::FileFormat::Json5)
                    .required(required),
            );
        }

        builder = builder.add_source(
            config::Environment::with_prefix(PROJECT_NAME.as_str())
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .source(env),
        );

        let cfg: Self = builder.build()?.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.table.page_size == 0 {
            return Err(ConfigError::Message("table.page_size must be at least 1".into()));
        }
        if self.orchestrator.timeout_secs == 0 {
            return Err(ConfigError::Message(
                "orchestrator.timeout_secs must be at least 1".into(),
            ));
        }
        let ratio = self.insights.repetition_ratio;
        if !(0.0..=1.0).contains(&ratio) {
            return Err(ConfigError::Message(format!(
                "insights.repetition_ratio must be within [0, 1], got {ratio}"
            )));
        }
        Ok(())
    }
}

fn expand_tilde(path: &Path) -> PathBuf {
    if let Some(s) = path.to_str() {
        if s.starts_with('~') {
            if let Some(base) = BaseDirs::new() {
                return PathBuf::from(s.replacen('~', base.home_dir().to_str().unwrap_or(""), 1));
            }
        }
    }
    path.to_path_buf()
}

fn default_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(dir) = CONFIG_FOLDER.clone() {
        paths.push(dir.join("config.json5"));
    }
    paths.push(default_home_config_path());
    paths
}

fn default_home_config_path() -> PathBuf {
    if let Some(base) = BaseDirs::new() {
        return base.home_dir().join(".sqldash-config.json5");
    }
    PathBuf::from(".sqldash-config.json5")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn no_env() -> Option<config::Map<String, String>> {
        Some(config::Map::new())
    }

    #[test]
    fn test_embedded_matches_defaults() {
        assert_eq!(Config::embedded().unwrap(), Config::default());
    }

    #[test]
    fn test_file_overrides_embedded() {
        let mut file = tempfile::Builder::new().suffix(".json5").tempfile().unwrap();
        writeln!(file, "{{ table: {{ page_size: 25 }}, chart: {{ default_title: 'Vendas' }} }}").unwrap();
        let cfg = Config::from_sources(Some(file.path()), no_env()).unwrap();
        assert_eq!(cfg.table.page_size, 25);
        assert_eq!(cfg.table.page_buttons, 5);
        assert_eq!(cfg.chart.default_title, "Vendas");
        assert_eq!(cfg.orchestrator, OrchestratorConfig::default());
    }

    #[test]
    fn test_env_overrides_file() {
        let env = [
            ("SQLDASH_ORCHESTRATOR__URL", "http://orchestrator:9000/"),
            ("SQLDASH_INSIGHTS__MAX_OUTLIER_FACTOR", "2"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        let mut file = tempfile::Builder::new().suffix(".json5").tempfile().unwrap();
        writeln!(file, "{{ orchestrator: {{ url: 'http://file:1/' }} }}").unwrap();
        let cfg = Config::from_sources(Some(file.path()), Some(env)).unwrap();
        assert_eq!(cfg.orchestrator.url, "http://orchestrator:9000/");
        assert_eq!(cfg.insights.max_outlier_factor, 2.0);
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json5");
        assert!(Config::from_sources(Some(&missing), no_env()).is_err());
    }

    #[test]
    fn test_validate_rejects_zero_page_size() {
        let mut cfg = Config::default();
        cfg.table.page_size = 0;
        assert!(cfg.validate().is_err());
        cfg.table.page_size = 1;
        cfg.insights.repetition_ratio = 1.5;
        assert!(cfg.validate().is_err());
    }
}
