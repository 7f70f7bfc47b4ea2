use crate::columns::ColumnRules;
use crate::error::ConfigError;
use clap::Parser;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_FALLBACK_TEAM: &str = "UK";
pub const DEFAULT_LEVEL: &str = "L2";
pub const DEFAULT_PROD_HOURS: &str = "0:00:00";

/// Normalization settings: the candidate column lists plus the defaults used
/// when no candidate supplies a value.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub fallback_team: String,
    pub default_level: String,
    pub default_prod_hours: String,
    pub columns: ColumnRules,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            fallback_team: DEFAULT_FALLBACK_TEAM.to_string(),
            default_level: DEFAULT_LEVEL.to_string(),
            default_prod_hours: DEFAULT_PROD_HOURS.to_string(),
            columns: ColumnRules::default(),
        }
    }
}

impl Config {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        Ok(config.finish())
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Built-in defaults, or the file at `path` when one is given.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    fn finish(mut self) -> Self {
        for value in [
            &mut self.fallback_team,
            &mut self.default_level,
            &mut self.default_prod_hours,
        ] {
            *value = value.trim().to_string();
        }
        self.columns = self.columns.trimmed();
        self
    }
}

/// Command-line options for the terminal dashboard.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "prod_dashboard",
    about = "Agent productivity dashboard for daily call-center exports",
    version
)]
pub struct Settings {
    /// Production statistics CSV
    #[arg(long, short = 'p')]
    pub production: Option<PathBuf>,

    /// Optional team lookup CSV
    #[arg(long, short = 'l')]
    pub lookup: Option<PathBuf>,

    /// TOML file overriding column candidates and defaults
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Field delimiter of the input files
    #[arg(long, default_value_t = ',')]
    pub delimiter: char,

    /// Team filter applied in batch mode
    #[arg(long, default_value = "ALL")]
    pub team: String,

    /// Agent filter applied in batch mode
    #[arg(long, default_value = "ALL")]
    pub agent: String,

    /// Directory the report CSV and summary JSON are written to
    #[arg(long, default_value = ".")]
    pub export_dir: PathBuf,

    /// Load, process, print and export once instead of showing the menu
    #[arg(long)]
    pub batch: bool,

    /// Logging level
    #[arg(long, default_value = "info", value_parser = ["trace", "debug", "info", "warn", "error"])]
    pub log_level: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn empty_file_gives_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.fallback_team, "UK");
        assert_eq!(config.default_level, "L2");
    }

    #[test]
    fn overrides_fallback_team_and_columns() {
        let config = Config::from_toml_str(
            r#"
fallback_team = "EMEA"

[columns]
contacts_processed = ["Processed ", "Cont Procsd"]
"#,
        )
        .unwrap();
        assert_eq!(config.fallback_team, "EMEA");
        assert_eq!(config.columns.contacts_processed, vec!["Processed", "Cont Procsd"]);
        assert_eq!(config.default_prod_hours, DEFAULT_PROD_HOURS);
    }

    #[test]
    fn default_values_are_trimmed() {
        let config = Config::from_toml_str(
            "fallback_team = \" UK \"\ndefault_level = \"L1 \"\ndefault_prod_hours = \" 8:00:00\"\n",
        )
        .unwrap();
        assert_eq!(config.fallback_team, "UK");
        assert_eq!(config.default_level, "L1");
        assert_eq!(config.default_prod_hours, "8:00:00");
    }

    #[test]
    fn loads_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "default_level = \"L1\"").unwrap();
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.default_level, "L1");
    }

    #[test]
    fn missing_file_is_read_error() {
        let err = Config::load(Path::new("/nonexistent/dashboard.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn bad_toml_is_parse_error() {
        let err = Config::from_toml_str("fallback_team = [").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn settings_defaults() {
        let s = Settings::parse_from(["prod_dashboard", "-p", "prod.csv"]);
        assert_eq!(s.production, Some(PathBuf::from("prod.csv")));
        assert_eq!(s.delimiter, ',');
        assert_eq!(s.team, "ALL");
        assert!(!s.batch);
    }
}
