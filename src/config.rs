//! Configuration types.

use std::path::PathBuf;

use crate::error::ConfigError;
use crate::period::WeekNumbering;

/// Path value that selects an in-memory database.
pub const MEMORY_DB: &str = ":memory:";

/// Planner service configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannerConfig {
    /// SQLite file backing the remote tables, or `:memory:`.
    pub db_path: PathBuf,
    /// HTTP listen port.
    pub port: u16,
    /// Week numbering used for to-do and habit keys.
    pub week_numbering: WeekNumbering,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("./data/planboard.db"),
            port: 8080,
            week_numbering: WeekNumbering::Legacy,
        }
    }
}

impl PlannerConfig {
    /// Read `PLANBOARD_DB_PATH`, `PLANBOARD_PORT`, and `PLANBOARD_WEEK_NUMBERING`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let db_path = lookup("PLANBOARD_DB_PATH")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.db_path);

        let port = match lookup("PLANBOARD_PORT") {
            Some(raw) => raw.trim().parse().map_err(|e| ConfigError::InvalidValue {
                key: "PLANBOARD_PORT".to_string(),
                message: format!("{raw:?}: {e}"),
            })?,
            None => defaults.port,
        };

        let week_numbering = match lookup("PLANBOARD_WEEK_NUMBERING") {
            Some(raw) => raw.parse().map_err(|message| ConfigError::InvalidValue {
                key: "PLANBOARD_WEEK_NUMBERING".to_string(),
                message,
            })?,
            None => defaults.week_numbering,
        };

        Ok(Self {
            db_path,
            port,
            week_numbering,
        })
    }

    pub fn uses_memory_db(&self) -> bool {
        self.db_path.as_os_str() == MEMORY_DB
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = PlannerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, PlannerConfig::default());
        assert_eq!(config.db_path, PathBuf::from("./data/planboard.db"));
        assert_eq!(config.port, 8080);
        assert_eq!(config.week_numbering, WeekNumbering::Legacy);
        assert!(!config.uses_memory_db());
    }

    #[test]
    fn reads_all_values() {
        let config = PlannerConfig::from_lookup(lookup(&[
            ("PLANBOARD_DB_PATH", ":memory:"),
            ("PLANBOARD_PORT", " 9090 "),
            ("PLANBOARD_WEEK_NUMBERING", "ISO"),
        ]))
        .unwrap();
        assert!(config.uses_memory_db());
        assert_eq!(config.port, 9090);
        assert_eq!(config.week_numbering, WeekNumbering::Iso);
    }

    #[test]
    fn invalid_week_numbering_is_rejected() {
        let err = PlannerConfig::from_lookup(lookup(&[("PLANBOARD_WEEK_NUMBERING", "julian")]))
            .unwrap_err();
        let ConfigError::InvalidValue { key, .. } = err;
        assert_eq!(key, "PLANBOARD_WEEK_NUMBERING");
    }

    #[test]
    fn invalid_port_is_rejected() {
        let err = PlannerConfig::from_lookup(lookup(&[("PLANBOARD_PORT", "eighty")])).unwrap_err();
        assert!(err.to_string().contains("PLANBOARD_PORT"));
    }

    #[test]
    fn blank_db_path_falls_back_to_default() {
        let config = PlannerConfig::from_lookup(lookup(&[("PLANBOARD_DB_PATH", "  ")])).unwrap();
        assert_eq!(config.db_path, PlannerConfig::default().db_path);
    }
}
