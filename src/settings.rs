use std::env;
use tracing::Level;

pub const LOG_LEVEL_VAR: &str = "GRAPH_LOG_LEVEL";
pub const SAVE_JSON_VAR: &str = "GRAPH_SAVE_JSON";
pub const POSITIONS_FILE: &str = "commit_positions.json";

/// Switches read from the environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub log_level: Level,
    pub save_json: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: Level::WARN,
            save_json: false,
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_vars(env::var(LOG_LEVEL_VAR).ok(), env::var(SAVE_JSON_VAR).ok())
    }

    fn from_vars(log_level: Option<String>, save_json: Option<String>) -> Self {
        let log_level = match log_level.as_deref() {
            Some(level) if level.eq_ignore_ascii_case("debug") => Level::DEBUG,
            _ => Level::WARN,
        };
        let save_json = save_json.as_deref() == Some("true");

        Self { log_level, save_json }
    }

    pub fn debug_enabled(&self) -> bool {
        self.log_level == Level::DEBUG
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_unset() {
        let settings = Settings::from_vars(None, None);
        assert_eq!(settings, Settings::default());
        assert!(!settings.debug_enabled());
    }

    #[test]
    fn test_debug_and_json_switches() {
        let settings = Settings::from_vars(Some("debug".into()), Some("true".into()));
        assert!(settings.debug_enabled());
        assert!(settings.save_json);
    }

    #[test]
    fn test_only_exact_true_enables_json() {
        assert!(!Settings::from_vars(None, Some("1".into())).save_json);
        assert!(!Settings::from_vars(None, Some("yes".into())).save_json);
        assert_eq!(Settings::from_vars(Some("info".into()), None).log_level, Level::WARN);
    }
}
