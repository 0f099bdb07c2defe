use std::collections::BTreeSet;
use std::env;
use std::time::Duration;

use thiserror::Error;

use crate::domain::rules::DEFAULT_ROUND_WINDOW_SECS;
use crate::domain::state::PlayerId;
use crate::errors::ErrorCode;

/// Malformed engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {key}={value:?}: {reason}")]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
    pub reason: String,
}

impl ConfigError {
    pub fn code(&self) -> ErrorCode {
        ErrorCode::ConfigError
    }
}

/// Engine settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Length of every night and day collection window.
    pub round_window: Duration,
    /// Players allowed to stop any session.
    pub admins: BTreeSet<PlayerId>,
    /// Spawn a round driver per started session.
    pub auto_advance: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            round_window: Duration::from_secs(DEFAULT_ROUND_WINDOW_SECS),
            admins: BTreeSet::new(),
            auto_advance: true,
        }
    }
}

impl EngineConfig {
    /// Read `MAFIA_ROUND_WINDOW_SECS`, `MAFIA_ADMIN_IDS` and
    /// `MAFIA_AUTO_ADVANCE` from the environment. Unset keys keep defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup("MAFIA_ROUND_WINDOW_SECS") {
            let secs: u64 = raw.trim().parse().map_err(|_| ConfigError {
                key: "MAFIA_ROUND_WINDOW_SECS",
                value: raw.clone(),
                reason: "expected a whole number of seconds".to_string(),
            })?;
            if secs == 0 {
                return Err(ConfigError {
                    key: "MAFIA_ROUND_WINDOW_SECS",
                    value: raw,
                    reason: "window must be at least one second".to_string(),
                });
            }
            config.round_window = Duration::from_secs(secs);
        }

        if let Some(raw) = lookup("MAFIA_ADMIN_IDS") {
            config.admins = parse_admins(&raw)?;
        }

        if let Some(raw) = lookup("MAFIA_AUTO_ADVANCE") {
            config.auto_advance = match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => {
                    return Err(ConfigError {
                        key: "MAFIA_AUTO_ADVANCE",
                        value: raw,
                        reason: "expected true or false".to_string(),
                    })
                }
            };
        }

        Ok(config)
    }

    pub fn is_admin(&self, player: PlayerId) -> bool {
        self.admins.contains(&player)
    }
}

fn parse_admins(raw: &str) -> Result<BTreeSet<PlayerId>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<PlayerId>().map_err(|_| ConfigError {
                key: "MAFIA_ADMIN_IDS",
                value: raw.to_string(),
                reason: format!("{s:?} is not a player id"),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let config = EngineConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.round_window, Duration::from_secs(60));
        assert!(config.auto_advance);
    }

    #[test]
    fn reads_every_key() {
        let config = EngineConfig::from_lookup(lookup(&[
            ("MAFIA_ROUND_WINDOW_SECS", "15"),
            ("MAFIA_ADMIN_IDS", " 7, 42 ,,"),
            ("MAFIA_AUTO_ADVANCE", "off"),
        ]))
        .unwrap();
        assert_eq!(config.round_window, Duration::from_secs(15));
        assert!(config.is_admin(7));
        assert!(config.is_admin(42));
        assert!(!config.is_admin(1));
        assert!(!config.auto_advance);
    }

    #[test]
    fn rejects_malformed_values() {
        for (key, value) in [
            ("MAFIA_ROUND_WINDOW_SECS", "soon"),
            ("MAFIA_ROUND_WINDOW_SECS", "0"),
            ("MAFIA_ADMIN_IDS", "1,bob"),
            ("MAFIA_AUTO_ADVANCE", "maybe"),
        ] {
            let err = EngineConfig::from_lookup(lookup(&[(key, value)])).unwrap_err();
            assert_eq!(err.key, key);
            assert_eq!(err.code(), ErrorCode::ConfigError);
        }
    }
}
