use serde::{Deserialize, Serialize};

fn default_leaderboard_size() -> usize {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_session_key_prefix() -> String {
    "blackjack.round.".to_string()
}

fn default_records_key() -> String {
    "blackjack.records".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableConfig {
    /// Fixed shuffle seed. Without one the table seeds from entropy.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_leaderboard_size")]
    pub leaderboard_size: usize,
    #[serde(default = "default_session_key_prefix")]
    pub session_key_prefix: String,
    #[serde(default = "default_records_key")]
    pub records_key: String,
    /// `tracing` filter directive for the browser console, e.g. `"debug"`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for TableConfig {
    fn default() -> Self {
        TableConfig {
            seed: None,
            leaderboard_size: default_leaderboard_size(),
            session_key_prefix: default_session_key_prefix(),
            records_key: default_records_key(),
            log_level: default_log_level(),
        }
    }
}

impl TableConfig {
    pub fn with_seed(seed: u64) -> Self {
        TableConfig {
            seed: Some(seed),
            ..TableConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let config: TableConfig = serde_json::from_str(r#"{"seed": 9}"#).unwrap();
        assert_eq!(config, TableConfig::with_seed(9));
        assert_eq!(config.leaderboard_size, 10);
    }

    #[test]
    fn fields_are_camel_case() {
        let config: TableConfig =
            serde_json::from_str(r#"{"leaderboardSize": 3, "recordsKey": "bj"}"#).unwrap();
        assert_eq!(config.seed, None);
        assert_eq!(config.leaderboard_size, 3);
        assert_eq!(config.records_key, "bj");
        assert_eq!(config.log_level, "info");
    }
}
