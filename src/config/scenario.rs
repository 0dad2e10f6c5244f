use crate::config::validate_bcrypt_cost;
use crate::domain::schemas::OptionForm;
use crate::utils::error::{Result, SchedulerError};
use crate::utils::validation::{validate_non_empty_string, validate_range, Validate};
use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::path::Path;

/// 一份情境檔：要註冊的使用者、要排定的會議，以及依序執行的動作
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScenarioConfig {
    #[serde(default)]
    pub settings: SettingsConfig,
    #[serde(default)]
    pub users: Vec<UserConfig>,
    #[serde(default)]
    pub meetings: Vec<MeetingConfig>,
    #[serde(default)]
    pub actions: Vec<ActionConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsConfig {
    pub bcrypt_cost: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserConfig {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeetingConfig {
    pub name: String,
    pub organizer: String,
    #[serde(default)]
    pub attendees: BTreeSet<String>,
    #[serde(default)]
    pub options: Vec<OptionForm>,
}

/// 動作以會議名稱指向 `[[meetings]]` 中的項目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActionConfig {
    Vote {
        meeting: String,
        username: String,
        date: NaiveDate,
        hour: u8,
    },
    Toggle {
        meeting: String,
        username: String,
        voting: Option<bool>,
    },
    Close {
        meeting: String,
        username: String,
    },
}

impl ActionConfig {
    pub fn meeting(&self) -> &str {
        match self {
            Self::Vote { meeting, .. } | Self::Toggle { meeting, .. } | Self::Close { meeting, .. } => {
                meeting
            }
        }
    }

    pub fn username(&self) -> &str {
        match self {
            Self::Vote { username, .. }
            | Self::Toggle { username, .. }
            | Self::Close { username, .. } => username,
        }
    }
}

impl ScenarioConfig {
    /// 從 TOML 檔案載入情境
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(SchedulerError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析情境
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| SchedulerError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${USER1_PASSWORD})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| SchedulerError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn bcrypt_cost(&self) -> Option<u32> {
        self.settings.bcrypt_cost
    }
}

impl Validate for ScenarioConfig {
    fn validate(&self) -> Result<()> {
        if let Some(cost) = self.settings.bcrypt_cost {
            validate_bcrypt_cost("settings.bcrypt_cost", cost)?;
        }

        for user in &self.users {
            validate_non_empty_string("users.username", &user.username)?;
        }

        let mut names = HashSet::new();
        for meeting in &self.meetings {
            validate_non_empty_string("meetings.name", &meeting.name)?;
            if !names.insert(meeting.name.as_str()) {
                return Err(SchedulerError::ConfigError {
                    message: format!("Duplicate meeting name '{}'", meeting.name),
                });
            }
            for option in &meeting.options {
                validate_range("meetings.options.hour", option.hour, 0, 23)?;
            }
        }

        for action in &self.actions {
            if !names.contains(action.meeting()) {
                return Err(SchedulerError::ConfigError {
                    message: format!(
                        "Action by '{}' refers to unknown meeting '{}'",
                        action.username(),
                        action.meeting()
                    ),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SCENARIO: &str = r#"
[settings]
bcrypt_cost = 4

[[users]]
username = "user1"
email = "a@b.com"
password = "pw123456"

[[meetings]]
name = "Sync"
organizer = "user1"
attendees = ["user1"]
options = [{ date = "2021-01-01", hour = 10 }]

[[actions]]
type = "vote"
meeting = "Sync"
username = "user1"
date = "2021-01-01"
hour = 10

[[actions]]
type = "toggle"
meeting = "Sync"
username = "user1"

[[actions]]
type = "close"
meeting = "Sync"
username = "user1"
"#;

    #[test]
    fn test_parse_scenario() {
        let config = ScenarioConfig::from_toml_str(SCENARIO).unwrap();

        assert_eq!(config.bcrypt_cost(), Some(4));
        assert_eq!(config.users[0].username, "user1");
        assert_eq!(config.meetings[0].options[0].hour, 10);
        assert_eq!(config.actions.len(), 3);
        assert_eq!(
            config.actions[1],
            ActionConfig::Toggle {
                meeting: "Sync".to_string(),
                username: "user1".to_string(),
                voting: None,
            }
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("MEET_SCHEDULER_TEST_PASSWORD", "secret123");

        let config = ScenarioConfig::from_toml_str(
            r#"
[[users]]
username = "user1"
email = "a@b.com"
password = "${MEET_SCHEDULER_TEST_PASSWORD}"
"#,
        )
        .unwrap();
        assert_eq!(config.users[0].password, "secret123");

        std::env::remove_var("MEET_SCHEDULER_TEST_PASSWORD");
    }

    #[test]
    fn test_action_on_unknown_meeting_is_rejected() {
        let config = ScenarioConfig::from_toml_str(
            r#"
[[actions]]
type = "close"
meeting = "Nope"
username = "user1"
"#,
        )
        .unwrap();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("unknown meeting 'Nope'"));
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = ScenarioConfig::from_toml_str("[[users]\nusername = ").unwrap_err();
        assert!(matches!(err, SchedulerError::ConfigError { .. }));
    }

    #[test]
    fn test_scenario_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(SCENARIO.as_bytes()).unwrap();

        let config = ScenarioConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.meetings[0].name, "Sync");
    }
}
