//! Grouping dimension: which event field becomes the aggregation key

use super::event::GameEvent;
use crate::pipeline::config::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupingDimension {
    User,
    Team,
}

impl GroupingDimension {
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupingDimension::User => "user",
            GroupingDimension::Team => "team",
        }
    }

    pub fn from_str(s: &str) -> Result<Self, ConfigError> {
        match s.trim().to_lowercase().as_str() {
            "user" => Ok(GroupingDimension::User),
            "team" => Ok(GroupingDimension::Team),
            other => Err(ConfigError::InvalidValue(format!(
                "unsupported grouping dimension '{}' (expected 'user' or 'team')",
                other
            ))),
        }
    }

    pub fn extract_key<'a>(&self, event: &'a GameEvent) -> &'a str {
        match self {
            GroupingDimension::User => &event.user,
            GroupingDimension::Team => &event.team,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_key() {
        let event = GameEvent {
            user: "user0_AzureBilby".to_string(),
            team: "AzureBilby".to_string(),
            score: 8,
            timestamp: 1447719060000,
        };

        assert_eq!(GroupingDimension::User.extract_key(&event), "user0_AzureBilby");
        assert_eq!(GroupingDimension::Team.extract_key(&event), "AzureBilby");
    }

    #[test]
    fn test_from_str() {
        assert_eq!(GroupingDimension::from_str("team").unwrap(), GroupingDimension::Team);
        assert_eq!(GroupingDimension::from_str(" USER ").unwrap(), GroupingDimension::User);
        assert!(GroupingDimension::from_str("clan").is_err());
        assert!(GroupingDimension::from_str("").is_err());
    }
}
