//! Game event parsing from delimited text lines
//!
//! Each line has the layout
//! `username,teamname,score,timestamp_in_ms,readable_time`, e.g.
//! `user2_AsparagusPig,AsparagusPig,10,1445230923951,2015-11-02 09:09:28.224`.
//! The readable time is carried for people looking at the raw data and is
//! never interpreted.

use super::counter::ParseErrorCounter;
use crate::pipeline::config::ConfigError;
use std::num::ParseIntError;
use std::sync::Arc;

/// Fewest fields a line can have and still carry user, team, score and timestamp
pub const MIN_FIELDS: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameEvent {
    pub user: String,
    pub team: String,
    pub score: i64,
    /// Event time in milliseconds since the epoch, taken from the record
    pub timestamp: i64,
}

/// Why a line was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseFailure {
    InvalidFormat { expected: usize, found: usize },
    /// User or team is blank after trimming
    EmptyField(&'static str),
    InvalidScore(ParseIntError),
    InvalidTimestamp(ParseIntError),
}

impl std::fmt::Display for ParseFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseFailure::InvalidFormat { .. } => write!(f, "invalid format line"),
            ParseFailure::EmptyField(field) => write!(f, "empty {} field", field),
            ParseFailure::InvalidScore(e) => write!(f, "invalid score: {}", e),
            ParseFailure::InvalidTimestamp(e) => write!(f, "invalid timestamp: {}", e),
        }
    }
}

impl std::error::Error for ParseFailure {}

impl GameEvent {
    /// Parse one raw line. Pure: no counting, no logging.
    pub fn parse_line(line: &str, separator: &str, num_fields: usize) -> Result<Self, ParseFailure> {
        let tokens: Vec<&str> = line.split(separator).collect();
        if tokens.len() != num_fields {
            return Err(ParseFailure::InvalidFormat {
                expected: num_fields,
                found: tokens.len(),
            });
        }

        let user = tokens[0].trim();
        let team = tokens[1].trim();
        if user.is_empty() {
            return Err(ParseFailure::EmptyField("user"));
        }
        if team.is_empty() {
            return Err(ParseFailure::EmptyField("team"));
        }
        let score = tokens[2]
            .trim()
            .parse::<i64>()
            .map_err(ParseFailure::InvalidScore)?;
        let timestamp = tokens[3]
            .trim()
            .parse::<i64>()
            .map_err(ParseFailure::InvalidTimestamp)?;

        Ok(GameEvent {
            user: user.to_string(),
            team: team.to_string(),
            score,
            timestamp,
        })
    }
}

/// Line parser with an injected error counter.
///
/// Holds only configuration, so one instance can be shared by every
/// partition worker.
#[derive(Clone)]
pub struct EventParser {
    separator: String,
    num_fields: usize,
    errors: Arc<dyn ParseErrorCounter>,
}

impl EventParser {
    pub fn new(
        separator: &str,
        num_fields: usize,
        errors: Arc<dyn ParseErrorCounter>,
    ) -> Result<Self, ConfigError> {
        if separator.is_empty() {
            return Err(ConfigError::InvalidValue(
                "field separator cannot be empty".to_string(),
            ));
        }
        if num_fields < MIN_FIELDS {
            return Err(ConfigError::InvalidValue(format!(
                "expected field count must be at least {}, got {}",
                MIN_FIELDS, num_fields
            )));
        }

        Ok(Self {
            separator: separator.to_string(),
            num_fields,
            errors,
        })
    }

    /// Parse a line, counting and logging it once if it is rejected
    pub fn parse(&self, line: &str) -> Result<GameEvent, ParseFailure> {
        match GameEvent::parse_line(line, &self.separator, self.num_fields) {
            Ok(event) => {
                log::debug!("Parsed event: {:?}", event);
                Ok(event)
            }
            Err(e) => {
                self.errors.inc(1);
                log::warn!("Parse error: err={}, line={}", e, line);
                Err(e)
            }
        }
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }

    pub fn num_fields(&self) -> usize {
        self.num_fields
    }
}

impl std::fmt::Debug for EventParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventParser")
            .field("separator", &self.separator)
            .field("num_fields", &self.num_fields)
            .field("errors", &self.errors.name())
            .finish()
    }
}
