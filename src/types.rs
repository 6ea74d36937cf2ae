//! Shared types and enums used across the front-end.
//! Includes the search-engine `Pipeline` selector and the `LogLevel` choice,
//! both serialised with the lowercase names the rescoring tool expects.
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(
    Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Pipeline {
    #[default]
    Infer,
    Pin,
    Maxquant,
    Msgfplus,
    Tandem,
    Peptideschaker,
    Peaks,
}

impl Pipeline {
    pub const ALL: [Pipeline; 7] = [
        Pipeline::Infer,
        Pipeline::Pin,
        Pipeline::Maxquant,
        Pipeline::Msgfplus,
        Pipeline::Tandem,
        Pipeline::Peptideschaker,
        Pipeline::Peaks,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Pipeline::Infer => "infer",
            Pipeline::Pin => "pin",
            Pipeline::Maxquant => "maxquant",
            Pipeline::Msgfplus => "msgfplus",
            Pipeline::Tandem => "tandem",
            Pipeline::Peptideschaker => "peptideschaker",
            Pipeline::Peaks => "peaks",
        }
    }
}

impl std::fmt::Display for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(
    Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warning,
    Error,
    Critical,
}

impl LogLevel {
    pub const ALL: [LogLevel; 5] = [
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warning,
        LogLevel::Error,
        LogLevel::Critical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warning",
            LogLevel::Error => "error",
            LogLevel::Critical => "critical",
        }
    }

    /// Closest `tracing` level. `tracing` has no level above ERROR, so
    /// critical collapses onto it.
    pub fn to_tracing(&self) -> tracing::Level {
        match self {
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warning => tracing::Level::WARN,
            LogLevel::Error | LogLevel::Critical => tracing::Level::ERROR,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
