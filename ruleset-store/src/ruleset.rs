//! Ruleset record and its on-disk representation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use settings_common::IdGenerator;
use std::fmt;

use crate::entity::Entity;

/// Payload written for rulesets that have no content yet
pub const EMPTY_RULESET: &str = "{\n  \"version\": 1,\n  \"rules\": []\n}";

/// Where a ruleset's content comes from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum RuleSetSource {
    /// Downloaded from `url`
    Http,
    /// Copied from a local file named by `url`
    File,
    /// Edited in place by the user
    Manual,
}

impl fmt::Display for RuleSetSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RuleSetSource::Http => "Http",
            RuleSetSource::File => "File",
            RuleSetSource::Manual => "Manual",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuleSetFormat {
    #[default]
    Binary,
    Source,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RuleSet {
    pub id: String,
    pub tag: String,

    /// Time of the last successful refresh
    #[serde(
        rename = "updateTime",
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_updated: Option<DateTime<Utc>>,

    #[serde(default)]
    pub disabled: bool,

    #[serde(rename = "type")]
    pub source: RuleSetSource,

    #[serde(default)]
    pub format: RuleSetFormat,

    /// Local path of the materialized rule data
    #[serde(rename = "path", default)]
    pub location: String,

    /// URL for `Http`, source file for `File`, unused for `Manual`
    #[serde(rename = "url", default)]
    pub origin: String,

    /// Set only while a refresh is in flight
    #[serde(skip)]
    pub refreshing: bool,
}

impl RuleSet {
    pub fn new(
        ids: &dyn IdGenerator,
        tag: impl Into<String>,
        source: RuleSetSource,
        location: impl Into<String>,
        origin: impl Into<String>,
    ) -> Self {
        Self {
            id: ids.next_id(),
            tag: tag.into(),
            last_updated: None,
            disabled: false,
            source,
            format: RuleSetFormat::default(),
            location: location.into(),
            origin: origin.into(),
            refreshing: false,
        }
    }

    pub fn with_format(mut self, format: RuleSetFormat) -> Self {
        self.format = format;
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}

impl Entity for RuleSet {
    fn id(&self) -> &str {
        &self.id
    }

    fn inherit_transient(&mut self, previous: &Self) {
        self.refreshing = previous.refreshing;
    }
}

/// Older snapshots stored a locale-formatted string; anything that is not
/// RFC 3339 is treated as "never refreshed".
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| {
        DateTime::parse_from_rfc3339(s.trim())
            .ok()
            .map(|t| t.with_timezone(&Utc))
    }))
}
