//! Proxy groups (outbound selectors)

use serde::{Deserialize, Serialize};
use settings_common::is_sentinel;

/// Group behaviour, named after the core's outbound types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupKind {
    /// Manual choice among members
    Selector,
    /// Pick the member with the lowest latency
    #[serde(rename = "urltest")]
    UrlTest,
}

/// Reference from a group to one of its candidates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupMember {
    /// Identifier of another group or a sentinel (`direct`, `block`)
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub tag: String,
}

impl GroupMember {
    /// Member kind for groups and sentinels that ship with every profile
    pub const BUILT_IN: &'static str = "built-in";

    pub fn built_in(id: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: Self::BUILT_IN.to_string(),
            tag: tag.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProxyGroup {
    pub id: String,
    pub tag: String,
    #[serde(rename = "type")]
    pub kind: GroupKind,
    pub proxies: Vec<GroupMember>,
    /// Subscription identifiers whose proxies are pulled in
    #[serde(rename = "use")]
    pub use_subscriptions: Vec<String>,
    /// Probe URL for url-test groups
    pub url: String,
    /// Probe interval in seconds
    pub interval: u32,
    /// Latency tolerance in milliseconds
    pub tolerance: u32,
    /// Regex over subscription proxy names
    pub filter: String,
}

impl ProxyGroup {
    pub fn member_ids(&self) -> impl Iterator<Item = &str> {
        self.proxies.iter().map(|m| m.id.as_str())
    }
}

/// Member ids that point at neither a group in `groups` nor a sentinel
pub fn dangling_references(groups: &[ProxyGroup]) -> Vec<String> {
    groups
        .iter()
        .flat_map(|g| g.member_ids())
        .filter(|id| !is_sentinel(id) && !groups.iter().any(|g| g.id == *id))
        .map(str::to_string)
        .collect()
}
