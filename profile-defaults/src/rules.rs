//! Route rules and DNS rules
//!
//! Downstream consumers evaluate both lists first-match-wins, so the order of
//! the default lists is part of the default policy.

use serde::{Deserialize, Serialize};

/// Mirror hosting the compiled geosite/geoip rule sets
pub const RULE_SET_MIRROR: &str =
    "https://testingcf.jsdelivr.net/gh/MetaCubeX/meta-rules-dat@sing/geo";

/// Outbound tag of the DNS hijack outbound
pub const DNS_OUT: &str = "dns-out";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    /// Payload is a JSON matcher object
    Inline,
    ClashMode,
    /// Payload is the URL of a remote rule set
    RuleSetUrl,
    IpIsPrivate,
    Final,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Rule {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: RuleKind,
    pub payload: String,
    /// Target outbound tag
    pub proxy: String,
    pub ruleset_name: String,
    pub ruleset_format: String,
    pub download_detour: String,
    pub invert: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DnsRuleKind {
    Outbound,
    Fakeip,
    ClashMode,
    RuleSetUrl,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DnsRule {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: DnsRuleKind,
    pub payload: String,
    /// Target DNS server tag
    pub server: String,
    pub invert: bool,
    pub disable_cache: bool,
    pub ruleset_name: String,
    pub ruleset_format: String,
    pub download_detour: String,
}

/// Builds `<mirror>/<category>/<name>.srs`
pub fn rule_set_url(category: &str, name: &str) -> String {
    format!("{}/{}/{}.srs", RULE_SET_MIRROR, category, name)
}

/// Inline matcher payload, pretty printed with two-space indentation
pub(crate) fn inline_payload(network: Option<&str>, protocol: Option<&str>, port: u16) -> String {
    #[derive(Serialize)]
    struct Matcher<'a> {
        #[serde(skip_serializing_if = "Option::is_none")]
        protocol: Option<&'a str>,
        #[serde(skip_serializing_if = "Option::is_none")]
        network: Option<&'a str>,
        port: u16,
    }

    let matcher = Matcher { protocol, network, port };
    serde_json::to_string_pretty(&matcher).unwrap_or_default()
}
