//! Scalar configuration groups of a profile
//!
//! Field names on the wire follow the kebab-case keys of the core's
//! configuration format, with a few historical snake_case exceptions.

use serde::{Deserialize, Serialize};

/// General settings (inbound port, mode, logging)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct GeneralConfig {
    /// Routing mode: `rule`, `global` or `direct`
    pub mode: String,
    /// Mixed HTTP/SOCKS inbound port
    pub mixed_port: u16,
    pub allow_lan: bool,
    pub log_level: String,
    /// Outbound interface to bind, empty for automatic
    pub interface_name: String,
}

/// Cache profile of the core
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CacheProfile {
    pub store_cache: bool,
    pub store_fake_ip: bool,
}

/// Advanced settings (controller, sniffing, socket options)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AdvancedConfig {
    pub port: u16,
    pub socks_port: u16,
    /// External controller secret, generated per profile
    pub secret: String,
    pub external_controller: String,
    pub external_ui: String,
    pub external_ui_url: String,
    pub profile: CacheProfile,
    #[serde(rename = "domain_strategy")]
    pub domain_strategy: String,
    pub tcp_fast_open: bool,
    pub tcp_multi_path: bool,
    pub udp_fragment: bool,
    pub sniff: bool,
    pub sniff_override_destination: bool,
}

/// Network stack used by the TUN inbound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TunStack {
    System,
    #[serde(rename = "gVisor")]
    GVisor,
    Mixed,
}

/// TUN inbound settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TunConfig {
    pub enable: bool,
    pub stack: TunStack,
    pub auto_route: bool,
    #[serde(rename = "interface_name")]
    pub interface_name: String,
    pub mtu: u32,
    pub strict_route: bool,
    pub endpoint_independent_nat: bool,
    pub inet4_address: String,
    pub inet6_address: String,
}

/// Which resolver answers queries no DNS rule matched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FinalDns {
    Local,
    Remote,
}

/// DNS settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DnsConfig {
    pub enable: bool,
    pub fakeip: bool,
    pub strategy: String,
    pub local_dns: String,
    pub remote_dns: String,
    pub resolver_dns: String,
    pub remote_resolver_dns: String,
    pub final_dns: FinalDns,
    /// Outbound (by tag) used to reach the remote resolver
    pub remote_dns_detour: String,
    pub fake_ip_range_v4: String,
    pub fake_ip_range_v6: String,
    pub fake_ip_filter: Vec<String>,
}
