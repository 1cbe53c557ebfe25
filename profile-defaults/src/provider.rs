//! Default value builders for new profiles

use serde::{Deserialize, Serialize};
use settings_common::{IdGenerator, LabelKey, LabelResolver, BLOCK_ID, DIRECT_ID};

use crate::config::{
    AdvancedConfig, CacheProfile, DnsConfig, FinalDns, GeneralConfig, TunConfig, TunStack,
};
use crate::groups::{GroupKind, GroupMember, ProxyGroup};
use crate::rules::{inline_payload, rule_set_url, DnsRule, DnsRuleKind, Rule, RuleKind, DNS_OUT};

/// URL probed by the default url-test group
pub const URL_TEST_PROBE: &str = "https://www.gstatic.com/generate_204";

const GROUP_INTERVAL: u32 = 300;
const GROUP_TOLERANCE: u32 = 150;

const FAKE_IP_FILTER: [&str; 10] = [
    ".lan",
    ".localdomain",
    ".example",
    ".invalid",
    ".localhost",
    ".test",
    ".local",
    ".home.arpa",
    ".msftconnecttest.com",
    ".msftncsi.com",
];

/// Complete configuration aggregate of one profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileConfig {
    pub id: String,
    pub name: String,
    pub general_config: GeneralConfig,
    pub advanced_config: AdvancedConfig,
    pub tun_config: TunConfig,
    pub dns_config: DnsConfig,
    pub proxy_groups_config: Vec<ProxyGroup>,
    pub rules_config: Vec<Rule>,
    pub dns_rules_config: Vec<DnsRule>,
}

/// Builds canonical default values.
///
/// Every builder is a pure function of the injected identifier generator and
/// label resolver: two calls return equal structures that differ only in
/// their generated identifiers.
pub struct DefaultsProvider<'a> {
    ids: &'a dyn IdGenerator,
    labels: &'a dyn LabelResolver,
}

impl<'a> DefaultsProvider<'a> {
    pub fn new(ids: &'a dyn IdGenerator, labels: &'a dyn LabelResolver) -> Self {
        Self { ids, labels }
    }

    fn label(&self, key: LabelKey) -> String {
        self.labels.label(key)
    }

    pub fn general(&self) -> GeneralConfig {
        GeneralConfig {
            mode: "rule".to_string(),
            mixed_port: 20122,
            allow_lan: false,
            log_level: "info".to_string(),
            interface_name: String::new(),
        }
    }

    pub fn advanced(&self) -> AdvancedConfig {
        AdvancedConfig {
            port: 0,
            socks_port: 0,
            secret: self.ids.next_id(),
            external_controller: "127.0.0.1:20123".to_string(),
            external_ui: String::new(),
            external_ui_url: String::new(),
            profile: CacheProfile {
                store_cache: true,
                store_fake_ip: false,
            },
            domain_strategy: String::new(),
            tcp_fast_open: false,
            tcp_multi_path: false,
            udp_fragment: false,
            sniff: true,
            sniff_override_destination: false,
        }
    }

    pub fn tun(&self) -> TunConfig {
        TunConfig {
            enable: false,
            stack: TunStack::System,
            auto_route: true,
            interface_name: "singbox".to_string(),
            mtu: 9000,
            strict_route: true,
            endpoint_independent_nat: false,
            inet4_address: "172.19.0.1/30".to_string(),
            inet6_address: "fdfe:dcba:9876::1/126".to_string(),
        }
    }

    pub fn dns(&self) -> DnsConfig {
        DnsConfig {
            enable: true,
            fakeip: false,
            strategy: String::new(),
            local_dns: "https://223.5.5.5/dns-query".to_string(),
            remote_dns: "tls://8.8.8.8".to_string(),
            resolver_dns: "223.5.5.5".to_string(),
            remote_resolver_dns: "8.8.8.8".to_string(),
            final_dns: FinalDns::Remote,
            remote_dns_detour: self.label(LabelKey::OutboundSelect),
            fake_ip_range_v4: "198.18.0.1/16".to_string(),
            fake_ip_range_v6: "fc00::/18".to_string(),
            fake_ip_filter: FAKE_IP_FILTER.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Default group graph: select → url-test, direct → `direct`,
    /// block → `block`, fallback → [select, direct].
    pub fn proxy_groups(&self) -> Vec<ProxyGroup> {
        let select_id = self.ids.next_id();
        let urltest_id = self.ids.next_id();
        let direct_id = self.ids.next_id();
        let block_id = self.ids.next_id();
        let fallback_id = self.ids.next_id();

        let select = self.label(LabelKey::OutboundSelect);
        let urltest = self.label(LabelKey::OutboundUrlTest);
        let direct = self.label(LabelKey::OutboundDirect);

        vec![
            group(
                select_id.clone(),
                select.clone(),
                GroupKind::Selector,
                vec![GroupMember::built_in(urltest_id.clone(), urltest.clone())],
                "",
            ),
            group(urltest_id, urltest, GroupKind::UrlTest, Vec::new(), URL_TEST_PROBE),
            group(
                direct_id.clone(),
                direct.clone(),
                GroupKind::Selector,
                vec![GroupMember::built_in(DIRECT_ID, DIRECT_ID)],
                "",
            ),
            group(
                block_id,
                self.label(LabelKey::OutboundBlock),
                GroupKind::Selector,
                vec![GroupMember::built_in(BLOCK_ID, BLOCK_ID)],
                "",
            ),
            group(
                fallback_id,
                self.label(LabelKey::OutboundFallback),
                GroupKind::Selector,
                vec![
                    GroupMember::built_in(select_id, select),
                    GroupMember::built_in(direct_id, direct),
                ],
                "",
            ),
        ]
    }

    /// Bootstrap rules, clash-mode overrides, rule-set lookups, then the
    /// catch-all.
    pub fn rules(&self) -> Vec<Rule> {
        let select = self.label(LabelKey::OutboundSelect);
        let direct = self.label(LabelKey::OutboundDirect);
        let block = self.label(LabelKey::OutboundBlock);

        vec![
            self.rule(RuleKind::Inline, inline_payload(None, Some("dns"), 53), DNS_OUT),
            self.rule(RuleKind::Inline, inline_payload(Some("udp"), None, 443), &block),
            self.rule(RuleKind::ClashMode, "direct".to_string(), &direct),
            self.rule(RuleKind::ClashMode, "global".to_string(), &select),
            self.rule_set(rule_set_url("geosite", "category-ads-all"), "CATEGORY-ADS", &block, &direct),
            self.rule(RuleKind::IpIsPrivate, String::new(), &direct),
            self.rule_set(rule_set_url("geoip", "cn"), "GEOIP-CN", &direct, &direct),
            self.rule_set(rule_set_url("geosite", "cn"), "GEOSITE-CN", &direct, &direct),
            self.rule_set(
                rule_set_url("geosite", "geolocation-!cn"),
                "GEOLOCATION-!CN",
                &select,
                &direct,
            ),
            self.rule(RuleKind::Final, String::new(), &self.label(LabelKey::OutboundFallback)),
        ]
    }

    pub fn dns_rules(&self) -> Vec<DnsRule> {
        let direct = self.label(LabelKey::OutboundDirect);

        let mut outbound_any = self.dns_rule(DnsRuleKind::Outbound, "any", "local-dns");
        outbound_any.disable_cache = true;

        vec![
            outbound_any,
            self.dns_rule(DnsRuleKind::Fakeip, "", "fakeip-dns"),
            self.dns_rule(DnsRuleKind::ClashMode, "direct", "local-dns"),
            self.dns_rule(DnsRuleKind::ClashMode, "global", "remote-dns"),
            self.dns_rule_set(rule_set_url("geosite", "cn"), "GEOSITE-CN", "local-dns", &direct),
            self.dns_rule_set(
                rule_set_url("geosite", "geolocation-!cn"),
                "GEOLOCATION-!CN",
                "remote-dns",
                &direct,
            ),
        ]
    }

    /// All seven groups under a freshly identified profile
    pub fn profile(&self, name: impl Into<String>) -> ProfileConfig {
        ProfileConfig {
            id: self.ids.next_id(),
            name: name.into(),
            general_config: self.general(),
            advanced_config: self.advanced(),
            tun_config: self.tun(),
            dns_config: self.dns(),
            proxy_groups_config: self.proxy_groups(),
            rules_config: self.rules(),
            dns_rules_config: self.dns_rules(),
        }
    }

    fn rule(&self, kind: RuleKind, payload: String, proxy: &str) -> Rule {
        Rule {
            id: self.ids.next_id(),
            kind,
            payload,
            proxy: proxy.to_string(),
            ruleset_name: String::new(),
            ruleset_format: String::new(),
            download_detour: String::new(),
            invert: false,
        }
    }

    fn rule_set(&self, url: String, name: &str, proxy: &str, detour: &str) -> Rule {
        Rule {
            ruleset_name: name.to_string(),
            ruleset_format: "binary".to_string(),
            download_detour: detour.to_string(),
            ..self.rule(RuleKind::RuleSetUrl, url, proxy)
        }
    }

    fn dns_rule(&self, kind: DnsRuleKind, payload: &str, server: &str) -> DnsRule {
        DnsRule {
            id: self.ids.next_id(),
            kind,
            payload: payload.to_string(),
            server: server.to_string(),
            invert: false,
            disable_cache: false,
            ruleset_name: String::new(),
            ruleset_format: String::new(),
            download_detour: String::new(),
        }
    }

    fn dns_rule_set(&self, url: String, name: &str, server: &str, detour: &str) -> DnsRule {
        DnsRule {
            ruleset_name: name.to_string(),
            ruleset_format: "binary".to_string(),
            download_detour: detour.to_string(),
            ..self.dns_rule(DnsRuleKind::RuleSetUrl, &url, server)
        }
    }
}

fn group(
    id: String,
    tag: String,
    kind: GroupKind,
    proxies: Vec<GroupMember>,
    url: &str,
) -> ProxyGroup {
    ProxyGroup {
        id,
        tag,
        kind,
        proxies,
        use_subscriptions: Vec::new(),
        url: url.to_string(),
        interval: GROUP_INTERVAL,
        tolerance: GROUP_TOLERANCE,
        filter: String::new(),
    }
}
