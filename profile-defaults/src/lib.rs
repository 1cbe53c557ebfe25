//! Profile Defaults
//!
//! Canonical initial values for the seven configuration groups of a proxy
//! client profile: general, advanced, tunnel, DNS, proxy groups, rules and
//! DNS rules.
//!
//! ```rust,ignore
//! use profile_defaults::DefaultsProvider;
//! use settings_common::{BuiltinLabels, UuidGenerator};
//!
//! let provider = DefaultsProvider::new(&UuidGenerator, &BuiltinLabels);
//! let profile = provider.profile("Home");
//! ```

pub mod config;
pub mod groups;
pub mod provider;
pub mod rules;

pub use config::{AdvancedConfig, CacheProfile, DnsConfig, FinalDns, GeneralConfig, TunConfig, TunStack};
pub use groups::{dangling_references, GroupKind, GroupMember, ProxyGroup};
pub use provider::{DefaultsProvider, ProfileConfig, URL_TEST_PROBE};
pub use rules::{rule_set_url, DnsRule, DnsRuleKind, Rule, RuleKind, DNS_OUT, RULE_SET_MIRROR};
