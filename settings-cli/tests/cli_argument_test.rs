use clap::Parser;
use proptest::prelude::*;
use settings_cli::{Cli, Command, FormatArg, Section, SourceArg};
use std::path::PathBuf;

#[test]
fn test_add_defaults() {
    let cli = Cli::try_parse_from([
        "rulesetctl", "add", "--tag", "Ads", "--source", "http", "--path", "ads.srs",
        "--url", "https://example.com/ads.srs",
    ])
    .unwrap();

    assert_eq!(
        cli.command,
        Command::Add {
            tag: "Ads".to_string(),
            source: SourceArg::Http,
            format: FormatArg::Binary,
            path: "ads.srs".to_string(),
            url: "https://example.com/ads.srs".to_string(),
            disabled: false,
            refresh: false,
        }
    );
    assert_eq!(cli.global.config, None);
}

#[test]
fn test_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from([
        "rulesetctl", "list", "--data-dir", "/tmp/rs", "--log-level", "debug", "--log-json",
    ])
    .unwrap();

    assert_eq!(cli.global.data_dir, Some(PathBuf::from("/tmp/rs")));
    assert_eq!(cli.global.log_level.as_deref(), Some("debug"));
    assert!(cli.global.log_json);
    assert_eq!(cli.command, Command::List { json: false });
}

#[test]
fn test_edit_enable_and_disable_conflict() {
    let parsed = Cli::try_parse_from(["rulesetctl", "edit", "r1", "--enable", "--disable"]);
    assert!(parsed.is_err());
}

#[test]
fn test_unknown_source_rejected() {
    let parsed = Cli::try_parse_from([
        "rulesetctl", "add", "--tag", "x", "--source", "ftp", "--path", "x",
    ]);
    assert!(parsed.is_err());
}

#[test]
fn test_defaults_section() {
    let cli = Cli::try_parse_from(["rulesetctl", "defaults", "--section", "dns-rules"]).unwrap();
    assert_eq!(
        cli.command,
        Command::Defaults {
            name: "Default".to_string(),
            section: Section::DnsRules,
        }
    );
}

#[test]
fn test_refresh_all_and_watch() {
    let cli = Cli::try_parse_from(["rulesetctl", "refresh-all"]).unwrap();
    assert_eq!(cli.command, Command::RefreshAll);

    let cli = Cli::try_parse_from(["rulesetctl", "watch", "--interval", "600"]).unwrap();
    assert_eq!(cli.command, Command::Watch { interval: Some(600) });
}

fn arb_id() -> impl Strategy<Value = String> {
    "[a-z0-9][a-z0-9_]{0,31}"
}

proptest! {
    /// Positional ids reach the refresh, show and delete commands unchanged
    #[test]
    fn prop_positional_ids_round_trip(id in arb_id()) {
        let cli = Cli::try_parse_from(["rulesetctl", "refresh", id.as_str()]).unwrap();
        prop_assert_eq!(cli.command, Command::Refresh { id: id.clone() });

        let cli = Cli::try_parse_from(["rulesetctl", "show", id.as_str()]).unwrap();
        prop_assert_eq!(cli.command, Command::Show { id: id.clone() });

        let cli = Cli::try_parse_from(["rulesetctl", "delete", id.as_str()]).unwrap();
        prop_assert_eq!(cli.command, Command::Delete { id });
    }

    #[test]
    fn prop_debounce_flag_parses(ms in 0u64..100_000) {
        let value = ms.to_string();
        let cli = Cli::try_parse_from(["rulesetctl", "list", "--save-debounce-ms", value.as_str()]).unwrap();
        prop_assert_eq!(cli.global.save_debounce_ms, Some(ms));
    }
}
