use workspace_tests::{read_manifest, root_manifest, workspace_members, workspace_root};

/// Structure checks for the root manifest and every member manifest
#[cfg(test)]
mod workspace_configuration_tests {
    use super::*;

    #[test]
    fn test_root_cargo_toml_contains_expected_members() {
        let members = workspace_members().unwrap();
        for expected in [
            "settings-common",
            "profile-defaults",
            "ruleset-store",
            "settings-cli",
            "workspace-tests",
        ] {
            assert!(
                members.iter().any(|m| m == expected),
                "Root Cargo.toml should contain member: {}",
                expected
            );
        }

        let root = root_manifest().unwrap();
        assert_eq!(
            root["workspace"]["resolver"].as_str(),
            Some("2"),
            "Root Cargo.toml should use resolver version 2"
        );
    }

    #[test]
    fn test_members_inherit_package_metadata() {
        for member in workspace_members().unwrap() {
            let manifest = read_manifest(&workspace_root().join(&member).join("Cargo.toml")).unwrap();
            let package = manifest
                .get("package")
                .unwrap_or_else(|| panic!("{} should have a [package] section", member));

            for key in ["version", "edition"] {
                let inherited = package
                    .get(key)
                    .and_then(|v| v.get("workspace"))
                    .and_then(|v| v.as_bool())
                    .unwrap_or(false);
                assert!(inherited, "{} should set {}.workspace = true", member, key);
            }
        }
    }

    #[test]
    fn test_cli_binary_is_declared() {
        let manifest = read_manifest(&workspace_root().join("settings-cli/Cargo.toml")).unwrap();
        let bins = manifest["bin"].as_array().expect("settings-cli should declare [[bin]]");
        assert!(bins
            .iter()
            .any(|b| b.get("name").and_then(|n| n.as_str()) == Some("rulesetctl")));
    }
}
