use proptest::prelude::*;
use workspace_tests::{
    dependency_entries, inherits_workspace, is_path_dependency, read_manifest, workspace_dependency_names,
    workspace_members, workspace_root,
};

/// Shared dependencies must be inherited with `workspace = true` so that every
/// member builds against the same version.
#[cfg(test)]
mod workspace_dependency_tests {
    use super::*;

    fn members() -> Vec<String> {
        workspace_members().expect("workspace members should be readable")
    }

    proptest! {
        #[test]
        fn test_workspace_dependency_consistency(index in 0usize..64) {
            let members = members();
            let crate_name = &members[index % members.len()];
            let manifest_path = workspace_root().join(crate_name).join("Cargo.toml");

            let manifest = read_manifest(&manifest_path)
                .map_err(proptest::test_runner::TestCaseError::fail)?;
            let shared = workspace_dependency_names()
                .map_err(proptest::test_runner::TestCaseError::fail)?;

            for (dep_name, spec) in dependency_entries(&manifest) {
                if shared.contains(&dep_name) {
                    prop_assert!(
                        inherits_workspace(&spec),
                        "Crate '{}' uses dependency '{}' but does not inherit from workspace (missing 'workspace = true')",
                        crate_name,
                        dep_name
                    );
                }
            }
        }
    }

    #[test]
    fn test_internal_dependencies_are_members() {
        let members = members();
        for crate_name in &members {
            let manifest = read_manifest(&workspace_root().join(crate_name).join("Cargo.toml")).unwrap();
            for (dep_name, spec) in dependency_entries(&manifest) {
                if is_path_dependency(&spec) {
                    assert!(
                        members.contains(&dep_name),
                        "Crate '{}' depends on '{}' by path but it is not a workspace member",
                        crate_name,
                        dep_name
                    );
                }
            }
        }
    }

    #[test]
    fn test_every_shared_dependency_is_used() {
        let members = members();
        let used: Vec<String> = members
            .iter()
            .flat_map(|m| {
                let manifest = read_manifest(&workspace_root().join(m).join("Cargo.toml")).unwrap();
                dependency_entries(&manifest).into_iter().map(|(name, _)| name)
            })
            .collect();

        for dep in workspace_dependency_names().unwrap() {
            assert!(used.contains(&dep), "Workspace dependency '{}' is not used by any member", dep);
        }
    }
}
