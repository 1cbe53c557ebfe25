//! Helpers for checks that run against the workspace manifests

use std::fs;
use std::path::{Path, PathBuf};
use toml::Value;

/// Root of the workspace this crate belongs to
pub fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(".."))
}

pub fn read_manifest(path: &Path) -> Result<Value, String> {
    let content =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    parse_manifest(&content).map_err(|e| format!("Failed to parse {}: {}", path.display(), e))
}

pub fn parse_manifest(content: &str) -> Result<Value, toml::de::Error> {
    toml::from_str::<toml::Table>(content).map(Value::Table)
}

pub fn root_manifest() -> Result<Value, String> {
    read_manifest(&workspace_root().join("Cargo.toml"))
}

/// Member directory names listed in `[workspace] members`
pub fn workspace_members() -> Result<Vec<String>, String> {
    let root = root_manifest()?;
    let members = root
        .get("workspace")
        .and_then(|w| w.get("members"))
        .and_then(Value::as_array)
        .ok_or_else(|| "Root Cargo.toml has no workspace members".to_string())?;

    Ok(members
        .iter()
        .filter_map(Value::as_str)
        .map(str::to_string)
        .collect())
}

/// Names declared in `[workspace.dependencies]`
pub fn workspace_dependency_names() -> Result<Vec<String>, String> {
    let root = root_manifest()?;
    let deps = root
        .get("workspace")
        .and_then(|w| w.get("dependencies"))
        .and_then(Value::as_table)
        .ok_or_else(|| "Root Cargo.toml has no workspace dependencies".to_string())?;
    Ok(deps.keys().cloned().collect())
}

/// Every `(name, spec)` pair from the dependency tables of a manifest
pub fn dependency_entries(manifest: &Value) -> Vec<(String, Value)> {
    ["dependencies", "dev-dependencies", "build-dependencies"]
        .iter()
        .filter_map(|section| manifest.get(*section).and_then(Value::as_table))
        .flat_map(|table| table.iter().map(|(k, v)| (k.clone(), v.clone())))
        .collect()
}

/// Whether a dependency spec inherits from the workspace, in either the
/// `dep = { workspace = true }` or the `dep.workspace = true` spelling
pub fn inherits_workspace(spec: &Value) -> bool {
    spec.get("workspace").and_then(Value::as_bool).unwrap_or(false)
}

/// Whether a dependency spec points at another workspace member
pub fn is_path_dependency(spec: &Value) -> bool {
    spec.get("path").is_some()
}
