//! Localized labels for default values
//!
//! Default proxy groups and the rules that point at them are named after
//! localized labels. Lookups go through [`LabelResolver`] so the defaults
//! builders never depend on a running localization subsystem.

use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Keys the defaults builders ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LabelKey {
    OutboundSelect,
    OutboundUrlTest,
    OutboundDirect,
    OutboundBlock,
    OutboundFallback,
}

impl LabelKey {
    pub const ALL: [LabelKey; 5] = [
        LabelKey::OutboundSelect,
        LabelKey::OutboundUrlTest,
        LabelKey::OutboundDirect,
        LabelKey::OutboundBlock,
        LabelKey::OutboundFallback,
    ];

    /// Dotted key as it appears in translation tables
    pub fn as_str(&self) -> &'static str {
        match self {
            LabelKey::OutboundSelect => "outbound.select",
            LabelKey::OutboundUrlTest => "outbound.urltest",
            LabelKey::OutboundDirect => "outbound.direct",
            LabelKey::OutboundBlock => "outbound.block",
            LabelKey::OutboundFallback => "outbound.fallback",
        }
    }
}

/// Resolves a label key to a human-readable string
pub trait LabelResolver: Send + Sync {
    fn label(&self, key: LabelKey) -> String;
}

/// English labels compiled into the binary
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinLabels;

impl LabelResolver for BuiltinLabels {
    fn label(&self, key: LabelKey) -> String {
        let text = match key {
            LabelKey::OutboundSelect => "🚀 Select",
            LabelKey::OutboundUrlTest => "🎈 Auto",
            LabelKey::OutboundDirect => "🎯 Direct",
            LabelKey::OutboundBlock => "🛑 Block",
            LabelKey::OutboundFallback => "🐟 Fallback",
        };
        text.to_string()
    }
}

#[derive(Debug, Error)]
pub enum LabelError {
    #[error("Failed to read label table {path}: {reason}")]
    Io { path: String, reason: String },

    #[error("Invalid label table: {0}")]
    Parse(String),
}

/// Label table loaded from a translation file.
///
/// Accepts both flat (`{"outbound.select": "..."}`) and nested
/// (`{"outbound": {"select": "..."}}`) JSON. A key missing from the table
/// resolves to the dotted key itself.
#[derive(Debug, Clone, Default)]
pub struct LabelTable {
    entries: HashMap<String, String>,
}

impl LabelTable {
    pub fn from_json_str(contents: &str) -> Result<Self, LabelError> {
        let value: Value =
            serde_json::from_str(contents).map_err(|e| LabelError::Parse(e.to_string()))?;
        let Value::Object(map) = value else {
            return Err(LabelError::Parse("top level must be an object".to_string()));
        };

        let mut entries = HashMap::new();
        for (key, value) in map {
            flatten_into(&mut entries, key, value)?;
        }
        Ok(Self { entries })
    }

    pub fn load(path: &Path) -> Result<Self, LabelError> {
        let contents = std::fs::read_to_string(path).map_err(|e| LabelError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_json_str(&contents)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn flatten_into(
    entries: &mut HashMap<String, String>,
    prefix: String,
    value: Value,
) -> Result<(), LabelError> {
    match value {
        Value::String(text) => {
            entries.insert(prefix, text);
            Ok(())
        }
        Value::Object(map) => {
            for (key, nested) in map {
                flatten_into(entries, format!("{}.{}", prefix, key), nested)?;
            }
            Ok(())
        }
        other => Err(LabelError::Parse(format!(
            "label '{}' must be a string, found {}",
            prefix, other
        ))),
    }
}

impl LabelResolver for LabelTable {
    fn label(&self, key: LabelKey) -> String {
        self.entries
            .get(key.as_str())
            .cloned()
            .unwrap_or_else(|| key.as_str().to_string())
    }
}
