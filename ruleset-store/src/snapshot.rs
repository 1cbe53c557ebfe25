//! YAML snapshot codec
//!
//! A snapshot is a YAML sequence of records in collection order. Transient
//! fields are excluded by the records' own serde attributes.

use crate::entity::Entity;
use crate::error::{StoreError, StoreResult};

pub fn encode<E: Entity>(items: &[E]) -> StoreResult<String> {
    serde_yaml::to_string(items).map_err(|e| StoreError::Serialization(e.to_string()))
}

/// Decode a snapshot; an empty or `null` document is an empty collection
pub fn decode<E: Entity>(bytes: &[u8]) -> StoreResult<Vec<E>> {
    let text = std::str::from_utf8(bytes).map_err(|e| StoreError::Serialization(e.to_string()))?;
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    let items: Option<Vec<E>> =
        serde_yaml::from_str(text).map_err(|e| StoreError::Serialization(e.to_string()))?;
    Ok(items.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ruleset::{RuleSet, RuleSetSource};
    use settings_common::SequentialIds;

    #[test]
    fn test_encode_decode_preserves_order() {
        let ids = SequentialIds::new("rs");
        let mut items = vec![
            RuleSet::new(&ids, "B", RuleSetSource::Http, "b.srs", "http://x/b.srs"),
            RuleSet::new(&ids, "A", RuleSetSource::Manual, "a.json", ""),
        ];
        items[0].last_updated = Some(chrono::Utc::now());
        items[1].refreshing = true;

        let yaml = encode(&items).unwrap();
        assert!(!yaml.contains("refreshing"));

        let decoded: Vec<RuleSet> = decode(yaml.as_bytes()).unwrap();
        assert_eq!(decoded.len(), 2);
        assert_eq!(decoded[0].tag, "B");
        assert_eq!(decoded[0].last_updated, items[0].last_updated);
        assert_eq!(decoded[1].tag, "A");
        assert!(!decoded[1].refreshing);
    }

    #[test]
    fn test_decode_empty_documents() {
        assert!(decode::<RuleSet>(b"").unwrap().is_empty());
        assert!(decode::<RuleSet>(b"  \n").unwrap().is_empty());
        assert!(decode::<RuleSet>(b"null").unwrap().is_empty());
        assert!(decode::<RuleSet>(b"[]").unwrap().is_empty());
    }

    #[test]
    fn test_decode_garbage() {
        let err = decode::<RuleSet>(b"{ not: [valid").unwrap_err();
        assert_eq!(err.kind(), "serialization");
    }

    #[test]
    fn test_decode_handwritten_snapshot() {
        let yaml = "\
- id: r1
  tag: Ads
  updateTime: '2024-05-01T08:00:00Z'
  disabled: false
  type: Http
  format: binary
  path: data/rulesets/ads.srs
  url: https://example.com/ads.srs
";
        let decoded: Vec<RuleSet> = decode(yaml.as_bytes()).unwrap();
        assert_eq!(decoded[0].id, "r1");
        assert_eq!(decoded[0].source, RuleSetSource::Http);
        assert_eq!(decoded[0].origin, "https://example.com/ads.srs");
    }
}
