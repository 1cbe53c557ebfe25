//! Bring a ruleset's local file up to date according to its source kind

use std::path::Path;
use tracing::debug;

use crate::bridge::FileBridge;
use crate::error::{StoreError, StoreResult};
use crate::ruleset::{RuleSet, RuleSetSource, EMPTY_RULESET};

pub(crate) async fn materialize(bridge: &dyn FileBridge, rs: &RuleSet) -> StoreResult<()> {
    if rs.location.is_empty() {
        return Err(StoreError::Validation("Ruleset file path is empty".to_string()));
    }
    let target = Path::new(&rs.location);

    match rs.source {
        RuleSetSource::Manual => {
            if !bridge.file_exists(target).await {
                debug!(tag = %rs.tag, path = %rs.location, "Creating empty manual ruleset");
                bridge.write_file(target, EMPTY_RULESET.as_bytes()).await?;
            }
        }
        RuleSetSource::File => {
            let source = Path::new(&rs.origin);
            let source_exists = !rs.origin.is_empty() && bridge.file_exists(source).await;

            if source_exists {
                if rs.origin != rs.location {
                    bridge.copy_file(source, target).await?;
                }
            } else if rs.origin == rs.location {
                debug!(tag = %rs.tag, path = %rs.location, "Creating empty ruleset in place");
                bridge.write_file(target, EMPTY_RULESET.as_bytes()).await?;
            } else {
                return Err(StoreError::SourceMissing {
                    path: rs.origin.clone(),
                });
            }
        }
        RuleSetSource::Http => {
            bridge.download(&rs.origin, target).await?;
            if !bridge.file_exists(target).await {
                return Err(StoreError::DownloadIncomplete {
                    url: rs.origin.clone(),
                });
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryBridge;

    fn ruleset(source: RuleSetSource, location: &str, origin: &str) -> RuleSet {
        let ids = settings_common::SequentialIds::new("rs");
        RuleSet::new(&ids, "Test", source, location, origin)
    }

    #[tokio::test]
    async fn test_empty_location_rejected_for_every_kind() {
        let bridge = MemoryBridge::new();
        for source in [RuleSetSource::Manual, RuleSetSource::File, RuleSetSource::Http] {
            let err = materialize(&bridge, &ruleset(source, "", "x")).await.unwrap_err();
            assert_eq!(err, StoreError::Validation("Ruleset file path is empty".to_string()));
        }
        assert_eq!(bridge.operation_count(), 0);
    }

    #[tokio::test]
    async fn test_manual_creates_missing_file_only() {
        let bridge = MemoryBridge::new();
        materialize(&bridge, &ruleset(RuleSetSource::Manual, "m.json", "")).await.unwrap();
        assert_eq!(bridge.file_string("m.json").as_deref(), Some(EMPTY_RULESET));

        bridge.insert_file("m.json", "custom");
        materialize(&bridge, &ruleset(RuleSetSource::Manual, "m.json", "")).await.unwrap();
        assert_eq!(bridge.file_string("m.json").as_deref(), Some("custom"));
    }

    #[tokio::test]
    async fn test_file_copies_existing_source() {
        let bridge = MemoryBridge::new();
        bridge.insert_file("src.json", "rules");
        materialize(&bridge, &ruleset(RuleSetSource::File, "dst.json", "src.json"))
            .await
            .unwrap();
        assert_eq!(bridge.file_string("dst.json").as_deref(), Some("rules"));
    }

    #[tokio::test]
    async fn test_file_same_path_existing_is_untouched() {
        let bridge = MemoryBridge::new();
        bridge.insert_file("same.json", "rules");
        materialize(&bridge, &ruleset(RuleSetSource::File, "same.json", "same.json"))
            .await
            .unwrap();
        assert_eq!(bridge.file_string("same.json").as_deref(), Some("rules"));
        assert_eq!(bridge.write_count("same.json"), 0);
    }

    #[tokio::test]
    async fn test_file_same_path_missing_creates_empty() {
        let bridge = MemoryBridge::new();
        materialize(&bridge, &ruleset(RuleSetSource::File, "same.json", "same.json"))
            .await
            .unwrap();
        assert_eq!(bridge.file_string("same.json").as_deref(), Some(EMPTY_RULESET));
    }

    #[tokio::test]
    async fn test_file_missing_source_leaves_target() {
        let bridge = MemoryBridge::new();
        bridge.insert_file("dst.json", "old");
        let err = materialize(&bridge, &ruleset(RuleSetSource::File, "dst.json", "gone.json"))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Source ruleset file not exists gone.json");
        assert_eq!(bridge.file_string("dst.json").as_deref(), Some("old"));
    }

    #[tokio::test]
    async fn test_file_empty_origin_is_missing_source() {
        let bridge = MemoryBridge::new();
        let err = materialize(&bridge, &ruleset(RuleSetSource::File, "dst.json", ""))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "source_missing");
    }

    #[tokio::test]
    async fn test_http_download() {
        let bridge = MemoryBridge::new();
        bridge.serve("http://x/ads.srs", b"srs".to_vec());
        materialize(&bridge, &ruleset(RuleSetSource::Http, "ads.srs", "http://x/ads.srs"))
            .await
            .unwrap();
        assert_eq!(bridge.file("ads.srs"), Some(b"srs".to_vec()));
    }

    #[tokio::test]
    async fn test_http_hollow_download() {
        let bridge = MemoryBridge::new();
        bridge.serve_hollow("http://x/ads.srs");
        let err = materialize(&bridge, &ruleset(RuleSetSource::Http, "ads.srs", "http://x/ads.srs"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Ruleset file not downloaded http://x/ads.srs");
    }

    #[tokio::test]
    async fn test_http_transport_failure() {
        let bridge = MemoryBridge::new();
        let err = materialize(&bridge, &ruleset(RuleSetSource::Http, "ads.srs", "http://x/404"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "download");
    }
}
