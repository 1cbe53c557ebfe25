use proptest::prelude::*;
use ruleset_store::{FileBridge, MemoryBridge, RuleSet, RuleSetSource, RulesetStore, StoreOptions};
use settings_common::SequentialIds;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone)]
enum Op {
    Add(u8, String),
    Delete(u8),
    Edit(u8, String),
}

prop_compose! {
    fn arb_step()(
        kind in 0..3u8,
        slot in 0..5u8,
        tag in "[A-Za-z]{1,8}",
        fail in any::<bool>(),
    ) -> (Op, bool) {
        let op = match kind {
            0 => Op::Add(slot, tag),
            1 => Op::Delete(slot),
            _ => Op::Edit(slot, tag),
        };
        (op, fail)
    }
}

fn record(slot: u8, tag: &str) -> RuleSet {
    let mut rs = RuleSet::new(
        &SequentialIds::new("unused"),
        tag,
        RuleSetSource::Manual,
        format!("rules/{}.json", slot),
        "",
    );
    rs.id = format!("id-{}", slot);
    rs
}

/// Apply `op` to the plain-vector model the way a successful store call would
fn apply(model: &mut Vec<RuleSet>, op: &Op) {
    match op {
        Op::Add(slot, tag) => {
            let rs = record(*slot, tag);
            if !model.iter().any(|r| r.id == rs.id) {
                model.push(rs);
            }
        }
        Op::Delete(slot) => {
            let id = format!("id-{}", slot);
            model.retain(|r| r.id != id);
        }
        Op::Edit(slot, tag) => {
            let id = format!("id-{}", slot);
            if let Some(r) = model.iter_mut().find(|r| r.id == id) {
                *r = record(*slot, tag);
            }
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// A failed write leaves the collection exactly as it was before the call;
    /// a successful one matches the model.
    #[test]
    fn prop_failed_writes_roll_back(steps in prop::collection::vec(arb_step(), 1..25)) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let bridge = Arc::new(MemoryBridge::new());
            let dyn_bridge: Arc<dyn FileBridge> = bridge.clone();
            let store = RulesetStore::new(
                dyn_bridge,
                StoreOptions {
                    snapshot_path: "rulesets.yaml".into(),
                    save_debounce: Duration::ZERO,
                },
            );
            let mut model: Vec<RuleSet> = Vec::new();

            for (op, fail) in &steps {
                let before = store.list().await;
                bridge.fail_next_writes(usize::from(*fail));

                let result = match op {
                    Op::Add(slot, tag) => store.add(record(*slot, tag)).await.map(|_| ()),
                    Op::Delete(slot) => store.delete(&format!("id-{}", slot)).await.map(|_| ()),
                    Op::Edit(slot, tag) => store
                        .edit(&format!("id-{}", slot), record(*slot, tag))
                        .await
                        .map(|_| ()),
                };
                bridge.fail_next_writes(0);

                if result.is_err() {
                    prop_assert_eq!(store.list().await, before);
                } else {
                    apply(&mut model, op);
                    prop_assert_eq!(store.list().await, model.clone());
                }
            }

            // whatever survived in memory is what a fresh load sees
            let fresh = RulesetStore::new(
                bridge.clone(),
                StoreOptions {
                    snapshot_path: "rulesets.yaml".into(),
                    save_debounce: Duration::ZERO,
                },
            );
            fresh.load().await;
            if bridge.write_count("rulesets.yaml") > 0 {
                prop_assert_eq!(fresh.list().await, store.list().await);
            }
            Ok(())
        })?;
    }
}
