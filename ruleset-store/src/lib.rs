//! Ruleset Store
//!
//! An ordered, file-backed collection of rulesets. Every mutation is applied
//! in memory first and persisted through a debounced writer; a failed write
//! rolls the in-memory change back before the error reaches the caller.
//!
//! File system and network access go through the [`FileBridge`] trait, with
//! [`LocalBridge`] for real disks and [`MemoryBridge`] for tests and embedding.

pub mod auto_refresh;
pub mod bridge;
pub mod debounce;
pub mod entity;
pub mod error;
pub mod memory;
pub mod ruleset;
pub mod rulesets;
pub mod snapshot;
pub mod store;

mod materialize;

pub use auto_refresh::{run_once, spawn_auto_refresh};
pub use bridge::{FileBridge, LocalBridge, DEFAULT_DOWNLOAD_TIMEOUT};
pub use debounce::{DebouncedWriter, Submission, DEFAULT_SAVE_DEBOUNCE};
pub use entity::Entity;
pub use error::{StoreError, StoreResult};
pub use memory::MemoryBridge;
pub use ruleset::{RuleSet, RuleSetFormat, RuleSetSource, EMPTY_RULESET};
pub use rulesets::{RefreshOutcome, RulesetStore};
pub use store::{CollectionStore, StoreOptions, DEFAULT_SNAPSHOT_PATH};
