//! Contract shared by every record a collection store can hold

use serde::de::DeserializeOwned;
use serde::Serialize;

/// A persisted record addressed by an immutable identifier
pub trait Entity: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    fn id(&self) -> &str;

    /// Carry runtime-only state over from the record being replaced by an edit.
    ///
    /// Transient fields are never serialized, so a replacement built by a caller
    /// would otherwise reset them.
    fn inherit_transient(&mut self, _previous: &Self) {}
}
