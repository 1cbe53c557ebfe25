//! Common capabilities shared by the settings crates
//!
//! Both the profile defaults builders and the ruleset store need two things
//! from the host application:
//! - a process-wide unique identifier generator
//! - a resolver for human-readable, localized labels
//!
//! They are modelled as traits so callers inject them explicitly instead of
//! reaching for global state.

pub mod ids;
pub mod labels;

pub use ids::{is_sentinel, IdGenerator, SequentialIds, UuidGenerator, BLOCK_ID, DIRECT_ID};
pub use labels::{BuiltinLabels, LabelError, LabelKey, LabelResolver, LabelTable};
