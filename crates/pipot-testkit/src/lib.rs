//! Pipot Testkit - test support for Pipot renderers
//!
//! - [`RecordingHost`]: an in-memory host tree with an ordered mutation trace,
//!   markup serialization and event dispatch
//! - [`ScriptedDeadline`] / [`FixedDeadline`]: deterministic scheduling turns
//! - [`fixtures`]: `rstest` fixtures

pub mod deadline;
pub mod fixtures;
pub mod host;

pub use deadline::{FixedDeadline, ScriptedDeadline};
pub use fixtures::{Mounted, mounted, recording_host};
pub use host::{Mutation, NodeId, RecordingHost};
